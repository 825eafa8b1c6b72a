use clap::Parser;
use owo_colors::OwoColorize;
use std::path::Path;

use hindime::cli::{generate_completions, AppConfig, Args, Commands};
use hindime::diagnostic::render_diagnostic;
use hindime::interpreter::Runner;

fn main() {
    let args = Args::parse();

    if let Some(Commands::Complete { shell }) = args.command {
        generate_completions(shell);
        return;
    }

    let config = AppConfig::from_args(&args);

    let path = match &args.file {
        Some(path) => path.clone(),
        None => {
            use clap::CommandFactory;
            let _ = Args::command().print_help();
            std::process::exit(2);
        }
    };

    if path.extension().and_then(|e| e.to_str()) != Some("hindi") {
        error_message(
            &config,
            &format!("'{}' is not a .hindi file", path.display()),
        );
        std::process::exit(1);
    }

    verbose_log(&config, &format!("Running {}", path.display()));

    let source = match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(e) => {
            error_message(
                &config,
                &format!("Failed to read {}: {}", path.display(), e),
            );
            std::process::exit(1);
        }
    };

    let mut runner = Runner::new();
    match runner.run_program(&source, Some(Path::new(&path))) {
        Ok(module) => {
            verbose_log(
                &config,
                &format!(
                    "Finished; {} function(s) defined, {} exported value(s), {} exported function(s)",
                    module.functions.names().len(),
                    module.scope.exports().len(),
                    module.scope.exported_functions().len()
                ),
            );
        }
        Err(err) => {
            let diagnostic = err.to_diagnostic();
            let file_name = path.display().to_string();
            eprint!(
                "{}",
                render_diagnostic(&source, &file_name, &diagnostic, config.color_enabled)
            );
            std::process::exit(1);
        }
    }
}

fn verbose_log(config: &AppConfig, message: &str) {
    if config.verbose {
        eprintln!("[hindime:debug] {}", message);
    }
}

fn error_message(config: &AppConfig, message: &str) {
    if config.color_enabled {
        eprintln!("{}", message.red().bold());
    } else {
        eprintln!("{}", message);
    }
}
