use std::process::ExitCode;

use backing_tracks::{
    config::{Cli, Settings},
    core::session::{exit_code, run},
    DemucsSeparator, ScriptGenerator, SessionError,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let settings = Settings::from_cli(&cli);

    let result = run(
        &settings,
        |g| ScriptGenerator::load(&g.python, &g.script, &g.model, &g.device),
        |s| DemucsSeparator::new(&s.program, &s.model, &s.device),
    );
    match &result {
        Err(e) if e.is_config_error() => {
            eprintln!("[!] {}", e);
            if matches!(e, SessionError::PromptsNotFound { .. }) {
                eprintln!("    Create a prompts.yaml file or specify with --prompts");
            }
        }
        Err(e) => eprintln!("Fatal error: {}", e),
        Ok(_) => {}
    }
    ExitCode::from(exit_code(&result))
}

fn init_logging(cli: &Cli) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_target(false)
        .init();
}
