pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod geometry;
pub mod gesture;
pub mod history;
pub mod logging;
pub mod mapping;
pub mod region;
pub mod render;
pub use engine::Engine;
pub use error::{AppError, AppResult};

pub fn run() -> AppResult<()> {
    use clap::Parser;

    logging::init();
    tracing::info!("starting redactor");

    let args = cli::CliArgs::parse();
    let output = cli::run(&args)?;

    tracing::info!(output = %output.display(), "redaction complete");
    Ok(())
}
