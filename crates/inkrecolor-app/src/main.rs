//! Command line entry point.

use clap::Parser;
use inkrecolor_core::{
    ColorPicker, Config, ConfigError, FileHost, RecolorError, RecolorInkCommand, RecolorOptions,
    RecolorOutcome,
};
use std::sync::Arc;
use thiserror::Error;

mod args;
mod picker;

use args::Cli;
use picker::{FixedPicker, PromptPicker};

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Recolor(#[from] RecolorError),
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            init_logging(None);
            exit_with(AppError::from(e));
        }
    };
    init_logging(config.log_filter.as_deref());

    let options = cli.options(config.recolor);
    let host = Arc::new(FileHost::new(&cli.page));
    log::info!("Recoloring ink in {}", host.path().display());

    let result = match cli.color {
        Some(color) => pollster::block_on(execute(host, FixedPicker(color), options)),
        None => pollster::block_on(execute(host, PromptPicker::terminal(), options)),
    };

    match result {
        Ok(RecolorOutcome::Recolored(report)) => {
            println!(
                "Recolored {} strokes in {} ink drawings",
                report.strokes, report.elements
            );
        }
        Ok(RecolorOutcome::Unchanged) => println!("No strokes needed recoloring"),
        Ok(RecolorOutcome::Cancelled) => {}
        Ok(RecolorOutcome::Busy) => log::warn!("recolor already in progress"),
        Err(e) => exit_with(e.into()),
    }
}

async fn execute<P: ColorPicker>(
    host: Arc<FileHost>,
    picker: P,
    options: RecolorOptions,
) -> Result<RecolorOutcome, RecolorError> {
    RecolorInkCommand::with_options(host, picker, options)
        .execute()
        .await
}

/// `RUST_LOG` wins over the configured filter.
fn init_logging(filter: Option<&str>) {
    let env = env_logger::Env::default().default_filter_or(filter.unwrap_or("warn"));
    env_logger::Builder::from_env(env).init();
}

fn exit_with(error: AppError) -> ! {
    match &error {
        AppError::Recolor(e) if e.is_user_visible() => eprintln!("{}", e),
        _ => {
            log::error!("{}", error);
            eprintln!("Error: {}", error);
        }
    }
    std::process::exit(1);
}
