use crate::commands::Cli;
use crate::ecm::{decode_image, encode_image};
use anyhow::Result;
use clap::Parser;
use indicatif::MultiProgress;
use log::{error, info};
use std::time::Instant;

mod cd;
mod commands;
mod ecm;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let start = Instant::now();
    let pb = MultiProgress::new();

    let result = if cli.decode {
        decode_image(pb, cli.input.clone(), cli.output.clone()).await
    } else {
        encode_image(pb, cli.input.clone(), cli.output.clone()).await
    };

    match result {
        Ok(()) => {
            info!("Finished in {:.3}s", start.elapsed().as_secs_f64());
            Ok(())
        }
        Err(err) => {
            // A failed run must not leave a partial output file behind.
            if tokio::fs::metadata(&cli.output).await.is_ok() {
                if let Err(remove_err) = tokio::fs::remove_file(&cli.output).await {
                    error!(
                        "Could not remove the incomplete output file {:?}: {}",
                        cli.output, remove_err
                    );
                }
            }
            Err(err.into())
        }
    }
}
