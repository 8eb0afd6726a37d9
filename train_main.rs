use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use listing_price_classifier::io::CsvDataLoader;
use listing_price_classifier::model_store::MsgpackModelStore;
use listing_price_classifier::telemetry;
use listing_price_classifier::training::ListingTrainer;

/// Train Airbnb model
#[derive(Parser)]
#[command(name = "train", version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Input file name (cleaned listings CSV)
    #[arg(long)]
    input: PathBuf,

    /// Output file name (.pkl)
    #[arg(long)]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    telemetry::init_tracing();

    info!("Train Airbnb model");
    let trainer = ListingTrainer::new(
        Box::new(CsvDataLoader::new(args.input).with_dropna(true)),
        Box::new(MsgpackModelStore::new(args.output)),
    );

    if let Err(e) = trainer.run() {
        error!("An error occurred: {}", e);
        error!("Training model failed.");
        return Err(e.into());
    }

    info!("Airbnb Training completed successfully.");
    Ok(())
}
