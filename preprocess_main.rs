use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use listing_price_classifier::io::{CsvDataLoader, CsvDataSaver};
use listing_price_classifier::preprocessing::ListingPreprocessor;
use listing_price_classifier::telemetry;

/// Preprocess Airbnb listings data
#[derive(Parser)]
#[command(name = "preprocess", version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Input file name (raw listings CSV)
    #[arg(long)]
    input: PathBuf,

    /// Output file name (cleaned CSV)
    #[arg(long)]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    telemetry::init_tracing();

    info!("Preprocessing Airbnb data");
    let preprocessor = ListingPreprocessor::new(
        Box::new(CsvDataLoader::new(args.input)),
        Box::new(CsvDataSaver::new(args.output)),
    );

    match preprocessor.run() {
        Ok(report) => {
            info!(
                "Data preprocessing completed successfully. Kept {} of {} rows.",
                report.rows_out, report.rows_in
            );
            info!("Cleaning report: {}", serde_json::to_string(&report)?);
            Ok(())
        }
        Err(e) => {
            error!("An error occurred: {}", e);
            error!("Data preprocessing failed.");
            Err(e.into())
        }
    }
}
