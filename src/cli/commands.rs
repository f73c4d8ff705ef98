use chrono::{Local, NaiveDate};
use tracing::info;

use crate::acquisition::{AcquisitionMode, Acquirer};
use crate::cli::args::{Cli, Commands};
use crate::config::AppConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{Coordinate, RasterProduct};
use crate::processors::{Collector, Ingestor};
use crate::readers::read_observation_record;
use crate::store;
use crate::utils::logging::init_logging;
use crate::utils::progress::ProgressReporter;
use crate::utils::{generate_record_filename, CapabilityReport};
use crate::writers::{write_observation_record, BackupWriter};

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let config = AppConfig::load(cli.config.as_deref())?;
    let capabilities = CapabilityReport::probe(&config);
    info!("{}", capabilities.diagnostic());

    match cli.command {
        Commands::Collect {
            lat,
            lon,
            date,
            output,
            mode,
            mock,
            name,
        } => {
            let coordinate = Coordinate::new(lat, lon);
            let date = match date {
                Some(text) => NaiveDate::parse_from_str(&text, "%Y-%m-%d")?,
                None => Local::now().date_naive(),
            };
            let mode = if mock {
                AcquisitionMode::Mock
            } else {
                mode.parse::<AcquisitionMode>()?
            };
            let output = output.unwrap_or_else(|| generate_record_filename(&coordinate, date));

            println!("Collecting observations...");
            println!("Point: {}, date: {}, mode: {}", coordinate, date, mode);

            let acquirer = Acquirer::from_config(mode, &config, &capabilities)?;
            let mut collector = Collector::new(acquirer)
                .with_location_name(name)
                .with_progress(true);
            let record = collector.collect(coordinate, date).await;

            write_observation_record(&record, &output)?;

            for product in RasterProduct::ALL {
                match record.extraction(product) {
                    Some(extraction) => match extraction.pixel_value_celsius {
                        Some(celsius) => println!(
                            "  {}: {:.2} K ({:.2} °C)",
                            product, extraction.pixel_value, celsius
                        ),
                        None => println!("  {}: {:.3}", product, extraction.pixel_value),
                    },
                    None => println!(
                        "  {}: {}",
                        product,
                        record
                            .observation(product)
                            .and_then(|o| o.error())
                            .unwrap_or("missing")
                    ),
                }
            }
            println!(
                "Record written to {} ({} data)",
                output.display(),
                record.data_source
            );
        }

        Commands::Upload {
            input,
            location_id,
            backup_only,
            backup_dir,
        } => {
            println!("Uploading {}", input.display());
            let record = read_observation_record(&input)?;

            let backup_dir = backup_dir.unwrap_or_else(|| config.backup_dir.clone());
            let mut ingestor =
                Ingestor::new(BackupWriter::new(&backup_dir)).with_backup_only(backup_only);
            if let Ok(settings) = config.store_settings() {
                ingestor = ingestor.with_store(settings);
            }

            let progress = ProgressReporter::new_spinner("Writing observation...", false);
            let outcome = ingestor.ingest(&record, location_id).await;
            progress.finish_with_message(&outcome.describe());

            if !outcome.is_success() {
                return Err(ProcessingError::IngestionFailed(outcome.describe()));
            }
            println!("Upload complete: {}", outcome.describe());
        }

        Commands::InitStore {
            location_name,
            lat,
            lon,
        } => {
            let settings = config.store_settings()?;
            let mut conn = store::connect(&settings).await?;

            let result = async {
                conn.apply_schema().await?;
                println!("Store schema ready");

                if let (Some(name), Some(lat), Some(lon)) = (location_name, lat, lon) {
                    let id = conn
                        .register_location(&name, &Coordinate::new(lat, lon))
                        .await?;
                    println!("Registered location '{}' with id {}", name, id);
                }
                Ok::<(), ProcessingError>(())
            }
            .await;

            conn.close().await?;
            result?;
        }

        Commands::Probe => {
            println!("{}", capabilities.summary(&config));
        }
    }

    Ok(())
}
