use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::models::CanonicalVariable;
use crate::pipeline::{ColumnMap, PipelineRunner};
use crate::readers::{SensorCsvReader, SensorTable};
use crate::utils::filename::generate_default_artifact_filename;
use crate::utils::progress::ProgressReporter;
use crate::writers::HtmlWriter;

pub async fn run(cli: Cli) -> Result<()> {
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    match cli.command {
        Commands::Generate {
            input_csv,
            output_file,
            max_workers,
            max_history_points,
            use_mmap,
        } => {
            let output_file = output_file.unwrap_or_else(generate_default_artifact_filename);

            println!("Processing sensor readings...");
            println!("Input file: {}", input_csv.display());
            println!("Output file: {}", output_file.display());
            println!("Workers: {}", max_workers);

            let progress = ProgressReporter::new_spinner("Reading sensor readings...", false);

            let table = read_table(input_csv, use_mmap).await?;
            progress.set_message("Aggregating...");

            let runner =
                PipelineRunner::new(max_workers).with_max_history_points(max_history_points);
            let dataset = runner.run(&table, Some(&progress))?;

            progress.finish_with_message(&format!(
                "Aggregated {} readings across {} stations ({} dropped rows)",
                table.len(),
                dataset.station_count(),
                table.dropped_rows()
            ));

            let writer = HtmlWriter::new();
            let info = writer.write(&dataset, &output_file)?;

            println!("\n{}", info.summary());
            println!(
                "Time axis: {} instants, detail keys: {}",
                dataset.all_times.len(),
                dataset.selected_detail_keys.join(", ")
            );
            println!("Processing complete!");
        }

        Commands::Validate { input_csv, use_mmap } => {
            println!("Validating sensor readings...");
            println!("Input file: {}", input_csv.display());

            let table = read_table(input_csv, use_mmap).await?;
            let columns = ColumnMap::resolve(table.columns());

            println!(
                "\nRows: {} retained, {} dropped",
                table.len(),
                table.dropped_rows()
            );
            println!("Stations: {}", table.group_by_station().len());
            println!("\nColumn resolution (<unresolved> stays null everywhere):");
            for var in CanonicalVariable::ALL {
                println!(
                    "  {:<10} -> {}",
                    var.as_str(),
                    columns.column(var).unwrap_or("<unresolved>")
                );
            }
            println!(
                "\nNumeric columns: {}",
                table.numeric_columns().join(", ")
            );
        }
    }

    Ok(())
}

async fn read_table(input_csv: PathBuf, use_mmap: bool) -> Result<SensorTable> {
    let reader = SensorCsvReader::new().with_mmap(use_mmap);
    tokio::task::spawn_blocking(move || reader.read(&input_csv)).await?
}
