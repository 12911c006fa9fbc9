use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "aqmap-processor")]
#[command(about = "Air-quality sensor network map generator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the interactive map artifact from a sensor readings CSV
    Generate {
        #[arg(short, long, help = "Input CSV file of raw sensor readings")]
        input_csv: PathBuf,

        #[arg(
            short,
            long,
            help = "Output HTML file path [default: aqmap-{YYMMDD}.html]"
        )]
        output_file: Option<PathBuf>,

        #[arg(long, default_value_t = num_cpus::get())]
        max_workers: usize,

        #[arg(
            long,
            default_value = "168",
            help = "Resampled points retained per station"
        )]
        max_history_points: usize,

        #[arg(long, default_value = "false", help = "Memory-map the input file")]
        use_mmap: bool,
    },

    /// Check the CSV and report column resolution without writing output
    Validate {
        #[arg(short, long, help = "Input CSV file of raw sensor readings")]
        input_csv: PathBuf,

        #[arg(long, default_value = "false", help = "Memory-map the input file")]
        use_mmap: bool,
    },
}
