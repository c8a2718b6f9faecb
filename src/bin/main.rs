use std::path::PathBuf;

use clap::{
    Parser,
    Subcommand,
};
use esp_build_tools::{
    assets,
    cache::ChangeDetector,
    config::DEFAULT_ENV_NAME,
    ports,
    report,
    size,
    BuildConfig,
    PartitionTable,
};

#[derive(Parser)]
#[command(name = "esp-build-tools")]
#[command(about = "Build helpers for ESP32 firmware: partition tables, size reports, asset staging", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the partition table binary from CSV, skipping when the CSV
    /// content is unchanged since the last run
    Generate {
        /// Input CSV file
        #[arg(long, default_value = "partitions.csv")]
        input: PathBuf,

        /// Output binary file
        #[arg(long, default_value = "partitions.bin")]
        output: PathBuf,

        /// Regenerate even when the CSV content is unchanged
        #[arg(long)]
        force: bool,
    },
    /// Decode a partition table binary back to CSV
    Parse {
        /// Input binary file
        #[arg(long, default_value = "partitions.bin")]
        input: PathBuf,

        /// Output CSV file
        #[arg(long, default_value = "partitions.parsed.csv")]
        output: PathBuf,
    },
    /// Show the partition layout in human-readable form
    ShowPartitions {
        /// Partition CSV file
        #[arg(long, default_value = "partitions.csv")]
        csv: PathBuf,
    },
    /// Show firmware section sizes and factory partition utilization
    ShowSize {
        /// Firmware project root
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// PlatformIO environment name
        #[arg(long, default_value = DEFAULT_ENV_NAME)]
        env: String,
    },
    /// Summarize the filesystem data tree and image utilization
    FsUsage {
        /// Firmware project root
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// PlatformIO environment name
        #[arg(long, default_value = DEFAULT_ENV_NAME)]
        env: String,
    },
    /// Stage web assets from static/ into the data/ filesystem tree
    StageAssets {
        /// Firmware project root
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },
    /// Auto-detect the serial upload port
    DetectPort,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output,
            force,
        } => {
            let detector = ChangeDetector::new(&input);
            if !force && !detector.is_stale(&output)? {
                println!("{} is up to date, skipping regeneration", output.display());
                return Ok(());
            }

            println!("Parsing partition CSV: {}", input.display());
            let table = PartitionTable::from_csv_file(&input)?;
            println!("Found {} partitions", table.entries.len());

            table.to_bin_file(&output)?;
            detector.record()?;
            println!("Generated {} from {}", output.display(), input.display());

            Ok(())
        }
        Commands::Parse { input, output } => {
            println!("Parsing binary file: {}", input.display());
            let table = PartitionTable::from_bin_file(&input)?;
            println!("Found {} partitions", table.entries.len());

            table.to_csv_file(&output)?;
            println!("Wrote {}", output.display());

            Ok(())
        }
        Commands::ShowPartitions { csv } => {
            let table = PartitionTable::from_csv_file(&csv)?;
            print!("{}", report::render(&report::flash_usage(&table)));
            Ok(())
        }
        Commands::ShowSize { project_dir, env } => {
            let config = BuildConfig::new(project_dir, env);
            print!("{}", size::firmware_size_report(&config)?);
            Ok(())
        }
        Commands::FsUsage { project_dir, env } => {
            let config = BuildConfig::new(project_dir, env);
            print!("{}", size::fs_usage_report(&config)?);
            Ok(())
        }
        Commands::StageAssets { project_dir } => {
            let config = BuildConfig::new(project_dir, DEFAULT_ENV_NAME);
            let summary = assets::stage_static_assets(&config)?;
            println!(
                "Copied {} files, created {} source map placeholders",
                summary.files_copied, summary.maps_created
            );
            if !summary.missing_icons.is_empty() {
                println!("Missing icons: {}", summary.missing_icons.join(", "));
            }
            Ok(())
        }
        Commands::DetectPort => {
            match ports::detect_upload_port() {
                Some(port) => println!("Found upload port: {port}"),
                None => {
                    println!("Could not auto-detect an upload port; connect the device or set the port manually");
                    let available = ports::list_serial_ports();
                    if !available.is_empty() {
                        println!("Available serial ports:");
                        for port in available {
                            println!("  {port}");
                        }
                    }
                }
            }
            Ok(())
        }
    }
}
