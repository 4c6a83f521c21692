use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{info, warn};
use simple_resize::batch::{self, ResizeJob};
use simple_resize::config;
use simple_resize::imaging::{self, RustBackend, TargetSize};
use simple_resize::output;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Flags shared by commands that write images.
#[derive(clap::Args, Clone)]
struct RunArgs {
    /// Exit with status 1 if any job did not produce its output
    #[arg(long)]
    strict: bool,

    /// Write a JSON report of every job outcome to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Parser)]
#[command(name = "simple-resize")]
#[command(about = "Batch-resize app icons and screenshots to fixed pixel sizes")]
#[command(long_about = "\
Batch-resize app icons and screenshots to fixed pixel sizes

Jobs are read from resize.toml. Each job names a source image, an output
path, and a size: a single number for a square (192 → 192x192) or a pair
for an exact rectangle ([1080, 1920]). Rectangles stretch the source to
fit; nothing is cropped. The output format follows the output extension.

A missing or unreadable source only fails its own job. Every other job
still runs.

Run 'simple-resize gen-config' to print a documented resize.toml.")]
#[command(version)]
struct Cli {
    /// Batch config file
    #[arg(long, default_value = config::CONFIG_FILE_NAME, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every job in the config file
    Run(RunArgs),
    /// Resize a single image without a config file
    Resize {
        /// Image to read
        source: PathBuf,
        /// File to write; the extension picks the format
        output: PathBuf,
        /// Edge length (192) or WIDTHxHEIGHT (1080x1920)
        #[arg(long)]
        size: TargetSize,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Validate the config file and list its jobs without writing anything
    Check,
    /// Print a stock resize.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::new().filter_or("SIMPLE_RESIZE_LOG", "warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(run) => {
            let jobs = load_jobs(&cli.config)?;
            info!("running {} jobs from {}", jobs.len(), cli.config.display());
            execute(&jobs, &run)
        }
        Command::Resize {
            source,
            output,
            size,
            run,
        } => {
            let job = ResizeJob {
                source,
                output,
                size,
            };
            execute(std::slice::from_ref(&job), &run)
        }
        Command::Check => {
            let jobs = load_jobs(&cli.config)?;
            println!("==> Checking {}", cli.config.display());
            let backend = RustBackend::new();
            let source_info: Vec<Result<(u32, u32), String>> = jobs
                .iter()
                .map(|job| {
                    if job.source.exists() {
                        imaging::get_dimensions(&backend, &job.source).map_err(|e| e.to_string())
                    } else {
                        Err("not found".to_string())
                    }
                })
                .collect();
            output::print_job_plan(&jobs, &source_info);
            println!("==> Config is valid");
            Ok(ExitCode::SUCCESS)
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Load, validate, and resolve the job list from a config file.
fn load_jobs(config_path: &Path) -> Result<Vec<ResizeJob>, config::ConfigError> {
    if !config_path.exists() {
        warn!("{} not found, using stock defaults", config_path.display());
    }
    let cfg = config::load_config(config_path)?;
    Ok(cfg.resolved_jobs(&config::config_root(config_path)))
}

/// Run jobs, print their outcomes, and decide the exit status.
fn execute(jobs: &[ResizeJob], run: &RunArgs) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let backend = RustBackend::new();
    let report = batch::run_batch(&backend, jobs, output::print_job_report);
    output::print_batch_summary(&report);

    if let Some(path) = &run.report {
        report.write_json(path)?;
        info!("report written to {}", path.display());
    }

    if run.strict && !report.all_succeeded() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
