use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;
use one_brc::config::{DEFAULT_TABLE_BITS, TABLE_BITS_RANGE};
use one_brc::{Config, ScanMode};

#[derive(Parser, Debug)]
#[command(name = "one-brc", version, about = "Per-station min/mean/max of a name;value file")]
struct Args {
    /// Path to the measurements file
    input: PathBuf,

    /// Log per-phase timings to stderr
    #[arg(long)]
    profile: bool,

    /// Number of workers (defaults to available parallelism)
    #[arg(long)]
    workers: Option<usize>,

    /// Aggregate table capacity as a power of two
    #[arg(long, default_value_t = DEFAULT_TABLE_BITS,
          value_parser = clap::value_parser!(u32).range(*TABLE_BITS_RANGE.start() as i64..=*TABLE_BITS_RANGE.end() as i64))]
    table_bits: u32,

    /// Validate every record instead of trusting the input format
    #[arg(long)]
    checked: bool,
}

impl Args {
    fn config(&self) -> Config {
        let mode = if self.checked {
            ScanMode::Checked
        } else {
            ScanMode::Trusted
        };
        let mut config = Config::default()
            .with_table_bits(self.table_bits)
            .with_mode(mode);
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        config.profile = self.profile;
        config
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.profile { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = args.config();
    let out = BufWriter::new(io::stdout().lock());
    match one_brc::run(&args.input, &config, out) {
        Ok(input) => {
            // Unmapped by the OS at exit.
            std::mem::forget(input);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
