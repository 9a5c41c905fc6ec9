use super::load_clean_efforts;
use clap::Args;
use segrank_core::config::Config;
use segrank_core::efforts::{parse_start_date, split_by_date, write_efforts_csv, Effort};
use segrank_core::error::{SegRankError, SrResult};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct CleanArgs {
    #[command(flatten)]
    pub config: Config,

    /// Raw effort dump (.json/.jsonl) or effort CSV
    #[arg(short, long)]
    pub input: PathBuf,

    /// Cleaned effort CSV
    #[arg(short, long)]
    pub output: PathBuf,

    /// Keep only efforts on or before this date in `output`
    #[arg(long, requires = "test_output")]
    pub split_date: Option<String>,

    /// Where the efforts after `split_date` go
    #[arg(long, requires = "split_date")]
    pub test_output: Option<PathBuf>,
}

fn write_csv(path: &Path, efforts: &[Effort]) -> SrResult<()> {
    write_efforts_csv(File::create(path)?, efforts)?;
    info!("💾 Wrote {} efforts to {:?}", efforts.len(), path);
    Ok(())
}

pub fn run(args: CleanArgs, config: &Config) -> SrResult<()> {
    let efforts = load_clean_efforts(&args.input, &config.loader)?;

    match (&args.split_date, &args.test_output) {
        (Some(date), Some(test_path)) => {
            let cutoff = parse_start_date(date)
                .ok_or_else(|| SegRankError::Config(format!("Invalid split date '{}'", date)))?;
            let (train, test) = split_by_date(&efforts, cutoff);
            write_csv(&args.output, &train)?;
            write_csv(test_path, &test)?;
        }
        _ => write_csv(&args.output, &efforts)?,
    }
    Ok(())
}
