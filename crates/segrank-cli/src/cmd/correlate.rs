use crate::reports;
use clap::Args;
use segrank_core::analysis::segment_feature_correlations;
use segrank_core::efforts::load_efforts;
use segrank_core::error::SrResult;
use segrank_core::ratings::load_ratings_from_path;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct CorrelateArgs {
    /// Segment ratings CSV
    #[arg(short, long)]
    pub segments: PathBuf,

    /// Efforts carrying the segment attributes
    #[arg(short, long)]
    pub efforts: PathBuf,
}

pub fn run(args: CorrelateArgs) -> SrResult<()> {
    let ratings = load_ratings_from_path(&args.segments)?;
    let efforts = load_efforts(&args.efforts)?;
    let correlations = segment_feature_correlations(&ratings, &efforts)?;
    reports::print_correlations(&correlations);
    Ok(())
}
