use super::load_clean_efforts;
use crate::reports;
use clap::Args;
use segrank_core::config::Config;
use segrank_core::efforts::Effort;
use segrank_core::error::{SegRankError, SrResult};
use segrank_core::filters::OrientationFilters;
use segrank_core::leaderboard::{compute, LeaderboardRequest, LeaderboardSet};
use segrank_core::ratings::load_ratings_from_path;
use segrank_core::store::{store_set, write_bundle, BUNDLE_FILE};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct RankArgs {
    #[command(flatten)]
    pub config: Config,

    /// Effort CSV or raw dump used to orient each feature
    #[arg(short, long)]
    pub efforts: PathBuf,

    /// Athlete ratings CSV
    #[arg(long)]
    pub athletes: Option<PathBuf>,

    /// Segment ratings CSV
    #[arg(long)]
    pub segments: Option<PathBuf>,

    /// Orientation filters written by `train`
    #[arg(long)]
    pub filters: Option<PathBuf>,

    #[arg(short, long, default_value = "leaderboards")]
    pub out_dir: PathBuf,

    /// Print only this feature's leaderboards
    #[arg(long)]
    pub column: Option<String>,
}

fn rank_table(
    path: Option<&Path>,
    efforts: &[Effort],
    filters: &OrientationFilters,
    config: &Config,
) -> SrResult<Option<LeaderboardSet>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let ratings = load_ratings_from_path(path)?;
    info!(
        "📊 {} ratings: {} entities x {} features from {:?}",
        ratings.board_type(),
        ratings.len(),
        ratings.columns().len(),
        path
    );

    let request = LeaderboardRequest::builder()
        .board_type(ratings.board_type())
        .board_size(config.board.board_size)
        .filters(filters.clone())
        .build();
    compute(&request, &ratings, efforts).map(Some)
}

pub fn run(args: RankArgs, config: &Config) -> SrResult<()> {
    if args.athletes.is_none() && args.segments.is_none() {
        return Err(SegRankError::Config(
            "Pass --athletes and/or --segments".to_string(),
        ));
    }

    let efforts = load_clean_efforts(&args.efforts, &config.loader)?;
    let filters = match &args.filters {
        Some(path) => OrientationFilters::load_from_file(path)?,
        None => OrientationFilters::new(),
    };

    let (athletes, segments) = rayon::join(
        || rank_table(args.athletes.as_deref(), &efforts, &filters, config),
        || rank_table(args.segments.as_deref(), &efforts, &filters, config),
    );
    let sets: Vec<LeaderboardSet> = [athletes?, segments?].into_iter().flatten().collect();

    if let Some(column) = &args.column {
        if !sets.iter().any(|set| set.get(column).is_some()) {
            return Err(SegRankError::UnknownFeature {
                column: column.clone(),
            });
        }
    }

    for set in &sets {
        store_set(&args.out_dir, set)?;
        for board in set.iter() {
            if args.column.as_deref().is_some_and(|c| c != board.column) {
                continue;
            }
            if board.is_empty() {
                warn!("⚠️  {} board '{}' has no rated entities", board.board_type, board.column);
                continue;
            }
            reports::print_leaderboard(board);
        }
    }

    let bundle = args.out_dir.join(BUNDLE_FILE);
    write_bundle(&bundle, &sets)?;
    info!("📦 Bundle written to {:?}", bundle);
    Ok(())
}
