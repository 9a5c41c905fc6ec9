use super::load_clean_efforts;
use crate::reports;
use clap::Args;
use segrank_core::config::Config;
use segrank_core::efforts::aggregate_pairs;
use segrank_core::error::{SegRankError, SrResult};
use segrank_core::filters::{load_subsets, OrientationFilters};
use segrank_core::ratings::{write_ratings, RatingsTable};
use segrank_core::trainer::{evaluate, train_ratings};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::info;

pub const FILTERS_FILE: &str = "orientation_filters.json";

#[derive(Args, Debug, Clone)]
pub struct TrainArgs {
    #[command(flatten)]
    pub config: Config,

    /// Effort CSV or raw dump
    #[arg(short, long)]
    pub efforts: PathBuf,

    #[arg(short, long, default_value = "ratings")]
    pub out_dir: PathBuf,

    /// Train only on the efforts of this named subset
    #[arg(long, requires = "subsets")]
    pub subset: Option<String>,

    /// JSON map of subset name to effort filter
    #[arg(long)]
    pub subsets: Option<PathBuf>,
}

fn save_table(dir: &Path, file_name: String, table: &RatingsTable) -> SrResult<()> {
    let path = dir.join(file_name);
    write_ratings(File::create(&path)?, table)?;
    info!("💾 Wrote {} {} ratings to {:?}", table.len(), table.board_type(), path);
    Ok(())
}

pub fn run(args: TrainArgs, config: &Config) -> SrResult<()> {
    let efforts = load_clean_efforts(&args.efforts, &config.loader)?;

    let subsets = match &args.subsets {
        Some(path) => load_subsets(path)?,
        None => Default::default(),
    };
    let subset = match &args.subset {
        Some(name) => {
            let filter = subsets.get(name).ok_or_else(|| {
                SegRankError::Config(format!("Subset '{}' is not defined", name))
            })?;
            Some((name.as_str(), filter))
        }
        None => None,
    };

    let trained = train_ratings(&efforts, &config.train, subset)?;
    let fit_pairs = match subset {
        Some((_, filter)) => aggregate_pairs(&filter.apply(&efforts)),
        None => aggregate_pairs(&efforts),
    };
    let fit = evaluate(&trained.model, &fit_pairs)?;
    reports::print_evaluation("training set", &fit, None);

    fs::create_dir_all(&args.out_dir)?;
    let prefix = args.subset.as_ref().map(|s| format!("{}_", s)).unwrap_or_default();
    save_table(&args.out_dir, format!("{}athlete_ratings.csv", prefix), &trained.athletes)?;
    save_table(&args.out_dir, format!("{}segment_ratings.csv", prefix), &trained.segments)?;

    // Filters from earlier subset runs in the same directory are kept.
    let filters_path = args.out_dir.join(FILTERS_FILE);
    let mut filters = if filters_path.exists() {
        OrientationFilters::load_from_file(&filters_path)?
    } else {
        OrientationFilters::new()
    };
    filters.extend(trained.filters);
    filters.save_to_file(&filters_path)?;
    info!("🧭 {} orientation filters in {:?}", filters.len(), filters_path);

    Ok(())
}
