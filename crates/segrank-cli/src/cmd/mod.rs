pub mod clean;
pub mod correlate;
pub mod evaluate;
pub mod rank;
pub mod train;

use segrank_core::config::LoaderParams;
use segrank_core::efforts::{load_efforts, remove_outliers, Effort};
use segrank_core::error::SrResult;
use std::path::Path;

/// Loads efforts and applies the configured outlier filter.
pub fn load_clean_efforts(path: &Path, loader: &LoaderParams) -> SrResult<Vec<Effort>> {
    let efforts = load_efforts(path)?;
    if loader.drop_outliers {
        Ok(remove_outliers(efforts, loader.outlier_sigma))
    } else {
        Ok(efforts)
    }
}
