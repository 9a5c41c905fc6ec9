use segrank_core::error::SrResult;
use segrank_core::leaderboard::{Leaderboard, LeaderboardSet};
use segrank_core::store::{load_bundle, BUNDLE_FILE};
use std::path::PathBuf;
use tracing::{info, warn};

/// Read-only after startup; handlers share it through an `Arc`.
pub struct AppState {
    pub data_dir: PathBuf,
    pub bundle: Vec<LeaderboardSet>,
}

impl AppState {
    pub fn new(data_dir: PathBuf, bundle: Vec<LeaderboardSet>) -> Self {
        Self { data_dir, bundle }
    }

    /// Loads `leaderboards.json` from `data_dir`. A missing bundle leaves the
    /// service running with only the per-artifact route available.
    pub fn load(data_dir: PathBuf) -> SrResult<Self> {
        let path = data_dir.join(BUNDLE_FILE);
        let bundle = if path.exists() {
            let sets = load_bundle(&path)?;
            info!("📦 Loaded {} leaderboard collections from {:?}", sets.len(), path);
            sets
        } else {
            warn!("⚠️  {:?} not found. Only CSV artifacts will be served.", path);
            Vec::new()
        };
        Ok(Self::new(data_dir, bundle))
    }

    pub fn first_board(&self) -> Option<&Leaderboard> {
        self.bundle.iter().flat_map(|set| set.iter()).next()
    }

    pub fn boards(&self) -> impl Iterator<Item = &Leaderboard> {
        self.bundle.iter().flat_map(|set| set.iter())
    }
}
