use crate::error::{SegRankError, SrResult};
use crate::leaderboard::BoardSize;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub train: TrainParams,
    #[command(flatten)]
    pub board: BoardParams,
    #[command(flatten)]
    pub loader: LoaderParams,
}

/// Hyperparameters of the factorization model.
///
/// Defaults mirror an unregularized SGD fit: both regularization terms are
/// zero and the model runs a fixed number of passes over the pairs.
#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainParams {
    #[arg(long, default_value_t = 8)]
    pub num_factors: usize,
    #[arg(long, default_value_t = 100)]
    pub max_iterations: usize,
    #[arg(long, default_value_t = 0.01)]
    pub learning_rate: f64,
    #[arg(long, default_value_t = 0.0)]
    pub regularization: f64,
    #[arg(long, default_value_t = 0.0)]
    pub linear_regularization: f64,
    #[arg(long, default_value_t = 0.1)]
    pub init_scale: f64,
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

impl Default for TrainParams {
    fn default() -> Self {
        Self {
            num_factors: 8,
            max_iterations: 100,
            learning_rate: 0.01,
            regularization: 0.0,
            linear_regularization: 0.0,
            init_scale: 0.1,
            seed: 42,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardParams {
    /// Entries per leaderboard, or "all"
    #[arg(long, default_value = "20")]
    pub board_size: BoardSize,
}

impl Default for BoardParams {
    fn default() -> Self {
        Self {
            board_size: BoardSize::Top(20),
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderParams {
    #[arg(long, default_value_t = false)]
    pub drop_outliers: bool,
    #[arg(long, default_value_t = 3.0)]
    pub outlier_sigma: f64,
}

impl Default for LoaderParams {
    fn default() -> Self {
        Self {
            drop_outliers: false,
            outlier_sigma: 3.0,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SrResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SegRankError::Config(format!("Failed to read config {:?}: {}", path, e))
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Overwrites fields with values the user typed on the command line.
    /// Defaults filled in by clap never win over the file.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($section:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$section.$field = cli.$section.$field.clone();
                }
            };
        }

        update_if_present!(train.num_factors);
        update_if_present!(train.max_iterations);
        update_if_present!(train.learning_rate);
        update_if_present!(train.regularization);
        update_if_present!(train.linear_regularization);
        update_if_present!(train.init_scale);
        update_if_present!(train.seed);

        update_if_present!(board.board_size);

        update_if_present!(loader.drop_outliers);
        update_if_present!(loader.outlier_sigma);
    }
}

impl TrainParams {
    pub fn validate(&self) -> SrResult<()> {
        if self.num_factors == 0 {
            return Err(SegRankError::Config(
                "num_factors must be at least 1".to_string(),
            ));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(SegRankError::Config(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.regularization < 0.0 || self.linear_regularization < 0.0 {
            return Err(SegRankError::Config(
                "regularization terms cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}
