mod tables;

pub use self::tables::{
    correlations as print_correlations, evaluation as print_evaluation,
    leaderboard as print_leaderboard,
};
