use super::orientation::detect_orientation;
use super::ranking::rank_column;
use super::scaling::scale_column;
use super::{Leaderboard, LeaderboardRequest, LeaderboardSet};
use crate::efforts::{mean_speed_by, Effort};
use crate::error::{SegRankError, SrResult};
use crate::filters::EffortFilter;
use crate::ratings::RatingsTable;
use std::collections::BTreeMap;
use tracing::{debug, info};

fn check_board_type(request: &LeaderboardRequest, ratings: &RatingsTable) -> SrResult<()> {
    if request.board_type != ratings.board_type() {
        return Err(SegRankError::Validation(format!(
            "Requested a {} board from a {} ratings table",
            request.board_type,
            ratings.board_type()
        )));
    }
    Ok(())
}

/// Orients and rescales one column. Returns scores aligned with
/// `ratings.ids()`.
fn scale_one(
    request: &LeaderboardRequest,
    ratings: &RatingsTable,
    column: &str,
    values: &[Option<f64>],
    efforts: &[Effort],
) -> Vec<Option<f64>> {
    let filter = request.filters.get(column);
    let subset_speeds = mean_speed_by(efforts, request.board_type, filter);

    let orientation = detect_orientation(column, ratings.ids(), values, &subset_speeds);
    let multiplier = request.board_type.direction() * orientation.sign();

    debug!(
        "Column '{}': filter={:?}, {} entities with speeds, {:?} -> multiplier {}",
        column,
        filter,
        subset_speeds.len(),
        orientation,
        multiplier
    );

    scale_column(values, multiplier)
}

/// Scaled copy of `ratings`: every column oriented and mapped into
/// `[0, 100]`, so the best entity under the board's sense scores highest.
pub fn scale_ratings(
    request: &LeaderboardRequest,
    ratings: &RatingsTable,
    efforts: &[Effort],
) -> SrResult<RatingsTable> {
    check_board_type(request, ratings)?;
    Ok(ratings.map_columns(|name, values| scale_one(request, ratings, name, values, efforts)))
}

fn build_board(
    request: &LeaderboardRequest,
    ratings: &RatingsTable,
    column: &str,
    efforts: &[Effort],
    speeds: &BTreeMap<u64, f64>,
) -> SrResult<Leaderboard> {
    let values = ratings
        .column(column)
        .ok_or_else(|| SegRankError::UnknownFeature {
            column: column.to_string(),
        })?;

    let scores = scale_one(request, ratings, column, values, efforts);
    let entries = rank_column(ratings.ids(), &scores, request.board_size, speeds);

    Ok(Leaderboard {
        board_type: request.board_type,
        column: column.to_string(),
        entries,
    })
}

/// Leaderboard for a single feature column.
pub fn compute_column(
    request: &LeaderboardRequest,
    ratings: &RatingsTable,
    column: &str,
    efforts: &[Effort],
) -> SrResult<Leaderboard> {
    check_board_type(request, ratings)?;
    let speeds = mean_speed_by(efforts, request.board_type, &EffortFilter::All);
    build_board(request, ratings, column, efforts, &speeds)
}

/// One leaderboard per feature column of `ratings`, in column order.
pub fn compute(
    request: &LeaderboardRequest,
    ratings: &RatingsTable,
    efforts: &[Effort],
) -> SrResult<LeaderboardSet> {
    check_board_type(request, ratings)?;

    let speeds = mean_speed_by(efforts, request.board_type, &EffortFilter::All);
    let boards = ratings
        .columns()
        .iter()
        .map(|column| build_board(request, ratings, column, efforts, &speeds))
        .collect::<SrResult<Vec<_>>>()?;

    info!(
        "🏁 Built {} {} leaderboards (size {}) over {} rated entities",
        boards.len(),
        request.board_type,
        request.board_size,
        ratings.len()
    );

    Ok(LeaderboardSet {
        board_type: request.board_type,
        boards,
    })
}
