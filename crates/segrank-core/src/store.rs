//! On-disk leaderboard artifacts: one CSV per (board type, column), plus a
//! JSON bundle read by the display service.

use crate::efforts::Effort;
use crate::error::{SegRankError, SrResult};
use crate::leaderboard::{
    compute, BoardType, Leaderboard, LeaderboardEntry, LeaderboardRequest, LeaderboardSet,
};
use crate::ratings::RatingsTable;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub const BUNDLE_FILE: &str = "leaderboards.json";

pub fn artifact_path<P: AsRef<Path>>(dir: P, board_type: BoardType, column: &str) -> PathBuf {
    dir.as_ref()
        .join(format!("{}_{}_leaderboard.csv", board_type, column))
}

/// Header: `rank,{board}_id,{column},average_speed`. Missing speeds are
/// written as empty cells.
pub fn write_leaderboard<W: Write>(writer: W, board: &Leaderboard) -> SrResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "rank",
        board.board_type.id_column(),
        board.column.as_str(),
        "average_speed",
    ])?;
    for e in &board.entries {
        wtr.write_record([
            e.rank.to_string(),
            e.entity_id.to_string(),
            e.score.to_string(),
            e.average_speed.map(|s| s.to_string()).unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_leaderboard<R: Read>(reader: R) -> SrResult<Leaderboard> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.len() != 4 || &headers[0] != "rank" || &headers[3] != "average_speed" {
        return Err(SegRankError::Validation(format!(
            "Unexpected leaderboard header: {:?}",
            headers
        )));
    }
    let board_type = BoardType::from_id_column(&headers[1]).ok_or_else(|| {
        SegRankError::Validation(format!("Unknown id column '{}'", &headers[1]))
    })?;
    let column = headers[2].to_string();

    let bad = |what: &str, v: &str| SegRankError::Validation(format!("Invalid {} '{}'", what, v));

    let mut entries = Vec::new();
    for record in rdr.records() {
        let r = record?;
        let speed = match r[3].trim() {
            "" => None,
            s => Some(s.parse::<f64>().map_err(|_| bad("average_speed", s))?),
        };
        entries.push(LeaderboardEntry {
            rank: r[0].parse().map_err(|_| bad("rank", &r[0]))?,
            entity_id: r[1].parse().map_err(|_| bad("id", &r[1]))?,
            score: r[2].parse().map_err(|_| bad("score", &r[2]))?,
            average_speed: speed,
        });
    }

    Ok(Leaderboard {
        board_type,
        column,
        entries,
    })
}

pub fn load_leaderboard<P: AsRef<Path>>(path: P) -> SrResult<Leaderboard> {
    read_leaderboard(File::open(path)?)
}

/// Writes every board of `set` under `dir` and returns the written paths.
pub fn store_set<P: AsRef<Path>>(dir: P, set: &LeaderboardSet) -> SrResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(set.len());
    for board in set.iter() {
        let path = artifact_path(dir, board.board_type, &board.column);
        write_leaderboard(File::create(&path)?, board)?;
        written.push(path);
    }
    info!("💾 Stored {} leaderboards in {:?}", written.len(), dir);
    Ok(written)
}

/// Computes the leaderboards for `ratings` and persists them.
pub fn store<P: AsRef<Path>>(
    dir: P,
    request: &LeaderboardRequest,
    ratings: &RatingsTable,
    efforts: &[Effort],
) -> SrResult<LeaderboardSet> {
    let set = compute(request, ratings, efforts)?;
    store_set(dir, &set)?;
    Ok(set)
}

pub fn write_bundle<P: AsRef<Path>>(path: P, sets: &[LeaderboardSet]) -> SrResult<()> {
    fs::write(path, serde_json::to_string_pretty(sets)?)?;
    Ok(())
}

pub fn load_bundle<P: AsRef<Path>>(path: P) -> SrResult<Vec<LeaderboardSet>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
