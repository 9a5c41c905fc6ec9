use super::{Effort, RawEffort};
use crate::error::{SegRankError, SrResult};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// Reads a cleaned effort CSV. Rows that fail to deserialize or fail
/// [`Effort::has_valid_timing`] are skipped.
pub fn load_efforts_csv<R: Read>(reader: R) -> SrResult<Vec<Effort>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut efforts = Vec::new();
    let mut skipped = 0usize;

    for (row_idx, result) in rdr.deserialize::<Effort>().enumerate() {
        match result {
            Ok(effort) if effort.has_valid_timing() => efforts.push(effort),
            Ok(_) => skipped += 1,
            Err(e) => {
                debug!("[Row {}] CSV Parse Error: {}", row_idx + 1, e);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!("⚠️  Skipped {} invalid effort rows", skipped);
    }
    Ok(efforts)
}

/// Reads a raw dump with one Strava effort object per line.
///
/// The same effort can appear in several dumps, so the first record for
/// each (activity, segment) pair wins.
pub fn load_efforts_jsonl<R: BufRead>(reader: R) -> SrResult<Vec<Effort>> {
    let mut efforts = Vec::new();
    let mut seen: HashSet<(u64, u64)> = HashSet::new();
    let mut malformed = 0usize;
    let mut filtered = 0usize;
    let mut duplicates = 0usize;

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let raw: RawEffort = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                debug!("[Line {}] Malformed effort: {}", line_idx + 1, e);
                malformed += 1;
                continue;
            }
        };

        let Some(effort) = raw.into_effort() else {
            filtered += 1;
            continue;
        };

        if !seen.insert((effort.activity_id, effort.segment_id)) {
            duplicates += 1;
            continue;
        }
        efforts.push(effort);
    }

    info!(
        "Parsed {} efforts ({} malformed, {} without moving time, {} duplicates)",
        efforts.len(),
        malformed,
        filtered,
        duplicates
    );
    Ok(efforts)
}

/// Loads efforts from disk, choosing the parser by file extension:
/// `.json`/`.jsonl` are raw dumps, anything else is cleaned CSV.
pub fn load_efforts<P: AsRef<Path>>(path: P) -> SrResult<Vec<Effort>> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| SegRankError::Validation(format!("Could not open {:?}: {}", path, e)))?;

    let is_raw = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("json") | Some("jsonl")
    );

    info!("📂 Loading efforts from {:?}", path);
    let efforts = if is_raw {
        load_efforts_jsonl(BufReader::new(file))?
    } else {
        load_efforts_csv(file)?
    };

    if efforts.is_empty() {
        return Err(SegRankError::EmptyDataset(format!(
            "no usable efforts in {:?}",
            path
        )));
    }
    Ok(efforts)
}

pub fn write_efforts_csv<W: Write>(writer: W, efforts: &[Effort]) -> SrResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for effort in efforts {
        wtr.serialize(effort)?;
    }
    wtr.flush()?;
    Ok(())
}
