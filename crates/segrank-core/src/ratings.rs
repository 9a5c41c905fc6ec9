//! Entity-indexed tables of latent feature values.

use crate::error::{SegRankError, SrResult};
use crate::leaderboard::BoardType;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

/// One row per athlete or segment, one column per latent feature.
///
/// Stored column-major since every consumer walks a single feature at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingsTable {
    board_type: BoardType,
    ids: Vec<u64>,
    index: HashMap<u64, usize>,
    columns: Vec<String>,
    values: Vec<Vec<Option<f64>>>,
}

impl RatingsTable {
    pub fn new(board_type: BoardType, columns: Vec<String>) -> SrResult<Self> {
        let mut seen = HashSet::new();
        for c in &columns {
            if !seen.insert(c.as_str()) {
                return Err(SegRankError::Validation(format!(
                    "Duplicate ratings column '{}'",
                    c
                )));
            }
        }
        let values = vec![Vec::new(); columns.len()];
        Ok(Self {
            board_type,
            ids: Vec::new(),
            index: HashMap::new(),
            columns,
            values,
        })
    }

    /// Columns named `rating_1..rating_k`.
    pub fn with_factors(board_type: BoardType, k: usize) -> Self {
        let columns = (1..=k).map(|i| format!("rating_{}", i)).collect();
        Self {
            board_type,
            ids: Vec::new(),
            index: HashMap::new(),
            columns,
            values: vec![Vec::new(); k],
        }
    }

    pub fn push_row(&mut self, id: u64, row: Vec<Option<f64>>) -> SrResult<()> {
        if row.len() != self.columns.len() {
            return Err(SegRankError::Validation(format!(
                "Row for {} has {} values, table has {} columns",
                id,
                row.len(),
                self.columns.len()
            )));
        }
        if self.index.contains_key(&id) {
            return Err(SegRankError::Validation(format!(
                "Duplicate {} {}",
                self.board_type.id_column(),
                id
            )));
        }
        self.index.insert(id, self.ids.len());
        self.ids.push(id);
        for (col, v) in self.values.iter_mut().zip(row) {
            col.push(v.filter(|x| x.is_finite()));
        }
        Ok(())
    }

    pub fn board_type(&self) -> BoardType {
        self.board_type
    }

    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.column_index(name).map(|i| self.values[i].as_slice())
    }

    pub fn get(&self, id: u64, column: &str) -> Option<f64> {
        let row = *self.index.get(&id)?;
        self.column(column).and_then(|c| c[row])
    }

    /// Builds a new table with the same ids and columns, each column
    /// replaced by `f(name, values)`. `self` is left untouched.
    pub fn map_columns<F>(&self, mut f: F) -> RatingsTable
    where
        F: FnMut(&str, &[Option<f64>]) -> Vec<Option<f64>>,
    {
        let values = self
            .columns
            .iter()
            .zip(&self.values)
            .map(|(name, col)| {
                let mapped = f(name, col);
                debug_assert_eq!(mapped.len(), col.len());
                mapped
            })
            .collect();
        RatingsTable {
            board_type: self.board_type,
            ids: self.ids.clone(),
            index: self.index.clone(),
            columns: self.columns.clone(),
            values,
        }
    }

    /// Renames every column to `{prefix}_{column}`.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        for c in self.columns.iter_mut() {
            *c = format!("{}_{}", prefix, c);
        }
        self
    }
}

fn parse_cell(s: &str) -> SrResult<Option<f64>> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    let v = f64::from_str(s)
        .map_err(|_| SegRankError::Validation(format!("Invalid rating value '{}'", s)))?;
    Ok(Some(v).filter(|x| x.is_finite()))
}

/// Reads a ratings CSV. The first header names the id column and decides
/// the board type; every other header is a feature column.
pub fn load_ratings<R: Read>(reader: R) -> SrResult<RatingsTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let id_header = headers
        .get(0)
        .ok_or_else(|| SegRankError::Validation("Ratings file has no header".to_string()))?;
    let board_type = BoardType::from_id_column(id_header).ok_or_else(|| {
        SegRankError::Validation(format!(
            "First ratings column must be athlete_id or segment_id, got '{}'",
            id_header
        ))
    })?;

    let columns: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();
    let mut table = RatingsTable::new(board_type, columns)?;

    for record in rdr.records() {
        let record = record?;
        let id: u64 = record[0].parse().map_err(|_| {
            SegRankError::Validation(format!("Invalid {} '{}'", id_header, &record[0]))
        })?;
        let row = record
            .iter()
            .skip(1)
            .map(parse_cell)
            .collect::<SrResult<Vec<_>>>()?;
        table.push_row(id, row)?;
    }
    Ok(table)
}

pub fn load_ratings_from_path<P: AsRef<Path>>(path: P) -> SrResult<RatingsTable> {
    let file = File::open(path.as_ref()).map_err(|e| {
        SegRankError::Validation(format!("Could not open {:?}: {}", path.as_ref(), e))
    })?;
    load_ratings(file)
}

pub fn write_ratings<W: Write>(writer: W, table: &RatingsTable) -> SrResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec![table.board_type.id_column().to_string()];
    header.extend(table.columns.iter().cloned());
    wtr.write_record(&header)?;

    for (row, id) in table.ids.iter().enumerate() {
        let mut record = vec![id.to_string()];
        record.extend(
            table
                .values
                .iter()
                .map(|col| col[row].map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}
