use serde::Serialize;
use serde_json::Value;

use crate::error::PipelineError;

pub const GRID_SIZE: usize = 32;
pub const MAX_COLOR_INDEX: u8 = 5;

// A 32x32 sprite of palette indices. Shape is guaranteed by every
// constructor; the value range is enforced at the validation boundary
// only, so downstream code still treats indices defensively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PixelGrid(Vec<Vec<u8>>);

impl PixelGrid {
    // Shape-only constructor for grids built in-process. Untrusted input
    // goes through `validate` instead.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self, PipelineError> {
        if rows.len() != GRID_SIZE {
            return Err(PipelineError::MalformedGrid {
                observed: rows.len(),
            });
        }
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != GRID_SIZE {
                return Err(PipelineError::MalformedRow {
                    row,
                    observed: cells.len(),
                });
            }
        }
        Ok(Self(rows))
    }

    pub fn rows(&self) -> &[Vec<u8>] {
        &self.0
    }
}

// Structural validation of a decoded, untrusted value: exactly 32 rows of
// exactly 32 integers in 0..=MAX_COLOR_INDEX. All-or-nothing; no partial
// grid ever escapes this boundary.
pub fn validate(decoded: &Value) -> Result<PixelGrid, PipelineError> {
    let outer = decoded
        .as_array()
        .ok_or(PipelineError::MalformedGrid { observed: 0 })?;
    if outer.len() != GRID_SIZE {
        return Err(PipelineError::MalformedGrid {
            observed: outer.len(),
        });
    }

    let mut rows = Vec::with_capacity(GRID_SIZE);
    for (row_idx, row_value) in outer.iter().enumerate() {
        let row = row_value.as_array().ok_or(PipelineError::MalformedRow {
            row: row_idx,
            observed: 0,
        })?;
        if row.len() != GRID_SIZE {
            return Err(PipelineError::MalformedRow {
                row: row_idx,
                observed: row.len(),
            });
        }

        let mut cells = Vec::with_capacity(GRID_SIZE);
        for (col_idx, cell) in row.iter().enumerate() {
            let index = cell
                .as_u64()
                .filter(|&value| value <= MAX_COLOR_INDEX as u64)
                .ok_or_else(|| PipelineError::MalformedCell {
                    row: row_idx,
                    col: col_idx,
                    value: cell.to_string(),
                })?;
            cells.push(index as u8);
        }
        rows.push(cells);
    }

    Ok(PixelGrid(rows))
}
