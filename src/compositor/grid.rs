//! Text grids

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors reading a grid file
#[derive(Debug, Error)]
pub enum GridError {
    #[error("failed to read grid '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub row: usize,
    pub column: usize,
    pub symbol: char,
}

impl Cell {
    /// Space cells hold no tile
    pub fn is_blank(&self) -> bool {
        self.symbol == ' '
    }
}

/// Rows of symbols, possibly ragged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<char>>,
}

impl Grid {
    /// Split text into rows; `\n` and `\r\n` both end a row
    pub fn parse(text: &str) -> Self {
        Self {
            rows: text.lines().map(|line| line.chars().collect()).collect(),
        }
    }

    /// Read and parse a grid file
    pub fn from_file(path: &Path) -> Result<Self, GridError> {
        let text = fs::read_to_string(path).map_err(|e| GridError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::parse(&text))
    }

    pub fn rows(&self) -> &[Vec<char>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Length in symbols of the longest row, blank rows included
    pub fn max_row_length(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cells in row-major order, top to bottom and left to right
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, symbols)| {
            symbols.iter().enumerate().map(move |(column, &symbol)| Cell {
                row,
                column,
                symbol,
            })
        })
    }
}
