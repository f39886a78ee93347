//! The shared game board: an NxN grid of digits with a versioned,
//! conflict-detectable mutation history.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use maketen_protocol::BoardData;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Board edge length in the reference game.
pub const DEFAULT_SIZE: usize = 4;

/// A cell coordinate as (row, col).
pub type CellPos = (usize, usize);

/// Errors from board operations.
///
/// Internal callers validate coordinates before calling in, so an
/// `OutOfBounds` here means a bug upstream - it is surfaced as an error
/// rather than a silent no-op so tests catch it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("cell ({0}, {1}) is outside a {2}x{2} board")]
    OutOfBounds(usize, usize, usize),

    #[error("line {0} does not exist on a {1}x{1} board")]
    NoSuchLine(LineRef, usize),
}

// ---------------------------------------------------------------------------
// Lines
// ---------------------------------------------------------------------------

/// Identifies one readable line of the board: a row, a column, either
/// diagonal, or one of the four quadrant blocks.
///
/// Blocks are indexed 0..4 as top-left, top-right, bottom-left,
/// bottom-right; each covers a (size/2) x (size/2) quadrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineRef {
    Row(usize),
    Col(usize),
    MainDiagonal,
    AntiDiagonal,
    Block(usize),
}

impl fmt::Display for LineRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row(i) => write!(f, "row {i}"),
            Self::Col(i) => write!(f, "col {i}"),
            Self::MainDiagonal => write!(f, "main diagonal"),
            Self::AntiDiagonal => write!(f, "anti diagonal"),
            Self::Block(i) => write!(f, "block {i}"),
        }
    }
}

/// A line whose digit multiset equals a submission's operand multiset,
/// together with the coordinates composing it. Derived per submission;
/// persisted only inside the change history of the mutation it caused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineMatch {
    pub line: LineRef,
    pub cells: Vec<CellPos>,
}

/// One recorded mutation: the match that caused it and the exact cells it
/// touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationRecord {
    pub line: LineRef,
    pub cells: Vec<CellPos>,
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// The shared NxN digit grid.
///
/// `version` increments exactly once per successful [`mutate`](Self::mutate);
/// `history` keeps, per version, which cells that mutation touched. The pair
/// is what allows stale submissions to be checked at cell granularity
/// instead of rejecting on any version mismatch.
#[derive(Debug, Clone)]
pub struct Board {
    size: usize,
    cells: Vec<Vec<u8>>,
    version: u64,
    history: HashMap<u64, Vec<MutationRecord>>,
}

impl Board {
    /// Generates a fresh board with every cell uniform-random in [1,9].
    /// Version starts at 1 with an empty change history.
    pub fn generate<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let cells = (0..size)
            .map(|_| (0..size).map(|_| rng.random_range(1..=9)).collect())
            .collect();
        Self {
            size,
            cells,
            version: 1,
            history: HashMap::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Value of a single cell.
    pub fn cell(&self, row: usize, col: usize) -> Result<u8, BoardError> {
        if row >= self.size || col >= self.size {
            return Err(BoardError::OutOfBounds(row, col, self.size));
        }
        Ok(self.cells[row][col])
    }

    /// Every line this board has: all rows, all columns, both diagonals,
    /// and the four quadrant blocks.
    pub fn lines(&self) -> Vec<LineRef> {
        let mut lines = Vec::with_capacity(2 * self.size + 6);
        for i in 0..self.size {
            lines.push(LineRef::Row(i));
        }
        for i in 0..self.size {
            lines.push(LineRef::Col(i));
        }
        lines.push(LineRef::MainDiagonal);
        lines.push(LineRef::AntiDiagonal);
        if self.size % 2 == 0 {
            for i in 0..4 {
                lines.push(LineRef::Block(i));
            }
        }
        lines
    }

    /// The coordinates composing a line, in reading order.
    pub fn line_cells(&self, line: LineRef) -> Result<Vec<CellPos>, BoardError> {
        match line {
            LineRef::Row(r) if r < self.size => {
                Ok((0..self.size).map(|c| (r, c)).collect())
            }
            LineRef::Col(c) if c < self.size => {
                Ok((0..self.size).map(|r| (r, c)).collect())
            }
            LineRef::MainDiagonal => Ok((0..self.size).map(|i| (i, i)).collect()),
            LineRef::AntiDiagonal => {
                Ok((0..self.size).map(|i| (i, self.size - 1 - i)).collect())
            }
            LineRef::Block(b) if b < 4 && self.size % 2 == 0 => {
                let half = self.size / 2;
                let base_row = (b / 2) * half;
                let base_col = (b % 2) * half;
                let mut cells = Vec::with_capacity(half * half);
                for r in 0..half {
                    for c in 0..half {
                        cells.push((base_row + r, base_col + c));
                    }
                }
                Ok(cells)
            }
            other => Err(BoardError::NoSuchLine(other, self.size)),
        }
    }

    /// The values along a line, as a copy - never a live reference.
    pub fn read_line(&self, line: LineRef) -> Result<Vec<u8>, BoardError> {
        let cells = self.line_cells(line)?;
        Ok(cells.iter().map(|&(r, c)| self.cells[r][c]).collect())
    }

    /// Regenerates every cell touched by the given matches with fresh
    /// uniform-random [1,9] values.
    ///
    /// Coordinates are deduplicated first; the version increments exactly
    /// once no matter how many lines or cells were touched, and the full
    /// set of match descriptors is recorded under the new version.
    pub fn mutate<R: Rng + ?Sized>(
        &mut self,
        matches: &[LineMatch],
        rng: &mut R,
    ) -> Result<(), BoardError> {
        // Bounds-check everything before touching anything, so a bad
        // coordinate can never leave a half-applied mutation.
        let mut touched: BTreeSet<CellPos> = BTreeSet::new();
        for m in matches {
            for &(row, col) in &m.cells {
                if row >= self.size || col >= self.size {
                    return Err(BoardError::OutOfBounds(row, col, self.size));
                }
                touched.insert((row, col));
            }
        }

        for &(row, col) in &touched {
            self.cells[row][col] = rng.random_range(1..=9);
        }

        self.version += 1;
        self.history.insert(
            self.version,
            matches
                .iter()
                .map(|m| MutationRecord {
                    line: m.line,
                    cells: m.cells.clone(),
                })
                .collect(),
        );
        Ok(())
    }

    /// Union of all cells touched by mutations after `version`, up to and
    /// including the current version.
    pub fn changed_cells_since(&self, version: u64) -> HashSet<CellPos> {
        let mut changed = HashSet::new();
        let mut v = version + 1;
        while v <= self.version {
            if let Some(records) = self.history.get(&v) {
                for record in records {
                    changed.extend(record.cells.iter().copied());
                }
            }
            v += 1;
        }
        changed
    }

    /// The recorded mutations that produced `version`, if any. Version 1
    /// is the initial state and has no entry.
    pub fn history_at(&self, version: u64) -> Option<&[MutationRecord]> {
        self.history.get(&version).map(Vec::as_slice)
    }

    /// A deep, serializable point-in-time copy.
    ///
    /// This is the only sanctioned way board state crosses the room
    /// boundary; callers never see the live grid.
    pub fn snapshot(&self) -> BoardData {
        let mut content = Vec::with_capacity(self.size * self.size);
        for row in &self.cells {
            content.extend_from_slice(row);
        }
        BoardData {
            content,
            version: self.version,
            size: self.size,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
