//! Cell-granularity optimistic concurrency check for stale submissions.
//!
//! A submission carries the board version the player was looking at. If the
//! board has moved on since, the move is only rejected when a later mutation
//! touched a cell the move depends on - two players acting on disjoint
//! regions of the same version lineage never force each other to retry.

use thiserror::Error;

use crate::board::{Board, CellPos, LineMatch};

/// Why a submission conflicts with the board's mutation history.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConflictError {
    /// The client claims a version newer than the board has - a protocol
    /// violation or a replay.
    #[error("submitted version {submitted} is ahead of the board (current {current})")]
    VersionAhead { submitted: u64, current: u64 },

    /// A mutation after the submitted version touched cells this move's
    /// matched lines depend on.
    #[error("{} matched cell(s) changed since version {submitted}", .cells.len())]
    StaleCells {
        submitted: u64,
        cells: Vec<CellPos>,
    },
}

/// Validates `submitted` against the board's change history for the given
/// matched lines.
///
/// - `submitted > current` is always a conflict.
/// - `submitted == current` never conflicts.
/// - Otherwise the union of cells touched by every mutation in
///   `(submitted, current]` is intersected with the matched cells; any
///   overlap is a conflict, an empty overlap means the stale view is still
///   compatible.
pub fn check(
    board: &Board,
    submitted: u64,
    matches: &[LineMatch],
) -> Result<(), ConflictError> {
    let current = board.version();
    if submitted > current {
        return Err(ConflictError::VersionAhead { submitted, current });
    }
    if submitted == current {
        return Ok(());
    }

    let changed = board.changed_cells_since(submitted);
    let mut overlap: Vec<CellPos> = matches
        .iter()
        .flat_map(|m| m.cells.iter())
        .filter(|cell| changed.contains(*cell))
        .copied()
        .collect();
    overlap.sort_unstable();
    overlap.dedup();

    if overlap.is_empty() {
        Ok(())
    } else {
        Err(ConflictError::StaleCells {
            submitted,
            cells: overlap,
        })
    }
}

// =========================================================================
// Tests
// =========================================================================
