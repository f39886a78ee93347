//! Finds every board line whose digit multiset equals a submission's
//! operand multiset.

use crate::board::{Board, LineMatch};

/// Scans all rows, columns, diagonals, and blocks for lines whose values,
/// as an unordered multiset, equal `operands`.
///
/// A single submission may match several lines at once (e.g. a row and a
/// block that share the same four digits); all matches are returned and the
/// caller consumes them together. An empty result means no board line
/// supports the expression.
///
/// This is a full O(lines x size) scan per submission, which is fine at
/// the single-digit board sizes this game uses.
pub fn find_matches(board: &Board, operands: &[u8; 4]) -> Vec<LineMatch> {
    let mut want = operands.to_vec();
    want.sort_unstable();

    let mut matches = Vec::new();
    for line in board.lines() {
        let Ok(mut values) = board.read_line(line) else {
            continue;
        };
        values.sort_unstable();
        if values == want {
            let Ok(cells) = board.line_cells(line) else {
                continue;
            };
            matches.push(LineMatch { line, cells });
        }
    }
    matches
}

// =========================================================================
// Tests
// =========================================================================
