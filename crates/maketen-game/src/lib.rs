//! The synchronous game core for maketen.
//!
//! Everything in this crate is pure, in-memory computation - no I/O, no
//! locks, no async. The room layer calls into it while holding a room's
//! serialized execution scope, so these types never need their own
//! synchronization.
//!
//! # Key pieces
//!
//! - [`expr`] - fixed-shape arithmetic expression evaluation
//! - [`Board`] - the shared NxN grid with a versioned mutation history
//! - [`find_matches`] - which board lines a submission consumes
//! - [`conflict`] - cell-granularity optimistic concurrency check

pub mod board;
pub mod conflict;
pub mod expr;
mod matcher;

pub use board::{Board, BoardError, CellPos, LineMatch, LineRef, MutationRecord};
pub use conflict::ConflictError;
pub use expr::{ExprError, Notation, ResultClass};
pub use matcher::find_matches;
