//! Integration tests for the room system.
//!
//! Every test runs with `start_paused` so the Tokio clock is virtual:
//! countdowns, game timers, and grace periods elapse deterministically when
//! the test sleeps past their deadlines. Boards are seeded through
//! `RoomConfig::rng_seed`, so each test's whole evolution is reproducible.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use maketen_game::expr;
use maketen_protocol::{BoardData, PlayerId, RoomId};
use maketen_room::{
    NotificationSink, RoomConfig, RoomError, RoomEvent, RoomHandle, RoomRegistry,
    RoomState,
};
use tokio::time;

// =========================================================================
// Helpers
// =========================================================================

fn pid(id: u64) -> PlayerId {
    PlayerId(id)
}

/// In-memory notification sink capturing every event for assertions.
#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<(RoomId, RoomEvent)>>,
}

impl RecordingSink {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn events(&self) -> Vec<(RoomId, RoomEvent)> {
        self.events.lock().unwrap().clone()
    }

    fn contains(&self, pred: impl Fn(&RoomEvent) -> bool) -> bool {
        self.events().iter().any(|(_, e)| pred(e))
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, room: RoomId, event: RoomEvent) {
        self.events.lock().unwrap().push((room, event));
    }
}

fn test_config() -> RoomConfig {
    RoomConfig {
        rng_seed: Some(42),
        ..RoomConfig::default()
    }
}

fn registry(sink: Arc<RecordingSink>) -> RoomRegistry {
    RoomRegistry::new(test_config(), sink)
}

/// Creates a room with two joined players and returns its handle.
async fn room_with_two_players(reg: &mut RoomRegistry) -> RoomHandle {
    let room_id = reg.create_room("test room");
    let handle = reg.room(room_id).unwrap();
    handle.join(pid(1), "alice").await.unwrap();
    handle.join(pid(2), "bob").await.unwrap();
    handle
}

/// Readies both players and starts the game, then sleeps through the
/// countdown so the room is GameInProgress with a fresh board.
async fn start_game(handle: &RoomHandle) {
    handle.set_ready(pid(1), true).await.unwrap();
    handle.set_ready(pid(2), true).await.unwrap();
    handle.start(pid(1)).await.unwrap();
    time::sleep(Duration::from_secs(4)).await;
}

// -- expression search ---------------------------------------------------

const OPS: [char; 4] = ['+', '-', '*', '/'];

fn permutations(digits: [u8; 4]) -> Vec<[u8; 4]> {
    let mut out = Vec::with_capacity(24);
    for a in 0..4 {
        for b in 0..4 {
            if b == a {
                continue;
            }
            for c in 0..4 {
                if c == a || c == b {
                    continue;
                }
                let d = 6 - a - b - c;
                out.push([digits[a], digits[b], digits[c], digits[d]]);
            }
        }
    }
    out
}

/// All five postfix arrangements of one digit ordering and operator triple.
fn arrangements(digits: [u8; 4], ops: [char; 3]) -> [String; 5] {
    let d: Vec<char> = digits.iter().map(|x| (b'0' + x) as char).collect();
    let (o1, o2, o3) = (ops[0], ops[1], ops[2]);
    [
        format!("{}{}{}{}{o1}{o2}{o3}", d[0], d[1], d[2], d[3]),
        format!("{}{}{}{o1}{}{o2}{o3}", d[0], d[1], d[2], d[3]),
        format!("{}{}{}{o1}{o2}{}{o3}", d[0], d[1], d[2], d[3]),
        format!("{}{}{o1}{}{}{o2}{o3}", d[0], d[1], d[2], d[3]),
        format!("{}{}{o1}{}{o2}{}{o3}", d[0], d[1], d[2], d[3]),
    ]
}

/// Brute-forces a postfix expression over `digits` whose value satisfies
/// `pred`.
fn find_expression(digits: [u8; 4], pred: impl Fn(f64) -> bool) -> Option<String> {
    for perm in permutations(digits) {
        for o1 in OPS {
            for o2 in OPS {
                for o3 in OPS {
                    for candidate in arrangements(perm, [o1, o2, o3]) {
                        if let Ok(value) = expr::evaluate_postfix(&candidate) {
                            if pred(value) {
                                return Some(candidate);
                            }
                        }
                    }
                }
            }
        }
    }
    None
}

fn solve_ten(digits: [u8; 4]) -> Option<String> {
    find_expression(digits, expr::is_target)
}

// -- board geometry ------------------------------------------------------

/// The cell lists of every line on a 4x4 board, in the same layout the
/// board exposes: rows, cols, diagonals, quadrant blocks.
fn line_sets() -> Vec<Vec<(usize, usize)>> {
    let mut lines = Vec::new();
    for r in 0..4 {
        lines.push((0..4).map(|c| (r, c)).collect());
    }
    for c in 0..4 {
        lines.push((0..4).map(|r| (r, c)).collect());
    }
    lines.push((0..4).map(|i| (i, i)).collect());
    lines.push((0..4).map(|i| (i, 3 - i)).collect());
    for b in 0..4 {
        let (br, bc) = ((b / 2) * 2, (b % 2) * 2);
        lines.push(vec![(br, bc), (br, bc + 1), (br + 1, bc), (br + 1, bc + 1)]);
    }
    lines
}

fn digits_at(board: &BoardData, cells: &[(usize, usize)]) -> [u8; 4] {
    let values: Vec<u8> = cells
        .iter()
        .map(|&(r, c)| board.cell(r, c).unwrap())
        .collect();
    [values[0], values[1], values[2], values[3]]
}

fn sorted(mut digits: [u8; 4]) -> [u8; 4] {
    digits.sort_unstable();
    digits
}

/// Every cell belonging to a line whose multiset equals `operands` - i.e.
/// the union the orchestrator will regenerate for that submission.
fn matched_union(board: &BoardData, operands: [u8; 4]) -> HashSet<(usize, usize)> {
    let want = sorted(operands);
    let mut union = HashSet::new();
    for cells in line_sets() {
        if sorted(digits_at(board, &cells)) == want {
            union.extend(cells);
        }
    }
    union
}

/// Number of lines whose multiset equals `operands`.
fn matched_line_count(board: &BoardData, operands: [u8; 4]) -> u32 {
    let want = sorted(operands);
    line_sets()
        .iter()
        .filter(|cells| sorted(digits_at(board, cells)) == want)
        .count() as u32
}

/// Finds a line that can score: its digits admit a 10-producing postfix
/// expression. Returns (line cells, expression).
fn scoring_move(board: &BoardData) -> Option<(Vec<(usize, usize)>, String)> {
    for cells in line_sets() {
        let digits = digits_at(board, &cells);
        if let Some(expression) = solve_ten(digits) {
            return Some((cells, expression));
        }
    }
    None
}

// =========================================================================
// Roster and readiness
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_create_room_returns_unique_ids() {
    let mut reg = registry(RecordingSink::new());
    let r1 = reg.create_room("one");
    let r2 = reg.create_room("two");
    assert_ne!(r1, r2);
    assert_eq!(reg.room_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_room_is_not_found() {
    let reg = registry(RecordingSink::new());
    assert!(matches!(
        reg.room(RoomId(9999)),
        Err(RoomError::NotFound(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_join_adds_player_and_snapshot_reflects_it() {
    let mut reg = registry(RecordingSink::new());
    let room_id = reg.create_room("r");
    let handle = reg.room(room_id).unwrap();

    let snap = handle.join(pid(1), "alice").await.unwrap();
    assert_eq!(snap.state, RoomState::WaitingForPlayers);
    assert_eq!(snap.players.len(), 1);
    assert_eq!(snap.players[0].name, "alice");
    assert!(snap.players[0].is_connected);
    assert!(!snap.players[0].is_ready);
    assert_eq!(snap.board_version, 1);
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_join_rejected() {
    let mut reg = registry(RecordingSink::new());
    let room_id = reg.create_room("r");
    let handle = reg.room(room_id).unwrap();
    handle.join(pid(1), "alice").await.unwrap();

    let result = handle.join(pid(1), "alice again").await;
    assert!(matches!(result, Err(RoomError::AlreadyJoined(p, _)) if p == pid(1)));
}

#[tokio::test(start_paused = true)]
async fn test_all_ready_transitions_and_reverts() {
    let sink = RecordingSink::new();
    let mut reg = registry(Arc::clone(&sink));
    let handle = room_with_two_players(&mut reg).await;

    handle.set_ready(pid(1), true).await.unwrap();
    let snap = handle.set_ready(pid(2), true).await.unwrap();
    assert_eq!(snap.state, RoomState::AllReady);
    assert!(sink.contains(|e| matches!(e, RoomEvent::AllReady)));

    // Un-readying drops the room back to waiting.
    let snap = handle.set_ready(pid(2), false).await.unwrap();
    assert_eq!(snap.state, RoomState::WaitingForPlayers);
}

#[tokio::test(start_paused = true)]
async fn test_ready_requires_membership() {
    let mut reg = registry(RecordingSink::new());
    let handle = room_with_two_players(&mut reg).await;
    let result = handle.set_ready(pid(99), true).await;
    assert!(matches!(result, Err(RoomError::PlayerNotFound(p, _)) if p == pid(99)));
}

#[tokio::test(start_paused = true)]
async fn test_join_while_all_ready_reverts_to_waiting() {
    let mut reg = registry(RecordingSink::new());
    let handle = room_with_two_players(&mut reg).await;
    handle.set_ready(pid(1), true).await.unwrap();
    handle.set_ready(pid(2), true).await.unwrap();

    // The room is still open in AllReady; a third, un-ready player joining
    // reverts the aggregate.
    let snap = handle.join(pid(3), "carol").await.unwrap();
    assert_eq!(snap.state, RoomState::WaitingForPlayers);
    assert_eq!(snap.players.len(), 3);
}

// =========================================================================
// Starting a game
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_start_requires_first_player() {
    let mut reg = registry(RecordingSink::new());
    let handle = room_with_two_players(&mut reg).await;
    handle.set_ready(pid(1), true).await.unwrap();
    handle.set_ready(pid(2), true).await.unwrap();

    let result = handle.start(pid(2)).await;
    assert!(matches!(result, Err(RoomError::NotFirstPlayer(p)) if p == pid(2)));
}

#[tokio::test(start_paused = true)]
async fn test_start_requires_all_ready_state() {
    let mut reg = registry(RecordingSink::new());
    let handle = room_with_two_players(&mut reg).await;

    let result = handle.start(pid(1)).await;
    assert!(matches!(
        result,
        Err(RoomError::WrongState {
            expected: RoomState::AllReady,
            actual: RoomState::WaitingForPlayers,
        })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_countdown_then_game_in_progress() {
    let sink = RecordingSink::new();
    let mut reg = registry(Arc::clone(&sink));
    let handle = room_with_two_players(&mut reg).await;
    handle.set_ready(pid(1), true).await.unwrap();
    handle.set_ready(pid(2), true).await.unwrap();

    let snap = handle.start(pid(1)).await.unwrap();
    assert_eq!(snap.state, RoomState::Countdown);
    assert!(!snap.is_opened);

    // Mid-countdown the game has not begun.
    time::sleep(Duration::from_millis(1500)).await;
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.state, RoomState::Countdown);

    time::sleep(Duration::from_secs(2)).await;
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.state, RoomState::GameInProgress);
    assert!(sink.contains(|e| matches!(e, RoomEvent::GameStarted { .. })));
    assert!(sink.contains(
        |e| matches!(e, RoomEvent::CountdownStarted { seconds: 3 })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_no_join_once_countdown_started() {
    let mut reg = registry(RecordingSink::new());
    let handle = room_with_two_players(&mut reg).await;
    handle.set_ready(pid(1), true).await.unwrap();
    handle.set_ready(pid(2), true).await.unwrap();
    handle.start(pid(1)).await.unwrap();

    let result = handle.join(pid(3), "late").await;
    assert!(matches!(result, Err(RoomError::Closed(_))));
}

#[tokio::test(start_paused = true)]
async fn test_abort_during_countdown_cancels_start() {
    let mut reg = registry(RecordingSink::new());
    let handle = room_with_two_players(&mut reg).await;
    handle.set_ready(pid(1), true).await.unwrap();
    handle.set_ready(pid(2), true).await.unwrap();
    handle.start(pid(1)).await.unwrap();

    // Everyone leaves mid-countdown: hard reset to WaitingForPlayers.
    handle.leave(pid(1)).await.unwrap();
    let snap = handle.leave(pid(2)).await.unwrap();
    assert_eq!(snap.state, RoomState::WaitingForPlayers);
    assert!(snap.is_opened);

    // The stale countdown must not start a game in the empty room.
    time::sleep(Duration::from_secs(10)).await;
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.state, RoomState::WaitingForPlayers);
}

// =========================================================================
// Moves and scoring
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_happy_path_scores_and_bumps_version() {
    let sink = RecordingSink::new();
    let mut reg = registry(Arc::clone(&sink));
    let handle = room_with_two_players(&mut reg).await;
    start_game(&handle).await;

    let board = handle.board().await.unwrap();
    assert_eq!(board.version, 1);

    let (cells, expression) =
        scoring_move(&board).expect("seeded board has a scorable line");
    let operands = digits_at(&board, &cells);
    let expected_lines = matched_line_count(&board, operands);
    let union = matched_union(&board, operands);

    let outcome = handle
        .submit_move(pid(1), expression, board.version)
        .await
        .unwrap();

    // First score of the game: streak 1, 10 points per matched line.
    assert_eq!(outcome.gain, expected_lines * 10);
    assert_eq!(outcome.board.version, 2);

    // Cells outside the matched union are untouched; regenerated cells
    // stay in digit range.
    for r in 0..4 {
        for c in 0..4 {
            let after = outcome.board.cell(r, c).unwrap();
            if union.contains(&(r, c)) {
                assert!((1..=9).contains(&after));
            } else {
                assert_eq!(after, board.cell(r, c).unwrap());
            }
        }
    }

    let snap = handle.snapshot().await.unwrap();
    let alice = snap.players.iter().find(|p| p.id == pid(1)).unwrap();
    assert_eq!(alice.score, outcome.gain);
    assert!(sink.contains(|e| matches!(
        e,
        RoomEvent::BoardUpdated { scorer, .. } if *scorer == pid(1)
    )));
}

#[tokio::test(start_paused = true)]
async fn test_streak_bonus_grows_for_consecutive_scorer() {
    let mut reg = registry(RecordingSink::new());
    let handle = room_with_two_players(&mut reg).await;
    start_game(&handle).await;

    // Alice scores twice in a row; the second gain uses streak 2
    // (15 points per line instead of 10).
    let board = handle.board().await.unwrap();
    let (cells, expression) = scoring_move(&board).expect("scorable line");
    let first_lines = matched_line_count(&board, digits_at(&board, &cells));
    let outcome = handle
        .submit_move(pid(1), expression, board.version)
        .await
        .unwrap();
    assert_eq!(outcome.gain, first_lines * 10);

    let board = outcome.board;
    let (cells, expression) = scoring_move(&board).expect("scorable line");
    let second_lines = matched_line_count(&board, digits_at(&board, &cells));
    let outcome = handle
        .submit_move(pid(1), expression, board.version)
        .await
        .unwrap();
    assert_eq!(outcome.gain, second_lines * 15);
    assert_eq!(outcome.board.version, 3);
}

#[tokio::test(start_paused = true)]
async fn test_streak_resets_when_scorer_changes() {
    let mut reg = registry(RecordingSink::new());
    let handle = room_with_two_players(&mut reg).await;
    start_game(&handle).await;

    let board = handle.board().await.unwrap();
    let (_, expression) = scoring_move(&board).expect("scorable line");
    handle
        .submit_move(pid(1), expression, board.version)
        .await
        .unwrap();

    // Bob interrupts: back to streak 1 for him.
    let board = handle.board().await.unwrap();
    let (cells, expression) = scoring_move(&board).expect("scorable line");
    let lines = matched_line_count(&board, digits_at(&board, &cells));
    let outcome = handle
        .submit_move(pid(2), expression, board.version)
        .await
        .unwrap();
    assert_eq!(outcome.gain, lines * 10);
}

#[tokio::test(start_paused = true)]
async fn test_submit_rejected_outside_game() {
    let mut reg = registry(RecordingSink::new());
    let handle = room_with_two_players(&mut reg).await;

    let result = handle.submit_move(pid(1), "1234+++", 1).await;
    assert!(matches!(result, Err(RoomError::WrongState { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_submit_rejected_for_non_member() {
    let mut reg = registry(RecordingSink::new());
    let handle = room_with_two_players(&mut reg).await;
    start_game(&handle).await;

    let result = handle.submit_move(pid(99), "1234+++", 1).await;
    assert!(matches!(result, Err(RoomError::PlayerNotFound(p, _)) if p == pid(99)));
}

#[tokio::test(start_paused = true)]
async fn test_submit_rejects_malformed_expression() {
    let mut reg = registry(RecordingSink::new());
    let handle = room_with_two_players(&mut reg).await;
    start_game(&handle).await;

    // Five digits: fails operand extraction before matching.
    let result = handle.submit_move(pid(1), "12345++", 1).await;
    assert!(matches!(result, Err(RoomError::InvalidExpression(_))));
}

#[tokio::test(start_paused = true)]
async fn test_submit_rejects_unmatched_digits() {
    let mut reg = registry(RecordingSink::new());
    let handle = room_with_two_players(&mut reg).await;
    start_game(&handle).await;

    let board = handle.board().await.unwrap();
    // Find a digit multiset no line carries.
    let mut operands = None;
    'outer: for a in 1..=9u8 {
        for b in a..=9u8 {
            let candidate = [a, a, b, b];
            if matched_line_count(&board, candidate) == 0 {
                operands = Some(candidate);
                break 'outer;
            }
        }
    }
    let [a, b, c, d] = operands.expect("some aabb multiset is absent");
    let expression = format!("{a}{b}{c}{d}+++");
    let result = handle.submit_move(pid(1), expression, board.version).await;
    assert!(matches!(result, Err(RoomError::NoMatch)));
}

#[tokio::test(start_paused = true)]
async fn test_submit_rejects_wrong_result_with_classification() {
    let mut reg = registry(RecordingSink::new());
    let handle = room_with_two_players(&mut reg).await;
    start_game(&handle).await;

    let board = handle.board().await.unwrap();
    // A line whose digit sum is an integer other than 10 gives a
    // WrongInteger classification for the all-plus expression.
    let target = line_sets().into_iter().find_map(|cells| {
        let digits = digits_at(&board, &cells);
        let sum: u32 = digits.iter().map(|&d| u32::from(d)).sum();
        (sum != 10).then_some((digits, sum))
    });
    let (digits, sum) = target.expect("some line does not sum to 10");
    let [a, b, c, d] = digits;
    let result = handle
        .submit_move(pid(1), format!("{a}{b}{c}{d}+++"), board.version)
        .await;
    assert!(
        matches!(result, Err(RoomError::WrongResult(v)) if v == i64::from(sum)),
        "expected WrongResult({sum}), got {result:?}"
    );

    // A non-integer result classifies separately, when one exists.
    let non_integer = line_sets().into_iter().find_map(|cells| {
        let digits = digits_at(&board, &cells);
        find_expression(digits, |v| {
            (v - v.round()).abs() >= 1e-9
        })
    });
    if let Some(expression) = non_integer {
        let result = handle.submit_move(pid(1), expression, board.version).await;
        assert!(matches!(result, Err(RoomError::NotInteger)));
    }

    // Rejections never advanced the board.
    assert_eq!(handle.board().await.unwrap().version, board.version);
}

// =========================================================================
// Conflict detection
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_stale_version_on_touched_cells_conflicts() {
    let mut reg = registry(RecordingSink::new());
    let handle = room_with_two_players(&mut reg).await;
    start_game(&handle).await;

    let board = handle.board().await.unwrap();
    let (cells, expression) = scoring_move(&board).expect("scorable line");
    let union = matched_union(&board, digits_at(&board, &cells));
    handle
        .submit_move(pid(1), expression, board.version)
        .await
        .unwrap();

    // Bob submits against the OLD version, naming a line that crosses the
    // cells Alice consumed. Conflict detection runs before evaluation, so
    // the expression only needs to match the line's current digits.
    let current = handle.board().await.unwrap();
    let overlapping = line_sets()
        .into_iter()
        .find(|cells| cells.iter().any(|c| union.contains(c)))
        .expect("some line overlaps the mutated cells");
    let [a, b, c, d] = digits_at(&current, &overlapping);
    let result = handle
        .submit_move(pid(2), format!("{a}{b}{c}{d}+++"), board.version)
        .await;
    assert!(
        matches!(result, Err(RoomError::Conflict(_))),
        "expected Conflict, got {result:?}"
    );
    if let Err(e) = result {
        assert!(e.is_retryable_conflict());
    }
}

#[tokio::test(start_paused = true)]
async fn test_disjoint_stale_submission_succeeds() {
    let mut reg = registry(RecordingSink::new());
    let handle = room_with_two_players(&mut reg).await;
    start_game(&handle).await;

    let board = handle.board().await.unwrap();
    let (cells, expression) = scoring_move(&board).expect("scorable line");
    let union = matched_union(&board, digits_at(&board, &cells));
    handle
        .submit_move(pid(1), expression, board.version)
        .await
        .unwrap();

    // Bob still holds version 1. Find a line that (a) shares no cell with
    // the mutated union - so its digits are unchanged - (b) can make 10,
    // and (c) whose full match set on the current board is also disjoint
    // from the union. Cell-granularity concurrency must let it through.
    let current = handle.board().await.unwrap();
    let candidate = line_sets().into_iter().find_map(|cells| {
        if cells.iter().any(|c| union.contains(c)) {
            return None;
        }
        let digits = digits_at(&current, &cells);
        if matched_union(&current, digits)
            .iter()
            .any(|c| union.contains(c))
        {
            return None;
        }
        solve_ten(digits).map(|e| (cells, e))
    });

    let (_, expression) = candidate.expect("a disjoint scorable line exists");
    let outcome = handle
        .submit_move(pid(2), expression, board.version)
        .await
        .expect("disjoint concurrent move must not conflict");
    assert_eq!(outcome.board.version, 3);
}

#[tokio::test(start_paused = true)]
async fn test_version_ahead_of_board_conflicts() {
    let mut reg = registry(RecordingSink::new());
    let handle = room_with_two_players(&mut reg).await;
    start_game(&handle).await;

    let board = handle.board().await.unwrap();
    let (_, expression) = scoring_move(&board).expect("scorable line");
    let result = handle.submit_move(pid(1), expression, 99).await;
    assert!(matches!(result, Err(RoomError::Conflict(_))));
}

// =========================================================================
// Game end, results, reset
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_game_timer_ends_game_with_results() {
    let sink = RecordingSink::new();
    let mut reg = registry(Arc::clone(&sink));
    let handle = room_with_two_players(&mut reg).await;
    start_game(&handle).await;

    // Sleep past the remaining game time (120s total, 4s already elapsed).
    time::sleep(Duration::from_secs(120)).await;

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.state, RoomState::GameEnded);
    assert!(sink.contains(|e| matches!(e, RoomEvent::GameEnding { remaining: 10 })));
    assert!(sink.contains(|e| matches!(e, RoomEvent::GameEnded { .. })));

    let results = handle.results().await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].scores.len(), 2);

    // Moves are rejected once the game is over.
    let result = handle.submit_move(pid(1), "1234+++", snap.board_version).await;
    assert!(matches!(result, Err(RoomError::WrongState { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_close_result_resets_when_last_player_closes() {
    let sink = RecordingSink::new();
    let mut reg = registry(Arc::clone(&sink));
    let handle = room_with_two_players(&mut reg).await;
    start_game(&handle).await;
    time::sleep(Duration::from_secs(120)).await;

    let snap = handle.close_result(pid(1)).await.unwrap();
    assert_eq!(snap.state, RoomState::GameEnded);

    let snap = handle.close_result(pid(2)).await.unwrap();
    assert_eq!(snap.state, RoomState::WaitingForPlayers);
    assert!(snap.is_opened);
    assert!(snap.players.iter().all(|p| !p.is_ready));
    assert!(snap.players.iter().all(|p| !p.has_closed_result));
    assert!(sink.contains(|e| matches!(e, RoomEvent::RoomReset)));
}

#[tokio::test(start_paused = true)]
async fn test_close_result_outside_game_ended_rejected() {
    let mut reg = registry(RecordingSink::new());
    let handle = room_with_two_players(&mut reg).await;
    let result = handle.close_result(pid(1)).await;
    assert!(matches!(
        result,
        Err(RoomError::WrongState {
            expected: RoomState::GameEnded,
            ..
        })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_leave_is_idempotent_and_zero_occupancy_resets() {
    let mut reg = registry(RecordingSink::new());
    let handle = room_with_two_players(&mut reg).await;
    start_game(&handle).await;

    handle.leave(pid(1)).await.unwrap();
    // Leaving twice is fine.
    handle.leave(pid(1)).await.unwrap();

    let snap = handle.leave(pid(2)).await.unwrap();
    assert_eq!(snap.state, RoomState::WaitingForPlayers);
    assert!(snap.players.is_empty());
    assert!(snap.is_opened);
    // Hard reset cleared the results log and produced a fresh board.
    assert!(handle.results().await.unwrap().is_empty());
    assert_eq!(handle.board().await.unwrap().version, 1);
}

// =========================================================================
// Disconnect / reconnect
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_disconnect_and_reconnect_within_grace() {
    let sink = RecordingSink::new();
    let mut reg = registry(Arc::clone(&sink));
    let handle = room_with_two_players(&mut reg).await;
    start_game(&handle).await;

    // Score once so we can verify the score survives the reconnect.
    let board = handle.board().await.unwrap();
    let (_, expression) = scoring_move(&board).expect("scorable line");
    let outcome = handle
        .submit_move(pid(1), expression, board.version)
        .await
        .unwrap();

    let snap = handle.player_disconnected(pid(1)).await.unwrap();
    let alice = snap.players.iter().find(|p| p.id == pid(1)).unwrap();
    assert!(!alice.is_connected);
    assert!(sink.contains(|e| matches!(e, RoomEvent::PlayerDisconnected { .. })));

    // Come back well inside the 30s grace window.
    time::sleep(Duration::from_secs(10)).await;
    let snap = handle.player_reconnected(pid(1)).await.unwrap();
    let alice = snap.players.iter().find(|p| p.id == pid(1)).unwrap();
    assert!(alice.is_connected);
    assert_eq!(alice.score, outcome.gain);
    assert_eq!(snap.players.len(), 2, "no duplicate seat");

    // The disarmed grace timer must not remove the player later.
    time::sleep(Duration::from_secs(40)).await;
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.players.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_grace_expiry_removes_player() {
    let sink = RecordingSink::new();
    let mut reg = registry(Arc::clone(&sink));
    let handle = room_with_two_players(&mut reg).await;
    start_game(&handle).await;

    handle.player_disconnected(pid(2)).await.unwrap();
    time::sleep(Duration::from_secs(31)).await;

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.players.len(), 1);
    assert!(snap.players.iter().all(|p| p.id != pid(2)));
    assert!(sink.contains(
        |e| matches!(e, RoomEvent::PlayerLeft { player } if *player == pid(2))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_grace_expiry_of_last_player_hard_resets() {
    let mut reg = registry(RecordingSink::new());
    let room_id = reg.create_room("solo");
    let handle = reg.room(room_id).unwrap();
    handle.join(pid(1), "alice").await.unwrap();

    handle.player_disconnected(pid(1)).await.unwrap();
    time::sleep(Duration::from_secs(31)).await;

    let snap = handle.snapshot().await.unwrap();
    assert!(snap.players.is_empty());
    assert_eq!(snap.state, RoomState::WaitingForPlayers);
    assert!(snap.is_opened);
}

#[tokio::test(start_paused = true)]
async fn test_disconnect_unknown_player_rejected() {
    let mut reg = registry(RecordingSink::new());
    let handle = room_with_two_players(&mut reg).await;
    let result = handle.player_disconnected(pid(42)).await;
    assert!(matches!(result, Err(RoomError::PlayerNotFound(_, _))));
}

// =========================================================================
// Registry teardown
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_destroyed_room_becomes_unavailable() {
    let mut reg = registry(RecordingSink::new());
    let room_id = reg.create_room("doomed");
    let handle = reg.room(room_id).unwrap();
    handle.join(pid(1), "alice").await.unwrap();

    reg.destroy_room(room_id).await.unwrap();
    assert_eq!(reg.room_count(), 0);
    assert!(matches!(reg.room(room_id), Err(RoomError::NotFound(_))));

    // Give the actor a moment to drain its mailbox and stop.
    time::sleep(Duration::from_millis(10)).await;
    let result = handle.join(pid(2), "bob").await;
    assert!(matches!(result, Err(RoomError::Unavailable(_))));
}
