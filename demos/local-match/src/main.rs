//! Runs a complete two-player match in-process: create a room, ready up,
//! start, brute-force scoring expressions against the live board, and
//! print everything the notification sink sees.
//!
//! ```text
//! RUST_LOG=info cargo run -p local-match
//! ```

use std::sync::Arc;
use std::time::Duration;

use maketen::prelude::*;

/// Prints every room event through `tracing`.
struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, room: RoomId, event: RoomEvent) {
        tracing::info!(%room, ?event, "event");
    }
}

const OPS: [char; 4] = ['+', '-', '*', '/'];

/// The cell lists of every line on a 4x4 board.
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

/// Finds a 10-producing postfix expression over some board line, the same
/// way a player would hunt for one.
fn find_move(board: &BoardData) -> Option<String> {
    for cells in line_sets() {
        let digits: Vec<u8> = cells
            .iter()
            .filter_map(|&(r, c)| board.cell(r, c))
            .collect();
        if digits.len() != 4 {
            continue;
        }
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
                    let p = [digits[a], digits[b], digits[c], digits[d]]
                        .map(|x| (b'0' + x) as char);
                    for o1 in OPS {
                        for o2 in OPS {
                            for o3 in OPS {
                                for candidate in [
                                    format!("{}{}{}{}{o1}{o2}{o3}", p[0], p[1], p[2], p[3]),
                                    format!("{}{}{}{o1}{}{o2}{o3}", p[0], p[1], p[2], p[3]),
                                    format!("{}{}{}{o1}{o2}{}{o3}", p[0], p[1], p[2], p[3]),
                                    format!("{}{}{o1}{}{}{o2}{o3}", p[0], p[1], p[2], p[3]),
                                    format!("{}{}{o1}{}{o2}{}{o3}", p[0], p[1], p[2], p[3]),
                                ] {
                                    if let Ok(v) = expr::evaluate_postfix(&candidate) {
                                        if expr::is_target(v) {
                                            return Some(candidate);
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
    None
}

fn print_board(board: &BoardData) {
    for r in 0..board.size {
        let row: Vec<String> = (0..board.size)
            .filter_map(|c| board.cell(r, c))
            .map(|v| v.to_string())
            .collect();
        println!("    {}", row.join(" "));
    }
}

#[tokio::main]
async fn main() -> Result<(), RoomError> {
    init_tracing();

    let service = GameService::new(RoomConfig::default(), Arc::new(LogSink));

    let room = service.create_room("demo room").await?;
    let room_id = room.room_id;
    let (alice, bob) = (PlayerId(1), PlayerId(2));

    service.join_room(room_id, alice, "alice").await?;
    service.join_room(room_id, bob, "bob").await?;
    service.set_ready(room_id, alice, true).await?;
    service.set_ready(room_id, bob, true).await?;
    service.start_game(room_id, alice).await?;

    println!("countdown running...");
    tokio::time::sleep(Duration::from_secs(4)).await;

    // Alternate players over a handful of moves.
    for turn in 0..6 {
        let board = service.board(room_id).await?;
        println!("board v{}:", board.version);
        print_board(&board);

        let Some(expression) = find_move(&board) else {
            println!("  no scorable line on this board, stopping");
            break;
        };
        let player = if turn % 2 == 0 { alice } else { bob };
        match service
            .submit_move(room_id, player, &expression, board.version)
            .await
        {
            Ok(outcome) => {
                println!("  {player} played {expression} for {} points", outcome.gain);
            }
            Err(error) => println!("  {player} rejected: {error}"),
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    let snapshot = service.room(room_id).await?;
    println!("scores:");
    for p in &snapshot.players {
        println!("    {}: {}", p.name, p.score);
    }

    service.leave_player(room_id, alice).await?;
    service.leave_player(room_id, bob).await?;
    Ok(())
}
