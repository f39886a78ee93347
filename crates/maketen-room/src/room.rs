//! Room actor: an isolated Tokio task that owns one room.
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel. The mailbox serializes every player action and
//! every timer tick for the room, which is what makes the orchestrator's
//! read-then-write sequences atomic without a lock.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use maketen_game::{Board, ResultClass, conflict, expr, find_matches};
use maketen_protocol::{BoardData, PlayerId, PlayerScore, RoomId};
use maketen_timer::{TimerKey, TimerQueue};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

use crate::{NotificationSink, Player, PlayerData, RoomConfig, RoomError, RoomEvent, RoomState};

/// A snapshot of room metadata and roster - the "Room" every operation
/// returns. Always a deep copy; the live room never leaves its actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub room_id: RoomId,
    pub name: String,
    pub state: RoomState,
    pub is_opened: bool,
    pub players: Vec<PlayerData>,
    pub board_version: u64,
}

/// What a successful move returns to its submitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// The board after the matched lines were regenerated.
    pub board: BoardData,
    /// Points credited to the submitting player.
    pub gain: u32,
}

/// Final scores of one finished game, kept until the room hard-resets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub finished_at_unix_ms: u64,
    pub scores: Vec<PlayerScore>,
}

type Reply<T> = oneshot::Sender<Result<T, RoomError>>;

/// Commands sent to a room actor through its channel.
pub(crate) enum RoomCommand {
    Join {
        player: PlayerId,
        name: String,
        reply: Reply<RoomSnapshot>,
    },
    Leave {
        player: PlayerId,
        reply: Reply<RoomSnapshot>,
    },
    SetReady {
        player: PlayerId,
        ready: bool,
        reply: Reply<RoomSnapshot>,
    },
    Start {
        player: PlayerId,
        reply: Reply<RoomSnapshot>,
    },
    SubmitMove {
        player: PlayerId,
        expression: String,
        version: u64,
        reply: Reply<MoveOutcome>,
    },
    CloseResult {
        player: PlayerId,
        reply: Reply<RoomSnapshot>,
    },
    Disconnected {
        player: PlayerId,
        reply: Reply<RoomSnapshot>,
    },
    Reconnected {
        player: PlayerId,
        reply: Reply<RoomSnapshot>,
    },
    GetSnapshot {
        reply: oneshot::Sender<RoomSnapshot>,
    },
    GetBoard {
        reply: Reply<BoardData>,
    },
    GetResults {
        reply: oneshot::Sender<Vec<GameResult>>,
    },
    Shutdown,
}

/// Timer events delivered back into the actor's own mailbox loop.
///
/// Every handler re-checks the room state before acting: a tick that
/// outlived the state that scheduled it must be a no-op.
#[derive(Debug, Clone, Copy)]
enum TimerEvent {
    /// Pre-game countdown. `remaining == 0` starts the game.
    CountdownTick { remaining: u32 },
    /// End-of-game warning. `remaining == 0` ends the game.
    EndingTick { remaining: u32 },
    /// A disconnected player's grace period ran out.
    GraceExpired { player: PlayerId },
}

/// Handle to a running room actor. Cheap to clone.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(Reply<T>) -> RoomCommand,
    ) -> Result<T, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(make(reply_tx))
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?
    }

    /// Adds a player to the room.
    pub async fn join(
        &self,
        player: PlayerId,
        name: impl Into<String>,
    ) -> Result<RoomSnapshot, RoomError> {
        let name = name.into();
        self.request(|reply| RoomCommand::Join { player, name, reply })
            .await
    }

    /// Removes a player. Idempotent: leaving a room you are not in
    /// succeeds and returns the current snapshot.
    pub async fn leave(&self, player: PlayerId) -> Result<RoomSnapshot, RoomError> {
        self.request(|reply| RoomCommand::Leave { player, reply }).await
    }

    /// Sets or clears a player's ready flag.
    pub async fn set_ready(
        &self,
        player: PlayerId,
        ready: bool,
    ) -> Result<RoomSnapshot, RoomError> {
        self.request(|reply| RoomCommand::SetReady { player, ready, reply })
            .await
    }

    /// Starts the game. Only the first player may issue this, and only
    /// while the room is AllReady.
    pub async fn start(&self, player: PlayerId) -> Result<RoomSnapshot, RoomError> {
        self.request(|reply| RoomCommand::Start { player, reply }).await
    }

    /// Submits a formula against the board version the player was seeing.
    pub async fn submit_move(
        &self,
        player: PlayerId,
        expression: impl Into<String>,
        version: u64,
    ) -> Result<MoveOutcome, RoomError> {
        let expression = expression.into();
        self.request(|reply| RoomCommand::SubmitMove {
            player,
            expression,
            version,
            reply,
        })
        .await
    }

    /// Marks the player's result screen closed; when the last player
    /// closes, the room resets to WaitingForPlayers.
    pub async fn close_result(
        &self,
        player: PlayerId,
    ) -> Result<RoomSnapshot, RoomError> {
        self.request(|reply| RoomCommand::CloseResult { player, reply })
            .await
    }

    /// Marks a player disconnected and arms their grace timer.
    pub async fn player_disconnected(
        &self,
        player: PlayerId,
    ) -> Result<RoomSnapshot, RoomError> {
        self.request(|reply| RoomCommand::Disconnected { player, reply })
            .await
    }

    /// Marks a player reconnected and disarms their grace timer.
    pub async fn player_reconnected(
        &self,
        player: PlayerId,
    ) -> Result<RoomSnapshot, RoomError> {
        self.request(|reply| RoomCommand::Reconnected { player, reply })
            .await
    }

    /// Current room snapshot.
    pub async fn snapshot(&self) -> Result<RoomSnapshot, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::GetSnapshot { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx.await.map_err(|_| RoomError::Unavailable(self.room_id))
    }

    /// Point-in-time copy of the current board.
    pub async fn board(&self) -> Result<BoardData, RoomError> {
        self.request(|reply| RoomCommand::GetBoard { reply }).await
    }

    /// Results of every game finished since the last hard reset.
    pub async fn results(&self) -> Result<Vec<GameResult>, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::GetResults { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx.await.map_err(|_| RoomError::Unavailable(self.room_id))
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

struct RoomActor {
    room_id: RoomId,
    name: String,
    config: RoomConfig,
    state: RoomState,
    is_opened: bool,
    players: Vec<Player>,
    /// Board history for the room's games; the orchestrator always
    /// operates on the latest.
    boards: Vec<Board>,
    results: Vec<GameResult>,
    last_scorer: Option<PlayerId>,
    streak: u32,
    rng: StdRng,
    timers: TimerQueue<TimerEvent>,
    /// Armed grace timers, so reconnection can disarm the right one.
    grace_keys: HashMap<PlayerId, TimerKey>,
    sink: Arc<dyn NotificationSink>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    async fn run(mut self) {
        tracing::info!(room_id = %self.room_id, name = %self.name, "room actor started");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => match cmd {
                    Some(RoomCommand::Shutdown) | None => break,
                    Some(cmd) => self.handle_command(cmd),
                },
                event = self.timers.next() => self.handle_timer(event),
            }
        }

        tracing::info!(room_id = %self.room_id, "room actor stopped");
    }

    fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join { player, name, reply } => {
                let _ = reply.send(self.handle_join(player, name));
            }
            RoomCommand::Leave { player, reply } => {
                let _ = reply.send(self.handle_leave(player));
            }
            RoomCommand::SetReady { player, ready, reply } => {
                let _ = reply.send(self.handle_set_ready(player, ready));
            }
            RoomCommand::Start { player, reply } => {
                let _ = reply.send(self.handle_start(player));
            }
            RoomCommand::SubmitMove {
                player,
                expression,
                version,
                reply,
            } => {
                let _ = reply.send(self.handle_submit(player, &expression, version));
            }
            RoomCommand::CloseResult { player, reply } => {
                let _ = reply.send(self.handle_close_result(player));
            }
            RoomCommand::Disconnected { player, reply } => {
                let _ = reply.send(self.handle_disconnected(player));
            }
            RoomCommand::Reconnected { player, reply } => {
                let _ = reply.send(self.handle_reconnected(player));
            }
            RoomCommand::GetSnapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            RoomCommand::GetBoard { reply } => {
                let _ = reply.send(self.current_board().map(Board::snapshot));
            }
            RoomCommand::GetResults { reply } => {
                let _ = reply.send(self.results.clone());
            }
            // Intercepted by run() before dispatch.
            RoomCommand::Shutdown => {}
        }
    }

    // -- state machine -----------------------------------------------------

    /// The single entry point for state changes. Illegal edges fail loudly.
    fn transition(&mut self, to: RoomState) -> Result<(), RoomError> {
        if !self.state.can_transition_to(to) {
            return Err(RoomError::IllegalTransition {
                from: self.state,
                to,
            });
        }
        tracing::debug!(room_id = %self.room_id, from = %self.state, %to, "state transition");
        self.state = to;
        Ok(())
    }

    /// Re-evaluates the all-players-ready aggregate after any roster or
    /// ready-flag change.
    fn sync_ready_state(&mut self) -> Result<(), RoomError> {
        let all_ready =
            !self.players.is_empty() && self.players.iter().all(|p| p.is_ready);
        match (self.state, all_ready) {
            (RoomState::WaitingForPlayers, true) => {
                self.transition(RoomState::AllReady)?;
                self.notify(RoomEvent::AllReady);
            }
            (RoomState::AllReady, false) => {
                self.transition(RoomState::WaitingForPlayers)?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Resets to WaitingForPlayers after the last player closed the
    /// results screen: ready/result flags cleared, room reopened.
    fn sync_results_closed(&mut self) -> Result<(), RoomError> {
        if self.state != RoomState::GameEnded {
            return Ok(());
        }
        if self.players.is_empty()
            || !self.players.iter().all(|p| p.has_closed_result)
        {
            return Ok(());
        }
        self.transition(RoomState::WaitingForPlayers)?;
        for p in &mut self.players {
            p.is_ready = false;
            p.has_closed_result = false;
        }
        self.is_opened = true;
        self.notify(RoomEvent::RoomReset);
        tracing::info!(room_id = %self.room_id, "results closed, room reopened");
        Ok(())
    }

    /// Hard reset on zero occupancy: fresh board, cleared results,
    /// reopened for joining. Legal from every state.
    fn hard_reset(&mut self) -> Result<(), RoomError> {
        self.transition(RoomState::WaitingForPlayers)?;
        self.timers.clear();
        self.grace_keys.clear();
        self.results.clear();
        self.last_scorer = None;
        self.streak = 0;
        self.is_opened = true;
        let board = Board::generate(self.config.board_size, &mut self.rng);
        self.boards.push(board);
        self.notify(RoomEvent::RoomReset);
        tracing::info!(room_id = %self.room_id, "room hard reset");
        Ok(())
    }

    // -- roster ------------------------------------------------------------

    fn handle_join(
        &mut self,
        player: PlayerId,
        name: String,
    ) -> Result<RoomSnapshot, RoomError> {
        if self.players.iter().any(|p| p.id == player) {
            return Err(RoomError::AlreadyJoined(player, self.room_id));
        }
        if !self.is_opened
            || !self.state.is_joinable()
            || self.players.len() >= self.config.max_players
        {
            return Err(RoomError::Closed(self.room_id));
        }

        self.players.push(Player::new(player, name.clone()));
        tracing::info!(
            room_id = %self.room_id,
            %player,
            players = self.players.len(),
            "player joined"
        );
        self.notify(RoomEvent::PlayerJoined { player, name });

        // A joining player is not ready, so an AllReady room drops back.
        self.sync_ready_state()?;
        Ok(self.snapshot())
    }

    fn handle_leave(&mut self, player: PlayerId) -> Result<RoomSnapshot, RoomError> {
        let Some(index) = self.players.iter().position(|p| p.id == player) else {
            // Idempotent: already gone.
            return Ok(self.snapshot());
        };
        self.remove_player(index)?;
        Ok(self.snapshot())
    }

    /// Removes a seat and runs every aggregate that removal can complete:
    /// zero-occupancy reset, all-ready, all-results-closed.
    fn remove_player(&mut self, index: usize) -> Result<(), RoomError> {
        let removed = self.players.remove(index);
        if let Some(key) = self.grace_keys.remove(&removed.id) {
            self.timers.cancel(key);
        }
        tracing::info!(
            room_id = %self.room_id,
            player = %removed.id,
            players = self.players.len(),
            "player left"
        );
        self.notify(RoomEvent::PlayerLeft { player: removed.id });

        if self.players.is_empty() {
            return self.hard_reset();
        }
        self.sync_ready_state()?;
        self.sync_results_closed()
    }

    fn handle_set_ready(
        &mut self,
        player: PlayerId,
        ready: bool,
    ) -> Result<RoomSnapshot, RoomError> {
        let room_id = self.room_id;
        let seat = self
            .players
            .iter_mut()
            .find(|p| p.id == player)
            .ok_or(RoomError::PlayerNotFound(player, room_id))?;
        seat.is_ready = ready;
        self.notify(RoomEvent::PlayerReady { player, ready });
        self.sync_ready_state()?;
        Ok(self.snapshot())
    }

    fn handle_disconnected(
        &mut self,
        player: PlayerId,
    ) -> Result<RoomSnapshot, RoomError> {
        let room_id = self.room_id;
        let seat = self
            .players
            .iter_mut()
            .find(|p| p.id == player)
            .ok_or(RoomError::PlayerNotFound(player, room_id))?;
        seat.is_connected = false;
        seat.last_seen_at = Some(Instant::now());

        let key = self
            .timers
            .schedule(self.config.reconnect_grace, TimerEvent::GraceExpired {
                player,
            });
        self.grace_keys.insert(player, key);

        tracing::info!(room_id = %self.room_id, %player, "player disconnected");
        self.notify(RoomEvent::PlayerDisconnected { player });
        Ok(self.snapshot())
    }

    fn handle_reconnected(
        &mut self,
        player: PlayerId,
    ) -> Result<RoomSnapshot, RoomError> {
        let room_id = self.room_id;
        let seat = self
            .players
            .iter_mut()
            .find(|p| p.id == player)
            .ok_or(RoomError::PlayerNotFound(player, room_id))?;
        seat.is_connected = true;
        seat.last_seen_at = None;

        if let Some(key) = self.grace_keys.remove(&player) {
            self.timers.cancel(key);
        }

        tracing::info!(room_id = %self.room_id, %player, "player reconnected");
        self.notify(RoomEvent::PlayerReconnected { player });
        Ok(self.snapshot())
    }

    // -- game lifecycle ----------------------------------------------------

    fn handle_start(&mut self, player: PlayerId) -> Result<RoomSnapshot, RoomError> {
        if !self.players.iter().any(|p| p.id == player) {
            return Err(RoomError::PlayerNotFound(player, self.room_id));
        }
        // The first player in join order holds the start privilege.
        if self.players.first().map(|p| p.id) != Some(player) {
            return Err(RoomError::NotFirstPlayer(player));
        }
        if self.state != RoomState::AllReady {
            return Err(RoomError::WrongState {
                expected: RoomState::AllReady,
                actual: self.state,
            });
        }

        self.transition(RoomState::Countdown)?;
        self.is_opened = false;

        let seconds = self.config.countdown.as_secs() as u32;
        self.notify(RoomEvent::CountdownStarted { seconds });
        for i in 1..=seconds.max(1) {
            self.timers.schedule(
                Duration::from_secs(u64::from(i)),
                TimerEvent::CountdownTick {
                    remaining: seconds.saturating_sub(i),
                },
            );
        }

        tracing::info!(room_id = %self.room_id, %player, "game starting");
        Ok(self.snapshot())
    }

    /// Countdown finished: generate the board and open play.
    fn begin_game(&mut self) -> Result<(), RoomError> {
        self.transition(RoomState::GameInProgress)?;

        for p in &mut self.players {
            p.score = 0;
            p.has_closed_result = false;
        }
        self.last_scorer = None;
        self.streak = 0;

        let board = Board::generate(self.config.board_size, &mut self.rng);
        let snapshot = board.snapshot();
        self.boards.push(board);
        self.notify(RoomEvent::GameStarted { board: snapshot });

        // First ending tick fires when `ending_warning` is left on the
        // clock; the chain then ticks once per second.
        let warning = self.config.ending_warning.as_secs() as u32;
        let until_warning = self.config.game_duration - self.config.ending_warning;
        self.timers.schedule(until_warning, TimerEvent::EndingTick {
            remaining: warning,
        });

        tracing::info!(
            room_id = %self.room_id,
            players = self.players.len(),
            "game started"
        );
        Ok(())
    }

    fn end_game(&mut self) -> Result<(), RoomError> {
        self.transition(RoomState::GameEnded)?;

        let scores: Vec<PlayerScore> = self
            .players
            .iter()
            .map(|p| PlayerScore {
                player: p.id,
                name: p.name.clone(),
                score: p.score,
            })
            .collect();
        self.results.push(GameResult {
            finished_at_unix_ms: unix_ms(),
            scores: scores.clone(),
        });
        self.notify(RoomEvent::GameEnded { results: scores });

        tracing::info!(room_id = %self.room_id, "game ended");
        Ok(())
    }

    fn handle_close_result(
        &mut self,
        player: PlayerId,
    ) -> Result<RoomSnapshot, RoomError> {
        if self.state != RoomState::GameEnded {
            return Err(RoomError::WrongState {
                expected: RoomState::GameEnded,
                actual: self.state,
            });
        }
        let room_id = self.room_id;
        let seat = self
            .players
            .iter_mut()
            .find(|p| p.id == player)
            .ok_or(RoomError::PlayerNotFound(player, room_id))?;
        seat.has_closed_result = true;
        self.sync_results_closed()?;
        Ok(self.snapshot())
    }

    // -- move orchestration ------------------------------------------------

    /// The whole move pipeline, executed atomically on the actor: member
    /// and state checks, matching, conflict detection, evaluation, target
    /// check, then - only if everything passed - mutation and scoring.
    fn handle_submit(
        &mut self,
        player: PlayerId,
        expression: &str,
        version: u64,
    ) -> Result<MoveOutcome, RoomError> {
        let Some(player_index) = self.players.iter().position(|p| p.id == player)
        else {
            return Err(RoomError::PlayerNotFound(player, self.room_id));
        };
        if self.state != RoomState::GameInProgress {
            return Err(RoomError::WrongState {
                expected: RoomState::GameInProgress,
                actual: self.state,
            });
        }

        let operands = expr::extract_operands(expression)?;
        let board = self.current_board()?;
        let matches = find_matches(board, &operands);
        if matches.is_empty() {
            tracing::debug!(room_id = %self.room_id, %player, "no matching line");
            return Err(RoomError::NoMatch);
        }

        conflict::check(board, version, &matches)?;

        let result = expr::evaluate_postfix(expression)?;
        match expr::classify(result) {
            ResultClass::Ten => {}
            ResultClass::WrongInteger(value) => {
                return Err(RoomError::WrongResult(value));
            }
            ResultClass::NotInteger => return Err(RoomError::NotInteger),
        }

        // Everything validated - from here on the move is committed.
        let line_count = matches.len() as u32;
        let board = self
            .boards
            .last_mut()
            .ok_or(RoomError::NoBoard)?;
        board.mutate(&matches, &mut self.rng)?;
        let board_data = board.snapshot();

        if self.last_scorer == Some(player) {
            self.streak += 1;
        } else {
            self.last_scorer = Some(player);
            self.streak = 1;
        }
        let gain = line_count * (5 + 5 * self.streak);
        self.players[player_index].score += gain;

        tracing::info!(
            room_id = %self.room_id,
            %player,
            lines = line_count,
            streak = self.streak,
            gain,
            version = board_data.version,
            "move applied"
        );
        self.notify(RoomEvent::BoardUpdated {
            scorer: player,
            gain,
            board: board_data.clone(),
        });

        Ok(MoveOutcome {
            board: board_data,
            gain,
        })
    }

    // -- timers ------------------------------------------------------------

    fn handle_timer(&mut self, event: TimerEvent) {
        let outcome = match event {
            TimerEvent::CountdownTick { remaining } => {
                // Stale if the room was aborted since the start command.
                if self.state != RoomState::Countdown {
                    return;
                }
                if remaining > 0 {
                    self.notify(RoomEvent::CountdownTick { remaining });
                    Ok(())
                } else {
                    self.begin_game()
                }
            }
            TimerEvent::EndingTick { remaining } => {
                if self.state != RoomState::GameInProgress {
                    return;
                }
                if remaining > 0 {
                    self.notify(RoomEvent::GameEnding { remaining });
                    self.timers.schedule(
                        Duration::from_secs(1),
                        TimerEvent::EndingTick {
                            remaining: remaining - 1,
                        },
                    );
                    Ok(())
                } else {
                    self.end_game()
                }
            }
            TimerEvent::GraceExpired { player } => {
                self.grace_keys.remove(&player);
                match self.players.iter().position(|p| {
                    p.id == player && !p.is_connected
                }) {
                    Some(index) => {
                        tracing::info!(
                            room_id = %self.room_id,
                            %player,
                            "grace period expired, removing player"
                        );
                        self.remove_player(index)
                    }
                    // Reconnected or already gone - stale fire, no-op.
                    None => Ok(()),
                }
            }
        };

        if let Err(error) = outcome {
            // Timer-driven transitions only take legal edges; an error here
            // is a state-machine bug worth surfacing in logs.
            tracing::error!(room_id = %self.room_id, %error, "timer handler failed");
        }
    }

    // -- helpers -----------------------------------------------------------

    fn current_board(&self) -> Result<&Board, RoomError> {
        self.boards.last().ok_or(RoomError::NoBoard)
    }

    fn notify(&self, event: RoomEvent) {
        self.sink.notify(self.room_id, event);
    }

    fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            room_id: self.room_id,
            name: self.name.clone(),
            state: self.state,
            is_opened: self.is_opened,
            players: self.players.iter().map(Player::data).collect(),
            board_version: self.boards.last().map(Board::version).unwrap_or(0),
        }
    }
}

fn unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Spawns a new room actor task and returns a handle to it.
pub(crate) fn spawn_room(
    room_id: RoomId,
    name: String,
    config: RoomConfig,
    sink: Arc<dyn NotificationSink>,
    channel_size: usize,
) -> RoomHandle {
    let config = config.validated();
    let mut rng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let boards = vec![Board::generate(config.board_size, &mut rng)];

    let (tx, rx) = mpsc::channel(channel_size);
    let actor = RoomActor {
        room_id,
        name,
        config,
        state: RoomState::WaitingForPlayers,
        is_opened: true,
        players: Vec::new(),
        boards,
        results: Vec::new(),
        last_scorer: None,
        streak: 0,
        rng,
        timers: TimerQueue::new(),
        grace_keys: HashMap::new(),
        sink,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: tx,
    }
}

// =========================================================================
// Tests
// =========================================================================
