//! Session coordinator — the turn/state machine of the client.
//!
//! The coordinator owns the current [`GameSnapshot`], both players'
//! conversation logs, the single in-flight flag, and the deferred
//! winner-reveal timer. All game semantics live on the remote agent;
//! this type only routes snapshots into per-player histories and gates
//! when a submission may go out.
//!
//! Concurrency model: one outstanding agent call at most (`busy`),
//! rejected calls are refused rather than queued, and the state mutex
//! is never held across an await point. Snapshot replacement and the
//! log appends derived from it happen under a single lock acquisition,
//! so observers never see one without the other.

use crate::ports::agent_channel::{AgentChannel, ChannelError};
use crate::ports::transcript_logger::{NoTranscriptLogger, TranscriptEvent, TranscriptLogger};
use crate::ports::winner_reveal::{NoWinnerReveal, WinnerReveal};
use chrono::Utc;
use duel_domain::{ConversationEvent, ConversationLog, GameSnapshot, PerPlayer, Player, SessionId};
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Instruction literal that starts a fresh game. Part of the remote
/// agent contract — must be reproduced verbatim.
pub const START_INSTRUCTION: &str = "Start new game";

/// Grace period between a final result arriving and the winner being
/// presented. Cosmetic pacing, fixed by design.
const WINNER_REVEAL_DELAY: Duration = Duration::from_millis(1000);

/// Errors surfaced by coordinator operations.
///
/// Precondition refusals are not errors — they come back as
/// [`Dispatch::Refused`]. An error here always means the agent call
/// itself failed, and always leaves the coordinator in the state it
/// was in before the call.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Agent request failed: {0}")]
    Channel(#[from] ChannelError),
}

/// Whether a coordinator call went out to the agent or was refused at
/// the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The call was issued and its response applied.
    Completed,
    /// A precondition failed (busy, stale turn, empty text, terminal
    /// game): nothing was sent and no state changed.
    Refused,
}

/// Read-only projection of the coordinator state for view collaborators.
#[derive(Debug, Clone)]
pub struct SessionView {
    pub snapshot: Option<GameSnapshot>,
    pub logs: PerPlayer<ConversationLog>,
    pub busy: bool,
    pub session_id: SessionId,
}

impl SessionView {
    /// Gating contract for views: a player may submit only when no call
    /// is in flight, the game is active, and it is their turn.
    pub fn can_submit(&self, player: Player) -> bool {
        !self.busy
            && self
                .snapshot
                .as_ref()
                .is_some_and(|s| s.is_active() && s.turn == player)
    }
}

struct SessionState {
    snapshot: Option<GameSnapshot>,
    logs: PerPlayer<ConversationLog>,
    busy: bool,
    session_id: SessionId,
    /// Cancellation handle of the pending winner-reveal task, if any.
    /// Lives inside the state so cancel and install are atomic with
    /// the session transitions that require them.
    reveal_token: Option<CancellationToken>,
}

/// The stateful session core. See the module docs for the model.
pub struct SessionCoordinator {
    channel: Arc<dyn AgentChannel>,
    reveal: Arc<dyn WinnerReveal>,
    transcript: Arc<dyn TranscriptLogger>,
    state: Mutex<SessionState>,
}

/// Millisecond value of the most recent mint, bumped past itself on a
/// collision so two mints in the same millisecond never share an id.
static LAST_MINT_MS: AtomicI64 = AtomicI64::new(0);

fn mint_session_id() -> SessionId {
    let now = Utc::now().timestamp_millis();
    let mut prev = LAST_MINT_MS.load(Ordering::Relaxed);
    loop {
        let next = now.max(prev + 1);
        match LAST_MINT_MS.compare_exchange_weak(prev, next, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => return SessionId::new(format!("game-{next}")),
            Err(actual) => prev = actual,
        }
    }
}

impl SessionCoordinator {
    pub fn new(channel: Arc<dyn AgentChannel>) -> Self {
        Self {
            channel,
            reveal: Arc::new(NoWinnerReveal),
            transcript: Arc::new(NoTranscriptLogger),
            state: Mutex::new(SessionState {
                snapshot: None,
                logs: PerPlayer::default(),
                busy: false,
                session_id: mint_session_id(),
                reveal_token: None,
            }),
        }
    }

    /// Set the winner reveal sink.
    pub fn with_winner_reveal(mut self, reveal: Arc<dyn WinnerReveal>) -> Self {
        self.reveal = reveal;
        self
    }

    /// Set a transcript logger.
    pub fn with_transcript_logger(mut self, transcript: Arc<dyn TranscriptLogger>) -> Self {
        self.transcript = transcript;
        self
    }

    /// Clone out the current state for rendering.
    pub fn view(&self) -> SessionView {
        let state = self.state.lock().unwrap();
        SessionView {
            snapshot: state.snapshot.clone(),
            logs: state.logs.clone(),
            busy: state.busy,
            session_id: state.session_id.clone(),
        }
    }

    /// Start a new session.
    ///
    /// Cancels any pending winner reveal, replaces both conversation
    /// logs with empty ones, mints a fresh [`SessionId`], and issues
    /// the start instruction. Callers holding answer drafts should
    /// clear them when this returns [`Dispatch::Completed`].
    ///
    /// On failure the previous snapshot (if any) is left in place and
    /// the session remains startable. Refused while a call is already
    /// in flight.
    pub async fn start_session(&self) -> Result<Dispatch, SessionError> {
        let session_id = {
            let mut state = self.state.lock().unwrap();
            if state.busy {
                debug!("start refused: a call is already in flight");
                return Ok(Dispatch::Refused);
            }
            if let Some(token) = state.reveal_token.take() {
                token.cancel();
            }
            state.logs = PerPlayer::default();
            state.session_id = mint_session_id();
            state.busy = true;
            state.session_id.clone()
        };

        info!(session = %session_id, "starting new session");
        self.transcript.log(TranscriptEvent::new(
            "session_started",
            json!({ "session_id": session_id }),
        ));

        let result = self.channel.call(START_INSTRUCTION, &session_id).await;
        self.apply_start_response(&session_id, result)
    }

    /// Submit `player`'s answer for the current question.
    ///
    /// The answer is appended to `player`'s log before the round-trip
    /// resolves; on failure that optimistic entry stays (retrying is
    /// the remote authority's concern, not re-derivable locally).
    ///
    /// Refused without issuing a call when the text trims to empty, a
    /// call is in flight, no session exists, the game is not active,
    /// or it is not `player`'s turn.
    pub async fn submit_answer(
        &self,
        player: Player,
        text: &str,
    ) -> Result<Dispatch, SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Dispatch::Refused);
        }

        let session_id = {
            let mut state = self.state.lock().unwrap();
            if state.busy {
                debug!(%player, "submit refused: a call is already in flight");
                return Ok(Dispatch::Refused);
            }
            let accepted = state
                .snapshot
                .as_ref()
                .is_some_and(|s| s.is_active() && s.turn == player);
            if !accepted {
                debug!(%player, "submit refused: not this player's turn or game not active");
                return Ok(Dispatch::Refused);
            }
            state
                .logs
                .get_mut(player)
                .push(ConversationEvent::submitted_answer(text));
            state.busy = true;
            state.session_id.clone()
        };

        self.transcript.log(TranscriptEvent::new(
            "answer_submitted",
            json!({ "player": player, "answer": text }),
        ));

        let instruction = format!("{player}: {text}");
        let result = self.channel.call(&instruction, &session_id).await;
        self.apply_submit_response(&session_id, result)
    }

    /// Apply the response to a start call. Stale responses (a newer
    /// session took over while this call was in flight) are discarded.
    fn apply_start_response(
        &self,
        issued: &SessionId,
        result: Result<GameSnapshot, ChannelError>,
    ) -> Result<Dispatch, SessionError> {
        let mut state = self.state.lock().unwrap();
        if state.session_id != *issued {
            warn!(session = %issued, "discarding agent response for superseded session");
            return Ok(Dispatch::Refused);
        }
        state.busy = false;

        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "failed to start session");
                self.transcript.log(TranscriptEvent::new(
                    "request_failed",
                    json!({ "instruction": START_INSTRUCTION, "error": e.to_string() }),
                ));
                return Err(e.into());
            }
        };
        if let Err(issue) = snapshot.check_consistency() {
            warn!(issue = %issue, "agent snapshot violates contract invariant");
        }

        if let Some(question) = &snapshot.question {
            state
                .logs
                .get_mut(snapshot.turn)
                .push(ConversationEvent::question(&question.text));
            self.transcript.log(TranscriptEvent::new(
                "question_presented",
                json!({
                    "player": snapshot.turn,
                    "round": snapshot.round,
                    "text": question.text,
                    "category": question.category,
                }),
            ));
        }
        state.snapshot = Some(snapshot);
        Ok(Dispatch::Completed)
    }

    /// Apply the response to a submit call: verdict to the judged
    /// player's log, next question to the new turn player's log, then
    /// the snapshot itself — all under one lock acquisition.
    fn apply_submit_response(
        &self,
        issued: &SessionId,
        result: Result<GameSnapshot, ChannelError>,
    ) -> Result<Dispatch, SessionError> {
        let mut state = self.state.lock().unwrap();
        if state.session_id != *issued {
            warn!(session = %issued, "discarding agent response for superseded session");
            return Ok(Dispatch::Refused);
        }
        state.busy = false;

        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "answer submission failed");
                self.transcript.log(TranscriptEvent::new(
                    "request_failed",
                    json!({ "error": e.to_string() }),
                ));
                return Err(e.into());
            }
        };
        if let Err(issue) = snapshot.check_consistency() {
            warn!(issue = %issue, "agent snapshot violates contract invariant");
        }

        // Routing rule: events go to the log of the subject the
        // snapshot names, not the caller.
        if let Some(outcome) = &snapshot.last_outcome {
            state
                .logs
                .get_mut(outcome.player)
                .push(ConversationEvent::result(
                    &snapshot.message,
                    outcome.is_correct,
                ));
            self.transcript.log(TranscriptEvent::new(
                "answer_judged",
                json!({
                    "player": outcome.player,
                    "correct": outcome.is_correct,
                    "points": outcome.points_awarded,
                    "message": snapshot.message,
                }),
            ));
        }
        if snapshot.is_active()
            && let Some(question) = &snapshot.question
        {
            state
                .logs
                .get_mut(snapshot.turn)
                .push(ConversationEvent::question(&question.text));
            self.transcript.log(TranscriptEvent::new(
                "question_presented",
                json!({
                    "player": snapshot.turn,
                    "round": snapshot.round,
                    "text": question.text,
                    "category": question.category,
                }),
            ));
        }

        if snapshot.is_completed()
            && let Some(winner) = snapshot.winner
        {
            info!(%winner, "game completed");
            self.transcript.log(TranscriptEvent::new(
                "game_completed",
                json!({ "winner": winner, "scores": snapshot.scores }),
            ));
            self.schedule_reveal(&mut state, winner);
        }
        state.snapshot = Some(snapshot);
        Ok(Dispatch::Completed)
    }

    /// Schedule the one-shot deferred winner reveal. The token is
    /// installed under the state lock, so a `start_session()` either
    /// sees and cancels it or is ordered strictly before the schedule;
    /// the stale reveal can never survive a session change.
    fn schedule_reveal(&self, state: &mut SessionState, winner: Player) {
        let token = CancellationToken::new();
        if let Some(previous) = state.reveal_token.replace(token.clone()) {
            previous.cancel();
        }

        let reveal = Arc::clone(&self.reveal);
        let transcript = Arc::clone(&self.transcript);
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("winner reveal superseded before firing");
                }
                _ = tokio::time::sleep(WINNER_REVEAL_DELAY) => {
                    info!(%winner, "revealing winner");
                    transcript.log(TranscriptEvent::new(
                        "winner_revealed",
                        json!({ "winner": winner }),
                    ));
                    reveal.reveal(winner);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use duel_domain::{AnswerOutcome, GameStatus, Question, Scoreboard};
    use std::collections::VecDeque;
    use tokio::sync::Notify;
    use tokio::task::yield_now;

    // ==================== Test Mocks ====================

    struct MockChannel {
        responses: Mutex<VecDeque<Result<GameSnapshot, ChannelError>>>,
        calls: Mutex<Vec<(String, SessionId)>>,
        gate: Mutex<Option<Arc<Notify>>>,
    }

    impl MockChannel {
        fn new(responses: Vec<Result<GameSnapshot, ChannelError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(VecDeque::from(responses)),
                calls: Mutex::new(Vec::new()),
                gate: Mutex::new(None),
            })
        }

        /// Make subsequent calls block until the returned handle is
        /// notified.
        fn hold_next_calls(&self) -> Arc<Notify> {
            let gate = Arc::new(Notify::new());
            *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
            gate
        }

        fn release_gate(&self) {
            *self.gate.lock().unwrap() = None;
        }

        fn calls(&self) -> Vec<(String, SessionId)> {
            self.calls.lock().unwrap().clone()
        }

        fn queue(&self, response: Result<GameSnapshot, ChannelError>) {
            self.responses.lock().unwrap().push_back(response);
        }
    }

    #[async_trait]
    impl AgentChannel for MockChannel {
        async fn call(
            &self,
            instruction: &str,
            session: &SessionId,
        ) -> Result<GameSnapshot, ChannelError> {
            self.calls
                .lock()
                .unwrap()
                .push((instruction.to_string(), session.clone()));
            let gate = self.gate.lock().unwrap().clone();
            if let Some(gate) = gate {
                gate.notified().await;
            }
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Err(ChannelError::Transport("no scripted response".to_string()))
                })
        }
    }

    #[derive(Default)]
    struct RecordingReveal {
        revealed: Mutex<Vec<Player>>,
    }

    impl RecordingReveal {
        fn revealed(&self) -> Vec<Player> {
            self.revealed.lock().unwrap().clone()
        }
    }

    impl WinnerReveal for RecordingReveal {
        fn reveal(&self, winner: Player) {
            self.revealed.lock().unwrap().push(winner);
        }
    }

    #[derive(Default)]
    struct RecordingTranscript {
        events: Mutex<Vec<&'static str>>,
    }

    impl RecordingTranscript {
        fn event_types(&self) -> Vec<&'static str> {
            self.events.lock().unwrap().clone()
        }
    }

    impl TranscriptLogger for RecordingTranscript {
        fn log(&self, event: TranscriptEvent) {
            self.events.lock().unwrap().push(event.event_type);
        }
    }

    // ==================== Snapshot Builders ====================

    fn active_snapshot(turn: Player, question_text: &str) -> GameSnapshot {
        GameSnapshot {
            status: GameStatus::InProgress,
            round: 1,
            turn,
            question: Some(Question {
                text: question_text.to_string(),
                category: "Geography".to_string(),
            }),
            last_outcome: None,
            scores: Scoreboard::default(),
            leaderboard: Vec::new(),
            winner: None,
            message: format!("{turn} is up."),
        }
    }

    fn judged_snapshot(
        judged: Player,
        correct: bool,
        next_turn: Player,
        next_question: &str,
    ) -> GameSnapshot {
        let mut snapshot = active_snapshot(next_turn, next_question);
        snapshot.round = 2;
        snapshot.last_outcome = Some(AnswerOutcome {
            player: judged,
            answer_given: "Paris".to_string(),
            correct_answer: "Paris".to_string(),
            is_correct: correct,
            points_awarded: if correct { 10 } else { 0 },
        });
        snapshot.scores = Scoreboard {
            player1: if judged == Player::One && correct { 10 } else { 0 },
            player2: if judged == Player::Two && correct { 10 } else { 0 },
        };
        snapshot.message = if correct {
            "Correct! 10 points.".to_string()
        } else {
            "Incorrect, no points.".to_string()
        };
        snapshot
    }

    fn completed_snapshot(judged: Player, winner: Player) -> GameSnapshot {
        GameSnapshot {
            status: GameStatus::Completed,
            round: 10,
            turn: judged,
            question: None,
            last_outcome: Some(AnswerOutcome {
                player: judged,
                answer_given: "42".to_string(),
                correct_answer: "42".to_string(),
                is_correct: true,
                points_awarded: 10,
            }),
            scores: Scoreboard {
                player1: 40,
                player2: 50,
            },
            leaderboard: Vec::new(),
            winner: Some(winner),
            message: "Correct! Game over.".to_string(),
        }
    }

    /// Let spawned tasks (reveal timer, held calls) make progress.
    async fn settle() {
        for _ in 0..8 {
            yield_now().await;
        }
    }

    // ==================== Start / Routing ====================

    #[tokio::test]
    async fn start_routes_first_question_to_turn_player_only() {
        let channel = MockChannel::new(vec![Ok(active_snapshot(
            Player::One,
            "Capital of France?",
        ))]);
        let coordinator = SessionCoordinator::new(channel.clone());

        let dispatch = coordinator.start_session().await.unwrap();
        assert_eq!(dispatch, Dispatch::Completed);

        let view = coordinator.view();
        assert!(!view.busy);
        assert_eq!(
            view.logs.get(Player::One).events(),
            &[ConversationEvent::question("Capital of France?")]
        );
        assert!(view.logs.get(Player::Two).is_empty());
        assert_eq!(view.snapshot.unwrap().turn, Player::One);

        let calls = channel.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, START_INSTRUCTION);
        assert!(calls[0].1.as_str().starts_with("game-"));
    }

    #[tokio::test]
    async fn submit_routes_result_to_judged_player_and_question_to_next() {
        let channel = MockChannel::new(vec![
            Ok(active_snapshot(Player::One, "Capital of France?")),
            Ok(judged_snapshot(
                Player::One,
                true,
                Player::Two,
                "Largest ocean?",
            )),
        ]);
        let coordinator = SessionCoordinator::new(channel.clone());

        coordinator.start_session().await.unwrap();
        let dispatch = coordinator.submit_answer(Player::One, "Paris").await.unwrap();
        assert_eq!(dispatch, Dispatch::Completed);

        let view = coordinator.view();
        assert_eq!(
            view.logs.get(Player::One).events(),
            &[
                ConversationEvent::question("Capital of France?"),
                ConversationEvent::submitted_answer("Paris"),
                ConversationEvent::result("Correct! 10 points.", true),
            ]
        );
        assert_eq!(
            view.logs.get(Player::Two).events(),
            &[ConversationEvent::question("Largest ocean?")]
        );
        assert_eq!(channel.calls()[1].0, "Player 1: Paris");
    }

    #[tokio::test]
    async fn log_ordering_holds_across_rounds() {
        let channel = MockChannel::new(vec![
            Ok(active_snapshot(Player::One, "Q1")),
            Ok(judged_snapshot(Player::One, true, Player::Two, "Q2")),
            Ok(judged_snapshot(Player::Two, false, Player::One, "Q3")),
        ]);
        let coordinator = SessionCoordinator::new(channel);

        coordinator.start_session().await.unwrap();
        coordinator.submit_answer(Player::One, "a1").await.unwrap();
        coordinator.submit_answer(Player::Two, "a2").await.unwrap();

        let view = coordinator.view();
        assert_eq!(
            view.logs.get(Player::One).events(),
            &[
                ConversationEvent::question("Q1"),
                ConversationEvent::submitted_answer("a1"),
                ConversationEvent::result("Correct! 10 points.", true),
                ConversationEvent::question("Q3"),
            ]
        );
        assert_eq!(
            view.logs.get(Player::Two).events(),
            &[
                ConversationEvent::question("Q2"),
                ConversationEvent::submitted_answer("a2"),
                ConversationEvent::result("Incorrect, no points.", false),
            ]
        );
    }

    #[tokio::test]
    async fn answer_text_is_trimmed_before_sending() {
        let channel = MockChannel::new(vec![
            Ok(active_snapshot(Player::One, "Q1")),
            Ok(judged_snapshot(Player::One, true, Player::Two, "Q2")),
        ]);
        let coordinator = SessionCoordinator::new(channel.clone());

        coordinator.start_session().await.unwrap();
        coordinator
            .submit_answer(Player::One, "  Paris  ")
            .await
            .unwrap();

        assert_eq!(channel.calls()[1].0, "Player 1: Paris");
        let view = coordinator.view();
        assert_eq!(
            view.logs.get(Player::One).events()[1],
            ConversationEvent::submitted_answer("Paris")
        );
    }

    // ==================== Gating ====================

    #[tokio::test]
    async fn calls_are_refused_while_one_is_in_flight() {
        let channel = MockChannel::new(vec![Ok(active_snapshot(Player::One, "Q1"))]);
        let coordinator = Arc::new(SessionCoordinator::new(channel.clone()));
        coordinator.start_session().await.unwrap();

        let gate = channel.hold_next_calls();
        channel.queue(Ok(judged_snapshot(Player::One, true, Player::Two, "Q2")));

        let in_flight = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.submit_answer(Player::One, "Paris").await })
        };
        while !coordinator.view().busy {
            yield_now().await;
        }

        // Second submit and a start are both refused, with no extra
        // agent call and no log change.
        let logs_before = coordinator.view().logs;
        assert_eq!(
            coordinator
                .submit_answer(Player::One, "again")
                .await
                .unwrap(),
            Dispatch::Refused
        );
        assert_eq!(
            coordinator.start_session().await.unwrap(),
            Dispatch::Refused
        );
        assert_eq!(channel.calls().len(), 2);
        assert_eq!(coordinator.view().logs, logs_before);

        channel.release_gate();
        gate.notify_one();
        let dispatch = in_flight.await.unwrap().unwrap();
        assert_eq!(dispatch, Dispatch::Completed);
        assert!(!coordinator.view().busy);
    }

    #[tokio::test]
    async fn submit_preconditions_are_refused_without_a_call() {
        let channel = MockChannel::new(vec![Ok(active_snapshot(Player::One, "Q1"))]);
        let coordinator = SessionCoordinator::new(channel.clone());

        // No session yet.
        assert_eq!(
            coordinator.submit_answer(Player::One, "Paris").await.unwrap(),
            Dispatch::Refused
        );

        coordinator.start_session().await.unwrap();

        // Not this player's turn.
        assert_eq!(
            coordinator.submit_answer(Player::Two, "Paris").await.unwrap(),
            Dispatch::Refused
        );
        // Empty after trimming.
        assert_eq!(
            coordinator.submit_answer(Player::One, "   ").await.unwrap(),
            Dispatch::Refused
        );

        assert_eq!(channel.calls().len(), 1);
        let view = coordinator.view();
        assert_eq!(view.logs.get(Player::One).len(), 1);
        assert!(view.logs.get(Player::Two).is_empty());
    }

    #[tokio::test]
    async fn completed_game_is_terminal_until_new_session() {
        let channel = MockChannel::new(vec![
            Ok(active_snapshot(Player::Two, "Final question")),
            Ok(completed_snapshot(Player::Two, Player::Two)),
        ]);
        let coordinator = SessionCoordinator::new(channel.clone());

        coordinator.start_session().await.unwrap();
        coordinator.submit_answer(Player::Two, "42").await.unwrap();

        assert_eq!(
            coordinator.submit_answer(Player::Two, "more").await.unwrap(),
            Dispatch::Refused
        );
        assert_eq!(
            coordinator.submit_answer(Player::One, "more").await.unwrap(),
            Dispatch::Refused
        );
        assert_eq!(channel.calls().len(), 2);

        channel.queue(Ok(active_snapshot(Player::One, "Fresh Q")));
        assert_eq!(
            coordinator.start_session().await.unwrap(),
            Dispatch::Completed
        );
    }

    // ==================== Failure Paths ====================

    #[tokio::test]
    async fn failed_submit_keeps_state_and_optimistic_entry() {
        let channel = MockChannel::new(vec![
            Ok(active_snapshot(Player::One, "Q1")),
            Err(ChannelError::Transport("connection reset".to_string())),
        ]);
        let coordinator = SessionCoordinator::new(channel.clone());

        coordinator.start_session().await.unwrap();
        let before = coordinator.view().snapshot.unwrap();

        let result = coordinator.submit_answer(Player::One, "Paris").await;
        assert!(matches!(
            result,
            Err(SessionError::Channel(ChannelError::Transport(_)))
        ));

        let view = coordinator.view();
        assert!(!view.busy);
        assert_eq!(view.snapshot.unwrap(), before);
        // The optimistic entry is not retracted.
        assert_eq!(
            view.logs.get(Player::One).last(),
            Some(&ConversationEvent::submitted_answer("Paris"))
        );

        // A retry goes through.
        channel.queue(Ok(judged_snapshot(Player::One, true, Player::Two, "Q2")));
        assert_eq!(
            coordinator.submit_answer(Player::One, "Paris").await.unwrap(),
            Dispatch::Completed
        );
    }

    #[tokio::test]
    async fn failed_start_leaves_session_startable() {
        let channel = MockChannel::new(vec![
            Err(ChannelError::AgentStatus("error".to_string())),
            Ok(active_snapshot(Player::One, "Q1")),
        ]);
        let coordinator = SessionCoordinator::new(channel.clone());

        assert!(coordinator.start_session().await.is_err());
        let view = coordinator.view();
        assert!(!view.busy);
        assert!(view.snapshot.is_none());

        assert_eq!(
            coordinator.start_session().await.unwrap(),
            Dispatch::Completed
        );
        assert!(coordinator.view().snapshot.is_some());
    }

    #[tokio::test]
    async fn restart_clears_logs_and_mints_new_identity() {
        let channel = MockChannel::new(vec![
            Ok(active_snapshot(Player::One, "Q1")),
            Ok(judged_snapshot(Player::One, true, Player::Two, "Q2")),
            Ok(active_snapshot(Player::Two, "Fresh Q")),
        ]);
        let coordinator = SessionCoordinator::new(channel.clone());

        coordinator.start_session().await.unwrap();
        coordinator.submit_answer(Player::One, "a").await.unwrap();
        let first_id = coordinator.view().session_id;

        coordinator.start_session().await.unwrap();
        let view = coordinator.view();
        assert_ne!(view.session_id, first_id);
        assert!(view.logs.get(Player::One).is_empty());
        assert_eq!(
            view.logs.get(Player::Two).events(),
            &[ConversationEvent::question("Fresh Q")]
        );
        // Every call after the restart carries the new identity.
        assert_eq!(channel.calls()[2].1, view.session_id);
    }

    #[tokio::test]
    async fn back_to_back_restarts_never_reuse_an_identity() {
        let channel = MockChannel::new(vec![]);
        let coordinator = SessionCoordinator::new(channel.clone());

        for _ in 0..4 {
            channel.queue(Ok(active_snapshot(Player::One, "Q")));
            coordinator.start_session().await.unwrap();
        }

        let ids: std::collections::HashSet<SessionId> =
            channel.calls().into_iter().map(|(_, id)| id).collect();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn minted_ids_are_distinct_within_one_millisecond() {
        let ids: std::collections::HashSet<SessionId> =
            (0..64).map(|_| mint_session_id()).collect();
        assert_eq!(ids.len(), 64);
        for id in &ids {
            assert!(id.as_str().starts_with("game-"));
        }
    }

    // ==================== Winner Reveal ====================

    #[tokio::test(start_paused = true)]
    async fn winner_reveal_fires_only_after_grace_delay() {
        let channel = MockChannel::new(vec![
            Ok(active_snapshot(Player::Two, "Final question")),
            Ok(completed_snapshot(Player::Two, Player::Two)),
        ]);
        let reveal = Arc::new(RecordingReveal::default());
        let coordinator = SessionCoordinator::new(channel)
            .with_winner_reveal(reveal.clone() as Arc<dyn WinnerReveal>);

        coordinator.start_session().await.unwrap();
        coordinator.submit_answer(Player::Two, "42").await.unwrap();
        settle().await;
        assert!(reveal.revealed().is_empty());

        tokio::time::advance(Duration::from_millis(999)).await;
        settle().await;
        assert!(reveal.revealed().is_empty());

        tokio::time::advance(Duration::from_millis(2)).await;
        settle().await;
        assert_eq!(reveal.revealed(), vec![Player::Two]);
    }

    #[tokio::test(start_paused = true)]
    async fn winner_reveal_is_cancelled_by_new_session() {
        let channel = MockChannel::new(vec![
            Ok(active_snapshot(Player::Two, "Final question")),
            Ok(completed_snapshot(Player::Two, Player::Two)),
            Ok(active_snapshot(Player::One, "Fresh Q")),
        ]);
        let reveal = Arc::new(RecordingReveal::default());
        let coordinator = SessionCoordinator::new(channel)
            .with_winner_reveal(reveal.clone() as Arc<dyn WinnerReveal>);

        coordinator.start_session().await.unwrap();
        coordinator.submit_answer(Player::Two, "42").await.unwrap();
        settle().await;

        // New session before the delay elapses: the reveal never fires.
        coordinator.start_session().await.unwrap();
        tokio::time::advance(Duration::from_secs(5)).await;
        settle().await;
        assert!(reveal.revealed().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_reveal_cannot_fire_while_a_new_start_is_in_flight() {
        let channel = MockChannel::new(vec![
            Ok(active_snapshot(Player::Two, "Final question")),
            Ok(completed_snapshot(Player::Two, Player::Two)),
        ]);
        let reveal = Arc::new(RecordingReveal::default());
        let coordinator = Arc::new(
            SessionCoordinator::new(channel.clone())
                .with_winner_reveal(reveal.clone() as Arc<dyn WinnerReveal>),
        );

        coordinator.start_session().await.unwrap();
        coordinator.submit_answer(Player::Two, "42").await.unwrap();
        settle().await;

        // The old game's reveal is pending. Start a new session and
        // hold its agent call open across the whole grace window: the
        // token is cancelled on entry, so the old winner must not be
        // announced into the new session.
        let gate = channel.hold_next_calls();
        channel.queue(Ok(active_snapshot(Player::One, "Fresh Q")));
        let in_flight = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.start_session().await })
        };
        while !coordinator.view().busy {
            yield_now().await;
        }
        settle().await;

        tokio::time::advance(Duration::from_secs(5)).await;
        settle().await;
        assert!(reveal.revealed().is_empty());

        channel.release_gate();
        gate.notify_one();
        assert_eq!(in_flight.await.unwrap().unwrap(), Dispatch::Completed);
        settle().await;
        assert!(reveal.revealed().is_empty());
    }

    // ==================== Transcript ====================

    #[tokio::test(start_paused = true)]
    async fn transcript_records_session_lifecycle() {
        let channel = MockChannel::new(vec![
            Ok(active_snapshot(Player::One, "Q1")),
            Ok(completed_snapshot(Player::One, Player::One)),
        ]);
        let transcript = Arc::new(RecordingTranscript::default());
        let coordinator = SessionCoordinator::new(channel)
            .with_transcript_logger(transcript.clone() as Arc<dyn TranscriptLogger>);

        coordinator.start_session().await.unwrap();
        coordinator.submit_answer(Player::One, "42").await.unwrap();
        settle().await;
        tokio::time::advance(Duration::from_millis(1100)).await;
        settle().await;

        assert_eq!(
            transcript.event_types(),
            vec![
                "session_started",
                "question_presented",
                "answer_submitted",
                "answer_judged",
                "game_completed",
                "winner_revealed",
            ]
        );
    }
}
