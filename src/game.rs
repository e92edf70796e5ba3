//! Session controller.
//!
//! Owns the board for the current level, the score / hint / quiz counters,
//! the daily streak, the transaction gate status and every deferred task.
//! The flow for one level is
//!
//! ```text
//! Lesson -> Board -(all matched)-> Quiz -(correct)-> TransactionGate -(paid|skip)-> Lesson[next] | Complete
//!                                    \-(wrong)-> Board[same level, fresh deck]
//! ```
//!
//! Delays (match / mismatch resolution, hint hide, post-payment advance) are
//! scheduled through a [`Scheduler`]; the controller remembers what each
//! [`TimerId`] means and applies it in [`Game::fire`]. Every mutation is
//! mirrored to the [`KeyValueStore`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::board::{Board, Card, PairKey, Selection};
use crate::checkin::Streak;
use crate::config::GameConfig;
use crate::levels::{self, FIRST_LEVEL, LAST_LEVEL, LevelDefinition};
use crate::storage::{KeyValueStore, SavedProgress, Theme};
use crate::timers::{Scheduler, TimerId, VirtualTimers};
use crate::wallet::{TxRequest, TxStatus, WalletError, WalletStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Lesson,
    Board,
    Quiz,
    TransactionGate,
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Task {
    ResolvePair {
        first: usize,
        second: usize,
        matched: bool,
    },
    HideHint(PairKey),
    AdvanceAfterPayment,
}

/// What the host should do after the player pressed "pay and continue".
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentAction {
    /// Nothing to do: not at the gate, or a submission is already in flight.
    None,
    /// No wallet yet; ask the host to connect one.
    Connect,
    /// Submit this transaction and report back through [`Game::transaction_settled`].
    Send(TxRequest),
}

pub struct Game<S: Scheduler> {
    config: GameConfig,
    store: Box<dyn KeyValueStore>,
    scheduler: S,
    rng: StdRng,
    level: u8,
    board: Board,
    phase: Phase,
    score: u64,
    hints: u32,
    quizzes_solved: u32,
    theme: Theme,
    streak: Streak,
    tx: TxStatus,
    wallet: WalletStatus,
    tasks: BTreeMap<TimerId, Task>,
    next_timer: u32,
    disposed: bool,
}

impl<S: Scheduler> Game<S> {
    /// Start a session from whatever progress `store` holds.
    pub fn new(
        config: GameConfig,
        store: Box<dyn KeyValueStore>,
        scheduler: S,
        mut rng: StdRng,
        today: NaiveDate,
    ) -> Self {
        let saved = SavedProgress::load(store.as_ref(), config.starting_hints);
        let streak = Streak::evaluate(saved.streak, saved.last_check_in, today);
        let board = Board::build(&levels::level_or_clamped(saved.level).pairs, &mut rng);
        let mut game = Self {
            config,
            store,
            scheduler,
            rng,
            level: saved.level,
            board,
            phase: Phase::Lesson,
            score: saved.score,
            hints: saved.hints,
            quizzes_solved: saved.quizzes_solved,
            theme: saved.theme,
            streak,
            tx: TxStatus::Idle,
            wallet: WalletStatus::default(),
            tasks: BTreeMap::new(),
            next_timer: 0,
            disposed: false,
        };
        if streak.count != saved.streak {
            log::info!("streak lapsed (last check-in {:?})", saved.last_check_in);
            game.persist();
        }
        log::info!(
            "session started at level {} (score {}, hints {})",
            game.level,
            game.score,
            game.hints
        );
        game
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn level_definition(&self) -> &'static LevelDefinition {
        levels::level_or_clamped(self.level)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn hints(&self) -> u32 {
        self.hints
    }

    pub fn quizzes_solved(&self) -> u32 {
        self.quizzes_solved
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn streak(&self) -> &Streak {
        &self.streak
    }

    pub fn tx_status(&self) -> &TxStatus {
        &self.tx
    }

    pub fn wallet(&self) -> &WalletStatus {
        &self.wallet
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Number of deferred tasks not yet fired or cancelled.
    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    // --- Lesson ---------------------------------------------------------------

    pub fn dismiss_lesson(&mut self) -> bool {
        if self.disposed || self.phase != Phase::Lesson {
            return false;
        }
        self.phase = Phase::Board;
        true
    }

    pub fn show_lesson(&mut self) -> bool {
        if self.disposed || self.phase != Phase::Board || self.board.has_pending() {
            return false;
        }
        self.phase = Phase::Lesson;
        true
    }

    // --- Board ----------------------------------------------------------------

    pub fn select_card(&mut self, index: usize) -> Selection {
        if self.disposed || self.phase != Phase::Board {
            return Selection::Ignored;
        }
        let outcome = self.board.select(index);
        if let Selection::Complete {
            first,
            second,
            matched,
        } = outcome
        {
            let delay = if matched {
                self.config.match_delay_ms
            } else {
                self.config.mismatch_delay_ms(self.level)
            };
            log::debug!("cards {first}/{second} face up, matched={matched}, resolving in {delay}ms");
            self.schedule(
                Task::ResolvePair {
                    first,
                    second,
                    matched,
                },
                delay,
            );
        }
        outcome
    }

    /// Reveal one unmatched pair for a moment. Costs a hint up front.
    pub fn use_hint(&mut self) -> bool {
        if self.disposed || self.phase != Phase::Board {
            return false;
        }
        if self.hints == 0 || self.board.has_pending() {
            return false;
        }
        let Some(key) = self.board.hint_target() else {
            return false;
        };
        self.hints -= 1;
        self.board.reveal_pair(key);
        self.schedule(Task::HideHint(key), self.config.hint_reveal_ms);
        self.persist();
        log::debug!("hint used on pair {key}, {} left", self.hints);
        true
    }

    // --- Timers ---------------------------------------------------------------

    /// Apply the task behind `id`. Unknown, cancelled, or post-dispose ids are ignored.
    pub fn fire(&mut self, id: TimerId) {
        if self.disposed {
            return;
        }
        let Some(task) = self.tasks.remove(&id) else {
            return;
        };
        self.scheduler.completed(id);
        log::debug!("timer {id:?} fired: {task:?}");
        match task {
            Task::ResolvePair {
                first,
                second,
                matched: true,
            } => {
                if self.board.resolve_match(first, second) {
                    self.award(self.config.match_points_per_level.saturating_mul(self.level as u64));
                    if self.board.all_matched() && self.phase == Phase::Board {
                        log::info!("level {} board cleared", self.level);
                        self.phase = Phase::Quiz;
                    }
                    self.persist();
                }
            }
            Task::ResolvePair {
                first,
                second,
                matched: false,
            } => {
                self.board.resolve_mismatch(first, second);
            }
            Task::HideHint(key) => self.board.hide_pair(key),
            Task::AdvanceAfterPayment => self.advance_level(),
        }
    }

    // --- Quiz -----------------------------------------------------------------

    /// Returns `None` when no quiz is open, otherwise whether `choice` was right.
    pub fn answer_quiz(&mut self, choice: usize) -> Option<bool> {
        if self.disposed || self.phase != Phase::Quiz {
            return None;
        }
        let quiz = &self.level_definition().quiz;
        if quiz.is_correct(choice) {
            self.quizzes_solved = self.quizzes_solved.saturating_add(1);
            self.award(self.config.quiz_points_per_level.saturating_mul(self.level as u64));
            // A zero interval disables bonus hints.
            if self.quizzes_solved.checked_rem(self.config.bonus_hints_every) == Some(0) {
                self.hints = self.hints.saturating_add(self.config.bonus_hints);
                log::info!("{} quizzes solved, +{} hints", self.quizzes_solved, self.config.bonus_hints);
            }
            self.tx = TxStatus::Idle;
            self.phase = Phase::TransactionGate;
            self.persist();
            log::info!("level {} quiz solved", self.level);
            Some(true)
        } else {
            log::info!("level {} quiz missed, reshuffling board", self.level);
            self.rebuild_board(Phase::Board);
            Some(false)
        }
    }

    // --- Transaction gate -----------------------------------------------------

    pub fn set_wallet_connected(&mut self, address: impl Into<String>) {
        self.wallet.address = Some(address.into());
    }

    pub fn set_wallet_disconnected(&mut self) {
        self.wallet.address = None;
    }

    pub fn pay_and_continue(&mut self) -> PaymentAction {
        if self.disposed || self.phase != Phase::TransactionGate {
            return PaymentAction::None;
        }
        if matches!(self.tx, TxStatus::Loading | TxStatus::Success(_)) {
            return PaymentAction::None;
        }
        if !self.wallet.is_connected() {
            return PaymentAction::Connect;
        }
        self.tx = TxStatus::Loading;
        PaymentAction::Send(TxRequest::from_config(&self.config))
    }

    /// Outcome of the submission started by [`Game::pay_and_continue`].
    pub fn transaction_settled(&mut self, result: Result<String, WalletError>) {
        if self.disposed || !self.tx.is_loading() {
            log::debug!("ignoring stale transaction result");
            return;
        }
        match result {
            Ok(hash) => {
                log::info!("transaction confirmed: {hash}");
                self.tx = TxStatus::Success(hash);
                self.award(self.config.payment_bonus);
                self.persist();
                self.schedule(Task::AdvanceAfterPayment, self.config.payment_advance_ms);
            }
            Err(e) => {
                log::warn!("transaction failed: {e}");
                self.tx = TxStatus::Error(e.to_string());
            }
        }
    }

    pub fn skip_transaction(&mut self) -> bool {
        if self.disposed || self.phase != Phase::TransactionGate {
            return false;
        }
        if matches!(self.tx, TxStatus::Loading | TxStatus::Success(_)) {
            return false;
        }
        log::info!("transaction skipped at level {}", self.level);
        self.advance_level();
        true
    }

    fn advance_level(&mut self) {
        self.tx = TxStatus::Idle;
        if self.level < LAST_LEVEL {
            self.level += 1;
            log::info!("advancing to level {}", self.level);
            self.rebuild_board(Phase::Lesson);
        } else {
            log::info!("final level cleared, game complete");
            self.cancel_all();
            self.phase = Phase::Complete;
        }
        self.persist();
    }

    /// Back to level 1 from the completion screen. Score, hints and streak carry over.
    pub fn restart(&mut self) -> bool {
        if self.disposed || self.phase != Phase::Complete {
            return false;
        }
        self.level = FIRST_LEVEL;
        self.tx = TxStatus::Idle;
        self.rebuild_board(Phase::Lesson);
        self.persist();
        log::info!("restarted from level {FIRST_LEVEL}");
        true
    }

    // --- Daily check-in / theme -----------------------------------------------

    /// Re-evaluate check-in availability, e.g. when the session crosses midnight.
    pub fn refresh_day(&mut self, today: NaiveDate) {
        let before = self.streak;
        self.streak = Streak::evaluate(before.count, before.last_check_in, today);
        if self.streak != before {
            self.persist();
        }
    }

    pub fn check_in(&mut self, today: NaiveDate) -> bool {
        if self.disposed {
            return false;
        }
        self.refresh_day(today);
        if !self.streak.check_in(today) {
            return false;
        }
        self.award(self.config.check_in_bonus);
        self.hints = self.hints.saturating_add(1);
        self.persist();
        log::info!("checked in, streak {}", self.streak.count);
        true
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.persist();
        self.theme
    }

    /// Cancel every pending timer; the session ignores all further input.
    pub fn dispose(&mut self) {
        self.cancel_all();
        self.disposed = true;
    }

    // --- Internals --------------------------------------------------------------

    fn award(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    fn rebuild_board(&mut self, phase: Phase) {
        // Pending tasks refer to indices on the old deck.
        self.cancel_all();
        self.board = Board::build(&self.level_definition().pairs, &mut self.rng);
        self.phase = phase;
    }

    fn schedule(&mut self, task: Task, delay_ms: u32) {
        let id = TimerId(self.next_timer);
        self.next_timer = self.next_timer.wrapping_add(1);
        self.tasks.insert(id, task);
        if !self.scheduler.schedule(id, delay_ms) {
            log::warn!("could not defer {task:?}, applying now");
            self.fire(id);
        }
    }

    fn cancel_all(&mut self) {
        for id in std::mem::take(&mut self.tasks).into_keys() {
            self.scheduler.cancel(id);
        }
    }

    fn persist(&mut self) {
        let progress = SavedProgress {
            level: self.level,
            score: self.score,
            hints: self.hints,
            quizzes_solved: self.quizzes_solved,
            theme: self.theme,
            streak: self.streak.count,
            last_check_in: self.streak.last_check_in,
        };
        progress.save(self.store.as_mut());
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let lvl = self.level_definition();
        GameSnapshot {
            level: self.level,
            last_level: LAST_LEVEL,
            level_theme: lvl.theme.clone(),
            lesson: lvl.lesson.clone(),
            cards: self.board.cards().to_vec(),
            pending: self.board.pending().to_vec(),
            matched_pairs: self.board.matched_pairs(),
            total_pairs: lvl.pairs.len(),
            score: self.score,
            hints: self.hints,
            quizzes_solved: self.quizzes_solved,
            theme: self.theme,
            streak: self.streak.count,
            check_in_available: self.streak.available,
            phase: self.phase,
            show_lesson: self.phase == Phase::Lesson,
            show_quiz: self.phase == Phase::Quiz,
            show_transaction: self.phase == Phase::TransactionGate,
            show_complete: self.phase == Phase::Complete,
            quiz: (self.phase == Phase::Quiz).then(|| QuizView {
                question: lvl.quiz.question.clone(),
                options: lvl.quiz.options.clone(),
            }),
            tx: self.tx.clone(),
            tx_hash: self.tx.hash().map(str::to_string),
            wallet_connected: self.wallet.is_connected(),
            wallet_display: self.wallet.display(),
        }
    }
}

impl Game<VirtualTimers> {
    /// Move the virtual clock forward `ms`, firing everything that falls due,
    /// including tasks scheduled by tasks fired along the way.
    pub fn advance_time(&mut self, ms: u64) {
        let until = self.scheduler.now_ms() + ms;
        while let Some(id) = self.scheduler.pop_due(until) {
            self.fire(id);
        }
        self.scheduler.set_now(until);
    }
}

/// Question and options without the answer, for rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuizView {
    pub question: String,
    pub options: Vec<String>,
}

/// Everything a presentation layer needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub level: u8,
    pub last_level: u8,
    pub level_theme: String,
    pub lesson: String,
    pub cards: Vec<Card>,
    pub pending: Vec<usize>,
    pub matched_pairs: usize,
    pub total_pairs: usize,
    pub score: u64,
    pub hints: u32,
    pub quizzes_solved: u32,
    pub theme: Theme,
    pub streak: u32,
    pub check_in_available: bool,
    pub phase: Phase,
    pub show_lesson: bool,
    pub show_quiz: bool,
    pub show_transaction: bool,
    pub show_complete: bool,
    pub quiz: Option<QuizView>,
    pub tx: TxStatus,
    pub tx_hash: Option<String>,
    pub wallet_connected: bool,
    pub wallet_display: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{
        KEY_HINTS, KEY_LAST_CHECK_IN, KEY_LEVEL, KEY_QUIZZES, KEY_SCORE, KEY_STREAK, MemoryStore,
    };
    use rand::SeedableRng;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, d).unwrap()
    }

    fn game_with(store: MemoryStore) -> Game<VirtualTimers> {
        Game::new(
            GameConfig::default(),
            Box::new(store),
            VirtualTimers::new(),
            StdRng::seed_from_u64(42),
            day(15),
        )
    }

    fn game() -> Game<VirtualTimers> {
        let mut g = game_with(MemoryStore::new());
        g.dismiss_lesson();
        g
    }

    fn pair_indices(g: &Game<VirtualTimers>, key: PairKey) -> (usize, usize) {
        let idx: Vec<usize> = g
            .board()
            .cards()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.pair_key == key)
            .map(|(i, _)| i)
            .collect();
        (idx[0], idx[1])
    }

    fn clear_board(g: &mut Game<VirtualTimers>) {
        for key in 0..g.level_definition().pairs.len() {
            let (a, b) = pair_indices(g, key);
            g.select_card(a);
            g.select_card(b);
            let delay = g.config().match_delay_ms as u64;
            g.advance_time(delay);
        }
    }

    #[test]
    fn test_starts_in_lesson_and_blocks_board_input() {
        let mut g = game_with(MemoryStore::new());
        assert_eq!(g.phase(), Phase::Lesson);
        assert_eq!(g.select_card(0), Selection::Ignored);
        assert!(!g.use_hint());
        assert!(g.dismiss_lesson());
        assert_eq!(g.phase(), Phase::Board);
    }

    #[test]
    fn test_match_resolves_after_delay() {
        let mut g = game();
        let (a, b) = pair_indices(&g, 0);
        g.select_card(a);
        g.select_card(b);
        g.advance_time(199);
        assert!(!g.board().cards()[a].matched);
        g.advance_time(1);
        assert!(g.board().cards()[a].matched);
        assert_eq!(g.score(), 30);
    }

    #[test]
    fn test_mismatch_uses_level_delay() {
        let mut g = game();
        let (a, _) = pair_indices(&g, 0);
        let (c, _) = pair_indices(&g, 1);
        g.select_card(a);
        g.select_card(c);
        g.advance_time(959);
        assert!(g.board().cards()[a].flipped);
        g.advance_time(1);
        assert!(!g.board().cards()[a].flipped);
        assert!(!g.board().has_pending());
        assert_eq!(g.score(), 0);
    }

    #[test]
    fn test_hint_consumes_and_hides() {
        let mut g = game();
        assert!(g.use_hint());
        assert_eq!(g.hints(), 2);
        let key = g.board().cards()[0].pair_key;
        let (a, b) = pair_indices(&g, key);
        assert!(g.board().cards()[a].flipped && g.board().cards()[b].flipped);
        g.advance_time(1_200);
        assert!(!g.board().cards()[a].flipped && !g.board().cards()[b].flipped);
    }

    #[test]
    fn test_hint_blocked_while_selection_pending_or_empty() {
        let mut g = game();
        g.select_card(0);
        assert!(!g.use_hint());
        assert_eq!(g.hints(), 3);

        let store = MemoryStore::with_values([(KEY_HINTS, "0")]);
        let mut g = game_with(store);
        g.dismiss_lesson();
        assert!(!g.use_hint());
        assert_eq!(g.hints(), 0);
    }

    #[test]
    fn test_quiz_opens_once_board_cleared() {
        let mut g = game();
        clear_board(&mut g);
        assert_eq!(g.phase(), Phase::Quiz);
        assert_eq!(g.score(), 120);
        assert!(g.snapshot().quiz.is_some());
    }

    #[test]
    fn test_fifth_quiz_grants_bonus_hints() {
        let store = MemoryStore::with_values([(KEY_QUIZZES, "4")]);
        let mut g = game_with(store);
        g.dismiss_lesson();
        clear_board(&mut g);
        let answer = g.level_definition().quiz.answer;
        assert_eq!(g.answer_quiz(answer), Some(true));
        assert_eq!(g.quizzes_solved(), 5);
        assert_eq!(g.hints(), 5);
    }

    #[test]
    fn test_payment_requires_wallet_then_sends_once() {
        let mut g = game();
        clear_board(&mut g);
        let answer = g.level_definition().quiz.answer;
        g.answer_quiz(answer);
        assert_eq!(g.pay_and_continue(), PaymentAction::Connect);
        g.set_wallet_connected("0x71C7656EC7ab88b098defB751B7401B5f6d8976F");
        assert!(matches!(g.pay_and_continue(), PaymentAction::Send(_)));
        assert_eq!(g.pay_and_continue(), PaymentAction::None);
        assert!(!g.skip_transaction());
    }

    #[test]
    fn test_payment_success_awards_bonus_and_advances_later() {
        let mut g = game();
        clear_board(&mut g);
        let answer = g.level_definition().quiz.answer;
        g.answer_quiz(answer);
        g.set_wallet_connected("0xabc");
        g.pay_and_continue();
        let before = g.score();
        g.transaction_settled(Ok("0xfeed".into()));
        assert_eq!(g.score(), before + 1_000);
        assert_eq!(g.tx_status().hash(), Some("0xfeed"));
        assert_eq!(g.level(), 1);
        g.advance_time(2_000);
        assert_eq!(g.level(), 2);
        assert_eq!(g.phase(), Phase::Lesson);
        assert_eq!(g.tx_status(), &TxStatus::Idle);
    }

    #[test]
    fn test_payment_failure_allows_retry_or_skip() {
        let mut g = game();
        clear_board(&mut g);
        let answer = g.level_definition().quiz.answer;
        g.answer_quiz(answer);
        g.set_wallet_connected("0xabc");
        g.pay_and_continue();
        let before = g.score();
        g.transaction_settled(Err(WalletError::Rejected("user denied".into())));
        assert!(matches!(g.tx_status(), TxStatus::Error(_)));
        assert_eq!(g.score(), before);
        assert!(matches!(g.pay_and_continue(), PaymentAction::Send(_)));
        g.transaction_settled(Err(WalletError::Rejected("again".into())));
        assert!(g.skip_transaction());
        assert_eq!(g.level(), 2);
    }

    #[test]
    fn test_stale_settlement_ignored() {
        let mut g = game();
        g.transaction_settled(Ok("0xfeed".into()));
        assert_eq!(g.score(), 0);
        assert_eq!(g.tx_status(), &TxStatus::Idle);
    }

    #[test]
    fn test_final_level_completes_without_increment() {
        let store = MemoryStore::with_values([(KEY_LEVEL, "20")]);
        let mut g = game_with(store);
        g.dismiss_lesson();
        clear_board(&mut g);
        let answer = g.level_definition().quiz.answer;
        g.answer_quiz(answer);
        assert!(g.skip_transaction());
        assert_eq!(g.phase(), Phase::Complete);
        assert_eq!(g.level(), 20);
        let score = g.score();
        assert!(g.restart());
        assert_eq!(g.level(), 1);
        assert_eq!(g.score(), score);
        assert_eq!(g.phase(), Phase::Lesson);
    }

    #[test]
    fn test_dispose_cancels_pending_timers() {
        let mut g = game();
        let (a, b) = pair_indices(&g, 0);
        g.select_card(a);
        g.select_card(b);
        assert_eq!(g.pending_tasks(), 1);
        g.dispose();
        assert_eq!(g.pending_tasks(), 0);
        assert_eq!(g.scheduler().pending(), 0);
        g.advance_time(5_000);
        assert!(!g.board().cards()[a].matched);
        assert_eq!(g.score(), 0);
    }

    #[test]
    fn test_progress_is_persisted_across_sessions() {
        let mut g = game();
        let (a, b) = pair_indices(&g, 0);
        g.select_card(a);
        g.select_card(b);
        g.advance_time(200);
        g.toggle_theme();
        let copy = MemoryStore::copy_from(g.store());
        assert_eq!(copy.get(KEY_SCORE).as_deref(), Some("30"));
        let g2 = game_with(copy);
        assert_eq!(g2.score(), 30);
        assert_eq!(g2.theme(), Theme::Light);
    }

    #[test]
    fn test_lapsed_streak_reset_on_start() {
        let store = MemoryStore::with_values([(KEY_STREAK, "6"), (KEY_LAST_CHECK_IN, "2026-06-10")]);
        let g = game_with(store);
        assert_eq!(g.streak().count, 0);
        assert!(g.streak().available);
    }

    #[test]
    fn test_check_in_rewards_once_per_day() {
        let mut g = game();
        assert!(g.check_in(day(15)));
        assert_eq!(g.score(), 500);
        assert_eq!(g.hints(), 4);
        assert!(!g.check_in(day(15)));
        assert_eq!(g.streak().count, 1);
        assert_eq!(g.score(), 500);
        assert!(g.check_in(day(16)));
        assert_eq!(g.streak().count, 2);
    }

    #[test]
    fn test_show_lesson_round_trip_from_board() {
        let mut g = game();
        assert!(g.show_lesson());
        assert_eq!(g.phase(), Phase::Lesson);
        assert!(g.snapshot().show_lesson);
        assert_eq!(g.select_card(0), Selection::Ignored);
        assert!(!g.show_lesson());
        assert!(g.dismiss_lesson());
        assert_eq!(g.phase(), Phase::Board);
    }

    #[test]
    fn test_show_lesson_refused_while_card_pending() {
        let mut g = game();
        g.select_card(0);
        assert!(!g.show_lesson());
        assert_eq!(g.phase(), Phase::Board);
    }

    #[test]
    fn test_hint_still_hides_while_lesson_open() {
        let mut g = game();
        assert!(g.use_hint());
        let key = g.board().cards()[0].pair_key;
        let (a, b) = pair_indices(&g, key);
        assert!(g.show_lesson());
        g.advance_time(1_200);
        assert!(!g.board().cards()[a].flipped && !g.board().cards()[b].flipped);
        assert_eq!(g.pending_tasks(), 0);
        assert!(g.dismiss_lesson());
        assert_eq!(g.hints(), 2);
    }

    #[test]
    fn test_rebuild_cancels_pending_hint() {
        let mut g = game();
        assert!(g.use_hint());
        assert_eq!(g.pending_tasks(), 1);
        g.rebuild_board(Phase::Board);
        assert_eq!(g.pending_tasks(), 0);
        assert_eq!(g.scheduler().pending(), 0);
        g.advance_time(1_200);
        assert!(g.board().cards().iter().all(|c| !c.flipped && !c.matched));
    }

    #[test]
    fn test_wrong_answer_leaves_no_timers_behind() {
        let mut g = game();
        assert!(g.use_hint());
        g.advance_time(1_200);
        clear_board(&mut g);
        let wrong = (g.level_definition().quiz.answer + 1) % g.level_definition().quiz.options.len();
        assert_eq!(g.answer_quiz(wrong), Some(false));
        assert_eq!(g.pending_tasks(), 0);
        assert_eq!(g.scheduler().pending(), 0);
        assert!(g.board().cards().iter().all(|c| !c.flipped));
    }

    #[test]
    fn test_oversized_config_does_not_panic() {
        let config = GameConfig {
            bonus_hints_every: 0,
            mismatch_step_ms: u32::MAX,
            match_points_per_level: u64::MAX,
            ..GameConfig::default()
        };
        let mut g = Game::new(
            config,
            Box::new(MemoryStore::new()),
            VirtualTimers::new(),
            StdRng::seed_from_u64(42),
            day(15),
        );
        g.dismiss_lesson();
        let (a, _) = pair_indices(&g, 0);
        let (c, _) = pair_indices(&g, 1);
        g.select_card(a);
        g.select_card(c);
        g.advance_time(250);
        assert!(!g.board().has_pending());
        clear_board(&mut g);
        assert_eq!(g.score(), u64::MAX);
        let answer = g.level_definition().quiz.answer;
        assert_eq!(g.answer_quiz(answer), Some(true));
        assert_eq!(g.hints(), 3);
    }

    #[test]
    fn test_stored_counters_at_max_saturate() {
        let max = u32::MAX.to_string();
        let store = MemoryStore::with_values([
            (KEY_HINTS, max.as_str()),
            (KEY_STREAK, max.as_str()),
            (KEY_QUIZZES, max.as_str()),
            (KEY_LAST_CHECK_IN, "2026-06-14"),
        ]);
        let mut g = game_with(store);
        assert!(g.check_in(day(15)));
        assert_eq!(g.hints(), u32::MAX);
        assert_eq!(g.streak().count, u32::MAX);
        g.dismiss_lesson();
        clear_board(&mut g);
        let answer = g.level_definition().quiz.answer;
        assert_eq!(g.answer_quiz(answer), Some(true));
        assert_eq!(g.quizzes_solved(), u32::MAX);
        assert_eq!(g.hints(), u32::MAX);
    }

    struct DeadTimers;

    impl Scheduler for DeadTimers {
        fn schedule(&mut self, _id: TimerId, _delay_ms: u32) -> bool {
            false
        }
        fn cancel(&mut self, _id: TimerId) {}
    }

    #[test]
    fn test_unarmed_timer_applies_task_immediately() {
        let mut g = Game::new(
            GameConfig::default(),
            Box::new(MemoryStore::new()),
            DeadTimers,
            StdRng::seed_from_u64(42),
            day(15),
        );
        g.dismiss_lesson();
        let first = g.board().cards()[0].pair_key;
        let other = (1..g.board().cards().len())
            .find(|&i| g.board().cards()[i].pair_key != first)
            .unwrap();
        g.select_card(0);
        g.select_card(other);
        assert!(!g.board().has_pending());
        assert!(!g.board().cards()[0].flipped);
        assert_eq!(g.pending_tasks(), 0);

        assert!(g.use_hint());
        assert!(g.board().cards().iter().all(|c| !c.flipped));
        assert_eq!(g.hints(), 2);
    }
}
