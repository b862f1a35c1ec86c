//! Quiz engine: the whole game session as one explicit state machine.
//!
//! `Loading → Menu → Preloading → Playing ⇄ GameOver → Menu`
//!
//! The engine owns every piece of session state (pool, play order, cursor,
//! score, high score). The display layer only calls the transition methods and
//! reads back through accessors; it never mutates fields directly. Nothing here
//! touches the DOM, so the whole game can be driven from host tests.

use rand::Rng;

use crate::catalog::{Catalog, CatalogEntry};
use crate::error::QuizError;

pub mod preload;
pub mod shuffle;
pub mod storage;

pub use preload::{await_all_settled, PreloadReport, ProbeResult};
pub use storage::{HighScoreStore, MemoryStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Menu,
    Preloading,
    Playing,
    GameOver,
}

/// Issued by [`QuizEngine::start`]; only the ticket of the current start can
/// move the engine out of `Preloading`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreloadTicket {
    generation: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuessOutcome {
    /// Display should clear the input.
    Correct { score: u32 },
    /// Game over; `answer` is the canonical answer of the missed image.
    Wrong { answer: Option<String> },
    /// Not in `Playing`.
    Ignored,
}

pub struct QuizEngine<S, R> {
    phase: Phase,
    catalog: Catalog,
    include_bonus: bool,
    pool: Vec<CatalogEntry>,
    order: Vec<usize>, // indices into pool
    cursor: usize,
    score: u32,
    high_score: u32,
    missed_answer: Option<String>,
    generation: u64,
    store: S,
    rng: R,
}

impl<S: HighScoreStore, R: Rng> QuizEngine<S, R> {
    pub fn new(store: S, rng: R) -> Self {
        let high_score = store.load().unwrap_or(0);
        Self {
            phase: Phase::Loading,
            catalog: Catalog::default(),
            include_bonus: false,
            pool: Vec::new(),
            order: Vec::new(),
            cursor: 0,
            score: 0,
            high_score,
            missed_answer: None,
            generation: 0,
            store,
            rng,
        }
    }

    // --- Accessors ----------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn score(&self) -> u32 {
        self.score
    }
    pub fn high_score(&self) -> u32 {
        self.high_score
    }
    pub fn include_bonus(&self) -> bool {
        self.include_bonus
    }
    pub fn missed_answer(&self) -> Option<&str> {
        self.missed_answer.as_deref()
    }
    pub fn default_count(&self) -> usize {
        self.catalog.default_images.len()
    }
    pub fn bonus_count(&self) -> usize {
        self.catalog.pom_images.len()
    }
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Image currently shown, if a round is in progress.
    pub fn current(&self) -> Option<&CatalogEntry> {
        if self.phase != Phase::Playing {
            return None;
        }
        self.order.get(self.cursor).and_then(|&i| self.pool.get(i))
    }

    /// URLs for the display layer to probe while `Preloading`. Duplicate URLs
    /// stay separate slots.
    pub fn preload_urls(&self) -> Vec<String> {
        self.pool.iter().map(|e| e.url.clone()).collect()
    }

    // --- Transitions --------------------------------------------------------

    /// Entries without any accepted answer can never be guessed and are dropped.
    pub fn catalog_loaded(&mut self, mut catalog: Catalog) {
        if self.phase != Phase::Loading {
            log::warn!("catalog arrived in {:?}; ignored", self.phase);
            return;
        }
        for pool in [&mut catalog.default_images, &mut catalog.pom_images] {
            pool.retain(|entry| {
                let playable = !entry.answers.is_empty();
                if !playable {
                    log::warn!("dropping {}: no accepted answers", entry.url);
                }
                playable
            });
        }
        log::info!(
            "catalog ready: {} default, {} bonus",
            catalog.default_images.len(),
            catalog.pom_images.len()
        );
        self.catalog = catalog;
        self.phase = Phase::Menu;
    }

    /// Catalog could not be fetched: continue with empty pools.
    pub fn catalog_failed(&mut self) {
        self.catalog_loaded(Catalog::default());
    }

    pub fn set_include_bonus(&mut self, include: bool) {
        if self.phase == Phase::Menu {
            self.include_bonus = include;
        }
    }

    pub fn start(&mut self) -> Result<PreloadTicket, QuizError> {
        if self.phase != Phase::Menu {
            return Err(QuizError::WrongPhase {
                action: "start",
                phase: self.phase,
            });
        }
        let pool = self.catalog.pool(self.include_bonus);
        if pool.is_empty() {
            log::warn!("No images available for the selected set.");
            return Err(QuizError::EmptyPool);
        }

        self.pool = pool;
        self.order.clear();
        self.cursor = 0;
        self.score = 0;
        self.missed_answer = None;
        self.generation += 1;
        self.phase = Phase::Preloading;
        log::info!("preloading {} images", self.pool.len());
        Ok(PreloadTicket {
            generation: self.generation,
        })
    }

    /// One-shot entry into `Playing`. Whichever of barrier completion and
    /// timeout arrives first wins; the other (or a stale ticket) is a no-op.
    pub fn finish_preload(&mut self, ticket: PreloadTicket, report: &PreloadReport) -> bool {
        if self.phase != Phase::Preloading || ticket.generation != self.generation {
            return false;
        }
        log::info!(
            "preload done: {} loaded, {} failed, {} unresolved{}",
            report.loaded,
            report.failed,
            report.unresolved(),
            if report.timed_out { " (timed out)" } else { "" }
        );
        self.reshuffle();
        self.phase = Phase::Playing;
        true
    }

    pub fn submit_guess(&mut self, guess: &str) -> GuessOutcome {
        if self.phase != Phase::Playing {
            return GuessOutcome::Ignored;
        }
        let Some(entry) = self.current() else {
            return GuessOutcome::Ignored;
        };

        if entry.accepts(guess) {
            self.score += 1;
            if self.cursor + 1 < self.order.len() {
                self.cursor += 1;
            } else {
                log::debug!("play order exhausted; reshuffling");
                self.reshuffle();
            }
            GuessOutcome::Correct { score: self.score }
        } else {
            let answer = entry.canonical().map(str::to_owned);
            self.missed_answer = answer.clone();
            self.end_game();
            GuessOutcome::Wrong { answer }
        }
    }

    pub fn restart(&mut self) -> Result<(), QuizError> {
        if self.phase != Phase::GameOver {
            return Err(QuizError::WrongPhase {
                action: "restart",
                phase: self.phase,
            });
        }
        self.score = 0;
        self.missed_answer = None;
        self.reshuffle();
        self.phase = Phase::Playing;
        Ok(())
    }

    pub fn return_to_menu(&mut self) -> Result<(), QuizError> {
        if !matches!(self.phase, Phase::GameOver | Phase::Playing) {
            return Err(QuizError::WrongPhase {
                action: "return to menu",
                phase: self.phase,
            });
        }
        self.pool.clear();
        self.order.clear();
        self.cursor = 0;
        self.score = 0;
        self.missed_answer = None;
        self.phase = Phase::Menu;
        Ok(())
    }

    // --- Internals ----------------------------------------------------------

    fn reshuffle(&mut self) {
        self.order = shuffle::play_order(self.pool.len(), &mut self.rng);
        self.cursor = 0;
    }

    fn end_game(&mut self) {
        self.phase = Phase::GameOver;
        if self.score > self.high_score {
            self.high_score = self.score;
            self.store.save(self.score);
            log::info!("new high score: {}", self.score);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn entry(url: &str, answers: &[&str]) -> CatalogEntry {
        CatalogEntry::new(url, answers.iter().map(|s| s.to_string()).collect())
    }

    fn catalog() -> Catalog {
        Catalog {
            default_images: vec![
                entry("/images/ToM.png", &["ToM", "Tower of Misery"]),
                entry("/images/ToAST.png", &["ToAST", "Tower of Annoyingly Simple Trials"]),
                entry("/images/ToDC.png", &["ToDC", "Tower of Difficulty Chart"]),
            ],
            pom_images: vec![entry("/images/PoM/WaT.jpg", &["WaT", "Was A Tower"])],
        }
    }

    fn engine_with(store: MemoryStore) -> QuizEngine<MemoryStore, StdRng> {
        let mut q = QuizEngine::new(store, StdRng::seed_from_u64(9));
        q.catalog_loaded(catalog());
        q
    }

    fn playing(store: MemoryStore) -> QuizEngine<MemoryStore, StdRng> {
        let mut q = engine_with(store);
        let ticket = q.start().unwrap();
        assert!(q.finish_preload(ticket, &PreloadReport::default()));
        q
    }

    fn answer_current<S: HighScoreStore, R: Rng>(q: &mut QuizEngine<S, R>) -> GuessOutcome {
        let guess = q.current().unwrap().answers[0].clone();
        q.submit_guess(&guess)
    }

    #[test]
    fn starts_loading_then_menu() {
        let mut q = QuizEngine::new(MemoryStore::with_value(5), StdRng::seed_from_u64(0));
        assert_eq!(q.phase(), Phase::Loading);
        assert_eq!(q.high_score(), 5);
        q.catalog_failed();
        assert_eq!(q.phase(), Phase::Menu);
        assert_eq!(q.start(), Err(QuizError::EmptyPool));
        assert_eq!(q.phase(), Phase::Menu);
    }

    #[test]
    fn entries_without_answers_are_not_playable() {
        let mut q = QuizEngine::new(MemoryStore::default(), StdRng::seed_from_u64(0));
        q.catalog_loaded(Catalog::from_json_or_empty(
            r#"{"defaultImages":[{"url":"/a.png","answers":[]}]}"#,
        ));
        assert_eq!(q.default_count(), 0);
        assert_eq!(q.start(), Err(QuizError::EmptyPool));
        assert_eq!(q.phase(), Phase::Menu);
    }

    #[test]
    fn unanswerable_entries_dropped_from_both_pools() {
        let mut q = QuizEngine::new(MemoryStore::default(), StdRng::seed_from_u64(0));
        let mut c = catalog();
        c.default_images.push(entry("/images/empty.png", &[]));
        c.pom_images.push(entry("/images/PoM/empty.jpg", &[]));
        q.catalog_loaded(c);
        assert_eq!(q.default_count(), 3);
        assert_eq!(q.bonus_count(), 1);
    }

    #[test]
    fn bonus_toggle_controls_pool() {
        let mut q = engine_with(MemoryStore::default());
        q.start().unwrap();
        assert_eq!(q.pool_len(), 3);

        let mut q = engine_with(MemoryStore::default());
        q.set_include_bonus(true);
        q.start().unwrap();
        assert_eq!(q.pool_len(), 4);
        assert!(q.preload_urls().contains(&"/images/PoM/WaT.jpg".to_string()));
    }

    #[test]
    fn start_is_not_reentrant() {
        let mut q = engine_with(MemoryStore::default());
        q.start().unwrap();
        assert!(matches!(
            q.start(),
            Err(QuizError::WrongPhase { phase: Phase::Preloading, .. })
        ));
    }

    #[test]
    fn preload_entry_is_one_shot() {
        let mut q = engine_with(MemoryStore::default());
        let ticket = q.start().unwrap();
        assert!(q.current().is_none());
        assert!(q.finish_preload(ticket, &PreloadReport::default()));
        let first = q.current().cloned();
        // late timeout after the barrier already released
        assert!(!q.finish_preload(ticket, &PreloadReport::default()));
        assert_eq!(q.current().cloned(), first);
        assert_eq!(q.phase(), Phase::Playing);
    }

    #[test]
    fn stale_ticket_ignored_after_menu_round_trip() {
        let mut q = engine_with(MemoryStore::default());
        let old = q.start().unwrap();
        assert!(q.finish_preload(old, &PreloadReport::default()));
        q.return_to_menu().unwrap();
        let new = q.start().unwrap();
        assert!(!q.finish_preload(old, &PreloadReport::default()));
        assert_eq!(q.phase(), Phase::Preloading);
        assert!(q.finish_preload(new, &PreloadReport::default()));
    }

    #[test]
    fn guess_ignores_case_and_whitespace() {
        let mut q = playing(MemoryStore::default());
        let canonical = q.current().unwrap().answers[0].clone();
        let sloppy = format!("  {}  ", canonical.to_uppercase());
        assert_eq!(q.submit_guess(&sloppy), GuessOutcome::Correct { score: 1 });
    }

    #[test]
    fn full_name_is_accepted() {
        let mut q = playing(MemoryStore::default());
        let full = q.current().unwrap().answers[1].clone();
        assert!(matches!(q.submit_guess(&full), GuessOutcome::Correct { .. }));
    }

    #[test]
    fn correct_streak_never_ends_round() {
        let mut q = playing(MemoryStore::default());
        for expected in 1..=20 {
            assert_eq!(answer_current(&mut q), GuessOutcome::Correct { score: expected });
            assert_eq!(q.phase(), Phase::Playing);
        }
        assert_eq!(q.score(), 20);
    }

    #[test]
    fn each_pass_covers_the_whole_pool() {
        let mut q = playing(MemoryStore::default());
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(q.current().unwrap().url.clone());
            answer_current(&mut q);
        }
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn wrong_guess_ends_game_with_canonical_answer() {
        let mut q = playing(MemoryStore::default());
        let canonical = q.current().unwrap().answers[0].clone();
        assert_eq!(
            q.submit_guess("definitely not a tower"),
            GuessOutcome::Wrong {
                answer: Some(canonical.clone())
            }
        );
        assert_eq!(q.phase(), Phase::GameOver);
        assert_eq!(q.missed_answer(), Some(canonical.as_str()));
        assert_eq!(q.submit_guess("anything"), GuessOutcome::Ignored);
    }

    #[test]
    fn high_score_persisted_only_when_beaten() {
        let mut q = playing(MemoryStore::with_value(2));
        answer_current(&mut q);
        answer_current(&mut q);
        q.submit_guess("wrong");
        // tie with stored value
        assert_eq!(q.high_score(), 2);
        assert_eq!(q.store().writes, 0);

        q.restart().unwrap();
        for _ in 0..3 {
            answer_current(&mut q);
        }
        q.submit_guess("wrong");
        assert_eq!(q.high_score(), 3);
        assert_eq!(q.store().load(), Some(3));
        assert_eq!(q.store().writes, 1);
    }

    #[test]
    fn restart_resets_score_and_keeps_pool() {
        let mut q = playing(MemoryStore::default());
        answer_current(&mut q);
        q.submit_guess("wrong");
        q.restart().unwrap();
        assert_eq!(q.phase(), Phase::Playing);
        assert_eq!(q.score(), 0);
        assert_eq!(q.missed_answer(), None);
        assert_eq!(q.pool_len(), 3);
        assert!(q.current().is_some());
    }

    #[test]
    fn return_to_menu_discards_session() {
        let mut q = playing(MemoryStore::default());
        answer_current(&mut q);
        q.submit_guess("wrong");
        q.return_to_menu().unwrap();
        assert_eq!(q.phase(), Phase::Menu);
        assert_eq!(q.pool_len(), 0);
        assert_eq!(q.score(), 0);
        assert!(q.current().is_none());
        assert!(q.restart().is_err());
    }

    #[test]
    fn duplicate_urls_are_separate_slots() {
        let mut q = QuizEngine::new(MemoryStore::default(), StdRng::seed_from_u64(3));
        q.catalog_loaded(Catalog {
            default_images: vec![entry("/a.png", &["A"]), entry("/a.png", &["A"])],
            pom_images: vec![],
        });
        let ticket = q.start().unwrap();
        assert_eq!(q.preload_urls(), vec!["/a.png", "/a.png"]);
        q.finish_preload(ticket, &PreloadReport::default());
        assert_eq!(q.submit_guess("a"), GuessOutcome::Correct { score: 1 });
        assert_eq!(q.submit_guess("a"), GuessOutcome::Correct { score: 2 });
        assert_eq!(q.submit_guess("a"), GuessOutcome::Correct { score: 3 });
    }
}
