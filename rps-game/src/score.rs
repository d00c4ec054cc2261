//! Session and lifetime win/loss/draw counters.
use crate::storage::{KeyValueBackend, PersistenceStore};
use serde::{Deserialize, Serialize};

/// Result of a single round from the player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

/// One set of counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tally {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl Tally {
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.wins as u64 + self.losses as u64 + self.draws as u64
    }

    #[must_use]
    pub const fn count(&self, outcome: Outcome) -> u32 {
        match outcome {
            Outcome::Win => self.wins,
            Outcome::Loss => self.losses,
            Outcome::Draw => self.draws,
        }
    }

    fn bump(&mut self, outcome: Outcome) {
        let slot = match outcome {
            Outcome::Win => &mut self.wins,
            Outcome::Loss => &mut self.losses,
            Outcome::Draw => &mut self.draws,
        };
        *slot = slot.saturating_add(1);
    }
}

/// Counters as displayed on the score boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub session: Tally,
    pub all_time: Tally,
}

/// Session counters start at zero every page load; all-time counters live in storage.
#[derive(Debug, Clone, Default)]
pub struct ScoreLedger {
    session: Tally,
    all_time: Tally,
}

impl ScoreLedger {
    /// Start a session: zeroed session counters, lifetime counters from storage.
    pub fn load<B: KeyValueBackend>(store: &PersistenceStore<B>) -> Self {
        Self {
            session: Tally::default(),
            all_time: store.all_time(),
        }
    }

    /// Count one finished round in both tallies and persist the lifetime tally.
    pub fn record_outcome<B: KeyValueBackend>(
        &mut self,
        outcome: Outcome,
        store: &mut PersistenceStore<B>,
    ) -> ScoreSnapshot {
        self.session.bump(outcome);
        self.all_time.bump(outcome);
        store.store_all_time(&self.all_time);
        self.snapshot()
    }

    /// Zero the session counters only.
    pub fn reset(&mut self) {
        self.session = Tally::default();
    }

    #[must_use]
    pub const fn snapshot(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            session: self.session,
            all_time: self.all_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageKeys;
    use crate::storage::MemoryBackend;

    fn store(backend: &MemoryBackend) -> PersistenceStore<MemoryBackend> {
        PersistenceStore::new(backend.clone(), StorageKeys::default())
    }

    #[test]
    fn first_win_counts_in_both_tallies() {
        let backend = MemoryBackend::new();
        let mut store = store(&backend);
        let mut ledger = ScoreLedger::load(&store);
        let snap = ledger.record_outcome(Outcome::Win, &mut store);
        assert_eq!(
            snap.session,
            Tally {
                wins: 1,
                losses: 0,
                draws: 0
            }
        );
        assert_eq!(snap.all_time, snap.session);
        assert_eq!(
            backend.raw("allTimeScores").as_deref(),
            Some(r#"{"wins":1,"losses":0,"draws":0}"#)
        );
    }

    #[test]
    fn reload_zeroes_session_but_keeps_lifetime() {
        let backend = MemoryBackend::new();
        let mut store = store(&backend);
        let mut ledger = ScoreLedger::load(&store);
        ledger.record_outcome(Outcome::Loss, &mut store);
        ledger.record_outcome(Outcome::Draw, &mut store);

        let reloaded = ScoreLedger::load(&store);
        assert_eq!(reloaded.snapshot().session.total(), 0);
        assert_eq!(reloaded.snapshot().all_time.total(), 2);
        assert_eq!(reloaded.snapshot().all_time.count(Outcome::Loss), 1);
    }

    #[test]
    fn reset_only_touches_session() {
        let backend = MemoryBackend::new();
        let mut store = store(&backend);
        let mut ledger = ScoreLedger::load(&store);
        ledger.record_outcome(Outcome::Win, &mut store);
        ledger.reset();
        assert_eq!(ledger.snapshot().session, Tally::default());
        assert_eq!(ledger.snapshot().all_time.wins, 1);
    }

    #[test]
    fn failed_persist_still_counts_in_memory() {
        let backend = MemoryBackend::new();
        backend.reject_writes(true);
        let mut store = store(&backend);
        let mut ledger = ScoreLedger::load(&store);
        let snap = ledger.record_outcome(Outcome::Draw, &mut store);
        assert_eq!(snap.session.draws, 1);
        assert_eq!(snap.all_time.draws, 1);
        assert!(backend.raw("allTimeScores").is_none());
    }

    #[test]
    fn counters_saturate() {
        let mut tally = Tally {
            wins: u32::MAX,
            ..Tally::default()
        };
        tally.bump(Outcome::Win);
        assert_eq!(tally.wins, u32::MAX);
    }
}
