//! Vera's Rock Paper Scissors Battle - engagement core
//!
//! Platform-agnostic state behind the game page: lifetime and session scores, the persisted
//! theme, and the install banner / iOS overlay state machine. No browser dependencies; the
//! web crate supplies storage, clock and rendering through the traits defined here.

pub mod clock;
pub mod config;
pub mod constants;
pub mod engagement;
pub mod install;
pub mod platform;
pub mod round;
pub mod score;
pub mod storage;
pub mod theme;

pub use clock::{Clock, ManualClock, Timestamp};
pub use config::{ConfigError, EngagementConfig, StorageKeys};
pub use engagement::Engagement;
pub use install::{
    Effect, HiddenReason, InstallEvent, InstallHost, InstallInstructions, InstallOrchestrator,
    InstallState, NativeChoice, NativePrompt, Visibility,
};
pub use platform::{EnvironmentSignals, OperatingSystem, Platform, detect};
pub use round::{Move, Round, UnknownMove, play_round};
pub use score::{Outcome, ScoreLedger, ScoreSnapshot, Tally};
pub use storage::{DismissalRecord, KeyValueBackend, MemoryBackend, PersistenceStore, StorageError};
pub use theme::{Theme, ThemePreference, ThemeSurface, UnknownTheme};
