//! Install banner / iOS overlay / native prompt coordination.
//!
//! [`machine`] holds the pure transition function; [`orchestrator`] owns the live state for a
//! page lifetime and applies effects to an [`InstallHost`] and the persistence store.

pub mod machine;
pub mod orchestrator;
pub mod state;

pub use machine::{Transition, TransitionCtx, initial_state, transition};
pub use orchestrator::{InstallHost, InstallOrchestrator, NativePrompt};
pub use state::{
    Effect, HiddenReason, InstallEvent, InstallInstructions, InstallState, NativeChoice,
    Visibility,
};
