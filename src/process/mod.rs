//! Process-advancement core.
//!
//! This module decides, given a process value and a batch of client inputs,
//! whether to ask for more hurdles, transition and keep going, or stop and
//! wait for an external event.
//!
//! # Architecture
//!
//! - **Values** ([ProcessValue]): one business-process instance, replaced on every change
//! - **State machine** ([StateMachine]): legal transitions, supplied by the domain
//! - **Controllers** ([Controller]): per-state input handling, resolved via [ControllerLookup]
//! - **Requirement collection** ([RequirementController]): collect, merge hurdles, transition
//! - **Advancer** ([ProcessAdvancer]): runs controllers across transitions
//!
//! # Flow
//!
//! ```text
//!            ┌────────────────────────── Complete (non-terminal) ─────┐
//!            ▼                                                        │
//! execute ─> controller_for(state) ─> process(value, inputs) ─────────┤
//!                                                                     ├─ Complete (terminal) ─> finished
//!                                                                     ├─ Waiting ─────────────> finished
//!                                                                     └─ UserInteractions ────> hurdles
//! ```
//!
//! # Example
//!
//! ```rust
//! use domain_api::process::{StateMachine, TableStateMachine, TransitionTable, ProcessValue, WithState};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
//! enum Step { Open, Done }
//!
//! #[derive(Debug, Clone)]
//! struct Job { state: Step }
//!
//! impl ProcessValue for Job {
//!     type Id = u32;
//!     type State = Step;
//!     type Requirement = String;
//!     fn id(&self) -> u32 { 1 }
//!     fn state(&self) -> Step { self.state }
//! }
//!
//! impl WithState for Job {
//!     fn with_state(&self, state: Step) -> Self { Job { state } }
//! }
//!
//! let machine = TableStateMachine::<Job>::new(TransitionTable::new().allow(Step::Open, Step::Done));
//! let job = machine.transition_to(Job { state: Step::Open }, Step::Done)?;
//! assert!(machine.is_terminal(job.state));
//! # Ok::<(), domain_api::Error>(())
//! ```

mod advancer;
mod controller;
mod processing;
mod requirements;
mod state_machine;
mod value;

pub use advancer::ProcessAdvancer;
pub use controller::{Controller, ControllerContext, ControllerLookup, ControllerRegistry};
pub use processing::ProcessingState;
pub use requirements::{merge_hurdles, RequirementController};
pub use state_machine::{StateMachine, TableStateMachine, TransitionLog, TransitionTable};
pub use value::{ProcessValue, Requirement, WithState};
