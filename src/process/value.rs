//! Contract for process values advanced by this core.

use serde::Serialize;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Marker bound for requirement identifiers.
///
/// Implemented automatically for any type that satisfies the bounds; domains
/// usually use a fieldless enum.
pub trait Requirement: Clone + Eq + Hash + Debug + Display + Serialize + Send + Sync {}

impl<T> Requirement for T where T: Clone + Eq + Hash + Debug + Display + Serialize + Send + Sync {}

/// One instance of a business process.
///
/// Values are immutable-by-replacement: controllers and state machines
/// return new values rather than editing in place.
pub trait ProcessValue: Clone + Debug + Send + Sync {
    /// Opaque comparable identity.
    type Id: Clone + Eq + Debug + Display + Send + Sync;

    /// Closed set of states the value can be in.
    type State: Copy + Eq + Hash + Debug + Display + Send + Sync;

    /// Requirement identifiers used by this process's controllers.
    type Requirement: Requirement;

    fn id(&self) -> Self::Id;

    fn state(&self) -> Self::State;
}

/// Values that can produce a copy of themselves in another state.
///
/// Needed by [`TableStateMachine`](super::TableStateMachine) to commit a
/// transition.
pub trait WithState: ProcessValue {
    fn with_state(&self, state: Self::State) -> Self;
}
