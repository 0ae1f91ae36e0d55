//! Result of one controller invocation.

use super::value::ProcessValue;
use crate::models::{Notification, NextEndpoint, UserInteraction};

/// What a controller decided after processing a batch of inputs.
#[derive(Debug, Clone)]
pub enum ProcessingState<V: ProcessValue> {
    /// Nothing else is needed in the current state; the value may have moved on.
    Complete(V),

    /// The process is waiting for an external event.
    Waiting(V),

    /// The client must answer these interactions before the process can advance.
    UserInteractions {
        interactions: Vec<UserInteraction<V::Requirement>>,
        next_endpoint: Option<NextEndpoint>,
    },
}

impl<V: ProcessValue> ProcessingState<V> {
    /// Creates a state carrying a single final notification and no endpoint.
    pub fn notify(notification: Notification<V::Requirement>) -> Self {
        Self::UserInteractions {
            interactions: vec![UserInteraction::Notification(notification)],
            next_endpoint: None,
        }
    }

    /// Returns a human-readable name for the outcome.
    pub fn outcome_name(&self) -> &'static str {
        match self {
            Self::Complete(_) => "complete",
            Self::Waiting(_) => "waiting",
            Self::UserInteractions { .. } => "user_interactions",
        }
    }
}
