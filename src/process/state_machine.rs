//! Finite state machine capability consumed by controllers and the advancer.
//!
//! The core never decides which transitions are legal. It asks a
//! [`StateMachine`] for the reachable states of a state and asks it to commit
//! a transition. [`TableStateMachine`] is a table-driven implementation for
//! domains that don't bring their own engine.

use super::value::{ProcessValue, WithState};
use crate::config::AdvancerConfig;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

/// Transition capability for one process type.
pub trait StateMachine<V: ProcessValue>: Send + Sync {
    /// Returns the current state of the value.
    fn current_state(&self, value: &V) -> V::State {
        value.state()
    }

    /// Returns the states directly reachable from `state`.
    fn reachable_states(&self, state: V::State) -> HashSet<V::State>;

    /// Commits a transition and returns the new value.
    ///
    /// # Errors
    ///
    /// Fails if the edge from the value's current state to `target` is not
    /// legal.
    fn transition_to(&self, value: V, target: V::State) -> Result<V>;

    /// Returns true if no states are reachable from `state`.
    fn is_terminal(&self, state: V::State) -> bool {
        self.reachable_states(state).is_empty()
    }
}

/// A log entry recording a committed transition.
#[derive(Debug, Clone)]
pub struct TransitionLog<Id, S> {
    pub process_id: Id,
    pub from: S,
    pub to: S,
    pub timestamp: DateTime<Utc>,
}

impl<Id, S> TransitionLog<Id, S> {
    /// Creates a new transition log entry.
    pub fn new(process_id: Id, from: S, to: S) -> Self {
        Self {
            process_id,
            from,
            to,
            timestamp: Utc::now(),
        }
    }
}

/// The declared edges of a process state graph.
///
/// States that never appear as the source of an edge are terminal.
#[derive(Debug, Clone)]
pub struct TransitionTable<S> {
    edges: HashMap<S, HashSet<S>>,
}

impl<S> TransitionTable<S>
where
    S: Copy + Eq + std::hash::Hash,
{
    /// Creates an empty transition table.
    pub fn new() -> Self {
        Self {
            edges: HashMap::new(),
        }
    }

    /// Declares a legal edge and returns the table for chaining.
    pub fn allow(mut self, from: S, to: S) -> Self {
        self.insert(from, to);
        self
    }

    /// Declares a legal edge.
    pub fn insert(&mut self, from: S, to: S) {
        self.edges.entry(from).or_default().insert(to);
    }

    /// Returns the states reachable from `from`.
    pub fn targets(&self, from: S) -> HashSet<S> {
        self.edges.get(&from).cloned().unwrap_or_default()
    }

    /// Checks if the edge `from -> to` is declared.
    pub fn is_valid_transition(&self, from: S, to: S) -> bool {
        self.edges
            .get(&from)
            .is_some_and(|targets| targets.contains(&to))
    }
}

impl<S> Default for TransitionTable<S>
where
    S: Copy + Eq + std::hash::Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

/// A [`StateMachine`] backed by a [`TransitionTable`].
///
/// Validates every transition against the table and keeps a bounded log of
/// committed transitions for debugging and auditing.
pub struct TableStateMachine<V: ProcessValue> {
    table: TransitionTable<V::State>,
    event_log: Mutex<VecDeque<TransitionLog<V::Id, V::State>>>,
    max_log_size: usize,
}

impl<V: WithState> TableStateMachine<V> {
    /// Creates a state machine over the given table.
    pub fn new(table: TransitionTable<V::State>) -> Self {
        Self::from_config(table, &AdvancerConfig::default())
    }

    /// Creates a state machine whose log size comes from the configuration.
    pub fn from_config(table: TransitionTable<V::State>, config: &AdvancerConfig) -> Self {
        Self::with_log_size(table, config.transition_log_size)
    }

    pub fn with_log_size(table: TransitionTable<V::State>, max_log_size: usize) -> Self {
        Self {
            table,
            event_log: Mutex::new(VecDeque::with_capacity(max_log_size)),
            max_log_size,
        }
    }

    /// Returns a reference to the transition table.
    pub fn transition_table(&self) -> &TransitionTable<V::State> {
        &self.table
    }

    /// Returns a snapshot of the committed transitions, oldest first.
    pub fn event_log(&self) -> Vec<TransitionLog<V::Id, V::State>> {
        match self.event_log.lock() {
            Ok(log) => log.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }

    /// Returns the number of transitions logged.
    pub fn log_size(&self) -> usize {
        match self.event_log.lock() {
            Ok(log) => log.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    fn record(&self, entry: TransitionLog<V::Id, V::State>) {
        let mut log = match self.event_log.lock() {
            Ok(log) => log,
            Err(poisoned) => poisoned.into_inner(),
        };
        log.push_back(entry);

        // Trim log if it exceeds max size
        while log.len() > self.max_log_size {
            log.pop_front();
        }
    }
}

impl<V: WithState> StateMachine<V> for TableStateMachine<V> {
    fn reachable_states(&self, state: V::State) -> HashSet<V::State> {
        self.table.targets(state)
    }

    fn transition_to(&self, value: V, target: V::State) -> Result<V> {
        let from = value.state();

        if !self.table.is_valid_transition(from, target) {
            tracing::warn!(
                process_id = %value.id(),
                from = %from,
                to = %target,
                "[StateMachine] Rejected undeclared transition"
            );
            return Err(Error::IllegalTransition {
                from: from.to_string(),
                to: target.to_string(),
            });
        }

        let next = value.with_state(target);
        tracing::info!(
            process_id = %next.id(),
            from = %from,
            to = %target,
            "[StateMachine] Transition committed"
        );
        self.record(TransitionLog::new(next.id(), from, target));

        Ok(next)
    }
}
