//! State-specific controllers for process values.
//!
//! Each state that needs handling has a [`Controller`] responsible for:
//!
//! - Rejecting the whole batch if any input cancels the process
//! - Consuming the remaining inputs (`process_inputs`)
//! - Deciding what to do to the value when a step fails (`handle_failure`)

use super::processing::ProcessingState;
use super::state_machine::StateMachine;
use super::value::ProcessValue;
use crate::error::{Error, Result};
use crate::models::{Input, Operation};
use std::collections::HashMap;

/// Context passed to controllers.
///
/// Carries the operation being served and the transition capability, so
/// controllers don't have to own the state machine themselves.
pub struct ControllerContext<'a, V: ProcessValue> {
    /// The domain API operation being served
    pub operation: Operation,

    /// Transition capability for the process type
    pub machine: &'a dyn StateMachine<V>,
}

impl<'a, V: ProcessValue> ControllerContext<'a, V> {
    pub fn new(operation: Operation, machine: &'a dyn StateMachine<V>) -> Self {
        Self { operation, machine }
    }
}

/// Trait for handling the inputs of a process in one state.
pub trait Controller<V: ProcessValue>: Send + Sync {
    /// Consumes a batch of inputs that contains no cancellation.
    fn process_inputs(
        &self,
        value: V,
        inputs: &[Input<V::Requirement>],
        ctx: &ControllerContext<'_, V>,
    ) -> Result<ProcessingState<V>>;

    /// Called before a cancellation error is raised.
    fn handle_cancelled(&self, value: V, _ctx: &ControllerContext<'_, V>) -> Result<V> {
        Ok(value)
    }

    /// Called whenever processing fails. The original error is still
    /// propagated afterwards unless this hook fails itself.
    fn handle_failure(&self, _error: &Error, value: V) -> Result<V> {
        Ok(value)
    }

    /// Processes a batch of inputs.
    ///
    /// A single CANCELLED input aborts the whole batch before any other input
    /// is looked at, regardless of its position.
    fn process(
        &self,
        value: V,
        inputs: &[Input<V::Requirement>],
        ctx: &ControllerContext<'_, V>,
    ) -> Result<ProcessingState<V>> {
        let outcome = match inputs.iter().find(|input| input.is_cancelled()) {
            Some(cancelled) => {
                let requirement = cancelled.requirement().to_string();
                tracing::warn!(
                    process_id = %value.id(),
                    requirement = %requirement,
                    "[Controller] Cancellation received"
                );
                match self.handle_cancelled(value.clone(), ctx) {
                    Ok(_) => Err(Error::ProcessWasCancelled { requirement }),
                    Err(error) => Err(error),
                }
            }
            None => self.process_inputs(value.clone(), inputs, ctx),
        };

        match outcome {
            Ok(state) => Ok(state),
            Err(error) => {
                self.handle_failure(&error, value)?;
                Err(error)
            }
        }
    }
}

/// Resolves the controller responsible for a value.
pub trait ControllerLookup<V: ProcessValue>: Send + Sync {
    /// # Errors
    ///
    /// Returns [`Error::NoController`] if the value's state has no handler.
    fn controller_for(&self, value: &V) -> Result<&dyn Controller<V>>;
}

/// Registry of controllers keyed by state.
pub struct ControllerRegistry<V: ProcessValue> {
    controllers: HashMap<V::State, Box<dyn Controller<V>>>,
}

impl<V: ProcessValue + 'static> ControllerRegistry<V> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            controllers: HashMap::new(),
        }
    }

    /// Registers a controller for a state and returns the registry for chaining.
    pub fn register<C>(mut self, state: V::State, controller: C) -> Self
    where
        C: Controller<V> + 'static,
    {
        self.insert(state, controller);
        self
    }

    /// Registers a controller for a state, replacing any previous one.
    pub fn insert<C>(&mut self, state: V::State, controller: C)
    where
        C: Controller<V> + 'static,
    {
        self.controllers.insert(state, Box::new(controller));
    }

    /// Gets the controller for the given state.
    pub fn get(&self, state: V::State) -> Option<&dyn Controller<V>> {
        self.controllers.get(&state).map(|controller| controller.as_ref())
    }

    pub fn contains(&self, state: V::State) -> bool {
        self.controllers.contains_key(&state)
    }
}

impl<V: ProcessValue + 'static> Default for ControllerRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: ProcessValue + 'static> ControllerLookup<V> for ControllerRegistry<V> {
    fn controller_for(&self, value: &V) -> Result<&dyn Controller<V>> {
        let state = value.state();
        self.get(state).ok_or_else(|| Error::NoController {
            state: state.to_string(),
        })
    }
}
