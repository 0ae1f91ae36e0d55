//! Drives a process value through its controllers until the client has to
//! act, an external event is awaited, or a terminal state is reached.

use super::controller::{ControllerContext, ControllerLookup};
use super::processing::ProcessingState;
use super::state_machine::StateMachine;
use super::value::ProcessValue;
use crate::config::AdvancerConfig;
use crate::error::{Error, Result};
use crate::models::{ExecuteResponse, Input, Operation};

type FailureHook<V> = Box<dyn Fn(&V, &Error) + Send + Sync>;

/// The single `execute` entry point consumed by the domain API layer.
///
/// Each call resolves the controller for the value's current state and
/// interprets its [`ProcessingState`]:
///
/// - `Complete` in a terminal state finishes the call; in any other state
///   the next controller runs with no inputs (auto-advance)
/// - `Waiting` finishes the call, a resume is expected later
/// - `UserInteractions` returns the hurdles to the client
///
/// Auto-advance is bounded by [`AdvancerConfig::max_auto_advance`].
pub struct ProcessAdvancer<V, L, M>
where
    V: ProcessValue,
{
    controllers: L,
    machine: M,
    config: AdvancerConfig,
    on_failure: Option<FailureHook<V>>,
}

impl<V, L, M> ProcessAdvancer<V, L, M>
where
    V: ProcessValue,
    L: ControllerLookup<V>,
    M: StateMachine<V>,
{
    pub fn new(controllers: L, machine: M) -> Self {
        Self {
            controllers,
            machine,
            config: AdvancerConfig::default(),
            on_failure: None,
        }
    }

    pub fn with_config(mut self, config: AdvancerConfig) -> Self {
        self.config = config;
        self
    }

    /// Installs a hook that runs before any execute failure is returned,
    /// e.g. to move the process to a failure state.
    pub fn on_execute_failure<F>(mut self, hook: F) -> Self
    where
        F: Fn(&V, &Error) + Send + Sync + 'static,
    {
        self.on_failure = Some(Box::new(hook));
        self
    }

    pub fn machine(&self) -> &M {
        &self.machine
    }

    pub fn controllers(&self) -> &L {
        &self.controllers
    }

    pub fn config(&self) -> &AdvancerConfig {
        &self.config
    }

    /// Advances `value` with the client's inputs.
    ///
    /// Inputs are handed to the controller of the value's current state only;
    /// states reached by auto-advance run with an empty batch.
    ///
    /// # Errors
    ///
    /// Any controller or lookup failure, or
    /// [`Error::AutoAdvanceLimitExceeded`] if the chain of states that need no
    /// client input is longer than the configured limit. The failure hook
    /// runs first with the value being processed when the failure happened.
    pub fn execute(
        &self,
        value: V,
        inputs: &[Input<V::Requirement>],
        operation: Operation,
    ) -> Result<ExecuteResponse<V::Id, V::Requirement>> {
        let ctx = ControllerContext::new(operation, &self.machine);
        let mut batch = inputs;
        let mut current = value;
        let mut hops = 0usize;

        tracing::debug!(
            process_id = %current.id(),
            state = %current.state(),
            operation = %operation,
            inputs = inputs.len(),
            "[ProcessAdvancer] Executing"
        );

        loop {
            let controller = match self.controllers.controller_for(&current) {
                Ok(controller) => controller,
                Err(error) => return Err(self.fail(&current, error)),
            };

            let state = match controller.process(current.clone(), batch, &ctx) {
                Ok(state) => state,
                Err(error) => return Err(self.fail(&current, error)),
            };
            batch = &[];

            tracing::debug!(
                process_id = %current.id(),
                state = %current.state(),
                outcome = state.outcome_name(),
                "[ProcessAdvancer] Controller finished"
            );

            match state {
                ProcessingState::Complete(next) => {
                    let next_state = self.machine.current_state(&next);
                    if self.machine.is_terminal(next_state) {
                        tracing::info!(
                            process_id = %next.id(),
                            state = %next_state,
                            hops,
                            "[ProcessAdvancer] Reached terminal state"
                        );
                        return Ok(ExecuteResponse::finished(next.id()));
                    }

                    hops += 1;
                    if hops > self.config.max_auto_advance {
                        let error = Error::AutoAdvanceLimitExceeded {
                            process_id: next.id().to_string(),
                            limit: self.config.max_auto_advance,
                        };
                        return Err(self.fail(&next, error));
                    }

                    tracing::debug!(
                        process_id = %next.id(),
                        from = %current.state(),
                        to = %next_state,
                        hops,
                        "[ProcessAdvancer] Auto-advancing"
                    );
                    current = next;
                }
                ProcessingState::Waiting(waiting) => {
                    tracing::info!(
                        process_id = %waiting.id(),
                        state = %waiting.state(),
                        "[ProcessAdvancer] Waiting for external event"
                    );
                    return Ok(ExecuteResponse::finished(waiting.id()));
                }
                ProcessingState::UserInteractions {
                    interactions,
                    next_endpoint,
                } => {
                    tracing::debug!(
                        process_id = %current.id(),
                        interactions = interactions.len(),
                        "[ProcessAdvancer] Returning interactions to client"
                    );
                    return Ok(ExecuteResponse::with_interactions(
                        current.id(),
                        interactions,
                        next_endpoint,
                    ));
                }
            }
        }
    }

    /// Signals that an externally awaited requirement is satisfied.
    pub fn resume(
        &self,
        value: V,
        requirement: V::Requirement,
    ) -> Result<ExecuteResponse<V::Id, V::Requirement>> {
        self.execute(value, &[Input::resume(requirement)], Operation::Resume)
    }

    fn fail(&self, value: &V, error: Error) -> Error {
        tracing::warn!(
            process_id = %value.id(),
            state = %value.state(),
            error = %error,
            "[ProcessAdvancer] Execute failed"
        );
        if let Some(hook) = &self.on_failure {
            hook(value, &error);
        }
        error
    }
}
