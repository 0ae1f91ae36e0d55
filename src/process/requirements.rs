//! Requirement collection: the canonical controller for states whose job is
//! "wait until every requirement of a group is satisfied, then transition".
//!
//! # Algorithm
//!
//! ```text
//! check state ──> cancelled? ──yes──> on_cancel, fail ProcessWasCancelled
//!                     │ no
//!                     ▼
//!           missing = find_missing(value)
//!                     │
//!        empty ◄──────┴──────► non-empty
//!          │                       │ fold inputs (reject unknown ids)
//!          │                       ▼
//!          │             missing' = find_missing(value')
//!          │                       │
//!          ▼            empty ◄────┴────► non-empty
//!      transition ◄──────┘                    │
//!          │                                  ▼
//!   final notification?               merge hurdles, pick endpoint
//!    yes │      │ no                          │
//!        ▼      ▼                             ▼
//!   UserInteractions  Complete          UserInteractions
//! ```

use super::controller::{Controller, ControllerContext};
use super::processing::ProcessingState;
use super::value::ProcessValue;
use crate::error::{Error, Result};
use crate::models::{Hurdle, HurdleResponse, Input, NextEndpoint, Notification, ResultCode};

/// A controller that collects missing requirements from the client.
///
/// Every implementor is a [`Controller`] through a blanket impl:
/// `process_inputs` runs [`process_requirements`](Self::process_requirements),
/// `handle_cancelled` runs [`on_cancel`](Self::on_cancel) and
/// `handle_failure` runs [`fail`](Self::fail).
pub trait RequirementController<V: ProcessValue>: Send + Sync {
    /// The pending-collection state this controller handles.
    fn expected_state(&self) -> V::State;

    /// Returns the requirements not yet satisfied by `value`.
    fn find_missing_requirements(&self, value: &V) -> Result<Vec<V::Requirement>>;

    /// Applies one cleared or failed response to the value.
    fn update_value(&self, value: V, response: &HurdleResponse<V::Requirement>) -> Result<V>;

    /// Moves the value to its next state once nothing is missing.
    fn transition(&self, value: V, ctx: &ControllerContext<'_, V>) -> Result<V>;

    /// Produces the hurdles for one missing requirement.
    ///
    /// `previous` holds the hurdles accumulated so far in this call. Returned
    /// hurdles with a requirement already in `previous` replace the earlier
    /// one, so an answer to one question can revise another's choices.
    fn hurdles_for_requirement(
        &self,
        requirement: &V::Requirement,
        value: &V,
        previous: &[Hurdle<V::Requirement>],
    ) -> Result<Vec<Hurdle<V::Requirement>>>;

    /// Runs before a cancellation error is raised.
    fn on_cancel(&self, value: V, _ctx: &ControllerContext<'_, V>) -> Result<V> {
        Ok(value)
    }

    /// Routing hint: hurdles for this requirement must be answered on the
    /// secure endpoint.
    fn requires_secure_endpoint(&self, _requirement: &V::Requirement) -> bool {
        false
    }

    /// Optional notification shown instead of silently completing.
    fn final_notification(&self, _value: &V) -> Result<Option<Notification<V::Requirement>>> {
        Ok(None)
    }

    /// Handles a BACK response. Unsupported unless overridden.
    fn go_back(&self, _value: V, response: &HurdleResponse<V::Requirement>) -> Result<V> {
        Err(Error::UnsupportedHurdleResultCode {
            requirement: response.requirement.to_string(),
            code: ResultCode::Back.to_string(),
        })
    }

    /// Runs once for any failure of [`Controller::process`], including
    /// cancellation and errors from the domain operations. The error is still
    /// propagated unless this hook fails itself.
    fn fail(&self, _error: &Error, value: V) -> Result<V> {
        Ok(value)
    }

    /// Runs the requirement collection algorithm for one batch of inputs.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidProcessState`] if the value is not in
    ///   [`expected_state`](Self::expected_state)
    /// - [`Error::ProcessWasCancelled`] if any input is CANCELLED
    /// - [`Error::InvalidRequirementResult`] if an input answers a requirement
    ///   that is not currently missing
    /// - [`Error::UnsupportedHurdleResultCode`] for codes this layer rejects
    /// - anything the domain operations return
    ///
    /// Called through [`Controller::process`], cancellation is already handled
    /// before this runs and [`fail`](Self::fail) runs on every error. The
    /// cancellation check here only fires when this is called directly, and
    /// direct calls never run `fail`.
    fn process_requirements(
        &self,
        value: V,
        inputs: &[Input<V::Requirement>],
        ctx: &ControllerContext<'_, V>,
    ) -> Result<ProcessingState<V>> {
        let expected = self.expected_state();
        let actual = value.state();
        if actual != expected {
            return Err(Error::InvalidProcessState {
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }

        if let Some(cancelled) = inputs.iter().find(|input| input.is_cancelled()) {
            let requirement = cancelled.requirement().to_string();
            tracing::warn!(
                process_id = %value.id(),
                requirement = %requirement,
                "[RequirementController] Cancellation received"
            );
            self.on_cancel(value, ctx)?;
            return Err(Error::ProcessWasCancelled { requirement });
        }

        let missing = self.find_missing_requirements(&value)?;
        if missing.is_empty() {
            tracing::debug!(
                process_id = %value.id(),
                state = %actual,
                "[RequirementController] Nothing outstanding, transitioning"
            );
            let transitioned = self.transition(value, ctx)?;
            return self.complete(transitioned);
        }

        let mut remaining = missing;
        let mut current = value;
        for input in inputs {
            let requirement = input.requirement();
            let Some(position) = remaining.iter().position(|candidate| candidate == requirement)
            else {
                tracing::warn!(
                    process_id = %current.id(),
                    requirement = %requirement,
                    "[RequirementController] Rejected input for a requirement that is not missing"
                );
                return Err(Error::InvalidRequirementResult {
                    process_id: current.id().to_string(),
                    requirement: requirement.to_string(),
                });
            };

            current = self.apply_input(current, input)?;
            remaining.remove(position);
        }

        let updated_missing = self.find_missing_requirements(&current)?;
        if updated_missing.is_empty() {
            tracing::debug!(
                process_id = %current.id(),
                state = %actual,
                "[RequirementController] All requirements satisfied, transitioning"
            );
            let transitioned = self.transition(current, ctx)?;
            return self.complete(transitioned);
        }

        let mut hurdles: Vec<Hurdle<V::Requirement>> = Vec::new();
        for requirement in &updated_missing {
            let produced = self.hurdles_for_requirement(requirement, &current, &hurdles)?;
            merge_hurdles(&mut hurdles, produced);
        }

        let next_endpoint = if hurdles
            .iter()
            .any(|hurdle| self.requires_secure_endpoint(&hurdle.requirement))
        {
            NextEndpoint::SecureExecute
        } else {
            NextEndpoint::Execute
        };

        tracing::debug!(
            process_id = %current.id(),
            missing = updated_missing.len(),
            hurdles = hurdles.len(),
            next_endpoint = %next_endpoint,
            "[RequirementController] Requirements still missing"
        );

        Ok(ProcessingState::UserInteractions {
            interactions: hurdles.into_iter().map(Into::into).collect(),
            next_endpoint: Some(next_endpoint),
        })
    }

    /// Applies one input according to its result code.
    fn apply_input(&self, value: V, input: &Input<V::Requirement>) -> Result<V> {
        match input.result_code() {
            ResultCode::Cleared | ResultCode::Failed => {
                self.update_value(value, &input.to_response())
            }
            // A skipped hurdle counts as satisfied without touching the value
            ResultCode::Skipped => Ok(value),
            ResultCode::Back => self.go_back(value, &input.to_response()),
            code => Err(Error::UnsupportedHurdleResultCode {
                requirement: input.requirement().to_string(),
                code: code.to_string(),
            }),
        }
    }

    /// Finishes a call whose requirements are all satisfied.
    fn complete(&self, value: V) -> Result<ProcessingState<V>> {
        match self.final_notification(&value)? {
            Some(notification) => Ok(ProcessingState::notify(notification)),
            None => Ok(ProcessingState::Complete(value)),
        }
    }
}

impl<V, T> Controller<V> for T
where
    V: ProcessValue,
    T: RequirementController<V>,
{
    fn process_inputs(
        &self,
        value: V,
        inputs: &[Input<V::Requirement>],
        ctx: &ControllerContext<'_, V>,
    ) -> Result<ProcessingState<V>> {
        self.process_requirements(value, inputs, ctx)
    }

    fn handle_cancelled(&self, value: V, ctx: &ControllerContext<'_, V>) -> Result<V> {
        self.on_cancel(value, ctx)
    }

    fn handle_failure(&self, error: &Error, value: V) -> Result<V> {
        self.fail(error, value)
    }
}

/// Folds newly produced hurdles into the accumulated list.
///
/// A hurdle whose requirement matches an accumulated one replaces it in
/// place; hurdles for new requirements are appended.
pub fn merge_hurdles<R: PartialEq>(accumulated: &mut Vec<Hurdle<R>>, produced: Vec<Hurdle<R>>) {
    for hurdle in produced {
        match accumulated
            .iter_mut()
            .find(|existing| existing.requirement == hurdle.requirement)
        {
            Some(existing) => *existing = hurdle,
            None => accumulated.push(hurdle),
        }
    }
}
