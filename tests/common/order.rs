//! Fixture domain: an order that collects requirements and advances through
//! review and payment states.

use domain_api::AdvancerConfig;
use domain_api::error::{Error, Result};
use domain_api::models::{Hurdle, HurdleResponse, Input, ProcessId};
use domain_api::process::{
    Controller, ControllerContext, ControllerRegistry, ProcessAdvancer, ProcessValue,
    ProcessingState, RequirementController, StateMachine, TableStateMachine, TransitionTable,
    WithState,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum OrderState {
    Initial,
    Review,
    Approved,
    AwaitingPayment,
    Complete,
    Cancelled,
    LoopA,
    LoopB,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Req {
    Req1,
    Req2,
    Payment,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: ProcessId,
    pub state: OrderState,
    pub cleared: BTreeSet<Req>,
}

impl Order {
    pub fn new() -> Self {
        Self::in_state(OrderState::Initial)
    }

    pub fn in_state(state: OrderState) -> Self {
        Self {
            id: ProcessId::new(),
            state,
            cleared: BTreeSet::new(),
        }
    }
}

impl ProcessValue for Order {
    type Id = ProcessId;
    type State = OrderState;
    type Requirement = Req;

    fn id(&self) -> ProcessId {
        self.id
    }

    fn state(&self) -> OrderState {
        self.state
    }
}

impl WithState for Order {
    fn with_state(&self, state: OrderState) -> Self {
        Self {
            state,
            ..self.clone()
        }
    }
}

/// Shared log of hook invocations.
#[derive(Debug, Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<String>>>);

impl Recorder {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Collects `requirements`, then moves to `next`.
pub struct Collector {
    pub state: OrderState,
    pub next: OrderState,
    pub requirements: Vec<Req>,
    pub recorder: Recorder,
}

impl RequirementController<Order> for Collector {
    fn expected_state(&self) -> OrderState {
        self.state
    }

    fn find_missing_requirements(&self, value: &Order) -> Result<Vec<Req>> {
        Ok(self
            .requirements
            .iter()
            .filter(|requirement| !value.cleared.contains(*requirement))
            .copied()
            .collect())
    }

    fn update_value(&self, mut value: Order, response: &HurdleResponse<Req>) -> Result<Order> {
        if !response.payload.is_null() {
            self.recorder
                .push(format!("payload:{}:{}", response.requirement, response.payload));
        }
        value.cleared.insert(response.requirement);
        Ok(value)
    }

    fn transition(&self, value: Order, ctx: &ControllerContext<'_, Order>) -> Result<Order> {
        ctx.machine.transition_to(value, self.next)
    }

    fn hurdles_for_requirement(
        &self,
        requirement: &Req,
        _value: &Order,
        _previous: &[Hurdle<Req>],
    ) -> Result<Vec<Hurdle<Req>>> {
        Ok(vec![Hurdle::new(*requirement)])
    }

    fn on_cancel(&self, value: Order, ctx: &ControllerContext<'_, Order>) -> Result<Order> {
        self.recorder.push("on_cancel");
        ctx.machine.transition_to(value, OrderState::Cancelled)
    }

    fn fail(&self, error: &Error, value: Order) -> Result<Order> {
        self.recorder.push(format!("fail:{}", error.code()));
        Ok(value)
    }
}

/// A state that needs nothing from the client.
pub struct PassThrough {
    pub state: OrderState,
    pub next: OrderState,
}

impl RequirementController<Order> for PassThrough {
    fn expected_state(&self) -> OrderState {
        self.state
    }

    fn find_missing_requirements(&self, _value: &Order) -> Result<Vec<Req>> {
        Ok(Vec::new())
    }

    fn update_value(&self, value: Order, _response: &HurdleResponse<Req>) -> Result<Order> {
        Ok(value)
    }

    fn transition(&self, value: Order, ctx: &ControllerContext<'_, Order>) -> Result<Order> {
        ctx.machine.transition_to(value, self.next)
    }

    fn hurdles_for_requirement(
        &self,
        _requirement: &Req,
        _value: &Order,
        _previous: &[Hurdle<Req>],
    ) -> Result<Vec<Hurdle<Req>>> {
        Ok(Vec::new())
    }
}

/// Waits for an external payment confirmation delivered via resume.
pub struct AwaitPayment;

impl Controller<Order> for AwaitPayment {
    fn process_inputs(
        &self,
        value: Order,
        inputs: &[Input<Req>],
        ctx: &ControllerContext<'_, Order>,
    ) -> Result<ProcessingState<Order>> {
        if inputs
            .iter()
            .any(|input| *input.requirement() == Req::Payment)
        {
            let paid = ctx.machine.transition_to(value, OrderState::Complete)?;
            Ok(ProcessingState::Complete(paid))
        } else {
            Ok(ProcessingState::Waiting(value))
        }
    }
}

pub type OrderAdvancer =
    ProcessAdvancer<Order, ControllerRegistry<Order>, TableStateMachine<Order>>;

pub fn order_machine() -> TableStateMachine<Order> {
    TableStateMachine::from_config(
        TransitionTable::new()
            .allow(OrderState::Initial, OrderState::Complete)
            .allow(OrderState::Initial, OrderState::Review)
            .allow(OrderState::Initial, OrderState::AwaitingPayment)
            .allow(OrderState::Initial, OrderState::Cancelled)
            .allow(OrderState::Review, OrderState::Approved)
            .allow(OrderState::Approved, OrderState::Complete)
            .allow(OrderState::AwaitingPayment, OrderState::Complete)
            .allow(OrderState::LoopA, OrderState::LoopB)
            .allow(OrderState::LoopB, OrderState::LoopA),
        &AdvancerConfig::default(),
    )
}

pub fn collector(next: OrderState, requirements: Vec<Req>, recorder: &Recorder) -> Collector {
    Collector {
        state: OrderState::Initial,
        next,
        requirements,
        recorder: recorder.clone(),
    }
}

/// `Initial` requires `{Req1, Req2}` and then moves straight to `Complete`.
pub fn scenario_advancer(recorder: &Recorder) -> OrderAdvancer {
    let registry = ControllerRegistry::new().register(
        OrderState::Initial,
        collector(OrderState::Complete, vec![Req::Req1, Req::Req2], recorder),
    );
    ProcessAdvancer::new(registry, order_machine())
}

/// `Initial` requires `{Req1, Req2}`, then `Review` and `Approved` pass
/// straight through to `Complete`.
pub fn multi_hop_advancer(recorder: &Recorder) -> OrderAdvancer {
    let registry = ControllerRegistry::new()
        .register(
            OrderState::Initial,
            collector(OrderState::Review, vec![Req::Req1, Req::Req2], recorder),
        )
        .register(
            OrderState::Review,
            PassThrough {
                state: OrderState::Review,
                next: OrderState::Approved,
            },
        )
        .register(
            OrderState::Approved,
            PassThrough {
                state: OrderState::Approved,
                next: OrderState::Complete,
            },
        )
        .register(
            OrderState::LoopA,
            PassThrough {
                state: OrderState::LoopA,
                next: OrderState::LoopB,
            },
        )
        .register(
            OrderState::LoopB,
            PassThrough {
                state: OrderState::LoopB,
                next: OrderState::LoopA,
            },
        );
    ProcessAdvancer::new(registry, order_machine())
}

/// `Initial` needs nothing and moves to `AwaitingPayment`, which waits for a
/// resume.
pub fn payment_advancer(recorder: &Recorder) -> OrderAdvancer {
    let registry = ControllerRegistry::new()
        .register(
            OrderState::Initial,
            collector(OrderState::AwaitingPayment, Vec::new(), recorder),
        )
        .register(OrderState::AwaitingPayment, AwaitPayment);
    ProcessAdvancer::new(registry, order_machine())
}
