#![allow(dead_code, unused_imports)]

pub mod order;

pub use order::{
    AwaitPayment, Collector, Order, OrderAdvancer, OrderState, PassThrough, Recorder, Req,
    collector, multi_hop_advancer, order_machine, payment_advancer, scenario_advancer,
};

/// Installs a test-friendly tracing subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
