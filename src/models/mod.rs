//! Value types exchanged between clients and the process-advancement core.

pub mod input;
pub mod interaction;
pub mod process_id;
pub mod response;

pub use input::{HurdleResponse, Input, ResultCode, ResumeResult};
pub use interaction::{Hurdle, Notification, UserInteraction};
pub use process_id::ProcessId;
pub use response::{ExecuteResponse, NextEndpoint, Operation};
