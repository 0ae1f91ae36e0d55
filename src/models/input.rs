use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Outcome code attached to a client-submitted hurdle response.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultCode {
    /// The hurdle was answered and its payload should be applied
    Cleared,
    /// The hurdle was attempted and failed; the payload describes the failure
    Failed,
    /// The client aborted the whole process
    Cancelled,
    /// The client chose not to answer; treated as satisfied
    Skipped,
    /// The client wants to go back to a previous step
    Back,
    /// Reserved for external flows, rejected by this core
    FinishedOk,
    /// Reserved for external flows, rejected by this core
    FinishedError,
}

/// A client's answer to one hurdle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HurdleResponse<R> {
    pub requirement: R,
    pub result: ResultCode,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl<R> HurdleResponse<R> {
    /// Creates a response with the given code and no payload.
    pub fn new(requirement: R, result: ResultCode) -> Self {
        Self {
            requirement,
            result,
            payload: serde_json::Value::Null,
        }
    }

    pub fn cleared(requirement: R) -> Self {
        Self::new(requirement, ResultCode::Cleared)
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

/// Signal that an externally awaited requirement has been satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeResult<R> {
    pub requirement: R,
}

/// Anything a client can send back into a process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Input<R> {
    HurdleResponse(HurdleResponse<R>),
    Resume(ResumeResult<R>),
}

impl<R: Clone> Input<R> {
    /// Shorthand for a `CLEARED` response without payload.
    pub fn cleared(requirement: R) -> Self {
        Self::HurdleResponse(HurdleResponse::cleared(requirement))
    }

    pub fn response(requirement: R, result: ResultCode) -> Self {
        Self::HurdleResponse(HurdleResponse::new(requirement, result))
    }

    pub fn resume(requirement: R) -> Self {
        Self::Resume(ResumeResult { requirement })
    }

    /// The requirement this input answers.
    pub fn requirement(&self) -> &R {
        match self {
            Self::HurdleResponse(response) => &response.requirement,
            Self::Resume(resume) => &resume.requirement,
        }
    }

    /// The result code of this input; resume signals are implicitly cleared.
    pub fn result_code(&self) -> ResultCode {
        match self {
            Self::HurdleResponse(response) => response.result,
            Self::Resume(_) => ResultCode::Cleared,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.result_code() == ResultCode::Cancelled
    }

    /// Views this input as a hurdle response, turning a resume signal into a
    /// `CLEARED` response with a null payload.
    pub fn to_response(&self) -> HurdleResponse<R> {
        match self {
            Self::HurdleResponse(response) => response.clone(),
            Self::Resume(resume) => HurdleResponse::cleared(resume.requirement.clone()),
        }
    }
}
