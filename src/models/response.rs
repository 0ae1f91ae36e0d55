use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use super::interaction::UserInteraction;

/// The domain API operation on whose behalf a process is being advanced.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Operation {
    Create,
    Execute,
    Resume,
    Update,
}

/// Endpoint the client should call next to answer the returned hurdles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum NextEndpoint {
    Execute,
    SecureExecute,
}

/// Outcome of one execute call, handed back to the API layer.
///
/// An empty `interactions` list with no `next_endpoint` means the process
/// either reached a terminal state or is waiting for an external event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteResponse<Id, R> {
    pub id: Id,
    pub interactions: Vec<UserInteraction<R>>,
    pub next_endpoint: Option<NextEndpoint>,
}

impl<Id, R> ExecuteResponse<Id, R> {
    /// A response that asks nothing further of the client.
    pub fn finished(id: Id) -> Self {
        Self {
            id,
            interactions: Vec::new(),
            next_endpoint: None,
        }
    }

    pub fn with_interactions(
        id: Id,
        interactions: Vec<UserInteraction<R>>,
        next_endpoint: Option<NextEndpoint>,
    ) -> Self {
        Self {
            id,
            interactions,
            next_endpoint,
        }
    }

    /// Returns true if the client has hurdles to answer.
    pub fn has_hurdles(&self) -> bool {
        self.interactions.iter().any(UserInteraction::is_hurdle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finished_response() {
        let response: ExecuteResponse<u32, &str> = ExecuteResponse::finished(7);
        assert_eq!(response.id, 7);
        assert!(response.interactions.is_empty());
        assert!(response.next_endpoint.is_none());
        assert!(!response.has_hurdles());
    }

    #[test]
    fn test_endpoint_names() {
        assert_eq!(NextEndpoint::SecureExecute.to_string(), "SECURE_EXECUTE");
        assert_eq!(Operation::Resume.to_string(), "resume");
    }
}
