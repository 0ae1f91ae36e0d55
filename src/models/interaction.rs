use serde::{Deserialize, Serialize};

/// A piece of missing information the client must supply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hurdle<R> {
    pub requirement: R,
    /// Request-side detail, e.g. the allowed choices
    #[serde(default)]
    pub detail: serde_json::Value,
}

impl<R> Hurdle<R> {
    pub fn new(requirement: R) -> Self {
        Self {
            requirement,
            detail: serde_json::Value::Null,
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = detail;
        self
    }
}

/// Informational interaction that needs no client response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification<R> {
    pub requirement: R,
    pub message: Option<String>,
}

impl<R> Notification<R> {
    pub fn new(requirement: R) -> Self {
        Self {
            requirement,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// A server-emitted interaction: either a hurdle or a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum UserInteraction<R> {
    Hurdle(Hurdle<R>),
    Notification(Notification<R>),
}

impl<R> UserInteraction<R> {
    pub fn hurdle(requirement: R) -> Self {
        Self::Hurdle(Hurdle::new(requirement))
    }

    pub fn notification(requirement: R) -> Self {
        Self::Notification(Notification::new(requirement))
    }

    /// The requirement identifying this interaction.
    pub fn requirement(&self) -> &R {
        match self {
            Self::Hurdle(hurdle) => &hurdle.requirement,
            Self::Notification(notification) => &notification.requirement,
        }
    }

    pub fn is_hurdle(&self) -> bool {
        matches!(self, Self::Hurdle(_))
    }
}

impl<R> From<Hurdle<R>> for UserInteraction<R> {
    fn from(hurdle: Hurdle<R>) -> Self {
        Self::Hurdle(hurdle)
    }
}

impl<R> From<Notification<R>> for UserInteraction<R> {
    fn from(notification: Notification<R>) -> Self {
        Self::Notification(notification)
    }
}
