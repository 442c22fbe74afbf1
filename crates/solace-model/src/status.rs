use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt::Debug;
use utoipa::openapi::{RefOr, Schema};
use utoipa::{PartialSchema, ToSchema, schema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Status {
    pub database: Value,
    pub provider: Value,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ToSchema, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentState {
    Ok,
    Error,
}

/// Health of one backing component. Serialized as `"ok"`, `"error"` or
/// the attached error message.
#[derive(Debug, Clone)]
pub struct ComponentStatus {
    state: ComponentState,
    message: Option<Value>,
}

impl PartialSchema for ComponentStatus {
    fn schema() -> RefOr<Schema> {
        schema!(String).into()
    }
}

impl ToSchema for ComponentStatus {}

impl ComponentStatus {
    fn new(state: ComponentState, message: Option<Value>) -> Self {
        Self { state, message }
    }

    #[must_use]
    pub fn ok() -> Self {
        Self::new(ComponentState::Ok, None)
    }

    #[must_use]
    pub fn error() -> Self {
        Self::new(ComponentState::Error, None)
    }

    #[must_use]
    pub fn from_error_text(message: &str) -> Self {
        Self::new(ComponentState::Error, Some(json!(message)))
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.state == ComponentState::Ok
    }

    #[must_use]
    pub fn into_message(self) -> Value {
        match self.message {
            Some(message) => message,
            // This is safe because the serialization can never fail.
            None => serde_json::to_value(self.state).expect("failed to serialize component status"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_message() {
        assert_eq!(json!("ok"), ComponentStatus::ok().into_message());
        assert_eq!(json!("error"), ComponentStatus::error().into_message());
        assert_eq!(json!("timed out"), ComponentStatus::from_error_text("timed out").into_message());
    }

    #[test]
    fn test_is_ok() {
        assert!(ComponentStatus::ok().is_ok());
        assert!(!ComponentStatus::from_error_text("down").is_ok());
    }
}
