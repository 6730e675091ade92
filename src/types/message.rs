use std::collections::BTreeMap;

/// Delivery address of a push message: a named broadcast channel or an
/// explicit device token list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Topic(String),
    Tokens(Vec<String>),
}

/// Normalized push message built fresh per event. `data` always carries at
/// least `type` and `url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePayload {
    pub title: String,
    pub body: String,
    pub data: BTreeMap<String, String>,
    pub target: Option<Target>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDelivery {
    pub token: String,
    pub error_code: String,
}

/// Outcome of a multicast send. `failures` is index-aligned with the
/// submitted token order; partial failure is not itself an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchResult {
    pub success_count: usize,
    pub failures: Vec<FailedDelivery>,
}

/// Infrastructural failure of a gateway call. The `code` is what escalates
/// to the invoking framework as `{"error": code}`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("gateway error {code}: {message}")]
pub struct GatewayError {
    pub code: String,
    pub message: String,
}

impl GatewayError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
