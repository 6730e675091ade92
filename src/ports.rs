use crate::types::message::{DispatchResult, GatewayError, MessagePayload};

pub trait PushGateway: Clone + Send + Sync + 'static {
    type TopicFut<'a>: Future<Output = Result<String, GatewayError>> + Send + 'a
    where
        Self: 'a;
    type TokensFut<'a>: Future<Output = Result<DispatchResult, GatewayError>> + Send + 'a
    where
        Self: 'a;

    fn send_to_topic<'a>(
        &'a self,
        payload: &'a MessagePayload,
        topic: &'a str,
    ) -> Self::TopicFut<'a>;

    /// Callers must pass a non-empty token list; empty input is rejected
    /// upstream by the orchestrator.
    fn send_to_tokens<'a>(
        &'a self,
        payload: &'a MessagePayload,
        tokens: &'a [String],
    ) -> Self::TokensFut<'a>;
}

pub trait TokenStore: Clone + Send + Sync + 'static {
    type Error: std::fmt::Display + Send + Sync + 'static;
    type TokensFut<'a>: Future<Output = Result<Option<Vec<String>>, Self::Error>> + Send + 'a
    where
        Self: 'a;
    type RemoveFut<'a>: Future<Output = Result<(), Self::Error>> + Send + 'a
    where
        Self: 'a;

    /// `Ok(None)` means no record exists for the user.
    fn tokens<'a>(&'a self, user_id: &'a str) -> Self::TokensFut<'a>;

    /// Set-difference removal; removing an absent token is a no-op.
    fn remove_tokens<'a>(&'a self, user_id: &'a str, tokens: &'a [String]) -> Self::RemoveFut<'a>;
}
