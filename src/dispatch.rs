use std::collections::BTreeMap;

use crate::ports::{PushGateway, TokenStore};
use crate::types::event::{AnnouncementEvent, MentionEvent, NotificationEvent};
use crate::types::message::{GatewayError, MessagePayload, Target};

/// Every announcement is broadcast to this channel; subscribing happens on
/// the client side.
pub const ANNOUNCEMENT_TOPIC: &str = "all_notices";
pub const ANNOUNCEMENT_TITLE: &str = "new announcement";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Broadcast { message_id: String },
    Sent { success_count: usize },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    UnknownUser,
    NoTokens,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("token store read failed: {0}")]
    TokenStore(String),
}

impl DispatchError {
    pub fn code(&self) -> &str {
        match self {
            DispatchError::Gateway(err) => &err.code,
            DispatchError::TokenStore(_) => "token-store/read-failed",
        }
    }
}

/// Maps a domain event into the normalized push message. Pure and total;
/// a mention's target stays unset until the token lookup resolves it.
pub fn build_payload(event: &NotificationEvent) -> MessagePayload {
    match event {
        NotificationEvent::AnnouncementCreated(announcement) => {
            let mut data = BTreeMap::new();
            data.insert("noticeId".to_string(), announcement.id.clone());
            data.insert("type".to_string(), "notice".to_string());
            data.insert("url".to_string(), format!("/notice/{}", announcement.id));
            MessagePayload {
                title: ANNOUNCEMENT_TITLE.to_string(),
                body: announcement.title.clone(),
                data,
                target: Some(Target::Topic(ANNOUNCEMENT_TOPIC.to_string())),
            }
        }
        NotificationEvent::MentionCreated(mention) => {
            let mut data = BTreeMap::new();
            data.insert("notificationId".to_string(), mention.id.clone());
            data.insert("sourceId".to_string(), mention.source_id.clone());
            data.insert("type".to_string(), "mention".to_string());
            data.insert("url".to_string(), format!("/post/{}", mention.source_id));
            MessagePayload {
                title: mention.title.clone(),
                body: mention.content.clone(),
                data,
                target: None,
            }
        }
    }
}

pub async fn handle_event<G, S>(
    gateway: &G,
    store: &S,
    event: &NotificationEvent,
) -> Result<DispatchOutcome, DispatchError>
where
    G: PushGateway,
    S: TokenStore,
{
    match event {
        NotificationEvent::AnnouncementCreated(announcement) => {
            dispatch_announcement(gateway, announcement).await
        }
        NotificationEvent::MentionCreated(mention) => {
            dispatch_mention(gateway, store, mention).await
        }
    }
}

/// Broadcasts a new announcement to the fixed topic. Gateway failures
/// propagate upward without retry; any platform-level retry is the
/// collaborator's responsibility.
pub async fn dispatch_announcement<G: PushGateway>(
    gateway: &G,
    event: &AnnouncementEvent,
) -> Result<DispatchOutcome, DispatchError> {
    let payload = build_payload(&NotificationEvent::AnnouncementCreated(event.clone()));
    let message_id = gateway.send_to_topic(&payload, ANNOUNCEMENT_TOPIC).await?;
    println!(
        "announcement dispatch: sent to topic '{ANNOUNCEMENT_TOPIC}' ({})",
        event.id
    );
    Ok(DispatchOutcome::Broadcast { message_id })
}

/// Multicasts a mention to every device token of the recipient and prunes
/// the tokens that failed delivery. An unknown recipient or an empty token
/// set is a logged no-op, not an error.
pub async fn dispatch_mention<G, S>(
    gateway: &G,
    store: &S,
    event: &MentionEvent,
) -> Result<DispatchOutcome, DispatchError>
where
    G: PushGateway,
    S: TokenStore,
{
    let tokens = match store.tokens(&event.user_id).await {
        Ok(Some(tokens)) => tokens,
        Ok(None) => {
            eprintln!(
                "mention dispatch: no user record for '{}' ({})",
                event.user_id, event.id
            );
            return Ok(DispatchOutcome::Skipped(SkipReason::UnknownUser));
        }
        Err(err) => return Err(DispatchError::TokenStore(err.to_string())),
    };
    if tokens.is_empty() {
        eprintln!(
            "mention dispatch: no tokens for '{}' ({})",
            event.user_id, event.id
        );
        return Ok(DispatchOutcome::Skipped(SkipReason::NoTokens));
    }

    let mut payload = build_payload(&NotificationEvent::MentionCreated(event.clone()));
    payload.target = Some(Target::Tokens(tokens.clone()));

    let result = gateway.send_to_tokens(&payload, &tokens).await?;
    println!(
        "mention dispatch: {} of {} tokens delivered ({})",
        result.success_count,
        tokens.len(),
        event.id
    );

    if !result.failures.is_empty() {
        let mut failed: Vec<String> = result
            .failures
            .iter()
            .map(|failure| failure.token.clone())
            .collect();
        failed.sort();
        failed.dedup();
        // Best-effort cleanup; a prune failure never changes the outcome.
        if let Err(err) = store.remove_tokens(&event.user_id, &failed).await {
            eprintln!(
                "mention dispatch: failed to prune {} stale tokens for '{}': {err}",
                failed.len(),
                event.user_id
            );
        }
    }

    Ok(DispatchOutcome::Sent {
        success_count: result.success_count,
    })
}
