use serde::Deserialize;

/// A document-creation event, already classified for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    AnnouncementCreated(AnnouncementEvent),
    MentionCreated(MentionEvent),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementEvent {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionEvent {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub source_id: String,
}

/// Body of a document created in the `notices` collection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoticeDoc {
    #[serde(default)]
    pub title: String,
}

impl NoticeDoc {
    pub fn into_event(self, notice_id: &str) -> AnnouncementEvent {
        AnnouncementEvent {
            id: notice_id.to_string(),
            title: self.title,
        }
    }
}

/// Body of a document created in the `notifications` collection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationDoc {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default, rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, rename = "sourceId")]
    pub source_id: String,
}

impl NotificationDoc {
    /// Only mention notifications are dispatched; any other kind is filtered out.
    pub fn into_event(self, notification_id: &str) -> Option<MentionEvent> {
        if self.kind != "mention" {
            return None;
        }
        Some(MentionEvent {
            id: notification_id.to_string(),
            user_id: self.user_id,
            title: self.title,
            content: self.content,
            source_id: self.source_id,
        })
    }
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;

    #[test]
    fn notification_doc__should_filter_non_mention_kinds() {
        // Given
        let doc = NotificationDoc {
            kind: "like".to_string(),
            user_id: "u1".to_string(),
            ..Default::default()
        };

        // When
        let event = doc.into_event("n1");

        // Then
        assert!(event.is_none());
    }

    #[test]
    fn notification_doc__should_map_mention_fields() {
        // Given
        let doc = NotificationDoc {
            kind: "mention".to_string(),
            user_id: "u1".to_string(),
            title: "New reply".to_string(),
            content: "hi".to_string(),
            source_id: "post42".to_string(),
        };

        // When
        let event = doc.into_event("n1").expect("mention event");

        // Then
        assert_eq!(event.id, "n1");
        assert_eq!(event.user_id, "u1");
        assert_eq!(event.title, "New reply");
        assert_eq!(event.content, "hi");
        assert_eq!(event.source_id, "post42");
    }

    #[test]
    fn notification_doc__should_default_missing_fields_to_empty() {
        // Given
        let json = r#"{"type": "mention", "userId": "u1"}"#;

        // When
        let doc: NotificationDoc = serde_json::from_str(json).expect("parse doc");
        let event = doc.into_event("n1").expect("mention event");

        // Then
        assert_eq!(event.title, "");
        assert_eq!(event.content, "");
        assert_eq!(event.source_id, "");
    }

    #[test]
    fn notice_doc__should_map_title() {
        // Given
        let doc = NoticeDoc {
            title: "System maintenance".to_string(),
        };

        // When
        let event = doc.into_event("abc123");

        // Then
        assert_eq!(event.id, "abc123");
        assert_eq!(event.title, "System maintenance");
    }
}
