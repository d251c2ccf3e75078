use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Reply object sent for `/api/chat` and `ai-response` socket events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    /// Always `"assistant"`
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    /// Milliseconds since the Unix epoch at creation
    pub id: i64,
    /// RFC 3339 creation time
    pub timestamp: String,
}

impl ChatReply {
    pub fn assistant(content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            kind: "assistant".to_string(),
            content: content.into(),
            id: now.timestamp_millis(),
            timestamp: now.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assistant_reply_shape() {
        let reply = ChatReply::assistant("Hi there!");
        let value = serde_json::to_value(&reply).unwrap();

        assert_eq!(value["type"], "assistant");
        assert_eq!(value["content"], "Hi there!");
        assert!(value["id"].as_i64().unwrap() > 0);
        assert!(chrono::DateTime::parse_from_rfc3339(value["timestamp"].as_str().unwrap()).is_ok());
    }
}
