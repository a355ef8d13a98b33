//! Wire types for the question-answering API.

use serde::{Deserialize, Serialize};

use crate::models::Source;

/// Body of `POST /news-chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
    pub session_id: String,
    pub model: String,
}

/// Response of `POST /news-chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Option<Vec<Source>>,
}

/// An answer ready to be appended to a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<Source>,
}

impl From<AskResponse> for Answer {
    fn from(resp: AskResponse) -> Self {
        Self {
            text: resp.answer,
            sources: resp.sources.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sources_default_to_empty() {
        let resp: AskResponse = serde_json::from_str(r#"{"answer":"X"}"#).unwrap();
        let answer = Answer::from(resp);
        assert_eq!(answer.text, "X");
        assert!(answer.sources.is_empty());
    }

    #[test]
    fn null_sources_default_to_empty() {
        let resp: AskResponse = serde_json::from_str(r#"{"answer":"X","sources":null}"#).unwrap();
        assert!(Answer::from(resp).sources.is_empty());
    }

    #[test]
    fn request_uses_snake_case_fields() {
        let req = AskRequest {
            question: "q".to_string(),
            session_id: "s".to_string(),
            model: "m".to_string(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["session_id"], "s");
        assert_eq!(json["question"], "q");
        assert_eq!(json["model"], "m");
    }
}
