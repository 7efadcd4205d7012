use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Everything that can go wrong between the client and the research API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    // ── Transport ────────────────────────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response. `detail` is the server-supplied message when present.
    #[error("{detail}")]
    Status { status: u16, detail: String },

    #[error("Parse error: {0}")]
    Decode(String),

    // ── Client-side checks ───────────────────────────────────────────────────
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Checks performed before anything is sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Group name cannot be empty")]
    EmptyGroupName,

    #[error("Question cannot be empty")]
    EmptyQuestion,

    #[error("Only PDF files are accepted ({filename})")]
    NotPdf { filename: String },

    #[error("No group editor is open")]
    NoGroupEditor,

    #[error("At least 2 papers are required for comparison")]
    TooFewPapers,
}

/// FastAPI-style error body: `detail` is either a string or a list of
/// validation entries carrying a `msg`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Value,
}

impl ClientError {
    /// Builds a `Status` error from a response status and its raw body.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| detail_message(&b.detail))
            .unwrap_or_else(|| format!("Server error: {status}"));
        ClientError::Status { status, detail }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

fn detail_message(detail: &Value) -> Option<String> {
    match detail {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(entries) => {
            let msgs: Vec<&str> = entries
                .iter()
                .filter_map(|e| e.get("msg").and_then(Value::as_str))
                .collect();
            (!msgs.is_empty()).then(|| msgs.join("; "))
        }
        Value::Null | Value::String(_) => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_is_surfaced_verbatim() {
        let err = ClientError::from_status(400, r#"{"detail":"Only PDF files are accepted"}"#);
        assert_eq!(err.to_string(), "Only PDF files are accepted");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn validation_entries_are_joined() {
        let body = r#"{"detail":[{"loc":["body","name"],"msg":"too short"},{"msg":"too long"}]}"#;
        let err = ClientError::from_status(422, body);
        assert_eq!(err.to_string(), "too short; too long");
    }

    #[test]
    fn missing_detail_falls_back_to_status() {
        let err = ClientError::from_status(502, "<html>bad gateway</html>");
        assert_eq!(err.to_string(), "Server error: 502");
        assert!(!err.is_not_found());
        assert!(ClientError::from_status(404, "").is_not_found());
    }

    #[test]
    fn empty_detail_falls_back_to_status() {
        let err = ClientError::from_status(500, r#"{"detail":""}"#);
        assert_eq!(err.to_string(), "Server error: 500");
    }

    #[test]
    fn validation_errors_convert() {
        let err: ClientError = ValidationError::EmptyGroupName.into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Group name cannot be empty");
    }
}
