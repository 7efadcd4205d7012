use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of chunks the backend retrieves per question.
pub const DEFAULT_TOP_K: u32 = 5;

// ── Papers ───────────────────────────────────────────────────────────────────

/// Metadata for an uploaded paper, as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    #[serde(rename = "paper_id")]
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub title: Option<String>,
    pub upload_date: String,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_chunks: u32,
}

impl Paper {
    /// Title when the backend extracted one, the filename otherwise.
    pub fn display_name(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => &self.filename,
        }
    }

    /// Calendar day of the upload (`YYYY-MM-DD`), for compact listing.
    pub fn upload_day(&self) -> &str {
        self.upload_date.get(..10).unwrap_or(&self.upload_date)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperList {
    pub papers: Vec<Paper>,
    #[serde(default)]
    pub total: usize,
}

/// Response to `POST /upload_paper`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub success: bool,
    pub paper_id: String,
    pub filename: String,
    pub message: String,
    #[serde(default)]
    pub total_chunks: u32,
    #[serde(default)]
    pub total_pages: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperDeleted {
    pub success: bool,
    pub paper_id: String,
    pub message: String,
}

// ── Groups ───────────────────────────────────────────────────────────────────

/// Named collection of papers used to scope a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperGroup {
    #[serde(rename = "group_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub paper_ids: Vec<String>,
    pub created_date: String,
}

impl PaperGroup {
    pub fn contains(&self, paper_id: &str) -> bool {
        self.paper_ids.iter().any(|id| id == paper_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupList {
    pub groups: Vec<PaperGroup>,
    #[serde(default)]
    pub total: usize,
}

/// Request body for `POST /groups`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCreate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub paper_ids: Vec<String>,
}

/// Request body for `PUT /groups/{id}`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_papers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_papers: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDeleted {
    pub success: bool,
    pub group_id: String,
    pub message: String,
}

// ── Questions & answers ──────────────────────────────────────────────────────

/// Answer style requested from the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Academic,
    Simple,
    Eli5,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Academic, Mode::Simple, Mode::Eli5];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Academic => "academic",
            Mode::Simple => "simple",
            Mode::Eli5 => "eli5",
        }
    }

    /// Human-facing label used by the header and the mode selector.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Academic => "Academic",
            Mode::Simple => "Simple",
            Mode::Eli5 => "ELI5",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body for `POST /ask_question`.
///
/// `paper_id` and `group_id` are serialized as `null` when absent; at most one
/// of them is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
    #[serde(default)]
    pub paper_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
}

fn default_top_k() -> u32 {
    DEFAULT_TOP_K
}

/// Fewest papers a comparison accepts.
pub const MIN_COMPARE_PAPERS: usize = 2;

/// Arguments of `POST /compare_papers`. On the wire `question` and `mode` are
/// query parameters ([`CompareQuery`]) and the paper ids are the JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareRequest {
    pub question: String,
    pub paper_ids: Vec<String>,
    pub mode: Mode,
}

impl CompareRequest {
    pub fn query(&self) -> CompareQuery {
        CompareQuery {
            question: self.question.clone(),
            mode: self.mode,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareQuery {
    pub question: String,
    #[serde(default)]
    pub mode: Mode,
}

/// Pointer from an answer back into a source paper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub paper_id: String,
    pub page: u32,
    pub section: String,
    pub chunk_preview: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
    #[serde(default)]
    pub citations: Vec<Citation>,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub retrieved_chunks: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub vector_store: String,
}

impl Health {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

// ── Transcript ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One turn of the in-memory chat transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub citations: Option<Vec<Citation>>,
    pub mode: Option<Mode>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paper_reads_backend_field_names() {
        let json = r#"{
            "paper_id": "a1b2c3d4",
            "filename": "attention.pdf",
            "title": "Attention Is All You Need",
            "upload_date": "2024-05-01T10:11:12.123456",
            "total_pages": 15,
            "total_chunks": 42
        }"#;
        let paper: Paper = serde_json::from_str(json).unwrap();
        assert_eq!(paper.id, "a1b2c3d4");
        assert_eq!(paper.display_name(), "Attention Is All You Need");
        assert_eq!(paper.upload_day(), "2024-05-01");
        assert_eq!(paper.total_chunks, 42);
    }

    #[test]
    fn paper_without_title_falls_back_to_filename() {
        let json = r#"{"paper_id":"x","filename":"notes.pdf","title":null,"upload_date":"2024"}"#;
        let paper: Paper = serde_json::from_str(json).unwrap();
        assert_eq!(paper.display_name(), "notes.pdf");
        assert_eq!(paper.upload_day(), "2024");
        assert_eq!(paper.total_pages, 0);
    }

    #[test]
    fn question_request_serializes_nulls_for_missing_focus() {
        let req = QuestionRequest {
            question: "What is the sample size?".into(),
            paper_id: None,
            group_id: Some("g-1".into()),
            mode: Mode::Eli5,
            top_k: DEFAULT_TOP_K,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["paper_id"], serde_json::Value::Null);
        assert_eq!(value["group_id"], "g-1");
        assert_eq!(value["mode"], "eli5");
        assert_eq!(value["top_k"], 5);
    }

    #[test]
    fn group_update_omits_untouched_fields() {
        let update = GroupUpdate {
            add_papers: Some(vec!["p1".into()]),
            ..GroupUpdate::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"add_papers":["p1"]}"#);
    }

    #[test]
    fn mode_uses_lowercase_wire_names() {
        assert_eq!(serde_json::from_str::<Mode>(r#""eli5""#).unwrap(), Mode::Eli5);
        assert!(serde_json::from_str::<Mode>(r#""pirate""#).is_err());
        assert_eq!(Mode::default().label(), "Academic");
    }
}
