//! The seam between the session controller and the research API.
//!
//! The browser implements [`ResearchApi`] with gloo-net, native code with
//! reqwest ([`crate::http::HttpApi`]); tests plug in a recording fake.

use async_trait::async_trait;

use crate::errors::ClientError;
use crate::models::{
    AnswerResponse, CompareRequest, GroupCreate, GroupUpdate, Health, Paper, PaperGroup,
    QuestionRequest, UploadReceipt,
};

/// Route paths relative to the API base URL.
pub mod paths {
    pub const LIST_PAPERS: &str = "/list_papers";
    pub const UPLOAD_PAPER: &str = "/upload_paper";
    pub const GROUPS: &str = "/groups";
    pub const ASK_QUESTION: &str = "/ask_question";
    pub const COMPARE_PAPERS: &str = "/compare_papers";
    pub const HEALTH: &str = "/health";

    pub fn delete_paper(paper_id: &str) -> String {
        format!("/delete_paper/{paper_id}")
    }

    pub fn group(group_id: &str) -> String {
        format!("/groups/{group_id}")
    }

    pub fn group_papers(group_id: &str) -> String {
        format!("/groups/{group_id}/papers")
    }

    pub fn group_paper(group_id: &str, paper_id: &str) -> String {
        format!("/groups/{group_id}/papers/{paper_id}")
    }
}

/// Multipart field the backend reads the PDF from.
pub const UPLOAD_FIELD: &str = "file";

/// Something that can be posted as the `file` field of an upload.
pub trait UploadFile {
    fn file_name(&self) -> String;
    fn content_type(&self) -> String;
}

/// An upload whose bytes are already in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PaperUpload {
    pub fn pdf(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: crate::upload::PDF_MIME.to_string(),
            bytes,
        }
    }
}

impl UploadFile for PaperUpload {
    fn file_name(&self) -> String {
        self.filename.clone()
    }

    fn content_type(&self) -> String {
        self.content_type.clone()
    }
}

/// Operations the research API exposes to the client.
#[async_trait(?Send)]
pub trait ResearchApi {
    type File: UploadFile;

    async fn list_papers(&self) -> Result<Vec<Paper>, ClientError>;
    async fn upload_paper(&self, file: &Self::File) -> Result<UploadReceipt, ClientError>;
    async fn delete_paper(&self, paper_id: &str) -> Result<(), ClientError>;

    async fn list_groups(&self) -> Result<Vec<PaperGroup>, ClientError>;
    async fn create_group(&self, group: &GroupCreate) -> Result<PaperGroup, ClientError>;
    async fn update_group(
        &self,
        group_id: &str,
        update: &GroupUpdate,
    ) -> Result<PaperGroup, ClientError>;
    async fn delete_group(&self, group_id: &str) -> Result<(), ClientError>;
    async fn add_papers_to_group(
        &self,
        group_id: &str,
        paper_ids: &[String],
    ) -> Result<(), ClientError>;
    async fn remove_paper_from_group(
        &self,
        group_id: &str,
        paper_id: &str,
    ) -> Result<(), ClientError>;

    async fn ask_question(&self, request: &QuestionRequest) -> Result<AnswerResponse, ClientError>;
    async fn compare_papers(&self, request: &CompareRequest) -> Result<AnswerResponse, ClientError>;
    async fn health(&self) -> Result<Health, ClientError>;
}
