use std::time::Duration;

use crate::api::UploadFile;
use crate::errors::ValidationError;

pub const PDF_MIME: &str = "application/pdf";

/// How long the success badge stays up before clearing itself.
pub const SUCCESS_DISPLAY: Duration = Duration::from_secs(3);

/// Rejects anything whose declared MIME type is not PDF. Content is not sniffed.
pub fn check_pdf(file: &impl UploadFile) -> Result<(), ValidationError> {
    let content_type = file.content_type();
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    if essence.eq_ignore_ascii_case(PDF_MIME) {
        Ok(())
    } else {
        Err(ValidationError::NotPdf {
            filename: file.file_name(),
        })
    }
}

/// Upload zone status shown under the drop area.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UploadStatus {
    #[default]
    Idle,
    Processing { filename: String },
    Succeeded { filename: String },
    /// Stays up until the next attempt.
    Failed(String),
}

impl UploadStatus {
    pub fn label(&self) -> Option<String> {
        match self {
            UploadStatus::Idle => None,
            UploadStatus::Processing { .. } => Some("Processing…".to_string()),
            UploadStatus::Succeeded { .. } => Some("✓ Success!".to_string()),
            UploadStatus::Failed(err) => Some(err.clone()),
        }
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, UploadStatus::Processing { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, UploadStatus::Failed(_))
    }
}
