//! Root state and the operations that mutate it.
//!
//! [`SessionState`] is plain data with synchronous transitions. [`Session`]
//! pairs it with a [`ResearchApi`] and runs each operation as
//! "transition, await the call, transition"; the store is never borrowed
//! across an await, so a signal-backed store in the browser and a `RefCell`
//! in tests behave the same.

pub mod state;
pub mod transcript;

use std::cell::RefCell;
use std::rc::Rc;

use chrono::Utc;
use log::{error, info};

use crate::api::{ResearchApi, UploadFile};
use crate::errors::{ClientError, ValidationError};
use crate::group_form::GroupSubmission;
use crate::models::{
    GroupCreate, GroupUpdate, Health, PaperGroup, UploadReceipt, MIN_COMPARE_PAPERS,
};
use crate::upload::{self, UploadStatus};

pub use state::{Connection, Focus, SessionState};
pub use transcript::{Transcript, APOLOGY};

/// Where the [`SessionState`] lives.
pub trait StateStore {
    fn read<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R;
    fn write<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R;
}

/// Single-threaded in-memory store.
#[derive(Debug, Clone, Default)]
pub struct LocalStore(Rc<RefCell<SessionState>>);

impl LocalStore {
    pub fn new(state: SessionState) -> Self {
        Self(Rc::new(RefCell::new(state)))
    }
}

impl StateStore for LocalStore {
    fn read<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        f(&self.0.borrow())
    }

    fn write<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }
}

/// The root controller: API access plus the state it keeps in sync.
#[derive(Debug, Clone, Copy)]
pub struct Session<A, S> {
    api: A,
    store: S,
}

impl<A: ResearchApi, S: StateStore> Session<A, S> {
    pub fn new(api: A, store: S) -> Self {
        Self { api, store }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn snapshot(&self) -> SessionState {
        self.store.read(SessionState::clone)
    }

    // ── Lists ────────────────────────────────────────────────────────────────

    /// Replaces the paper list; a failure keeps the previous one.
    pub async fn fetch_papers(&self) {
        match self.api.list_papers().await {
            Ok(papers) => self.store.write(|s| s.replace_papers(papers)),
            Err(e) => error!("Failed to fetch papers: {e}"),
        }
    }

    pub async fn fetch_groups(&self) {
        match self.api.list_groups().await {
            Ok(groups) => self.store.write(|s| s.replace_groups(groups)),
            Err(e) => error!("Failed to fetch groups: {e}"),
        }
    }

    pub async fn refresh(&self) {
        self.fetch_papers().await;
        self.fetch_groups().await;
    }

    pub async fn check_health(&self) -> Result<Health, ClientError> {
        let outcome = self.api.health().await;
        self.store.write(|s| {
            s.connection = match &outcome {
                Ok(health) => Connection::Online(health.clone()),
                Err(e) => Connection::Offline(e.to_string()),
            };
        });
        if let Err(e) = &outcome {
            error!("Health check failed: {e}");
        }
        outcome
    }

    // ── Papers ───────────────────────────────────────────────────────────────

    /// Uploads one PDF. Non-PDF files fail locally without a request.
    pub async fn upload_paper(&self, file: &A::File) -> Result<UploadReceipt, ClientError> {
        let filename = file.file_name();
        if let Err(e) = upload::check_pdf(file) {
            self.store.write(|s| s.upload = UploadStatus::Failed(e.to_string()));
            return Err(e.into());
        }

        self.store.write(|s| {
            s.upload = UploadStatus::Processing {
                filename: filename.clone(),
            }
        });

        match self.api.upload_paper(file).await {
            Ok(receipt) => {
                info!("Uploaded {filename} as {}", receipt.paper_id);
                self.store
                    .write(|s| s.upload = UploadStatus::Succeeded { filename });
                self.fetch_papers().await;
                Ok(receipt)
            }
            Err(e) => {
                error!("Failed to upload {filename}: {e}");
                self.store
                    .write(|s| s.upload = UploadStatus::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    pub async fn delete_paper(&self, paper_id: &str) {
        match self.api.delete_paper(paper_id).await {
            Ok(()) => {
                self.store.write(|s| s.forget_paper(paper_id));
                self.fetch_papers().await;
            }
            Err(e) => error!("Failed to delete paper {paper_id}: {e}"),
        }
    }

    // ── Groups ───────────────────────────────────────────────────────────────

    pub async fn create_group(&self, group: &GroupCreate) -> Result<PaperGroup, ClientError> {
        if group.name.trim().is_empty() {
            return Err(ValidationError::EmptyGroupName.into());
        }
        let created = self.api.create_group(group).await.map_err(|e| {
            error!("Failed to create group '{}': {e}", group.name);
            e
        })?;
        self.fetch_groups().await;
        Ok(created)
    }

    pub async fn update_group(
        &self,
        group_id: &str,
        update: &GroupUpdate,
    ) -> Result<PaperGroup, ClientError> {
        if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ValidationError::EmptyGroupName.into());
        }
        let updated = self.api.update_group(group_id, update).await.map_err(|e| {
            error!("Failed to update group {group_id}: {e}");
            e
        })?;
        self.fetch_groups().await;
        Ok(updated)
    }

    pub async fn delete_group(&self, group_id: &str) {
        match self.api.delete_group(group_id).await {
            Ok(()) => {
                self.store.write(|s| s.forget_group(group_id));
                self.fetch_groups().await;
            }
            Err(e) => error!("Failed to delete group {group_id}: {e}"),
        }
    }

    /// Deletes the group awaiting confirmation, if any.
    pub async fn confirm_group_delete(&self) {
        let Some(group_id) = self.store.write(|s| s.pending_group_delete.take()) else {
            return;
        };
        self.delete_group(&group_id).await;
    }

    pub async fn add_papers_to_group(
        &self,
        group_id: &str,
        paper_ids: &[String],
    ) -> Result<(), ClientError> {
        self.api
            .add_papers_to_group(group_id, paper_ids)
            .await
            .map_err(|e| {
                error!("Failed to add papers to group {group_id}: {e}");
                e
            })?;
        self.fetch_groups().await;
        Ok(())
    }

    pub async fn remove_paper_from_group(
        &self,
        group_id: &str,
        paper_id: &str,
    ) -> Result<(), ClientError> {
        self.api
            .remove_paper_from_group(group_id, paper_id)
            .await
            .map_err(|e| {
                error!("Failed to remove paper {paper_id} from group {group_id}: {e}");
                e
            })?;
        self.fetch_groups().await;
        Ok(())
    }

    /// Submits the open group editor. Closes it on success, otherwise leaves
    /// it open with the error shown.
    pub async fn submit_group_editor(&self) -> Result<PaperGroup, ClientError> {
        let submission = self.store.write(|s| {
            let form = s.group_editor.as_mut()?;
            let submission = form.submission();
            match &submission {
                Ok(_) => {
                    form.error = None;
                    form.saving = true;
                }
                Err(e) => form.error = Some(e.to_string()),
            }
            Some(submission)
        });

        let submission = match submission {
            None => return Err(ValidationError::NoGroupEditor.into()),
            Some(Err(e)) => return Err(e.into()),
            Some(Ok(submission)) => submission,
        };

        let outcome = match &submission {
            GroupSubmission::Create(create) => self.create_group(create).await,
            GroupSubmission::Update { group_id, update } => {
                self.update_group(group_id, update).await
            }
        };

        self.store.write(|s| match &outcome {
            Ok(_) => s.close_group_editor(),
            Err(e) => {
                if let Some(form) = s.group_editor.as_mut() {
                    form.saving = false;
                    form.error = Some(e.to_string());
                }
            }
        });
        outcome
    }

    // ── Chat ─────────────────────────────────────────────────────────────────

    /// Asks the backend about the current focus. Every accepted question
    /// adds exactly two transcript entries.
    pub async fn ask_question(&self, question: &str) -> Result<(), ClientError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ValidationError::EmptyQuestion.into());
        }

        let request = self.store.write(|s| s.begin_question(question, Utc::now()));
        let outcome = self.api.ask_question(&request).await;
        if let Err(e) = &outcome {
            error!("Failed to get answer: {e}");
        }
        self.store.write(|s| s.finish_question(outcome, Utc::now()));
        Ok(())
    }

    /// Asks for a comparison of `paper_ids`, independent of the focus. The
    /// transcript gains the same two entries as for a question.
    pub async fn compare_papers(
        &self,
        question: &str,
        paper_ids: &[String],
    ) -> Result<(), ClientError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ValidationError::EmptyQuestion.into());
        }
        if paper_ids.len() < MIN_COMPARE_PAPERS {
            return Err(ValidationError::TooFewPapers.into());
        }

        let request = self
            .store
            .write(|s| s.begin_comparison(question, paper_ids, Utc::now()));
        let outcome = self.api.compare_papers(&request).await;
        if let Err(e) = &outcome {
            error!("Failed to compare papers: {e}");
        }
        self.store.write(|s| s.finish_question(outcome, Utc::now()));
        Ok(())
    }
}
