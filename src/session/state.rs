use chrono::{DateTime, Utc};

use crate::errors::ClientError;
use crate::group_form::GroupForm;
use crate::models::{
    AnswerResponse, CompareRequest, Health, Mode, Paper, PaperGroup, QuestionRequest,
    DEFAULT_TOP_K,
};
use crate::session::transcript::Transcript;
use crate::upload::UploadStatus;

/// What a question is scoped to. Holding a paper and a group at once is
/// unrepresentable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Focus {
    /// Every uploaded paper.
    #[default]
    All,
    Paper(String),
    Group(String),
}

impl Focus {
    pub fn paper_id(&self) -> Option<&str> {
        match self {
            Focus::Paper(id) => Some(id),
            _ => None,
        }
    }

    pub fn group_id(&self) -> Option<&str> {
        match self {
            Focus::Group(id) => Some(id),
            _ => None,
        }
    }
}

/// Backend reachability as last observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Connection {
    #[default]
    Unknown,
    Online(Health),
    Offline(String),
}

/// Everything the root view owns. Mutated only through these methods or
/// through [`crate::session::Session`].
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub papers: Vec<Paper>,
    pub groups: Vec<PaperGroup>,
    pub focus: Focus,
    pub transcript: Transcript,
    pub mode: Mode,
    /// Set while a question is in flight; disables the submit control.
    pub loading: bool,
    pub upload: UploadStatus,
    /// Group awaiting inline delete confirmation.
    pub pending_group_delete: Option<String>,
    pub group_editor: Option<GroupForm>,
    pub sidebar_open: bool,
    pub connection: Connection,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            papers: Vec::new(),
            groups: Vec::new(),
            focus: Focus::All,
            transcript: Transcript::default(),
            mode: Mode::default(),
            loading: false,
            upload: UploadStatus::Idle,
            pending_group_delete: None,
            group_editor: None,
            sidebar_open: true,
            connection: Connection::Unknown,
        }
    }
}

impl SessionState {
    // ── Focus ────────────────────────────────────────────────────────────────

    pub fn focus_paper(&mut self, paper_id: impl Into<String>) {
        self.focus = Focus::Paper(paper_id.into());
    }

    pub fn focus_group(&mut self, group_id: impl Into<String>) {
        self.focus = Focus::Group(group_id.into());
    }

    pub fn clear_focus(&mut self) {
        self.focus = Focus::All;
    }

    /// Focuses the paper, or drops the focus if it was already on it.
    pub fn toggle_paper_focus(&mut self, paper_id: &str) {
        if self.focus.paper_id() == Some(paper_id) {
            self.clear_focus();
        } else {
            self.focus_paper(paper_id);
        }
    }

    pub fn toggle_group_focus(&mut self, group_id: &str) {
        if self.focus.group_id() == Some(group_id) {
            self.clear_focus();
        } else {
            self.focus_group(group_id);
        }
    }

    pub fn focused_paper(&self) -> Option<&Paper> {
        let id = self.focus.paper_id()?;
        self.papers.iter().find(|p| p.id == id)
    }

    pub fn focused_group(&self) -> Option<&PaperGroup> {
        let id = self.focus.group_id()?;
        self.groups.iter().find(|g| g.id == id)
    }

    /// Label for the current scope, e.g. in the header.
    pub fn focus_label(&self) -> String {
        match &self.focus {
            Focus::All => "All papers".to_string(),
            Focus::Paper(id) => self
                .focused_paper()
                .map(|p| p.display_name().to_string())
                .unwrap_or_else(|| id.clone()),
            Focus::Group(id) => self
                .focused_group()
                .map(|g| format!("Group: {}", g.name))
                .unwrap_or_else(|| id.clone()),
        }
    }

    // ── Lists ────────────────────────────────────────────────────────────────

    pub fn replace_papers(&mut self, papers: Vec<Paper>) {
        self.papers = papers;
    }

    pub fn replace_groups(&mut self, groups: Vec<PaperGroup>) {
        self.groups = groups;
    }

    pub fn paper(&self, paper_id: &str) -> Option<&Paper> {
        self.papers.iter().find(|p| p.id == paper_id)
    }

    /// Called once a paper delete succeeded.
    pub fn forget_paper(&mut self, paper_id: &str) {
        if self.focus.paper_id() == Some(paper_id) {
            self.clear_focus();
        }
    }

    /// Called once a group delete succeeded.
    pub fn forget_group(&mut self, group_id: &str) {
        if self.focus.group_id() == Some(group_id) {
            self.clear_focus();
        }
        if self.pending_group_delete.as_deref() == Some(group_id) {
            self.pending_group_delete = None;
        }
    }

    // ── Group deletion confirmation ──────────────────────────────────────────

    pub fn request_group_delete(&mut self, group_id: impl Into<String>) {
        self.pending_group_delete = Some(group_id.into());
    }

    pub fn cancel_group_delete(&mut self) {
        self.pending_group_delete = None;
    }

    pub fn is_confirming_delete(&self, group_id: &str) -> bool {
        self.pending_group_delete.as_deref() == Some(group_id)
    }

    // ── Group editor ─────────────────────────────────────────────────────────

    pub fn open_group_creator(&mut self) {
        let preselected = self.focus.paper_id().map(str::to_string);
        self.group_editor = Some(GroupForm::create_with(preselected));
    }

    /// Opens the editor on an existing group; unknown ids are ignored.
    pub fn open_group_editor(&mut self, group_id: &str) {
        if let Some(group) = self.groups.iter().find(|g| g.id == group_id) {
            self.group_editor = Some(GroupForm::edit(group));
        }
    }

    pub fn close_group_editor(&mut self) {
        self.group_editor = None;
    }

    // ── Chat ─────────────────────────────────────────────────────────────────

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Appends the user's turn, raises `loading` and builds the request
    /// from the current focus and mode.
    pub fn begin_question(&mut self, question: &str, at: DateTime<Utc>) -> QuestionRequest {
        self.transcript.push_user(question, at);
        self.loading = true;
        QuestionRequest {
            question: question.to_string(),
            paper_id: self.focus.paper_id().map(str::to_string),
            group_id: self.focus.group_id().map(str::to_string),
            mode: self.mode,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Like [`SessionState::begin_question`] but scoped to an explicit set of
    /// papers instead of the focus.
    pub fn begin_comparison(
        &mut self,
        question: &str,
        paper_ids: &[String],
        at: DateTime<Utc>,
    ) -> CompareRequest {
        self.transcript.push_user(question, at);
        self.loading = true;
        CompareRequest {
            question: question.to_string(),
            paper_ids: paper_ids.to_vec(),
            mode: self.mode,
        }
    }

    /// Appends the answer (or the apology) and lowers `loading`.
    pub fn finish_question(
        &mut self,
        outcome: Result<AnswerResponse, ClientError>,
        at: DateTime<Utc>,
    ) {
        match outcome {
            Ok(answer) => {
                self.transcript.push_answer(answer, at);
            }
            Err(_) => {
                self.transcript.push_apology(at);
            }
        }
        self.loading = false;
    }

    // ── Chrome ───────────────────────────────────────────────────────────────

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    /// False while a file is being sent; the drop zone and picker ignore input.
    pub fn accepts_upload(&self) -> bool {
        !self.upload.is_processing()
    }

    /// Clears a success badge; failures and in-flight uploads are kept.
    pub fn clear_upload_success(&mut self) {
        if matches!(self.upload, UploadStatus::Succeeded { .. }) {
            self.upload = UploadStatus::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::transcript::APOLOGY;

    fn paper(id: &str) -> Paper {
        Paper {
            id: id.into(),
            filename: format!("{id}.pdf"),
            title: None,
            upload_date: "2024-05-01T00:00:00".into(),
            total_pages: 1,
            total_chunks: 1,
        }
    }

    #[test]
    fn focusing_a_group_clears_the_paper_and_back() {
        let mut state = SessionState::default();
        state.focus_paper("p1");
        state.focus_group("g1");
        assert_eq!(state.focus.paper_id(), None);
        assert_eq!(state.focus.group_id(), Some("g1"));

        state.focus_paper("p2");
        assert_eq!(state.focus.group_id(), None);
        assert_eq!(state.focus.paper_id(), Some("p2"));
    }

    #[test]
    fn toggling_the_focused_paper_clears_it() {
        let mut state = SessionState::default();
        state.toggle_paper_focus("p1");
        assert_eq!(state.focus, Focus::Paper("p1".into()));
        state.toggle_paper_focus("p1");
        assert_eq!(state.focus, Focus::All);
    }

    #[test]
    fn forgetting_other_entities_keeps_focus() {
        let mut state = SessionState::default();
        state.focus_paper("p1");
        state.forget_paper("p2");
        state.forget_group("p1");
        assert_eq!(state.focus, Focus::Paper("p1".into()));
        state.forget_paper("p1");
        assert_eq!(state.focus, Focus::All);
    }

    #[test]
    fn begin_question_scopes_to_group() {
        let mut state = SessionState::default();
        state.focus_group("g-7");
        state.set_mode(Mode::Simple);
        let request = state.begin_question("Compare the baselines", Utc::now());
        assert_eq!(request.group_id.as_deref(), Some("g-7"));
        assert_eq!(request.paper_id, None);
        assert_eq!(request.mode, Mode::Simple);
        assert_eq!(request.top_k, 5);
        assert!(state.loading);
        assert_eq!(state.transcript.len(), 1);
    }

    #[test]
    fn failed_question_appends_apology_and_lowers_loading() {
        let mut state = SessionState::default();
        state.begin_question("Anything?", Utc::now());
        state.finish_question(Err(ClientError::Network("refused".into())), Utc::now());
        assert!(!state.loading);
        assert_eq!(state.transcript.len(), 2);
        assert_eq!(state.transcript.last().map(|m| m.content.as_str()), Some(APOLOGY));
    }

    #[test]
    fn creator_preselects_focused_paper() {
        let mut state = SessionState::default();
        state.replace_papers(vec![paper("p1")]);
        state.focus_paper("p1");
        state.open_group_creator();
        let form = state.group_editor.as_ref().unwrap();
        assert!(!form.is_edit());
        assert_eq!(form.selected, vec!["p1".to_string()]);
        assert_eq!(state.focus_label(), "p1.pdf");
    }

    #[test]
    fn editor_ignores_unknown_group() {
        let mut state = SessionState::default();
        state.open_group_editor("missing");
        assert!(state.group_editor.is_none());
    }

    #[test]
    fn only_success_badge_self_clears() {
        let mut state = SessionState::default();
        state.upload = UploadStatus::Failed("boom".into());
        state.clear_upload_success();
        assert!(state.upload.is_error());
        state.upload = UploadStatus::Succeeded {
            filename: "a.pdf".into(),
        };
        state.clear_upload_success();
        assert_eq!(state.upload, UploadStatus::Idle);
    }

    #[test]
    fn uploads_are_refused_while_one_is_in_flight() {
        let mut state = SessionState::default();
        assert!(state.accepts_upload());
        state.upload = UploadStatus::Processing {
            filename: "a.pdf".into(),
        };
        assert!(!state.accepts_upload());
        state.upload = UploadStatus::Failed("boom".into());
        assert!(state.accepts_upload());
    }
}
