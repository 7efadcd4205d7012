use gloo_timers::future::sleep;
use leptos::prelude::*;
use leptos::task::spawn_local;

use research_assistant::models::Mode;
use research_assistant::upload::SUCCESS_DISPLAY;
use research_assistant::{Session, SessionState, StateStore};

use crate::api::{BrowserApi, PdfFile};

/// [`StateStore`] over a Leptos signal. Writes notify subscribers; reads made
/// by the controller are untracked.
#[derive(Clone, Copy)]
pub struct SignalStore(RwSignal<SessionState>);

impl StateStore for SignalStore {
    fn read<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        self.0.with_untracked(f)
    }

    fn write<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        f(&mut *self.0.write())
    }
}

/// Shared application state, provided via Leptos context.
#[derive(Clone, Copy)]
pub struct AppState {
    /// Subscribe to this from components.
    pub session: RwSignal<SessionState>,
    controller: Session<BrowserApi, SignalStore>,
}

impl AppState {
    /// Create a new `AppState` and provide it in the current Leptos context.
    pub fn provide() -> Self {
        let session = RwSignal::new(SessionState::default());
        let state = Self {
            session,
            controller: Session::new(BrowserApi::new(), SignalStore(session)),
        };
        provide_context(state);
        state
    }

    /// Tracked read of the session state.
    pub fn with<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        self.session.with(f)
    }

    /// Synchronous transition, e.g. a focus change or a form edit.
    pub fn update(&self, f: impl FnOnce(&mut SessionState)) {
        self.session.update(f);
    }

    pub fn set_mode(&self, mode: Mode) {
        self.update(|s| s.set_mode(mode));
    }

    // --- Backend round trips ---

    /// Reload papers and groups.
    pub fn refresh(&self) {
        let controller = self.controller;
        spawn_local(async move { controller.refresh().await });
    }

    pub fn check_health(&self) {
        let controller = self.controller;
        spawn_local(async move {
            let _ = controller.check_health().await;
        });
    }

    /// Upload one file. A success badge clears itself after a few seconds.
    pub fn upload(&self, file: web_sys::File) {
        let controller = self.controller;
        spawn_local(async move {
            if controller.upload_paper(&PdfFile(file)).await.is_ok() {
                sleep(SUCCESS_DISPLAY).await;
                controller.store().write(|s| s.clear_upload_success());
            }
        });
    }

    pub fn delete_paper(&self, paper_id: String) {
        let controller = self.controller;
        spawn_local(async move { controller.delete_paper(&paper_id).await });
    }

    /// Delete the group whose inline confirmation is showing.
    pub fn confirm_group_delete(&self) {
        let controller = self.controller;
        spawn_local(async move { controller.confirm_group_delete().await });
    }

    /// Save the open group form; errors stay on the form.
    pub fn submit_group_editor(&self) {
        let controller = self.controller;
        spawn_local(async move {
            let _ = controller.submit_group_editor().await;
        });
    }

    pub fn add_to_group(&self, group_id: String, paper_id: String) {
        let controller = self.controller;
        spawn_local(async move {
            let _ = controller.add_papers_to_group(&group_id, &[paper_id]).await;
        });
    }

    pub fn remove_from_group(&self, group_id: String, paper_id: String) {
        let controller = self.controller;
        spawn_local(async move {
            let _ = controller.remove_paper_from_group(&group_id, &paper_id).await;
        });
    }

    /// Compare the given papers regardless of the current focus.
    pub fn compare(&self, question: String, paper_ids: Vec<String>) {
        let controller = self.controller;
        spawn_local(async move {
            if let Err(e) = controller.compare_papers(&question, &paper_ids).await {
                log::warn!("Comparison not sent: {e}");
            }
        });
    }

    pub fn ask(&self, question: String) {
        let controller = self.controller;
        spawn_local(async move {
            if let Err(e) = controller.ask_question(&question).await {
                log::warn!("Question not sent: {e}");
            }
        });
    }
}
