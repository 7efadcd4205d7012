use leptos::prelude::*;

use research_assistant::session::Connection;

use crate::state::AppState;

/// Top bar: sidebar toggle, current focus, mode and backend status.
#[component]
pub fn Header() -> impl IntoView {
    let state = expect_context::<AppState>();

    let status = move || {
        state.with(|s| match &s.connection {
            Connection::Unknown => ("status unknown", "Connecting…".to_string()),
            Connection::Online(health) if health.is_healthy() => {
                ("status online", "Connected".to_string())
            }
            Connection::Online(health) => ("status degraded", health.status.clone()),
            Connection::Offline(err) => ("status offline", format!("Offline: {err}")),
        })
    };

    view! {
        <header class="app-header">
            <button
                class="sidebar-toggle"
                title="Toggle sidebar"
                on:click=move |_| state.update(|s| s.toggle_sidebar())
            >
                "☰"
            </button>
            <h1>"Research Assistant"</h1>
            <span class="focus-label">{move || state.with(|s| s.focus_label())}</span>
            <span class="mode-badge">{move || state.with(|s| s.mode.label())}</span>
            <span class=move || status().0>{move || status().1}</span>
        </header>
    }
}
