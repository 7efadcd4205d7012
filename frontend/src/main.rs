mod api;
mod components;
mod state;

use leptos::mount::mount_to_body;
use leptos::prelude::*;

use components::chat::ChatArea;
use components::group_modal::GroupModal;
use components::header::Header;
use components::sidebar::Sidebar;
use state::AppState;

/// Root application component.
#[component]
fn App() -> impl IntoView {
    let state = AppState::provide();

    // Load library and check backend health on mount
    state.refresh();
    state.check_health();

    view! {
        <div class="app-container">
            <Header />
            <div class="app-body">
                <Show when=move || state.with(|s| s.sidebar_open)>
                    <Sidebar />
                </Show>
                <ChatArea />
            </div>
            <GroupModal />
        </div>
    }
}

fn main() {
    console_log::init_with_level(log::Level::Debug).expect("Failed to init logger");
    mount_to_body(App);
}
