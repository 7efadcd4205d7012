use leptos::ev;
use leptos::prelude::*;
use web_sys::HtmlInputElement;

use research_assistant::models::{Paper, PaperGroup};
use research_assistant::session::Focus;

use crate::state::AppState;

/// Sidebar with the upload zone, paper groups and the paper library.
#[component]
pub fn Sidebar() -> impl IntoView {
    view! {
        <aside class="sidebar">
            <UploadZone />
            <GroupList />
            <PaperList />
        </aside>
    }
}

/// Drop target plus file picker. Only the first file of a selection is used.
#[component]
fn UploadZone() -> impl IntoView {
    let state = expect_context::<AppState>();
    let (dragging, set_dragging) = signal(false);

    let on_drop = move |ev: ev::DragEvent| {
        ev.prevent_default();
        set_dragging.set(false);
        if !state.session.with_untracked(|s| s.accepts_upload()) {
            return;
        }
        let file = ev
            .data_transfer()
            .and_then(|dt| dt.files())
            .and_then(|files| files.get(0));
        if let Some(file) = file {
            state.upload(file);
        }
    };

    let on_pick = move |ev: ev::Event| {
        let input = event_target::<HtmlInputElement>(&ev);
        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            state.upload(file);
        }
        // Allow picking the same file again
        input.set_value("");
    };

    let status = move || {
        state.with(|s| {
            s.upload.label().map(|label| {
                let class = if s.upload.is_error() {
                    "upload-status error"
                } else {
                    "upload-status"
                };
                view! { <div class=class>{label}</div> }
            })
        })
    };

    view! {
        <section class="upload-zone" class:dragging=dragging>
            <label
                class="drop-area"
                on:dragover=move |ev: ev::DragEvent| {
                    ev.prevent_default();
                    set_dragging.set(true);
                }
                on:dragleave=move |_| set_dragging.set(false)
                on:drop=on_drop
            >
                <span>"Drop a PDF here or click to browse"</span>
                <input
                    type="file"
                    accept="application/pdf"
                    style="display:none"
                    disabled=move || state.with(|s| !s.accepts_upload())
                    on:change=on_pick
                />
            </label>
            {status}
        </section>
    }
}

#[component]
fn GroupList() -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <section class="group-list">
            <div class="section-header">
                <h2>"Groups"</h2>
                <button
                    class="new-group-btn"
                    on:click=move |_| state.update(|s| s.open_group_creator())
                >
                    "+ New group"
                </button>
            </div>
            <Show
                when=move || state.with(|s| !s.groups.is_empty())
                fallback=|| view! { <div class="empty-hint">"No groups yet"</div> }
            >
                <For
                    each=move || state.with(|s| s.groups.clone())
                    key=|g| (g.id.clone(), g.name.clone(), g.paper_ids.clone())
                    let:group
                >
                    <GroupRow group=group />
                </For>
            </Show>
        </section>
    }
}

#[component]
fn GroupRow(group: PaperGroup) -> impl IntoView {
    let state = expect_context::<AppState>();
    let id = StoredValue::new(group.id.clone());
    let is_active = move || state.with(|s| s.focus.group_id() == Some(id.get_value().as_str()));
    let confirming = move || state.with(|s| s.is_confirming_delete(&id.get_value()));
    let count = group.paper_ids.len();

    let members = move || {
        state.with(|s| {
            let group_id = id.get_value();
            let Some(group) = s.groups.iter().find(|g| g.id == group_id) else {
                return Vec::new();
            };
            s.papers
                .iter()
                .filter(|p| group.contains(&p.id))
                .map(|p| (p.id.clone(), p.display_name().to_string()))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="group-item" class:active=is_active>
            <div
                class="group-summary"
                on:click=move |_| state.update(|s| s.toggle_group_focus(&id.get_value()))
            >
                <span class="group-name">{group.name.clone()}</span>
                <span class="group-count">{format!("{count} papers")}</span>
            </div>
            <Show
                when=confirming
                fallback=move || view! {
                    <div class="group-actions">
                        <button on:click=move |_| state.update(|s| s.open_group_editor(&id.get_value()))>
                            "Edit"
                        </button>
                        <button
                            class="danger"
                            on:click=move |_| state.update(|s| s.request_group_delete(id.get_value()))
                        >
                            "Delete"
                        </button>
                    </div>
                }
            >
                <div class="confirm-delete">
                    <span>"Delete this group?"</span>
                    <button class="danger" on:click=move |_| state.confirm_group_delete()>
                        "Yes"
                    </button>
                    <button on:click=move |_| state.update(|s| s.cancel_group_delete())>"No"</button>
                </div>
            </Show>
            <Show when=is_active>
                <ul class="group-members">
                    <For each=members key=|(paper_id, _)| paper_id.clone() let:member>
                        {
                            let (paper_id, name) = member;
                            view! {
                                <li>
                                    <span>{name}</span>
                                    <button
                                        title="Remove from group"
                                        on:click=move |_| {
                                            state.remove_from_group(id.get_value(), paper_id.clone())
                                        }
                                    >
                                        "×"
                                    </button>
                                </li>
                            }
                        }
                    </For>
                </ul>
            </Show>
        </div>
    }
}

#[component]
fn PaperList() -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <section class="paper-list">
            <div class="section-header">
                <h2>"Papers"</h2>
                <span class="paper-total">{move || state.with(|s| s.papers.len())}</span>
            </div>
            <Show
                when=move || state.with(|s| !s.papers.is_empty())
                fallback=|| view! { <div class="empty-hint">"No papers uploaded yet"</div> }
            >
                <For
                    each=move || state.with(|s| s.papers.clone())
                    key=|p| p.id.clone()
                    let:paper
                >
                    <PaperRow paper=paper />
                </For>
            </Show>
        </section>
    }
}

#[component]
fn PaperRow(paper: Paper) -> impl IntoView {
    let state = expect_context::<AppState>();
    let id = StoredValue::new(paper.id.clone());
    let is_active = move || state.with(|s| s.focus.paper_id() == Some(id.get_value().as_str()));

    // Offered when a group is focused and this paper is not in it yet
    let addable_to = move || {
        state.with(|s| match &s.focus {
            Focus::Group(group_id) => s
                .focused_group()
                .filter(|g| !g.contains(&id.get_value()))
                .map(|_| group_id.clone()),
            _ => None,
        })
    };

    view! {
        <div
            class="paper-item"
            class:active=is_active
            on:click=move |_| state.update(|s| s.toggle_paper_focus(&id.get_value()))
        >
            <div class="paper-title">{paper.display_name().to_string()}</div>
            <div class="paper-meta">
                {format!("{} · {} pages", paper.upload_day(), paper.total_pages)}
            </div>
            <div class="paper-actions">
                {move || addable_to().map(|group_id| view! {
                    <button
                        title="Add to focused group"
                        on:click=move |ev: ev::MouseEvent| {
                            ev.stop_propagation();
                            state.add_to_group(group_id.clone(), id.get_value());
                        }
                    >
                        "+"
                    </button>
                })}
                <button
                    class="danger"
                    title="Delete paper"
                    on:click=move |ev: ev::MouseEvent| {
                        ev.stop_propagation();
                        state.delete_paper(id.get_value());
                    }
                >
                    "Delete"
                </button>
            </div>
        </div>
    }
}
