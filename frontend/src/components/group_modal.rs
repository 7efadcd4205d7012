use leptos::prelude::*;

use research_assistant::group_form::GroupForm;

use crate::state::AppState;

/// Create/edit dialog for a paper group. Rendered only while a form is open.
#[component]
pub fn GroupModal() -> impl IntoView {
    let state = expect_context::<AppState>();

    // Apply an edit to the open form, if any
    let edit = move |f: Box<dyn FnOnce(&mut GroupForm)>| {
        state.update(|s| {
            if let Some(form) = s.group_editor.as_mut() {
                f(form);
            }
        })
    };
    let form_field = move |pick: fn(&GroupForm) -> String| {
        move || state.with(|s| s.group_editor.as_ref().map(pick).unwrap_or_default())
    };

    let title = move || {
        state.with(|s| match &s.group_editor {
            Some(form) if form.is_edit() => "Edit group",
            _ => "New group",
        })
    };
    let saving = move || state.with(|s| s.group_editor.as_ref().is_some_and(|f| f.saving));
    let error = move || state.with(|s| s.group_editor.as_ref().and_then(|f| f.error.clone()));
    let papers = move || {
        state.with(|s| {
            s.papers
                .iter()
                .map(|p| (p.id.clone(), p.display_name().to_string()))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <Show when=move || state.with(|s| s.group_editor.is_some())>
            <div class="modal-backdrop">
                <div class="modal">
                    <h2>{title}</h2>
                    <label>
                        "Name"
                        <input
                            type="text"
                            maxlength="100"
                            prop:value=form_field(|f| f.name.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                edit(Box::new(move |f| f.name = value));
                            }
                        />
                    </label>
                    <label>
                        "Description"
                        <textarea
                            rows="3"
                            maxlength="500"
                            prop:value=form_field(|f| f.description.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                edit(Box::new(move |f| f.description = value));
                            }
                        />
                    </label>
                    <fieldset class="paper-checklist">
                        <legend>"Papers"</legend>
                        <For each=papers key=|(id, _)| id.clone() let:paper>
                            {
                                let (paper_id, name) = paper;
                                let checked_id = paper_id.clone();
                                view! {
                                    <label class="paper-check">
                                        <input
                                            type="checkbox"
                                            prop:checked=move || state.with(|s| {
                                                s.group_editor
                                                    .as_ref()
                                                    .is_some_and(|f| f.is_selected(&checked_id))
                                            })
                                            on:change=move |_| {
                                                let paper_id = paper_id.clone();
                                                edit(Box::new(move |f| {
                                                    f.toggle(&paper_id);
                                                }));
                                            }
                                        />
                                        <span>{name}</span>
                                    </label>
                                }
                            }
                        </For>
                    </fieldset>
                    {move || error().map(|err| view! { <div class="form-error">{err}</div> })}
                    <div class="modal-actions">
                        <button
                            on:click=move |_| state.update(|s| s.close_group_editor())
                            disabled=saving
                        >
                            "Cancel"
                        </button>
                        <button
                            class="primary"
                            on:click=move |_| state.submit_group_editor()
                            disabled=saving
                        >
                            {move || if saving() { "Saving…" } else { "Save" }}
                        </button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
