use leptos::ev;
use leptos::prelude::*;

use research_assistant::models::{Citation, Message, Mode, Role, MIN_COMPARE_PAPERS};

use crate::state::AppState;

/// Offered on the welcome screen; clicking one asks it.
const SUGGESTED_QUESTIONS: [&str; 4] = [
    "What is the main contribution of this paper?",
    "Summarize the methodology.",
    "What datasets were used?",
    "What are the limitations?",
];

/// Main chat area with the transcript, welcome state and input.
#[component]
pub fn ChatArea() -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <main class="chat-area">
            <div class="messages-container">
                <Show
                    when=move || state.with(|s| !s.transcript.is_empty())
                    fallback=|| view! { <Welcome /> }
                >
                    <For
                        each=move || state.with(|s| s.transcript.messages().to_vec())
                        key=|m| m.id.clone()
                        let:msg
                    >
                        <MessageBubble message=msg />
                    </For>
                </Show>
                <Show when=move || state.with(|s| s.loading)>
                    <div class="message assistant thinking">"Thinking…"</div>
                </Show>
            </div>
            <ChatInput />
        </main>
    }
}

/// Shown before the first question.
#[component]
fn Welcome() -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <div class="empty-state">
            <h2>"Ask about your papers"</h2>
            <p>
                "Upload PDFs in the sidebar, pick a paper or a group to narrow the scope, "
                "then ask a question."
            </p>
            <div class="suggestions">
                {SUGGESTED_QUESTIONS
                    .into_iter()
                    .map(|q| {
                        view! {
                            <button
                                class="suggestion"
                                disabled=move || state.with(|s| s.loading)
                                on:click=move |_| state.ask(q.to_string())
                            >
                                {q}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}

/// A single chat message bubble.
#[component]
fn MessageBubble(message: Message) -> impl IntoView {
    let css_class = match message.role {
        Role::User => "message user",
        Role::Assistant => "message assistant",
    };
    let meta = match message.mode {
        Some(mode) => format!("{} · {}", message.timestamp.format("%H:%M"), mode.label()),
        None => message.timestamp.format("%H:%M").to_string(),
    };
    let citations = message.citations.unwrap_or_default();

    view! {
        <div class=css_class>
            <div class="role-label">{message.role.as_str()}</div>
            <div class="message-content">{message.content}</div>
            {(!citations.is_empty()).then(|| view! { <Citations citations=citations /> })}
            <div class="message-meta">{meta}</div>
        </div>
    }
}

#[component]
fn Citations(citations: Vec<Citation>) -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <ul class="citations">
            {citations
                .into_iter()
                .map(|c| {
                    let paper_id = c.paper_id.clone();
                    let source = move || {
                        state.with(|s| {
                            s.paper(&paper_id)
                                .map(|p| p.display_name().to_string())
                                .unwrap_or_else(|| paper_id.clone())
                        })
                    };
                    view! {
                        <li class="citation">
                            <span class="citation-source">{source}</span>
                            <span class="citation-location">
                                {format!("p. {} · {}", c.page, c.section)}
                            </span>
                            <blockquote>{c.chunk_preview}</blockquote>
                        </li>
                    }
                })
                .collect_view()}
        </ul>
    }
}

/// Mode selector, textarea and send button.
#[component]
fn ChatInput() -> impl IntoView {
    let state = expect_context::<AppState>();
    let (input, set_input) = signal(String::new());

    let is_sending = move || state.with(|s| s.loading);

    let send = move || {
        let text = input.get_untracked().trim().to_string();
        if text.is_empty() || is_sending() {
            return;
        }
        set_input.set(String::new());
        state.ask(text);
    };

    // Papers of the focused group, when there are enough to compare
    let comparable = move || {
        state.with(|s| {
            s.focused_group()
                .map(|g| g.paper_ids.clone())
                .filter(|ids| ids.len() >= MIN_COMPARE_PAPERS)
        })
    };

    let compare = move || {
        let text = input.get_untracked().trim().to_string();
        let Some(paper_ids) = comparable() else {
            return;
        };
        if text.is_empty() || is_sending() {
            return;
        }
        set_input.set(String::new());
        state.compare(text, paper_ids);
    };

    let on_keydown = move |ev: ev::KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            send();
        }
    };

    view! {
        <div class="input-area">
            <div class="mode-selector">
                {Mode::ALL
                    .into_iter()
                    .map(|mode| {
                        view! {
                            <button
                                class="mode-option"
                                class:selected=move || state.with(|s| s.mode == mode)
                                on:click=move |_| state.set_mode(mode)
                            >
                                {mode.label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
            <div class="input-row">
                <textarea
                    rows="2"
                    placeholder=move || {
                        format!(
                            "Ask about {}… (Enter to send, Shift+Enter for newline)",
                            state.with(|s| s.focus_label()),
                        )
                    }
                    prop:value=input
                    on:input=move |ev| set_input.set(event_target_value(&ev))
                    on:keydown=on_keydown
                    disabled=is_sending
                />
                <button
                    class="send-btn"
                    on:click=move |_| send()
                    disabled=move || is_sending() || input.get().trim().is_empty()
                >
                    {move || if is_sending() { "Sending…" } else { "Send" }}
                </button>
                <Show when=move || comparable().is_some()>
                    <button
                        class="compare-btn"
                        title="Compare the papers of the focused group"
                        on:click=move |_| compare()
                        disabled=move || is_sending() || input.get().trim().is_empty()
                    >
                        "Compare"
                    </button>
                </Show>
            </div>
        </div>
    }
}
