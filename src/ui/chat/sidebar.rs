//! Conversation list panel.

use std::fmt::Write;

use crate::api::Conversation;
use html_escape::{encode_double_quoted_attribute, encode_text};

/// Conversation list with the selected entry highlighted.
///
/// Each entry is its own form so selection works without JavaScript.
#[must_use]
pub fn conversation_list(conversations: &[Conversation], selected: Option<&str>) -> String {
    let mut items = String::new();
    for conv in conversations {
        let is_selected = selected == Some(conv.id.as_str());
        let title = if conv.title.trim().is_empty() {
            "Untitled".to_string()
        } else {
            encode_text(&conv.title).into_owned()
        };
        let _ = write!(
            items,
            r##"
            <li>
                <form method="post" action="/conversations/select"
                      hx-post="/conversations/select" hx-target="#chat-panel" hx-swap="outerHTML">
                    <input type="hidden" name="conversation_id" value="{id}">
                    <button type="submit" class="conversation-item{active}"{current}>
                        <span class="conversation-title">{title}</span>
                        <span class="conversation-updated">{updated}</span>
                    </button>
                </form>
            </li>"##,
            id = encode_double_quoted_attribute(&conv.id),
            active = if is_selected { " is-selected" } else { "" },
            current = if is_selected { r#" aria-current="true""# } else { "" },
            updated = encode_text(&conv.updated_at),
        );
    }

    let body = if conversations.is_empty() {
        r#"<p class="conversation-empty">No conversations yet</p>"#.to_string()
    } else {
        format!(r#"<ul class="conversation-items">{items}
            </ul>"#)
    };

    format!(
        r##"<nav id="conversation-list" class="conversation-list" aria-label="Conversations">
        <div class="conversation-actions">
            <form method="post" action="/conversations/new"
                  hx-post="/conversations/new" hx-target="#chat-panel" hx-swap="outerHTML">
                <button type="submit" class="button button-primary">New chat</button>
            </form>
            <form method="post" action="/conversations/refresh"
                  hx-post="/conversations/refresh" hx-target="#chat-panel" hx-swap="outerHTML">
                <button type="submit" class="button button-ghost" title="Refresh">Refresh</button>
            </form>
        </div>
        {body}
    </nav>"##
    )
}
