//! Chat message list component.

use std::fmt::Write;

use crate::api::{Message, Role};
use html_escape::encode_text;

/// Messages in arrival order; user turns right, assistant turns left.
///
/// The trailing script keeps the newest message in view after every full
/// load and every htmx swap of the panel.
#[must_use]
pub fn message_list(messages: &[Message], loading: bool) -> String {
    let mut body = String::new();
    if messages.is_empty() && !loading {
        body.push_str(
            r#"<div class="message-placeholder">
                <p>Start a conversation</p>
                <p class="message-placeholder-hint">Ask anything to begin.</p>
            </div>"#,
        );
    }
    for message in messages {
        let author = match message.role {
            Role::User => "You",
            Role::Assistant => "Assistant",
        };
        let _ = write!(
            body,
            r#"
            <article class="message message-{role}">
                <div class="message-author">{author}</div>
                <div class="message-bubble">{content}</div>
            </article>"#,
            role = message.role.as_str(),
            content = encode_text(&message.content),
        );
    }
    if loading {
        body.push_str(
            r#"
            <div class="message message-assistant message-pending" aria-busy="true">
                <div class="message-bubble"><span class="spinner" aria-label="Waiting for reply"></span></div>
            </div>"#,
        );
    }

    format!(
        r#"<section id="message-list" class="message-list" aria-live="polite" aria-label="Chat messages">{body}
        </section>
        <script>(function () {{ var el = document.getElementById('message-list'); if (el) {{ el.scrollTop = el.scrollHeight; }} }})();</script>"#
    )
}
