//! Chat input area component.

use html_escape::encode_text;

const SUBMIT_ON_ENTER: &str = "if (event.key === 'Enter' && !event.shiftKey) { event.preventDefault(); if (this.value.trim()) { this.form.requestSubmit(); } }";
const AUTO_GROW: &str =
    "this.style.height = 'auto'; this.style.height = Math.min(this.scrollHeight, 200) + 'px'";

/// Chat message input form.
///
/// Enter submits, Shift+Enter inserts a newline. While a send is in flight
/// the controls are disabled: client side through `hx-disabled-elt`, server
/// side whenever the state is rendered with `loading` set.
#[must_use]
pub fn input_area(draft: &str, loading: bool) -> String {
    let disabled = if loading { " disabled" } else { "" };
    let status = if loading {
        r#"<span class="spinner" aria-hidden="true"></span><span>Waiting for reply…</span>"#
    } else {
        "Press Enter to send, Shift+Enter for new line"
    };
    format!(
        r##"<div class="input-area">
            <form id="chat-form" class="input-form" method="post" action="/chat/send"
                  hx-post="/chat/send" hx-target="#chat-panel" hx-swap="outerHTML"
                  hx-disabled-elt="find textarea, find button" hx-indicator="#send-indicator">
                <textarea
                    name="message"
                    placeholder="Type your message..."
                    class="input-textarea"
                    rows="1"
                    required
                    hx-post="/chat/input" hx-trigger="keyup changed delay:500ms" hx-swap="none"
                    onkeydown="{SUBMIT_ON_ENTER}"
                    oninput="{AUTO_GROW}"{disabled}>{draft}</textarea>
                <button type="submit" class="button button-primary input-send"{disabled}>Send</button>
            </form>
            <p id="send-indicator" class="input-status{busy}">{status}</p>
        </div>"##,
        draft = encode_text(draft),
        busy = if loading { " is-busy" } else { "" },
    )
}
