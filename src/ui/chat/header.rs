//! Chat header component.

use html_escape::encode_text;

/// Chat header with title and status.
#[must_use]
pub fn chat_header(title: &str, loading: bool) -> String {
    let status = if loading { "Sending…" } else { "Ready" };
    format!(
        r#"<header class="chat-header">
            <h2 class="chat-title">{title}</h2>
            <span id="chat-status" class="badge">{status}</span>
        </header>"#,
        title = encode_text(title),
    )
}

/// Dismissable banner for the last error, empty when there is none.
#[must_use]
pub fn error_banner(error: Option<&str>) -> String {
    let Some(error) = error else {
        return String::new();
    };
    format!(
        r##"<div class="error-banner" role="alert">
            <span>{message}</span>
            <form method="post" action="/chat/error/dismiss"
                  hx-post="/chat/error/dismiss" hx-target="#chat-panel" hx-swap="outerHTML">
                <button type="submit" class="button button-ghost" aria-label="Dismiss">×</button>
            </form>
        </div>"##,
        message = encode_text(error),
    )
}
