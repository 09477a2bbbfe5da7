//! Chat panel layout.

use super::{chat_header, conversation_list, error_banner, input_area, message_list};
use crate::store::ChatState;

/// Complete chat panel: conversation list, header, messages and input.
///
/// This is the unit htmx swaps after every action. While a send is still
/// running (for example after a reload mid-send) the panel re-fetches itself
/// until the session is idle again.
#[must_use]
pub fn chat_panel(state: &ChatState) -> String {
    let loading = state.is_loading();
    let title = match state.current_conversation_id() {
        Some(id) => state
            .conversations()
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.title.as_str())
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("Conversation"),
        None => "New conversation",
    };
    let poll = if loading {
        r#" hx-get="/chat/panel" hx-trigger="load delay:1s" hx-swap="outerHTML""#
    } else {
        ""
    };

    format!(
        r#"<div id="chat-panel" class="chat-panel"{poll}>
    {sidebar}
    <div class="chat-shell">
        {header}
        {banner}
        {messages}
        {input}
    </div>
</div>"#,
        sidebar = conversation_list(state.conversations(), state.current_conversation_id()),
        header = chat_header(title, loading),
        banner = error_banner(state.error()),
        messages = message_list(state.messages(), loading),
        input = input_area(state.input(), loading),
    )
}
