//! Chat-specific views.

mod header;
mod input_area;
mod message_list;
mod shell;
mod sidebar;

pub use header::{chat_header, error_banner};
pub use input_area::input_area;
pub use message_list::message_list;
pub use shell::chat_panel;
pub use sidebar::conversation_list;
