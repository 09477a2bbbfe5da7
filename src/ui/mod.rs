//! Server-rendered views.
//!
//! Every view is a pure function of a [`ChatState`] snapshot returning HTML.
//! Forms carry both a plain `action` and an `hx-post`, so the page works as
//! classic form posts and gets fragment swaps when htmx is loaded.
//!
//! # Structure
//!
//! - [`layout`]: page shell
//! - [`chat`]: conversation list, message list, input form, chat panel
//!
//! User and backend text goes through `html_escape` before it reaches markup.
//!
//! [`ChatState`]: crate::store::ChatState

pub mod chat;
pub mod layout;
