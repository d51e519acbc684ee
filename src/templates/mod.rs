//! HTML templates and styling for NodeArc.
//!
//! ## Module Structure
//!
//! - `styles` - CSS constants and theme definitions
//! - `components` - Shared HTML components (nav bar, toasts, base template)
//! - `editor` - Rich-text note editor
//! - `notes` - Notes sidebar list and page layout
//! - `pages` - Landing, auth forms, collections and the AI chat

mod styles;
mod components;
mod editor;
mod notes;
mod pages;

pub use styles::STYLE;
pub use components::{base_html, nav_bar, notes_href, toast_html, Toast};
pub use editor::{render_editor, EditorDraft};
pub use notes::{render_notes_list, render_notes_page};
pub use pages::{ai_chat_html, auth_form_html, collections_html, landing_html, not_found_html, AuthMode};
