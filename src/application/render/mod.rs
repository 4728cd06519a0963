//! Markdown rendering for the read path.
//!
//! Rendering never gates a mutation: posts are stored as markdown and turned
//! into sanitised HTML only when a reader asks for them.

mod service;
mod types;

pub use service::{ComrakRenderService, render_service};
pub use types::{RenderError, RenderService};
