//! Entry Renderer: turns transcript entries into styled terminal lines.

mod renderer;
mod wrap;

pub use renderer::{EntryView, loading_dots, render_entry, sources_label};
pub use wrap::{highlight_urls, is_url, wrap_to_width};
