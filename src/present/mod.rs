mod html;
mod text;

pub use html::{render_highlight, render_html};
pub use text::render_text;
