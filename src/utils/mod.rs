mod text;

pub use text::{char_boundaries, char_len, truncate_for_display};
