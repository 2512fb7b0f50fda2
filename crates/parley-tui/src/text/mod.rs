//! Text layout helpers.

mod wrap;

pub use wrap::wrap_lines;
