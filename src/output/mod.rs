//! Output formatting for limit results.

mod json;
mod terminal;

pub use json::{to_json, to_json_pretty};
pub use terminal::{format_limit, format_limit_line};
