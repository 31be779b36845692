pub mod format;
pub mod render;

pub use render::{render_report, top_performer};
