pub mod aggregate;
pub mod growth;

pub use aggregate::{compute_snapshot, previous_day};
pub use growth::compute_growth;
