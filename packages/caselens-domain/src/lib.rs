pub mod case;
pub mod dataset;
pub mod text;

pub use case::{CaseRecord, Decision};
