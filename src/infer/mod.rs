//! Deduction over sentences of the form "exactly N of these cells are mines".

mod engine;
mod types;

pub use engine::KnowledgeBase;
pub use types::{InconsistencyError, Sentence};
