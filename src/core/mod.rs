pub mod aspect;
pub mod catalog;
pub mod draw;
pub mod enrich;
pub mod prompt;
pub mod reading;

pub use crate::domain::model::{DrawnCard, EnrichedCard, ReadingSubmission};
pub use crate::domain::ports::Interpreter;
pub use crate::utils::error::Result;
