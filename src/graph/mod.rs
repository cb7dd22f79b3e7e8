//! In-place graph edits shared by the migration steps.

mod ids;
mod insertion;

pub use ids::{IdGenerator, SequentialIdGenerator, UuidGenerator};
pub use insertion::{ALL_RESPONSES, insert_before, retain_catch_all};
