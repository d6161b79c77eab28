//! Repository layer — entity-scoped database operations.

mod symptom_record;

pub use symptom_record::*;
