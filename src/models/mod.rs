pub mod enums;
pub mod metric;
pub mod symptom_record;

pub use metric::*;
pub use symptom_record::*;
