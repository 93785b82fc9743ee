//! sea-orm entities for the attendance service.

pub mod attendances;
pub mod students;
