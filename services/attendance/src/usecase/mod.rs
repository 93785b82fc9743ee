pub mod attendance;
pub mod export;
pub mod stats;
pub mod student;
