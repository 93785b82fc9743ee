pub mod admin;
pub mod attendance;
pub mod code;
pub mod health;
pub mod students;
