pub mod code_generator;
pub mod repository;
pub mod types;
