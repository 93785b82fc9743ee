pub mod admins;
pub mod db;
