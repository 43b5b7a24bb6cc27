pub mod config;
pub mod file;
pub mod profile;
pub mod stdin;
