pub mod config;
pub mod install;
pub mod platform;
pub mod release;
pub mod version;
