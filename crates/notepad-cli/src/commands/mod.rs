pub mod auth_cmd;
pub mod common;
pub mod completions;
pub mod config;
pub mod create;
pub mod delete;
pub mod list;
pub mod upload;
