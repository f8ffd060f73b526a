pub mod chat_types;
pub mod chat_utils;
pub mod config;
pub mod errors;
