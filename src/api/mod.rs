pub mod auth;
pub mod health;
pub mod password;
pub mod payloads;
pub mod server;
pub mod symbols;
pub mod token;
pub mod user_settings;
