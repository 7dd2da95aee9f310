//! GLPAAC: an AAC communicator for Gestalt Language Processors.
//!
//! The crate has two halves that share the wire types in [`api::payloads`]:
//!
//! - the HTTP backend ([`api`], [`db`]): accounts, bearer tokens, per-user
//!   voice preferences and an OpenSymbols search proxy;
//! - the headless front-end ([`client`]): the communicator board, the voice
//!   settings dialog, symbol search and a REST client. Speech synthesis and
//!   local storage are traits supplied by whoever embeds it.

pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
