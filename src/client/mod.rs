pub mod api_client;
pub mod cards;
pub mod communicator;
pub mod shell;
pub mod speech;
pub mod storage;
pub mod symbol_search;
pub mod voice;
