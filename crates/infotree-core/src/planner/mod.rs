pub mod config;
pub mod ensemble;
pub mod error;
pub mod search;
