pub mod client;
pub mod config;

pub use client::{converse, ChatClient, TurnOutcome};
pub use config::ClientConfig;
