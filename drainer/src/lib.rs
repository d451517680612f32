pub mod concurrency;
pub mod control;
pub mod coordinator;
pub mod error;
pub mod event;
mod macros;
pub mod monitor;
pub mod resolve;
pub mod retry;
pub mod types;
