//! Logging Adapters
//!
//! EventLog の日次ローリングファイル実装

pub mod file_event_log;
