//! # Data Transfer Objects

pub mod log_settings;
