//! # Use Cases
//!
//! アプリケーションのビジネスフロー（ユースケース）
//!
//! ## ユースケース
//!
//! - **RunSessionUseCase**: 入力の検証・計算・結果の報告

pub mod run_session;
