//! # Domain Entities
//!
//! ビジネスエンティティとバリューオブジェクト
//!
//! - **Operator**: 四則演算の演算子
//! - **Session**: 計算済みのセッション
//! - **LogEvent**: 構造化ログイベント

pub mod log_event;
pub mod operator;
pub mod session;
