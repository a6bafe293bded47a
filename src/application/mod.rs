//! # Application Layer
//!
//! アプリケーション固有のビジネスフロー（ユースケース）
//!
//! ## 特徴
//!
//! - Domain層のエンティティを組み合わせて計算セッションを実現
//! - EventLog trait に依存（実装には依存しない）
//! - コンソールは `BufRead` / `Write` として受け取る
//!
//! ## 構成要素
//!
//! - **dto**: Data Transfer Object
//! - **use_cases**: ユースケース

pub mod dto;
pub mod use_cases;
