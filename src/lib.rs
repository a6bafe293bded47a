//! # Logcalc
//!
//! 2つの数値と演算子をコンソールから読み取って計算し、やり取りを日次ローリングの
//! ログファイルに記録する電卓
//!
//! このプロジェクトはクリーンアーキテクチャを採用しており、以下の4層で構成されています：
//!
//! - **Domain層**: 演算子・セッション・ログイベントとエラー（外部I/Oなし）
//! - **Application層**: 計算セッションのユースケース
//! - **Adapter層**: ローリングファイル、設定ファイル
//! - **Driver層**: CLI、依存性注入

// coverage_nightly cfg が設定されている場合のみ coverage_attribute を有効化
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

// Domain層（純粋なビジネスロジック）
pub mod domain;

// Application層（ユースケース）
pub mod application;

// Adapter層（Infrastructure）
pub mod adapter;

// Driver層（Presentation）
pub mod driver;
