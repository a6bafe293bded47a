//! # Domain Layer
//!
//! このモジュールは計算のルールとエンティティを定義します。
//!
//! ## 特徴
//!
//! - コンソールやファイルシステムについて何も知らない
//! - 純粋なビジネスロジック
//!
//! ## 構成要素
//!
//! - **entities**: エンティティ（Operator, Session, LogEvent）
//! - **errors**: 計算セッションのエラー
//! - **repositories**: ログ出力先の trait（インターフェース定義のみ）

pub mod entities;
pub mod errors;
pub mod repositories;
