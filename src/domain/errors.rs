//! # Domain Errors
//!
//! 計算セッションで発生するエラー
//!
//! 表示メッセージはそのままユーザー向けの `Error: ...` 行に使われる。

use thiserror::Error;

/// 計算セッションのエラー
#[derive(Debug, Error)]
pub enum CalcError {
    /// オペランドが数値として解釈できない
    #[error("Invalid number input!")]
    InvalidNumber { input: String },

    /// サポートされていない演算子
    #[error("Invalid operator!")]
    InvalidOperator { input: String },

    /// ゼロ除算
    #[error("Cannot divide by zero!")]
    DivisionByZero { dividend: f64 },

    /// コンソールの読み書きに失敗
    #[error("Console I/O failed: {0}")]
    ConsoleIo(#[from] std::io::Error),
}

impl CalcError {
    /// エラー種別の名前（構造化ログのフィールド用）
    pub fn kind(&self) -> &'static str {
        match self {
            CalcError::InvalidNumber { .. } => "InvalidNumberError",
            CalcError::InvalidOperator { .. } => "InvalidOperatorError",
            CalcError::DivisionByZero { .. } => "DivisionByZeroError",
            CalcError::ConsoleIo(_) => "ConsoleIoError",
        }
    }
}
