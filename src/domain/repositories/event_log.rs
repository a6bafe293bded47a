//! # Event Log Trait
//!
//! 構造化ログイベントの出力先を抽象化

use std::io;

#[cfg(test)]
use mockall::automock;

use crate::domain::entities::log_event::LogEvent;

/// ログイベントの出力先
///
/// セッションには明示的に構築したインスタンスを渡す。
/// 追記専用であり、書き込んだイベントを変更・削除する操作は持たない。
#[cfg_attr(test, automock)]
pub trait EventLog {
    /// イベントを1件追記する
    ///
    /// # Errors
    ///
    /// 出力先への書き込みに失敗した場合にエラーを返す
    fn write(&mut self, event: &LogEvent) -> io::Result<()>;

    /// バッファをフラッシュして出力先を閉じる
    ///
    /// 呼び出し後の `write` は実装依存（ファイル実装では新しいファイルを開き直す）
    ///
    /// # Errors
    ///
    /// フラッシュに失敗した場合にエラーを返す
    fn close_and_flush(&mut self) -> io::Result<()>;
}
