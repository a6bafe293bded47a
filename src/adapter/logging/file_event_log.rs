//! File Event Log Implementation
//!
//! EventLogの日次ローリングファイル実装
//!
//! ファイルの切り替えと古いファイルの削除は `tracing-appender` の
//! `RollingFileAppender` に任せ、ここでは1イベント1行への整形だけを行う:
//!
//! ```text
//! 2026-10-19 14:03:07.123 +09:00 [INF] Calculation successful: 6 + 3 = 9 {"Num1":6.0,...}
//! ```

use anyhow::{Context, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::io::{self, Write};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

use crate::application::dto::log_settings::LogSettings;
use crate::domain::entities::log_event::{FieldValue, LogEvent};
use crate::domain::repositories::event_log::EventLog;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f %:z";

/// フィールドを挿入順のままJSONオブジェクトとしてシリアライズする
struct OrderedFields<'a>(&'a [(String, FieldValue)]);

impl Serialize for OrderedFields<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// イベントを1行のテキストに整形する（末尾の改行なし）
pub fn format_event(event: &LogEvent) -> io::Result<String> {
    let mut line = format!(
        "{} [{}] {}",
        event.timestamp.format(TIMESTAMP_FORMAT),
        event.severity.code(),
        event.render()
    );

    if !event.fields.is_empty() {
        let fields = serde_json::to_string(&OrderedFields(&event.fields))?;
        line.push(' ');
        line.push_str(&fields);
    }

    Ok(line)
}

/// ベースファイル名を (prefix, suffix) に分ける
///
/// `calculator.log` → `("calculator", Some("log"))`
fn split_file_name(file_name: &str) -> (&str, Option<&str>) {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => (stem, Some(ext)),
        _ => (file_name, None),
    }
}

/// 日次ローリングのアペンダーを作る
///
/// ファイル名は `<prefix>.<yyyy-MM-dd>.<suffix>`。ディレクトリがなければ作成される。
pub fn daily_appender(settings: &LogSettings) -> Result<RollingFileAppender> {
    let (prefix, suffix) = split_file_name(&settings.file_name);

    let mut builder = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix);
    if let Some(suffix) = suffix {
        builder = builder.filename_suffix(suffix);
    }
    if let Some(limit) = settings.retained_file_count_limit.filter(|n| *n > 0) {
        builder = builder.max_log_files(limit);
    }

    builder.build(&settings.log_dir).context(format!(
        "Failed to open log file in {}",
        settings.log_dir.display()
    ))
}

/// ファイルベースのイベントログ
///
/// 書き込み先は任意の `Write`（本番では日次ローリングファイル）。
/// ドロップ時に書き込み先は閉じられる
pub struct FileEventLog<W: Write = RollingFileAppender> {
    writer: W,
}

impl FileEventLog {
    /// ログディレクトリを用意し、日次ローリングファイルを開く
    ///
    /// # Errors
    ///
    /// ディレクトリの作成やファイルのオープンに失敗した場合にエラーを返す
    pub fn open(settings: &LogSettings) -> Result<Self> {
        Ok(Self::from_writer(daily_appender(settings)?))
    }
}

impl<W: Write> FileEventLog<W> {
    pub fn from_writer(writer: W) -> Self {
        Self { writer }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

impl<W: Write> EventLog for FileEventLog<W> {
    fn write(&mut self, event: &LogEvent) -> io::Result<()> {
        let mut line = format_event(event)?;
        line.push('\n');
        self.writer.write_all(line.as_bytes())
    }

    fn close_and_flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
