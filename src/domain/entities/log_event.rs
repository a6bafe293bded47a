//! # LogEvent Entity
//!
//! 構造化ログイベント
//!
//! メッセージテンプレートは `{Name}` 形式のプレースホルダーを含み、
//! 同名のフィールドの値で描画される。

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;

use super::operator::Operator;

/// ログの重要度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Error,
    Fatal,
}

impl Severity {
    /// ログファイルに出力する3文字のレベルコード
    pub fn code(&self) -> &'static str {
        match self {
            Severity::Info => "INF",
            Severity::Error => "ERR",
            Severity::Fatal => "FTL",
        }
    }
}

/// 構造化フィールドの値
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Operator> for FieldValue {
    fn from(value: Operator) -> Self {
        FieldValue::Text(value.symbol().to_string())
    }
}

/// 構造化ログイベント
///
/// 一度作成されたイベントは変更されない（ビルダーは所有権を消費する）
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub timestamp: DateTime<Local>,
    pub severity: Severity,
    pub template: String,
    pub fields: Vec<(String, FieldValue)>,
}

impl LogEvent {
    pub fn new(severity: Severity, template: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            severity,
            template: template.into(),
            fields: Vec::new(),
        }
    }

    pub fn info(template: impl Into<String>) -> Self {
        Self::new(Severity::Info, template)
    }

    pub fn error(template: impl Into<String>) -> Self {
        Self::new(Severity::Error, template)
    }

    pub fn fatal(template: impl Into<String>) -> Self {
        Self::new(Severity::Fatal, template)
    }

    /// フィールドを追加する
    ///
    /// 同名のフィールドが既にある場合は値を置き換える
    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name.to_string(), value)),
        }
        self
    }

    /// フィールドの値を取得
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// テンプレートのプレースホルダーをフィールドの値で置き換えた文字列を返す
    ///
    /// 対応するフィールドがないプレースホルダーはそのまま残す
    pub fn render(&self) -> String {
        let mut rendered = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            rendered.push_str(&rest[..open]);
            let after_open = &rest[open + 1..];

            match after_open.find('}') {
                Some(close) => {
                    let name = &after_open[..close];
                    match self.field(name) {
                        Some(value) => rendered.push_str(&value.to_string()),
                        None => {
                            rendered.push('{');
                            rendered.push_str(name);
                            rendered.push('}');
                        }
                    }
                    rest = &after_open[close + 1..];
                }
                None => {
                    rendered.push_str(&rest[open..]);
                    rest = "";
                }
            }
        }

        rendered.push_str(rest);
        rendered
    }
}
