//! Configuration
//!
//! JSON設定ファイルの読み込みとログ出力設定の解決

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::application::dto::log_settings::{
    LogSettings, DEFAULT_FILE_NAME, DEFAULT_LOG_DIR_NAME, DEFAULT_RETAINED_FILE_COUNT_LIMIT,
};

fn default_file_name() -> String {
    DEFAULT_FILE_NAME.to_string()
}

fn default_retained_file_count_limit() -> Option<usize> {
    Some(DEFAULT_RETAINED_FILE_COUNT_LIMIT)
}

/// 設定ファイル
///
/// 全項目省略可能。`retained_file_count_limit` に `null` を指定すると古いファイルを削除しない。
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// ログディレクトリ（`~` 展開あり）。省略時はデプロイルート配下の `Logs`
    #[serde(default)]
    pub log_dir: Option<String>,

    #[serde(default = "default_file_name")]
    pub file_name: String,

    #[serde(default = "default_retained_file_count_limit")]
    pub retained_file_count_limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_dir: None,
            file_name: default_file_name(),
            retained_file_count_limit: default_retained_file_count_limit(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path))?;
        let config: Config = serde_json::from_str(&content)
            .context(format!("Failed to parse config file: {}", path))?;
        Ok(config)
    }

    /// ファイルが指定されていれば読み込み、なければ既定値を返す
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// ログ出力設定を解決する
    ///
    /// ログディレクトリの優先順位: CLI引数 > 設定ファイル > `<deployment_root>/Logs`
    pub fn log_settings(&self, cli_log_dir: Option<&str>, deployment_root: &Path) -> LogSettings {
        let log_dir = match cli_log_dir.or(self.log_dir.as_deref()) {
            Some(dir) => expand_path(dir),
            None => deployment_root.join(DEFAULT_LOG_DIR_NAME),
        };

        LogSettings::new(log_dir, self.file_name.clone(), self.retained_file_count_limit)
    }
}

/// `~` と環境変数を展開する（展開に失敗した場合はチルダ展開のみ）
pub fn expand_path(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(path).as_ref()),
    }
}

/// デプロイルート（実行ファイルのあるディレクトリ）
///
/// 取得できない場合はカレントディレクトリ
pub fn deployment_root() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}
