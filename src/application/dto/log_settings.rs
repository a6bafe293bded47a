//! # Log Settings DTO
//!
//! ログファイル出力設定のData Transfer Object

use std::path::{Path, PathBuf};

/// ログディレクトリ名（デプロイルートからの相対）
pub const DEFAULT_LOG_DIR_NAME: &str = "Logs";
/// ログファイルのベース名
pub const DEFAULT_FILE_NAME: &str = "calculator.log";
/// 保持するログファイル数の既定値
pub const DEFAULT_RETAINED_FILE_COUNT_LIMIT: usize = 31;

/// ログ出力設定
///
/// 日次ローリングファイルの出力先と保持数
#[derive(Debug, Clone, PartialEq)]
pub struct LogSettings {
    /// ログファイルを置くディレクトリ
    pub log_dir: PathBuf,
    /// ベースファイル名（日付は拡張子の前に挿入される）
    pub file_name: String,
    /// 保持するファイル数（`None` なら削除しない）
    pub retained_file_count_limit: Option<usize>,
}

impl LogSettings {
    /// 新しいログ出力設定を作成します。
    ///
    /// # 例
    ///
    /// ```
    /// use logcalc::application::dto::log_settings::LogSettings;
    ///
    /// let settings = LogSettings::new("/var/log/calc", "calculator.log", Some(7));
    ///
    /// assert_eq!(settings.file_name, "calculator.log");
    /// assert_eq!(settings.retained_file_count_limit, Some(7));
    /// ```
    pub fn new(
        log_dir: impl Into<PathBuf>,
        file_name: impl Into<String>,
        retained_file_count_limit: Option<usize>,
    ) -> Self {
        Self {
            log_dir: log_dir.into(),
            file_name: file_name.into(),
            retained_file_count_limit,
        }
    }

    /// デプロイルート配下の `Logs` ディレクトリを使う既定の設定
    ///
    /// ```
    /// # use logcalc::application::dto::log_settings::LogSettings;
    /// # use std::path::Path;
    /// let settings = LogSettings::for_deployment_root("/opt/calc");
    /// assert_eq!(settings.log_dir, Path::new("/opt/calc").join("Logs"));
    /// assert_eq!(settings.retained_file_count_limit, Some(31));
    /// ```
    pub fn for_deployment_root(root: impl AsRef<Path>) -> Self {
        Self::new(
            root.as_ref().join(DEFAULT_LOG_DIR_NAME),
            DEFAULT_FILE_NAME,
            Some(DEFAULT_RETAINED_FILE_COUNT_LIMIT),
        )
    }
}
