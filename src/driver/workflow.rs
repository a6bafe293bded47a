//! Workflow Orchestration
//!
//! 依存性の組み立てとセッションの実行

use anyhow::Result;
use log::info;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::adapter::config::{deployment_root, Config};
use crate::adapter::logging::file_event_log::FileEventLog;
use crate::application::dto::log_settings::LogSettings;
use crate::application::use_cases::run_session::{RunSessionUseCase, SessionOutcome};

use super::cli::Args;

/// ホスト名を取得（取得できない場合は "unknown"）
pub fn machine_name() -> String {
    hostname::get()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Calculator Workflow
pub struct CalculatorWorkflow {
    log_settings: LogSettings,
}

impl CalculatorWorkflow {
    /// 設定とCLI引数からワークフローを作成
    pub fn new(config: &Config, args: &Args) -> Self {
        Self::with_deployment_root(config, args, deployment_root())
    }

    pub fn with_deployment_root(config: &Config, args: &Args, root: PathBuf) -> Self {
        Self {
            log_settings: config.log_settings(args.log_dir.as_deref(), &root),
        }
    }

    pub fn log_settings(&self) -> &LogSettings {
        &self.log_settings
    }

    /// セッションを1回実行する
    ///
    /// ロガーはこのスコープで開かれ、どの経路でもスコープ終了時に閉じられる。
    ///
    /// # Errors
    ///
    /// ログディレクトリやログファイルを用意できない場合のみエラーを返す。
    /// 入力や計算のエラーは `SessionOutcome::Failure` として返る。
    pub fn execute<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
    ) -> Result<SessionOutcome> {
        let mut logger = FileEventLog::open(&self.log_settings)?;

        let session_id = uuid::Uuid::new_v4().to_string();
        info!(
            "Session {} logging to {}",
            session_id,
            self.log_settings.log_dir.display()
        );

        let use_case = RunSessionUseCase::new(session_id).with_machine_name(machine_name());
        let outcome = use_case.run(input, output, &mut logger);

        Ok(outcome)
    }

    /// 標準入出力でセッションを実行する
    pub fn execute_stdio(&self) -> Result<SessionOutcome> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.execute(&mut stdin.lock(), &mut stdout.lock())
    }
}
