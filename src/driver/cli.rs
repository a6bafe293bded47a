//! CLI Argument Parsing
//!
//! CLIの引数解析

use clap::Parser;

/// 2つの数値と演算子を読み取り、計算結果をログに記録する電卓
#[derive(Parser, Debug, Clone)]
#[command(name = "logcalc")]
#[command(about = "Console calculator with a daily rolling log file", long_about = None)]
pub struct Args {
    /// Directory for log files (default: <deployment root>/Logs)
    #[arg(long)]
    pub log_dir: Option<String>,

    /// Config file path (JSON)
    #[arg(short, long)]
    pub config: Option<String>,
}
