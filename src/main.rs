//! Logcalc - Logging Calculator
//!
//! コンソール電卓。やり取りは `Logs/calculator<yyyyMMdd>.log` に記録される

// coverage_nightly cfg が設定されている場合のみ coverage_attribute を有効化
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use anyhow::Result;
use clap::Parser;

use logcalc::adapter::config::Config;
use logcalc::driver::{Args, CalculatorWorkflow};

#[cfg_attr(coverage_nightly, coverage(off))]
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    // Load configuration
    let config = Config::load_or_default(args.config.as_deref())?;

    let workflow = CalculatorWorkflow::new(&config, &args);

    // Session failures are reported on stdout; the exit status stays 0
    let outcome = workflow.execute_stdio()?;
    log::debug!("Session finished (success: {})", outcome.is_success());

    Ok(())
}
