use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use colored::Colorize;
use ftpprobe::constants::{
    CONNECT_TIMEOUT_SECS, DEFAULT_MAX_RETRIES, DEFAULT_PASSWORD, DEFAULT_USERNAME,
    INTER_ATTEMPT_DELAY_MS,
};
use ftpprobe::core::{NullSink, ReportSink};
use ftpprobe::logger::{init_logger, LogOptions};
use ftpprobe::models::AuditSummary;
use ftpprobe::platform::{ConsoleSink, TcpFtpClient};
use ftpprobe::utils::TokioPause;
use ftpprobe::{AuditConfig, AuditError};
use std::future::Future;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// Exit status when the audit cannot be set up (bad target, unreadable wordlist)
const EXIT_SETUP_ERROR: u8 = 2;

/// Exit status for a forced abort (128 + SIGINT)
const EXIT_INTERRUPTED: i32 = 130;

#[derive(Parser, Debug)]
#[command(name = "ftpprobe")]
#[command(version)]
#[command(about = "FTP credential audit: default account probe and password list walk", long_about = None)]
struct Cli {
    /// FTP server as host or host:port, or `demo` for a simulated run
    target: String,

    /// Account to test
    #[arg(long, default_value = DEFAULT_USERNAME, env = "FTPPROBE_USERNAME")]
    username: String,

    /// Password tried before the wordlist
    #[arg(long, default_value = DEFAULT_PASSWORD, env = "FTPPROBE_PASSWORD")]
    password: String,

    /// Newline-separated candidate passwords
    #[arg(long = "wordlist-path", visible_alias = "ftpwordlist", value_name = "FILE")]
    wordlist_path: Option<PathBuf>,

    /// Simulated mode: no network for the default probe, sentinel password accepted
    #[arg(long)]
    test: bool,

    /// Login attempts per password
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_RETRIES,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    max_retries: u32,

    /// Connect and reply timeout in seconds
    #[arg(long, default_value_t = CONNECT_TIMEOUT_SECS, value_name = "SECS")]
    connect_timeout: u64,

    /// Delay between failed passwords in milliseconds
    #[arg(long, default_value_t = INTER_ATTEMPT_DELAY_MS, value_name = "MS")]
    delay_ms: u64,

    /// Print a JSON summary on stdout instead of the live event stream
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Only show results and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn audit_config(&self) -> Result<AuditConfig, AuditError> {
        let mut config = AuditConfig::new(&self.target, &self.username)?;
        config.default_password = self.password.clone();
        config.wordlist = self.wordlist_path.clone();
        config.simulated = self.test;
        config.attempt.max_retries = self.max_retries;
        config.attempt.connect_timeout = Duration::from_secs(self.connect_timeout);
        config.attempt.inter_attempt_delay = Duration::from_millis(self.delay_ms);
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_logger(LogOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
    });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    Ok(runtime.block_on(run(cli)))
}

async fn run(cli: Cli) -> ExitCode {
    let config = match cli.audit_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            return ExitCode::from(EXIT_SETUP_ERROR);
        }
    };

    debug!(
        host = %config.target,
        username = %config.username,
        simulated = config.is_simulated(),
        wordlist = ?config.wordlist,
        "starting audit"
    );

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if watch_interrupts(tokio::signal::ctrl_c, cancel).await {
                std::process::exit(EXIT_INTERRUPTED);
            }
        }
    });

    let sink: Arc<dyn ReportSink> = if cli.json {
        Arc::new(NullSink)
    } else {
        Arc::new(ConsoleSink::new(cli.quiet))
    };

    let audit = config.build(Arc::new(TcpFtpClient::new()), sink, Arc::new(TokioPause));

    let started_at = Utc::now();
    let outcome = audit
        .run_auth_test(
            &config.username,
            &config.default_password,
            config.candidates(),
            &cancel,
        )
        .await;
    let finished_at = Utc::now();

    match outcome {
        Ok(result) => {
            if cli.json {
                let summary = AuditSummary::new(
                    config.target.clone(),
                    config.username.as_str(),
                    config.is_simulated(),
                    result,
                    started_at,
                    finished_at,
                );
                match serde_json::to_string_pretty(&summary) {
                    Ok(json) => println!("{}", json),
                    Err(e) => error!(error = %e, "failed to serialize summary"),
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "audit aborted");
            if cli.json {
                eprintln!("{} {}", "[ERROR]".red().bold(), e);
            }
            ExitCode::from(EXIT_SETUP_ERROR)
        }
    }
}

/// First interrupt cancels the run between attempts; returns `true` on a
/// second one, which should abort the process.
async fn watch_interrupts<F, Fut>(mut interrupted: F, cancel: CancellationToken) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    if interrupted().await.is_err() {
        return false;
    }
    warn!("interrupt received, stopping after the current attempt");
    eprintln!(
        "{} Stopping after the current attempt (Ctrl-C again to abort)",
        "[WARNING]".yellow().bold()
    );
    cancel.cancel();

    if interrupted().await.is_err() {
        return false;
    }
    warn!("second interrupt, aborting");
    true
}
