//! wellness-e2e - Main Entry Point
//!
//! Runs a named group of Playwright projects against the local development
//! server, refusing to start when the server is not up.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use wellness_e2e::output::print_error;
use wellness_e2e::{Invocation, RunOptions, RunnerConfig, TestRunner};

/// Wellness app E2E runner
#[derive(Parser, Debug)]
#[command(name = "wellness-e2e")]
#[command(version, about, long_about = None)]
#[command(after_help = "Run `wellness-e2e help` to list the test groups.")]
struct Cli {
    /// Test group to run, or `help` to list groups [default: comprehensive]
    #[arg(allow_hyphen_values = true)]
    command: Option<String>,

    /// Run browsers with a visible window
    #[arg(long)]
    headed: bool,

    /// Step through tests in the Playwright inspector
    #[arg(long)]
    debug: bool,

    /// URL of the running development server
    #[arg(long, env = "WELLNESS_E2E_BASE_URL")]
    base_url: Option<String>,

    /// Reachability probe timeout in milliseconds
    #[arg(long, env = "WELLNESS_E2E_PROBE_TIMEOUT_MS")]
    probe_timeout_ms: Option<u64>,

    /// Runner config file (TOML)
    #[arg(long, env = "WELLNESS_E2E_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Additional arguments passed to Playwright unchanged
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    engine_args: Vec<String>,
}

impl Cli {
    /// Config file (if any) with flag and environment overrides applied
    fn runner_config(&self) -> wellness_e2e::E2eResult<RunnerConfig> {
        let mut config = RunnerConfig::load(self.config.as_deref())?;

        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(ms) = self.probe_timeout_ms {
            config.probe_timeout_ms = ms;
        }

        config.validate()?;
        Ok(config)
    }

    /// Take runner flags given after the command back out of `engine_args`.
    ///
    /// `--config` stays with the engine: Playwright has a flag of that name.
    fn reclaim_runner_options(&mut self) -> anyhow::Result<()> {
        let mut args = std::mem::take(&mut self.engine_args).into_iter();
        let mut rest = Vec::new();

        while let Some(arg) = args.next() {
            let (name, inline) = match arg.split_once('=') {
                Some((name, value)) => (name.to_string(), Some(value.to_string())),
                None => (arg.clone(), None),
            };

            match name.as_str() {
                "-v" | "--verbose" if inline.is_none() => self.verbose = true,
                "--base-url" => self.base_url = Some(take_value(&name, inline, &mut args)?),
                "--probe-timeout-ms" => {
                    let value = take_value(&name, inline, &mut args)?;
                    let ms = value
                        .parse()
                        .with_context(|| format!("invalid value '{}' for {}", value, name))?;
                    self.probe_timeout_ms = Some(ms);
                }
                _ => rest.push(arg),
            }
        }

        self.engine_args = rest;
        Ok(())
    }
}

fn take_value(
    name: &str,
    inline: Option<String>,
    args: &mut impl Iterator<Item = String>,
) -> anyhow::Result<String> {
    inline
        .or_else(|| args.next())
        .ok_or_else(|| anyhow::anyhow!("{} requires a value", name))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            e.print()?;
            std::process::exit(code);
        }
    };

    if let Err(e) = cli.reclaim_runner_options() {
        let mut stdout = std::io::stdout();
        print_error(&mut stdout, &format!("{:#}", e))?;
        stdout.flush()?;
        std::process::exit(1);
    }

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = std::io::stdout();

    let config = match cli.runner_config() {
        Ok(config) => config,
        Err(e) => {
            print_error(&mut stdout, &e.to_string())?;
            stdout.flush()?;
            std::process::exit(1);
        }
    };
    debug!("Runner config: {:?}", config);

    let invocation = Invocation::new(
        cli.command,
        RunOptions {
            headed: cli.headed,
            debug: cli.debug,
        },
        cli.engine_args,
    );

    let runner = TestRunner::new(config);
    let outcome = runner.run(&invocation, &mut stdout).await?;
    stdout.flush()?;

    std::process::exit(outcome.exit_code());
}
