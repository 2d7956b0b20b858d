//! Playwright test engine launcher

use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::{EngineConfig, RunnerConfig};
use crate::error::{E2eError, E2eResult};
use crate::registry::TestGroup;

pub const HEADED_FLAG: &str = "--headed";
pub const DEBUG_FLAG: &str = "--debug";

/// Environment variable the Playwright config reads the target URL from
pub const BASE_URL_ENV: &str = "E2E_BASE_URL";

/// Browser visibility and inspector switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Show the browser window
    pub headed: bool,
    /// Open the Playwright inspector and step through tests
    pub debug: bool,
}

impl RunOptions {
    /// Pull `--headed` / `--debug` out of `args`, returning whatever is left
    pub fn absorb(&mut self, args: Vec<String>) -> Vec<String> {
        args.into_iter()
            .filter(|arg| match arg.as_str() {
                HEADED_FLAG => {
                    self.headed = true;
                    false
                }
                DEBUG_FLAG => {
                    self.debug = true;
                    false
                }
                _ => true,
            })
            .collect()
    }
}

/// Everything the launcher needs for one engine run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub projects: Vec<String>,
    pub extra_args: Vec<String>,
    pub options: RunOptions,
}

impl LaunchPlan {
    /// Combine a group with the operator's passthrough arguments.
    ///
    /// The group's own extra arguments come first.
    pub fn for_group(group: &TestGroup, passthrough: &[String], options: RunOptions) -> Self {
        Self {
            projects: group.projects.iter().map(|p| p.to_string()).collect(),
            extra_args: group
                .extra_args
                .iter()
                .map(|a| a.to_string())
                .chain(passthrough.iter().cloned())
                .collect(),
            options,
        }
    }
}

/// Exit status of a finished engine run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchOutcome {
    pub exit_code: i32,
}

impl LaunchOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs the test engine
#[async_trait]
pub trait Launcher: Send + Sync {
    /// Run the engine to completion.
    ///
    /// Fails with [`E2eError::LaunchFailure`] only when the process could not
    /// be started; a failing test run is an `Ok` with a non-zero exit code.
    async fn launch(&self, plan: &LaunchPlan) -> E2eResult<LaunchOutcome>;
}

/// Spawns `npx playwright test` (or the configured equivalent)
#[derive(Debug, Clone)]
pub struct PlaywrightLauncher {
    engine: EngineConfig,
    base_url: String,
}

impl PlaywrightLauncher {
    pub fn new(config: &RunnerConfig) -> Self {
        Self {
            engine: config.engine.clone(),
            base_url: config.base_url.clone(),
        }
    }

    /// Full argument list passed to the engine program
    pub fn command_args(&self, plan: &LaunchPlan) -> Vec<String> {
        let mut args = self.engine.args.clone();

        for project in &plan.projects {
            args.push("--project".to_string());
            args.push(project.clone());
        }

        args.push(format!("--reporter={}", self.engine.reporter));
        args.extend(plan.extra_args.iter().cloned());

        if plan.options.headed {
            args.push(HEADED_FLAG.to_string());
        }
        if plan.options.debug {
            args.push(DEBUG_FLAG.to_string());
        }

        args
    }

    /// Human-readable command line for logs
    pub fn command_line(&self, plan: &LaunchPlan) -> String {
        std::iter::once(self.engine.program.clone())
            .chain(self.command_args(plan))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl Launcher for PlaywrightLauncher {
    async fn launch(&self, plan: &LaunchPlan) -> E2eResult<LaunchOutcome> {
        info!("Running: {}", self.command_line(plan));

        let mut cmd = Command::new(&self.engine.program);
        cmd.args(self.command_args(plan))
            .env(BASE_URL_ENV, &self.base_url)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // The html reporter otherwise serves the report and blocks on failure
        if std::env::var_os("PLAYWRIGHT_HTML_OPEN").is_none() {
            cmd.env("PLAYWRIGHT_HTML_OPEN", "never");
        }

        let mut child = cmd.spawn().map_err(|source| E2eError::LaunchFailure {
            program: self.engine.program.clone(),
            source,
        })?;

        debug!("Test engine started (pid: {:?})", child.id());

        // The child shares our process group and sees the same interrupt, so
        // keep waiting for it instead of exiting underneath it.
        let status = loop {
            tokio::select! {
                status = child.wait() => break status?,
                signal = tokio::signal::ctrl_c() => match signal {
                    Ok(()) => warn!("Interrupt received, waiting for the test engine to exit"),
                    Err(e) => {
                        warn!("Cannot listen for interrupts: {}", e);
                        break child.wait().await?;
                    }
                },
            }
        };

        let exit_code = exit_code_of(status);
        debug!("Test engine exited with {}", exit_code);
        Ok(LaunchOutcome { exit_code })
    }
}

/// Map an exit status to a shell-style exit code
fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;

        if let Some(sig) = status.signal() {
            match nix::sys::signal::Signal::try_from(sig) {
                Ok(signal) => warn!("Test engine terminated by {}", signal.as_str()),
                Err(_) => warn!("Test engine terminated by signal {}", sig),
            }
            return 128 + sig;
        }
    }

    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;

    fn launcher_for(program: &str, args: &[&str]) -> PlaywrightLauncher {
        let mut config = RunnerConfig::default();
        config.base_url = "http://127.0.0.1:19006".to_string();
        config.engine.program = program.to_string();
        config.engine.args = args.iter().map(|a| a.to_string()).collect();
        PlaywrightLauncher::new(&config)
    }

    fn plan(projects: &[&str], extra: &[&str], options: RunOptions) -> LaunchPlan {
        LaunchPlan {
            projects: projects.iter().map(|p| p.to_string()).collect(),
            extra_args: extra.iter().map(|a| a.to_string()).collect(),
            options,
        }
    }

    #[test]
    fn test_command_args_order() {
        let launcher = PlaywrightLauncher::new(&RunnerConfig::default());
        let plan = plan(
            &["mobile-ios", "mobile-android"],
            &["--grep", "@smoke"],
            RunOptions { headed: true, debug: true },
        );

        assert_eq!(
            launcher.command_args(&plan),
            vec![
                "playwright", "test",
                "--project", "mobile-ios",
                "--project", "mobile-android",
                "--reporter=html",
                "--grep", "@smoke",
                "--headed",
                "--debug",
            ]
        );
    }

    #[test]
    fn test_command_args_without_options() {
        let launcher = PlaywrightLauncher::new(&RunnerConfig::default());
        let args = launcher.command_args(&plan(&["mobile-desktop"], &[], RunOptions::default()));

        assert!(!args.iter().any(|a| a == HEADED_FLAG));
        assert!(!args.iter().any(|a| a == DEBUG_FLAG));
        assert_eq!(args.last().map(String::as_str), Some("--reporter=html"));
    }

    #[test]
    fn test_absorb_flags() {
        let mut options = RunOptions::default();
        let rest = options.absorb(vec![
            "--grep".to_string(),
            "breathing".to_string(),
            "--debug".to_string(),
            "--workers=1".to_string(),
        ]);

        assert_eq!(options, RunOptions { headed: false, debug: true });
        assert_eq!(rest, vec!["--grep", "breathing", "--workers=1"]);
    }

    #[test]
    fn test_plan_for_group_puts_group_args_first() {
        let quick = registry::lookup("quick").unwrap();
        let plan = LaunchPlan::for_group(quick, &["--retries=0".to_string()], RunOptions::default());

        assert_eq!(plan.projects, vec!["mobile-comprehensive"]);
        assert_eq!(plan.extra_args, vec!["--grep", registry::SMOKE_FILTER, "--retries=0"]);
    }

    #[tokio::test]
    async fn test_missing_program_is_launch_failure() {
        let launcher = launcher_for("wellness-e2e-no-such-engine", &[]);
        let result = launcher.launch(&plan(&["mobile-ios"], &[], RunOptions::default())).await;

        match result {
            Err(E2eError::LaunchFailure { program, .. }) => {
                assert_eq!(program, "wellness-e2e-no-such-engine");
            }
            other => panic!("expected LaunchFailure, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_code_is_relayed() {
        let launcher = launcher_for("sh", &["-c", "exit 3"]);
        let outcome = launcher
            .launch(&plan(&["mobile-ios"], &[], RunOptions::default()))
            .await
            .unwrap();

        assert_eq!(outcome.exit_code, 3);
        assert!(!outcome.success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_base_url_is_exported() {
        let launcher = launcher_for("sh", &["-c", r#"test "$E2E_BASE_URL" = "http://127.0.0.1:19006""#]);
        let outcome = launcher
            .launch(&plan(&["mobile-ios"], &[], RunOptions::default()))
            .await
            .unwrap();

        assert!(outcome.success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_signal_maps_to_shell_code() {
        let launcher = launcher_for("sh", &["-c", "kill -TERM $$"]);
        let outcome = launcher
            .launch(&plan(&["mobile-ios"], &[], RunOptions::default()))
            .await
            .unwrap();

        assert_eq!(outcome.exit_code, 128 + 15);
    }
}
