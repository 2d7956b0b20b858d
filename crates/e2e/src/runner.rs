//! Command dispatch: group lookup, reachability gate, engine launch

use std::io::Write;

use tracing::{debug, info};

use crate::artifacts::ArtifactSummary;
use crate::config::RunnerConfig;
use crate::error::{E2eError, E2eResult};
use crate::output::{print_error, print_help, print_info, print_success, print_warning};
use crate::playwright::{LaunchPlan, Launcher, PlaywrightLauncher, RunOptions};
use crate::probe::{HttpProber, ProbeResult, Prober};
use crate::registry::{self, DEFAULT_GROUP, HELP_COMMAND};
use crate::BIN_NAME;

/// A parsed command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// Group name or `help`; `None` runs the default group
    pub command: Option<String>,
    pub options: RunOptions,
    /// Arguments forwarded to the engine after the group's own
    pub passthrough: Vec<String>,
}

impl Invocation {
    /// Build an invocation, lifting `--headed` / `--debug` out of `args`.
    ///
    /// A `command` starting with `-` is an engine argument given without a
    /// group: it runs the default group and is forwarded with the rest.
    pub fn new(command: Option<String>, mut options: RunOptions, args: Vec<String>) -> Self {
        let (command, args) = match command {
            Some(arg) if arg.starts_with('-') => (None, std::iter::once(arg).chain(args).collect()),
            command => (command, args),
        };
        let passthrough = options.absorb(args);
        Self {
            command,
            options,
            passthrough,
        }
    }

    pub fn command(&self) -> &str {
        self.command.as_deref().unwrap_or(DEFAULT_GROUP)
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    HelpPrinted,
    UnknownGroup,
    TargetUnavailable(ProbeResult),
    LaunchFailed,
    /// The engine ran; carries its exit code
    Completed { exit_code: i32 },
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::HelpPrinted => 0,
            Outcome::UnknownGroup | Outcome::TargetUnavailable(_) | Outcome::LaunchFailed => 1,
            Outcome::Completed { exit_code } => *exit_code,
        }
    }
}

/// Drives one invocation from command name to engine exit code
pub struct TestRunner<P = HttpProber, L = PlaywrightLauncher> {
    config: RunnerConfig,
    prober: P,
    launcher: L,
}

impl TestRunner {
    /// Runner probing over HTTP and launching Playwright
    pub fn new(config: RunnerConfig) -> Self {
        let launcher = PlaywrightLauncher::new(&config);
        Self::with_parts(config, HttpProber, launcher)
    }
}

impl<P: Prober, L: Launcher> TestRunner<P, L> {
    pub fn with_parts(config: RunnerConfig, prober: P, launcher: L) -> Self {
        Self {
            config,
            prober,
            launcher,
        }
    }

    pub fn prober(&self) -> &P {
        &self.prober
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Run one invocation, writing operator messages to `out`.
    ///
    /// Unknown groups, an unreachable server, a failed spawn and failing tests
    /// all come back as an [`Outcome`]; `Err` is reserved for I/O problems.
    pub async fn run<W: Write>(&self, invocation: &Invocation, out: &mut W) -> E2eResult<Outcome> {
        let command = invocation.command();

        if command == HELP_COMMAND {
            print_help(out, BIN_NAME, registry::groups())?;
            return Ok(Outcome::HelpPrinted);
        }

        let group = match registry::lookup(command) {
            Ok(group) => group,
            Err(E2eError::UnknownGroup(name)) => {
                print_error(out, &format!("Unknown command: {}", name))?;
                print_info(
                    out,
                    &format!("Run `{} {}` to list the available test groups", BIN_NAME, HELP_COMMAND),
                )?;
                return Ok(Outcome::UnknownGroup);
            }
            Err(e) => return Err(e),
        };

        info!("Selected group '{}': {}", group.name, group.projects.join(", "));

        let url = &self.config.base_url;
        let probe = self.prober.probe(url, self.config.probe_timeout()).await;
        debug!("Probe of {}: {}", url, probe);

        if !probe.is_reachable() {
            let reason = match probe {
                ProbeResult::TimedOut => format!("no response within {} ms", self.config.probe_timeout_ms),
                other => other.to_string(),
            };
            print_error(out, &format!("Application is not reachable at {} ({})", url, reason))?;
            print_info(
                out,
                "Start the application first (for example `npx expo start --web`), then run the tests again",
            )?;
            return Ok(Outcome::TargetUnavailable(probe));
        }

        let plan = LaunchPlan::for_group(group, &invocation.passthrough, invocation.options);
        print_info(out, &format!("Running '{}' against {}", group.name, url))?;

        match self.launcher.launch(&plan).await {
            Ok(outcome) if outcome.success() => {
                print_success(out, &format!("All tests in '{}' passed", group.name))?;
                self.print_artifacts(out, false)?;
                Ok(Outcome::Completed { exit_code: 0 })
            }
            Ok(outcome) => {
                print_error(
                    out,
                    &format!("Tests ran but some failed (exit code {})", outcome.exit_code),
                )?;
                self.print_artifacts(out, true)?;
                Ok(Outcome::Completed {
                    exit_code: outcome.exit_code,
                })
            }
            Err(e @ E2eError::LaunchFailure { .. }) => {
                print_error(out, &format!("Tests could not run: {}", e))?;
                print_info(
                    out,
                    "Check that Node.js is on PATH and Playwright is installed (`npm install && npx playwright install`)",
                )?;
                Ok(Outcome::LaunchFailed)
            }
            Err(e) => Err(e),
        }
    }

    fn print_artifacts<W: Write>(&self, out: &mut W, failed: bool) -> E2eResult<()> {
        let summary = ArtifactSummary::collect(&self.config.engine);

        if summary.report_exists {
            print_info(out, &format!("HTML report: {}", summary.report_path.display()))?;
        } else if failed {
            print_warning(
                out,
                &format!("No HTML report found at {}", summary.report_path.display()),
            )?;
        }

        if summary.screenshots > 0 {
            print_info(
                out,
                &format!(
                    "{} screenshot(s) in {}",
                    summary.screenshots,
                    summary.artifacts_dir.display()
                ),
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_defaults_to_comprehensive() {
        let invocation = Invocation::new(None, RunOptions::default(), vec![]);
        assert_eq!(invocation.command(), "comprehensive");
    }

    #[test]
    fn test_invocation_absorbs_trailing_flags() {
        let invocation = Invocation::new(
            Some("mobile".to_string()),
            RunOptions { headed: true, debug: false },
            vec!["--grep".to_string(), "journal".to_string(), "--debug".to_string()],
        );

        assert_eq!(invocation.options, RunOptions { headed: true, debug: true });
        assert_eq!(invocation.passthrough, vec!["--grep", "journal"]);
    }

    #[test]
    fn test_leading_engine_arg_runs_default_group() {
        let invocation = Invocation::new(
            Some("--grep".to_string()),
            RunOptions::default(),
            vec!["smoke".to_string(), "--headed".to_string()],
        );

        assert_eq!(invocation.command, None);
        assert_eq!(invocation.command(), "comprehensive");
        assert_eq!(invocation.options, RunOptions { headed: true, debug: false });
        assert_eq!(invocation.passthrough, vec!["--grep", "smoke"]);
    }

    #[test]
    fn test_leading_debug_flag_is_absorbed() {
        let invocation = Invocation::new(Some("--debug".to_string()), RunOptions::default(), vec![]);

        assert_eq!(invocation.command, None);
        assert!(invocation.options.debug);
        assert!(invocation.passthrough.is_empty());
    }

    #[test]
    fn test_outcome_exit_codes() {
        assert_eq!(Outcome::HelpPrinted.exit_code(), 0);
        assert_eq!(Outcome::UnknownGroup.exit_code(), 1);
        assert_eq!(Outcome::TargetUnavailable(ProbeResult::TimedOut).exit_code(), 1);
        assert_eq!(Outcome::LaunchFailed.exit_code(), 1);
        assert_eq!(Outcome::Completed { exit_code: 0 }.exit_code(), 0);
        assert_eq!(Outcome::Completed { exit_code: 3 }.exit_code(), 3);
    }
}
