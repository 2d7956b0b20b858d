//! Wellness app E2E runner
//!
//! Selects a named group of Playwright projects, checks that the development
//! server is up, and launches `playwright test` for the group:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  TestRunner::run(invocation)                │
//! ├─────────────────────────────────────────────────────────────┤
//! │  registry::lookup(command)  -> TestGroup | UnknownGroup     │
//! │  Prober::probe(url)         -> Reachable | Unreachable      │
//! │                                | TimedOut                   │
//! │  Launcher::launch(plan)     -> exit code | LaunchFailure    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The prober and launcher are traits so the dispatch logic can be exercised
//! without a server or a browser.

pub mod artifacts;
pub mod config;
pub mod error;
pub mod output;
pub mod playwright;
pub mod probe;
pub mod registry;
pub mod runner;

pub use config::RunnerConfig;
pub use error::{E2eError, E2eResult};
pub use playwright::{LaunchOutcome, LaunchPlan, Launcher, PlaywrightLauncher, RunOptions};
pub use probe::{HttpProber, ProbeResult, Prober};
pub use registry::TestGroup;
pub use runner::{Invocation, Outcome, TestRunner};

/// Name of the runner binary, used in hints
pub const BIN_NAME: &str = "wellness-e2e";
