//! Static table of named test groups
//!
//! Each group selects a set of Playwright projects (device/browser profiles)
//! and may add engine arguments such as a `--grep` title filter. Project ids
//! are not validated here; the engine rejects unknown ones at run time.

use crate::error::{E2eError, E2eResult};

/// Group run when no command is given
pub const DEFAULT_GROUP: &str = "comprehensive";

/// Command that prints the group table instead of running anything
pub const HELP_COMMAND: &str = "help";

/// Title substring the `quick` group filters on
pub const SMOKE_FILTER: &str = "@smoke";

/// A named selection of projects handed to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestGroup {
    pub name: &'static str,
    pub description: &'static str,
    pub projects: &'static [&'static str],
    pub extra_args: &'static [&'static str],
}

const GROUPS: &[TestGroup] = &[
    TestGroup {
        name: "all",
        description: "Every project: comprehensive, iOS, Android and desktop profiles",
        projects: &["mobile-comprehensive", "mobile-ios", "mobile-android", "mobile-desktop"],
        extra_args: &[],
    },
    TestGroup {
        name: "mobile",
        description: "Mobile device profiles only (iOS and Android viewports)",
        projects: &["mobile-ios", "mobile-android"],
        extra_args: &[],
    },
    TestGroup {
        name: "desktop",
        description: "Desktop browser profile rendering the mobile web build",
        projects: &["mobile-desktop"],
        extra_args: &[],
    },
    TestGroup {
        name: "comprehensive",
        description: "Full verification suite on the primary mobile profile",
        projects: &["mobile-comprehensive"],
        extra_args: &[],
    },
    TestGroup {
        name: "quick",
        description: "Smoke checks only (tests tagged @smoke) on the primary profile",
        projects: &["mobile-comprehensive"],
        extra_args: &["--grep", SMOKE_FILTER],
    },
];

/// Look up a group by command name
pub fn lookup(name: &str) -> E2eResult<&'static TestGroup> {
    GROUPS
        .iter()
        .find(|g| g.name == name)
        .ok_or_else(|| E2eError::UnknownGroup(name.to_string()))
}

/// All groups in display order
pub fn groups() -> &'static [TestGroup] {
    GROUPS
}
