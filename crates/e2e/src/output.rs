//! Console output for the runner

use std::io::{self, Write};

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use crate::playwright::{DEBUG_FLAG, HEADED_FLAG};
use crate::registry::{TestGroup, DEFAULT_GROUP, HELP_COMMAND};

/// Print success message
pub fn print_success<W: Write>(out: &mut W, message: &str) -> io::Result<()> {
    writeln!(out, "{} {}", "✅".green(), message)
}

/// Print error message
pub fn print_error<W: Write>(out: &mut W, message: &str) -> io::Result<()> {
    writeln!(out, "{} {}", "❌".red(), message)
}

/// Print warning message
pub fn print_warning<W: Write>(out: &mut W, message: &str) -> io::Result<()> {
    writeln!(out, "{}  {}", "⚠️".yellow(), message)
}

/// Print info message
pub fn print_info<W: Write>(out: &mut W, message: &str) -> io::Result<()> {
    writeln!(out, "{}  {}", "ℹ️".cyan(), message)
}

/// Print the group table and flag legend
pub fn print_help<W: Write>(out: &mut W, bin: &str, groups: &[TestGroup]) -> io::Result<()> {
    writeln!(out, "Usage: {} [command] [{}] [{}] [engine args...]", bin, HEADED_FLAG, DEBUG_FLAG)?;
    writeln!(out)?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Disabled);
    table.set_header(vec!["Command", "Description", "Projects"]);

    for group in groups {
        let name = if group.name == DEFAULT_GROUP {
            format!("{} (default)", group.name)
        } else {
            group.name.to_string()
        };
        table.add_row(vec![name, group.description.to_string(), group.projects.join(", ")]);
    }

    writeln!(out, "{table}")?;
    writeln!(out)?;
    writeln!(out, "Flags:")?;
    writeln!(out, "  {:<10} Run browsers with a visible window", HEADED_FLAG)?;
    writeln!(out, "  {:<10} Step through tests in the Playwright inspector", DEBUG_FLAG)?;
    writeln!(out, "  {:<10} Show this list", HELP_COMMAND)?;
    writeln!(out)?;
    writeln!(out, "Any other arguments after the command are passed to Playwright unchanged.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;

    #[test]
    fn test_help_lists_every_group() {
        let mut buf = Vec::new();
        print_help(&mut buf, "wellness-e2e", registry::groups()).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("comprehensive (default)"));
        for group in registry::groups() {
            assert!(text.contains(group.name));
            assert!(text.contains(group.description));
        }
        assert!(text.contains(HEADED_FLAG));
        assert!(text.contains(DEBUG_FLAG));
    }
}
