//! Check command implementation.
//!
//! Parses a spec file and reports whether it is well-formed, without
//! emitting anything. A direct, low-risk consequence of already having a
//! parser and a diagnostic handler: useful on its own, and as a fast
//! pre-flight before `generate`.

use std::path::PathBuf;
use std::time::Instant;

use utf8lex_core::specparser;

use crate::commands::common::{error_messages, output_messages};
use crate::commands::traits::{Command, CommandDescription};
use crate::error::{CliError, Result};

/// Arguments for the check command.
#[derive(Debug, Clone)]
pub struct CheckArgs {
    /// Enable verbose output.
    pub verbose: bool,
    /// Path to the spec file to validate.
    pub spec: PathBuf,
}

/// Check command handler.
pub struct CheckCommand {
    args: CheckArgs,
}

impl CheckCommand {
    pub fn new(args: CheckArgs) -> Self {
        Self { args }
    }

    pub fn run(&self) -> Result<()> {
        let start_time = Instant::now();

        if !self.args.spec.exists() {
            return Err(CliError::validation(format!(
                "{} {}",
                error_messages::SPEC_NOT_FOUND,
                self.args.spec.display()
            )));
        }

        let source = std::fs::read_to_string(&self.args.spec)?;
        let parsed = specparser::parse(&source).map_err(CliError::from)?;

        eprintln!(
            "{} {}",
            output_messages::CHECK_OK,
            self.args.spec.display()
        );
        if self.args.verbose {
            eprintln!(
                "ℹ️ {} definition(s), {} rule(s) in {:.2}s",
                parsed.database.definition_count(),
                parsed.database.rule_count(),
                start_time.elapsed().as_secs_f64()
            );
        }

        Ok(())
    }
}

impl Command for CheckCommand {
    type Args = CheckArgs;
    type Output = ();

    fn new(args: Self::Args) -> Self {
        Self { args }
    }

    fn execute(&self) -> Result<Self::Output> {
        self.run()
    }

    fn name() -> &'static str {
        "check"
    }
}

impl CommandDescription for CheckCommand {
    fn description() -> &'static str {
        "Validate a spec file without generating output"
    }

    fn help() -> &'static str {
        "Parses a spec file and reports diagnostics; exits non-zero on the \
         first error encountered."
    }
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> Result<()> {
    let command = CheckCommand::new(args);
    command.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn check_command_name() {
        assert_eq!(<CheckCommand as Command>::name(), "check");
    }

    #[test]
    fn check_accepts_a_well_formed_spec() {
        let temp_dir = TempDir::new().unwrap();
        let spec_path = temp_dir.path().join("grammar.utf8lex");
        std::fs::write(&spec_path, "IDENT LETTER+\n%%\nIDENT\n%%\n").unwrap();

        let args = CheckArgs { verbose: false, spec: spec_path };
        let result = run_check(args);
        assert!(result.is_ok());
    }

    #[test]
    fn check_rejects_a_missing_spec() {
        let temp_dir = TempDir::new().unwrap();
        let args = CheckArgs {
            verbose: false,
            spec: temp_dir.path().join("missing.utf8lex"),
        };
        let result = run_check(args);
        assert!(result.is_err());
    }

    #[test]
    fn check_reports_an_unresolved_reference() {
        let temp_dir = TempDir::new().unwrap();
        let spec_path = temp_dir.path().join("grammar.utf8lex");
        std::fs::write(&spec_path, "IDENT NO_SUCH_NAME\n%%\nIDENT\n%%\n").unwrap();

        let args = CheckArgs { verbose: false, spec: spec_path };
        let result = run_check(args);
        assert!(result.is_err());
        assert!(matches!(result, Err(CliError::Lex(_))));
    }
}
