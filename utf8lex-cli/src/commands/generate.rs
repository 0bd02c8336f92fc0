//! Generate command implementation.
//!
//! Reads a spec file, builds its definition/rule database, and writes
//! whatever the selected target-language backend emits for it. Only a
//! diagnostic placeholder backend (`DebugEmitter`) ships in this crate —
//! per-language code-emission templates are an external collaborator
//! (`utf8lex_core::emit`'s doc comment) this command exercises the seam for
//! but does not itself implement.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use tracing::{debug, info};

use utf8lex_core::emit::{DebugEmitter, Emitter, TargetLanguage};
use utf8lex_core::specparser;

use crate::commands::common::{error_messages, output_messages};
use crate::commands::traits::{Command, CommandDescription};
use crate::error::{CliError, Result};

/// Arguments for the generate command.
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    /// Enable verbose output.
    pub verbose: bool,
    /// Path to the spec file to generate from.
    pub spec: PathBuf,
    /// Directory holding code-emission templates for the target language.
    pub templates_dir: Option<PathBuf>,
    /// Path the generated source is written to.
    pub output: PathBuf,
    /// Target host language tag (`rust`, `c`, ...).
    pub lang: String,
}

/// Generate command handler.
pub struct GenerateCommand {
    args: GenerateArgs,
}

impl GenerateCommand {
    pub fn new(args: GenerateArgs) -> Self {
        Self { args }
    }

    pub fn run(&self) -> Result<()> {
        let start_time = Instant::now();

        self.validate_spec_path()?;
        let target = self.resolve_target()?;
        self.warn_if_templates_dir_unused();

        let source = std::fs::read_to_string(&self.args.spec)?;
        let parsed = specparser::parse(&source).map_err(CliError::from)?;

        if self.args.verbose {
            info!(
                definitions = parsed.database.definition_count(),
                rules = parsed.database.rule_count(),
                "parsed spec file"
            );
        }

        let emitter = self.select_emitter(target);
        let rendered = emitter.emit(&parsed.database).map_err(CliError::from)?;

        if let Some(parent) = self.args.output.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.args.output, rendered)?;

        if self.args.verbose {
            eprintln!(
                "{} {}",
                output_messages::WROTE_OUTPUT,
                self.args.output.display()
            );
            eprintln!("✅ completed in {:.2}s", start_time.elapsed().as_secs_f64());
        }

        Ok(())
    }

    fn validate_spec_path(&self) -> Result<()> {
        let path = &self.args.spec;
        if !path.exists() {
            return Err(CliError::validation(format!(
                "{} {}",
                error_messages::SPEC_NOT_FOUND,
                path.display()
            )));
        }
        if !path.is_file() {
            return Err(CliError::validation(format!(
                "{} {}",
                error_messages::SPEC_NOT_FILE,
                path.display()
            )));
        }
        Ok(())
    }

    fn resolve_target(&self) -> Result<TargetLanguage> {
        TargetLanguage::from_str(&self.args.lang).map_err(|_| {
            CliError::validation(format!(
                "{} {}",
                error_messages::UNKNOWN_LANG,
                self.args.lang
            ))
        })
    }

    fn warn_if_templates_dir_unused(&self) {
        if let Some(dir) = &self.args.templates_dir {
            if self.args.verbose {
                debug!(dir = %dir.display(), "templates directory supplied but no templated backend is bundled; falling back to the diagnostic emitter");
            }
        }
    }

    /// Only the diagnostic placeholder emitter ships here; a real
    /// per-language backend would be selected by `target` instead.
    fn select_emitter(&self, _target: TargetLanguage) -> impl Emitter {
        DebugEmitter
    }
}

impl Command for GenerateCommand {
    type Args = GenerateArgs;
    type Output = ();

    fn new(args: Self::Args) -> Self {
        Self { args }
    }

    fn execute(&self) -> Result<Self::Output> {
        self.run()
    }

    fn name() -> &'static str {
        "generate"
    }
}

impl CommandDescription for GenerateCommand {
    fn description() -> &'static str {
        "Generate a lexer from a spec file"
    }

    fn help() -> &'static str {
        "Parses a spec file into a definition/rule database and writes \
         whatever the selected target-language backend emits for it."
    }
}

fn parent_exists(path: &Path) -> bool {
    path.parent().map(|p| p.as_os_str().is_empty() || p.exists()).unwrap_or(true)
}

/// Run the generate command.
pub fn run_generate(args: GenerateArgs) -> Result<()> {
    if !parent_exists(&args.output) {
        return Err(CliError::validation(format!(
            "{} {}",
            error_messages::OUTPUT_PATH_NOT_DIR,
            args.output.display()
        )));
    }
    let command = GenerateCommand::new(args);
    command.run()
}
