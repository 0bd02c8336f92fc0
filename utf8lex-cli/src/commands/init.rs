//! Init command implementation.
//!
//! Scaffolds a new lexer project: a `utf8lex.toml` project config, a
//! starter `.utf8lex` spec file with one example definition and rule, and an
//! empty `templates` directory for a future code-emission backend to read
//! from — a thin convenience so `generate`/`check` have somewhere to point
//! on a first run.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::commands::common::{error_messages, output_messages};
use crate::commands::traits::{Command, CommandDescription};
use crate::config::Config;
use crate::error::{CliError, Result};

const STARTER_SPEC: &str = "\
IDENT LETTER+\n\
NUMBER NUM_DECIMAL+\n\
SPACE WHITESPACE+\n\
%%\n\
IDENT\n\
NUMBER\n\
SPACE\n\
%%\n\
";

/// Arguments for the init command.
#[derive(Debug, Clone, Default)]
pub struct InitArgs {
    /// Enable verbose output.
    pub verbose: bool,
    /// Force initialization even if directory is not empty.
    pub force: bool,
    /// Directory to initialize (default: current directory).
    pub path: Option<PathBuf>,
}

/// Init command handler.
pub struct InitCommand {
    args: InitArgs,
}

impl InitCommand {
    pub fn new(args: InitArgs) -> Self {
        Self { args }
    }

    pub fn run(&self) -> Result<()> {
        let start_time = Instant::now();
        let target_path = self.get_target_path();

        self.validate_directory(&target_path)?;
        self.create_project_structure(&target_path)?;
        self.create_starter_spec(&target_path)?;
        self.create_config_file(&target_path)?;

        if self.args.verbose {
            eprintln!(
                "{} project initialized at {}",
                output_messages::CREATED_FILE,
                target_path.display()
            );
            eprintln!("✅ completed in {:.2}s", start_time.elapsed().as_secs_f64());
        }

        Ok(())
    }

    fn get_target_path(&self) -> PathBuf {
        self.args.path.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    fn validate_directory(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            if self.args.verbose {
                eprintln!("{} creating directory: {}", output_messages::INFO, path.display());
            }
            std::fs::create_dir_all(path)?;
            return Ok(());
        }

        if !path.is_dir() {
            return Err(CliError::validation(format!(
                "{} {}",
                error_messages::TARGET_NOT_DIR,
                path.display()
            )));
        }

        let is_empty = Self::check_directory_empty(path)?;
        if !is_empty && !self.args.force {
            return Err(CliError::validation(format!(
                "{} {}",
                error_messages::DIR_NOT_EMPTY,
                path.display()
            )));
        }

        Ok(())
    }

    fn check_directory_empty(path: &Path) -> Result<bool> {
        Ok(std::fs::read_dir(path)?.next().is_none())
    }

    fn create_project_structure(&self, path: &Path) -> Result<()> {
        let dir_path = path.join("templates");
        if !dir_path.exists() {
            std::fs::create_dir(&dir_path)?;
            if self.args.verbose {
                eprintln!("{} {}", output_messages::CREATED_DIR, dir_path.display());
            }
        }
        Ok(())
    }

    fn create_starter_spec(&self, path: &Path) -> Result<()> {
        let config = Config::default();
        let spec_path = path.join(&config.spec);

        if spec_path.exists() && !self.args.force {
            if self.args.verbose {
                eprintln!("{} spec file already exists, skipping", output_messages::WARNING);
            }
            return Ok(());
        }

        std::fs::write(&spec_path, STARTER_SPEC)?;
        if self.args.verbose {
            eprintln!("{} {}", output_messages::CREATED_FILE, spec_path.display());
        }
        Ok(())
    }

    fn create_config_file(&self, path: &Path) -> Result<()> {
        let config_path = path.join(crate::config::CONFIG_FILE_NAME);

        if config_path.exists() && !self.args.force {
            if self.args.verbose {
                eprintln!("{} configuration file already exists, skipping", output_messages::WARNING);
            }
            return Ok(());
        }

        Config::default().save_to_path(&config_path)?;
        if self.args.verbose {
            eprintln!("{} {}", output_messages::CREATED_FILE, config_path.display());
        }
        Ok(())
    }
}

impl Command for InitCommand {
    type Args = InitArgs;
    type Output = ();

    fn new(args: Self::Args) -> Self {
        Self { args }
    }

    fn execute(&self) -> Result<Self::Output> {
        self.run()
    }

    fn name() -> &'static str {
        "init"
    }
}

impl CommandDescription for InitCommand {
    fn description() -> &'static str {
        "Scaffold a new lexer project"
    }

    fn help() -> &'static str {
        "Creates a utf8lex.toml project config, a starter spec file, and a \
         templates directory in the specified or current directory."
    }
}

/// Run the init command.
pub fn run_init(args: InitArgs) -> Result<()> {
    let command = InitCommand::new(args);
    command.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_args_default() {
        let args = InitArgs::default();
        assert!(!args.verbose);
        assert!(!args.force);
        assert!(args.path.is_none());
    }

    #[test]
    fn init_command_name() {
        assert_eq!(<InitCommand as Command>::name(), "init");
    }

    #[test]
    fn init_scaffolds_an_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let args = InitArgs {
            path: Some(temp_dir.path().to_path_buf()),
            verbose: false,
            force: false,
        };

        let result = InitCommand::new(args).run();

        assert!(result.is_ok());
        assert!(temp_dir.path().join("templates").exists());
        assert!(temp_dir.path().join(".utf8lex").exists());
        assert!(temp_dir.path().join("utf8lex.toml").exists());
    }

    #[test]
    fn init_refuses_a_nonempty_directory_without_force() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("existing.txt"), "content").unwrap();

        let args = InitArgs {
            path: Some(temp_dir.path().to_path_buf()),
            verbose: false,
            force: false,
        };

        let result = InitCommand::new(args).run();
        assert!(result.is_err());
        if let Err(CliError::Validation(msg)) = result {
            assert!(msg.contains("not empty"));
        } else {
            panic!("expected a validation error");
        }
    }

    #[test]
    fn init_proceeds_on_a_nonempty_directory_with_force() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("existing.txt"), "content").unwrap();

        let args = InitArgs {
            path: Some(temp_dir.path().to_path_buf()),
            verbose: false,
            force: true,
        };

        let result = InitCommand::new(args).run();
        assert!(result.is_ok());
    }

    #[test]
    fn run_init_convenience_function() {
        let temp_dir = TempDir::new().unwrap();
        let args = InitArgs {
            path: Some(temp_dir.path().to_path_buf()),
            verbose: false,
            force: false,
        };

        assert!(run_init(args).is_ok());
    }
}
