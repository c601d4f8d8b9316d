//! Flags shared by every subcommand, flattened into [`super::Cli`].

use std::fs;
use std::path::PathBuf;

use clap::Args;

use strata_core::application::ApplicationError;

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// `-v` adds migration progress and adapter I/O, `-vv` everything at
    /// debug, `-vvv` trace.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Show migration progress (-v), diagnostics (-vv), traces (-vvv)"
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Only report errors"
    )]
    pub quiet: bool,

    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        help = "Disable colored output"
    )]
    pub no_color: bool,

    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Configuration file path"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "Output format"
    )]
    pub output_format: OutputFormat,

    /// Project whose tree and ledger the migration commands operate on.
    #[arg(
        short = 'C',
        long = "project",
        global = true,
        value_name = "DIR",
        default_value = ".",
        env = "STRATA_PROJECT",
        help = "Project directory (default: current directory)"
    )]
    pub project: PathBuf,
}

impl GlobalArgs {
    /// Canonical project root.
    ///
    /// Fails with `ProjectNotFound` unless `--project` names an existing
    /// directory. Canonical form lets the ledger path be compared against
    /// paths inside the project.
    pub fn project_root(&self) -> Result<PathBuf, ApplicationError> {
        let not_found = || ApplicationError::ProjectNotFound {
            path: self.project.clone(),
        };
        let root = fs::canonicalize(&self.project).map_err(|_| not_found())?;
        if !root.is_dir() {
            return Err(not_found());
        }
        Ok(root)
    }
}

/// How the CLI should render its output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human when stdout is a terminal, plain otherwise.
    #[default]
    Auto,
    Human,
    Plain,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args_for(project: PathBuf) -> GlobalArgs {
        GlobalArgs {
            verbose: 0,
            quiet: false,
            no_color: true,
            config: None,
            output_format: OutputFormat::Auto,
            project,
        }
    }

    #[test]
    fn project_root_is_canonical() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("app")).unwrap();
        let args = args_for(dir.path().join("app/../app/."));

        let root = args.project_root().unwrap();
        assert_eq!(root, std::fs::canonicalize(dir.path().join("app")).unwrap());
    }

    #[test]
    fn missing_or_file_project_is_not_found() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("strata.json");
        std::fs::write(&file, "{}").unwrap();

        for path in [dir.path().join("absent"), file] {
            assert!(matches!(
                args_for(path).project_root(),
                Err(ApplicationError::ProjectNotFound { .. })
            ));
        }
    }
}
