//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Interactive test explorer
#[derive(Parser, Debug)]
#[command(name = "caseview")]
#[command(version = "0.1.0")]
#[command(about = "Browse, run and inspect registered tests in code and category views")]
#[command(long_about = None)]
pub struct Args {
    /// Subcommand; `explore` when omitted
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the interactive explorer
    Explore(ExploreArgs),

    /// Run tests without the explorer and print a report
    Run(RunArgs),

    /// Print a view as a tree
    List(ListArgs),

    /// Show or create configuration
    Config(ConfigArgs),
}

/// Arguments for explore command
#[derive(Parser, Debug, Default)]
pub struct ExploreArgs {
    /// Start view (code, category)
    #[arg(long)]
    pub view: Option<String>,

    /// Start with every node expanded
    #[arg(short, long)]
    pub expand_all: bool,

    /// Maximum cases running at once
    #[arg(long)]
    pub concurrent: Option<usize>,
}

/// Arguments for run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Only cases whose category starts with this path, e.g. `Net/HTTP`
    #[arg(short = 'C', long)]
    pub category: Option<String>,

    /// Only cases whose label, test name or identity contains this text
    #[arg(short, long)]
    pub name: Option<String>,

    /// Output format (table, json, json-pretty, csv, summary)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Maximum cases running at once
    #[arg(long)]
    pub concurrent: Option<usize>,

    /// Save report to file
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// View to print (code, category)
    #[arg(long, default_value = "code")]
    pub view: String,

    /// Print one identity per line instead of a tree
    #[arg(short, long)]
    pub flat: bool,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write an example configuration file
    Init {
        /// Target path; `./caseview.yaml` when omitted
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// List supported environment variables
    Env,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let args = Args::parse_from(["caseview"]);
        assert!(args.command.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn test_run_args() {
        let args = Args::parse_from([
            "caseview",
            "run",
            "--category",
            "Net/HTTP",
            "--format",
            "json",
            "--concurrent",
            "4",
            "-v",
        ]);
        assert!(args.verbose);
        match args.command {
            Some(Command::Run(run)) => {
                assert_eq!(run.category.as_deref(), Some("Net/HTTP"));
                assert_eq!(run.format.as_deref(), Some("json"));
                assert_eq!(run.concurrent, Some(4));
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_list_args() {
        let args = Args::parse_from(["caseview", "list", "--view", "category"]);
        match args.command {
            Some(Command::List(list)) => {
                assert_eq!(list.view, "category");
                assert!(!list.flat);
            }
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_config_init() {
        let args = Args::parse_from(["caseview", "--config", "x.yaml", "config", "init", "--force"]);
        assert_eq!(args.config, Some(PathBuf::from("x.yaml")));
        match args.command {
            Some(Command::Config(ConfigArgs {
                action: ConfigAction::Init { path, force },
            })) => {
                assert!(path.is_none());
                assert!(force);
            }
            _ => panic!("Expected Config init"),
        }
    }
}
