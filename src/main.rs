//! caseview - interactive test explorer
//!
//! Browses the registered sample suites in a code view (namespace, type,
//! method) and a category view (category path, disambiguated test name),
//! runs any subtree concurrently and shows live results.
//!
//! ## Usage
//!
//! ```bash
//! # Open the explorer (default command)
//! caseview
//! caseview explore --view category --expand-all
//!
//! # Run headless and print a report
//! caseview run --category Net/HTTP --format json
//!
//! # Print a view as a tree
//! caseview list --view category
//!
//! # Configuration
//! caseview config init
//! caseview config show
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use caseview::cli::{self, Args, Command, ExploreArgs};
use caseview::config::{self, AppConfig, ConfigFile, EnvConfig};
use caseview::executor::{CaseFilter, ExecutionEngine, RegistryInvoker, TestRunner};
use caseview::output::{write_outcome_to_file, OutputFormat, ResultFormatter};
use caseview::registry::Registry;
use caseview::render::render_listing;
use caseview::tree::{Explorer, ViewKind};
use caseview::tui::{self, App};
use caseview::utils::{init_logger, LogLevel, LogTarget};

mod demo;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let loaded = config::load_config(args.config.as_deref())?;
    let config = loaded.app;
    let command = args
        .command
        .unwrap_or_else(|| Command::Explore(ExploreArgs::default()));

    // The explorer owns the terminal, so it only logs to a file
    let target = match &command {
        Command::Explore(_) => config
            .log_file
            .as_ref()
            .map(|file| LogTarget::File(PathBuf::from(file)))
            .unwrap_or(LogTarget::Disabled),
        _ => LogTarget::Stderr,
    };
    let level = if args.verbose {
        LogLevel::Debug
    } else {
        config.level()
    };
    init_logger(level, target)?;

    if let Some(source) = &loaded.source {
        debug!("Loaded configuration from {}", source.display());
    }

    let registry = demo::registry().context("Failed to register sample suites")?;
    info!("Discovered {} test cases", registry.len());

    match command {
        Command::Explore(explore_args) => explore(&registry, &config, explore_args).await?,
        Command::Run(run_args) => run_tests(&registry, &config, run_args).await?,
        Command::List(list_args) => list_tests(&registry, list_args)?,
        Command::Config(config_args) => manage_config(&config, loaded.source.as_deref(), config_args)?,
    }

    Ok(())
}

fn parse_view(view: &str) -> Result<ViewKind> {
    ViewKind::from_str(view).ok_or_else(|| anyhow::anyhow!("Unknown view: {view} (expected code or category)"))
}

fn engine_for(registry: &Registry, max_concurrent: Option<usize>) -> ExecutionEngine {
    ExecutionEngine::new(RegistryInvoker::from_registry(registry)).with_max_concurrent(max_concurrent)
}

async fn explore(registry: &Registry, config: &AppConfig, args: ExploreArgs) -> Result<()> {
    let view = match &args.view {
        Some(view) => parse_view(view)?,
        None => config.start_view,
    };
    let engine = engine_for(registry, args.concurrent.or(config.max_concurrent));
    let explorer = Explorer::from_registry(registry);

    info!("Opening explorer in {} view", view);
    let mut app = App::new(explorer, engine, view, args.expand_all || config.expand_all)?;
    tui::run(&mut app, config.tick_rate()).await
}

async fn run_tests(registry: &Registry, config: &AppConfig, args: cli::RunArgs) -> Result<()> {
    let format = match &args.format {
        Some(format) => OutputFormat::from_str(format)
            .ok_or_else(|| anyhow::anyhow!("Unknown output format: {format}"))?,
        None => config.output_format(),
    };

    let mut filter = CaseFilter::new();
    if let Some(category) = &args.category {
        filter = filter.with_category(category);
    }
    if let Some(name) = &args.name {
        filter = filter.with_name(name.as_str());
    }

    let runner = TestRunner::new(engine_for(registry, args.concurrent.or(config.max_concurrent)));
    let outcome = runner.run(registry.cases(), &filter).await?;

    let formatter = ResultFormatter::new(format);
    println!("{}", formatter.format_outcome(&outcome)?);

    if let Some(output) = &args.output {
        write_outcome_to_file(output, &outcome, format)?;
        println!("Report saved to: {output}");
    }

    if !outcome.summary.is_all_passed() {
        anyhow::bail!(
            "{} of {} cases did not pass",
            outcome.summary.total - outcome.summary.succeeded,
            outcome.summary.total
        );
    }

    Ok(())
}

fn list_tests(registry: &Registry, args: cli::ListArgs) -> Result<()> {
    let view = parse_view(&args.view)?;
    let explorer = Explorer::from_registry(registry);

    if args.flat {
        for case in explorer.cases() {
            let category = if case.category_path.is_empty() {
                "-".to_string()
            } else {
                case.category_path.to_string()
            };
            println!("{:50} {:20} [{}]", case.identity, case.label(), category);
        }
        return Ok(());
    }

    println!("{}", render_listing(explorer.root(view))?);
    println!("\n{} cases", explorer.cases().len());
    Ok(())
}

fn manage_config(config: &AppConfig, source: Option<&Path>, args: cli::ConfigArgs) -> Result<()> {
    match args.action {
        cli::ConfigAction::Show => {
            match source {
                Some(path) => println!("# Loaded from {}", path.display()),
                None => println!("# No configuration file found, using defaults"),
            }
            let effective = ConfigFile {
                app: config.clone(),
                ..Default::default()
            };
            println!("{}", serde_yaml::to_string(&effective)?);
        }

        cli::ConfigAction::Init { path, force } => {
            let path = path.unwrap_or_else(ConfigFile::default_location);
            if path.exists() && !force {
                anyhow::bail!(
                    "Configuration file already exists: {}. Use --force to overwrite.",
                    path.display()
                );
            }

            ConfigFile::example().save(&path)?;
            println!("✓ Configuration file created: {}", path.display());
            println!("\nEdit the file to customize your settings.");
        }

        cli::ConfigAction::Env => {
            config::print_env_help();
            println!();
            let env = EnvConfig::load();
            if env.has_any() {
                env.print_summary();
            } else {
                println!("No CASEVIEW_* variables are set.");
            }
        }
    }

    Ok(())
}

