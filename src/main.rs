//! nextcomp - configure a component scaffolding command.
//!
//! Collects a root folder, parent folder, component name and the set of
//! boilerplate files to create, then prints the shell command that creates
//! them. The command is never executed here.

mod client;
mod clipboard;
mod config;
mod display;
mod form;
mod options;
mod output;
mod synth;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clipboard::Clipboard;
use form::{FormDraft, Selection};
use options::OptionKey;
use output::Output;
use std::process::Command as ProcessCommand;
use synth::GenerationMode;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nextcomp")]
#[command(author, version, about = "Configure a component scaffolding command")]
#[command(long_about = "Fill in a short form and get the shell command that scaffolds a component.\n\nRuns an interactive form by default; use --pipe for scripting.")]
struct Cli {
    /// Root folder of the features tree
    #[arg(long, value_name = "DIR")]
    root: Option<String>,

    /// Parent folder; may contain '/' for nested paths
    #[arg(long, value_name = "NAME")]
    project: Option<String>,

    /// Component (view) name
    #[arg(long, value_name = "NAME")]
    view: Option<String>,

    /// Files to generate, comma separated
    #[arg(long, value_enum, value_delimiter = ',', value_name = "KINDS", conflicts_with = "no_files")]
    files: Option<Vec<OptionKey>>,

    /// Generate no optional files
    #[arg(long)]
    no_files: bool,

    /// Command shape to generate (overrides config)
    #[arg(short = 'm', long, value_enum)]
    mode: Option<GenerationMode>,

    /// No TUI, just output the command (for scripting)
    #[arg(long)]
    pipe: bool,

    /// Copy the generated command to the clipboard (pipe mode)
    #[arg(short = 'c', long, requires = "pipe")]
    copy: bool,

    /// Print the result as JSON (pipe mode)
    #[arg(long, requires = "pipe")]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the file kinds that can be generated
    Options,
    /// Open configuration file in $EDITOR
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Options) => handle_options(),
        Some(Commands::Config) => handle_config(),
        None => handle_generate(cli),
    }
}

/// Log to stderr; stdout carries only the command.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("nextcomp={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Handle the options subcommand.
fn handle_options() -> Result<()> {
    println!("File Kinds");
    println!("==========\n");
    println!("  {:<10} {:<6} {:<14} {}", "KEY", "FLAG", "EXTENSION", "LABEL");

    for key in OptionKey::ALL {
        let option = key.option();
        println!(
            "  {:<10} -{:<5} {:<14} {}",
            option.key,
            option.flag,
            option.extension.unwrap_or("-"),
            option.label
        );
    }

    println!("\nUsage:");
    println!("  nextcomp --pipe --view Cart --files index,hooks");
    println!("  nextcomp --pipe --mode filesystem-scaffold --project shop/sub");

    Ok(())
}

/// Handle the config command.
fn handle_config() -> Result<()> {
    let config_path = config::Config::config_path()?;

    // Create default config if it doesn't exist
    if !config_path.exists() {
        config::Config::default().save()?;
        println!("Created default config at {}", config_path.display());
    }

    // Open in editor
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    let status = ProcessCommand::new(&editor)
        .arg(&config_path)
        .status()
        .context("Failed to open editor")?;

    if !status.success() {
        eprintln!("Editor exited with non-zero status");
    }

    Ok(())
}

/// Handle generation (TUI or pipe).
fn handle_generate(cli: Cli) -> Result<()> {
    let mut config = config::Config::load().context("Failed to load configuration")?;
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    debug!("Generation mode: {}", config.mode);

    apply_overrides(&mut config.defaults, &cli);

    if cli.pipe {
        return handle_pipe(&config, cli.copy, cli.json);
    }

    if !atty::is(atty::Stream::Stdin) {
        anyhow::bail!("Interactive mode needs a terminal. Use --pipe for scripting.");
    }

    match client::run_tui(&config)? {
        client::tui::TuiResult::Command(command) => {
            // Output just the command to stdout
            println!("{}", command);
        }
        client::tui::TuiResult::Cancelled => {
            info!("Cancelled");
        }
    }

    Ok(())
}

/// Fold command-line values over the configured form defaults.
fn apply_overrides(defaults: &mut config::FormDefaults, cli: &Cli) {
    if let Some(root) = &cli.root {
        defaults.root_folder = root.clone();
    }
    if let Some(project) = &cli.project {
        defaults.project_name = project.clone();
    }
    if let Some(view) = &cli.view {
        defaults.view_folder = view.clone();
    }
    if cli.no_files {
        defaults.formatting = Selection::default();
    } else if let Some(files) = &cli.files {
        defaults.formatting = files.iter().copied().collect();
    }
}

fn handle_pipe(config: &config::Config, copy: bool, json: bool) -> Result<()> {
    let draft = FormDraft::from_defaults(&config.defaults);

    let form = match draft.submit() {
        Ok(form) => form,
        Err(errors) => {
            if json {
                println!("{}", Output::invalid(&errors).to_json()?);
            } else {
                for error in &errors {
                    eprintln!("Error: {}", error.display_message());
                }
            }
            std::process::exit(1);
        }
    };

    let command = synth::synthesize(config.mode, &form);
    info!("Generated {} command", config.mode);

    if copy {
        if let Err(e) = clipboard::SystemClipboard.write_text(command.as_str()) {
            warn!("{}", e);
            eprintln!("{}", display::MANUAL_COPY_MESSAGE);
        } else {
            eprintln!("Copied to clipboard");
        }
    }

    if json {
        println!("{}", Output::generated(config.mode, command, form).to_json()?);
    } else {
        println!("{}", command);
    }

    Ok(())
}
