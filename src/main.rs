//! Skellaprompter CLI
//!
//! Usage:
//!   skellaprompter [OPTIONS] <COMMAND>
//!
//! Commands:
//!   init     Create the prompts, vars and prompt-vars directories
//!   list     Show the prompt tree
//!   fields   Show the inputs a prompt asks for
//!   render   Render a prompt (reads a template from stdin without an id)
//!   check    Report malformed placeholders
//!   syntax   Show placeholder syntax

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use skellaprompter::store::{build_tree, format_tree, PromptEntry, Selections, Workspace};
use skellaprompter::{InputHint, Overrides, Template};

#[derive(Parser)]
#[command(name = "skellaprompter")]
#[command(about = "Compose prompts from Markdown templates and reusable variables")]
struct Cli {
    /// Base directory containing prompts, vars, and prompt-vars
    #[arg(short, long, global = true, default_value = ".")]
    base_path: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the workspace directories
    Init,

    /// Show the prompt tree
    List,

    /// Show the inputs a prompt asks for, with their starting values
    Fields {
        /// Prompt id, e.g. `stories/intro`
        prompt: String,
    },

    /// Render a prompt
    Render {
        /// Prompt id; the template is read from stdin when omitted
        prompt: Option<String>,

        /// Choose a global variable value (option title or literal text)
        #[arg(short, long = "global", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        globals: Vec<(String, String)>,

        /// Choose a local variable value (option title or literal text)
        #[arg(short, long = "local", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        locals: Vec<(String, String)>,

        /// Fill every free-text placeholder with this name
        #[arg(short, long = "fill", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        fills: Vec<(String, String)>,

        /// Fill only the placeholder at this position (counted from 0)
        #[arg(long = "fill-at", value_name = "INDEX=VALUE", value_parser = parse_indexed)]
        fills_at: Vec<(usize, String)>,

        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report placeholders that will be kept as plain text
    Check {
        /// Prompt id, e.g. `stories/intro`
        prompt: String,
    },

    /// Show placeholder syntax
    Syntax,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    let workspace = Workspace::open(&cli.base_path)
        .with_context(|| format!("Failed to open workspace {}", cli.base_path.display()))?;
    debug!(root = %workspace.root().display(), "opened workspace");

    match cli.command {
        Command::Init => cmd_init(&workspace),
        Command::List => cmd_list(&workspace),
        Command::Fields { prompt } => cmd_fields(&workspace, &prompt),
        Command::Render {
            prompt,
            globals,
            locals,
            fills,
            fills_at,
            output,
        } => {
            let selections = Selections {
                global: globals.into_iter().collect(),
                local: locals.into_iter().collect(),
            };
            let mut overrides = Overrides::new();
            for (name, value) in fills {
                overrides.insert_name(name, value);
            }
            for (index, value) in fills_at {
                overrides.insert_occurrence(index, value);
            }
            cmd_render(
                &workspace,
                prompt.as_deref(),
                &selections,
                &overrides,
                output,
            )
        }
        Command::Check { prompt } => cmd_check(&workspace, &prompt),
        Command::Syntax => {
            print_syntax();
            Ok(())
        }
    }
}

fn setup_logging(debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();
}

fn cmd_init(workspace: &Workspace) -> Result<()> {
    workspace
        .ensure_directories()
        .context("Failed to create workspace directories")?;
    info!(root = %workspace.root().display(), "workspace ready");
    Ok(())
}

fn cmd_list(workspace: &Workspace) -> Result<()> {
    let prompts = workspace.list_prompts()?;
    if prompts.is_empty() {
        println!("No prompts found in {}", workspace.prompts_dir().display());
        return Ok(());
    }
    print!("{}", format_tree(&build_tree(&prompts)));
    Ok(())
}

fn load(workspace: &Workspace, id: &str) -> Result<(PromptEntry, String)> {
    let prompt = workspace.find_prompt(id)?;
    let source = workspace
        .load_template(&prompt)
        .with_context(|| format!("Failed to read prompt '{id}'"))?;
    Ok((prompt, source))
}

fn cmd_fields(workspace: &Workspace, id: &str) -> Result<()> {
    let (prompt, source) = load(workspace, id)?;
    let template = Template::parse(&source);
    let variables = workspace.variables_for(&template, Some(&prompt))?;
    let catalog = variables.catalog(&Selections::new())?;

    for field in template.fields(&catalog, None) {
        println!(
            "{:<6} {:<24} {:<6} = {:?} ({:?})",
            field.scope.as_str(),
            field.name,
            field.hint.to_string(),
            field.prefill.value,
            field.prefill.provenance
        );
        if field.hint != InputHint::Choice {
            continue;
        }
        let choices = variables.choices(&field);
        if choices.is_empty() {
            println!("       (missing variable file)");
        }
        for choice in choices {
            println!("       - {}: {:?}", choice.title, choice.value());
        }
    }
    Ok(())
}

fn cmd_render(
    workspace: &Workspace,
    id: Option<&str>,
    selections: &Selections,
    overrides: &Overrides,
    output: Option<PathBuf>,
) -> Result<()> {
    let (prompt, source) = match id {
        Some(id) => {
            let (prompt, source) = load(workspace, id)?;
            (Some(prompt), source)
        }
        None => (None, read_stdin()?),
    };

    let template = Template::parse(&source);
    for warning in &template.diagnostics {
        debug!(%warning, "placeholder kept as text");
    }
    let variables = workspace.variables_for(&template, prompt.as_ref())?;
    let catalog = variables.catalog(selections)?;
    let composition = template.compose(&catalog, Some(overrides));

    match output {
        Some(path) => {
            fs::write(&path, &composition.text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(
                path = %path.display(),
                chars = composition.text.chars().count(),
                "wrote prompt"
            );
        }
        None => print!("{}", composition.text),
    }
    Ok(())
}

fn cmd_check(workspace: &Workspace, id: &str) -> Result<()> {
    let (prompt, source) = load(workspace, id)?;
    let template = Template::parse(&source);
    if template.diagnostics.is_empty() {
        println!("{}: no malformed placeholders", prompt.id);
        return Ok(());
    }
    let filename = prompt.path.display().to_string();
    for warning in &template.diagnostics {
        eprint!("{}", warning.format(&source, &filename));
    }
    println!(
        "{}: {} placeholder(s) kept as text",
        prompt.id,
        template.diagnostics.len()
    );
    Ok(())
}

fn read_stdin() -> Result<String> {
    if io::stdin().is_terminal() {
        bail!("No prompt given and nothing piped on stdin");
    }
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read template from stdin")?;
    Ok(buffer)
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{s}'")),
    }
}

fn parse_indexed(s: &str) -> Result<(usize, String), String> {
    let (index, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=VALUE, got '{s}'"))?;
    let index = index
        .trim()
        .parse()
        .map_err(|_| format!("'{index}' is not a placeholder index"))?;
    Ok((index, value.to_string()))
}

fn print_syntax() {
    println!(
        r#"PLACEHOLDER SYNTAX
==================

{{{{name}}}}      Global variable from vars/<name>.yaml
<<name>>      Local variable from prompt-vars/<prompt>/<name>.yaml
[[name]]      Short free text, filled with --fill name=...
[[[name]]]    Long free text, filled with --fill name=...

A default value can follow a pipe, e.g. {{{{Character|John}}}}.
Everything after the first pipe is kept exactly, spaces included.

VARIABLE FILES
--------------
value: current value (optional)
default: fallback when nothing is chosen (optional)
options:
  - title: Hero
    value: A brave knight named Aldric

Pick an option with --global Character=Hero; any other text is used as is.
Unclosed or empty placeholders are left in the prompt as written."#
    );
}
