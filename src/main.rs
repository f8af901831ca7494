//! recipe-dag CLI - order, check and render recipe graphs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use recipe_dag::{
    build_validated, render_dot, Dag, FixSuggestion, NodeKind, Recipe, RecipeDagConfig,
    RecipeError,
};

#[derive(Parser)]
#[command(name = "recipe-dag")]
#[command(about = "Turn recipe YAML into a DAG of atomic actions and a valid execution order")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/recipe-dag/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log more (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one valid execution order
    Order {
        /// Path to recipe YAML
        file: PathBuf,

        /// Emit JSON instead of numbered lines
        #[arg(long)]
        json: bool,
    },

    /// Validate a recipe (references and cycles)
    Check {
        /// Path to recipe YAML
        file: PathBuf,
    },

    /// Render the graph as Graphviz DOT
    Dot {
        /// Path to recipe YAML
        file: PathBuf,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also draw start -> ingredient edges
        #[arg(long)]
        all_edges: bool,
    },
}

#[derive(Serialize)]
struct OrderEntry<'a> {
    position: usize,
    id: &'a str,
    label: &'a str,
    kind: NodeKind,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        if let Some(suggestion) = e
            .downcast_ref::<RecipeError>()
            .and_then(FixSuggestion::fix_suggestion)
        {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Order { file, json } => order(&file, json),
        Commands::Check { file } => check(&file),
        Commands::Dot {
            file,
            output,
            all_edges,
        } => {
            let config = load_config(cli.config.as_deref())?;
            dot(&file, output.as_deref(), all_edges, config)
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<RecipeDagConfig> {
    let config = match path {
        Some(path) => RecipeDagConfig::load_from(path)?,
        None => RecipeDagConfig::load()?,
    };
    Ok(config.with_env()?)
}

fn load_dag(file: &Path) -> anyhow::Result<Dag> {
    let recipe = Recipe::from_path(file)
        .with_context(|| format!("failed to load recipe {}", file.display()))?;
    Ok(build_validated(&recipe)?)
}

fn order(file: &Path, json: bool) -> anyhow::Result<()> {
    let dag = load_dag(file)?;
    let order = dag.topological_sort()?;

    if json {
        let entries: Vec<OrderEntry<'_>> = order
            .iter()
            .enumerate()
            .map(|(idx, node)| OrderEntry {
                position: idx + 1,
                id: node.id(),
                label: node.label(),
                kind: node.kind(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for (idx, node) in order.iter().enumerate() {
        println!("{} {}", idx + 1, node);
    }
    Ok(())
}

fn check(file: &Path) -> anyhow::Result<()> {
    let dag = load_dag(file)?;
    dag.detect_cycles()?;

    let count = |kind: NodeKind| dag.nodes().filter(|n| n.kind() == kind).count();
    println!("{} Recipe '{}' is valid", "✓".green(), file.display());
    println!("  Ingredients: {}", count(NodeKind::Ingredient));
    println!("  Substeps: {}", count(NodeKind::Step));
    println!("  Edges: {}", dag.edge_count());
    Ok(())
}

fn dot(
    file: &Path,
    output: Option<&Path>,
    all_edges: bool,
    mut config: RecipeDagConfig,
) -> anyhow::Result<()> {
    if all_edges {
        config.render.draw_trivial_edges = true;
    }

    let dag = load_dag(file)?;
    let dot = render_dot(&dag, &config.render)?;

    match output {
        Some(path) => {
            fs::write(path, dot).with_context(|| format!("failed to write {}", path.display()))?;
            println!("{} Wrote {}", "✓".green(), path.display());
        }
        None => print!("{dot}"),
    }
    Ok(())
}
