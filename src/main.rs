//! kgwalk CLI: walk generation for knowledge-graph embeddings.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use kgwalk::config::WalkConfig;
use kgwalk::graph::source::GraphSource;
use kgwalk::manager::{RunSummary, WalkGenerationManager};
use kgwalk::scope::EntityList;
use kgwalk::walk::{IndexWalker, WalkMode};

#[derive(Parser)]
#[command(name = "kgwalk", version, about = "Generate graph walks for knowledge-graph embeddings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate walks from an RDF graph into a gzip file.
    Generate {
        /// RDF file or directory of RDF files.
        #[arg(long)]
        graph: PathBuf,

        /// Output file, or a directory to create `walk_file.gz` in.
        #[arg(long)]
        output: PathBuf,

        /// Light mode: only generate walks for the entities listed in this file.
        #[arg(long)]
        light: Option<PathBuf>,

        /// TOML walk configuration; flags below override its fields.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Walk generation mode, e.g. RANDOM_WALKS_DUPLICATE_FREE or MID_WALKS.
        #[arg(long)]
        mode: Option<String>,

        /// Maximum hops per walk.
        #[arg(long)]
        depth: Option<usize>,

        /// Walks per entity.
        #[arg(long)]
        walks: Option<usize>,

        /// Worker threads (default: half the available cores).
        #[arg(long)]
        threads: Option<usize>,

        /// Also emit walks over literal text.
        #[arg(long)]
        embed_text: bool,

        /// Sliding window size for literal text walks.
        #[arg(long)]
        text_window: Option<usize>,

        /// Seed for reproducible walks.
        #[arg(long)]
        seed: Option<u64>,

        /// Keep full identifiers instead of `prefix:local` tokens.
        #[arg(long)]
        no_shorten: bool,

        /// Print the run summary as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Load a graph and print its size.
    Stats {
        /// RDF file or directory of RDF files.
        #[arg(long)]
        graph: PathBuf,

        /// TOML walk configuration (prefixes, duplicate policy).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct GraphStats {
    files: usize,
    nodes: usize,
    edges: usize,
    literals: usize,
}

fn load_config(path: Option<&PathBuf>) -> Result<WalkConfig> {
    Ok(match path {
        Some(path) => WalkConfig::load(path)?,
        None => WalkConfig::default(),
    })
}

fn print_summary(summary: &RunSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary).into_diagnostic()?);
        return Ok(());
    }
    println!("Mode:            {}", summary.mode);
    println!("Entities:        {}", summary.entities);
    println!("  with walks:    {}", summary.entities_with_walks);
    println!("  not in graph:  {}", summary.skipped_not_in_graph);
    println!("  no walks:      {}", summary.skipped_no_walks);
    println!("Walks written:   {}", summary.walks_written);
    println!("Output:          {}", summary.output.display());
    println!("Elapsed:         {} ms", summary.elapsed_ms);
    Ok(())
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            graph,
            output,
            light,
            config,
            mode,
            depth,
            walks,
            threads,
            embed_text,
            text_window,
            seed,
            no_shorten,
            json,
        } => {
            let mut config = load_config(config.as_ref())?;
            if let Some(mode) = mode {
                config.mode = Some(mode.parse::<WalkMode>()?);
            }
            if let Some(depth) = depth {
                config.depth = depth;
            }
            if let Some(walks) = walks {
                config.walks_per_entity = walks;
            }
            if threads.is_some() {
                config.threads = threads;
            }
            if embed_text {
                config.embed_text = true;
            }
            if text_window.is_some() {
                config.text_window = text_window;
            }
            if seed.is_some() {
                config.seed = seed;
            }
            if no_shorten {
                config.shorten_uris = false;
            }

            let source = GraphSource::open(&graph)?;
            let summary = match light {
                Some(entity_file) => {
                    let entities = EntityList::read(&entity_file, &config.shortener())?;
                    let mut manager =
                        WalkGenerationManager::new_light(config, Box::new(IndexWalker))?;
                    let report = manager.load_scoped(&source, &entities)?;
                    if !report.missing.is_empty() {
                        eprintln!(
                            "{} of {} requested entities not found in the graph",
                            report.missing.len(),
                            report.requested
                        );
                    }
                    manager.generate(None, &output)?
                }
                None => {
                    let mut manager = WalkGenerationManager::new(config, Box::new(IndexWalker))?;
                    manager.load_index(&source)?;
                    manager.generate(None, &output)?
                }
            };
            print_summary(&summary, json)?;
        }

        Commands::Stats {
            graph,
            config,
            json,
        } => {
            let config = load_config(config.as_ref())?;
            let source = GraphSource::open(&graph)?;
            let index = source.load(&config.load_options())?;
            let stats = GraphStats {
                files: source.file_count(),
                nodes: index.node_count(),
                edges: index.edge_count(),
                literals: index.literal_count(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&stats).into_diagnostic()?);
            } else {
                println!("Files:    {}", stats.files);
                println!("Nodes:    {}", stats.nodes);
                println!("Edges:    {}", stats.edges);
                println!("Literals: {}", stats.literals);
            }
        }
    }

    Ok(())
}
