use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zxml::{Config, Document, Node};

#[derive(Debug, Parser)]
#[command(name = "zxml", version, about = "Format and query markup documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Maximum node nesting depth (0 means unlimited)
    #[arg(long, global = true, default_value_t = 128)]
    max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    #[arg(long, global = true, default_value_t = 10 * 1024 * 1024)]
    max_size: usize,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a document and write it back out indented
    Fmt {
        /// Input file (defaults to stdin)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
    /// Print every node matching a tag name or an attribute
    Find {
        /// Input file (defaults to stdin)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
        /// Tag name to look for
        #[arg(long, conflicts_with = "attr", required_unless_present = "attr")]
        name: Option<String>,
        /// Attribute to look for, as KEY=VALUE
        #[arg(long, value_parser = parse_attr)]
        attr: Option<(String, String)>,
        /// Only look at the root's direct children
        #[arg(long)]
        shallow: bool,
    },
    /// Print the root's child group names and their sizes
    Stats {
        /// Input file (defaults to stdin)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::new(cli.max_depth, cli.max_size);

    match cli.command {
        Command::Fmt { input, output } => {
            let doc = load(&input, config)?;
            write_output(&output, doc.to_string().as_bytes())
        }
        Command::Find {
            input,
            name,
            attr,
            shallow,
        } => {
            let doc = load(&input, config)?;
            let root = doc.root();
            let found = match (name, attr) {
                (Some(name), _) => root.find_by_name(&name, !shallow),
                (None, Some((key, value))) => root.find_by_attribute(&key, &value, !shallow),
                (None, None) => bail!("pass --name or --attr"),
            };
            if found.is_empty() {
                bail!("no matching nodes");
            }
            let text: String = found.iter().map(|node| node.to_string()).collect();
            write_output(&None, text.as_bytes())
        }
        Command::Stats { input } => {
            let doc = load(&input, config)?;
            write_output(&None, stats(doc.root()).as_bytes())
        }
    }
}

fn load(path: &Option<PathBuf>, config: Config) -> Result<Document> {
    debug!(?path, ?config, "loading document");
    match path {
        Some(path) => Document::load_from_file_with_config(path, config)
            .with_context(|| format!("failed to load {}", path.display())),
        None => Document::load_from_reader_with_config(io::stdin().lock(), config)
            .context("failed to parse stdin"),
    }
}

fn stats(root: &Node) -> String {
    let mut text = format!("root: {}\n", root.name());
    for (name, count) in root.names_and_counts() {
        text.push_str(&format!("{name}: {count}\n"));
    }
    text
}

fn write_output(path: &Option<PathBuf>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(data).context("failed to write stdout")?;
            Ok(())
        }
    }
}

fn parse_attr(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_owned(), value.to_owned())),
        _ => Err(format!("expected KEY=VALUE, got `{arg}`")),
    }
}
