//! rdfwriter CLI: convert RDF files into tree-form RDF/XML

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use rdfwriter::rdf::{LoadedGraph, NamespaceMap, RDF_TYPE};
use rdfwriter::{root_nodes, RdfFormat, RdfLoader, RdfXmlSerializer, WriterConfig};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rdfwriter", version, about = "Tree-form RDF/XML writer")]
struct Cli {
    /// Log pipeline stages
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum InputFormat {
    Turtle,
    Ntriples,
    Rdfxml,
}

impl From<InputFormat> for RdfFormat {
    fn from(format: InputFormat) -> Self {
        match format {
            InputFormat::Turtle => RdfFormat::Turtle,
            InputFormat::Ntriples => RdfFormat::NTriples,
            InputFormat::Rdfxml => RdfFormat::RdfXml,
        }
    }
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(clap::Args)]
struct InputArgs {
    /// Input file
    input: PathBuf,

    /// Input format (guessed from the extension when omitted)
    #[arg(long)]
    format: Option<InputFormat>,

    /// Base IRI for relative references
    #[arg(long)]
    base: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the input as tree-form RDF/XML
    Convert {
        #[command(flatten)]
        input: InputArgs,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Indent string, overrides the configuration file
        #[arg(long)]
        indent: Option<String>,

        /// YAML writer configuration
        #[arg(long)]
        config: Option<PathBuf>,

        /// Extra namespace declaration, `prefix=uri`
        #[arg(long = "prefix", value_name = "PREFIX=URI")]
        prefixes: Vec<String>,
    },
    /// List the nodes that become top-level elements
    Roots {
        #[command(flatten)]
        input: InputArgs,

        /// Output format
        #[arg(long, default_value = "table")]
        output_format: OutputFormat,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            indent,
            config,
            prefixes,
        } => run_convert(&input, output.as_deref(), indent, config.as_deref(), &prefixes),
        Commands::Roots {
            input,
            output_format,
        } => run_roots(&input, &output_format),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn load(args: &InputArgs) -> Result<LoadedGraph> {
    let format = match args.format {
        Some(format) => format.into(),
        None => match RdfFormat::from_path(&args.input) {
            Some(format) => format,
            None => bail!(
                "cannot guess the format of {}, pass --format",
                args.input.display()
            ),
        },
    };
    RdfLoader::parse_file(&args.input, format, args.base.as_deref())
        .with_context(|| format!("failed to load {}", args.input.display()))
}

fn parse_prefixes(prefixes: &[String]) -> Result<NamespaceMap> {
    let mut map = NamespaceMap::new();
    for entry in prefixes {
        match entry.split_once('=') {
            Some((prefix, uri)) if !prefix.is_empty() && !uri.is_empty() => {
                map.add_prefix(prefix, uri)
            }
            _ => bail!("invalid --prefix {:?}, expected PREFIX=URI", entry),
        }
    }
    Ok(map)
}

fn run_convert(
    input: &InputArgs,
    output: Option<&Path>,
    indent: Option<String>,
    config: Option<&Path>,
    prefixes: &[String],
) -> Result<()> {
    let mut config = match config {
        Some(path) => WriterConfig::load(path)
            .with_context(|| format!("failed to read configuration {}", path.display()))?,
        None => WriterConfig::default(),
    };
    if let Some(indent) = indent {
        config.indent = indent;
    }
    config.prefixes.extend(&parse_prefixes(prefixes)?);

    let loaded = load(input)?;
    debug!("{} namespaces declared", loaded.namespaces.len() + config.prefixes.len());
    let serializer = RdfXmlSerializer::new(config);

    match output {
        Some(path) => serializer
            .write_to_file(&loaded.triples, &loaded.namespaces, path)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let document = serializer.serialize(&loaded.triples, &loaded.namespaces)?;
            println!("{}", document);
        }
    }
    Ok(())
}

fn run_roots(input: &InputArgs, format: &OutputFormat) -> Result<()> {
    let loaded = load(input)?;
    let triples = &loaded.triples;

    let rows: Vec<(String, String)> = root_nodes(triples)
        .into_iter()
        .map(|id| {
            let node = triples.node(id);
            let node_type = triples
                .triples()
                .iter()
                .filter(|t| t.subject == id && triples.node(t.predicate).value == RDF_TYPE)
                .map(|t| {
                    let iri = &triples.node(t.object).value;
                    loaded.namespaces.compact(iri).unwrap_or_else(|| iri.clone())
                })
                .collect::<Vec<_>>()
                .join(", ");
            (node.to_string(), node_type)
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let json: Vec<serde_json::Value> = rows
                .iter()
                .map(|(node, node_type)| serde_json::json!({ "node": node, "type": node_type }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("(no roots)");
                return Ok(());
            }
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Root", "Type"]);
            for (node, node_type) in &rows {
                table.add_row(vec![node.as_str(), node_type.as_str()]);
            }
            println!("{}", table);
            println!("{} root(s)", rows.len());
        }
    }
    Ok(())
}
