mod fetch;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use oic_core::config::{self, CONFIG_FILE_NAME, OicConfig};
use oic_core::export::{self, ExportDocument};
use oic_core::parse;
use oic_core::parse::spec::SpecDocument;
use oic_core::transform::{self, CollectionBuilder, CollectionOptions};

#[derive(Parser)]
#[command(
    name = "oic",
    about = "Generate an Insomnia collection from an OpenAPI/Swagger spec",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the collection export
    Generate {
        /// Path to the spec file (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Download the spec from this URL into the input path first
        #[arg(short, long)]
        url: Option<String>,

        /// Path of the export file to write
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Title of the root request group
        #[arg(long)]
        name: Option<String>,
    },

    /// Summarize what a spec would produce
    Inspect {
        /// Path to the spec file
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Initialize a new oic configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            url,
            output,
            name,
        } => cmd_generate(input, url, output, name),

        Commands::Inspect { input, format } => cmd_inspect(input, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "oic", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<OicConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    Ok(config::load_config(&config_path)?)
}

fn load_spec(path: &Path) -> Result<SpecDocument> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str());
    let spec = parse::from_str_with_extension(&content, ext)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(spec)
}

fn cmd_generate(
    input: Option<PathBuf>,
    url: Option<String>,
    output: Option<PathBuf>,
    name: Option<String>,
) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let output = output.unwrap_or_else(|| PathBuf::from(&cfg.output));

    if let Some(url) = url.or(cfg.url.clone()) {
        eprintln!("Downloading {} → {}", url, input.display());
        fetch::download_spec(&url, &input)?;
    }

    let spec = load_spec(&input)?;

    let mut options = CollectionOptions::from(&cfg.collection);
    if let Some(name) = name {
        options.name = name;
    }

    let doc = CollectionBuilder::new(options)
        .build(&spec)
        .with_context(|| format!("failed to build collection from {}", input.display()))?;

    export::write_document(&output, &doc)?;

    eprintln!(
        "Generated {} requests in {} groups → {}",
        doc.requests().count(),
        doc.groups().count().saturating_sub(1),
        output.display()
    );
    Ok(())
}

fn cmd_inspect(input: PathBuf, format: InspectFormat) -> Result<()> {
    let spec = load_spec(&input)?;
    let doc = transform::build_collection(&spec)?;

    let summary = build_inspect_summary(&spec, &doc);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(spec: &SpecDocument, doc: &ExportDocument) -> serde_json::Value {
    let operations: Vec<serde_json::Value> = spec
        .paths
        .iter()
        .flat_map(|(path, item)| {
            item.operations().map(move |(_, method, op)| {
                serde_json::json!({
                    "method": method.as_str(),
                    "path": path,
                    "tags": op.tags,
                })
            })
        })
        .collect();

    let captured = transform::capture_path_variables(spec);
    let environment: Vec<&str> = doc
        .environment()
        .map(|env| env.data.keys().map(String::as_str).collect())
        .unwrap_or_default();

    serde_json::json!({
        "version": spec.version(),
        "title": spec.info.as_ref().map(|i| i.title.as_str()),
        "paths": spec.paths.len(),
        "operations": operations,
        "groups": doc.groups().skip(1).map(|g| g.name.as_str()).collect::<Vec<_>>(),
        "requests": doc.requests().count(),
        "path_variables": captured.iter().collect::<Vec<_>>(),
        "environment": environment,
    })
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
