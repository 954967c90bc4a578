//! API Doc Parser CLI
//!
//! Command-line interface for discovering Hydra-documented APIs.

use anyhow::{anyhow, Context, Result};
use api_doc_parser_common::{Api, Field, ResourceClass};
use api_doc_parser_hydra::{FetchConfig, HydraParser};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "api-doc-parser")]
#[command(version, about = "Parse Hydra API documentation into an API model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover an API from its entrypoint and display its resources
    #[command(after_help = "EXAMPLES:\n  \
        # Summarize an API Platform demo\n  \
        api-doc-parser parse https://demo.api-platform.com\n\n  \
        # Authenticated API, JSON output\n  \
        api-doc-parser parse https://api.example.com \\\n    \
        --header 'Authorization: Bearer <token>' \\\n    \
        --format json --output api.json\n\n  \
        # Request settings from a file\n  \
        api-doc-parser parse https://api.example.com --config fetch.yaml")]
    Parse {
        /// Entrypoint URL of the API
        entrypoint: String,

        /// YAML file with request settings (method, headers, body, timeout)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Extra request header, as "Name: value" (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Output format
        #[arg(short, long, default_value = "summary")]
        format: OutputFormat,

        /// Write the output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human readable listing
    Summary,
    /// JSON document
    Json,
    /// YAML document
    Yaml,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Parse {
            entrypoint,
            config,
            headers,
            timeout,
            format,
            output,
        } => {
            let config = fetch_config(config.as_deref(), &headers, timeout)?;
            parse_command(&entrypoint, config, format, output.as_deref()).await?;
        }
    }

    Ok(())
}

/// Merge the config file with command-line overrides
fn fetch_config(
    path: Option<&Path>,
    headers: &[String],
    timeout: Option<u64>,
) -> Result<FetchConfig> {
    let mut config = match path {
        Some(path) => FetchConfig::load(path).with_context(|| {
            format!("Failed to load request settings from {}", path.display())
        })?,
        None => FetchConfig::default(),
    };

    for header in headers {
        let (name, value) = parse_header(header)?;
        config = config.with_header(name, value);
    }

    if let Some(secs) = timeout {
        config = config.with_timeout(secs);
    }

    Ok(config)
}

fn parse_header(header: &str) -> Result<(&str, &str)> {
    let (name, value) = header
        .split_once(':')
        .ok_or_else(|| anyhow!("Invalid header {:?}, expected \"Name: value\"", header))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("Invalid header {:?}, the name is empty", header));
    }

    Ok((name, value.trim()))
}

async fn parse_command(
    entrypoint: &str,
    config: FetchConfig,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let api = HydraParser::new()
        .with_config(config)
        .parse(entrypoint)
        .await
        .with_context(|| format!("Failed to parse the API documentation of {}", entrypoint))?;

    let rendered = match format {
        OutputFormat::Summary => summary(&api),
        OutputFormat::Json => api.to_json().context("Failed to render JSON")?,
        OutputFormat::Yaml => api.to_yaml().context("Failed to render YAML")?,
    };

    match output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("{} Wrote {}", "✓".green(), path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

fn summary(api: &Api) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", api.title.bold()));
    out.push_str(&format!("  Entrypoint: {}\n", api.entrypoint));
    out.push_str(&format!("  Resources: {}\n", api.resources.len()));

    for resource in &api.resources {
        out.push_str(&format!(
            "\n  • {} ({})\n",
            resource.name.cyan(),
            resource.id
        ));
        out.push_str(&format!(
            "    Class: {} <{}>\n",
            resource.class.title.yellow(),
            resource.class.id
        ));

        for field in api.fields_of(&resource.class) {
            out.push_str(&format!("    - {}\n", field_line(api, &resource.class, field)));
        }
    }

    out
}

fn field_line(api: &Api, class: &ResourceClass, field: &Field) -> String {
    let readable = api.readable_fields_of(class).any(|f| std::ptr::eq(f, field));
    let writable = api.writable_fields_of(class).any(|f| std::ptr::eq(f, field));

    let flags = format!(
        "{}{}{}",
        if field.required { "!" } else { "-" },
        if readable { "r" } else { "-" },
        if writable { "w" } else { "-" },
    );

    let mut line = format!("{} [{}]", field.name, flags.dimmed());
    if let Some(range) = &field.range {
        line.push_str(&format!(" {}", range.dimmed()));
    }
    if let Some(target) = api.referenced_resource(field) {
        line.push_str(&format!(" → {}", target.name.cyan()));
    }

    line
}
