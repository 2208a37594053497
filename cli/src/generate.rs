#![deny(missing_docs)]

//! # Generate Command
//!
//! Pipeline: host config file -> per-entity fragments -> OpenAPI document.
//!
//! 1. **Load**: reads collections and globals from a JSON or YAML file.
//! 2. **Generate**: builds paths and components per entity with the built-in
//!    schema builder, converter and access resolver.
//! 3. **Write**: serializes the merged document as JSON or YAML.

use crate::error::{CliError, CliResult};
use cms_openapi_core::{generate_document, DocumentInfo, HostConfig, RouteOptions, SecurityPolicy};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Output serialization.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty printed JSON.
    Json,
    /// YAML.
    Yaml,
}

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Host configuration listing collections and globals (.json, .yaml or .yml).
    #[clap(long, env = "CMS_OPENAPI_CONFIG", default_value = "cms.config.json")]
    pub config: PathBuf,

    /// Output file. Prints to stdout when omitted.
    #[clap(long, env = "CMS_OPENAPI_OUT")]
    pub out: Option<PathBuf>,

    /// API title.
    #[clap(long, env = "CMS_OPENAPI_TITLE", default_value = "CMS API")]
    pub title: String,

    /// API version.
    #[clap(long, env = "CMS_OPENAPI_API_VERSION", default_value = "1.0.0")]
    pub api_version: String,

    /// Optional API description.
    #[clap(long)]
    pub description: Option<String>,

    /// Security scheme referenced by protected operations.
    #[clap(long, env = "CMS_OPENAPI_SECURITY_SCHEME", default_value = "bearerAuth")]
    pub security_scheme: String,

    /// Scopes required by protected operations.
    #[clap(long = "scope")]
    pub scopes: Vec<String>,

    /// Output format.
    #[clap(long, value_enum, default_value = "json")]
    pub format: OutputFormat,
}

/// Loads a host configuration, picking the parser from the file extension.
pub fn load_config(path: &Path) -> CliResult<HostConfig> {
    let raw = fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);
    let config = match extension.as_deref() {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&raw)?,
        Some("json") | None => serde_json::from_str(&raw)?,
        Some(other) => {
            return Err(CliError::General(format!(
                "unsupported config extension `{}` for {:?}",
                other, path
            )))
        }
    };
    Ok(config)
}

/// Serializes the document in the requested format.
pub fn render(doc: &Value, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(doc)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(doc)?),
    }
}

/// Executes the generate pipeline.
pub async fn execute(args: &GenerateArgs) -> CliResult<()> {
    tracing::info!(config = ?args.config, "loading host configuration");
    let config = load_config(&args.config)?;

    let options = RouteOptions::new(SecurityPolicy {
        scheme: args.security_scheme.clone(),
        scopes: args.scopes.clone(),
    });
    let mut info = DocumentInfo::new(&args.title, &args.api_version);
    if let Some(desc) = &args.description {
        info = info.with_description(desc);
    }

    let doc = generate_document(&config, &options, &info).await?;
    let rendered = render(&doc, args.format)?;

    match &args.out {
        Some(path) => {
            fs::write(path, rendered)?;
            tracing::info!(out = ?path, "wrote OpenAPI document");
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
