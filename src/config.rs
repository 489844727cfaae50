// src/config.rs
use crate::api::TraversalBudget;
use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_DB_PAGE_SIZE, DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES,
    DEFAULT_NOTION_VERSION, NOTION_MAX_QUERY_PAGE_SIZE,
};
use crate::error::AppError;
use crate::types::{AccessSecret, ApiKey, ValidationError};
use clap::Parser;
use url::Url;

/// Command-line flags, each backed by an environment variable.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct ServerArgs {
    /// Address the HTTP server binds to
    #[arg(long, env = "ANALYZER_BIND", default_value = "127.0.0.1:8787")]
    pub bind: String,

    /// Secret callers must present as `Authorization: Bearer <secret>`
    #[arg(long, env = "ANALYZER_API_KEY", hide_env_values = true)]
    pub api_secret: Option<String>,

    /// Notion integration token used for every upstream call
    #[arg(long, env = "NOTION_API_KEY", hide_env_values = true)]
    pub notion_api_key: Option<String>,

    /// Value of the `Notion-Version` header
    #[arg(long, env = "NOTION_VERSION", default_value = DEFAULT_NOTION_VERSION)]
    pub notion_version: String,

    /// Base URL of the Notion API
    #[arg(long, env = "NOTION_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    pub notion_base_url: String,

    /// Maximum number of content nodes fetched per page target
    #[arg(long, env = "NOTION_MAX_NODES", default_value_t = DEFAULT_MAX_NODES)]
    pub max_nodes: usize,

    /// Maximum depth of nested blocks (0 = direct children only)
    #[arg(long, env = "NOTION_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Page size for database queries (1..=100)
    #[arg(long, env = "NOTION_DB_PAGE_SIZE", default_value_t = DEFAULT_DB_PAGE_SIZE)]
    pub db_page_size: usize,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Settings for talking to the content store.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub api_key: ApiKey,
    pub notion_version: String,
    pub base_url: Url,
}

/// Resolved service configuration — validated once at startup, immutable afterwards.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind: String,
    /// `None` means the server was started without a secret; `/analyze` then fails closed.
    pub access_secret: Option<AccessSecret>,
    pub upstream: UpstreamConfig,
    pub budget: TraversalBudget,
    pub db_page_size: usize,
}

impl ServiceConfig {
    /// Resolves a complete service configuration from flags and environment.
    pub fn resolve(args: ServerArgs) -> Result<Self, AppError> {
        let api_key_str = args.notion_api_key.ok_or_else(|| {
            AppError::MissingConfiguration(
                "NOTION_API_KEY environment variable not set".to_string(),
            )
        })?;
        let api_key = ApiKey::new(api_key_str)?;

        let base_url = Url::parse(&args.notion_base_url).map_err(|e| {
            ValidationError::InvalidUrl {
                url: args.notion_base_url.clone(),
                reason: e.to_string(),
            }
        })?;

        let notion_version = args.notion_version.trim().to_string();
        if notion_version.is_empty() {
            return Err(ValidationError::EmptyField("notion_version").into());
        }

        let budget = TraversalBudget::new(args.max_depth, args.max_nodes)?;

        if !(1..=NOTION_MAX_QUERY_PAGE_SIZE).contains(&args.db_page_size) {
            return Err(ValidationError::OutOfBounds {
                field: "db_page_size",
                value: args.db_page_size,
                min: 1,
                max: NOTION_MAX_QUERY_PAGE_SIZE,
            }
            .into());
        }

        let access_secret = AccessSecret::parse(args.api_secret.as_deref());
        if access_secret.is_none() {
            log::warn!("ANALYZER_API_KEY is not set — every /analyze request will be refused");
        }

        Ok(ServiceConfig {
            bind: args.bind,
            access_secret,
            upstream: UpstreamConfig {
                api_key,
                notion_version,
                base_url,
            },
            budget,
            db_page_size: args.db_page_size,
        })
    }
}
