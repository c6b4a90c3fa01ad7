// src/config.rs
use crate::api::client::API_BASE_URL;
use crate::constants::{
    DEFAULT_RATING, DEFAULT_READ_CONCURRENCY, DEFAULT_READ_LIMIT, MAX_READ_CONCURRENCY,
    RATE_LIMIT_MAX_RETRIES, REQUEST_TIMEOUT, SERVER_ERROR_MAX_RETRIES,
};
use crate::error::AppError;
use crate::error_recovery::RetryPolicy;
use crate::types::{ApiKey, DatabaseId, PropertyName, ValidatedUrl, ValidationError};
use clap::{Args, Parser, Subcommand};
use std::time::Duration;

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    #[command(flatten)]
    pub store: StoreSettings,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Save a journal entry
    Save {
        /// Entry text; line breaks become separate paragraphs
        text: String,

        /// Explicit title (derived from the first sentence otherwise)
        #[arg(long)]
        title: Option<String>,

        /// Rating for the day (defaults to the configured neutral rating)
        #[arg(long)]
        rating: Option<f64>,

        /// Entry date as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Print recent entries as JSON
    Read {
        /// Maximum number of entries
        #[arg(long, default_value_t = DEFAULT_READ_LIMIT)]
        limit: usize,

        /// Sort key: title, date, rating, created_time, last_edited_time or a property name
        #[arg(long)]
        sort: Option<String>,
    },

    /// Serve the save/read endpoints over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:3000")]
        bind: String,
    },
}

/// Store and engine settings shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct StoreSettings {
    /// Notion database ID or URL holding the journal
    #[arg(long, global = true, env = "NOTION_DATABASE_ID")]
    pub database_id: Option<String>,

    /// Name of the title property in the journal database
    #[arg(long, global = true, env = "JOURNAL_TITLE_PROPERTY", default_value = "Titel")]
    pub title_property: String,

    /// Name of the date property in the journal database
    #[arg(long, global = true, env = "JOURNAL_DATE_PROPERTY", default_value = "Datum")]
    pub date_property: String,

    /// Name of the rating property in the journal database
    #[arg(long, global = true, env = "JOURNAL_RATING_PROPERTY", default_value = "Bewertung")]
    pub rating_property: String,

    /// Rating stored when a save request gives none
    #[arg(long, global = true, env = "JOURNAL_DEFAULT_RATING", default_value_t = DEFAULT_RATING)]
    pub default_rating: f64,

    /// Default sort key for reads
    #[arg(long, global = true, env = "JOURNAL_SORT", default_value = "date")]
    pub default_sort: String,

    /// Concurrent block fetches during a read
    #[arg(long, global = true, env = "JOURNAL_READ_CONCURRENCY", default_value_t = DEFAULT_READ_CONCURRENCY)]
    pub concurrency: usize,

    /// Overall deadline for a read in seconds (no deadline when unset)
    #[arg(long, global = true, env = "JOURNAL_READ_DEADLINE_SECS")]
    pub deadline_secs: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, env = "JOURNAL_REQUEST_TIMEOUT_SECS", default_value_t = REQUEST_TIMEOUT.as_secs())]
    pub request_timeout_secs: u64,

    /// Rate-limit retries per page fetch
    #[arg(long, global = true, env = "JOURNAL_RATE_LIMIT_RETRIES", default_value_t = RATE_LIMIT_MAX_RETRIES)]
    pub rate_limit_retries: u32,

    /// Server-error retries per page fetch
    #[arg(long, global = true, env = "JOURNAL_SERVER_RETRIES", default_value_t = SERVER_ERROR_MAX_RETRIES)]
    pub server_retries: u32,

    /// Notion API base URL
    #[arg(long, global = true, env = "NOTION_API_BASE_URL", default_value = API_BASE_URL)]
    pub api_base_url: String,
}

/// Maps the journal's logical fields to the database's property names.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyNames {
    pub title: PropertyName,
    pub date: PropertyName,
    pub rating: PropertyName,
}

impl PropertyNames {
    pub fn new(
        title: impl Into<String>,
        date: impl Into<String>,
        rating: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let names = Self {
            title: PropertyName::new("title", title)?,
            date: PropertyName::new("date", date)?,
            rating: PropertyName::new("rating", rating)?,
        };

        // Each field is written as its own property, so names must differ.
        let fields = names.fields();
        for (i, (first, name)) in fields.iter().enumerate() {
            if let Some((second, _)) = fields[i + 1..].iter().find(|(_, other)| other == name) {
                return Err(ValidationError::DuplicatePropertyName {
                    name: name.as_str().to_string(),
                    first: *first,
                    second: *second,
                });
            }
        }
        Ok(names)
    }

    fn fields(&self) -> [(&'static str, &PropertyName); 3] {
        [
            ("title", &self.title),
            ("date", &self.date),
            ("rating", &self.rating),
        ]
    }

    /// Resolves a logical field name (`title`, `date`, `rating`) to its
    /// property name.
    pub fn resolve_field(&self, field: &str) -> Option<&PropertyName> {
        match field {
            "title" => Some(&self.title),
            "date" => Some(&self.date),
            "rating" => Some(&self.rating),
            _ => None,
        }
    }
}

/// Resolved configuration. Validated once at startup, then passed by
/// reference into every component and never mutated.
#[derive(Debug, Clone)]
pub struct JournalConfig {
    pub api_key: ApiKey,
    pub database_id: DatabaseId,
    pub property_names: PropertyNames,
    pub default_rating: f64,
    pub default_sort: String,
    pub read_concurrency: usize,
    pub read_deadline: Option<Duration>,
    pub request_timeout: Duration,
    pub api_base_url: ValidatedUrl,
    pub retry: RetryPolicy,
}

impl JournalConfig {
    /// A configuration with every knob at its default.
    pub fn new(
        api_key: ApiKey,
        database_id: DatabaseId,
        property_names: PropertyNames,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            api_key,
            database_id,
            property_names,
            default_rating: DEFAULT_RATING,
            default_sort: "date".to_string(),
            read_concurrency: DEFAULT_READ_CONCURRENCY,
            read_deadline: None,
            request_timeout: REQUEST_TIMEOUT,
            api_base_url: ValidatedUrl::parse(API_BASE_URL)?,
            retry: RetryPolicy::default(),
        })
    }

    /// Resolves a complete configuration from CLI settings and environment.
    pub fn resolve(settings: &StoreSettings) -> Result<Self, AppError> {
        let api_key_str = std::env::var("NOTION_API_KEY").map_err(|_| {
            AppError::MissingConfiguration(
                "NOTION_API_KEY environment variable not set".to_string(),
            )
        })?;
        let api_key = ApiKey::new(api_key_str)?;

        let database_input = settings.database_id.as_deref().ok_or_else(|| {
            AppError::MissingConfiguration(
                "NOTION_DATABASE_ID environment variable or --database-id not set".to_string(),
            )
        })?;
        let database_id = DatabaseId::parse(database_input)?;

        let property_names = PropertyNames::new(
            settings.title_property.clone(),
            settings.date_property.clone(),
            settings.rating_property.clone(),
        )?;

        if !settings.default_rating.is_finite() {
            return Err(ValidationError::InvalidRating(settings.default_rating).into());
        }
        let read_concurrency = validate_concurrency(settings.concurrency)?;

        let retry = RetryPolicy {
            max_rate_limit_retries: settings.rate_limit_retries,
            max_server_retries: settings.server_retries,
            ..RetryPolicy::default()
        };

        Ok(Self {
            api_key,
            database_id,
            property_names,
            default_rating: settings.default_rating,
            default_sort: settings.default_sort.clone(),
            read_concurrency,
            read_deadline: settings.deadline_secs.map(Duration::from_secs),
            request_timeout: Duration::from_secs(settings.request_timeout_secs.max(1)),
            api_base_url: ValidatedUrl::parse(&settings.api_base_url)?,
            retry,
        })
    }
}

/// Checks a read concurrency value against `1..=MAX_READ_CONCURRENCY`.
pub fn validate_concurrency(concurrency: usize) -> Result<usize, ValidationError> {
    if (1..=MAX_READ_CONCURRENCY).contains(&concurrency) {
        Ok(concurrency)
    } else {
        Err(ValidationError::OutOfBounds {
            field: "concurrency",
            value: concurrency,
            min: 1,
            max: MAX_READ_CONCURRENCY,
        })
    }
}
