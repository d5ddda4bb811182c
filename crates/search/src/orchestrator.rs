//! Query orchestration
//!
//! Resolves request arguments into scope predicates, folds the field
//! filters, queries one index session and windows the matches.

use crate::filter::{decode_filters, RawFieldFilter};
use crate::index::IndexProvider;
use crate::pagination::{ConnectionArgs, PagedResult, PaginationWindow};
use crate::predicate::{self, Predicate};
use crate::record::SearchRecord;
use crate::resolvers::{resolve_language, IdentifierResolver, LanguageResolver};
use itemsearch_common::config::SearchConfig;
use itemsearch_common::errors::{AppError, Result};
use itemsearch_common::metrics;
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Arguments of one search call
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchArguments {
    /// ID or path of an item to search under (results will be descendants)
    #[serde(default)]
    pub root_item: Option<String>,

    /// Item language to request (defaults to the context language)
    #[serde(default)]
    pub language: Option<String>,

    /// Only latest versions
    #[serde(default = "default_latest_version", deserialize_with = "null_as_latest_version")]
    pub latest_version: bool,

    /// Index to query (defaults to the standard index for the database)
    #[serde(default)]
    pub index: Option<String>,

    /// Field filters; multiple fields are ANDed
    #[serde(default, deserialize_with = "null_as_empty")]
    pub fields_equal: Vec<RawFieldFilter>,

    #[serde(flatten)]
    pub connection: ConnectionArgs,
}

fn default_latest_version() -> bool { true }

// An explicit `null` argument behaves like an absent one.
fn null_as_latest_version<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_else(default_latest_version))
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Default for SearchArguments {
    fn default() -> Self {
        Self {
            root_item: None,
            language: None,
            latest_version: default_latest_version(),
            index: None,
            fields_equal: Vec::new(),
            connection: ConnectionArgs::default(),
        }
    }
}

/// Ambient request state
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Current language of the caller's context
    pub current_language: Option<String>,
}

/// Settings the orchestrator needs from configuration
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub default_index: String,
    pub max_page_size: Option<usize>,
}

impl From<&SearchConfig> for OrchestratorSettings {
    fn from(config: &SearchConfig) -> Self {
        Self {
            default_index: config.default_index_name(),
            max_page_size: config.page_size_cap(),
        }
    }
}

pub struct QueryOrchestrator {
    indexes: Arc<dyn IndexProvider>,
    items: Arc<dyn IdentifierResolver>,
    languages: Arc<dyn LanguageResolver>,
    settings: OrchestratorSettings,
}

impl QueryOrchestrator {
    pub fn new(
        indexes: Arc<dyn IndexProvider>,
        items: Arc<dyn IdentifierResolver>,
        languages: Arc<dyn LanguageResolver>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            indexes,
            items,
            languages,
            settings,
        }
    }

    /// Index the call targets
    pub fn index_name(&self, args: &SearchArguments) -> String {
        args.index
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.settings.default_index.clone())
    }

    /// Root, language and version constraints, ANDed
    pub fn scope_predicate(&self, args: &SearchArguments, ctx: &RequestContext) -> Predicate {
        let mut scope = Predicate::True;

        if let Some(root) = args.root_item.as_deref().filter(|r| !r.trim().is_empty()) {
            match self.items.try_resolve(root) {
                Some(id) => scope = scope.and(Predicate::AncestorIs(id)),
                None => debug!(root_item = %root, "Root item not found, searching without scope"),
            }
        }

        let language = resolve_language(
            self.languages.as_ref(),
            args.language.as_deref(),
            ctx.current_language.as_deref(),
        );
        if let Some(language) = language {
            scope = scope.and(Predicate::LanguageIs(language.name().to_string()));
        }

        if args.latest_version {
            scope = scope.and(Predicate::LatestVersion);
        }

        scope
    }

    /// Run one search call
    pub async fn resolve(
        &self,
        args: &SearchArguments,
        ctx: &RequestContext,
    ) -> Result<PagedResult<SearchRecord>> {
        let start = Instant::now();

        let window: PaginationWindow = args
            .connection
            .window(self.settings.max_page_size)
            .map_err(reject)?;
        let scope = self.scope_predicate(args, ctx);
        let index_name = self.index_name(args);

        let session = self.indexes.open_session(&index_name).await?;

        let filters = decode_filters(&args.fields_equal).map_err(reject)?;
        let predicate = scope.and(predicate::build(&filters));
        debug!(index = %index_name, predicate = %predicate, "Submitting search");

        let matches = session.query(&predicate).await?;
        drop(session);

        let page = window.apply(matches);

        let elapsed = start.elapsed();
        metrics::record_search(elapsed.as_secs_f64(), &index_name, page.items.len());
        info!(
            index = %index_name,
            filters = filters.len(),
            total = page.total_count,
            returned = page.items.len(),
            offset = page.offset,
            latency_ms = elapsed.as_millis() as u64,
            "Search completed"
        );

        Ok(page)
    }
}

/// Count a call refused before it reached the index
fn reject(err: AppError) -> AppError {
    let reason = match &err {
        AppError::InvalidFilterOperator { .. } => "invalid_operator",
        AppError::InvalidCursor { .. } => "invalid_cursor",
        _ => "invalid_filter",
    };
    metrics::record_rejection(reason);
    err
}
