//! Scope resolvers
//!
//! The orchestrator asks two collaborators to turn request strings into
//! scope values:
//! - [`IdentifierResolver`] turns a path or id into an item id
//! - [`LanguageResolver`] parses language tags and knows the default
//!
//! Both report "not found" as `None`; neither failure is an error.

mod item_tree;
mod language;

pub use item_tree::ItemTree;
pub use language::{resolve_language, Language, LanguageSource, TagLanguages, LANGUAGE_FALLBACK};

use crate::record::ItemId;

/// Resolves a content path or item id string to a known item
pub trait IdentifierResolver: Send + Sync {
    fn try_resolve(&self, path_or_id: &str) -> Option<ItemId>;
}

/// Parses language tags
pub trait LanguageResolver: Send + Sync {
    fn try_parse(&self, tag: &str) -> Option<Language>;

    /// System default language name
    fn default_language(&self) -> String;
}
