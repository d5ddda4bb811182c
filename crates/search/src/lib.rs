//! ItemSearch query engine
//!
//! Builds one predicate from declarative search arguments and runs it
//! against a search index:
//! - Field filters folded per field with AND/OR, fields always ANDed
//! - Scope predicates for root item, language and latest version
//! - Scoped index sessions released on every exit path
//! - Connection-style pagination over the filtered matches

pub mod filter;
pub mod index;
pub mod orchestrator;
pub mod pagination;
pub mod predicate;
pub mod record;
pub mod resolvers;

pub use filter::{FieldFilter, FilterOperator, RawFieldFilter};
pub use index::{IndexProvider, IndexSession, MemoryIndexProvider};
pub use orchestrator::{OrchestratorSettings, QueryOrchestrator, RequestContext, SearchArguments};
pub use pagination::{ConnectionArgs, PageInfo, PagedResult, PaginationWindow};
pub use predicate::Predicate;
pub use record::{ItemId, SearchRecord};
pub use resolvers::{IdentifierResolver, ItemTree, LanguageResolver, TagLanguages};
