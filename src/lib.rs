// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # Metadex — dictionary metadata to search-index documents
//!
//! Converts hierarchical application-dictionary definitions — windows
//! composed of tabs composed of fields, and browsers composed of fields —
//! into flat, channel-tagged documents suitable for publication to a
//! search/index backend.
//!
//! ## Core Concept
//!
//! Every document shares one envelope contract: a **channel** naming the
//! document category, a routing **scope** (client / role / user /
//! language), and a deterministic **index value** derived from both. On
//! top of that, two algorithms do the real work:
//!
//! - the **context expression scanner** extracts the `@Name@` context
//!   variables an expression reads, so consumers know which runtime
//!   values to supply before evaluating it
//! - the **reference resolver** maps a field's display kind to the table
//!   its values point into, falling back from fixed per-kind tables to
//!   the catalog's lookup definitions
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use metadex::{
//!     publish, AssemblyContext, CatalogSnapshot, DocumentScope, PublisherConfig,
//!     SnapshotCatalog,
//! };
//!
//! // Load a dictionary export and publish every entity
//! let snapshot = CatalogSnapshot::load("dictionary.json")?;
//! let catalog = SnapshotCatalog::new(snapshot);
//! let config = PublisherConfig::load("metadex.yaml")?;
//! for document in publish(&catalog, &config)? {
//!     println!("{} -> {}", document.index_value(), document.to_value());
//! }
//!
//! // Or assemble a single window against your own collaborators
//! let ctx = AssemblyContext {
//!     catalog: &catalog,
//!     lookups: &catalog,
//!     rules: &catalog,
//!     dependents: &catalog,
//! };
//! let scope = DocumentScope::new().with_language("es_VE").with_client(11);
//! let document = metadex::window_document(&ctx, &window, scope)?;
//! assert_eq!(document.index_value(), "window_es_ve_11");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                                                            │
//! │  CATALOG (windows, browsers, tables, lookups)              │
//! │       │                                                    │
//! │       ├──► window_document(ctx, window, scope) ──┐         │
//! │       │                                          │         │
//! │       └──► browser_document(ctx, browser, scope) ┤         │
//! │                                                  │         │
//! │  per field:  extract_context_variables(expr)     │         │
//! │              resolve_reference(kind, column, …)  │         │
//! │                                                  ▼         │
//! │  ENVELOPE: seal(channel, scope, detail)                    │
//! │       └──► {"document": {…, "index_value": "window_…"}}    │
//! │                                                            │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Assembly is synchronous and shares no state between documents: each
//! call builds a fresh document graph, so callers may fan out entities
//! across threads as long as the catalog collaborators tolerate
//! concurrent reads.

// Core modules
pub mod catalog;
pub mod context;
pub mod envelope;
pub mod error;
pub mod model;
pub mod reference;

// Assembly and publication
pub mod assemble;
pub mod publish;
pub mod snapshot;

// Configuration
pub mod config;

// Re-exports
pub use assemble::{browser_document, window_document, AssemblyContext};
pub use catalog::{
    DependentFieldSource, DictionaryCatalog, LookupMetadata, LookupMetadataSource,
    ValidationRuleSource,
};
pub use config::{ChannelsConfig, OutputConfig, PublisherConfig, ScopeConfig};
pub use context::{extract_context_variables, join_expression_sources};
pub use envelope::{
    DictionaryDocument, DocumentChannel, DocumentScope, DEFAULT_LANGUAGE, DOCUMENT_KEY,
};
pub use error::{Error, Result};
pub use model::{
    Browser, BrowserField, Column, DisplayText, EntitySummary, Field, Process, Tab, Table,
    Translation, Window,
};
pub use publish::publish;
pub use reference::{is_lookup_kind, resolve_reference, ReferenceDefinition};
pub use snapshot::{CatalogSnapshot, LookupDefinition, SnapshotCatalog, ValidationRule};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
