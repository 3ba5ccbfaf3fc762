//! Entity assemblers — walk catalog definitions into document detail maps
//!
//! One assembler per document kind: [`window_document`] and
//! [`browser_document`]. Each is a pure function from a catalog entity (plus
//! collaborators) to a sealed [`DictionaryDocument`](crate::envelope::DictionaryDocument);
//! nothing is cached or mutated across invocations, so independent callers
//! can fan out entities concurrently as long as the collaborators tolerate
//! concurrent reads.
//!
//! Missing child collections become empty subsets. A missing entity behind a
//! positively-referenced ID is fatal for the whole document: either a
//! complete document is produced or none is.

mod browser;
mod window;

pub use browser::browser_document;
pub use window::window_document;

use crate::catalog::{
    DependentFieldSource, DictionaryCatalog, LookupMetadataSource, ValidationRuleSource,
};
use crate::error::{Error, Result};
use crate::model::{DisplayText, EntitySummary};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// The collaborators one document assembly needs, passed explicitly.
#[derive(Clone, Copy)]
pub struct AssemblyContext<'a> {
    pub catalog: &'a dyn DictionaryCatalog,
    pub lookups: &'a dyn LookupMetadataSource,
    pub rules: &'a dyn ValidationRuleSource,
    pub dependents: &'a dyn DependentFieldSource,
}

/// Unwrap a catalog read for an ID the source entity positively
/// references.
pub(crate) fn require<T>(found: Option<T>, what: &str, id: i32) -> Result<T> {
    found.ok_or_else(|| Error::MissingEntity(format!("{what} {id}")))
}

/// Insert the language-resolved name / description / help of `text`.
pub(crate) fn put_display_text(detail: &mut Map<String, Value>, text: &DisplayText, language: &str) {
    detail.insert("name".to_string(), Value::from(text.name_for(language)));
    if let Some(description) = text.description_for(language) {
        detail.insert("description".to_string(), Value::from(description));
    }
    if let Some(help) = text.help_for(language) {
        detail.insert("help".to_string(), Value::from(help));
    }
}

/// Cross-reference detail: id, uuid, and resolved display text.
pub(crate) fn summary_detail(summary: &EntitySummary, language: &str) -> Map<String, Value> {
    let mut detail = Map::new();
    detail.insert("id".to_string(), Value::from(summary.id));
    detail.insert("uuid".to_string(), Value::from(summary.uuid.as_str()));
    put_display_text(&mut detail, &summary.text, language);
    detail
}

/// Context variable names as a JSON array, sorted for stable output.
pub(crate) fn context_names_value(names: BTreeSet<String>) -> Value {
    Value::Array(names.into_iter().map(Value::from).collect())
}

/// Insert `value` only when present; absent attributes are omitted, never
/// emitted as null.
pub(crate) fn put_optional(detail: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        detail.insert(key.to_string(), Value::from(value));
    }
}
