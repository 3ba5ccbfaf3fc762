//! Document envelope shared by all dictionary document kinds
//!
//! Every emitted document carries the same routing contract: a channel
//! naming the document category, a static key, a scope (client / role /
//! user / language) and an index value derived from both. The envelope is
//! sealed once per source entity and immutable afterwards.
//!
//! Scope IDs obey two different thresholds on purpose: a zero ID is still
//! written into the document body (`>= 0`), but only strictly positive IDs
//! contribute an index-key segment (`> 0`). Both sides are part of the
//! established index contract.

use serde::Serialize;
use serde_json::{Map, Value};

/// Routing key shared by all documents of this version.
pub const DOCUMENT_KEY: &str = "new";

/// Language that never contributes an index-key segment.
pub const DEFAULT_LANGUAGE: &str = "en_US";

const UNSCOPED: i32 = -1;

/// The closed set of document categories this system emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentChannel {
    Window,
    Browser,
}

impl DocumentChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentChannel::Window => "window",
            DocumentChannel::Browser => "browser",
        }
    }
}

impl std::fmt::Display for DocumentChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client / role / user / language scope, configured once before assembly.
///
/// Negative IDs (the default) mean "not scoped". No further validation is
/// applied; callers pass catalog IDs, which are non-negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentScope {
    client_id: i32,
    role_id: i32,
    user_id: i32,
    language: String,
}

impl Default for DocumentScope {
    fn default() -> Self {
        Self {
            client_id: UNSCOPED,
            role_id: UNSCOPED,
            user_id: UNSCOPED,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl DocumentScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(mut self, client_id: i32) -> Self {
        self.client_id = client_id;
        self
    }

    pub fn with_role(mut self, role_id: i32) -> Self {
        self.role_id = role_id;
        self
    }

    pub fn with_user(mut self, user_id: i32) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn client_id(&self) -> i32 {
        self.client_id
    }

    pub fn role_id(&self) -> i32 {
        self.role_id
    }

    pub fn user_id(&self) -> i32 {
        self.user_id
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

/// A finished, channel-tagged document ready for the transport layer.
///
/// Construction is the only mutation point: [`DictionaryDocument::seal`]
/// merges the routing attributes into the entity detail, computes the
/// index value, and wraps the detail under `"document"`.
#[derive(Debug, Clone)]
pub struct DictionaryDocument {
    channel: DocumentChannel,
    scope: DocumentScope,
    body: Map<String, Value>,
}

impl DictionaryDocument {
    /// Seal `detail` into an envelope for `channel`.
    pub(crate) fn seal(
        channel: DocumentChannel,
        scope: DocumentScope,
        mut detail: Map<String, Value>,
    ) -> Self {
        detail.insert("language".to_string(), Value::from(scope.language()));
        if scope.client_id() >= 0 {
            detail.insert("client_id".to_string(), Value::from(scope.client_id()));
        }
        if scope.role_id() >= 0 {
            detail.insert("role_id".to_string(), Value::from(scope.role_id()));
        }
        if scope.user_id() >= 0 {
            detail.insert("user_id".to_string(), Value::from(scope.user_id()));
        }
        detail.insert(
            "index_value".to_string(),
            Value::from(index_value_for(channel, &scope)),
        );

        let mut body = Map::new();
        body.insert("document".to_string(), Value::Object(detail));
        Self { channel, scope, body }
    }

    pub fn channel(&self) -> DocumentChannel {
        self.channel
    }

    pub fn key(&self) -> &'static str {
        DOCUMENT_KEY
    }

    pub fn scope(&self) -> &DocumentScope {
        &self.scope
    }

    /// The derived index key. Never stored independently; recomputing on
    /// an unmodified envelope always yields the same string.
    pub fn index_value(&self) -> String {
        index_value_for(self.channel, &self.scope)
    }

    /// The `{"document": {...}}` body.
    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn into_body(self) -> Map<String, Value> {
        self.body
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.body.clone())
    }
}

/// Index key: channel, then `_language` when not the default, then one
/// `_id` segment per strictly positive scope ID, lower-cased as a whole.
fn index_value_for(channel: DocumentChannel, scope: &DocumentScope) -> String {
    let mut key = String::from(channel.as_str());
    if scope.language() != DEFAULT_LANGUAGE {
        key.push('_');
        key.push_str(scope.language());
    }
    if scope.client_id() > 0 {
        key.push('_');
        key.push_str(&scope.client_id().to_string());
    }
    if scope.role_id() > 0 {
        key.push('_');
        key.push_str(&scope.role_id().to_string());
    }
    if scope.user_id() > 0 {
        key.push('_');
        key.push_str(&scope.user_id().to_string());
    }
    key.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_value_lowercases_language_and_appends_scope() {
        let scope = DocumentScope::new().with_language("es_VE").with_client(11);
        let document = DictionaryDocument::seal(DocumentChannel::Window, scope, Map::new());
        assert_eq!(document.index_value(), "window_es_ve_11");
    }

    #[test]
    fn default_scope_yields_bare_channel() {
        let document =
            DictionaryDocument::seal(DocumentChannel::Browser, DocumentScope::new(), Map::new());
        assert_eq!(document.index_value(), "browser");
        assert_eq!(document.key(), "new");
    }

    #[test]
    fn zero_id_is_in_body_but_not_in_index() {
        let scope = DocumentScope::new().with_role(0);
        let document = DictionaryDocument::seal(DocumentChannel::Window, scope, Map::new());
        assert_eq!(document.index_value(), "window");
        let detail = document.body()["document"].as_object().unwrap();
        assert_eq!(detail["role_id"], 0);
        assert!(!detail.contains_key("client_id"));
    }

    #[test]
    fn index_value_is_idempotent() {
        let scope = DocumentScope::new().with_client(11).with_role(102).with_user(100);
        let document = DictionaryDocument::seal(DocumentChannel::Window, scope, Map::new());
        assert_eq!(document.index_value(), document.index_value());
        assert_eq!(document.index_value(), "window_11_102_100");
    }
}
