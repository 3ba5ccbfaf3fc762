//! Whole-snapshot publication
//!
//! Drives the assemblers across every entity in a catalog snapshot,
//! honoring the channel toggles and default scope from configuration.
//! Assembly is all-or-nothing per entity; the first failure aborts the
//! run so no partial document set is handed to a transport.

use crate::assemble::{browser_document, window_document, AssemblyContext};
use crate::config::PublisherConfig;
use crate::envelope::DictionaryDocument;
use crate::error::Result;
use crate::snapshot::SnapshotCatalog;
use tracing::{debug, info};

/// Assemble every publishable entity in `catalog` into documents.
///
/// Windows are always publishable; browsers only while active. The
/// returned order is windows first, then browsers, each in snapshot
/// order.
pub fn publish(catalog: &SnapshotCatalog, config: &PublisherConfig) -> Result<Vec<DictionaryDocument>> {
    let ctx = AssemblyContext {
        catalog,
        lookups: catalog,
        rules: catalog,
        dependents: catalog,
    };
    let scope = config.scope.to_document_scope();

    let mut documents = Vec::new();
    if config.channels.window {
        for window in catalog.windows() {
            let document = window_document(&ctx, window, scope.clone())?;
            debug!(index_value = %document.index_value(), "assembled window document");
            documents.push(document);
        }
    }
    if config.channels.browser {
        for browser in catalog.browsers() {
            if !browser.is_active {
                debug!(browser = browser.id, "skipping inactive browser");
                continue;
            }
            let document = browser_document(&ctx, browser, scope.clone())?;
            debug!(index_value = %document.index_value(), "assembled browser document");
            documents.push(document);
        }
    }
    info!(documents = documents.len(), "publication complete");
    Ok(documents)
}
