//! Reference kind classification and lookup target resolution
//!
//! A field's display kind decides whether its value is a foreign key and,
//! if so, which table it points into. Resolution runs in two steps: a
//! closed set of special kinds derives the table from a per-kind constant
//! (or, for table-direct, from the column name itself) without any catalog
//! access; everything else consults the lookup-metadata collaborator,
//! whose definition may carry additional expression text that must also be
//! scanned for context variables. The step order is load-bearing: a fixed
//! table short-circuits the collaborator entirely.

use crate::catalog::{LookupMetadataSource, ValidationRuleSource};
use crate::error::Result;
use serde::Serialize;
use tracing::debug;

/// Display-kind identifiers from the application dictionary.
pub mod kind {
    /// Direct record ID
    pub const RECORD_ID: i32 = 13;
    /// Fixed value list
    pub const LIST: i32 = 17;
    /// Table with explicit reference-value definition
    pub const TABLE: i32 = 18;
    /// Table derived from the column name
    pub const TABLE_DIR: i32 = 19;
    /// Address location
    pub const LOCATION: i32 = 21;
    /// Accounting element value
    pub const ACCOUNT: i32 = 25;
    /// Search field over a table
    pub const SEARCH: i32 = 30;
    /// Warehouse locator
    pub const LOCATOR: i32 = 31;
    /// Image attachment
    pub const IMAGE: i32 = 32;
    /// Resource assignment
    pub const RESOURCE_ASSIGNMENT: i32 = 33;
    /// Product attribute set instance
    pub const PRODUCT_ATTRIBUTE: i32 = 35;
    /// Chart definition
    pub const CHART: i32 = 53027;
}

/// A resolved reference: the declared kind, the target table when one
/// could be determined, and any expression text embedded in the lookup
/// definition that still needs context scanning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceDefinition {
    pub reference_id: i32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedded_context_expression: Option<String>,
}

/// Whether `reference_id` names a kind whose values point into another
/// table. Closed enumeration; everything else is a plain value kind.
pub fn is_lookup_kind(reference_id: i32) -> bool {
    matches!(
        reference_id,
        kind::LIST
            | kind::TABLE
            | kind::TABLE_DIR
            | kind::SEARCH
            | kind::ACCOUNT
            | kind::RECORD_ID
            | kind::LOCATION
            | kind::PRODUCT_ATTRIBUTE
            | kind::LOCATOR
            | kind::IMAGE
    )
}

/// Fixed target tables for kinds that never need a lookup definition.
/// Table-direct derives the table from the field's own column name; the
/// rest use the well-known key column of their backing table.
fn fixed_table_name(column_name: &str, reference_id: i32) -> Option<String> {
    let key_column = match reference_id {
        kind::TABLE_DIR => column_name,
        kind::LOCATION => "C_Location_ID",
        kind::PRODUCT_ATTRIBUTE => "M_AttributeSetInstance_ID",
        kind::IMAGE => "AD_Image_ID",
        kind::RESOURCE_ASSIGNMENT => "S_ResourceAssignment_ID",
        kind::CHART => "AD_Chart_ID",
        kind::ACCOUNT => "C_ElementValue_ID",
        _ => return None,
    };
    Some(key_column.replace("_ID", ""))
}

/// Resolve a field's declared reference into a [`ReferenceDefinition`].
///
/// Returns `Ok(None)` when the kind is not lookup-style; otherwise
/// resolution always yields a definition, even when no target table could
/// be determined — "no table" is a legitimate outcome, not an error.
/// Collaborators are consulted only for kinds without a fixed table, and
/// the validation rule only when `validation_rule_id` is positive.
pub fn resolve_reference(
    lookups: &dyn LookupMetadataSource,
    rules: &dyn ValidationRuleSource,
    column_name: &str,
    reference_id: i32,
    reference_value_id: i32,
    validation_rule_id: i32,
) -> Result<Option<ReferenceDefinition>> {
    if reference_id <= 0 || !is_lookup_kind(reference_id) {
        return Ok(None);
    }

    let mut table_name = fixed_table_name(column_name, reference_id);
    let mut embedded_context_expression = None;

    if table_name.is_none() {
        if let Some(info) = lookups.lookup_metadata(reference_id, column_name, reference_value_id)? {
            let rule_code = if validation_rule_id > 0 {
                rules.validation_code(validation_rule_id)?
            } else {
                None
            };
            // Missing pieces contribute empty strings, never abort the
            // concatenation.
            let mut expression = String::new();
            expression.push_str(info.query.as_deref().unwrap_or(""));
            expression.push_str(info.direct_query.as_deref().unwrap_or(""));
            expression.push_str(info.validation_code.as_deref().unwrap_or(""));
            expression.push_str(rule_code.as_deref().unwrap_or(""));
            table_name = Some(info.table_name);
            embedded_context_expression = Some(expression);
        }
    }

    debug!(
        column_name,
        reference_id,
        table = table_name.as_deref().unwrap_or(""),
        "resolved reference"
    );
    Ok(Some(ReferenceDefinition {
        reference_id,
        table_name,
        embedded_context_expression,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LookupMetadata;
    use crate::error::Result;

    struct NoLookups;

    impl LookupMetadataSource for NoLookups {
        fn lookup_metadata(&self, _: i32, _: &str, _: i32) -> Result<Option<LookupMetadata>> {
            Ok(None)
        }
    }

    impl ValidationRuleSource for NoLookups {
        fn validation_code(&self, _: i32) -> Result<Option<String>> {
            Ok(None)
        }
    }

    #[test]
    fn table_direct_derives_from_column_name() {
        let definition = resolve_reference(&NoLookups, &NoLookups, "C_BPartner_ID", kind::TABLE_DIR, 0, 0)
            .unwrap()
            .unwrap();
        assert_eq!(definition.table_name.as_deref(), Some("C_BPartner"));
        assert_eq!(definition.embedded_context_expression, None);
    }

    #[test]
    fn account_uses_element_value_table() {
        let definition = resolve_reference(&NoLookups, &NoLookups, "C_ValidCombination_ID", kind::ACCOUNT, 0, 0)
            .unwrap()
            .unwrap();
        assert_eq!(definition.table_name.as_deref(), Some("C_ElementValue"));
    }

    #[test]
    fn non_lookup_kind_is_absent() {
        // 20 is the yes/no kind: a plain value, never a foreign key.
        assert_eq!(resolve_reference(&NoLookups, &NoLookups, "IsActive", 20, 0, 0).unwrap(), None);
        assert_eq!(resolve_reference(&NoLookups, &NoLookups, "Whatever", 0, 0, 0).unwrap(), None);
        assert_eq!(resolve_reference(&NoLookups, &NoLookups, "Whatever", -1, 0, 0).unwrap(), None);
    }

    #[test]
    fn unresolvable_lookup_still_yields_definition() {
        let definition = resolve_reference(&NoLookups, &NoLookups, "C_PaymentTerm_ID", kind::SEARCH, 0, 0)
            .unwrap()
            .unwrap();
        assert_eq!(definition.reference_id, kind::SEARCH);
        assert_eq!(definition.table_name, None);
        assert_eq!(definition.embedded_context_expression, None);
    }
}
