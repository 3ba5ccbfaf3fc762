//! Context variable extraction from dictionary expressions
//!
//! Dictionary expressions — default values, display logic, read-only
//! logic, mandatory logic, embedded lookup queries — reference session
//! and record values with `@Name@` markers. Before such an expression can
//! be evaluated, every referenced context variable must be supplied, so
//! consumers need the set of names an expression reads.
//!
//! A variable token is `@`, an optional `#` or `$` marker, one or more
//! word characters, and a closing `@`. The marker stays part of the
//! returned name; the `@` delimiters do not.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static CONTEXT_VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([#$]?\w+)@").expect("context variable pattern is valid"));

/// Extract the distinct context variable names referenced by `text`.
///
/// Blank input yields an empty set without touching the pattern engine.
/// Duplicate references collapse to one entry; the result is ordered only
/// for deterministic output.
///
/// # Examples
/// ```
/// use metadex::context::extract_context_variables;
/// let names = extract_context_variables("@AD_Org_ID@ and @#Date@");
/// assert!(names.contains("AD_Org_ID"));
/// assert!(names.contains("#Date"));
/// assert_eq!(names.len(), 2);
/// ```
pub fn extract_context_variables(text: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    if text.trim().is_empty() {
        return names;
    }
    for capture in CONTEXT_VARIABLE.captures_iter(text) {
        names.insert(capture[1].to_string());
    }
    names
}

/// Concatenate independent expression sources into one scannable string.
///
/// Callers pass every expression attribute of an entity in one call; absent
/// sources contribute nothing. Sources are joined with no separator, which
/// is safe as long as each source keeps its `@...@` pairs closed.
pub fn join_expression_sources<'a, I>(sources: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut joined = String::new();
    for source in sources.into_iter().flatten() {
        joined.push_str(source);
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_plain_and_marked_names() {
        let names = extract_context_variables("@AD_Org_ID@ and @#Date@");
        let expected: BTreeSet<String> =
            ["AD_Org_ID".to_string(), "#Date".to_string()].into_iter().collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn blank_input_yields_empty_set() {
        assert!(extract_context_variables("").is_empty());
        assert!(extract_context_variables("   \t ").is_empty());
    }

    #[test]
    fn text_without_tokens_yields_empty_set() {
        assert!(extract_context_variables("AD_Org_ID=0 OR IsActive='Y'").is_empty());
    }

    #[test]
    fn duplicates_collapse() {
        let names = extract_context_variables("@AD_Client_ID@=@AD_Client_ID@");
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn dollar_marker_is_kept() {
        let names = extract_context_variables("@$Element_U1@");
        assert!(names.contains("$Element_U1"));
    }

    #[test]
    fn unclosed_token_is_ignored() {
        assert!(extract_context_variables("@AD_Org_ID").is_empty());
    }

    #[test]
    fn join_skips_absent_sources() {
        let joined = join_expression_sources([Some("@A@"), None, Some("@B@")]);
        assert_eq!(joined, "@A@@B@");
        assert_eq!(extract_context_variables(&joined).len(), 2);
    }
}
