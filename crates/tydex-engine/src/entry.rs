//! Entry point resolution
//!
//! Derives the ordered set of public entry-point file paths from a parsed
//! manifest: the `main` field, the `types`/`typings` field, and every path
//! reachable through the conditional `exports` map. Candidates are
//! normalized and retargeted to source form; insertion order is kept and
//! duplicates are not removed (the closure walk downstream is idempotent
//! under repeats).

use serde_json::{Map, Value};

use crate::manifest::PackageManifest;
use crate::store::{normalize_path, rewrite_extension};

/// One level of the manifest's `exports` field.
///
/// The field is polymorphic: a bare string, a map from subpath (keys
/// beginning with `.`) to nested entries, or a map from condition name
/// (`import`, `require`, `types`, ...) to nested entries. Modeling the walk
/// as a tagged variant keeps the recursion's termination obvious: every
/// step descends into a strictly smaller JSON subtree.
enum ExportsEntry<'a> {
    /// String leaf: a candidate path.
    Path(&'a str),
    /// Map keyed by subpaths (`.`, `./feature`, ...).
    Subpaths(&'a Map<String, Value>),
    /// Map keyed by condition names; every string-valued condition is a
    /// candidate, so `import`, `require` and `types` targets are all
    /// captured rather than just one arbitrarily-picked condition.
    Conditions(&'a Map<String, Value>),
}

impl<'a> ExportsEntry<'a> {
    /// Classify one JSON value. Arrays, numbers and null carry no entry
    /// point information and classify as `None`.
    fn classify(value: &'a Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(ExportsEntry::Path(s)),
            Value::Object(map) => {
                if map.keys().any(|k| k.starts_with('.')) {
                    Some(ExportsEntry::Subpaths(map))
                } else {
                    Some(ExportsEntry::Conditions(map))
                }
            }
            _ => None,
        }
    }
}

/// Resolve the ordered entry-point set for a manifest.
///
/// Returns an empty sequence when the manifest has no `main`, no
/// `types`/`typings` and no `exports`; downstream that signals "apply no
/// filtering".
pub fn resolve_entry_points(manifest: &PackageManifest) -> Vec<String> {
    let mut entries = Vec::new();

    if let Some(main) = &manifest.main {
        push_candidate(&mut entries, main);
    }
    if let Some(types) = manifest.types_entry() {
        push_candidate(&mut entries, types);
    }
    if let Some(exports) = &manifest.exports {
        if let Some(entry) = ExportsEntry::classify(exports) {
            walk_exports(entry, &mut entries);
        }
    }

    entries
}

fn walk_exports(entry: ExportsEntry, out: &mut Vec<String>) {
    match entry {
        ExportsEntry::Path(path) => push_candidate(out, path),
        // Subpath targets and condition targets recurse the same way; the
        // distinction matters for classification, not for collection.
        ExportsEntry::Subpaths(map) | ExportsEntry::Conditions(map) => {
            for value in map.values() {
                if let Some(nested) = ExportsEntry::classify(value) {
                    walk_exports(nested, out);
                }
            }
        }
    }
}

fn push_candidate(out: &mut Vec<String>, raw: &str) {
    out.push(rewrite_extension(&normalize_path(raw)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(json: &str) -> PackageManifest {
        PackageManifest::from_str(json).unwrap()
    }

    #[test]
    fn test_empty_manifest_yields_no_entries() {
        let m = manifest("{}");
        assert!(resolve_entry_points(&m).is_empty());
    }

    #[test]
    fn test_main_and_types_in_order() {
        let m = manifest(r#"{"main": "./dist/index.js", "types": "./dist/index.d.ts"}"#);
        assert_eq!(
            resolve_entry_points(&m),
            vec!["dist/index.ts".to_string(), "dist/index.ts".to_string()]
        );
    }

    #[test]
    fn test_exports_types_condition() {
        let m = manifest(r#"{"exports": {".": {"types": "./dist/index.d.ts"}}}"#);
        assert_eq!(resolve_entry_points(&m), vec!["dist/index.ts".to_string()]);
    }

    #[test]
    fn test_exports_string_form() {
        let m = manifest(r#"{"exports": "./lib/mod.mjs"}"#);
        assert_eq!(resolve_entry_points(&m), vec!["lib/mod.ts".to_string()]);
    }

    #[test]
    fn test_exports_captures_every_condition() {
        let m = manifest(
            r#"{"exports": {
                ".": {"import": "./esm/index.mjs", "require": "./cjs/index.cjs"},
                "./extra": "./extra.js"
            }}"#,
        );
        assert_eq!(
            resolve_entry_points(&m),
            vec![
                "esm/index.ts".to_string(),
                "cjs/index.ts".to_string(),
                "extra.ts".to_string()
            ]
        );
    }

    #[test]
    fn test_exports_nonstandard_subpath_target() {
        let m = manifest(r#"{"exports": {".": "./weird/place/main.js"}}"#);
        assert_eq!(resolve_entry_points(&m), vec!["weird/place/main.ts".to_string()]);
    }

    #[test]
    fn test_exports_ignores_non_string_leaves() {
        let m = manifest(r#"{"exports": {".": ["./a.js", "./b.js"], "./n": 3}}"#);
        assert!(resolve_entry_points(&m).is_empty());
    }

    #[test]
    fn test_duplicates_are_preserved() {
        let m = manifest(
            r#"{"main": "./index.js", "exports": {".": {"default": "./index.js"}}}"#,
        );
        assert_eq!(
            resolve_entry_points(&m),
            vec!["index.ts".to_string(), "index.ts".to_string()]
        );
    }
}
