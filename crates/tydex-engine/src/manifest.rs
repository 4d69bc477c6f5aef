//! Package manifest parsing (package.json)
//!
//! Provides structures and parsing for the npm-style manifest a submitted
//! package carries. Absent fields never fail parsing; they simply contribute
//! no entry points, dependencies or option overrides. A manifest that is not
//! valid JSON is an error here, which the orchestrator downgrades to a
//! warning and continues without a manifest.

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors that can occur during manifest parsing
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Failed to parse JSON
    #[error("Failed to parse manifest: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Package manifest (package.json)
///
/// Only the fields the pipeline consumes are modeled; everything else in
/// the document is ignored. Dependency maps keep document order so shim
/// generation and entry resolution stay deterministic.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PackageManifest {
    /// Package name
    pub name: Option<String>,

    /// Package version
    pub version: Option<String>,

    /// Main entry point
    pub main: Option<String>,

    /// Declaration entry point
    pub types: Option<String>,

    /// Legacy spelling of `types`
    pub typings: Option<String>,

    /// Conditional exports map, kept raw; the entry-point resolver walks it
    /// as a tagged variant tree (string leaf / subpath map / condition map)
    pub exports: Option<Value>,

    /// Runtime dependencies (name -> version constraint)
    pub dependencies: Option<Map<String, Value>>,

    /// Development-only dependencies
    #[serde(rename = "devDependencies")]
    pub dev_dependencies: Option<Map<String, Value>>,

    /// Compiler option overrides applied on top of the tolerant defaults
    #[serde(rename = "compilerOptions")]
    pub compiler_options: Option<CompilerOverrides>,
}

/// Compiler option overrides embedded in a manifest.
///
/// All fields are optional; only the ones present override the pipeline's
/// tolerant defaults. Unrecognized keys in the block are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompilerOverrides {
    /// Emit declaration files
    pub declaration: Option<bool>,

    /// Emit declaration source maps
    pub declaration_map: Option<bool>,

    /// Suppress non-declaration output
    pub emit_declaration_only: Option<bool>,

    /// Skip checking of library files
    pub skip_lib_check: Option<bool>,

    /// Strict type-checking family
    pub strict: Option<bool>,

    /// Withhold output when errors are present
    pub no_emit_on_error: Option<bool>,

    /// Language target (e.g. "ES2022")
    pub target: Option<String>,

    /// Module format (e.g. "ESNext")
    pub module: Option<String>,

    /// Module resolution strategy (e.g. "node")
    pub module_resolution: Option<String>,

    /// JSX factory function
    pub jsx_factory: Option<String>,

    /// JSX fragment component
    pub jsx_fragment: Option<String>,
}

impl PackageManifest {
    /// Parse a manifest from package.json text
    pub fn from_str(content: &str) -> Result<Self, ManifestError> {
        let manifest: PackageManifest = serde_json::from_str(content)?;
        Ok(manifest)
    }

    /// Declared dependency names, `dependencies` first then
    /// `devDependencies`, each in document order. A name listed in both maps
    /// appears twice; downstream consumers are idempotent under repeats.
    pub fn dependency_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        if let Some(deps) = &self.dependencies {
            names.extend(deps.keys().map(String::as_str));
        }
        if let Some(deps) = &self.dev_dependencies {
            names.extend(deps.keys().map(String::as_str));
        }
        names
    }

    /// The declaration entry field, preferring `types` over `typings`.
    pub fn types_entry(&self) -> Option<&str> {
        self.types.as_deref().or(self.typings.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_manifest() {
        let manifest = PackageManifest::from_str(r#"{"name": "pkg"}"#).unwrap();
        assert_eq!(manifest.name.as_deref(), Some("pkg"));
        assert!(manifest.main.is_none());
        assert!(manifest.exports.is_none());
        assert!(manifest.dependency_names().is_empty());
    }

    #[test]
    fn test_parse_empty_object() {
        let manifest = PackageManifest::from_str("{}").unwrap();
        assert!(manifest.name.is_none());
        assert!(manifest.types_entry().is_none());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(PackageManifest::from_str("{not json").is_err());
        assert!(PackageManifest::from_str("").is_err());
    }

    #[test]
    fn test_dependency_names_keep_document_order() {
        let manifest = PackageManifest::from_str(
            r#"{
                "dependencies": {"zlib-sync": "^1.0.0", "axios": "^1.6.0"},
                "devDependencies": {"vitest": "^1.0.0"}
            }"#,
        )
        .unwrap();

        assert_eq!(manifest.dependency_names(), vec!["zlib-sync", "axios", "vitest"]);
    }

    #[test]
    fn test_types_preferred_over_typings() {
        let manifest = PackageManifest::from_str(
            r#"{"types": "./index.d.ts", "typings": "./legacy.d.ts"}"#,
        )
        .unwrap();
        assert_eq!(manifest.types_entry(), Some("./index.d.ts"));

        let manifest = PackageManifest::from_str(r#"{"typings": "./legacy.d.ts"}"#).unwrap();
        assert_eq!(manifest.types_entry(), Some("./legacy.d.ts"));
    }

    #[test]
    fn test_compiler_overrides() {
        let manifest = PackageManifest::from_str(
            r#"{
                "compilerOptions": {
                    "strict": true,
                    "target": "ES2015",
                    "outDir": "ignored"
                }
            }"#,
        )
        .unwrap();

        let overrides = manifest.compiler_options.unwrap();
        assert_eq!(overrides.strict, Some(true));
        assert_eq!(overrides.target.as_deref(), Some("ES2015"));
        assert!(overrides.declaration.is_none());
    }
}
