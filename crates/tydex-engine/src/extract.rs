//! Pipeline orchestration: submitted files in, declaration result out.
//!
//! [`extract_declarations`] is the crate's entry point. It stages the
//! submitted files into a virtual store, reads the package manifest for
//! entry points and dependency shims, drives parse and emit, filters the
//! output down to the exported surface, and packages everything into a
//! serializable [`DeclarationResult`]. The pipeline itself runs on a
//! worker thread raced against the configured timeout, so a pathological
//! package costs bounded wall-clock time instead of a hung caller.

use std::collections::BTreeMap;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::emit::{partition_diagnostics, CompilerOptions, Program};
use crate::entry::resolve_entry_points;
use crate::filter::{export_closure, retain_relevant};
use crate::host::VirtualHost;
use crate::manifest::PackageManifest;
use crate::shim::{generate_shims, BASELINE_LIB, BASELINE_LIB_PATH};
use crate::store::{normalize_path, VirtualFileStore};

/// One file submitted for extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedFile {
    pub name: String,
    pub content: String,
}

/// Caller-facing extraction options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractOptions {
    /// Keep only declarations reachable from the manifest entry points.
    pub filter_to_exports: bool,
    /// Generate placeholder shims for the manifest's dependencies so
    /// their imports resolve.
    pub resolve_external_dependencies: bool,
    /// Wall-clock budget for one extraction run.
    pub timeout_ms: u64,
    /// Advisory worker memory budget. Kept for API compatibility; the
    /// virtual pipeline does not enforce it.
    pub max_memory_mb: u64,
    /// Emit `.d.ts.map` companions alongside each declaration file.
    pub include_declaration_map: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            filter_to_exports: true,
            resolve_external_dependencies: true,
            timeout_ms: 30_000,
            max_memory_mb: 256,
            include_declaration_map: false,
        }
    }
}

/// Outcome of one extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationResult {
    pub success: bool,
    /// Declaration files keyed by output path, in sorted order.
    pub files: BTreeMap<String, String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Run metadata: counts, timings, filter decisions.
    pub notes: Vec<String>,
}

impl DeclarationResult {
    fn failure(message: String) -> Self {
        Self {
            success: false,
            files: BTreeMap::new(),
            errors: vec![message],
            warnings: Vec::new(),
            notes: Vec::new(),
        }
    }
}

/// Run the extraction pipeline with a timeout.
///
/// `manifest_text` is the package manifest when the caller holds it
/// separately from the files; with `None`, a submitted file named
/// `package.json` serves instead. The pipeline runs on its own thread;
/// if it exceeds the configured budget or dies, the caller gets a
/// failed [`DeclarationResult`] rather than an error or a hang.
pub fn extract_declarations(
    files: Vec<SubmittedFile>,
    manifest_text: Option<String>,
    options: ExtractOptions,
) -> DeclarationResult {
    let timeout = Duration::from_millis(options.timeout_ms);
    let timeout_ms = options.timeout_ms;
    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        let result = run_pipeline(&files, manifest_text.as_deref(), &options);
        // The receiver is gone if the caller already timed out.
        let _ = sender.send(result);
    });

    match receiver.recv_timeout(timeout) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => {
            DeclarationResult::failure(format!("Extraction timed out after {}ms", timeout_ms))
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            DeclarationResult::failure("Extraction worker terminated unexpectedly".to_string())
        }
    }
}

fn run_pipeline(
    files: &[SubmittedFile],
    manifest_text: Option<&str>,
    options: &ExtractOptions,
) -> DeclarationResult {
    let started = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let mut notes: Vec<String> = Vec::new();

    let mut store = VirtualFileStore::new();
    for file in files {
        store.insert(&file.name, file.content.clone());
    }
    store.insert(BASELINE_LIB_PATH, BASELINE_LIB.to_string());

    // Separately supplied manifest text wins over an inline package.json.
    // A broken manifest degrades the run, it does not abort it: entry
    // points and shims are simply unavailable.
    let manifest_source = manifest_text.or_else(|| {
        files
            .iter()
            .find(|file| normalize_path(&file.name) == "package.json")
            .map(|file| file.content.as_str())
    });
    let manifest = manifest_source.and_then(|text| match PackageManifest::from_str(text) {
        Ok(manifest) => Some(manifest),
        Err(err) => {
            warnings.push(format!("Failed to parse package.json: {}", err));
            None
        }
    });

    let mut shim_count = 0;
    if options.resolve_external_dependencies {
        if let Some(manifest) = &manifest {
            for (path, text) in generate_shims(manifest) {
                // Vendored declarations submitted by the caller win over
                // generated placeholders.
                if !store.contains(&path) {
                    store.insert(&path, text);
                    shim_count += 1;
                }
            }
        }
    }

    let entry_points = manifest
        .as_ref()
        .map(resolve_entry_points)
        .unwrap_or_default();

    // Every submitted file is a compilation root, whatever its name is,
    // so each one gets a declaration before filtering. Only manifest
    // material stays out of the program.
    let roots: Vec<String> = files
        .iter()
        .map(|file| normalize_path(&file.name))
        .filter(|name| name != "package.json")
        .collect();

    let mut compiler_options = CompilerOptions::tolerant();
    compiler_options.declaration_map = options.include_declaration_map;
    if let Some(overrides) = manifest.as_ref().and_then(|m| m.compiler_options.as_ref()) {
        compiler_options.apply(overrides);
    }

    let mut host = VirtualHost::new(
        store,
        options.resolve_external_dependencies,
        compiler_options.declaration_map,
    );
    let program = Program::build(&roots, &host, compiler_options);
    let emitted = program.emit(&mut host);
    let mut outputs = host.into_outputs();

    let total_outputs = outputs.len();
    if options.filter_to_exports && !entry_points.is_empty() {
        match export_closure(&program, &entry_points) {
            Some(relevant) => {
                retain_relevant(&mut outputs, &relevant);
                notes.push(format!(
                    "Filtered output to {} of {} files reachable from {} entry points",
                    outputs.len(),
                    total_outputs,
                    entry_points.len()
                ));
            }
            None => warnings.push(
                "No declaration output matched the manifest entry points; returning unfiltered output"
                    .to_string(),
            ),
        }
    }

    let (errors, mut emit_warnings) = partition_diagnostics(&emitted.diagnostics);
    warnings.append(&mut emit_warnings);

    if shim_count > 0 {
        notes.push(format!("Generated {} dependency shims", shim_count));
    }
    notes.push(format!(
        "Processed {} source files in {}ms",
        program.files().len(),
        started.elapsed().as_millis()
    ));

    let files: BTreeMap<String, String> = outputs.into_iter().collect();
    DeclarationResult {
        success: !emitted.emit_skipped && !files.is_empty(),
        files,
        errors,
        warnings,
        notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submitted(files: &[(&str, &str)]) -> Vec<SubmittedFile> {
        files
            .iter()
            .map(|(name, content)| SubmittedFile {
                name: name.to_string(),
                content: content.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_single_file_extraction() {
        let result = extract_declarations(
            submitted(&[("index.ts", "export function add(a: number, b: number): number { return a + b; }")]),
            None,
            ExtractOptions::default(),
        );
        assert!(result.success, "errors: {:?}", result.errors);
        assert_eq!(
            result.files.get("index.d.ts").map(String::as_str),
            Some("export declare function add(a: number, b: number): number;\n")
        );
    }

    #[test]
    fn test_every_submitted_file_is_a_root() {
        // Root selection must not second-guess file naming; an uppercase
        // extension still compiles rather than vanishing from the output.
        let result = extract_declarations(
            submitted(&[("INDEX.TS", "export const answer: number = 42;")]),
            None,
            ExtractOptions::default(),
        );
        assert!(result.success, "errors: {:?}", result.errors);
        assert_eq!(
            result.files.get("INDEX.TS.d.ts").map(String::as_str),
            Some("export declare const answer: number;\n")
        );
    }

    #[test]
    fn test_malformed_manifest_warns_but_continues() {
        let result = extract_declarations(
            submitted(&[
                ("package.json", "{ not json"),
                ("index.ts", "export const x = 1;"),
            ]),
            None,
            ExtractOptions::default(),
        );
        assert!(result.success);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("Failed to parse package.json")));
    }

    #[test]
    fn test_inline_manifest_file_is_not_compiled() {
        let result = extract_declarations(
            submitted(&[
                ("package.json", r#"{ "name": "demo" }"#),
                ("index.ts", "export const x = 1;"),
            ]),
            None,
            ExtractOptions::default(),
        );
        assert!(result.success);
        assert!(result.errors.is_empty(), "errors: {:?}", result.errors);
        assert_eq!(result.files.len(), 1);
        assert!(result.files.contains_key("index.d.ts"));
    }

    #[test]
    fn test_separate_manifest_text_overrides_inline_file() {
        let files = submitted(&[
            ("package.json", r#"{ "types": "./a.ts" }"#),
            ("a.ts", "export const a = 1;"),
            ("b.ts", "export const b = 2;"),
        ]);
        let result = extract_declarations(
            files,
            Some(r#"{ "types": "./b.ts" }"#.to_string()),
            ExtractOptions::default(),
        );
        assert!(result.success, "errors: {:?}", result.errors);
        assert!(result.files.contains_key("b.d.ts"));
        assert!(!result.files.contains_key("a.d.ts"));
    }

    #[test]
    fn test_empty_submission_fails() {
        let result = extract_declarations(Vec::new(), None, ExtractOptions::default());
        assert!(!result.success);
        assert!(result.files.is_empty());
    }

    #[test]
    fn test_timeout_produces_failure() {
        let options = ExtractOptions {
            timeout_ms: 0,
            ..ExtractOptions::default()
        };
        let result = extract_declarations(
            submitted(&[("index.ts", "export const x = 1;")]),
            None,
            options,
        );
        assert!(!result.success);
        assert!(result.errors[0].contains("timed out"));
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: ExtractOptions = serde_json::from_str(r#"{ "timeoutMs": 5000 }"#).unwrap();
        assert_eq!(options.timeout_ms, 5000);
        assert!(options.filter_to_exports);
        assert!(options.resolve_external_dependencies);
        assert_eq!(options.max_memory_mb, 256);
        assert!(!options.include_declaration_map);
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = DeclarationResult::failure("boom".to_string());
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("\"errors\":[\"boom\"]"));
        assert!(json.contains("\"warnings\""));
    }
}
