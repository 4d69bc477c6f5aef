//! Compiler host adapter
//!
//! Implements the toolchain's file-system and module-resolution callback
//! contract purely in terms of the virtual file store. The contract is an
//! explicit capability trait so an alternate backend (a real file system, a
//! different front-end) could be substituted without touching the
//! orchestrator.

use rustc_hash::FxHashMap;

use crate::shim::{shim_path, BASELINE_LIB_PATH};
use crate::store::{dir_of, join_relative, normalize_path, VirtualFileStore};

/// Source extensions probed during relative module resolution, in order.
pub const SOURCE_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".d.ts"];

/// File-system and resolution capabilities the emission driver requires.
pub trait CompilerHost {
    /// Text of a source file, if present.
    fn source_text(&self, path: &str) -> Option<&str>;

    /// Whether a file exists.
    fn file_exists(&self, path: &str) -> bool;

    /// Whether a directory exists. A virtual store has no directory
    /// concept, so the virtual host always affirms.
    fn directory_exists(&self, path: &str) -> bool;

    /// Path of the default type library.
    fn default_lib_path(&self) -> &str;

    /// Resolve a module specifier imported from `from_file` to a store
    /// path. `None` means unresolved; the driver turns that into a
    /// diagnostic rather than failing the run.
    fn resolve_module(&self, specifier: &str, from_file: &str) -> Option<String>;

    /// Capture one emitted output artifact.
    fn write_output(&mut self, path: &str, text: &str);
}

/// Candidate paths for a relative specifier, in probe order: the literal
/// path, the path with each source extension appended, then the
/// `/index`-suffixed forms. Shared between the host and the closure filter
/// so the two can never disagree about resolution.
pub fn module_candidates(specifier: &str, from_file: &str) -> Vec<String> {
    let base = join_relative(dir_of(&normalize_path(from_file)), specifier);

    let mut candidates = Vec::with_capacity(2 * SOURCE_EXTENSIONS.len() + 1);
    candidates.push(base.clone());
    for ext in SOURCE_EXTENSIONS {
        candidates.push(format!("{}{}", base, ext));
    }
    for ext in SOURCE_EXTENSIONS {
        candidates.push(format!("{}/index{}", base, ext));
    }
    candidates
}

/// Host backed by the in-memory store.
#[derive(Debug)]
pub struct VirtualHost {
    store: VirtualFileStore,
    outputs: FxHashMap<String, String>,
    resolve_externals: bool,
    include_declaration_map: bool,
}

impl VirtualHost {
    /// Create a host over a populated store.
    pub fn new(store: VirtualFileStore, resolve_externals: bool, include_declaration_map: bool) -> Self {
        Self {
            store,
            outputs: FxHashMap::default(),
            resolve_externals,
            include_declaration_map,
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &VirtualFileStore {
        &self.store
    }

    /// Captured declaration outputs so far.
    pub fn outputs(&self) -> &FxHashMap<String, String> {
        &self.outputs
    }

    /// Consume the host, returning the captured declaration outputs.
    pub fn into_outputs(self) -> FxHashMap<String, String> {
        self.outputs
    }
}

impl CompilerHost for VirtualHost {
    fn source_text(&self, path: &str) -> Option<&str> {
        self.store.get(path)
    }

    fn file_exists(&self, path: &str) -> bool {
        self.store.contains(path)
    }

    fn directory_exists(&self, _path: &str) -> bool {
        true
    }

    fn default_lib_path(&self) -> &str {
        BASELINE_LIB_PATH
    }

    fn resolve_module(&self, specifier: &str, from_file: &str) -> Option<String> {
        if specifier.starts_with('.') {
            return module_candidates(specifier, from_file)
                .into_iter()
                .find(|candidate| self.store.contains(candidate));
        }

        // Non-relative: only the synthetic shim path is consulted, never
        // the relative probe order.
        if self.resolve_externals {
            let path = shim_path(specifier);
            if self.store.contains(&path) {
                return Some(path);
            }
        }
        None
    }

    fn write_output(&mut self, path: &str, text: &str) {
        let retained = path.ends_with(".d.ts")
            || (self.include_declaration_map && path.ends_with(".d.ts.map"));
        if retained {
            self.outputs.insert(normalize_path(path), text.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host_with(files: &[(&str, &str)]) -> VirtualHost {
        let mut store = VirtualFileStore::new();
        for (path, content) in files {
            store.insert(path, (*content).to_string());
        }
        VirtualHost::new(store, true, false)
    }

    #[test]
    fn test_resolve_literal_path_wins() {
        let host = host_with(&[("src/utils", "x"), ("src/utils.ts", "y")]);
        assert_eq!(
            host.resolve_module("./utils", "src/index.ts"),
            Some("src/utils".to_string())
        );
    }

    #[test]
    fn test_resolve_appends_source_extensions_in_order() {
        let host = host_with(&[("src/utils.tsx", "x"), ("src/utils.d.ts", "y")]);
        assert_eq!(
            host.resolve_module("./utils", "src/index.ts"),
            Some("src/utils.tsx".to_string())
        );
    }

    #[test]
    fn test_resolve_falls_back_to_index() {
        let host = host_with(&[("src/lib/index.ts", "x")]);
        assert_eq!(
            host.resolve_module("./lib", "src/main.ts"),
            Some("src/lib/index.ts".to_string())
        );
    }

    #[test]
    fn test_resolve_parent_directory() {
        let host = host_with(&[("src/shared.ts", "x")]);
        assert_eq!(
            host.resolve_module("../shared", "src/nested/mod.ts"),
            Some("src/shared.ts".to_string())
        );
    }

    #[test]
    fn test_resolve_missing_relative_is_none() {
        let host = host_with(&[("src/index.ts", "x")]);
        assert_eq!(host.resolve_module("./missing", "src/index.ts"), None);
    }

    #[test]
    fn test_resolve_external_hits_shim_path() {
        let host = host_with(&[("node_modules/react/index.d.ts", "declare const content: any;")]);
        assert_eq!(
            host.resolve_module("react", "src/app.tsx"),
            Some("node_modules/react/index.d.ts".to_string())
        );
    }

    #[test]
    fn test_resolve_external_disabled() {
        let mut store = VirtualFileStore::new();
        store.insert("node_modules/react/index.d.ts", "x".to_string());
        let host = VirtualHost::new(store, false, false);
        assert_eq!(host.resolve_module("react", "src/app.tsx"), None);
    }

    #[test]
    fn test_external_miss_never_probes_relative_order() {
        // A file literally named like the bare specifier must not satisfy
        // non-relative resolution.
        let host = host_with(&[("react.ts", "x")]);
        assert_eq!(host.resolve_module("react", "src/app.tsx"), None);
    }

    #[test]
    fn test_write_capture_retains_only_declarations() {
        let mut host = host_with(&[]);
        host.write_output("src/a.d.ts", "declare const a: number;");
        host.write_output("src/a.js", "var a = 1;");
        host.write_output("src/a.d.ts.map", "{}");

        assert_eq!(host.outputs().len(), 1);
        assert!(host.outputs().contains_key("src/a.d.ts"));
    }

    #[test]
    fn test_write_capture_retains_maps_when_enabled() {
        let mut host = VirtualHost::new(VirtualFileStore::new(), true, true);
        host.write_output("src/a.d.ts", "declare const a: number;");
        host.write_output("src/a.d.ts.map", "{}");

        assert_eq!(host.outputs().len(), 2);
    }

    #[test]
    fn test_directory_exists_is_always_true() {
        let host = host_with(&[]);
        assert!(host.directory_exists("anything/at/all"));
    }
}
