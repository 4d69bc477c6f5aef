//! Virtual file store and path normalization
//!
//! The store is an in-memory mapping from normalized path to file text and
//! is the single source of truth the compiler host consults instead of a
//! real file system. Every path crosses [`normalize_path`] before it is used
//! as a key, so lookups succeed regardless of how a path was spelled at the
//! boundary (`./src/a.ts`, `/src/a.ts` and `src/a.ts` all address the same
//! entry).

use rustc_hash::FxHashMap;

/// Normalize a submitted path or module specifier.
///
/// Strips one leading `./`, then one leading `/`. Pure and total; never
/// fails. Applied at every boundary: file registration, import resolution
/// and manifest-derived entry paths.
pub fn normalize_path(path: &str) -> String {
    let path = path.strip_prefix("./").unwrap_or(path);
    let path = path.strip_prefix('/').unwrap_or(path);
    path.to_string()
}

/// Rewrite a compiled-artifact extension to the canonical source extension.
///
/// Manifests usually point at build output (`./dist/index.js`,
/// `./dist/index.d.ts`); the submitted files are the author's sources, so
/// entry candidates are retargeted to `.ts`. `.d.ts` is checked before the
/// shorter suffixes so it is not mistaken for a plain `.ts` path.
pub fn rewrite_extension(path: &str) -> String {
    for suffix in [".d.ts", ".js", ".mjs", ".cjs"] {
        if let Some(stem) = path.strip_suffix(suffix) {
            return format!("{}.ts", stem);
        }
    }
    path.to_string()
}

/// Directory portion of a normalized path (empty for root-level files).
pub fn dir_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Join a relative specifier onto a directory, resolving `.` and `..`
/// segments. `..` above the root is dropped rather than rejected; the
/// virtual store has no parent to escape into.
pub fn join_relative(dir: &str, specifier: &str) -> String {
    let mut segments: Vec<&str> = dir.split('/').filter(|s| !s.is_empty()).collect();

    for segment in specifier.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}

/// In-memory file system backing one extraction run.
///
/// Populated once from the submitted files, the baseline type library and
/// any generated dependency shims; the host never mutates it during
/// emission (declaration output is captured separately).
#[derive(Debug, Default, Clone)]
pub struct VirtualFileStore {
    files: FxHashMap<String, String>,
}

impl VirtualFileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file under its normalized path, replacing any previous
    /// content for the same path.
    pub fn insert(&mut self, path: &str, content: String) {
        self.files.insert(normalize_path(path), content);
    }

    /// Get the content of a file, normalizing the lookup path.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(&normalize_path(path)).map(String::as_str)
    }

    /// Check whether a file exists under the normalized path.
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(&normalize_path(path))
    }

    /// Number of files in the store.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate over all normalized paths.
    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.files.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_leading_dot_slash() {
        assert_eq!(normalize_path("./src/index.ts"), "src/index.ts");
        assert_eq!(normalize_path("/src/index.ts"), "src/index.ts");
        assert_eq!(normalize_path("src/index.ts"), "src/index.ts");
    }

    #[test]
    fn test_normalize_strips_both_prefixes() {
        assert_eq!(normalize_path(".//src/a.ts"), "src/a.ts");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for p in ["./dist/index.d.ts", "/lib/mod.ts", "a/b/c.ts", "index.ts", ""] {
            let once = normalize_path(p);
            assert_eq!(normalize_path(&once), once, "not idempotent for {:?}", p);
        }
    }

    #[test]
    fn test_rewrite_extension() {
        assert_eq!(rewrite_extension("dist/index.js"), "dist/index.ts");
        assert_eq!(rewrite_extension("dist/index.d.ts"), "dist/index.ts");
        assert_eq!(rewrite_extension("dist/index.mjs"), "dist/index.ts");
        assert_eq!(rewrite_extension("dist/index.cjs"), "dist/index.ts");
        assert_eq!(rewrite_extension("dist/index.ts"), "dist/index.ts");
        assert_eq!(rewrite_extension("dist/index"), "dist/index");
    }

    #[test]
    fn test_dir_of() {
        assert_eq!(dir_of("src/lib/a.ts"), "src/lib");
        assert_eq!(dir_of("index.ts"), "");
    }

    #[test]
    fn test_join_relative() {
        assert_eq!(join_relative("src", "./utils"), "src/utils");
        assert_eq!(join_relative("src/lib", "../shared"), "src/shared");
        assert_eq!(join_relative("", "./utils"), "utils");
        assert_eq!(join_relative("src", "../../escape"), "escape");
    }

    #[test]
    fn test_store_lookup_ignores_path_spelling() {
        let mut store = VirtualFileStore::new();
        store.insert("./src/index.ts", "export {};".to_string());

        assert!(store.contains("src/index.ts"));
        assert!(store.contains("/src/index.ts"));
        assert_eq!(store.get("./src/index.ts"), Some("export {};"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_insert_replaces() {
        let mut store = VirtualFileStore::new();
        store.insert("a.ts", "first".to_string());
        store.insert("./a.ts", "second".to_string());

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a.ts"), Some("second"));
    }
}
