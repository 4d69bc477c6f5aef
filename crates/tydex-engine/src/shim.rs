//! External dependency shims
//!
//! Synthesizes placeholder type declarations for the manifest's declared
//! dependencies so that importing a third-party package resolves to
//! *something* instead of failing resolution outright. Shims trade type
//! fidelity for emission success: a handful of widely-used libraries get
//! hand-authored surfaces embedded at build time, everything else gets a
//! generic untyped fallback.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use crate::manifest::PackageManifest;

/// Path the baseline type library is registered under in every store.
pub const BASELINE_LIB_PATH: &str = "lib.d.ts";

/// Baseline type library text (global primitives, utility types).
pub const BASELINE_LIB: &str = include_str!("../dts/lib.d.ts");

/// Hand-authored shims, keyed by exact package name.
static CURATED_SHIMS: Lazy<FxHashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut shims = FxHashMap::default();
    shims.insert("react", include_str!("../dts/react.d.ts"));
    shims.insert("lodash", include_str!("../dts/lodash.d.ts"));
    shims.insert("express", include_str!("../dts/express.d.ts"));
    shims
});

/// Synthetic store path for a dependency's shim.
///
/// Derived solely from the dependency name, so repeated invocations for the
/// same manifest land on the same path.
pub fn shim_path(name: &str) -> String {
    format!("node_modules/{}/index.d.ts", name)
}

/// Declaration text for a dependency: the curated shim when the name
/// matches exactly, else the generic fallback.
pub fn shim_source(name: &str) -> String {
    match CURATED_SHIMS.get(name) {
        Some(text) => (*text).to_string(),
        None => fallback_shim(name),
    }
}

/// Generic placeholder exposing an untyped default/namespace export.
fn fallback_shim(name: &str) -> String {
    format!(
        "// Placeholder declarations for \"{}\".\ndeclare const content: any;\nexport = content;\n",
        name
    )
}

/// Generate the shim map for a manifest: one `(path, text)` pair per
/// declared dependency, `dependencies` before `devDependencies`, in
/// document order. Repeated names produce repeated pairs with identical
/// content; merging them into the store is idempotent.
pub fn generate_shims(manifest: &PackageManifest) -> Vec<(String, String)> {
    manifest
        .dependency_names()
        .into_iter()
        .map(|name| (shim_path(name), shim_source(name)))
        .collect()
}
