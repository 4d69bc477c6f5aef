//! Source gathering shared by CLI commands.

use std::fs;
use std::path::Path;

use anyhow::Context;
use tydex_engine::SubmittedFile;

/// Glob patterns collected from a package directory.
const SOURCE_PATTERNS: &[&str] = &["**/*.ts", "**/*.tsx"];

/// Read a package directory into submission records.
///
/// Collects TypeScript sources; the manifest travels separately, see
/// [`read_manifest`]. Files under `node_modules` or hidden directories
/// are skipped; the package's own `dist/` output is kept because
/// manifests routinely point at it.
pub fn gather_package(root: &Path) -> anyhow::Result<Vec<SubmittedFile>> {
    let mut files = Vec::new();

    for pattern in SOURCE_PATTERNS {
        let full = root.join(pattern).to_string_lossy().into_owned();
        for entry in
            glob::glob(&full).with_context(|| format!("invalid glob pattern {}", full))?
        {
            let path = entry?;
            if skipped(&path, root) {
                continue;
            }
            let name = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .to_string_lossy()
                .replace('\\', "/");
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            files.push(SubmittedFile { name, content });
        }
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

/// The package's manifest text, when the directory has one.
pub fn read_manifest(root: &Path) -> anyhow::Result<Option<String>> {
    let manifest = root.join("package.json");
    if !manifest.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(&manifest)
        .with_context(|| format!("failed to read {}", manifest.display()))?;
    Ok(Some(content))
}

/// Whether a gathered path sits under `node_modules` or a hidden
/// directory.
fn skipped(path: &Path, root: &Path) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.components().any(|component| {
        let name = component.as_os_str().to_string_lossy();
        name == "node_modules" || name.starts_with('.')
    })
}
