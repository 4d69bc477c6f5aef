//! Export-closure filtering of emitted declarations.
//!
//! A package's declaration output can be much wider than its public
//! surface: internal helpers, test fixtures, build scripts. When entry
//! points are known from the manifest, the pipeline walks the relative
//! import graph from those entries and keeps only the declaration files
//! the walk reaches. Bare specifiers never extend the closure; external
//! packages have their own declarations.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::emit::{declaration_output_path, module_specifiers, Program};
use crate::host::{module_candidates, SOURCE_EXTENSIONS};
use crate::store::normalize_path;

/// Walk the relative import graph from the located entry points and
/// collect the declaration output paths of every file reached.
///
/// Entry points that match no program file are skipped. Returns `None`
/// when nothing was reachable at all, in which case callers keep the
/// unfiltered output rather than returning an empty result.
pub fn export_closure(program: &Program, entry_points: &[String]) -> Option<FxHashSet<String>> {
    let mut relevant: FxHashSet<String> = FxHashSet::default();
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut stack: Vec<String> = Vec::new();

    for entry in entry_points {
        for candidate in entry_candidates(entry) {
            if program.get(&candidate).is_some() {
                stack.push(candidate);
                break;
            }
        }
    }

    while let Some(path) = stack.pop() {
        let file = match program.get(&path) {
            Some(file) => file,
            None => continue,
        };
        // Relevance is recorded before the visited check: a path is part
        // of the surface the moment any walk reaches it.
        relevant.insert(declaration_output_path(&file.path));
        if !visited.insert(path) {
            continue;
        }
        for (specifier, _) in module_specifiers(&file.module) {
            if !specifier.starts_with('.') {
                continue;
            }
            for candidate in module_candidates(specifier, &file.path) {
                if program.get(&candidate).is_some() {
                    stack.push(candidate);
                    break;
                }
            }
        }
    }

    if relevant.is_empty() {
        None
    } else {
        Some(relevant)
    }
}

/// Drop outputs outside the closure. A `.d.ts.map` follows its
/// declaration file.
pub fn retain_relevant(outputs: &mut FxHashMap<String, String>, relevant: &FxHashSet<String>) {
    outputs.retain(|path, _| match path.strip_suffix(".map") {
        Some(stem) => relevant.contains(stem),
        None => relevant.contains(path),
    });
}

/// Candidate program paths for one manifest entry point, in probe order:
/// the literal path, alternate extensions for rewritten ones, appended
/// extensions for extensionless ones, then index files underneath.
fn entry_candidates(entry: &str) -> Vec<String> {
    let entry = normalize_path(entry);
    let mut candidates = vec![entry.clone()];
    if let Some(stem) = entry.strip_suffix(".ts") {
        if !entry.ends_with(".d.ts") {
            candidates.push(format!("{}.tsx", stem));
            candidates.push(format!("{}.d.ts", stem));
        }
    } else {
        for ext in SOURCE_EXTENSIONS {
            candidates.push(format!("{}{}", entry, ext));
        }
    }
    for ext in SOURCE_EXTENSIONS {
        candidates.push(format!("{}/index{}", entry, ext));
    }
    candidates
}
