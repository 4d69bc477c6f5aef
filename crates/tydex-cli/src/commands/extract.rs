//! `tydex extract` — run the pipeline over a package directory.

use std::fs;
use std::path::Path;

use anyhow::Context;
use tydex_engine::{extract_declarations, DeclarationResult, ExtractOptions};

use super::files::{gather_package, read_manifest};

#[allow(clippy::too_many_arguments)]
pub fn execute(
    dir: String,
    out_dir: String,
    json: bool,
    no_filter: bool,
    no_externals: bool,
    declaration_map: bool,
    timeout_ms: u64,
    verbose: bool,
) -> anyhow::Result<()> {
    let root = Path::new(&dir);
    let files = gather_package(root)?;
    if files.is_empty() {
        anyhow::bail!("no TypeScript sources found under {}", root.display());
    }
    let manifest_text = read_manifest(root)?;

    let options = ExtractOptions {
        filter_to_exports: !no_filter,
        resolve_external_dependencies: !no_externals,
        include_declaration_map: declaration_map,
        timeout_ms,
        ..ExtractOptions::default()
    };
    let result = extract_declarations(files, manifest_text, options);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        write_outputs(&result, Path::new(&out_dir))?;
        report(&result, &out_dir, verbose);
    }

    if !result.success {
        anyhow::bail!("extraction failed with {} error(s)", result.errors.len());
    }
    Ok(())
}

fn write_outputs(result: &DeclarationResult, out_dir: &Path) -> anyhow::Result<()> {
    for (path, content) in &result.files {
        let target = out_dir.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&target, content)
            .with_context(|| format!("failed to write {}", target.display()))?;
    }
    Ok(())
}

fn report(result: &DeclarationResult, out_dir: &str, verbose: bool) {
    for warning in &result.warnings {
        eprintln!("warning: {}", warning);
    }
    for error in &result.errors {
        eprintln!("error: {}", error);
    }
    if verbose {
        for note in &result.notes {
            println!("note: {}", note);
        }
    }
    println!(
        "Wrote {} declaration file(s) to {}",
        result.files.len(),
        out_dir
    );
}
