//! `tydex print` — declaration form of a single file, for inspection.

use std::fs;
use std::path::Path;

use anyhow::Context;
use tydex_engine::printer::print_declarations;
use tydex_parser::parse_module;

pub fn execute(file: String) -> anyhow::Result<()> {
    let path = Path::new(&file);
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let (module, errors) = parse_module(&source);
    for error in &errors {
        eprintln!("warning: {}", error);
    }

    let name = path.to_string_lossy().replace('\\', "/");
    let printed = print_declarations(&name, &source, &module);
    for diagnostic in &printed.diagnostics {
        eprintln!("warning: {}", diagnostic);
    }
    print!("{}", printed.text);
    Ok(())
}
