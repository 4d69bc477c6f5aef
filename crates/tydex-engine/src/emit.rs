//! Compiler options, diagnostics, and the program driver.
//!
//! [`Program`] plays the role a full compiler's program object plays in
//! the pipeline: it parses every submitted root against a
//! [`CompilerHost`], resolves the modules those roots import, and emits
//! declaration output back through the host. Diagnostics accumulate
//! instead of aborting; the only thing that withholds emit entirely is
//! `noEmitOnError` with errors present, and that is off by default.

use std::fmt;

use rustc_hash::FxHashMap;
use serde_json::json;
use tydex_parser::ast::Statement;
use tydex_parser::{Module, Span};

use crate::host::CompilerHost;
use crate::manifest::CompilerOverrides;
use crate::printer;
use crate::store::normalize_path;

/// Effective compiler options for an extraction run.
///
/// Defaults are deliberately lenient so that declaration output is
/// produced for as many packages as possible; a manifest's
/// `compilerOptions` block can override the recognized subset.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilerOptions {
    pub declaration: bool,
    pub emit_declaration_only: bool,
    pub skip_lib_check: bool,
    pub strict: bool,
    pub no_emit_on_error: bool,
    pub target: String,
    pub module: String,
    pub module_resolution: String,
    pub jsx_factory: String,
    pub jsx_fragment: String,
    pub declaration_map: bool,
}

impl CompilerOptions {
    /// The tolerant defaults used for extraction.
    pub fn tolerant() -> Self {
        Self {
            declaration: true,
            emit_declaration_only: true,
            skip_lib_check: true,
            strict: false,
            no_emit_on_error: false,
            target: "ES2022".to_string(),
            module: "ESNext".to_string(),
            module_resolution: "node".to_string(),
            jsx_factory: "React.createElement".to_string(),
            jsx_fragment: "React.Fragment".to_string(),
            declaration_map: false,
        }
    }

    /// Overlay a manifest's `compilerOptions` onto these options.
    pub fn apply(&mut self, overrides: &CompilerOverrides) {
        if let Some(value) = overrides.declaration {
            self.declaration = value;
        }
        if let Some(value) = overrides.emit_declaration_only {
            self.emit_declaration_only = value;
        }
        if let Some(value) = overrides.skip_lib_check {
            self.skip_lib_check = value;
        }
        if let Some(value) = overrides.strict {
            self.strict = value;
        }
        if let Some(value) = overrides.no_emit_on_error {
            self.no_emit_on_error = value;
        }
        if let Some(value) = overrides.declaration_map {
            self.declaration_map = value;
        }
        if let Some(value) = &overrides.target {
            self.target = value.clone();
        }
        if let Some(value) = &overrides.module {
            self.module = value.clone();
        }
        if let Some(value) = &overrides.module_resolution {
            self.module_resolution = value.clone();
        }
        if let Some(value) = &overrides.jsx_factory {
            self.jsx_factory = value.clone();
        }
        if let Some(value) = &overrides.jsx_fragment {
            self.jsx_fragment = value.clone();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Error,
    Warning,
    Message,
}

/// A located compiler message.
///
/// Renders as `file:line,col: message`, or the bare message for
/// diagnostics with no file position.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub file: Option<String>,
    pub line: u32,
    pub column: u32,
    pub category: DiagnosticCategory,
    pub message: String,
}

impl Diagnostic {
    pub fn located(category: DiagnosticCategory, file: &str, span: Span, message: String) -> Self {
        Self {
            file: Some(file.to_string()),
            line: span.line,
            column: span.column,
            category,
            message,
        }
    }

    pub fn global(category: DiagnosticCategory, message: String) -> Self {
        Self {
            file: None,
            line: 0,
            column: 0,
            category,
            message,
        }
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{},{}: {}", file, self.line, self.column, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Split diagnostics into formatted error and warning lists. Messages
/// land with the warnings.
pub fn partition_diagnostics(diagnostics: &[Diagnostic]) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    for diagnostic in diagnostics {
        match diagnostic.category {
            DiagnosticCategory::Error => errors.push(diagnostic.to_string()),
            DiagnosticCategory::Warning | DiagnosticCategory::Message => {
                warnings.push(diagnostic.to_string())
            }
        }
    }
    (errors, warnings)
}

/// One parsed member of a program.
#[derive(Debug)]
pub struct SourceFile {
    pub path: String,
    pub text: String,
    pub module: Module,
    /// Declaration inputs pass through emit unmodified.
    pub is_declaration: bool,
}

/// The submitted roots, parsed once, plus everything module resolution
/// learned about them.
#[derive(Debug)]
pub struct Program {
    files: Vec<SourceFile>,
    index: FxHashMap<String, usize>,
    options: CompilerOptions,
    diagnostics: Vec<Diagnostic>,
}

/// Result of an emit pass.
#[derive(Debug)]
pub struct EmitResult {
    pub diagnostics: Vec<Diagnostic>,
    pub emit_skipped: bool,
}

impl Program {
    /// Parse every root and resolve the modules the roots import.
    ///
    /// Resolution failures become diagnostics, never aborts: a missing
    /// relative target is an error, missing external type declarations
    /// only a warning.
    pub fn build<H: CompilerHost>(roots: &[String], host: &H, options: CompilerOptions) -> Program {
        let mut files: Vec<SourceFile> = Vec::with_capacity(roots.len());
        let mut index: FxHashMap<String, usize> = FxHashMap::default();
        let mut diagnostics = Vec::new();

        for root in roots {
            let path = normalize_path(root);
            if index.contains_key(&path) {
                continue;
            }
            let text = match host.source_text(&path) {
                Some(text) => text.to_string(),
                None => {
                    diagnostics.push(Diagnostic::global(
                        DiagnosticCategory::Error,
                        format!("File '{}' not found.", path),
                    ));
                    continue;
                }
            };
            let (module, errors) = tydex_parser::parse_module(&text);
            for error in &errors {
                diagnostics.push(Diagnostic::located(
                    DiagnosticCategory::Error,
                    &path,
                    error.span,
                    error.message.clone(),
                ));
            }
            index.insert(path.clone(), files.len());
            files.push(SourceFile {
                is_declaration: path.ends_with(".d.ts"),
                path,
                text,
                module,
            });
        }

        for file in &files {
            for (specifier, span) in module_specifiers(&file.module) {
                if host.resolve_module(specifier, &file.path).is_some() {
                    continue;
                }
                let category = if specifier.starts_with('.') {
                    DiagnosticCategory::Error
                } else {
                    DiagnosticCategory::Warning
                };
                diagnostics.push(Diagnostic::located(
                    category,
                    &file.path,
                    span,
                    format!(
                        "Cannot find module '{}' or its corresponding type declarations.",
                        specifier
                    ),
                ));
            }
        }

        Program {
            files,
            index,
            options,
            diagnostics,
        }
    }

    /// Print declaration output for every non-declaration file and hand
    /// it to the host. Declaration inputs are copied through as their
    /// own output.
    pub fn emit<H: CompilerHost>(&self, host: &mut H) -> EmitResult {
        let mut diagnostics = self.diagnostics.clone();

        if !self.options.declaration {
            diagnostics.push(Diagnostic::global(
                DiagnosticCategory::Error,
                "Declaration emit is disabled by compilerOptions.".to_string(),
            ));
            return EmitResult {
                diagnostics,
                emit_skipped: true,
            };
        }
        if self.options.no_emit_on_error && diagnostics.iter().any(Diagnostic::is_error) {
            return EmitResult {
                diagnostics,
                emit_skipped: true,
            };
        }

        for file in &self.files {
            if file.is_declaration {
                host.write_output(&file.path, &file.text);
                continue;
            }
            let printed = printer::print_declarations(&file.path, &file.text, &file.module);
            diagnostics.extend(printed.diagnostics);
            let output_path = declaration_output_path(&file.path);
            if self.options.declaration_map {
                let map_path = format!("{}.map", output_path);
                let text = format!(
                    "{}//# sourceMappingURL={}\n",
                    printed.text,
                    basename(&map_path)
                );
                host.write_output(&output_path, &text);
                host.write_output(&map_path, &declaration_map(&output_path, &file.path));
            } else {
                host.write_output(&output_path, &printed.text);
            }
        }

        EmitResult {
            diagnostics,
            emit_skipped: false,
        }
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn get(&self, path: &str) -> Option<&SourceFile> {
        self.index.get(path).map(|&i| &self.files[i])
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Diagnostics gathered during build, before any emit pass.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// Module specifiers imported or re-exported at the top level of a file,
/// with the span of the owning statement.
pub fn module_specifiers(module: &Module) -> Vec<(&str, Span)> {
    let mut specifiers = Vec::new();
    for statement in &module.statements {
        match statement {
            Statement::Import(decl) => {
                if let Some(source) = &decl.source {
                    specifiers.push((source.as_str(), decl.span));
                }
            }
            Statement::ExportNamed(decl) => {
                if let Some(source) = &decl.source {
                    specifiers.push((source.as_str(), decl.span));
                }
            }
            Statement::ExportAll(decl) => specifiers.push((decl.source.as_str(), decl.span)),
            _ => {}
        }
    }
    specifiers
}

/// Where the declaration output of a source file lands.
pub fn declaration_output_path(path: &str) -> String {
    if path.ends_with(".d.ts") {
        return path.to_string();
    }
    for ext in [".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs"] {
        if let Some(stem) = path.strip_suffix(ext) {
            return format!("{}.d.ts", stem);
        }
    }
    format!("{}.d.ts", path)
}

/// A minimal declaration source map. Mappings are left empty: the map
/// records provenance, not positions.
fn declaration_map(output_path: &str, source_path: &str) -> String {
    json!({
        "version": 3,
        "file": basename(output_path),
        "sourceRoot": "",
        "sources": [basename(source_path)],
        "names": [],
        "mappings": "",
    })
    .to_string()
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
