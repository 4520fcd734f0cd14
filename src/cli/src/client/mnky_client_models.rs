use indexmap::IndexMap;
use mnky_lib::managers::{InlineRule, UrlRule};
use mnky_lib::{ApplyStats, Diagnostic, DocumentSnapshot, Variable};
use serde::Serialize;
use std::path::PathBuf;

/// A `.mnky` file found below the source path.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path relative to the source directory, without extension.
    pub name: String,
    pub path: PathBuf,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigurationInfo {
    pub name: String,
    pub file: String,
    pub include: Vec<String>,
    pub imports: Vec<String>,
    pub commands: usize,
    pub template: bool,
    pub deprecated: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigurationDetails {
    pub name: String,
    pub file: String,
    pub options: IndexMap<String, Vec<String>>,
    pub imports: Vec<String>,
    pub namespaces: Vec<String>,
    pub variables: Vec<Variable>,
    pub commands: usize,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureView {
    pub configuration: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub location: String,
    pub started: usize,
    pub ticks: u32,
    pub undo_length: usize,
    pub applied: Vec<ApplyStats>,
    pub failures: Vec<FailureView>,
    pub url_rules: Vec<UrlRule>,
    pub inline_rules: Vec<InlineRule>,
    pub document: DocumentSnapshot,
}

pub struct RunConfig {
    pub source_path: String,
    pub names: Vec<String>,
    pub document_path: String,
    pub ticks: u32,
    pub interval_ms: u64,
    pub with_undo: bool,
    pub undo_limit: usize,
    pub revert: bool,
    pub variables: Vec<String>,
}
