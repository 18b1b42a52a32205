use std::path::PathBuf;

use thiserror::Error;

use crate::identifier::{LocalIdent, ModuleIdent};

// malformed source; line and column are 1-based, offset is in bytes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}, column {column}: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl SyntaxError {
    pub fn at(source: &str, offset: usize, message: impl Into<String>) -> Self {
        let offset = offset.min(source.len());
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = source[line_start..offset].chars().count() + 1;
        SyntaxError {
            message: message.into(),
            offset,
            line,
            column,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("syntax error at {0}")]
    Syntax(#[from] SyntaxError),
    #[error("syntax error in module {module} at {error}")]
    ModuleSyntax {
        module: ModuleIdent,
        error: SyntaxError,
    },
    #[error("\"{name}\" is defined more than once")]
    DuplicateDefinition { name: LocalIdent },
    #[error("\"{name}\" is not defined. Defined identifiers are:{}", list_names(.defined))]
    UndefinedName {
        name: LocalIdent,
        defined: Vec<LocalIdent>,
    },
    #[error("no such module: {0}")]
    UnknownModule(ModuleIdent),
    #[error("module {module} not found at {}", .path.display())]
    ModuleNotFound { module: ModuleIdent, path: PathBuf },
    #[error("cannot read {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },
    #[error("invalid numeral: {0}")]
    InvalidNumeral(String),
    #[error("numeral {value} exceeds the limit of {limit}")]
    NumeralTooLarge { value: usize, limit: usize },
    #[error("evaluation did not converge after {steps} steps")]
    DidNotConverge { steps: usize },
}

fn list_names(names: &[LocalIdent]) -> String {
    names.iter().map(|n| format!("\n  {}", n)).collect()
}

pub type Result<T> = std::result::Result<T, Error>;
