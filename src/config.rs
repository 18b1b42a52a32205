use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::identifier::{AbsoluteIdent, LocalIdent, ModuleIdent};
use crate::loader::{DEFAULT_EXTENSION, FsSource};

pub const DEFAULT_MODULE: &str = "main";
pub const DEFAULT_DEFINITION: &str = "main";
pub const DEFAULT_SERVER_STEPS: usize = 100_000;
pub const DEFAULT_SERVER_NUMERAL: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("empty entry point")]
    EmptyEntry,
    #[error("invalid definition name {0:?}")]
    InvalidName(String),
    #[error("cannot derive a module name from {}", .0.display())]
    NoModuleName(PathBuf),
}

fn is_name(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// What to evaluate: `PATH[:NAME]`.
// `PATH` is either a module file (`dir/lib.lcalc` loads module `lib` with
// `dir` as the root) or a directory (module `main` inside it). `NAME`
// defaults to `main`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub root: PathBuf,
    pub module: ModuleIdent,
    pub name: LocalIdent,
    // extension of the entry file, when one was given
    pub extension: Option<String>,
}

impl EntryPoint {
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        if text.is_empty() {
            return Err(ConfigError::EmptyEntry);
        }
        let (path, name) = match text.rsplit_once(':') {
            // a colon followed by a path separator belongs to the path (`C:\...`)
            Some((path, name)) if !name.contains(['/', '\\']) => {
                if !is_name(name) {
                    return Err(ConfigError::InvalidName(name.to_string()));
                }
                (path, name)
            }
            _ => (text, DEFAULT_DEFINITION),
        };
        let path = Path::new(if path.is_empty() { "." } else { path });
        Self::from_path(path, name)
    }

    fn from_path(path: &Path, name: &str) -> Result<Self, ConfigError> {
        if path.is_dir() {
            return Ok(EntryPoint {
                root: path.to_path_buf(),
                module: ModuleIdent::new(DEFAULT_MODULE),
                name: LocalIdent::new(name),
                extension: None,
            });
        }
        let module = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| is_name(stem))
            .ok_or_else(|| ConfigError::NoModuleName(path.to_path_buf()))?;
        let root = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Ok(EntryPoint {
            root,
            module: ModuleIdent::new(module),
            name: LocalIdent::new(name),
            extension: path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(str::to_string),
        })
    }

    pub fn absolute(&self) -> AbsoluteIdent {
        AbsoluteIdent::new(self.module.clone(), self.name.clone())
    }
}

// Settings for evaluating one program from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub entry: EntryPoint,
    pub extension: String,
    pub max_steps: Option<usize>,
    pub annotate: bool,
}

impl RunConfig {
    pub fn new(entry: EntryPoint) -> Self {
        let extension = entry
            .extension
            .clone()
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
        RunConfig {
            entry,
            extension,
            max_steps: None,
            annotate: false,
        }
    }

    pub fn source(&self) -> FsSource {
        FsSource::new(&self.entry.root, &self.extension)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    // upper bound for every request, whatever the request asks for
    pub max_steps: usize,
    // largest numeral literal a request may use
    pub max_numeral: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            max_steps: DEFAULT_SERVER_STEPS,
            max_numeral: DEFAULT_SERVER_NUMERAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_entry() {
        let entry = EntryPoint::parse("programs/arith.lcalc:double").unwrap();
        assert_eq!(entry.root, PathBuf::from("programs"));
        assert_eq!(entry.module, ModuleIdent::new("arith"));
        assert_eq!(entry.name, LocalIdent::new("double"));
        assert_eq!(entry.extension.as_deref(), Some("lcalc"));
        assert_eq!(entry.absolute().to_string(), "arith/double");
    }

    #[test]
    fn default_name_is_main() {
        let entry = EntryPoint::parse("lib.lc").unwrap();
        assert_eq!(entry.root, PathBuf::from("."));
        assert_eq!(entry.module, ModuleIdent::new("lib"));
        assert_eq!(entry.name, LocalIdent::new("main"));
        let config = RunConfig::new(entry);
        assert_eq!(config.extension, "lc");
    }

    #[test]
    fn directory_entry() {
        let dir = std::env::temp_dir();
        let text = format!("{}:start", dir.display());
        let entry = EntryPoint::parse(&text).unwrap();
        assert_eq!(entry.root, dir);
        assert_eq!(entry.module, ModuleIdent::new("main"));
        assert_eq!(entry.name, LocalIdent::new("start"));
        let config = RunConfig::new(entry);
        assert_eq!(config.extension, DEFAULT_EXTENSION);
        assert_eq!(config.source().root(), dir.as_path());
    }

    #[test]
    fn invalid_entries() {
        assert_eq!(EntryPoint::parse(""), Err(ConfigError::EmptyEntry));
        assert_eq!(
            EntryPoint::parse("main.lcalc:no-dash"),
            Err(ConfigError::InvalidName("no-dash".to_string()))
        );
        assert!(matches!(
            EntryPoint::parse("weird-name.lcalc"),
            Err(ConfigError::NoModuleName(_))
        ));
    }
}
