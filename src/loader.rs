// module sources, and loading a module with everything it imports

use std::collections::{HashMap, HashSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::debug;

use crate::context::Context;
use crate::elaborator::Elaborator;
use crate::error::{Error, Result};
use crate::identifier::ModuleIdent;
use crate::namespace::Namespace;
use crate::numerals::ChurchNumerals;
use crate::parser;

pub const DEFAULT_EXTENSION: &str = "lcalc";

// Where module source text comes from.
pub trait ModuleSource {
    fn load(&self, module: &ModuleIdent) -> Result<String>;
}

// Reads `<root>/<module>.<extension>`.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
    extension: String,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        FsSource {
            root: root.into(),
            extension: extension.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, module: &ModuleIdent) -> PathBuf {
        self.root
            .join(format!("{}.{}", module.name(), self.extension))
    }
}

impl ModuleSource for FsSource {
    fn load(&self, module: &ModuleIdent) -> Result<String> {
        let path = self.path_for(module);
        debug!(module = %module, path = %path.display(), "reading module");
        std::fs::read_to_string(&path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => Error::ModuleNotFound {
                module: module.clone(),
                path,
            },
            _ => Error::Io {
                path,
                message: err.to_string(),
            },
        })
    }
}

// Module sources held in memory, keyed by module name.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    sources: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(name, source);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.sources.insert(name.into(), source.into());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemorySource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        MemorySource {
            sources: iter
                .into_iter()
                .map(|(name, source)| (name.into(), source.into()))
                .collect(),
        }
    }
}

impl ModuleSource for MemorySource {
    fn load(&self, module: &ModuleIdent) -> Result<String> {
        self.sources
            .get(module.name())
            .cloned()
            .ok_or_else(|| Error::ModuleNotFound {
                module: module.clone(),
                path: PathBuf::from(module.name()),
            })
    }
}

// Loads a module and, transitively, every module it imports.
pub struct ModuleLoader<S> {
    source: S,
    elaborator: Elaborator,
    numerals: Rc<ChurchNumerals>,
}

impl<S: ModuleSource> ModuleLoader<S> {
    pub fn new(source: S) -> Self {
        ModuleLoader {
            source,
            elaborator: Elaborator::new(),
            numerals: ChurchNumerals::shared(),
        }
    }

    // numeral table handed to every loaded context
    pub fn with_numerals(mut self, numerals: Rc<ChurchNumerals>) -> Self {
        self.numerals = numerals;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn load_namespace(&self, module: &ModuleIdent) -> Result<Namespace> {
        debug!(module = %module, "loading module");
        let text = self.source.load(module)?;
        let parsed = parser::parse_module(&text).map_err(|error| Error::ModuleSyntax {
            module: module.clone(),
            error,
        })?;
        self.elaborator.elab_module(&parsed)
    }

    // Every module reachable from `start` through imports, each loaded once.
    // Import cycles are fine: a module already seen is never queued again.
    pub fn load_all(&self, start: &ModuleIdent) -> Result<HashMap<ModuleIdent, Namespace>> {
        let mut namespaces = HashMap::new();
        let mut seen = HashSet::from([start.clone()]);
        let mut to_load = vec![start.clone()];
        while let Some(module) = to_load.pop() {
            let namespace = self.load_namespace(&module)?;
            for import in namespace.imports() {
                if seen.insert(import.module.clone()) {
                    to_load.push(import.module.clone());
                }
            }
            namespaces.insert(module, namespace);
        }
        debug!(modules = namespaces.len(), "all imports loaded");
        Ok(namespaces)
    }

    pub fn load_context(&self, start: &ModuleIdent) -> Result<Context> {
        Ok(Context::with_numerals(
            self.load_all(start)?,
            Rc::clone(&self.numerals),
        ))
    }
}
