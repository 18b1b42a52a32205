use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::identifier::{LocalIdent, ModuleIdent};
use crate::kernel::Expr;

// one top-level definition
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub name: LocalIdent,
    pub expr: Expr,
}

impl Statement {
    pub fn new(name: LocalIdent, expr: Expr) -> Self {
        Statement { name, expr }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    pub module: ModuleIdent,
}

impl ImportDecl {
    pub fn new(module: ModuleIdent) -> Self {
        ImportDecl { module }
    }
}

// The definitions of a single module together with its imports.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Namespace {
    definitions: HashMap<LocalIdent, Expr>,
    imports: Vec<ImportDecl>,
}

impl Namespace {
    pub fn new(imports: Vec<ImportDecl>, statements: Vec<Statement>) -> Result<Self> {
        let mut definitions = HashMap::with_capacity(statements.len());
        for Statement { name, expr } in statements {
            if definitions.contains_key(&name) {
                return Err(Error::DuplicateDefinition { name });
            }
            definitions.insert(name, expr);
        }
        Ok(Namespace {
            definitions,
            imports,
        })
    }

    // Returns the namespace with every definition linked against `module`.
    pub fn link(self, module: &ModuleIdent) -> Namespace {
        let definitions = self
            .definitions
            .into_iter()
            .map(|(name, expr)| {
                let linked = expr.link(module);
                (name, linked)
            })
            .collect();
        Namespace {
            definitions,
            imports: self.imports,
        }
    }

    pub fn has_def(&self, name: &LocalIdent) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn get_def(&self, name: &LocalIdent) -> Result<&Expr> {
        self.definitions
            .get(name)
            .ok_or_else(|| Error::UndefinedName {
                name: name.clone(),
                defined: self.names(),
            })
    }

    // Defined names in sorted order.
    pub fn names(&self) -> Vec<LocalIdent> {
        let mut names: Vec<LocalIdent> = self.definitions.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn imports(&self) -> &[ImportDecl] {
        &self.imports
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
