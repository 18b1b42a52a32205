use std::sync::Arc;

// name of a definition, only meaningful inside one module
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalIdent(Arc<str>);

impl LocalIdent {
    pub fn new(name: &str) -> Self {
        LocalIdent(Arc::from(name))
    }
    pub fn name(&self) -> &str {
        &self.0
    }
    // `true` for a non-empty run of decimal digits, which names a Church numeral.
    pub fn is_numeral(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_digit())
    }
}

// key into the set of loaded modules
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleIdent(Arc<str>);

impl ModuleIdent {
    pub fn new(name: &str) -> Self {
        ModuleIdent(Arc::from(name))
    }
    pub fn name(&self) -> &str {
        &self.0
    }
}

// the only kind of free reference left after linking
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AbsoluteIdent {
    pub module: ModuleIdent,
    pub local: LocalIdent,
}

impl AbsoluteIdent {
    pub fn new(module: ModuleIdent, local: LocalIdent) -> Self {
        AbsoluteIdent { module, local }
    }

    // Parses `module/name`; a bare `name` is taken relative to `default_module`.
    pub fn parse(text: &str, default_module: &ModuleIdent) -> Self {
        match text.split_once('/') {
            Some((module, local)) => {
                AbsoluteIdent::new(ModuleIdent::new(module), LocalIdent::new(local))
            }
            None => AbsoluteIdent::new(default_module.clone(), LocalIdent::new(text)),
        }
    }
}
