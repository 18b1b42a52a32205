use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::elaborator::Elaborator;
use crate::error::{Error, Result};
use crate::identifier::{AbsoluteIdent, ModuleIdent};
use crate::kernel::Expr;
use crate::namespace::Namespace;
use crate::numerals::ChurchNumerals;
use crate::parser;

// Result of a step-counted evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub normal_form: Expr,
    pub steps: usize,
}

// A fixed set of linked modules.
// Building a context links every namespace against its own module name;
// afterwards it is only read from.
#[derive(Debug, Default)]
pub struct Context {
    namespaces: HashMap<ModuleIdent, Namespace>,
    numerals: Rc<ChurchNumerals>,
}

impl Context {
    pub fn new(namespaces: HashMap<ModuleIdent, Namespace>) -> Self {
        Self::with_numerals(namespaces, ChurchNumerals::shared())
    }

    pub fn with_numerals(
        namespaces: HashMap<ModuleIdent, Namespace>,
        numerals: Rc<ChurchNumerals>,
    ) -> Self {
        let namespaces = namespaces
            .into_iter()
            .map(|(module, namespace)| {
                let linked = namespace.link(&module);
                (module, linked)
            })
            .collect();
        Context {
            namespaces,
            numerals,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    // Parses every `(module name, source)` pair and links the result.
    pub fn from_sources<'a, I>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let elaborator = Elaborator::new();
        let mut namespaces = HashMap::new();
        for (name, source) in sources {
            let module = parser::parse_module(source)?;
            namespaces.insert(ModuleIdent::new(name), elaborator.elab_module(&module)?);
        }
        Ok(Self::new(namespaces))
    }

    pub fn modules(&self) -> impl Iterator<Item = &ModuleIdent> {
        self.namespaces.keys()
    }

    pub fn numerals(&self) -> &Rc<ChurchNumerals> {
        &self.numerals
    }

    pub fn get_namespace(&self, module: &ModuleIdent) -> Result<&Namespace> {
        self.namespaces
            .get(module)
            .ok_or_else(|| Error::UnknownModule(module.clone()))
    }

    // Resolves a reference: digit names are numerals, everything else is
    // looked up in its module.
    pub fn get_def(&self, ident: &AbsoluteIdent) -> Result<Expr> {
        if ident.local.is_numeral() {
            let numeral = self.numerals.parse(ident.local.name())?;
            return Ok(numeral.as_ref().clone());
        }
        let namespace = self.get_namespace(&ident.module)?;
        namespace.get_def(&ident.local).cloned()
    }

    // Reduces the definition of `entry` until a step no longer changes it.
    // This does not terminate for terms without a normal form.
    pub fn eval(&self, entry: &AbsoluteIdent) -> Result<Expr> {
        let expr = self.get_def(entry)?;
        Ok(self.normalize(expr, None)?.normal_form)
    }

    // Like `eval` but gives up after `max_steps` reductions.
    pub fn eval_bounded(&self, entry: &AbsoluteIdent, max_steps: usize) -> Result<Evaluation> {
        let expr = self.get_def(entry)?;
        self.normalize(expr, Some(max_steps))
    }

    pub fn normalize(&self, expr: Expr, max_steps: Option<usize>) -> Result<Evaluation> {
        let mut current = expr;
        let mut steps = 0;
        loop {
            let next = current.beta(self)?;
            if next == current {
                break;
            }
            if let Some(max) = max_steps
                && steps >= max
            {
                debug!(steps, "step limit reached");
                return Err(Error::DidNotConverge { steps });
            }
            steps += 1;
            trace!(step = steps, term = %next, "beta");
            current = next;
        }
        // a fixpoint that still holds a redex reproduces itself forever
        if !current.is_normal() {
            debug!(steps, term = %current, "self-reproducing term");
            return Err(Error::DidNotConverge { steps });
        }
        debug!(steps, "reached normal form");
        Ok(Evaluation {
            normal_form: current,
            steps,
        })
    }
}
