use std::fmt::Display;

use crate::{
    identifier::{AbsoluteIdent, LocalIdent, ModuleIdent},
    kernel::Expr,
    namespace::Namespace,
    surface::{Declaration, Module, TermAST},
};

impl Display for LocalIdent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Display for ModuleIdent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Display for AbsoluteIdent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.module, self.local)
    }
}

// `{...}` markers are comments in the grammar, so annotated output still parses
fn write_expr(f: &mut std::fmt::Formatter<'_>, expr: &Expr, annotate: bool) -> std::fmt::Result {
    match expr {
        Expr::Var { name, index } => {
            if annotate {
                write!(f, "{{<-{}}}", index)?;
            }
            write!(f, "{}", name)
        }
        Expr::Unresolved(local) => {
            if annotate {
                write!(f, "{{locref}}")?;
            }
            write!(f, "{}", local)
        }
        Expr::Ref(ident) => {
            if annotate {
                write!(f, "{{absref}}")?;
            }
            write!(f, "{}", ident)
        }
        Expr::Abs { param, body } => {
            write!(f, "λ{}.", param)?;
            write_expr(f, body, annotate)
        }
        Expr::App { func, arg } => {
            // a lambda in head position would swallow the argument
            if matches!(**func, Expr::Abs { .. }) {
                write!(f, "(")?;
                write_expr(f, func, annotate)?;
                write!(f, ")")?;
            } else {
                write_expr(f, func, annotate)?;
            }
            write!(f, " ")?;
            if matches!(**arg, Expr::App { .. }) {
                write!(f, "(")?;
                write_expr(f, arg, annotate)?;
                write!(f, ")")
            } else {
                write_expr(f, arg, annotate)
            }
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write_expr(f, self, false)
    }
}

// Renders an expression with de Bruijn indices and reference kinds.
pub struct Annotated<'a>(&'a Expr);

impl Display for Annotated<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write_expr(f, self.0, true)
    }
}

impl Expr {
    pub fn annotated(&self) -> Annotated<'_> {
        Annotated(self)
    }
}

impl Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for import in self.imports() {
            writeln!(f, "import {};", import.module)?;
        }
        for name in self.names() {
            if let Ok(expr) = self.get_def(&name) {
                writeln!(f, "{} = {};", name, expr)?;
            }
        }
        Ok(())
    }
}

impl Display for TermAST {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TermAST::Identifier(name) => write!(f, "{}", name),
            TermAST::Access { module_name, name } => {
                write!(f, "{}/{}", module_name, name)
            }
            TermAST::Abs { param, body } => {
                write!(f, "(λ{}.{})", param, body)
            }
            TermAST::App { func, arg } => {
                write!(f, "({} {})", func, arg)
            }
        }
    }
}

impl Display for Declaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Declaration::Definition { name, term } => {
                write!(f, "{} = {};", name, term)
            }
            Declaration::Import { module_name } => {
                write!(f, "import {};", module_name)
            }
        }
    }
}

impl Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for declaration in &self.body {
            writeln!(f, "{}", declaration)?;
        }
        Ok(())
    }
}
