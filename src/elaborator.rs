use crate::error::Result;
use crate::identifier::{AbsoluteIdent, LocalIdent, ModuleIdent};
use crate::kernel::Expr;
use crate::namespace::{ImportDecl, Namespace, Statement};
use crate::surface::{Module, TermAST};

// surface syntax -> kernel terms
//   - names bound by an enclosing lambda become de Bruijn indices
//   - any other bare name stays unresolved until the module is linked
pub struct Elaborator {}

impl Default for Elaborator {
    fn default() -> Self {
        Self::new()
    }
}

impl Elaborator {
    pub fn new() -> Self {
        Elaborator {}
    }

    pub fn elab_expr(&self, expr: &TermAST) -> Expr {
        let mut binders = Vec::new();
        self.elab_under(expr, &mut binders)
    }

    fn elab_under(&self, expr: &TermAST, binders: &mut Vec<LocalIdent>) -> Expr {
        match expr {
            TermAST::Identifier(name) => {
                match binders.iter().rev().position(|b| b.name() == name) {
                    Some(index) => Expr::Var {
                        name: LocalIdent::new(name),
                        index,
                    },
                    None => Expr::Unresolved(LocalIdent::new(name)),
                }
            }
            TermAST::Access { module_name, name } => Expr::Ref(AbsoluteIdent::new(
                ModuleIdent::new(module_name),
                LocalIdent::new(name),
            )),
            TermAST::Abs { param, body } => {
                let param = LocalIdent::new(param);
                binders.push(param.clone());
                let body = self.elab_under(body, binders);
                binders.pop();
                Expr::Abs {
                    param,
                    body: Box::new(body),
                }
            }
            TermAST::App { func, arg } => Expr::App {
                func: Box::new(self.elab_under(func, binders)),
                arg: Box::new(self.elab_under(arg, binders)),
            },
        }
    }

    pub fn elab_module(&self, module: &Module) -> Result<Namespace> {
        let imports = module
            .imports()
            .map(|name| ImportDecl::new(ModuleIdent::new(name)))
            .collect();
        let statements = module
            .definitions()
            .map(|(name, term)| Statement::new(LocalIdent::new(name), self.elab_expr(term)))
            .collect();
        Namespace::new(imports, statements)
    }
}
