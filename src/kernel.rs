use crate::context::Context;
use crate::error::Result;
use crate::identifier::{AbsoluteIdent, LocalIdent, ModuleIdent};

// untyped lambda calculus with de Bruijn indices
// binder names are kept for display only
#[derive(Debug, Clone)]
pub enum Expr {
    // bound by the `index`-th enclosing abstraction, counting outward from 0
    Var {
        name: LocalIdent,
        index: usize,
    },
    // free occurrence inside a module, before linking
    Unresolved(LocalIdent),
    // free occurrence after linking (or a numeral literal)
    Ref(AbsoluteIdent),
    Abs {
        param: LocalIdent,
        body: Box<Expr>,
    },
    App {
        func: Box<Expr>,
        arg: Box<Expr>,
    },
}

// alpha-equivalence: names never take part
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Expr::Var { index: i1, .. }, Expr::Var { index: i2, .. }) => i1 == i2,
            (Expr::Unresolved(l1), Expr::Unresolved(l2)) => l1 == l2,
            (Expr::Ref(a1), Expr::Ref(a2)) => a1 == a2,
            (Expr::Abs { body: b1, .. }, Expr::Abs { body: b2, .. }) => b1 == b2,
            (
                Expr::App {
                    func: f1,
                    arg: a1,
                },
                Expr::App {
                    func: f2,
                    arg: a2,
                },
            ) => f1 == f2 && a1 == a2,
            _ => false,
        }
    }
}

impl Eq for Expr {}

impl Expr {
    pub fn var(name: &str, index: usize) -> Self {
        Expr::Var {
            name: LocalIdent::new(name),
            index,
        }
    }

    pub fn abs(param: &str, body: Expr) -> Self {
        Expr::Abs {
            param: LocalIdent::new(param),
            body: Box::new(body),
        }
    }

    pub fn app(func: Expr, arg: Expr) -> Self {
        Expr::App {
            func: Box::new(func),
            arg: Box::new(arg),
        }
    }

    // Adds `d` to every variable index at or above `cutoff`.
    // The cutoff grows by one under each abstraction, so variables bound
    // inside the term itself are left alone.
    // Panics if a negative `d` would move an index below zero; beta only
    // unshifts terms whose index 0 was just substituted away.
    pub fn shift(&self, d: isize, cutoff: usize) -> Expr {
        match self {
            Expr::Var { name, index } => {
                if *index >= cutoff {
                    let index = index
                        .checked_add_signed(d)
                        .expect("de Bruijn index shifted below zero");
                    Expr::Var {
                        name: name.clone(),
                        index,
                    }
                } else {
                    self.clone()
                }
            }
            Expr::Unresolved(_) | Expr::Ref(_) => self.clone(),
            Expr::Abs { param, body } => Expr::Abs {
                param: param.clone(),
                body: Box::new(body.shift(d, cutoff + 1)),
            },
            Expr::App { func, arg } => Expr::App {
                func: Box::new(func.shift(d, cutoff)),
                arg: Box::new(arg.shift(d, cutoff)),
            },
        }
    }

    // Replaces every variable with index `target` by `value`.
    // Under an abstraction both the target and the free variables of
    // `value` move out by one binder.
    pub fn substitute(&self, value: &Expr, target: usize) -> Expr {
        match self {
            Expr::Var { index, .. } => {
                if *index == target {
                    value.clone()
                } else {
                    self.clone()
                }
            }
            Expr::Unresolved(_) | Expr::Ref(_) => self.clone(),
            Expr::Abs { param, body } => Expr::Abs {
                param: param.clone(),
                body: Box::new(body.substitute(&value.shift(1, 0), target + 1)),
            },
            Expr::App { func, arg } => Expr::App {
                func: Box::new(func.substitute(value, target)),
                arg: Box::new(arg.substitute(value, target)),
            },
        }
    }

    // One reduction step.
    // A redex at the head of an application is contracted; otherwise both
    // sides of the application are stepped in the same pass. References are
    // replaced by their definitions.
    pub fn beta(&self, context: &Context) -> Result<Expr> {
        match self {
            Expr::Ref(ident) => context.get_def(ident),
            Expr::App { func, arg } => {
                if let Expr::Abs { body, .. } = &**func {
                    Ok(body.substitute(&arg.shift(1, 0), 0).shift(-1, 0))
                } else {
                    Ok(Expr::App {
                        func: Box::new(func.beta(context)?),
                        arg: Box::new(arg.beta(context)?),
                    })
                }
            }
            Expr::Abs { param, body } => Ok(Expr::Abs {
                param: param.clone(),
                body: Box::new(body.beta(context)?),
            }),
            Expr::Var { .. } | Expr::Unresolved(_) => Ok(self.clone()),
        }
    }

    // Resolves every unresolved reference against `module`.
    pub fn link(&self, module: &ModuleIdent) -> Expr {
        match self {
            Expr::Unresolved(local) => {
                Expr::Ref(AbsoluteIdent::new(module.clone(), local.clone()))
            }
            Expr::Var { .. } | Expr::Ref(_) => self.clone(),
            Expr::Abs { param, body } => Expr::Abs {
                param: param.clone(),
                body: Box::new(body.link(module)),
            },
            Expr::App { func, arg } => Expr::App {
                func: Box::new(func.link(module)),
                arg: Box::new(arg.link(module)),
            },
        }
    }

    // `true` when no redex and no resolved reference is left in the tree.
    pub fn is_normal(&self) -> bool {
        match self {
            Expr::Var { .. } | Expr::Unresolved(_) => true,
            Expr::Ref(_) => false,
            Expr::Abs { body, .. } => body.is_normal(),
            Expr::App { func, arg } => {
                !matches!(**func, Expr::Abs { .. }) && func.is_normal() && arg.is_normal()
            }
        }
    }

    // `true` when no variable index escapes its enclosing abstractions.
    pub fn is_closed(&self) -> bool {
        self.is_closed_under(0)
    }

    fn is_closed_under(&self, depth: usize) -> bool {
        match self {
            Expr::Var { index, .. } => *index < depth,
            Expr::Unresolved(_) | Expr::Ref(_) => true,
            Expr::Abs { body, .. } => body.is_closed_under(depth + 1),
            Expr::App { func, arg } => func.is_closed_under(depth) && arg.is_closed_under(depth),
        }
    }
}
