// names of variables, modules and module-qualified references
pub mod identifier;
// untyped lambda calculus kernel
//   - de Bruijn indices
//   - shifting, substitution and one beta step
pub mod kernel;
// memoized church numerals
pub mod numerals;
// definitions of one module
pub mod namespace;
// linked modules and evaluation
pub mod context;
// lambda calculus surface
//   - before name resolution
pub mod surface;
// string -> surface
pub mod parser;
// surface -> kernel
pub mod elaborator;
// Display impls
pub mod printing;
// module sources and transitive loading
pub mod loader;
// entry points and run settings
pub mod config;
pub mod error;
// playground over http
pub mod server;

pub use context::{Context, Evaluation};
pub use error::{Error, Result, SyntaxError};
pub use identifier::{AbsoluteIdent, LocalIdent, ModuleIdent};
pub use kernel::Expr;
pub use namespace::Namespace;

// Parses and elaborates a single expression.
// Free names stay unresolved; nothing is linked to a module.
pub fn parse_def(source: &str) -> Result<Expr> {
    let term = parser::parse_term(source)?;
    Ok(elaborator::Elaborator::new().elab_expr(&term))
}

// Parses and elaborates the text of one module.
pub fn parse_namespace(source: &str) -> Result<Namespace> {
    let module = parser::parse_module(source)?;
    elaborator::Elaborator::new().elab_module(&module)
}
