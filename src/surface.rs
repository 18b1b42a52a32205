// surface syntax, straight from the parser
//   - variables are still names, not de Bruijn indices
//   - a bare identifier may be a bound variable or a definition of this module

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermAST {
    Identifier(String),
    // <module>/<name>
    Access {
        module_name: String,
        name: String,
    },
    Abs {
        param: String,
        body: Box<TermAST>,
    },
    App {
        func: Box<TermAST>,
        arg: Box<TermAST>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Definition { name: String, term: TermAST },
    Import { module_name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Module {
    pub body: Vec<Declaration>,
}

impl Module {
    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.body.iter().filter_map(|decl| match decl {
            Declaration::Import { module_name } => Some(module_name.as_str()),
            Declaration::Definition { .. } => None,
        })
    }

    pub fn definitions(&self) -> impl Iterator<Item = (&str, &TermAST)> {
        self.body.iter().filter_map(|decl| match decl {
            Declaration::Definition { name, term } => Some((name.as_str(), term)),
            Declaration::Import { .. } => None,
        })
    }
}
