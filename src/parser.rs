use crate::error::SyntaxError;
use crate::surface::{Declaration, Module, TermAST};
use logos::Logos;

#[derive(Logos, Debug, PartialEq, Clone)]
// whitespace and `{ ... }` comments
#[logos(skip r"([ \t\r\n\f]+|\{[^}]*\})")]
pub enum Token {
    #[token("=")]
    Equals,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Period,
    #[token("/")]
    Slash,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("λ")]
    #[token("\\")]
    Lambda,
    #[token("import")]
    Import,
    // definition, variable and module names; all-digit names are numerals
    #[regex(r"[a-zA-Z0-9_]+")]
    Identifier,
}

impl Token {
    fn describe(&self) -> &'static str {
        match self {
            Token::Equals => "'='",
            Token::Semicolon => "';'",
            Token::Period => "'.'",
            Token::Slash => "'/'",
            Token::LParen => "'('",
            Token::RParen => "')'",
            Token::Lambda => "lambda",
            Token::Import => "'import'",
            Token::Identifier => "identifier",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpannedToken<'a> {
    pub token: Token,
    pub slice: &'a str,
    pub span: std::ops::Range<usize>,
}

pub fn lex(input: &str) -> Result<Vec<SpannedToken<'_>>, SyntaxError> {
    let mut lexer = Token::lexer(input);
    let mut tokens = Vec::new();

    while let Some(token) = lexer.next() {
        let span = lexer.span();
        let slice = &input[span.clone()];
        let token = token.map_err(|_| {
            let message = if slice.starts_with('{') {
                "unterminated comment".to_string()
            } else {
                format!("unexpected character {:?}", slice)
            };
            SyntaxError::at(input, span.start, message)
        })?;
        tokens.push(SpannedToken { token, slice, span });
    }

    Ok(tokens)
}

// deepest term tree (and deepest parenthesis or lambda nesting) accepted
pub const MAX_DEPTH: usize = 256;

#[derive(Debug)]
pub struct Parser<'a> {
    source: &'a str,
    tokens: &'a [SpannedToken<'a>],
    pos: usize,
    nesting: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, tokens: &'a [SpannedToken<'a>]) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            nesting: 0,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn next(&mut self) -> Option<&SpannedToken<'a>> {
        let t = self.tokens.get(self.pos);
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn error_here(&self, message: impl Into<String>) -> SyntaxError {
        let offset = self
            .tokens
            .get(self.pos)
            .map(|t| t.span.start)
            .unwrap_or(self.source.len());
        SyntaxError::at(self.source, offset, message)
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        match self.tokens.get(self.pos) {
            Some(token) => self.error_here(format!(
                "expected {}, found {} {:?}",
                expected,
                token.token.describe(),
                token.slice
            )),
            None => self.error_here(format!("expected {}, but reached end of input", expected)),
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), SyntaxError> {
        if self.peek() == Some(&expected) {
            self.next();
            Ok(())
        } else {
            Err(self.unexpected(expected.describe()))
        }
    }

    fn expect_ident(&mut self) -> Result<String, SyntaxError> {
        let tokens = self.tokens;
        match tokens.get(self.pos) {
            Some(token) if token.token == Token::Identifier => {
                self.pos += 1;
                Ok(token.slice.to_string())
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn starts_atom(&self) -> bool {
        matches!(
            self.peek(),
            Some(Token::Identifier | Token::LParen | Token::Lambda)
        )
    }

    pub fn parse_exp(&mut self) -> Result<TermAST, SyntaxError> {
        self.exp().map(|(term, _)| term)
    }

    // <name> | "(" <exp> ")" | <lambda>
    // each parse returns the depth of the tree it built
    fn atom(&mut self) -> Result<(TermAST, usize), SyntaxError> {
        match self.peek() {
            Some(Token::Lambda) => self.function(),
            Some(Token::Identifier) => Ok((self.parse_ident_or_access()?, 1)),
            Some(Token::LParen) => self.parenthesized(),
            _ => Err(self.unexpected("expression")),
        }
    }

    // application is juxtaposition, left associative
    fn exp(&mut self) -> Result<(TermAST, usize), SyntaxError> {
        let (mut exp, mut depth) = self.atom()?;
        while self.starts_atom() {
            let start = self.pos;
            let (arg, arg_depth) = self.atom()?;
            depth = 1 + depth.max(arg_depth);
            if depth > MAX_DEPTH {
                return Err(self.too_deep(start));
            }
            exp = TermAST::App {
                func: Box::new(exp),
                arg: Box::new(arg),
            };
        }
        Ok((exp, depth))
    }

    // parentheses and lambdas recurse; bound them before descending
    fn enter(&mut self) -> Result<(), SyntaxError> {
        if self.nesting >= MAX_DEPTH {
            return Err(self.too_deep(self.pos));
        }
        self.nesting += 1;
        Ok(())
    }

    fn too_deep(&self, pos: usize) -> SyntaxError {
        let offset = self
            .tokens
            .get(pos)
            .map(|t| t.span.start)
            .unwrap_or(self.source.len());
        SyntaxError::at(
            self.source,
            offset,
            format!("expression nested deeper than {} levels", MAX_DEPTH),
        )
    }

    // ("λ" | "\") <ident> "." <exp>
    // the body extends as far right as possible
    fn function(&mut self) -> Result<(TermAST, usize), SyntaxError> {
        let start = self.pos;
        self.enter()?;
        self.expect(Token::Lambda)?;
        let param = self.expect_ident()?;
        self.expect(Token::Period)?;
        let (body, depth) = self.exp()?;
        self.nesting -= 1;
        if depth + 1 > MAX_DEPTH {
            return Err(self.too_deep(start));
        }

        Ok((
            TermAST::Abs {
                param,
                body: Box::new(body),
            },
            depth + 1,
        ))
    }

    // <name> | <module> "/" <name>
    fn parse_ident_or_access(&mut self) -> Result<TermAST, SyntaxError> {
        let name = self.expect_ident()?;

        if let Some(Token::Slash) = self.peek() {
            self.next(); // consume '/'
            let next_name = self.expect_ident()?;
            Ok(TermAST::Access {
                module_name: name,
                name: next_name,
            })
        } else {
            Ok(TermAST::Identifier(name))
        }
    }

    fn parenthesized(&mut self) -> Result<(TermAST, usize), SyntaxError> {
        self.enter()?;
        self.expect(Token::LParen)?;
        let exp = self.exp()?;
        self.expect(Token::RParen)?;
        self.nesting -= 1;
        Ok(exp)
    }

    // <name> "=" <exp> ";"
    fn parse_definition(&mut self) -> Result<Declaration, SyntaxError> {
        let name = self.expect_ident()?;
        self.expect(Token::Equals)?;
        let term = self.parse_exp()?;
        self.expect(Token::Semicolon)?;

        Ok(Declaration::Definition { name, term })
    }

    // "import" <module> ";"
    fn parse_import(&mut self) -> Result<Declaration, SyntaxError> {
        self.expect(Token::Import)?;
        let module_name = self.expect_ident()?;
        self.expect(Token::Semicolon)?;
        Ok(Declaration::Import { module_name })
    }

    pub fn parse_module(&mut self) -> Result<Module, SyntaxError> {
        let mut body = Vec::new();
        while let Some(token) = self.peek() {
            match token {
                Token::Import => body.push(self.parse_import()?),
                Token::Identifier => body.push(self.parse_definition()?),
                _ => return Err(self.unexpected("definition or import")),
            }
        }
        Ok(Module { body })
    }

    pub fn expect_end(&self) -> Result<(), SyntaxError> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.unexpected("end of input"))
        }
    }
}

// Parses a whole module: imports and definitions.
pub fn parse_module(input: &str) -> Result<Module, SyntaxError> {
    let tokens = lex(input)?;
    let mut parser = Parser::new(input, &tokens);
    parser.parse_module()
}

// Parses a single expression spanning the whole input.
pub fn parse_term(input: &str) -> Result<TermAST, SyntaxError> {
    let tokens = lex(input)?;
    let mut parser = Parser::new(input, &tokens);
    let term = parser.parse_exp()?;
    parser.expect_end()?;
    Ok(term)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> TermAST {
        TermAST::Identifier(name.to_string())
    }

    fn app(func: TermAST, arg: TermAST) -> TermAST {
        TermAST::App {
            func: Box::new(func),
            arg: Box::new(arg),
        }
    }

    fn abs(param: &str, body: TermAST) -> TermAST {
        TermAST::Abs {
            param: param.to_string(),
            body: Box::new(body),
        }
    }

    #[test]
    fn lex_skips_comments() {
        let tokens = lex("{c}\\{c}x{c}.{c}x{c}").unwrap();
        let kinds: Vec<Token> = tokens.into_iter().map(|t| t.token).collect();
        assert_eq!(
            kinds,
            vec![
                Token::Lambda,
                Token::Identifier,
                Token::Period,
                Token::Identifier
            ]
        );
    }

    #[test]
    fn lex_keyword_prefix_is_identifier() {
        let tokens = lex("imports import").unwrap();
        assert_eq!(tokens[0].token, Token::Identifier);
        assert_eq!(tokens[1].token, Token::Import);
    }

    #[test]
    fn application_is_left_associative() {
        assert_eq!(
            parse_term("x y z").unwrap(),
            app(app(ident("x"), ident("y")), ident("z"))
        );
        assert_eq!(
            parse_term("x (y z)").unwrap(),
            app(ident("x"), app(ident("y"), ident("z")))
        );
    }

    #[test]
    fn lambda_body_extends_right() {
        assert_eq!(
            parse_term("λx.(λz.z) x").unwrap(),
            abs("x", app(abs("z", ident("z")), ident("x")))
        );
        assert_eq!(
            parse_term("f \\x.x y").unwrap(),
            app(ident("f"), abs("x", app(ident("x"), ident("y"))))
        );
    }

    #[test]
    fn module_access() {
        assert_eq!(
            parse_term("lib/succ 1").unwrap(),
            app(
                TermAST::Access {
                    module_name: "lib".to_string(),
                    name: "succ".to_string()
                },
                ident("1")
            )
        );
    }

    #[test]
    fn module_with_imports_and_definitions() {
        let module = parse_module("import lib;\none = λf.λx.f x;\nimport other;\nmain = lib/succ one;")
            .unwrap();
        assert_eq!(module.imports().collect::<Vec<_>>(), vec!["lib", "other"]);
        let names: Vec<&str> = module.definitions().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["one", "main"]);
    }

    #[test]
    fn empty_module() {
        assert_eq!(parse_module("  { nothing here }  ").unwrap(), Module::default());
    }

    #[test]
    fn missing_semicolon() {
        let err = parse_module("a = x\nb = y;").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 3);
        assert!(err.message.contains("';'"), "{}", err.message);
    }

    #[test]
    fn unterminated_comment() {
        let err = parse_term("x {oops").unwrap_err();
        assert_eq!(err.message, "unterminated comment");
        assert_eq!(err.offset, 2);
    }

    #[test]
    fn unexpected_character() {
        let err = parse_term("λx.x + y").unwrap_err();
        assert_eq!(err.column, 6);
    }

    #[test]
    fn trailing_input_is_rejected() {
        let err = parse_term("x )").unwrap_err();
        assert!(err.message.contains("end of input"));
        let err = parse_term("").unwrap_err();
        assert!(err.message.contains("reached end of input"));
    }

    #[test]
    fn nesting_is_bounded() {
        let ok = format!("{}x{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert_eq!(parse_term(&ok).unwrap(), ident("x"));

        let n = 200_000;
        let parens = format!("main = {}x{};", "(".repeat(n), ")".repeat(n));
        let err = parse_module(&parens).unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.column, 8 + MAX_DEPTH);
        assert!(err.message.contains("nested deeper"), "{}", err.message);

        let lambdas = "λx.".repeat(n) + "x";
        assert!(parse_term(&lambdas).is_err());
    }

    #[test]
    fn application_spine_is_bounded() {
        let long = vec!["x"; 5 * MAX_DEPTH].join(" ");
        let err = parse_term(&long).unwrap_err();
        // the first argument that makes the tree too deep
        assert_eq!(err.column, 2 * MAX_DEPTH + 1);
        let short = vec!["x"; MAX_DEPTH].join(" ");
        assert!(parse_term(&short).is_ok());
    }
}
