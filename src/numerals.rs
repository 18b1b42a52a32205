use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::kernel::Expr;

// memoized church numerals: `n` is `λf.λx.f (f (... x))` with `n` applications
//   - only requested numerals are kept, each built in one pass
//   - a filled slot is never replaced, so handed-out numerals can be shared
//   - an optional limit rejects numerals too large to build
#[derive(Debug, Default)]
pub struct ChurchNumerals {
    numerals: RefCell<BTreeMap<usize, Rc<Expr>>>,
    limit: Option<usize>,
}

impl ChurchNumerals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        ChurchNumerals {
            numerals: RefCell::default(),
            limit: Some(limit),
        }
    }

    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn get(&self, n: i64) -> Result<Rc<Expr>> {
        let n = usize::try_from(n).map_err(|_| Error::InvalidNumeral(n.to_string()))?;
        if let Some(limit) = self.limit
            && n > limit
        {
            return Err(Error::NumeralTooLarge { value: n, limit });
        }
        let mut numerals = self.numerals.borrow_mut();
        let numeral = numerals.entry(n).or_insert_with(|| Rc::new(build(n)));
        Ok(Rc::clone(numeral))
    }

    // decimal digits, as written in source
    pub fn parse(&self, digits: &str) -> Result<Rc<Expr>> {
        let n = digits
            .parse::<i64>()
            .map_err(|_| Error::InvalidNumeral(digits.to_string()))?;
        self.get(n)
    }

    // number of memoized numerals
    pub fn len(&self) -> usize {
        self.numerals.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn build(n: usize) -> Expr {
    let mut body = Expr::var("x", 0);
    for _ in 0..n {
        body = Expr::app(Expr::var("f", 1), body);
    }
    Expr::abs("f", Expr::abs("x", body))
}
