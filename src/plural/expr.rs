// SPDX-License-Identifier: MIT

//! Expression trees for gettext `plural=` rules.
//!
//! The grammar is the C expression subset gettext documents for plural
//! selection: ternary conditional, `||`, `&&`, equality, relational,
//! additive and multiplicative operators, unary `!`/`-`, parentheses, the
//! variable `n` and integer literals. Parsing is a recursive descent with
//! one function per precedence tier.
//!
//! Equality of two trees is structural: same shape, same operators, same
//! literals, operand order significant. `n == 1` and `1 == n` are distinct
//! trees even though they select the same plural forms.

use thiserror::Error;

/// Binary operators, loosest to tightest tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Logical negation: `!x` is 1 when x is 0.
    Not,
    /// Arithmetic negation.
    Neg,
}

/// A parsed plural-rule expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Integer literal.
    Num(i64),
    /// The quantity variable `n`.
    Var,
    Unary(UnaryOp, Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    /// `cond ? then : else`.
    Cond(Box<Expr>, Box<Expr>, Box<Expr>),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExprError {
    #[error("empty plural expression")]
    Empty,
    #[error("unexpected character `{found}` at offset {offset}")]
    UnexpectedChar { offset: usize, found: char },
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("expected `{expected}` at offset {offset}")]
    Expected { offset: usize, expected: char },
    #[error("trailing content at offset {offset}")]
    Trailing { offset: usize },
    #[error("integer literal out of range at offset {offset}")]
    IntOutOfRange { offset: usize },
}

impl Expr {
    /// Evaluate the rule for a quantity. Comparisons and logical operators
    /// yield 0/1; division or modulo by zero yields 0 instead of panicking
    /// (malformed rules must not take the process down).
    pub fn eval(&self, n: u64) -> i64 {
        match self {
            Expr::Num(v) => *v,
            Expr::Var => n as i64,
            Expr::Unary(op, inner) => {
                let v = inner.eval(n);
                match op {
                    UnaryOp::Not => (v == 0) as i64,
                    UnaryOp::Neg => -v,
                }
            }
            Expr::Binary(op, lhs, rhs) => {
                let l = lhs.eval(n);
                let r = rhs.eval(n);
                match op {
                    BinOp::Or => (l != 0 || r != 0) as i64,
                    BinOp::And => (l != 0 && r != 0) as i64,
                    BinOp::Eq => (l == r) as i64,
                    BinOp::Ne => (l != r) as i64,
                    BinOp::Lt => (l < r) as i64,
                    BinOp::Gt => (l > r) as i64,
                    BinOp::Le => (l <= r) as i64,
                    BinOp::Ge => (l >= r) as i64,
                    BinOp::Add => l.wrapping_add(r),
                    BinOp::Sub => l.wrapping_sub(r),
                    BinOp::Mul => l.wrapping_mul(r),
                    BinOp::Div => l.checked_div(r).unwrap_or(0),
                    BinOp::Mod => l.checked_rem(r).unwrap_or(0),
                }
            }
            Expr::Cond(cond, then, alt) => {
                if cond.eval(n) != 0 {
                    then.eval(n)
                } else {
                    alt.eval(n)
                }
            }
        }
    }
}

/// Parse a `plural=` expression into a tree.
pub fn parse(source: &str) -> Result<Expr, ExprError> {
    let mut cursor = Cursor::new(source);
    cursor.skip_ws();
    if cursor.at_end() {
        return Err(ExprError::Empty);
    }
    let expr = cursor.ternary()?;
    cursor.skip_ws();
    if !cursor.at_end() {
        return Err(ExprError::Trailing { offset: cursor.pos });
    }
    Ok(expr)
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str) -> Self {
        Cursor {
            bytes: source.as_bytes(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn skip_ws(&mut self) {
        while self
            .bytes
            .get(self.pos)
            .is_some_and(|b| b.is_ascii_whitespace())
        {
            self.pos += 1;
        }
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_ws();
        if self.bytes[self.pos..].starts_with(token.as_bytes()) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    /// `<or> ('?' <ternary> ':' <ternary>)?` — right-associative.
    fn ternary(&mut self) -> Result<Expr, ExprError> {
        let cond = self.or()?;
        if self.eat("?") {
            let then = self.ternary()?;
            self.skip_ws();
            if !self.eat(":") {
                return Err(ExprError::Expected {
                    offset: self.pos,
                    expected: ':',
                });
            }
            let alt = self.ternary()?;
            return Ok(Expr::Cond(Box::new(cond), Box::new(then), Box::new(alt)));
        }
        Ok(cond)
    }

    fn or(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.and()?;
        while self.eat("||") {
            let rhs = self.and()?;
            lhs = Expr::Binary(BinOp::Or, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.equality()?;
        while self.eat("&&") {
            let rhs = self.equality()?;
            lhs = Expr::Binary(BinOp::And, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn equality(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.relational()?;
        loop {
            let op = if self.eat("==") {
                BinOp::Eq
            } else if self.eat("!=") {
                BinOp::Ne
            } else {
                return Ok(lhs);
            };
            let rhs = self.relational()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn relational(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.additive()?;
        loop {
            // Two-character forms first so `<=` never parses as `<` `=`.
            let op = if self.eat("<=") {
                BinOp::Le
            } else if self.eat(">=") {
                BinOp::Ge
            } else if self.eat("<") {
                BinOp::Lt
            } else if self.eat(">") {
                BinOp::Gt
            } else {
                return Ok(lhs);
            };
            let rhs = self.additive()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn additive(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.multiplicative()?;
        loop {
            let op = if self.eat("+") {
                BinOp::Add
            } else if self.eat("-") {
                BinOp::Sub
            } else {
                return Ok(lhs);
            };
            let rhs = self.multiplicative()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn multiplicative(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.unary()?;
        loop {
            let op = if self.eat("*") {
                BinOp::Mul
            } else if self.eat("/") {
                BinOp::Div
            } else if self.eat("%") {
                BinOp::Mod
            } else {
                return Ok(lhs);
            };
            let rhs = self.unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn unary(&mut self) -> Result<Expr, ExprError> {
        if self.eat("!") {
            return Ok(Expr::Unary(UnaryOp::Not, Box::new(self.unary()?)));
        }
        if self.eat("-") {
            return Ok(Expr::Unary(UnaryOp::Neg, Box::new(self.unary()?)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, ExprError> {
        self.skip_ws();
        match self.bytes.get(self.pos) {
            None => Err(ExprError::UnexpectedEnd),
            Some(b'n') => {
                self.pos += 1;
                Ok(Expr::Var)
            }
            Some(b'(') => {
                self.pos += 1;
                let inner = self.ternary()?;
                self.skip_ws();
                if !self.eat(")") {
                    return Err(ExprError::Expected {
                        offset: self.pos,
                        expected: ')',
                    });
                }
                Ok(inner)
            }
            Some(b) if b.is_ascii_digit() => self.number(),
            Some(&b) => Err(ExprError::UnexpectedChar {
                offset: self.pos,
                found: b as char,
            }),
        }
    }

    fn number(&mut self) -> Result<Expr, ExprError> {
        let start = self.pos;
        while self
            .bytes
            .get(self.pos)
            .is_some_and(|b| b.is_ascii_digit())
        {
            self.pos += 1;
        }
        let literal = std::str::from_utf8(&self.bytes[start..self.pos])
            .expect("digits are valid utf-8");
        literal
            .parse()
            .map(Expr::Num)
            .map_err(|_| ExprError::IntOutOfRange { offset: start })
    }
}
