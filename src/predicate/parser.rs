use super::{FieldPath, PredicateExpression, is_identifier_char};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Dot,
    LParen,
    RParen,
    Eq,
    Literal(String),
}

/// Longest `and` / `or` chain `parse_predicate` accepts.
///
/// Evaluation, rendering and drop of the tree recurse once per term.
pub const MAX_PREDICATE_TERMS: usize = 256;

/// Parse the body of a `where(...)` clause.
///
/// Returns `None` for empty or malformed input, for anything outside the
/// supported grammar (nested `where`, parentheses, other operators) and for
/// chains of more than [`MAX_PREDICATE_TERMS`] terms.
pub fn parse_predicate(text: &str) -> Option<PredicateExpression> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return None;
    }
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.expression()?;
    if parser.pos != parser.tokens.len() {
        return None;
    }
    Some(expr)
}

fn tokenize(text: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '.' => {
                chars.next();
                tokens.push(Token::Dot);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '=' => {
                chars.next();
                tokens.push(Token::Eq);
            }
            '\'' => {
                chars.next();
                let mut literal = String::new();
                loop {
                    match chars.next()? {
                        '\'' => break,
                        '\\' => literal.push(chars.next()?),
                        other => literal.push(other),
                    }
                }
                tokens.push(Token::Literal(literal));
            }
            c if is_identifier_char(c) => {
                let mut ident = String::new();
                while let Some(&c) = chars.peek() {
                    if !is_identifier_char(c) {
                        break;
                    }
                    ident.push(c);
                    chars.next();
                }
                tokens.push(Token::Ident(ident));
            }
            _ => return None,
        }
    }

    Some(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: &Token) -> Option<()> {
        (self.advance()? == *expected).then_some(())
    }

    fn expression(&mut self) -> Option<PredicateExpression> {
        let mut left = self.primary()?;
        let mut terms = 1;

        while let Some(Token::Ident(word)) = self.peek() {
            let combine: fn(PredicateExpression, PredicateExpression) -> PredicateExpression =
                if word.eq_ignore_ascii_case("and") {
                    PredicateExpression::and
                } else if word.eq_ignore_ascii_case("or") {
                    PredicateExpression::or
                } else {
                    return None;
                };
            terms += 1;
            if terms > MAX_PREDICATE_TERMS {
                return None;
            }
            self.pos += 1;
            let right = self.primary()?;
            left = combine(left, right);
        }

        Some(left)
    }

    fn primary(&mut self) -> Option<PredicateExpression> {
        let mut segments = vec![self.identifier()?];
        while self.peek() == Some(&Token::Dot) {
            self.pos += 1;
            segments.push(self.identifier()?);
        }

        if self.peek() == Some(&Token::LParen) {
            // Only the zero-argument `exists()` / `empty()` calls are supported.
            let function = segments.pop()?;
            self.expect(&Token::LParen)?;
            self.expect(&Token::RParen)?;
            let path = FieldPath::new(segments)?;
            return match function.as_str() {
                "exists" => Some(PredicateExpression::exists(path)),
                "empty" => Some(PredicateExpression::empty(path)),
                _ => None,
            };
        }

        self.expect(&Token::Eq)?;
        let Token::Literal(literal) = self.advance()? else {
            return None;
        };
        Some(PredicateExpression::equals(FieldPath::new(segments)?, literal))
    }

    fn identifier(&mut self) -> Option<String> {
        match self.advance()? {
            Token::Ident(name) => Some(name),
            _ => None,
        }
    }
}
