//! Selector parser
//!
//! Hand-written recursive descent over the selector text. Compound
//! selectors are collected left to right and the chain is reversed at the
//! end so matching can start from the subject.

use tracing::trace;

use crate::error::SelectorError;
use crate::selectors::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, CompoundSelector,
    NthExpression, PseudoClass, SelectorList, SimpleSelector,
};
use crate::Result;

/// Parse a comma-separated selector list
pub fn parse_selector_list(input: &str) -> Result<SelectorList> {
    let mut parser = Parser::new(input);
    parser.skip_whitespace();
    if parser.at_end() {
        return Err(SelectorError::Empty);
    }

    let list = parser.selector_list()?;
    parser.skip_whitespace();
    match parser.peek() {
        None => {
            trace!(selector = input, count = list.0.len(), "parsed selector list");
            Ok(list)
        }
        Some(c) => Err(parser.unexpected(c)),
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-' || !c.is_ascii()
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.input[self.pos..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Returns whether any whitespace was skipped
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn unexpected(&self, token: char) -> SelectorError {
        SelectorError::UnexpectedToken {
            token,
            position: self.pos,
        }
    }

    fn unexpected_here(&self) -> SelectorError {
        match self.peek() {
            Some(c) => self.unexpected(c),
            None => SelectorError::UnexpectedEnd,
        }
    }

    fn consume(&mut self, expected: char) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.unexpected_here())
        }
    }

    fn selector_list(&mut self) -> Result<SelectorList> {
        let mut selectors = vec![self.complex()?];
        loop {
            self.skip_whitespace();
            if !self.eat(',') {
                break;
            }
            self.skip_whitespace();
            selectors.push(self.complex()?);
        }
        Ok(SelectorList(selectors))
    }

    fn complex(&mut self) -> Result<ComplexSelector> {
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_space = self.skip_whitespace();
            let combinator = match self.peek() {
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(',') | Some(')') | None => break,
                Some(_) if had_space => Combinator::Descendant,
                Some(c) => return Err(self.unexpected(c)),
            };
            if combinator != Combinator::Descendant {
                self.bump();
                self.skip_whitespace();
            }
            combinators.push(combinator);
            compounds.push(self.compound()?);
        }

        let Some(subject) = compounds.pop() else {
            return Err(SelectorError::Empty);
        };
        let combinators = combinators
            .into_iter()
            .rev()
            .zip(compounds.into_iter().rev())
            .collect();
        Ok(ComplexSelector {
            subject,
            combinators,
        })
    }

    fn compound(&mut self) -> Result<CompoundSelector> {
        let mut simple_selectors = Vec::new();

        match self.peek() {
            Some('*') => {
                self.bump();
                simple_selectors.push(SimpleSelector::Universal);
            }
            Some(c) if is_name_start(c) || c == '\\' => {
                simple_selectors.push(SimpleSelector::Type(self.ident()?));
            }
            _ => {}
        }

        loop {
            let simple = match self.peek() {
                Some('#') => {
                    self.bump();
                    SimpleSelector::Id(self.name()?)
                }
                Some('.') => {
                    self.bump();
                    SimpleSelector::Class(self.name()?)
                }
                Some('[') => {
                    self.bump();
                    SimpleSelector::Attribute(self.attribute()?)
                }
                Some(':') => {
                    self.bump();
                    SimpleSelector::PseudoClass(self.pseudo_class()?)
                }
                _ => break,
            };
            simple_selectors.push(simple);
        }

        if simple_selectors.is_empty() {
            return Err(self.unexpected_here());
        }
        Ok(CompoundSelector { simple_selectors })
    }

    /// Identifier that may not start with a digit
    fn ident(&mut self) -> Result<String> {
        match self.peek() {
            Some(c) if is_name_start(c) || c == '\\' => self.name(),
            _ => Err(self.unexpected_here()),
        }
    }

    /// Run of name characters and escapes
    fn name(&mut self) -> Result<String> {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.bump();
                out.push(self.escape()?);
            } else if is_name_char(c) {
                self.bump();
                out.push(c);
            } else {
                break;
            }
        }
        if out.is_empty() {
            return Err(self.unexpected_here());
        }
        Ok(out)
    }

    /// Character after a backslash: up to six hex digits or a literal
    fn escape(&mut self) -> Result<char> {
        let hex: String = self.input[self.pos..]
            .chars()
            .take_while(char::is_ascii_hexdigit)
            .take(6)
            .collect();
        if hex.is_empty() {
            return self.bump().ok_or(SelectorError::UnexpectedEnd);
        }

        self.pos += hex.len();
        if self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.bump();
        }
        let code = u32::from_str_radix(&hex, 16).unwrap_or(0xFFFD);
        Ok(match char::from_u32(code) {
            Some(c) if code != 0 => c,
            _ => char::REPLACEMENT_CHARACTER,
        })
    }

    fn quoted(&mut self, quote: char) -> Result<String> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(SelectorError::UnexpectedEnd),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.peek() {
                    Some('\n') => {
                        self.bump();
                    }
                    _ => out.push(self.escape()?),
                },
                Some(c) => out.push(c),
            }
        }
    }

    /// Body of `[...]`, after the opening bracket
    fn attribute(&mut self) -> Result<AttributeSelector> {
        self.skip_whitespace();
        let name = self.ident()?;
        self.skip_whitespace();

        if self.eat(']') {
            return Ok(AttributeSelector {
                name,
                matcher: None,
                case_insensitive: false,
            });
        }

        let op = match self.peek() {
            Some('=') => None,
            Some(c @ ('~' | '|' | '^' | '$' | '*')) if self.peek_second() == Some('=') => {
                self.bump();
                Some(c)
            }
            _ => return Err(self.unexpected_here()),
        };
        self.consume('=')?;
        self.skip_whitespace();

        let value = match self.peek() {
            Some(q @ ('"' | '\'')) => {
                self.bump();
                self.quoted(q)?
            }
            _ => self.name()?,
        };
        let matcher = match op {
            None => AttributeMatcher::Exact(value),
            Some('~') => AttributeMatcher::Contains(value),
            Some('|') => AttributeMatcher::DashMatch(value),
            Some('^') => AttributeMatcher::Prefix(value),
            Some('$') => AttributeMatcher::Suffix(value),
            _ => AttributeMatcher::Substring(value),
        };

        self.skip_whitespace();
        let case_insensitive = match self.peek() {
            Some('i' | 'I') => {
                self.bump();
                true
            }
            Some('s' | 'S') => {
                self.bump();
                false
            }
            _ => false,
        };
        self.skip_whitespace();
        self.consume(']')?;

        Ok(AttributeSelector {
            name,
            matcher: Some(matcher),
            case_insensitive,
        })
    }

    /// Pseudo-class after the colon
    fn pseudo_class(&mut self) -> Result<PseudoClass> {
        if self.peek() == Some(':') {
            self.bump();
            let name = self.ident().unwrap_or_default();
            return Err(SelectorError::UnsupportedPseudoClass(format!(":{name}")));
        }

        let name = self.ident()?.to_ascii_lowercase();
        if !self.eat('(') {
            return match name.as_str() {
                "root" => Ok(PseudoClass::Root),
                "empty" => Ok(PseudoClass::Empty),
                "first-child" => Ok(PseudoClass::FirstChild),
                "last-child" => Ok(PseudoClass::LastChild),
                "only-child" => Ok(PseudoClass::OnlyChild),
                "first-of-type" => Ok(PseudoClass::FirstOfType),
                "last-of-type" => Ok(PseudoClass::LastOfType),
                "only-of-type" => Ok(PseudoClass::OnlyOfType),
                "checked" => Ok(PseudoClass::Checked),
                "disabled" => Ok(PseudoClass::Disabled),
                "enabled" => Ok(PseudoClass::Enabled),
                _ => Err(SelectorError::UnsupportedPseudoClass(name)),
            };
        }

        match name.as_str() {
            "not" | "is" | "where" => {
                self.skip_whitespace();
                let list = self.selector_list()?;
                self.skip_whitespace();
                self.consume(')')?;
                Ok(match name.as_str() {
                    "not" => PseudoClass::Not(list),
                    "is" => PseudoClass::Is(list),
                    _ => PseudoClass::Where(list),
                })
            }
            "nth-child" | "nth-last-child" | "nth-of-type" | "nth-last-of-type" => {
                let expr = self.nth_argument()?;
                Ok(match name.as_str() {
                    "nth-child" => PseudoClass::NthChild(expr),
                    "nth-last-child" => PseudoClass::NthLastChild(expr),
                    "nth-of-type" => PseudoClass::NthOfType(expr),
                    _ => PseudoClass::NthLastOfType(expr),
                })
            }
            _ => Err(SelectorError::UnsupportedPseudoClass(name)),
        }
    }

    fn nth_argument(&mut self) -> Result<NthExpression> {
        let rest = &self.input[self.pos..];
        let end = rest.find(')').ok_or(SelectorError::UnexpectedEnd)?;
        let raw = &rest[..end];
        let expr = NthExpression::parse(raw)
            .ok_or_else(|| SelectorError::InvalidNth(raw.trim().to_owned()))?;
        self.pos += end + 1;
        Ok(expr)
    }
}
