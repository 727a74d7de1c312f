//! Selector AST
//!
//! A [`SelectorList`] is a comma-separated list of [`ComplexSelector`]s.
//! Complex selectors are stored subject-first: the rightmost compound plus
//! the `(combinator, compound)` chain walking leftwards.

/// Comma-separated selector list
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList(pub Vec<ComplexSelector>);

impl SelectorList {
    /// Parse a selector list
    pub fn parse(input: &str) -> crate::Result<Self> {
        crate::parser::parse_selector_list(input)
    }

    pub fn selectors(&self) -> &[ComplexSelector] {
        &self.0
    }
}

impl std::str::FromStr for SelectorList {
    type Err = crate::SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Compound selectors joined by combinators
///
/// `A > B C` is stored as subject `C` with
/// `[(Descendant, B), (Child, A)]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
    pub subject: CompoundSelector,
    pub combinators: Vec<(Combinator, CompoundSelector)>,
}

/// Simple selectors that must all hold for one element
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundSelector {
    pub simple_selectors: Vec<SimpleSelector>,
}

/// Relationship between two compound selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `A B`
    Descendant,
    /// `A > B`
    Child,
    /// `A + B`
    NextSibling,
    /// `A ~ B`
    SubsequentSibling,
}

/// A component of a compound selector
#[derive(Debug, Clone, PartialEq)]
pub enum SimpleSelector {
    /// Universal selector *
    Universal,
    /// Type selector (tag name)
    Type(String),
    /// ID selector #id
    Id(String),
    /// Class selector .class
    Class(String),
    /// Attribute selector [attr], [attr=value], etc.
    Attribute(AttributeSelector),
    /// Pseudo-class :first-child, :nth-child(), etc.
    PseudoClass(PseudoClass),
}

/// Supported pseudo-classes
#[derive(Debug, Clone, PartialEq)]
pub enum PseudoClass {
    // Tree-structural pseudo-classes
    Root,
    Empty,
    FirstChild,
    LastChild,
    OnlyChild,
    FirstOfType,
    LastOfType,
    OnlyOfType,
    NthChild(NthExpression),
    NthLastChild(NthExpression),
    NthOfType(NthExpression),
    NthLastOfType(NthExpression),

    // Logical pseudo-classes
    Not(SelectorList),
    Is(SelectorList),
    Where(SelectorList),

    // Input pseudo-classes
    Checked,
    Disabled,
    Enabled,
}

/// An+B expression for :nth-* selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NthExpression {
    /// Coefficient (A in An+B)
    pub a: i32,
    /// Offset (B in An+B)
    pub b: i32,
}

impl NthExpression {
    /// Create "odd" expression (2n+1)
    pub fn odd() -> Self {
        Self { a: 2, b: 1 }
    }

    /// Create "even" expression (2n)
    pub fn even() -> Self {
        Self { a: 2, b: 0 }
    }

    /// Create a simple index (0n+b)
    pub fn index(n: i32) -> Self {
        Self { a: 0, b: n }
    }

    /// Create An+B expression
    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Parse from string like "2n+1", "odd", "even", "3", "-n + 3"
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();

        match s.as_str() {
            "odd" => return Some(Self::odd()),
            "even" => return Some(Self::even()),
            _ => {}
        }

        // Try to parse as simple number
        if let Ok(n) = s.parse::<i32>() {
            return Some(Self::index(n));
        }

        // Parse An+B format
        let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let n_pos = s.find('n')?;
        let a_str = &s[..n_pos];
        let a = match a_str {
            "" | "+" => 1,
            "-" => -1,
            _ => a_str.parse().ok()?,
        };

        let rest = &s[n_pos + 1..];
        let b = if rest.is_empty() {
            0
        } else if rest.starts_with(['+', '-']) {
            rest.parse().ok()?
        } else {
            return None;
        };

        Some(Self::new(a, b))
    }

    /// Check if index n (1-based) matches this expression
    pub fn matches(&self, n: i32) -> bool {
        if self.a == 0 {
            return n == self.b;
        }

        // widened so extreme coefficients cannot overflow
        let (a, diff) = (i64::from(self.a), i64::from(n) - i64::from(self.b));
        if a > 0 {
            diff >= 0 && diff % a == 0
        } else {
            diff <= 0 && diff % a == 0
        }
    }
}

/// Attribute selector
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    pub name: String,
    pub matcher: Option<AttributeMatcher>,
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeMatcher {
    /// [attr=value] - exact match
    Exact(String),
    /// [attr~=value] - whitespace-separated list contains
    Contains(String),
    /// [attr|=value] - exact or prefix with hyphen
    DashMatch(String),
    /// [attr^=value] - starts with
    Prefix(String),
    /// [attr$=value] - ends with
    Suffix(String),
    /// [attr*=value] - contains substring
    Substring(String),
}

impl AttributeSelector {
    /// Check if an attribute value matches
    pub fn matches(&self, value: Option<&str>) -> bool {
        let (matcher, value) = match (&self.matcher, value) {
            (_, None) => return false,
            (None, Some(_)) => return true, // [attr] - just check existence
            (Some(matcher), Some(value)) => (matcher, value),
        };

        let fold = |s: &str| {
            if self.case_insensitive {
                s.to_ascii_lowercase()
            } else {
                s.to_owned()
            }
        };
        let value = fold(value);

        match matcher {
            AttributeMatcher::Exact(expected) => value == fold(expected),
            AttributeMatcher::Contains(expected) => {
                let expected = fold(expected);
                !expected.is_empty()
                    && !expected.contains(|c: char| c.is_ascii_whitespace())
                    && value.split_ascii_whitespace().any(|w| w == expected)
            }
            AttributeMatcher::DashMatch(expected) => {
                let expected = fold(expected);
                value == expected
                    || value
                        .strip_prefix(expected.as_str())
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            AttributeMatcher::Prefix(expected) => {
                !expected.is_empty() && value.starts_with(&fold(expected))
            }
            AttributeMatcher::Suffix(expected) => {
                !expected.is_empty() && value.ends_with(&fold(expected))
            }
            AttributeMatcher::Substring(expected) => {
                !expected.is_empty() && value.contains(&fold(expected))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nth_expression_parse() {
        assert_eq!(NthExpression::parse("odd"), Some(NthExpression::new(2, 1)));
        assert_eq!(NthExpression::parse("EVEN"), Some(NthExpression::new(2, 0)));
        assert_eq!(NthExpression::parse("3"), Some(NthExpression::index(3)));
        assert_eq!(NthExpression::parse("-n + 3"), Some(NthExpression::new(-1, 3)));
        assert_eq!(NthExpression::parse("2n-1"), Some(NthExpression::new(2, -1)));
        assert_eq!(NthExpression::parse("n"), Some(NthExpression::new(1, 0)));
        assert_eq!(NthExpression::parse("2n3"), None);
        assert_eq!(NthExpression::parse("x"), None);
    }

    #[test]
    fn test_nth_expression_matches() {
        let odd = NthExpression::odd();
        assert!(odd.matches(1));
        assert!(!odd.matches(2));
        assert!(odd.matches(3));

        let first_three = NthExpression::new(-1, 3);
        assert!(first_three.matches(1));
        assert!(first_three.matches(3));
        assert!(!first_three.matches(4));

        assert!(NthExpression::index(2).matches(2));
        assert!(!NthExpression::index(2).matches(4));
    }

    #[test]
    fn test_nth_expression_extremes() {
        assert!(NthExpression::new(1, i32::MIN).matches(1));
        assert!(NthExpression::new(-1, i32::MAX).matches(i32::MAX));
        assert!(!NthExpression::new(i32::MIN, 1).matches(i32::MAX));
        assert!(NthExpression::new(i32::MIN, i32::MAX).matches(i32::MAX));
        assert!(!NthExpression::new(i32::MAX, i32::MIN).matches(2));
        assert_eq!(NthExpression::parse("2147483648"), None);
        assert_eq!(NthExpression::parse("n+2147483648"), None);
    }

    #[test]
    fn test_attribute_matchers() {
        let sel = |matcher, case_insensitive| AttributeSelector {
            name: "a".into(),
            matcher: Some(matcher),
            case_insensitive,
        };

        assert!(sel(AttributeMatcher::Contains("b".into()), false).matches(Some("a b c")));
        assert!(!sel(AttributeMatcher::Contains("".into()), false).matches(Some("a b")));
        assert!(sel(AttributeMatcher::DashMatch("en".into()), false).matches(Some("en-US")));
        assert!(!sel(AttributeMatcher::DashMatch("en".into()), false).matches(Some("english")));
        assert!(sel(AttributeMatcher::Prefix("HT".into()), true).matches(Some("https://x")));
        assert!(!sel(AttributeMatcher::Prefix("".into()), false).matches(Some("x")));
        assert!(sel(AttributeMatcher::Suffix(".png".into()), false).matches(Some("a.png")));
        assert!(sel(AttributeMatcher::Substring("mid".into()), false).matches(Some("amidst")));
        assert!(sel(AttributeMatcher::Exact("X".into()), true).matches(Some("x")));
        assert!(!sel(AttributeMatcher::Exact("X".into()), false).matches(Some("x")));
        assert!(!sel(AttributeMatcher::Exact("x".into()), false).matches(None));
    }
}
