//! Category specification tokenizer.
//!
//! Parses the `<spec>` part of a marker such as
//! `<!-- readme: contributors,alice/- -start -->` into an ordered list of
//! [`Token`]s: `contributors` and `alice` with the exclude operator.

use crate::entity::Pool;
use crate::error::SpecError;

/// Separator between tokens.
const TOKEN_SEPARATOR: char = ',';

/// Separator between a category and its operator.
const OPERATOR_SEPARATOR: char = '/';

/// Operator attached to a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    /// `-`: drop every entity with this login from the sequence built so far.
    Exclude,
    /// Any other operator; accepted and ignored.
    Unknown(String),
}

impl Operator {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "" => None,
            "-" => Some(Self::Exclude),
            other => Some(Self::Unknown(other.to_owned())),
        }
    }
}

/// What a token refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category<'a> {
    /// A whole pool.
    Pool(Pool),
    /// A single literal login.
    Login(&'a str),
}

/// One comma-separated unit of a category specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Trimmed category text with its original case.
    pub name: String,
    pub operator: Option<Operator>,
}

impl Token {
    /// Pool reference when the name is a reserved pool name, literal login otherwise.
    #[must_use]
    pub fn category(&self) -> Category<'_> {
        match Pool::from_name(&self.name) {
            Some(pool) => Category::Pool(pool),
            None => Category::Login(&self.name),
        }
    }

    fn parse(raw: &str) -> Self {
        let mut parts = raw.split(OPERATOR_SEPARATOR);
        let name = parts.next().unwrap_or_default().trim().to_owned();
        let operator = parts.next().and_then(Operator::parse);
        Self { name, operator }
    }
}

/// Parse a category specification into tokens.
///
/// Empty tokens between separators (`a,,b`) are kept as literal logins equal
/// to the empty string.
///
/// # Errors
///
/// Returns [`SpecError::Empty`] when the specification is blank.
pub fn parse_spec(spec: &str) -> Result<Vec<Token>, SpecError> {
    if spec.trim().is_empty() {
        return Err(SpecError::Empty);
    }
    Ok(spec.split(TOKEN_SEPARATOR).map(Token::parse).collect())
}
