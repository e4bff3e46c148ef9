//! S-expression syntax checking for mission scripts.
//!
//! Mission conditions and actions are written as SEXPs:
//!
//! ```text
//! ( when
//!     ( is-destroyed-delay 0 "Alpha 1" )  ; comment
//!     ( send-message "#Command" "High" "Well done" )
//! )
//! ```
//!
//! Every list starts with an operator atom. Arguments are atoms, double-quoted
//! strings or nested lists. The parser only checks structure; operator
//! semantics (argument counts and types) belong to the game.

use std::collections::BTreeSet;
use std::fmt;

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, multispace1},
    combinator::{all_consuming, cut, fail, map, value},
    error::{VerboseError, VerboseErrorKind, context},
    multi::many0,
    sequence::{pair, preceded, terminated},
};

use crate::collaborators::ExpressionValidator;

/// Parsed SEXP node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sexp {
    /// `( operator args... )`
    List { operator: String, args: Vec<Sexp> },
    /// Bare token such as a number or a keyword.
    Atom(String),
    /// Double-quoted string, usually a ship, wing or message name.
    Str(String),
}

impl Sexp {
    /// Operators of this node and every nested list, depth first.
    pub fn operators(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_operators(&mut out);
        out
    }

    fn collect_operators<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Self::List { operator, args } = self {
            out.push(operator);
            for arg in args {
                arg.collect_operators(out);
            }
        }
    }

    /// String literals of this node and every nested list, depth first.
    pub fn strings(&self) -> Vec<&str> {
        match self {
            Self::Str(text) => vec![text.as_str()],
            Self::Atom(_) => Vec::new(),
            Self::List { args, .. } => args.iter().flat_map(Sexp::strings).collect(),
        }
    }
}

/// Syntax error with the byte offset where parsing stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SexpError {
    pub offset: usize,
    pub message: String,
}

impl SexpError {
    fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

impl fmt::Display for SexpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.offset)
    }
}

impl std::error::Error for SexpError {}

type Res<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

/// Whitespace and `;` line comments.
fn ws(input: &str) -> Res<'_, ()> {
    value(
        (),
        many0(alt((
            value((), multispace1),
            value((), pair(char(';'), take_while(|c| c != '\n'))),
        ))),
    )(input)
}

fn is_atom_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '(' | ')' | '"' | ';')
}

fn atom(input: &str) -> Res<'_, String> {
    map(take_while1(is_atom_char), str::to_string)(input)
}

fn string(input: &str) -> Res<'_, Sexp> {
    map(
        preceded(
            char('"'),
            terminated(
                take_while(|c| c != '"'),
                context("closing quote", cut(char('"'))),
            ),
        ),
        |text: &str| Sexp::Str(text.to_string()),
    )(input)
}

/// Deepest list nesting accepted before parsing stops with an error.
pub const MAX_NESTING_DEPTH: usize = 256;

fn list(input: &str, depth: usize) -> Res<'_, Sexp> {
    let (input, _) = char('(')(input)?;
    if depth >= MAX_NESTING_DEPTH {
        return context("nesting too deep", cut(fail))(input);
    }
    let (input, _) = ws(input)?;
    let (input, operator) = context("operator", cut(atom))(input)?;
    let (input, args) = many0(preceded(ws, |i| expr(i, depth + 1)))(input)?;
    let (input, _) = ws(input)?;
    let (input, _) = context("closing parenthesis", cut(char(')')))(input)?;
    Ok((input, Sexp::List { operator, args }))
}

fn expr(input: &str, depth: usize) -> Res<'_, Sexp> {
    alt((|i| list(i, depth), string, map(atom, Sexp::Atom)))(input)
}

/// Parse one complete expression.
///
/// The input must hold exactly one list, optionally surrounded by whitespace
/// and comments.
pub fn parse(input: &str) -> Result<Sexp, SexpError> {
    let offset_of = |rest: &str| input.len() - rest.len();

    let start = match ws(input) {
        Ok((rest, ())) => rest,
        Err(_) => input,
    };
    match start.chars().next() {
        None => return Err(SexpError::new(0, "expression is empty")),
        Some(')') => return Err(SexpError::new(offset_of(start), "unexpected ')'")),
        Some('(') => {}
        Some(_) => {
            return Err(SexpError::new(
                offset_of(start),
                "expression must start with '('",
            ));
        }
    }

    match all_consuming(terminated(|i| list(i, 0), ws))(start) {
        Ok((_, sexp)) => Ok(sexp),
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => Err(describe(input, &e)),
        Err(nom::Err::Incomplete(_)) => Err(SexpError::new(input.len(), "incomplete expression")),
    }
}

fn describe(input: &str, error: &VerboseError<&str>) -> SexpError {
    let offset_of = |rest: &str| input.len() - rest.len();

    let labelled = error.errors.iter().find_map(|(rest, kind)| match kind {
        VerboseErrorKind::Context(label) => Some((*rest, *label)),
        _ => None,
    });
    if let Some((rest, label)) = labelled {
        let message = match label {
            "closing parenthesis" if rest.is_empty() => "missing closing parenthesis",
            "closing parenthesis" => "expected ')'",
            "closing quote" => "unterminated string",
            "operator" => "expected operator",
            "nesting too deep" => "expression nested too deeply",
            other => other,
        };
        return SexpError::new(offset_of(rest), message);
    }

    let rest = error.errors.first().map_or(input, |(rest, _)| *rest);
    let message = match rest.chars().next() {
        Some(')') => "unexpected ')'",
        Some(_) => "unexpected input after expression",
        None => "unexpected end of expression",
    };
    SexpError::new(offset_of(rest), message)
}

/// Operators understood by the stock game engine.
const STANDARD_OPERATORS: &[&str] = &[
    "true",
    "false",
    "and",
    "and-in-sequence",
    "or",
    "not",
    "xor",
    "=",
    "<",
    ">",
    "+",
    "-",
    "*",
    "/",
    "mod",
    "rand",
    "when",
    "every-time",
    "if-then-else",
    "mission-time",
    "is-destroyed-delay",
    "is-subsystem-destroyed-delay",
    "is-disabled-delay",
    "is-disarmed-delay",
    "has-arrived-delay",
    "has-departed-delay",
    "has-docked-delay",
    "has-undocked-delay",
    "is-event-true-delay",
    "is-event-false-delay",
    "is-goal-true-delay",
    "is-goal-false-delay",
    "percent-ships-destroyed",
    "percent-ships-departed",
    "distance",
    "hits-left",
    "shields-left",
    "send-message",
    "send-random-message",
    "add-goal",
    "remove-goal",
    "clear-goals",
    "change-iff",
    "protect-ship",
    "unprotect-ship",
    "ship-invulnerable",
    "ship-vulnerable",
    "ship-guardian",
    "ship-no-guardian",
    "invalidate-goal",
    "validate-goal",
    "end-mission",
    "red-alert",
];

/// Structural SEXP validator with an optional operator whitelist.
#[derive(Debug, Clone, Default)]
pub struct SexpSyntaxValidator {
    operators: Option<BTreeSet<String>>,
}

impl SexpSyntaxValidator {
    /// Validator that accepts any operator name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validator that also rejects operators outside the stock table.
    pub fn standard() -> Self {
        Self::new().with_operators(STANDARD_OPERATORS.iter().copied())
    }

    /// Restrict operators to `operators`, compared case-insensitively.
    #[must_use]
    pub fn with_operators<I, S>(mut self, operators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.operators
            .get_or_insert_with(BTreeSet::new)
            .extend(operators.into_iter().map(|op| op.as_ref().to_lowercase()));
        self
    }

    /// Whether operator names are checked.
    pub fn is_strict(&self) -> bool {
        self.operators.is_some()
    }

    fn check(&self, expr: &str) -> Result<Sexp, Vec<String>> {
        let sexp = parse(expr).map_err(|e| vec![e.to_string()])?;
        let Some(known) = &self.operators else {
            return Ok(sexp);
        };

        let mut unknown: Vec<String> = Vec::new();
        for operator in sexp.operators() {
            if !known.contains(&operator.to_lowercase()) && !unknown.iter().any(|u| u == operator) {
                unknown.push(operator.to_string());
            }
        }
        if unknown.is_empty() {
            Ok(sexp)
        } else {
            Err(unknown
                .into_iter()
                .map(|op| format!("unknown operator '{op}'"))
                .collect())
        }
    }
}

impl ExpressionValidator for SexpSyntaxValidator {
    fn validate_syntax(&self, expr: &str) -> bool {
        self.check(expr).is_ok()
    }

    fn get_errors(&self, expr: &str) -> Vec<String> {
        self.check(expr).err().unwrap_or_default()
    }

    fn referenced_names(&self, expr: &str) -> Vec<String> {
        let Ok(sexp) = parse(expr) else {
            return Vec::new();
        };
        let mut names: Vec<String> = Vec::new();
        for name in sexp.strings() {
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_expression() {
        let sexp = parse(r##"( when ( is-destroyed-delay 0 "Alpha 1" ) ( send-message "#Command" "High" "Go" ) )"##)
            .unwrap();
        assert_eq!(
            sexp.operators(),
            vec!["when", "is-destroyed-delay", "send-message"]
        );
        assert_eq!(sexp.strings(), vec!["Alpha 1", "#Command", "High", "Go"]);
    }

    #[test]
    fn test_parse_skips_comments() {
        let sexp = parse("; header\n( true ) ; trailing").unwrap();
        assert_eq!(
            sexp,
            Sexp::List {
                operator: "true".to_string(),
                args: Vec::new()
            }
        );
    }

    #[test]
    fn test_unbalanced_expression() {
        let err = parse("(+ 1").unwrap_err();
        assert_eq!(err.message, "missing closing parenthesis");
        assert_eq!(err.offset, 4);
        assert_eq!(err.to_string(), "missing closing parenthesis at offset 4");
    }

    #[test]
    fn test_extra_closing_parenthesis() {
        let err = parse("(true))").unwrap_err();
        assert_eq!(err.message, "unexpected ')'");
        assert_eq!(err.offset, 6);
    }

    #[test]
    fn test_empty_and_bare_inputs() {
        assert_eq!(parse("  ").unwrap_err().message, "expression is empty");
        assert_eq!(
            parse("true").unwrap_err().message,
            "expression must start with '('"
        );
        assert_eq!(parse("( )").unwrap_err().message, "expected operator");
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}{}", "(a ".repeat(depth), ")".repeat(depth));

        assert!(parse(&nested(MAX_NESTING_DEPTH)).is_ok());

        let err = parse(&nested(MAX_NESTING_DEPTH + 1)).unwrap_err();
        assert_eq!(err.message, "expression nested too deeply");
        assert_eq!(err.offset, MAX_NESTING_DEPTH * 3 + 1);

        let err = parse(&nested(10_000)).unwrap_err();
        assert_eq!(err.message, "expression nested too deeply");
    }

    #[test]
    fn test_unterminated_string() {
        let err = parse(r#"( send-message "oops )"#).unwrap_err();
        assert_eq!(err.message, "unterminated string");
    }

    #[test]
    fn test_validator_accepts_any_operator_by_default() {
        let validator = SexpSyntaxValidator::new();
        assert!(validator.validate_syntax("( frobnicate 1 2 )"));
        assert!(validator.get_errors("( frobnicate 1 2 )").is_empty());
    }

    #[test]
    fn test_standard_validator_rejects_unknown_operators() {
        let validator = SexpSyntaxValidator::standard();
        assert!(validator.is_strict());
        assert!(validator.validate_syntax("( AND ( true ) ( false ) )"));

        let errors = validator.get_errors("( and ( frobnicate ) ( frobnicate ) )");
        assert_eq!(errors, vec!["unknown operator 'frobnicate'"]);
    }

    #[test]
    fn test_referenced_names_are_distinct() {
        let validator = SexpSyntaxValidator::new();
        let names = validator
            .referenced_names(r#"( or ( is-destroyed-delay 0 "Alpha 1" ) ( has-arrived-delay 0 "Alpha 1" "Beta 2" ) )"#);
        assert_eq!(names, vec!["Alpha 1", "Beta 2"]);
        assert!(validator.referenced_names("(+ 1").is_empty());
    }
}
