use std::fmt::{self, Display};

/// Every error this crate can produce. Match failure is deliberately not a
/// member of this enum — it is signalled through `Parser::status`, not
/// through `Result::Err`, per the specification's three-kind error design:
/// match failure is an expected outcome, grammar errors and callback panics
/// are not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PegError {
  /// A `rule_ref`/`Jsr` named a nonterminal that was never `define`d. This
  /// is a grammar-authoring bug, not a parse failure, and is fatal: the
  /// parser that raised it should be discarded.
  RuleNotFound(Box<str>),
}

impl Display for PegError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PegError::RuleNotFound(name) => write!(f, "rule not found: `{name}`"),
    }
  }
}

impl std::error::Error for PegError {}
