use crate::combinators::rule_ref;
use peg_runtime::{Code, IntoCode, Opcode, Parser, PegError, Reduction, RuleTable};
use std::collections::HashMap;

/// A set of named rules, each compiled to an instruction sequence ending in
/// `Ret`. Implements `RuleTable` so a `Parser` can resolve `rule_ref`/`Jsr`
/// targets without this crate's `Code` type being known to `peg_runtime`.
///
/// Lookups by name use a plain `HashMap`: nothing in this crate's control
/// flow depends on iteration order, only on name resolution at `Jsr` time,
/// so there is no call for an order-preserving map here.
#[derive(Default)]
pub struct Grammar<C> {
  rules: HashMap<Box<str>, Code<C>>,
}

impl<C> Grammar<C> {
  pub fn new() -> Self {
    Self { rules: HashMap::new() }
  }

  /// Normalizes `program` via `IntoCode`, appends a `Ret` carrying `action`,
  /// and stores the result under `name`. Returns a `rule_ref(name)` fragment
  /// so the defined rule can be composed into later rule bodies immediately.
  pub fn define(&mut self, name: impl Into<Box<str>>, program: impl IntoCode<C>, action: Option<Reduction<C>>) -> Code<C> {
    let name = name.into();
    let body = program.into_code();
    let code = Code::concat([body, Code::from_vec(vec![Opcode::Ret(action)])]);
    self.rules.insert(name.clone(), code);
    rule_ref(name)
  }

  pub fn get(&self, name: &str) -> Result<&Code<C>, PegError> {
    self.rules.get(name).ok_or_else(|| PegError::RuleNotFound(name.into()))
  }

  /// Builds a `Parser` bound to this grammar, entering at `start` with the
  /// given user context.
  pub fn parser<'g>(&'g self, start: &str, context: C) -> Parser<'g, C, Self> {
    Parser::new(self, start, context)
  }
}

impl<C> RuleTable<C> for Grammar<C> {
  fn get(&self, name: &str) -> Result<&Code<C>, PegError> {
    Grammar::get(self, name)
  }
}
