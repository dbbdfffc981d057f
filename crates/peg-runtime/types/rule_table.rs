use crate::types::{Code, PegError};

/// The seam between the runtime `Parser` and whatever produced its
/// bytecode. `peg_core::Grammar` is the only implementation in this
/// workspace, but keeping the trait here (rather than a concrete
/// dependency on `peg_core`) is what lets this crate stay agnostic of how
/// `Code` values were built — mirroring how this lineage's runtime crate
/// never depends on its own grammar-compiler crate.
pub trait RuleTable<C> {
  /// Resolves a nonterminal name to its compiled rule body. Called by the
  /// VM's `Jsr` handler; a `Err` here is fatal and propagates out of
  /// `Parser::accept`/`Parser::run`.
  fn get(&self, name: &str) -> Result<&Code<C>, PegError>;
}
