use crate::types::{CharSet, DataValue};
use std::{fmt::Debug, sync::Arc};

/// A user reduction callback: given the parser's context and the captures
/// collected since the matching `Frame`/`Jsr`, produce a single replacement
/// value. Reductions are `Arc`-shared rather than boxed so that cloning a
/// rule's `Code` (which happens every time it is pushed onto the backtrack
/// chain or the call stack as a `SavedCode` cell) never duplicates the
/// closure itself, and so that a `Grammar` built on one thread stays usable
/// — read-only — from a `Parser` handed to another (§5: grammars are
/// `Sync`, live parser state is not).
pub type Reduction<C> = Arc<dyn Fn(&C, Vec<DataValue>) -> DataValue + Send + Sync>;

/// A single VM instruction. Operands are typed fields on the variant rather
/// than a separate operand word, per this crate's choice to model opcodes
/// as a closed enum dispatched via `match` instead of reproducing the
/// source implementation's string-keyed method dispatch.
pub enum Opcode<C> {
  Char(char),
  CharSet(CharSet),
  Any,
  Move(isize),
  PushD(DataValue),
  Jsr(Box<str>),
  Ret(Option<Reduction<C>>),
  Call(Reduction<C>),
  Frame,
  Drop,
  Reduce(Option<Reduction<C>>),
  Choice(isize),
  Commit(isize),
  Fail,
  End,
}

impl<C> Clone for Opcode<C> {
  fn clone(&self) -> Self {
    match self {
      Opcode::Char(c) => Opcode::Char(*c),
      Opcode::CharSet(s) => Opcode::CharSet(s.clone()),
      Opcode::Any => Opcode::Any,
      Opcode::Move(d) => Opcode::Move(*d),
      Opcode::PushD(v) => Opcode::PushD(v.clone()),
      Opcode::Jsr(name) => Opcode::Jsr(name.clone()),
      Opcode::Ret(f) => Opcode::Ret(f.clone()),
      Opcode::Call(f) => Opcode::Call(f.clone()),
      Opcode::Frame => Opcode::Frame,
      Opcode::Drop => Opcode::Drop,
      Opcode::Reduce(f) => Opcode::Reduce(f.clone()),
      Opcode::Choice(off) => Opcode::Choice(*off),
      Opcode::Commit(off) => Opcode::Commit(*off),
      Opcode::Fail => Opcode::Fail,
      Opcode::End => Opcode::End,
    }
  }
}

impl<C> Debug for Opcode<C> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Opcode::Char(c) => write!(f, "char {c:?}"),
      Opcode::CharSet(s) => write!(f, "charset {s:?}"),
      Opcode::Any => write!(f, "any"),
      Opcode::Move(d) => write!(f, "move {d}"),
      Opcode::PushD(v) => write!(f, "pushd {v:?}"),
      Opcode::Jsr(name) => write!(f, "jsr {name}"),
      Opcode::Ret(f_) => write!(f, "ret{}", if f_.is_some() { " <callback>" } else { "" }),
      Opcode::Call(_) => write!(f, "call <callback>"),
      Opcode::Frame => write!(f, "frame"),
      Opcode::Drop => write!(f, "drop"),
      Opcode::Reduce(f_) => write!(f, "reduce{}", if f_.is_some() { " <callback>" } else { "" }),
      Opcode::Choice(off) => write!(f, "choice {off}"),
      Opcode::Commit(off) => write!(f, "commit {off}"),
      Opcode::Fail => write!(f, "fail"),
      Opcode::End => write!(f, "end"),
    }
  }
}

/// An immutable instruction sequence. Cheaply `Clone`-able (`Arc`-shared)
/// since the VM clones a rule's `Code` into a `SavedCode` cell on every
/// `Jsr`.
#[derive(Clone)]
pub struct Code<C>(Arc<[Opcode<C>]>);

impl<C> Code<C> {
  pub fn empty() -> Self {
    Self(Arc::from(Vec::new().into_boxed_slice()))
  }

  pub fn from_vec(ops: Vec<Opcode<C>>) -> Self {
    Self(Arc::from(ops.into_boxed_slice()))
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn get(&self, pc: usize) -> Option<&Opcode<C>> {
    self.0.get(pc)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Opcode<C>> {
    self.0.iter()
  }

  /// Concatenates a sequence of `Code` fragments into one.
  pub fn concat(parts: impl IntoIterator<Item = Code<C>>) -> Self {
    let mut ops = Vec::new();
    for part in parts {
      ops.extend(part.0.iter().cloned());
    }
    Self::from_vec(ops)
  }
}

impl<C> Debug for Code<C> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let mut list = f.debug_list();
    for (i, op) in self.0.iter().enumerate() {
      list.entry(&format!("{i:3}: {op:?}"));
    }
    list.finish()
  }
}

impl<C> PartialEq for Code<C> {
  /// Structural equality by instruction shape, ignoring reduction callback
  /// identity (closures are not comparable). Used by the compilation
  /// invariant tests in §8 of the specification (e.g. `choice(a)==a`).
  fn eq(&self, other: &Self) -> bool {
    if self.0.len() != other.0.len() {
      return false;
    }
    self.0.iter().zip(other.0.iter()).all(|(a, b)| opcode_shape_eq(a, b))
  }
}

fn opcode_shape_eq<C>(a: &Opcode<C>, b: &Opcode<C>) -> bool {
  use Opcode::*;
  match (a, b) {
    (Char(a), Char(b)) => a == b,
    (CharSet(a), CharSet(b)) => a == b,
    (Any, Any) => true,
    (Move(a), Move(b)) => a == b,
    (PushD(a), PushD(b)) => a == b,
    (Jsr(a), Jsr(b)) => a == b,
    (Ret(a), Ret(b)) => a.is_some() == b.is_some(),
    (Call(_), Call(_)) => true,
    (Frame, Frame) => true,
    (Drop, Drop) => true,
    (Reduce(a), Reduce(b)) => a.is_some() == b.is_some(),
    (Choice(a), Choice(b)) => a == b,
    (Commit(a), Commit(b)) => a == b,
    (Fail, Fail) => true,
    (End, End) => true,
    _ => false,
  }
}

/// Normalizes a grammar fragment into a `Code` value. Implemented for
/// `Code` itself (identity), for string literals (treated as `literal(s)`),
/// and for slices/vectors of fragments (treated as their concatenation) —
/// the three shapes `Grammar::define` and the sequencing combinators accept
/// per the specification's data model.
pub trait IntoCode<C> {
  fn into_code(self) -> Code<C>;
}

impl<C> IntoCode<C> for Code<C> {
  fn into_code(self) -> Code<C> {
    self
  }
}

impl<C> IntoCode<C> for &str {
  fn into_code(self) -> Code<C> {
    Code::from_vec(self.chars().map(Opcode::Char).collect())
  }
}

impl<C> IntoCode<C> for String {
  fn into_code(self) -> Code<C> {
    self.as_str().into_code()
  }
}

impl<C, T: IntoCode<C>> IntoCode<C> for Vec<T> {
  fn into_code(self) -> Code<C> {
    Code::concat(self.into_iter().map(IntoCode::into_code))
  }
}
