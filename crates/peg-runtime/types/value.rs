use crate::types::code::Code;

/// A value produced by a capture, a reduction callback, or `zero_or_one`'s
/// default. This replaces the source implementation's fully dynamic
/// "anything a host callable can return" with a closed set of shapes — wide
/// enough to express every reduction in this crate's combinator surface
/// (string capture, list capture, integer folding) while staying `Debug` +
/// `PartialEq` so test assertions on parse results stay simple.
#[derive(Clone, Debug, PartialEq)]
pub enum DataValue {
  /// A single captured input scalar.
  Scalar(char),
  /// A joined run of scalars, produced by `join`/`string`.
  Str(String),
  /// An integer, typically produced by a numeric reduction.
  Int(i64),
  /// A floating point number, for reductions that need one.
  Float(f64),
  /// An ordered list of values, produced by `capture` or a user reduction.
  List(Vec<DataValue>),
  /// The sentinel produced by `zero_or_one`/`optional` when the body did not
  /// match.
  Absent,
}

impl DataValue {
  pub fn is_absent(&self) -> bool {
    matches!(self, DataValue::Absent)
  }

  /// Borrow the value as a `&str`, if it is a `Str`.
  pub fn as_str(&self) -> Option<&str> {
    match self {
      DataValue::Str(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_int(&self) -> Option<i64> {
    match self {
      DataValue::Int(n) => Some(*n),
      _ => None,
    }
  }

  pub fn as_list(&self) -> Option<&[DataValue]> {
    match self {
      DataValue::List(items) => Some(items),
      _ => None,
    }
  }
}

/// A cell on the VM's unified data/call stack. Bookkeeping cells
/// (`SavedPc`/`SavedCode`/`SavedFp`) and user-visible capture cells
/// (`Scalar`/`Value`) share one stack, per the source implementation's
/// `ret`/`reduce` contract: a rule's captures live strictly above the three
/// bookkeeping cells its `Jsr` pushed, and `Ret` unwinds both in one pass.
pub enum Cell<C> {
  Scalar(char),
  Value(DataValue),
  SavedPc(usize),
  SavedCode(Code<C>),
  SavedFp(usize),
}

impl<C> Cell<C> {
  /// Converts a capture cell into the `DataValue` a reduction callback
  /// sees. Only ever called on cells within a frame's capture range, which
  /// by construction never contains a bookkeeping cell.
  pub fn into_value(self) -> DataValue {
    match self {
      Cell::Scalar(c) => DataValue::Scalar(c),
      Cell::Value(v) => v,
      Cell::SavedPc(_) | Cell::SavedCode(_) | Cell::SavedFp(_) => {
        unreachable!("bookkeeping cell found within a capture frame")
      }
    }
  }

  /// Borrowing counterpart of `into_value`, used to read the final result
  /// cell off the stack without consuming it.
  pub fn to_value(&self) -> DataValue {
    match self {
      Cell::Scalar(c) => DataValue::Scalar(*c),
      Cell::Value(v) => v.clone(),
      Cell::SavedPc(_) | Cell::SavedCode(_) | Cell::SavedFp(_) => {
        unreachable!("bookkeeping cell found within a capture frame")
      }
    }
  }
}

impl<C> Clone for Cell<C> {
  fn clone(&self) -> Self {
    match self {
      Cell::Scalar(c) => Cell::Scalar(*c),
      Cell::Value(v) => Cell::Value(v.clone()),
      Cell::SavedPc(pc) => Cell::SavedPc(*pc),
      Cell::SavedCode(code) => Cell::SavedCode(code.clone()),
      Cell::SavedFp(fp) => Cell::SavedFp(*fp),
    }
  }
}

/// Terminal status of a `Parser`. Absent any halt, a fresh parser reports
/// `Unfinished` — the Rust equivalent of the source implementation's empty
/// string status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Status {
  #[default]
  Unfinished,
  Success,
  Failure,
}
