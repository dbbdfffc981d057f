//! Single-import facade over the PEG grammar compiler and bytecode VM.
//!
//! ```
//! use peg::{combinators::*, DataValue, Grammar};
//!
//! let mut g: Grammar<()> = Grammar::new();
//! g.define("s", literal("a"), None);
//! let mut p = g.parser("s", ());
//! p.accept("a").unwrap();
//! p.run().unwrap();
//! assert_eq!(p.result(), Some(DataValue::List(vec![DataValue::Scalar('a')])));
//! ```

pub use peg_core::{combinators, Grammar};
pub use peg_runtime::{
  CharSet, Code, DataValue, IntoCode, MatchAll, Opcode, Parser, PegError, Reduction, RuleTable, Status, StderrTrace, Trace,
};
