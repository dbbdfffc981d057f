//! Runtime primitives for the PEG bytecode virtual machine.
//!
//! This crate knows nothing about combinators or grammar authoring. It owns
//! the instruction representation, the character-set and capture-value
//! types, and the register machine (`Parser`) that executes a `Code`
//! sequence against accumulated input. Bytecode is produced elsewhere
//! (`peg_core`) and handed to the `Parser` through the `RuleTable` seam so
//! this crate never depends back on the combinator layer.

pub mod parser;
pub mod trace;
pub mod types;

pub use parser::{MatchAll, Parser};
pub use trace::{StderrTrace, Trace};
pub use types::*;
