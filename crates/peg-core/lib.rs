//! Grammar authoring and bytecode compilation for the PEG virtual machine.
//!
//! This crate turns combinators into `peg_runtime::Code` values and collects
//! named rules into a `Grammar`, which implements `peg_runtime::RuleTable` so
//! a `Parser` can resolve `Jsr` targets without `peg_runtime` depending back
//! on this crate.

pub mod combinators;
pub mod grammar;

pub use combinators::*;
pub use grammar::Grammar;
