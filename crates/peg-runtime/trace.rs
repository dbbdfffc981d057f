use crate::types::Opcode;

/// A step-by-step observation hook for the VM dispatch loop. Entirely
/// optional and off the hot path by default — analogous to this lineage's
/// `Journal`/report mechanism, scaled down to what a bytecode interpreter
/// actually needs: one line per executed instruction, written wherever the
/// implementation chooses.
///
/// Not part of the correctness contract (§6 of the specification): a
/// `Parser` built without a trace behaves identically to one built with a
/// no-op trace.
pub trait Trace<C> {
  fn step(&self, pc: usize, op: &Opcode<C>, cursor: usize, stack_depth: usize);
}

/// Writes one line per step to stderr. The default choice when a caller
/// opts into tracing without supplying their own sink, matching this
/// lineage's habit of gating diagnostic `eprintln!` calls behind an opt-in
/// rather than a logging facade dependency.
#[derive(Default)]
pub struct StderrTrace;

impl<C> Trace<C> for StderrTrace {
  fn step(&self, pc: usize, op: &Opcode<C>, cursor: usize, stack_depth: usize) {
    eprintln!("{pc:4}: {op:?}  cursor={cursor} stack={stack_depth}");
  }
}
