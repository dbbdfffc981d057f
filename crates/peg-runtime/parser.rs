use crate::{
  trace::Trace,
  types::{Cell, Code, DataValue, Opcode, PegError, Reduction, RuleTable, Status},
};

/// A saved VM snapshot, restored by `Fail`. Forms a singly linked chain
/// rooted at `Parser::bp`; each `Choice` pushes one, each `Commit` or
/// `Fail` pops one.
struct BacktrackRecord<C> {
  prev: Option<Box<BacktrackRecord<C>>>,
  pc: usize,
  code: Code<C>,
  cursor: usize,
  sp: usize,
  fp: usize,
}

/// The register machine described in §3/§4 of the specification: a
/// program counter, an input cursor, a unified data/call stack, a frame
/// pointer, a backtrack-point chain, and a running flag. `G` is the
/// `RuleTable` the VM consults on every `Jsr`; `C` is the user context
/// threaded through reduction callbacks.
pub struct Parser<'g, C, G: RuleTable<C> + ?Sized = dyn RuleTable<C> + 'g> {
  grammar: &'g G,
  bootloader: Code<C>,
  code: Code<C>,
  pc: usize,
  input: Vec<char>,
  cursor: usize,
  stack: Vec<Cell<C>>,
  fp: usize,
  bp: Option<Box<BacktrackRecord<C>>>,
  running: bool,
  status: Status,
  clock: u64,
  step_limit: Option<u64>,
  trace: Option<Box<dyn Trace<C>>>,
  context: C,
}

impl<'g, C, G: RuleTable<C> + ?Sized> Parser<'g, C, G> {
  pub fn new(grammar: &'g G, start: &str, context: C) -> Self {
    let bootloader = Code::from_vec(vec![Opcode::Jsr(start.into()), Opcode::End]);
    Self {
      grammar,
      code: bootloader.clone(),
      bootloader,
      pc: 0,
      input: Vec::new(),
      cursor: 0,
      stack: Vec::new(),
      fp: 0,
      bp: None,
      running: true,
      status: Status::Unfinished,
      clock: 0,
      step_limit: None,
      trace: None,
      context,
    }
  }

  /// Enables an optional step-by-step dump through `Trace`. Not part of
  /// the correctness contract (§6).
  pub fn with_trace(mut self, trace: impl Trace<C> + 'static) -> Self {
    self.trace = Some(Box::new(trace));
    self
  }

  /// Caps the number of `step` calls a single `run`/`accept` will perform
  /// before forcing a failure halt. A safeguard for pathological grammars
  /// under fuzzing, not part of the core contract (§5).
  pub fn with_step_limit(mut self, limit: u64) -> Self {
    self.step_limit = Some(limit);
    self
  }

  pub fn status(&self) -> Status {
    self.status
  }

  pub fn running(&self) -> bool {
    self.running
  }

  pub fn cursor(&self) -> usize {
    self.cursor
  }

  pub fn context(&self) -> &C {
    &self.context
  }

  /// Appends `more`'s scalars to the input and drives the VM while it is
  /// running and unread input remains. The VM naturally suspends at
  /// whichever consuming instruction would exhaust the buffer.
  pub fn accept(&mut self, more: &str) -> Result<(), PegError> {
    self.input.extend(more.chars());
    while self.running && self.cursor < self.input.len() {
      self.step()?;
    }
    Ok(())
  }

  /// Drives the VM to completion. Call after the final `accept`.
  pub fn run(&mut self) -> Result<(), PegError> {
    while self.running {
      self.step()?;
    }
    Ok(())
  }

  /// Advances the cursor by `n` without re-driving the VM. Used between
  /// restarts to skip non-matching input (see `match_all`).
  pub fn skip(&mut self, n: usize) {
    self.cursor += n;
  }

  /// Resets the VM to re-enter the start rule at the current cursor.
  /// Input is *not* cleared. Returns whether unread input remains.
  pub fn restart(&mut self) -> bool {
    self.code = self.bootloader.clone();
    self.pc = 0;
    self.stack.clear();
    self.fp = 0;
    self.bp = None;
    self.running = true;
    self.status = Status::Unfinished;
    self.clock = 0;
    self.cursor < self.input.len()
  }

  /// The value produced by a successful parse, or `None` if the VM has not
  /// halted successfully.
  pub fn result(&self) -> Option<DataValue> {
    match self.status {
      Status::Success => self.stack.first().map(Cell::to_value),
      _ => None,
    }
  }

  /// A lazy producer of successive successful matches: on success, yields
  /// the result and restarts at the cursor; on failure with input
  /// remaining, skips one scalar and restarts; on failure with no input
  /// remaining, ends.
  pub fn match_all(&mut self) -> MatchAll<'_, 'g, C, G> {
    MatchAll { parser: self }
  }

  fn step(&mut self) -> Result<(), PegError> {
    let Some(op) = self.code.get(self.pc).cloned() else {
      // Falling off the end of a code sequence without an explicit `End`
      // or `Fail` is a malformed-program condition; treat it as an
      // unrecoverable failure rather than panicking.
      self.running = false;
      self.status = Status::Failure;
      return Ok(());
    };
    self.pc += 1;
    self.clock += 1;

    if let Some(trace) = &self.trace {
      trace.step(self.pc - 1, &op, self.cursor, self.stack.len());
    }

    if let Some(limit) = self.step_limit {
      if self.clock > limit {
        self.running = false;
        self.status = Status::Failure;
        return Ok(());
      }
    }

    match op {
      Opcode::Char(c) => {
        if self.input.get(self.cursor) == Some(&c) {
          self.stack.push(Cell::Scalar(c));
          self.cursor += 1;
        } else {
          self.fail();
        }
      }
      Opcode::CharSet(set) => match self.input.get(self.cursor) {
        Some(&c) if set.contains(c) => {
          self.stack.push(Cell::Scalar(c));
          self.cursor += 1;
        }
        _ => self.fail(),
      },
      Opcode::Any => match self.input.get(self.cursor) {
        Some(&c) => {
          self.stack.push(Cell::Scalar(c));
          self.cursor += 1;
        }
        None => self.fail(),
      },
      Opcode::Move(delta) => {
        let next = self.cursor as isize + delta;
        if next < 0 {
          self.fail();
        } else {
          self.cursor = next as usize;
        }
      }
      Opcode::PushD(value) => self.stack.push(Cell::Value(value)),
      Opcode::Jsr(name) => {
        let target = self.grammar.get(&name)?.clone();
        self.stack.push(Cell::SavedPc(self.pc));
        self.stack.push(Cell::SavedCode(self.code.clone()));
        self.stack.push(Cell::SavedFp(self.fp));
        self.fp = self.stack.len();
        self.code = target;
        self.pc = 0;
      }
      Opcode::Ret(action) => {
        let data = self.drain_frame();
        let (fp, code, pc) = self.pop_call_frame();
        self.fp = fp;
        self.code = code;
        self.pc = pc;
        let value = apply(&self.context, action.as_ref(), data);
        self.stack.push(Cell::Value(value));
      }
      Opcode::Call(action) => {
        let data = self.drain_frame();
        self.fp = self.pop_saved_fp();
        let value = action(&self.context, data);
        self.stack.push(Cell::Value(value));
      }
      Opcode::Frame => {
        self.stack.push(Cell::SavedFp(self.fp));
        self.fp = self.stack.len();
      }
      Opcode::Drop => {
        self.stack.truncate(self.fp);
        self.fp = self.pop_saved_fp();
      }
      Opcode::Reduce(action) => {
        let data = self.drain_frame();
        self.fp = self.pop_saved_fp();
        let value = apply(&self.context, action.as_ref(), data);
        self.stack.push(Cell::Value(value));
      }
      Opcode::Choice(offset) => {
        let target = (self.pc as isize + offset) as usize;
        self.bp = Some(Box::new(BacktrackRecord {
          prev: self.bp.take(),
          pc: target,
          code: self.code.clone(),
          cursor: self.cursor,
          sp: self.stack.len(),
          fp: self.fp,
        }));
      }
      Opcode::Commit(offset) => {
        self.bp = self.bp.take().and_then(|b| b.prev);
        self.pc = (self.pc as isize + offset) as usize;
      }
      Opcode::Fail => self.fail(),
      Opcode::End => {
        self.running = false;
        self.status = Status::Success;
      }
    }

    Ok(())
  }

  fn fail(&mut self) {
    match self.bp.take() {
      Some(b) => {
        self.pc = b.pc;
        self.code = b.code;
        self.cursor = b.cursor;
        self.stack.truncate(b.sp);
        self.fp = b.fp;
        self.bp = b.prev;
      }
      None => {
        self.running = false;
        self.status = Status::Failure;
      }
    }
  }

  /// Removes and converts every cell from `fp` to the stack top into the
  /// `DataValue`s a reduction callback sees. By construction this range
  /// never contains a bookkeeping cell: `Jsr`/`Frame` always push their
  /// bookkeeping cells *before* setting `fp`.
  fn drain_frame(&mut self) -> Vec<DataValue> {
    self.stack.split_off(self.fp).into_iter().map(Cell::into_value).collect()
  }

  fn pop_saved_fp(&mut self) -> usize {
    match self.stack.pop() {
      Some(Cell::SavedFp(fp)) => fp,
      _ => unreachable!("expected a saved frame pointer"),
    }
  }

  /// Pops the three bookkeeping cells a `Jsr` pushed, in the order `Ret`
  /// restores them: frame pointer, then code, then program counter.
  fn pop_call_frame(&mut self) -> (usize, Code<C>, usize) {
    let fp = self.pop_saved_fp();
    let code = match self.stack.pop() {
      Some(Cell::SavedCode(code)) => code,
      _ => unreachable!("expected a saved code reference"),
    };
    let pc = match self.stack.pop() {
      Some(Cell::SavedPc(pc)) => pc,
      _ => unreachable!("expected a saved program counter"),
    };
    (fp, code, pc)
  }
}

fn apply<C>(context: &C, action: Option<&Reduction<C>>, data: Vec<DataValue>) -> DataValue {
  match action {
    Some(f) => f(context, data),
    None => DataValue::List(data),
  }
}

/// Iterator returned by `Parser::match_all`. Yields `Err` only when a
/// grammar error (an undefined rule reference) is hit mid-scan — a
/// grammar-authoring bug rather than an ordinary scan failure.
pub struct MatchAll<'p, 'g, C, G: RuleTable<C> + ?Sized = dyn RuleTable<C> + 'g> {
  parser: &'p mut Parser<'g, C, G>,
}

impl<'p, 'g, C, G: RuleTable<C> + ?Sized> Iterator for MatchAll<'p, 'g, C, G> {
  type Item = Result<DataValue, PegError>;

  fn next(&mut self) -> Option<Self::Item> {
    loop {
      if let Err(e) = self.parser.run() {
        return Some(Err(e));
      }
      match self.parser.status {
        Status::Success => {
          let value = self.parser.result().expect("success implies a result");
          self.parser.restart();
          return Some(Ok(value));
        }
        Status::Failure => {
          if self.parser.cursor < self.parser.input.len() {
            self.parser.skip(1);
            self.parser.restart();
            continue;
          }
          return None;
        }
        Status::Unfinished => unreachable!("run() only returns once the VM has halted"),
      }
    }
  }
}
