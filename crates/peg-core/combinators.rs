use peg_runtime::{CharSet, Code, DataValue, IntoCode, Opcode, Reduction};
use std::sync::Arc;

/// Compiles a literal string to one `Char` instruction per scalar. The empty
/// string compiles to no instructions at all.
pub fn literal<C>(s: &str) -> Code<C> {
  Code::from_vec(s.chars().map(Opcode::Char).collect())
}

/// Compiles a character-set test. See `CharSet::new` for spec syntax.
pub fn charset<C, S: AsRef<str>>(specs: &[S]) -> Code<C> {
  Code::from_vec(vec![Opcode::CharSet(CharSet::new(specs))])
}

/// Matches any single scalar.
pub fn any<C>() -> Code<C> {
  Code::from_vec(vec![Opcode::Any])
}

/// Concatenates fragments in order. Aliased as `concat`.
pub fn sequence<C, T: IntoCode<C>>(parts: Vec<T>) -> Code<C> {
  parts.into_code()
}

/// Alias for `sequence`.
pub fn concat<C, T: IntoCode<C>>(parts: Vec<T>) -> Code<C> {
  sequence(parts)
}

/// Ordered choice: tries alternatives left to right, committing to the
/// first that matches. Right-associative: `choice(a, b, c)` compiles the
/// same as `choice(a, choice(b, c))`. A single alternative compiles to
/// exactly itself.
pub fn choice<C>(alts: Vec<Code<C>>) -> Code<C> {
  let mut iter = alts.into_iter().rev();
  let Some(last) = iter.next() else {
    return Code::empty();
  };
  iter.fold(last, |rest, alt| {
    let mut ops = Vec::with_capacity(alt.len() + rest.len() + 2);
    ops.push(Opcode::Choice(alt.len() as isize + 1));
    ops.extend(clone_ops(&alt));
    ops.push(Opcode::Commit(rest.len() as isize));
    ops.extend(clone_ops(&rest));
    Code::from_vec(ops)
  })
}

/// Zero-or-more repetition: re-enters the choice point after each successful
/// iteration, so failure of the body simply stops the loop rather than the
/// whole match.
pub fn zero_or_more<C>(p: impl IntoCode<C>) -> Code<C> {
  let body = p.into_code();
  let mut ops = Vec::with_capacity(body.len() + 2);
  ops.push(Opcode::Choice(body.len() as isize + 1));
  ops.extend(clone_ops(&body));
  ops.push(Opcode::Commit(-(body.len() as isize + 2)));
  Code::from_vec(ops)
}

/// One-or-more repetition: the body must match once, then repeats.
pub fn one_or_more<C>(p: impl IntoCode<C>) -> Code<C> {
  let body = p.into_code();
  Code::concat([body.clone(), zero_or_more(body)])
}

/// Matches the body zero or one times, pushing `DataValue::Absent` when it
/// did not match.
pub fn zero_or_one<C>(p: impl IntoCode<C>) -> Code<C> {
  optional(p, DataValue::Absent)
}

/// Matches the body zero or one times, pushing `default` when it did not
/// match.
pub fn optional<C>(p: impl IntoCode<C>, default: DataValue) -> Code<C> {
  let body = p.into_code();
  let mut ops = Vec::with_capacity(body.len() + 2);
  ops.push(Opcode::Choice(body.len() as isize + 1));
  ops.extend(clone_ops(&body));
  ops.push(Opcode::Commit(1));
  ops.push(Opcode::PushD(default));
  Code::from_vec(ops)
}

/// Negative lookahead: succeeds without consuming input iff the body fails.
pub fn not<C>(p: impl IntoCode<C>) -> Code<C> {
  let body = p.into_code();
  let mut ops = Vec::with_capacity(body.len() + 3);
  ops.push(Opcode::Choice(body.len() as isize + 2));
  ops.extend(clone_ops(&body));
  ops.push(Opcode::Commit(0));
  ops.push(Opcode::Fail);
  Code::from_vec(ops)
}

/// Positive lookahead: succeeds without consuming input iff the body
/// matches.
pub fn and<C>(p: impl IntoCode<C>) -> Code<C> {
  not(not(p.into_code()))
}

/// Tests the body at a cursor offset `delta` from the current position
/// without consuming input; negative `delta` implements lookbehind.
pub fn lookaround<C>(delta: isize, p: impl IntoCode<C>) -> Code<C> {
  not(Code::concat([Code::from_vec(vec![Opcode::Move(delta)]), p.into_code()]))
}

/// References a named rule, resolved by the grammar at `Jsr` time.
pub fn rule_ref<C>(name: impl Into<Box<str>>) -> Code<C> {
  Code::from_vec(vec![Opcode::Jsr(name.into())])
}

/// Matches the body and discards its captures.
pub fn consume<C>(p: impl IntoCode<C>) -> Code<C> {
  let body = p.into_code();
  Code::concat([Code::from_vec(vec![Opcode::Frame]), body, Code::from_vec(vec![Opcode::Drop])])
}

/// Matches the body and packs its captures into a `DataValue::List`.
pub fn capture<C>(p: impl IntoCode<C>) -> Code<C> {
  let body = p.into_code();
  Code::concat([Code::from_vec(vec![Opcode::Frame]), body, Code::from_vec(vec![Opcode::Reduce(None)])])
}

/// Matches the body and joins its captures into a `DataValue::Str`.
pub fn join<C>(p: impl IntoCode<C>) -> Code<C> {
  let body = p.into_code();
  Code::concat([
    Code::from_vec(vec![Opcode::Frame]),
    body,
    Code::from_vec(vec![Opcode::Reduce(Some(concat_reduction()))]),
  ])
}

/// One or more repetitions of the body, joined into a single string.
pub fn string<C>(p: impl IntoCode<C>) -> Code<C> {
  join(one_or_more(p))
}

/// Matches `head` only where none of `tail`'s alternatives match at the
/// current position: each tail fragment is negated individually
/// (De Morgan-equivalent to `not(choice(tail)); head`), not the
/// concatenation of all of them.
pub fn except<C>(head: impl IntoCode<C>, tail: Vec<Code<C>>) -> Code<C> {
  Code::concat(tail.into_iter().map(not).chain([head.into_code()]))
}

/// `any()` excluding the given alternatives.
pub fn any_except<C>(tail: Vec<Code<C>>) -> Code<C> {
  except(any(), tail)
}

fn clone_ops<C>(code: &Code<C>) -> Vec<Opcode<C>> {
  code.iter().cloned().collect()
}

/// A reduction that concatenates captured scalars/strings into one
/// `DataValue::Str`. This is what `join`/`string` install on their internal
/// `Reduce`, and is also the natural `action` to pass to `Grammar::define`
/// for a named rule whose whole purpose is joining its captures into text.
pub fn concat_reduction<C>() -> Reduction<C> {
  Arc::new(|_ctx, data| {
    let mut s = String::new();
    for value in data {
      match value {
        DataValue::Scalar(c) => s.push(c),
        DataValue::Str(sub) => s.push_str(&sub),
        _ => {}
      }
    }
    DataValue::Str(s)
  })
}

/// A reduction that passes a single capture through unchanged, dropping the
/// list wrapper a default `Ret`/`Reduce` would otherwise apply. Useful for a
/// rule that is itself just a `choice` between alternatives already
/// producing the desired shape, e.g. `data := choice(quoted, value)`.
pub fn identity_reduction<C>() -> Reduction<C> {
  Arc::new(|_ctx, mut data| data.pop().unwrap_or(DataValue::Absent))
}
