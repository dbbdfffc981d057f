use peg_core::{combinators::*, Grammar};
use peg_runtime::Status;

#[test]
fn empty_input_matching_empty_grammar_succeeds_at_zero() {
  let mut g: Grammar<()> = Grammar::new();
  g.define("s", zero_or_more(literal("a")), None);

  let mut p = g.parser("s", ());
  p.run().unwrap();
  assert_eq!(p.status(), Status::Success);
  assert_eq!(p.cursor(), 0);
}

#[test]
fn any_fails_at_end_of_input() {
  let mut g: Grammar<()> = Grammar::new();
  g.define("s", any(), None);

  let mut p = g.parser("s", ());
  p.run().unwrap();
  assert_eq!(p.status(), Status::Failure);
  assert_eq!(p.cursor(), 0);
}

#[test]
fn move_negative_one_fails_at_cursor_zero() {
  let mut g: Grammar<()> = Grammar::new();
  // lookaround(-1, any()) compiles to not(Move(-1); any()); Move(-1) at
  // cursor 0 fails, so the predicate (negated) should succeed.
  g.define("s", lookaround(-1, any()), None);

  let mut p = g.parser("s", ());
  p.accept("x").unwrap();
  p.run().unwrap();
  assert_eq!(p.status(), Status::Success);
  assert_eq!(p.cursor(), 0);
}
