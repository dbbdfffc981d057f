use peg_core::{combinators::*, Grammar};
use peg_runtime::{DataValue, Status};

#[test]
fn predicate_leaves_cursor_unchanged_on_success_and_failure() {
  let mut g: Grammar<()> = Grammar::new();
  g.define("s", sequence(vec![not(literal("a")), any()]), None);

  // "b": not("a") succeeds without consuming, then `any` consumes the 'b'.
  let mut p = g.parser("s", ());
  p.accept("b").unwrap();
  p.run().unwrap();
  assert_eq!(p.status(), Status::Success);
  assert_eq!(p.cursor(), 1);

  // "a": not("a") itself fails (since "a" matches), so the whole sequence
  // fails before `any` ever runs. Put it inside a choice so the ordered-
  // choice ancestor restores the cursor and gets a chance to retry the
  // second alternative from position 0 — this is what proves the
  // predicate didn't leak a consumed position past its own failure.
  let mut g2: Grammar<()> = Grammar::new();
  g2.define("s", choice(vec![sequence(vec![not(literal("a")), any()]), consume(literal("a"))]), None);
  let mut p2 = g2.parser("s", ());
  p2.accept("a").unwrap();
  p2.run().unwrap();
  assert_eq!(p2.status(), Status::Success);
  assert_eq!(p2.cursor(), 1);
}

#[test]
fn consume_discards_captures_but_still_advances_cursor() {
  let mut g: Grammar<()> = Grammar::new();
  g.define("s", capture(consume(literal("abc"))), None);

  let mut p = g.parser("s", ());
  p.accept("abc").unwrap();
  p.run().unwrap();
  assert_eq!(p.status(), Status::Success);
  assert_eq!(p.cursor(), 3);
  assert_eq!(p.result(), Some(DataValue::List(vec![DataValue::List(vec![])])));
}

#[test]
fn capture_pushes_exactly_one_cell() {
  let mut g: Grammar<()> = Grammar::new();
  g.define("s", capture(sequence(vec![literal::<()>("a"), literal("b")])), None);

  let mut p = g.parser("s", ());
  p.accept("ab").unwrap();
  p.run().unwrap();
  // The outer Ret(None) wraps its frame in a List; capture(...) contributed
  // exactly one Value cell to that frame, so the outer list has length 1.
  match p.result() {
    Some(DataValue::List(items)) => assert_eq!(items.len(), 1),
    other => panic!("expected a singleton list, got {other:?}"),
  }
}

#[test]
fn matching_prefix_halts_at_prefix_length() {
  let mut g: Grammar<()> = Grammar::new();
  g.define("s", literal("ab"), None);

  let mut p = g.parser("s", ());
  p.accept("ab").unwrap();
  p.run().unwrap();
  assert_eq!(p.status(), Status::Success);
  assert_eq!(p.cursor(), 2);
}

#[test]
fn incremental_feeding_matches_single_shot_feeding() {
  let mut g: Grammar<()> = Grammar::new();
  g.define(
    "s",
    sequence(vec![zero_or_more(literal("a")), literal("b")]),
    None,
  );

  let mut whole = g.parser("s", ());
  whole.accept("aaab").unwrap();
  whole.run().unwrap();

  let mut split = g.parser("s", ());
  split.accept("aa").unwrap();
  split.accept("ab").unwrap();
  split.run().unwrap();

  assert_eq!(whole.status(), split.status());
  assert_eq!(whole.cursor(), split.cursor());
  assert_eq!(whole.result(), split.result());
}
