use peg_core::{combinators::*, Grammar};
use peg_runtime::{DataValue, Reduction, Status};
use std::sync::Arc;

#[test]
fn literal_scenario() {
  let mut g: Grammar<()> = Grammar::new();
  g.define("s", literal("a"), None);

  let mut p = g.parser("s", ());
  p.accept("abc").unwrap();
  p.run().unwrap();
  assert_eq!(p.status(), Status::Success);
  assert_eq!(p.cursor(), 1);
}

#[test]
fn charset_scenario() {
  let mut g: Grammar<()> = Grammar::new();
  g.define("s", charset(&["abcd"]), None);

  let mut p = g.parser("s", ());
  p.accept("efg").unwrap();
  p.run().unwrap();
  assert_eq!(p.status(), Status::Failure);
  assert_eq!(p.cursor(), 0);

  let mut p2 = g.parser("s", ());
  p2.accept("bc").unwrap();
  p2.run().unwrap();
  assert_eq!(p2.status(), Status::Success);
  assert_eq!(p2.cursor(), 1);
  assert_eq!(p2.result(), Some(DataValue::List(vec![DataValue::Scalar('b')])));
}

#[test]
fn alternation_scenario() {
  let mut g: Grammar<()> = Grammar::new();
  g.define("s", choice(vec![literal("a"), literal("b")]), None);

  for (input, expect_status, expect_cursor) in [
    ("abc", Status::Success, 1),
    ("bc", Status::Success, 1),
    ("c", Status::Failure, 0),
  ] {
    let mut p = g.parser("s", ());
    p.accept(input).unwrap();
    p.run().unwrap();
    assert_eq!(p.status(), expect_status, "input {input:?}");
    assert_eq!(p.cursor(), expect_cursor, "input {input:?}");
  }
}

#[test]
fn repetition_scenario() {
  let mut g: Grammar<()> = Grammar::new();
  g.define("s", sequence(vec![zero_or_more(literal("a")), literal("b")]), None);

  for (input, expect_cursor) in [("bc", 1), ("abc", 2), ("aabc", 3)] {
    let mut p = g.parser("s", ());
    p.accept(input).unwrap();
    p.run().unwrap();
    assert_eq!(p.status(), Status::Success, "input {input:?}");
    assert_eq!(p.cursor(), expect_cursor, "input {input:?}");
  }
}

#[test]
fn csv_scenario() {
  let mut g: Grammar<()> = Grammar::new();

  g.define(
    "quoted",
    sequence(vec![
      consume(literal("\"")),
      zero_or_more(sequence(vec![not(literal("\"")), any()])),
      consume(literal("\"")),
    ]),
    Some(concat_reduction()),
  );

  g.define(
    "value",
    zero_or_more(sequence(vec![not(literal(",")), any()])),
    Some(concat_reduction()),
  );

  g.define(
    "data",
    choice(vec![rule_ref("quoted"), rule_ref("value")]),
    Some(identity_reduction()),
  );

  g.define(
    "s",
    sequence(vec![
      rule_ref("data"),
      zero_or_more(sequence(vec![consume(literal(",")), rule_ref("data")])),
    ]),
    None,
  );

  let mut p = g.parser("s", ());
  p.accept(r#"Here,are,"some,CSV",data"#).unwrap();
  p.run().unwrap();

  assert_eq!(p.status(), Status::Success);
  assert_eq!(
    p.result(),
    Some(DataValue::List(vec![
      DataValue::Str("Here".into()),
      DataValue::Str("are".into()),
      DataValue::Str("some,CSV".into()),
      DataValue::Str("data".into()),
    ]))
  );
}

fn int_reduction() -> Reduction<()> {
  Arc::new(|_ctx, data| {
    let digits: String = data
      .iter()
      .filter_map(|v| match v {
        DataValue::Scalar(c) => Some(*c),
        _ => None,
      })
      .collect();
    DataValue::Int(digits.parse().expect("term only captures digits"))
  })
}

fn product_reduction() -> Reduction<()> {
  Arc::new(|_ctx, mut data| {
    let rest = data.pop().expect("product body always pushes the optional tail");
    let term = data.pop().expect("product body always pushes the term").as_int().expect("term is an Int");
    let total = match rest {
      DataValue::Absent => term,
      DataValue::Int(n) => term * n,
      other => panic!("unexpected product tail {other:?}"),
    };
    DataValue::Int(total)
  })
}

fn sum_reduction() -> Reduction<()> {
  Arc::new(|_ctx, mut data| {
    let rest = data.pop().expect("sum body always pushes the optional tail");
    let product = data.pop().expect("sum body always pushes the product").as_int().expect("product is an Int");
    let total = match rest {
      DataValue::Absent => product,
      DataValue::Int(n) => product + n,
      other => panic!("unexpected sum tail {other:?}"),
    };
    DataValue::Int(total)
  })
}

#[test]
fn calculator_scenario() {
  let mut g: Grammar<()> = Grammar::new();

  g.define("term", one_or_more(charset(&["0-9"])), Some(int_reduction()));

  g.define(
    "product",
    sequence(vec![rule_ref("term"), zero_or_one(sequence(vec![consume(literal("*")), rule_ref("product")]))]),
    Some(product_reduction()),
  );

  g.define(
    "sum",
    sequence(vec![rule_ref("product"), zero_or_one(sequence(vec![consume(literal("+")), rule_ref("sum")]))]),
    Some(sum_reduction()),
  );

  g.define("s", rule_ref("sum"), Some(identity_reduction()));

  let mut p = g.parser("s", ());
  p.accept("1+23+4*15").unwrap();
  p.run().unwrap();

  assert_eq!(p.status(), Status::Success);
  assert_eq!(p.result(), Some(DataValue::Int(84)));
}

#[test]
fn word_boundary_match_all_scenario() {
  let mut g: Grammar<()> = Grammar::new();

  g.define("wb", lookaround(-1, charset(&["ab"])), None);
  g.define(
    "s",
    sequence(vec![consume(rule_ref("wb")), one_or_more(charset(&["ab"]))]),
    Some(concat_reduction()),
  );

  let mut p = g.parser("s", ());
  p.accept("aa bba   bbb").unwrap();

  let words: Vec<DataValue> = p.match_all().collect::<Result<_, _>>().expect("grammar is well-formed");
  assert_eq!(
    words,
    vec![DataValue::Str("aa".into()), DataValue::Str("bba".into()), DataValue::Str("bbb".into())]
  );
}

#[test]
fn any_except_rejects_each_tail_alternative_individually() {
  // any_except(",", "\"") must reject a lone comma or a lone quote, not just
  // the two-character run ",\"" — exercising the fix where `except` negated
  // each tail fragment rather than their concatenation.
  let mut g: Grammar<()> = Grammar::new();
  g.define("s", any_except(vec![literal(","), literal("\"")]), None);

  let mut p = g.parser("s", ());
  p.accept("a").unwrap();
  p.run().unwrap();
  assert_eq!(p.status(), Status::Success);
  assert_eq!(p.cursor(), 1);

  let mut p = g.parser("s", ());
  p.accept(",").unwrap();
  p.run().unwrap();
  assert_eq!(p.status(), Status::Failure);
  assert_eq!(p.cursor(), 0);

  let mut p = g.parser("s", ());
  p.accept("\"").unwrap();
  p.run().unwrap();
  assert_eq!(p.status(), Status::Failure);
  assert_eq!(p.cursor(), 0);

  // Under the old (buggy) `not(sequence(tail))` encoding, a lone comma not
  // followed by a quote would have matched: ",x" starts with a comma that
  // isn't part of the run ",\"", so `not(sequence([",", "\""]))` succeeds
  // and `any` would consume the comma. The fix must still reject it.
  let mut p = g.parser("s", ());
  p.accept(",x").unwrap();
  p.run().unwrap();
  assert_eq!(p.status(), Status::Failure);
  assert_eq!(p.cursor(), 0);
}
