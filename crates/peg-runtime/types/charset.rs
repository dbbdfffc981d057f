use std::collections::BTreeSet;

/// An immutable sparse set of Unicode scalar values.
///
/// Backed by a `BTreeSet` rather than a per-plane bitset: grammars tend to
/// build small, sparse sets (a handful of punctuation scalars, one or two
/// ranges) and the sorted-set representation keeps `union`/`difference`
/// simple without committing to a fixed address space up front.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CharSet(BTreeSet<char>);

impl CharSet {
  /// Builds a set from any number of specs. Each spec is either a
  /// three-character range of the form `"x-y"` (`x <= y`), or a string
  /// whose individual scalars are each added to the set.
  pub fn new<S: AsRef<str>>(specs: &[S]) -> Self {
    let mut set = BTreeSet::new();
    for spec in specs {
      add_spec(&mut set, spec.as_ref());
    }
    Self(set)
  }

  pub fn contains(&self, c: char) -> bool {
    self.0.contains(&c)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
    self.0.iter().copied()
  }

  /// Returns a new set containing every scalar in `self` plus every scalar
  /// named by `specs`.
  pub fn union<S: AsRef<str>>(&self, specs: &[S]) -> Self {
    let mut set = self.0.clone();
    for spec in specs {
      add_spec(&mut set, spec.as_ref());
    }
    Self(set)
  }

  /// Returns a new set containing every scalar in `self` that is not named
  /// by `specs`.
  pub fn difference<S: AsRef<str>>(&self, specs: &[S]) -> Self {
    let remove = Self::new(specs);
    Self(self.0.difference(&remove.0).copied().collect())
  }
}

impl FromIterator<char> for CharSet {
  fn from_iter<T: IntoIterator<Item = char>>(iter: T) -> Self {
    Self(iter.into_iter().collect())
  }
}

fn add_spec(set: &mut BTreeSet<char>, spec: &str) {
  let chars: Vec<char> = spec.chars().collect();
  if chars.len() == 3 && chars[1] == '-' && chars[0] <= chars[2] {
    let (lo, hi) = (chars[0], chars[2]);
    for c in lo..=hi {
      set.insert(c);
    }
  } else {
    for c in chars {
      set.insert(c);
    }
  }
}

/// Convenience entry point mirroring the combinator surface's `charset(...)`.
pub fn charset<S: AsRef<str>>(specs: &[S]) -> CharSet {
  CharSet::new(specs)
}
