use std::fmt;

use log::{debug, trace};

use super::options::CmpOption;
use super::reflect::{Entry, Field, Kind, Reflect};

/// Reports whether `left` and `right` are deeply equal under `options`.
///
/// Values of different types are never equal, even when they would compare
/// equal numerically. A type's own [`Reflect::equal_method`] takes precedence
/// over its structure, and a matching [`CmpOption::comparer`] takes precedence
/// over both. Map keys are matched with the same equality.
///
/// # Panics
///
/// Panics when a struct with unexported fields is reachable from either value
/// and no option either allows or ignores them, and when an opaque value
/// without an equality method is reachable. Both values are always traversed
/// in full, so the outcome does not depend on where they first differ.
pub fn equal(left: &dyn Reflect, right: &dyn Reflect, options: &[CmpOption]) -> bool {
  let verdict = Comparator::new(options).equal(left, right, &Path::root(left));
  debug!("{} and {} are {}", left.type_name(), right.type_name(), if verdict { "equal" } else { "not equal" });
  verdict
}

#[derive(Debug, Clone)]
pub(crate) struct Path(String);

impl Path {
  pub(crate) fn root(value: &dyn Reflect) -> Self {
    Path(value.type_name())
  }

  pub(crate) fn index(&self, index: usize) -> Self {
    Path(format!("{}[{}]", self.0, index))
  }

  pub(crate) fn key(&self, key: &str) -> Self {
    Path(format!("{}[{}]", self.0, key))
  }

  pub(crate) fn field(&self, name: &str) -> Self {
    Path(format!("{}.{}", self.0, name))
  }
}

impl fmt::Display for Path {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

pub(crate) fn same_type(left: &dyn Reflect, right: &dyn Reflect) -> bool {
  left.as_any().type_id() == right.as_any().type_id()
}

/// Map entries of both sides, paired by key. An entry without a counterpart pairs with `None`.
pub(crate) type Pair<'a> = (Option<Entry<'a>>, Option<Entry<'a>>);

fn label<'p>(pair: &'p Pair<'_>) -> &'p str {
  pair.0.as_ref().or(pair.1.as_ref()).map_or("", |entry| entry.label.as_str())
}

pub(crate) struct Comparator<'o> {
  options: &'o [CmpOption],
}

impl<'o> Comparator<'o> {
  pub(crate) fn new(options: &'o [CmpOption]) -> Self {
    Comparator { options }
  }

  pub(crate) fn equal(&self, left: &dyn Reflect, right: &dyn Reflect, path: &Path) -> bool {
    match (left.is_nil(), right.is_nil()) {
      (true, true) => return true,
      (true, false) | (false, true) => {
        trace!("{}: only one side is nil", path);
        self.inspect(left, path);
        self.inspect(right, path);
        return false;
      }
      (false, false) => {}
    }
    if !same_type(left, right) {
      trace!("{}: {} is not {}", path, left.type_name(), right.type_name());
      self.inspect(left, path);
      self.inspect(right, path);
      return false;
    }
    if let Some(verdict) = self.custom(left, right) {
      return verdict;
    }
    self.structural(left, right, path)
  }

  /// The verdict of the first applicable comparer, else of the value's own equality method.
  pub(crate) fn custom(&self, left: &dyn Reflect, right: &dyn Reflect) -> Option<bool> {
    if let Some(verdict) = self.options.iter().find_map(|option| option.compare(left, right)) {
      trace!("{}: comparer says {}", left.type_name(), verdict);
      return Some(verdict);
    }
    let verdict = left.equal_method(right);
    if let Some(verdict) = verdict {
      trace!("{}: equality method says {}", left.type_name(), verdict);
    }
    verdict
  }

  fn structural(&self, left: &dyn Reflect, right: &dyn Reflect, path: &Path) -> bool {
    match (left.kind(), right.kind()) {
      (Kind::Bool(x), Kind::Bool(y)) => x == y,
      (Kind::Int(x), Kind::Int(y)) => x == y,
      (Kind::Uint(x), Kind::Uint(y)) => x == y,
      (Kind::Float(x), Kind::Float(y)) => x == y,
      (Kind::Char(x), Kind::Char(y)) => x == y,
      (Kind::Str(x), Kind::Str(y)) => x == y,
      (Kind::Deref(x), Kind::Deref(y)) => self.equal(x, y, path),
      (Kind::Seq(xs), Kind::Seq(ys)) => {
        let mut verdict = xs.len() == ys.len();
        for (index, (x, y)) in xs.iter().zip(ys.iter()).enumerate() {
          verdict &= self.equal(*x, *y, &path.index(index));
        }
        for (index, extra) in xs.iter().enumerate().skip(ys.len()).chain(ys.iter().enumerate().skip(xs.len())) {
          self.inspect(*extra, &path.index(index));
        }
        verdict
      }
      (Kind::Map(xs), Kind::Map(ys)) => {
        let mut verdict = true;
        for pair in self.pairs(xs, ys, path) {
          verdict &= match pair {
            (Some(x), Some(y)) => self.equal(x.value, y.value, &path.key(&x.label)),
            (Some(lone), None) | (None, Some(lone)) => {
              self.inspect_entry(&lone, path);
              false
            }
            (None, None) => true,
          };
        }
        verdict
      }
      (Kind::Struct(xs), Kind::Struct(ys)) => {
        let xs = self.visible(left, xs, path);
        let ys = self.visible(right, ys, path);
        let mut verdict = xs.len() == ys.len();
        for (x, y) in xs.iter().zip(ys.iter()) {
          verdict &= self.equal(x.value, y.value, &path.field(x.name)) && x.name == y.name;
        }
        verdict
      }
      (Kind::Opaque, Kind::Opaque) => self.opaque(left, path),
      _ => false,
    }
  }

  /// Pairs the entries of two maps whose keys are equal, in the order of their labels.
  pub(crate) fn pairs<'a>(&self, xs: Vec<Entry<'a>>, ys: Vec<Entry<'a>>, path: &Path) -> Vec<Pair<'a>> {
    let mut unmatched = ys.into_iter().map(Some).collect::<Vec<_>>();
    let mut pairs = Vec::with_capacity(xs.len() + unmatched.len());
    for x in xs {
      let key_path = path.key(&x.label);
      let position = unmatched
        .iter()
        .position(|candidate| candidate.as_ref().is_some_and(|y| self.equal(x.key, y.key, &key_path)));
      let y = position.and_then(|position| unmatched[position].take());
      pairs.push((Some(x), y));
    }
    pairs.extend(unmatched.into_iter().flatten().map(|y| (None, Some(y))));
    pairs.sort_by(|left, right| label(left).cmp(label(right)));
    pairs
  }

  /// Walks a value that has no counterpart, applying the same field and opaque rules as a comparison.
  pub(crate) fn inspect(&self, value: &dyn Reflect, path: &Path) {
    if value.is_nil() || self.custom(value, value).is_some() {
      return;
    }
    match value.kind() {
      Kind::Deref(inner) => self.inspect(inner, path),
      Kind::Seq(items) => {
        for (index, item) in items.into_iter().enumerate() {
          self.inspect(item, &path.index(index));
        }
      }
      Kind::Map(entries) => {
        for entry in entries {
          self.inspect_entry(&entry, path);
        }
      }
      Kind::Struct(fields) => {
        for field in self.visible(value, fields, path) {
          self.inspect(field.value, &path.field(field.name));
        }
      }
      Kind::Opaque => {
        self.opaque(value, path);
      }
      _ => {}
    }
  }

  fn inspect_entry(&self, entry: &Entry<'_>, path: &Path) {
    let path = path.key(&entry.label);
    self.inspect(entry.key, &path);
    self.inspect(entry.value, &path);
  }

  fn opaque(&self, value: &dyn Reflect, path: &Path) -> bool {
    panic!(
      "cannot compare opaque value at {}: {} has no equality method, consider using CmpOption::comparer::<{}>",
      path,
      value.type_name(),
      value.type_name()
    )
  }

  /// The fields of `owner` that take part in the comparison.
  pub(crate) fn visible<'a>(&self, owner: &dyn Reflect, fields: Vec<Field<'a>>, path: &Path) -> Vec<Field<'a>> {
    let hidden = match fields.iter().find(|field| !field.exported) {
      None => return fields,
      Some(field) => field.name,
    };
    let type_id = owner.as_any().type_id();
    if self.options.iter().any(|option| option.exports(type_id)) {
      return fields;
    }
    if self.options.iter().any(|option| option.ignores_unexported(type_id)) {
      return fields.into_iter().filter(|field| field.exported).collect();
    }
    let type_name = owner.type_name();
    panic!(
      "cannot handle unexported field at {}:\n\t\
       consider using CmpOption::comparer, CmpOption::allow_unexported::<{}>() or CmpOption::ignore_unexported::<{}>()",
      path.field(hidden),
      type_name,
      type_name
    )
  }
}
