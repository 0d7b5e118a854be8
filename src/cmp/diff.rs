use log::debug;
use similar::algorithms::{myers, Capture};
use similar::DiffTag;

use super::equal::{same_type, Comparator, Path};
use super::options::CmpOption;
use super::reflect::{Entry, Field, Kind, Reflect};

/// Strings longer than this are diffed character by character.
const LONG_STRING: usize = 64;

/// Renders the differences between `left` and `right` under `options`.
///
/// Returns an empty string when the values are [`equal`](super::equal).
/// Otherwise every line starts with `"  "` when it is common to both values,
/// `"- "` when it only describes `left` and `"+ "` when it only describes
/// `right`, followed by one tab per level of nesting.
///
/// # Panics
///
/// Under the same conditions as [`equal`](super::equal).
pub fn diff(left: &dyn Reflect, right: &dyn Reflect, options: &[CmpOption]) -> String {
  let comparator = Comparator::new(options);
  let path = Path::root(left);
  if comparator.equal(left, right, &path) {
    return String::new();
  }
  let mut report = Report { comparator, lines: Vec::new() };
  report.root(left, right, &path);
  debug!("{} and {} differ in {} lines", left.type_name(), right.type_name(), report.lines.len());
  report.render()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
  Common,
  Removed,
  Inserted,
}

struct Line {
  tag: Tag,
  depth: usize,
  text: String,
}

enum Change {
  Same(usize),
  Edit { removed: Vec<usize>, inserted: Vec<usize> },
}

/// Aligns `old` with `new`, grouping every run of edits so that removals come before insertions.
fn changes<T: PartialEq>(old: &[T], new: &[T]) -> Vec<Change> {
  let mut capture = Capture::new();
  match myers::diff(&mut capture, old, 0..old.len(), new, 0..new.len()) {
    Ok(()) => {}
    Err(never) => match never {},
  }

  let mut changes = Vec::new();
  let (mut removed, mut inserted) = (Vec::new(), Vec::new());
  for op in capture.into_ops() {
    let (tag, old_range, new_range) = op.as_tag_tuple();
    match tag {
      DiffTag::Equal => {
        if !removed.is_empty() || !inserted.is_empty() {
          changes.push(Change::Edit {
            removed: std::mem::take(&mut removed),
            inserted: std::mem::take(&mut inserted),
          });
        }
        changes.extend(old_range.map(Change::Same));
      }
      DiffTag::Delete => removed.extend(old_range),
      DiffTag::Insert => inserted.extend(new_range),
      DiffTag::Replace => {
        removed.extend(old_range);
        inserted.extend(new_range);
      }
    }
  }
  if !removed.is_empty() || !inserted.is_empty() {
    changes.push(Change::Edit { removed, inserted });
  }
  changes
}

/// Sequence element compared with the engine's equality.
struct Element<'r> {
  value: &'r dyn Reflect,
  comparator: &'r Comparator<'r>,
  path: Path,
}

impl PartialEq for Element<'_> {
  fn eq(&self, other: &Self) -> bool {
    self.comparator.equal(self.value, other.value, &self.path)
  }
}

fn long(text: &str) -> bool {
  text.chars().count() > LONG_STRING
}

fn multiline(text: &str) -> bool {
  text.contains('\n')
}

/// Values whose differences span several lines.
fn nested(value: &dyn Reflect) -> bool {
  match value.kind() {
    Kind::Seq(_) | Kind::Map(_) | Kind::Struct(_) => true,
    Kind::Deref(inner) => nested(inner),
    Kind::Str(text) => multiline(text) || long(text),
    _ => false,
  }
}

fn typed(value: &dyn Reflect) -> String {
  match value.kind() {
    Kind::Nil | Kind::Struct(_) => format!("{:?}", value),
    Kind::Seq(_) | Kind::Map(_) => format!("{}{:?}", value.type_name(), value),
    _ => format!("{}({:?})", value.type_name(), value),
  }
}

struct Report<'o> {
  comparator: Comparator<'o>,
  lines: Vec<Line>,
}

impl<'o> Report<'o> {
  fn push(&mut self, tag: Tag, depth: usize, text: String) {
    self.lines.push(Line { tag, depth, text });
  }

  fn changed(&mut self, depth: usize, label: &str, left: String, right: String) {
    self.push(Tag::Removed, depth, format!("{}{},", label, left));
    self.push(Tag::Inserted, depth, format!("{}{},", label, right));
  }

  /// Plain scalars of one type are wrapped in their type name.
  fn root(&mut self, left: &dyn Reflect, right: &dyn Reflect, path: &Path) {
    let plain = !left.is_nil()
      && !right.is_nil()
      && same_type(left, right)
      && self.comparator.custom(left, right).is_none()
      && !nested(left)
      && !nested(right)
      && !matches!(left.kind(), Kind::Deref(_) | Kind::Opaque);
    if plain {
      self.push(Tag::Common, 0, format!("{}(", left.type_name()));
      self.node(left, right, 1, "", path);
      self.push(Tag::Common, 0, ")".to_string());
    } else {
      self.node(left, right, 0, "", path);
    }
  }

  fn node(&mut self, left: &dyn Reflect, right: &dyn Reflect, depth: usize, label: &str, path: &Path) {
    if self.comparator.equal(left, right, path) {
      self.push(Tag::Common, depth, format!("{}{:?},", label, left));
      return;
    }
    if left.is_nil() || right.is_nil() || !same_type(left, right) {
      self.changed(depth, label, typed(left), typed(right));
      return;
    }
    if self.comparator.custom(left, right).is_some() {
      self.changed(depth, label, format!("{:?}", left), format!("{:?}", right));
      return;
    }
    match (left.kind(), right.kind()) {
      (Kind::Deref(x), Kind::Deref(y)) => self.node(x, y, depth, label, path),
      (Kind::Str(x), Kind::Str(y)) => self.text(x, y, depth, label),
      (Kind::Seq(xs), Kind::Seq(ys)) => self.sequence(left, xs, ys, depth, label, path),
      (Kind::Map(xs), Kind::Map(ys)) => self.map(left, xs, ys, depth, label, path),
      (Kind::Struct(xs), Kind::Struct(ys)) => self.structure(left, right, xs, ys, depth, label, path),
      _ => self.changed(depth, label, format!("{:?}", left), format!("{:?}", right)),
    }
  }

  fn text(&mut self, left: &str, right: &str, depth: usize, label: &str) {
    if multiline(left) || multiline(right) {
      let xs = left.split('\n').collect::<Vec<_>>();
      let ys = right.split('\n').collect::<Vec<_>>();
      self.push(Tag::Common, depth, format!("{}[", label));
      for change in changes(&xs, &ys) {
        match change {
          Change::Same(index) => self.push(Tag::Common, depth + 1, format!("{:?},", xs[index])),
          Change::Edit { removed, inserted } => {
            for index in removed {
              self.push(Tag::Removed, depth + 1, format!("{:?},", xs[index]));
            }
            for index in inserted {
              self.push(Tag::Inserted, depth + 1, format!("{:?},", ys[index]));
            }
          }
        }
      }
      self.push(Tag::Common, depth, "].join(\"\\n\"),".to_string());
    } else if long(left) || long(right) {
      let xs = left.chars().collect::<Vec<_>>();
      let ys = right.chars().collect::<Vec<_>>();
      self.push(Tag::Common, depth, format!("{}[", label));
      let mut run = String::new();
      for change in changes(&xs, &ys) {
        match change {
          Change::Same(index) => run.push(xs[index]),
          Change::Edit { removed, inserted } => {
            if !run.is_empty() {
              self.push(Tag::Common, depth + 1, format!("{:?},", std::mem::take(&mut run)));
            }
            if !removed.is_empty() {
              self.push(Tag::Removed, depth + 1, format!("{:?},", removed.iter().map(|&index| xs[index]).collect::<String>()));
            }
            if !inserted.is_empty() {
              self.push(Tag::Inserted, depth + 1, format!("{:?},", inserted.iter().map(|&index| ys[index]).collect::<String>()));
            }
          }
        }
      }
      if !run.is_empty() {
        self.push(Tag::Common, depth + 1, format!("{:?},", run));
      }
      self.push(Tag::Common, depth, "].concat(),".to_string());
    } else {
      self.changed(depth, label, format!("{:?}", left), format!("{:?}", right));
    }
  }

  fn sequence(&mut self, owner: &dyn Reflect, xs: Vec<&dyn Reflect>, ys: Vec<&dyn Reflect>, depth: usize, label: &str, path: &Path) {
    self.push(Tag::Common, depth, format!("{}{}[", label, owner.type_name()));
    let changes = {
      let comparator = &self.comparator;
      let old = xs
        .iter()
        .enumerate()
        .map(|(index, &value)| Element { value, comparator, path: path.index(index) })
        .collect::<Vec<_>>();
      let new = ys
        .iter()
        .enumerate()
        .map(|(index, &value)| Element { value, comparator, path: path.index(index) })
        .collect::<Vec<_>>();
      changes(&old, &new)
    };
    for change in changes {
      match change {
        Change::Same(index) => self.push(Tag::Common, depth + 1, format!("{:?},", xs[index])),
        Change::Edit { removed, inserted } if removed.len() == inserted.len() && removed.iter().all(|&index| nested(xs[index])) => {
          for (&x, &y) in removed.iter().zip(inserted.iter()) {
            self.node(xs[x], ys[y], depth + 1, "", &path.index(x));
          }
        }
        Change::Edit { removed, inserted } => {
          for index in removed {
            self.push(Tag::Removed, depth + 1, format!("{:?},", xs[index]));
          }
          for index in inserted {
            self.push(Tag::Inserted, depth + 1, format!("{:?},", ys[index]));
          }
        }
      }
    }
    self.push(Tag::Common, depth, "],".to_string());
  }

  fn map(
    &mut self,
    owner: &dyn Reflect,
    xs: Vec<Entry>,
    ys: Vec<Entry>,
    depth: usize,
    label: &str,
    path: &Path,
  ) {
    self.push(Tag::Common, depth, format!("{}{}{{", label, owner.type_name()));
    for pair in self.comparator.pairs(xs, ys, path) {
      match pair {
        (Some(x), Some(y)) => self.node(x.value, y.value, depth + 1, &format!("{}: ", x.label), &path.key(&x.label)),
        (Some(x), None) => self.push(Tag::Removed, depth + 1, format!("{}: {:?},", x.label, x.value)),
        (None, Some(y)) => self.push(Tag::Inserted, depth + 1, format!("{}: {:?},", y.label, y.value)),
        (None, None) => {}
      }
    }
    self.push(Tag::Common, depth, "},".to_string());
  }

  #[allow(clippy::too_many_arguments)]
  fn structure(
    &mut self,
    left: &dyn Reflect,
    right: &dyn Reflect,
    xs: Vec<Field>,
    ys: Vec<Field>,
    depth: usize,
    label: &str,
    path: &Path,
  ) {
    self.push(Tag::Common, depth, format!("{}{}{{", label, left.type_name()));
    let xs = self.comparator.visible(left, xs, path);
    let ys = self.comparator.visible(right, ys, path);
    for (x, y) in xs.iter().zip(ys.iter()) {
      self.node(x.value, y.value, depth + 1, &format!("{}: ", x.name), &path.field(x.name));
    }
    self.push(Tag::Common, depth, "},".to_string());
  }

  fn render(&self) -> String {
    self
      .lines
      .iter()
      .map(|line| {
        let prefix = match line.tag {
          Tag::Common => "  ",
          Tag::Removed => "- ",
          Tag::Inserted => "+ ",
        };
        format!("{}{}{}\n", prefix, "\t".repeat(line.depth), line.text)
      })
      .collect()
  }
}
