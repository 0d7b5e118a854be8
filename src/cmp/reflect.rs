use std::any::Any;
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::fmt::Debug;
use std::rc::Rc;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

pub trait AsAny: Any {
  fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
  fn as_any(&self) -> &dyn Any {
    self
  }
}

/// Structural view of a value, as seen by [`equal`](super::equal) and [`diff`](super::diff).
///
/// Implementations describe their shape through [`Reflect::kind`], usually
/// via `#[derive(Reflect)]`. Types with their own notion of equality (e.g.
/// instants that may carry different offsets) override
/// [`Reflect::equal_method`], which is consulted before any structural
/// comparison.
///
/// Type identity goes through [`Any`], so only `'static` types reflect.
/// Borrowed text is compared as `&'static str` literals or as an owned
/// `String`: `compare_to!(name.to_string())` rather than `compare_to!(name.as_str())`.
pub trait Reflect: AsAny + Debug {
  fn kind(&self) -> Kind<'_>;

  fn type_name(&self) -> String {
    short_type_name(std::any::type_name::<Self>())
  }

  fn equal_method(&self, _other: &dyn Reflect) -> Option<bool> {
    None
  }

  fn is_nil(&self) -> bool {
    matches!(self.kind(), Kind::Nil)
  }
}

#[derive(Debug)]
pub enum Kind<'a> {
  /// the absent value
  Nil,
  Bool(bool),
  Int(i128),
  Uint(u128),
  Float(f64),
  Char(char),
  Str(&'a str),
  /// transparent wrapper around exactly one value
  Deref(&'a dyn Reflect),
  Seq(Vec<&'a dyn Reflect>),
  /// entries sorted by the debug text of their keys
  Map(Vec<Entry<'a>>),
  Struct(Vec<Field<'a>>),
  /// no inspectable structure, only comparable through an equality method or a comparer
  Opaque,
}

#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
  pub name: &'static str,
  pub exported: bool,
  pub value: &'a dyn Reflect,
}

impl<'a> Field<'a> {
  pub fn exported(name: &'static str, value: &'a dyn Reflect) -> Self {
    Field { name, exported: true, value }
  }

  pub fn unexported(name: &'static str, value: &'a dyn Reflect) -> Self {
    Field { name, exported: false, value }
  }
}

/// One entry of a map or set. Sets use each element as both key and value.
#[derive(Debug, Clone)]
pub struct Entry<'a> {
  /// debug text of the key, for ordering and display only
  pub label: String,
  pub key: &'a dyn Reflect,
  pub value: &'a dyn Reflect,
}

impl<'a> Entry<'a> {
  pub fn new(key: &'a dyn Reflect, value: &'a dyn Reflect) -> Self {
    Entry {
      label: format!("{:?}", key),
      key,
      value,
    }
  }
}

/// The absent value when no typed `None` is at hand.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Nil;

impl Debug for Nil {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("nil")
  }
}

impl Reflect for Nil {
  fn kind(&self) -> Kind<'_> {
    Kind::Nil
  }
}

/// Drops module paths from a fully qualified type name, so that
/// `alloc::vec::Vec<alloc::string::String>` reads `Vec<String>`.
pub fn short_type_name(full: &str) -> String {
  let mut short = String::with_capacity(full.len());
  let mut segment = 0;
  let mut chars = full.chars().peekable();
  while let Some(c) = chars.next() {
    if c == ':' && chars.peek() == Some(&':') {
      chars.next();
      short.truncate(segment);
    } else if c.is_alphanumeric() || c == '_' {
      short.push(c);
    } else {
      short.push(c);
      segment = short.len();
    }
  }
  short
}

macro_rules! reflect_scalar {
  ($variant:ident as $wide:ty: $($ty:ty),+) => {
    $(
      impl Reflect for $ty {
        fn kind(&self) -> Kind<'_> {
          Kind::$variant(*self as $wide)
        }
      }
    )+
  };
}

reflect_scalar!(Int as i128: i8, i16, i32, i64, i128, isize);
reflect_scalar!(Uint as u128: u8, u16, u32, u64, u128, usize);
reflect_scalar!(Float as f64: f32, f64);

impl Reflect for bool {
  fn kind(&self) -> Kind<'_> {
    Kind::Bool(*self)
  }
}

impl Reflect for char {
  fn kind(&self) -> Kind<'_> {
    Kind::Char(*self)
  }
}

impl Reflect for &'static str {
  fn kind(&self) -> Kind<'_> {
    Kind::Str(*self)
  }
}

impl Reflect for String {
  fn kind(&self) -> Kind<'_> {
    Kind::Str(self.as_str())
  }
}

impl Reflect for Cow<'static, str> {
  fn kind(&self) -> Kind<'_> {
    Kind::Str(self.as_ref())
  }
}

impl<T: Reflect> Reflect for Option<T> {
  fn kind(&self) -> Kind<'_> {
    match self {
      None => Kind::Nil,
      Some(value) => Kind::Deref(value),
    }
  }
}

impl<T: Reflect> Reflect for Box<T> {
  fn kind(&self) -> Kind<'_> {
    Kind::Deref(&**self)
  }
}

impl<T: Reflect> Reflect for Rc<T> {
  fn kind(&self) -> Kind<'_> {
    Kind::Deref(&**self)
  }
}

impl<T: Reflect> Reflect for Arc<T> {
  fn kind(&self) -> Kind<'_> {
    Kind::Deref(&**self)
  }
}

impl<T: Reflect> Reflect for Vec<T> {
  fn kind(&self) -> Kind<'_> {
    Kind::Seq(self.iter().map(|item| item as &dyn Reflect).collect())
  }
}

impl<T: Reflect> Reflect for VecDeque<T> {
  fn kind(&self) -> Kind<'_> {
    Kind::Seq(self.iter().map(|item| item as &dyn Reflect).collect())
  }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
  fn kind(&self) -> Kind<'_> {
    Kind::Seq(self.iter().map(|item| item as &dyn Reflect).collect())
  }
}

macro_rules! reflect_tuple {
  ($($name:ident $index:tt),+) => {
    impl<$($name: Reflect),+> Reflect for ($($name,)+) {
      fn kind(&self) -> Kind<'_> {
        Kind::Seq(vec![$(&self.$index as &dyn Reflect),+])
      }
    }
  };
}

reflect_tuple!(A 0);
reflect_tuple!(A 0, B 1);
reflect_tuple!(A 0, B 1, C 2);
reflect_tuple!(A 0, B 1, C 2, D 3);

fn keyed<'a, I>(entries: I) -> Kind<'a>
where
  I: Iterator<Item = (&'a dyn Reflect, &'a dyn Reflect)>,
{
  let mut entries = entries.map(|(key, value)| Entry::new(key, value)).collect::<Vec<_>>();
  entries.sort_by(|left, right| left.label.cmp(&right.label));
  Kind::Map(entries)
}

impl<K, V, S> Reflect for HashMap<K, V, S>
where
  K: Reflect,
  V: Reflect,
  S: 'static,
{
  fn kind(&self) -> Kind<'_> {
    keyed(self.iter().map(|(key, value)| (key as &dyn Reflect, value as &dyn Reflect)))
  }
}

impl<K: Reflect, V: Reflect> Reflect for BTreeMap<K, V> {
  fn kind(&self) -> Kind<'_> {
    keyed(self.iter().map(|(key, value)| (key as &dyn Reflect, value as &dyn Reflect)))
  }
}

impl<T, S> Reflect for HashSet<T, S>
where
  T: Reflect,
  S: 'static,
{
  fn kind(&self) -> Kind<'_> {
    keyed(self.iter().map(|element| (element as &dyn Reflect, element as &dyn Reflect)))
  }
}

impl<T: Reflect> Reflect for BTreeSet<T> {
  fn kind(&self) -> Kind<'_> {
    keyed(self.iter().map(|element| (element as &dyn Reflect, element as &dyn Reflect)))
  }
}

impl<Tz> Reflect for DateTime<Tz>
where
  Tz: TimeZone + 'static,
{
  fn kind(&self) -> Kind<'_> {
    Kind::Opaque
  }

  /// Instants are equal regardless of the offset they are expressed in.
  fn equal_method(&self, other: &dyn Reflect) -> Option<bool> {
    other.as_any().downcast_ref::<Self>().map(|other| self == other)
  }
}

macro_rules! reflect_opaque {
  ($($ty:ty),+) => {
    $(
      impl Reflect for $ty {
        fn kind(&self) -> Kind<'_> {
          Kind::Opaque
        }

        fn equal_method(&self, other: &dyn Reflect) -> Option<bool> {
          other.as_any().downcast_ref::<Self>().map(|other| self == other)
        }
      }
    )+
  };
}

reflect_opaque!(NaiveDate, NaiveTime, NaiveDateTime);
