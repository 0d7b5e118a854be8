use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use super::reflect::Reflect;

type Compare = Arc<dyn Fn(&dyn Any, &dyn Any) -> bool + Send + Sync>;
type Export = Arc<dyn Fn(TypeId) -> bool + Send + Sync>;

/// A token tuning how [`equal`](super::equal) and [`diff`](super::diff)
/// compare values. Options are consulted in the order they are given.
#[derive(Clone)]
pub struct CmpOption(Rule);

#[derive(Clone)]
enum Rule {
  Comparer { type_id: TypeId, type_name: &'static str, compare: Compare },
  Exporter(Export),
  IgnoreUnexported { type_id: TypeId, type_name: &'static str },
}

impl CmpOption {
  /// Compares two values of type `T` with `compare` instead of structurally.
  pub fn comparer<T, F>(compare: F) -> Self
  where
    T: Any,
    F: Fn(&T, &T) -> bool + Send + Sync + 'static,
  {
    CmpOption(Rule::Comparer {
      type_id: TypeId::of::<T>(),
      type_name: std::any::type_name::<T>(),
      compare: Arc::new(move |left: &dyn Any, right: &dyn Any| match (left.downcast_ref::<T>(), right.downcast_ref::<T>()) {
        (Some(left), Some(right)) => compare(left, right),
        _ => false,
      }),
    })
  }

  /// Permits traversal of the unexported fields of `T`.
  pub fn allow_unexported<T: Any>() -> Self {
    let allowed = TypeId::of::<T>();
    CmpOption::exporter(move |type_id| type_id == allowed)
  }

  /// Permits traversal of the unexported fields of every type `export` accepts.
  pub fn exporter<F>(export: F) -> Self
  where
    F: Fn(TypeId) -> bool + Send + Sync + 'static,
  {
    CmpOption(Rule::Exporter(Arc::new(export)))
  }

  /// Skips the unexported fields of `T`.
  pub fn ignore_unexported<T: Any>() -> Self {
    CmpOption(Rule::IgnoreUnexported {
      type_id: TypeId::of::<T>(),
      type_name: std::any::type_name::<T>(),
    })
  }

  pub(crate) fn compare(&self, left: &dyn Reflect, right: &dyn Reflect) -> Option<bool> {
    match &self.0 {
      Rule::Comparer { type_id, compare, .. } if left.as_any().type_id() == *type_id => Some(compare(left.as_any(), right.as_any())),
      _ => None,
    }
  }

  pub(crate) fn exports(&self, type_id: TypeId) -> bool {
    match &self.0 {
      Rule::Exporter(export) => export(type_id),
      _ => false,
    }
  }

  pub(crate) fn ignores_unexported(&self, type_id: TypeId) -> bool {
    matches!(&self.0, Rule::IgnoreUnexported { type_id: ignored, .. } if *ignored == type_id)
  }
}

impl fmt::Debug for CmpOption {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.0 {
      Rule::Comparer { type_name, .. } => write!(f, "Comparer({})", type_name),
      Rule::Exporter(_) => f.write_str("Exporter"),
      Rule::IgnoreUnexported { type_name, .. } => write!(f, "IgnoreUnexported({})", type_name),
    }
  }
}
