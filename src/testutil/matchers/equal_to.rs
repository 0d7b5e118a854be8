use super::super::core::*;
use super::super::format;
use super::{MatchError, Matcher};
use crate::cmp::{self, CmpOption, Reflect};

/// Strict deep equality. Sees through unexported fields and never applies comparers.
#[derive(Debug)]
pub struct EqualMatcher {
  expected: Box<dyn Reflect>,
}

impl EqualMatcher {
  pub fn new<E: Reflect>(expected: E) -> Self {
    EqualMatcher { expected: Box::new(expected) }
  }

  pub fn expected(&self) -> &dyn Reflect {
    &*self.expected
  }
}

impl Matcher for EqualMatcher {
  fn matches(&self, actual: &dyn Reflect) -> Result<bool, MatchError> {
    if actual.is_nil() && self.expected().is_nil() {
      return Err(MatchError::NilToNil);
    }
    Ok(cmp::equal(actual, self.expected(), &[CmpOption::exporter(|_| true)]))
  }

  fn failure_message(&self, actual: &dyn Reflect) -> String {
    format::message(actual, "to equal", Some(self.expected()))
  }

  fn negated_failure_message(&self, actual: &dyn Reflect) -> String {
    format::message(actual, "not to equal", Some(self.expected()))
  }
}

pub fn equal_to<E: Reflect>(expected: E) -> EqualMatcher {
  EqualMatcher::new(expected)
}

pub trait EqualTo<E> {
  #[allow(clippy::wrong_self_convention)]
  fn to_equal(self, expected: E) -> Self;
}

impl<'a, T, E> EqualTo<E> for Subject<'a, T>
where
  T: Reflect,
  E: Reflect,
{
  fn to_equal(self, expected: E) -> Self {
    let subject = self.subject();
    let matcher = EqualMatcher::new(expected);
    match matcher.matches(subject) {
      Ok(true) => {}
      Ok(false) => Mismatch::from(self)
        .expecting(format!("<{:?}>", matcher.expected()))
        .found(format!("<{:?}>", subject))
        .fail(),
      Err(error) => Mismatch::from(self).reporting(error.to_string()).fail(),
    }
    self
  }
}

impl<'a, T, E> EqualTo<E> for NegativeConstrainedSubject<'a, T>
where
  T: Reflect,
  E: Reflect,
{
  fn to_equal(self, expected: E) -> Self {
    let subject = self.subject();
    let matcher = EqualMatcher::new(expected);
    match matcher.matches(subject) {
      Ok(false) => {}
      Ok(true) => Mismatch::from(self)
        .expecting(format!("<{:?}> not to equal <{:?}>", subject, matcher.expected()))
        .found("was equal")
        .fail(),
      Err(error) => Mismatch::from(self).reporting(error.to_string()).fail(),
    }
    self
  }
}
