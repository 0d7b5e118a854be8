use super::super::format;
use super::{MatchError, Matcher};
use crate::cmp::Reflect;

#[derive(Debug, Default, Clone, Copy)]
pub struct NilMatcher;

impl Matcher for NilMatcher {
  fn matches(&self, actual: &dyn Reflect) -> Result<bool, MatchError> {
    Ok(actual.is_nil())
  }

  fn failure_message(&self, actual: &dyn Reflect) -> String {
    format::message(actual, "to be nil", None)
  }

  fn negated_failure_message(&self, actual: &dyn Reflect) -> String {
    format::message(actual, "not to be nil", None)
  }
}

pub fn be_nil() -> NilMatcher {
  NilMatcher
}
