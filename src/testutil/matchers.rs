use thiserror::Error;

use crate::cmp::Reflect;

pub mod be_nil;
pub mod compare_to;
pub mod equal_to;
pub mod match_regexp;

pub use be_nil::{be_nil, NilMatcher};
pub use compare_to::{compare_to, CompareToMatcher};
pub use equal_to::{equal_to, EqualMatcher, EqualTo};
pub use match_regexp::{match_regexp, RegexpMatcher};

/// The contract between an assertion and the check it runs.
///
/// `matches` decides; the messages are only asked for once the verdict
/// disagrees with the polarity of the assertion. An `Err` fails the
/// assertion whatever its polarity.
pub trait Matcher {
  fn matches(&self, actual: &dyn Reflect) -> Result<bool, MatchError>;
  fn failure_message(&self, actual: &dyn Reflect) -> String;
  fn negated_failure_message(&self, actual: &dyn Reflect) -> String;
}

#[derive(Debug, Error)]
pub enum MatchError {
  #[error(
    "Refusing to compare <nil> to <nil>.\n\
     Be explicit and use be_nil() instead. \
     This is to avoid mistakes where both sides of an assertion are erroneously uninitialized."
  )]
  NilToNil,
  #[error("{matcher} matcher expects a string. Got:\n{actual}")]
  NotAString { matcher: &'static str, actual: String },
  #[error("{matcher} matcher was given an invalid regular expression {pattern:?}: {source}")]
  InvalidPattern {
    matcher: &'static str,
    pattern: String,
    source: regex::Error,
  },
}
