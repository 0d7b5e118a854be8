use regex::Regex;

use super::super::format;
use super::{MatchError, Matcher};
use crate::cmp::{Kind, Reflect};

/// Matches strings against a regular expression, compiled on every match.
#[derive(Debug, Clone)]
pub struct RegexpMatcher {
  pattern: String,
}

impl RegexpMatcher {
  pub fn new(pattern: impl Into<String>) -> Self {
    RegexpMatcher { pattern: pattern.into() }
  }

  pub fn pattern(&self) -> &str {
    &self.pattern
  }
}

impl Matcher for RegexpMatcher {
  fn matches(&self, actual: &dyn Reflect) -> Result<bool, MatchError> {
    let text = match actual.kind() {
      Kind::Str(text) => text,
      _ => {
        return Err(MatchError::NotAString {
          matcher: "match_regexp",
          actual: format::object(actual, 1),
        })
      }
    };
    let regex = Regex::new(&self.pattern).map_err(|source| MatchError::InvalidPattern {
      matcher: "match_regexp",
      pattern: self.pattern.clone(),
      source,
    })?;
    Ok(regex.is_match(text))
  }

  fn failure_message(&self, actual: &dyn Reflect) -> String {
    format::message(actual, "to match regular expression", Some(&self.pattern))
  }

  fn negated_failure_message(&self, actual: &dyn Reflect) -> String {
    format::message(actual, "not to match regular expression", Some(&self.pattern))
  }
}

pub fn match_regexp(pattern: impl Into<String>) -> RegexpMatcher {
  RegexpMatcher::new(pattern)
}
