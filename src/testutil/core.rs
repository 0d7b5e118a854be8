use crate::cmp::Reflect;

use super::matchers::Matcher;

#[macro_export]
macro_rules! since {
  (&$subject:expr) => {
    $crate::since!($subject)
  };
  ($subject:expr) => {
    $crate::testutil::core::Locatable::at($crate::testutil::core::since(&$subject), format!("{}:{}", file!(), line!()))
  };
}

pub fn since(description: &str) -> Description {
  Description {
    description: Some(description.to_string()),
    location: None,
  }
}

pub trait Locatable<T> {
  fn at(self, location: T) -> Self;
}

impl<L> Locatable<&str> for L
where
  L: Locatable<String>,
{
  fn at(self, location: &str) -> Self {
    self.at(location.to_string())
  }
}

pub struct Description {
  description: Option<String>,
  location: Option<String>,
}

impl Description {
  pub fn expect<S>(self, subject: &S) -> Subject<S> {
    Subject {
      subject,
      description: self.description,
      location: self.location,
    }
  }
}

impl Locatable<String> for Description {
  fn at(mut self, location: String) -> Self {
    self.location = Some(location);
    self
  }
}

#[macro_export]
macro_rules! expect_for {
  ($subject:expr) => {
    $crate::testutil::core::Locatable::at($subject, format!("{}:{}", file!(), line!()))
  };
}

#[macro_export]
macro_rules! expect {
  (&$subject:expr) => {
    $crate::expect!($subject)
  };
  ($subject:expr) => {
    $crate::testutil::core::Locatable::at($crate::testutil::core::expect(&$subject), format!("{}:{}", file!(), line!()))
  };
}

pub fn expect<S>(subject: &S) -> Subject<S> {
  Subject {
    subject,
    description: None,
    location: None,
  }
}

pub struct Subject<'a, S> {
  subject: &'a S,
  description: Option<String>,
  location: Option<String>,
}

impl<'a, S> Subject<'a, S> {
  pub fn subject(&self) -> &'a S {
    self.subject
  }

  #[allow(clippy::should_implement_trait)]
  pub fn not(self) -> NegativeConstrainedSubject<'a, S> {
    NegativeConstrainedSubject {
      subject: self.subject,
      description: self.description,
      location: self.location,
    }
  }
}

impl<'a, S> Subject<'a, S>
where
  S: Reflect,
{
  /// Fails unless `matcher` accepts the subject.
  pub fn to<M: Matcher>(self, matcher: M) -> Self {
    let actual: &dyn Reflect = self.subject;
    match matcher.matches(actual) {
      Ok(true) => {}
      Ok(false) => Mismatch::from(self).reporting(matcher.failure_message(actual)).fail(),
      Err(error) => Mismatch::from(self).reporting(error.to_string()).fail(),
    }
    self
  }
}

impl<'a, S> Locatable<String> for Subject<'a, S> {
  fn at(mut self, location: String) -> Self {
    self.location = Some(location);
    self
  }
}

pub struct NegativeConstrainedSubject<'a, S> {
  subject: &'a S,
  description: Option<String>,
  location: Option<String>,
}

impl<'a, S> NegativeConstrainedSubject<'a, S> {
  pub fn subject(&self) -> &'a S {
    self.subject
  }

  #[allow(clippy::should_implement_trait)]
  pub fn not(self) -> Subject<'a, S> {
    Subject {
      subject: self.subject,
      description: self.description,
      location: self.location,
    }
  }
}

impl<'a, S> NegativeConstrainedSubject<'a, S>
where
  S: Reflect,
{
  /// Fails if `matcher` accepts the subject. A matcher error fails either way.
  pub fn to<M: Matcher>(self, matcher: M) -> Self {
    let actual: &dyn Reflect = self.subject;
    match matcher.matches(actual) {
      Ok(false) => {}
      Ok(true) => Mismatch::from(self).reporting(matcher.negated_failure_message(actual)).fail(),
      Err(error) => Mismatch::from(self).reporting(error.to_string()).fail(),
    }
    self
  }
}

impl<'a, S> Locatable<String> for NegativeConstrainedSubject<'a, S> {
  fn at(mut self, location: String) -> Self {
    self.location = Some(location);
    self
  }
}

pub trait Expecting<T> {
  fn expecting(self, expected: T) -> Self;
}

impl<E> Expecting<&str> for E
where
  E: Expecting<String>,
{
  fn expecting(self, expected: &str) -> Self {
    self.expecting(expected.to_string())
  }
}

pub trait Found<T> {
  fn found(self, actual: T) -> Self;
}

impl<F> Found<&str> for F
where
  F: Found<String>,
{
  fn found(self, actual: &str) -> Self {
    self.found(actual.to_string())
  }
}

pub trait Reporting<T> {
  fn reporting(self, message: T) -> Self;
}

impl<R> Reporting<&str> for R
where
  R: Reporting<String>,
{
  fn reporting(self, message: &str) -> Self {
    self.reporting(message.to_string())
  }
}

pub struct Mismatch {
  description: Option<String>,
  expected: Option<String>,
  actual: Option<String>,
  message: Option<String>,
  location: Option<String>,
}

impl<'a, S> From<Subject<'a, S>> for Mismatch {
  fn from(subject: Subject<'a, S>) -> Self {
    Mismatch {
      description: subject.description,
      expected: None,
      actual: None,
      message: None,
      location: subject.location,
    }
  }
}

impl<'a, S> From<NegativeConstrainedSubject<'a, S>> for Mismatch {
  fn from(subject: NegativeConstrainedSubject<'a, S>) -> Self {
    Mismatch {
      description: subject.description,
      expected: None,
      actual: None,
      message: None,
      location: subject.location,
    }
  }
}

impl Mismatch {
  pub fn fail(self) -> ! {
    let location = self.location.map_or_else(String::new, |location| format!("at {}\n", location));

    let description = self.description.map_or_else(String::new, |description| format!("\n{}:", description));

    if let Some(message) = self.message {
      panic!("{}\n{}\n{}", description, message, location)
    }

    let expected = self.expected.unwrap_or_else(|| panic!("\n\tNo expectation \n{}", location));

    let actual = self.actual.unwrap_or_else(|| panic!("\n\tNo actual value \n{}", location));

    panic!(
      "{}\n\
       \texpected: {}\n\
       \t   found: {}\n\
       {}",
      description, expected, actual, location
    )
  }
}

impl Expecting<String> for Mismatch {
  fn expecting(mut self, expected: String) -> Self {
    self.expected = Some(expected);
    self
  }
}

impl Found<String> for Mismatch {
  fn found(mut self, actual: String) -> Self {
    self.actual = Some(actual);
    self
  }
}

impl Reporting<String> for Mismatch {
  fn reporting(mut self, message: String) -> Self {
    self.message = Some(message);
    self
  }
}
