use super::equal_to::EqualMatcher;
use super::{MatchError, Matcher};
use crate::cmp::{self, CmpOption, Nil, Reflect};

/// Builds a [`CompareToMatcher`] from an expected value and any number of options.
///
/// ```
/// use cmpmatch::cmp::CmpOption;
/// use cmpmatch::{compare_to, expect};
///
/// expect!(String::from("Foo")).to(compare_to!(
///   String::from("fOO"),
///   CmpOption::comparer(|x: &String, y: &String| x.eq_ignore_ascii_case(y))
/// ));
/// ```
#[macro_export]
macro_rules! compare_to {
  ($expected:expr $(, $option:expr)* $(,)?) => {
    $crate::testutil::matchers::CompareToMatcher::new($expected, vec![$($option),*])
  };
}

/// Deep equality through [`cmp::equal`], tuned by comparison options, with a
/// [`cmp::diff`] report on failure.
///
/// Asserting that nil compares to nil is refused the same way [`EqualMatcher`]
/// refuses it.
#[derive(Debug)]
pub struct CompareToMatcher {
  equal: EqualMatcher,
  options: Vec<CmpOption>,
}

impl CompareToMatcher {
  pub fn new<E: Reflect>(expected: E, options: Vec<CmpOption>) -> Self {
    CompareToMatcher {
      equal: EqualMatcher::new(expected),
      options,
    }
  }

  pub fn expected(&self) -> &dyn Reflect {
    self.equal.expected()
  }

  pub fn options(&self) -> &[CmpOption] {
    &self.options
  }
}

impl Default for CompareToMatcher {
  fn default() -> Self {
    CompareToMatcher::new(Nil, Vec::new())
  }
}

impl Matcher for CompareToMatcher {
  fn matches(&self, actual: &dyn Reflect) -> Result<bool, MatchError> {
    if actual.is_nil() && self.expected().is_nil() {
      return self.equal.matches(actual);
    }
    Ok(cmp::equal(actual, self.expected(), &self.options))
  }

  fn failure_message(&self, actual: &dyn Reflect) -> String {
    format!("--- Actual\n+++ Expected\n{}", cmp::diff(actual, self.expected(), &self.options))
  }

  fn negated_failure_message(&self, actual: &dyn Reflect) -> String {
    self.equal.negated_failure_message(actual)
  }
}

pub fn compare_to<E: Reflect>(expected: E) -> CompareToMatcher {
  CompareToMatcher::new(expected, Vec::new())
}

#[cfg(test)]
mod tests {

  use super::*;
  use crate::testutil::core::*;
  use crate::testutil::matchers::match_regexp;
  use crate::{compare_to, expect, expect_for};
  use chrono::{Duration, FixedOffset, Utc};
  use std::collections::HashMap;

  fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
  }

  #[derive(Debug, Reflect)]
  struct Failure {
    message: String,
  }

  impl Failure {
    fn new(message: &str) -> Self {
      Failure {
        message: message.to_string(),
      }
    }
  }

  #[derive(Debug, Default, Reflect)]
  struct CustomType {
    s: String,
    n: i32,
    f: f64,
    arr: Vec<String>,
  }

  fn custom(s: &str, n: i32, f: f64, arr: &[&str]) -> CustomType {
    CustomType {
      s: s.to_string(),
      n,
      f,
      arr: arr.iter().map(|item| item.to_string()).collect(),
    }
  }

  fn map(entries: &[(&'static str, &'static str)]) -> HashMap<&'static str, &'static str> {
    entries.iter().copied().collect()
  }

  mod nil {

    use super::*;

    #[test]
    fn refuses_to_compare_nil_to_nil() {
      let result = CompareToMatcher::default().matches(&Nil);

      assert!(matches!(result, Err(MatchError::NilToNil)));
    }

    #[test]
    fn refuses_typed_absent_values_too() {
      let result = compare_to(None::<String>).matches(&None::<i32>);

      assert!(matches!(result, Err(MatchError::NilToNil)));
    }

    #[test]
    fn one_absent_side_is_a_mismatch() {
      assert!(!compare_to(Nil).matches(&5).unwrap());
      assert!(!compare_to(5).matches(&Nil).unwrap());
      assert!(!compare_to(Some(5)).matches(&None::<i32>).unwrap());
    }

    #[test]
    #[should_panic(expected = "Refusing to compare <nil> to <nil>.")]
    fn fails_the_assertion() {
      expect!(Nil).to(compare_to!(Nil));
    }

    #[test]
    fn still_renders_a_failure_message() {
      assert_eq!(CompareToMatcher::default().failure_message(&Nil), "--- Actual\n+++ Expected\n");
    }
  }

  mod objects {

    use super::*;

    #[test]
    fn compares_scalars_strictly() {
      init();
      expect!(5).to(compare_to!(5));
      expect!(5.0).to(compare_to!(5.0));

      expect!(5).not().to(compare_to!("5"));
      expect!(5).not().to(compare_to!(5.0));
      expect!(5).not().to(compare_to!(3));
      expect!(5i32).not().to(compare_to!(5i64));

      expect!("5").to(compare_to!("5"));
    }

    #[test]
    fn compares_sequences_in_order() {
      expect!(vec![1, 2]).to(compare_to!(vec![1, 2]));
      expect!(vec![1, 2]).not().to(compare_to!(vec![2, 1]));
      expect!(Vec::<i32>::new()).to(compare_to!(Vec::<i32>::new()));
      expect!(b"foo".to_vec()).to(compare_to!(vec![b'f', b'o', b'o']));
      expect!(b"foo".to_vec()).not().to(compare_to!(b"bar".to_vec()));
    }

    #[test]
    fn compares_mappings_regardless_of_insertion_order() {
      expect!(map(&[("a", "b"), ("c", "d")])).to(compare_to!(map(&[("c", "d"), ("a", "b")])));
      expect!(map(&[("a", "b"), ("c", "d")])).not().to(compare_to!(map(&[("a", "b"), ("c", "e")])));
    }

    #[test]
    fn uses_their_equality_method() {
      let moment = Utc::now();
      let east = moment.with_timezone(&FixedOffset::east_opt(2 * 60 * 60).unwrap());
      let west = moment.with_timezone(&FixedOffset::west_opt(8 * 60 * 60).unwrap());

      expect!(east).to(compare_to!(west));
      expect!(moment).not().to(compare_to!(moment + Duration::nanoseconds(3)));
    }

    #[test]
    fn compares_borrowed_text_as_owned_strings() {
      let name = String::from("erin");
      let borrowed = &name[..];

      expect!(borrowed.to_string()).to(compare_to!(name.clone()));
      expect!(borrowed.to_string()).not().to(compare_to!("erin"));
    }

    #[test]
    fn compares_derived_structs_field_by_field() {
      #[derive(Debug, Reflect)]
      struct Version {
        pub major: u32,
        pub minor: u32,
      }

      expect!(Version { major: 1, minor: 2 }).to(compare_to!(Version { major: 1, minor: 2 }));
      expect!(Version { major: 1, minor: 2 }).not().to(compare_to!(Version { major: 1, minor: 3 }));
    }

    #[test]
    fn is_idempotent() {
      let matcher = compare_to!(vec![1, 2, 3]);

      assert!(matcher.matches(&vec![1, 2, 3]).unwrap());
      assert!(matcher.matches(&vec![1, 2, 3]).unwrap());
      assert!(!matcher.matches(&vec![3, 2, 1]).unwrap());
      assert!(!matcher.matches(&vec![3, 2, 1]).unwrap());
    }

    #[test]
    fn exposes_expected_and_options() {
      let matcher = compare_to!(7u8, CmpOption::ignore_unexported::<Failure>());

      assert_eq!(format!("{:?}", matcher.expected()), "7");
      assert_eq!(matcher.options().len(), 1);
    }
  }

  mod unexported_fields {

    use super::*;

    #[test]
    #[should_panic(expected = "cannot handle unexported field at Failure.message")]
    fn panic_without_an_option() {
      expect!(Failure::new("foo")).to(compare_to!(Failure::new("foo")));
    }

    #[test]
    #[should_panic(expected = "cannot handle unexported field at CustomType.s")]
    fn panic_even_when_empty() {
      expect!(CustomType::default()).to(compare_to!(CustomType::default()));
    }

    #[test]
    #[should_panic(expected = "cannot handle unexported field at Vec<Failure>[0].message")]
    fn panic_when_matching_sequences_of_different_lengths() {
      let _ = compare_to!(vec![Failure::new("a"), Failure::new("b")]).matches(&vec![Failure::new("a")]);
    }

    #[test]
    #[should_panic(expected = "cannot handle unexported field at Vec<Failure>[0].message")]
    fn panic_when_matching_against_an_empty_sequence() {
      let _ = compare_to!(vec![Failure::new("a")]).matches(&Vec::<Failure>::new());
    }

    #[test]
    fn are_skipped_by_a_custom_comparer() {
      let by_message = || CmpOption::comparer(|x: &Failure, y: &Failure| x.message == y.message);

      expect!(Failure::new("foo")).to(compare_to!(Failure::new("foo"), by_message()));
      expect!(Failure::new("foo")).not().to(compare_to!("foo", by_message()));
      expect!(Failure::new("foo")).not().to(compare_to!(Failure::new("bar"), by_message()));
    }

    #[test]
    fn are_compared_when_allowed() {
      let allowed = CmpOption::allow_unexported::<CustomType>;
      let actual = custom("foo", 3, 2.0, &["a", "b"]);

      expect!(CustomType::default()).to(compare_to!(CustomType::default(), allowed()));
      expect!(actual).to(compare_to!(custom("foo", 3, 2.0, &["a", "b"]), allowed()));
      expect!(actual).not().to(compare_to!(custom("bar", 3, 2.0, &["a", "b"]), allowed()));
      expect!(actual).not().to(compare_to!(custom("foo", 2, 2.0, &["a", "b"]), allowed()));
      expect!(actual).not().to(compare_to!(custom("foo", 3, 3.0, &["a", "b"]), allowed()));
      expect!(actual).not().to(compare_to!(custom("foo", 3, 2.0, &["a", "b", "c"]), allowed()));
    }

    #[test]
    fn pass_options_through_unchanged() {
      let cases: Vec<(CustomType, CustomType)> = vec![
        (custom("foo", 3, 2.0, &[]), custom("foo", 3, 2.0, &[])),
        (custom("foo", 3, 2.0, &[]), custom("foo", 4, 2.0, &[])),
        (custom("foo", 3, 2.0, &["a"]), custom("foo", 3, 2.0, &[])),
      ];
      for (actual, expected) in cases {
        let options = vec![CmpOption::allow_unexported::<CustomType>()];
        let verdict = cmp::equal(&actual, &expected, &options);
        let matcher = CompareToMatcher::new(expected, options);

        assert_eq!(matcher.matches(&actual).unwrap(), verdict);
      }
    }
  }

  mod failure_messages {

    use super::*;

    const HEADER: &str = r"(?m:[-]{3} Actual[\pZ\s]*[+]{3} Expected)";

    #[test]
    fn start_with_a_literal_header() {
      let message = compare_to!(3).failure_message(&5);

      assert!(message.starts_with("--- Actual\n+++ Expected\n"), "{}", message);
    }

    #[test]
    fn show_differing_types() {
      let subject = compare_to!(5i64);
      let failure_message = subject.failure_message(&5i32);

      expect!(failure_message).to(match_regexp(HEADER));
      expect!(failure_message).to(match_regexp(r"(?m:[-][\pZ\s]*i32[(]5[)],[\pZ\s]*[+][\pZ\s]*i64[(]5[)],)"));
    }

    #[test]
    fn show_two_strings_simply_when_they_are_short() {
      let subject = compare_to!(String::from("eric"));
      let failure_message = subject.failure_message(&String::from("erin"));

      expect!(failure_message).to(match_regexp(HEADER));
      expect!(failure_message).to(match_regexp(r#"(?m:[-][\pZ\s]*"erin",[\pZ\s]*[+][\pZ\s]*"eric",)"#));
    }

    #[test]
    fn show_the_exact_point_where_two_long_strings_differ() {
      let string_with_b = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaabaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
      let string_with_z = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaazaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

      let subject = compare_to!(string_with_z);
      let failure_message = subject.failure_message(&string_with_b);

      expect!(failure_message).to(match_regexp(HEADER));
      expect!(failure_message).to(match_regexp(r#"(?m:[-][\pZ\s]*"b",[\pZ\s]*[+][\pZ\s]*"z",)"#));
    }

    #[test]
    fn show_the_lines_where_two_multiline_strings_differ() {
      let expected = "abcdef\n111111\naaaaaa\n222222\nbbbbbb\n333333\ncccccc\n444444\ndddddd\n555555";
      let actual = "abcdef\n123456\naaaaaa\n222222\nbbbbbb\n333333\ncccccc\n456789\ndddddd\n555555";

      let subject = compare_to!(expected);
      let failure_message = subject.failure_message(&actual);

      expect!(failure_message).to(match_regexp(HEADER));
      expect!(failure_message).to(match_regexp(r#"(?m:[-][\pZ\s]*"123456",[\pZ\s]*[+][\pZ\s]*"111111",)"#));
      expect!(failure_message).to(match_regexp(r#"(?m:[-][\pZ\s]*"456789",[\pZ\s]*[+][\pZ\s]*"444444",)"#));
      expect!(failure_message).not().to(match_regexp(r#"[-][\pZ\s]*"aaaaaa","#));
      expect!(failure_message).not().to(match_regexp(r#"[+][\pZ\s]*"555555","#));
    }

    #[test]
    fn are_deterministic() {
      let subject = compare_to!(map(&[("a", "b"), ("c", "d"), ("e", "f")]));
      let actual = map(&[("a", "x"), ("c", "d"), ("g", "h")]);

      assert_eq!(subject.failure_message(&actual), subject.failure_message(&actual));
    }

    #[test]
    fn negated_message_reuses_the_equal_wording() {
      let subject = compare_to!(5);

      assert_eq!(subject.negated_failure_message(&5), "Expected\n    <i32>: 5\nnot to equal\n    <i32>: 5");
    }

    #[test]
    #[should_panic(expected = "\n\
                               description should be displayed:\n\
                               --- Actual\n\
                               +++ Expected\n\
                               - i32(5),\n\
                               + i64(5),\n\
                               \n\
                               at location.rs:42\n")]
    fn are_reported_by_the_assertion() {
      since("description should be displayed").expect(&5i32).at("location.rs:42").to(compare_to!(5i64));
    }

    #[test]
    #[should_panic(expected = "not to equal")]
    fn negated_assertions_report_the_equal_wording() {
      expect_for!(since("negated").expect(&5)).not().to(compare_to!(5));
    }
  }
}
