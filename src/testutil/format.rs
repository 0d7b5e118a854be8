use crate::cmp::Reflect;

const INDENTATION: &str = "    ";

/// Renders `value` as `<type>: value`, indented by `indentation` levels.
pub fn object(value: &dyn Reflect, indentation: usize) -> String {
  let shown = if value.is_nil() { "nil".to_string() } else { format!("{:?}", value) };
  format!("{}<{}>: {}", INDENTATION.repeat(indentation), value.type_name(), shown)
}

/// `Expected`, the actual value, the relation and, if any, the expected value, one per line.
pub fn message(actual: &dyn Reflect, relation: &str, expected: Option<&dyn Reflect>) -> String {
  match expected {
    Some(expected) => format!("Expected\n{}\n{}\n{}", object(actual, 1), relation, object(expected, 1)),
    None => format!("Expected\n{}\n{}", object(actual, 1), relation),
  }
}

#[cfg(test)]
mod tests {

  use super::*;
  use crate::cmp::Nil;

  #[test]
  fn objects_show_type_and_value() {
    assert_eq!(object(&5i64, 0), "<i64>: 5");
    assert_eq!(object(&String::from("foo"), 1), "    <String>: \"foo\"");
    assert_eq!(object(&None::<u8>, 0), "<Option<u8>>: nil");
    assert_eq!(object(&Nil, 2), "        <Nil>: nil");
  }

  #[test]
  fn messages_relate_actual_and_expected() {
    assert_eq!(message(&1, "to equal", Some(&2)), "Expected\n    <i32>: 1\nto equal\n    <i32>: 2");
    assert_eq!(message(&1, "to be nil", None), "Expected\n    <i32>: 1\nto be nil");
  }
}
