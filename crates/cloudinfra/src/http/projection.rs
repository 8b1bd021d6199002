//! Dotted-path projection over decoded response bodies.

use serde_json::Value;

use crate::error::{DecodeError, Error};

enum Segment {
    Field(String),
    Index(usize),
}

/// Apply a projection expression to a decoded value.
///
/// The expression is a dotted path with optional array indices:
/// `data.token`, `users[0].email`. A path that walks off the value yields
/// `Value::Null`; a malformed expression is a [`DecodeError::Projection`].
pub fn project(expression: &str, value: &Value) -> Result<Value, Error> {
    let mut current = value;
    for segment in parse(expression)? {
        current = match segment {
            Segment::Field(name) => match current {
                Value::Object(map) => map.get(&name).unwrap_or(&Value::Null),
                _ => return Ok(Value::Null),
            },
            Segment::Index(index) => match current {
                Value::Array(items) => items.get(index).unwrap_or(&Value::Null),
                _ => return Ok(Value::Null),
            },
        };
        if current.is_null() {
            return Ok(Value::Null);
        }
    }
    Ok(current.clone())
}

fn parse(expression: &str) -> Result<Vec<Segment>, Error> {
    let mut segments = Vec::new();
    let mut field = String::new();
    let mut chars = expression.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '.' => {
                if field.is_empty() {
                    return Err(malformed(expression, "empty path segment"));
                }
                segments.push(Segment::Field(std::mem::take(&mut field)));
            }
            '[' => {
                if !field.is_empty() {
                    segments.push(Segment::Field(std::mem::take(&mut field)));
                }
                let mut digits = String::new();
                loop {
                    match chars.next() {
                        Some(']') => break,
                        Some(digit) => digits.push(digit),
                        None => return Err(malformed(expression, "unterminated index")),
                    }
                }
                let index = digits
                    .parse::<usize>()
                    .map_err(|_| malformed(expression, "non-numeric index"))?;
                segments.push(Segment::Index(index));
                if chars.peek() == Some(&'.') {
                    chars.next();
                }
            }
            _ => field.push(ch),
        }
    }
    if !field.is_empty() {
        segments.push(Segment::Field(field));
    }
    if segments.is_empty() {
        return Err(malformed(expression, "empty expression"));
    }
    Ok(segments)
}

fn malformed(expression: &str, reason: &str) -> Error {
    DecodeError::Projection {
        expression: expression.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn projects_a_nested_field() {
        let value = json!({"data": {"token": "abc"}});
        assert_eq!(project("data.token", &value).unwrap(), json!("abc"));
    }

    #[test]
    fn projects_through_array_indices() {
        let value = json!({"users": [{"email": "a@b.com"}, {"email": "c@d.com"}]});
        assert_eq!(project("users[1].email", &value).unwrap(), json!("c@d.com"));
        assert_eq!(project("users[0]", &value).unwrap(), json!({"email": "a@b.com"}));
    }

    #[test]
    fn missing_paths_yield_null() {
        let value = json!({"data": {"token": "abc"}});
        assert_eq!(project("data.missing", &value).unwrap(), Value::Null);
        assert_eq!(project("data.token.deeper", &value).unwrap(), Value::Null);
        assert_eq!(project("data[3]", &value).unwrap(), Value::Null);
    }

    #[test]
    fn malformed_expressions_are_errors() {
        let value = json!({});
        assert!(project("", &value).is_err());
        assert!(project(".leading", &value).is_err());
        assert!(project("a..b", &value).is_err());
        assert!(project("items[", &value).is_err());
        assert!(project("items[x]", &value).is_err());
    }
}
