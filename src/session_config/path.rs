//! Path helpers over `serde_json` trees.

use serde_json::{Map, Value};

/// Splits an override key into path segments.
///
/// Both `a.b.c` and `a[b][c]` yield `["a", "b", "c"]`. Empty segments are
/// dropped; stray `]` characters are ignored.
pub(crate) fn split_key(key: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = key.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '.' => segments.push(std::mem::take(&mut current)),
            '[' => {
                segments.push(std::mem::take(&mut current));
                let inner: String = chars.by_ref().take_while(|c| *c != ']').collect();
                segments.push(inner);
            }
            ']' => {}
            other => current.push(other),
        }
    }
    segments.push(current);

    segments.retain(|segment| !segment.is_empty());
    segments
}

/// Assigns `value` at `path`, creating objects along the way.
///
/// An intermediate segment holding a non-object is replaced by an empty
/// object.
pub(crate) fn set_path(target: &mut Map<String, Value>, path: &[String], value: Value) {
    match path {
        [] => {}
        [last] => {
            target.insert(last.clone(), value);
        }
        [head, rest @ ..] => {
            let child = target
                .entry(head.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(map) = child {
                set_path(map, rest, value);
            }
        }
    }
}

/// Merges `overlay` into `base`: objects merge recursively, anything else in
/// `overlay` replaces the value in `base`.
pub(crate) fn deep_merge(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                deep_merge(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Converts a JSON pointer (`/a/b~1c`) to dot form (`a.b/c`).
pub(crate) fn pointer_to_dotted(pointer: &str) -> String {
    pointer
        .split('/')
        .skip(1)
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect::<Vec<_>>()
        .join(".")
}

/// Parses an override value as JSON, falling back to the raw string.
pub(crate) fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_split_key_dot_and_bracket_forms() {
        assert_eq!(split_key("a.b.c"), path(&["a", "b", "c"]));
        assert_eq!(split_key("a[b][c]"), path(&["a", "b", "c"]));
        assert_eq!(split_key("a[b].c"), path(&["a", "b", "c"]));
        assert_eq!(split_key("a..b."), path(&["a", "b"]));
        assert_eq!(split_key("a]b"), path(&["ab"]));
        assert!(split_key("").is_empty());
        assert!(split_key("[]").is_empty());
    }

    #[test]
    fn test_set_path_creates_intermediate_objects() {
        let mut target = Map::new();
        set_path(&mut target, &path(&["a", "b", "c"]), json!(1));
        assert_eq!(Value::Object(target), json!({"a": {"b": {"c": 1}}}));
    }

    #[test]
    fn test_set_path_overwrites_non_object_intermediate() {
        let mut target = json!({"a": 5}).as_object().unwrap().clone();
        set_path(&mut target, &path(&["a", "b"]), json!("x"));
        assert_eq!(Value::Object(target), json!({"a": {"b": "x"}}));
    }

    #[test]
    fn test_deep_merge_recurses_into_objects() {
        let mut base = json!({"a": {"b": 1, "c": 2}, "d": [1, 2]})
            .as_object()
            .unwrap()
            .clone();
        let overlay = json!({"a": {"b": 5}, "d": [3]}).as_object().unwrap().clone();
        deep_merge(&mut base, overlay);
        assert_eq!(
            Value::Object(base),
            json!({"a": {"b": 5, "c": 2}, "d": [3]})
        );
    }

    #[test]
    fn test_pointer_to_dotted() {
        assert_eq!(pointer_to_dotted("/a/b"), "a.b");
        assert_eq!(pointer_to_dotted("/a~1b/c~0d"), "a/b.c~d");
        assert_eq!(pointer_to_dotted(""), "");
    }

    #[test]
    fn test_parse_value_types() {
        assert_eq!(parse_value("42"), json!(42));
        assert_eq!(parse_value("true"), json!(true));
        assert_eq!(parse_value(r#"{"k":"v"}"#), json!({"k": "v"}));
        assert_eq!(parse_value("hello"), json!("hello"));
        assert_eq!(parse_value(""), json!(""));
    }
}
