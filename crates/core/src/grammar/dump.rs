use serde::Serialize;

/// Serialize a tree (or any parser output) to a pretty-printed JSON string.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).expect("element serialization cannot fail")
}
