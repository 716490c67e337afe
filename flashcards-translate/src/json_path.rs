//! Defensive positional lookups into `serde_json::Value` trees
//!
//! Paths are dot-separated segments. A numeric segment indexes an array, any
//! other segment names an object key: `"1.0.0.5.0.0"`, `"data.items.2"`.
//! A missing node, an out-of-range index or a node of the wrong type at any
//! hop yields `None` (or the empty value for the typed accessors), never a
//! panic.

use serde_json::Value;

/// Path navigation on JSON values
pub trait JsonPath {
    /// Node at `path`, if every hop exists
    fn at(&self, path: &str) -> Option<&Value>;

    /// String at `path`, or `""` when absent or not a string
    fn str_at(&self, path: &str) -> &str {
        self.at(path).and_then(Value::as_str).unwrap_or_default()
    }

    /// Array at `path`, or an empty slice when absent or not an array
    fn array_at(&self, path: &str) -> &[Value] {
        self.at(path)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl JsonPath for Value {
    fn at(&self, path: &str) -> Option<&Value> {
        if path.is_empty() {
            return Some(self);
        }
        path.split('.').try_fold(self, |node, segment| match node {
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            Value::Object(map) => map.get(segment),
            _ => None,
        })
    }
}
