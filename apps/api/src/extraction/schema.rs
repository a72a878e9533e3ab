use serde_json::Value;

/// A named, versioned example object handed to the model verbatim so it has a
/// concrete contract to imitate.
///
/// Field names and enum literals in `example` must match the serde names of
/// the validated target type exactly. Each target module has a test that
/// validates its own descriptor to keep the two from drifting.
#[derive(Debug, Clone)]
pub struct SchemaDescriptor {
    pub name: &'static str,
    pub version: u32,
    pub example: Value,
    /// Single root keys the model sometimes nests the payload under.
    pub wrapper_keys: &'static [&'static str],
}

impl SchemaDescriptor {
    /// Pretty-printed example for embedding in a prompt.
    pub fn render(&self) -> String {
        serde_json::to_string_pretty(&self.example).unwrap_or_else(|_| self.example.to_string())
    }

    /// Returns the payload inside `{"<wrapper>": {...}}` when the object has
    /// exactly one key and that key is a recognised wrapper.
    pub fn unwrap_root(&self, value: Value) -> Value {
        match value {
            Value::Object(mut map) if map.len() == 1 => {
                let key = map.keys().next().cloned().unwrap_or_default();
                if self.wrapper_keys.contains(&key.as_str()) {
                    map.remove(&key).unwrap_or(Value::Null)
                } else {
                    Value::Object(map)
                }
            }
            other => other,
        }
    }
}

/// Every object key path in `value` (`a.b[].c`), used to check a descriptor
/// against a serialized instance of its target type.
#[cfg(test)]
pub(crate) fn key_paths(value: &Value) -> std::collections::BTreeSet<String> {
    fn walk(value: &Value, prefix: &str, out: &mut std::collections::BTreeSet<String>) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{prefix}.{key}")
                    };
                    out.insert(path.clone());
                    walk(child, &path, out);
                }
            }
            Value::Array(items) => {
                if let Some(first) = items.first() {
                    walk(first, &format!("{prefix}[]"), out);
                }
            }
            _ => {}
        }
    }

    let mut out = std::collections::BTreeSet::new();
    walk(value, "", &mut out);
    out
}
