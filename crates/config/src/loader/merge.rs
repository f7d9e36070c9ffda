//! Deep merge of candidate maps.
//!
//! Invariants:
//! - Maps are applied in ascending priority; a key present in a later map wins.
//! - A key absent from a later map never removes or overwrites an earlier value.
//! - When both sides hold an object, the objects merge key by key; any other
//!   combination is a full replacement.

use serde_json::{Map, Value};

/// Deep-merge `updates` into `base`, later maps taking precedence.
pub fn deep_update(
    mut base: Map<String, Value>,
    updates: impl IntoIterator<Item = Map<String, Value>>,
) -> Map<String, Value> {
    for update in updates {
        merge_into(&mut base, update);
    }
    base
}

fn merge_into(target: &mut Map<String, Value>, update: Map<String, Value>) {
    for (key, incoming) in update {
        let Value::Object(incoming) = incoming else {
            target.insert(key, incoming);
            continue;
        };

        if let Some(Value::Object(existing)) = target.get_mut(&key) {
            merge_into(existing, incoming);
            continue;
        }
        target.insert(key, Value::Object(incoming));
    }
}
