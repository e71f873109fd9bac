// ── Field normalizer ──
//
// Pure, total helpers that reconcile the loosely-typed upstream wire format
// into the domain model. Upstream emits either `snake_case` or `camelCase`
// per field with no consistency, nests optional objects, and attaches
// pagination only sometimes. Nothing here performs I/O or fails.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::model::{FormField, Pagination, TitleDescription};

/// Stringify a scalar: strings verbatim, everything else via its JSON text.
/// `null` counts as absent.
pub fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Stringified value of `key` on `obj`, if present and non-null.
pub fn string_field(obj: &Value, key: &str) -> Option<String> {
    obj.get(key).and_then(stringify)
}

/// Boolean value of `key`, accepting `"true"`/`"false"` strings.
pub fn bool_field(obj: &Value, key: &str) -> Option<bool> {
    match obj.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Resolve a field that upstream names either way. The snake-case key wins
/// when both are present.
pub fn dual_key(obj: &Value, snake: &str, camel: &str) -> Option<String> {
    string_field(obj, snake).or_else(|| string_field(obj, camel))
}

/// Extract an optional `{title, description}` object.
///
/// Returns `None` only when the source object is absent; a present but
/// empty object yields `Some` with both members `None`.
pub fn title_description(source: Option<&Value>) -> Option<TitleDescription> {
    let obj = source?.as_object()?;
    Some(TitleDescription {
        title: obj.get("title").and_then(stringify),
        description: obj.get("description").and_then(stringify),
    })
}

/// Map raw field descriptors to `{displayName?, type?}`, keeping keys.
/// An empty result is reported as `None`.
pub fn form_fields(source: Option<&Value>) -> Option<BTreeMap<String, FormField>> {
    let raw = source?.as_object()?;
    let fields: BTreeMap<String, FormField> = raw
        .iter()
        .map(|(key, descriptor)| {
            let field = FormField {
                display_name: string_field(descriptor, "displayName"),
                field_type: string_field(descriptor, "type"),
            };
            (key.clone(), field)
        })
        .collect();
    (!fields.is_empty()).then_some(fields)
}

/// Coerce a raw pagination object. Missing or unparseable members are 0.
pub fn pagination(source: Option<&Value>) -> Option<Pagination> {
    let obj = source?.as_object()?;
    Some(Pagination {
        limit: number(obj, "limit"),
        offset: number(obj, "offset"),
        total: number(obj, "total"),
    })
}

fn number(obj: &Map<String, Value>, key: &str) -> u64 {
    match obj.get(key) {
        Some(Value::Number(n)) => n.as_u64().unwrap_or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map_or(0, |f| {
                    #[allow(
                        clippy::as_conversions,
                        clippy::cast_possible_truncation,
                        clippy::cast_sign_loss
                    )]
                    let whole = f.trunc() as u64;
                    whole
                })
        }),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Items of the array stored under `key`, or nothing.
pub fn list<'a>(body: &'a Value, key: &str) -> &'a [Value] {
    body.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}
