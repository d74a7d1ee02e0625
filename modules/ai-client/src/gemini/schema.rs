use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Keywords of JSON Schema draft 7 that the Gemini `Schema` object rejects.
const UNSUPPORTED_KEYS: &[&str] = &["$schema", "definitions", "title", "format", "additionalProperties"];

/// Trait for types that can be used as Gemini structured output.
///
/// Automatically implemented for any type that implements `JsonSchema + DeserializeOwned`.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Generate a Gemini `responseSchema` for this type.
    ///
    /// Gemini accepts an OpenAPI 3.0 subset:
    /// 1. Fully inlined schemas (no `$ref` references)
    /// 2. Upper-case type names (`OBJECT`, `ARRAY`, `STRING`, ...)
    /// 3. A single type per node, with `nullable: true` instead of `["T", "null"]`
    /// 4. No `additionalProperties`, `title` or `format`
    ///
    /// `required` is carried over from the Rust type: `Option` fields stay optional.
    fn gemini_schema() -> Value {
        let schema = schema_for!(Self);
        let mut value = serde_json::to_value(schema).unwrap_or_default();

        inline_refs(&mut value);
        convert_node(&mut value);

        value
    }

    fn type_name() -> String {
        <Self as JsonSchema>::schema_name()
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

fn convert_node(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in UNSUPPORTED_KEYS {
                map.remove(*key);
            }
            collapse_type(map);

            if let Some(Value::Object(props)) = map.get_mut("properties") {
                for (_, prop) in props.iter_mut() {
                    convert_node(prop);
                }
            }
            if let Some(items) = map.get_mut("items") {
                convert_node(items);
            }
            if let Some(Value::Array(variants)) = map.get_mut("anyOf") {
                for variant in variants.iter_mut() {
                    convert_node(variant);
                }
            }
        }
        Value::Array(arr) => {
            for item in arr.iter_mut() {
                convert_node(item);
            }
        }
        _ => {}
    }
}

fn collapse_type(map: &mut Map<String, Value>) {
    let (name, nullable) = match map.get("type") {
        Some(Value::String(name)) => (name.clone(), false),
        Some(Value::Array(names)) => {
            let nullable = names.iter().any(|n| n == "null");
            match names.iter().filter_map(Value::as_str).find(|n| *n != "null") {
                Some(name) => (name.to_string(), nullable),
                None => return,
            }
        }
        _ => return,
    };

    map.insert("type".to_string(), Value::String(name.to_uppercase()));
    if nullable {
        map.insert("nullable".to_string(), Value::Bool(true));
    }
}

fn inline_refs(value: &mut Value) {
    let definitions = if let Value::Object(map) = value {
        map.get("definitions").cloned()
    } else {
        None
    };

    if let Some(defs) = definitions {
        inline_refs_recursive(value, &defs);
    }
}

fn inline_refs_recursive(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(ref_path)) = map.get("$ref").cloned() {
                if let Some(type_name) = ref_path.strip_prefix("#/definitions/") {
                    if let Some(def) = definitions.get(type_name) {
                        *value = def.clone();
                        inline_refs_recursive(value, definitions);
                        return;
                    }
                }
            }

            if let Some(Value::Array(all_of)) = map.get("allOf").cloned() {
                if all_of.len() == 1 {
                    if let Some(only) = all_of.into_iter().next() {
                        *value = only;
                        inline_refs_recursive(value, definitions);
                        return;
                    }
                }
            }

            for (_, v) in map.iter_mut() {
                inline_refs_recursive(v, definitions);
            }
        }
        Value::Array(arr) => {
            for item in arr.iter_mut() {
                inline_refs_recursive(item, definitions);
            }
        }
        _ => {}
    }
}
