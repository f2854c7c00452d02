//! Script recognition for the in-memory backend.
//!
//! Array mutations arrive as painless script payloads. This module matches
//! the script source against the shapes the client layer produces and
//! replays their semantics on stored JSON documents. Anything else is
//! rejected the way a real cluster rejects an uncompilable script.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::evaluator::values_equal;

static APPEND_SOURCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^if \(ctx\._source\.(\w+) == null\) \{ ctx\._source\.\w+ = \[params\.item\] \} else \{ ctx\._source\.\w+\.add\(params\.item\) \}$",
    )
    .unwrap()
});

static REPLACE_SOURCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^for \(int i = 0; i < ctx\._source\.(\w+)\.size\(\); i\+\+\) \{ if \(ctx\._source\.\w+\[i\]\.(\w+) == params\.match\) \{ ctx\._source\.\w+\[i\] = params\.item; break \} \}$",
    )
    .unwrap()
});

static REMOVE_SOURCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ctx\._source\.(\w+)\.removeIf\(el -> el\.(\w+) == params\.match\)$").unwrap()
});

/// An array mutation decoded from a script payload.
#[derive(Debug)]
pub(crate) enum ScriptOp {
    Append {
        array: String,
        item: Value,
    },
    Replace {
        array: String,
        selector: String,
        selector_value: Value,
        item: Value,
    },
    Remove {
        array: String,
        selector: String,
        selector_value: Value,
    },
}

fn param(script: &Value, name: &str) -> Result<Value, String> {
    script
        .pointer(&format!("/params/{name}"))
        .cloned()
        .ok_or_else(|| format!("script is missing required parameter [{name}]"))
}

/// Decodes a `{"source": ..., "params": ...}` payload into a [`ScriptOp`].
pub(crate) fn recognize(script: &Value) -> Result<ScriptOp, String> {
    let source = script
        .get("source")
        .and_then(Value::as_str)
        .ok_or_else(|| "script source is not a string".to_string())?;

    if let Some(captures) = APPEND_SOURCE.captures(source) {
        return Ok(ScriptOp::Append {
            array: captures[1].to_string(),
            item: param(script, "item")?,
        });
    }

    if let Some(captures) = REPLACE_SOURCE.captures(source) {
        return Ok(ScriptOp::Replace {
            array: captures[1].to_string(),
            selector: captures[2].to_string(),
            selector_value: param(script, "match")?,
            item: param(script, "item")?,
        });
    }

    if let Some(captures) = REMOVE_SOURCE.captures(source) {
        return Ok(ScriptOp::Remove {
            array: captures[1].to_string(),
            selector: captures[2].to_string(),
            selector_value: param(script, "match")?,
        });
    }

    Err("unable to compile script".to_string())
}

/// Replays a decoded mutation against a document source in place.
pub(crate) fn apply(source: &mut Value, op: ScriptOp) -> Result<(), String> {
    let fields = source
        .as_object_mut()
        .ok_or_else(|| "document source is not an object".to_string())?;

    match op {
        ScriptOp::Append { array, item } => {
            match fields.get_mut(&array) {
                Some(Value::Array(items)) => items.push(item),
                Some(Value::Null) | None => {
                    fields.insert(array, Value::Array(vec![item]));
                }
                Some(_) => return Err(format!("field [{array}] is not an array")),
            }
            Ok(())
        }
        ScriptOp::Replace { array, selector, selector_value, item } => {
            let items = array_field(fields, &array)?;
            for element in items.iter_mut() {
                if selected(element, &selector, &selector_value) {
                    *element = item;
                    break;
                }
            }
            Ok(())
        }
        ScriptOp::Remove { array, selector, selector_value } => {
            let items = array_field(fields, &array)?;
            items.retain(|element| !selected(element, &selector, &selector_value));
            Ok(())
        }
    }
}

fn array_field<'a>(
    fields: &'a mut serde_json::Map<String, Value>,
    array: &str,
) -> Result<&'a mut Vec<Value>, String> {
    match fields.get_mut(array) {
        Some(Value::Array(items)) => Ok(items),
        // Iterating a missing array is a null dereference on the server
        Some(_) | None => Err(format!("field [{array}] is not an array")),
    }
}

fn selected(element: &Value, selector: &str, selector_value: &Value) -> bool {
    element
        .get(selector)
        .is_some_and(|value| values_equal(value, selector_value))
}
