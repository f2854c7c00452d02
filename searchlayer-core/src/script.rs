//! Scripted array mutations for stored documents.
//!
//! A plain partial update merges whole fields and cannot edit a single
//! element of a nested array in place. [`ArrayMutation`] renders the
//! update-script payload the backend executes server-side against the stored
//! document instead: append an element, replace an element selected by one of
//! its fields, or remove every element matching a selector.
//!
//! Field and array names are the only text interpolated into the script
//! source, and they must be plain identifiers. Everything value-like (ids,
//! element payloads) travels as bound parameters, never as script text, so a
//! hostile payload cannot break out into the scripting language.
//!
//! Each mutation is built per call, rendered once, and handed to the update
//! operation; rendering is a pure function of the inputs.

use serde::Serialize;
use serde_json::{Value, json, to_value};

use crate::error::{SearchResult, SearchStoreError};

/// What a mutation does to the target array.
#[derive(Debug, Clone, PartialEq)]
enum MutationOp {
    /// Add one element; creates the array when the field is missing.
    Append { item: Value },
    /// Replace the first element whose selector field equals the selector
    /// value. Leaves the document unchanged when nothing matches.
    Replace { selector_field: String, selector_value: i64, item: Value },
    /// Remove every element whose selector field equals the selector value.
    Remove { selector_field: String, selector_value: i64 },
}

/// A single server-side mutation of an array field.
///
/// Note the deliberate asymmetry between the selector-driven operations:
/// [`replace`](ArrayMutation::replace) touches the first match only, while
/// [`remove`](ArrayMutation::remove) drops all matches.
///
/// # Example
///
/// ```ignore
/// use searchlayer::script::ArrayMutation;
///
/// let body = ArrayMutation::replace(
///     "mask_articles",
///     "article_id",
///     1886746,
///     &serde_json::json!({ "article_id": 1886746, "position": 5 }),
/// )?
/// .render();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayMutation {
    array: String,
    op: MutationOp,
}

impl ArrayMutation {
    /// Creates an append mutation: adds `item` to the end of the array,
    /// creating the array as `[item]` when the field does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the array name is not a plain identifier or the
    /// item cannot be serialized.
    pub fn append(array: impl Into<String>, item: &impl Serialize) -> SearchResult<Self> {
        let array = validated_identifier(array.into(), "array field")?;
        let item = to_value(item)?;
        Ok(ArrayMutation { array, op: MutationOp::Append { item } })
    }

    /// Creates a replace mutation: substitutes the whole first element whose
    /// `selector_field` equals `selector_value` with `item`.
    ///
    /// When no element matches, the script is still valid and the array is
    /// left unchanged; the backend reindexes the document and acknowledges
    /// with an `updated` result rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error if either field name is not a plain identifier or the
    /// item cannot be serialized.
    pub fn replace(
        array: impl Into<String>,
        selector_field: impl Into<String>,
        selector_value: i64,
        item: &impl Serialize,
    ) -> SearchResult<Self> {
        let array = validated_identifier(array.into(), "array field")?;
        let selector_field = validated_identifier(selector_field.into(), "selector field")?;
        let item = to_value(item)?;
        Ok(ArrayMutation {
            array,
            op: MutationOp::Replace { selector_field, selector_value, item },
        })
    }

    /// Creates a remove mutation: drops every element whose `selector_field`
    /// equals `selector_value`, not just the first.
    ///
    /// # Errors
    ///
    /// Returns an error if either field name is not a plain identifier.
    pub fn remove(
        array: impl Into<String>,
        selector_field: impl Into<String>,
        selector_value: i64,
    ) -> SearchResult<Self> {
        let array = validated_identifier(array.into(), "array field")?;
        let selector_field = validated_identifier(selector_field.into(), "selector field")?;
        Ok(ArrayMutation { array, op: MutationOp::Remove { selector_field, selector_value } })
    }

    /// Renders the scripted-update request body:
    /// `{"script":{"source":...,"params":{...}}}`.
    pub fn render(&self) -> Value {
        let a = &self.array;
        match &self.op {
            MutationOp::Append { item } => json!({
                "script": {
                    "source": format!(
                        "if (ctx._source.{a} == null) {{ ctx._source.{a} = [params.item] }} \
                         else {{ ctx._source.{a}.add(params.item) }}"
                    ),
                    "params": { "item": item }
                }
            }),
            MutationOp::Replace { selector_field: s, selector_value, item } => json!({
                "script": {
                    "source": format!(
                        "for (int i = 0; i < ctx._source.{a}.size(); i++) {{ \
                         if (ctx._source.{a}[i].{s} == params.match) {{ \
                         ctx._source.{a}[i] = params.item; break }} }}"
                    ),
                    "params": { "match": selector_value, "item": item }
                }
            }),
            MutationOp::Remove { selector_field: s, selector_value } => json!({
                "script": {
                    "source": format!(
                        "ctx._source.{a}.removeIf(el -> el.{s} == params.match)"
                    ),
                    "params": { "match": selector_value }
                }
            }),
        }
    }
}

/// Accepts `[A-Za-z_][A-Za-z0-9_]*`, the only names safe to splice into a
/// script source.
fn validated_identifier(name: String, what: &str) -> SearchResult<String> {
    let mut chars = name.chars();
    let head_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    if head_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(name)
    } else {
        Err(SearchStoreError::InvalidScript(format!(
            "{what} {name:?} is not a plain identifier"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_script_guards_against_a_missing_array() {
        let body = ArrayMutation::append("mask_articles", &json!({ "article_id": 7 }))
            .unwrap()
            .render();
        let source = body["script"]["source"].as_str().unwrap();
        assert!(source.contains("if (ctx._source.mask_articles == null)"));
        assert!(source.contains("ctx._source.mask_articles = [params.item]"));
        assert!(source.contains("ctx._source.mask_articles.add(params.item)"));
        assert_eq!(body["script"]["params"], json!({ "item": { "article_id": 7 } }));
    }

    #[test]
    fn replace_script_stops_after_the_first_match() {
        let body = ArrayMutation::replace(
            "mask_articles",
            "article_id",
            1886746,
            &json!({ "article_id": 1886746, "position": 5 }),
        )
        .unwrap()
        .render();
        let source = body["script"]["source"].as_str().unwrap();
        assert!(source.contains("ctx._source.mask_articles[i].article_id == params.match"));
        assert!(source.contains("break"));
        assert_eq!(
            body["script"]["params"],
            json!({ "match": 1886746, "item": { "article_id": 1886746, "position": 5 } })
        );
    }

    #[test]
    fn remove_script_drops_every_match() {
        let body = ArrayMutation::remove("mask_articles", "article_id", 1886746)
            .unwrap()
            .render();
        assert_eq!(
            body["script"]["source"],
            json!("ctx._source.mask_articles.removeIf(el -> el.article_id == params.match)")
        );
        assert_eq!(body["script"]["params"], json!({ "match": 1886746 }));
    }

    #[test]
    fn selector_values_are_bound_not_interpolated() {
        let body = ArrayMutation::remove("items", "item_id", 424242).unwrap().render();
        let source = body["script"]["source"].as_str().unwrap();
        assert!(!source.contains("424242"));
    }

    #[test]
    fn hostile_field_names_are_rejected() {
        for name in ["", "mask articles", "a.b", "items[0]", "x;ctx._source.y=1", "тэги"] {
            assert!(matches!(
                ArrayMutation::remove(name, "id", 1),
                Err(SearchStoreError::InvalidScript(_))
            ));
            assert!(matches!(
                ArrayMutation::replace("items", name, 1, &json!({})),
                Err(SearchStoreError::InvalidScript(_))
            ));
        }
    }

    #[test]
    fn underscored_names_are_fine() {
        assert!(ArrayMutation::append("_private", &json!(1)).is_ok());
        assert!(ArrayMutation::remove("list_2", "sub_id", 9).is_ok());
    }
}
