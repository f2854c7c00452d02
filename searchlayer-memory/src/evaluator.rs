//! Query body evaluation for in-memory search.
//!
//! This module replays the boolean filter query shape produced by the
//! client layer against stored JSON documents: range windows, term and
//! terms membership, must-not exclusion, and the two text clauses.

use serde_json::Value;

/// Value equality with numeric widening, so `1` and `1.0` compare equal
/// the way they do in a search cluster.
pub(crate) fn values_equal(left: &Value, right: &Value) -> bool {
    match (left.as_f64(), right.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => left == right,
    }
}

/// Resolves a dotted field path against a document source.
///
/// Arrays are flattened at every step, so `projects.id` collects the `id`
/// of every element of a `projects` array, and a terminal array field
/// yields its elements.
fn resolve<'a>(source: &'a Value, path: &str) -> Vec<&'a Value> {
    let mut current = vec![source];

    for segment in path.split('.') {
        let mut next = Vec::new();

        for value in current {
            match value {
                Value::Object(fields) => {
                    if let Some(inner) = fields.get(segment) {
                        next.push(inner);
                    }
                }
                Value::Array(items) => {
                    for item in items {
                        if let Some(inner) = item.get(segment) {
                            next.push(inner);
                        }
                    }
                }
                _ => {}
            }
        }

        current = next;
    }

    // Flatten terminal arrays so membership clauses see their elements.
    let mut leaves = Vec::new();
    for value in current {
        match value {
            Value::Array(items) => leaves.extend(items),
            other => leaves.push(other),
        }
    }

    leaves
}

/// Evaluates a rendered query body against a single document source.
pub(crate) struct DocumentEvaluator<'a> {
    source: &'a Value,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(source: &'a Value) -> Self {
        Self { source }
    }

    /// Returns whether this document matches the given query body.
    pub fn matches(&self, body: &Value) -> Result<bool, String> {
        let bool_query = body
            .pointer("/query/bool")
            .and_then(Value::as_object)
            .ok_or_else(|| "expected a bool query".to_string())?;

        if let Some(filter) = bool_query.get("filter") {
            let clauses = filter
                .as_array()
                .ok_or_else(|| "filter is not an array".to_string())?;

            for clause in clauses {
                if !self.clause(clause)? {
                    return Ok(false);
                }
            }
        }

        if let Some(clause) = bool_query.get("must_not") {
            if self.clause(clause)? {
                return Ok(false);
            }
        }

        if let Some(clause) = bool_query.get("must") {
            if !self.clause(clause)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn clause(&self, clause: &Value) -> Result<bool, String> {
        let fields = clause
            .as_object()
            .filter(|fields| fields.len() == 1)
            .ok_or_else(|| "expected a single-key clause object".to_string())?;

        let (kind, spec) = fields
            .iter()
            .next()
            .ok_or_else(|| "expected a single-key clause object".to_string())?;

        match kind.as_str() {
            "range" => self.range(spec),
            "term" => self.term(spec),
            "terms" => self.terms(spec),
            "match" => self.word_match(spec),
            "match_phrase" => self.phrase_match(spec),
            other => Err(format!("unsupported clause [{other}]")),
        }
    }

    fn range(&self, spec: &Value) -> Result<bool, String> {
        let (field, bounds) = single_field(spec, "range")?;

        // The exclusion clause wraps its bounds in a one-element array.
        let bounds_list: Vec<&Value> = match bounds {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };

        let values = resolve(self.source, field);

        for bounds in bounds_list {
            let bounds = bounds
                .as_object()
                .ok_or_else(|| "range bounds are not an object".to_string())?;

            let in_window = |value: &&Value| -> bool {
                let Some(number) = value.as_f64() else {
                    return false;
                };
                bounds.iter().all(|(op, bound)| {
                    let Some(bound) = bound.as_f64() else {
                        return false;
                    };
                    match op.as_str() {
                        "gt" => number > bound,
                        "gte" => number >= bound,
                        "lt" => number < bound,
                        "lte" => number <= bound,
                        _ => false,
                    }
                })
            };

            if values.iter().any(in_window) {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn term(&self, spec: &Value) -> Result<bool, String> {
        let (field, expected) = single_field(spec, "term")?;

        Ok(resolve(self.source, field)
            .into_iter()
            .any(|value| values_equal(value, expected)))
    }

    fn terms(&self, spec: &Value) -> Result<bool, String> {
        let (field, expected) = single_field(spec, "terms")?;
        let expected = expected
            .as_array()
            .ok_or_else(|| "terms values are not an array".to_string())?;

        Ok(resolve(self.source, field)
            .into_iter()
            .any(|value| expected.iter().any(|candidate| values_equal(value, candidate))))
    }

    fn word_match(&self, spec: &Value) -> Result<bool, String> {
        let (field, query) = single_field(spec, "match")?;
        let query = query
            .as_str()
            .ok_or_else(|| "match text is not a string".to_string())?
            .to_lowercase();

        Ok(resolve(self.source, field).into_iter().any(|value| {
            let Some(text) = value.as_str() else {
                return false;
            };
            let text = text.to_lowercase();
            query
                .split_whitespace()
                .any(|needle| text.split_whitespace().any(|word| word == needle))
        }))
    }

    fn phrase_match(&self, spec: &Value) -> Result<bool, String> {
        let (field, query) = single_field(spec, "match_phrase")?;
        let query = query
            .as_str()
            .ok_or_else(|| "match_phrase text is not a string".to_string())?
            .to_lowercase();

        Ok(resolve(self.source, field).into_iter().any(|value| {
            value
                .as_str()
                .is_some_and(|text| text.to_lowercase().contains(&query))
        }))
    }
}

fn single_field<'a>(spec: &'a Value, kind: &str) -> Result<(&'a str, &'a Value), String> {
    spec.as_object()
        .filter(|fields| fields.len() == 1)
        .and_then(|fields| fields.iter().next())
        .map(|(field, value)| (field.as_str(), value))
        .ok_or_else(|| format!("{kind} clause does not name exactly one field"))
}
