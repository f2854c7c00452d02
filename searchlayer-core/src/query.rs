//! Search query construction for document stores.
//!
//! This module renders a [`SearchQuery`] specification into the boolean-filter
//! request body the backend executes. Construction is pure: no I/O happens
//! here, and a query can be re-rendered after changing toggles, each render
//! producing an independent payload.
//!
//! # Query Building
//!
//! ```ignore
//! use searchlayer::query::SearchQuery;
//!
//! let body = SearchQuery::new()
//!     .id_range(100, 2000)
//!     .has_video(true)
//!     .projects(vec![3, 17])
//!     .words("storm flood")
//!     .size(25)
//!     .render()?;
//! ```

use serde_json::{Value, json};

use crate::error::{SearchResult, SearchStoreError};

/// Number of hits returned when the caller leaves the size unset or
/// supplies a non-positive value.
pub const DEFAULT_SIZE: i64 = 10;

/// Inclusive-exclusive numeric bounds for a range clause on the id field.
///
/// The zero value renders as `{"gt":0,"lt":0}`, which matches nothing by
/// itself; callers treat zero bounds as "no effective bound" only together
/// with the complementary exclusion range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IdRange {
    pub gt: i64,
    pub lt: i64,
}

impl IdRange {
    pub fn new(gt: i64, lt: i64) -> Self {
        IdRange { gt, lt }
    }

    fn to_json(self) -> Value {
        json!({ "gt": self.gt, "lt": self.lt })
    }
}

/// A single condition inside a boolean query.
///
/// Each variant renders to the corresponding backend DSL object.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Exact-value match on a field.
    Term { field: String, value: Value },
    /// Exact-value-set membership on a field.
    Terms { field: String, values: Vec<i64> },
    /// Numeric range condition on a field.
    Range { field: String, bounds: IdRange },
    /// Full-text match; the backend treats separate words disjunctively.
    Match { field: String, text: String },
    /// Exact phrase match.
    MatchPhrase { field: String, text: String },
}

impl Clause {
    /// Creates a term clause.
    pub fn term(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Clause::Term { field: field.into(), value: value.into() }
    }

    /// Creates a terms clause over a set of integer ids.
    pub fn terms(field: impl Into<String>, values: Vec<i64>) -> Self {
        Clause::Terms { field: field.into(), values }
    }

    /// Creates a range clause.
    pub fn range(field: impl Into<String>, bounds: IdRange) -> Self {
        Clause::Range { field: field.into(), bounds }
    }

    /// Renders this clause as a backend DSL object.
    pub fn to_json(&self) -> Value {
        match self {
            Clause::Term { field, value } => json!({ "term": { field: value } }),
            Clause::Terms { field, values } => json!({ "terms": { field: values } }),
            Clause::Range { field, bounds } => json!({ "range": { field: bounds.to_json() } }),
            Clause::Match { field, text } => json!({ "match": { field: text } }),
            Clause::MatchPhrase { field, text } => json!({ "match_phrase": { field: text } }),
        }
    }
}

/// A search specification made of optional filter toggles.
///
/// An unset toggle (`None`) contributes nothing to the rendered query; a set
/// toggle contributes exactly one clause, at a fixed position. Two range
/// clauses are always present: the id window in `filter` and the id
/// exclusion in `must_not`. The exclusion is emitted even when its bounds
/// were never set (they default to zero) because the backend template treats
/// both ranges as fixed positions; see [`SearchQuery::exclude_id_range`].
///
/// Fields are public so a specification can be adjusted between renders;
/// rendering never mutates the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    /// Id window for the mandatory `filter` range clause.
    pub id_range: IdRange,
    /// Id window for the mandatory `must_not` range clause.
    pub exclude: IdRange,
    /// Number of hits to return; values below 1 fall back to [`DEFAULT_SIZE`].
    pub size: i64,
    pub has_icon: Option<bool>,
    pub has_photo_report: Option<bool>,
    pub has_video: Option<bool>,
    pub is_news: Option<bool>,
    /// Front-page classification flag, stored as `is_spiegel`.
    pub is_spiegel: Option<bool>,
    pub projects: Option<Vec<i64>>,
    pub rubrics: Option<Vec<i64>>,
    pub collections: Option<Vec<i64>>,
    pub authors: Option<Vec<i64>>,
    pub tags: Option<Vec<i64>>,
    /// Only rendered when [`collections`](SearchQuery::collections) is set.
    pub main_collection: Option<bool>,
    /// Only rendered when [`projects`](SearchQuery::projects) is set.
    pub main_project: Option<bool>,
    pub doc_type: Option<String>,
    /// Disjunctive word match on the text field.
    pub words: Option<String>,
    /// Exact phrase match on the text field. Loses against
    /// [`words`](SearchQuery::words) when both are set.
    pub phrase: Option<String>,
}

impl SearchQuery {
    /// Creates an empty specification: no optional clauses, zero ranges,
    /// default result size.
    pub fn new() -> Self {
        SearchQuery::default()
    }

    /// Sets the id window of the mandatory filter range clause
    /// (`id > gt` and `id < lt`).
    pub fn id_range(mut self, gt: i64, lt: i64) -> Self {
        self.id_range = IdRange::new(gt, lt);
        self
    }

    /// Sets the id window excluded from results.
    ///
    /// The exclusion clause is part of the fixed query shape and renders
    /// even when this setter was never called; zero bounds exclude nothing.
    pub fn exclude_id_range(mut self, gt: i64, lt: i64) -> Self {
        self.exclude = IdRange::new(gt, lt);
        self
    }

    /// Sets the number of hits to return. Values below 1 are normalized to
    /// [`DEFAULT_SIZE`] when the query is executed.
    pub fn size(mut self, size: i64) -> Self {
        self.size = size;
        self
    }

    /// Filters on the icon presence flag.
    pub fn has_icon(mut self, value: bool) -> Self {
        self.has_icon = Some(value);
        self
    }

    /// Filters on the photo-report presence flag.
    pub fn has_photo_report(mut self, value: bool) -> Self {
        self.has_photo_report = Some(value);
        self
    }

    /// Filters on the video presence flag.
    pub fn has_video(mut self, value: bool) -> Self {
        self.has_video = Some(value);
        self
    }

    /// Filters on the news-versus-article flag.
    pub fn is_news(mut self, value: bool) -> Self {
        self.is_news = Some(value);
        self
    }

    /// Filters on the front-page classification flag.
    pub fn is_spiegel(mut self, value: bool) -> Self {
        self.is_spiegel = Some(value);
        self
    }

    /// Restricts results to documents belonging to any of the given projects.
    /// The set must be non-empty; an empty set fails at render time.
    pub fn projects(mut self, ids: Vec<i64>) -> Self {
        self.projects = Some(ids);
        self
    }

    /// Restricts results to documents belonging to any of the given rubrics.
    pub fn rubrics(mut self, ids: Vec<i64>) -> Self {
        self.rubrics = Some(ids);
        self
    }

    /// Restricts results to documents belonging to any of the given collections.
    pub fn collections(mut self, ids: Vec<i64>) -> Self {
        self.collections = Some(ids);
        self
    }

    /// Restricts results to documents written by any of the given authors.
    pub fn authors(mut self, ids: Vec<i64>) -> Self {
        self.authors = Some(ids);
        self
    }

    /// Restricts results to documents carrying any of the given tags.
    pub fn tags(mut self, ids: Vec<i64>) -> Self {
        self.tags = Some(ids);
        self
    }

    /// Filters on the main-collection flag. Ignored unless a collection
    /// filter is also set.
    pub fn main_collection(mut self, value: bool) -> Self {
        self.main_collection = Some(value);
        self
    }

    /// Filters on the main-project flag. Ignored unless a project filter is
    /// also set.
    pub fn main_project(mut self, value: bool) -> Self {
        self.main_project = Some(value);
        self
    }

    /// Filters on the document type.
    pub fn doc_type(mut self, value: impl Into<String>) -> Self {
        self.doc_type = Some(value.into());
        self
    }

    /// Requires the text field to match at least one of the given
    /// whitespace-separated words. Takes precedence over
    /// [`phrase`](SearchQuery::phrase).
    pub fn words(mut self, value: impl Into<String>) -> Self {
        self.words = Some(value.into());
        self
    }

    /// Requires the text field to contain the exact phrase.
    pub fn phrase(mut self, value: impl Into<String>) -> Self {
        self.phrase = Some(value.into());
        self
    }

    /// The size the backend will be asked for: the configured value, or
    /// [`DEFAULT_SIZE`] when unset or non-positive.
    pub fn effective_size(&self) -> i64 {
        if self.size < 1 { DEFAULT_SIZE } else { self.size }
    }

    /// Renders the specification into the boolean-filter request body.
    ///
    /// Optional clauses render in a fixed order: icon, photo report, video,
    /// news, classification flag, projects, rubrics, collections, authors,
    /// tags, main collection, main project, type, then the text clause. The
    /// order pins the output bytes for a given specification; filter clauses
    /// are semantically order-independent.
    ///
    /// # Errors
    ///
    /// Returns [`SearchStoreError::InvalidQuery`] if any enabled membership
    /// filter carries an empty id set.
    pub fn render(&self) -> SearchResult<Value> {
        let mut filter = vec![Clause::range("id", self.id_range).to_json()];

        if let Some(value) = self.has_icon {
            filter.push(Clause::term("hasIcon", value).to_json());
        }
        if let Some(value) = self.has_photo_report {
            filter.push(Clause::term("hasPhotorep", value).to_json());
        }
        if let Some(value) = self.has_video {
            filter.push(Clause::term("hasVideo", value).to_json());
        }
        if let Some(value) = self.is_news {
            filter.push(Clause::term("isNews", value).to_json());
        }
        if let Some(value) = self.is_spiegel {
            filter.push(Clause::term("is_spiegel", value).to_json());
        }
        if let Some(ids) = &self.projects {
            filter.push(Self::membership("projects.id", ids)?);
        }
        if let Some(ids) = &self.rubrics {
            filter.push(Self::membership("rubrics.id", ids)?);
        }
        if let Some(ids) = &self.collections {
            filter.push(Self::membership("collections.id", ids)?);
        }
        if let Some(ids) = &self.authors {
            filter.push(Self::membership("authors.id", ids)?);
        }
        if let Some(ids) = &self.tags {
            filter.push(Self::membership("tags.id", ids)?);
        }
        if let (Some(_), Some(value)) = (&self.collections, self.main_collection) {
            filter.push(Clause::term("isMainColl", value).to_json());
        }
        if let (Some(_), Some(value)) = (&self.projects, self.main_project) {
            filter.push(Clause::term("isMainProject", value).to_json());
        }
        if let Some(value) = &self.doc_type {
            filter.push(Clause::term("type", value.as_str()).to_json());
        }

        // The exclusion range keeps the backend's one-element array wrapper.
        let mut bool_body = json!({
            "filter": filter,
            "must_not": { "range": { "id": [self.exclude.to_json()] } },
        });
        if let Some(text) = self.text_clause() {
            bool_body["must"] = text;
        }

        Ok(json!({ "query": { "bool": bool_body } }))
    }

    fn membership(field: &str, ids: &[i64]) -> SearchResult<Value> {
        if ids.is_empty() {
            return Err(SearchStoreError::InvalidQuery(format!(
                "membership filter on {field} is enabled with an empty id set"
            )));
        }
        Ok(Clause::terms(field, ids.to_vec()).to_json())
    }

    fn text_clause(&self) -> Option<Value> {
        if let Some(words) = &self.words {
            return Some(
                Clause::Match { field: "text".to_string(), text: words.clone() }.to_json(),
            );
        }
        if let Some(phrase) = &self.phrase {
            return Some(
                Clause::MatchPhrase { field: "text".to_string(), text: phrase.clone() }.to_json(),
            );
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline() -> Value {
        json!({
            "query": {
                "bool": {
                    "filter": [
                        { "range": { "id": { "gt": 0, "lt": 0 } } }
                    ],
                    "must_not": { "range": { "id": [{ "gt": 0, "lt": 0 }] } }
                }
            }
        })
    }

    #[test]
    fn empty_query_renders_only_the_two_range_clauses() {
        let rendered = SearchQuery::new().render().unwrap();
        assert_eq!(rendered, baseline());
    }

    #[test]
    fn rendering_is_deterministic() {
        let query = SearchQuery::new()
            .id_range(5, 500)
            .has_icon(true)
            .projects(vec![1, 2])
            .words("a b");
        assert_eq!(
            query.render().unwrap().to_string(),
            query.render().unwrap().to_string()
        );
    }

    #[test]
    fn range_bounds_land_in_their_clauses() {
        let rendered = SearchQuery::new()
            .id_range(100, 2000)
            .exclude_id_range(400, 500)
            .render()
            .unwrap();
        assert_eq!(
            rendered["query"]["bool"]["filter"][0],
            json!({ "range": { "id": { "gt": 100, "lt": 2000 } } })
        );
        assert_eq!(
            rendered["query"]["bool"]["must_not"],
            json!({ "range": { "id": [{ "gt": 400, "lt": 500 }] } })
        );
    }

    #[test]
    fn single_toggle_adds_one_clause_and_resets_cleanly() {
        let mut query = SearchQuery::new().has_video(true);
        let rendered = query.render().unwrap();
        let filter = rendered["query"]["bool"]["filter"].as_array().unwrap();
        assert_eq!(filter.len(), 2);
        assert_eq!(filter[1], json!({ "term": { "hasVideo": true } }));

        query.has_video = None;
        assert_eq!(
            query.render().unwrap().to_string(),
            baseline().to_string()
        );
    }

    #[test]
    fn clauses_render_in_fixed_positions() {
        let rendered = SearchQuery::new()
            .has_icon(true)
            .has_photo_report(false)
            .has_video(true)
            .is_news(true)
            .is_spiegel(false)
            .projects(vec![7])
            .rubrics(vec![8])
            .collections(vec![9])
            .authors(vec![10])
            .tags(vec![11])
            .main_collection(true)
            .main_project(false)
            .doc_type("article")
            .render()
            .unwrap();
        let filter = rendered["query"]["bool"]["filter"].as_array().unwrap();
        let expected = json!([
            { "range": { "id": { "gt": 0, "lt": 0 } } },
            { "term": { "hasIcon": true } },
            { "term": { "hasPhotorep": false } },
            { "term": { "hasVideo": true } },
            { "term": { "isNews": true } },
            { "term": { "is_spiegel": false } },
            { "terms": { "projects.id": [7] } },
            { "terms": { "rubrics.id": [8] } },
            { "terms": { "collections.id": [9] } },
            { "terms": { "authors.id": [10] } },
            { "terms": { "tags.id": [11] } },
            { "term": { "isMainColl": true } },
            { "term": { "isMainProject": false } },
            { "term": { "type": "article" } },
        ]);
        assert_eq!(filter, expected.as_array().unwrap());
    }

    #[test]
    fn membership_ids_keep_their_supplied_order() {
        let rendered = SearchQuery::new().projects(vec![3, 1, 2]).render().unwrap();
        assert_eq!(
            rendered["query"]["bool"]["filter"][1],
            json!({ "terms": { "projects.id": [3, 1, 2] } })
        );
    }

    #[test]
    fn empty_membership_set_is_rejected() {
        let err = SearchQuery::new().tags(vec![]).render().unwrap_err();
        assert!(matches!(err, SearchStoreError::InvalidQuery(_)));
    }

    #[test]
    fn main_collection_without_collections_has_no_effect() {
        let rendered = SearchQuery::new().main_collection(true).render().unwrap();
        assert_eq!(rendered, baseline());
    }

    #[test]
    fn main_project_requires_projects() {
        let lone = SearchQuery::new().main_project(true).render().unwrap();
        assert_eq!(lone, baseline());

        let gated = SearchQuery::new()
            .projects(vec![4])
            .main_project(true)
            .render()
            .unwrap();
        let filter = gated["query"]["bool"]["filter"].as_array().unwrap();
        assert_eq!(filter[2], json!({ "term": { "isMainProject": true } }));
    }

    #[test]
    fn words_win_over_phrase() {
        let rendered = SearchQuery::new()
            .words("breaking severe")
            .phrase("breaking severe weather")
            .render()
            .unwrap();
        assert_eq!(
            rendered["query"]["bool"]["must"],
            json!({ "match": { "text": "breaking severe" } })
        );
    }

    #[test]
    fn phrase_alone_renders_match_phrase() {
        let rendered = SearchQuery::new().phrase("exact words only").render().unwrap();
        assert_eq!(
            rendered["query"]["bool"]["must"],
            json!({ "match_phrase": { "text": "exact words only" } })
        );
    }

    #[test]
    fn no_text_toggle_means_no_must_clause() {
        let rendered = SearchQuery::new().has_icon(true).render().unwrap();
        assert!(rendered["query"]["bool"].get("must").is_none());
    }

    #[test]
    fn size_normalization() {
        assert_eq!(SearchQuery::new().effective_size(), DEFAULT_SIZE);
        assert_eq!(SearchQuery::new().size(0).effective_size(), DEFAULT_SIZE);
        assert_eq!(SearchQuery::new().size(-5).effective_size(), DEFAULT_SIZE);
        assert_eq!(SearchQuery::new().size(25).effective_size(), 25);
    }
}
