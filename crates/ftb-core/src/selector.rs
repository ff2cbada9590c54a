//! Query predicates over JSON documents.
//!
//! A [`Selector`] is a conjunction of conditions on dotted field paths. It can
//! be rendered as a Mongo-style filter document for a networked store, or
//! evaluated directly against a document by an in-process store. Both forms
//! describe the same predicate.

use std::cmp::Ordering;

use serde_json::{Map, Value};

/// A single condition on a dotted field path.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// The field must equal the value.
    Eq {
        /// Dotted path into the document (e.g. `current.links.dataset.id`).
        path: String,
        /// Required value.
        value: Value,
    },
    /// The field must equal one of the values.
    AnyOf {
        /// Dotted path into the document.
        path: String,
        /// Accepted values.
        values: Vec<Value>,
    },
}

impl Condition {
    /// Returns the dotted path this condition constrains.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Eq { path, .. } | Self::AnyOf { path, .. } => path,
        }
    }

    fn matches(&self, document: &Value) -> bool {
        let Some(found) = lookup(document, self.path()) else {
            return false;
        };
        match self {
            Self::Eq { value, .. } => found == value,
            Self::AnyOf { values, .. } => values.iter().any(|v| v == found),
        }
    }
}

/// A conjunction of conditions. An empty selector matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selector {
    conditions: Vec<Condition>,
}

impl Selector {
    /// Creates an empty selector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality condition.
    #[must_use]
    pub fn eq(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq {
            path: path.into(),
            value: value.into(),
        });
        self
    }

    /// Adds a membership condition.
    #[must_use]
    pub fn any_of<I, V>(mut self, path: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.conditions.push(Condition::AnyOf {
            path: path.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Drops every condition on the given path.
    #[must_use]
    pub fn without(mut self, path: &str) -> Self {
        self.conditions.retain(|c| c.path() != path);
        self
    }

    /// Returns the conditions in insertion order.
    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Returns true when the document satisfies every condition.
    #[must_use]
    pub fn matches(&self, document: &Value) -> bool {
        self.conditions.iter().all(|c| c.matches(document))
    }

    /// Renders the selector as a Mongo-style filter document.
    ///
    /// ```rust
    /// use ftb_core::Selector;
    /// use serde_json::json;
    ///
    /// let filter = Selector::new()
    ///     .eq("links.dataset.id", "123")
    ///     .any_of("state", ["associated", "published"])
    ///     .to_filter();
    ///
    /// assert_eq!(
    ///     filter,
    ///     json!({"links.dataset.id": "123", "state": {"$in": ["associated", "published"]}})
    /// );
    /// ```
    #[must_use]
    pub fn to_filter(&self) -> Value {
        let mut filter = Map::new();
        for condition in &self.conditions {
            match condition {
                Condition::Eq { path, value } => {
                    filter.insert(path.clone(), value.clone());
                }
                Condition::AnyOf { path, values } => {
                    let mut op = Map::new();
                    op.insert("$in".to_string(), Value::Array(values.clone()));
                    filter.insert(path.clone(), Value::Object(op));
                }
            }
        }
        Value::Object(filter)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// Sort order on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    path: String,
    direction: SortDirection,
}

impl Sort {
    /// Sorts ascending on the field.
    #[must_use]
    pub fn ascending(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Sorts descending on the field.
    #[must_use]
    pub fn descending(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Returns the sorted field path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the direction.
    #[must_use]
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Compares two documents under this sort order.
    ///
    /// Documents missing the field sort before documents that have it.
    #[must_use]
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        let ordering = match (lookup(a, &self.path), lookup(b, &self.path)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => compare_values(a, b),
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    /// Renders the sort as a Mongo-style sort document (`1` / `-1`).
    #[must_use]
    pub fn to_document(&self) -> Value {
        let order = match self.direction {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        };
        let mut doc = Map::new();
        doc.insert(self.path.clone(), Value::from(order));
        Value::Object(doc)
    }
}

/// Resolves a dotted path inside a JSON document.
#[must_use]
pub fn lookup<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |node, segment| node.as_object()?.get(segment))
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => a
                .as_f64()
                .zip(b.as_f64())
                .and_then(|(a, b)| a.partial_cmp(&b))
                .unwrap_or(Ordering::Equal),
        },
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn edition_doc() -> Value {
        json!({
            "id": "abc",
            "next": {
                "edition": "2017",
                "state": "edition-confirmed",
                "links": {"dataset": {"id": "123"}}
            }
        })
    }

    #[test]
    fn test_lookup_walks_nested_objects() {
        let doc = edition_doc();
        assert_eq!(lookup(&doc, "next.links.dataset.id"), Some(&json!("123")));
        assert_eq!(lookup(&doc, "current.edition"), None);
        assert_eq!(lookup(&doc, "next.edition.deeper"), None);
    }

    #[test]
    fn test_empty_selector_matches_everything() {
        assert!(Selector::new().matches(&edition_doc()));
        assert!(Selector::new().matches(&json!({})));
    }

    #[test]
    fn test_conditions_are_conjunctive() {
        let doc = edition_doc();
        let hit = Selector::new()
            .eq("next.links.dataset.id", "123")
            .eq("next.edition", "2017");
        let miss = Selector::new()
            .eq("next.links.dataset.id", "123")
            .eq("next.edition", "2018");

        assert!(hit.matches(&doc));
        assert!(!miss.matches(&doc));
    }

    #[test]
    fn test_missing_field_never_matches() {
        let selector = Selector::new().eq("current.state", "published");
        assert!(!selector.matches(&edition_doc()));
    }

    #[test]
    fn test_any_of_matches_members_only() {
        let selector = Selector::new().any_of("next.state", ["associated", "edition-confirmed"]);
        assert!(selector.matches(&edition_doc()));

        let selector = Selector::new().any_of("next.state", ["published"]);
        assert!(!selector.matches(&edition_doc()));
    }

    #[test]
    fn test_equality_is_type_strict() {
        let doc = json!({"version": 1});
        assert!(Selector::new().eq("version", 1).matches(&doc));
        assert!(!Selector::new().eq("version", "1").matches(&doc));
    }

    #[test]
    fn test_without_drops_only_named_path() {
        let selector = Selector::new()
            .eq("edition", "2017")
            .any_of("state", ["published"])
            .without("state");
        assert_eq!(selector.to_filter(), json!({"edition": "2017"}));
    }

    #[test]
    fn test_sort_descending_orders_numbers() {
        let sort = Sort::descending("version");
        let mut docs = vec![json!({"version": 1}), json!({"version": 3}), json!({"version": 2})];
        docs.sort_by(|a, b| sort.compare(a, b));

        let order: Vec<_> = docs.iter().map(|d| d["version"].as_i64().unwrap()).collect();
        assert_eq!(order, vec![3, 2, 1]);
        assert_eq!(sort.to_document(), json!({"version": -1}));
    }
}
