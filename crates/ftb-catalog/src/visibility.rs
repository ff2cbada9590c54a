//! Visibility and the query predicates derived from it.
//!
//! Every edition and version lookup builds its predicate here. Datasets and
//! editions share one shape: unrestricted reads match on the `next` variant by
//! id alone, narrowed reads match on the `current` variant plus
//! `current.state`. Versions have no variants, so they match the flat document
//! and add `state` when narrowed.

use ftb_core::Selector;

use crate::state::{UnknownStateError, VersionState};

/// The exposure level a read runs at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Draft-capable: `next` variants and every listable version state.
    #[default]
    Unrestricted,
    /// Only resources published in the given state.
    State(VersionState),
}

impl Visibility {
    /// Published-only visibility, used for every public read.
    #[must_use]
    pub const fn published() -> Self {
        Self::State(VersionState::Published)
    }

    /// Parses an optional `state` query value. Absent means unrestricted.
    ///
    /// # Errors
    ///
    /// Returns `UnknownStateError` if the value is not a version state.
    pub fn from_query(state: Option<&str>) -> Result<Self, UnknownStateError> {
        match state {
            None | Some("") => Ok(Self::Unrestricted),
            Some(raw) => raw.parse().map(Self::State),
        }
    }

    /// Returns the narrowed state, if any.
    #[must_use]
    pub const fn state(&self) -> Option<VersionState> {
        match self {
            Self::Unrestricted => None,
            Self::State(state) => Some(*state),
        }
    }

    /// Returns true when only `published` resources may be seen.
    #[must_use]
    pub fn is_published_only(&self) -> bool {
        *self == Self::published()
    }

    /// Field prefix of the variant this visibility reads.
    const fn variant(&self) -> &'static str {
        match self {
            Self::Unrestricted => "next",
            Self::State(_) => "current",
        }
    }

    /// Adds the variant state condition when narrowed.
    fn scope_variant(&self, selector: Selector) -> Selector {
        match self {
            Self::Unrestricted => selector,
            Self::State(state) => selector.eq("current.state", state.as_str()),
        }
    }

    /// Predicate for one dataset.
    #[must_use]
    pub fn dataset(&self, dataset_id: &str) -> Selector {
        self.scope_variant(Selector::new().eq("_id", dataset_id))
    }

    /// Predicate for the dataset listing.
    #[must_use]
    pub fn datasets(&self) -> Selector {
        self.scope_variant(Selector::new())
    }

    /// Predicate for the editions of a dataset.
    #[must_use]
    pub fn editions(&self, dataset_id: &str) -> Selector {
        let prefix = self.variant();
        self.scope_variant(Selector::new().eq(format!("{prefix}.links.dataset.id"), dataset_id))
    }

    /// Predicate for one edition of a dataset.
    #[must_use]
    pub fn edition(&self, dataset_id: &str, edition: &str) -> Selector {
        let prefix = self.variant();
        self.scope_variant(
            Selector::new()
                .eq(format!("{prefix}.links.dataset.id"), dataset_id)
                .eq(format!("{prefix}.edition"), edition),
        )
    }

    /// Predicate for the versions of an edition.
    ///
    /// Unrestricted listings see the listable states only, so versions still
    /// being created, submitted or completed never appear.
    #[must_use]
    pub fn versions(&self, dataset_id: &str, edition: &str) -> Selector {
        let selector = version_scope(dataset_id, edition);
        match self {
            Self::Unrestricted => selector.any_of(
                "state",
                VersionState::LISTABLE.iter().map(|s| s.as_str()),
            ),
            Self::State(state) => selector.eq("state", state.as_str()),
        }
    }

    /// Predicate for one version.
    ///
    /// Only a published-only read adds the state condition; other reads fetch
    /// the version and leave its state to validation.
    #[must_use]
    pub fn version(&self, dataset_id: &str, edition: &str, version: u32) -> Selector {
        let selector = version_scope(dataset_id, edition).eq("version", version);
        if self.is_published_only() {
            selector.eq("state", VersionState::Published.as_str())
        } else {
            selector
        }
    }
}

/// Predicate for every version of an edition regardless of state.
#[must_use]
pub fn version_scope(dataset_id: &str, edition: &str) -> Selector {
    Selector::new()
        .eq("links.dataset.id", dataset_id)
        .eq("edition", edition)
}

/// Predicate for the options of one dimension of a version.
#[must_use]
pub fn dimension_options(instance_id: &str, dimension: &str) -> Selector {
    Selector::new()
        .eq("instance_id", instance_id)
        .eq("name", dimension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_query() {
        assert_eq!(Visibility::from_query(None), Ok(Visibility::Unrestricted));
        assert_eq!(Visibility::from_query(Some("")), Ok(Visibility::Unrestricted));
        assert_eq!(
            Visibility::from_query(Some("published")),
            Ok(Visibility::published())
        );
        assert!(Visibility::from_query(Some("live")).is_err());
    }

    #[test]
    fn test_dataset_predicates() {
        assert_eq!(
            Visibility::Unrestricted.dataset("123").to_filter(),
            json!({"_id": "123"})
        );
        assert_eq!(
            Visibility::published().dataset("123").to_filter(),
            json!({"_id": "123", "current.state": "published"})
        );
    }

    #[test]
    fn test_edition_predicates_switch_variant() {
        assert_eq!(
            Visibility::Unrestricted.edition("123", "2017").to_filter(),
            json!({"next.links.dataset.id": "123", "next.edition": "2017"})
        );
        assert_eq!(
            Visibility::published().edition("123", "2017").to_filter(),
            json!({
                "current.links.dataset.id": "123",
                "current.edition": "2017",
                "current.state": "published"
            })
        );
        assert_eq!(
            Visibility::published().editions("123").to_filter(),
            json!({"current.links.dataset.id": "123", "current.state": "published"})
        );
    }

    #[test]
    fn test_versions_default_to_listable_states() {
        assert_eq!(
            Visibility::Unrestricted.versions("123", "2017").to_filter(),
            json!({
                "links.dataset.id": "123",
                "edition": "2017",
                "state": {"$in": ["edition-confirmed", "associated", "published"]}
            })
        );
        assert_eq!(
            Visibility::State(VersionState::Associated)
                .versions("123", "2017")
                .to_filter(),
            json!({"links.dataset.id": "123", "edition": "2017", "state": "associated"})
        );
    }

    #[test]
    fn test_version_adds_state_only_when_published_only() {
        assert_eq!(
            Visibility::Unrestricted.version("123", "2017", 1).to_filter(),
            json!({"links.dataset.id": "123", "edition": "2017", "version": 1})
        );
        assert_eq!(
            Visibility::published().version("123", "2017", 1).to_filter(),
            json!({"links.dataset.id": "123", "edition": "2017", "version": 1, "state": "published"})
        );
        assert_eq!(
            Visibility::State(VersionState::Associated)
                .version("123", "2017", 1)
                .to_filter(),
            json!({"links.dataset.id": "123", "edition": "2017", "version": 1})
        );
    }
}
