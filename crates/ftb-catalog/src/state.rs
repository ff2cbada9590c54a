//! Version lifecycle states and read-time validation.
//!
//! The write path owns transitions. Readers only validate: every version
//! surfaced by a read must carry one of the six legal states, and a
//! published-only read must see exactly `published`. A version failing either
//! rule is corrupt or mid-transition and aborts the whole response.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{CatalogError, Result};
use crate::visibility::Visibility;

/// Lifecycle state of a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum VersionState {
    /// Initial state after the instance is created.
    Created,
    /// Submitted for processing.
    Submitted,
    /// Processing completed.
    Completed,
    /// Attached to a confirmed edition.
    EditionConfirmed,
    /// Associated with a publishing collection.
    Associated,
    /// Publicly visible. Terminal for readers.
    Published,
}

impl VersionState {
    /// Every legal state, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Created,
        Self::Submitted,
        Self::Completed,
        Self::EditionConfirmed,
        Self::Associated,
        Self::Published,
    ];

    /// States visible in a version listing when no state filter is given.
    pub const LISTABLE: [Self; 3] = [Self::EditionConfirmed, Self::Associated, Self::Published];

    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Submitted => "submitted",
            Self::Completed => "completed",
            Self::EditionConfirmed => "edition-confirmed",
            Self::Associated => "associated",
            Self::Published => "published",
        }
    }
}

impl fmt::Display for VersionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string that is not a version state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown version state: {0}")]
pub struct UnknownStateError(pub String);

impl FromStr for VersionState {
    type Err = UnknownStateError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| UnknownStateError(s.to_string()))
    }
}

/// Validates a stored state string against the lifecycle.
///
/// # Errors
///
/// Returns `CatalogError::InvalidState` for any value outside the closed set.
/// Matching is case-sensitive.
pub fn check_state(raw: &str) -> Result<VersionState> {
    raw.parse().map_err(|_| CatalogError::InvalidState {
        state: raw.to_string(),
        expected: None,
    })
}

/// Validates a stored state for a read at the given visibility.
///
/// # Errors
///
/// Returns `CatalogError::InvalidState` if the state is not legal, or if the
/// visibility is published-only and the state is anything but `published`.
pub fn check_visible(raw: &str, visibility: &Visibility) -> Result<VersionState> {
    let state = check_state(raw)?;
    if visibility.is_published_only() && state != VersionState::Published {
        return Err(CatalogError::InvalidState {
            state: raw.to_string(),
            expected: Some(VersionState::Published),
        });
    }
    Ok(state)
}

/// Validates every state in a page. One bad entry fails the whole page.
///
/// # Errors
///
/// Returns the first `CatalogError::InvalidState` encountered.
pub fn check_all<'a, I>(states: I, visibility: &Visibility) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    for raw in states {
        check_visible(raw, visibility)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_state_round_trips_through_its_string() {
        for state in VersionState::ALL {
            assert_eq!(state.as_str().parse::<VersionState>(), Ok(state));
        }
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&VersionState::EditionConfirmed).unwrap();
        assert_eq!(json, "\"edition-confirmed\"");
    }

    #[test]
    fn test_check_state_is_case_sensitive() {
        assert!(check_state("published").is_ok());
        assert!(matches!(
            check_state("Published"),
            Err(CatalogError::InvalidState { expected: None, .. })
        ));
        assert!(check_state("").is_err());
        assert!(check_state("gobbledygook").is_err());
    }

    #[test]
    fn test_published_only_requires_published() {
        let published = Visibility::published();
        assert_eq!(
            check_visible("published", &published).unwrap(),
            VersionState::Published
        );

        let err = check_visible("associated", &published).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidState {
                expected: Some(VersionState::Published),
                ..
            }
        ));
    }

    #[test]
    fn test_unrestricted_accepts_any_legal_state() {
        for state in VersionState::ALL {
            assert!(check_visible(state.as_str(), &Visibility::Unrestricted).is_ok());
        }
    }

    #[test]
    fn test_check_all_fails_closed() {
        let states = ["published", "associated", "bogus", "published"];
        let err = check_all(states, &Visibility::Unrestricted).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidState { ref state, .. } if state == "bogus"));

        assert!(check_all(["published", "edition-confirmed"], &Visibility::Unrestricted).is_ok());
        assert!(check_all(std::iter::empty(), &Visibility::published()).is_ok());
    }
}
