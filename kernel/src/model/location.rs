use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};
use std::collections::BTreeSet;
use std::fmt;

/// Name of a branch location, as shown to guests.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct LocationId(String);

impl LocationId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Checks an admin-submitted location list and turns it into the canonical
/// set. All violations are collected before rejecting.
pub fn validate_locations(names: &[String]) -> AppResult<BTreeSet<LocationId>> {
    let mut violations = Vec::new();
    if names.is_empty() {
        violations.push("at least one location is required".to_string());
    }
    let mut accepted = BTreeSet::new();
    for name in names {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            violations.push("location names must not be blank".to_string());
            continue;
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        {
            violations.push(format!(
                "location name `{trimmed}` contains unsupported characters"
            ));
        }
        if !accepted.insert(LocationId::new(trimmed)) {
            violations.push(format!("location name `{trimmed}` is listed more than once"));
        }
    }
    if violations.is_empty() {
        Ok(accepted)
    } else {
        Err(AppError::ConfigurationInvalid(violations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn accepts_trimmed_unique_names() {
        let accepted =
            validate_locations(&names(&["Central", " north-2 ", "east_wing"])).unwrap();
        assert_eq!(accepted.len(), 3);
        assert!(accepted.contains(&LocationId::new("north-2")));
    }

    #[test]
    fn rejects_empty_list() {
        let err = validate_locations(&[]).unwrap_err();
        assert!(err.to_string().contains("at least one location"));
    }

    #[test]
    fn rejects_duplicates_and_bad_characters_together() {
        let err =
            validate_locations(&names(&["central", "central", "we/st"])).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("more than once"));
        assert!(message.contains("unsupported characters"));
    }

    #[test]
    fn rejects_blank_entries() {
        let err = validate_locations(&names(&["central", "  "])).unwrap_err();
        assert!(err.to_string().contains("must not be blank"));
    }
}
