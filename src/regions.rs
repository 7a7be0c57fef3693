//! State and district reference data
//!
//! The catalog is loaded once per session and never mutated afterwards. When
//! loading fails the wizard keeps working with [`RegionData::Unavailable`], in
//! which case state/district are only checked for presence.

use crate::error::ReferenceDataError;
use std::collections::BTreeMap;
use std::path::Path;

/// Reference data shipped with the binary
const BUNDLED_REGIONS: &str = include_str!("../data/regions.json");

/// Sorted mapping of state name to its sorted districts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionCatalog {
    regions: BTreeMap<String, Vec<String>>,
}

impl RegionCatalog {
    /// Parse a `{ "State": ["District", ...] }` document
    pub fn from_json(content: &str) -> Result<Self, ReferenceDataError> {
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(content)?;
        if raw.is_empty() {
            return Err(ReferenceDataError::Empty);
        }

        let regions = raw
            .into_iter()
            .map(|(state, mut districts)| {
                districts.sort();
                districts.dedup();
                (state, districts)
            })
            .collect();
        Ok(Self { regions })
    }

    /// The catalog bundled with the binary
    pub fn bundled() -> Result<Self, ReferenceDataError> {
        Self::from_json(BUNDLED_REGIONS)
    }

    /// Load from a file, or the bundled catalog when no path is configured
    pub async fn load(path: Option<&Path>) -> Result<Self, ReferenceDataError> {
        let catalog = match path {
            Some(path) => {
                let content = tokio::fs::read_to_string(path).await?;
                Self::from_json(&content)?
            }
            None => Self::bundled()?,
        };
        tracing::info!("Loaded reference data for {} states", catalog.regions.len());
        Ok(catalog)
    }

    /// State names in sorted order
    pub fn states(&self) -> Vec<&str> {
        self.regions.keys().map(String::as_str).collect()
    }

    /// Districts of a state in sorted order; empty for an unknown state
    pub fn districts_of(&self, state: &str) -> &[String] {
        self.regions.get(state).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_state(&self, state: &str) -> bool {
        self.regions.contains_key(state)
    }

    pub fn contains_district(&self, state: &str, district: &str) -> bool {
        self.districts_of(state).iter().any(|d| d == district)
    }
}

/// Reference data as seen by the wizard for the rest of the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionData {
    Loaded(RegionCatalog),
    /// Loading failed; the message is what the user was shown
    Unavailable(String),
}

impl Default for RegionData {
    fn default() -> Self {
        RegionData::Unavailable("States data not loaded".to_string())
    }
}

impl RegionData {
    /// Resolve the catalog, degrading to `Unavailable` on failure.
    /// The error is returned alongside so the caller can surface it.
    pub async fn resolve(path: Option<&Path>) -> (Self, Option<ReferenceDataError>) {
        match RegionCatalog::load(path).await {
            Ok(catalog) => (RegionData::Loaded(catalog), None),
            Err(e) => {
                tracing::warn!("{e}");
                (RegionData::Unavailable(e.to_string()), Some(e))
            }
        }
    }

    pub fn catalog(&self) -> Option<&RegionCatalog> {
        match self {
            RegionData::Loaded(catalog) => Some(catalog),
            RegionData::Unavailable(_) => None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.catalog().is_some()
    }

    pub fn states(&self) -> Vec<&str> {
        self.catalog().map(RegionCatalog::states).unwrap_or_default()
    }

    pub fn districts_of(&self, state: &str) -> &[String] {
        self.catalog()
            .map(|c| c.districts_of(state))
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"{
        "Punjab": ["Patiala", "Amritsar", "Ludhiana", "Amritsar"],
        "Haryana": ["Karnal", "Ambala"]
    }"#;

    #[test]
    fn test_states_are_sorted() {
        let catalog = RegionCatalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.states(), vec!["Haryana", "Punjab"]);
    }

    #[test]
    fn test_districts_sorted_and_deduplicated() {
        let catalog = RegionCatalog::from_json(SAMPLE).unwrap();
        assert_eq!(
            catalog.districts_of("Punjab"),
            &["Amritsar".to_string(), "Ludhiana".to_string(), "Patiala".to_string()]
        );
        assert!(catalog.districts_of("Goa").is_empty());
    }

    #[test]
    fn test_membership() {
        let catalog = RegionCatalog::from_json(SAMPLE).unwrap();
        assert!(catalog.contains_state("Haryana"));
        assert!(catalog.contains_district("Haryana", "Karnal"));
        assert!(!catalog.contains_district("Punjab", "Karnal"));
    }

    #[test]
    fn test_empty_catalog_is_an_error() {
        assert!(matches!(
            RegionCatalog::from_json("{}"),
            Err(ReferenceDataError::Empty)
        ));
    }

    #[test]
    fn test_bundled_catalog_parses() {
        let catalog = RegionCatalog::bundled().unwrap();
        assert!(catalog.contains_district("Punjab", "Ludhiana"));
    }

    #[tokio::test]
    async fn test_resolve_missing_file_degrades() {
        let (data, err) = RegionData::resolve(Some(Path::new("/nonexistent/regions.json"))).await;
        assert!(!data.is_available());
        assert!(data.states().is_empty());
        assert!(matches!(err, Some(ReferenceDataError::Io(_))));
    }

    #[tokio::test]
    async fn test_resolve_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regions.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let (data, err) = RegionData::resolve(Some(&path)).await;
        assert!(err.is_none());
        assert_eq!(data.districts_of("Haryana").len(), 2);
    }
}
