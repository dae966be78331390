use crate::error::{CandidateKind, PlannerError};
use crate::models::place::{CatalogSchema, Place, Region};
use crate::services::catalog_service::Catalog;
use log::info;
use std::fmt;

/// Printable stand-in for a missing coordinate.
pub const UNKNOWN_SENTINEL: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Places must match a theme keyword and are never accommodations.
    ThemeAware,
    /// Every place in the area is a candidate; accommodations are a subset of places.
    AreaOnly,
}

impl From<CatalogSchema> for FilterMode {
    fn from(schema: CatalogSchema) -> Self {
        match schema {
            CatalogSchema::Nested => FilterMode::ThemeAware,
            CatalogSchema::Flat => FilterMode::AreaOnly,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Candidate {
    /// `"lat, lon"`, with `unknown` for a missing half.
    pub fn coords(&self) -> String {
        format!(
            "{}, {}",
            format_coordinate(self.latitude),
            format_coordinate(self.longitude)
        )
    }
}

impl From<&Place> for Candidate {
    fn from(place: &Place) -> Self {
        Self {
            name: place.name.clone(),
            latitude: place.latitude,
            longitude: place.longitude,
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "name: {}, coords: {}", self.name, self.coords())
    }
}

fn format_coordinate(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => v.to_string(),
        _ => UNKNOWN_SENTINEL.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CandidateSet {
    pub places: Vec<Candidate>,
    pub accommodations: Vec<Candidate>,
}

impl CandidateSet {
    pub fn contains_place(&self, name: &str) -> bool {
        let name = name.trim();
        self.places.iter().any(|c| c.name == name)
    }

    pub fn contains_accommodation(&self, name: &str) -> bool {
        let name = name.trim();
        self.accommodations.iter().any(|c| c.name == name)
    }

    /// A plan needs at least one place and one accommodation to satisfy the schema.
    pub fn ensure_non_empty(&self, region: &Region, accommodation_theme: &str) -> Result<(), PlannerError> {
        if self.accommodations.is_empty() {
            return Err(PlannerError::EmptyCandidates {
                kind: CandidateKind::Accommodation,
                region: region.to_string(),
                theme: accommodation_theme.to_string(),
            });
        }
        if self.places.is_empty() {
            return Err(PlannerError::EmptyCandidates {
                kind: CandidateKind::Place,
                region: region.to_string(),
                theme: accommodation_theme.to_string(),
            });
        }
        Ok(())
    }
}

/// Splits the region's catalog entries into place and accommodation candidates.
///
/// An entry is an accommodation iff its tag set contains `accommodation_theme`.
/// In [`FilterMode::ThemeAware`] a place must carry one of `theme_keywords`
/// (any entry qualifies when the list is empty) and must not be an accommodation.
/// In [`FilterMode::AreaOnly`] keywords are ignored and the two lists may overlap.
pub fn filter_candidates(
    catalog: &Catalog,
    region: &Region,
    theme_keywords: &[String],
    accommodation_theme: &str,
    mode: FilterMode,
) -> Result<CandidateSet, PlannerError> {
    let in_region: Vec<&Place> = catalog.in_region(region).collect();
    if in_region.is_empty() {
        return Err(PlannerError::RegionNotFound(region.to_string()));
    }

    let is_accommodation = |place: &Place| place.has_tag(accommodation_theme);

    let places: Vec<&Place> = match mode {
        FilterMode::ThemeAware => in_region
            .iter()
            .copied()
            .filter(|place| theme_keywords.is_empty() || place.has_any_tag(theme_keywords))
            .filter(|place| !is_accommodation(*place))
            .collect(),
        FilterMode::AreaOnly => in_region.clone(),
    };

    let accommodations: Vec<&Place> = match mode {
        FilterMode::ThemeAware => in_region.iter().copied().filter(|p| is_accommodation(*p)).collect(),
        FilterMode::AreaOnly => places.iter().copied().filter(|p| is_accommodation(*p)).collect(),
    };

    info!(
        "Region {}: {} entries, {} place candidates, {} {} candidates",
        region,
        in_region.len(),
        places.len(),
        accommodations.len(),
        accommodation_theme
    );

    Ok(CandidateSet {
        places: places.into_iter().map(Candidate::from).collect(),
        accommodations: accommodations.into_iter().map(Candidate::from).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jongno() -> Region {
        Region::District {
            city: "Seoul".to_string(),
            district: "Jongno".to_string(),
        }
    }

    fn place(name: &str, category: &str, region: Region, coords: Option<(f64, f64)>) -> Place {
        Place::new(
            name,
            Some(category.to_string()),
            region,
            coords.map(|c| c.0),
            coords.map(|c| c.1),
        )
    }

    fn catalog() -> Catalog {
        Catalog::new(
            CatalogSchema::Nested,
            vec![
                place("A", "cafe", jongno(), Some((37.5, 127.0))),
                place("B", "lodging", jongno(), Some((37.6, 127.1))),
                place("C", "history, museum", jongno(), None),
                place("D", "cafe, lodging", jongno(), Some((37.55, 126.99))),
                place(
                    "E",
                    "cafe",
                    Region::District {
                        city: "Seoul".to_string(),
                        district: "Mapo".to_string(),
                    },
                    Some((37.55, 126.9)),
                ),
            ],
        )
    }

    fn names(list: &[Candidate]) -> Vec<&str> {
        list.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_two_entry_scenario() {
        let catalog = Catalog::new(
            CatalogSchema::Nested,
            vec![
                place("A", "cafe", jongno(), Some((37.5, 127.0))),
                place("B", "lodging", jongno(), Some((37.6, 127.1))),
            ],
        );

        let set = filter_candidates(&catalog, &jongno(), &[], "lodging", FilterMode::ThemeAware).unwrap();
        assert_eq!(names(&set.places), vec!["A"]);
        assert_eq!(names(&set.accommodations), vec!["B"]);
    }

    #[test]
    fn test_region_not_found() {
        let region = Region::District {
            city: "Busan".to_string(),
            district: "Haeundae".to_string(),
        };
        let err = filter_candidates(&catalog(), &region, &[], "lodging", FilterMode::ThemeAware).unwrap_err();
        assert!(matches!(err, PlannerError::RegionNotFound(r) if r == "Busan/Haeundae"));
    }

    #[test]
    fn test_theme_aware_lists_are_disjoint() {
        let keywords = vec!["cafe".to_string()];
        let set = filter_candidates(&catalog(), &jongno(), &keywords, "lodging", FilterMode::ThemeAware).unwrap();

        assert_eq!(names(&set.places), vec!["A"]);
        assert_eq!(names(&set.accommodations), vec!["B", "D"]);
        for place in &set.places {
            assert!(!set.contains_accommodation(&place.name));
        }
    }

    #[test]
    fn test_theme_keywords_match_any() {
        let keywords = vec!["museum".to_string(), "cafe".to_string()];
        let set = filter_candidates(&catalog(), &jongno(), &keywords, "lodging", FilterMode::ThemeAware).unwrap();
        assert_eq!(names(&set.places), vec!["A", "C"]);
    }

    #[test]
    fn test_multi_word_theme_keyword() {
        let catalog = Catalog::new(
            CatalogSchema::Nested,
            vec![
                place("Lotte World", "theme park", jongno(), Some((37.51, 127.1))),
                place("Olympic Park", "park", jongno(), Some((37.52, 127.12))),
                place("B", "lodging", jongno(), Some((37.6, 127.1))),
            ],
        );
        let keywords = vec!["theme park".to_string()];
        let set = filter_candidates(&catalog, &jongno(), &keywords, "lodging", FilterMode::ThemeAware).unwrap();
        assert_eq!(names(&set.places), vec!["Lotte World"]);
    }

    #[test]
    fn test_padded_title_matches_verbatim_copy() {
        let catalog = Catalog::new(
            CatalogSchema::Nested,
            vec![
                place("Cafe ", "cafe", jongno(), Some((37.5, 127.0))),
                place(" Hanok Stay", "lodging", jongno(), Some((37.6, 127.1))),
            ],
        );
        let set = filter_candidates(&catalog, &jongno(), &[], "lodging", FilterMode::ThemeAware).unwrap();
        assert_eq!(set.places[0].to_string(), "name: Cafe, coords: 37.5, 127");
        assert!(set.contains_place("Cafe "));
        assert!(set.contains_place("Cafe"));
        assert!(set.contains_accommodation(" Hanok Stay"));
    }

    #[test]
    fn test_area_only_allows_overlap() {
        let area = Region::Area { code: "6".to_string() };
        let catalog = Catalog::new(
            CatalogSchema::Flat,
            vec![
                place("Beach", "beach", area.clone(), Some((35.15, 129.16))),
                place("Hotel", "lodging", area.clone(), Some((35.16, 129.17))),
            ],
        );

        let keywords = vec!["beach".to_string()];
        let set = filter_candidates(&catalog, &area, &keywords, "lodging", FilterMode::AreaOnly).unwrap();
        assert_eq!(names(&set.places), vec!["Beach", "Hotel"]);
        assert_eq!(names(&set.accommodations), vec!["Hotel"]);
    }

    #[test]
    fn test_missing_coordinates_render_unknown() {
        let keywords = vec!["museum".to_string()];
        let set = filter_candidates(&catalog(), &jongno(), &keywords, "lodging", FilterMode::ThemeAware).unwrap();
        let rendered = set.places[0].to_string();
        assert_eq!(rendered, "name: C, coords: unknown, unknown");
        assert!(!rendered.contains("null"));
    }

    #[test]
    fn test_coordinates_render_in_lat_lon_order() {
        let candidate = Candidate {
            name: "A".to_string(),
            latitude: Some(37.5),
            longitude: Some(127.25),
        };
        assert_eq!(candidate.to_string(), "name: A, coords: 37.5, 127.25");

        let half = Candidate {
            name: "B".to_string(),
            latitude: Some(37.5),
            longitude: Some(f64::NAN),
        };
        assert_eq!(half.coords(), "37.5, unknown");
    }

    #[test]
    fn test_filter_is_idempotent() {
        let catalog = catalog();
        let keywords = vec!["cafe".to_string()];
        let first = filter_candidates(&catalog, &jongno(), &keywords, "lodging", FilterMode::ThemeAware).unwrap();
        let second = filter_candidates(&catalog, &jongno(), &keywords, "lodging", FilterMode::ThemeAware).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_ensure_non_empty() {
        let keywords = vec!["cafe".to_string()];
        let set = filter_candidates(&catalog(), &jongno(), &keywords, "camping", FilterMode::ThemeAware).unwrap();
        assert!(set.accommodations.is_empty());

        let err = set.ensure_non_empty(&jongno(), "camping").unwrap_err();
        assert!(matches!(
            err,
            PlannerError::EmptyCandidates {
                kind: CandidateKind::Accommodation,
                ..
            }
        ));

        let no_places = CandidateSet {
            places: vec![],
            accommodations: vec![Candidate {
                name: "B".to_string(),
                latitude: None,
                longitude: None,
            }],
        };
        assert!(matches!(
            no_places.ensure_non_empty(&jongno(), "lodging"),
            Err(PlannerError::EmptyCandidates {
                kind: CandidateKind::Place,
                ..
            })
        ));
    }

    #[test]
    fn test_filter_mode_follows_schema() {
        assert_eq!(FilterMode::from(CatalogSchema::Nested), FilterMode::ThemeAware);
        assert_eq!(FilterMode::from(CatalogSchema::Flat), FilterMode::AreaOnly);
    }
}
