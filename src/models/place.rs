use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

const TAG_SEPARATORS: [char; 5] = [',', '/', '>', '|', ';'];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Region {
    District { city: String, district: String },
    Area { code: String },
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::District { city, district } => write!(f, "{}/{}", city, district),
            Region::Area { code } => write!(f, "{}", code),
        }
    }
}

/// Which document layout the catalog collection uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSchema {
    /// `address.city` / `address.district` with a GeoJSON `coordinates` point.
    #[default]
    Nested,
    /// Flat `area` code with `x` (longitude) and `y` (latitude) columns.
    Flat,
}

impl FromStr for CatalogSchema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nested" => Ok(CatalogSchema::Nested),
            "flat" => Ok(CatalogSchema::Flat),
            other => Err(format!("unknown catalog schema '{}'", other)),
        }
    }
}

/// One point of interest from the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    pub category: Option<String>,
    pub tags: BTreeSet<String>,
    pub region: Region,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Place {
    pub fn new(
        name: impl Into<String>,
        category: Option<String>,
        region: Region,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Self {
        let tags = category.as_deref().map(tokenize_tags).unwrap_or_default();
        let name: String = name.into();
        Self {
            name: name.trim().to_string(),
            category,
            tags,
            region,
            latitude,
            longitude,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag.trim())
    }

    /// True when every token of the keyword is one of this place's tags,
    /// so `"theme park"` matches a category of `"amusement > theme park"`.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let tokens = tokenize_tags(keyword);
        !tokens.is_empty() && tokens.is_subset(&self.tags)
    }

    pub fn has_any_tag(&self, keywords: &[String]) -> bool {
        keywords.iter().any(|keyword| self.matches_keyword(keyword))
    }
}

/// Splits a free-text category such as `"tourism > cafe, dessert"` into its tags.
pub fn tokenize_tags(category: &str) -> BTreeSet<String> {
    category
        .split(|c: char| c.is_whitespace() || TAG_SEPARATORS.contains(&c))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

// Spreadsheet imports leave coordinates as either numbers or numeric strings
fn deserialize_optional_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        Some(serde_json::Value::Number(n)) => Ok(n.as_f64().filter(|f| f.is_finite())),
        Some(serde_json::Value::String(s)) => Ok(s.trim().parse::<f64>().ok().filter(|f| f.is_finite())),
        _ => Ok(None),
    }
}

fn deserialize_optional_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        Some(serde_json::Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        _ => Ok(None),
    }
}

#[derive(Debug, Deserialize)]
pub struct NestedAddress {
    pub city: Option<String>,
    pub district: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeoPoint {
    /// GeoJSON order: `[longitude, latitude]`.
    #[serde(default)]
    pub coordinates: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct NestedPlaceRecord {
    pub title: Option<String>,
    pub category: Option<String>,
    pub address: Option<NestedAddress>,
    pub coordinates: Option<GeoPoint>,
}

impl NestedPlaceRecord {
    /// Returns `None` for records without a title or city.
    pub fn into_place(self) -> Option<Place> {
        let name = self.title.filter(|t| !t.trim().is_empty())?;
        let address = self.address?;
        let city = address.city?;
        let district = address.district.unwrap_or_default();

        let point = self.coordinates.map(|c| c.coordinates).unwrap_or_default();
        let coordinate = |idx: usize| point.get(idx).and_then(serde_json::Value::as_f64);

        Some(Place::new(
            name,
            self.category,
            Region::District { city, district },
            coordinate(1),
            coordinate(0),
        ))
    }
}

#[derive(Debug, Deserialize)]
pub struct FlatPlaceRecord {
    pub title: Option<String>,
    pub cat: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_code")]
    pub area: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_coordinate")]
    pub x: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_coordinate")]
    pub y: Option<f64>,
}

impl FlatPlaceRecord {
    /// Returns `None` for records without a title or area code.
    pub fn into_place(self) -> Option<Place> {
        let name = self.title.filter(|t| !t.trim().is_empty())?;
        let code = self.area.filter(|a| !a.is_empty())?;
        Some(Place::new(name, self.cat, Region::Area { code }, self.y, self.x))
    }
}
