use crate::error::PlannerError;
use crate::models::place::{CatalogSchema, Region};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const CAMPING_THEME: &str = "camping";
pub const LODGING_THEME: &str = "lodging";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Place themes arrive either as a comma separated string (web form) or a list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ThemeInput {
    List(Vec<String>),
    Csv(String),
}

impl Default for ThemeInput {
    fn default() -> Self {
        ThemeInput::Csv(String::new())
    }
}

impl ThemeInput {
    pub fn keywords(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            ThemeInput::List(items) => items.iter().map(String::as_str).collect(),
            ThemeInput::Csv(csv) => csv.split(',').collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// The raw request body, exactly as the trip form submits it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequestInput {
    pub start_loc: String,
    pub end_area: String,
    #[serde(default)]
    pub detail_addr: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub budget_per_person: serde_json::Value,
    pub total_people: serde_json::Value,
    #[serde(default)]
    pub place_themes: ThemeInput,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Validated trip parameters. Only constructed through `TryFrom<TripRequestInput>`.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRequest {
    origin: String,
    destination: String,
    district: Option<String>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    duration_days: u32,
    budget_per_person: u64,
    headcount: u64,
    theme_keywords: Vec<String>,
    accommodation_theme: &'static str,
    user_id: Option<String>,
}

impl TripRequest {
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn district(&self) -> Option<&str> {
        self.district.as_deref()
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn duration_days(&self) -> u32 {
        self.duration_days
    }

    pub fn budget_per_person(&self) -> u64 {
        self.budget_per_person
    }

    pub fn headcount(&self) -> u64 {
        self.headcount
    }

    pub fn total_budget(&self) -> u64 {
        self.budget_per_person.saturating_mul(self.headcount)
    }

    pub fn theme_keywords(&self) -> &[String] {
        &self.theme_keywords
    }

    pub fn accommodation_theme(&self) -> &'static str {
        self.accommodation_theme
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Region key for the given catalog layout. The nested layout needs a district.
    pub fn region(&self, schema: CatalogSchema) -> Result<Region, PlannerError> {
        match schema {
            CatalogSchema::Nested => {
                let district = self.district.clone().ok_or_else(|| {
                    PlannerError::InputValidation(
                        "detail_addr (district) is required for this catalog".to_string(),
                    )
                })?;
                Ok(Region::District {
                    city: self.destination.clone(),
                    district,
                })
            }
            CatalogSchema::Flat => Ok(Region::Area {
                code: self.destination.clone(),
            }),
        }
    }
}

impl TryFrom<TripRequestInput> for TripRequest {
    type Error = PlannerError;

    fn try_from(input: TripRequestInput) -> Result<Self, Self::Error> {
        let destination = required_text("end_area", &input.end_area)?;
        let start_date = parse_date("start_date", &input.start_date)?;
        let end_date = parse_date("end_date", &input.end_date)?;
        let duration_days = trip_duration_days(start_date, end_date)?;

        let budget_per_person = parse_positive_integer("budget_per_person", &input.budget_per_person)?;
        let headcount = parse_positive_integer("total_people", &input.total_people)?;

        let theme_keywords = input.place_themes.keywords();
        let accommodation_theme = accommodation_theme_for(&theme_keywords);

        Ok(Self {
            origin: input.start_loc.trim().to_string(),
            destination,
            district: input
                .detail_addr
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            start_date,
            end_date,
            duration_days,
            budget_per_person,
            headcount,
            theme_keywords,
            accommodation_theme,
            user_id: input.user_id,
        })
    }
}

/// Camping trips sleep at campsites, everything else at regular lodging.
pub fn accommodation_theme_for(theme_keywords: &[String]) -> &'static str {
    if theme_keywords.iter().any(|t| t == CAMPING_THEME) {
        CAMPING_THEME
    } else {
        LODGING_THEME
    }
}

/// Inclusive day count; a same-day trip lasts one day.
pub fn trip_duration_days(start: NaiveDate, end: NaiveDate) -> Result<u32, PlannerError> {
    if start > end {
        return Err(PlannerError::InputValidation(format!(
            "start date {} is after end date {}",
            start, end
        )));
    }
    let days = (end - start).num_days() + 1;
    u32::try_from(days)
        .map_err(|_| PlannerError::InputValidation(format!("trip of {} days is too long", days)))
}

fn required_text(field: &str, value: &str) -> Result<String, PlannerError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PlannerError::InputValidation(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, PlannerError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        PlannerError::InputValidation(format!(
            "{} '{}' is not a valid date (expected YYYY-MM-DD)",
            field, value
        ))
    })
}

fn parse_positive_integer(field: &str, value: &serde_json::Value) -> Result<u64, PlannerError> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n > 0 => Ok(n),
        _ => Err(PlannerError::InputValidation(format!(
            "{} must be a positive integer, got {}",
            field, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(start: &str, end: &str) -> TripRequestInput {
        serde_json::from_value(json!({
            "start_loc": "Busan",
            "end_area": "Seoul",
            "detail_addr": "Jongno",
            "start_date": start,
            "end_date": end,
            "budget_per_person": 150000,
            "total_people": "2",
            "place_themes": "cafe, history"
        }))
        .unwrap()
    }

    #[test]
    fn test_duration_days() {
        let one = TripRequest::try_from(input("2025-06-01", "2025-06-01")).unwrap();
        assert_eq!(one.duration_days(), 1);

        let three = TripRequest::try_from(input("2025-06-01", "2025-06-03")).unwrap();
        assert_eq!(three.duration_days(), 3);
    }

    #[test]
    fn test_start_after_end_rejected() {
        let err = TripRequest::try_from(input("2025-06-03", "2025-06-01")).unwrap_err();
        assert!(matches!(err, PlannerError::InputValidation(_)));
    }

    #[test]
    fn test_malformed_date_rejected() {
        let err = TripRequest::try_from(input("06/01/2025", "2025-06-03")).unwrap_err();
        assert!(err.to_string().contains("start_date"));
    }

    #[test]
    fn test_budget_and_headcount() {
        let trip = TripRequest::try_from(input("2025-06-01", "2025-06-02")).unwrap();
        assert_eq!(trip.budget_per_person(), 150000);
        assert_eq!(trip.headcount(), 2);
        assert_eq!(trip.total_budget(), 300000);

        let mut bad = input("2025-06-01", "2025-06-02");
        bad.total_people = json!("two");
        assert!(matches!(
            TripRequest::try_from(bad),
            Err(PlannerError::InputValidation(_))
        ));

        let mut zero = input("2025-06-01", "2025-06-02");
        zero.budget_per_person = json!(0);
        assert!(TripRequest::try_from(zero).is_err());
    }

    #[test]
    fn test_theme_keywords_parsed_from_csv_and_list() {
        assert_eq!(
            ThemeInput::Csv(" cafe, ,history ".to_string()).keywords(),
            vec!["cafe", "history"]
        );
        assert_eq!(
            ThemeInput::List(vec!["camping".to_string(), "".to_string()]).keywords(),
            vec!["camping"]
        );
        assert!(ThemeInput::default().keywords().is_empty());
    }

    #[test]
    fn test_accommodation_theme_derived() {
        let trip = TripRequest::try_from(input("2025-06-01", "2025-06-02")).unwrap();
        assert_eq!(trip.accommodation_theme(), LODGING_THEME);

        let mut camping = input("2025-06-01", "2025-06-02");
        camping.place_themes = ThemeInput::Csv("hiking, camping".to_string());
        let trip = TripRequest::try_from(camping).unwrap();
        assert_eq!(trip.accommodation_theme(), CAMPING_THEME);
    }

    #[test]
    fn test_region_per_schema() {
        let trip = TripRequest::try_from(input("2025-06-01", "2025-06-02")).unwrap();
        assert_eq!(
            trip.region(CatalogSchema::Nested).unwrap().to_string(),
            "Seoul/Jongno"
        );
        assert_eq!(
            trip.region(CatalogSchema::Flat).unwrap(),
            Region::Area { code: "Seoul".to_string() }
        );

        let mut no_district = input("2025-06-01", "2025-06-02");
        no_district.detail_addr = None;
        let trip = TripRequest::try_from(no_district).unwrap();
        assert!(trip.region(CatalogSchema::Nested).is_err());
    }
}
