use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// One city as returned by the catalog. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityRecord {
    #[serde(rename = "geoname_id", deserialize_with = "text_or_number")]
    pub id: String,
    pub name: String,
    #[serde(rename = "cou_name_en", default, deserialize_with = "text_or_null")]
    pub country_name: String,
    #[serde(default, deserialize_with = "text_or_null")]
    pub timezone: String,
}

/// Body of `GET /records`
#[derive(Debug, Deserialize)]
pub(crate) struct RecordsResponse {
    pub results: Vec<CityRecord>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Number(u64),
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Text(s) => s,
        IdRepr::Number(n) => n.to_string(),
    })
}

fn text_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Column of the city table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Name,
    Country,
    Timezone,
}

impl SortField {
    pub const ALL: [SortField; 3] = [SortField::Name, SortField::Country, SortField::Timezone];

    /// The field value used for comparisons
    pub fn value<'a>(&self, city: &'a CityRecord) -> &'a str {
        match self {
            Self::Name => &city.name,
            Self::Country => &city.country_name,
            Self::Timezone => &city.timezone,
        }
    }

    /// Column header text
    pub fn title(&self) -> &'static str {
        match self {
            Self::Name => "City Name",
            Self::Country => "Country",
            Self::Timezone => "Timezone",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Country => "country",
            Self::Timezone => "timezone",
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "country" | "cou_name_en" => Ok(Self::Country),
            "timezone" => Ok(Self::Timezone),
            other => Err(format!("unknown column '{other}' (expected name, country or timezone)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn key(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Ascending),
            "desc" => Ok(Self::Descending),
            other => Err(format!("unknown direction '{other}' (expected asc or desc)")),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Whole-list ordering chosen from the filter menu, e.g. `asc_name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterOption {
    pub field: SortField,
    pub direction: SortDirection,
}

impl FilterOption {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Menu label, as shown in the filter drop-down
    pub fn label(&self) -> &'static str {
        match (self.direction, self.field) {
            (SortDirection::Ascending, SortField::Name) => "Ascending order by city name",
            (SortDirection::Ascending, SortField::Country) => "Ascending order by Country",
            (SortDirection::Ascending, SortField::Timezone) => "Ascending order by Timezone",
            (SortDirection::Descending, SortField::Name) => "Descending by city name",
            (SortDirection::Descending, SortField::Country) => "Descending by Country",
            (SortDirection::Descending, SortField::Timezone) => "Descending by Timezone",
        }
    }

    /// Every selectable option in menu order
    pub fn all() -> Vec<FilterOption> {
        [SortDirection::Ascending, SortDirection::Descending]
            .into_iter()
            .flat_map(|d| SortField::ALL.into_iter().map(move |f| FilterOption::new(f, d)))
            .collect()
    }
}

impl FromStr for FilterOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (direction, field) = s
            .trim()
            .split_once('_')
            .ok_or_else(|| format!("unknown filter '{s}' (expected e.g. asc_name)"))?;
        Ok(Self {
            field: field.parse()?,
            direction: direction.parse()?,
        })
    }
}

impl fmt::Display for FilterOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.direction.key(), self.field.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_catalog_json() {
        let json = r#"{
            "geoname_id": "2988507",
            "name": "Paris",
            "ascii_name": "Paris",
            "cou_name_en": "France",
            "timezone": "Europe/Paris",
            "population": 2138551
        }"#;
        let city: CityRecord = serde_json::from_str(json).unwrap();
        assert_eq!(city.id, "2988507");
        assert_eq!(city.name, "Paris");
        assert_eq!(city.country_name, "France");
        assert_eq!(city.timezone, "Europe/Paris");
    }

    #[test]
    fn test_numeric_id_and_null_country() {
        let json = r#"{"geoname_id": 42, "name": "Nowhere", "cou_name_en": null, "timezone": "UTC"}"#;
        let city: CityRecord = serde_json::from_str(json).unwrap();
        assert_eq!(city.id, "42");
        assert_eq!(city.country_name, "");
    }

    #[test]
    fn test_missing_name_is_an_error() {
        let json = r#"{"geoname_id": "1", "cou_name_en": "France", "timezone": "UTC"}"#;
        assert!(serde_json::from_str::<CityRecord>(json).is_err());
    }

    #[test]
    fn test_filter_option_parse_and_display() {
        let option: FilterOption = "desc_timezone".parse().unwrap();
        assert_eq!(option, FilterOption::new(SortField::Timezone, SortDirection::Descending));
        assert_eq!(option.to_string(), "desc_timezone");
        assert!("sideways_name".parse::<FilterOption>().is_err());
        assert!("asc_population".parse::<FilterOption>().is_err());
        assert!("name".parse::<FilterOption>().is_err());
    }

    #[test]
    fn test_all_filter_options_in_menu_order() {
        let labels: Vec<String> = FilterOption::all().iter().map(|o| o.to_string()).collect();
        assert_eq!(
            labels,
            ["asc_name", "asc_country", "asc_timezone", "desc_name", "desc_country", "desc_timezone"]
        );
    }

    #[test]
    fn test_sort_field_accepts_api_column_name() {
        assert_eq!("cou_name_en".parse::<SortField>().unwrap(), SortField::Country);
        assert_eq!(" Name ".parse::<SortField>().unwrap(), SortField::Name);
    }
}
