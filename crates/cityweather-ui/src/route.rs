//! Application routes: `/` and `/weather/:cityName`.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// City browser
    Cities,
    /// Weather viewer; `None` is the bare `/weather` path
    Weather { city: Option<String> },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("No route matches '{0}'")]
    NotFound(String),
    #[error("City name in '{0}' is not valid UTF-8 percent-encoding")]
    BadEncoding(String),
}

impl Route {
    pub fn weather(city: &str) -> Self {
        Route::Weather {
            city: Some(city.to_string()),
        }
    }

    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let trimmed = path.trim();
        let without_query = trimmed.split(|c: char| c == '?' || c == '#').next().unwrap_or_default();

        if without_query.is_empty() || without_query == "/" {
            return Ok(Route::Cities);
        }

        let rest = without_query
            .strip_prefix("/weather")
            .ok_or_else(|| RouteError::NotFound(trimmed.to_string()))?;

        match rest.trim_end_matches('/') {
            "" => Ok(Route::Weather { city: None }),
            segment => {
                let encoded = segment
                    .strip_prefix('/')
                    .filter(|s| !s.contains('/'))
                    .ok_or_else(|| RouteError::NotFound(trimmed.to_string()))?;
                let city = urlencoding::decode(encoded)
                    .map_err(|_| RouteError::BadEncoding(trimmed.to_string()))?;
                Ok(Route::weather(&city))
            }
        }
    }

    /// Path form, with the city percent-encoded
    pub fn path(&self) -> String {
        match self {
            Route::Cities => "/".to_string(),
            Route::Weather { city: None } => "/weather".to_string(),
            Route::Weather { city: Some(city) } => {
                format!("/weather/{}", urlencoding::encode(city))
            }
        }
    }

    /// Short title for tab listings
    pub fn title(&self) -> String {
        match self {
            Route::Cities => "Cities".to_string(),
            Route::Weather { city: Some(city) } => format!("Weather: {city}"),
            Route::Weather { city: None } => "Weather".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_city_browser() {
        assert_eq!(Route::parse("/").unwrap(), Route::Cities);
        assert_eq!(Route::parse("").unwrap(), Route::Cities);
    }

    #[test]
    fn test_weather_route_carries_city() {
        assert_eq!(Route::parse("/weather/Paris").unwrap(), Route::weather("Paris"));
        assert_eq!(Route::parse("/weather").unwrap(), Route::Weather { city: None });
        assert_eq!(Route::parse("/weather/").unwrap(), Route::Weather { city: None });
    }

    #[test]
    fn test_path_encoding_round_trips_unusual_names() {
        for name in ["Saint-Étienne", "Shīnḏanḏ", "Washington, D.C.", "A/B"] {
            let route = Route::weather(name);
            assert_eq!(Route::parse(&route.path()).unwrap(), route, "{name}");
        }
    }

    #[test]
    fn test_unknown_paths_are_rejected() {
        assert!(matches!(Route::parse("/forecast"), Err(RouteError::NotFound(_))));
        assert!(matches!(Route::parse("/weather/a/b"), Err(RouteError::NotFound(_))));
        assert!(matches!(Route::parse("/weathering"), Err(RouteError::NotFound(_))));
    }

    #[test]
    fn test_query_string_is_ignored() {
        assert_eq!(Route::parse("/weather/Oslo?x=1").unwrap(), Route::weather("Oslo"));
    }
}
