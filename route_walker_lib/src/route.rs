use serde::{Deserialize, Serialize};

use crate::{coordinate::Coordinate, error::RouteError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub title: String,
    pub description: String,
}

/// A named point-to-point walk with its panoramic video.
///
/// Construction and deserialization both reject a non-positive `max_distance_km`,
/// so progress can always be computed by dividing by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRoute")]
pub struct RouteDescriptor {
    key: String,
    name: String,
    media_source: String,
    start: Coordinate,
    end: Coordinate,
    max_distance_km: f64,
    achievement: Option<Achievement>,
}

#[derive(Deserialize)]
struct RawRoute {
    #[serde(default)]
    key: String,
    name: String,
    media_source: String,
    start: Coordinate,
    end: Coordinate,
    max_distance_km: f64,
    #[serde(default)]
    achievement: Option<Achievement>,
}

impl TryFrom<RawRoute> for RouteDescriptor {
    type Error = RouteError;

    fn try_from(raw: RawRoute) -> Result<Self, Self::Error> {
        RouteDescriptor::new(raw.key, raw.name, raw.media_source, raw.start, raw.end, raw.max_distance_km, raw.achievement)
    }
}

impl RouteDescriptor {
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        media_source: impl Into<String>,
        start: Coordinate,
        end: Coordinate,
        max_distance_km: f64,
        achievement: Option<Achievement>,
    ) -> Result<Self, RouteError> {
        let key = key.into();
        let media_source = media_source.into();

        if !max_distance_km.is_finite() || max_distance_km <= 0.0 {
            return Err(RouteError::InvalidMaxDistance { key, value: max_distance_km });
        }
        if !start.is_finite() || !end.is_finite() {
            return Err(RouteError::InvalidCoordinate { key });
        }
        if media_source.trim().is_empty() {
            return Err(RouteError::MissingMedia { key });
        }

        Ok(Self {
            key,
            name: name.into(),
            media_source,
            start,
            end,
            max_distance_km,
            achievement,
        })
    }

    /// Same route registered under another key. Used when a catalog file keys
    /// its routes by map entry rather than by an explicit field.
    pub(crate) fn with_key(mut self, key: &str) -> Self {
        if self.key != key {
            self.key = key.to_string();
        }
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_source(&self) -> &str {
        &self.media_source
    }

    pub fn start(&self) -> Coordinate {
        self.start
    }

    pub fn end(&self) -> Coordinate {
        self.end
    }

    pub fn max_distance_km(&self) -> f64 {
        self.max_distance_km
    }

    pub fn achievement(&self) -> Option<&Achievement> {
        self.achievement.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make(max_km: f64) -> Result<RouteDescriptor, RouteError> {
        RouteDescriptor::new(
            "malecon",
            "Malecón",
            "https://example.com/video.m3u8",
            Coordinate::new(24.15555, -110.3224),
            Coordinate::new(24.1679, -110.3091),
            max_km,
            None,
        )
    }

    #[test]
    fn rejects_non_positive_distance() {
        assert!(matches!(make(0.0), Err(RouteError::InvalidMaxDistance { .. })));
        assert!(matches!(make(-1.0), Err(RouteError::InvalidMaxDistance { .. })));
        assert!(matches!(make(f64::NAN), Err(RouteError::InvalidMaxDistance { .. })));
        assert!(make(3.0).is_ok());
    }

    #[test]
    fn rejects_empty_media() {
        let route = RouteDescriptor::new("k", "n", "  ", Coordinate::new(0., 0.), Coordinate::new(1., 1.), 1.0, None);
        assert_eq!(route, Err(RouteError::MissingMedia { key: "k".into() }));
    }

    #[test]
    fn deserialization_validates() {
        let json = r#"{
            "name": "Broken",
            "media_source": "https://example.com/v.m3u8",
            "start": {"lat": 0.0, "lng": 0.0},
            "end": {"lat": 1.0, "lng": 1.0},
            "max_distance_km": 0.0
        }"#;
        assert!(serde_json::from_str::<RouteDescriptor>(json).is_err());

        let json = json.replace("\"max_distance_km\": 0.0", "\"max_distance_km\": 2.5");
        let route: RouteDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(route.max_distance_km(), 2.5);
        assert!(route.achievement().is_none());
    }

    #[test]
    fn bincode_round_trip_keeps_key() {
        let route = make(3.0).unwrap();
        let bytes = bincode::serialize(&route).unwrap();
        let back: RouteDescriptor = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, route);
        assert_eq!(back.key(), "malecon");
    }
}
