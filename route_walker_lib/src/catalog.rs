use std::{collections::BTreeMap, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{coordinate::Coordinate, error::CatalogError, route::RouteDescriptor};

/// Regions are named after the selection screen that lists their routes.
pub const LA_PAZ_REGION: &str = "laPazCiudadRutas";

const LA_PAZ_VIDEO: &str =
    "https://customer-cw0heb9gadqlxjsv.cloudflarestream.com/8aa913ae75d3814cce9a27bd280d2c4a/manifest/video.m3u8";

/// Read-only registry of walkable routes, grouped by region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCatalog")]
pub struct RouteCatalog {
    regions: BTreeMap<String, BTreeMap<String, Arc<RouteDescriptor>>>,
}

#[derive(Deserialize)]
struct RawCatalog {
    regions: BTreeMap<String, BTreeMap<String, RouteDescriptor>>,
}

impl From<RawCatalog> for RouteCatalog {
    fn from(raw: RawCatalog) -> Self {
        let regions = raw.regions.into_iter()
            .map(|(region, routes)| {
                let routes = routes.into_iter()
                    .map(|(key, route)| {
                        let route = route.with_key(&key);
                        (key, Arc::new(route))
                    })
                    .collect();
                (region, routes)
            })
            .collect();

        Self { regions }
    }
}

impl RouteCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The routes shipped with the application.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();

        let routes = [
            RouteDescriptor::new(
                "maleconLaPaz",
                "Malecón de La Paz",
                LA_PAZ_VIDEO,
                Coordinate::new(24.15555, -110.3224),
                Coordinate::new(24.1679, -110.3091),
                3.0,
                None,
            ),
            RouteDescriptor::new(
                "centroHistorico",
                "Centro Histórico",
                LA_PAZ_VIDEO,
                Coordinate::new(24.1605, -110.3128),
                Coordinate::new(24.1630, -110.3095),
                1.2,
                None,
            ),
        ];

        // Built-in values are constants and always valid.
        for route in routes.into_iter().flatten() {
            catalog.insert(LA_PAZ_REGION, route);
        }

        catalog
    }

    /// Parses a `{"regions": {region: {key: route}}}` document.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(text).map_err(|err| CatalogError::Parse(err.to_string()))
    }

    pub fn to_json(&self) -> Result<String, CatalogError> {
        serde_json::to_string_pretty(self).map_err(|err| CatalogError::Parse(err.to_string()))
    }

    /// Registers a route under its own key, replacing any previous entry.
    pub fn insert(&mut self, region: &str, route: RouteDescriptor) -> Option<Arc<RouteDescriptor>> {
        self.regions
            .entry(region.to_string())
            .or_default()
            .insert(route.key().to_string(), Arc::new(route))
    }

    pub fn lookup(&self, region: &str, key: &str) -> Result<Arc<RouteDescriptor>, CatalogError> {
        let routes = self.regions.get(region)
            .ok_or_else(|| CatalogError::UnknownRegion(region.to_string()))?;

        routes.get(key)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownRoute { region: region.to_string(), key: key.to_string() })
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    pub fn routes(&self, region: &str) -> impl Iterator<Item = &Arc<RouteDescriptor>> {
        self.regions.get(region).into_iter().flat_map(|routes| routes.values())
    }

    pub fn len(&self) -> usize {
        self.regions.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_la_paz_routes() {
        let catalog = RouteCatalog::builtin();
        assert_eq!(catalog.len(), 2);

        let malecon = catalog.lookup(LA_PAZ_REGION, "maleconLaPaz").unwrap();
        assert_eq!(malecon.name(), "Malecón de La Paz");
        assert_eq!(malecon.max_distance_km(), 3.0);
        assert_eq!(malecon.end(), Coordinate::new(24.1679, -110.3091));

        let keys: Vec<_> = catalog.routes(LA_PAZ_REGION).map(|r| r.key().to_string()).collect();
        assert_eq!(keys, vec!["centroHistorico", "maleconLaPaz"]);
    }

    #[test]
    fn lookup_reports_what_is_missing() {
        let catalog = RouteCatalog::builtin();
        assert_eq!(
            catalog.lookup("losCabos", "maleconLaPaz"),
            Err(CatalogError::UnknownRegion("losCabos".into()))
        );
        assert_eq!(
            catalog.lookup(LA_PAZ_REGION, "nowhere"),
            Err(CatalogError::UnknownRoute { region: LA_PAZ_REGION.into(), key: "nowhere".into() })
        );
    }

    #[test]
    fn lookup_shares_the_same_descriptor() {
        let catalog = RouteCatalog::builtin();
        let a = catalog.lookup(LA_PAZ_REGION, "centroHistorico").unwrap();
        let b = catalog.lookup(LA_PAZ_REGION, "centroHistorico").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn json_catalog_takes_keys_from_entries() {
        let json = r#"{
            "regions": {
                "todosSantosRutas": {
                    "playa": {
                        "name": "Playa La Cachora",
                        "media_source": "https://example.com/playa.m3u8",
                        "start": {"lat": 23.44, "lng": -110.23},
                        "end": {"lat": 23.45, "lng": -110.24},
                        "max_distance_km": 1.5,
                        "achievement": {"title": "Surfista", "description": "Walked the beach"}
                    }
                }
            }
        }"#;

        let catalog = RouteCatalog::from_json(json).unwrap();
        let route = catalog.lookup("todosSantosRutas", "playa").unwrap();
        assert_eq!(route.key(), "playa");
        assert_eq!(route.achievement().map(|a| a.title.as_str()), Some("Surfista"));
    }

    #[test]
    fn json_catalog_rejects_invalid_routes() {
        let json = r#"{"regions": {"r": {"k": {
            "name": "n", "media_source": "m",
            "start": {"lat": 0.0, "lng": 0.0}, "end": {"lat": 0.0, "lng": 0.0},
            "max_distance_km": -2.0
        }}}}"#;
        assert!(matches!(RouteCatalog::from_json(json), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn json_export_reloads() {
        let catalog = RouteCatalog::builtin();
        let json = catalog.to_json().unwrap();
        assert_eq!(RouteCatalog::from_json(&json).unwrap(), catalog);
    }
}
