use std::path::Path;

use anyhow::Context;
use route_walker_lib::{navigation, projection, RouteCatalog, WalkConfig};

pub struct ServerState {
    pub catalog: RouteCatalog,
    pub config: WalkConfig,
}

impl ServerState {
    pub fn new(catalog: RouteCatalog, config: WalkConfig) -> Self {
        Self { catalog, config }
    }

    /// Reads the catalog and walk configuration files, using the built-in
    /// values for any path not given.
    pub fn load(routes: Option<&Path>, config: Option<&Path>) -> anyhow::Result<Self> {
        let catalog = match routes {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read route catalog {}", path.display()))?;
                RouteCatalog::from_json(&text)
                    .with_context(|| format!("Invalid route catalog {}", path.display()))?
            }
            None => RouteCatalog::builtin(),
        };

        let config = match config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read walk config {}", path.display()))?;
                WalkConfig::from_json(&text)
                    .with_context(|| format!("Invalid walk config {}", path.display()))?
            }
            None => WalkConfig::default(),
        };

        tracing::info!("Loaded {} routes", catalog.len());
        Ok(Self::new(catalog, config))
    }

    /// Logs catalog entries that load fine but will look wrong in the browser.
    /// Returns the number of warnings.
    pub fn check_catalog(&self) -> usize {
        let mut warnings = 0;

        let tree = navigation::builtin(&self.catalog);
        for region in tree.orphan_regions(&self.catalog) {
            tracing::warn!("Region {region} is not listed on any screen");
            warnings += 1;
        }

        for region in self.catalog.regions() {
            for route in self.catalog.routes(region) {
                let straight = projection::straight_line_km(route);
                if straight > route.max_distance_km() {
                    tracing::warn!(
                        "Route {region}/{} is {:.2} km but its ends are {straight:.2} km apart",
                        route.key(),
                        route.max_distance_km(),
                    );
                    warnings += 1;
                }
            }
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use route_walker_lib::{Coordinate, RouteDescriptor};

    use super::*;

    #[test]
    fn builtin_catalog_is_clean() {
        let state = ServerState::load(None, None).unwrap();
        assert_eq!(state.catalog, RouteCatalog::builtin());
        assert_eq!(state.config, WalkConfig::default());
        assert_eq!(state.check_catalog(), 0);
    }

    #[test]
    fn loads_files() {
        let mut routes = tempfile::NamedTempFile::new().unwrap();
        write!(routes, r#"{{"regions": {{"todosSantosRutas": {{"playa": {{
            "name": "Playa", "media_source": "https://example.com/p.m3u8",
            "start": {{"lat": 23.44, "lng": -110.23}}, "end": {{"lat": 23.45, "lng": -110.24}},
            "max_distance_km": 2.0
        }}}}}}}}"#).unwrap();

        let mut config = tempfile::NamedTempFile::new().unwrap();
        write!(config, r#"{{"motion": {{"reference_speed": 5.0}}}}"#).unwrap();

        let state = ServerState::load(Some(routes.path()), Some(config.path())).unwrap();
        assert_eq!(state.catalog.len(), 1);
        assert!(state.catalog.lookup("todosSantosRutas", "playa").is_ok());
        assert_eq!(state.config.motion.reference_speed, 5.0);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = ServerState::load(Some(Path::new("/nonexistent/routes.json")), None).err().unwrap();
        assert!(err.to_string().contains("/nonexistent/routes.json"));
    }

    #[test]
    fn flags_short_routes_and_orphans() {
        let mut catalog = RouteCatalog::builtin();
        let short = RouteDescriptor::new(
            "corto", "Corto", "https://example.com/c.m3u8",
            Coordinate::new(24.15555, -110.3224), Coordinate::new(24.1679, -110.3091), 0.5, None,
        ).unwrap();
        catalog.insert("laPazCiudadRutas", short.clone());
        catalog.insert("atlantis", RouteDescriptor::new(
            "isla", "Isla", "https://example.com/i.m3u8",
            Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.001), 1.0, None,
        ).unwrap());

        let state = ServerState::new(catalog, WalkConfig::default());
        assert_eq!(state.check_catalog(), 2);
    }
}
