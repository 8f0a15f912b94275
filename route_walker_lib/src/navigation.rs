//! Route selection screens as a declarative tree.
//!
//! Every screen is a node; selecting a node shows its children and the back
//! action returns to its parent. Leaves of kind [`NavKind::Route`] start a walk.

use serde::{Deserialize, Serialize};

use crate::{catalog::RouteCatalog, route::RouteDescriptor};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavKind {
    Menu,
    Route { region: String, key: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavNode {
    pub id: String,
    pub label: String,
    pub kind: NavKind,
    pub children: Vec<NavNode>,
}

/// Traversal control returned by a [`NavNode::walk`] visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Continue,
    SkipChildren,
    Stop,
}

impl NavNode {
    pub fn menu(id: &str, label: &str, children: Vec<NavNode>) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind: NavKind::Menu,
            children,
        }
    }

    pub fn route(region: &str, route: &RouteDescriptor) -> Self {
        Self {
            id: route.key().to_string(),
            label: route.name().to_string(),
            kind: NavKind::Route { region: region.to_string(), key: route.key().to_string() },
            children: Vec::new(),
        }
    }

    pub fn is_route(&self) -> bool {
        matches!(self.kind, NavKind::Route { .. })
    }

    /// Depth-first, pre-order walk. The visitor sees the path from the root to
    /// the current node (inclusive). Returns false if the walk was stopped.
    pub fn walk<'a>(&'a self, visitor: &mut dyn FnMut(&[&'a NavNode]) -> Walk) -> bool {
        let mut path = Vec::new();
        walk_inner(self, &mut path, visitor)
    }

    pub fn find(&self, id: &str) -> Option<&NavNode> {
        self.path_to(id).and_then(|path| path.last().copied())
    }

    pub fn parent_of(&self, id: &str) -> Option<&NavNode> {
        let path = self.path_to(id)?;
        path.len().checked_sub(2).map(|i| path[i])
    }

    /// Root-to-node path, used for breadcrumbs.
    pub fn path_to(&self, id: &str) -> Option<Vec<&NavNode>> {
        let mut found = None;
        self.walk(&mut |path| {
            if path.last().is_some_and(|node| node.id == id) {
                found = Some(path.to_vec());
                Walk::Stop
            } else {
                Walk::Continue
            }
        });
        found
    }

    pub fn route_nodes(&self) -> Vec<&NavNode> {
        let mut routes = Vec::new();
        self.walk(&mut |path| {
            if let Some(node) = path.last().filter(|node| node.is_route()) {
                routes.push(*node);
            }
            Walk::Continue
        });
        routes
    }

    /// Catalog regions no screen of this tree lists.
    pub fn orphan_regions<'c>(&self, catalog: &'c RouteCatalog) -> Vec<&'c str> {
        catalog.regions().filter(|region| self.find(region).is_none()).collect()
    }

    /// Route leaves that point at nothing in the catalog.
    pub fn unresolved_routes(&self, catalog: &RouteCatalog) -> Vec<(String, String)> {
        self.route_nodes()
            .into_iter()
            .filter_map(|node| match &node.kind {
                NavKind::Route { region, key } if catalog.lookup(region, key).is_err() => {
                    Some((region.clone(), key.clone()))
                }
                _ => None,
            })
            .collect()
    }
}

fn walk_inner<'a>(node: &'a NavNode, path: &mut Vec<&'a NavNode>, visitor: &mut dyn FnMut(&[&'a NavNode]) -> Walk) -> bool {
    path.push(node);
    let keep_going = match visitor(path) {
        Walk::Stop => false,
        Walk::SkipChildren => true,
        Walk::Continue => node.children.iter().all(|child| walk_inner(child, path, visitor)),
    };
    path.pop();
    keep_going
}

pub const HOME: &str = "home";

const STATES: [(&str, &str); 32] = [
    ("aguascalientes", "Aguascalientes"),
    ("bajaCalifornia", "Baja California"),
    ("bajaCaliforniaSur", "Baja California Sur"),
    ("campeche", "Campeche"),
    ("chiapas", "Chiapas"),
    ("chihuahua", "Chihuahua"),
    ("cdmx", "Ciudad de México"),
    ("coahuila", "Coahuila"),
    ("colima", "Colima"),
    ("durango", "Durango"),
    ("edomex", "Estado de México"),
    ("guanajuato", "Guanajuato"),
    ("guerrero", "Guerrero"),
    ("hidalgo", "Hidalgo"),
    ("jalisco", "Jalisco"),
    ("michoacan", "Michoacán"),
    ("morelos", "Morelos"),
    ("nayarit", "Nayarit"),
    ("nuevoLeon", "Nuevo León"),
    ("oaxaca", "Oaxaca"),
    ("puebla", "Puebla"),
    ("queretaro", "Querétaro"),
    ("quintanaRoo", "Quintana Roo"),
    ("sanLuisPotosi", "San Luis Potosí"),
    ("sinaloa", "Sinaloa"),
    ("sonora", "Sonora"),
    ("tabasco", "Tabasco"),
    ("tamaulipas", "Tamaulipas"),
    ("tlaxcala", "Tlaxcala"),
    ("veracruz", "Veracruz"),
    ("yucatan", "Yucatán"),
    ("zacatecas", "Zacatecas"),
];

/// The selection tree of the application. Any menu whose id is a catalog
/// region lists that region's routes.
pub fn builtin(catalog: &RouteCatalog) -> NavNode {
    let menu = |id: &str, label: &str, mut children: Vec<NavNode>| {
        children.extend(catalog.routes(id).map(|route| NavNode::route(id, route)));
        NavNode::menu(id, label, children)
    };

    let baja_california_sur = menu("bajaCaliforniaSur", "Baja California Sur", vec![
        menu("laPazZonas", "La Paz", vec![
            menu("laPazCiudadRutas", "La Paz (Ciudad)", Vec::new()),
            menu("todosSantosRutas", "Todos Santos", Vec::new()),
        ]),
        menu("losCabos", "Los Cabos", vec![
            menu("caboSanLucasRutas", "Cabo San Lucas", Vec::new()),
            menu("sanJoseDelCaboRutas", "San José del Cabo", Vec::new()),
        ]),
    ]);

    let mut bcs = Some(baja_california_sur);
    let states = STATES.iter()
        .map(|(id, label)| match bcs.take_if(|node| node.id == *id) {
            Some(node) => node,
            None => menu(id, label, Vec::new()),
        })
        .collect();

    NavNode::menu(HOME, "Inicio", vec![NavNode::menu("states", "Estados", states)])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> NavNode {
        builtin(&RouteCatalog::builtin())
    }

    #[test]
    fn every_state_is_listed_once() {
        let tree = tree();
        let states = tree.find("states").unwrap();
        assert_eq!(states.children.len(), 32);
        assert_eq!(states.children.iter().filter(|s| s.id == "bajaCaliforniaSur").count(), 1);
        assert!(!tree.find("bajaCaliforniaSur").unwrap().children.is_empty());
    }

    #[test]
    fn back_goes_to_parent() {
        let tree = tree();
        assert_eq!(tree.parent_of("laPazCiudadRutas").unwrap().id, "laPazZonas");
        assert_eq!(tree.parent_of("maleconLaPaz").unwrap().id, "laPazCiudadRutas");
        assert_eq!(tree.parent_of("sanJoseDelCaboRutas").unwrap().id, "losCabos");
        assert!(tree.parent_of(HOME).is_none());
        assert!(tree.parent_of("atlantis").is_none());
    }

    #[test]
    fn breadcrumb_path() {
        let tree = tree();
        let labels: Vec<_> = tree.path_to("centroHistorico").unwrap().iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["Inicio", "Estados", "Baja California Sur", "La Paz", "La Paz (Ciudad)", "Centro Histórico"]);
    }

    #[test]
    fn route_leaves_resolve_against_catalog() {
        let catalog = RouteCatalog::builtin();
        let tree = builtin(&catalog);
        assert_eq!(tree.route_nodes().len(), 2);
        assert!(tree.unresolved_routes(&catalog).is_empty());
        assert_eq!(tree.unresolved_routes(&RouteCatalog::new()).len(), 2);
    }

    #[test]
    fn catalog_regions_fill_their_menu() {
        let mut catalog = RouteCatalog::builtin();
        let playa = RouteDescriptor::new(
            "playa", "Playa", "https://example.com/p.m3u8",
            crate::Coordinate::new(23.44, -110.23), crate::Coordinate::new(23.45, -110.24), 1.0, None,
        ).unwrap();
        catalog.insert("todosSantosRutas", playa.clone());
        catalog.insert("atlantis", playa);

        let tree = builtin(&catalog);
        let todos_santos = tree.find("todosSantosRutas").unwrap();
        assert_eq!(todos_santos.children.len(), 1);
        assert_eq!(
            todos_santos.children[0].kind,
            NavKind::Route { region: "todosSantosRutas".into(), key: "playa".into() }
        );
        assert_eq!(tree.orphan_regions(&catalog), vec!["atlantis"]);
    }

    #[test]
    fn walk_can_skip_and_stop() {
        let tree = tree();

        let mut visited = 0;
        tree.walk(&mut |path| {
            visited += 1;
            if path.len() == 2 { Walk::SkipChildren } else { Walk::Continue }
        });
        assert_eq!(visited, 2);

        let mut visited = 0;
        let finished = tree.walk(&mut |_| {
            visited += 1;
            if visited == 3 { Walk::Stop } else { Walk::Continue }
        });
        assert!(!finished);
        assert_eq!(visited, 3);
    }
}
