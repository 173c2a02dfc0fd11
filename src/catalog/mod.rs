//! Static data catalog: immutable definitions of routes, formations,
//! coverages and play concepts, looked up by key.
//!
//! The catalog is constructed once (`Catalog::standard`) and handed to the
//! engine by reference or by move; it has no process-wide state, per
//! spec.md's "Avoiding global singletons" design note.

pub mod concept;
pub mod coverage;
pub mod formation;
pub mod route;

pub use concept::ConceptDef;
pub use coverage::{CoverageDef, CoverageType};
pub use formation::FormationDef;
pub use route::{RouteDef, RouteType};

use std::collections::HashMap;

/// # `Catalog` struct
///
/// A `Catalog` is the engine's read-only data source for route, formation,
/// coverage and play-concept definitions. Lookups are by string key and
/// return a deep clone of the stored definition so callers can never
/// mutate the catalog's own copy.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    routes: HashMap<String, RouteDef>,
    formations: HashMap<String, FormationDef>,
    coverages: HashMap<String, CoverageDef>,
    concepts: HashMap<String, ConceptDef>,
}

impl Catalog {
    /// Construct an empty catalog.
    pub fn new() -> Catalog {
        Catalog::default()
    }

    /// Construct the catalog shipped with the engine: the route, formation
    /// and coverage definitions named throughout spec.md §6, plus a
    /// handful of play concepts built from them.
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::catalog::Catalog;
    ///
    /// let catalog = Catalog::standard();
    /// assert!(catalog.get_coverage("cover-3").is_some());
    /// ```
    pub fn standard() -> Catalog {
        let mut catalog = Catalog::new();
        for route in route::standard_routes() {
            catalog.insert_route(route);
        }
        for formation in formation::standard_formations() {
            catalog.insert_formation(formation);
        }
        for coverage in coverage::standard_coverages() {
            catalog.insert_coverage(coverage);
        }
        for concept in concept::standard_concepts() {
            catalog.insert_concept(concept);
        }
        catalog
    }

    /// Insert (or replace) a route definition.
    pub fn insert_route(&mut self, def: RouteDef) {
        self.routes.insert(def.key().to_string(), def);
    }

    /// Insert (or replace) a formation definition.
    pub fn insert_formation(&mut self, def: FormationDef) {
        self.formations.insert(def.key().to_string(), def);
    }

    /// Insert (or replace) a coverage definition.
    pub fn insert_coverage(&mut self, def: CoverageDef) {
        self.coverages.insert(def.key().to_string(), def);
    }

    /// Insert (or replace) a play concept definition.
    pub fn insert_concept(&mut self, def: ConceptDef) {
        self.concepts.insert(def.key().to_string(), def);
    }

    /// Look up a route by key, returning `None` on a miss. The caller
    /// receives a deep clone and cannot mutate the catalog's copy.
    pub fn get_route(&self, key: &str) -> Option<RouteDef> {
        self.routes.get(key).cloned()
    }

    /// Look up the standard route for a given `RouteType`, used by hot
    /// route and sight adjustment conversion (spec.md §4.13).
    pub fn route_by_type(&self, route_type: RouteType) -> Option<RouteDef> {
        self.routes.values().find(|r| r.route_type() == route_type).cloned()
    }

    /// Look up a formation by key.
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::catalog::Catalog;
    ///
    /// let catalog = Catalog::standard();
    /// assert!(catalog.get_formation("singleback-11").is_some());
    /// assert!(catalog.get_formation("no-such-formation").is_none());
    /// ```
    pub fn get_formation(&self, key: &str) -> Option<FormationDef> {
        self.formations.get(key).cloned()
    }

    /// Look up a coverage by key.
    pub fn get_coverage(&self, key: &str) -> Option<CoverageDef> {
        self.coverages.get(key).cloned()
    }

    /// Look up a play concept by key.
    pub fn get_concept(&self, key: &str) -> Option<ConceptDef> {
        self.concepts.get(key).cloned()
    }

    /// All formation keys currently loaded, for enumeration by callers
    /// (e.g. a UI populating a formation picker).
    pub fn formation_keys(&self) -> Vec<&str> {
        self.formations.keys().map(|k| k.as_str()).collect()
    }

    /// All coverage keys currently loaded.
    pub fn coverage_keys(&self) -> Vec<&str> {
        self.coverages.keys().map(|k| k.as_str()).collect()
    }

    /// All play concept keys currently loaded.
    pub fn concept_keys(&self) -> Vec<&str> {
        self.concepts.keys().map(|k| k.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_has_core_entries() {
        let catalog = Catalog::standard();
        assert!(catalog.get_concept("slant-flat").is_some());
        assert!(catalog.get_concept("four-verts").is_some());
        assert!(catalog.get_coverage("cover-0").is_some());
        assert!(catalog.get_coverage("quarters").is_some());
        assert!(catalog.get_formation("trips-right-11").is_some());
    }

    #[test]
    fn test_missing_key_returns_none() {
        let catalog = Catalog::standard();
        assert!(catalog.get_concept("does-not-exist").is_none());
    }
}
