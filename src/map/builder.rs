use geo::Coord;
use log::{debug, warn};
use std::collections::BTreeMap;

use crate::domain::{Feature, member_name};
use crate::geometry::{Bounds, CanvasProjector, build_simplified_path, collect_bounds, project};

/// Layout options for turning features into canvas paths
#[derive(Debug, Clone)]
pub struct MapOptions {
    /// Growth factor applied to the focus bounds before fitting (>= 1)
    pub padding: f64,
    /// Empty border kept around the fitted map, in canvas px
    pub margin: f64,
    /// Ring simplification tolerance in canvas px, 0 disables it
    pub simplify: f64,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            padding: 1.04,
            margin: 16.0,
            simplify: 0.0,
        }
    }
}

impl MapOptions {
    pub fn with_simplify(mut self, epsilon: f64) -> Self {
        self.simplify = epsilon.max(0.0);
        self
    }
}

/// One drawable polygon of a feature
#[derive(Debug, Clone, PartialEq)]
pub struct MapPath {
    pub key: String,
    pub data: String,
    pub iso3: Option<String>,
    /// Display name, only for member states
    pub country: Option<&'static str>,
    pub is_member: bool,
    pub bounds: Bounds,
}

/// Everything derived from one feature collection
#[derive(Debug, Clone)]
pub struct MapPaths {
    pub paths: Vec<MapPath>,
    /// Union bounds per member display name
    pub country_bounds: BTreeMap<&'static str, Bounds>,
    pub projector: CanvasProjector,
}

impl MapPaths {
    pub fn empty() -> Self {
        Self {
            paths: Vec::new(),
            country_bounds: BTreeMap::new(),
            projector: CanvasProjector::identity(),
        }
    }

    /// True when there is nothing to draw; renderers show a placeholder
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Non-member shapes drawn for geographic framing
    pub fn context(&self) -> impl Iterator<Item = &MapPath> {
        self.paths.iter().filter(|p| !p.is_member)
    }

    pub fn members(&self) -> impl Iterator<Item = &MapPath> {
        self.paths.iter().filter(|p| p.is_member)
    }

    pub fn bounds_for(&self, country: &str) -> Option<&Bounds> {
        self.country_bounds.get(country)
    }
}

impl Default for MapPaths {
    fn default() -> Self {
        Self::empty()
    }
}

/// Build drawable paths and per-country bounds for a feature collection
///
/// # Algorithm
/// 1. Split features into members (iso3 in the member table) and context
/// 2. Fit the members' projected bounds (all features if no member is
///    present) onto the canvas with one shared projector
/// 3. Build one path per polygon of every feature with that projector
/// 4. Merge bounds of polygons sharing a member name
pub fn build_map_paths(features: &[Feature], options: &MapOptions) -> MapPaths {
    if features.is_empty() {
        return MapPaths::empty();
    }

    let is_member = |f: &Feature| f.iso3.as_deref().and_then(member_name).is_some();
    let members: Vec<&Feature> = features.iter().filter(|f| is_member(f)).collect();

    let focus_bounds = if members.is_empty() {
        collect_bounds(features)
    } else {
        collect_bounds(members.iter().copied())
    };
    let projector = CanvasProjector::fit(&focus_bounds.expand(options.padding), options.margin);
    let to_canvas = |c: Coord<f64>| Some(projector.to_canvas(project(c)));

    let mut paths = Vec::new();
    let mut country_bounds: BTreeMap<&'static str, Bounds> = BTreeMap::new();

    for (index, feature) in features.iter().enumerate() {
        let country = feature.iso3.as_deref().and_then(member_name);
        let key_base = feature
            .iso3
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_else(|| format!("feature{index}"));

        let polygons = feature.geometry.polygons();
        if polygons.is_empty() {
            warn!(
                "Feature {} has no usable geometry",
                feature.name.as_deref().unwrap_or(&key_base)
            );
            continue;
        }

        for (part, polygon) in polygons.iter().enumerate() {
            let Some(built) = build_simplified_path(polygon, &to_canvas, options.simplify) else {
                continue;
            };

            if let Some(name) = country {
                let merged = country_bounds.entry(name).or_insert(Bounds::EMPTY);
                *merged = merged.merge(&built.bounds);
            }

            paths.push(MapPath {
                key: format!("{key_base}-{index}-{part}"),
                data: built.data,
                iso3: feature.iso3.clone(),
                country,
                is_member: country.is_some(),
                bounds: built.bounds,
            });
        }
    }

    debug!(
        "Built {} paths ({} member countries) from {} features",
        paths.len(),
        country_bounds.len(),
        features.len()
    );

    MapPaths {
        paths,
        country_bounds,
        projector,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeatureCollection, Geometry, Polygon};
    use crate::geometry::{CANVAS_HEIGHT, CANVAS_WIDTH};
    use geo::LineString;

    fn square(lon: f64, lat: f64, size: f64) -> Polygon {
        Polygon::new(vec![LineString::from(vec![
            (lon, lat),
            (lon + size, lat),
            (lon + size, lat + size),
            (lon, lat + size),
        ])])
    }

    fn feature(iso3: &str, lon: f64, lat: f64, size: f64) -> Feature {
        Feature::new(Some(iso3), None, Geometry::Polygon(square(lon, lat, size)))
    }

    #[test]
    fn test_empty_input() {
        let map = build_map_paths(&[], &MapOptions::default());
        assert!(map.is_empty());
        assert!(map.country_bounds.is_empty());
        assert_eq!(map.projector, CanvasProjector::identity());
    }

    #[test]
    fn test_members_and_context() {
        let features = vec![
            feature("THA", 98.0, 6.0, 7.0),
            feature("VNM", 103.0, 9.0, 4.0),
            feature("CHN", 90.0, 20.0, 20.0),
        ];
        let map = build_map_paths(&features, &MapOptions::default());

        assert_eq!(map.paths.len(), 3);
        assert_eq!(map.members().count(), 2);
        assert_eq!(map.context().count(), 1);
        assert_eq!(map.paths[0].country, Some("Thailand"));
        assert!(map.paths[2].country.is_none());
        assert!(map.bounds_for("Thailand").is_some());
        assert!(map.bounds_for("China").is_none());
    }

    #[test]
    fn test_members_fit_inside_canvas() {
        let features = vec![
            feature("THA", 98.0, 6.0, 7.0),
            feature("VNM", 103.0, 9.0, 4.0),
            feature("CHN", 70.0, 20.0, 40.0),
        ];
        let map = build_map_paths(&features, &MapOptions::default());

        for path in map.members() {
            assert!(path.bounds.min_x >= 0.0 && path.bounds.max_x <= CANVAS_WIDTH);
            assert!(path.bounds.min_y >= 0.0 && path.bounds.max_y <= CANVAS_HEIGHT);
        }
        // context is framed around the members and may run off the canvas
        let china = map.context().next().unwrap();
        assert!(china.bounds.min_x < 0.0);
    }

    #[test]
    fn test_multipolygon_bounds_merge() {
        let indonesia = Feature::new(
            Some("IDN"),
            Some("Indonesia"),
            Geometry::MultiPolygon(vec![
                square(95.0, -6.0, 5.0),
                square(130.0, -8.0, 4.0),
            ]),
        );
        let map = build_map_paths(&[indonesia], &MapOptions::default());

        assert_eq!(map.paths.len(), 2);
        let merged = map.bounds_for("Indonesia").unwrap();
        assert_eq!(*merged, map.paths[0].bounds.merge(&map.paths[1].bounds));
        assert_ne!(map.paths[0].key, map.paths[1].key);
    }

    #[test]
    fn test_no_members_uses_all_features() {
        let features = vec![feature("CHN", 90.0, 20.0, 20.0)];
        let map = build_map_paths(&features, &MapOptions::default());
        assert_eq!(map.paths.len(), 1);
        assert!(map.country_bounds.is_empty());
        let b = map.paths[0].bounds;
        assert!(b.min_x >= 0.0 && b.max_x <= CANVAS_WIDTH);
    }

    #[test]
    fn test_malformed_feature_does_not_affect_siblings() {
        let json = r#"{"features": [
            {"properties": {"iso3": "KHM"}, "geometry": {"type": "Polygon", "coordinates": "oops"}},
            {"properties": {"iso3": "LAO"}, "geometry": {"type": "Polygon", "coordinates": [[[101, 14], [107, 14], [107, 22], [101, 22]]]}}
        ]}"#;
        let collection = FeatureCollection::from_json_str(json).unwrap();
        let map = build_map_paths(&collection.features, &MapOptions::default());

        assert_eq!(map.paths.len(), 1);
        assert_eq!(map.paths[0].country, Some("Laos"));
        assert!(map.bounds_for("Cambodia").is_none());
    }
}
