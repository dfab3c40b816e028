use geo::{Coord, LineString};
use serde::Deserialize;
use serde_json::Value;

/// Polygon as an outer ring followed by holes.
///
/// Rings are kept open: the first and last points are implicitly connected
/// and no closing point is appended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    pub rings: Vec<LineString<f64>>,
}

impl Polygon {
    pub fn new(rings: Vec<LineString<f64>>) -> Self {
        Self { rings }
    }

    /// Iterate every coordinate of every ring
    pub fn coords(&self) -> impl Iterator<Item = Coord<f64>> + '_ {
        self.rings.iter().flat_map(|ring| ring.0.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
    /// Unsupported geometry type or coordinates that are not nested arrays
    Invalid,
}

impl Geometry {
    /// Decode a GeoJSON geometry object
    ///
    /// Malformed points (anything other than an array starting with two
    /// numbers) are dropped from their ring; the rest of the ring survives.
    pub fn from_value(value: &Value) -> Self {
        let kind = value.get("type").and_then(Value::as_str).unwrap_or_default();
        let Some(coordinates) = value.get("coordinates") else {
            return Geometry::Invalid;
        };

        match kind {
            "Polygon" => parse_polygon(coordinates)
                .map(Geometry::Polygon)
                .unwrap_or(Geometry::Invalid),
            "MultiPolygon" => match coordinates.as_array() {
                Some(parts) => {
                    Geometry::MultiPolygon(parts.iter().filter_map(parse_polygon).collect())
                }
                None => Geometry::Invalid,
            },
            _ => Geometry::Invalid,
        }
    }

    /// The polygons making up this geometry (empty for invalid geometry)
    pub fn polygons(&self) -> &[Polygon] {
        match self {
            Geometry::Polygon(polygon) => std::slice::from_ref(polygon),
            Geometry::MultiPolygon(polygons) => polygons,
            Geometry::Invalid => &[],
        }
    }
}

fn parse_polygon(value: &Value) -> Option<Polygon> {
    let rings = value.as_array()?;
    Some(Polygon::new(rings.iter().map(parse_ring).collect()))
}

fn parse_ring(value: &Value) -> LineString<f64> {
    let points = value
        .as_array()
        .map(|points| points.iter().filter_map(parse_point).collect())
        .unwrap_or_default();
    LineString::new(points)
}

fn parse_point(value: &Value) -> Option<Coord<f64>> {
    let pair = value.as_array()?;
    let x = pair.first()?.as_f64()?;
    let y = pair.get(1)?.as_f64()?;
    Some(Coord { x, y })
}

/// One country or territory
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub iso3: Option<String>,
    pub name: Option<String>,
    pub geometry: Geometry,
}

impl Feature {
    pub fn new(iso3: Option<&str>, name: Option<&str>, geometry: Geometry) -> Self {
        Self {
            iso3: iso3.map(str::to_string),
            name: name.map(str::to_string),
            geometry,
        }
    }

    /// Decode a GeoJSON feature; never fails, a broken feature just has
    /// [`Geometry::Invalid`]
    pub fn from_value(value: &Value) -> Self {
        let properties = value.get("properties");
        let property = |key: &str| {
            properties
                .and_then(|p| p.get(key))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        let geometry = value
            .get("geometry")
            .map(Geometry::from_value)
            .unwrap_or(Geometry::Invalid);

        Self {
            iso3: property("iso3"),
            name: property("name"),
            geometry,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawCollection {
    #[serde(default)]
    features: Vec<Value>,
}

/// Ordered features loaded once at startup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        let raw: RawCollection = serde_json::from_str(json)?;
        Ok(Self::new(raw.features.iter().map(Feature::from_value).collect()))
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_polygon_feature() {
        let value = json!({
            "type": "Feature",
            "properties": {"iso3": "SGP", "name": "Singapore"},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[103.6, 1.2], [104.0, 1.2], [104.0, 1.5], [103.6, 1.5]]]
            }
        });

        let feature = Feature::from_value(&value);
        assert_eq!(feature.iso3.as_deref(), Some("SGP"));
        assert_eq!(feature.name.as_deref(), Some("Singapore"));
        assert_eq!(feature.geometry.polygons().len(), 1);
        assert_eq!(feature.geometry.polygons()[0].rings[0].0.len(), 4);
    }

    #[test]
    fn test_parse_multipolygon() {
        let value = json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]],
                [[[5.0, 5.0], [6.0, 5.0], [6.0, 6.0]]]
            ]
        });

        let geometry = Geometry::from_value(&value);
        assert_eq!(geometry.polygons().len(), 2);
    }

    #[test]
    fn test_malformed_points_are_dropped() {
        let value = json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], "bad", [1.0], [2.0, "x"], [1.0, 1.0, 30.0], [2.0, 0.0]]]
        });

        let geometry = Geometry::from_value(&value);
        let ring = &geometry.polygons()[0].rings[0];
        assert_eq!(ring.0.len(), 3);
    }

    #[test]
    fn test_malformed_coordinates_are_invalid() {
        let value = json!({"type": "Polygon", "coordinates": 42});
        assert_eq!(Geometry::from_value(&value), Geometry::Invalid);

        let value = json!({"type": "Point", "coordinates": [1.0, 2.0]});
        assert_eq!(Geometry::from_value(&value), Geometry::Invalid);

        let feature = Feature::from_value(&json!({"properties": null}));
        assert_eq!(feature.geometry, Geometry::Invalid);
        assert!(feature.iso3.is_none());
    }

    #[test]
    fn test_collection_from_str() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {"properties": {"iso3": "THA"}, "geometry": {"type": "Polygon", "coordinates": [[[100, 13], [101, 13], [101, 14]]]}},
                {"properties": {"iso3": 7}, "geometry": "nope"}
            ]
        }"#;

        let collection = FeatureCollection::from_json_str(json).unwrap();
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.features[0].iso3.as_deref(), Some("THA"));
        assert!(collection.features[1].iso3.is_none());
        assert_eq!(collection.features[1].geometry, Geometry::Invalid);
    }
}
