//! Country boundaries from a GeoJSON `FeatureCollection`.
//!
//! Only `Polygon` and `MultiPolygon` features carrying a string
//! `properties.name` are kept. Anything else is skipped and recorded in
//! [`CountryCollection::skipped`]; only a document that is not a
//! FeatureCollection at all is an error.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}

/// Implicitly closed sequence of (lon, lat) vertices.
pub type Ring = Vec<GeoPoint>;

#[derive(Debug, Clone, PartialEq)]
pub enum GeoGeometry {
    /// Outer ring followed by holes.
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl GeoGeometry {
    /// First ring of every polygon, in document order. Holes are dropped.
    pub fn outer_rings(&self) -> Vec<&[GeoPoint]> {
        match self {
            GeoGeometry::Polygon(rings) => rings.first().map(Vec::as_slice).into_iter().collect(),
            GeoGeometry::MultiPolygon(polys) => polys
                .iter()
                .filter_map(|rings| rings.first().map(Vec::as_slice))
                .collect(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            GeoGeometry::Polygon(_) => "Polygon",
            GeoGeometry::MultiPolygon(_) => "MultiPolygon",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeoFeature {
    pub name: String,
    pub geometry: GeoGeometry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFeature {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryCollection {
    pub features: Vec<GeoFeature>,
    pub skipped: Vec<SkippedFeature>,
}

#[derive(Debug, Error)]
pub enum GeoJsonError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected GeoJSON FeatureCollection")]
    NotAFeatureCollection,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

impl CountryCollection {
    pub fn from_geojson_str(payload: &str) -> Result<Self, GeoJsonError> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_geojson_value(&value)
    }

    pub fn from_geojson_value(value: &Value) -> Result<Self, GeoJsonError> {
        let obj = value.as_object().ok_or(GeoJsonError::NotAFeatureCollection)?;
        if obj.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
            return Err(GeoJsonError::NotAFeatureCollection);
        }
        let features_val = obj
            .get("features")
            .and_then(Value::as_array)
            .ok_or(GeoJsonError::NotAFeatureCollection)?;

        let mut out = CountryCollection {
            features: Vec::with_capacity(features_val.len()),
            skipped: Vec::new(),
        };

        for (index, feat_val) in features_val.iter().enumerate() {
            match parse_feature(feat_val) {
                Ok(feature) => out.features.push(feature),
                Err(reason) => {
                    debug!(index, %reason, "skipping GeoJSON feature");
                    out.skipped.push(SkippedFeature { index, reason });
                }
            }
        }

        Ok(out)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

fn parse_feature(value: &Value) -> Result<GeoFeature, String> {
    let obj = value
        .as_object()
        .ok_or_else(|| "feature must be an object".to_string())?;

    let name = obj
        .get("properties")
        .and_then(|p| p.get("name"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "feature missing properties.name".to_string())?;

    let geometry_val = obj
        .get("geometry")
        .filter(|g| !g.is_null())
        .ok_or_else(|| format!("{name}: feature missing geometry"))?;
    let raw = RawGeometry::deserialize(geometry_val).map_err(|e| format!("{name}: {e}"))?;
    let geometry = parse_geometry(&raw).map_err(|e| format!("{name}: {e}"))?;

    Ok(GeoFeature {
        name: name.to_string(),
        geometry,
    })
}

fn parse_geometry(raw: &RawGeometry) -> Result<GeoGeometry, String> {
    match raw.kind.as_str() {
        "Polygon" => {
            let rings: Vec<Vec<Vec<f64>>> = Vec::deserialize(&raw.coordinates)
                .map_err(|e| format!("Polygon coordinates: {e}"))?;
            Ok(GeoGeometry::Polygon(to_rings(rings)?))
        }
        "MultiPolygon" => {
            let polys: Vec<Vec<Vec<Vec<f64>>>> = Vec::deserialize(&raw.coordinates)
                .map_err(|e| format!("MultiPolygon coordinates: {e}"))?;
            let mut out = Vec::with_capacity(polys.len());
            for rings in polys {
                out.push(to_rings(rings)?);
            }
            Ok(GeoGeometry::MultiPolygon(out))
        }
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

fn to_rings(rings: Vec<Vec<Vec<f64>>>) -> Result<Vec<Ring>, String> {
    rings
        .into_iter()
        .map(|ring| ring.iter().map(|pos| to_point(pos)).collect::<Result<Ring, _>>())
        .collect()
}

fn to_point(pos: &[f64]) -> Result<GeoPoint, String> {
    match pos {
        [lon, lat, ..] if lon.is_finite() && lat.is_finite() => Ok(GeoPoint::new(*lon, *lat)),
        [_, _, ..] => Err("position must be finite".to_string()),
        _ => Err("position must have [lon, lat]".to_string()),
    }
}
