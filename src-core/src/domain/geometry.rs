//! Record Geometry
//!
//! Read-only view over an Esri JSON geometry as returned by a query with
//! `returnGeometry=true`.

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    Multipoint,
    Polyline,
    Polygon,
    Envelope,
    Unknown,
}

impl GeometryKind {
    pub fn label(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::Multipoint => "Multipoint",
            GeometryKind::Polyline => "Polyline",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::Envelope => "Envelope",
            GeometryKind::Unknown => "Unknown",
        }
    }
}

/// Shape, size and spatial reference of one geometry
#[derive(Debug, Clone, PartialEq)]
pub struct GeometrySummary {
    pub kind: GeometryKind,
    /// Paths, rings or points, depending on the kind
    pub parts: usize,
    pub vertices: usize,
    pub wkid: Option<i64>,
    /// First vertex as (x, y)
    pub start: Option<(f64, f64)>,
}

impl GeometrySummary {
    pub fn from_json(geometry: &Value) -> Self {
        let wkid = geometry
            .get("spatialReference")
            .and_then(|sr| sr.get("latestWkid").or_else(|| sr.get("wkid")))
            .and_then(Value::as_i64);

        if let (Some(x), Some(y)) = (
            geometry.get("x").and_then(Value::as_f64),
            geometry.get("y").and_then(Value::as_f64),
        ) {
            return Self { kind: GeometryKind::Point, parts: 1, vertices: 1, wkid, start: Some((x, y)) };
        }

        for (key, kind) in [
            ("paths", GeometryKind::Polyline),
            ("rings", GeometryKind::Polygon),
        ] {
            if let Some(parts) = geometry.get(key).and_then(Value::as_array) {
                let vertices = parts.iter().filter_map(Value::as_array).map(Vec::len).sum();
                let start = parts
                    .first()
                    .and_then(Value::as_array)
                    .and_then(|part| part.first())
                    .and_then(vertex);
                return Self { kind, parts: parts.len(), vertices, wkid, start };
            }
        }

        if let Some(points) = geometry.get("points").and_then(Value::as_array) {
            let start = points.first().and_then(vertex);
            return Self {
                kind: GeometryKind::Multipoint,
                parts: points.len(),
                vertices: points.len(),
                wkid,
                start,
            };
        }

        if geometry.get("xmin").is_some() {
            let start = geometry
                .get("xmin")
                .and_then(Value::as_f64)
                .zip(geometry.get("ymin").and_then(Value::as_f64));
            return Self { kind: GeometryKind::Envelope, parts: 1, vertices: 4, wkid, start };
        }

        log::debug!("Unrecognized geometry shape");
        Self { kind: GeometryKind::Unknown, parts: 0, vertices: 0, wkid, start: None }
    }
}

fn vertex(raw: &Value) -> Option<(f64, f64)> {
    let coords = raw.as_array()?;
    Some((coords.first()?.as_f64()?, coords.get(1)?.as_f64()?))
}

/// Indented JSON for display
pub fn pretty_geometry(geometry: &Value) -> String {
    serde_json::to_string_pretty(geometry).unwrap_or_else(|_| geometry.to_string())
}
