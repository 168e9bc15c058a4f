//! GeoJSON tables. The CRS travels in the legacy top-level `crs` member,
//! which is how the metric tables this crate works on are usually shipped.

use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, LineString, MultiLineString};
use serde_json::{json, Map, Value};

use crate::io::{finalize_write, open_for_write};
use crate::types::{Crossing, Layer, Sidewalk, SourceSidewalk, Street, Table};

/// EPSG code from a `crs` member such as
/// `{"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::26910"}}`.
/// `EPSG:26910` is accepted too.
pub fn parse_crs(crs: &Value) -> Option<u32> {
    let name = crs["properties"]["name"].as_str()?;
    let code = name.rsplit(':').next()?;
    if !name.to_ascii_uppercase().contains("EPSG") { return None }
    code.trim().parse().ok()
}

fn crs_value(epsg: Option<u32>) -> Value {
    match epsg {
        Some(code) => json!({
            "type": "name",
            "properties": { "name": format!("urn:ogc:def:crs:EPSG::{code}") }
        }),
        None => Value::Null,
    }
}

/// Parse a coordinate list: [[x, y], [x, y], ...]
fn parse_line_coords(coords: &Value) -> Result<LineString<f64>> {
    let coords = coords.as_array()
        .ok_or_else(|| anyhow!("Invalid LineString: coordinates must be an array"))?;
    let points = coords.iter()
        .map(|pair| {
            let x = pair[0].as_f64().ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?;
            let y = pair[1].as_f64().ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?;
            Ok(Coord { x, y })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(LineString::new(points))
}

/// Read a LineString or MultiLineString geometry.
fn parse_lines(geometry: &Value) -> Result<MultiLineString<f64>> {
    match geometry["type"].as_str() {
        Some("LineString") => Ok(MultiLineString::new(vec![parse_line_coords(&geometry["coordinates"])?])),
        Some("MultiLineString") => {
            let parts = geometry["coordinates"].as_array()
                .ok_or_else(|| anyhow!("Invalid MultiLineString: coordinates must be an array"))?;
            Ok(MultiLineString::new(parts.iter().map(parse_line_coords).collect::<Result<_>>()?))
        }
        Some(other) => bail!("Unsupported geometry type {other}"),
        None => bail!("Feature has no geometry"),
    }
}

/// A string property, also accepting numbers.
fn key_property(properties: &Value, key: &str) -> Option<String> {
    match &properties[key] {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Layers come as integers, integral floats or numeric strings; anything
/// else is unknown.
fn parse_layer(value: &Value) -> Layer {
    let z = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    z.and_then(|z| i32::try_from(z).ok()).map_or(Layer::Unknown, Layer::Value)
}

fn layer_value(layer: Layer) -> Value {
    layer.value().map_or(Value::Null, |z| json!(z))
}

fn line_value(line: &LineString<f64>) -> Value {
    json!({
        "type": "LineString",
        "coordinates": line.0.iter().map(|c| [c.x, c.y]).collect::<Vec<_>>(),
    })
}

/// Features and EPSG code of a FeatureCollection.
fn read_collection(bytes: &[u8]) -> Result<(Vec<Value>, Option<u32>)> {
    let mut value: Value = serde_json::from_slice(bytes).context("Failed to parse GeoJSON bytes")?;
    let epsg = parse_crs(&value["crs"]);
    let features = match value.get_mut("features").map(Value::take) {
        Some(Value::Array(features)) => features,
        _ => bail!("GeoJSON is not a FeatureCollection"),
    };
    Ok((features, epsg))
}

fn streets_from_bytes(bytes: &[u8]) -> Result<Table<Street>> {
    let (features, epsg) = read_collection(bytes)?;
    let rows = features.iter().enumerate()
        .map(|(i, feature)| {
            let properties = &feature["properties"];
            let lines = parse_lines(&feature["geometry"]).with_context(|| format!("street feature {i}"))?;
            let [geometry] = <[LineString<f64>; 1]>::try_from(lines.0)
                .map_err(|parts| anyhow!("street feature {i} has {} parts; expected 1", parts.len()))?;

            let id = properties["id"].as_u64().unwrap_or(i as u64);
            let pkey = key_property(properties, "pkey").unwrap_or_else(|| id.to_string());
            Ok(Street::new(id, pkey, geometry)
                .with_layer(parse_layer(&properties["layer"]))
                .with_offsets(
                    properties["sw_left"].as_f64().unwrap_or(0.0),
                    properties["sw_right"].as_f64().unwrap_or(0.0),
                ))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Table::new(epsg, rows))
}

fn source_sidewalks_from_bytes(bytes: &[u8]) -> Result<Table<SourceSidewalk>> {
    let (features, epsg) = read_collection(bytes)?;
    let rows = features.iter().enumerate()
        .map(|(i, feature)| {
            let geometry = parse_lines(&feature["geometry"]).with_context(|| format!("sidewalk feature {i}"))?;
            let pkey = key_property(&feature["properties"], "streets_pkey")
                .ok_or_else(|| anyhow!("sidewalk feature {i} has no streets_pkey"))?;
            Ok(SourceSidewalk::new(pkey, geometry))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Table::new(epsg, rows))
}

fn points_from_bytes(bytes: &[u8]) -> Result<Table<Coord<f64>>> {
    let (features, epsg) = read_collection(bytes)?;
    let rows = features.iter()
        .filter(|feature| feature["geometry"]["type"].as_str() == Some("Point"))
        .map(|feature| {
            let coords = &feature["geometry"]["coordinates"];
            match (coords[0].as_f64(), coords[1].as_f64()) {
                (Some(x), Some(y)) => Ok(Coord { x, y }),
                _ => bail!("Invalid Point coordinates"),
            }
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Table::new(epsg, rows))
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Read a street table. Each feature needs a single-part line geometry;
/// `id`, `pkey`, `layer`, `sw_left` and `sw_right` are read when present.
pub fn read_streets(path: &Path) -> Result<Table<Street>> {
    streets_from_bytes(&read_file(path)?).with_context(|| format!("Failed to read streets from {}", path.display()))
}

/// Read source sidewalks, each with the `streets_pkey` of its street.
pub fn read_source_sidewalks(path: &Path) -> Result<Table<SourceSidewalk>> {
    source_sidewalks_from_bytes(&read_file(path)?)
        .with_context(|| format!("Failed to read sidewalks from {}", path.display()))
}

/// Read the Point features of a collection, ignoring everything else.
pub fn read_points(path: &Path) -> Result<Table<Coord<f64>>> {
    points_from_bytes(&read_file(path)?).with_context(|| format!("Failed to read points from {}", path.display()))
}

fn collection(features: Vec<Value>, epsg: Option<u32>) -> Value {
    let mut collection = json!({
        "type": "FeatureCollection",
        "features": features,
    });
    if epsg.is_some() {
        collection["crs"] = crs_value(epsg);
    }
    collection
}

fn feature(geometry: &LineString<f64>, properties: Map<String, Value>) -> Value {
    json!({
        "type": "Feature",
        "geometry": line_value(geometry),
        "properties": properties,
    })
}

pub fn streets_to_geojson(table: &Table<Street>) -> Value {
    let features = table.rows.iter()
        .map(|street| {
            let properties = json!({
                "id": street.id,
                "pkey": &*street.pkey,
                "layer": layer_value(street.layer),
                "sw_left": street.sw_left,
                "sw_right": street.sw_right,
            });
            feature(&street.geometry, properties.as_object().cloned().unwrap_or_default())
        })
        .collect();
    collection(features, table.epsg)
}

pub fn sidewalks_to_geojson(table: &Table<Sidewalk>) -> Value {
    let features = table.rows.iter()
        .map(|sidewalk| {
            let properties = json!({
                "streets_pkey": &*sidewalk.attrs.streets_pkey,
                "st_id": sidewalk.attrs.st_id,
                "side": sidewalk.attrs.side.as_str(),
                "forward": sidewalk.attrs.forward,
                "layer": layer_value(sidewalk.attrs.layer),
                "incline": sidewalk.incline,
            });
            feature(&sidewalk.geometry, properties.as_object().cloned().unwrap_or_default())
        })
        .collect();
    collection(features, table.epsg)
}

pub fn crossings_to_geojson(table: &Table<Crossing>) -> Value {
    let features = table.rows.iter()
        .map(|crossing| {
            let mut properties = Map::new();
            properties.insert("from".into(), json!(crossing.from.0));
            properties.insert("to".into(), json!(crossing.to.map(|c| c.0)));
            properties.insert("sw_index".into(), json!(crossing.sidewalk));
            properties.insert("street_id".into(), json!(crossing.street_id));
            properties.insert("layer".into(), layer_value(crossing.layer));
            properties.insert("incline".into(), json!(crossing.incline));
            for (key, value) in &crossing.tags {
                properties.insert(key.clone(), json!(value));
            }
            feature(&crossing.geometry, properties)
        })
        .collect();
    collection(features, table.epsg)
}

fn write_value(path: &Path, value: &Value, force: bool) -> Result<()> {
    let mut pending = open_for_write(path, force)?;
    serde_json::to_writer(&mut pending, value).context("Failed to serialize GeoJSON")?;
    pending.flush()?;
    finalize_write(pending)
}

pub fn write_streets(path: &Path, table: &Table<Street>, force: bool) -> Result<()> {
    write_value(path, &streets_to_geojson(table), force)
}

pub fn write_sidewalks(path: &Path, table: &Table<Sidewalk>, force: bool) -> Result<()> {
    write_value(path, &sidewalks_to_geojson(table), force)
}

pub fn write_crossings(path: &Path, table: &Table<Crossing>, force: bool) -> Result<()> {
    write_value(path, &crossings_to_geojson(table), force)
}
