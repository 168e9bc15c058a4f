use geo::{line_string, Euclidean, Intersects, Length, LineString};
use pednet::{io, pipeline, Config, Error, SourceSidewalk, Street, Table};

const EPSG: u32 = 26910;

/// Streets leaving the origin in the given directions, 100 units long.
fn streets(directions: &[(&str, f64, f64)]) -> Table<Street> {
    let rows = directions.iter().enumerate()
        .map(|(i, &(key, dx, dy))| {
            Street::new(i as u64 + 1, key, line_string![(x: 0.0, y: 0.0), (x: 100.0 * dx, y: 100.0 * dy)])
        })
        .collect();
    Table::new(Some(EPSG), rows)
}

/// Surveyed sidewalks 7 units either side of each street, stopping short of
/// both ends.
fn surveyed(streets: &Table<Street>) -> Table<SourceSidewalk> {
    let rows = streets.rows.iter()
        .flat_map(|street| {
            let (a, b) = (street.geometry.0[0], street.geometry.0[1]);
            let (dx, dy) = ((b.x - a.x) / 100.0, (b.y - a.y) / 100.0);
            [7.0, -7.0].map(|offset| {
                let (nx, ny) = (-dy * offset, dx * offset);
                let line = line_string![
                    (x: a.x + 10.0 * dx + nx, y: a.y + 10.0 * dy + ny),
                    (x: a.x + 90.0 * dx + nx, y: a.y + 90.0 * dy + ny),
                ];
                SourceSidewalk::new(street.pkey.clone(), line)
            })
        })
        .collect();
    Table::new(Some(EPSG), rows)
}

fn total_length<'a>(lines: impl IntoIterator<Item = &'a LineString<f64>>) -> f64 {
    lines.into_iter().map(|l| Euclidean.length(l)).sum()
}

#[test]
fn four_way_intersection() {
    let streets = streets(&[("e", 1.0, 0.0), ("n", 0.0, 1.0), ("w", -1.0, 0.0), ("s", 0.0, -1.0)]);
    let config = Config::default();
    let redrawn = pipeline::redraw(&streets, &surveyed(&streets), &config).unwrap();

    assert!(redrawn.streets.rows.iter().all(|s| (s.sw_left - 7.0).abs() < 1e-9 && (s.sw_right - 7.0).abs() < 1e-9));
    assert_eq!(redrawn.sidewalks.len(), 8);
    assert_eq!(redrawn.crossings.len(), 4);
    assert_eq!(redrawn.crossings.epsg, Some(EPSG));

    for crossing in &redrawn.crossings.rows {
        let length = Euclidean.length(&crossing.geometry);
        assert!(length > 12.0 && length < 15.0, "crossing length {length}");
        let crossed = streets.rows.iter().filter(|s| s.geometry.intersects(&crossing.geometry)).count();
        assert_eq!(crossed, 1);
    }

    // Crossings end on sidewalk ends here, so nothing is split.
    let network = pipeline::network(&redrawn, &config);
    assert_eq!(network.len(), 8);
    let before = total_length(redrawn.sidewalks.rows.iter().map(|s| &s.geometry));
    let after = total_length(network.rows.iter().map(|s| &s.geometry));
    assert!((before - after).abs() < 1e-6);
}

#[test]
fn t_intersection_lands_mid_sidewalk() {
    let streets = streets(&[("e", 1.0, 0.0), ("n", 0.0, 1.0), ("w", -1.0, 0.0)]);
    let config = Config::default();
    let redrawn = pipeline::redraw(&streets, &surveyed(&streets), &config).unwrap();

    assert_eq!(redrawn.sidewalks.len(), 6);
    assert_eq!(redrawn.crossings.len(), 3);
    // Two crossings run from the block corners straight across to the
    // long sidewalk on the far side.
    assert_eq!(redrawn.crossings.rows.iter().filter(|c| c.to.is_none()).count(), 2);

    let network = pipeline::network(&redrawn, &config);
    assert_eq!(network.len(), 8);
    let before = total_length(redrawn.sidewalks.rows.iter().map(|s| &s.geometry));
    let after = total_length(network.rows.iter().map(|s| &s.geometry));
    assert!((before - after).abs() < 1e-6);
}

#[test]
fn streets_in_degrees_are_rejected() {
    let mut streets = streets(&[("e", 1.0, 0.0)]);
    streets.epsg = Some(4326);
    let sidewalks = Table::new(Some(4326), vec![]);
    assert!(matches!(pipeline::redraw(&streets, &sidewalks, &Config::default()), Err(Error::AngularCrs(4326))));
}

#[test]
fn tables_round_trip_through_geojson() {
    let dir = tempfile::tempdir().unwrap();
    let streets = streets(&[("e", 1.0, 0.0), ("n", 0.0, 1.0), ("w", -1.0, 0.0), ("s", 0.0, -1.0)]);
    let tagged = pipeline::tag(&streets, &surveyed(&streets), &Config::default()).unwrap();

    let path = dir.path().join("streets.geojson");
    io::write_streets(&path, &tagged, false).unwrap();
    let read = io::read_streets(&path).unwrap();

    assert_eq!(read.epsg, Some(EPSG));
    assert_eq!(read.len(), 4);
    for (a, b) in tagged.rows.iter().zip(&read.rows) {
        assert_eq!((a.id, &a.pkey, a.sw_left, a.sw_right), (b.id, &b.pkey, b.sw_left, b.sw_right));
        assert_eq!(a.geometry, b.geometry);
    }

    // Redrawing from tagged streets alone reuses their offsets.
    let redrawn = pipeline::redraw(&read, &Table::new(None, vec![]), &Config::default()).unwrap();
    assert_eq!(redrawn.crossings.len(), 4);
    io::write_crossings(&dir.path().join("crossings.geojson"), &redrawn.crossings, false).unwrap();
    assert!(io::write_crossings(&dir.path().join("crossings.geojson"), &redrawn.crossings, false).is_err());
}
