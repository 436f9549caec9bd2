//! Integration tests for record sources, sinks and the read/load drivers

use bytes::Bytes;
use oracle_sdo::record::{
    load_geometries, read_geometries, read_points, ImageSink, ImageSource, MemorySink,
    MemorySource,
};
use oracle_sdo::{
    codec, Config, Error, PrintLevel, RecordSource, Result, WireGeometry,
};

const INPUT: &str = "\
# id type dim coordinates
1 1 2 12.5 45
2 2 2 10 20 30 40
3 3 2 0 0 4 0 4 4 0 4 0 0

4 5 3 1 1 1 2 2 2
";

/// Source that fails for good after a number of rows
struct BrokenSource {
    rows: MemorySource,
    fail_after: usize,
}

impl RecordSource for BrokenSource {
    fn fetch(&mut self) -> Result<Option<WireGeometry>> {
        if self.fail_after == 0 {
            return Err(Error::Sink("connection lost".to_string()));
        }
        self.fail_after -= 1;
        self.rows.fetch()
    }
}

fn load_images() -> Vec<Bytes> {
    let mut sink = ImageSink::new();
    let summary = load_geometries(INPUT.as_bytes(), &mut sink).unwrap();
    assert_eq!(summary.rows_loaded, 4);
    sink.into_rows().into_iter().map(|(_, image)| image).collect()
}

#[test]
fn test_load_assigns_ids_in_order() {
    let mut sink = MemorySink::new();
    load_geometries(INPUT.as_bytes(), &mut sink).unwrap();
    let ids: Vec<i64> = sink.rows().iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);

    let gtypes: Vec<i32> = sink
        .rows()
        .iter()
        .map(|(_, wire)| codec::decode(wire).unwrap().unwrap().gtype)
        .collect();
    assert_eq!(gtypes, vec![2001, 2002, 2003, 3005]);
}

#[test]
fn test_read_loaded_images_summary() {
    let mut source = ImageSource::new(load_images());
    let mut out = Vec::new();
    let summary = read_geometries(&mut source, &Config::new(), &mut out).unwrap();
    assert_eq!(summary.rows, 4);
    assert_eq!(summary.fetches, 1);
    assert_eq!(summary.failed, 0);

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Row 1: Geometry\n  Type: 1 (POINT)\n"));
    assert!(text.contains("Row 3: Geometry\n  Type: 3 (POLYGON)\n"));
    assert!(text.contains("Row 4: Geometry\n  Type: 5 (MULTI-POINT)\n  Dimensions: 3\n"));
    assert!(text.ends_with("\n4 rows fetched in 1 fetches\n"));
}

#[test]
fn test_read_detailed_report() {
    let mut images = load_images();
    images.truncate(2);
    let mut source = ImageSource::new(images);
    let mut out = Vec::new();
    let config = Config::new().print_level(PrintLevel::Detailed).array_size(1);
    read_geometries(&mut source, &config, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("  SDO_POINT: (12.500000, 45.000000, 0.000000)\n"));
    assert!(text.contains("  SDO_ORDINATES (4 elements)\n    [1]=10.000000\n"));
    assert!(text.ends_with("2 rows fetched in 3 fetches\n"));
}

#[test]
fn test_null_column_values() {
    let mut images = load_images();
    images.insert(1, Bytes::new());
    let mut source = ImageSource::new(images);
    let mut out = Vec::new();
    let config = Config::new().print_level(PrintLevel::Silent).array_size(2);
    let summary = read_geometries(&mut source, &config, &mut out).unwrap();
    assert_eq!(summary.rows, 5);
    assert_eq!(summary.nulls, 1);
    assert_eq!(summary.fetches, 3);
}

#[test]
fn test_corrupt_rows_are_skipped_in_every_batch_size() {
    let mut images = load_images();
    images[2] = images[2].slice(..10);

    for array_size in [1, 2, 3, 10] {
        let mut source = ImageSource::new(images.clone());
        let mut out = Vec::new();
        let config = Config::new().array_size(array_size);
        let summary = read_geometries(&mut source, &config, &mut out).unwrap();
        assert_eq!(summary.rows, 4, "array size {}", array_size);
        assert_eq!(summary.failed, 1, "array size {}", array_size);

        let text = String::from_utf8(out).unwrap();
        for row in [1, 2, 4] {
            assert!(text.contains(&format!("Row {}: Geometry", row)));
        }
        assert!(!text.contains("Row 3: Geometry"));
    }
}

#[test]
fn test_source_failure_is_fatal() {
    let sink_rows = {
        let mut sink = MemorySink::new();
        load_geometries(INPUT.as_bytes(), &mut sink).unwrap();
        sink.into_rows()
    };
    let mut source = BrokenSource {
        rows: MemorySource::new(sink_rows.into_iter().map(|(_, wire)| wire)),
        fail_after: 2,
    };
    let mut out = Vec::new();
    let err = read_geometries(&mut source, &Config::new(), &mut out).unwrap_err();
    assert!(matches!(err, Error::Sink(_)));
}

#[test]
fn test_non_finite_coordinate_reports_line() {
    let mut sink = MemorySink::new();
    let err = load_geometries("1 2 2 0 0 1 1\n2 2 2 0 0 NaN 1\n".as_bytes(), &mut sink).unwrap_err();
    assert!(matches!(err, Error::Parse { line: 2, .. }), "{:?}", err);
    assert_eq!(sink.rows().len(), 1);
}

#[test]
fn test_out_of_range_coordinate_reports_line() {
    let mut sink = MemorySink::new();
    let err =
        load_geometries("1 2 2 0 0 1 1\n\n3 2 2 0 0 1e300 1\n".as_bytes(), &mut sink).unwrap_err();
    assert!(matches!(err, Error::Parse { line: 3, .. }), "{:?}", err);
    assert_eq!(sink.rows().len(), 1);
}

#[test]
fn test_read_points_from_images() {
    let mut source = ImageSource::new(load_images());
    let mut out = Vec::new();
    let summary = read_points(&mut source, &Config::new(), &mut out).unwrap();
    assert_eq!(summary.rows, 4);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "1: (12.500000, 45.000000)\n\n4 rows fetched in 1 fetches\n"
    );
}

#[test]
fn test_load_parse_error_reports_line() {
    let mut sink = MemorySink::new();
    let err = load_geometries("1 2 2 0 0 1 1\n\n1 2 2 0 0 1\n".as_bytes(), &mut sink).unwrap_err();
    assert!(matches!(err, Error::Parse { line: 3, .. }));
}
