use std::path::PathBuf;

use pts_core::{ImportError, ImportSettings, Importer, IndexWidth};
use pts_loader::{load_pts, PtsError, PtsFileSource};
use pts_math::{Mat4, Vec3};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn load_valid_file() {
    let points = load_pts(fixture("sample.pts")).unwrap();

    assert_eq!(points.len(), 5);
    assert_eq!(points[0].position, Vec3::new(-0.41025, -2.0806, 8.00981));
    assert_eq!(points[0].intensity, 55);
    assert_eq!(points[0].color, [52, 44, 65]);
    assert_eq!(points[4].intensity, -1200);
}

#[test]
fn import_fixture_with_settings() {
    let _ = env_logger::builder().is_test(true).try_init();

    let importer = Importer::new(PtsFileSource::new());
    let settings = ImportSettings {
        position: Vec3::new(0.0, 1.0, 0.0),
        scale: Vec3::splat(2.0),
        ..Default::default()
    };
    let geometry = importer
        .import_with_settings(fixture("sample.pts"), &settings)
        .unwrap();

    assert_eq!(geometry.name, "sample");
    assert_eq!(geometry.len(), 5);
    assert_eq!(geometry.colors.len(), 5);
    assert_eq!(geometry.positions[2], Vec3::new(2.0, 3.0, 2.0));
    assert_eq!(geometry.colors[4], Vec3::ONE);
    assert_eq!(geometry.index_width(), IndexWidth::Narrow);
    assert!(geometry.indices.iter().eq(0..5u32));
    assert!(geometry.bounds.contains(Vec3::new(25.0, -5.5, 0.25)));
}

#[test]
fn import_empty_fixture() {
    let importer = Importer::new(PtsFileSource::new());
    let geometry = importer
        .import_point_cloud(fixture("empty.pts"), &Mat4::IDENTITY)
        .unwrap();

    assert!(geometry.is_empty());
    assert!(geometry.indices.is_empty());
}

#[test]
fn import_bad_fixture_fails() {
    let importer = Importer::new(PtsFileSource::new());
    let result = importer.import_point_cloud(fixture("bad_color.pts"), &Mat4::IDENTITY);

    assert!(matches!(result, Err(ImportError::ParseFailed { .. })));
    assert!(matches!(
        importer.source().take_last_error(),
        Some(PtsError::InvalidValue {
            line: 3,
            field: "green",
            ..
        })
    ));
}
