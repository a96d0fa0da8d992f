use gcodepause_core::{Height, PauseOptions, PauseSchedule, ScheduleError};
use tempfile::TempDir;

#[test]
fn test_load_yaml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pauses.yaml");
    std::fs::write(
        &path,
        "\
2.4:
  z_offset: 5
  message: Insert nut
0.8:
  x_pause: 150
  y_pause: 150
",
    )
    .unwrap();

    let schedule = PauseSchedule::load(&path).unwrap();
    assert_eq!(schedule.len(), 2);
    assert_eq!(schedule.records()[0].height, Height::new(2.4));
    assert_eq!(schedule.records()[1].height, Height::new(0.8));

    let first = schedule.records()[0].params.resolve(&PauseOptions::default());
    assert_eq!(first.z_offset, 5.0);
    assert_eq!(first.x_pause, 10.0);
    assert_eq!(first.message.as_deref(), Some("Insert nut"));
}

#[test]
fn test_load_yml_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pauses.YML");
    std::fs::write(&path, "- height: 1\n").unwrap();

    let schedule = PauseSchedule::load(&path).unwrap();
    assert_eq!(schedule.len(), 1);
}

#[test]
fn test_load_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pauses.json");
    std::fs::write(&path, r#"{"3.2": {"message": "Swap"}, "1.6": null}"#).unwrap();

    let schedule = PauseSchedule::load(&path).unwrap();
    let heights: Vec<f64> = schedule.iter().map(|r| r.height.value()).collect();
    assert_eq!(heights, vec![3.2, 1.6]);
}

#[test]
fn test_load_unsupported_format() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pauses.csv");
    std::fs::write(&path, "1.2,5").unwrap();

    let err = PauseSchedule::load(&path).unwrap_err();
    assert!(matches!(err, ScheduleError::UnsupportedFormat(ref ext) if ext == "csv"));
}

#[test]
fn test_load_malformed_yaml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pauses.yaml");
    std::fs::write(&path, "1.2:\n  z_offset: [1, 2]\n").unwrap();

    let err = PauseSchedule::load(&path).unwrap_err();
    assert!(matches!(err, ScheduleError::Yaml(_)));
}
