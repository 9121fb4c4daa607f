use std::fs;

use vibs_io::{IoError, JobConfig, compare_reports, load_config, load_report, run_job};
use vibs_solver::{ModalError, mac_matrix};

#[test]
fn beam_job_writes_all_outputs() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config_path = dir.path().join("job.toml");
    fs::write(
        &config_path,
        r#"
            name = "beam2dof"

            [frf]
            start = 0.0
            stop = 25.0
            points = 101
            output_dof = 0
            input_dof = 1
        "#,
    )
    .expect("write config");

    let config = load_config(&config_path).expect("config should parse");
    let mut summary = Vec::new();
    let run = run_job(&config, dir.path(), &mut summary).expect("job should run");

    let text = String::from_utf8(summary).unwrap();
    assert!(text.contains("job: beam2dof"));

    let report = load_report(&run.outputs.report).expect("report should load");
    assert_eq!(report.job_name, "beam2dof");
    assert_eq!(report.modes.len(), 2);
    assert!((report.modes[0].natural_frequency - 11.583).abs() < 1e-3);
    assert!((report.modes[1].natural_frequency - 12.037).abs() < 1e-3);

    let frf = fs::read_to_string(&run.outputs.frf).expect("frf csv");
    assert_eq!(frf.lines().count(), 102);
    assert_eq!(frf.lines().next(), Some("frequency,real,imag,magnitude_db"));

    let shapes = fs::read_to_string(&run.outputs.shapes).expect("shape csv");
    assert_eq!(shapes.lines().count(), 7);
}

#[test]
fn saved_report_matches_live_mode_shapes() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = JobConfig::default();
    let run = run_job(&config, dir.path(), &mut std::io::sink()).expect("job should run");

    let report = load_report(&run.outputs.report).expect("report should load");
    let saved = report.mode_shapes().expect("shapes");
    let mac = mac_matrix(&saved, &run.results.modes.mode_shapes).unwrap();
    for i in 0..2 {
        assert!((mac[(i, i)] - 1.0).abs() < 1e-12);
    }
    assert!(mac[(0, 1)] < 1e-12);
}

#[test]
fn matrix_job_with_bad_dof_fails_before_frf_output() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = JobConfig::from_toml_str(
        r#"
            name = "chain"

            [model]
            kind = "matrices"
            mass = [[1.0, 0.0], [0.0, 1.0]]
            stiffness = [[2.0, -1.0], [-1.0, 1.0]]

            [frf]
            points = 5
            output_dof = 2
        "#,
    )
    .unwrap();

    let err = run_job(&config, dir.path(), &mut std::io::sink()).unwrap_err();
    assert!(matches!(err, IoError::Modal(_)));
    assert!(!dir.path().join("chain_frf.csv").exists());
}

#[test]
fn free_free_job_fails_instead_of_writing_nan() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = JobConfig::from_toml_str(
        r#"
            name = "free"

            [model]
            kind = "beam"
            left_spring_scale = 0.0
            right_spring_scale = 0.0
        "#,
    )
    .unwrap();

    let err = run_job(&config, dir.path(), &mut std::io::sink()).unwrap_err();
    assert!(matches!(err, IoError::Modal(ModalError::RigidBodyMode { mode: 0 })));
    assert!(!dir.path().join("free_frf.csv").exists());
}

#[test]
fn comparing_stiffened_beam_pairs_every_mode() {
    let dir = tempfile::tempdir().expect("temp dir");
    let base = JobConfig {
        name: "base".to_string(),
        ..JobConfig::default()
    };
    let stiff = JobConfig::from_toml_str(
        r#"
            name = "stiff"

            [model]
            kind = "beam"
            left_spring_scale = 600.0
            right_spring_scale = 600.0
        "#,
    )
    .unwrap();
    let a = run_job(&base, dir.path(), &mut std::io::sink()).unwrap();
    let b = run_job(&stiff, dir.path(), &mut std::io::sink()).unwrap();

    let mut out = Vec::new();
    let pairs = compare_reports(&a.outputs.report, &b.outputs.report, &mut out).unwrap();
    assert_eq!(pairs, vec![(0, 0), (1, 1)]);

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with(" MAC (2x2)"));
    assert!(text.contains("mode 2 -> mode 2 (MAC 1.00000)"));
}
