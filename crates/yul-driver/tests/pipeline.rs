use std::fs;

use yul_driver::{
    load_module, optimise_file, write_module, DriverError, OptimiserSettings, SETTINGS_FILE_NAME,
};
use yul_ir::builders::*;

fn sample_module() -> yul_ir::Block {
    block(vec![
        function("id", &["x"], &["y"], vec![assign(&["y"], ident("x"))]),
        nested(vec![let_(&["r"], Some(call("id", vec![number("5")])))]),
    ])
}

#[test]
fn module_written_to_disk_is_optimised_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("module.json");
    write_module(&input, &sample_module()).expect("write module");
    assert_eq!(load_module(&input).expect("load module"), sample_module());

    let output = optimise_file(&input, &OptimiserSettings::default()).expect("optimise");
    assert_eq!(
        output.statements[1].to_string(),
        "{\n    let id_x := 5\n    let id_y\n    {\n        id_y := id_x\n    }\n    let r := id_y\n}"
    );
}

#[test]
fn settings_are_discovered_next_to_the_module() {
    let dir = tempfile::tempdir().expect("tempdir");
    assert_eq!(
        OptimiserSettings::discover(dir.path()).expect("defaults"),
        OptimiserSettings::default()
    );

    fs::write(dir.path().join(SETTINGS_FILE_NAME), "steps = []\n").expect("write settings");
    let settings = OptimiserSettings::discover(dir.path()).expect("settings");
    assert!(settings.steps.is_empty());

    let input = dir.path().join("module.json");
    write_module(&input, &sample_module()).expect("write module");
    assert_eq!(
        optimise_file(&input, &settings).expect("optimise"),
        sample_module()
    );
}

#[test]
fn malformed_module_is_reported_as_json_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("broken.json");
    fs::write(&input, "{ \"statements\": [ { \"kind\": \"Goto\" } ] }").expect("write");

    let err = load_module(&input).expect_err("unknown statement kind");
    assert!(matches!(err, DriverError::Json(_)), "got {err:?}");
}

#[test]
fn missing_module_is_reported_as_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load_module(&dir.path().join("absent.json")).expect_err("missing file");
    assert!(matches!(err, DriverError::Io(_)), "got {err:?}");
}
