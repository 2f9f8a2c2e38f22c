use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("resplan-export").unwrap();
    cmd.env_remove("RESPLAN_DATASET").env_remove("RESPLAN_LOG");
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn outputs_tool_name() {
    cmd()
        .arg("-V")
        .assert()
        .success()
        .stdout(format!("resplan-export {}\n", env!("CARGO_PKG_VERSION")));
}

#[test]
fn help_succeeds() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--keep-going"));
}

#[test]
fn missing_dataset_argument_is_usage_error() {
    cmd()
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with("Error: "));
}

#[test]
fn invalid_limit_is_usage_error() {
    cmd()
        .args(["tests/fixtures/ten_plans.json", "many"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn missing_dataset_file_fails() {
    cmd()
        .arg("tests/fixtures/does_not_exist.json")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("does_not_exist.json not found"));
}

#[test]
fn exports_example_plan() {
    let out = stdout_json(cmd().arg("tests/fixtures/example_plan.json"));
    assert_eq!(
        out,
        json!([{
            "id": 0,
            "geometries": {
                "living": ["POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0))"],
                "door": ["POINT (5 0)"]
            },
            "reference_graph": {
                "nodes": [{"id": "living_0", "type": "living", "area": 100.0}],
                "edges": []
            },
            "bounds": [0.0, 0.0, 10.0, 10.0]
        }])
    );
}

#[test]
fn limit_exports_prefix() {
    let out = stdout_json(cmd().args(["tests/fixtures/ten_plans.json", "3"]));
    let ids: Vec<_> = out.as_array().unwrap().iter().map(|r| r["id"].clone()).collect();
    assert_eq!(ids, vec![json!(0), json!(1), json!(2)]);
}

#[test]
fn dataset_path_from_environment() {
    let out = stdout_json(
        cmd()
            .env("RESPLAN_DATASET", "tests/fixtures/ten_plans.json")
            .arg("--indices=4"),
    );
    assert_eq!(out.as_array().unwrap().len(), 1);
    assert_eq!(out[0]["geometries"]["wall"][0], "LINESTRING (4 0, 4 4)");
}

#[test]
fn index_past_end_is_skipped() {
    let out = stdout_json(cmd().args(["tests/fixtures/ten_plans.json", "--indices", "50,2"]));
    assert_eq!(out.as_array().unwrap().len(), 1);
    assert_eq!(out[0]["id"], 2);
}

#[test]
fn indices_conflict_with_limit() {
    cmd()
        .args(["tests/fixtures/ten_plans.json", "2", "--indices", "1"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn seeded_sample_is_repeatable() {
    let args = ["tests/fixtures/ten_plans.json", "--sample", "3", "--seed", "7"];
    let first = stdout_json(cmd().args(args));
    let second = stdout_json(cmd().args(args));
    assert_eq!(first, second);
    assert_eq!(first.as_array().unwrap().len(), 3);
}

#[test]
fn apartment_contact_graph() {
    let output = cmd().arg("tests/fixtures/apartment.json").output().unwrap();
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    let out: Value = serde_json::from_str(&text).unwrap();
    let record = &out[0];

    // Categories appear in canonical order; balcony is null and omitted.
    let positions: Vec<usize> = [
        "living", "bedroom", "bathroom", "kitchen", "door", "window", "wall", "front_door",
    ]
    .iter()
    .map(|c| text.find(&format!("\"{c}\":[")).unwrap())
    .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(!text.contains("\"balcony\""));
    assert_eq!(record["geometries"].as_object().unwrap().len(), 8);
    assert_eq!(record["geometries"]["bedroom"].as_array().unwrap().len(), 2);
    assert_eq!(record["geometries"]["wall"].as_array().unwrap().len(), 2);

    let node_ids: Vec<_> = record["reference_graph"]["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        node_ids,
        vec!["bathroom_0", "bedroom_0", "bedroom_1", "front_door_0", "kitchen_0", "living_0"]
    );

    assert_eq!(
        record["reference_graph"]["edges"],
        json!([
            {"source": "bathroom_0", "target": "bedroom_0", "type": "via_door"},
            {"source": "bedroom_0", "target": "living_0", "type": "adjacency"},
            {"source": "front_door_0", "target": "living_0", "type": "direct"},
            {"source": "kitchen_0", "target": "living_0", "type": "adjacency"}
        ])
    );
    assert_eq!(record["bounds"], json!([0.0, -0.05, 22.0, 22.0]));
}

#[test]
fn no_normalize_ignores_aliases() {
    let out = stdout_json(cmd().args(["tests/fixtures/apartment.json", "--no-normalize"]));
    let geometries = out[0]["geometries"].as_object().unwrap();
    assert!(!geometries.contains_key("living"));
    assert!(!geometries.contains_key("bedroom"));
}

#[test]
fn stored_graph_is_exported_verbatim() {
    let out = stdout_json(cmd().args(["tests/fixtures/stored_graph.json", "--graph", "stored"]));
    assert_eq!(
        out[0]["reference_graph"],
        json!({
            "nodes": [
                {"id": "3", "type": "kitchen", "area": 0.0},
                {"id": "living_0", "type": "living", "area": 16.0}
            ],
            "edges": [{"source": "3", "target": "living_0", "type": "adjacency"}]
        })
    );
}

#[test]
fn graph_none_exports_empty_graphs() {
    let out = stdout_json(cmd().args(["tests/fixtures/apartment.json", "--graph", "none"]));
    assert_eq!(out[0]["reference_graph"], json!({"nodes": [], "edges": []}));
}

#[test]
fn plan_failure_aborts_without_output() {
    cmd()
        .arg("tests/fixtures/one_bad_plan.json")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Plan 1: Malformed geometry in category 'wall'"));
}

#[test]
fn keep_going_emits_document_and_report() {
    let output = cmd()
        .args(["tests/fixtures/one_bad_plan.json", "--keep-going"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let records: Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<_> = records.as_array().unwrap().iter().map(|r| r["id"].clone()).collect();
    assert_eq!(ids, vec![json!(0), json!(2)]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[plan 1]"));
    assert!(stderr.contains("Error: 1 plan(s) failed to export"));
    // Each failure is reported once, by the report alone.
    assert_eq!(stderr.matches("Malformed geometry").count(), 1);
}

#[test]
fn output_file_and_pretty() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("bundle.json");

    cmd()
        .args(["tests/fixtures/example_plan.json", "--pretty", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("[\n  {\n    \"id\": 0,"));
}

#[test]
fn output_into_missing_directory_fails_with_path() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("no_such_dir").join("bundle.json");

    cmd()
        .args(["tests/fixtures/example_plan.json", "--output"])
        .arg(&out)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Failed to create output file"))
        .stderr(predicate::str::contains("bundle.json"));
}

#[test]
fn render_writes_one_image_per_plan() {
    let tmp = tempfile::tempdir().unwrap();
    let images = tmp.path().join("reference_images");

    cmd()
        .args(["tests/fixtures/ten_plans.json", "2", "--render", "letterboxed", "--image-dir"])
        .arg(&images)
        .assert()
        .success();

    assert!(images.join("plan_0.svg").is_file());
    assert!(images.join("plan_1.svg").is_file());
    assert!(!images.join("plan_2.svg").exists());
}

#[test]
fn render_none_writes_no_images() {
    let tmp = tempfile::tempdir().unwrap();
    let images = tmp.path().join("imgs");

    cmd()
        .args(["tests/fixtures/example_plan.json", "--image-dir"])
        .arg(&images)
        .assert()
        .success();

    assert!(!images.exists());
}
