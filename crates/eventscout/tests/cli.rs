use assert_cmd::prelude::*;
use assert_fs::prelude::*;

use predicates::prelude::*;
use predicates::str::contains;
use std::process::Command;

const SAMPLE_EVENTS: &str = include_str!("../data/sample_events.csv");

/// Temp directory holding the sample dataset and a config pointing at it
fn workspace() -> assert_fs::TempDir {
  let temp = assert_fs::TempDir::new().unwrap();
  temp.child("events.csv").write_str(SAMPLE_EVENTS).unwrap();
  temp
    .child("eventscout.json")
    .write_str(r#"{ "dataset": "events.csv", "model": "model.json" }"#)
    .unwrap();
  temp
}

/// Helper to create a Command for the `eventscout` binary using the workspace config.
fn eventscout_cmd(temp: &assert_fs::TempDir) -> Command {
  let mut cmd = Command::cargo_bin("eventscout").expect("binary exists");
  cmd.arg("--config").arg(temp.path().join("eventscout.json"));
  cmd.env("CLICOLOR", "0").env_remove("RUST_LOG").env_remove("EVENTSCOUT_CONFIG");
  cmd
}

fn json_output(cmd: &mut Command) -> serde_json::Value {
  let output = cmd.output().unwrap();
  assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
  serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_recommend_lists_matching_events() {
  let temp = workspace();

  eventscout_cmd(&temp)
    .args(["recommend", "jazz", "quartet"])
    .assert()
    .success()
    .stdout(contains("Event Recommendation System").and(contains("Jazz Under the Stars")));
}

#[test]
fn test_recommend_with_province_filter() {
  let temp = workspace();

  let json =
    json_output(eventscout_cmd(&temp).args(["recommend", "live", "music", "--province", "Gauteng", "--json"]));

  assert_eq!(json["page"], "filtering");
  let cards = json["cards"].as_array().unwrap();
  assert!(!cards.is_empty());
  assert!(cards.iter().all(|card| card["province"] == "Gauteng"));
  assert_eq!(json["selection"]["values"]["province"][0], "Gauteng");
}

#[test]
fn test_recommend_free_events_only() {
  let temp = workspace();

  let json = json_output(eventscout_cmd(&temp).args(["recommend", "community", "--price", "free", "--json"]));

  let cards = json["cards"].as_array().unwrap();
  assert!(!cards.is_empty());
  assert!(cards.iter().all(|card| card["price"] == "R 0.00"));
}

#[test]
fn test_recommend_sorts_by_price() {
  let temp = workspace();

  let json = json_output(eventscout_cmd(&temp).args(["recommend", "music", "--price", "ascending", "--json"]));

  let ids: Vec<&str> =
    json["cards"].as_array().unwrap().iter().map(|card| card["event_id"].as_str().unwrap()).collect();
  assert_eq!(ids.first(), Some(&"1010"));
  assert_eq!(ids.last(), Some(&"1012"));
}

#[test]
fn test_recommend_without_matches() {
  let temp = workspace();

  eventscout_cmd(&temp)
    .args(["recommend", "zzzz"])
    .assert()
    .success()
    .stdout(contains("No events to show."))
    .stderr(contains("No events matched"));
}

#[test]
fn test_show_event_details() {
  let temp = workspace();

  eventscout_cmd(&temp)
    .args(["show", "1001"])
    .assert()
    .success()
    .stdout(
      contains("Jazz Under the Stars")
        .and(contains("Price: R 180.00"))
        .and(contains("Organiser: Jozi Jazz Collective"))
        .and(contains("Emmarentia Dam, Johannesburg"))
        .and(contains("openstreetmap.org/directions"))
        .and(contains("Lat: -26.1627").not()),
    );
}

#[test]
fn test_show_event_without_coordinates_has_no_map() {
  let temp = workspace();

  let json = json_output(eventscout_cmd(&temp).args(["show", "1011", "--json"]));

  assert_eq!(json["page"], "event_details");
  assert!(json["location"].is_null());
}

#[test]
fn test_show_unknown_event_fails() {
  let temp = workspace();

  eventscout_cmd(&temp).args(["show", "9999"]).assert().failure().stderr(contains("not found"));
}

#[test]
fn test_options_in_first_appearance_order() {
  let temp = workspace();

  let json = json_output(eventscout_cmd(&temp).args(["options", "--json"]));

  let provinces = json["dimensions"]
    .as_array()
    .unwrap()
    .iter()
    .find(|dimension| dimension["dimension"] == "province")
    .unwrap();
  assert_eq!(
    provinces["values"],
    serde_json::json!(["Gauteng", "Western Cape", "KwaZulu-Natal", "Mpumalanga", "Free State"])
  );
  assert_eq!(json["price_modes"], serde_json::json!(["None", "Ascending", "Descending", "Free Events"]));
}

#[test]
fn test_index_writes_model_once() {
  let temp = workspace();

  eventscout_cmd(&temp).args(["index"]).assert().success().stdout(contains("Saved model"));
  temp.child("model.json").assert(predicate::path::exists());

  eventscout_cmd(&temp).args(["index"]).assert().success().stdout(contains("already exists"));
  eventscout_cmd(&temp).args(["index", "--force"]).assert().success().stdout(contains("Saved model"));

  // Recommendations now come from the saved model
  eventscout_cmd(&temp)
    .args(["recommend", "wine", "tasting"])
    .assert()
    .success()
    .stdout(contains("Stellenbosch Wine Tasting"));
}

#[test]
fn test_dataset_flag_overrides_config() {
  let temp = workspace();
  temp.child("other.csv").write_str(",Event_id,Event_name,Content\n0,1,Chess Club,Weekly chess games\n").unwrap();

  eventscout_cmd(&temp)
    .arg("--dataset")
    .arg(temp.path().join("other.csv"))
    .args(["recommend", "chess"])
    .assert()
    .success()
    .stdout(contains("Chess Club"));
}

#[test]
fn test_missing_dataset_fails() {
  let temp = assert_fs::TempDir::new().unwrap();
  temp.child("eventscout.json").write_str(r#"{ "dataset": "missing.csv" }"#).unwrap();

  eventscout_cmd(&temp)
    .args(["options"])
    .assert()
    .failure()
    .stderr(contains("Failed to load events"));
}

#[test]
fn test_recommend_requires_terms() {
  let temp = workspace();

  eventscout_cmd(&temp).args(["recommend"]).assert().failure();
}
