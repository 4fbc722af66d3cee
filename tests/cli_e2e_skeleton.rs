//! End-to-end tests for the `kickoff skeleton` subcommands.

mod common;

use common::prelude::*;

fn fixture() -> TestFixture {
    TestFixture::new()
        .with_skeleton("skeletons", "base", markers::BASE)
        .with_file("skeletons/base/LICENSE", "license text")
        .with_skeleton("skeletons", "child", markers::CHILD)
        .with_file("skeletons/child/src/main.rs", "fn main() {}")
        .with_skeleton("skeletons", "lang/go", markers::EMPTY)
        .with_skeleton("other", "tool", "description: Other tool\n")
        .with_repository("default", "skeletons")
        .with_repository("other", "other")
}

#[test]
fn test_skeleton_list() {
    fixture()
        .command()
        .args(["skeleton", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default:base"))
        .stdout(predicate::str::contains("Base skeleton"))
        .stdout(predicate::str::contains("default:child"))
        .stdout(predicate::str::contains("default:lang/go"))
        .stdout(predicate::str::contains("other:tool"))
        .stdout(predicate::str::contains("4 skeleton(s)"));
}

#[test]
fn test_skeleton_list_single_repository() {
    fixture()
        .command()
        .args(["skeleton", "list", "--repository", "other"])
        .assert()
        .success()
        .stdout(predicate::str::contains("other:tool"))
        .stdout(predicate::str::contains("default:base").not());
}

#[test]
fn test_skeleton_list_json() {
    let output = fixture()
        .command()
        .args(["skeleton", "list", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["default:base", "default:child", "default:lang/go", "other:tool"]
    );
    assert_eq!(entries[0]["repository"], "default");
    assert_eq!(entries[3]["description"], "Other tool");
}

#[test]
fn test_skeleton_list_unknown_repository() {
    fixture()
        .command()
        .args(["skeleton", "list", "--repository", "otehr"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown repository alias: otehr"))
        .stderr(predicate::str::contains("Did you mean 'other'?"));
}

#[test]
fn test_skeleton_list_without_repositories() {
    TestFixture::new()
        .command()
        .args(["skeleton", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No skeleton repositories are configured"));
}

#[test]
fn test_skeleton_show_text() {
    fixture()
        .command()
        .args(["skeleton", "show", "child"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Skeleton: default:child"))
        .stdout(predicate::str::contains("Description: Child skeleton"))
        .stdout(predicate::str::contains("provider: gitlab"))
        .stdout(predicate::str::contains("greeting: hello"))
        .stdout(predicate::str::contains("LICENSE (inherited)"))
        .stdout(predicate::str::contains("src/main.rs"))
        .stdout(predicate::str::contains("Inheritance:"))
        .stdout(predicate::str::contains("default:child @ "))
        .stdout(predicate::str::contains("base @ "));
}

#[test]
fn test_skeleton_show_json() {
    let output = fixture()
        .command()
        .args(["skeleton", "show", "default:child", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["name"], "default:child");
    assert_eq!(view["values"]["ci"]["provider"], "gitlab");
    assert_eq!(view["values"]["greeting"], "hello");
    assert_eq!(view["parents"].as_array().unwrap().len(), 1);

    let license = view["files"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["path"] == "LICENSE")
        .unwrap();
    assert_eq!(license["inherited"], true);
}

#[test]
fn test_skeleton_show_yaml() {
    let output = fixture()
        .command()
        .args(["skeleton", "show", "base", "-o", "yaml"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let view: serde_yaml::Value = serde_yaml::from_slice(&output.stdout).unwrap();
    assert_eq!(view["description"], serde_yaml::Value::from("Base skeleton"));
    assert!(view["parents"].as_sequence().unwrap().is_empty());
}

#[test]
fn test_skeleton_show_missing() {
    fixture()
        .command()
        .args(["skeleton", "show", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Skeleton 'nope' not found"))
        .stderr(predicate::str::contains("kickoff skeleton list"));
}

#[test]
fn test_skeleton_create() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["skeleton", "create", "skeletons/new"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created skeleton"));

    fixture
        .child("skeletons/new/.kickoff.yaml")
        .assert(predicate::path::is_file());
    fixture
        .child("skeletons/new/README.md.skel")
        .assert(predicate::str::contains("{{ Project.Name }}"));

    fixture
        .command()
        .args(["skeleton", "create", "skeletons/new"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("A skeleton already exists"));
}

#[test]
fn test_skeleton_create_then_use() {
    let fixture = TestFixture::new();
    fixture
        .command()
        .args(["skeleton", "create", "skeletons/fresh"])
        .assert()
        .success();
    let fixture = fixture.with_repository("default", "skeletons");

    fixture
        .command()
        .args(["create", "demo", "-s", "fresh", "--no-git", "--author", "Jane Doe"])
        .args(["--owner", "jane"])
        .assert()
        .success();

    fixture
        .child("demo/README.md")
        .assert(predicate::str::contains("# demo"))
        .assert(predicate::str::contains("https://github.com/jane/demo"));
}
