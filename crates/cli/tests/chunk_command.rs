use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

#[allow(deprecated)]
fn semchunk() -> Command {
    let mut cmd = Command::cargo_bin("semchunk").expect("binary");
    cmd.arg("--quiet");
    cmd
}

fn run_json(cmd: &mut Command) -> (bool, Value) {
    let output = cmd.output().expect("command run");
    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    (output.status.success(), body)
}

fn setup_project() -> tempfile::TempDir {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(
        root.join("src/lib.rs"),
        "pub fn greet(name: &str) -> String {\n    format!(\"hi {name}\")\n}\n\npub struct Greeter;\n",
    )
    .unwrap();
    fs::write(
        root.join("tool.py"),
        "@cli\ndef main(argv, verbose=False):\n    return 0\n",
    )
    .unwrap();
    fs::write(root.join("README.md"), "# project\n").unwrap();
    temp
}

#[test]
fn chunks_a_directory_in_path_order() {
    let temp = setup_project();
    let (ok, body) = run_json(semchunk().arg("chunk").arg(temp.path()));
    assert!(ok, "{body}");

    let files = body.as_array().unwrap();
    assert_eq!(files.len(), 2, "README is not a source file");
    assert!(files[0]["path"].as_str().unwrap().ends_with("lib.rs"));
    assert_eq!(files[0]["language"], "rust");
    assert!(files[1]["path"].as_str().unwrap().ends_with("tool.py"));

    let rust_chunks = files[0]["chunks"].as_array().unwrap();
    assert_eq!(rust_chunks.len(), 2);
    assert_eq!(rust_chunks[0]["kind"], "function_item");
    assert_eq!(rust_chunks[0]["metadata"]["name"], "greet");
    assert_eq!(rust_chunks[0]["metadata"]["return_type"], "String");
    assert_eq!(rust_chunks[0]["start_line"], 1);

    let python = &files[1]["chunks"][0];
    assert_eq!(python["metadata"]["decorators"], serde_json::json!(["@cli"]));
    assert_eq!(python["metadata"]["param_count"], 2);
}

#[test]
fn stats_flag_adds_per_file_stats() {
    let temp = setup_project();
    let (ok, body) = run_json(
        semchunk()
            .arg("chunk")
            .arg("--stats")
            .arg(temp.path().join("src/lib.rs")),
    );
    assert!(ok);
    assert_eq!(body[0]["stats"]["total_chunks"], 2);
    assert_eq!(body[0]["stats"]["by_node_type"]["struct_item"], 1);
}

#[test]
fn failing_file_is_reported_without_dropping_others() {
    let temp = setup_project();
    let broken = temp.path().join("broken.py");
    fs::write(&broken, "def broken(:\n").unwrap();

    let (ok, body) = run_json(
        semchunk()
            .arg("chunk")
            .arg(&broken)
            .arg(temp.path().join("tool.py")),
    );
    assert!(!ok, "a failed file makes the run fail");
    assert!(body[0]["error"].as_str().unwrap().contains("Parse error"));
    assert_eq!(body[0]["chunks"], serde_json::json!([]));
    assert!(body[1].get("error").is_none());
    assert_eq!(body[1]["chunks"][0]["metadata"]["name"], "main");
}

#[test]
fn language_override_applies_to_explicit_files() {
    let temp = setup_project();
    let script = temp.path().join("script.txt");
    fs::write(&script, "def run(task):\n    return task\n").unwrap();

    let (ok, body) = run_json(
        semchunk()
            .args(["chunk", "--language", "python"])
            .arg(&script)
            .arg(temp.path()),
    );
    assert!(ok, "{body}");
    let files = body.as_array().unwrap();
    assert_eq!(files.len(), 2, "only python files are picked from the walk");
    assert_eq!(files[0]["chunks"][0]["metadata"]["name"], "run");
    assert!(files[1]["path"].as_str().unwrap().ends_with("tool.py"));
}

#[test]
fn unknown_language_is_rejected_up_front() {
    let temp = setup_project();
    semchunk()
        .args(["chunk", "--language", "cobol"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown language `cobol`"));
}

#[test]
fn config_file_limits_languages() {
    let temp = setup_project();
    let config = temp.path().join("semchunk.toml");
    fs::write(&config, "supported_languages = [\"python\"]\n").unwrap();

    let (ok, body) = run_json(
        semchunk()
            .arg("chunk")
            .arg("--config")
            .arg(&config)
            .arg(temp.path().join("src/lib.rs")),
    );
    assert!(!ok);
    assert!(body[0]["error"].as_str().unwrap().contains("Unknown language: rust"));
}

#[test]
fn invalid_config_fails_the_run() {
    let temp = setup_project();
    let config = temp.path().join("bad.toml");
    fs::write(&config, "max_file_bytes = \"lots\"\n").unwrap();

    semchunk()
        .arg("chunk")
        .arg("--config")
        .arg(&config)
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn languages_lists_registered_plugins() {
    let (ok, body) = run_json(semchunk().arg("languages"));
    assert!(ok);
    let ids: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|lang| lang["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["python", "rust", "sindarin"]);
    assert_eq!(body[2]["bundled_parser"], false);
    assert!(body[2]["splittable"]
        .as_array()
        .unwrap()
        .contains(&Value::from("native_function_declaration")));
}
