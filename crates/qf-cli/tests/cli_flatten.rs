//! End-to-end tests of the `qf` binary.
//!
//! Runs the binary against JSON lines files in a temporary directory, with
//! `HOME` pointed there so no user configuration leaks in.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn qf_binary() -> String {
    env!("CARGO_BIN_EXE_qf").to_string()
}

fn qf(home: &Path, args: &[&str]) -> Output {
    Command::new(qf_binary())
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("QF_TIME_ZONE")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run qf")
}

fn quay(id: &str, public_code: &str, priority: u32, start: &str, end: Option<&str>) -> String {
    let end = end.map_or_else(String::new, |end| format!(r#","validityEnd":["{end}"]"#));
    let private_code = format!(r#"{{"type":"HSL/JORE-4","value":"{public_code}"}}"#);
    let key_values = format!(r#"{{"priority":["{priority}"],"validityStart":["{start}"]{end}}}"#);
    format!(
        r#"{{"netexId":"{id}","version":3,"publicCode":"{public_code}","privateCode":{private_code},"keyValues":{key_values}}}"#
    )
}

fn stop_place(id: &str, quays: &[String]) -> String {
    stop_place_with_version(id, 1, quays)
}

fn stop_place_with_version(id: &str, version: i64, quays: &[String]) -> String {
    format!(
        r#"{{"netexId":"{id}","version":{version},"quays":[{}]}}"#,
        quays.join(",")
    )
}

fn parse_lines(output: &str) -> Vec<serde_json::Value> {
    output
        .lines()
        .map(|line| serde_json::from_str(line).expect("output line should be JSON"))
        .collect()
}

#[test]
fn flatten_writes_new_quay_versions() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("stops.jsonl");
    let output = temp.path().join("flat.jsonl");
    let lines = [
        stop_place(
            "HSL:StopPlace:1",
            &[
                quay("HSL:Quay:1", "H1", 10, "2024-01-01", Some("2024-12-31")),
                quay("HSL:Quay:2", "H1", 20, "2024-03-01", Some("2024-03-31")),
            ],
        ),
        stop_place_with_version(
            "HSL:StopPlace:2",
            5,
            &[r#"{"netexId":"HSL:Quay:9","version":2,"publicCode":"X"}"#.to_string()],
        ),
    ];
    std::fs::write(&input, lines.join("\n")).unwrap();

    let result = qf(
        temp.path(),
        &[
            "flatten",
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ],
    );
    assert!(
        result.status.success(),
        "qf flatten should succeed: {}",
        String::from_utf8_lossy(&result.stderr)
    );

    let places = parse_lines(&std::fs::read_to_string(&output).unwrap());
    assert_eq!(places.len(), 2);

    let quays = places[0]["quays"].as_array().unwrap();
    let ranges: Vec<(String, Option<String>)> = quays
        .iter()
        .map(|q| {
            (
                q["keyValues"]["validityStart"][0].as_str().unwrap().to_string(),
                q["keyValues"]["validityEnd"][0].as_str().map(String::from),
            )
        })
        .collect();
    assert_eq!(
        ranges,
        [
            ("2024-01-01".to_string(), Some("2024-02-29".to_string())),
            ("2024-03-01".to_string(), Some("2024-03-31".to_string())),
            ("2024-04-01".to_string(), Some("2024-12-31".to_string())),
        ]
    );
    assert!(quays.iter().all(|q| q.get("netexId").is_none()));
    assert!(quays.iter().all(|q| q["version"] == 0));

    // Stop places without JORE quays are passed through unchanged.
    assert_eq!(places[1]["quays"][0]["netexId"], "HSL:Quay:9");
    assert_eq!(places[1]["version"], 5);
}

#[test]
fn flatten_reads_stdin_and_writes_stdout() {
    use std::io::Write;
    use std::process::Stdio;

    let temp = TempDir::new().unwrap();
    let line = stop_place(
        "HSL:StopPlace:1",
        &[
            quay("HSL:Quay:1", "H1", 10, "2024-01-01", None),
            quay("HSL:Quay:2", "H1", 20, "2024-06-01", None),
        ],
    );

    let mut child = Command::new(qf_binary())
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.path().join(".config"))
        .env_remove("QF_TIME_ZONE")
        .arg("flatten")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(line.as_bytes())
        .unwrap();
    let result = child.wait_with_output().unwrap();

    assert!(result.status.success());
    let places = parse_lines(&String::from_utf8(result.stdout).unwrap());
    let quays = places[0]["quays"].as_array().unwrap();
    assert_eq!(quays.len(), 2);
    assert_eq!(quays[0]["keyValues"]["validityEnd"][0], "2024-05-31");
    // Helsinki is on daylight saving time (UTC+3) in June.
    assert_eq!(
        quays[0]["validBetween"]["toDate"],
        "2024-05-31T20:59:59.999999999Z"
    );
    assert_eq!(quays[1]["validBetween"]["fromDate"], "2024-05-31T21:00:00Z");
    assert!(quays[1]["keyValues"].get("validityEnd").is_none());
    assert!(quays[1]["validBetween"].get("toDate").is_none());
}

#[test]
fn same_priority_overlap_fails_without_output() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("stops.jsonl");
    let output = temp.path().join("flat.jsonl");
    std::fs::write(
        &input,
        stop_place(
            "HSL:StopPlace:1",
            &[
                quay("HSL:Quay:1", "H1", 10, "2024-01-01", Some("2024-06-01")),
                quay("HSL:Quay:2", "H1", 10, "2024-05-01", Some("2024-12-01")),
            ],
        ),
    )
    .unwrap();

    let result = qf(
        temp.path(),
        &[
            "flatten",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ],
    );

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(
        stderr.contains("overlapping versions with the same priority"),
        "unexpected stderr: {stderr}"
    );
    assert!(!output.exists());
}

#[test]
fn failed_run_prints_nothing_to_stdout() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("stops.jsonl");
    let lines = [
        stop_place("HSL:StopPlace:1", &[quay("HSL:Quay:1", "H1", 10, "2024-01-01", None)]),
        stop_place(
            "HSL:StopPlace:2",
            &[
                quay("HSL:Quay:2", "H2", 10, "2024-01-01", None),
                quay("HSL:Quay:3", "H2", 10, "2024-02-01", None),
            ],
        ),
    ];
    std::fs::write(&input, lines.join("\n")).unwrap();

    let result = qf(
        temp.path(),
        &["flatten", "--input", input.to_str().unwrap()],
    );

    assert!(!result.status.success());
    assert!(
        result.stdout.is_empty(),
        "partial output: {}",
        String::from_utf8_lossy(&result.stdout)
    );
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("failed to flatten stop place 2"));
}

#[test]
fn config_file_changes_draft_threshold() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("stops.jsonl");
    let config = temp.path().join("qf.toml");
    std::fs::write(&config, "[flatten]\nmax_priority = 15\n").unwrap();
    std::fs::write(
        &input,
        stop_place(
            "HSL:StopPlace:1",
            &[
                quay("HSL:Quay:1", "H1", 10, "2024-01-01", None),
                quay("HSL:Quay:2", "H1", 20, "2024-06-01", None),
            ],
        ),
    )
    .unwrap();

    let result = qf(
        temp.path(),
        &[
            "--config",
            config.to_str().unwrap(),
            "inspect",
            "--input",
            input.to_str().unwrap(),
        ],
    );

    assert!(result.status.success());
    let stdout = String::from_utf8(result.stdout).unwrap();
    assert!(stdout.contains("HSL:Quay:1"));
    assert!(!stdout.contains("HSL:Quay:2"), "draft leaked: {stdout}");
}
