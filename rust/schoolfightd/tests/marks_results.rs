use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_schoolfightd");
    let mut child = Command::new(exe)
        .env_remove("SCHOOLFIGHTD_WORKSPACE")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn schoolfightd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn send(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({ "id": id, "method": method, "params": params });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");
    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    serde_json::from_str(line.trim()).expect("parse response json")
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = send(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

const CLASSES: [&str; 6] = ["Class 1", "Class 2", "Class 3", "Class 4", "Class 5", "Class 6"];

fn all_entries(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
) -> Vec<(String, String, String, i64, i64)> {
    let mut out = Vec::new();
    for class in CLASSES {
        let report = request_ok(stdin, reader, "all", "results.class", json!({ "class": class }));
        for term in report["terms"].as_array().expect("terms") {
            for row in term["subjects"].as_array().expect("subjects") {
                out.push((
                    class.to_string(),
                    term["term"].as_str().unwrap_or("").to_string(),
                    row["subject"].as_str().unwrap_or("").to_string(),
                    row["total"].as_i64().unwrap_or(-1),
                    row["obtained"].as_i64().unwrap_or(-1),
                ));
            }
        }
    }
    out
}

#[test]
fn set_mark_mutates_only_the_addressed_entry() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let before = all_entries(&mut stdin, &mut reader);
    assert_eq!(before.len(), 90);

    request_ok(&mut stdin, &mut reader, "1", "view.selectClass", json!({ "class": "Class 3" }));
    let set = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "marks.set",
        json!({
            "class": "Class 3",
            "term": "First Term Exam",
            "subject": "Bangla",
            "field": "obtained",
            "value": "95"
        }),
    );
    assert_eq!(set["entry"], json!({ "total": 100, "obtained": 95 }));
    assert_eq!(set["parsed"]["status"], "exact");

    let after = all_entries(&mut stdin, &mut reader);
    let changed: Vec<_> = before
        .iter()
        .zip(after.iter())
        .filter(|(b, a)| b != a)
        .map(|(_, a)| a.clone())
        .collect();
    assert_eq!(
        changed,
        vec![(
            "Class 3".to_string(),
            "First Term Exam".to_string(),
            "Bangla".to_string(),
            100,
            95
        )]
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn marks_default_to_the_selected_class() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    request_ok(&mut stdin, &mut reader, "1", "view.selectClass", json!({ "class": "Class 4" }));
    let set = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "marks.set",
        json!({
            "term": "Second Term Exam",
            "subject": "Science",
            "field": "obtained",
            "value": 61,
        }),
    );
    assert_eq!(set["report"]["class"], "Class 4");
    assert_eq!(set["report"]["term"], "Second Term Exam");

    let six = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "results.term",
        json!({ "class": "Class 6", "term": "Second Term Exam" }),
    );
    assert!(six["subjects"].as_array().unwrap().iter().all(|s| s["obtained"] == 0));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn garbage_mark_input_is_stored_as_zero_and_flagged() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "marks.set",
        json!({
            "term": "First Term Exam",
            "subject": "English",
            "field": "obtained",
            "value": "77",
        }),
    );
    let set = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "marks.set",
        json!({
            "term": "First Term Exam",
            "subject": "English",
            "field": "obtained",
            "value": "abc",
        }),
    );
    assert_eq!(set["entry"]["obtained"], 0);
    assert_eq!(set["parsed"]["status"], "fallback");

    let typed_zero = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "marks.set",
        json!({
            "term": "First Term Exam",
            "subject": "English",
            "field": "obtained",
            "value": "0",
        }),
    );
    assert_eq!(typed_zero["entry"]["obtained"], 0);
    assert_eq!(typed_zero["parsed"]["status"], "exact");

    let total = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "marks.set",
        json!({ "term": "First Term Exam", "subject": "English", "field": "total", "value": "" }),
    );
    assert_eq!(total["entry"]["total"], 0);
    let english = total["report"]["subjects"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["subject"] == "English")
        .cloned()
        .unwrap();
    assert_eq!(english["grade"], "N/A");

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn unknown_names_are_reported_with_codes() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let cases = [
        (
            json!({
                "class": "Class 7",
                "term": "First Term Exam",
                "subject": "Bangla",
                "field": "obtained",
                "value": "1",
            }),
            "unknown_class",
        ),
        (
            json!({
                "term": "Fourth Term Exam",
                "subject": "Bangla",
                "field": "obtained",
                "value": "1",
            }),
            "unknown_term",
        ),
        (
            json!({
                "term": "First Term Exam",
                "subject": "Chemistry",
                "field": "obtained",
                "value": "1",
            }),
            "unknown_subject",
        ),
        (
            json!({
                "term": "First Term Exam",
                "subject": "Bangla",
                "field": "bonus",
                "value": "1",
            }),
            "unknown_field",
        ),
        (json!({ "subject": "Bangla", "field": "obtained", "value": "1" }), "bad_params"),
    ];
    for (i, (params, code)) in cases.iter().enumerate() {
        let resp = send(&mut stdin, &mut reader, &i.to_string(), "marks.set", params.clone());
        assert_eq!(resp["ok"], false);
        assert_eq!(resp["error"]["code"], *code, "case {}: {}", i, resp);
    }

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn term_aggregate_rank_and_history() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let term = "Third Term Exam";
    let obtained = [
        ("Bangla", "80"),
        ("English", "60"),
        ("Science", "70"),
        ("Mathematics", "90"),
        ("Bangladesh and Global Studies", "50"),
    ];
    for (i, (subject, value)) in obtained.iter().enumerate() {
        request_ok(
            &mut stdin,
            &mut reader,
            &format!("m{i}"),
            "marks.set",
            json!({
                "class": "Class 2",
                "term": term,
                "subject": subject,
                "field": "obtained",
                "value": value,
            }),
        );
    }
    request_ok(
        &mut stdin,
        &mut reader,
        "r",
        "ranks.set",
        json!({ "class": "Class 2", "term": term, "value": "2nd" }),
    );

    let report = request_ok(
        &mut stdin,
        &mut reader,
        "t",
        "results.term",
        json!({ "class": "Class 2", "term": term }),
    );
    assert_eq!(report["aggregate"]["total"], 500);
    assert_eq!(report["aggregate"]["obtained"], 350);
    assert_eq!(report["aggregate"]["percentageText"], "70.00");
    assert_eq!(report["aggregate"]["grade"], "A");
    assert_eq!(report["rank"], "2nd");

    let history = request_ok(&mut stdin, &mut reader, "h", "results.history", json!({}));
    let classes = history["classes"].as_array().expect("classes");
    assert_eq!(classes.len(), 5);
    let class2 = classes.iter().find(|c| c["class"] == "Class 2").expect("class 2");
    let third = &class2["terms"][2];
    assert_eq!(third["term"], term);
    assert_eq!(third["rank"], "2nd");
    assert_eq!(third["aggregate"]["grade"], "A");
    assert!(classes.iter().all(|c| c["class"] != "Class 6"));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn obtained_above_total_is_accepted_and_flagged() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "marks.set",
        json!({
            "term": "First Term Exam",
            "subject": "Mathematics",
            "field": "total",
            "value": "50",
        }),
    );
    let set = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "marks.set",
        json!({
            "term": "First Term Exam",
            "subject": "Mathematics",
            "field": "obtained",
            "value": "75",
        }),
    );
    let math = set["report"]["subjects"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["subject"] == "Mathematics")
        .cloned()
        .unwrap();
    assert_eq!(math["grade"], "A+");
    assert_eq!(math["obtainedExceedsTotal"], true);

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn view_requests_return_the_render_snapshot() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let snap = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "view.toggleTerm",
        json!({ "term": "First Term Exam" }),
    );
    assert!(snap["selection"]["term"].is_null());
    assert!(snap["report"]["terms"].as_array().unwrap().iter().all(|t| t["active"] == false));

    let snap = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "view.setTheme",
        json!({ "theme": "aurora" }),
    );
    assert_eq!(snap["theme"]["id"], "aurora");
    assert_eq!(snap["theme"]["primary"], "#10b981");

    let snap = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "view.set",
        json!({ "view": "Results History" }),
    );
    assert_eq!(snap["selection"]["view"], "Results History");

    let snap = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "view.openHistoryEntry",
        json!({ "class": "Class 1" }),
    );
    assert_eq!(snap["selection"]["class"], "Class 1");
    assert_eq!(snap["selection"]["view"], "Overview");
    assert_eq!(snap["report"]["class"], "Class 1");

    request_ok(&mut stdin, &mut reader, "5", "view.toggleMenu", json!({ "open": true }));
    let snap = request_ok(&mut stdin, &mut reader, "6", "view.openOverview", json!({}));
    assert_eq!(snap["selection"]["class"], "Class 6");
    assert_eq!(snap["selection"]["menuOpen"], false);

    let bad = send(&mut stdin, &mut reader, "7", "view.setDarkMode", json!({ "enabled": "yes" }));
    assert_eq!(bad["error"]["code"], "bad_params");
    let bad = send(&mut stdin, &mut reader, "8", "view.selectTerm", json!({}));
    assert_eq!(bad["error"]["code"], "bad_params");

    drop(stdin);
    let _ = child.wait();
}
