use std::io::Write;
use std::process::{Command, Output, Stdio};

use tempfile::NamedTempFile;

const NEWTON: &str = "Newton's first law states that an object remains at rest or in uniform \
motion unless acted upon by a net external force. The second law states that the acceleration \
of an object is proportional to the net force acting on it and inversely proportional to its mass. \
The third law states that for every action there is an equal and opposite reaction.";

fn notes(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

fn tutor(args: &[&str], stdin: &str) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tutor"));
    for var in [
        "TUTOR_NOTES",
        "TUTOR_NUM_QUESTIONS",
        "TUTOR_MIN_CHUNK_LENGTH",
        "TUTOR_MAX_CHUNK_LENGTH",
        "TUTOR_THRESHOLD",
        "TUTOR_LOG_LEVEL",
    ] {
        cmd.env_remove(var);
    }
    let mut child = cmd
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn full_session_prints_the_summary() {
    let file = notes(NEWTON);
    let path = file.path().to_str().unwrap();
    let output = tutor(&["--notes", path, "--num-questions", "3"], "\n\n\n");

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.matches("_____").count() >= 3);
    assert!(out.contains("Question 1/3 [medium]"));
    assert!(out.contains("Difficulty: medium -> easy"));
    assert!(out.contains("Questions: 3"));
    assert!(out.contains("Correct:   0"));
    assert!(out.contains("Incorrect: 3"));
}

#[test]
fn quiet_mode_keeps_prompts_and_summary_only() {
    let file = notes(NEWTON);
    let path = file.path().to_str().unwrap();
    let output = tutor(&["--notes", path, "--num-questions", "2", "--quiet"], "\n\n");

    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(!out.contains("Question 1/2"));
    assert!(!out.contains("Not quite"));
    assert!(out.contains("_____"));
    assert!(out.contains("Session summary"));
}

#[test]
fn end_of_input_prints_a_partial_summary() {
    let file = notes(NEWTON);
    let path = file.path().to_str().unwrap();
    let output = tutor(&["--notes", path, "--num-questions", "3"], "inertia\n");

    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.contains("Input ended early"));
    assert!(out.contains("Questions: 1"));
}

#[test]
fn json_summary_reports_levels() {
    let file = notes(NEWTON);
    let path = file.path().to_str().unwrap();
    let output = tutor(
        &["--notes", path, "--num-questions", "1", "--quiet", "--format", "json"],
        "\n",
    );

    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    let json = &out[out.find('{').unwrap()..];
    let value: serde_json::Value = serde_json::from_str(json).unwrap();
    assert_eq!(value["total"], 1);
    assert_eq!(value["ended_early"], false);
    assert_eq!(value["levels"][1]["attempts"], 1);
}

#[test]
fn missing_notes_file_exits_with_2() {
    let output = tutor(&["--notes", "/definitely/not/here.txt"], "");
    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert_eq!(err.matches("cannot read notes file").count(), 1);
    assert_eq!(err.matches("No such file or directory").count(), 1, "stderr: {err}");
}

#[test]
fn invalid_numbers_exit_with_2() {
    let file = notes(NEWTON);
    let path = file.path().to_str().unwrap();

    let zero = tutor(&["--notes", path, "--num-questions", "0"], "");
    assert_eq!(zero.status.code(), Some(2));
    assert_eq!(
        stderr(&zero).matches("number of questions must be at least 1").count(),
        1
    );

    let inverted = tutor(
        &["--notes", path, "--min-chunk-length", "300", "--max-chunk-length", "100"],
        "",
    );
    assert_eq!(inverted.status.code(), Some(2));

    let threshold = tutor(&["--notes", path, "--threshold", "1.5"], "");
    assert_eq!(threshold.status.code(), Some(2));
}

#[test]
fn corpus_problems_exit_with_1() {
    let blank = notes("   \n\n  ");
    let output = tutor(&["--notes", blank.path().to_str().unwrap()], "");
    assert_eq!(output.status.code(), Some(1));

    let file = notes(NEWTON);
    let output = tutor(
        &[
            "--notes",
            file.path().to_str().unwrap(),
            "--topic",
            "photosynthesis",
            "--strict-topic",
        ],
        "",
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("photosynthesis"));
}
