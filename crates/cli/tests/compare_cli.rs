// Integration tests for the `concord` binary.
// Run with: cargo test -p concord-cli --test compare_cli

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const REVIEWER1: &str = "\
Path\tVerdict\tConfidence
img/001\tnormal\thigh
img/002\tnormal\thigh
img/003\t\tlow
";

const REVIEWER2: &str = "\
Path\tVerdict\tConfidence
img/001\tnormal\thigh
img/002\tdouble-expansion\tborderline
img/004\tnormal\thigh
";

fn concord(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_concord"));
    cmd.current_dir(dir);
    cmd.env_remove("CONCORD_CONFIG");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn workspace(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

fn run(dir: &Path, args: &[&str]) -> Output {
    concord(dir).args(args).output().expect("failed to run concord")
}

fn assert_code(output: &Output, code: i32) {
    assert_eq!(
        output.status.code(),
        Some(code),
        "expected exit {code}, got {:?}\nstdout: {}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr),
    );
}

#[test]
fn default_schema_writes_sorted_combined_table() {
    let dir = workspace(&[("r1.tsv", REVIEWER1), ("r2.tsv", REVIEWER2)]);
    let output = run(dir.path(), &["r1.tsv", "r2.tsv"]);
    assert_code(&output, 0);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Discordance score = 3:"), "stdout: {stdout}");
    assert!(stdout.contains("Wrote 4 rows to combined.tsv"), "stdout: {stdout}");

    let combined = fs::read_to_string(dir.path().join("combined.tsv")).unwrap();
    let lines: Vec<&str> = combined.lines().collect();
    assert_eq!(
        lines[0],
        "Path\tVerdict 1\tConfidence 1\tVerdict 2\tConfidence 2\tDiscordant Verdict\tDiscordance Score\tDiscordance Text"
    );
    assert_eq!(
        lines[1],
        "img/002\tnormal\thigh\tdouble-expansion\tborderline\t1\t3\tdifferent verdict, one high confidence"
    );
    assert_eq!(
        lines[2],
        "img/001\tnormal\thigh\tnormal\thigh\t0\t0\tsame verdict, both high confidence"
    );
    assert_eq!(lines.len(), 5);
}

#[test]
fn disjoint_tables_exit_4_without_output() {
    let other = "Path\tVerdict\tConfidence\nimg/900\tnormal\thigh\n";
    let dir = workspace(&[("r1.tsv", REVIEWER1), ("other.tsv", other)]);
    let output = run(dir.path(), &["r1.tsv", "other.tsv"]);
    assert_code(&output, 4);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("0 overlap"), "stderr: {stderr}");
    assert!(!dir.path().join("combined.tsv").exists());
}

#[test]
fn nothing_to_compare_exits_5_without_output() {
    let a = "Path\tRating\nscan-a\t5\n";
    let b = "Path\tScore\nscan-a\t3\n";
    let dir = workspace(&[("a.tsv", a), ("b.tsv", b)]);
    let output = run(dir.path(), &["a.tsv", "b.tsv", "-o", "out.tsv"]);
    assert_code(&output, 5);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("shared columns between the 2 tables were: (none)"),
        "stderr: {stderr}"
    );
    assert!(!dir.path().join("out.tsv").exists());
}

#[test]
fn missing_input_exits_3() {
    let dir = workspace(&[("r1.tsv", REVIEWER1)]);
    let output = run(dir.path(), &["r1.tsv", "nope.tsv"]);
    assert_code(&output, 3);
}

#[test]
fn missing_input_is_reported_before_schema_is_fetched() {
    let dir = workspace(&[("r1.tsv", REVIEWER1)]);
    // Nothing listens on port 9; a schema fetch would fail with exit 5.
    let output = run(
        dir.path(),
        &["r1.tsv", "nope.tsv", "-j", "http://127.0.0.1:9/form.json"],
    );
    assert_code(&output, 3);
}

#[test]
fn wrong_identifier_column_exits_4() {
    let dir = workspace(&[("r1.tsv", REVIEWER1), ("r2.tsv", REVIEWER2)]);
    let output = run(dir.path(), &["r1.tsv", "r2.tsv", "--id-column", "Image"]);
    assert_code(&output, 4);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--id-column"), "stderr: {stderr}");
}

#[test]
fn equal_suffixes_exit_5() {
    let dir = workspace(&[("r1.tsv", REVIEWER1), ("r2.tsv", REVIEWER2)]);
    let output = run(dir.path(), &["r1.tsv", "r2.tsv", "--s1", "x", "--s2", "x"]);
    assert_code(&output, 5);
}

#[test]
fn missing_positional_is_usage_error() {
    let dir = workspace(&[]);
    let output = run(dir.path(), &["only-one.tsv"]);
    assert_code(&output, 2);
}

#[test]
fn dry_run_writes_nothing() {
    let dir = workspace(&[("r1.tsv", REVIEWER1), ("r2.tsv", REVIEWER2)]);
    let output = run(dir.path(), &["r1.tsv", "r2.tsv", "--dry-run"]);
    assert_code(&output, 0);
    assert!(!dir.path().join("combined.tsv").exists());
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Wrote"));
}

#[test]
fn json_summary_on_stdout() {
    let dir = workspace(&[("r1.tsv", REVIEWER1), ("r2.tsv", REVIEWER2)]);
    let output = run(dir.path(), &["r1.tsv", "r2.tsv", "--json", "-o", "out.tsv"]);
    assert_code(&output, 0);

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["plan"]["schema"], "default");
    assert_eq!(value["summary"]["discordance"]["score_sum"], 3);
    assert_eq!(value["meta"]["overlap"], 2);
    assert_eq!(value["rows_written"], 4);
    assert_eq!(value["discordant_rows"], 1);
    assert_eq!(value["output"], "out.tsv");
    assert!(dir.path().join("out.tsv").exists());
}

#[test]
fn config_file_sets_suffixes_and_output() {
    let config = "suffix1 = \"alice\"\nsuffix2 = \"bob\"\nsuffix_delimiter = \"_\"\noutput = \"from-config.tsv\"\n";
    let dir = workspace(&[
        ("r1.tsv", REVIEWER1),
        ("r2.tsv", REVIEWER2),
        ("concord.toml", config),
    ]);
    let output = run(dir.path(), &["r1.tsv", "r2.tsv", "-c", "concord.toml", "--s2", "carol"]);
    assert_code(&output, 0);

    let combined = fs::read_to_string(dir.path().join("from-config.tsv")).unwrap();
    let header = combined.lines().next().unwrap();
    assert!(header.starts_with("Path\tVerdict_alice\tConfidence_alice\tVerdict_carol"), "{header}");
}

#[test]
fn bad_config_exits_5() {
    let dir = workspace(&[
        ("r1.tsv", REVIEWER1),
        ("r2.tsv", REVIEWER2),
        ("concord.toml", "unknown_key = 1\n"),
    ]);
    let output = run(dir.path(), &["r1.tsv", "r2.tsv", "--config", "concord.toml"]);
    assert_code(&output, 5);
}

#[test]
fn form_schema_restricts_generic_columns() {
    let a = "Path\tRating:\tQuality\nscan-a\t5\tgood\nscan-b\t3\tpoor\n";
    let b = "Path\tRating:\tQuality\nscan-a\t5\tpoor\nscan-b\t2\tpoor\n";
    let form = r#"[{"columnName": "Rating:", "type": "radio"}]"#;
    let dir = workspace(&[("a.tsv", a), ("b.tsv", b), ("form.json", form)]);
    let output = run(dir.path(), &["a.tsv", "b.tsv", "-j", "form.json"]);
    assert_code(&output, 0);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("1 out of 2 (50.0%) \"Rating\" responses agreed between the two tables:"),
        "stdout: {stdout}"
    );

    let combined = fs::read_to_string(dir.path().join("combined.tsv")).unwrap();
    let header = combined.lines().next().unwrap();
    assert!(header.ends_with("Rating: diff\tRating: diff score"), "{header}");
    assert!(!header.contains("Quality diff"));
}

#[test]
fn xlsx_output_is_a_workbook() {
    let dir = workspace(&[("r1.tsv", REVIEWER1), ("r2.tsv", REVIEWER2)]);
    let output = run(dir.path(), &["r1.tsv", "r2.tsv", "-o", "combined.xlsx"]);
    assert_code(&output, 0);

    let bytes = fs::read(dir.path().join("combined.xlsx")).unwrap();
    // XLSX is a zip archive
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn ods_output_path_gets_tsv() {
    let dir = workspace(&[("r1.tsv", REVIEWER1), ("r2.tsv", REVIEWER2)]);
    let output = run(dir.path(), &["r1.tsv", "r2.tsv", "-o", "combined.ods"]);
    assert_code(&output, 0);

    let combined = fs::read_to_string(dir.path().join("combined.ods")).unwrap();
    assert!(combined.starts_with("Path\tVerdict 1\t"), "{combined}");
}
