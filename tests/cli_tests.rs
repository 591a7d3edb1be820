use std::fs;
use std::process::Command;

fn linktext() -> Command {
    Command::new(env!("CARGO_BIN_EXE_linktext"))
}

#[test]
fn no_arguments_prints_usage_hint() {
    let output = linktext().output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("You must pass a .html file"), "{stdout}");
}

#[test]
fn converts_file_next_to_source() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("sample.html"),
        r#"<p>Visit <a href="http://foo.com">bar</a> or <a href="faq.html">the FAQ</a>.</p>"#,
    )
    .unwrap();

    let output = linktext()
        .current_dir(dir.path())
        .args(["-o", "require_http_scheme=false", "sample.html"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("created file: sample.html.txt"), "{stdout}");

    let text = fs::read_to_string(dir.path().join("sample.html.txt")).unwrap();
    assert!(text.starts_with("Visit bar [http://foo.com/] or the FAQ [file://"), "{text}");
    assert!(text.ends_with("/faq.html]."), "{text}");
}

#[test]
fn explicit_base_url_and_options_are_applied() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("mail.html"),
        r#"<a href="unsubscribe">Unsubscribe</a> <a href="mailto:a@b.com">us</a>"#,
    )
    .unwrap();

    let status = linktext()
        .current_dir(dir.path())
        .args(["--base-url", "https://example.com/news/"])
        .args(["-o", "require_http_scheme=false", "-o", "delimiters=<>"])
        .arg("mail.html")
        .status()
        .unwrap();
    assert!(status.success());

    let text = fs::read_to_string(dir.path().join("mail.html.txt")).unwrap();
    assert_eq!(
        text,
        "Unsubscribe <https://example.com/news/unsubscribe> us <mailto:a@b.com>"
    );
}

#[test]
fn timing_reports_batch_summary() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.html"), "<p>a</p>").unwrap();
    fs::write(dir.path().join("b.html"), "<p>b</p>").unwrap();

    let output = linktext()
        .current_dir(dir.path())
        .args(["--timing", "a.html", "b.html"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("created file: a.html.txt"), "{stdout}");
    assert!(stdout.contains("created file: b.html.txt"), "{stdout}");
    assert!(stdout.contains("FLATTEN:"), "{stdout}");
    assert!(stdout.contains("Processed 2 files in "), "{stdout}");
}

#[test]
fn unknown_option_is_rejected_before_reading_files() {
    let dir = tempfile::tempdir().unwrap();
    let output = linktext()
        .current_dir(dir.path())
        .args(["-o", "colour=red", "missing.html"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown annotation option `colour`"), "{stderr}");
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let output = linktext()
        .current_dir(dir.path())
        .arg("missing.html")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read"), "{stderr}");
    assert!(stderr.contains("missing.html"), "{stderr}");
}
