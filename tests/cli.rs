use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn cody(home: &Path, args: &[&str]) -> Output {
    cody_with_stdin(home, args, "")
}

fn cody_with_stdin(home: &Path, args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_cody"))
        .args(args)
        .env("HOME", home)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("CODY_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn cody");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(input.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait for cody")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn catalog_file(home: &Path, category: &str) -> PathBuf {
    home.join(".code.d").join(format!("{category}.code"))
}

fn write_catalog(home: &Path, category: &str, content: &str) -> PathBuf {
    let path = catalog_file(home, category);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir catalog");
    fs::write(&path, content).expect("write catalog");
    path
}

#[test]
fn search_on_empty_catalog_prints_nothing() {
    let home = TempDir::new().expect("tempdir");
    fs::create_dir_all(home.path().join(".code.d")).expect("mkdir catalog root");

    let output = cody(home.path(), &["search", "anything"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "");

    let missing_root = TempDir::new().expect("tempdir");
    let output = cody(missing_root.path(), &["search"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "");
}

#[test]
fn search_prints_matching_lines() {
    let home = TempDir::new().expect("tempdir");
    write_catalog(home.path(), "test", "line one\nline two with pattern\n");

    let output = cody(home.path(), &["search", "pattern"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "line two with pattern\n");

    let output = cody(home.path(), &["search"]);
    assert_eq!(stdout(&output), "line one\nline two with pattern\n");
}

#[test]
fn search_json_includes_category_and_path() {
    let home = TempDir::new().expect("tempdir");
    write_catalog(home.path(), "work", "git@github.com:user/repo1.git\nplain-text\n");

    let output = cody(home.path(), &["search", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let rows: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json output");
    let rows = rows.as_array().expect("array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["category"], "work");
    assert_eq!(rows[0]["url"], "git@github.com:user/repo1.git");
    let expected = home.path().join("code/github.com/user/repo1");
    assert_eq!(rows[0]["path"], expected.display().to_string());
    assert!(rows[1]["path"].is_null());
}

#[test]
fn add_twice_keeps_one_line() {
    let home = TempDir::new().expect("tempdir");
    let url = "git@github.com:user/repo.git";

    let first = cody(home.path(), &["add", url, "demo"]);
    assert!(first.status.success(), "stderr: {}", stderr(&first));
    assert!(stdout(&first).contains("Entry added successfully"));

    let second = cody(home.path(), &["add", url, "demo"]);
    assert!(second.status.success(), "stderr: {}", stderr(&second));
    assert!(stdout(&second).contains("Entry already exists"));

    let content = fs::read_to_string(catalog_file(home.path(), "demo")).expect("read demo");
    assert_eq!(content, "git@github.com:user/repo.git\n");
}

#[test]
fn add_uses_configured_default_category() {
    let home = TempDir::new().expect("tempdir");
    let url = "git@github.com:user/repo.git";

    let output = cody(home.path(), &["add", url]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(catalog_file(home.path(), "default").is_file());

    fs::write(home.path().join(".cody.toml"), "default_category = \"inbox\"\n")
        .expect("write config");
    let output = cody(home.path(), &["add", url]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(catalog_file(home.path(), "inbox").is_file());
}

#[test]
fn open_resolves_exactly_one_match() {
    let home = TempDir::new().expect("tempdir");
    write_catalog(home.path(), "first", "git@github.com:user/repo1.git\n");
    write_catalog(home.path(), "second", "git@gitlab.com:user/repo2.git\n");

    let output = cody(home.path(), &["open", "repo1"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let expected = home.path().join("code").join("github.com").join("user/repo1");
    assert_eq!(stdout(&output), format!("{}\n", expected.display()));

    let output = cody(home.path(), &["open", "user"]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("ambiguous"), "stderr: {err}");
    assert!(err.contains("git@github.com:user/repo1.git"));
    assert!(err.contains("git@gitlab.com:user/repo2.git"));

    let output = cody(home.path(), &["open", "nope"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("no catalog entry matches `nope`"));
}

#[test]
fn rm_confirmed_removes_only_that_line() {
    let home = TempDir::new().expect("tempdir");
    let work = write_catalog(
        home.path(),
        "work",
        "git@github.com:user/keep.git\ngit@github.com:user/drop.git\n",
    );
    let other_content = "git@gitlab.com:user/other.git\n";
    let other = write_catalog(home.path(), "other", other_content);

    let output = cody_with_stdin(home.path(), &["rm", "drop"], "y\n");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Removed git@github.com:user/drop.git"));
    assert_eq!(
        fs::read_to_string(&work).expect("read work"),
        "git@github.com:user/keep.git\n"
    );
    assert_eq!(fs::read_to_string(&other).expect("read other"), other_content);
}

#[test]
fn rm_declined_keeps_entry() {
    let home = TempDir::new().expect("tempdir");
    let content = "git@github.com:user/keep.git\n";
    let work = write_catalog(home.path(), "work", content);

    let output = cody_with_stdin(home.path(), &["rm", "keep"], "n\n");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Kept git@github.com:user/keep.git"));
    assert_eq!(fs::read_to_string(&work).expect("read work"), content);
}

#[test]
fn rm_force_and_missing_entry() {
    let home = TempDir::new().expect("tempdir");
    let work = write_catalog(home.path(), "work", "git@github.com:user/gone.git\n");

    let output = cody(home.path(), &["rm", "gone", "--force"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(fs::read_to_string(&work).expect("read work"), "");

    let output = cody(home.path(), &["rm", "gone"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "entry not found\n");
}

#[test]
fn pull_skips_unsupported_and_existing_entries() {
    let home = TempDir::new().expect("tempdir");
    write_catalog(
        home.path(),
        "work",
        "https://github.com/user/web.git\ngit@github.com:user/present.git\n",
    );
    fs::create_dir_all(home.path().join("code/github.com/user/present/.git"))
        .expect("mkdir existing clone");

    let output = cody(home.path(), &["pull"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("https://github.com/user/web.git: skipped (unsupported URL format)"));
    assert!(out.contains("git@github.com:user/present.git: skipped (already exists"));
    assert!(out.contains("pull: cloned 0, present 1, unsupported 1, failed 0"));
}

#[test]
fn pull_reports_failed_clone_but_exits_zero() {
    let home = TempDir::new().expect("tempdir");
    write_catalog(home.path(), "work", "git@github.com:user/broken.git\n");
    fs::write(
        home.path().join(".cody.toml"),
        "git_bin = \"cody-test-missing-git\"\n",
    )
    .expect("write config");

    let output = cody(home.path(), &["pull"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("git@github.com:user/broken.git: clone failed"));
    assert!(stdout(&output).contains("failed 1"));
}

#[test]
fn doctor_fails_when_git_is_missing() {
    let home = TempDir::new().expect("tempdir");
    write_catalog(home.path(), "work", "git@github.com:user/repo.git\nhttps://x/y.git\n");
    fs::write(
        home.path().join(".cody.toml"),
        "git_bin = \"cody-test-missing-git\"\n",
    )
    .expect("write config");

    let output = cody(home.path(), &["doctor"]);
    assert!(!output.status.success());
    let out = stdout(&output);
    assert!(out.contains("[OK] Catalog readable: 2 entries in 1 categories"), "{out}");
    assert!(out.contains("1 entries are not git@host:path remotes"), "{out}");
    assert!(out.contains("[FAIL] git installed"), "{out}");
    assert!(stderr(&output).contains("doctor found failing checks"));
}
