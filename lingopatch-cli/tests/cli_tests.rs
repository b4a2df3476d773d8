use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const GERMAN: &str = "# German translation\n\nSTR_0001    :Eins\nSTR_0003    :Drei\n";

const ISSUE_BODY: &str = "New strings for the next release:

```
STR_0002    :Two
+STR_0004   :Four
-STR_0005   :Five
```

- [x] nl-NL
- [ ] de-DE
- [ ] fr-FR
";

fn lingopatch_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("lingopatch"))
}

/// Temp dir with a config that keeps all state inside it.
fn workspace() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("lingopatch.toml");
    let data_dir = temp_dir.path().join("state");
    fs::write(&config, format!("data_dir = '{}'\n", data_dir.display())).unwrap();
    (temp_dir, config)
}

fn run(config: &Path, args: &[&str]) -> Output {
    lingopatch_cmd()
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("GITHUB_TOKEN")
        .env_remove("LINGOPATCH_LOG")
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_parse_issue_text_output() {
    let (temp_dir, config) = workspace();
    let body = temp_dir.path().join("issue.md");
    fs::write(&body, ISSUE_BODY).unwrap();

    let output = run(&config, &["parse-issue", "-i", body.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("Strings: 3"));
    assert!(out.contains("+ STR_0002: Two"));
    assert!(out.contains("- STR_0005: Five"));
    assert!(out.contains("Missing languages: de-DE, fr-FR"));
}

#[test]
fn test_parse_issue_json_output() {
    let (temp_dir, config) = workspace();
    let body = temp_dir.path().join("issue.md");
    fs::write(&body, ISSUE_BODY).unwrap();

    let output = run(&config, &["parse-issue", "-i", body.to_str().unwrap(), "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed["strings"].as_array().unwrap().len(), 3);
    assert_eq!(parsed["strings"][0]["string_id"], "STR_0002");
    assert_eq!(parsed["missing_languages"], serde_json::json!(["de-DE", "fr-FR"]));
}

#[test]
fn test_lookup_found_and_missing() {
    let (temp_dir, config) = workspace();
    let file = temp_dir.path().join("de-DE.txt");
    fs::write(&file, GERMAN).unwrap();

    let found = run(&config, &["lookup", "-i", file.to_str().unwrap(), "-k", "STR_0003"]);
    assert!(found.status.success(), "stderr: {}", stderr(&found));
    assert_eq!(stdout(&found), "Drei\n");

    let missing = run(&config, &["lookup", "-i", file.to_str().unwrap(), "-k", "STR_0002"]);
    assert!(!missing.status.success());
    assert!(stderr(&missing).contains("STR_0002 not found"));

    let invalid = run(&config, &["lookup", "-i", file.to_str().unwrap(), "-k", "STR_2"]);
    assert!(!invalid.status.success());
    assert!(stderr(&invalid).contains("Invalid string id"));
}

#[test]
fn test_merge_in_place() {
    let (temp_dir, config) = workspace();
    let file = temp_dir.path().join("de-DE.txt");
    fs::write(&file, GERMAN).unwrap();

    let output = run(
        &config,
        &[
            "merge",
            "-i",
            file.to_str().unwrap(),
            "--set",
            "STR_0004=Vier",
            "--set",
            "STR_0002=Zwei",
            "--set",
            "STR_0001=Eins!",
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Merged 3 edit(s)"));

    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "# German translation\n\nSTR_0001    :Eins!\nSTR_0002    :Zwei\nSTR_0003    :Drei\nSTR_0004    :Vier\n"
    );
}

#[test]
fn test_merge_edits_file_to_output() {
    let (temp_dir, config) = workspace();
    let file = temp_dir.path().join("de-DE.txt");
    let edits = temp_dir.path().join("edits.json");
    let out = temp_dir.path().join("out").join("de-DE.txt");
    fs::write(&file, GERMAN).unwrap();
    fs::write(&edits, r#"{"STR_0002": "aus Datei", "STR_0003": "drei"}"#).unwrap();

    let output = run(
        &config,
        &[
            "merge",
            "-i",
            file.to_str().unwrap(),
            "--edits",
            edits.to_str().unwrap(),
            "--set",
            "STR_0002=von --set",
            "-o",
            out.to_str().unwrap(),
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(fs::read_to_string(&file).unwrap(), GERMAN);
    let merged = fs::read_to_string(&out).unwrap();
    assert!(merged.contains("STR_0002    :von --set\n"));
    assert!(merged.contains("STR_0003    :drei\n"));
}

#[test]
fn test_merge_without_edits_fails() {
    let (temp_dir, config) = workspace();
    let file = temp_dir.path().join("de-DE.txt");
    fs::write(&file, GERMAN).unwrap();

    let output = run(&config, &["merge", "-i", file.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Nothing to merge"));
    assert_eq!(fs::read_to_string(&file).unwrap(), GERMAN);
}

#[test]
fn test_check_reports_problems() {
    let (temp_dir, config) = workspace();
    let clean = temp_dir.path().join("clean.txt");
    let broken = temp_dir.path().join("broken.txt");
    fs::write(&clean, GERMAN).unwrap();
    fs::write(&broken, "STR_0003    :Drei\nSTR_0001    :Eins\nnot an entry\n").unwrap();

    let ok = run(&config, &["check", "-i", clean.to_str().unwrap()]);
    assert!(ok.status.success(), "stderr: {}", stderr(&ok));
    assert!(stdout(&ok).contains("2 string(s), no problems found"));

    let bad = run(&config, &["check", "-i", broken.to_str().unwrap()]);
    assert!(!bad.status.success());
    let out = stdout(&bad);
    assert!(out.contains("line 2: STR_0001 sorts before STR_0003"));
    assert!(out.contains("line 3"));
    assert!(stderr(&bad).contains("2 problem(s)"));
}

#[test]
fn test_edit_cache_commands() {
    let (temp_dir, config) = workspace();

    let set = run(&config, &["edit", "set", "-l", "de-DE", "-k", "STR_0002", "-t", "Zwei"]);
    assert!(set.status.success(), "stderr: {}", stderr(&set));
    let set = run(&config, &["edit", "set", "-l", "de-DE", "-k", "STR_0001", "-t", "Eins"]);
    assert!(set.status.success(), "stderr: {}", stderr(&set));
    let set = run(&config, &["edit", "set", "-l", "nl-NL", "-k", "STR_0001", "-t", "Een"]);
    assert!(set.status.success(), "stderr: {}", stderr(&set));

    let cache = fs::read_to_string(temp_dir.path().join("state").join("edits.json")).unwrap();
    let cache: serde_json::Value = serde_json::from_str(&cache).unwrap();
    assert_eq!(cache["de-DE_STR_0002"], "Zwei");

    let get = run(&config, &["edit", "get", "-l", "de-DE", "-k", "STR_0002"]);
    assert_eq!(stdout(&get), "Zwei\n");

    let list = run(&config, &["edit", "list", "-l", "de-DE"]);
    let out = stdout(&list);
    assert!(out.find("STR_0001").unwrap() < out.find("STR_0002").unwrap());
    assert!(out.contains("2 edit(s)"));
    assert!(!out.contains("Een"));

    let clear = run(&config, &["edit", "clear", "-l", "de-DE"]);
    assert!(stdout(&clear).contains("Cleared 2 edit(s)"));

    let get = run(&config, &["edit", "get", "-l", "de-DE", "-k", "STR_0002"]);
    assert!(!get.status.success());
    let get = run(&config, &["edit", "get", "-l", "nl-NL", "-k", "STR_0001"]);
    assert_eq!(stdout(&get), "Een\n");
}

#[test]
fn test_edit_rejects_invalid_language() {
    let (_temp_dir, config) = workspace();
    let output = run(&config, &["edit", "set", "-l", "de-de", "-k", "STR_0001", "-t", "x"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("did you mean de-DE"));
}

#[test]
fn test_token_set_and_clear() {
    let (temp_dir, config) = workspace();
    let token_path = temp_dir.path().join("state").join("token");

    let set = run(&config, &["token", "set", "gho_example"]);
    assert!(set.status.success(), "stderr: {}", stderr(&set));
    assert_eq!(fs::read_to_string(&token_path).unwrap().trim(), "gho_example");

    let clear = run(&config, &["token", "clear"]);
    assert!(clear.status.success(), "stderr: {}", stderr(&clear));
    assert!(!token_path.exists());
}

#[test]
fn test_login_prints_authorize_url() {
    let (_temp_dir, config) = workspace();
    let output = run(&config, &["login", "--force"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("https://github.com/login/oauth/authorize?client_id="));
    assert!(out.contains("scope=public_repo"));
    assert!(out.contains("prompt=login"));
}

#[test]
fn test_login_from_redirect_url_stores_token() {
    let (temp_dir, config) = workspace();
    let output = run(
        &config,
        &["login", "--redirect-url", "http://localhost/?access_token=gho_redirect"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let token = fs::read_to_string(temp_dir.path().join("state").join("token")).unwrap();
    assert_eq!(token.trim(), "gho_redirect");
}

#[test]
fn test_publish_without_edits_fails_offline() {
    let (_temp_dir, config) = workspace();
    let output = run(&config, &["publish", "-l", "de-DE", "--issue", "1"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("No edits saved for de-DE"));
}

#[test]
fn test_invalid_config_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("lingopatch.toml");
    fs::write(&config, "upstream_owner = \"a/b\"\n").unwrap();

    let output = run(&config, &["edit", "list", "-l", "de-DE"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Invalid 'upstream_owner'"));
}
