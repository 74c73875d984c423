//! CLI integration tests for ods commands.
//!
//! These tests focus on exit codes and the parts of the output that scripts rely on.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to create a temp directory for tests.
fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}

/// Helper to get an ods command.
fn ods() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("ods").unwrap()
}

/// Helper to run `ods` with HOME isolated to the provided directory.
fn ods_with_home(home: &Path) -> Command {
    let mut cmd = ods();
    cmd.env("HOME", home);
    cmd.env_remove("RUST_LOG");
    cmd.env_remove("ODS_CONFIG");
    cmd
}

/// Runs `ods` in a fresh directory that is also HOME.
fn ods_isolated(dir: &tempfile::TempDir) -> Command {
    let mut cmd = ods_with_home(dir.path());
    cmd.current_dir(dir.path());
    cmd
}

mod parse {
    use super::*;

    #[test]
    fn prints_tree_by_default() {
        let dir = temp_dir();
        ods_isolated(&dir)
            .args(["parse", "coffee AND NOT decaf"])
            .assert()
            .success()
            .stdout("AND\n  Term(\"coffee\")\n  NOT\n    Term(\"decaf\")\n");
    }

    #[test]
    fn compact_output() {
        let dir = temp_dir();
        ods_isolated(&dir)
            .args(["parse", "--compact", "foo AND bar OR baz"])
            .assert()
            .success()
            .stdout("{{'foo' AND 'bar'} OR 'baz'}\n");
    }

    #[test]
    fn or_takes_the_remainder() {
        let dir = temp_dir();
        ods_isolated(&dir)
            .args(["parse", "--query", "a OR b AND c"])
            .assert()
            .success()
            .stdout("(a OR (b AND c))\n");
    }

    #[test]
    fn keyword_prefix_is_a_word() {
        let dir = temp_dir();
        ods_isolated(&dir)
            .args(["parse", "--compact", "Andrew"])
            .assert()
            .success()
            .stdout("'Andrew'\n");
    }

    #[test]
    fn json_output() {
        let dir = temp_dir();
        let assert = ods_isolated(&dir)
            .args(["parse", "--json", "\"green tea\"", "NOT milk"])
            .assert()
            .success();

        let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
        let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
        let items = json.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["text"], "\"green tea\"");
        assert_eq!(items[0]["expression"]["type"], "term");
        assert_eq!(items[0]["expression"]["value"], "green tea");
        assert_eq!(items[1]["expression"]["op"], "NOT");
    }

    #[test]
    fn multiple_queries_get_headers() {
        let dir = temp_dir();
        ods_isolated(&dir)
            .args(["parse", "--compact", "a b", "c"])
            .assert()
            .success()
            .stdout("a b\n{'a' AND 'b'}\nc\n'c'\n");
    }

    #[test]
    fn reports_error_with_pointer() {
        let dir = temp_dir();
        ods_isolated(&dir)
            .args(["parse", "coffee (tea"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("[MISSING_CLOSE]"))
            .stderr(predicate::str::contains("  coffee (tea\n         ^"))
            .stderr(predicate::str::contains("hint:"));
    }

    #[test]
    fn leading_operator_fails() {
        let dir = temp_dir();
        ods_isolated(&dir)
            .args(["parse", "AND foo"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("INVALID_BINARY_OPERATOR_POSITION"));
    }

    #[test]
    fn one_failure_fails_the_run_but_prints_the_rest() {
        let dir = temp_dir();
        ods_isolated(&dir)
            .args(["parse", "--compact", "()", "ok"])
            .assert()
            .failure()
            .stdout(predicate::str::contains("'ok'"))
            .stderr(predicate::str::contains("NO_EXPRESSION_FOUND"));
    }

    #[test]
    fn json_fails_cleanly_when_too_deep() {
        let dir = temp_dir();
        fs::write(
            dir.path().join(".ods.toml"),
            "[parse]\nmax_query_length = 0\n",
        )
        .unwrap();
        let query = vec!["tea"; 1_000].join(" ");

        ods_isolated(&dir)
            .args(["parse", "--json"])
            .arg(&query)
            .assert()
            .failure()
            .stderr(predicate::str::contains("nested deeper than"));
    }

    #[test]
    fn format_from_config() {
        let dir = temp_dir();
        fs::write(
            dir.path().join(".ods.toml"),
            "[output]\nformat = \"query\"\n",
        )
        .unwrap();

        ods_isolated(&dir)
            .args(["parse", "a b c"])
            .assert()
            .success()
            .stdout("((a AND b) AND c)\n");
    }

    #[test]
    fn flag_overrides_config_format() {
        let dir = temp_dir();
        fs::write(
            dir.path().join(".ods.toml"),
            "[output]\nformat = \"query\"\n",
        )
        .unwrap();

        ods_isolated(&dir)
            .args(["parse", "--compact", "a"])
            .assert()
            .success()
            .stdout("'a'\n");
    }

    #[test]
    fn rejects_queries_over_the_length_limit() {
        let dir = temp_dir();
        fs::write(
            dir.path().join(".ods.toml"),
            "[parse]\nmax_query_length = 5\n",
        )
        .unwrap();

        ods_isolated(&dir)
            .args(["parse", "coffee"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("max_query_length"));
    }

    #[test]
    fn invalid_config_fails() {
        let dir = temp_dir();
        fs::write(dir.path().join(".ods.toml"), "[output\n").unwrap();

        ods_isolated(&dir)
            .args(["parse", "a"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to load configuration"));
    }

    #[test]
    fn requires_a_query() {
        let dir = temp_dir();
        ods_isolated(&dir).arg("parse").assert().failure();
    }
}

mod tokenize {
    use super::*;

    #[test]
    fn prints_token_table() {
        let dir = temp_dir();
        ods_isolated(&dir)
            .args(["tokenize", "(a OR b) \"c d\""])
            .assert()
            .success()
            .stdout(predicate::str::contains("OPEN"))
            .stdout(predicate::str::contains("CLOSE"))
            .stdout(predicate::str::contains("PHRASE"))
            .stdout(predicate::str::contains("\"c d\""));
    }

    #[test]
    fn json_tokens() {
        let dir = temp_dir();
        let assert = ods_isolated(&dir)
            .args(["tokenize", "--json", " NOT tea"])
            .assert()
            .success();

        let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
        let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
        assert_eq!(json["query"], " NOT tea");
        let tokens = json["tokens"].as_array().unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0]["kind"], "NOT");
        assert_eq!(tokens[0]["offset"], 1);
        assert_eq!(tokens[1]["kind"], "WORD");
        assert_eq!(tokens[1]["text"], "tea");
        assert_eq!(tokens[1]["offset"], 5);
    }

    #[test]
    fn empty_query_has_no_tokens() {
        let dir = temp_dir();
        ods_isolated(&dir)
            .args(["tokenize", "   "])
            .assert()
            .success()
            .stdout(predicate::str::contains("(no tokens)"));
    }

    #[test]
    fn forbidden_character_fails() {
        let dir = temp_dir();
        ods_isolated(&dir)
            .args(["tokenize", "tea2"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("TOKENIZER_EXCEPTION"))
            .stderr(predicate::str::contains("forbidden character '2'"));
    }

    #[test]
    fn unterminated_phrase_fails() {
        let dir = temp_dir();
        ods_isolated(&dir)
            .args(["tokenize", "\"green tea"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("closing quote"));
    }
}

mod check {
    use super::*;

    #[test]
    fn valid_queries() {
        let dir = temp_dir();
        ods_isolated(&dir)
            .args(["check", "foo", "(foo OR bar) AND baz"])
            .assert()
            .success()
            .stdout("ok foo\nok (foo OR bar) AND baz\n");
    }

    #[test]
    fn prints_error_keys() {
        let dir = temp_dir();
        ods_isolated(&dir)
            .args(["check", "NOT AND", "(foo", "", "ok"])
            .assert()
            .failure()
            .stdout(predicate::str::contains("INVALID_NOT_OPERAND NOT AND"))
            .stdout(predicate::str::contains("MISSING_CLOSE (foo"))
            .stdout(predicate::str::contains("NO_EXPRESSION_FOUND \n"))
            .stdout(predicate::str::contains("ok ok"));
    }

    #[test]
    fn too_long_query() {
        let dir = temp_dir();
        fs::write(
            dir.path().join(".ods.toml"),
            "[parse]\nmax_query_length = 3\n",
        )
        .unwrap();

        ods_isolated(&dir)
            .args(["check", "abcd"])
            .assert()
            .failure()
            .stdout(predicate::str::contains("QUERY_TOO_LONG abcd"));
    }

    #[test]
    fn very_long_query_without_limit() {
        let dir = temp_dir();
        fs::write(
            dir.path().join(".ods.toml"),
            "[parse]\nmax_query_length = 0\n",
        )
        .unwrap();
        let query = vec!["a"; 60_000].join(" ");

        ods_isolated(&dir)
            .arg("check")
            .arg(&query)
            .assert()
            .success()
            .stdout(predicate::str::starts_with("ok a a a"));
    }

    #[test]
    fn deeply_nested_groups_are_rejected() {
        let dir = temp_dir();
        fs::write(
            dir.path().join(".ods.toml"),
            "[parse]\nmax_query_length = 0\n",
        )
        .unwrap();
        let query = format!("{}a{}", "(".repeat(5_000), ")".repeat(5_000));

        ods_isolated(&dir)
            .arg("check")
            .arg(&query)
            .assert()
            .failure()
            .stdout(predicate::str::starts_with("NESTING_TOO_DEEP ((("));
    }
}

mod init {
    use super::*;

    #[test]
    fn creates_config_file() {
        let dir = temp_dir();
        let home = temp_dir();

        ods_with_home(home.path())
            .current_dir(dir.path())
            .arg("init")
            .assert()
            .success()
            .stdout(predicate::str::contains("Created"));

        let contents = fs::read_to_string(dir.path().join(".ods.toml")).unwrap();
        assert!(contents.contains("# [parse]"));
        assert!(contents.contains("# root = false"));
    }

    #[test]
    fn fails_if_config_exists() {
        let dir = temp_dir();
        fs::write(dir.path().join(".ods.toml"), "existing").unwrap();

        ods_isolated(&dir)
            .arg("init")
            .assert()
            .failure()
            .stderr(predicate::str::contains("--force"));
    }

    #[test]
    fn force_overwrites_existing() {
        let dir = temp_dir();
        let home = temp_dir();
        fs::write(dir.path().join(".ods.toml"), "old content").unwrap();

        ods_with_home(home.path())
            .current_dir(dir.path())
            .args(["init", "--force"])
            .assert()
            .success();

        let contents = fs::read_to_string(dir.path().join(".ods.toml")).unwrap();
        assert!(contents.contains("# [output]"));
    }

    #[test]
    fn works_with_broken_existing_config() {
        let dir = temp_dir();
        let home = temp_dir();
        fs::write(dir.path().join(".ods.toml"), "[parse\n").unwrap();

        ods_with_home(home.path())
            .current_dir(dir.path())
            .args(["init", "--force"])
            .assert()
            .success();
    }

    #[test]
    fn global_writes_to_home() {
        let dir = temp_dir();
        let home = temp_dir();

        ods_with_home(home.path())
            .current_dir(dir.path())
            .args(["init", "--global"])
            .assert()
            .success();

        let contents = fs::read_to_string(home.path().join(".ods.toml")).unwrap();
        assert!(contents.contains("global configuration"));
        assert!(!dir.path().join(".ods.toml").exists());
    }
}

mod config {
    use super::*;

    #[test]
    fn shows_defaults_without_config() {
        let dir = temp_dir();
        ods_isolated(&dir)
            .arg("config")
            .assert()
            .success()
            .stdout(predicate::str::contains("ods init"))
            .stdout(predicate::str::contains("max_query_length = 2048"))
            .stdout(predicate::str::contains("format = \"tree\""));
    }

    #[test]
    fn shows_merged_settings() {
        let home = temp_dir();
        let dir = temp_dir();
        let project = dir.path().join("project");
        fs::create_dir(&project).unwrap();
        fs::write(
            home.path().join(".ods.toml"),
            "[output]\nformat = \"json\"\n",
        )
        .unwrap();
        fs::write(
            project.join(".ods.toml"),
            "[parse]\nmax_query_length = 64\n",
        )
        .unwrap();

        ods_with_home(home.path())
            .current_dir(&project)
            .arg("config")
            .assert()
            .success()
            .stdout(predicate::str::contains("(global)"))
            .stdout(predicate::str::contains("max_query_length = 64"))
            .stdout(predicate::str::contains("format = \"json\""));
    }
}

mod explicit_config {
    use super::*;

    #[test]
    fn flag_replaces_discovery() {
        let dir = temp_dir();
        fs::write(
            dir.path().join(".ods.toml"),
            "[output]\nformat = \"json\"\n",
        )
        .unwrap();
        let named = dir.path().join("compact.toml");
        fs::write(&named, "[output]\nformat = \"compact\"\n").unwrap();

        ods_isolated(&dir)
            .args(["--config", "compact.toml", "parse", "a b"])
            .assert()
            .success()
            .stdout("{'a' AND 'b'}\n");
    }

    #[test]
    fn environment_names_the_file() {
        let dir = temp_dir();
        let named = dir.path().join("query.toml");
        fs::write(&named, "[output]\nformat = \"query\"\n").unwrap();

        ods_isolated(&dir)
            .env("ODS_CONFIG", &named)
            .args(["parse", "a b"])
            .assert()
            .success()
            .stdout("(a AND b)\n");
    }

    #[test]
    fn flag_wins_over_environment() {
        let dir = temp_dir();
        let from_env = dir.path().join("env.toml");
        fs::write(&from_env, "[output]\nformat = \"query\"\n").unwrap();
        let from_flag = dir.path().join("flag.toml");
        fs::write(&from_flag, "[output]\nformat = \"compact\"\n").unwrap();

        ods_isolated(&dir)
            .env("ODS_CONFIG", &from_env)
            .arg("--config")
            .arg(&from_flag)
            .args(["parse", "a"])
            .assert()
            .success()
            .stdout("'a'\n");
    }

    #[test]
    fn config_command_lists_the_file() {
        let dir = temp_dir();
        let named = dir.path().join("custom.toml");
        fs::write(&named, "[parse]\nmax_query_length = 9\n").unwrap();

        ods_isolated(&dir)
            .args(["config", "--config", "custom.toml"])
            .assert()
            .success()
            .stdout(predicate::str::contains("custom.toml (explicit)"))
            .stdout(predicate::str::contains("max_query_length = 9"));
    }

    #[test]
    fn missing_file_fails() {
        let dir = temp_dir();

        ods_isolated(&dir)
            .args(["--config", "absent.toml", "check", "a"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("does not exist"));
    }
}

mod logging {
    use super::*;

    #[test]
    fn trace_logs_tokens() {
        let dir = temp_dir();
        ods_isolated(&dir)
            .args(["-vvv", "check", "tea"])
            .assert()
            .success()
            .stderr(predicate::str::contains("token WORD \"tea\" at 0"));
    }

    #[test]
    fn quiet_by_default() {
        let dir = temp_dir();
        ods_isolated(&dir)
            .args(["check", "tea"])
            .assert()
            .success()
            .stderr(predicate::str::is_empty());
    }
}
