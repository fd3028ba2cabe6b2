//! End-to-end CLI test suite.
//!
//! Tests organized by command group. Each test verifies CLI behavior
//! through the public interface.

mod common;

use common::harness::{TestEnv, TestNote};
use predicates::prelude::*;
use serde_json::Value;

/// A small zettelkasten:
///
/// - `index` links to `rust` (folgezettel) and `tags` (ordinary)
/// - `rust` links to `tags` (ordinary)
/// - `tags` has no outgoing links
/// - `lonely` is isolated
fn sample_env() -> TestEnv {
    let env = TestEnv::new();
    env.add_note(
        &TestNote::new("index")
            .title("Index")
            .date("2024-01-01")
            .tag("meta")
            .body("Start at [[[rust]]] or read about [[tags]].\n"),
    );
    env.add_note(
        &TestNote::new("rust")
            .title("Rust")
            .date("2024-03-01")
            .tag("lang/rust")
            .tag("project/neuron")
            .body("Rust notes. See [[tags]].\n"),
    );
    env.add_note(
        &TestNote::new("tags")
            .title("Tag Hierarchies")
            .date("2024-02-01")
            .tag("pkm/tags")
            .tag("project/neuron"),
    );
    env.add_note(&TestNote::new("lonely").title("Lonely"));
    env
}

fn ids(zettels: &Value) -> Vec<String> {
    zettels
        .as_array()
        .expect("expected an array of zettels")
        .iter()
        .map(|z| z["id"].as_str().expect("zettel id").to_string())
        .collect()
}

// ===========================================
// query command tests
// ===========================================
mod query_tests {
    use super::*;

    #[test]
    fn test_query_zettel_by_id() {
        let env = sample_env();
        let json: Value = env
            .cmd()
            .query("neuron://zettel/rust?connection=folgezettel")
            .format_json()
            .output_json();

        assert_eq!(json["data"]["shape"], "single-zettel");
        assert_eq!(json["data"]["result"]["connection"], "folgezettel");
        assert_eq!(json["data"]["result"]["zettel"]["title"], "Rust");
        assert_eq!(json["data"]["result"]["zettel"]["date"], "2024-03-01");
    }

    #[test]
    fn test_query_missing_zettel_is_empty_not_error() {
        let env = sample_env();
        env.cmd()
            .query("neuron://zettel/ghost")
            .assert()
            .success()
            .stdout(predicate::str::contains("No zettel found."));
    }

    #[test]
    fn test_query_search_by_tag_pattern() {
        let env = sample_env();
        let json: Value = env
            .cmd()
            .query("neuron://search?tag=project/*")
            .format_json()
            .output_json();

        assert_eq!(json["data"]["shape"], "zettel-set");
        assert_eq!(ids(&json["data"]["result"]["zettels"]), vec!["rust", "tags"]);
    }

    #[test]
    fn test_query_search_all_with_timeline() {
        let env = sample_env();
        let json: Value = env
            .cmd()
            .query("neuron://search?tag=project/neuron&tag=lang/**&match=all&timeline")
            .format_json()
            .output_json();

        assert_eq!(ids(&json["data"]["result"]["zettels"]), vec!["rust"]);
    }

    #[test]
    fn test_query_backlinks() {
        let env = sample_env();
        let json: Value = env
            .cmd()
            .query("neuron://backlinks?id=tags")
            .format_json()
            .output_json();

        assert_eq!(json["data"]["shape"], "edge-set");
        let edges = json["data"]["result"].as_array().unwrap();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0]["from"], "index");
        assert_eq!(edges[1]["from"], "rust");
        assert_eq!(edges[1]["connection"], "ordinary");
    }

    #[test]
    fn test_query_graph_snapshot() {
        let env = sample_env();
        let json: Value = env
            .cmd()
            .query("neuron://graph")
            .format_json()
            .output_json();

        assert_eq!(json["data"]["shape"], "graph-snapshot");
        assert_eq!(json["data"]["result"]["zettels"].as_array().unwrap().len(), 4);
        assert_eq!(json["data"]["result"]["edges"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_query_human_output_lists_zettels() {
        let env = sample_env();
        env.cmd()
            .query("neuron://search?tag=pkm/**")
            .assert()
            .success()
            .stdout(predicate::str::contains("Tag Hierarchies"))
            .stdout(predicate::str::contains("1 zettel(s)"));
    }

    #[test]
    fn test_query_rejects_non_uri() {
        let env = sample_env();
        env.cmd()
            .query("not a link")
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid query link 'not a link'"))
            .stderr(predicate::str::contains("not a URI"));
    }

    #[test]
    fn test_query_rejects_unknown_kind() {
        let env = sample_env();
        env.cmd()
            .query("neuron://everything")
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown query kind 'everything'"));
    }

    #[test]
    fn test_query_rejects_foreign_scheme() {
        let env = sample_env();
        env.cmd()
            .query("https://example.com/zettel/rust")
            .assert()
            .failure()
            .stderr(predicate::str::contains("scheme must be 'neuron'"));
    }

    #[test]
    fn test_query_rejects_bad_id() {
        let env = sample_env();
        env.cmd()
            .query("neuron://zettel?id=.hidden")
            .assert()
            .failure()
            .stderr(predicate::str::contains("malformed zettel ID '.hidden'"));
    }
}

// ===========================================
// search command tests
// ===========================================
mod search_tests {
    use super::*;

    #[test]
    fn test_search_without_tags_lists_everything() {
        let env = sample_env();
        let json: Value = env.cmd().search().format_json().output_json();
        assert_eq!(
            ids(&json["data"]["result"]["zettels"]),
            vec!["index", "lonely", "rust", "tags"]
        );
    }

    #[test]
    fn test_search_any_of_several_tags() {
        let env = sample_env();
        let json: Value = env
            .cmd()
            .search()
            .args(["--tag", "meta", "--tag", "pkm/*"])
            .format_json()
            .output_json();
        assert_eq!(ids(&json["data"]["result"]["zettels"]), vec!["index", "tags"]);
    }

    #[test]
    fn test_search_all_requires_every_tag() {
        let env = sample_env();
        let json: Value = env
            .cmd()
            .search()
            .args(["--tag", "project/neuron", "--tag", "pkm/tags", "--all"])
            .format_json()
            .output_json();
        assert_eq!(ids(&json["data"]["result"]["zettels"]), vec!["tags"]);
    }

    #[test]
    fn test_search_timeline_newest_first_with_limit() {
        let env = sample_env();
        let json: Value = env
            .cmd()
            .search()
            .args(["--timeline", "--limit", "2"])
            .format_json()
            .output_json();
        assert_eq!(ids(&json["data"]["result"]["zettels"]), vec!["rust", "tags"]);
    }

    #[test]
    fn test_search_no_match_message() {
        let env = sample_env();
        env.cmd()
            .search()
            .args(["--tag", "nothing/here"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No zettels found."));
    }

    #[test]
    fn test_search_invalid_pattern_fails() {
        let env = sample_env();
        env.cmd()
            .search()
            .args(["--tag", "a/[bc]"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid tag pattern 'a/[bc]'"));
    }
}

// ===========================================
// backlinks and uplinks command tests
// ===========================================
mod links_tests {
    use super::*;

    #[test]
    fn test_backlinks_human_output() {
        let env = sample_env();
        env.cmd()
            .backlinks("tags")
            .assert()
            .success()
            .stdout(predicate::str::contains("index"))
            .stdout(predicate::str::contains("rust"))
            .stdout(predicate::str::contains("2 link(s)"));
    }

    #[test]
    fn test_backlinks_connection_filter() {
        let env = sample_env();
        let json: Value = env
            .cmd()
            .backlinks("rust")
            .args(["--connection", "folgezettel"])
            .format_json()
            .output_json();

        let edges = json["data"].as_array().unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0]["from"], "index");
        assert_eq!(edges[0]["connection"], "folgezettel");

        let none: Value = env
            .cmd()
            .backlinks("tags")
            .args(["--connection", "folgezettel"])
            .format_json()
            .output_json();
        assert!(none["data"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_backlinks_none_found() {
        let env = sample_env();
        env.cmd()
            .backlinks("lonely")
            .assert()
            .success()
            .stdout(predicate::str::contains("No links found."));
    }

    #[test]
    fn test_backlinks_unknown_zettel_is_empty_not_error() {
        let env = sample_env();
        env.cmd()
            .backlinks("ghost")
            .assert()
            .success()
            .stdout(predicate::str::contains("No links found."));
    }

    #[test]
    fn test_uplinks_unknown_zettel_is_empty_not_error() {
        let env = sample_env();
        env.cmd()
            .uplinks("ghost")
            .assert()
            .success()
            .stdout(predicate::str::contains("No zettels found."));
    }

    #[test]
    fn test_backlinks_command_agrees_with_backlinks_query() {
        let env = sample_env();
        let from_command: Value = env.cmd().backlinks("ghost").format_json().output_json();
        let from_query: Value = env
            .cmd()
            .query("neuron://backlinks?id=ghost")
            .format_json()
            .output_json();

        assert_eq!(from_query["data"]["shape"], "edge-set");
        assert_eq!(from_command["data"], serde_json::json!([]));
        assert_eq!(from_query["data"]["result"], from_command["data"]);
    }

    #[test]
    fn test_backlinks_invalid_id_fails() {
        let env = sample_env();
        env.cmd()
            .backlinks("has/slash")
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid zettel ID 'has/slash'"));
    }

    #[test]
    fn test_uplinks_follow_folgezettel_only() {
        let env = sample_env();
        let json: Value = env.cmd().uplinks("rust").format_json().output_json();
        assert_eq!(ids(&json["data"]), vec!["index"]);

        let json: Value = env.cmd().uplinks("tags").format_json().output_json();
        assert!(ids(&json["data"]).is_empty());
    }
}

// ===========================================
// graph command tests
// ===========================================
mod graph_tests {
    use super::*;

    #[test]
    fn test_graph_prints_json_snapshot() {
        let env = sample_env();
        let json: Value = env.cmd().graph().output_json();

        assert_eq!(
            ids(&json["data"]["zettels"]),
            vec!["index", "lonely", "rust", "tags"]
        );
        let edges = json["data"]["edges"].as_array().unwrap();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[0]["from"], "index");
        assert_eq!(edges[0]["to"], "rust");
        assert_eq!(edges[0]["connection"], "folgezettel");
    }

    #[test]
    fn test_graph_of_empty_directory() {
        let env = TestEnv::new();
        let json: Value = env.cmd().graph().output_json();
        assert!(json["data"]["zettels"].as_array().unwrap().is_empty());
        assert!(json["data"]["edges"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_graph_tag_query_link_adds_edges() {
        let env = TestEnv::new();
        env.add_note(&TestNote::new("hub").body("All projects: <neuron://search?tag=project/**>\n"));
        env.add_note(&TestNote::new("a").tag("project/a"));
        env.add_note(&TestNote::new("b").tag("project/b"));

        let json: Value = env.cmd().graph().output_json();
        let edges = json["data"]["edges"].as_array().unwrap();
        let targets: Vec<_> = edges.iter().map(|e| e["to"].as_str().unwrap()).collect();
        assert_eq!(targets, vec!["a", "b"]);
    }

    #[test]
    fn test_graph_missing_directory_fails() {
        let env = TestEnv::new();
        let missing = env.notes_dir().join("nope");
        env.cmd_without_dir()
            .dir(&missing)
            .graph()
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to open zettelkasten"));
    }
}

// ===========================================
// check command tests
// ===========================================
mod check_tests {
    use super::*;

    #[test]
    fn test_check_connected_zettels_ok() {
        let env = TestEnv::new();
        env.add_note(&TestNote::new("a").body("[[b]]\n"));
        env.add_note(&TestNote::new("b"));

        env.cmd()
            .check()
            .assert()
            .success()
            .stdout(predicate::str::contains("All 2 zettel(s) OK."));
    }

    #[test]
    fn test_check_isolated_is_warning_only() {
        let env = sample_env();
        env.cmd()
            .check()
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "warning: lonely: isolated zettel (no connections)",
            ))
            .stdout(predicate::str::contains("0 error(s), 1 warning(s)"));
    }

    #[test]
    fn test_check_broken_link_fails() {
        let env = TestEnv::new();
        env.add_note(&TestNote::new("a").body("See [[ghost]] and [[ghost]].\n"));

        env.cmd()
            .check()
            .assert()
            .failure()
            .stdout(predicate::str::contains("error: a: broken link to 'ghost'"))
            .stdout(predicate::str::contains("1 error(s)"))
            .stderr(predicate::str::contains("check failed"));
    }

    #[test]
    fn test_check_invalid_query_link_fails() {
        let env = TestEnv::new();
        env.add_note(&TestNote::new("a").body("<neuron://nonsense>\n"));

        env.cmd()
            .check()
            .assert()
            .failure()
            .stdout(predicate::str::contains("error: a: invalid link"));
    }

    #[test]
    fn test_check_unreadable_front_matter_fails() {
        let env = TestEnv::new();
        env.write_file("bad.md", "---\ntitle: [unclosed\n---\nBody\n");

        env.cmd()
            .check()
            .assert()
            .failure()
            .stdout(predicate::str::contains("error: bad: unreadable note"));
    }

    #[test]
    fn test_check_empty_directory() {
        let env = TestEnv::new();
        env.cmd()
            .check()
            .assert()
            .success()
            .stdout(predicate::str::contains("No zettels found."));
    }

    #[test]
    fn test_check_ignores_links_in_code_fences() {
        let env = TestEnv::new();
        env.add_note(&TestNote::new("a").body("[[b]]\n\n```\n[[ghost]]\n```\n"));
        env.add_note(&TestNote::new("b"));

        env.cmd().check().assert().success();
    }
}

// ===========================================
// new command tests
// ===========================================
mod new_tests {
    use super::*;

    #[test]
    fn test_new_with_id_title() {
        let env = TestEnv::new();
        let output = env
            .cmd()
            .new_zettel()
            .args(["--id-title", "Rust Ownership", "--tag", "lang/rust"])
            .output_success();

        let path = env.notes_dir().join("rust-ownership.md");
        assert_eq!(output.trim(), path.display().to_string());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("title: Rust Ownership"));
        assert!(content.contains("lang/rust"));
    }

    #[test]
    fn test_new_hash_id_is_queryable() {
        let env = TestEnv::new();
        env.cmd()
            .new_zettel()
            .args(["--title", "Fresh Thought"])
            .assert()
            .success();

        let files = env.markdown_files();
        assert_eq!(files.len(), 1);
        let stem = files[0].file_stem().unwrap().to_string_lossy().to_string();
        assert_eq!(stem.len(), 26, "hash IDs are ULIDs");

        let json: Value = env
            .cmd()
            .query(&format!("neuron://zettel/{}", stem))
            .format_json()
            .output_json();
        assert_eq!(json["data"]["result"]["zettel"]["title"], "Fresh Thought");
    }

    #[test]
    fn test_new_refuses_to_overwrite() {
        let env = TestEnv::new();
        env.add_note(&TestNote::new("taken").title("Original").body("Keep me.\n"));

        env.cmd()
            .new_zettel()
            .args(["--id-title", "taken"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));

        let content = std::fs::read_to_string(env.notes_dir().join("taken.md")).unwrap();
        assert!(content.contains("Keep me."));
    }

    #[test]
    fn test_new_rejects_empty_slug() {
        let env = TestEnv::new();
        env.cmd()
            .new_zettel()
            .args(["--id-title", "!!!"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("does not produce a valid zettel ID"));
        assert!(env.markdown_files().is_empty());
    }

    #[test]
    fn test_new_creates_missing_directory() {
        let env = TestEnv::new();
        let nested = env.notes_dir().join("fresh");
        env.cmd_without_dir()
            .dir(&nested)
            .new_zettel()
            .args(["--id-title", "first"])
            .assert()
            .success();
        assert!(nested.join("first.md").is_file());
    }
}

// ===========================================
// config tests
// ===========================================
mod config_tests {
    use super::*;

    #[test]
    fn test_config_dir_is_used_without_flag() {
        let env = sample_env();
        env.write_config(&format!("dir = {:?}\n", env.notes_dir().display().to_string()));

        env.cmd_without_dir()
            .query("neuron://zettel/rust")
            .assert()
            .success()
            .stdout(predicate::str::contains("Rust"));
    }

    #[test]
    fn test_config_title_scheme() {
        let env = TestEnv::new();
        env.write_config("id_scheme = \"title\"\n");

        env.cmd()
            .new_zettel()
            .args(["--title", "Slow Thinking"])
            .assert()
            .success();
        assert!(env.notes_dir().join("slow-thinking.md").is_file());
    }

    #[test]
    fn test_invalid_config_fails() {
        let env = TestEnv::new();
        env.write_config("id_scheme = 42\n");

        env.cmd()
            .graph()
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to parse config file"));
    }
}

// ===========================================
// misc command tests
// ===========================================
mod misc_tests {
    use super::*;

    #[test]
    fn test_completions_bash() {
        let env = TestEnv::new();
        env.cmd_without_dir()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("neuron"));
    }

    #[test]
    fn test_verbose_logs_to_stderr() {
        let env = sample_env();
        env.cmd()
            .graph()
            .args(["-v"])
            .assert()
            .success()
            .stderr(predicate::str::contains("loaded graph"));
    }
}
