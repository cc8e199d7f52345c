use std::path::Path;
use std::process::{Command, Output};

use ideaforge::{normalize_analysis, Contact, IdeaStore, NewIdeaRecord, SqliteIdeaStore};
use tempfile::tempdir;

fn ideaforge(store: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ideaforge"))
        .arg("--store")
        .arg(store)
        .args(args)
        .env_remove("IDEAFORGE_RNG_SEED")
        .env_remove("IDEAFORGE_FLAVOR")
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

async fn seed_store(path: &Path) -> String {
    let store = SqliteIdeaStore::open(path).unwrap();
    let analysis = normalize_analysis(
        r#"{
            "score": {"value": 72, "reasoning": "Solid niche market"},
            "key_developments": ["Build subscription platform"],
            "deployment_steps": ["Develop MVP"],
            "roadmap": {"q1": "Launch pilot"},
            "investor_pitch": "Coffee lovers deserve curated discovery..."
        }"#,
    )
    .unwrap();
    store
        .create(NewIdeaRecord {
            owner_id: "user-1".into(),
            owner_email: "ada@example.com".into(),
            owner_name: "Ada".into(),
            idea_text: "A subscription box for artisanal coffee".into(),
            contact: Contact {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                phone: String::new(),
            },
            analysis: Some(analysis),
        })
        .await
        .unwrap()
}

#[test]
fn normalize_prints_json_for_valid_payload() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("raw.txt");
    std::fs::write(
        &input,
        "```json\n{\"score\": {\"value\": 85, \"reasoning\": \"Strong\"}, \"roadmap\": {\"q2\": \"Beta\"}}\n```",
    )
    .unwrap();

    let out = ideaforge(
        &dir.path().join("ideas.sqlite"),
        &["normalize", "--input", input.to_str().unwrap()],
    );
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["score"]["value"], 85.0);
    assert_eq!(value["roadmap"]["q2"], "Beta");
    assert_eq!(value["key_developments"], serde_json::json!([]));
}

#[test]
fn normalize_exits_nonzero_for_malformed_payload() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("raw.txt");
    std::fs::write(&input, r#"{"score": {"value": 140}}"#).unwrap();

    let out = ideaforge(
        &dir.path().join("ideas.sqlite"),
        &["normalize", "--input", input.to_str().unwrap()],
    );
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("outside [0, 100]"), "stderr: {stderr}");
}

#[test]
fn dashboard_for_empty_history_shows_empty_state() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("ideas.sqlite");

    let out = ideaforge(&store, &["dashboard", "--user-id", "nobody"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("No ideas yet"));

    let out = ideaforge(&store, &["dashboard", "--user-id", "nobody", "--format", "json"]);
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["overview"]["total_ideas"], 0);
    assert_eq!(value["score_series"], serde_json::json!([]));
}

#[test]
fn unopenable_store_reads_as_empty_history() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "plain file").unwrap();
    let store = blocker.join("ideas.sqlite");

    let out = ideaforge(&store, &["history", "--user-id", "u1"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stdout).contains("No ideas yet"));

    let out = ideaforge(&store, &["dashboard", "--user-id", "u1", "--format", "json"]);
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["overview"]["total_ideas"], 0);
}

#[tokio::test]
async fn history_show_and_dashboard_read_the_store() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("ideas.sqlite");
    let id = seed_store(&store).await;

    let out = ideaforge(&store, &["history", "--user-id", "user-1"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Total ideas: 1"));
    assert!(stdout.contains(&id));

    let out = ideaforge(&store, &["show", "--user-id", "user-1", "--id", &id]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("**72/100** (Good)"));
    assert!(stdout.contains("| Q1 | Launch pilot |"));

    let out = ideaforge(&store, &["show", "--user-id", "someone-else", "--id", &id]);
    assert!(!out.status.success());

    let args = [
        "dashboard", "--user-id", "user-1", "--format", "json", "--rng-seed", "9",
    ];
    let first = ideaforge(&store, &args);
    let second = ideaforge(&store, &args);
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);

    let value: serde_json::Value = serde_json::from_slice(&first.stdout).unwrap();
    assert_eq!(value["overview"]["total_ideas"], 1);
    assert_eq!(value["score_distribution"][0]["label"], "Good (60-79)");
    assert_eq!(value["roadmap"][0]["priority"], "High");
}

#[test]
fn submit_rejects_blank_idea_without_calling_the_provider() {
    let dir = tempdir().unwrap();
    let out = Command::new(env!("CARGO_BIN_EXE_ideaforge"))
        .arg("--store")
        .arg(dir.path().join("ideas.sqlite"))
        .args(["submit", "--name", "Ada", "--email", "ada@example.com", "   "])
        .env("OPENROUTER_API_KEY", "sk-test")
        .env("OPENROUTER_BASE_URL", "http://127.0.0.1:9")
        .env("RUST_LOG", "off")
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Please fill in"));
}
