use qa_compare::auth;
use qa_compare::auth::storage::{AuthStorage, Credential, TokenSource};

/// Helper: create a temp dir with a database path inside it.
fn temp_db() -> (String, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("auth.db");
    (path.to_str().unwrap().to_string(), dir)
}

/// An env var name nothing sets, so lookups fall through.
const UNSET_ENV: &str = "QA_COMPARE_TEST_TOKEN_NEVER_SET";

// ── Storage CRUD ──────────────────────────────────────────────────

#[test]
fn get_returns_none_when_empty() {
    let storage = AuthStorage::open(":memory:").unwrap();
    assert!(storage.get("huggingface").unwrap().is_none());
}

#[test]
fn set_and_get_api_key() {
    let storage = AuthStorage::open(":memory:").unwrap();
    storage
        .set(
            "huggingface",
            Credential::ApiKey {
                key: "hf_test".to_string(),
            },
        )
        .unwrap();

    let Credential::ApiKey { key } = storage.get("huggingface").unwrap().unwrap();
    assert_eq!(key, "hf_test");
}

#[test]
fn set_overwrites_existing() {
    let storage = AuthStorage::open(":memory:").unwrap();
    for key in ["old", "new"] {
        storage
            .set(
                "huggingface",
                Credential::ApiKey {
                    key: key.to_string(),
                },
            )
            .unwrap();
    }
    assert_eq!(
        storage.get("huggingface").unwrap(),
        Some(Credential::ApiKey {
            key: "new".to_string()
        })
    );
}

#[test]
fn remove_deletes_credential() {
    let storage = AuthStorage::open(":memory:").unwrap();
    storage
        .set(
            "huggingface",
            Credential::ApiKey {
                key: "hf_test".to_string(),
            },
        )
        .unwrap();

    storage.remove("huggingface").unwrap();
    assert!(storage.get("huggingface").unwrap().is_none());
}

#[test]
fn remove_nonexistent_is_ok() {
    let storage = AuthStorage::open(":memory:").unwrap();
    storage.remove("huggingface").unwrap();
}

#[test]
fn credential_serializes_with_type_tag() {
    let json = serde_json::to_value(Credential::ApiKey {
        key: "k".to_string(),
    })
    .unwrap();
    assert_eq!(json["type"], "api_key");
    assert_eq!(json["key"], "k");
}

// ── Token lookup ──────────────────────────────────────────────────

#[test]
fn get_token_prefers_stored_key() {
    let storage = AuthStorage::open(":memory:").unwrap();
    storage
        .set(
            "huggingface",
            Credential::ApiKey {
                key: "hf_stored".to_string(),
            },
        )
        .unwrap();

    let (token, source) = storage.get_token("huggingface", UNSET_ENV).unwrap();
    assert_eq!(token.as_deref(), Some("hf_stored"));
    assert_eq!(source, TokenSource::Stored);
}

#[test]
fn get_token_anonymous_when_nothing_set() {
    let storage = AuthStorage::open(":memory:").unwrap();
    let (token, source) = storage.get_token("huggingface", UNSET_ENV).unwrap();
    assert!(token.is_none());
    assert_eq!(source, TokenSource::Anonymous);
    assert_eq!(source.describe(), "anonymous");
}

#[test]
fn get_token_reads_env_var() {
    // PATH is always set and non-empty, so it stands in for a token variable.
    let storage = AuthStorage::open(":memory:").unwrap();
    let (token, source) = storage.get_token("huggingface", "PATH").unwrap();
    assert!(token.is_some());
    assert_eq!(source, TokenSource::Env);
}

// ── login / logout ────────────────────────────────────────────────

#[test]
fn login_persists_token() {
    let (db, _dir) = temp_db();
    auth::login(&db, "huggingface", "  hf_abc \n").unwrap();

    let storage = AuthStorage::open(&db).unwrap();
    assert_eq!(
        storage.get("huggingface").unwrap(),
        Some(Credential::ApiKey {
            key: "hf_abc".to_string()
        })
    );
}

#[test]
fn login_rejects_unknown_provider() {
    let (db, _dir) = temp_db();
    let err = auth::login(&db, "openai", "sk-x").unwrap_err();
    assert!(err.to_string().contains("unsupported provider"));
}

#[test]
fn login_rejects_blank_token() {
    let (db, _dir) = temp_db();
    assert!(auth::login(&db, "huggingface", "   ").is_err());
}

#[test]
fn logout_removes_token() {
    let (db, _dir) = temp_db();
    auth::login(&db, "huggingface", "hf_abc").unwrap();
    auth::logout(&db, "huggingface").unwrap();

    let storage = AuthStorage::open(&db).unwrap();
    assert!(storage.get("huggingface").unwrap().is_none());
}

#[test]
fn storage_shares_database_with_config() {
    let (db, _dir) = temp_db();
    auth::login(&db, "huggingface", "hf_abc").unwrap();

    let config = qa_compare::config::Config::open(&db).unwrap();
    config.set("timeout", "30").unwrap();

    let storage = AuthStorage::open(&db).unwrap();
    assert!(storage.get("huggingface").unwrap().is_some());
    assert_eq!(config.get("timeout").unwrap().as_deref(), Some("30"));
}
