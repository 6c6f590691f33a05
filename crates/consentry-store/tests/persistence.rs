//! End-to-end persistence tests over the durable SQLite backend.

use consentry_core::{ConsentChoices, ConsentConfig, ConsentRecord, ANALYTICS, ESSENTIAL};
use consentry_store::{ConsentStore, SqliteBackend, StorageBackend};

fn config_in(dir: &std::path::Path) -> ConsentConfig {
    ConsentConfig {
        data_dir: dir.to_path_buf(),
        user_agent: Some("IntegrationTest/1.0".to_string()),
        ..ConsentConfig::default()
    }
}

fn analytics_only(granted: bool) -> ConsentChoices {
    let mut c = ConsentChoices::new();
    c.insert(ANALYTICS.to_string(), granted);
    c
}

#[test]
fn record_survives_store_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let written = {
        let store = ConsentStore::open(&config).unwrap();
        store.write(analytics_only(true)).unwrap()
    };
    assert_eq!(written.user_agent.as_deref(), Some("IntegrationTest/1.0"));

    let store = ConsentStore::open(&config).unwrap();
    let read = store.read().unwrap();
    assert_eq!(read, written);
    assert!(store.has_consent(ANALYTICS));
    assert!(store.has_consent(ESSENTIAL));
}

#[test]
fn revoke_is_durable() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    {
        let store = ConsentStore::open(&config).unwrap();
        store.write(analytics_only(true)).unwrap();
        store.revoke().unwrap();
    }

    let store = ConsentStore::open(&config).unwrap();
    assert!(store.read().is_none());
}

#[test]
fn namespaces_do_not_collide() {
    let dir = tempfile::tempdir().unwrap();
    let site_a = ConsentConfig {
        namespace: "site_a_consent".to_string(),
        ..config_in(dir.path())
    };
    let site_b = ConsentConfig {
        namespace: "site_b_consent".to_string(),
        ..config_in(dir.path())
    };

    let store_a = ConsentStore::open(&site_a).unwrap();
    let store_b = ConsentStore::open(&site_b).unwrap();

    store_a.write(analytics_only(true)).unwrap();
    assert!(store_a.has_consent(ANALYTICS));
    assert!(!store_b.has_consent(ANALYTICS));
    assert!(store_b.read().is_none());
}

#[test]
fn corrupt_stored_value_reads_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let backend = SqliteBackend::open(&config.data_dir).unwrap();
    backend.save(&config.namespace, "definitely not json").unwrap();

    let store = ConsentStore::new(Box::new(backend), &config);
    assert!(store.read().is_none());
    assert!(!store.has_consent(ANALYTICS));
}

#[test]
fn legacy_banner_payload_is_readable() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let backend = SqliteBackend::open(&config.data_dir).unwrap();
    backend
        .save(
            &config.namespace,
            r#"{"choices":{"essential":true,"analytics":false},"ts":"2025-06-12T18:30:00.000Z","ua":"Mozilla/5.0"}"#,
        )
        .unwrap();

    let store = ConsentStore::new(Box::new(backend), &config);
    let record: ConsentRecord = store.read().unwrap();
    assert!(record.allows(ESSENTIAL));
    assert!(!record.allows(ANALYTICS));
}
