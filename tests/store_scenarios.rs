//! End-to-end behaviour of the credential store over an in-memory vault.

use setpass::core::error::StoreError;
use setpass::core::metadata;
use setpass::core::store::CredentialStore;
use setpass::core::vault::{MemoryVault, SecretVault};

const USER: &str = "tester";

fn store() -> CredentialStore<MemoryVault> {
    CredentialStore::new(MemoryVault::new(), "pass", USER)
}

fn logins(store: &mut CredentialStore<MemoryVault>, service: &str) -> Vec<String> {
    store.index().unwrap().logins(service).to_vec()
}

#[test]
fn test_add_twice_registers_once() {
    let mut store = store();
    store.set("github", Some("alice"), "x").unwrap();
    store.set("github", Some("alice"), "x").unwrap();
    assert_eq!(logins(&mut store, "github"), vec!["alice"]);
}

#[test]
fn test_default_login_is_first_registered() {
    let mut store = store();
    store.set("github", Some("alice"), "x").unwrap();
    store.set("github", Some("bob"), "y").unwrap();
    store.set("github", Some("carol"), "z").unwrap();
    assert_eq!(store.default_login("github").unwrap(), "alice");
}

#[test]
fn test_default_login_for_unknown_service_is_user() {
    let mut store = store();
    assert_eq!(store.default_login("nowhere").unwrap(), USER);
}

#[test]
fn test_removing_unknown_pair_changes_nothing() {
    let mut store = store();
    store.set("github", Some("alice"), "x").unwrap();
    let before = store.index().unwrap().clone();

    let mut index = before.clone();
    assert!(!metadata::remove_login(&mut index, "github", "bob"));
    assert!(!metadata::remove_login(&mut index, "gitlab", "alice"));
    assert_eq!(index, before);
}

#[test]
fn test_saved_index_reloads_in_fresh_store() {
    let vault = MemoryVault::new();
    {
        let mut first = CredentialStore::new(&vault, "pass", USER);
        first.set("github", Some("alice"), "x").unwrap();
        first.set("github", Some("bob"), "y").unwrap();
        first.set("mail", None, "z").unwrap();
    }
    let mut second = CredentialStore::new(&vault, "pass", USER);
    let services = second.index().unwrap().services.clone();
    assert_eq!(services["github"], vec!["alice", "bob"]);
    assert_eq!(services["mail"], vec![USER]);
}

#[test]
fn test_set_without_login_on_empty_index() {
    let mut store = store();
    store.set("github", None, "abc").unwrap();

    let services = store.index().unwrap().services.clone();
    assert_eq!(services.len(), 1);
    assert_eq!(services["github"], vec![USER]);
    assert_eq!(
        store.resolve("github", None).unwrap(),
        (USER.to_string(), Some("abc".to_string()))
    );
}

#[test]
fn test_two_logins_list_in_order() {
    let mut store = store();
    store.set("github", Some("alice"), "x").unwrap();
    store.set("github", Some("bob"), "y").unwrap();
    assert_eq!(store.default_login("github").unwrap(), "alice");

    let listed: Vec<(String, Vec<String>)> = store
        .list_services()
        .unwrap()
        .map(|(s, l)| (s.to_string(), l.to_vec()))
        .collect();
    assert_eq!(
        listed,
        vec![(
            "github".to_string(),
            vec!["alice".to_string(), "bob".to_string()]
        )]
    );
}

#[test]
fn test_export_on_empty_index_reports_nothing_to_export() {
    let mut store = store();
    let err = store.export_all().unwrap_err();
    assert!(matches!(err, StoreError::EmptyInput(_)));
    assert!(err.is_user_visible());
    assert!(store.vault().is_empty());
}

#[test]
fn test_export_collects_every_pair() {
    let mut store = store();
    store.set("github", Some("bob"), "y").unwrap();
    store.set("github", Some("alice"), "x").unwrap();
    store.set("mail", None, "z").unwrap();

    let export = store.export_all().unwrap();
    let github: Vec<_> = export["github"].keys().cloned().collect();
    assert_eq!(github, vec!["bob", "alice"]);
    assert_eq!(export["github"]["alice"], "x");
    assert_eq!(export["mail"][USER], "z");
}

#[test]
fn test_delete_last_login_keeps_service_key() {
    let mut store = store();
    store.set("github", Some("alice"), "x").unwrap();
    store.delete("github", Some("alice")).unwrap();

    assert_eq!(
        store.index().unwrap().services.get("github"),
        Some(&Vec::<String>::new())
    );
    assert_eq!(store.vault().get("pass.github", "alice").unwrap(), None);
    assert!(matches!(
        store.delete("github", Some("alice")),
        Err(StoreError::NotFound { .. })
    ));

    let reloaded = metadata::load(store.vault(), "pass", USER).unwrap();
    assert_eq!(reloaded.services.get("github"), Some(&Vec::new()));
}

#[test]
fn test_export_then_import_into_fresh_vault() {
    let mut source = store();
    source.set("github", Some("bob"), "y").unwrap();
    source.set("github", Some("alice"), "x").unwrap();
    let export = source.export_all().unwrap();
    let text = serde_json::to_string(&export).unwrap();

    let mut target = store();
    let report = target.import_all(&text).unwrap();
    assert_eq!(report.imported.len(), 2);
    assert_eq!(target.default_login("github").unwrap(), "bob");
    assert_eq!(
        target.resolve("github", Some("alice")).unwrap().1,
        Some("x".to_string())
    );
}

#[test]
fn test_resync_after_out_of_band_delete() {
    let mut store = store();
    store.set("github", Some("alice"), "x").unwrap();
    store.vault().delete("pass.github", "alice").unwrap();

    let report = store.resync(false).unwrap();
    assert_eq!(report.stale.len(), 1);
    assert_eq!(store.default_login("github").unwrap(), USER);
}

#[test]
fn test_custom_namespace_is_used() {
    let vault = MemoryVault::new();
    let mut store = CredentialStore::new(&vault, "kol.pass", USER);
    store.set("github", Some("alice"), "x").unwrap();
    assert_eq!(
        vault.get("kol.pass.github", "alice").unwrap(),
        Some("x".to_string())
    );
    assert!(vault.get("kol.pass.meta", USER).unwrap().is_some());
}
