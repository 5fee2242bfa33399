use std::sync::Once;

use jobhunt_core::{
    JobResult, JobSource, MemoryStore, NewSavedItem, OwnerId, SaveOutcome, SavedItemStore,
    SavedItems,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(jobhunt_logging::initialize_for_tests);
}

fn reconciler() -> SavedItems<MemoryStore> {
    SavedItems::new(
        MemoryStore::new(),
        Box::new(|| "2026-01-01T00:00:00Z".to_string()),
    )
}

fn job(link: &str) -> JobResult {
    JobResult {
        title: "Backend Engineer".to_string(),
        company: "Acme".to_string(),
        location: "Madrid".to_string(),
        salary: Some("40.000 €".to_string()),
        link: link.to_string(),
        source: JobSource::InfoJobs,
    }
}

#[test]
fn saving_twice_keeps_one_item() {
    init_logging();
    let mut saved = reconciler();
    let owner = OwnerId::new("alice");

    let item = match saved.save(&owner, &job("https://x/1")).unwrap() {
        SaveOutcome::Saved(item) => item,
        other => panic!("expected a new item, got {other:?}"),
    };
    assert_eq!(item.saved_at, "2026-01-01T00:00:00Z");
    assert!(saved.contains(&owner, "https://x/1").unwrap());

    let second = saved.save(&owner, &job("https://x/1")).unwrap();
    assert_eq!(second, SaveOutcome::AlreadySaved);
    assert!(saved.contains(&owner, "https://x/1").unwrap());
    assert_eq!(saved.list(&owner).unwrap().len(), 1);

    saved.remove(&item.id).unwrap();
    assert!(!saved.contains(&owner, "https://x/1").unwrap());
}

#[test]
fn owners_are_isolated() {
    init_logging();
    let mut saved = reconciler();
    let alice = OwnerId::new("alice");
    let bob = OwnerId::new("bob");

    saved.save(&alice, &job("https://x/1")).unwrap();
    assert!(!saved.contains(&bob, "https://x/1").unwrap());
    assert!(matches!(
        saved.save(&bob, &job("https://x/1")).unwrap(),
        SaveOutcome::Saved(_)
    ));
    assert!(saved.contains(&alice, "https://x/1").unwrap());
    assert_eq!(saved.store().len(), 2);
}

#[test]
fn removing_unknown_id_is_noop() {
    init_logging();
    let mut saved = reconciler();
    let owner = OwnerId::new("alice");
    saved.save(&owner, &job("https://x/1")).unwrap();

    let ghost = jobhunt_core::SavedItemId::new("saved-999");
    saved.remove(&ghost).unwrap();
    assert_eq!(saved.list(&owner).unwrap().len(), 1);
}

#[test]
fn guard_holds_when_store_changes_underneath() {
    init_logging();
    let mut store = MemoryStore::new();
    store
        .create(NewSavedItem {
            owner_id: OwnerId::new("alice"),
            saved_at: "2025-12-31T00:00:00Z".to_string(),
            job: job("https://x/1"),
        })
        .unwrap();

    let mut saved = SavedItems::new(store, Box::new(|| "now".to_string()));
    let owner = OwnerId::new("alice");
    assert_eq!(
        saved.save(&owner, &job("https://x/1")).unwrap(),
        SaveOutcome::AlreadySaved
    );
    assert_eq!(saved.into_store().len(), 1);
}
