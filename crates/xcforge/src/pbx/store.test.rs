use super::*;
use crate::primitives::{PhaseKind, SourceTree};

fn sample_group() -> Object {
    Object::Group(Group {
        children: Vec::new(),
        name: Some("Sources".to_string()),
        path: None,
        source_tree: SourceTree::Group,
    })
}

#[test]
fn add_then_get_round_trips() {
    let mut store = ObjectStore::new();
    let id = ObjectId::new("4B2A1C0D2C5E10A400F3D9E1");
    store.add(id.clone(), sample_group()).unwrap();

    assert!(store.contains(&id));
    assert_eq!(store.len(), 1);
    assert_eq!(
        store.get(&id).unwrap().as_group().unwrap().name.as_deref(),
        Some("Sources")
    );
}

#[test]
fn duplicate_identifier_is_rejected() {
    let mut store = ObjectStore::new();
    let id = ObjectId::new("4B2A1C0D2C5E10A400F3D9E1");
    store.add(id.clone(), sample_group()).unwrap();

    let err = store.add(id.clone(), sample_group()).unwrap_err();
    assert_eq!(err, StoreError::DuplicateIdentifier { id });
    assert_eq!(store.len(), 1);
}

#[test]
fn remove_returns_the_object() {
    let mut store = ObjectStore::new();
    let id = ObjectId::new("4B2A1C0D2C5E10A400F3D9E1");
    store.add(id.clone(), sample_group()).unwrap();

    let removed = store.remove(&id).unwrap();
    assert!(removed.as_group().is_some());
    assert!(!store.contains(&id));
    assert!(store.is_empty());
    assert!(store.remove(&id).is_none());
}

#[test]
fn typed_iterators_filter_by_kind() {
    let mut store = ObjectStore::new();
    store
        .add(ObjectId::new("A000000000000000000000A1"), sample_group())
        .unwrap();
    store
        .add(
            ObjectId::new("A000000000000000000000A2"),
            Object::BuildPhase(BuildPhase::new(PhaseKind::Sources)),
        )
        .unwrap();
    store
        .add(
            ObjectId::new("A000000000000000000000A3"),
            Object::FileReference(FileReference {
                explicit_file_type: None,
                include_in_index: None,
                last_known_file_type: Some("sourcecode.swift".to_string()),
                name: None,
                path: "App.swift".to_string(),
                source_tree: SourceTree::Group,
            }),
        )
        .unwrap();

    assert_eq!(store.groups().count(), 1);
    assert_eq!(store.build_phases().count(), 1);
    assert_eq!(store.file_references().count(), 1);
    assert_eq!(store.native_targets().count(), 0);
    assert_eq!(store.build_files().count(), 0);
}
