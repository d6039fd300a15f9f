#![forbid(unsafe_code)]

use canopy_core::ids::WorkspaceId;
use canopy_storage::{InsertPageRequest, MovePageRequest, SqliteStore, StoreError};
use std::path::PathBuf;

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let dir = base.join(format!("canopy_storage_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn insert(store: &mut SqliteStore, workspace: &WorkspaceId, id: &str, parent: Option<&str>) {
    store
        .page_insert(
            workspace,
            InsertPageRequest {
                id: id.to_string(),
                parent_id: parent.map(str::to_string),
                title: id.to_string(),
                index: None,
            },
        )
        .expect("insert page");
}

fn mpath(store: &SqliteStore, workspace: &WorkspaceId, id: &str) -> String {
    store
        .page_get(workspace, id)
        .expect("get page")
        .expect("page exists")
        .mpath
}

fn make_sample(store: &mut SqliteStore, workspace: &WorkspaceId) {
    // A -> [B, C], B -> [D]
    insert(store, workspace, "A", None);
    insert(store, workspace, "B", Some("A"));
    insert(store, workspace, "C", Some("A"));
    insert(store, workspace, "D", Some("B"));
}

#[test]
fn move_into_own_subtree_is_rejected_without_side_effects() {
    let storage_dir = temp_dir("move_into_own_subtree_is_rejected");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let workspace = WorkspaceId::try_new("ws_cycle").expect("workspace id");
    make_sample(&mut store, &workspace);

    let outcome = store.page_move(
        &workspace,
        MovePageRequest {
            id: "A".to_string(),
            new_parent_id: Some("D".to_string()),
            new_index: None,
        },
    );
    assert!(matches!(outcome, Err(StoreError::CyclicMove)));

    // Nothing moved.
    assert_eq!(mpath(&store, &workspace, "A"), "A.");
    assert_eq!(mpath(&store, &workspace, "D"), "A.B.D.");
    let d = store
        .page_get(&workspace, "D")
        .expect("get D")
        .expect("D exists");
    assert!(d.children_order.is_empty());
}

#[test]
fn moving_a_page_onto_itself_is_cyclic() {
    let storage_dir = temp_dir("moving_a_page_onto_itself_is_cyclic");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let workspace = WorkspaceId::try_new("ws_self").expect("workspace id");
    make_sample(&mut store, &workspace);

    let outcome = store.page_move(
        &workspace,
        MovePageRequest {
            id: "B".to_string(),
            new_parent_id: Some("B".to_string()),
            new_index: None,
        },
    );
    assert!(matches!(outcome, Err(StoreError::CyclicMove)));
}

#[test]
fn move_rewrites_descendant_mpaths() {
    let storage_dir = temp_dir("move_rewrites_descendant_mpaths");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let workspace = WorkspaceId::try_new("ws_rewrite").expect("workspace id");
    make_sample(&mut store, &workspace);

    let moved = store
        .page_move(
            &workspace,
            MovePageRequest {
                id: "B".to_string(),
                new_parent_id: Some("C".to_string()),
                new_index: None,
            },
        )
        .expect("move B under C");
    assert_eq!(moved.mpath, "A.C.B.");
    assert_eq!(moved.parent_id.as_deref(), Some("C"));

    // The whole subtree followed, one level down.
    assert_eq!(mpath(&store, &workspace, "D"), "A.C.B.D.");

    let a = store
        .page_get(&workspace, "A")
        .expect("get A")
        .expect("A exists");
    assert_eq!(a.children_order, vec!["C"]);
    let c = store
        .page_get(&workspace, "C")
        .expect("get C")
        .expect("C exists");
    assert_eq!(c.children_order, vec!["B"]);
}

#[test]
fn same_parent_move_is_a_reorder() {
    let storage_dir = temp_dir("same_parent_move_is_a_reorder");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let workspace = WorkspaceId::try_new("ws_reorder").expect("workspace id");
    insert(&mut store, &workspace, "A", None);
    insert(&mut store, &workspace, "B", Some("A"));
    insert(&mut store, &workspace, "C", Some("A"));
    insert(&mut store, &workspace, "E", Some("A"));

    store
        .page_move(
            &workspace,
            MovePageRequest {
                id: "B".to_string(),
                new_parent_id: Some("A".to_string()),
                new_index: Some(2),
            },
        )
        .expect("reorder B");

    let a = store
        .page_get(&workspace, "A")
        .expect("get A")
        .expect("A exists");
    assert_eq!(a.children_order, vec!["C", "E", "B"]);
    assert_eq!(mpath(&store, &workspace, "B"), "A.B.");
}

#[test]
fn move_to_root_promotes_the_subtree() {
    let storage_dir = temp_dir("move_to_root_promotes_the_subtree");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let workspace = WorkspaceId::try_new("ws_promote").expect("workspace id");
    make_sample(&mut store, &workspace);

    let moved = store
        .page_move(
            &workspace,
            MovePageRequest {
                id: "B".to_string(),
                new_parent_id: None,
                new_index: None,
            },
        )
        .expect("promote B");
    assert_eq!(moved.mpath, "B.");
    assert!(moved.parent_id.is_none());
    assert_eq!(mpath(&store, &workspace, "D"), "B.D.");

    let a = store
        .page_get(&workspace, "A")
        .expect("get A")
        .expect("A exists");
    assert_eq!(a.children_order, vec!["C"]);
}

#[test]
fn move_to_unknown_parent_fails() {
    let storage_dir = temp_dir("move_to_unknown_parent_fails");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let workspace = WorkspaceId::try_new("ws_no_parent").expect("workspace id");
    make_sample(&mut store, &workspace);

    let outcome = store.page_move(
        &workspace,
        MovePageRequest {
            id: "B".to_string(),
            new_parent_id: Some("ghost".to_string()),
            new_index: None,
        },
    );
    assert!(matches!(outcome, Err(StoreError::ParentNotFound)));
    assert_eq!(mpath(&store, &workspace, "B"), "A.B.");
}

#[test]
fn inserting_a_duplicate_id_fails() {
    let storage_dir = temp_dir("inserting_a_duplicate_id_fails");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let workspace = WorkspaceId::try_new("ws_dup").expect("workspace id");
    insert(&mut store, &workspace, "A", None);

    let outcome = store.page_insert(
        &workspace,
        InsertPageRequest {
            id: "A".to_string(),
            parent_id: None,
            title: "again".to_string(),
            index: None,
        },
    );
    assert!(matches!(outcome, Err(StoreError::PageExists)));
}

#[test]
fn insert_with_index_places_the_child() {
    let storage_dir = temp_dir("insert_with_index_places_the_child");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let workspace = WorkspaceId::try_new("ws_index").expect("workspace id");
    insert(&mut store, &workspace, "A", None);
    insert(&mut store, &workspace, "B", Some("A"));
    insert(&mut store, &workspace, "C", Some("A"));

    store
        .page_insert(
            &workspace,
            InsertPageRequest {
                id: "E".to_string(),
                parent_id: Some("A".to_string()),
                title: "E".to_string(),
                index: Some(0),
            },
        )
        .expect("insert at head");

    let a = store
        .page_get(&workspace, "A")
        .expect("get A")
        .expect("A exists");
    assert_eq!(a.children_order, vec!["E", "B", "C"]);
}

#[test]
fn subtree_membership_follows_mpaths() {
    let storage_dir = temp_dir("subtree_membership_follows_mpaths");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let workspace = WorkspaceId::try_new("ws_subtree").expect("workspace id");
    make_sample(&mut store, &workspace);

    assert!(store.page_in_subtree(&workspace, "D", "A").expect("D in A"));
    assert!(store.page_in_subtree(&workspace, "B", "B").expect("B in B"));
    assert!(!store.page_in_subtree(&workspace, "C", "B").expect("C in B"));
    assert!(matches!(
        store.page_in_subtree(&workspace, "ghost", "A"),
        Err(StoreError::NotFound)
    ));
}

#[test]
fn pages_list_orders_by_mpath() {
    let storage_dir = temp_dir("pages_list_orders_by_mpath");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let workspace = WorkspaceId::try_new("ws_list").expect("workspace id");
    make_sample(&mut store, &workspace);

    let ids: Vec<String> = store
        .pages_list(&workspace)
        .expect("list")
        .into_iter()
        .map(|row| row.id)
        .collect();
    assert_eq!(ids, vec!["A", "B", "D", "C"]);
}
