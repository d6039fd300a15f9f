#![forbid(unsafe_code)]

use canopy_core::ids::{PageId, PaneId, WorkspaceId};
use canopy_session::{DropOutcome, PageSession, SessionError, StructuralEvent};
use canopy_storage::{InsertPageRequest, SqliteStore, StoreError};
use std::collections::BTreeSet;
use std::path::PathBuf;

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let dir = base.join(format!("canopy_session_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn page(id: &str) -> PageId {
    PageId::try_new(id).expect("page id")
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

/// Private pane: root -> [B, C], B -> [D]. Public pane: root -> [P].
fn seed(test_name: &str) -> (SqliteStore, WorkspaceId) {
    let storage_dir = temp_dir(test_name);
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let workspace = WorkspaceId::try_new("ws_session").expect("workspace id");
    insert(&mut store, &workspace, "priv-root", None);
    insert(&mut store, &workspace, "B", Some("priv-root"));
    insert(&mut store, &workspace, "C", Some("priv-root"));
    insert(&mut store, &workspace, "D", Some("B"));
    insert(&mut store, &workspace, "pub-root", None);
    insert(&mut store, &workspace, "P", Some("pub-root"));
    (store, workspace)
}

fn panes() -> Vec<(PaneId, PageId)> {
    vec![
        (PaneId::try_new("private").expect("pane id"), page("priv-root")),
        (PaneId::try_new("public").expect("pane id"), page("pub-root")),
    ]
}

fn load(store: &SqliteStore, workspace: &WorkspaceId) -> PageSession {
    let expanded: BTreeSet<PageId> = [page("B")].into_iter().collect();
    PageSession::load(store, workspace, &panes(), &expanded).expect("load session")
}

fn visible_ids(session: &PageSession, pane: &PaneId) -> Vec<String> {
    session
        .visible(pane)
        .expect("known pane")
        .iter()
        .map(|item| item.id.as_str().to_string())
        .collect()
}

fn flat_index(session: &PageSession, pane: &PaneId, id: &str) -> usize {
    session
        .visible(pane)
        .expect("known pane")
        .iter()
        .position(|item| item.id.as_str() == id)
        .expect("item visible")
}

#[test]
fn load_renders_the_persisted_order() {
    let (store, workspace) = seed("load_renders_the_persisted_order");
    let session = load(&store, &workspace);
    let private = PaneId::try_new("private").expect("pane id");
    let public = PaneId::try_new("public").expect("pane id");

    assert_eq!(visible_ids(&session, &private), vec!["B", "D", "C"]);
    let items = session.visible(&private).expect("private pane");
    assert_eq!(items[0].path, vec![0]);
    assert_eq!(items[1].path, vec![0, 0]);
    assert_eq!(items[2].path, vec![1]);
    assert_eq!(visible_ids(&session, &public), vec!["P"]);
}

#[test]
fn collapsed_branches_are_not_rendered() {
    let (store, workspace) = seed("collapsed_branches_are_not_rendered");
    let mut session = load(&store, &workspace);
    let private = PaneId::try_new("private").expect("pane id");

    session
        .set_expanded(&private, &page("B"), false)
        .expect("collapse B");
    assert_eq!(visible_ids(&session, &private), vec!["B", "C"]);
    assert!(matches!(
        session.set_expanded(&private, &page("ghost"), true),
        Err(SessionError::NotFound)
    ));
}

#[test]
fn drop_between_persists_and_updates_the_view() {
    let (mut store, workspace) = seed("drop_between_persists_and_updates_the_view");
    let mut session = load(&store, &workspace);
    let private = PaneId::try_new("private").expect("pane id");

    // Drag D from under B to below C, at top level.
    let source = flat_index(&session, &private, "D");
    assert!(session.drag_start(&private, source));
    session.drag_update(&private, 2, 1);
    let outcome = session.drop_between(&mut store).expect("drop");
    assert_eq!(outcome, DropOutcome::Moved { cross_pane: false });

    assert_eq!(visible_ids(&session, &private), vec!["B", "C", "D"]);
    let root = store
        .page_get(&workspace, "priv-root")
        .expect("get root")
        .expect("root exists");
    assert_eq!(root.children_order, vec!["B", "C", "D"]);
    let d = store
        .page_get(&workspace, "D")
        .expect("get D")
        .expect("D exists");
    assert_eq!(d.mpath, "priv-root.D.");
}

#[test]
fn drop_on_item_nests_and_persists() {
    let (mut store, workspace) = seed("drop_on_item_nests_and_persists");
    let mut session = load(&store, &workspace);
    let private = PaneId::try_new("private").expect("pane id");

    let source = flat_index(&session, &private, "C");
    assert!(session.drag_start(&private, source));
    let outcome = session
        .drop_on(&mut store, &private, &page("B"))
        .expect("combine");
    assert_eq!(outcome, DropOutcome::Moved { cross_pane: false });

    assert_eq!(visible_ids(&session, &private), vec!["B", "D", "C"]);
    let b = store
        .page_get(&workspace, "B")
        .expect("get B")
        .expect("B exists");
    assert_eq!(b.children_order, vec!["D", "C"]);
    assert_eq!(
        store
            .page_get(&workspace, "C")
            .expect("get C")
            .expect("C exists")
            .mpath,
        "priv-root.B.C."
    );
}

#[test]
fn cross_pane_drop_moves_the_subtree() {
    let (mut store, workspace) = seed("cross_pane_drop_moves_the_subtree");
    let mut session = load(&store, &workspace);
    let private = PaneId::try_new("private").expect("pane id");
    let public = PaneId::try_new("public").expect("pane id");

    let source = flat_index(&session, &private, "B");
    assert!(session.drag_start(&private, source));
    // One visible row in the public pane; the slot after it is valid for a
    // cross-pane drop.
    session.drag_update(&public, 1, 1);
    let outcome = session.drop_between(&mut store).expect("drop");
    assert_eq!(outcome, DropOutcome::Moved { cross_pane: true });

    assert_eq!(visible_ids(&session, &private), vec!["C"]);
    // B was left collapsed by the drag, so D stays hidden until expanded.
    assert_eq!(visible_ids(&session, &public), vec!["P", "B"]);
    session.set_expanded(&public, &page("B"), true).expect("expand B");
    assert_eq!(visible_ids(&session, &public), vec!["P", "B", "D"]);

    assert_eq!(
        store
            .page_get(&workspace, "D")
            .expect("get D")
            .expect("D exists")
            .mpath,
        "pub-root.B.D."
    );
}

#[test]
fn store_refusal_restores_the_pre_drag_view() {
    let (mut store, workspace) = seed("store_refusal_restores_the_pre_drag_view");
    let mut session = load(&store, &workspace);
    let private = PaneId::try_new("private").expect("pane id");
    let before = session.view().clone();

    // Another client deletes D while this session still renders it.
    store.page_delete(&workspace, "D").expect("delete D");

    let source = flat_index(&session, &private, "D");
    assert!(session.drag_start(&private, source));
    session.drag_update(&private, 2, 1);
    let outcome = session.drop_between(&mut store);
    assert!(matches!(
        outcome,
        Err(SessionError::Store(StoreError::NotFound))
    ));

    // The whole pre-drag view came back, dropped expansion state included.
    assert_eq!(session.view(), &before);
}

#[test]
fn bound_address_policy_declines_before_mutating() {
    let (mut store, workspace) = seed("bound_address_policy_declines_before_mutating");
    store
        .address_bind(&workspace, "C", "c.example.com")
        .expect("bind C");
    let mut session = load(&store, &workspace);
    let private = PaneId::try_new("private").expect("pane id");
    let public = PaneId::try_new("public").expect("pane id");
    let before = session.view().clone();

    // Nesting a bound page under a sibling is declined.
    let source = flat_index(&session, &private, "C");
    assert!(session.drag_start(&private, source));
    let outcome = session.drop_on(&mut store, &private, &page("B"));
    assert!(matches!(outcome, Err(SessionError::PolicyDeclined { .. })));
    assert_eq!(session.view(), &before);

    // So is carrying it into the other pane, even at top level.
    let source = flat_index(&session, &private, "C");
    assert!(session.drag_start(&private, source));
    session.drag_update(&public, 1, 1);
    let outcome = session.drop_between(&mut store);
    assert!(matches!(outcome, Err(SessionError::PolicyDeclined { .. })));
    assert_eq!(session.view(), &before);

    // Nothing reached the store.
    assert_eq!(
        store
            .page_get(&workspace, "C")
            .expect("get C")
            .expect("C exists")
            .mpath,
        "priv-root.C."
    );

    // Reordering at top level of its own pane is still allowed.
    let source = flat_index(&session, &private, "C");
    assert!(session.drag_start(&private, source));
    session.drag_update(&private, 0, 1);
    let outcome = session.drop_between(&mut store).expect("reorder");
    assert_eq!(outcome, DropOutcome::Moved { cross_pane: false });
    assert_eq!(visible_ids(&session, &private), vec!["C", "B", "D"]);
}

#[test]
fn sessions_converge_through_structural_events() {
    let (mut store, workspace) = seed("sessions_converge_through_structural_events");
    let mut session_a = load(&store, &workspace);
    let mut session_b = load(&store, &workspace);
    let private = PaneId::try_new("private").expect("pane id");

    let source = flat_index(&session_a, &private, "D");
    assert!(session_a.drag_start(&private, source));
    session_a.drag_update(&private, 2, 1);
    session_a.drop_between(&mut store).expect("drop");

    let event = StructuralEvent::Moved {
        page_id: "D".to_string(),
        new_parent_id: "priv-root".to_string(),
        new_index: Some(2),
    };
    let payload = event.to_json().expect("encode");
    assert!(session_b.apply_remote_json(&payload));

    assert_eq!(
        visible_ids(&session_a, &private),
        visible_ids(&session_b, &private)
    );
}

#[test]
fn remote_create_and_delete_update_the_view() {
    let (store, workspace) = seed("remote_create_and_delete_update_the_view");
    let mut session = load(&store, &workspace);
    let private = PaneId::try_new("private").expect("pane id");

    assert!(session.apply_remote(&StructuralEvent::Created {
        page_id: "E".to_string(),
        parent_id: "priv-root".to_string(),
        index: Some(0),
        title: "E".to_string(),
        address_bound: false,
    }));
    assert_eq!(visible_ids(&session, &private), vec!["E", "B", "D", "C"]);

    // Deleting B takes its subtree with it.
    assert!(session.apply_remote(&StructuralEvent::Deleted {
        page_id: "B".to_string(),
    }));
    assert_eq!(visible_ids(&session, &private), vec!["E", "C"]);
    assert!(!session.view().pane(&private).expect("pane").contains(&page("D")));
}

#[test]
fn remote_events_naming_unknown_pages_are_dropped() {
    let (store, workspace) = seed("remote_events_naming_unknown_pages_are_dropped");
    let mut session = load(&store, &workspace);
    let private = PaneId::try_new("private").expect("pane id");
    let before = visible_ids(&session, &private);

    assert!(!session.apply_remote(&StructuralEvent::Deleted {
        page_id: "ghost".to_string(),
    }));
    assert!(!session.apply_remote(&StructuralEvent::Moved {
        page_id: "D".to_string(),
        new_parent_id: "ghost".to_string(),
        new_index: None,
    }));
    assert!(!session.apply_remote_json("{\"type\":\"deleted\"}"));

    assert_eq!(visible_ids(&session, &private), before);
}
