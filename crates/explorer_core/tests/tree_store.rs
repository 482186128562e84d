use explorer_core::{
    InMemoryTreeRepository, NodeId, NodeKind, SnapshotBody, TreeService, TreeServiceError,
};

struct DemoTree {
    service: TreeService<InMemoryTreeRepository>,
    documents: NodeId,
    work: NodeId,
}

fn demo_tree() -> DemoTree {
    let mut service = TreeService::default();
    let root = service.root_id();
    let documents = service.create_directory(root, "documents").unwrap().id;
    let work = service.create_directory(documents, "work").unwrap().id;
    service.create_file(work, "report", "hello").unwrap();
    DemoTree {
        service,
        documents,
        work,
    }
}

fn names(service: &TreeService<InMemoryTreeRepository>, directory: NodeId) -> Vec<String> {
    service
        .list_children(directory)
        .unwrap()
        .into_iter()
        .map(|child| child.name.clone())
        .collect()
}

#[test]
fn list_children_returns_nodes_in_creation_order() {
    let mut service = TreeService::default();
    let root = service.root_id();
    let mut created = Vec::new();
    for (index, name) in ["zeta", "alpha", "mid", "alpha"].iter().enumerate() {
        let node = if index % 2 == 0 {
            service.create_directory(root, name).unwrap()
        } else {
            service.create_file(root, name, "").unwrap()
        };
        created.push(node.id);
    }

    let listed: Vec<NodeId> = service
        .list_children(root)
        .unwrap()
        .into_iter()
        .map(|child| child.id)
        .collect();
    assert_eq!(listed, created);
}

#[test]
fn list_children_of_empty_directory_is_empty() {
    let mut service = TreeService::default();
    let root = service.root_id();
    let empty = service.create_directory(root, "empty").unwrap().id;
    assert!(service.list_children(empty).unwrap().is_empty());
}

#[test]
fn list_children_of_file_is_invalid_operation() {
    let mut service = TreeService::default();
    let root = service.root_id();
    let file = service.create_file(root, "notes", "x").unwrap().id;

    let err = service.list_children(file).unwrap_err();
    assert!(matches!(
        err,
        TreeServiceError::InvalidOperation { node_id, .. } if node_id == file
    ));
}

#[test]
fn create_under_file_is_invalid_operation() {
    let mut service = TreeService::default();
    let root = service.root_id();
    let file = service.create_file(root, "notes", "x").unwrap().id;

    let err = service.create_directory(file, "nested").unwrap_err();
    assert!(matches!(err, TreeServiceError::InvalidOperation { .. }));
    assert_eq!(service.node_count(), 2);
}

#[test]
fn demo_scenario_finds_work_and_report() {
    let tree = demo_tree();
    let service = &tree.service;
    let root = service.root_id();

    let work = service.find_by_name(root, "work").unwrap().unwrap();
    assert_eq!(work.id, tree.work);
    assert_eq!(work.kind(), NodeKind::Directory);
    assert_eq!(names(service, tree.work), vec!["report".to_string()]);

    let report = service.find_by_name(root, "report").unwrap().unwrap();
    assert_eq!(report.content(), Some("hello"));
    assert_eq!(service.read_file(report.id).unwrap(), "hello");
}

#[test]
fn removing_directory_drops_its_subtree() {
    let mut tree = demo_tree();
    let root = tree.service.root_id();

    let removed = tree.service.remove(tree.documents, "work").unwrap();
    assert_eq!(removed, 1);
    assert!(tree.service.find_by_name(root, "report").unwrap().is_none());
    assert!(tree.service.find_by_name(root, "work").unwrap().is_none());
    assert!(matches!(
        tree.service.get_node(tree.work),
        Err(TreeServiceError::NodeNotFound(id)) if id == tree.work
    ));
    assert_eq!(tree.service.node_count(), 2);
}

#[test]
fn find_by_name_reports_absence_as_none_and_require_as_error() {
    let tree = demo_tree();
    let root = tree.service.root_id();

    assert!(tree.service.find_by_name(root, "missing").unwrap().is_none());
    let err = tree.service.require_by_name(root, "missing").unwrap_err();
    assert_eq!(err, TreeServiceError::NameNotFound("missing".to_string()));
}

#[test]
fn find_by_name_matches_start_node_itself() {
    let tree = demo_tree();
    let found = tree.service.find_by_name(tree.work, "work").unwrap().unwrap();
    assert_eq!(found.id, tree.work);

    // Searching below `work` never climbs back to `documents`.
    assert!(tree
        .service
        .find_by_name(tree.work, "documents")
        .unwrap()
        .is_none());
}

#[test]
fn find_by_name_returns_first_pre_order_match() {
    let mut service = TreeService::default();
    let root = service.root_id();
    let a = service.create_directory(root, "a").unwrap().id;
    let deep = service.create_file(a, "target", "deep").unwrap().id;
    let shallow = service.create_file(root, "target", "shallow").unwrap().id;

    // Pre-order visits `a` and its subtree before the later sibling.
    let found = service.find_by_name(root, "target").unwrap().unwrap();
    assert_eq!(found.id, deep);
    assert_ne!(found.id, shallow);
}

#[test]
fn remove_deletes_all_same_named_children_and_keeps_order() {
    let mut service = TreeService::default();
    let root = service.root_id();
    service.create_directory(root, "one").unwrap();
    service.create_file(root, "dup", "first").unwrap();
    service.create_directory(root, "two").unwrap();
    service.create_directory(root, "dup").unwrap();
    service.create_file(root, "three", "").unwrap();

    assert_eq!(service.remove(root, "dup").unwrap(), 2);
    assert_eq!(names(&service, root), vec!["one", "two", "three"]);
}

#[test]
fn remove_without_match_is_a_no_op() {
    let mut tree = demo_tree();
    let root = tree.service.root_id();
    let before = tree.service.node_count();

    assert_eq!(tree.service.remove(root, "report").unwrap(), 0);
    assert_eq!(tree.service.node_count(), before);
}

#[test]
fn remove_node_by_id_leaves_same_named_sibling() {
    let mut service = TreeService::default();
    let root = service.root_id();
    let first = service.create_file(root, "dup", "1").unwrap().id;
    let second = service.create_file(root, "dup", "2").unwrap().id;

    let removed = service.remove_node(first).unwrap();
    assert_eq!(removed.content(), Some("1"));
    let remaining = service.require_by_name(root, "dup").unwrap();
    assert_eq!(remaining.id, second);
}

#[test]
fn root_cannot_be_removed() {
    let mut service = TreeService::default();
    let root = service.root_id();
    assert_eq!(
        service.remove_node(root).unwrap_err(),
        TreeServiceError::RootImmutable
    );
    assert!(service.root().is_ok());
}

#[test]
fn read_file_on_directory_is_invalid_operation() {
    let tree = demo_tree();
    assert!(matches!(
        tree.service.read_file(tree.work),
        Err(TreeServiceError::InvalidOperation { reason: "not a file", .. })
    ));
}

#[test]
fn file_content_round_trips_exactly() {
    let mut service = TreeService::default();
    let root = service.root_id();
    let content = "Content of the report.\nlorem ipsum dolor sit amet.";
    service.create_file(root, "report", content).unwrap();

    let found = service.find_by_name(root, "report").unwrap().unwrap();
    assert_eq!(found.content(), Some(content));
}

#[test]
fn created_nodes_carry_parent_and_timestamp() {
    let tree = demo_tree();
    let work = tree.service.get_node(tree.work).unwrap();
    assert_eq!(work.parent_id, Some(tree.documents));
    assert!(work.created_at > 0);
}

#[test]
fn path_of_and_resolve_path_agree() {
    let tree = demo_tree();
    let service = &tree.service;
    let root = service.root_id();

    assert_eq!(service.path_of(root).unwrap(), "/");
    let report = service.require_by_name(root, "report").unwrap();
    assert_eq!(
        service.path_of(report.id).unwrap(),
        "/documents/work/report"
    );

    let resolved = service.resolve_path(root, "/documents/work/report").unwrap();
    assert_eq!(resolved.id, report.id);
    let relative = service.resolve_path(tree.work, "../work/./report").unwrap();
    assert_eq!(relative.id, report.id);
    let above_root = service.resolve_path(root, "../..").unwrap();
    assert_eq!(above_root.id, root);
}

#[test]
fn resolve_path_through_file_is_invalid_operation() {
    let tree = demo_tree();
    let root = tree.service.root_id();

    let err = tree
        .service
        .resolve_path(root, "documents/work/report/more")
        .unwrap_err();
    assert!(matches!(err, TreeServiceError::InvalidOperation { .. }));

    let missing = tree.service.resolve_path(root, "documents/nope").unwrap_err();
    assert_eq!(missing, TreeServiceError::NameNotFound("nope".to_string()));
}

#[test]
fn render_tree_indents_by_depth() {
    let tree = demo_tree();
    let rendered = tree.service.render_tree(tree.service.root_id()).unwrap();
    assert_eq!(
        rendered,
        "root/\n  documents/\n    work/\n      report: hello\n"
    );
}

#[test]
fn snapshot_serializes_nested_children() {
    let tree = demo_tree();
    let snapshot = tree.service.snapshot(tree.documents).unwrap();

    assert_eq!(snapshot.name, "documents");
    let work = &snapshot.children()[0];
    assert_eq!(work.name, "work");
    assert!(matches!(
        &work.children()[0].body,
        SnapshotBody::File { content } if content == "hello"
    ));

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["kind"], "directory");
    assert_eq!(json["children"][0]["children"][0]["kind"], "file");
    assert_eq!(json["children"][0]["children"][0]["content"], "hello");
}

#[test]
fn names_are_looked_up_exactly_as_created() {
    let mut service = TreeService::default();
    let root = service.root_id();

    let err = service.create_file(root, " notes ", "x").unwrap_err();
    assert!(matches!(err, TreeServiceError::InvalidName(_)));
    assert!(service.find_by_name(root, " notes ").unwrap().is_none());

    service.create_file(root, "my notes", "x").unwrap();
    assert!(service.find_by_name(root, "my notes").unwrap().is_some());
    assert_eq!(service.remove(root, "my notes").unwrap(), 1);
    assert!(service.find_by_name(root, "my notes").unwrap().is_none());
}
