use pretty_assertions::assert_eq;
use roots_core::{FamilyTree, Importer, MemoryStore, RootsConfig};
use roots_model::{CancelToken, DocumentSink, DocumentStore, FindingCode, Location, Pedigree, PersonId, Severity};
use roots_test_utils::{PersonDoc, BASIC_IMPORT, STEP_IMPORT};

fn tree_over(store: &MemoryStore) -> FamilyTree {
    let tree = FamilyTree::new(RootsConfig::default());
    tree.load(store).unwrap();
    tree
}

#[test]
fn basic_import_links_parent_and_child() {
    let mut store = MemoryStore::new();
    let report = Importer::default()
        .run(BASIC_IMPORT.as_bytes(), &mut store, &CancelToken::new())
        .unwrap();

    assert!(!report.cancelled);
    assert!(report.findings.iter().all(|f| f.severity < Severity::Warning));
    assert_eq!(report.graph.len(), 2);

    let john = &report.ids["@I1@"];
    let jane = &report.ids["@I2@"];
    let children = report.graph.children_of(john);
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].0, Pedigree::Biological);
    assert_eq!(&children[0].1.id, jane);
    assert_eq!(report.graph.get(jane).and_then(|n| n.father.as_ref()), Some(john));

    // the written documents rebuild into the same graph
    let tree = tree_over(&store);
    assert_eq!(tree.graph().children_of(john).len(), 1);
    assert!(tree.validate().iter().all(|f| f.severity < Severity::Warning));
}

#[test]
fn step_parent_does_not_conflict_with_biological_father() {
    let mut store = MemoryStore::new();
    let report = Importer::default()
        .run(STEP_IMPORT.as_bytes(), &mut store, &CancelToken::new())
        .unwrap();
    let john = report.ids["@I1@"].clone();
    let jane = report.ids["@I2@"].clone();

    let jane_at = Location::new("People/Jane Doe.md");
    let mut meta = store.read_metadata(&jane_at).unwrap();
    meta.insert("father_id", "real-dad");
    store.write_metadata(&jane_at, meta).unwrap();
    store
        .write_document(
            PersonDoc::new("People/Real Dad.md")
                .id("real-dad")
                .name("Real Dad")
                .sex("M")
                .text("children_id", jane.as_str())
                .build(),
        )
        .unwrap();

    let tree = tree_over(&store);
    let graph = tree.graph();
    let node = graph.get(&jane).unwrap();
    assert_eq!(node.step_fathers, vec![john.clone()]);
    assert_eq!(node.father, Some(PersonId::new("real-dad")));
    assert_eq!(graph.children_of(&john)[0].0, Pedigree::Step);

    let findings = tree.validate();
    assert!(!findings.iter().any(|f| f.code == FindingCode::ParentClaimConflict));
}

#[test]
fn ambiguous_link_is_reported_once_with_both_candidates() {
    let store = MemoryStore::with_documents([
        PersonDoc::new("People/John Smith.md").id("j1").name("John Smith").sex("M").build(),
        PersonDoc::new("Archive/John Smith.md").id("j2").name("John Smith").sex("M").build(),
        PersonDoc::new("People/Kid.md").id("k").name("Kid").text("father", "John Smith").build(),
    ]);
    let tree = tree_over(&store);

    let ambiguous: Vec<_> = tree
        .validate()
        .into_iter()
        .filter(|f| f.code == FindingCode::AmbiguousReference)
        .collect();
    assert_eq!(ambiguous.len(), 1);
    assert_eq!(
        ambiguous[0].candidates,
        vec!["Archive/John Smith.md".to_string(), "People/John Smith.md".to_string()]
    );
    assert_eq!(tree.graph().get(&PersonId::new("k")).unwrap().father, None);
}

#[test]
fn explicit_id_beats_link() {
    let store = MemoryStore::with_documents([
        PersonDoc::new("People/Dad.md").id("d").name("Dad").sex("M").build(),
        PersonDoc::new("People/Other.md").id("o").name("Other").sex("M").build(),
        PersonDoc::new("People/Kid.md")
            .id("k")
            .name("Kid")
            .text("father_id", "d")
            .text("father", "[[Other]]")
            .build(),
    ]);
    let tree = tree_over(&store);

    let graph = tree.graph();
    assert_eq!(graph.get(&PersonId::new("k")).unwrap().father, Some(PersonId::new("d")));
    let mismatch = tree
        .validate()
        .into_iter()
        .find(|f| f.code == FindingCode::LinkMismatch)
        .unwrap();
    assert!(mismatch.mentions("d"));
    assert!(mismatch.mentions("o"));
}

#[test]
fn parent_cycle_is_reported_once() {
    let store = MemoryStore::with_documents([
        PersonDoc::new("People/A.md").id("a").name("A").sex("M").text("father_id", "b").build(),
        PersonDoc::new("People/B.md").id("b").name("B").sex("M").text("father_id", "c").build(),
        PersonDoc::new("People/C.md").id("c").name("C").sex("M").text("father_id", "a").build(),
    ]);
    let tree = tree_over(&store);

    let cycles: Vec<_> = tree
        .validate()
        .into_iter()
        .filter(|f| f.code == FindingCode::RelationshipCycle)
        .collect();
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].severity, Severity::Error);

    let mut members = cycles[0].subjects.clone();
    members.sort();
    assert_eq!(members, vec!["a", "b", "c"]);
    assert_eq!(tree.graph().cycles().len(), 1);
}

#[test]
fn cancelled_import_keeps_nothing_half_written() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let mut store = MemoryStore::new();
    let report = Importer::default().run(BASIC_IMPORT.as_bytes(), &mut store, &cancel).unwrap();

    assert!(report.cancelled);
    assert!(store.list_documents().unwrap().is_empty());
}
