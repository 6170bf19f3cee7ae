use std::path::{Path, PathBuf};

use skill_engine::convert::{to_document, to_toon};
use skill_engine::{Registry, RegistryOptions};
use toon_codec::{decode, Scalar, ToonValue};

fn corpus() -> PathBuf {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/corpus")).to_path_buf()
}

#[test]
fn long_form_record_converts_to_abbreviated_toon() {
    let root = corpus();
    let registry = Registry::build(&root, &RegistryOptions::default()).unwrap();
    let record = registry.get("api-design").unwrap();

    let toon = to_toon(record, &root).unwrap();
    assert!(toon.starts_with("N: api-design\nC: backend\n"), "{toon}");
    assert!(toon.contains("P: backend/api-design\n"), "{toon}");

    let doc = decode(&toon).unwrap();
    assert_eq!(doc, to_document(record, &root));
    assert_eq!(
        doc.get("tags"),
        Some(&ToonValue::List(vec![
            Scalar::from("api"),
            Scalar::from("rest"),
            Scalar::from("openapi"),
        ]))
    );
    assert_eq!(
        doc.get("allowed_tools").and_then(ToonValue::as_list).map(<[Scalar]>::len),
        Some(3)
    );
}

#[test]
fn root_level_record_path_is_its_directory_name() {
    let root = corpus();
    let registry = Registry::build(&root, &RegistryOptions::default()).unwrap();
    let doc = to_document(registry.get("code-review").unwrap(), &root);
    assert_eq!(doc.get("path"), Some(&ToonValue::from("code-review")));
    assert_eq!(doc.get("category"), Some(&ToonValue::from("uncategorized")));
}

#[test]
fn empty_lists_are_kept() {
    let root = corpus();
    let registry = Registry::build(&root, &RegistryOptions::default()).unwrap();
    let doc = to_document(registry.get("code-review").unwrap(), &root);
    assert_eq!(doc.get("platforms"), Some(&ToonValue::List(vec![])));
}
