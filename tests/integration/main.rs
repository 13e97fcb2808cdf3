//! Integration tests for distill
//!
//! These tests drive the Java front end, the history model and the CLI
//! together over multi-revision inputs.

use std::process::Command;

use distill_core::{
    AstHelper, EntityHistory, EntityType, HistoryStore, ModifierSet, load_store, save_store,
};
use distill_java::{HelperConfig, JavaAstHelper, ParseRequest, create_parser_pool};
use tempfile::TempDir;

const REVISION_1: &str = r#"
package shop;

public class Cart {
    private int size;

    public void add(String item) {
        size++;
    }

    static class Line {
        String sku;
    }
}
"#;

const REVISION_2: &str = r#"
package shop;

public class Cart {
    private final int size = 0;

    public final void add(String item) {
        log(item);
    }

    public void add(String item, int quantity) {
        add(item);
    }

    static class Line {
        String sku;
        int quantity;
    }
}
"#;

fn record(store: &mut HistoryStore, source: &str, label: &str) -> usize {
    JavaAstHelper::from_source(source, HelperConfig::default())
        .unwrap()
        .record_compilation_unit(store, Some(label))
}

/// Two revisions merge into one history per declaration
#[test]
fn test_two_revisions() {
    let mut store = HistoryStore::new();
    assert_eq!(record(&mut store, REVISION_1, "r1"), 5);
    assert_eq!(record(&mut store, REVISION_2, "r2"), 7);

    let cart = store.find_class("shop.Cart").unwrap();
    assert_eq!(cart.version_count(), 2);

    let add = store.find_method("shop.Cart.add(String)").unwrap();
    let modifiers: Vec<_> = add.versions().iter().map(|v| v.modifiers).collect();
    assert_eq!(
        modifiers,
        vec![ModifierSet::PUBLIC, ModifierSet::PUBLIC | ModifierSet::FINAL]
    );

    let overload = store.find_method("shop.Cart.add(String,int)").unwrap();
    assert_eq!(overload.version_count(), 1);
    assert_eq!(overload.latest().version.as_deref(), Some("r2"));

    let size = store.find_attribute("shop.Cart.size").unwrap();
    assert_eq!(size.latest().modifiers, ModifierSet::PRIVATE | ModifierSet::FINAL);

    let line = store.find_class("shop.Cart.Line").unwrap();
    assert_eq!(line.version_count(), 2);
    assert_eq!(line.find_attribute("shop.Cart.Line.sku").unwrap().version_count(), 2);
    assert_eq!(line.find_attribute("shop.Cart.Line.quantity").unwrap().version_count(), 1);

    assert_eq!(store.history_count(), 7);
    assert_eq!(store.revision_count(), 2);
}

/// Store survives a save and load, and keeps merging afterwards
#[test]
fn test_store_round_trip_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("history").join("store.json");

    assert!(load_store(&path).unwrap().is_none());

    let mut store = HistoryStore::new();
    record(&mut store, REVISION_1, "r1");
    save_store(&store, &path).unwrap();

    let mut loaded = load_store(&path).unwrap().unwrap();
    assert_eq!(loaded, store);

    record(&mut loaded, REVISION_2, "r2");
    assert_eq!(loaded.find_method("shop.Cart.add(String)").unwrap().version_count(), 2);
}

/// Revisions parsed on the pool record the same histories as sequential parsing
#[test]
fn test_parser_pool_feeds_histories() {
    let pool = create_parser_pool(Some(2));
    let requests = vec![
        ParseRequest {
            content: REVISION_1.to_string(),
            path: "r1/Cart.java".into(),
        },
        ParseRequest {
            content: REVISION_2.to_string(),
            path: "r2/Cart.java".into(),
        },
    ];

    let mut pooled = HistoryStore::new();
    for (result, label) in pool.parse_all(requests).into_iter().zip(["r1", "r2"]) {
        let helper = JavaAstHelper::new(result.unwrap().into_compilation(), HelperConfig::default());
        helper.record_compilation_unit(&mut pooled, Some(label));
    }

    let mut sequential = HistoryStore::new();
    record(&mut sequential, REVISION_1, "r1");
    record(&mut sequential, REVISION_2, "r2");

    assert_eq!(pooled, sequential);
}

/// Declaration and body trees agree on identity with the snapshots
#[test]
fn test_trees_and_snapshots_agree() {
    let helper = JavaAstHelper::from_source(REVISION_2, HelperConfig::default()).unwrap();
    let unit = helper.structure_tree();

    for node in unit.iter().skip(1) {
        let snapshot = helper.snapshot(node);
        let tree = helper.declaration_tree(node);
        assert_eq!(tree.label(), snapshot.unique_name);
        assert_eq!(tree.kind(), snapshot.kind);
        assert_eq!(tree.entity().unwrap().modifiers(), snapshot.modifiers);
    }

    let add = unit.find("shop.Cart.add(String,int)").unwrap();
    let body = helper.method_body_tree(add).unwrap();
    assert_eq!(body.label(), "shop.Cart.add(String,int)");
    assert_eq!(body.children()[0].kind(), EntityType::ExpressionStatement);
    assert_eq!(body.children()[0].label(), "add(item)");
}

fn distill() -> Command {
    Command::new(env!("CARGO_BIN_EXE_distill"))
}

/// The CLI records revisions into a store file
#[test]
fn test_cli_history() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("Cart1.java");
    let second = temp_dir.path().join("Cart2.java");
    let store_path = temp_dir.path().join("store.json");
    std::fs::write(&first, REVISION_1).unwrap();
    std::fs::write(&second, REVISION_2).unwrap();

    let output = distill()
        .current_dir(temp_dir.path())
        .arg("history")
        .arg(&first)
        .arg(&second)
        .args(["--label", "r1", "--label", "r2", "--store"])
        .arg(&store_path)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("type shop.Cart (2 versions)"));
    assert!(stdout.contains("method shop.Cart.add(String,int) (1 versions)"));

    let saved = load_store(&store_path).unwrap().unwrap();
    assert_eq!(saved.history_count(), 7);

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).unwrap();
    assert_eq!(raw["format_version"], 1);
    assert!(raw["saved_at"].is_string());
}

/// The CLI prints declaration and body trees, honoring the config file
#[test]
fn test_cli_trees_and_config() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("Cart.java");
    std::fs::write(&file, REVISION_2).unwrap();

    let output = distill()
        .current_dir(temp_dir.path())
        .arg("tree")
        .arg(&file)
        .args(["--name", "shop.Cart.size"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Field: shop.Cart.size\n"));
    assert!(stdout.contains("Initializer: 0"));

    let output = distill()
        .current_dir(temp_dir.path())
        .arg("body")
        .arg(&file)
        .arg("shop.Cart.add(String)")
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["kind"], "Method");
    assert_eq!(body["children"][0]["label"], "log(item)");

    std::fs::write(temp_dir.path().join("distill.toml"), "signature_style = \"name-only\"\n").unwrap();
    let output = distill()
        .current_dir(temp_dir.path())
        .arg("structure")
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("method shop.Cart.add()"));
    assert!(!stdout.contains("add(String)"));

    let output = distill()
        .current_dir(temp_dir.path())
        .arg("body")
        .arg(&file)
        .arg("shop.Cart.size")
        .output()
        .unwrap();
    assert!(!output.status.success());
}
