//! CLI command implementations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use distill_core::{
    AstHelper, ClassHistory, DeclarationNode, EntityHistory, HistoryStore, load_store, save_store,
};
use distill_java::{HelperConfig, JavaAstHelper, JavaCompilation, ParseRequest, create_parser_pool};

fn load_helper(file: &Path, config: &HelperConfig) -> Result<JavaAstHelper> {
    let content = std::fs::read(file).with_context(|| format!("Cannot read {}", file.display()))?;
    let compilation = JavaCompilation::parse_bytes(&content)
        .with_context(|| format!("Cannot parse {}", file.display()))?;
    Ok(JavaAstHelper::new(compilation, config.clone()))
}

pub fn structure(file: &Path, config: &HelperConfig) -> Result<()> {
    let helper = load_helper(file, config)?;
    print!("{}", helper.structure_tree().render());
    Ok(())
}

pub fn tree(file: &Path, name: Option<&str>, json: bool, config: &HelperConfig) -> Result<()> {
    let helper = load_helper(file, config)?;
    let unit = helper.structure_tree();

    let trees: Vec<DeclarationNode> = match name {
        Some(name) => {
            let node = unit
                .find(name)
                .with_context(|| format!("No declaration named {} in {}", name, file.display()))?;
            vec![helper.declaration_tree(node)]
        }
        None => unit
            .children()
            .iter()
            .map(|ty| helper.declaration_tree(ty))
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&trees)?);
    } else {
        for tree in &trees {
            print!("{}", tree.render());
        }
    }
    Ok(())
}

pub fn body(file: &Path, name: &str, json: bool, config: &HelperConfig) -> Result<()> {
    let helper = load_helper(file, config)?;
    let unit = helper.structure_tree();
    let node = unit
        .find(name)
        .with_context(|| format!("No declaration named {} in {}", name, file.display()))?;
    let tree = helper
        .method_body_tree(node)
        .with_context(|| format!("{} is not a method with a body", name))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        print!("{}", tree.render());
    }
    Ok(())
}

pub fn history(
    files: &[PathBuf],
    labels: &[String],
    store_path: Option<&Path>,
    config: &HelperConfig,
) -> Result<()> {
    if !labels.is_empty() && labels.len() != files.len() {
        anyhow::bail!("Got {} labels for {} files", labels.len(), files.len());
    }

    let mut store = match store_path {
        Some(path) => load_store(path)?.unwrap_or_default(),
        None => HistoryStore::new(),
    };
    let recorded = record_revisions(&mut store, files, labels, config)?;
    tracing::info!("Recorded {} snapshots from {} revisions", recorded, files.len());

    print_summary(&store);

    if let Some(path) = store_path {
        save_store(&store, path)?;
        tracing::info!("Saved history store to {}", path.display());
    }
    Ok(())
}

/// Parse every revision on the parser pool, then record them oldest first.
fn record_revisions(
    store: &mut HistoryStore,
    files: &[PathBuf],
    labels: &[String],
    config: &HelperConfig,
) -> Result<usize> {
    let requests = files
        .iter()
        .map(|path| {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Cannot read {}", path.display()))?;
            Ok(ParseRequest {
                content,
                path: path.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let pool = create_parser_pool(config.parser_workers);
    let mut recorded = 0;
    for (i, result) in pool.parse_all(requests).into_iter().enumerate() {
        let parsed = result?;
        let path = parsed.path.clone();
        let helper = JavaAstHelper::new(parsed.into_compilation(), config.clone());
        let label = labels.get(i).map(String::as_str);

        let count = helper.record_compilation_unit(store, label);
        tracing::info!("Recorded {} declarations from {}", count, path.display());
        recorded += count;
    }
    Ok(recorded)
}

fn print_summary(store: &HistoryStore) {
    println!(
        "{} histories across {} top-level types",
        store.history_count(),
        store.classes().len()
    );
    for class in store.classes().values() {
        print_class(class, 0);
    }
}

fn print_class(class: &ClassHistory, depth: usize) {
    let indent = "  ".repeat(depth);
    println!("{}type {} ({} versions)", indent, class.unique_name(), class.version_count());
    for method in class.method_histories().values() {
        println!("{}  method {} ({} versions)", indent, method.unique_name(), method.version_count());
    }
    for attribute in class.attribute_histories().values() {
        println!("{}  field {} ({} versions)", indent, attribute.unique_name(), attribute.version_count());
    }
    for inner in class.inner_class_histories().values() {
        print_class(inner, depth + 1);
    }
}
