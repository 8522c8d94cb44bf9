//! The namespace lookup: a tree keyed at every prefix of every declared
//! namespace path.
//!
//! `Net.Http.Client` yields entries for `net`, `net.http` and
//! `net.http.client`. Sibling bodies declaring the same full name
//! coalesce (their statements concatenate). Each node owns its children;
//! a node's parent is found by looking up the flat map, never through a
//! back-pointer.

use std::cell::RefCell;
use std::rc::Rc;

use bsc_ast::{BscFile, ClassStatement, FunctionStatement, NamespaceStatement};
use bsc_source::SourceRange;
use smallvec::SmallVec;

use crate::FxIndexMap;

/// One node of the namespace tree.
#[derive(Debug)]
pub struct NamespaceContainer {
    /// The file of the first statement that produced this entry.
    pub file: Rc<BscFile>,
    /// Dotted name in original casing (`Net.Http`).
    pub full_name: String,
    pub name_range: SourceRange,
    /// Original casing of the last dotted part (`Http`).
    pub last_part_name: String,
    /// Every namespace statement body declaring exactly this full name.
    pub statements: Vec<Rc<NamespaceStatement>>,
    /// Lowercase class name to declaration, coalesced across bodies.
    pub class_statements: FxIndexMap<String, Rc<ClassStatement>>,
    /// Lowercase function name to declaration, coalesced across bodies.
    pub function_statements: FxIndexMap<String, Rc<FunctionStatement>>,
    /// Lowercase last-part name to child node.
    pub namespaces: RefCell<FxIndexMap<String, Rc<NamespaceContainer>>>,
}

/// Lowercase full name to node, in first-seen order.
pub type NamespaceLookup = FxIndexMap<String, Rc<NamespaceContainer>>;

struct PartialContainer {
    file: Rc<BscFile>,
    full_name: String,
    name_range: SourceRange,
    last_part_name: String,
    statements: Vec<Rc<NamespaceStatement>>,
    class_statements: FxIndexMap<String, Rc<ClassStatement>>,
    function_statements: FxIndexMap<String, Rc<FunctionStatement>>,
}

impl PartialContainer {
    fn into_container(self) -> NamespaceContainer {
        NamespaceContainer {
            file: self.file,
            full_name: self.full_name,
            name_range: self.name_range,
            last_part_name: self.last_part_name,
            statements: self.statements,
            class_statements: self.class_statements,
            function_statements: self.function_statements,
            namespaces: RefCell::new(FxIndexMap::default()),
        }
    }
}

/// Builds the namespace lookup over `files`.
///
/// Two passes: coalesce statements into one entry per lowercase prefix,
/// then wire parents to children in insertion order.
pub(crate) fn build_namespace_lookup<'a>(
    files: impl Iterator<Item = &'a Rc<BscFile>>,
) -> NamespaceLookup {
    let mut partials: FxIndexMap<String, PartialContainer> = FxIndexMap::default();

    for file in files {
        for statement in &file.references.namespace_statements {
            let parts: SmallVec<[&str; 4]> = statement.name.split('.').collect();
            for depth in 1..=parts.len() {
                let full_name = parts[..depth].join(".");
                let key = full_name.to_lowercase();
                let entry = partials.entry(key).or_insert_with(|| PartialContainer {
                    file: Rc::clone(file),
                    full_name,
                    name_range: statement.name_range,
                    last_part_name: parts[depth - 1].to_string(),
                    statements: Vec::new(),
                    class_statements: FxIndexMap::default(),
                    function_statements: FxIndexMap::default(),
                });
                if depth == parts.len() {
                    entry.statements.push(Rc::clone(statement));
                    for class in &statement.classes {
                        entry
                            .class_statements
                            .insert(class.name.to_lowercase(), Rc::clone(class));
                    }
                    for function in &statement.functions {
                        entry
                            .function_statements
                            .insert(function.name.to_lowercase(), Rc::clone(function));
                    }
                }
            }
        }
    }

    let lookup: NamespaceLookup = partials
        .into_iter()
        .map(|(key, partial)| (key, Rc::new(partial.into_container())))
        .collect();

    // Parent-child wiring, in insertion order. Prefix entries are always
    // inserted before their longer forms, so every parent exists.
    for (key, container) in &lookup {
        if let Some((parent_key, _)) = key.rsplit_once('.') {
            if let Some(parent) = lookup.get(parent_key) {
                parent.namespaces.borrow_mut().insert(
                    container.last_part_name.to_lowercase(),
                    Rc::clone(container),
                );
            }
        }
    }

    lookup
}
