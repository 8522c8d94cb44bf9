//! The scope entity: a named set of files whose declarations are
//! mutually visible at runtime.
//!
//! A scope derives everything from the dependency graph and the file
//! provider: membership, callables, classes, namespaces. Derived tables
//! are memoized in a per-scope [`Cache`] and thrown away whenever the
//! graph signals a change reachable from the scope's key. All state is
//! behind interior mutability so the entire query surface works through
//! `&self`, which is what lets a child validate its parent through the
//! shared catalog.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bsc_ast::{BscFile, Callable, ClassStatement, CompletionItem, NewExpression};
use itertools::Itertools;

use crate::FxIndexMap;
use crate::cache::{Cache, CacheValue};
use crate::callable::CallableContainer;
use crate::catalog::GLOBAL_SCOPE_NAME;
use crate::db::Db;
use crate::dependency_graph::{DependencyGraph, Subscription};
use crate::diagnostic::BsDiagnostic;
use crate::namespace::{NamespaceLookup, build_namespace_lookup};

/// Dependency keys with this prefix name a component, not a file.
pub(crate) const COMPONENT_KEY_PREFIX: &str = "component:";

/// A class paired with its declaring file.
#[derive(Clone, Debug)]
pub struct ClassContainer {
    pub class: Rc<ClassStatement>,
    pub file: Rc<BscFile>,
}

/// Lowercase namespace-qualified class name to declaration.
pub type ClassMap = FxIndexMap<String, ClassContainer>;

/// A raw `new` expression decorated with its owning file.
#[derive(Clone, Debug)]
pub struct NewExpressionContainer {
    pub expression: NewExpression,
    pub file: Rc<BscFile>,
}

/// What kind of scope this is; the variant carries the capability set
/// for parent resolution and own-file enumeration.
#[derive(Debug)]
pub enum ScopeVariant {
    /// The distinguished root scope, backed by the synthesized
    /// built-ins file. Has no parent and no graph subscription.
    Global { file: Rc<BscFile> },
    /// A source-tree scope. Its parent is the global scope.
    Source,
    /// The scope of one XML component. Its parent is the parent
    /// component's scope when that component is known, else global.
    XmlComponent { component_name: String },
}

pub struct Scope {
    name: String,
    dependency_graph_key: String,
    variant: ScopeVariant,
    cache: Cache,
    diagnostics: RefCell<Vec<BsDiagnostic>>,
    pub(crate) validated: Cell<bool>,
    pub(crate) validating: Cell<bool>,
    /// Set by the graph subscription; folded into `cache`/`validated` on
    /// the next read so stale views are never observable.
    dirty: Rc<Cell<bool>>,
    subscription: RefCell<Option<Subscription>>,
}

impl Scope {
    pub(crate) fn new_global(file: Rc<BscFile>) -> Self {
        Self {
            name: GLOBAL_SCOPE_NAME.to_string(),
            dependency_graph_key: GLOBAL_SCOPE_NAME.to_string(),
            variant: ScopeVariant::Global { file },
            cache: Cache::new(),
            diagnostics: RefCell::new(Vec::new()),
            validated: Cell::new(false),
            validating: Cell::new(false),
            dirty: Rc::new(Cell::new(false)),
            subscription: RefCell::new(None),
        }
    }

    pub(crate) fn new_source(
        name: impl Into<String>,
        dependency_graph_key: impl Into<String>,
        graph: &mut DependencyGraph,
    ) -> Self {
        Self::subscribe(name.into(), dependency_graph_key.into(), ScopeVariant::Source, graph)
    }

    pub(crate) fn new_xml_component(
        name: impl Into<String>,
        component_name: impl Into<String>,
        dependency_graph_key: impl Into<String>,
        graph: &mut DependencyGraph,
    ) -> Self {
        Self::subscribe(
            name.into(),
            dependency_graph_key.into(),
            ScopeVariant::XmlComponent {
                component_name: component_name.into(),
            },
            graph,
        )
    }

    fn subscribe(
        name: String,
        dependency_graph_key: String,
        variant: ScopeVariant,
        graph: &mut DependencyGraph,
    ) -> Self {
        let dirty = Rc::new(Cell::new(false));
        let flag = Rc::downgrade(&dirty);
        let subscription = graph.on_change(&dependency_graph_key, true, move |_| {
            if let Some(flag) = flag.upgrade() {
                flag.set(true);
            }
        });
        Self {
            name,
            dependency_graph_key,
            variant,
            cache: Cache::new(),
            diagnostics: RefCell::new(Vec::new()),
            validated: Cell::new(false),
            validating: Cell::new(false),
            dirty,
            subscription: RefCell::new(Some(subscription)),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn dependency_graph_key(&self) -> &str {
        &self.dependency_graph_key
    }

    #[must_use]
    pub fn variant(&self) -> &ScopeVariant {
        &self.variant
    }

    /// The component this scope analyzes, for XML component scopes.
    #[must_use]
    pub fn component_name(&self) -> Option<&str> {
        match &self.variant {
            ScopeVariant::XmlComponent { component_name } => Some(component_name),
            _ => None,
        }
    }

    /// Folds a pending dependency-change signal into scope state: the
    /// cache is dropped before anything can read it, and the scope is no
    /// longer validated.
    pub(crate) fn sync_invalidation(&self) {
        if self.dirty.replace(false) {
            tracing::trace!(scope = %self.name, "scope invalidated by dependency change");
            self.cache.clear();
            self.validated.set(false);
        }
    }

    /// Drops all derived state. The next `validate` rebuilds it.
    pub fn invalidate(&self) {
        self.dirty.set(false);
        self.cache.clear();
        self.validated.set(false);
    }

    #[must_use]
    pub fn is_validated(&self) -> bool {
        self.sync_invalidation();
        self.validated.get()
    }

    /// Releases the dependency-graph subscription. Must be called when
    /// the scope is removed from the program; the catalog does this on
    /// removal.
    pub fn dispose(&self, graph: &mut DependencyGraph) {
        if let Some(subscription) = self.subscription.borrow_mut().take() {
            graph.unsubscribe(subscription);
        }
    }

    /// The scope this scope inherits from: none for global, global for
    /// source scopes, the parent component's scope (else global) for XML
    /// component scopes.
    pub fn get_parent_scope<'a>(&self, db: &'a dyn Db) -> Option<&'a Scope> {
        self.sync_invalidation();
        match &self.variant {
            ScopeVariant::Global { .. } => None,
            ScopeVariant::Source => Some(db.catalog().global_scope()),
            ScopeVariant::XmlComponent { component_name } => {
                let cached = self.cache.get_or_add("parentScopeName", || {
                    let parent_scope_name = db
                        .component(component_name)
                        .and_then(|component| {
                            component
                                .file
                                .component
                                .as_ref()
                                .and_then(|declaration| declaration.parent_name.clone())
                        })
                        .and_then(|parent_name| {
                            db.catalog()
                                .scope_for_component(&parent_name)
                                .map(|scope| scope.name().to_string())
                        })
                        // a component extending itself must not become its
                        // own ancestor
                        .filter(|name| name != &self.name);
                    match parent_scope_name {
                        Some(name) => CacheValue::Name(Rc::from(name.as_str())),
                        None => CacheValue::Absent,
                    }
                });
                match cached.expect_name() {
                    Some(name) => db
                        .catalog()
                        .scope(&name)
                        .or_else(|| Some(db.catalog().global_scope())),
                    None => Some(db.catalog().global_scope()),
                }
            }
        }
    }

    fn resolve_dependency(db: &dyn Db, key: &str) -> Option<Rc<BscFile>> {
        if let Some(component_name) = key.strip_prefix(COMPONENT_KEY_PREFIX) {
            db.component(component_name).map(|component| component.file)
        } else {
            db.file_by_pkg_path(key)
        }
    }

    fn collect_files(&self, db: &dyn Db, dependencies: &[String]) -> Rc<Vec<Rc<BscFile>>> {
        let mut files: Vec<Rc<BscFile>> = Vec::new();
        match &self.variant {
            ScopeVariant::Global { file } => files.push(Rc::clone(file)),
            ScopeVariant::Source => {}
            ScopeVariant::XmlComponent { component_name } => {
                if let Some(component) = db.component(component_name) {
                    files.push(component.file);
                }
            }
        }
        files.extend(
            dependencies
                .iter()
                .filter_map(|dependency| Self::resolve_dependency(db, dependency)),
        );
        Rc::new(
            files
                .into_iter()
                .unique_by(|file| file.pkg_path.to_lowercase())
                .collect(),
        )
    }

    /// Files that are direct dependencies of this scope's key, in
    /// dependency-graph order. Missing files are skipped silently.
    /// `component:` keys mark inheritance, not membership, so they are
    /// excluded here and surface only through [`get_all_files`](Self::get_all_files).
    pub fn get_own_files(&self, db: &dyn Db) -> Rc<Vec<Rc<BscFile>>> {
        self.sync_invalidation();
        self.cache
            .get_or_add("ownFiles", || {
                let dependencies: Vec<String> = db
                    .graph()
                    .direct_dependencies(&self.dependency_graph_key)
                    .into_iter()
                    .filter(|dependency| !dependency.starts_with(COMPONENT_KEY_PREFIX))
                    .collect();
                CacheValue::Files(self.collect_files(db, &dependencies))
            })
            .expect_files()
    }

    /// Own and inherited files, deduplicated by pkg path, ordered by
    /// dependency-graph traversal order.
    pub fn get_all_files(&self, db: &dyn Db) -> Rc<Vec<Rc<BscFile>>> {
        self.sync_invalidation();
        self.cache
            .get_or_add("allFiles", || {
                let dependencies = db.graph().all_dependencies(&self.dependency_graph_key);
                CacheValue::Files(self.collect_files(db, &dependencies))
            })
            .expect_files()
    }

    /// Calls `callback` for each own file that is subject to analysis
    /// (files with a typedef sibling are skipped).
    pub fn enumerate_own_files(&self, db: &dyn Db, mut callback: impl FnMut(&Rc<BscFile>)) {
        for file in self.get_own_files(db).iter() {
            if !file.has_typedef {
                callback(file);
            }
        }
    }

    /// Like [`enumerate_own_files`](Self::enumerate_own_files), over own
    /// and inherited files.
    pub fn enumerate_all_files(&self, db: &dyn Db, mut callback: impl FnMut(&Rc<BscFile>)) {
        for file in self.get_all_files(db).iter() {
            if !file.has_typedef {
                callback(file);
            }
        }
    }

    /// Callables declared by this scope's own files, each tagged with
    /// this scope as the surfacing scope.
    pub fn get_own_callables(&self, db: &dyn Db) -> Vec<CallableContainer> {
        let mut callables = Vec::new();
        self.enumerate_own_files(db, |file| {
            for callable in &file.callables {
                callables.push(CallableContainer::new(
                    Rc::clone(callable),
                    Rc::clone(file),
                    self.name.clone(),
                ));
            }
        });
        callables
    }

    /// Own callables followed by every ancestor's, nearest first.
    pub fn get_all_callables(&self, db: &dyn Db) -> Vec<CallableContainer> {
        let mut callables = self.get_own_callables(db);
        if let Some(parent) = self.get_parent_scope(db) {
            callables.extend(parent.get_all_callables(db));
        }
        callables
    }

    /// Case-insensitive callable lookup; the match surfaced by the scope
    /// closest to this one wins.
    pub fn get_callable_by_name(&self, db: &dyn Db, name: &str) -> Option<Rc<Callable>> {
        let lower = name.to_lowercase();
        self.get_all_callables(db)
            .into_iter()
            .find(|container| container.callable.lower_name() == lower)
            .map(|container| container.callable)
    }

    /// The class map over all reachable files, keyed by lowercase
    /// namespace-qualified name.
    pub fn class_map(&self, db: &dyn Db) -> Rc<ClassMap> {
        self.sync_invalidation();
        self.cache
            .get_or_add("classMap", || {
                let mut classes = ClassMap::default();
                self.enumerate_all_files(db, |file| {
                    for class in &file.references.class_statements {
                        classes.insert(
                            class.full_name().to_lowercase(),
                            ClassContainer {
                                class: Rc::clone(class),
                                file: Rc::clone(file),
                            },
                        );
                    }
                });
                CacheValue::Classes(Rc::new(classes))
            })
            .expect_classes()
    }

    /// Case-insensitive class lookup by namespace-qualified name.
    pub fn get_class(&self, db: &dyn Db, lower_name: &str) -> Option<ClassContainer> {
        self.class_map(db).get(lower_name).cloned()
    }

    /// The namespace lookup over all reachable files; every prefix of
    /// every declared namespace name has an entry.
    pub fn namespace_lookup(&self, db: &dyn Db) -> Rc<NamespaceLookup> {
        self.sync_invalidation();
        self.cache
            .get_or_add("namespaceLookup", || {
                let files = self.get_all_files(db);
                let lookup =
                    build_namespace_lookup(files.iter().filter(|file| !file.has_typedef));
                CacheValue::Namespaces(Rc::new(lookup))
            })
            .expect_namespaces()
    }

    /// Whether `name` equals a declared namespace or a prefix of one.
    pub fn is_known_namespace(&self, db: &dyn Db, name: &str) -> bool {
        self.namespace_lookup(db).contains_key(&name.to_lowercase())
    }

    /// Raw `new` expressions across all reachable files, decorated with
    /// their owning file.
    pub fn get_new_expressions(&self, db: &dyn Db) -> Vec<NewExpressionContainer> {
        let mut expressions = Vec::new();
        self.enumerate_all_files(db, |file| {
            for expression in &file.references.new_expressions {
                expressions.push(NewExpressionContainer {
                    expression: expression.clone(),
                    file: Rc::clone(file),
                });
            }
        });
        expressions
    }

    /// Property-name completions contributed by every reachable file.
    pub fn get_property_name_completions(&self, db: &dyn Db) -> Vec<CompletionItem> {
        let mut completions = Vec::new();
        self.enumerate_all_files(db, |file| {
            completions.extend(file.property_name_completions.iter().cloned());
        });
        completions
    }

    /// Appends diagnostics to this scope. Plugins and class validators
    /// use this to contribute findings during validation.
    pub fn add_diagnostics(&self, diagnostics: impl IntoIterator<Item = BsDiagnostic>) {
        self.diagnostics.borrow_mut().extend(diagnostics);
    }

    pub(crate) fn clear_diagnostics(&self) {
        self.diagnostics.borrow_mut().clear();
    }

    pub(crate) fn scope_diagnostics(&self) -> Vec<BsDiagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Scope diagnostics merged with own-file diagnostics, severity
    /// overrides applied, then the host suppression filter.
    pub fn get_diagnostics(&self, db: &dyn Db) -> Vec<BsDiagnostic> {
        self.sync_invalidation();
        let mut results = self.scope_diagnostics();
        self.enumerate_own_files(db, |file| {
            for diagnostic in &file.diagnostics {
                results.push(BsDiagnostic::new(diagnostic.clone(), Rc::clone(file)));
            }
        });
        results
            .into_iter()
            .map(|mut entry| {
                if let Some(severity) = db.diagnostic_severity_override(entry.code()) {
                    entry.diagnostic.severity = severity;
                }
                entry
            })
            .filter(|entry| !db.diagnostic_is_suppressed(entry))
            .collect()
    }
}
