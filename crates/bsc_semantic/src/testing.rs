//! In-memory fixtures for exercising the semantic core without a real
//! project loader.
//!
//! [`TestProgram`] owns the shared collaborators a host program would
//! (dependency graph, scope catalog, file and component maps, plugin
//! bus, class validator) and wires dependency edges the way the loader
//! does: one edge per script import, plus `component:` edges for XML
//! descriptors.

use std::rc::Rc;

use bsc_ast::{BscFile, FileKind};
use bsc_diagnostics::Severity;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::catalog::ScopeCatalog;
use crate::class_validator::{ClassValidator, NoopClassValidator};
use crate::db::{Component, Db};
use crate::dependency_graph::DependencyGraph;
use crate::diagnostic::BsDiagnostic;
use crate::plugin::{AnalysisPlugin, PluginBus};
use crate::scope::Scope;

pub struct TestProgram {
    graph: DependencyGraph,
    catalog: ScopeCatalog,
    /// Lowercase pkg path to file.
    files: FxHashMap<String, Rc<BscFile>>,
    /// Lowercase component name to its XML descriptor.
    components: FxHashMap<String, Rc<BscFile>>,
    plugins: PluginBus,
    class_validator: Box<dyn ClassValidator>,
    suppressed_codes: FxHashSet<u32>,
    severity_overrides: FxHashMap<u32, Severity>,
}

impl TestProgram {
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: DependencyGraph::new(),
            catalog: ScopeCatalog::new(),
            files: FxHashMap::default(),
            components: FxHashMap::default(),
            plugins: PluginBus::new(),
            class_validator: Box::new(NoopClassValidator),
            suppressed_codes: FxHashSet::default(),
            severity_overrides: FxHashMap::default(),
        }
    }

    /// A script fixture whose absolute path mirrors its pkg path under
    /// `/proj`.
    ///
    /// # Panics
    /// If the pkg path has no script extension.
    #[must_use]
    pub fn script_file(pkg_path: &str) -> BscFile {
        BscFile::from_path(pkg_path, Self::absolute_path(pkg_path))
            .expect("fixture pkg path must carry a script extension")
    }

    /// An XML descriptor fixture.
    #[must_use]
    pub fn xml_file(pkg_path: &str) -> BscFile {
        BscFile::new(FileKind::Xml, pkg_path, Self::absolute_path(pkg_path))
    }

    fn absolute_path(pkg_path: &str) -> String {
        format!("/proj/{}", pkg_path.trim_start_matches("pkg:/"))
    }

    /// Registers a file and wires its dependency edges.
    pub fn add_file(&mut self, file: BscFile) -> Rc<BscFile> {
        let file = Rc::new(file);
        let key = file.pkg_path.to_lowercase();
        for import in file.script_imports() {
            if !import.text.trim().is_empty() {
                self.graph.add_edge(&key, &import.text.to_lowercase());
            }
        }
        if let Some(component) = &file.component {
            self.components
                .insert(component.name.to_lowercase(), Rc::clone(&file));
            self.graph
                .add_edge(&format!("component:{}", component.name.to_lowercase()), &key);
            if let Some(parent) = &component.parent_name {
                self.graph
                    .add_edge(&key, &format!("component:{}", parent.to_lowercase()));
            }
        }
        self.files.insert(key, Rc::clone(&file));
        file
    }

    /// Swaps a file's content in place and signals the change, the way
    /// a re-parse does. New script imports gain edges; edges are never
    /// removed here (use [`graph_mut`](Self::graph_mut) for that).
    pub fn replace_file(&mut self, file: BscFile) -> Rc<BscFile> {
        let file = Rc::new(file);
        let key = file.pkg_path.to_lowercase();
        for import in file.script_imports() {
            if !import.text.trim().is_empty() {
                self.graph.add_edge(&key, &import.text.to_lowercase());
            }
        }
        if let Some(component) = &file.component {
            self.components
                .insert(component.name.to_lowercase(), Rc::clone(&file));
        }
        self.files.insert(key.clone(), Rc::clone(&file));
        self.graph.mark_changed(&key);
        file
    }

    pub fn remove_file(&mut self, pkg_path: &str) {
        let key = pkg_path.to_lowercase();
        if let Some(file) = self.files.remove(&key) {
            if let Some(component) = &file.component {
                self.components.remove(&component.name.to_lowercase());
            }
            self.graph.mark_changed(&key);
        }
    }

    /// Creates a source scope whose own files are `member_pkg_paths`.
    pub fn create_scope(&mut self, name: &str, member_pkg_paths: &[&str]) {
        let key = format!("scope:{}", name.to_lowercase());
        self.catalog
            .create_source_scope(name, &key, &mut self.graph);
        for pkg_path in member_pkg_paths {
            self.graph.add_edge(&key, &pkg_path.to_lowercase());
        }
    }

    /// Creates the scope of an XML component previously registered with
    /// [`add_file`](Self::add_file). The scope is named after the
    /// descriptor's pkg path.
    ///
    /// # Panics
    /// If the file is unknown or carries no component declaration.
    pub fn create_component_scope(&mut self, xml_pkg_path: &str) {
        let key = xml_pkg_path.to_lowercase();
        let file = self
            .files
            .get(&key)
            .expect("component file must be added before its scope");
        let component_name = file
            .component
            .as_ref()
            .expect("xml fixture must declare a component")
            .name
            .clone();
        let name = file.pkg_path.clone();
        self.catalog
            .create_xml_scope(&name, &component_name, &key, &mut self.graph);
    }

    pub fn remove_scope(&mut self, name: &str) -> bool {
        self.catalog.remove_scope(name, &mut self.graph)
    }

    /// # Panics
    /// If no scope with that name exists.
    #[must_use]
    pub fn scope(&self, name: &str) -> &Scope {
        self.catalog.scope(name).expect("known scope name")
    }

    #[must_use]
    pub fn global_scope(&self) -> &Scope {
        self.catalog.global_scope()
    }

    #[must_use]
    pub fn catalog(&self) -> &ScopeCatalog {
        &self.catalog
    }

    pub fn graph_mut(&mut self) -> &mut DependencyGraph {
        &mut self.graph
    }

    pub fn register_plugin(&mut self, plugin: Box<dyn AnalysisPlugin>) {
        self.plugins.register(plugin);
    }

    pub fn set_class_validator(&mut self, validator: Box<dyn ClassValidator>) {
        self.class_validator = validator;
    }

    pub fn suppress_code(&mut self, code: u32) {
        self.suppressed_codes.insert(code);
    }

    pub fn override_severity(&mut self, code: u32, severity: Severity) {
        self.severity_overrides.insert(code, severity);
    }

    /// Validates every scope, parents before children.
    pub fn validate(&self, force: bool) {
        self.catalog.validate_all(self, force);
    }
}

impl Default for TestProgram {
    fn default() -> Self {
        Self::new()
    }
}

impl Db for TestProgram {
    fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    fn catalog(&self) -> &ScopeCatalog {
        &self.catalog
    }

    fn file_by_pkg_path(&self, pkg_path: &str) -> Option<Rc<BscFile>> {
        self.files.get(&pkg_path.to_lowercase()).cloned()
    }

    fn component(&self, name: &str) -> Option<Component> {
        self.components
            .get(&name.to_lowercase())
            .map(|file| Component {
                file: Rc::clone(file),
            })
    }

    fn plugins(&self) -> &PluginBus {
        &self.plugins
    }

    fn class_validator(&self) -> &dyn ClassValidator {
        self.class_validator.as_ref()
    }

    fn diagnostic_is_suppressed(&self, diagnostic: &BsDiagnostic) -> bool {
        self.suppressed_codes.contains(&diagnostic.code())
    }

    fn diagnostic_severity_override(&self, code: u32) -> Option<Severity> {
        self.severity_overrides.get(&code).copied()
    }
}
