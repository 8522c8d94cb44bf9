//! The scope catalog: every scope of a program, addressable by name,
//! with a distinguished global scope that always exists.

use crate::FxIndexMap;
use crate::db::Db;
use crate::dependency_graph::DependencyGraph;
use crate::scope::{Scope, ScopeVariant};
use crate::stdlib;

/// Name of the distinguished global scope.
pub const GLOBAL_SCOPE_NAME: &str = "global";

pub struct ScopeCatalog {
    scopes: FxIndexMap<String, Scope>,
}

impl ScopeCatalog {
    /// Creates a catalog holding only the global scope, backed by the
    /// synthesized built-ins file.
    #[must_use]
    pub fn new() -> Self {
        let mut scopes = FxIndexMap::default();
        scopes.insert(
            GLOBAL_SCOPE_NAME.to_string(),
            Scope::new_global(stdlib::create_global_file()),
        );
        Self { scopes }
    }

    /// # Panics
    /// Never in practice; the global scope is created with the catalog
    /// and cannot be removed.
    #[must_use]
    pub fn global_scope(&self) -> &Scope {
        self.scopes
            .get(GLOBAL_SCOPE_NAME)
            .expect("the global scope always exists")
    }

    #[must_use]
    pub fn scope(&self, name: &str) -> Option<&Scope> {
        self.scopes.get(name)
    }

    pub fn scopes(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.values()
    }

    pub fn scope_names(&self) -> impl Iterator<Item = &str> {
        self.scopes.keys().map(String::as_str)
    }

    /// Creates a source-tree scope subscribed to `dependency_graph_key`.
    /// An existing scope with the same name is disposed and replaced.
    pub fn create_source_scope(
        &mut self,
        name: &str,
        dependency_graph_key: &str,
        graph: &mut DependencyGraph,
    ) -> &Scope {
        debug_assert_ne!(name, GLOBAL_SCOPE_NAME);
        self.remove_scope(name, graph);
        let scope = Scope::new_source(name, dependency_graph_key, graph);
        self.scopes.insert(name.to_string(), scope);
        &self.scopes[name]
    }

    /// Creates the scope of one XML component.
    pub fn create_xml_scope(
        &mut self,
        name: &str,
        component_name: &str,
        dependency_graph_key: &str,
        graph: &mut DependencyGraph,
    ) -> &Scope {
        debug_assert_ne!(name, GLOBAL_SCOPE_NAME);
        self.remove_scope(name, graph);
        let scope = Scope::new_xml_component(name, component_name, dependency_graph_key, graph);
        self.scopes.insert(name.to_string(), scope);
        &self.scopes[name]
    }

    /// Removes and disposes a scope, releasing its graph subscription.
    /// Returns whether a scope with that name existed. The global scope
    /// cannot be removed.
    pub fn remove_scope(&mut self, name: &str, graph: &mut DependencyGraph) -> bool {
        if name == GLOBAL_SCOPE_NAME {
            return false;
        }
        match self.scopes.shift_remove(name) {
            Some(scope) => {
                scope.dispose(graph);
                true
            }
            None => false,
        }
    }

    /// The scope analyzing the component named `component_name`
    /// (case-insensitive).
    #[must_use]
    pub fn scope_for_component(&self, component_name: &str) -> Option<&Scope> {
        self.scopes.values().find(|scope| {
            scope
                .component_name()
                .is_some_and(|name| name.eq_ignore_ascii_case(component_name))
        })
    }

    /// Disposes every non-global scope, releasing all subscriptions.
    pub fn dispose_all(&mut self, graph: &mut DependencyGraph) {
        let names: Vec<String> = self
            .scopes
            .keys()
            .filter(|name| name.as_str() != GLOBAL_SCOPE_NAME)
            .cloned()
            .collect();
        for name in names {
            self.remove_scope(&name, graph);
        }
    }

    /// Validates every scope in creation order. Parents validate before
    /// children regardless of this order; `Scope::validate` recurses.
    pub fn validate_all(&self, db: &dyn Db, force: bool) {
        for scope in self.scopes.values() {
            scope.validate(db, force);
        }
    }

    /// Whether any scope (other than global) includes the file with this
    /// pkg path among its own files.
    pub fn file_is_included(&self, db: &dyn Db, pkg_path: &str) -> bool {
        self.scopes.values().any(|scope| {
            !matches!(scope.variant(), ScopeVariant::Global { .. })
                && scope
                    .get_own_files(db)
                    .iter()
                    .any(|file| file.pkg_path.eq_ignore_ascii_case(pkg_path))
        })
    }
}

impl Default for ScopeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::GLOBAL_SCOPE_NAME;
    use crate::testing::TestProgram;

    #[test]
    fn global_scope_always_exists() {
        let program = TestProgram::new();
        assert_eq!(program.global_scope().name(), GLOBAL_SCOPE_NAME);
    }

    #[test]
    fn create_and_remove_scopes() {
        let mut program = TestProgram::new();
        program.create_scope("main", &[]);
        assert!(program.catalog().scope("main").is_some());

        assert!(program.remove_scope("main"));
        assert!(program.catalog().scope("main").is_none());
        assert!(!program.remove_scope("main"));
        assert!(!program.remove_scope(GLOBAL_SCOPE_NAME));
    }

    #[test]
    fn removed_scope_releases_its_subscription() {
        let mut program = TestProgram::new();
        program.add_file(TestProgram::script_file("pkg:/source/a.brs"));
        program.create_scope("main", &["pkg:/source/a.brs"]);
        program.remove_scope("main");

        // a change after removal must not reach the disposed scope;
        // nothing to observe beyond "does not panic"
        program.graph_mut().mark_changed("pkg:/source/a.brs");
    }

    #[test]
    fn scope_for_component_is_case_insensitive() {
        let mut program = TestProgram::new();
        program.add_file(
            TestProgram::xml_file("pkg:/components/Widget.xml").with_component("Widget", None),
        );
        program.create_component_scope("pkg:/components/Widget.xml");

        let scope = program.catalog().scope_for_component("wIdGeT").unwrap();
        assert_eq!(scope.name(), "pkg:/components/Widget.xml");
        assert!(program.catalog().scope_for_component("nope").is_none());
    }

    #[test]
    fn file_is_included_checks_own_files() {
        let mut program = TestProgram::new();
        program.add_file(TestProgram::script_file("pkg:/source/a.brs"));
        program.add_file(TestProgram::script_file("pkg:/source/floating.brs"));
        program.create_scope("main", &["pkg:/source/a.brs"]);

        assert!(program.catalog().file_is_included(&program, "pkg:/source/A.brs"));
        assert!(
            !program
                .catalog()
                .file_is_included(&program, "pkg:/source/floating.brs")
        );
    }
}
