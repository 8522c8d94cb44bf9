use std::rc::Rc;

use bsc_ast::BscFile;
use bsc_diagnostics::Severity;

use crate::catalog::ScopeCatalog;
use crate::class_validator::ClassValidator;
use crate::dependency_graph::DependencyGraph;
use crate::diagnostic::BsDiagnostic;
use crate::plugin::PluginBus;

/// A component registered with the program, as resolved from a
/// `component:` dependency key.
#[derive(Clone, Debug)]
pub struct Component {
    /// The component's XML descriptor file.
    pub file: Rc<BscFile>,
}

/// Context threaded through every semantic query.
///
/// The host program owns the shared collaborators (dependency graph,
/// scope catalog, file provider, plugin bus, class validator) and hands
/// them to the core behind this trait. Scopes never mutate the graph;
/// they only subscribe and query. Program mutations (adding files,
/// creating scopes, editing edges) happen outside validation, on the
/// concrete host type.
pub trait Db {
    fn graph(&self) -> &DependencyGraph;

    fn catalog(&self) -> &ScopeCatalog;

    /// Case-insensitive file lookup by canonical pkg path.
    fn file_by_pkg_path(&self, pkg_path: &str) -> Option<Rc<BscFile>>;

    /// Case-insensitive component lookup by name.
    fn component(&self, name: &str) -> Option<Component>;

    fn plugins(&self) -> &PluginBus;

    fn class_validator(&self) -> &dyn ClassValidator;

    /// Host-supplied suppression predicate applied by
    /// `Scope::get_diagnostics`.
    fn diagnostic_is_suppressed(&self, _diagnostic: &BsDiagnostic) -> bool {
        false
    }

    /// Host-configured severity remapping, applied before suppression.
    fn diagnostic_severity_override(&self, _code: u32) -> Option<Severity> {
        None
    }
}
