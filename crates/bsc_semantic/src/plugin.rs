//! The plugin bus: external analyzers observing scope validation.
//!
//! Observers run synchronously, in registration order, before and after
//! each scope's pipeline. They may contribute diagnostics through
//! [`Scope::add_diagnostics`](crate::scope::Scope::add_diagnostics) but
//! must not trigger validation of the scope currently validating.

use std::cell::RefCell;
use std::rc::Rc;

use bsc_ast::BscFile;

use crate::callable::CallableContainerMap;
use crate::scope::Scope;

/// Payload handed to observers around a scope validation.
pub struct ScopeValidationEvent<'a> {
    pub scope: &'a Scope,
    /// All files reachable from the scope, in dependency order.
    pub files: &'a [Rc<BscFile>],
    pub callable_container_map: &'a CallableContainerMap,
}

/// An external analyzer attached to the program.
pub trait AnalysisPlugin {
    fn before_scope_validate(&mut self, _event: &ScopeValidationEvent<'_>) {}

    fn after_scope_validate(&mut self, _event: &ScopeValidationEvent<'_>) {}
}

#[derive(Default)]
pub struct PluginBus {
    plugins: RefCell<Vec<Box<dyn AnalysisPlugin>>>,
}

impl PluginBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, plugin: Box<dyn AnalysisPlugin>) {
        self.plugins.borrow_mut().push(plugin);
    }

    pub fn emit_before_scope_validate(&self, event: &ScopeValidationEvent<'_>) {
        for plugin in self.plugins.borrow_mut().iter_mut() {
            plugin.before_scope_validate(event);
        }
    }

    pub fn emit_after_scope_validate(&self, event: &ScopeValidationEvent<'_>) {
        for plugin in self.plugins.borrow_mut().iter_mut() {
            plugin.after_scope_validate(event);
        }
    }
}
