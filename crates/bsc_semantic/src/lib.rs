//! The static-analysis core of the bsc compiler front-end.
//!
//! From parsed source files and XML component descriptors this crate
//! computes *scopes* (named collections of declarations that are
//! reachable together at runtime), caches per-scope lookup tables, runs
//! cross-file validation, and invalidates derived state when file
//! dependencies change. Diagnostics, not errors, are the primary
//! output; everything emittable is cataloged in `bsc_diagnostics`.

use std::hash::BuildHasherDefault;

use rustc_hash::FxHasher;

pub mod cache;
pub mod callable;
pub mod catalog;
pub mod class_validator;
mod completion;
pub mod db;
pub mod dependency_graph;
pub mod diagnostic;
pub mod namespace;
pub mod plugin;
pub mod scope;
pub mod stdlib;
pub mod testing;
mod validation;

/// Insertion-ordered map with the fast rustc hasher. Order is
/// load-bearing wherever diagnostics iterate a table.
pub type FxIndexMap<K, V> = indexmap::IndexMap<K, V, BuildHasherDefault<FxHasher>>;

pub use cache::{Cache, CacheValue};
pub use callable::{CallableContainer, CallableContainerMap};
pub use catalog::{GLOBAL_SCOPE_NAME, ScopeCatalog};
pub use class_validator::{ClassValidator, NoopClassValidator};
pub use db::{Component, Db};
pub use dependency_graph::{DependencyGraph, Subscription};
pub use diagnostic::BsDiagnostic;
pub use namespace::{NamespaceContainer, NamespaceLookup};
pub use plugin::{AnalysisPlugin, PluginBus, ScopeValidationEvent};
pub use scope::{ClassContainer, ClassMap, NewExpressionContainer, Scope, ScopeVariant};
pub use stdlib::global_callable_map;
