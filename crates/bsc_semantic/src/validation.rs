//! The validation pipeline: a fixed sequence of checks run by
//! [`Scope::validate`], each consuming the prebuilt lookup tables and
//! pushing diagnostics onto the scope.
//!
//! Emission order is deterministic: pipeline stages run in a fixed
//! order, callables are sorted by declaring file path then name before
//! the container map is built, and own files are visited in
//! dependency-graph order.

use std::cell::Cell;
use std::rc::Rc;

use bsc_ast::{BscFile, FileKind};
use bsc_diagnostics::{Location, RelatedInformation, file_uri, messages};

use crate::callable::{CallableContainer, CallableContainerMap};
use crate::catalog::GLOBAL_SCOPE_NAME;
use crate::db::Db;
use crate::diagnostic::BsDiagnostic;
use crate::plugin::ScopeValidationEvent;
use crate::scope::{Scope, ScopeVariant};
use crate::stdlib;

/// Resets the `validating` flag on every exit path.
struct ValidatingGuard<'a>(&'a Cell<bool>);

impl Drop for ValidatingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl Scope {
    /// Rebuilds this scope's diagnostics.
    ///
    /// No-op while already valid unless `force` is set. A parent scope
    /// that is not valid is validated first, with the same force flag.
    /// Re-entry while validating is ignored.
    pub fn validate(&self, db: &dyn Db, force: bool) {
        self.sync_invalidation();
        if self.validating.get() {
            return;
        }
        if self.validated.get() && !force {
            return;
        }

        self.validating.set(true);
        let _guard = ValidatingGuard(&self.validating);

        if let Some(parent) = self.get_parent_scope(db) {
            if !parent.is_validated() {
                parent.validate(db, force);
            }
        }

        let _span = tracing::debug_span!("validate_scope", scope = %self.name()).entered();

        self.clear_diagnostics();

        let files = self.get_all_files(db);
        let own_files = self.get_own_files(db);

        let mut callables = self.get_all_callables(db);
        callables.sort_by(|a, b| {
            a.file
                .path_absolute
                .cmp(&b.file.path_absolute)
                .then_with(|| a.callable.name.cmp(&b.callable.name))
        });

        let mut callable_container_map = CallableContainerMap::default();
        for container in callables {
            callable_container_map
                .entry(container.callable.lower_name().to_string())
                .or_default()
                .push(container);
        }

        let event = ScopeValidationEvent {
            scope: self,
            files: files.as_slice(),
            callable_container_map: &callable_container_map,
        };
        db.plugins().emit_before_scope_validate(&event);

        let mut diagnostics = Vec::new();
        self.diagnostic_find_duplicate_function_declarations(
            &callable_container_map,
            &mut diagnostics,
        );
        self.diagnostic_validate_script_import_paths(db, &mut diagnostics);
        self.validate_classes(db, &mut diagnostics);
        for file in own_files.iter() {
            if file.has_typedef {
                continue;
            }
            self.diagnostic_detect_calls_to_unknown_functions(
                file,
                &callable_container_map,
                &mut diagnostics,
            );
            self.diagnostic_detect_function_calls_with_wrong_arg_count(
                file,
                &callable_container_map,
                &mut diagnostics,
            );
            self.diagnostic_detect_shadowed_local_vars(
                db,
                file,
                &callable_container_map,
                &mut diagnostics,
            );
            self.diagnostic_detect_function_collisions(db, file, &mut diagnostics);
            self.diagnostic_detect_name_collisions(db, file, &mut diagnostics);
        }
        self.add_diagnostics(diagnostics);

        db.plugins().emit_after_scope_validate(&event);
        self.validated.set(true);
    }

    /// Flags duplicate implementations within the scope and, as an info
    /// diagnostic, own callables overriding a non-global ancestor's.
    fn diagnostic_find_duplicate_function_declarations(
        &self,
        callable_container_map: &CallableContainerMap,
        diagnostics: &mut Vec<BsDiagnostic>,
    ) {
        for (lower_name, containers) in callable_container_map {
            let mut own: Vec<&CallableContainer> = Vec::new();
            let mut ancestors: Vec<&CallableContainer> = Vec::new();
            for container in containers {
                if container.scope_name == GLOBAL_SCOPE_NAME {
                    continue;
                }
                if container.scope_name == self.name() {
                    own.push(container);
                } else {
                    ancestors.push(container);
                }
            }

            // `init` redeclarations are the component lifecycle contract,
            // not an accident
            if !own.is_empty() && lower_name != "init" {
                if let Some(shadowed) = ancestors.last() {
                    for container in &own {
                        if container
                            .file
                            .pkg_path
                            .eq_ignore_ascii_case(&shadowed.file.pkg_path)
                        {
                            continue;
                        }
                        diagnostics.push(BsDiagnostic::new(
                            messages::overrides_ancestor_function(
                                &container.callable.name,
                                self.name(),
                                &shadowed.file.pkg_path,
                                &shadowed.scope_name,
                            )
                            .at(container.callable.name_range),
                            Rc::clone(&container.file),
                        ));
                    }
                }
            }

            if own.len() >= 2 {
                for container in &own {
                    diagnostics.push(BsDiagnostic::new(
                        messages::duplicate_function_implementation(
                            &container.callable.name,
                            self.name(),
                        )
                        .at(container.callable.name_range),
                        Rc::clone(&container.file),
                    ));
                }
            }
        }
    }

    /// Verifies that every script import of every own file resolves
    /// against own-and-ancestor files.
    fn diagnostic_validate_script_import_paths(
        &self,
        db: &dyn Db,
        diagnostics: &mut Vec<BsDiagnostic>,
    ) {
        let all_files = self.get_all_files(db);
        self.enumerate_own_files(db, |file| {
            for import in file.script_imports() {
                if import.text.trim().is_empty() {
                    diagnostics.push(BsDiagnostic::new(
                        messages::script_src_cannot_be_empty().at(import.range),
                        Rc::clone(file),
                    ));
                    continue;
                }
                let resolved = all_files
                    .iter()
                    .find(|candidate| candidate.pkg_path.eq_ignore_ascii_case(&import.text));
                match resolved {
                    None => diagnostics.push(BsDiagnostic::new(
                        messages::referenced_file_does_not_exist().at(import.range),
                        Rc::clone(file),
                    )),
                    Some(target) if target.pkg_path != import.text => {
                        diagnostics.push(BsDiagnostic::new(
                            messages::script_import_case_mismatch(&target.pkg_path)
                                .at(import.range),
                            Rc::clone(file),
                        ));
                    }
                    Some(_) => {}
                }
            }
        });
    }

    /// Delegates to the class-structure validator collaborator and
    /// appends whatever it produced.
    fn validate_classes(&self, db: &dyn Db, diagnostics: &mut Vec<BsDiagnostic>) {
        let validator = db.class_validator();
        validator.validate(db, self);
        diagnostics.extend(validator.diagnostics());
    }

    fn diagnostic_detect_calls_to_unknown_functions(
        &self,
        file: &Rc<BscFile>,
        callable_container_map: &CallableContainerMap,
        diagnostics: &mut Vec<BsDiagnostic>,
    ) {
        for call in &file.function_calls {
            let lower = call.name.to_lowercase();
            if lower == "super" && file.kind == FileKind::BrighterScript {
                continue;
            }
            // a local variable with the called name satisfies the call;
            // whether it is actually callable is a type concern
            if let Some(function_scope) = file.function_scope_at(call.name_range.start) {
                if function_scope.variable_by_name(&lower).is_some() {
                    continue;
                }
            }
            if !callable_container_map.contains_key(&lower) {
                diagnostics.push(BsDiagnostic::new(
                    messages::call_to_unknown_function(&call.name, self.name())
                        .at(call.name_range),
                    Rc::clone(file),
                ));
            }
        }
    }

    fn diagnostic_detect_function_calls_with_wrong_arg_count(
        &self,
        file: &Rc<BscFile>,
        callable_container_map: &CallableContainerMap,
        diagnostics: &mut Vec<BsDiagnostic>,
    ) {
        for call in &file.function_calls {
            let lower = call.name.to_lowercase();
            let Some(containers) = callable_container_map.get(&lower) else {
                continue;
            };
            let Some(first) = containers.first() else {
                continue;
            };
            let min_params = first.callable.min_params();
            let max_params = first.callable.max_params();
            let arg_count = call.args.len();
            if arg_count < min_params || arg_count > max_params {
                let expected = if min_params == max_params {
                    max_params.to_string()
                } else {
                    format!("{min_params}-{max_params}")
                };
                diagnostics.push(BsDiagnostic::new(
                    messages::mismatch_argument_count(&expected, arg_count).at(call.name_range),
                    Rc::clone(file),
                ));
            }
        }
    }

    fn diagnostic_detect_shadowed_local_vars(
        &self,
        db: &dyn Db,
        file: &Rc<BscFile>,
        callable_container_map: &CallableContainerMap,
        diagnostics: &mut Vec<BsDiagnostic>,
    ) {
        let classes = self.class_map(db);
        let builtins = stdlib::global_callable_map();
        for function_scope in &file.function_scopes {
            for variable in &function_scope.variables {
                let lower = variable.name.to_lowercase();
                if variable.type_kind.is_function() {
                    if builtins.contains(&lower) {
                        diagnostics.push(BsDiagnostic::new(
                            messages::local_var_function_shadows_parent_function("stdlib")
                                .at(variable.name_range),
                            Rc::clone(file),
                        ));
                    } else if callable_container_map.contains_key(&lower) {
                        diagnostics.push(BsDiagnostic::new(
                            messages::local_var_function_shadows_parent_function("scope")
                                .at(variable.name_range),
                            Rc::clone(file),
                        ));
                    }
                } else {
                    // non-function locals may shadow built-ins freely
                    if builtins.contains(&lower) {
                        continue;
                    }
                    if callable_container_map.contains_key(&lower) {
                        diagnostics.push(BsDiagnostic::new(
                            messages::local_var_shadowed_by_scoped_function()
                                .at(variable.name_range),
                            Rc::clone(file),
                        ));
                    } else if let Some(class) = classes.get(&lower) {
                        diagnostics.push(BsDiagnostic::new(
                            messages::local_var_same_name_as_class(&class.class.full_name())
                                .at(variable.name_range),
                            Rc::clone(file),
                        ));
                    }
                }
            }
        }
    }

    fn diagnostic_detect_function_collisions(
        &self,
        db: &dyn Db,
        file: &Rc<BscFile>,
        diagnostics: &mut Vec<BsDiagnostic>,
    ) {
        // the synthesized built-ins file is allowed to declare the
        // built-ins
        if matches!(self.variant(), ScopeVariant::Global { .. }) {
            return;
        }
        let classes = self.class_map(db);
        let builtins = stdlib::global_callable_map();
        for callable in &file.callables {
            if builtins.contains(callable.lower_name()) {
                diagnostics.push(BsDiagnostic::new(
                    messages::scope_function_shadowed_by_builtin_function()
                        .at(callable.name_range),
                    Rc::clone(file),
                ));
            }
            if let Some(class) = classes.get(callable.lower_name()) {
                diagnostics.push(BsDiagnostic::new(
                    messages::function_cannot_have_same_name_as_class(&class.class.full_name())
                        .at(callable.name_range),
                    Rc::clone(file),
                ));
            }
        }
    }

    /// Parameters and assignment targets may not share a name with any
    /// namespace prefix.
    fn diagnostic_detect_name_collisions(
        &self,
        db: &dyn Db,
        file: &Rc<BscFile>,
        diagnostics: &mut Vec<BsDiagnostic>,
    ) {
        let lookup = self.namespace_lookup(db);
        if lookup.is_empty() {
            return;
        }

        let related = |namespace: &crate::namespace::NamespaceContainer| {
            vec![RelatedInformation {
                message: "Namespace declared here".to_string(),
                location: Location {
                    uri: file_uri(&namespace.file.path_absolute),
                    range: namespace.name_range,
                },
            }]
        };

        for callable in &file.callables {
            for param in &callable.params {
                let lower = param.name.to_lowercase();
                if let Some(namespace) = lookup.get(&lower) {
                    diagnostics.push(BsDiagnostic::new(
                        messages::parameter_may_not_have_same_name_as_namespace(&param.name)
                            .at(param.name_range)
                            .with_related_information(related(namespace.as_ref())),
                        Rc::clone(file),
                    ));
                }
            }
        }

        for assignment in &file.references.assignment_statements {
            let lower = assignment.name.to_lowercase();
            if let Some(namespace) = lookup.get(&lower) {
                diagnostics.push(BsDiagnostic::new(
                    messages::variable_may_not_have_same_name_as_namespace(&assignment.name)
                        .at(assignment.name_range)
                        .with_related_information(related(namespace.as_ref())),
                    Rc::clone(file),
                ));
            }
        }
    }
}
