//! The diagnostic message catalog.
//!
//! Every diagnostic the analyzer can emit has exactly one factory here.
//! Factories are pure: they format the message and fix the code and
//! severity, leaving the range (and file association) to the caller.
//! Codes are stable and unique; `codes_are_unique` below enforces that.

use crate::{DiagnosticData, Severity};

/// A call site references a function that no scope member declares.
#[must_use]
pub fn call_to_unknown_function(name: &str, scope_name: &str) -> DiagnosticData {
    DiagnosticData {
        code: 1001,
        severity: Severity::Error,
        message: format!(
            "Cannot find function with name '{name}' when this file is included in scope '{scope_name}'"
        ),
    }
}

/// The number of call arguments falls outside the callable's accepted
/// range. `expected` is already display-formatted (`"2"` or `"1-2"`).
#[must_use]
pub fn mismatch_argument_count(expected: &str, got: usize) -> DiagnosticData {
    DiagnosticData {
        code: 1002,
        severity: Severity::Error,
        message: format!("Expected {expected} arguments, but got {got}"),
    }
}

#[must_use]
pub fn duplicate_function_implementation(name: &str, scope_name: &str) -> DiagnosticData {
    DiagnosticData {
        code: 1003,
        severity: Severity::Error,
        message: format!(
            "Duplicate function implementation for '{name}' when this file is included in scope '{scope_name}'"
        ),
    }
}

#[must_use]
pub fn referenced_file_does_not_exist() -> DiagnosticData {
    DiagnosticData {
        code: 1004,
        severity: Severity::Error,
        message: "Referenced file does not exist".to_string(),
    }
}

/// The import resolves, but only case-insensitively. `canonical_path` is
/// the actual pkgPath of the resolved file.
#[must_use]
pub fn script_import_case_mismatch(canonical_path: &str) -> DiagnosticData {
    DiagnosticData {
        code: 1005,
        severity: Severity::Warning,
        message: format!(
            "Script import path does not match casing of actual file path '{canonical_path}'"
        ),
    }
}

#[must_use]
pub fn script_src_cannot_be_empty() -> DiagnosticData {
    DiagnosticData {
        code: 1006,
        severity: Severity::Error,
        message: "Script import cannot be empty or whitespace".to_string(),
    }
}

/// A scope member redeclares a callable that an ancestor scope already
/// provides. Informational: overriding is legal and sometimes deliberate.
#[must_use]
pub fn overrides_ancestor_function(
    name: &str,
    scope_name: &str,
    ancestor_file_path: &str,
    ancestor_scope_name: &str,
) -> DiagnosticData {
    DiagnosticData {
        code: 1007,
        severity: Severity::Information,
        message: format!(
            "Function '{name}' included in '{scope_name}' overrides function in '{ancestor_file_path}' included in '{ancestor_scope_name}'"
        ),
    }
}

#[must_use]
pub fn scope_function_shadowed_by_builtin_function() -> DiagnosticData {
    DiagnosticData {
        code: 1008,
        severity: Severity::Warning,
        message: "Scope function will not be accessible because it has the same name as a built-in function"
            .to_string(),
    }
}

/// A local variable holds a function value whose name shadows a callable
/// from `origin` (`"stdlib"` or `"scope"`).
#[must_use]
pub fn local_var_function_shadows_parent_function(origin: &str) -> DiagnosticData {
    DiagnosticData {
        code: 1009,
        severity: Severity::Warning,
        message: format!(
            "Local variable function has same name as {origin} function and will never be called"
        ),
    }
}

#[must_use]
pub fn local_var_shadowed_by_scoped_function() -> DiagnosticData {
    DiagnosticData {
        code: 1010,
        severity: Severity::Warning,
        message: "Declaring a local variable with same name as scoped function can result in unexpected behavior"
            .to_string(),
    }
}

#[must_use]
pub fn local_var_same_name_as_class(class_name: &str) -> DiagnosticData {
    DiagnosticData {
        code: 1011,
        severity: Severity::Warning,
        message: format!("Local variable has same name as class '{class_name}'"),
    }
}

#[must_use]
pub fn function_cannot_have_same_name_as_class(class_name: &str) -> DiagnosticData {
    DiagnosticData {
        code: 1012,
        severity: Severity::Error,
        message: format!("Function has same name as class '{class_name}'"),
    }
}

#[must_use]
pub fn parameter_may_not_have_same_name_as_namespace(name: &str) -> DiagnosticData {
    DiagnosticData {
        code: 1013,
        severity: Severity::Error,
        message: format!("Parameter '{name}' may not have the same name as a namespace"),
    }
}

#[must_use]
pub fn variable_may_not_have_same_name_as_namespace(name: &str) -> DiagnosticData {
    DiagnosticData {
        code: 1014,
        severity: Severity::Error,
        message: format!("Variable '{name}' may not have the same name as a namespace"),
    }
}
