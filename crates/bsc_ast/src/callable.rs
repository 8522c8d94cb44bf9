use std::cmp::Reverse;

use bsc_source::{Position, SourceRange};

/// A named function or subroutine declaration.
///
/// The lowercase name is computed once at construction; every semantic
/// lookup table is keyed by it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Callable {
    pub name: String,
    lower_name: String,
    /// Range of the declared name, not of the whole body.
    pub name_range: SourceRange,
    /// Ordered parameter list. Optional parameters are trailing.
    pub params: Vec<Parameter>,
    /// Whether the declaration lives inside a namespace body.
    pub has_namespace: bool,
    /// Markdown documentation, when the declaration carries a doc comment.
    pub documentation: Option<String>,
    pub short_description: Option<String>,
}

impl Callable {
    #[must_use]
    pub fn new(name: impl Into<String>, name_range: SourceRange) -> Self {
        let name = name.into();
        let lower_name = name.to_lowercase();
        Self {
            name,
            lower_name,
            name_range,
            params: Vec::new(),
            has_namespace: false,
            documentation: None,
            short_description: None,
        }
    }

    #[must_use]
    pub fn lower_name(&self) -> &str {
        &self.lower_name
    }

    /// Number of arguments a call site must supply at minimum.
    #[must_use]
    pub fn min_params(&self) -> usize {
        self.params
            .iter()
            .filter(|param| !param.is_optional)
            .count()
    }

    /// Number of arguments a call site may supply at most.
    #[must_use]
    pub fn max_params(&self) -> usize {
        self.params.len()
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.params.push(Parameter::required(name));
        self
    }

    #[must_use]
    pub fn optional_param(mut self, name: impl Into<String>) -> Self {
        self.params.push(Parameter::optional(name));
        self
    }

    #[must_use]
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.params.push(parameter);
        self
    }

    #[must_use]
    pub fn in_namespace(mut self) -> Self {
        self.has_namespace = true;
        self
    }

    #[must_use]
    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    #[must_use]
    pub fn with_short_description(mut self, description: impl Into<String>) -> Self {
        self.short_description = Some(description.into());
        self
    }
}

/// A single declared parameter.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub name_range: SourceRange,
    pub is_optional: bool,
}

impl Parameter {
    #[must_use]
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            name_range: SourceRange::INTERPOLATED,
            is_optional: false,
        }
    }

    #[must_use]
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            name_range: SourceRange::INTERPOLATED,
            is_optional: true,
        }
    }

    #[must_use]
    pub fn at(mut self, name_range: SourceRange) -> Self {
        self.name_range = name_range;
        self
    }
}

/// A call-site record: the called name plus one entry per argument.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub name_range: SourceRange,
    pub args: Vec<CallArg>,
}

impl FunctionCall {
    #[must_use]
    pub fn new(name: impl Into<String>, name_range: SourceRange) -> Self {
        Self {
            name: name.into(),
            name_range,
            args: Vec::new(),
        }
    }

    /// Appends `count` arguments with synthesized ranges.
    #[must_use]
    pub fn with_args(mut self, count: usize) -> Self {
        self.args
            .extend((0..count).map(|_| CallArg {
                range: SourceRange::INTERPOLATED,
            }));
        self
    }

    #[must_use]
    pub fn with_arg_at(mut self, range: SourceRange) -> Self {
        self.args.push(CallArg { range });
        self
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CallArg {
    pub range: SourceRange,
}

/// A function-local scope: the body range plus the variables declared
/// inside it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FunctionScope {
    /// Name of the enclosing callable; anonymous functions have none.
    pub name: Option<String>,
    pub range: SourceRange,
    pub variables: Vec<VariableDeclaration>,
}

impl FunctionScope {
    #[must_use]
    pub fn new(range: SourceRange) -> Self {
        Self {
            name: None,
            range,
            variables: Vec::new(),
        }
    }

    #[must_use]
    pub fn named(name: impl Into<String>, range: SourceRange) -> Self {
        Self {
            name: Some(name.into()),
            range,
            variables: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_variable(mut self, variable: VariableDeclaration) -> Self {
        self.variables.push(variable);
        self
    }

    /// Returns the declared variable whose name matches
    /// case-insensitively.
    #[must_use]
    pub fn variable_by_name(&self, lower_name: &str) -> Option<&VariableDeclaration> {
        self.variables
            .iter()
            .find(|variable| variable.name.to_lowercase() == lower_name)
    }
}

/// Picks the innermost of `scopes` containing `position`: the one with
/// the latest start, breaking ties by the earliest end.
pub(crate) fn innermost_scope_at(
    scopes: &[FunctionScope],
    position: Position,
) -> Option<&FunctionScope> {
    scopes
        .iter()
        .filter(|scope| scope.range.contains(position))
        .min_by_key(|scope| (Reverse(scope.range.start), scope.range.end))
}

/// A variable declaration inside a function scope, with its inferred
/// type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VariableDeclaration {
    pub name: String,
    pub name_range: SourceRange,
    pub type_kind: TypeKind,
}

impl VariableDeclaration {
    #[must_use]
    pub fn new(name: impl Into<String>, name_range: SourceRange, type_kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            name_range,
            type_kind,
        }
    }
}

/// The coarse inferred type of a declaration.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeKind {
    Boolean,
    Integer,
    Float,
    Double,
    String,
    Function,
    Object,
    Invalid,
    Dynamic,
}

impl TypeKind {
    #[must_use]
    pub fn is_function(self) -> bool {
        matches!(self, TypeKind::Function)
    }
}

#[cfg(test)]
mod tests {
    use bsc_source::{Position, SourceRange};
    use pretty_assertions::assert_eq;

    use super::{Callable, FunctionScope, TypeKind, VariableDeclaration, innermost_scope_at};

    #[test]
    fn param_counts() {
        let callable = Callable::new("greet", SourceRange::INTERPOLATED)
            .param("name")
            .optional_param("prefix");
        assert_eq!(callable.min_params(), 1);
        assert_eq!(callable.max_params(), 2);
        assert_eq!(callable.lower_name(), "greet");
    }

    #[test]
    fn lower_name_tracks_original_casing() {
        let callable = Callable::new("DoThing", SourceRange::INTERPOLATED);
        assert_eq!(callable.name, "DoThing");
        assert_eq!(callable.lower_name(), "dothing");
    }

    #[test]
    fn innermost_scope_wins() {
        let outer = FunctionScope::named("outer", SourceRange::span(0, 0, 10, 0));
        let inner = FunctionScope::named("inner", SourceRange::span(2, 0, 5, 0));
        let scopes = vec![outer, inner];

        let hit = innermost_scope_at(&scopes, Position::new(3, 4)).unwrap();
        assert_eq!(hit.name.as_deref(), Some("inner"));

        let hit = innermost_scope_at(&scopes, Position::new(8, 0)).unwrap();
        assert_eq!(hit.name.as_deref(), Some("outer"));

        assert!(innermost_scope_at(&scopes, Position::new(20, 0)).is_none());
    }

    #[test]
    fn variable_lookup_is_case_insensitive() {
        let scope = FunctionScope::new(SourceRange::span(0, 0, 4, 0)).with_variable(
            VariableDeclaration::new("Handler", SourceRange::INTERPOLATED, TypeKind::Function),
        );
        assert!(scope.variable_by_name("handler").is_some());
        assert!(scope.variable_by_name("missing").is_none());
    }
}
