use std::rc::Rc;

use bsc_source::SourceRange;

/// The statement-level references a parser surfaces for one file.
///
/// These feed the semantic core's lookup tables; the core never walks an
/// AST directly.
#[derive(Clone, Debug, Default)]
pub struct ParserReferences {
    pub namespace_statements: Vec<Rc<NamespaceStatement>>,
    pub class_statements: Vec<Rc<ClassStatement>>,
    pub function_statements: Vec<Rc<FunctionStatement>>,
    pub new_expressions: Vec<NewExpression>,
    pub assignment_statements: Vec<AssignmentStatement>,
}

/// One `namespace` body. A file may contain several bodies declaring the
/// same dotted name; the semantic core coalesces them.
#[derive(Clone, Debug)]
pub struct NamespaceStatement {
    /// The declared dotted name, original casing (`Net.Http`).
    pub name: String,
    pub name_range: SourceRange,
    pub classes: Vec<Rc<ClassStatement>>,
    pub functions: Vec<Rc<FunctionStatement>>,
}

impl NamespaceStatement {
    #[must_use]
    pub fn new(name: impl Into<String>, name_range: SourceRange) -> Self {
        Self {
            name: name.into(),
            name_range,
            classes: Vec::new(),
            functions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_class(mut self, class: ClassStatement) -> Self {
        self.classes.push(Rc::new(class));
        self
    }

    #[must_use]
    pub fn with_function(mut self, function: FunctionStatement) -> Self {
        self.functions.push(Rc::new(function));
        self
    }
}

#[derive(Clone, Debug)]
pub struct ClassStatement {
    pub name: String,
    pub name_range: SourceRange,
    pub parent_class_name: Option<String>,
    /// Dotted name of the enclosing namespace, when any.
    pub namespace_name: Option<String>,
}

impl ClassStatement {
    #[must_use]
    pub fn new(name: impl Into<String>, name_range: SourceRange) -> Self {
        Self {
            name: name.into(),
            name_range,
            parent_class_name: None,
            namespace_name: None,
        }
    }

    #[must_use]
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent_class_name = Some(parent.into());
        self
    }

    #[must_use]
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace_name = Some(namespace.into());
        self
    }

    /// The namespace-qualified name (`Animals.Dog`), or the bare name for
    /// top-level classes.
    #[must_use]
    pub fn full_name(&self) -> String {
        match &self.namespace_name {
            Some(namespace) => format!("{namespace}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct FunctionStatement {
    pub name: String,
    pub name_range: SourceRange,
}

impl FunctionStatement {
    #[must_use]
    pub fn new(name: impl Into<String>, name_range: SourceRange) -> Self {
        Self {
            name: name.into(),
            name_range,
        }
    }
}

/// A raw `new` expression; the semantic core decorates it with its
/// owning file.
#[derive(Clone, Debug)]
pub struct NewExpression {
    pub class_name: String,
    pub range: SourceRange,
}

impl NewExpression {
    #[must_use]
    pub fn new(class_name: impl Into<String>, range: SourceRange) -> Self {
        Self {
            class_name: class_name.into(),
            range,
        }
    }
}

/// The target of an assignment statement.
#[derive(Clone, Debug)]
pub struct AssignmentStatement {
    pub name: String,
    pub name_range: SourceRange,
}

impl AssignmentStatement {
    #[must_use]
    pub fn new(name: impl Into<String>, name_range: SourceRange) -> Self {
        Self {
            name: name.into(),
            name_range,
        }
    }
}

#[cfg(test)]
mod tests {
    use bsc_source::SourceRange;

    use super::ClassStatement;

    #[test]
    fn full_name_includes_namespace() {
        let class = ClassStatement::new("Dog", SourceRange::INTERPOLATED);
        assert_eq!(class.full_name(), "Dog");

        let class = ClassStatement::new("Dog", SourceRange::INTERPOLATED).in_namespace("Animals");
        assert_eq!(class.full_name(), "Animals.Dog");
    }
}
