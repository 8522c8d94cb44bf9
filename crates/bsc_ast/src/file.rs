use std::rc::Rc;

use bsc_diagnostics::Diagnostic;
use bsc_source::{Position, SourceRange};
use thiserror::Error;

use crate::callable::{Callable, FunctionCall, FunctionScope, innermost_scope_at};
use crate::completion::CompletionItem;
use crate::references::{
    AssignmentStatement, ClassStatement, FunctionStatement, NamespaceStatement, NewExpression,
    ParserReferences,
};

/// The kind of a source file, derived from its extension.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FileKind {
    /// A `.brs` script.
    BrightScript,
    /// A `.bs` script (the brighter dialect).
    BrighterScript,
    /// A `.xml` component descriptor.
    Xml,
}

impl FileKind {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            FileKind::BrightScript => ".brs",
            FileKind::BrighterScript => ".bs",
            FileKind::Xml => ".xml",
        }
    }

    /// Maps a file extension (with or without the leading dot) to a kind.
    pub fn from_extension(extension: &str) -> Result<Self, UnsupportedFileExtension> {
        match extension.trim_start_matches('.').to_lowercase().as_str() {
            "brs" => Ok(FileKind::BrightScript),
            "bs" => Ok(FileKind::BrighterScript),
            "xml" => Ok(FileKind::Xml),
            _ => Err(UnsupportedFileExtension(extension.to_string())),
        }
    }
}

#[derive(Debug, Error, Eq, PartialEq)]
#[error("unsupported source file extension '{0}'")]
pub struct UnsupportedFileExtension(pub String);

/// A script import: either an `import` statement in a script or a
/// `<script>` tag in a component descriptor.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScriptImport {
    /// The referenced path exactly as written (`pkg:/source/lib.brs`).
    pub text: String,
    /// Range of the path token.
    pub range: SourceRange,
}

impl ScriptImport {
    #[must_use]
    pub fn new(text: impl Into<String>, range: SourceRange) -> Self {
        Self {
            text: text.into(),
            range,
        }
    }
}

/// The component interface declared by an XML descriptor.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ComponentDeclaration {
    pub name: String,
    pub parent_name: Option<String>,
}

/// A parsed source file as observed by the semantic core.
///
/// The parser owns the AST; the core sees only this projection. Files
/// with a typedef sibling (`has_typedef`) are kept in scope membership
/// but contribute no callables, references or diagnostics.
#[derive(Clone, Debug)]
pub struct BscFile {
    pub kind: FileKind,
    /// Canonical package-relative path (`pkg:/source/main.brs`). The
    /// stable identifier of the file.
    pub pkg_path: String,
    pub path_absolute: String,
    pub has_typedef: bool,
    pub callables: Vec<Rc<Callable>>,
    pub function_calls: Vec<FunctionCall>,
    pub function_scopes: Vec<FunctionScope>,
    pub references: ParserReferences,
    /// `import` statements written in the script itself.
    pub own_script_imports: Vec<ScriptImport>,
    /// `<script>` tags of a component descriptor.
    pub script_tag_imports: Vec<ScriptImport>,
    pub property_name_completions: Vec<CompletionItem>,
    /// Diagnostics produced while parsing this file.
    pub diagnostics: Vec<Diagnostic>,
    /// Present for XML component descriptors.
    pub component: Option<ComponentDeclaration>,
}

impl BscFile {
    #[must_use]
    pub fn new(
        kind: FileKind,
        pkg_path: impl Into<String>,
        path_absolute: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            pkg_path: pkg_path.into(),
            path_absolute: path_absolute.into(),
            has_typedef: false,
            callables: Vec::new(),
            function_calls: Vec::new(),
            function_scopes: Vec::new(),
            references: ParserReferences::default(),
            own_script_imports: Vec::new(),
            script_tag_imports: Vec::new(),
            property_name_completions: Vec::new(),
            diagnostics: Vec::new(),
            component: None,
        }
    }

    /// Builds a file whose kind is derived from the pkg path's extension.
    pub fn from_path(
        pkg_path: impl Into<String>,
        path_absolute: impl Into<String>,
    ) -> Result<Self, UnsupportedFileExtension> {
        let pkg_path = pkg_path.into();
        let extension = pkg_path.rsplit('.').next().unwrap_or("");
        let kind = FileKind::from_extension(extension)?;
        Ok(Self::new(kind, pkg_path, path_absolute))
    }

    #[must_use]
    pub fn extension(&self) -> &'static str {
        self.kind.extension()
    }

    #[must_use]
    pub fn with_typedef(mut self) -> Self {
        self.has_typedef = true;
        self
    }

    #[must_use]
    pub fn with_callable(mut self, callable: Callable) -> Self {
        self.callables.push(Rc::new(callable));
        self
    }

    #[must_use]
    pub fn with_function_call(mut self, call: FunctionCall) -> Self {
        self.function_calls.push(call);
        self
    }

    #[must_use]
    pub fn with_function_scope(mut self, scope: FunctionScope) -> Self {
        self.function_scopes.push(scope);
        self
    }

    #[must_use]
    pub fn with_script_import(mut self, import: ScriptImport) -> Self {
        self.own_script_imports.push(import);
        self
    }

    #[must_use]
    pub fn with_script_tag_import(mut self, import: ScriptImport) -> Self {
        self.script_tag_imports.push(import);
        self
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: NamespaceStatement) -> Self {
        self.references
            .namespace_statements
            .push(Rc::new(namespace));
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: ClassStatement) -> Self {
        self.references.class_statements.push(Rc::new(class));
        self
    }

    #[must_use]
    pub fn with_function_statement(mut self, function: FunctionStatement) -> Self {
        self.references.function_statements.push(Rc::new(function));
        self
    }

    #[must_use]
    pub fn with_new_expression(mut self, expression: NewExpression) -> Self {
        self.references.new_expressions.push(expression);
        self
    }

    #[must_use]
    pub fn with_assignment(mut self, assignment: AssignmentStatement) -> Self {
        self.references.assignment_statements.push(assignment);
        self
    }

    #[must_use]
    pub fn with_property_completion(mut self, completion: CompletionItem) -> Self {
        self.property_name_completions.push(completion);
        self
    }

    #[must_use]
    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostics.push(diagnostic);
        self
    }

    #[must_use]
    pub fn with_component(
        mut self,
        name: impl Into<String>,
        parent_name: Option<&str>,
    ) -> Self {
        self.component = Some(ComponentDeclaration {
            name: name.into(),
            parent_name: parent_name.map(ToString::to_string),
        });
        self
    }

    /// All script imports: own `import` statements first, then `<script>`
    /// tags.
    pub fn script_imports(&self) -> impl Iterator<Item = &ScriptImport> {
        self.own_script_imports
            .iter()
            .chain(self.script_tag_imports.iter())
    }

    /// The innermost function scope containing `position`.
    #[must_use]
    pub fn function_scope_at(&self, position: Position) -> Option<&FunctionScope> {
        innermost_scope_at(&self.function_scopes, position)
    }
}
