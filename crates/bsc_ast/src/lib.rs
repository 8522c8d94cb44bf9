//! The file and declaration model the bsc analyzer observes.
//!
//! Parsing is a collaborator concern; this crate defines the shapes a
//! parser (or a test fixture) hands to the semantic core: files, their
//! callables, call sites, function-local scopes, parser references and
//! script imports. The language is case-insensitive, so every lookup the
//! core builds over these records is keyed by lowercase name; original
//! casing survives only in range-anchored payloads.

mod callable;
mod completion;
mod file;
mod references;

pub use callable::{
    CallArg, Callable, FunctionCall, FunctionScope, Parameter, TypeKind, VariableDeclaration,
};
pub use completion::{CompletionItem, CompletionItemKind};
pub use file::{
    BscFile, ComponentDeclaration, FileKind, ScriptImport, UnsupportedFileExtension,
};
pub use references::{
    AssignmentStatement, ClassStatement, FunctionStatement, NamespaceStatement, NewExpression,
    ParserReferences,
};

/// Which dialect a file is parsed as.
///
/// The brighter dialect adds namespaces and classes; a few analyses (for
/// example completion filtering and `super` call handling) depend on the
/// mode.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ParseMode {
    BrightScript,
    BrighterScript,
}
