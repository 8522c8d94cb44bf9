use std::rc::Rc;

use bsc_ast::BscFile;
use bsc_diagnostics::{Diagnostic, Severity};
use bsc_source::SourceRange;

/// A diagnostic bound to the file it was reported in.
#[derive(Clone, Debug)]
pub struct BsDiagnostic {
    pub diagnostic: Diagnostic,
    pub file: Rc<BscFile>,
}

impl BsDiagnostic {
    #[must_use]
    pub fn new(diagnostic: Diagnostic, file: Rc<BscFile>) -> Self {
        Self { diagnostic, file }
    }

    #[must_use]
    pub fn code(&self) -> u32 {
        self.diagnostic.code
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.diagnostic.severity
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.diagnostic.message
    }

    #[must_use]
    pub fn range(&self) -> SourceRange {
        self.diagnostic.range
    }
}
