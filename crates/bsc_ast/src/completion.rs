/// What a completion item represents.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CompletionItemKind {
    Function,
    Field,
    Class,
}

/// One entry offered to a completion request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompletionItem {
    pub label: String,
    pub kind: CompletionItemKind,
    pub detail: Option<String>,
    /// Markdown documentation, when available.
    pub documentation: Option<String>,
}

impl CompletionItem {
    #[must_use]
    pub fn function(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: CompletionItemKind::Function,
            detail: None,
            documentation: None,
        }
    }

    #[must_use]
    pub fn field(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: CompletionItemKind::Field,
            detail: None,
            documentation: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    #[must_use]
    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }
}
