//! Read-only completion and definition queries over a scope's lookup
//! tables.

use bsc_ast::{BscFile, CompletionItem, ParseMode};
use bsc_diagnostics::{Location, file_uri};
use bsc_source::{Position, SourceRange};

use crate::db::Db;
use crate::scope::{Scope, ScopeVariant};

impl Scope {
    /// One completion per reachable callable. In the brighter parse
    /// mode, namespaced callables are omitted; a separate
    /// namespace-completion path surfaces those.
    pub fn get_callables_as_completions(
        &self,
        db: &dyn Db,
        parse_mode: ParseMode,
    ) -> Vec<CompletionItem> {
        let mut completions = Vec::new();
        for container in self.get_all_callables(db) {
            if parse_mode == ParseMode::BrighterScript && container.callable.has_namespace {
                continue;
            }
            let mut item = CompletionItem::function(container.callable.name.as_str());
            if let Some(description) = &container.callable.short_description {
                item = item.with_detail(description.as_str());
            }
            if let Some(documentation) = &container.callable.documentation {
                item = item.with_documentation(documentation.as_str());
            }
            completions.push(item);
        }
        completions
    }

    /// Definition lookup hook. The generic scope contributes nothing;
    /// the XML component scope resolves `<script>` tag paths under the
    /// cursor to the referenced file.
    pub fn get_definition(
        &self,
        db: &dyn Db,
        file: &BscFile,
        position: Position,
    ) -> Vec<Location> {
        match self.variant() {
            ScopeVariant::XmlComponent { .. } => {
                let all_files = self.get_all_files(db);
                let mut locations = Vec::new();
                for import in &file.script_tag_imports {
                    if !import.range.contains(position) || import.text.trim().is_empty() {
                        continue;
                    }
                    if let Some(target) = all_files
                        .iter()
                        .find(|candidate| candidate.pkg_path.eq_ignore_ascii_case(&import.text))
                    {
                        locations.push(Location {
                            uri: file_uri(&target.path_absolute),
                            range: SourceRange::span(0, 0, 0, 0),
                        });
                    }
                }
                locations
            }
            _ => Vec::new(),
        }
    }
}
