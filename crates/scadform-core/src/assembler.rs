//! Schema assembly
//!
//! Folds scanner events into a [`ParameterSchema`], one event at a time:
//! section markers move the tracker, declarations are classified, annotated
//! and routed, and anything that had to be skipped is noted in the
//! diagnostics.

use serde::Serialize;
use tracing::debug;

use scadform_schema::ParameterSchema;

use crate::annotation::Annotation;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::hint::Hint;
use crate::literal::classify;
use crate::scanner::{Declaration, ScanEvent};
use crate::section::{Placement, SectionTracker};
use crate::widget::resolve;

/// Result of an extraction with its diagnostics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Extraction {
    /// The extracted schema
    pub schema: ParameterSchema,
    /// What was skipped or replaced along the way
    pub diagnostics: Diagnostics,
}

/// Accumulates scanner events into a schema
#[derive(Debug, Default)]
pub struct SchemaAssembler {
    schema: ParameterSchema,
    diagnostics: Diagnostics,
    sections: SectionTracker,
    next_order: u32,
}

impl SchemaAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one scanner event
    pub fn apply(&mut self, event: ScanEvent) {
        match event {
            ScanEvent::Section { label, line } => {
                let section = self.sections.enter(&label);
                if let Some(group) = section.group_label() {
                    self.schema.ensure_group(group);
                }
                debug!(line, label = %label, "section");
            }
            ScanEvent::Declaration(declaration) => self.declare(declaration),
            ScanEvent::Dropped { name, line, reason } => {
                self.diagnostics
                    .push(Diagnostic::dropped_statement(&name, line, reason));
            }
        }
    }

    fn declare(&mut self, declaration: Declaration) {
        let Declaration {
            name,
            value,
            inline_comment,
            leading_comment,
            line,
        } = declaration;

        let literal = match classify(&value) {
            Ok(literal) => literal,
            Err(reason) => {
                self.diagnostics
                    .push(Diagnostic::dropped_statement(&name, line, reason));
                return;
            }
        };

        let annotation = Annotation::parse(inline_comment.as_deref(), leading_comment.as_deref());
        match &annotation.hint {
            Hint::Unterminated(_) => {
                self.diagnostics
                    .push(Diagnostic::unterminated_hint(&name, line));
            }
            Hint::Ambiguous(text) => {
                self.diagnostics
                    .push(Diagnostic::ambiguous_hint(&name, line, text));
            }
            _ => {}
        }

        let mut parameter = resolve(&name, literal, &annotation);
        parameter.order = self.next_order;
        self.next_order += 1;

        let previous = match self.sections.placement() {
            Placement::Visible { group, global } => {
                let group = self.schema.ensure_group(&group).to_string();
                parameter.group = Some(group);
                parameter.is_global = global;
                self.schema.insert_visible(parameter)
            }
            Placement::Hidden => self.schema.insert_hidden(parameter),
        };

        if previous.is_some() {
            self.diagnostics.push(Diagnostic::redeclared(&name, line));
        }
        debug!(line, name = %name, "parameter");
    }

    /// Finish assembly
    pub fn finish(self) -> Extraction {
        Extraction {
            schema: self.schema,
            diagnostics: self.diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan;

    fn assemble(source: &str) -> Extraction {
        let mut assembler = SchemaAssembler::new();
        for event in scan(source) {
            assembler.apply(event);
        }
        assembler.finish()
    }

    #[test]
    fn test_empty_source() {
        let extraction = assemble("");
        assert!(extraction.schema.groups.is_empty());
        assert!(extraction.schema.is_empty());
        assert!(extraction.diagnostics.is_empty());
    }

    #[test]
    fn test_order_spans_all_sections() {
        let source = "a = 1;\n/* [Hidden] */\nb = 2;\n/* [Global] */\nc = 3;\n/* [Size] */\nd = 4;";
        let schema = assemble(source).schema;
        let orders: Vec<_> = schema
            .ordered()
            .into_iter()
            .map(|p| (p.name.as_str(), p.order))
            .collect();
        assert_eq!(orders, vec![("a", 0), ("b", 1), ("c", 2), ("d", 3)]);
        assert_eq!(schema.hidden_parameters["b"].group, None);
        assert!(schema.parameters["c"].is_global);
        assert_eq!(schema.parameters["c"].group.as_deref(), Some("General"));
    }

    #[test]
    fn test_repeated_marker_reuses_group() {
        let source = "/* [A] */\nx = 1;\n/* [B] */\ny = 2;\n/* [A] */\nz = 3;";
        let schema = assemble(source).schema;
        let ids: Vec<_> = schema.groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert_eq!(schema.parameters["z"].group.as_deref(), Some("A"));
    }

    #[test]
    fn test_general_registered_on_first_use() {
        let schema = assemble("/* [Size] */\nw = 1;\n/* [Global] */\ng = 2;").schema;
        let ids: Vec<_> = schema.groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["Size", "General"]);
    }

    #[test]
    fn test_redeclaration_moves_between_maps() {
        let extraction = assemble("w = 1;\n/* [Hidden] */\nw = 2;");
        let schema = extraction.schema;
        assert!(!schema.parameters.contains_key("w"));
        assert_eq!(schema.hidden_parameters["w"].order, 1);
        assert_eq!(extraction.diagnostics.with_code("I004").count(), 1);
    }

    #[test]
    fn test_diagnostics_for_recovered_input() {
        let source = "a = 50; // [10:100\nb = [1, 2\nc = 1; // [1:10mm, 2:16mm, 3:20mm]\nd = 2;";
        let extraction = assemble(source);
        let codes: Vec<_> = extraction
            .diagnostics
            .iter()
            .filter_map(|d| d.code.as_deref())
            .collect();
        assert_eq!(codes, vec!["W002", "W001", "W003"]);
        assert_eq!(extraction.schema.parameters.len(), 3);
    }
}
