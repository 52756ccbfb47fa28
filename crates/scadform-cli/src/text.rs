//! Text Renderer
//!
//! Renders a [`ParameterSchema`] as a plain-text outline: one block per
//! group in display order, then the hidden parameters.
//!
//! ```text
//! [Dimensions]
//!   width: integer/slider = 50 [10..100] (mm) Box width mm
//!
//! [Hidden]
//!   eps: number/input = 0.01
//! ```

use std::fmt::{self, Write};

use scadform_schema::{Parameter, ParameterSchema};

/// Text renderer for schemas
pub struct TextRenderer {
    include_hidden: bool,
    output: String,
}

impl TextRenderer {
    /// Create a renderer
    pub fn new(include_hidden: bool) -> Self {
        Self {
            include_hidden,
            output: String::new(),
        }
    }

    /// Render the schema, consuming the renderer
    pub fn render(mut self, schema: &ParameterSchema) -> Result<String, fmt::Error> {
        let mut first = true;
        for group in &schema.groups {
            let mut members = schema.parameters_in_group(&group.id).peekable();
            if members.peek().is_none() {
                continue;
            }
            if !first {
                writeln!(self.output)?;
            }
            first = false;

            writeln!(self.output, "[{}]", group.label)?;
            for parameter in members {
                self.write_parameter(parameter)?;
            }
        }

        if self.include_hidden && !schema.hidden_parameters.is_empty() {
            if !first {
                writeln!(self.output)?;
            }
            writeln!(self.output, "[Hidden]")?;
            for parameter in schema.hidden_parameters.values() {
                self.write_parameter(parameter)?;
            }
        }

        Ok(self.output)
    }

    fn write_parameter(&mut self, p: &Parameter) -> fmt::Result {
        write!(
            self.output,
            "  {}: {}/{} = {}",
            p.name, p.param_type, p.ui_type, p.default
        )?;

        if let (Some(min), Some(max)) = (p.minimum, p.maximum) {
            match p.step {
                Some(step) => write!(self.output, " [{}..{} step {}]", min, max, step)?,
                None => write!(self.output, " [{}..{}]", min, max)?,
            }
        }
        if let Some(choices) = &p.choices {
            let labels: Vec<&str> = choices.iter().map(|c| c.label.as_str()).collect();
            write!(self.output, " {{{}}}", labels.join(" | "))?;
        }
        if let Some(limit) = p.max_length {
            write!(self.output, " max {}", limit)?;
        }
        if let Some(unit) = &p.unit {
            write!(self.output, " ({})", unit)?;
        }
        if p.is_global {
            write!(self.output, " global")?;
        }
        if let Some(dependency) = &p.dependency {
            write!(self.output, " if {}", dependency)?;
        }
        if !p.description.is_empty() {
            write!(self.output, " {}", p.description)?;
        }
        writeln!(self.output)
    }
}

/// Render a schema as text
pub fn render_text(schema: &ParameterSchema, include_hidden: bool) -> Result<String, fmt::Error> {
    TextRenderer::new(include_hidden).render(schema)
}
