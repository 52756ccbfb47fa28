//! Schema root and section definitions
//!
//! This module defines the top-level structure handed to the form renderer:
//! the ordered section list plus the visible and hidden parameter maps.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::parameter::Parameter;
use crate::value::ParamValue;

/// Complete description of a model's editable parameters
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSchema {
    /// Sections in first-seen order
    pub groups: Vec<Group>,
    /// Visible parameters by name
    pub parameters: IndexMap<String, Parameter>,
    /// Parameters declared under the Hidden section, by name
    pub hidden_parameters: IndexMap<String, Parameter>,
}

/// A section of the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Identifier referenced by `Parameter::group`
    pub id: String,
    /// Display label
    pub label: String,
    /// Position among the groups
    pub order: usize,
}

impl ParameterSchema {
    /// Create a new empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the schema has no parameters at all
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty() && self.hidden_parameters.is_empty()
    }

    /// Total number of parameters, visible and hidden
    pub fn len(&self) -> usize {
        self.parameters.len() + self.hidden_parameters.len()
    }

    /// Look up a parameter by name, visible first
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.parameters
            .get(name)
            .or_else(|| self.hidden_parameters.get(name))
    }

    /// Look up a group by id
    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Register a group if it is not known yet, returning its id
    pub fn ensure_group(&mut self, label: &str) -> &str {
        let index = match self.groups.iter().position(|g| g.id == label) {
            Some(index) => index,
            None => {
                let order = self.groups.len();
                self.groups.push(Group::new(label, order));
                order
            }
        };
        &self.groups[index].id
    }

    /// Insert a visible parameter, replacing any earlier declaration
    pub fn insert_visible(&mut self, parameter: Parameter) -> Option<Parameter> {
        let previous = self.remove(&parameter.name);
        self.parameters.insert(parameter.name.clone(), parameter);
        previous
    }

    /// Insert a hidden parameter, replacing any earlier declaration
    pub fn insert_hidden(&mut self, parameter: Parameter) -> Option<Parameter> {
        let previous = self.remove(&parameter.name);
        self.hidden_parameters.insert(parameter.name.clone(), parameter);
        previous
    }

    /// Remove a parameter from whichever map holds it
    pub fn remove(&mut self, name: &str) -> Option<Parameter> {
        self.parameters
            .shift_remove(name)
            .or_else(|| self.hidden_parameters.shift_remove(name))
    }

    /// Visible parameters of one group, in source order
    pub fn parameters_in_group<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Parameter> {
        self.parameters
            .values()
            .filter(move |p| p.group.as_deref() == Some(id))
    }

    /// All parameters, visible and hidden, sorted by `order`
    pub fn ordered(&self) -> Vec<&Parameter> {
        let mut all: Vec<&Parameter> = self
            .parameters
            .values()
            .chain(self.hidden_parameters.values())
            .collect();
        all.sort_by_key(|p| p.order);
        all
    }

    /// Default value of every parameter, in source order
    pub fn defaults(&self) -> IndexMap<String, ParamValue> {
        self.ordered()
            .into_iter()
            .map(|p| (p.name.clone(), p.default.clone()))
            .collect()
    }
}

impl Group {
    /// Create a group whose id and label are the section name
    pub fn new(name: impl Into<String>, order: usize) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            label: name,
            order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::{ParamType, UiType};

    fn param(name: &str, order: u32) -> Parameter {
        let mut p = Parameter::new(name, ParamType::Integer, UiType::Input, ParamValue::Integer(1));
        p.order = order;
        p
    }

    #[test]
    fn test_empty_schema_shape() {
        let schema = ParameterSchema::new();
        assert!(schema.is_empty());
        let json = serde_json::to_value(&schema).unwrap();
        assert!(json["groups"].as_array().unwrap().is_empty());
        assert!(json["parameters"].as_object().unwrap().is_empty());
        assert!(json["hiddenParameters"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_ensure_group_is_idempotent() {
        let mut schema = ParameterSchema::new();
        schema.ensure_group("Dimensions");
        schema.ensure_group("Style");
        schema.ensure_group("Dimensions");
        assert_eq!(schema.groups.len(), 2);
        assert_eq!(schema.group("Style").map(|g| g.order), Some(1));
    }

    #[test]
    fn test_maps_stay_disjoint() {
        let mut schema = ParameterSchema::new();
        schema.insert_hidden(param("a", 0));
        let previous = schema.insert_visible(param("a", 1));
        assert!(previous.is_some());
        assert!(schema.hidden_parameters.is_empty());
        assert_eq!(schema.get("a").map(|p| p.order), Some(1));
    }

    #[test]
    fn test_redeclaration_moves_to_end() {
        let mut schema = ParameterSchema::new();
        schema.insert_visible(param("a", 0));
        schema.insert_visible(param("b", 1));
        schema.insert_visible(param("a", 2));
        let names: Vec<_> = schema.parameters.keys().cloned().collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_ordered_spans_both_maps() {
        let mut schema = ParameterSchema::new();
        schema.insert_visible(param("a", 0));
        schema.insert_hidden(param("h", 1));
        schema.insert_visible(param("b", 2));
        let names: Vec<_> = schema.ordered().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "h", "b"]);
        assert_eq!(schema.defaults().len(), 3);
    }

    #[test]
    fn test_parameters_in_group() {
        let mut schema = ParameterSchema::new();
        let mut a = param("a", 0);
        a.group = Some("Dims".to_string());
        let mut b = param("b", 1);
        b.group = Some("Style".to_string());
        schema.insert_visible(a);
        schema.insert_visible(b);
        assert_eq!(schema.parameters_in_group("Dims").count(), 1);
    }
}
