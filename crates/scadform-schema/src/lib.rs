//! scadform-schema - Parameter schema definitions
//!
//! This crate provides the types produced by the scadform extraction engine:
//! the section layout, every editable parameter, and the typed defaults and
//! constraints the form renderer and value-injection layer consume.
//!
//! All types serialize with the camelCase field names used by the browser
//! front end (`uiType`, `hiddenParameters`, `isGlobal`, ...).

pub mod dependency;
pub mod parameter;
pub mod schema;
pub mod value;

pub use dependency::{Dependency, Operator};
pub use parameter::{Choice, Component, ParamType, Parameter, UiType};
pub use schema::{Group, ParameterSchema};
pub use value::ParamValue;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "0.1.0");
    }
}
