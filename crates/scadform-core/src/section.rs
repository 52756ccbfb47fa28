//! Section tracking
//!
//! Keeps the "current section" while declarations stream past and decides
//! where each parameter is routed.

use tracing::debug;

/// Section every parameter lands in before the first marker
pub const GENERAL: &str = "General";

/// The section a declaration is collected under
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Section {
    /// Implicit section before any marker
    #[default]
    General,
    /// A user-named section
    Named(String),
    /// Reserved: parameters are kept out of the visible schema
    Hidden,
    /// Reserved: parameters stay visible under General, flagged global
    Global,
}

impl Section {
    /// Interpret a marker label; reserved names match case-insensitively
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("hidden") {
            Section::Hidden
        } else if label.eq_ignore_ascii_case("global") {
            Section::Global
        } else if label == GENERAL {
            Section::General
        } else {
            Section::Named(label.to_string())
        }
    }

    /// Group id a marker for this section registers, if any
    pub fn group_label(&self) -> Option<&str> {
        match self {
            Section::General => Some(GENERAL),
            Section::Named(name) => Some(name),
            Section::Hidden | Section::Global => None,
        }
    }
}

/// Where a parameter goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Into `parameters` under `group`
    Visible {
        /// Group id
        group: String,
        /// Declared under the Global section
        global: bool,
    },
    /// Into `hiddenParameters`
    Hidden,
}

/// Current-section state machine
#[derive(Debug, Default)]
pub struct SectionTracker {
    current: Section,
}

impl SectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to the section named by a marker
    pub fn enter(&mut self, label: &str) -> &Section {
        self.current = Section::from_label(label);
        debug!(section = ?self.current, "section changed");
        &self.current
    }

    pub fn current(&self) -> &Section {
        &self.current
    }

    /// Placement for a parameter declared now
    pub fn placement(&self) -> Placement {
        match &self.current {
            Section::General => Placement::Visible {
                group: GENERAL.to_string(),
                global: false,
            },
            Section::Named(name) => Placement::Visible {
                group: name.clone(),
                global: false,
            },
            Section::Global => Placement::Visible {
                group: GENERAL.to_string(),
                global: true,
            },
            Section::Hidden => Placement::Hidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_names_case_insensitive() {
        assert_eq!(Section::from_label("Hidden"), Section::Hidden);
        assert_eq!(Section::from_label("HIDDEN"), Section::Hidden);
        assert_eq!(Section::from_label(" global "), Section::Global);
        assert_eq!(
            Section::from_label("Dimensions"),
            Section::Named("Dimensions".to_string())
        );
    }

    #[test]
    fn test_default_placement_is_general() {
        let tracker = SectionTracker::new();
        assert_eq!(
            tracker.placement(),
            Placement::Visible {
                group: "General".to_string(),
                global: false
            }
        );
    }

    #[test]
    fn test_transitions() {
        let mut tracker = SectionTracker::new();
        tracker.enter("Hidden");
        assert_eq!(tracker.placement(), Placement::Hidden);

        tracker.enter("Global");
        assert_eq!(
            tracker.placement(),
            Placement::Visible {
                group: "General".to_string(),
                global: true
            }
        );

        tracker.enter("Size");
        assert_eq!(tracker.current().group_label(), Some("Size"));
    }
}
