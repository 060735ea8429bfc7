//! Tool identities and their emission rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical tool action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolId {
    /// Pressure stroke that scores without cutting through
    Crease,
    /// Full-depth knife stroke
    Cut,
}

impl ToolId {
    /// Tool-select token understood by the plotter
    pub fn select_token(self) -> &'static str {
        match self {
            Self::Crease => "P0;",
            Self::Cut => "P1;",
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Crease => write!(f, "crease"),
            Self::Cut => write!(f, "cut"),
        }
    }
}

/// Tool, emission rank and overcut eligibility of one polyline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToolAssignment {
    pub tool: ToolId,
    /// Lower ranks are emitted first
    pub priority: u8,
    pub has_overcut: bool,
}

impl ToolAssignment {
    pub const CREASE: Self = Self {
        tool: ToolId::Crease,
        priority: 0,
        has_overcut: false,
    };

    pub const CUT_OTHER: Self = Self {
        tool: ToolId::Cut,
        priority: 1,
        has_overcut: true,
    };

    pub const CUT_RED: Self = Self {
        tool: ToolId::Cut,
        priority: 2,
        has_overcut: true,
    };
}

/// Which cut paths receive an overcut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OvercutPolicy {
    /// Every path assigned to the cut tool
    #[default]
    AllCutTools,
    /// Only paths stroked in the red family
    CutColorOnly,
}

impl fmt::Display for OvercutPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllCutTools => write!(f, "all_cut_tools"),
            Self::CutColorOnly => write!(f, "cut_color_only"),
        }
    }
}

impl FromStr for OvercutPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "all_cut_tools" | "all" => Ok(Self::AllCutTools),
            "cut_color_only" | "red" => Ok(Self::CutColorOnly),
            _ => Err(format!("Unknown overcut policy: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_tokens() {
        assert_eq!(ToolId::Crease.select_token(), "P0;");
        assert_eq!(ToolId::Cut.select_token(), "P1;");
    }

    #[test]
    fn test_table_priorities_are_ordered() {
        assert!(ToolAssignment::CREASE.priority < ToolAssignment::CUT_OTHER.priority);
        assert!(ToolAssignment::CUT_OTHER.priority < ToolAssignment::CUT_RED.priority);
        assert!(!ToolAssignment::CREASE.has_overcut);
    }

    #[test]
    fn test_overcut_policy_parse() {
        assert_eq!("all".parse::<OvercutPolicy>(), Ok(OvercutPolicy::AllCutTools));
        assert_eq!(
            "Cut-Color-Only".parse::<OvercutPolicy>(),
            Ok(OvercutPolicy::CutColorOnly)
        );
        assert!("sometimes".parse::<OvercutPolicy>().is_err());
        assert_eq!(OvercutPolicy::default(), OvercutPolicy::AllCutTools);
    }
}
