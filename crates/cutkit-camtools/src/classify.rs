//! Tool classification and sequencing
//!
//! Stroke colors are normalised once into an RGB triple and looked up in a
//! fixed table:
//!
//! | color family  | tool   | priority | overcut |
//! |---------------|--------|----------|---------|
//! | black         | crease | 0        | no      |
//! | red           | cut    | 2        | yes     |
//! | anything else | cut    | 1        | yes     |
//!
//! Polylines are then stably ordered by `(priority, extraction index)`.

use cutkit_core::{OvercutPolicy, Polyline, ToolAssignment};
use std::str::FromStr;
use tracing::debug;

/// Color bucket used by the tool table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorFamily {
    Black,
    Red,
    Other,
}

/// Parse a stroke color into RGB, alpha dropped
///
/// Accepts hex (3, 4, 6 and 8 digits), `rgb()`/`rgba()` and CSS color
/// names, ignoring case and whitespace. `none` and garbage give `None`.
pub fn normalize_color(raw: &str) -> Option<(u8, u8, u8)> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    if compact.is_empty() || compact == "none" {
        return None;
    }
    svgtypes::Color::from_str(&compact)
        .ok()
        .map(|c| (c.red, c.green, c.blue))
}

pub fn color_family(raw: &str) -> ColorFamily {
    match normalize_color(raw) {
        Some((0, 0, 0)) => ColorFamily::Black,
        Some((255, 0, 0)) => ColorFamily::Red,
        _ => ColorFamily::Other,
    }
}

/// Table lookup, with the overcut flag narrowed by `policy`
pub fn assign_tool(raw: &str, policy: OvercutPolicy) -> ToolAssignment {
    match (color_family(raw), policy) {
        (ColorFamily::Black, _) => ToolAssignment::CREASE,
        (ColorFamily::Red, _) => ToolAssignment::CUT_RED,
        (ColorFamily::Other, OvercutPolicy::AllCutTools) => ToolAssignment::CUT_OTHER,
        (ColorFamily::Other, OvercutPolicy::CutColorOnly) => ToolAssignment {
            has_overcut: false,
            ..ToolAssignment::CUT_OTHER
        },
    }
}

/// Assign a tool to every polyline
pub fn classify(polylines: &mut [Polyline], policy: OvercutPolicy) {
    for polyline in polylines.iter_mut() {
        polyline.tool = Some(assign_tool(&polyline.color, policy));
    }
}

/// Stable order by `(priority, extraction index)`
///
/// Unclassified polylines sort as if they were on the default cut tool.
pub fn sequence(mut polylines: Vec<Polyline>) -> Vec<Polyline> {
    polylines.sort_by_key(|p| {
        (
            p.tool.unwrap_or(ToolAssignment::CUT_OTHER).priority,
            p.index,
        )
    });
    debug!(
        "Emission order: {:?}",
        polylines.iter().map(|p| p.index).collect::<Vec<_>>()
    );
    polylines
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutkit_core::{pt, ToolId};

    #[test]
    fn test_black_family() {
        for raw in ["#000", "#000000", "black", "BLACK", " rgb(0, 0, 0) ", "#000000ff"] {
            assert_eq!(color_family(raw), ColorFamily::Black, "{raw}");
        }
    }

    #[test]
    fn test_red_family() {
        for raw in ["#f00", "#FF0000", "red", "rgb(255,0,0)", "rgba(255, 0, 0, 0.5)", "#ff000080"] {
            assert_eq!(color_family(raw), ColorFamily::Red, "{raw}");
        }
    }

    #[test]
    fn test_other_family() {
        for raw in ["#0000ff", "blue", "none", "", "not-a-color", "#ff0001"] {
            assert_eq!(color_family(raw), ColorFamily::Other, "{raw}");
        }
    }

    #[test]
    fn test_table() {
        assert_eq!(assign_tool("black", OvercutPolicy::AllCutTools).tool, ToolId::Crease);
        let red = assign_tool("red", OvercutPolicy::AllCutTools);
        assert_eq!((red.tool, red.priority, red.has_overcut), (ToolId::Cut, 2, true));
        let blue = assign_tool("blue", OvercutPolicy::AllCutTools);
        assert_eq!((blue.tool, blue.priority, blue.has_overcut), (ToolId::Cut, 1, true));
    }

    #[test]
    fn test_cut_color_only_policy() {
        let blue = assign_tool("blue", OvercutPolicy::CutColorOnly);
        assert_eq!((blue.tool, blue.priority, blue.has_overcut), (ToolId::Cut, 1, false));
        assert!(assign_tool("#f00", OvercutPolicy::CutColorOnly).has_overcut);
        assert!(!assign_tool("#000", OvercutPolicy::CutColorOnly).has_overcut);
    }

    #[test]
    fn test_sequence_is_stable_by_priority() {
        // a=red(2), b=black(0), c=blue(1), d=black(0)
        let mut polylines: Vec<Polyline> = ["red", "black", "blue", "black"]
            .iter()
            .enumerate()
            .map(|(i, color)| Polyline::new(vec![pt(0.0, 0.0), pt(1.0, 1.0)], *color, i))
            .collect();
        classify(&mut polylines, OvercutPolicy::AllCutTools);
        let order: Vec<usize> = sequence(polylines).iter().map(|p| p.index).collect();
        assert_eq!(order, vec![1, 3, 2, 0]);
    }
}
