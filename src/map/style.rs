use ratatui::style::Color;

/// Visual state of a province. Variants are ordered by priority, so the
/// larger one wins wherever two styles compete for the same cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegionStyle {
    #[default]
    Default,
    Occupied,
    Hovered,
    Selected,
}

impl RegionStyle {
    pub fn color(self) -> Color {
        match self {
            RegionStyle::Default => Color::Cyan,
            RegionStyle::Occupied => Color::Green,
            RegionStyle::Hovered => Color::Yellow,
            RegionStyle::Selected => Color::Magenta,
        }
    }
}

/// Selected beats hovered, hovered beats occupied, occupied beats default
pub fn resolve_style(
    name: &str,
    selected: Option<&str>,
    hovered: Option<&str>,
    occupied: bool,
) -> RegionStyle {
    if selected == Some(name) {
        RegionStyle::Selected
    } else if hovered == Some(name) {
        RegionStyle::Hovered
    } else if occupied {
        RegionStyle::Occupied
    } else {
        RegionStyle::Default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_resolve_priority() {
        let occupied: HashSet<&str> = ["A", "C"].into_iter().collect();
        let style = |name: &str| resolve_style(name, Some("A"), Some("B"), occupied.contains(name));

        assert_eq!(style("A"), RegionStyle::Selected);
        assert_eq!(style("B"), RegionStyle::Hovered);
        assert_eq!(style("C"), RegionStyle::Occupied);
        assert_eq!(style("D"), RegionStyle::Default);
    }

    #[test]
    fn test_selected_overrides_hover() {
        assert_eq!(resolve_style("A", Some("A"), Some("A"), false), RegionStyle::Selected);
        assert_eq!(resolve_style("A", None, Some("A"), true), RegionStyle::Hovered);
    }

    #[test]
    fn test_priority_order() {
        assert!(RegionStyle::Selected > RegionStyle::Hovered);
        assert!(RegionStyle::Hovered > RegionStyle::Occupied);
        assert!(RegionStyle::Occupied > RegionStyle::Default);
    }
}
