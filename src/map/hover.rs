/// Tracks which province the pointer is over.
///
/// Leave events can go missing (the pointer jumps straight from one province
/// to another, or off the map between frames), so `enter` always hands back
/// the province whose hover styling must be cleared before the new one is
/// applied.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum HoverTracker {
    #[default]
    None,
    Hovered(String),
}

impl HoverTracker {
    pub fn current(&self) -> Option<&str> {
        match self {
            HoverTracker::None => None,
            HoverTracker::Hovered(name) => Some(name.as_str()),
        }
    }

    /// Pointer entered `name`. Returns the previously hovered province if it
    /// differs and its override has to be reset.
    pub fn enter(&mut self, name: &str) -> Option<String> {
        match std::mem::replace(self, HoverTracker::Hovered(name.to_string())) {
            HoverTracker::Hovered(prev) if prev != name => Some(prev),
            _ => None,
        }
    }

    /// Pointer left `name`. A leave for anything but the current province is
    /// stale and ignored. Returns whether the state changed.
    pub fn leave(&mut self, name: &str) -> bool {
        if self.current() == Some(name) {
            *self = HoverTracker::None;
            true
        } else {
            false
        }
    }

    /// Drop whatever is hovered, returning it
    pub fn clear(&mut self) -> Option<String> {
        match std::mem::take(self) {
            HoverTracker::Hovered(prev) => Some(prev),
            HoverTracker::None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_from_none() {
        let mut hover = HoverTracker::default();
        assert_eq!(hover.enter("Soria"), None);
        assert_eq!(hover.current(), Some("Soria"));
    }

    #[test]
    fn test_enter_without_leave_resets_previous() {
        let mut hover = HoverTracker::default();
        hover.enter("Soria");
        assert_eq!(hover.enter("Burgos"), Some("Soria".to_string()));
        assert_eq!(hover.current(), Some("Burgos"));
    }

    #[test]
    fn test_reenter_same_is_noop() {
        let mut hover = HoverTracker::default();
        hover.enter("Soria");
        assert_eq!(hover.enter("Soria"), None);
        assert_eq!(hover.current(), Some("Soria"));
    }

    #[test]
    fn test_stale_leave_ignored() {
        let mut hover = HoverTracker::default();
        hover.enter("Soria");
        hover.enter("Burgos");
        assert!(!hover.leave("Soria"));
        assert_eq!(hover.current(), Some("Burgos"));
        assert!(hover.leave("Burgos"));
        assert_eq!(hover, HoverTracker::None);
    }

    #[test]
    fn test_clear() {
        let mut hover = HoverTracker::default();
        assert_eq!(hover.clear(), None);
        hover.enter("Lugo");
        assert_eq!(hover.clear(), Some("Lugo".to_string()));
        assert_eq!(hover.current(), None);
    }
}
