//! Which overlays are open.

/// An overlay on top of the product grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Cart,
    Favorites,
    Search,
    Login,
    Signup,
    Checkout,
}

impl Panel {
    /// Modals are mutually exclusive.
    #[must_use]
    pub const fn is_modal(self) -> bool {
        matches!(self, Self::Login | Self::Signup | Self::Checkout)
    }

    /// Sidebars are mutually exclusive.
    #[must_use]
    pub const fn is_sidebar(self) -> bool {
        matches!(self, Self::Cart | Self::Favorites)
    }
}

/// Open panels in the order they were opened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Panels {
    open: Vec<Panel>,
}

impl Panels {
    #[must_use]
    pub const fn new() -> Self {
        Self { open: Vec::new() }
    }

    #[must_use]
    pub fn is_open(&self, panel: Panel) -> bool {
        self.open.contains(&panel)
    }

    /// Open `panel`, closing any other panel of the same kind.
    pub fn open(&mut self, panel: Panel) {
        if self.is_open(panel) {
            return;
        }
        self.open.retain(|p| {
            !(p.is_modal() && panel.is_modal() || p.is_sidebar() && panel.is_sidebar())
        });
        self.open.push(panel);
    }

    /// Returns whether the panel was open.
    pub fn close(&mut self, panel: Panel) -> bool {
        let before = self.open.len();
        self.open.retain(|p| *p != panel);
        self.open.len() != before
    }

    /// Returns whether the panel is now open.
    pub fn toggle(&mut self, panel: Panel) -> bool {
        if self.close(panel) {
            false
        } else {
            self.open(panel);
            true
        }
    }

    pub fn close_all(&mut self) {
        self.open.clear();
    }

    #[must_use]
    pub fn open_panels(&self) -> &[Panel] {
        &self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modals_replace_each_other() {
        let mut panels = Panels::new();
        panels.open(Panel::Cart);
        panels.open(Panel::Login);
        panels.open(Panel::Signup);
        assert_eq!(panels.open_panels(), &[Panel::Cart, Panel::Signup]);
    }

    #[test]
    fn test_sidebars_replace_each_other() {
        let mut panels = Panels::new();
        panels.open(Panel::Cart);
        assert!(panels.toggle(Panel::Favorites));
        assert!(!panels.is_open(Panel::Cart));
        assert!(!panels.toggle(Panel::Favorites));
        assert!(panels.open_panels().is_empty());
    }

    #[test]
    fn test_close_all() {
        let mut panels = Panels::new();
        panels.open(Panel::Search);
        panels.open(Panel::Checkout);
        panels.close_all();
        assert!(!panels.is_open(Panel::Search));
        assert!(!panels.close(Panel::Checkout));
    }
}
