//! Theme configuration and colors.
//!
//! Palettes come from the `ratatui-themes` crate; [`ThemeColors`] maps a
//! palette onto the roles rickdex draws with (panels, hints, life status,
//! favorite marker).

use ratatui::style::{Color, Modifier, Style};
use ratatui_themes::{ThemeName, ThemePalette};
use serde::{Deserialize, Serialize};

/// Theme wrapper around `ThemeName` from ratatui-themes.
///
/// Stored in `config.toml` by its slug.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Theme(pub ThemeName);

impl Theme {
    /// Every available theme, in picker order
    #[must_use]
    pub const fn all() -> &'static [ThemeName] {
        ThemeName::all()
    }

    /// Next theme in rotation
    #[must_use]
    pub fn next(&self) -> Self {
        Self(self.0.next())
    }

    /// Display name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.0.display_name()
    }

    /// Colors to draw with
    #[must_use]
    pub fn colors(&self) -> ThemeColors {
        ThemeColors::from_palette(self.0.palette())
    }

    /// Underlying palette name
    #[must_use]
    pub const fn inner(&self) -> ThemeName {
        self.0
    }
}

impl From<ThemeName> for Theme {
    fn from(name: ThemeName) -> Self {
        Self(name)
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Palette roles used by the UI.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    /// Screen background
    pub bg: Color,
    /// Popups and the status bar
    pub bg_secondary: Color,
    /// Regular text
    pub fg: Color,
    /// Labels, hints, secondary text
    pub fg_muted: Color,
    /// Titles and focused borders
    pub primary: Color,
    /// Key hints
    pub accent: Color,
    /// Warnings
    pub warning: Color,
    /// Errors
    pub error: Color,
    /// Unfocused borders
    pub border: Color,
    /// Selected list row
    pub selection: Color,
    /// Favorite marker
    pub favorite: Color,
    /// "Alive" status
    pub alive: Color,
    /// "Dead" status
    pub dead: Color,
}

impl ThemeColors {
    /// Map a `ratatui-themes` palette onto the UI roles
    #[must_use]
    pub fn from_palette(p: ThemePalette) -> Self {
        Self {
            bg: p.bg,
            bg_secondary: lighten(p.bg, 10),
            fg: p.fg,
            fg_muted: p.muted,
            primary: p.accent,
            accent: p.secondary,
            warning: p.warning,
            error: p.error,
            border: p.muted,
            selection: p.selection,
            favorite: Color::Rgb(255, 196, 0), // #FFC400
            alive: p.success,
            dead: p.error,
        }
    }

    /// Regular text
    #[must_use]
    pub fn text(&self) -> Style {
        Style::default().fg(self.fg)
    }

    /// Hint text (slightly stronger than muted)
    #[must_use]
    pub fn text_dim(&self) -> Style {
        Style::default().fg(self.fg_muted).add_modifier(Modifier::DIM)
    }

    /// Secondary text
    #[must_use]
    pub fn text_muted(&self) -> Style {
        Style::default().fg(self.fg_muted)
    }

    /// Titles
    #[must_use]
    pub fn text_primary(&self) -> Style {
        Style::default().fg(self.primary)
    }

    /// Warnings
    #[must_use]
    pub fn text_warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    /// Errors
    #[must_use]
    pub fn text_error(&self) -> Style {
        Style::default().fg(self.error)
    }

    /// Unfocused panel border
    #[must_use]
    pub fn block(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Focused panel border
    #[must_use]
    pub fn block_focus(&self) -> Style {
        Style::default().fg(self.primary)
    }

    /// Selected list row
    #[must_use]
    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.selection)
            .fg(self.fg)
            .add_modifier(Modifier::BOLD)
    }

    /// Inactive tab
    #[must_use]
    pub fn tab(&self) -> Style {
        Style::default().fg(self.fg_muted)
    }

    /// Active tab
    #[must_use]
    pub fn tab_active(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Keyboard shortcut in hints and help
    #[must_use]
    pub fn key_hint(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Application name in the tab bar
    #[must_use]
    pub fn logo_style_primary(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Favorite marker
    #[must_use]
    pub fn favorite(&self) -> Style {
        Style::default()
            .fg(self.favorite)
            .add_modifier(Modifier::BOLD)
    }

    /// Color for a character's life status
    #[must_use]
    pub fn status(&self, status: &str) -> Style {
        let color = match status.to_ascii_lowercase().as_str() {
            "alive" => self.alive,
            "dead" => self.dead,
            _ => self.fg_muted,
        };
        Style::default().fg(color)
    }
}

/// Raise each RGB channel; named colors are returned unchanged
fn lighten(color: Color, amount: u8) -> Color {
    match color {
        Color::Rgb(r, g, b) => Color::Rgb(
            r.saturating_add(amount),
            g.saturating_add(amount),
            b.saturating_add(amount),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_colors() {
        let colors = Theme::default().colors();
        assert_eq!(colors.status("Alive").fg, Some(colors.alive));
        assert_eq!(colors.status("dead").fg, Some(colors.dead));
        assert_eq!(colors.status("unknown").fg, Some(colors.fg_muted));
    }

    #[test]
    fn test_lighten() {
        assert_eq!(lighten(Color::Rgb(10, 250, 0), 10), Color::Rgb(20, 255, 10));
        assert_eq!(lighten(Color::Black, 10), Color::Black);
    }
}
