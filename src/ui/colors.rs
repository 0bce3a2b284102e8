// Pastel color palette for the UI

use ratatui::style::Color;

/// Defines the pastel color palette for the UI
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PastelColor {
    Pink,
    Lavender,
    Mint,
    SkyBlue,
    Peach,
    White,
    Gray,
}

impl PastelColor {
    /// Get the terminal color representation
    pub fn as_color(&self) -> Color {
        match self {
            PastelColor::Pink => Color::Rgb(255, 182, 193),     // Light pink
            PastelColor::Lavender => Color::Rgb(204, 169, 221), // Light purple
            PastelColor::Mint => Color::Rgb(176, 224, 183),     // Mint green
            PastelColor::SkyBlue => Color::Rgb(173, 216, 230),  // Light sky blue
            PastelColor::Peach => Color::Rgb(255, 218, 185),    // Peach
            PastelColor::White => Color::White,
            PastelColor::Gray => Color::Rgb(169, 169, 169), // Light gray
        }
    }
}

/// Theme defining the main colors used by the UI
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub primary: PastelColor,
    pub secondary: PastelColor,
    pub accent: PastelColor,
    pub text: PastelColor,
    pub muted: PastelColor,
    pub error: PastelColor,
    pub success: PastelColor,
}

impl Theme {
    /// Color for a pass/fail check result
    pub fn check_color(&self, passed: bool) -> Color {
        if passed {
            self.success.as_color()
        } else {
            self.error.as_color()
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: PastelColor::Lavender,
            secondary: PastelColor::SkyBlue,
            accent: PastelColor::Pink,
            text: PastelColor::White,
            muted: PastelColor::Gray,
            error: PastelColor::Peach,
            success: PastelColor::Mint,
        }
    }
}
