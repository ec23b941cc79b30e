use inkwell_types::ColorScheme;
use ratatui::style::Color;

use crate::app::App;

pub struct ThemeColors {
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub text: Color,
    pub text_dim: Color,
    pub background: Color,
    pub border: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub highlight_bg: Color,
}

pub fn get_theme_colors(app: &App) -> ThemeColors {
    theme_for(app.color_scheme)
}

pub fn theme_for(scheme: ColorScheme) -> ThemeColors {
    match scheme {
        // Ink on warm paper tones, readable on most terminals
        ColorScheme::Default => ThemeColors {
            primary: Color::Rgb(230, 180, 90),
            secondary: Color::Rgb(190, 150, 110),
            accent: Color::Rgb(120, 190, 230),
            text: Color::Rgb(225, 220, 210),
            text_dim: Color::Rgb(140, 135, 125),
            background: Color::Reset,
            border: Color::Rgb(110, 100, 90),
            success: Color::Rgb(130, 200, 120),
            warning: Color::Rgb(240, 200, 90),
            error: Color::Rgb(230, 90, 80),
            highlight_bg: Color::Rgb(50, 45, 40),
        },

        ColorScheme::Dark => ThemeColors {
            primary: Color::Rgb(100, 200, 255),
            secondary: Color::Rgb(150, 150, 255),
            accent: Color::Rgb(255, 100, 200),
            text: Color::Rgb(220, 220, 220),
            text_dim: Color::Rgb(120, 120, 120),
            background: Color::Rgb(20, 20, 25),
            border: Color::Rgb(60, 60, 70),
            success: Color::Rgb(100, 255, 150),
            warning: Color::Rgb(255, 200, 100),
            error: Color::Rgb(255, 100, 100),
            highlight_bg: Color::Rgb(40, 40, 50),
        },

        ColorScheme::Light => ThemeColors {
            primary: Color::Rgb(0, 100, 200),
            secondary: Color::Rgb(100, 50, 200),
            accent: Color::Rgb(200, 0, 100),
            text: Color::Rgb(30, 30, 30),
            text_dim: Color::Rgb(100, 100, 100),
            background: Color::Rgb(250, 250, 250),
            border: Color::Rgb(180, 180, 180),
            success: Color::Rgb(0, 150, 50),
            warning: Color::Rgb(200, 150, 0),
            error: Color::Rgb(200, 0, 0),
            highlight_bg: Color::Rgb(230, 240, 255),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schemes_differ() {
        let dark = theme_for(ColorScheme::Dark);
        let light = theme_for(ColorScheme::Light);
        assert_ne!(dark.background, light.background);
        assert_ne!(dark.text, light.text);
        assert_ne!(theme_for(ColorScheme::Default).accent, theme_for(ColorScheme::Default).text_dim);
    }
}
