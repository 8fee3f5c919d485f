use scene::components::Color;

use crate::boundary::BoundaryMode;

/// Colors applied to country shapes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CountryStyle {
    pub default_color: Color,
    pub highlight_color: Color,
}

impl CountryStyle {
    pub const fn new(default_color: Color, highlight_color: Color) -> Self {
        Self {
            default_color,
            highlight_color,
        }
    }

    /// Filled patches are drawn translucent so the texture shows through.
    pub fn for_mode(mode: BoundaryMode) -> Self {
        let base = Self::default();
        match mode {
            BoundaryMode::Outline => base,
            BoundaryMode::Filled => Self::new(
                base.default_color.with_alpha(FILL_OPACITY),
                base.highlight_color.with_alpha(FILL_HIGHLIGHT_OPACITY),
            ),
        }
    }
}

pub const FILL_OPACITY: f32 = 0.35;
pub const FILL_HIGHLIGHT_OPACITY: f32 = 0.7;

impl Default for CountryStyle {
    fn default() -> Self {
        Self {
            default_color: Color::from_hex(0xffffff),
            highlight_color: Color::from_hex(0xffcc00),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CountryStyle, FILL_OPACITY};
    use crate::boundary::BoundaryMode;

    #[test]
    fn filled_mode_is_translucent() {
        let outline = CountryStyle::for_mode(BoundaryMode::Outline);
        assert_eq!(outline.default_color.rgba()[3], 1.0);

        let filled = CountryStyle::for_mode(BoundaryMode::Filled);
        assert_eq!(filled.default_color.rgba()[3], FILL_OPACITY);
        assert_ne!(filled.default_color, filled.highlight_color);
    }
}
