use ratatui::style::Color;

/// Runtime theme with configurable colors
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub fg1: Color,
    pub grey0: Color,
    pub grey1: Color,

    // Palette colors
    pub paper: Color,
    pub ink: Color,
    pub teal: Color,
    pub red: Color,

    // Semantic colors
    pub accent: Color,
    pub highlight: Color,
    pub placeholder: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Black stage, off-white paper, teal highlight
        Self {
            bg0: Color::Rgb(0x00, 0x00, 0x00),
            bg1: Color::Rgb(0x14, 0x14, 0x14),
            bg2: Color::Rgb(0x2a, 0x2a, 0x2a),
            fg0: Color::Rgb(0xf5, 0xf5, 0xf5),
            fg1: Color::Rgb(0xd0, 0xd0, 0xd0),
            grey0: Color::Rgb(0x6e, 0x6e, 0x6e),
            grey1: Color::Rgb(0x9a, 0x9a, 0x9a),
            paper: Color::Rgb(0xf5, 0xf5, 0xf5),
            ink: Color::Rgb(0x11, 0x11, 0x11),
            teal: Color::Rgb(0x00, 0x82, 0x99),
            red: Color::Rgb(0xea, 0x69, 0x62),
            accent: Color::Rgb(0x00, 0x82, 0x99),
            highlight: Color::Rgb(0xff, 0xff, 0xff),
            placeholder: Color::Rgb(0x32, 0x32, 0x32),
        }
    }
}

impl Theme {
    /// Blend `fg` over `bg` with the given opacity
    ///
    /// Terminals have no alpha channel, so opacity is applied to the colour.
    /// Non-RGB colours are returned unchanged above half opacity and as `bg`
    /// below it.
    pub fn fade(fg: Color, bg: Color, opacity: f64) -> Color {
        let a = opacity.clamp(0.0, 1.0);
        match (fg, bg) {
            (Color::Rgb(fr, fg_, fb), Color::Rgb(br, bg_, bb)) => {
                let mix = |f: u8, b: u8| (b as f64 + (f as f64 - b as f64) * a).round() as u8;
                Color::Rgb(mix(fr, br), mix(fg_, bg_), mix(fb, bb))
            }
            _ if a >= 0.5 => fg,
            _ => bg,
        }
    }
}
