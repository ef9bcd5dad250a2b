//! Visual theme of the energy-level chart
//!
//! Passed to the renderer explicitly; nothing here is process-wide state.

use plotters::style::RGBColor;

#[derive(Debug, Clone, PartialEq)]
pub struct PlotStyle {
    /// Figure and plot-area background
    pub background: RGBColor,
    /// Axis lines, tick labels and titles
    pub foreground: RGBColor,
    pub font_family: String,
    /// Font size in canvas units (100 per inch)
    pub font_size: u32,
    /// Counter-clockwise rotation of the x tick labels, in degrees
    pub x_tick_rotation: f64,
    /// Bar width as a fraction of the category slot
    pub bar_width: f64,
    pub show_grid: bool,
    /// Outer margin around the chart, canvas units
    pub margin: u32,
    /// Fraction of the data span added above and below the bars
    pub y_padding: f64,
    pub reference_line_colour: RGBColor,
    pub reference_line_width: u32,
    /// Dash length and gap of reference lines, canvas units
    pub dash: (u32, u32),
}

impl PlotStyle {
    /// Plain white background, no grid
    pub fn white() -> Self {
        Self {
            background: RGBColor(255, 255, 255),
            foreground: RGBColor(0, 0, 0),
            font_family: "sans-serif".to_string(),
            font_size: 14,
            x_tick_rotation: 45.0,
            bar_width: 0.8,
            show_grid: false,
            margin: 12,
            y_padding: 0.05,
            reference_line_colour: RGBColor(0x1f, 0x77, 0xb4),
            reference_line_width: 1,
            dash: (6, 4),
        }
    }
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self::white()
    }
}

/// `#rrggbb` form for hand-written SVG fragments
pub fn svg_colour(colour: &RGBColor) -> String {
    format!("#{:02x}{:02x}{:02x}", colour.0, colour.1, colour.2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_plain_white() {
        let style = PlotStyle::default();
        assert_eq!(style.background, RGBColor(255, 255, 255));
        assert!(!style.show_grid);
        assert_eq!(style.x_tick_rotation, 45.0);
    }

    #[test]
    fn test_svg_colour() {
        assert_eq!(svg_colour(&RGBColor(135, 206, 235)), "#87ceeb");
    }
}
