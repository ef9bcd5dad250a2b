//! Plot configuration
//!
//! Defaults come from plot_properties.json via `PropertyReader`, so `PlotConfig::new`
//! and a config file with no entries produce the same plot.

use crate::error::{PlotError, Result};
use crate::properties::PropertyReader;
use std::path::{Path, PathBuf};

/// How the bar baselines are shifted away from zero
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OffsetStrategy {
    /// Ceilings derived from the IP/EA magnitudes in the table
    #[default]
    Adaptive,
    /// The same constant for both series, whatever the data
    Fixed(f64),
}

impl OffsetStrategy {
    /// Parse from string value
    ///
    /// Validation of the name happens in `PropertyReader::get_enum`.
    pub fn parse(s: &str, fixed_offset: f64) -> Self {
        match s.to_lowercase().as_str() {
            "fixed" => Self::Fixed(fixed_offset),
            _ => Self::Adaptive,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Source spreadsheet
    pub data_path: PathBuf,

    /// Label column name, also used as the x-axis title
    pub xlabels: String,

    /// Fill colour of the HOMO (IP) bars
    pub homo_colour: String,

    /// Fill colour of the LUMO (EA) bars
    pub lumo_colour: String,

    /// Output image path; extension picks the format
    pub filename: PathBuf,

    /// Figure (width, height) in inches
    pub figsize: (f64, f64),

    /// Draw the TEA redox reference line
    pub redox_tea: bool,

    /// Draw the H+/H2 redox reference line
    pub redox_h2: bool,

    pub offset_strategy: OffsetStrategy,

    /// Raster resolution (ignored for SVG output)
    pub dpi: u32,
}

impl PlotConfig {
    /// Create a config with every optional setting at its default
    pub fn new(data_path: impl AsRef<Path>, xlabels: impl Into<String>) -> Self {
        Self::from_properties(data_path, xlabels, &PropertyReader::new())
    }

    /// Create config from plot properties
    ///
    /// The data path and label column have no sensible default and are passed
    /// explicitly; everything else is read from `props`.
    pub fn from_properties(
        data_path: impl AsRef<Path>,
        xlabels: impl Into<String>,
        props: &PropertyReader,
    ) -> Self {
        let figsize = (
            props.get_f64_in_range("figure.width", 0.5, 200.0),
            props.get_f64_in_range("figure.height", 0.5, 200.0),
        );

        let fixed_offset = props.get_f64("offset.fixed");
        let offset_strategy = OffsetStrategy::parse(&props.get_enum("offset.strategy"), fixed_offset);

        Self {
            data_path: data_path.as_ref().to_path_buf(),
            xlabels: xlabels.into(),
            homo_colour: props.get_string("homo.colour"),
            lumo_colour: props.get_string("lumo.colour"),
            filename: PathBuf::from(props.get_string("filename")),
            figsize,
            redox_tea: props.get_bool("redox.tea"),
            redox_h2: props.get_bool("redox.h2"),
            offset_strategy,
            dpi: props.get_u32_in_range("dpi", 10, 2400),
        }
    }

    pub fn homo_colour(mut self, colour: impl Into<String>) -> Self {
        self.homo_colour = colour.into();
        self
    }

    pub fn lumo_colour(mut self, colour: impl Into<String>) -> Self {
        self.lumo_colour = colour.into();
        self
    }

    pub fn filename(mut self, filename: impl AsRef<Path>) -> Self {
        self.filename = filename.as_ref().to_path_buf();
        self
    }

    pub fn figsize(mut self, width: f64, height: f64) -> Self {
        self.figsize = (width, height);
        self
    }

    pub fn redox_tea(mut self, enabled: bool) -> Self {
        self.redox_tea = enabled;
        self
    }

    pub fn redox_h2(mut self, enabled: bool) -> Self {
        self.redox_h2 = enabled;
        self
    }

    pub fn offset_strategy(mut self, strategy: OffsetStrategy) -> Self {
        self.offset_strategy = strategy;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Reject settings that cannot produce an image
    ///
    /// `from_properties` clamps out-of-range values, but the builder setters
    /// take whatever they are given.
    pub fn validate(&self) -> Result<()> {
        let (w, h) = self.figsize;
        if !(w.is_finite() && h.is_finite()) || w <= 0.0 || h <= 0.0 {
            return Err(PlotError::Config(format!(
                "figure size must be positive, got {} x {}",
                w, h
            )));
        }
        let (cw, ch) = self.canvas_size();
        if cw == 0 || ch == 0 {
            return Err(PlotError::Config(format!(
                "figure size {} x {} in is too small to draw",
                w, h
            )));
        }
        if self.dpi == 0 {
            return Err(PlotError::Config("dpi must be positive".to_string()));
        }
        Ok(())
    }

    /// Figure size in SVG canvas units (100 per inch)
    pub fn canvas_size(&self) -> (u32, u32) {
        let (w, h) = self.figsize;
        ((w * 100.0).round() as u32, (h * 100.0).round() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlotConfig::new("data.xlsx", "Molecule number");
        assert_eq!(config.data_path, PathBuf::from("data.xlsx"));
        assert_eq!(config.xlabels, "Molecule number");
        assert_eq!(config.homo_colour, "skyblue");
        assert_eq!(config.lumo_colour, "orange");
        assert_eq!(config.filename, PathBuf::from("homolumoplot.png"));
        assert_eq!(config.figsize, (12.0, 4.0));
        assert!(!config.redox_tea);
        assert!(!config.redox_h2);
        assert_eq!(config.offset_strategy, OffsetStrategy::Adaptive);
        assert_eq!(config.dpi, 900);
        assert_eq!(config.canvas_size(), (1200, 400));
    }

    #[test]
    fn test_from_properties() {
        let props = PropertyReader::from_json_str(
            r#"{"offset.strategy": "fixed", "offset.fixed": 3.5, "redox.tea": "true", "filename": "out.svg"}"#,
        )
        .unwrap();
        let config = PlotConfig::from_properties("d.xlsx", "id", &props);
        assert_eq!(config.offset_strategy, OffsetStrategy::Fixed(3.5));
        assert!(config.redox_tea);
        assert_eq!(config.filename, PathBuf::from("out.svg"));
    }

    #[test]
    fn test_offset_strategy_parse() {
        assert_eq!(OffsetStrategy::parse("FIXED", 5.0), OffsetStrategy::Fixed(5.0));
        assert_eq!(OffsetStrategy::parse("adaptive", 5.0), OffsetStrategy::Adaptive);
        assert_eq!(OffsetStrategy::parse("", 5.0), OffsetStrategy::Adaptive);
    }

    #[test]
    fn test_builder_overrides() {
        let config = PlotConfig::new("d.xlsx", "id")
            .homo_colour("navy")
            .lumo_colour("#ff0000")
            .figsize(6.0, 3.0)
            .redox_h2(true)
            .dpi(72);
        assert_eq!(config.homo_colour, "navy");
        assert_eq!(config.lumo_colour, "#ff0000");
        assert_eq!(config.canvas_size(), (600, 300));
        assert!(config.redox_h2);
        assert_eq!(config.dpi, 72);
    }

    #[test]
    fn test_validate_rejects_degenerate_figsize() {
        assert!(PlotConfig::new("d.xlsx", "id").validate().is_ok());
        for (w, h) in [(0.0, 0.0), (-12.0, 4.0), (12.0, -1.0), (0.001, 4.0), (f64::NAN, 4.0)] {
            let config = PlotConfig::new("d.xlsx", "id").figsize(w, h);
            assert!(
                matches!(config.validate(), Err(PlotError::Config(_))),
                "figsize ({}, {}) accepted",
                w,
                h
            );
        }
        let config = PlotConfig::new("d.xlsx", "id").dpi(0);
        assert!(config.validate().is_err());
    }
}
