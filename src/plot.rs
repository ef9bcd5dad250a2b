//! Plot pipeline
//!
//! `HomoLumoPlot::plot` runs the three steps in order:
//! 1. load the spreadsheet into an `EnergyTable`
//! 2. normalize it (offsets, `newIP`/`newEA`, label sort and coercion)
//! 3. draw the chart and write the output file

use crate::config::PlotConfig;
use crate::error::Result;
use crate::offsets::Offsets;
use crate::raster;
use crate::render::{self, ChartData};
use crate::style::PlotStyle;
use crate::table::EnergyTable;
use tracing::debug;

/// Energy-level diagram of HOMO (-IP) and LUMO (-EA) per structure
pub struct HomoLumoPlot {
    config: PlotConfig,
    style: PlotStyle,
}

impl HomoLumoPlot {
    pub fn new(config: PlotConfig) -> Self {
        Self {
            config,
            style: PlotStyle::default(),
        }
    }

    /// Replace the default white theme
    pub fn with_style(mut self, style: PlotStyle) -> Self {
        self.style = style;
        self
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    /// Load, normalize and render; the output file is the only effect
    pub fn plot(&self) -> Result<()> {
        let (table, offsets) = self.load_data()?;
        self.render(&table, &offsets)?;
        Ok(())
    }

    /// Steps 1-2: read the spreadsheet and normalize it
    pub fn load_data(&self) -> Result<(EnergyTable, Offsets)> {
        let mut table = EnergyTable::from_path(&self.config.data_path, &self.config.xlabels)?;
        let offsets = table.normalize(self.config.offset_strategy)?;
        debug!(
            rows = table.height(),
            ip_maxval = offsets.ip_maxval,
            ea_maxval = offsets.ea_maxval,
            "table normalized"
        );
        Ok((table, offsets))
    }

    /// Step 3: draw a normalized table and write the output file
    ///
    /// Returns the number of bytes written.
    pub fn render(&self, table: &EnergyTable, offsets: &Offsets) -> Result<usize> {
        let chart_data = ChartData::from_table(table, offsets, &self.config)?;
        let svg = render::render_svg(&chart_data, &self.config, &self.style)?;
        raster::write_output(&svg, &self.config.filename, self.config.dpi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OffsetStrategy;
    use polars::prelude::*;

    fn normalized_table() -> (EnergyTable, Offsets) {
        let df = df! {
            "Molecule number" => [2i64, 1, 3],
            "IP" => [5.8, 6.2, 5.4],
            "EA" => [-0.3, 2.1, 1.4]
        }
        .unwrap();
        let mut table = EnergyTable::from_dataframe(df, "Molecule number").unwrap();
        let offsets = table.normalize(OffsetStrategy::Adaptive).unwrap();
        (table, offsets)
    }

    #[test]
    fn test_render_writes_non_empty_png() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("homolumoplot.png");
        let config = PlotConfig::new("unused.xlsx", "Molecule number")
            .filename(&out)
            .redox_h2(true)
            .redox_tea(true)
            .dpi(50);

        let (table, offsets) = normalized_table();
        let written = HomoLumoPlot::new(config).render(&table, &offsets).unwrap();

        let bytes = std::fs::read(&out).unwrap();
        assert_eq!(bytes.len(), written);
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
    }

    #[test]
    fn test_render_svg_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("levels.svg");
        let config = PlotConfig::new("unused.xlsx", "Molecule number").filename(&out);

        let (table, offsets) = normalized_table();
        HomoLumoPlot::new(config).render(&table, &offsets).unwrap();

        let svg = std::fs::read_to_string(&out).unwrap();
        assert!(svg.contains("E / V"));
        assert!(svg.contains("<rect"));
    }

    /// Two-row sheet with one negative EA
    fn write_energy_sheet(path: &std::path::Path) {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, name) in ["id", "IP", "EA"].into_iter().enumerate() {
            sheet.write_string(0, col as u16, name).unwrap();
        }
        for (row, values) in [[2.0, 5.8, -0.3], [1.0, 6.2, 2.1]].into_iter().enumerate() {
            for (col, value) in values.into_iter().enumerate() {
                sheet.write_number(row as u32 + 1, col as u16, value).unwrap();
            }
        }
        workbook.save(path).unwrap();
    }

    #[test]
    fn test_plot_writes_file_from_spreadsheet() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("energies.xlsx");
        let out = dir.path().join("homolumoplot.png");
        write_energy_sheet(&data);

        let config = PlotConfig::new(&data, "id")
            .filename(&out)
            .redox_h2(true)
            .dpi(50);
        let plot = HomoLumoPlot::new(config);

        let (table, offsets) = plot.load_data().unwrap();
        assert_eq!(table.labels().unwrap(), vec!["1", "2"]);
        assert_eq!(offsets, Offsets { ip_maxval: 7.0, ea_maxval: 7.0 });

        plot.plot().unwrap();
        let bytes = std::fs::read(&out).unwrap();
        assert!(!bytes.is_empty());
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
    }

    #[test]
    fn test_plot_rejects_empty_figure() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("energies.xlsx");
        let out = dir.path().join("out.png");
        write_energy_sheet(&data);

        let config = PlotConfig::new(&data, "id").filename(&out).figsize(0.0, 0.0);
        assert!(matches!(
            HomoLumoPlot::new(config).plot(),
            Err(crate::error::PlotError::Config(_))
        ));
        assert!(!out.exists());
    }

    #[test]
    fn test_plot_missing_spreadsheet_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = PlotConfig::new(dir.path().join("missing.xlsx"), "id")
            .filename(dir.path().join("out.png"));
        assert!(HomoLumoPlot::new(config).plot().is_err());
        assert!(!dir.path().join("out.png").exists());
    }
}
