//! HOMO/LUMO energy-level plotting library
//!
//! Reads ionization potentials (IP) and electron affinities (EA) from a
//! spreadsheet, shifts them onto a common baseline and draws one HOMO bar and
//! one LUMO bar per structure.
//!
//! Module organization:
//! - `table`: spreadsheet loading, normalization and label ordering
//! - `offsets`: baseline offsets (adaptive or fixed)
//! - `render`: chart geometry and SVG drawing
//! - `raster`: SVG to PNG/JPEG output
//! - `config`, `properties`: plot settings with embedded defaults
//! - `plot`: the load → normalize → render pipeline

pub mod colors;
pub mod config;
pub mod error;
pub mod offsets;
pub mod plot;
pub mod properties;
pub mod raster;
pub mod render;
pub mod style;
pub mod table;

pub use config::{OffsetStrategy, PlotConfig};
pub use error::{PlotError, Result};
pub use plot::HomoLumoPlot;
