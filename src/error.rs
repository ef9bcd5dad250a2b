use thiserror::Error;

/// Errors that can occur while loading, normalizing or rendering a plot
#[derive(Debug, Error)]
pub enum PlotError {
    /// Spreadsheet could not be opened or decoded
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// Workbook contains no worksheet
    #[error("Spreadsheet '{0}' contains no worksheet")]
    NoWorksheet(String),

    /// Worksheet has no header row
    #[error("Worksheet is empty (no header row)")]
    EmptySheet,

    /// Required column not found in the header row
    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    /// IP/EA cell that is not a number
    #[error("Non-numeric value '{value}' in column '{column}' at row {row}")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    /// IP cell left empty
    #[error("Missing IP value at row {row}")]
    MissingIp { row: usize },

    /// DataFrame operation failed
    #[error("Table error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Label column mixes text and numbers and cannot be ordered
    #[error("Label column mixes text and numeric values")]
    UnsortableLabels,

    /// Colour string not recognised
    #[error("Invalid colour '{0}'")]
    InvalidColor(String),

    /// Chart drawing failed
    #[error("Render error: {0}")]
    Render(String),

    /// Generated SVG could not be parsed for rasterisation
    #[error("Failed to parse SVG: {0}")]
    SvgParse(String),

    /// Raster canvas could not be allocated
    #[error("Failed to allocate {0}x{1} pixmap")]
    PixmapAlloc(u32, u32),

    /// Image encoding failed
    #[error("Failed to encode image: {0}")]
    Encode(String),

    /// Configuration error (bad config file, invalid values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<plotters::drawing::DrawingAreaErrorKind<std::io::Error>> for PlotError {
    fn from(err: plotters::drawing::DrawingAreaErrorKind<std::io::Error>) -> Self {
        PlotError::Render(err.to_string())
    }
}

/// Type alias for Results using PlotError
pub type Result<T> = std::result::Result<T, PlotError>;
