//! Spreadsheet loading and table normalization
//!
//! Reads the first worksheet into a Polars DataFrame holding the label column,
//! `IP` and `EA`, then augments it with the plot coordinates `newIP`/`newEA`.

use crate::config::OffsetStrategy;
use crate::error::{PlotError, Result};
use crate::offsets::Offsets;
use calamine::{open_workbook_auto, Data, Range, Reader};
use polars::prelude::*;
use std::path::Path;
use tracing::debug;

pub const IP_COLUMN: &str = "IP";
pub const EA_COLUMN: &str = "EA";
pub const NEW_IP_COLUMN: &str = "newIP";
pub const NEW_EA_COLUMN: &str = "newEA";

/// Displayed for a label cell that was left empty
const NULL_LABEL: &str = "nan";

/// Type of the label column as read from the sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    /// Whole numbers only (stored as Int64)
    Integer,
    /// Numbers with fractional parts (Float64)
    Float,
    /// Text only (String)
    Text,
    /// Text and numbers together; stored as String but has no ordering
    Mixed,
}

/// One cell of the label column before a column type is chosen
#[derive(Debug, Clone, PartialEq)]
enum LabelCell {
    Int(i64),
    Float(f64),
    Text(String),
    Empty,
}

impl LabelCell {
    fn from_data(cell: &Data) -> Self {
        match cell {
            Data::Int(i) => LabelCell::Int(*i),
            Data::Float(f) => LabelCell::Float(*f),
            Data::String(s) if s.trim().is_empty() => LabelCell::Empty,
            Data::String(s) => LabelCell::Text(s.clone()),
            Data::Empty => LabelCell::Empty,
            other => LabelCell::Text(other.to_string()),
        }
    }

    /// Text shown for this cell when the column has to hold mixed values
    fn display(&self) -> Option<String> {
        match self {
            LabelCell::Int(i) => Some(i.to_string()),
            LabelCell::Float(f) if f.fract() == 0.0 => Some(format!("{:.1}", f)),
            LabelCell::Float(f) => Some(f.to_string()),
            LabelCell::Text(s) => Some(s.clone()),
            LabelCell::Empty => None,
        }
    }
}

/// IP/EA table for one plot
#[derive(Debug, Clone)]
pub struct EnergyTable {
    df: DataFrame,
    label: String,
    label_kind: LabelKind,
}

impl EnergyTable {
    /// Read the first worksheet of a spreadsheet (xlsx, xlsm, xls, ods)
    pub fn from_path(path: impl AsRef<Path>, label: &str) -> Result<Self> {
        let path = path.as_ref();
        let mut workbook = open_workbook_auto(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| PlotError::NoWorksheet(path.display().to_string()))??;

        let table = Self::from_range(&range, label)?;
        debug!(
            path = %path.display(),
            rows = table.height(),
            label_kind = ?table.label_kind,
            "spreadsheet loaded"
        );
        Ok(table)
    }

    /// Build from a worksheet range whose first row is the header
    ///
    /// Rows where the label, IP and EA cells are all empty are skipped.
    /// IP and EA must be numeric; a missing IP is an error, a missing EA is kept
    /// as null.
    pub fn from_range(range: &Range<Data>, label: &str) -> Result<Self> {
        check_label_name(label)?;

        let mut rows = range.rows();
        let header = rows.next().ok_or(PlotError::EmptySheet)?;
        let find = |name: &str| {
            header
                .iter()
                .position(|cell| header_name(cell) == name)
                .ok_or_else(|| PlotError::MissingColumn(name.to_string()))
        };
        let label_idx = find(label)?;
        let ip_idx = find(IP_COLUMN)?;
        let ea_idx = find(EA_COLUMN)?;

        let mut labels = Vec::new();
        let mut ip = Vec::new();
        let mut ea = Vec::new();

        // Sheet row numbers are 1-based and the header occupies row 1
        for (i, row) in rows.enumerate() {
            let sheet_row = i + 2;
            let cell = |idx: usize| row.get(idx).unwrap_or(&Data::Empty);

            let label_cell = LabelCell::from_data(cell(label_idx));
            let ip_value = numeric_cell(cell(ip_idx), IP_COLUMN, sheet_row)?;
            let ea_value = numeric_cell(cell(ea_idx), EA_COLUMN, sheet_row)?;

            if label_cell == LabelCell::Empty && ip_value.is_none() && ea_value.is_none() {
                continue;
            }
            if ip_value.is_none() {
                return Err(PlotError::MissingIp { row: sheet_row });
            }

            labels.push(label_cell);
            ip.push(ip_value);
            ea.push(ea_value);
        }

        let (label_column, label_kind) = build_label_column(label, &labels);
        let df = DataFrame::new(vec![
            label_column,
            Column::new(IP_COLUMN.into(), ip),
            Column::new(EA_COLUMN.into(), ea),
        ])?;

        Ok(Self {
            df,
            label: label.to_string(),
            label_kind,
        })
    }

    /// Wrap an existing DataFrame
    ///
    /// IP and EA are cast to Float64; the label kind follows the column dtype.
    pub fn from_dataframe(mut df: DataFrame, label: &str) -> Result<Self> {
        check_label_name(label)?;

        for name in [label, IP_COLUMN, EA_COLUMN] {
            if df.column(name).is_err() {
                return Err(PlotError::MissingColumn(name.to_string()));
            }
        }

        for name in [IP_COLUMN, EA_COLUMN] {
            let cast = df.column(name)?.cast(&DataType::Float64)?;
            df.with_column(cast)?;
        }

        let dtype = df.column(label)?.dtype().clone();
        let label_kind = if dtype.is_integer() {
            LabelKind::Integer
        } else if dtype.is_float() {
            LabelKind::Float
        } else {
            LabelKind::Text
        };

        let table = Self {
            df,
            label: label.to_string(),
            label_kind,
        };

        if let Some(i) = table.column_f64(IP_COLUMN)?.iter().position(Option::is_none) {
            return Err(PlotError::MissingIp { row: i + 2 });
        }

        Ok(table)
    }

    /// Compute offsets, add `newIP`/`newEA`, sort by label and coerce labels to text
    ///
    /// Sorting is best effort: if the labels cannot be ordered the table keeps
    /// its input order and nothing is reported.
    pub fn normalize(&mut self, strategy: OffsetStrategy) -> Result<Offsets> {
        let ip = self.column_f64(IP_COLUMN)?;
        let ea = self.column_f64(EA_COLUMN)?;
        let offsets = Offsets::compute(&ip, &ea, strategy);

        let new_ip: Vec<Option<f64>> = ip.iter().map(|v| v.map(|v| offsets.new_ip(v))).collect();
        let new_ea: Vec<Option<f64>> = ea.iter().map(|v| v.map(|v| offsets.new_ea(v))).collect();
        self.df.with_column(Column::new(NEW_IP_COLUMN.into(), new_ip))?;
        self.df.with_column(Column::new(NEW_EA_COLUMN.into(), new_ea))?;

        let _ = self.sort_by_label();
        self.coerce_labels()?;

        Ok(offsets)
    }

    /// Sort rows ascending by label, nulls last, ties in input order
    pub fn sort_by_label(&mut self) -> Result<()> {
        if self.label_kind == LabelKind::Mixed {
            return Err(PlotError::UnsortableLabels);
        }
        let options = SortMultipleOptions::default()
            .with_maintain_order(true)
            .with_nulls_last(true);
        self.df = self.df.sort(vec![self.label.clone()], options)?;
        Ok(())
    }

    fn coerce_labels(&mut self) -> Result<()> {
        let labels = self.labels()?;
        self.df
            .with_column(Column::new(self.label.as_str().into(), labels))?;
        if self.label_kind != LabelKind::Mixed {
            self.label_kind = LabelKind::Text;
        }
        Ok(())
    }

    /// Labels as display strings, in current row order
    pub fn labels(&self) -> Result<Vec<String>> {
        let cast = self.df.column(&self.label)?.cast(&DataType::String)?;
        let labels = cast
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|v| v.unwrap_or(NULL_LABEL).to_string())
            .collect();
        Ok(labels)
    }

    /// Values of a numeric column (IP, EA, newIP, newEA)
    pub fn column_f64(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let values = self
            .df
            .column(name)?
            .as_materialized_series()
            .f64()?
            .into_iter()
            .collect();
        Ok(values)
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn label_name(&self) -> &str {
        &self.label
    }

    pub fn label_kind(&self) -> LabelKind {
        self.label_kind
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }
}

fn check_label_name(label: &str) -> Result<()> {
    if label == IP_COLUMN || label == EA_COLUMN {
        return Err(PlotError::Config(format!(
            "label column must not be '{}'",
            label
        )));
    }
    Ok(())
}

fn header_name(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

fn numeric_cell(cell: &Data, column: &str, row: usize) -> Result<Option<f64>> {
    match cell {
        Data::Float(f) => Ok(Some(*f)),
        Data::Int(i) => Ok(Some(*i as f64)),
        Data::Empty => Ok(None),
        Data::String(s) if s.trim().is_empty() => Ok(None),
        other => Err(PlotError::NonNumeric {
            column: column.to_string(),
            row,
            value: other.to_string(),
        }),
    }
}

/// Pick the label column type the way a dataframe reader would
fn build_label_column(name: &str, cells: &[LabelCell]) -> (Column, LabelKind) {
    let filled = || cells.iter().filter(|c| **c != LabelCell::Empty);
    let all_numeric = filled().all(|c| matches!(c, LabelCell::Int(_) | LabelCell::Float(_)));
    let any_numeric = filled().any(|c| matches!(c, LabelCell::Int(_) | LabelCell::Float(_)));
    let any_text = filled().any(|c| matches!(c, LabelCell::Text(_)));

    if any_numeric && all_numeric {
        let integral = filled().all(|c| match c {
            LabelCell::Int(_) => true,
            LabelCell::Float(f) => f.fract() == 0.0 && f.abs() < i64::MAX as f64,
            _ => false,
        });

        // Integer columns with gaps are read as floats, as a dataframe reader does
        let has_gaps = cells.iter().any(|c| *c == LabelCell::Empty);
        if integral && !has_gaps {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|c| match c {
                    LabelCell::Int(i) => Some(*i),
                    LabelCell::Float(f) => Some(*f as i64),
                    _ => None,
                })
                .collect();
            return (Column::new(name.into(), values), LabelKind::Integer);
        }

        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|c| match c {
                LabelCell::Int(i) => Some(*i as f64),
                LabelCell::Float(f) => Some(*f),
                _ => None,
            })
            .collect();
        return (Column::new(name.into(), values), LabelKind::Float);
    }

    let kind = if any_numeric && any_text {
        LabelKind::Mixed
    } else {
        LabelKind::Text
    };
    let values: Vec<Option<String>> = cells.iter().map(LabelCell::display).collect();
    (Column::new(name.into(), values), kind)
}
