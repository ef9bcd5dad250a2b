//! Energy-level bar chart drawing
//!
//! Draws onto a plotters SVG canvas sized `figsize × 100` units:
//! - HOMO bars hang from `ip_maxval` down to IP, LUMO bars stand on `-ea_maxval`
//!   and reach EA
//! - the y-axis is inverted (larger energies lower on the image)
//! - optional dashed redox reference lines with fixed annotations
//!
//! Plotters only rotates text in 90° steps, so the 45° x tick labels are
//! appended to the SVG after the chart is drawn.

use crate::colors::parse_colour;
use crate::config::PlotConfig;
use crate::error::Result;
use crate::offsets::Offsets;
use crate::style::{svg_colour, PlotStyle};
use crate::table::{EnergyTable, NEW_EA_COLUMN, NEW_IP_COLUMN};
use plotters::chart::LabelAreaPosition;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};

pub const Y_AXIS_TITLE: &str = "E / V";

/// A fixed horizontal guide with an annotation at fixed data coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceLine {
    pub y: f64,
    pub label: &'static str,
    /// Annotation anchor in data coordinates; not adapted to the number of rows
    pub label_pos: (f64, f64),
}

/// H+/H2 redox potential
pub const REDOX_H2: ReferenceLine = ReferenceLine {
    y: -0.68,
    label: "H⁺/ H₂",
    label_pos: (35.5, -0.8),
};

/// TEA redox potential
pub const REDOX_TEA: ReferenceLine = ReferenceLine {
    y: 0.69,
    label: "TEAR / TEA",
    label_pos: (34.5, 1.2),
};

/// One bar in data coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    /// Row position on the x-axis
    pub x: usize,
    pub bottom: f64,
    pub height: f64,
}

impl Bar {
    pub fn top(&self) -> f64 {
        self.bottom + self.height
    }
}

/// Everything the chart needs, in data coordinates
#[derive(Debug, Clone)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub homo: Vec<Bar>,
    pub lumo: Vec<Bar>,
    pub reference_lines: Vec<ReferenceLine>,
}

impl ChartData {
    /// Collect bars from a normalized table
    ///
    /// Rows with a missing `newEA` get no LUMO bar.
    pub fn from_table(table: &EnergyTable, offsets: &Offsets, config: &PlotConfig) -> Result<Self> {
        let labels = table.labels()?;
        let new_ip = table.column_f64(NEW_IP_COLUMN)?;
        let new_ea = table.column_f64(NEW_EA_COLUMN)?;

        let bars = |heights: &[Option<f64>], bottom: f64| -> Vec<Bar> {
            heights
                .iter()
                .enumerate()
                .filter_map(|(x, h)| h.map(|height| Bar { x, bottom, height }))
                .collect()
        };

        let mut reference_lines = Vec::new();
        if config.redox_h2 {
            reference_lines.push(REDOX_H2);
        }
        if config.redox_tea {
            reference_lines.push(REDOX_TEA);
        }

        Ok(Self {
            labels,
            homo: bars(&new_ip, offsets.ip_maxval),
            lumo: bars(&new_ea, -offsets.ea_maxval),
            reference_lines,
        })
    }

    /// Data-space y-range covering every bar edge and reference line, padded
    pub fn y_range(&self, padding: f64) -> (f64, f64) {
        let values = self
            .homo
            .iter()
            .chain(&self.lumo)
            .flat_map(|b| [b.bottom, b.top()])
            .chain(self.reference_lines.iter().map(|l| l.y));

        let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if !lo.is_finite() || !hi.is_finite() {
            return (-1.0, 1.0);
        }

        let span = hi - lo;
        let pad = if span > 0.0 { span * padding } else { 1.0 };
        (lo - pad, hi + pad)
    }

    /// Data-space x-range: one slot per row
    pub fn x_range(&self) -> (f64, f64) {
        let n = self.labels.len().max(1) as f64;
        (-0.6, n - 0.4)
    }
}

/// Draw the chart and return the SVG document
pub fn render_svg(chart_data: &ChartData, config: &PlotConfig, style: &PlotStyle) -> Result<String> {
    config.validate()?;
    let homo_colour = to_rgb(parse_colour(&config.homo_colour)?);
    let lumo_colour = to_rgb(parse_colour(&config.lumo_colour)?);

    let (width, height) = config.canvas_size();
    let (x_lo, x_hi) = chart_data.x_range();
    let (y_lo, y_hi) = chart_data.y_range(style.y_padding);
    let label_area = x_label_area_size(&chart_data.labels, style, height);
    let font = FontDesc::new(
        FontFamily::Name(&style.font_family),
        style.font_size as f64,
        FontStyle::Normal,
    )
    .color(&style.foreground);

    let mut svg = String::new();
    let mut ticks: Vec<(i32, i32)> = Vec::with_capacity(chart_data.labels.len());
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        root.fill(&style.background)?;

        // Screen y is the negated data y, which inverts the axis
        let mut chart = ChartBuilder::on(&root)
            .margin(style.margin)
            .x_label_area_size(label_area)
            .y_label_area_size(style.font_size * 4)
            .build_cartesian_2d(x_lo..x_hi, -y_hi..-y_lo)?;

        let y_formatter = |v: &f64| format_tick(-*v);
        let x_formatter = |_: &f64| String::new();
        let mut mesh = chart.configure_mesh();
        if !style.show_grid {
            mesh.disable_mesh();
        }
        mesh.x_label_formatter(&x_formatter)
            .y_label_formatter(&y_formatter)
            .set_tick_mark_size(LabelAreaPosition::Bottom, 0)
            .x_desc(config.xlabels.as_str())
            .y_desc(Y_AXIS_TITLE)
            .label_style(font.clone())
            .axis_desc_style(font.clone())
            .axis_style(&style.foreground)
            .draw()?;

        let half = style.bar_width / 2.0;
        let bar_rect = |bar: &Bar, colour: RGBColor| {
            let x = bar.x as f64;
            Rectangle::new(
                [(x - half, -bar.bottom), (x + half, -bar.top())],
                colour.filled(),
            )
        };
        chart.draw_series(chart_data.homo.iter().map(|b| bar_rect(b, homo_colour)))?;
        chart.draw_series(chart_data.lumo.iter().map(|b| bar_rect(b, lumo_colour)))?;

        let line_style = style
            .reference_line_colour
            .stroke_width(style.reference_line_width);
        for line in &chart_data.reference_lines {
            chart.draw_series(DashedLineSeries::new(
                vec![(x_lo, -line.y), (x_hi, -line.y)].into_iter(),
                style.dash.0,
                style.dash.1,
                line_style,
            ))?;
            let (tx, ty) = line.label_pos;
            chart.draw_series(std::iter::once(Text::new(
                line.label,
                (tx, -ty),
                font.clone(),
            )))?;
        }

        for i in 0..chart_data.labels.len() {
            ticks.push(chart.backend_coord(&(i as f64, -y_hi)));
        }

        root.present()?;
    }

    let overlay = tick_label_overlay(&chart_data.labels, &ticks, style);
    match svg.rfind("</svg>") {
        Some(pos) => svg.insert_str(pos, &overlay),
        None => svg.push_str(&overlay),
    }
    Ok(svg)
}

fn to_rgb(rgb: [u8; 3]) -> RGBColor {
    RGBColor(rgb[0], rgb[1], rgb[2])
}

/// Room below the plot for rotated tick labels plus the axis title
fn x_label_area_size(labels: &[String], style: &PlotStyle, canvas_height: u32) -> u32 {
    let longest = labels.iter().map(|l| l.chars().count()).max().unwrap_or(1) as f64;
    let font = style.font_size as f64;
    let angle = style.x_tick_rotation.to_radians();
    let text_extent = longest * font * 0.6 * angle.sin() + font * angle.cos();
    let size = text_extent + font * 2.5 + 6.0;
    (size.ceil() as u32).min(canvas_height / 2)
}

/// Tick marks and rotated labels, anchored at the label's end
fn tick_label_overlay(labels: &[String], ticks: &[(i32, i32)], style: &PlotStyle) -> String {
    let colour = svg_colour(&style.foreground);
    let tick_len = 4;
    let mut out = String::new();
    for (label, (x, y)) in labels.iter().zip(ticks) {
        let ty = y + tick_len + style.font_size as i32 / 2;
        out.push_str(&format!(
            r#"<line x1="{x}" y1="{y}" x2="{x}" y2="{y2}" stroke="{colour}" stroke-width="1"/>"#,
            y2 = y + tick_len,
        ));
        out.push_str(&format!(
            r#"<text x="{x}" y="{ty}" font-family="{family}" font-size="{size}" fill="{colour}" text-anchor="end" transform="rotate({angle} {x} {ty})">{text}</text>"#,
            family = escape_xml(&style.font_family),
            size = style.font_size,
            angle = -style.x_tick_rotation,
            text = escape_xml(label),
        ));
    }
    out
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// y tick text: at most two decimals, trailing zeros dropped, no "-0"
fn format_tick(v: f64) -> String {
    let text = format!("{:.2}", v + 0.0);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}
