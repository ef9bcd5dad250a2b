//! Output writing: SVG as is, or rasterised to PNG/JPEG with resvg
//!
//! The SVG canvas uses 100 units per inch, so rendering at `dpi` scales by
//! `dpi / 100`.

use crate::error::{PlotError, Result};
use std::path::Path;
use tracing::info;

/// SVG units per inch of figure size
pub const UNITS_PER_INCH: f32 = 100.0;

const JPEG_QUALITY: u8 = 90;

/// First installed family wins as the generic sans-serif font
const SANS_SERIF_CANDIDATES: [&str; 5] = [
    "DejaVu Sans",
    "Liberation Sans",
    "Arial",
    "Helvetica",
    "Noto Sans",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Svg,
    Jpeg,
}

impl OutputFormat {
    /// Pick the format from the file extension; unknown extensions get PNG
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("svg") => OutputFormat::Svg,
            Some("jpg") | Some("jpeg") => OutputFormat::Jpeg,
            _ => OutputFormat::Png,
        }
    }
}

/// Write the chart to `path`, overwriting any existing file
///
/// Returns the number of bytes written.
pub fn write_output(svg: &str, path: &Path, dpi: u32) -> Result<usize> {
    let format = OutputFormat::from_path(path);
    let scale = dpi as f32 / UNITS_PER_INCH;

    let bytes = match format {
        OutputFormat::Svg => svg.as_bytes().to_vec(),
        OutputFormat::Png => svg_to_png(svg, scale)?,
        OutputFormat::Jpeg => svg_to_jpeg(svg, scale)?,
    };

    std::fs::write(path, &bytes)?;
    info!(
        path = %path.display(),
        ?format,
        dpi,
        bytes = bytes.len(),
        "plot written"
    );
    Ok(bytes.len())
}

pub fn svg_to_png(svg: &str, scale: f32) -> Result<Vec<u8>> {
    let pixmap = svg_to_pixmap(svg, scale)?;
    pixmap
        .encode_png()
        .map_err(|e| PlotError::Encode(e.to_string()))
}

pub fn svg_to_jpeg(svg: &str, scale: f32) -> Result<Vec<u8>> {
    let pixmap = svg_to_pixmap(svg, scale)?;
    let (w, h) = (pixmap.width(), pixmap.height());

    // Background is opaque white, so alpha can be dropped
    let rgba = pixmap.data();
    let mut rgb = vec![0u8; (w as usize) * (h as usize) * 3];
    for (src, dst) in rgba.chunks_exact(4).zip(rgb.chunks_exact_mut(3)) {
        dst.copy_from_slice(&src[..3]);
    }

    let mut out = Vec::new();
    let mut enc = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    enc.encode(&rgb, w, h, image::ExtendedColorType::Rgb8)
        .map_err(|e| PlotError::Encode(e.to_string()))?;
    Ok(out)
}

fn svg_to_pixmap(svg: &str, scale: f32) -> Result<tiny_skia::Pixmap> {
    let mut opt = usvg::Options::default();
    let fontdb = opt.fontdb_mut();
    fontdb.load_system_fonts();
    let sans = SANS_SERIF_CANDIDATES.iter().copied().find(|name| {
        fontdb
            .faces()
            .any(|face| face.families.iter().any(|(family, _)| family.as_str() == *name))
    });
    if let Some(name) = sans {
        fontdb.set_sans_serif_family(name);
        opt.font_family = name.to_string();
    }

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| PlotError::SvgParse(e.to_string()))?;

    let size = tree.size();
    let width_px = (size.width() * scale).ceil().max(1.0) as u32;
    let height_px = (size.height() * scale).ceil().max(1.0) as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width_px, height_px)
        .ok_or(PlotError::PixmapAlloc(width_px, height_px))?;
    pixmap.fill(tiny_skia::Color::WHITE);

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10" viewBox="0 0 20 10"><rect width="10" height="10" fill="black"/></svg>"#;

    #[test]
    fn test_output_format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("a.png")), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path(Path::new("a.SVG")), OutputFormat::Svg);
        assert_eq!(OutputFormat::from_path(Path::new("a.jpeg")), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_path(Path::new("a.jpg")), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_path(Path::new("plot")), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path(Path::new("plot.tiff")), OutputFormat::Png);
    }

    #[test]
    fn test_png_signature_and_scale() {
        let bytes = svg_to_png(SVG, 2.0).unwrap();
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));

        let pixmap = svg_to_pixmap(SVG, 2.0).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (40, 20));
        // Right half stays white
        let px = pixmap.pixel(35, 10).unwrap();
        assert_eq!((px.red(), px.green(), px.blue()), (255, 255, 255));
        let px = pixmap.pixel(5, 10).unwrap();
        assert_eq!((px.red(), px.green(), px.blue()), (0, 0, 0));
    }

    #[test]
    fn test_jpeg_signature() {
        let bytes = svg_to_jpeg(SVG, 1.0).unwrap();
        assert!(bytes.starts_with(&[0xFF, 0xD8]));
    }

    #[test]
    fn test_invalid_svg() {
        assert!(matches!(
            svg_to_png("not svg", 1.0),
            Err(PlotError::SvgParse(_))
        ));
    }

    #[test]
    fn test_write_output_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.svg");
        std::fs::write(&path, "old").unwrap();

        let n = write_output(SVG, &path, 900).unwrap();
        assert_eq!(n, SVG.len());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), SVG);
    }
}
