//! Colour name resolution
//!
//! Bar colours are configured with the names a matplotlib user would type:
//! - CSS/X11 names (`skyblue`, `orange`, `darkslategray`, ...)
//! - single-letter base colours (`b`, `g`, `r`, `c`, `m`, `y`, `k`, `w`)
//! - the Tableau palette (`tab:blue`, ...) and cycle references `C0`..`C9`
//! - hex strings `#rgb` / `#rrggbb`

use crate::error::{PlotError, Result};

/// Tableau 10 palette, also used for `C0`..`C9`
const TABLEAU: [(&str, [u8; 3]); 10] = [
    ("blue", [0x1f, 0x77, 0xb4]),
    ("orange", [0xff, 0x7f, 0x0e]),
    ("green", [0x2c, 0xa0, 0x2c]),
    ("red", [0xd6, 0x27, 0x28]),
    ("purple", [0x94, 0x67, 0xbd]),
    ("brown", [0x8c, 0x56, 0x4b]),
    ("pink", [0xe3, 0x77, 0xc2]),
    ("gray", [0x7f, 0x7f, 0x7f]),
    ("olive", [0xbc, 0xbd, 0x22]),
    ("cyan", [0x17, 0xbe, 0xcf]),
];

/// Matplotlib single-letter base colours
const BASE: [(&str, [u8; 3]); 8] = [
    ("b", [0, 0, 255]),
    ("g", [0, 128, 0]),
    ("r", [255, 0, 0]),
    ("c", [0, 191, 191]),
    ("m", [191, 0, 191]),
    ("y", [191, 191, 0]),
    ("k", [0, 0, 0]),
    ("w", [255, 255, 255]),
];

/// CSS4 named colours (sorted for binary search)
const CSS4: [(&str, [u8; 3]); 148] = [
    ("aliceblue", [240, 248, 255]),
    ("antiquewhite", [250, 235, 215]),
    ("aqua", [0, 255, 255]),
    ("aquamarine", [127, 255, 212]),
    ("azure", [240, 255, 255]),
    ("beige", [245, 245, 220]),
    ("bisque", [255, 228, 196]),
    ("black", [0, 0, 0]),
    ("blanchedalmond", [255, 235, 205]),
    ("blue", [0, 0, 255]),
    ("blueviolet", [138, 43, 226]),
    ("brown", [165, 42, 42]),
    ("burlywood", [222, 184, 135]),
    ("cadetblue", [95, 158, 160]),
    ("chartreuse", [127, 255, 0]),
    ("chocolate", [210, 105, 30]),
    ("coral", [255, 127, 80]),
    ("cornflowerblue", [100, 149, 237]),
    ("cornsilk", [255, 248, 220]),
    ("crimson", [220, 20, 60]),
    ("cyan", [0, 255, 255]),
    ("darkblue", [0, 0, 139]),
    ("darkcyan", [0, 139, 139]),
    ("darkgoldenrod", [184, 134, 11]),
    ("darkgray", [169, 169, 169]),
    ("darkgreen", [0, 100, 0]),
    ("darkgrey", [169, 169, 169]),
    ("darkkhaki", [189, 183, 107]),
    ("darkmagenta", [139, 0, 139]),
    ("darkolivegreen", [85, 107, 47]),
    ("darkorange", [255, 140, 0]),
    ("darkorchid", [153, 50, 204]),
    ("darkred", [139, 0, 0]),
    ("darksalmon", [233, 150, 122]),
    ("darkseagreen", [143, 188, 143]),
    ("darkslateblue", [72, 61, 139]),
    ("darkslategray", [47, 79, 79]),
    ("darkslategrey", [47, 79, 79]),
    ("darkturquoise", [0, 206, 209]),
    ("darkviolet", [148, 0, 211]),
    ("deeppink", [255, 20, 147]),
    ("deepskyblue", [0, 191, 255]),
    ("dimgray", [105, 105, 105]),
    ("dimgrey", [105, 105, 105]),
    ("dodgerblue", [30, 144, 255]),
    ("firebrick", [178, 34, 34]),
    ("floralwhite", [255, 250, 240]),
    ("forestgreen", [34, 139, 34]),
    ("fuchsia", [255, 0, 255]),
    ("gainsboro", [220, 220, 220]),
    ("ghostwhite", [248, 248, 255]),
    ("gold", [255, 215, 0]),
    ("goldenrod", [218, 165, 32]),
    ("gray", [128, 128, 128]),
    ("green", [0, 128, 0]),
    ("greenyellow", [173, 255, 47]),
    ("grey", [128, 128, 128]),
    ("honeydew", [240, 255, 240]),
    ("hotpink", [255, 105, 180]),
    ("indianred", [205, 92, 92]),
    ("indigo", [75, 0, 130]),
    ("ivory", [255, 255, 240]),
    ("khaki", [240, 230, 140]),
    ("lavender", [230, 230, 250]),
    ("lavenderblush", [255, 240, 245]),
    ("lawngreen", [124, 252, 0]),
    ("lemonchiffon", [255, 250, 205]),
    ("lightblue", [173, 216, 230]),
    ("lightcoral", [240, 128, 128]),
    ("lightcyan", [224, 255, 255]),
    ("lightgoldenrodyellow", [250, 250, 210]),
    ("lightgray", [211, 211, 211]),
    ("lightgreen", [144, 238, 144]),
    ("lightgrey", [211, 211, 211]),
    ("lightpink", [255, 182, 193]),
    ("lightsalmon", [255, 160, 122]),
    ("lightseagreen", [32, 178, 170]),
    ("lightskyblue", [135, 206, 250]),
    ("lightslategray", [119, 136, 153]),
    ("lightslategrey", [119, 136, 153]),
    ("lightsteelblue", [176, 196, 222]),
    ("lightyellow", [255, 255, 224]),
    ("lime", [0, 255, 0]),
    ("limegreen", [50, 205, 50]),
    ("linen", [250, 240, 230]),
    ("magenta", [255, 0, 255]),
    ("maroon", [128, 0, 0]),
    ("mediumaquamarine", [102, 205, 170]),
    ("mediumblue", [0, 0, 205]),
    ("mediumorchid", [186, 85, 211]),
    ("mediumpurple", [147, 112, 219]),
    ("mediumseagreen", [60, 179, 113]),
    ("mediumslateblue", [123, 104, 238]),
    ("mediumspringgreen", [0, 250, 154]),
    ("mediumturquoise", [72, 209, 204]),
    ("mediumvioletred", [199, 21, 133]),
    ("midnightblue", [25, 25, 112]),
    ("mintcream", [245, 255, 250]),
    ("mistyrose", [255, 228, 225]),
    ("moccasin", [255, 228, 181]),
    ("navajowhite", [255, 222, 173]),
    ("navy", [0, 0, 128]),
    ("oldlace", [253, 245, 230]),
    ("olive", [128, 128, 0]),
    ("olivedrab", [107, 142, 35]),
    ("orange", [255, 165, 0]),
    ("orangered", [255, 69, 0]),
    ("orchid", [218, 112, 214]),
    ("palegoldenrod", [238, 232, 170]),
    ("palegreen", [152, 251, 152]),
    ("paleturquoise", [175, 238, 238]),
    ("palevioletred", [219, 112, 147]),
    ("papayawhip", [255, 239, 213]),
    ("peachpuff", [255, 218, 185]),
    ("peru", [205, 133, 63]),
    ("pink", [255, 192, 203]),
    ("plum", [221, 160, 221]),
    ("powderblue", [176, 224, 230]),
    ("purple", [128, 0, 128]),
    ("rebeccapurple", [102, 51, 153]),
    ("red", [255, 0, 0]),
    ("rosybrown", [188, 143, 143]),
    ("royalblue", [65, 105, 225]),
    ("saddlebrown", [139, 69, 19]),
    ("salmon", [250, 128, 114]),
    ("sandybrown", [244, 164, 96]),
    ("seagreen", [46, 139, 87]),
    ("seashell", [255, 245, 238]),
    ("sienna", [160, 82, 45]),
    ("silver", [192, 192, 192]),
    ("skyblue", [135, 206, 235]),
    ("slateblue", [106, 90, 205]),
    ("slategray", [112, 128, 144]),
    ("slategrey", [112, 128, 144]),
    ("snow", [255, 250, 250]),
    ("springgreen", [0, 255, 127]),
    ("steelblue", [70, 130, 180]),
    ("tan", [210, 180, 140]),
    ("teal", [0, 128, 128]),
    ("thistle", [216, 191, 216]),
    ("tomato", [255, 99, 71]),
    ("turquoise", [64, 224, 208]),
    ("violet", [238, 130, 238]),
    ("wheat", [245, 222, 179]),
    ("white", [255, 255, 255]),
    ("whitesmoke", [245, 245, 245]),
    ("yellow", [255, 255, 0]),
    ("yellowgreen", [154, 205, 50]),
];

/// Resolve a colour string to RGB
///
/// Names are matched case-insensitively; matplotlib's single letters and `C0`..`C9`
/// are case-sensitive there, so `C` is accepted in upper case only.
pub fn parse_colour(text: &str) -> Result<[u8; 3]> {
    let trimmed = text.trim();
    let invalid = || PlotError::InvalidColor(text.to_string());

    if let Some(hex) = trimmed.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(invalid);
    }

    if let Some(idx) = trimmed.strip_prefix('C') {
        if let Ok(i) = idx.parse::<usize>() {
            return Ok(TABLEAU[i % TABLEAU.len()].1);
        }
    }

    if let Some((_, rgb)) = BASE.iter().find(|(name, _)| *name == trimmed) {
        return Ok(*rgb);
    }

    let lower = trimmed.to_ascii_lowercase();

    if let Some(tab) = lower.strip_prefix("tab:") {
        let tab = if tab == "grey" { "gray" } else { tab };
        return TABLEAU
            .iter()
            .find(|(name, _)| *name == tab)
            .map(|(_, rgb)| *rgb)
            .ok_or_else(invalid);
    }

    // "sky blue" matches "skyblue"
    let compact: String = lower.chars().filter(|c| !c.is_whitespace()).collect();
    CSS4.binary_search_by(|(name, _)| name.cmp(&compact.as_str()))
        .map(|pos| CSS4[pos].1)
        .map_err(|_| invalid())
}

fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    let bytes = hex.as_bytes();
    let digit = |b: u8| (b as char).to_digit(16).map(|d| d as u8);
    match bytes.len() {
        3 => Some([
            digit(bytes[0])? * 17,
            digit(bytes[1])? * 17,
            digit(bytes[2])? * 17,
        ]),
        6 => Some([
            digit(bytes[0])? << 4 | digit(bytes[1])?,
            digit(bytes[2])? << 4 | digit(bytes[3])?,
            digit(bytes[4])? << 4 | digit(bytes[5])?,
        ]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_table_sorted() {
        assert!(CSS4.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_default_colours() {
        assert_eq!(parse_colour("skyblue").unwrap(), [135, 206, 235]);
        assert_eq!(parse_colour("orange").unwrap(), [255, 165, 0]);
        assert_eq!(parse_colour("SkyBlue").unwrap(), [135, 206, 235]);
        assert_eq!(parse_colour("sky blue").unwrap(), [135, 206, 235]);
    }

    #[test]
    fn test_matplotlib_shorthands() {
        assert_eq!(parse_colour("k").unwrap(), [0, 0, 0]);
        assert_eq!(parse_colour("C1").unwrap(), [0xff, 0x7f, 0x0e]);
        assert_eq!(parse_colour("tab:blue").unwrap(), [0x1f, 0x77, 0xb4]);
        assert_eq!(parse_colour("tab:grey").unwrap(), [0x7f, 0x7f, 0x7f]);
    }

    #[test]
    fn test_hex() {
        assert_eq!(parse_colour("#ff8000").unwrap(), [255, 128, 0]);
        assert_eq!(parse_colour("#fff").unwrap(), [255, 255, 255]);
        assert!(parse_colour("#ff80").is_err());
        assert!(parse_colour("#gggggg").is_err());
    }

    #[test]
    fn test_unknown_colour() {
        match parse_colour("not-a-colour") {
            Err(PlotError::InvalidColor(name)) => assert_eq!(name, "not-a-colour"),
            other => panic!("expected InvalidColor, got {:?}", other),
        }
        assert!(parse_colour("tab:mauve").is_err());
    }
}
