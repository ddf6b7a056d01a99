//! Code 128 linear barcode encoding.
//!
//! Subset B covers printable ASCII. Text made only of digits is packed two
//! digits per symbol with subset C, switching to B for an odd trailing digit.

use image::GrayImage;

use super::raster;
use crate::error::CodeError;

/// Light modules on each side of the symbol.
pub const QUIET_ZONE: usize = 10;

const START_B: usize = 104;
const START_C: usize = 105;
const CODE_B: usize = 100;
const CHECKSUM_MODULUS: usize = 103;

/// Bar/space patterns for symbol values 0..=105, 11 modules each, MSB first.
#[allow(clippy::unreadable_literal)]
const PATTERNS: [u16; 106] = [
    0b11011001100, 0b11001101100, 0b11001100110, 0b10010011000, 0b10010001100, 0b10001001100,
    0b10011001000, 0b10011000100, 0b10001100100, 0b11001001000, 0b11001000100, 0b11000100100,
    0b10110011100, 0b10011011100, 0b10011001110, 0b10111001100, 0b10011101100, 0b10011100110,
    0b11001110010, 0b11001011100, 0b11001001110, 0b11011100100, 0b11001110100, 0b11101101110,
    0b11101001100, 0b11100101100, 0b11100100110, 0b11101100100, 0b11100110100, 0b11100110010,
    0b11011011000, 0b11011000110, 0b11000110110, 0b10100011000, 0b10001011000, 0b10001000110,
    0b10110001000, 0b10001101000, 0b10001100010, 0b11010001000, 0b11000101000, 0b11000100010,
    0b10110111000, 0b10110001110, 0b10001101110, 0b10111011000, 0b10111000110, 0b10001110110,
    0b11101110110, 0b11010001110, 0b11000101110, 0b11011101000, 0b11011100010, 0b11011101110,
    0b11101011000, 0b11101000110, 0b11100010110, 0b11101101000, 0b11101100010, 0b11100011010,
    0b11101111010, 0b11001000010, 0b11110001010, 0b10100110000, 0b10100001100, 0b10010110000,
    0b10010000110, 0b10000101100, 0b10000100110, 0b10110010000, 0b10110000100, 0b10011010000,
    0b10011000010, 0b10000110100, 0b10000110010, 0b11000010010, 0b11001010000, 0b11110111010,
    0b11000010100, 0b10001111010, 0b10100111100, 0b10010111100, 0b10010011110, 0b10111100100,
    0b10011110100, 0b10011110010, 0b11110100100, 0b11110010100, 0b11110010010, 0b11011011110,
    0b11011110110, 0b11110110110, 0b10101111000, 0b10100011110, 0b10001011110, 0b10111101000,
    0b10111100010, 0b11110101000, 0b11110100010, 0b10111011110, 0b10111101110, 0b11101011110,
    0b11110101110, 0b11010000100, 0b11010010000, 0b11010011100,
];

/// Stop pattern including the final bar, 13 modules.
#[allow(clippy::unreadable_literal)]
const STOP: u16 = 0b1100011101011;

/// Symbol values for `text`: start code, data and checksum.
///
/// # Errors
///
/// Returns [`CodeError::Validation`] for empty text or characters outside
/// printable ASCII.
pub(crate) fn symbol_values(text: &str) -> Result<Vec<usize>, CodeError> {
    if text.is_empty() {
        return Err(CodeError::Validation("text is required".to_string()));
    }
    if let Some(bad) = text.chars().find(|c| !(' '..='~').contains(c)) {
        return Err(CodeError::Validation(format!(
            "unsupported character {bad:?} for Code 128 barcode (printable ASCII only)"
        )));
    }

    let bytes = text.as_bytes();
    let mut values = Vec::with_capacity(bytes.len() + 3);
    if bytes.len() >= 2 && bytes.iter().all(u8::is_ascii_digit) {
        values.push(START_C);
        let mut pairs = bytes.chunks_exact(2);
        for pair in &mut pairs {
            values.push(usize::from(pair[0] - b'0') * 10 + usize::from(pair[1] - b'0'));
        }
        if let [last] = pairs.remainder() {
            values.push(CODE_B);
            values.push(usize::from(last - b' '));
        }
    } else {
        values.push(START_B);
        values.extend(bytes.iter().map(|b| usize::from(b - b' ')));
    }

    // The start code is weighted 1, like the first data symbol.
    let weighted: usize = values.iter().enumerate().map(|(i, v)| v * i.max(1)).sum();
    values.push(weighted % CHECKSUM_MODULUS);
    Ok(values)
}

/// Expand symbol values into modules (`true` = bar), quiet zones included.
pub(crate) fn modules(values: &[usize]) -> Vec<bool> {
    let mut out = Vec::with_capacity(2 * QUIET_ZONE + 11 * values.len() + 13);
    out.resize(QUIET_ZONE, false);
    for &value in values {
        push_bits(&mut out, PATTERNS[value], 11);
    }
    push_bits(&mut out, STOP, 13);
    out.resize(out.len() + QUIET_ZONE, false);
    out
}

fn push_bits(out: &mut Vec<bool>, pattern: u16, len: u32) {
    out.extend((0..len).rev().map(|bit| (pattern >> bit) & 1 == 1));
}

/// Encode `text` and draw it `width` pixels wide and half as tall.
///
/// # Errors
///
/// Returns [`CodeError::Validation`] if the text cannot be encoded.
pub(crate) fn render(text: &str, width: u32) -> Result<GrayImage, CodeError> {
    let bars = modules(&symbol_values(text)?);
    let count = u32::try_from(bars.len())
        .map_err(|_| CodeError::Validation("text is too long for a barcode".to_string()))?;
    if count > width {
        tracing::warn!(
            modules = count,
            width,
            "barcode has more modules than pixels; bars will be dropped and it will not scan"
        );
    }
    Ok(raster::rasterize(width, width / 2, count, 1, |col, _| bars[col as usize]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_are_well_formed() {
        for (value, pattern) in PATTERNS.iter().enumerate() {
            let bits: Vec<bool> = (0..11).rev().map(|b| (pattern >> b) & 1 == 1).collect();
            assert!(bits[0], "value {value} must start with a bar");
            assert!(!bits[10], "value {value} must end with a space");
            let bar_modules = bits.iter().filter(|b| **b).count();
            assert_eq!(bar_modules % 2, 0, "value {value} bar width parity");
            let bars = bits.windows(2).filter(|w| w[0] && !w[1]).count();
            assert_eq!(bars, 3, "value {value} must have three bars");
        }
    }

    /// Published Code 128 bar/space widths for values 0..=105.
    const REFERENCE_WIDTHS: [&str; 106] = [
        "212222", "222122", "222221", "121223", "121322", "131222", "122213", "122312", "132212",
        "221213", "221312", "231212", "112232", "122132", "122231", "113222", "123122", "123221",
        "223211", "221132", "221231", "213212", "223112", "312131", "311222", "321122", "321221",
        "312212", "322112", "322211", "212123", "212321", "232121", "111323", "131123", "131321",
        "112313", "132113", "132311", "211313", "231113", "231311", "112133", "112331", "132131",
        "113123", "113321", "133121", "313121", "211331", "231131", "213113", "213311", "213131",
        "311123", "311321", "331121", "312113", "312311", "332111", "314111", "221411", "431111",
        "111224", "111422", "121124", "121421", "141122", "141221", "112214", "112412", "122114",
        "122411", "142112", "142211", "241211", "221114", "413111", "241112", "134111", "111242",
        "121142", "121241", "114212", "124112", "124211", "411212", "421112", "421211", "212141",
        "214121", "412121", "111143", "111341", "131141", "114113", "114311", "411113", "411311",
        "113141", "114131", "311141", "411131", "211412", "211214", "211232",
    ];

    /// Expand alternating bar/space widths into modules, bar first.
    fn widths_to_bits(widths: &str) -> Vec<bool> {
        widths
            .bytes()
            .enumerate()
            .flat_map(|(i, w)| std::iter::repeat_n(i % 2 == 0, usize::from(w - b'0')))
            .collect()
    }

    fn pattern_bits(pattern: u16, len: u32) -> Vec<bool> {
        let mut out = Vec::new();
        push_bits(&mut out, pattern, len);
        out
    }

    #[test]
    fn patterns_match_reference_widths() {
        for (value, widths) in REFERENCE_WIDTHS.iter().enumerate() {
            assert_eq!(pattern_bits(PATTERNS[value], 11), widths_to_bits(widths), "value {value}");
        }
        assert_eq!(pattern_bits(STOP, 13), widths_to_bits("2331112"));
    }

    #[test]
    fn encoded_symbol_matches_reference() {
        // Start B, 'A' (33), 'B' (34), checksum (104 + 33 + 68) % 103 = 102, stop.
        let mut expected = vec![false; QUIET_ZONE];
        for widths in ["211214", "111323", "131123", "411131", "2331112"] {
            expected.extend(widths_to_bits(widths));
        }
        expected.extend(vec![false; QUIET_ZONE]);
        assert_eq!(modules(&symbol_values("AB").unwrap()), expected);
    }

    #[test]
    fn empty_text_is_rejected() {
        assert_eq!(
            symbol_values("").unwrap_err(),
            CodeError::Validation("text is required".to_string())
        );
    }

    #[test]
    fn non_ascii_is_rejected() {
        let err = symbol_values("caf\u{e9}").unwrap_err();
        assert!(matches!(err, CodeError::Validation(ref m) if m.contains("unsupported character")));
        assert!(symbol_values("tab\there").is_err());
    }

    #[test]
    fn subset_b_values_and_checksum() {
        // 104 + 48 + 42*2 + 42*3 + 17*4 + 18*5 + 19*6 + 35*7 = 879, 879 % 103 = 55
        let values = symbol_values("PJJ123C").unwrap();
        assert_eq!(values, vec![START_B, 48, 42, 42, 17, 18, 19, 35, 55]);
    }

    #[test]
    fn even_digits_use_subset_c() {
        let values = symbol_values("1234").unwrap();
        // 105 + 12*1 + 34*2 = 185, 185 % 103 = 82
        assert_eq!(values, vec![START_C, 12, 34, 82]);
    }

    #[test]
    fn odd_digits_switch_to_b_for_the_tail() {
        let values = symbol_values("12345").unwrap();
        // 105 + 12 + 34*2 + 100*3 + 21*4 = 569, 569 % 103 = 54
        assert_eq!(values, vec![START_C, 12, 34, CODE_B, 21, 54]);
    }

    #[test]
    fn single_digit_stays_in_subset_b() {
        let values = symbol_values("7").unwrap();
        assert_eq!(values[0], START_B);
        assert_eq!(values[1], 23);
    }

    #[test]
    fn module_layout() {
        let values = symbol_values("AB").unwrap();
        let bars = modules(&values);
        assert_eq!(bars.len(), 2 * QUIET_ZONE + 11 * values.len() + 13);
        assert!(bars[..QUIET_ZONE].iter().all(|b| !b));
        assert!(bars[bars.len() - QUIET_ZONE..].iter().all(|b| !b));
        assert!(bars[QUIET_ZONE]);
        // Stop pattern ends with a two-module bar.
        assert!(bars[bars.len() - QUIET_ZONE - 1]);
        assert!(bars[bars.len() - QUIET_ZONE - 2]);
    }

    #[test]
    fn narrow_canvas_keeps_exact_size() {
        // 99 modules into 64 px: sampled, so still exactly the requested size.
        assert_eq!(modules(&symbol_values("12345").unwrap()).len(), 99);
        let img = render("12345", 64).unwrap();
        assert_eq!(img.dimensions(), (64, 32));
    }

    #[test]
    fn render_has_requested_width() {
        let img = render("12345", 256).unwrap();
        assert_eq!(img.dimensions(), (256, 128));
        assert!(img.pixels().any(|p| p.0[0] == 0));
    }
}
