//! The fourteen standard PDF fonts and WinAnsi encoding.
//!
//! [PDF 32000-1:2008 § 9.6.2.2 Standard Type 1 fonts]
//!
//! The Base14 fonts need no embedding; they carry WinAnsiEncoding and are
//! the fallback whenever no registered face resolves (and the text stays
//! inside the WinAnsi repertoire).

use vellum_style::FontStyle;

/// One of the fourteen standard fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Base14 {
    /// Helvetica (regular).
    Helvetica,
    /// Helvetica-Bold.
    HelveticaBold,
    /// Helvetica-Oblique.
    HelveticaOblique,
    /// Helvetica-BoldOblique.
    HelveticaBoldOblique,
    /// Times-Roman.
    TimesRoman,
    /// Times-Bold.
    TimesBold,
    /// Times-Italic.
    TimesItalic,
    /// Times-BoldItalic.
    TimesBoldItalic,
    /// Courier (regular).
    Courier,
    /// Courier-Bold.
    CourierBold,
    /// Courier-Oblique.
    CourierOblique,
    /// Courier-BoldOblique.
    CourierBoldOblique,
    /// Symbol.
    Symbol,
    /// ZapfDingbats.
    ZapfDingbats,
}

impl Base14 {
    /// The PDF BaseFont name.
    #[must_use]
    pub const fn base_name(&self) -> &'static str {
        match self {
            Base14::Helvetica => "Helvetica",
            Base14::HelveticaBold => "Helvetica-Bold",
            Base14::HelveticaOblique => "Helvetica-Oblique",
            Base14::HelveticaBoldOblique => "Helvetica-BoldOblique",
            Base14::TimesRoman => "Times-Roman",
            Base14::TimesBold => "Times-Bold",
            Base14::TimesItalic => "Times-Italic",
            Base14::TimesBoldItalic => "Times-BoldItalic",
            Base14::Courier => "Courier",
            Base14::CourierBold => "Courier-Bold",
            Base14::CourierOblique => "Courier-Oblique",
            Base14::CourierBoldOblique => "Courier-BoldOblique",
            Base14::Symbol => "Symbol",
            Base14::ZapfDingbats => "ZapfDingbats",
        }
    }

    /// Pick the standard font for a family/weight/style triple.
    ///
    /// Serif-ish families map to Times, monospace to Courier, everything
    /// else to Helvetica; weight ≥ 700 selects the bold variant and a
    /// slanted style the oblique/italic one.
    #[must_use]
    pub fn select(family: &str, weight: u16, style: FontStyle) -> Base14 {
        let lower = family.to_ascii_lowercase();
        let bold = weight >= 700;
        let slanted = style.is_slanted();

        if lower.contains("courier") || lower.contains("mono") {
            return match (bold, slanted) {
                (true, true) => Base14::CourierBoldOblique,
                (true, false) => Base14::CourierBold,
                (false, true) => Base14::CourierOblique,
                (false, false) => Base14::Courier,
            };
        }
        if lower.contains("times") || lower.contains("serif") && !lower.contains("sans") {
            return match (bold, slanted) {
                (true, true) => Base14::TimesBoldItalic,
                (true, false) => Base14::TimesBold,
                (false, true) => Base14::TimesItalic,
                (false, false) => Base14::TimesRoman,
            };
        }
        match (bold, slanted) {
            (true, true) => Base14::HelveticaBoldOblique,
            (true, false) => Base14::HelveticaBold,
            (false, true) => Base14::HelveticaOblique,
            (false, false) => Base14::Helvetica,
        }
    }

    /// True for the serif (Times) family.
    #[must_use]
    pub const fn is_serif(&self) -> bool {
        matches!(
            self,
            Base14::TimesRoman | Base14::TimesBold | Base14::TimesItalic | Base14::TimesBoldItalic
        )
    }
}

/// Encode a character in WinAnsiEncoding (CP-1252).
///
/// [PDF 32000-1:2008 Annex D.2]
///
/// The 0x80–0x9F range differs from Latin-1 and is mapped explicitly;
/// 0xA0–0xFF matches Latin-1; everything else is unencodable.
#[must_use]
pub fn encode_win_ansi(ch: char) -> Option<u8> {
    let cp = ch as u32;
    match cp {
        0x20..=0x7E => Some(cp as u8),
        0xA0..=0xFF => Some(cp as u8),
        _ => match ch {
            '€' => Some(0x80),
            '‚' => Some(0x82),
            'ƒ' => Some(0x83),
            '„' => Some(0x84),
            '…' => Some(0x85),
            '†' => Some(0x86),
            '‡' => Some(0x87),
            'ˆ' => Some(0x88),
            '‰' => Some(0x89),
            'Š' => Some(0x8A),
            '‹' => Some(0x8B),
            'Œ' => Some(0x8C),
            'Ž' => Some(0x8E),
            '\u{2018}' => Some(0x91),
            '\u{2019}' => Some(0x92),
            '\u{201C}' => Some(0x93),
            '\u{201D}' => Some(0x94),
            '•' => Some(0x95),
            '–' => Some(0x96),
            '—' => Some(0x97),
            '˜' => Some(0x98),
            '™' => Some(0x99),
            'š' => Some(0x9A),
            '›' => Some(0x9B),
            'œ' => Some(0x9C),
            'ž' => Some(0x9E),
            'Ÿ' => Some(0x9F),
            _ => None,
        },
    }
}

/// True when every character of `text` is WinAnsi-encodable (whitespace
/// collapses to encodable spaces and is ignored here).
#[must_use]
pub fn is_win_ansi(text: &str) -> bool {
    text.chars()
        .all(|ch| ch.is_whitespace() || encode_win_ansi(ch).is_some())
}

/// Encode a string to WinAnsi bytes, substituting `?` for unencodable
/// characters (callers route such text to an embedded face first).
#[must_use]
pub fn encode_win_ansi_lossy(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| encode_win_ansi(ch).unwrap_or(b'?'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_covers_the_three_families() {
        assert_eq!(
            Base14::select("Courier New", 400, FontStyle::Normal),
            Base14::Courier
        );
        assert_eq!(
            Base14::select("Times New Roman", 700, FontStyle::Italic),
            Base14::TimesBoldItalic
        );
        assert_eq!(
            Base14::select("Arial", 400, FontStyle::Normal),
            Base14::Helvetica
        );
    }

    #[test]
    fn win_ansi_covers_cp1252_specials() {
        assert_eq!(encode_win_ansi('A'), Some(0x41));
        assert_eq!(encode_win_ansi('é'), Some(0xE9));
        assert_eq!(encode_win_ansi('€'), Some(0x80));
        assert_eq!(encode_win_ansi('—'), Some(0x97));
        assert_eq!(encode_win_ansi('あ'), None);
    }

    #[test]
    fn cyrillic_text_is_not_win_ansi() {
        assert!(is_win_ansi("Hello, world — €5"));
        assert!(!is_win_ansi("Привет"));
    }
}
