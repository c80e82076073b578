//! Static font-metric tables for the two document typefaces.
//!
//! Widths are in em units (relative to font size). CJK ideographs, kana and
//! full-width forms are square, so only the proportional Latin range needs a
//! table. These are approximations of Yu Mincho / Yu Gothic; the simulated
//! renderer only needs them to decide line breaks, not to typeset.
//! ASCII tables cover 0x20..=0x7E (95 printable characters). Index = (char as usize) - 32.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Font family enum
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    /// Serif (明朝体): the conventional résumé face.
    Mincho,
    /// Sans-serif (ゴシック体).
    Gothic,
}

impl FromStr for FontFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mincho" => Ok(FontFamily::Mincho),
            "gothic" => Ok(FontFamily::Gothic),
            other => Err(format!("unknown layout font '{other}' (expected mincho or gothic)")),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

/// Typesetting parameters for an A4 document page, in millimetres.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    pub font: FontFamily,
    pub font_size_pt: f32,
    pub margin_left_mm: f32,
    pub margin_right_mm: f32,
    pub line_height_mm: f32,
    /// Height of one fixed résumé table row.
    pub table_row_mm: f32,
    pub section_title_mm: f32,
    /// Vertical padding around a block (career block, text box).
    pub block_padding_mm: f32,
}

pub const PT_PER_MM: f32 = 72.0 / 25.4;

impl PageConfig {
    pub fn font_size_mm(&self) -> f32 {
        self.font_size_pt / PT_PER_MM
    }

    /// Usable text width in em units.
    pub fn text_width_em(&self, page_width_mm: f32) -> f32 {
        (page_width_mm - self.margin_left_mm - self.margin_right_mm) / self.font_size_mm()
    }
}

/// A4, 10pt body text, 20mm side margins: about 48em per line.
pub fn default_page_config(font: FontFamily) -> PageConfig {
    PageConfig {
        font,
        font_size_pt: 10.0,
        margin_left_mm: 20.0,
        margin_right_mm: 20.0,
        line_height_mm: 5.0,
        table_row_mm: 7.5,
        section_title_mm: 8.0,
        block_padding_mm: 4.0,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

pub struct FontMetricTable {
    pub font: FontFamily,
    widths: [f32; 95],
    /// Fallback for characters that are neither ASCII nor full-width.
    pub average_char_width: f32,
}

impl FontMetricTable {
    pub fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else if is_half_width_form(c) {
            0.5
        } else if is_full_width(c) {
            1.0
        } else {
            self.average_char_width
        }
    }

    /// Rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    /// Printed lines for `s` at `max_width_em`.
    ///
    /// Japanese text breaks between any two characters, so this wraps greedily
    /// per character. Each `\n` starts a new line; an empty string is one line.
    pub fn wrapped_lines(&self, s: &str, max_width_em: f32) -> u16 {
        s.split('\n')
            .map(|paragraph| {
                let mut lines = 1u16;
                let mut current = 0.0_f32;
                for c in paragraph.chars() {
                    let w = self.char_width(c);
                    if current > 0.0 && current + w > max_width_em {
                        lines = lines.saturating_add(1);
                        current = w;
                    } else {
                        current += w;
                    }
                }
                lines
            })
            .fold(0u16, |acc, n| acc.saturating_add(n))
    }
}

/// Halfwidth katakana and halfwidth Hangul forms.
fn is_half_width_form(c: char) -> bool {
    matches!(c as u32, 0xFF61..=0xFFDC | 0xFFE8..=0xFFEE)
}

/// CJK ideographs, kana, CJK punctuation, full-width forms and the usual
/// document symbols (■, ①, ～) that Japanese fonts draw square.
fn is_full_width(c: char) -> bool {
    matches!(
        c as u32,
        0x1100..=0x115F
            | 0x2460..=0x24FF
            | 0x25A0..=0x25FF
            | 0x2E80..=0x303E
            | 0x3041..=0x33FF
            | 0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xA960..=0xA97F
            | 0xAC00..=0xD7A3
            | 0xF900..=0xFAFF
            | 0xFE30..=0xFE4F
            | 0xFF00..=0xFF60
            | 0xFFE0..=0xFFE6
            | 0x20000..=0x3FFFD
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

/// Mincho: proportional serif Latin glyphs.
static MINCHO_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::Mincho,
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.25, 0.33, 0.41, 0.50, 0.50, 0.83, 0.78, 0.18, 0.33, 0.33, 0.50, 0.56, 0.25, 0.33, 0.25, 0.28,
        // 0     1     2     3     4     5     6     7     8     9
        0.50, 0.50, 0.50, 0.50, 0.50, 0.50, 0.50, 0.50, 0.50, 0.50,
        // :     ;     <     =     >     ?     @
        0.28, 0.28, 0.56, 0.56, 0.56, 0.44, 0.92,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.72, 0.67, 0.67, 0.72, 0.61, 0.56, 0.72, 0.72, 0.33, 0.39, 0.72, 0.61, 0.89,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.72, 0.72, 0.56, 0.72, 0.67, 0.56, 0.61, 0.72, 0.72, 0.94, 0.72, 0.72, 0.61,
        // [     \     ]     ^     _     `
        0.33, 0.28, 0.33, 0.47, 0.50, 0.33,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.44, 0.50, 0.44, 0.50, 0.44, 0.33, 0.50, 0.50, 0.28, 0.28, 0.50, 0.28, 0.78,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.50, 0.50, 0.50, 0.50, 0.33, 0.39, 0.28, 0.50, 0.50, 0.72, 0.50, 0.50, 0.44,
        // {     |     }     ~
        0.48, 0.20, 0.48, 0.54,
    ],
    average_char_width: 0.55,
};

/// Gothic: proportional sans-serif Latin glyphs, slightly wider than Mincho.
static GOTHIC_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::Gothic,
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.28, 0.30, 0.42, 0.58, 0.58, 0.90, 0.70, 0.22, 0.34, 0.34, 0.42, 0.60, 0.27, 0.36, 0.27, 0.36,
        // 0     1     2     3     4     5     6     7     8     9
        0.58, 0.58, 0.58, 0.58, 0.58, 0.58, 0.58, 0.58, 0.58, 0.58,
        // :     ;     <     =     >     ?     @
        0.27, 0.27, 0.60, 0.60, 0.60, 0.50, 0.98,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.68, 0.64, 0.68, 0.72, 0.58, 0.55, 0.72, 0.72, 0.28, 0.48, 0.64, 0.54, 0.86,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.72, 0.76, 0.62, 0.76, 0.64, 0.60, 0.58, 0.70, 0.66, 0.94, 0.64, 0.62, 0.60,
        // [     \     ]     ^     _     `
        0.34, 0.36, 0.34, 0.56, 0.50, 0.40,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.54, 0.60, 0.52, 0.60, 0.56, 0.34, 0.58, 0.58, 0.25, 0.26, 0.52, 0.25, 0.88,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.58, 0.60, 0.60, 0.60, 0.38, 0.48, 0.36, 0.58, 0.52, 0.78, 0.52, 0.52, 0.48,
        // {     |     }     ~
        0.36, 0.26, 0.36, 0.60,
    ],
    average_char_width: 0.60,
};

/// Returns the static metric table for a given font family.
pub fn get_metrics(font: &FontFamily) -> &'static FontMetricTable {
    match font {
        FontFamily::Mincho => &MINCHO_TABLE,
        FontFamily::Gothic => &GOTHIC_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
