//! Geometry of the 128x64 two-button display
//!
//! The text area spans the full display width below the header and above the
//! button row. Vertical positions inside the text area are counted in half
//! lines so that half-height gaps can be budgeted exactly.

use embedded_graphics::pixelcolor::BinaryColor;

/// Display width in pixels
pub const WIDTH: u32 = 128;

/// Display height in pixels
pub const HEIGHT: u32 = 64;

/// Lit pixel (OLED)
pub const FG: BinaryColor = BinaryColor::On;

/// Unlit pixel
pub const BG: BinaryColor = BinaryColor::Off;

pub const TEXT_HEADER_HEIGHT: u32 = 11;
pub const TEXT_LINE_HEIGHT: u32 = 10;
pub const TEXT_LINE_HEIGHT_HALF: u32 = TEXT_LINE_HEIGHT / 2;
pub const TEXT_MARGIN_LEFT: u32 = 0;

/// Rows below a line's top that its glyphs may light, descenders included
pub const TEXT_GLYPH_HEIGHT: u32 = 12;

/// Maximum number of full text lines below the header
pub const TEXT_MAX_LINES: usize = 4;

/// Screens without a header get the header's row as one more line
pub const TEXT_MAX_LINES_NO_HEADER: usize = TEXT_MAX_LINES + 1;

/// Glyph advance of the proportional fonts (regular and bold)
pub const NORMAL_ADVANCE: u32 = 6;
pub const BOLD_ADVANCE: u32 = 6;

/// Glyph advance of the monospace font
pub const MONO_ADVANCE: u32 = 7;

/// Monospace characters that fit on one line (addresses)
pub const MONO_CHARS_PER_LINE: usize = (WIDTH / MONO_ADVANCE) as usize;

/// Hex characters that fit on one line
pub const MONO_HEX_PER_LINE: usize = (WIDTH / MONO_ADVANCE) as usize;

/// Addresses shorter than this are drawn at double magnification
pub const QR_SIZE_THRESHOLD: usize = 42;

pub const BUTTON_HEIGHT: u32 = 11;

/// Rows above the button row, shared by text and QR symbols
pub const CONTENT_HEIGHT: u32 = HEIGHT - BUTTON_HEIGHT;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_text_row_clears_buttons() {
        let pitch = TEXT_LINE_HEIGHT as usize;
        let with_header = TEXT_HEADER_HEIGHT as usize + (TEXT_MAX_LINES - 1) * pitch;
        let without_header = (TEXT_MAX_LINES_NO_HEADER - 1) * pitch;
        for top in [with_header, without_header] {
            assert!(top + TEXT_GLYPH_HEIGHT as usize <= CONTENT_HEIGHT as usize);
        }
    }
}
