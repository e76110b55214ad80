use crate::fonts;
use crate::input::InputEvent;
use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, Point},
};
use u8g2_fonts::{
    Font, FontRenderer,
    types::{FontColor, HorizontalAlignment, VerticalPosition},
};

pub mod text;

pub use text::{Header, ScreenStyle, TextPage};

/// Trait for anything that can fill the display: text, QR codes, dialogs
pub trait Page {
    /// Draw the page content to the display
    fn draw<D: DrawTarget<Color = BinaryColor>>(&mut self, display: &mut D) -> Result<(), D::Error>;

    /// Handle an input event.
    /// Returns `true` if the event changed what the page shows.
    fn handle_event(&mut self, _event: InputEvent) -> bool {
        false
    }

    /// Clear the display and draw the page (convenience method)
    fn show<D: DrawTarget<Color = BinaryColor>>(&mut self, display: &mut D) -> Result<(), D::Error> {
        display.clear(crate::constants::BG)?;
        self.draw(display)
    }

    /// Plain-text description of what is on screen, for hosts and tests
    fn read_content(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Header glyphs, drawn left of the title
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Icon {
    Send,
    Receive,
    Warning,
    Success,
    Fail,
    Config,
}

impl Icon {
    fn glyph(self) -> char {
        match self {
            Self::Send => 'M',
            Self::Receive => 'P',
            Self::Warning => 'G',
            Self::Success => 'A',
            Self::Fail | Self::Config => 'B',
        }
    }

    pub(crate) fn draw<D: DrawTarget<Color = BinaryColor>>(
        self,
        position: Point,
        color: BinaryColor,
        display: &mut D,
    ) -> Result<(), D::Error> {
        let mut buf = [0u8; 4];
        let glyph = self.glyph().encode_utf8(&mut buf);
        match self {
            Self::Send | Self::Receive => {
                render_str::<fonts::ICON_ARROW, D>(glyph, position, color, display)
            }
            Self::Warning | Self::Config => {
                render_str::<fonts::ICON_EMBEDDED, D>(glyph, position, color, display)
            }
            Self::Success | Self::Fail => {
                render_str::<fonts::ICON_CHECK, D>(glyph, position, color, display)
            }
        }
    }
}

/// Render `text` with its top-left corner at `position`.
///
/// Glyphs missing from the font are logged and skipped; only display errors
/// are returned.
pub(crate) fn render_str<F: Font, D: DrawTarget<Color = BinaryColor>>(
    text: &str,
    position: Point,
    color: BinaryColor,
    display: &mut D,
) -> Result<(), D::Error> {
    render_aligned::<F, D>(
        text,
        position,
        VerticalPosition::Top,
        HorizontalAlignment::Left,
        color,
        display,
    )
}

pub(crate) fn render_aligned<F: Font, D: DrawTarget<Color = BinaryColor>>(
    text: &str,
    position: Point,
    vertical: VerticalPosition,
    horizontal: HorizontalAlignment,
    color: BinaryColor,
    display: &mut D,
) -> Result<(), D::Error> {
    match FontRenderer::new::<F>().render_aligned(
        text,
        position,
        vertical,
        horizontal,
        FontColor::Transparent(color),
        display,
    ) {
        Ok(_) => Ok(()),
        Err(u8g2_fonts::Error::DisplayError(e)) => Err(e),
        Err(_) => {
            log::warn!("cannot render {text:?} with the selected font");
            Ok(())
        }
    }
}
