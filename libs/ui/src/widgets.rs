use crate::constants::{BG, BUTTON_HEIGHT, FG};
use crate::fonts;
use crate::input::PhysicalButton;
use crate::pages::render_aligned;
use embedded_graphics::{
    Drawable,
    image::Image,
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle, RoundedRectangle},
};
use embedded_layout::{View, prelude::*};
use tinybmp::Bmp;
use u8g2_fonts::{
    FontRenderer,
    types::{HorizontalAlignment, VerticalPosition},
};

/// Horizontal padding around a button label
const LABEL_PADDING: u32 = 6;

/// What pressing the button means for the dialog
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ButtonRole {
    Confirm,
    Cancel,
}

impl ButtonRole {
    /// Cancel sits on the left button, confirm on the right one
    pub fn physical(self) -> PhysicalButton {
        match self {
            Self::Confirm => PhysicalButton::Right,
            Self::Cancel => PhysicalButton::Left,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ButtonLabel {
    Text(String),
    /// BMP image bytes
    Icon(&'static [u8]),
}

impl ButtonLabel {
    /// Label as shown to hosts and in logs
    pub fn describe(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Icon(_) => "<icon>".to_string(),
        }
    }
}

impl From<&str> for ButtonLabel {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for ButtonLabel {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ButtonStyle {
    /// Light background, dark label
    #[default]
    Filled,
    /// Outline only
    Outline,
    /// Heavy outline for destructive actions
    Danger,
}

#[derive(Clone, Debug)]
pub struct Button {
    pub role: ButtonRole,
    pub label: ButtonLabel,
    pub style: ButtonStyle,
    pub bounds: Rectangle,
    /// Physical button is held down
    pub armed: bool,
}

impl Button {
    #[must_use]
    pub fn new(role: ButtonRole, label: ButtonLabel, style: ButtonStyle) -> Self {
        let width = Self::measure_width(&label);
        Self {
            role,
            label,
            style,
            bounds: Rectangle::new(Point::zero(), Size::new(width, BUTTON_HEIGHT)),
            armed: false,
        }
    }

    /// Calculate button width using actual font measurement
    fn measure_width(label: &ButtonLabel) -> u32 {
        let content_width = match label {
            ButtonLabel::Text(text) => {
                let font = FontRenderer::new::<fonts::FONT_BUTTON>();
                font.get_rendered_dimensions(text.as_str(), Point::zero(), VerticalPosition::Baseline)
                    .ok()
                    .and_then(|d| d.bounding_box.map(|b| b.size.width))
                    .unwrap_or(u32::try_from(text.chars().count()).unwrap_or(u32::MAX) * 5)
            }
            ButtonLabel::Icon(bytes) => Bmp::<BinaryColor>::from_slice(bytes)
                .map(|bmp| bmp.size().width)
                .unwrap_or(BUTTON_HEIGHT),
        };
        content_width + 2 * LABEL_PADDING
    }

    pub fn physical(&self) -> PhysicalButton {
        self.role.physical()
    }

    /// Move the button into its bottom corner of `area`
    pub fn place(&mut self, area: &Rectangle) {
        match self.role {
            ButtonRole::Cancel => {
                self.align_to_mut(area, horizontal::Left, vertical::Bottom);
            }
            ButtonRole::Confirm => {
                self.align_to_mut(area, horizontal::Right, vertical::Bottom);
            }
        }
    }

    /// Filled buttons invert while held, outlined ones fill
    fn colors(&self) -> (Option<BinaryColor>, BinaryColor) {
        let filled = matches!(self.style, ButtonStyle::Filled) != self.armed;
        if filled { (Some(FG), BG) } else { (None, FG) }
    }
}

impl View for Button {
    fn bounds(&self) -> Rectangle {
        self.bounds
    }

    fn translate_impl(&mut self, by: Point) {
        self.bounds.top_left += by;
    }
}

impl Drawable for Button {
    type Color = BinaryColor;
    type Output = ();

    fn draw<D>(&self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Self::Color>,
    {
        let rect = self.bounds;
        let (fill, label_color) = self.colors();
        let stroke_width = if matches!(self.style, ButtonStyle::Danger) { 2 } else { 1 };
        let style = match fill {
            Some(fill) => PrimitiveStyle::with_fill(fill),
            None => PrimitiveStyle::with_stroke(FG, stroke_width),
        };
        RoundedRectangle::with_equal_corners(rect, Size::new(2, 2))
            .into_styled(style)
            .draw(display)?;

        match &self.label {
            ButtonLabel::Text(text) => render_aligned::<fonts::FONT_BUTTON, D>(
                text,
                rect.center(),
                VerticalPosition::Center,
                HorizontalAlignment::Center,
                label_color,
                display,
            )?,
            ButtonLabel::Icon(bytes) => match Bmp::<BinaryColor>::from_slice(bytes) {
                Ok(bmp) => {
                    Image::new(&bmp, rect.center() - bmp.size() / 2).draw(display)?;
                }
                Err(e) => log::warn!("button icon is not a valid BMP: {e:?}"),
            },
        }

        Ok(())
    }
}
