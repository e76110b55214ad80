use super::{Icon, Page, render_str};
use crate::constants::{FG, TEXT_HEADER_HEIGHT, TEXT_LINE_HEIGHT_HALF, TEXT_MARGIN_LEFT};
use crate::fonts;
use crate::text::{Layout, LayoutMetrics, SpanKind, TextLayout};
use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, Point},
};

/// Per-flow presentation settings
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScreenStyle {
    pub icon: Option<Icon>,
}

impl ScreenStyle {
    #[must_use]
    pub fn with_icon(icon: Icon) -> Self {
        Self { icon: Some(icon) }
    }
}

/// Title row above the text area
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub title: String,
    pub icon: Option<Icon>,
}

impl Header {
    #[must_use]
    pub fn new(title: &str, style: ScreenStyle) -> Self {
        Self {
            title: title.to_string(),
            icon: style.icon,
        }
    }
}

/// `TextPage` draws a finalized text layout below an optional header.
///
/// Without a header the text starts at the top of the display and gets the
/// header's row as one more line.
pub struct TextPage {
    header: Option<Header>,
    layout: Layout,
    metrics: LayoutMetrics,
}

impl TextPage {
    #[must_use]
    pub fn new(header: Option<Header>, text: &TextLayout) -> Self {
        let mut metrics = *text.metrics();
        if header.is_none() {
            metrics = metrics.with_max_lines(metrics.max_lines.saturating_add(1));
        }
        Self {
            header,
            layout: text.finalize_with(&metrics),
            metrics,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    fn text_top(&self) -> i32 {
        if self.header.is_some() {
            TEXT_HEADER_HEIGHT.cast_signed()
        } else {
            0
        }
    }
}

impl Page for TextPage {
    fn draw<D: DrawTarget<Color = BinaryColor>>(&mut self, display: &mut D) -> Result<(), D::Error> {
        if let Some(header) = &self.header {
            let mut title_x = TEXT_MARGIN_LEFT.cast_signed();
            if let Some(icon) = header.icon {
                icon.draw(Point::new(title_x, 1), FG, display)?;
                title_x += 10;
            }
            // One row up so title descenders end above the text area
            render_str::<fonts::FONT_BOLD, D>(&header.title, Point::new(title_x, -1), FG, display)?;
        }

        let top = self.text_top();
        for line in &self.layout.lines {
            let offset = i32::try_from(line.offset).unwrap_or(i32::MAX);
            let y = top + offset * TEXT_LINE_HEIGHT_HALF.cast_signed();
            let mut x = TEXT_MARGIN_LEFT.cast_signed();
            for span in &line.spans {
                let position = Point::new(x, y);
                match span.font() {
                    SpanKind::Normal => {
                        render_str::<fonts::FONT_NORMAL, D>(&span.text, position, FG, display)?;
                    }
                    SpanKind::Bold => {
                        render_str::<fonts::FONT_BOLD, D>(&span.text, position, FG, display)?;
                    }
                    SpanKind::Mono => {
                        render_str::<fonts::FONT_MONO, D>(&span.text, position, FG, display)?;
                    }
                }
                x += span.visual_width(&self.metrics).cast_signed();
            }
        }
        Ok(())
    }

    fn read_content(&self) -> Vec<String> {
        self.header
            .iter()
            .map(|header| header.title.clone())
            .chain(self.layout.read_content())
            .collect()
    }
}
