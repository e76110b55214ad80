//! QR rendering for receive addresses

use crate::constants::{BG, FG};
use crate::error::UiError;
use crate::pages::Page;
use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, Point, Size},
    primitives::Rectangle,
};
use qrcode::{Color, QrCode};

/// Modules of light border around the symbol
const QUIET_ZONE: u32 = 1;

/// Short addresses get double-sized modules.
pub fn select_magnification(address: &str, threshold: usize) -> u32 {
    if address.chars().count() < threshold { 2 } else { 1 }
}

/// A QR symbol drawn dark-on-light, centered in its area
pub struct QrPage {
    data: String,
    modules: Vec<bool>,
    width: u32,
    position: Point,
    magnification: u32,
}

impl QrPage {
    /// Encode `data` and place it in `area`. The magnification steps down
    /// until the symbol fits; a symbol too large even at 1 is clipped.
    pub fn new(data: &str, area: Rectangle, magnification: u32) -> Result<Self, UiError> {
        let code = QrCode::new(data.as_bytes()).map_err(|e| UiError::QrEncoding(e.to_string()))?;
        let width = u32::try_from(code.width())
            .map_err(|_| UiError::QrEncoding(format!("symbol width {} too large", code.width())))?;
        let modules = code.to_colors().into_iter().map(|c| c == Color::Dark).collect();

        let room = area.size.width.min(area.size.height);
        let side = width + 2 * QUIET_ZONE;
        let mut magnification = magnification.max(1);
        while magnification > 1 && side * magnification > room {
            magnification -= 1;
        }
        if side > room {
            log::warn!("QR symbol of {side} px does not fit {room} px");
        }
        let extent = side * magnification;
        let position = area.top_left
            + Point::new(
                (area.size.width.saturating_sub(extent) / 2).cast_signed(),
                (area.size.height.saturating_sub(extent) / 2).cast_signed(),
            );

        log::debug!("QR symbol {width}x{width} at magnification {magnification}");
        Ok(Self {
            data: data.to_string(),
            modules,
            width,
            position,
            magnification,
        })
    }

    /// Symbol width in modules
    pub fn modules(&self) -> u32 {
        self.width
    }

    pub fn magnification(&self) -> u32 {
        self.magnification
    }

    /// Drawn area including the quiet zone
    pub fn bounds(&self) -> Rectangle {
        let side = (self.width + 2 * QUIET_ZONE) * self.magnification;
        Rectangle::new(self.position, Size::new(side, side))
    }
}

impl Page for QrPage {
    fn draw<D: DrawTarget<Color = BinaryColor>>(&mut self, display: &mut D) -> Result<(), D::Error> {
        display.fill_solid(&self.bounds(), FG)?;

        let step = self.magnification.cast_signed();
        let origin = self.position + Point::new(step, step) * QUIET_ZONE.cast_signed();
        let module = Size::new(self.magnification, self.magnification);
        let columns = self.width as usize;
        for (index, _) in self.modules.iter().enumerate().filter(|(_, dark)| **dark) {
            let x = i32::try_from(index % columns).unwrap_or(i32::MAX);
            let y = i32::try_from(index / columns).unwrap_or(i32::MAX);
            display.fill_solid(&Rectangle::new(origin + Point::new(x, y) * step, module), BG)?;
        }
        Ok(())
    }

    fn read_content(&self) -> Vec<String> {
        vec![self.data.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CONTENT_HEIGHT, QR_SIZE_THRESHOLD, WIDTH};
    use embedded_graphics::{Pixel, prelude::OriginDimensions, primitives::ContainsPoint};
    use proptest::prelude::*;
    use std::convert::Infallible;

    /// Counts pixels by color
    struct Tally {
        on: usize,
        off: usize,
    }

    impl OriginDimensions for Tally {
        fn size(&self) -> Size {
            Size::new(128, 64)
        }
    }

    impl DrawTarget for Tally {
        type Color = BinaryColor;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(_, color) in pixels {
                match color {
                    BinaryColor::On => self.on += 1,
                    BinaryColor::Off => self.off += 1,
                }
            }
            Ok(())
        }
    }

    #[test]
    fn magnification_boundary() {
        let t = QR_SIZE_THRESHOLD;
        assert_eq!(select_magnification(&"a".repeat(t - 1), t), 2);
        assert_eq!(select_magnification(&"a".repeat(t), t), 1);
        assert_eq!(select_magnification(&"a".repeat(t + 1), t), 1);
    }

    #[test]
    fn magnification_counts_characters() {
        assert_eq!(select_magnification("ääää", 5), 2);
        assert_eq!(select_magnification("", 1), 2);
    }

    fn content_area() -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(WIDTH, CONTENT_HEIGHT))
    }

    fn assert_inside(page: &QrPage, area: &Rectangle) {
        let bounds = page.bounds();
        let bottom_right = bounds.bottom_right().unwrap();
        assert!(area.contains(bounds.top_left), "{bounds:?} outside {area:?}");
        assert!(area.contains(bottom_right), "{bounds:?} outside {area:?}");
    }

    #[test]
    fn tiny_data_keeps_double_size() {
        let page = QrPage::new("bc1q", content_area(), 2).unwrap();

        assert_eq!(page.magnification(), 2);
        let side = (page.modules() + 2) * 2;
        assert_eq!(page.bounds().size, Size::new(side, side));
        assert_inside(&page, &content_area());
        assert_eq!(page.read_content(), vec!["bc1q".to_string()]);
    }

    #[test]
    fn short_address_falls_back_to_single_size() {
        let address = "1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2";
        let magnification = select_magnification(address, QR_SIZE_THRESHOLD);
        assert_eq!(magnification, 2);

        let page = QrPage::new(address, content_area(), magnification).unwrap();
        assert!((page.modules() + 2) * 2 > CONTENT_HEIGHT);
        assert_eq!(page.magnification(), 1);
        assert_inside(&page, &content_area());
    }

    #[test]
    fn symbol_is_centered() {
        let page = QrPage::new("bc1q", content_area(), 1).unwrap();
        let bounds = page.bounds();
        let side = bounds.size.width;
        let expected = Point::new(
            ((WIDTH - side) / 2).cast_signed(),
            ((CONTENT_HEIGHT - side) / 2).cast_signed(),
        );
        assert_eq!(bounds.top_left, expected);
    }

    #[test]
    fn draw_paints_dark_modules_over_quiet_zone() {
        let mut page = QrPage::new("bc1q", content_area(), 1).unwrap();
        let mut tally = Tally { on: 0, off: 0 };
        page.draw(&mut tally).unwrap();

        let dark = page.modules.iter().filter(|dark| **dark).count();
        let side = (page.modules() + 2) as usize;
        assert_eq!(tally.on, side * side);
        assert_eq!(tally.off, dark);
    }

    proptest! {
        #[test]
        fn magnification_is_one_or_two(address in "[a-z0-9]{0,100}", threshold in 1usize..80) {
            let m = select_magnification(&address, threshold);
            prop_assert_eq!(m == 2, address.len() < threshold);
        }

        #[test]
        fn addresses_stay_above_buttons(address in "[a-z0-9]{1,60}") {
            let magnification = select_magnification(&address, QR_SIZE_THRESHOLD);
            let page = QrPage::new(&address, content_area(), magnification).unwrap();
            let bounds = page.bounds();
            prop_assert!(bounds.top_left.y >= 0);
            let bottom = bounds.top_left.y + bounds.size.height.cast_signed();
            prop_assert!(bottom <= CONTENT_HEIGHT.cast_signed());
        }
    }
}
