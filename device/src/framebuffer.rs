//! In-memory 1bpp screen
//!
//! Stands in for the panel driver in tests and in the demo binary, which
//! prints each update as ASCII art.

use crate::interact::Screen;
use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, OriginDimensions, Pixel, Size},
};
use std::convert::Infallible;
use twobutton_ui::constants::{HEIGHT, WIDTH};

pub struct Framebuffer {
    buffer: Box<[u8]>,
    updates: usize,
    echo: bool,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framebuffer {
    #[must_use]
    pub fn new() -> Self {
        let size = (WIDTH.div_ceil(8) * HEIGHT) as usize;
        Self {
            buffer: vec![0; size].into_boxed_slice(),
            updates: 0,
            echo: false,
        }
    }

    /// Print the buffer to stdout on every update
    #[must_use]
    pub fn with_echo(mut self) -> Self {
        self.echo = true;
        self
    }

    fn locate(x: u32, y: u32) -> (usize, u8) {
        let index = (y * WIDTH.div_ceil(8) + x / 8) as usize;
        (index, 7 - (x % 8) as u8)
    }

    pub fn is_on(&self, x: u32, y: u32) -> bool {
        if x >= WIDTH || y >= HEIGHT {
            return false;
        }
        let (index, bit) = Self::locate(x, y);
        self.buffer[index] & (1 << bit) != 0
    }

    pub fn lit_pixels(&self) -> usize {
        self.buffer.iter().map(|byte| byte.count_ones() as usize).sum()
    }

    /// Number of `update` calls so far
    pub fn updates(&self) -> usize {
        self.updates
    }

    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity(((WIDTH + 1) * HEIGHT) as usize);
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                out.push(if self.is_on(x, y) { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH, HEIGHT)
    }
}

impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            let (Ok(x), Ok(y)) = (u32::try_from(coord.x), u32::try_from(coord.y)) else {
                continue;
            };
            if x >= WIDTH || y >= HEIGHT {
                continue;
            }

            let (index, bit) = Self::locate(x, y);
            if color.is_on() {
                self.buffer[index] |= 1 << bit;
            } else {
                self.buffer[index] &= !(1 << bit);
            }
        }
        Ok(())
    }
}

impl Screen for Framebuffer {
    fn update(&mut self) -> Result<(), Self::Error> {
        self.updates += 1;
        if self.echo {
            println!("{}", self.render_ascii());
        }
        Ok(())
    }
}
