use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

/// Cardputer LCD in landscape orientation.
pub const SCREEN_WIDTH: u32 = 240;
pub const SCREEN_HEIGHT: u32 = 135;

pub const BLACK: Rgb565 = Rgb565::new(0, 0, 0);
pub const WHITE: Rgb565 = Rgb565::new(31, 63, 31);
pub const RED: Rgb565 = Rgb565::new(31, 0, 0);
pub const GREEN: Rgb565 = Rgb565::new(0, 63, 0);
pub const LIGHT_GREY: Rgb565 = Rgb565::new(26, 52, 26);
pub const DARK_GREY: Rgb565 = Rgb565::new(15, 31, 15);
pub const DARK_CYAN: Rgb565 = Rgb565::new(0, 31, 15);

/// RGB565 frame held in RAM.
///
/// Panels that take whole frames can be fed from [`Framebuffer::as_raw`];
/// it also serves as a draw target on the host.
pub struct Framebuffer {
    buffer: Vec<Rgb565>,
    width: u32,
    height: u32,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: vec![BLACK; width as usize * height as usize],
            width,
            height,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb565> {
        if x < self.width && y < self.height {
            Some(self.buffer[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    pub fn draw_pixel(&mut self, x: i32, y: i32, color: Rgb565) {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            let offset = y as usize * self.width as usize + x as usize;
            self.buffer[offset] = color;
        }
    }

    pub fn as_raw(&self) -> &[Rgb565] {
        &self.buffer
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.draw_pixel(point.x, point.y, color);
        }
        Ok(())
    }
}
