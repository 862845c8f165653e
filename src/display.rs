//! Status screen.
//!
//! [`StatusDisplay`] is all the rest of the crate knows about the screen.
//! [`LcdDisplay`] renders it on any RGB565 draw target.

use core::fmt::Debug;
use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_9X15};
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle, RoundedRectangle};
use embedded_graphics::text::{Baseline, Text};
use log::warn;

use crate::graphics::{BLACK, DARK_CYAN, DARK_GREY, GREEN, LIGHT_GREY, RED, WHITE};

pub trait StatusDisplay {
    /// Set the LED indicator on the stick icon.
    fn show_connected(&mut self, connected: bool);

    /// Replace the single-line status message.
    fn show_message(&mut self, text: &str);

    fn show_welcome(&mut self, _version: &str) {}

    /// Draw the USB stick icon.
    fn show_stick(&mut self) {}

    fn clear(&mut self) {}
}

impl<D: StatusDisplay + ?Sized> StatusDisplay for &mut D {
    fn show_connected(&mut self, connected: bool) {
        (**self).show_connected(connected)
    }

    fn show_message(&mut self, text: &str) {
        (**self).show_message(text)
    }

    fn show_welcome(&mut self, version: &str) {
        (**self).show_welcome(version)
    }

    fn show_stick(&mut self) {
        (**self).show_stick()
    }

    fn clear(&mut self) {
        (**self).clear()
    }
}

pub const TITLE: &str = "SD Card -> USB Stick";

/// Top-left corner of the LED indicator bar.
pub const LED_ORIGIN: Point = Point::new(54, 60);
pub const LED_SIZE: Size = Size::new(5, 30);

/// Message line: the band at `MESSAGE_BAND_Y` is wiped before each message.
const MESSAGE_BAND_Y: i32 = 28;
const MESSAGE_BAND_HEIGHT: u32 = 12;
const MESSAGE_ORIGIN: Point = Point::new(66, 30);

pub struct LcdDisplay<T> {
    target: T,
}

impl<T> LcdDisplay<T>
where
    T: DrawTarget<Color = Rgb565>,
    T::Error: Debug,
{
    pub fn new(target: T) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    fn rounded(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgb565) -> Result<(), T::Error> {
        RoundedRectangle::with_equal_corners(
            Rectangle::new(Point::new(x, y), Size::new(w, h)),
            Size::new(5, 5),
        )
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(&mut self.target)
    }

    fn text(&mut self, text: &str, x: i32, y: i32, style: MonoTextStyle<'_, Rgb565>) -> Result<(), T::Error> {
        Text::with_baseline(text, Point::new(x, y), style, Baseline::Top)
            .draw(&mut self.target)
            .map(|_| ())
    }

    fn draw_stick(&mut self) -> Result<(), T::Error> {
        // port
        self.rounded(155, 55, 40, 40, LIGHT_GREY)?;
        // body
        self.rounded(45, 50, 112, 50, DARK_CYAN)?;
        // contacts
        self.rounded(164, 63, 20, 10, DARK_GREY)?;
        self.rounded(164, 78, 20, 10, DARK_GREY)
    }

    fn draw_led(&mut self, connected: bool) -> Result<(), T::Error> {
        let color = if connected { GREEN } else { RED };
        self.rounded(LED_ORIGIN.x, LED_ORIGIN.y, LED_SIZE.width, LED_SIZE.height, color)
    }

    fn draw_message(&mut self, message: &str) -> Result<(), T::Error> {
        let width = self.target.bounding_box().size.width;
        Rectangle::new(Point::new(0, MESSAGE_BAND_Y), Size::new(width, MESSAGE_BAND_HEIGHT))
            .into_styled(PrimitiveStyle::with_fill(BLACK))
            .draw(&mut self.target)?;
        let style = MonoTextStyleBuilder::new()
            .font(&FONT_6X10)
            .text_color(WHITE)
            .background_color(BLACK)
            .build();
        self.text(message, MESSAGE_ORIGIN.x, MESSAGE_ORIGIN.y, style)
    }

    fn draw_welcome(&mut self, version: &str) -> Result<(), T::Error> {
        self.target.clear(BLACK)?;
        self.text(TITLE, 20, 17, MonoTextStyle::new(&FONT_9X15, WHITE))?;
        self.draw_stick()?;
        self.text("PRESS ANY KEY", 62, 71, MonoTextStyle::new(&FONT_6X10, WHITE))?;
        self.text(version, 69, 120, MonoTextStyle::new(&FONT_6X10, LIGHT_GREY))
    }
}

fn report<E: Debug>(what: &str, result: Result<(), E>) {
    if let Err(err) = result {
        warn!("display: {} failed: {:?}", what, err);
    }
}

impl<T> StatusDisplay for LcdDisplay<T>
where
    T: DrawTarget<Color = Rgb565>,
    T::Error: Debug,
{
    fn show_connected(&mut self, connected: bool) {
        let result = self.draw_led(connected);
        report("led", result);
    }

    fn show_message(&mut self, text: &str) {
        let result = self.draw_message(text);
        report("message", result);
    }

    fn show_welcome(&mut self, version: &str) {
        let result = self.draw_welcome(version);
        report("welcome", result);
    }

    fn show_stick(&mut self) {
        let result = self.draw_stick();
        report("icon", result);
    }

    fn clear(&mut self) {
        let result = self.target.clear(BLACK);
        report("clear", result);
    }
}
