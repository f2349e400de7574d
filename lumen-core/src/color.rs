//! 8-bit colours and the gradient mixer.
//!
//! [`lerp`] blends two colours per channel:
//! `channel = c1 * (1 - ratio) + c2 * ratio`, truncated to `u8`.
//!
//! Ratios outside `[0, 1]` extrapolate along the same line rather than
//! being clamped; only the final `u8` conversion saturates at 0 and 255.

use bytemuck::{Pod, Zeroable};

/// Gradient fill applied across the four corners of a quad.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Gradient {
    /// Every corner takes the first colour.
    #[default]
    None,
    LeftToRight,
    TopToBottom,
    TopLeftToBottomRight,
    TopRightToBottomLeft,
}

/// RGB colour, 8 bits per channel.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Color3 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color3 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// RGBA colour, 8 bits per channel.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Color4 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color4 {
    pub const WHITE: Color4 = Color4::new(255, 255, 255, 255);
    pub const BLACK: Color4 = Color4::new(0, 0, 0, 255);
    pub const TRANSPARENT: Color4 = Color4::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Normalised `[0.0, 1.0]` channels.
    pub fn to_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

impl From<Color3> for Color4 {
    fn from(c: Color3) -> Self {
        Color4::rgb(c.r, c.g, c.b)
    }
}

/// Linear blending between two values of the same colour type.
pub trait Lerp: Sized {
    fn lerp(self, other: Self, ratio: f32) -> Self;
}

#[inline]
fn mix_channel(a: u8, b: u8, ratio: f32) -> u8 {
    // `as` truncates toward zero and saturates out-of-range values.
    (a as f32 * (1.0 - ratio) + b as f32 * ratio) as u8
}

impl Lerp for Color3 {
    fn lerp(self, other: Self, ratio: f32) -> Self {
        Color3::new(
            mix_channel(self.r, other.r, ratio),
            mix_channel(self.g, other.g, ratio),
            mix_channel(self.b, other.b, ratio),
        )
    }
}

impl Lerp for Color4 {
    fn lerp(self, other: Self, ratio: f32) -> Self {
        Color4::new(
            mix_channel(self.r, other.r, ratio),
            mix_channel(self.g, other.g, ratio),
            mix_channel(self.b, other.b, ratio),
            mix_channel(self.a, other.a, ratio),
        )
    }
}

/// Blend `c1` toward `c2` by `ratio`.
pub fn lerp<C: Lerp>(c1: C, c2: C, ratio: f32) -> C {
    c1.lerp(c2, ratio)
}

// ===================================================================
// Tests
// ===================================================================
