//! Viewport resource.
//!
//! Maps screen points reported by the platform (pixels, origin at the top
//! left, y pointing down) to world points (origin at the viewport centre,
//! y pointing up) and exposes the world-units-per-pixel scale used as the
//! arrival floor for seeks.

use glam::Vec2;

/// Screen/world mapping of the single view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// World units covered by one pixel.
    pub world_units_per_pixel: f32,
    /// World point shown at the viewport centre.
    pub center: Vec2,
}

impl Viewport {
    pub fn new(width: u32, height: u32, world_units_per_pixel: f32) -> Self {
        Self {
            width,
            height,
            world_units_per_pixel,
            center: Vec2::ZERO,
        }
    }

    /// Convert a screen point in pixels into world space.
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let half = Vec2::new(self.width as f32, self.height as f32) * 0.5;
        let offset = Vec2::new(screen.x - half.x, half.y - screen.y);
        self.center + offset * self.world_units_per_pixel
    }

    /// Convert a world point into screen pixels.
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let half = Vec2::new(self.width as f32, self.height as f32) * 0.5;
        let offset = (world - self.center) / self.world_units_per_pixel;
        Vec2::new(half.x + offset.x, half.y - offset.y)
    }

    /// Smallest distance distinguishable on screen.
    #[inline]
    pub fn pixel_floor(&self) -> f32 {
        self.world_units_per_pixel
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(640, 360, 0.05)
    }
}
