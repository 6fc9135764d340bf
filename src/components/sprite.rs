use glam::Vec2;

/// Sprite is identified by a texture key and its size in world units.
/// The origin selects the pivot point (in pixels) relative to the texture's
/// top-left used for placement/rotation/scaling when rendering.
/// The simulation never reads it; the renderer pairs it with the entity's
/// interpolated pose.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub tex_key: String,
    pub width: f32,
    pub height: f32,
    pub origin: Vec2,
    pub z_index: i32,
    pub flip_h: bool,
    pub flip_v: bool,
}

impl Sprite {
    pub fn new(tex_key: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            tex_key: tex_key.into(),
            width,
            height,
            origin: Vec2::new(width * 0.5, height * 0.5),
            z_index: 0,
            flip_h: false,
            flip_v: false,
        }
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }
}
