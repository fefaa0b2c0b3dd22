//! Drawing collaborator.  The core only issues draw requests; what a "pixel"
//! ends up being is the surface's business.

use std::io;

use crate::assets::Texture;
use crate::geometry::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flip {
    None,
    Horizontal,
}

/// One draw request.  `source` is `None` to draw the whole texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sprite {
    pub texture: Texture,
    pub source: Option<Rect>,
    pub dest: Rect,
    pub flip: Flip,
}

impl Sprite {
    pub fn whole(texture: Texture, dest: Rect) -> Self {
        Self { texture, source: None, dest, flip: Flip::None }
    }
}

pub trait Surface {
    fn draw(&mut self, sprite: &Sprite);
    fn draw_text(&mut self, text: &str, dest: Rect);
    fn clear(&mut self);
    fn present(&mut self) -> io::Result<()>;
}

/// Keeps every request of the current frame.  Used by tests and headless runs.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub sprites: Vec<Sprite>,
    pub texts: Vec<(String, Rect)>,
    pub presented: u32,
}

impl Surface for RecordingSurface {
    fn draw(&mut self, sprite: &Sprite) {
        self.sprites.push(*sprite);
    }

    fn draw_text(&mut self, text: &str, dest: Rect) {
        self.texts.push((text.to_string(), dest));
    }

    fn clear(&mut self) {
        self.sprites.clear();
        self.texts.clear();
    }

    fn present(&mut self) -> io::Result<()> {
        self.presented += 1;
        Ok(())
    }
}
