//! Everything outside the registry that an update pass may touch.

use rand::RngCore;

use crate::assets::SoundHandle;
use crate::audio::Audio;
use crate::geometry::Point;
use crate::prefabs::Prefabs;
use crate::render::{Sprite, Surface};

pub struct Frame<'a> {
    pub surface: &'a mut dyn Surface,
    pub audio: &'a mut dyn Audio,
    pub rng: &'a mut dyn RngCore,
    pub prefabs: &'a Prefabs,
    /// Pointer position for this frame, in screen pixels.
    pub pointer: Point,
}

impl Frame<'_> {
    /// Draw unless the texture never loaded.
    pub fn draw(&mut self, sprite: &Sprite) {
        if !sprite.texture.is_missing() {
            self.surface.draw(sprite);
        }
    }

    /// Play unless the sound never loaded.
    pub fn play(&mut self, sound: SoundHandle) {
        if sound.0.is_some() {
            self.audio.play_sound(sound);
        }
    }
}
