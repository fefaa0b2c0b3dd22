use super::Behavior;
use crate::assets::Texture;
use crate::entities::Entity;
use crate::frame::Frame;
use crate::geometry::Rect;
use crate::registry::EntityRegistry;
use crate::render::Sprite;

pub const TIERS: usize = 6;

/// Which of the six bar sprites to show.  Bands are `starting / 6` wide and
/// checked from the top, so each band includes its upper edge.
pub fn health_tier(health: i32, starting: i32) -> usize {
    let band = starting / TIERS as i32;
    (1..TIERS)
        .find(|&drop| health >= starting - band * drop as i32)
        .map(|drop| TIERS - drop)
        .unwrap_or(0)
}

/// Draws a six-step health bar under the owner.
#[derive(Debug)]
pub struct HealthBar {
    /// Emptiest first.
    textures: [Texture; TIERS],
    tier: usize,
}

impl HealthBar {
    pub fn new(textures: [Texture; TIERS]) -> Self {
        Self { textures, tier: TIERS - 1 }
    }

    pub fn tier(&self) -> usize {
        self.tier
    }
}

impl Behavior for HealthBar {
    fn update(&mut self, owner: &mut Entity, _registry: &mut EntityRegistry, frame: &mut Frame<'_>) {
        self.tier = health_tier(owner.health, owner.starting_health);
        let at = owner.rect();
        let dest = Rect::new(at.x + 23, at.y + owner.frame_height() * 2, 30, 10);
        frame.draw(&Sprite::whole(self.textures[self.tier], dest));
    }
}
