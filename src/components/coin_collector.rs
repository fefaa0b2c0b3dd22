use tracing::debug;

use super::Behavior;
use crate::assets::SoundHandle;
use crate::entities::{Entity, EntityId};
use crate::frame::Frame;
use crate::registry::EntityRegistry;

/// Picks up every coin the owner touches.
#[derive(Debug)]
pub struct CoinCollector {
    sound: SoundHandle,
}

impl CoinCollector {
    pub fn new(sound: SoundHandle) -> Self {
        Self { sound }
    }
}

impl Behavior for CoinCollector {
    fn update(&mut self, owner: &mut Entity, registry: &mut EntityRegistry, frame: &mut Frame<'_>) {
        let touched: Vec<EntityId> = registry
            .coins()
            .iter()
            .filter(|coin| coin.collides_with(owner))
            .map(Entity::id)
            .collect();

        for id in touched {
            frame.play(self.sound);
            registry.record_coin();
            registry.remove_coin(id);
            debug!(coin = %id, total = registry.coins_collected(), "coin collected");
        }
    }
}
