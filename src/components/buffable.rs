use tracing::debug;

use super::Behavior;
use crate::assets::{SoundHandle, Texture};
use crate::entities::{BoostKind, BoostPair, Entity, EntityId, StatProfile};
use crate::frame::Frame;
use crate::geometry::Rect;
use crate::registry::EntityRegistry;
use crate::render::Sprite;
use crate::timer::Countdown;

/// How long a boost lasts: 5 seconds at 60 fps.
pub const BOOST_FRAMES: u32 = 300;

const INDICATOR_SIZE: i32 = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoostIndicators {
    pub damage: Texture,
    pub armor: Texture,
    pub speed: Texture,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoostSounds {
    pub damage: SoundHandle,
    pub armor: SoundHandle,
    pub speed: SoundHandle,
}

#[derive(Debug)]
struct BoostSlot {
    kind: BoostKind,
    pair: BoostPair,
    timer: Countdown,
    indicator: Texture,
    sound: SoundHandle,
    /// Horizontal offset of the indicator icon from the owner's left edge.
    offset_x: i32,
}

/// Lets the owner pick up power-ups.  Each stat is boosted independently and
/// falls back to its base value when its countdown runs out.
#[derive(Debug)]
pub struct Buffable {
    slots: [BoostSlot; 3],
}

impl Buffable {
    pub fn new(profile: StatProfile, indicators: BoostIndicators, sounds: BoostSounds) -> Self {
        let slot = |kind, indicator, sound, offset_x| BoostSlot {
            kind,
            pair: profile.pair(kind),
            timer: Countdown::default(),
            indicator,
            sound,
            offset_x,
        };
        Self {
            slots: [
                slot(BoostKind::Damage, indicators.damage, sounds.damage, 16),
                slot(BoostKind::Armor, indicators.armor, sounds.armor, 31),
                slot(BoostKind::Speed, indicators.speed, sounds.speed, 46),
            ],
        }
    }

    pub fn is_boosted(&self, kind: BoostKind) -> bool {
        self.slot(kind).timer.is_running()
    }

    /// Frames left on a boost; 0 when inactive.
    pub fn remaining(&self, kind: BoostKind) -> u32 {
        self.slot(kind).timer.remaining()
    }

    fn slot(&self, kind: BoostKind) -> &BoostSlot {
        &self.slots[slot_index(kind)]
    }

    fn slot_mut(&mut self, kind: BoostKind) -> &mut BoostSlot {
        &mut self.slots[slot_index(kind)]
    }

    fn draw_indicators(&self, owner: &Entity, frame: &mut Frame<'_>) {
        let at = owner.rect();
        for slot in self.slots.iter().filter(|s| s.timer.is_running()) {
            let dest = Rect::new(at.x + slot.offset_x, at.y, INDICATOR_SIZE, INDICATOR_SIZE);
            frame.draw(&Sprite::whole(slot.indicator, dest));
        }
    }

    fn expire_boosts(&mut self, owner: &mut Entity) {
        for slot in &mut self.slots {
            if slot.timer.tick() {
                owner.set_stat(slot.kind, slot.pair.base);
                debug!(entity = %owner.id(), kind = ?slot.kind, stats = ?owner.stats(), "boost expired");
            }
        }
    }

    fn collect_power_ups(&mut self, owner: &mut Entity, registry: &mut EntityRegistry, frame: &mut Frame<'_>) {
        // Snapshot first: the registry is edited while applying.
        let touched: Vec<(EntityId, BoostKind)> = registry
            .power_ups()
            .iter()
            .filter(|p| p.collides_with(owner))
            .filter_map(|p| p.boost_kind().map(|kind| (p.id(), kind)))
            .collect();

        for (id, kind) in touched {
            let slot = self.slot_mut(kind);
            frame.play(slot.sound);
            slot.timer.start(BOOST_FRAMES);
            let pair = slot.pair;
            owner.apply_boost(kind, pair);
            registry.remove_power_up(id);
            debug!(entity = %owner.id(), power_up = %id, ?kind, stats = ?owner.stats(), "boost collected");
        }
    }
}

fn slot_index(kind: BoostKind) -> usize {
    match kind {
        BoostKind::Damage => 0,
        BoostKind::Armor => 1,
        BoostKind::Speed => 2,
    }
}

impl Behavior for Buffable {
    fn update(&mut self, owner: &mut Entity, registry: &mut EntityRegistry, frame: &mut Frame<'_>) {
        self.draw_indicators(owner, frame);
        self.expire_boosts(owner);
        self.collect_power_ups(owner, registry, frame);
    }
}
