//! Behaviours attached to entities.
//!
//! Each component gets one `update` per frame with mutable access to its
//! owner, the registry (minus the population the owner is in) and the frame
//! collaborators.  Components never outlive their owner.

mod animation;
mod buffable;
mod coin_collector;
mod health_bar;
mod movement;
mod weapon;

pub use animation::{Animation, AnimationStyle, DirectionalTextures};
pub use buffable::{Buffable, BoostIndicators, BoostSounds, BOOST_FRAMES};
pub use coin_collector::CoinCollector;
pub use health_bar::{health_tier, HealthBar};
pub use movement::{PlayerControlledMovement, RandomMovement};
pub use weapon::{RangedWeapon, WeaponKind};

use crate::entities::Entity;
use crate::frame::Frame;
use crate::registry::EntityRegistry;

/// The per-frame capability every component provides.
pub trait Behavior {
    fn update(&mut self, owner: &mut Entity, registry: &mut EntityRegistry, frame: &mut Frame<'_>);
}

pub enum Component {
    PlayerControlledMovement(PlayerControlledMovement),
    RandomMovement(RandomMovement),
    RangedWeapon(RangedWeapon),
    Animation(Animation),
    Buffable(Buffable),
    CoinCollector(CoinCollector),
    HealthBar(HealthBar),
}

impl Component {
    pub fn update(&mut self, owner: &mut Entity, registry: &mut EntityRegistry, frame: &mut Frame<'_>) {
        match self {
            Component::PlayerControlledMovement(c) => c.update(owner, registry, frame),
            Component::RandomMovement(c) => c.update(owner, registry, frame),
            Component::RangedWeapon(c) => c.update(owner, registry, frame),
            Component::Animation(c) => c.update(owner, registry, frame),
            Component::Buffable(c) => c.update(owner, registry, frame),
            Component::CoinCollector(c) => c.update(owner, registry, frame),
            Component::HealthBar(c) => c.update(owner, registry, frame),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Component::PlayerControlledMovement(_) => "player-controlled-movement",
            Component::RandomMovement(_) => "random-movement",
            Component::RangedWeapon(_) => "ranged-weapon",
            Component::Animation(_) => "animation",
            Component::Buffable(_) => "buffable",
            Component::CoinCollector(_) => "coin-collector",
            Component::HealthBar(_) => "health-bar",
        }
    }
}

macro_rules! component_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Component {
                fn from(c: $variant) -> Self {
                    Component::$variant(c)
                }
            }
        )*
    };
}

component_from!(
    PlayerControlledMovement,
    RandomMovement,
    RangedWeapon,
    Animation,
    Buffable,
    CoinCollector,
    HealthBar,
);

impl Entity {
    pub fn buffable(&self) -> Option<&Buffable> {
        self.components().iter().find_map(|c| match c {
            Component::Buffable(b) => Some(b),
            _ => None,
        })
    }

    pub fn weapon(&self) -> Option<&RangedWeapon> {
        self.components().iter().find_map(|c| match c {
            Component::RangedWeapon(w) => Some(w),
            _ => None,
        })
    }

    pub fn health_bar(&self) -> Option<&HealthBar> {
        self.components().iter().find_map(|c| match c {
            Component::HealthBar(h) => Some(h),
            _ => None,
        })
    }
}
