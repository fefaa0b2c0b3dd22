use std::str::FromStr;

use tracing::debug;

use super::Behavior;
use crate::assets::{SoundHandle, Texture};
use crate::entities::{Ballistics, BoostKind, Direction, Entity, EntityKind};
use crate::error::GameError;
use crate::frame::Frame;
use crate::geometry::{Point, Rect};
use crate::registry::EntityRegistry;
use crate::timer::FrameTimer;

/// Frames between shots.
const RELOAD_FRAMES: u32 = 60;
/// Frames the owner stays planted after firing.
const RECOVERY_FRAMES: u32 = 40;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeaponKind {
    Gun,
}

impl WeaponKind {
    fn projectile_size(self) -> i32 {
        match self {
            WeaponKind::Gun => 7,
        }
    }

    fn projectile_speed(self) -> f32 {
        match self {
            WeaponKind::Gun => 4.0,
        }
    }
}

impl FromStr for WeaponKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gun" => Ok(WeaponKind::Gun),
            other => Err(GameError::UnknownWeapon(other.to_string())),
        }
    }
}

/// Fires projectiles at the pointer on a mouse press.
///
/// Idle while reloading; a press with a full reload fires and sets the owner's
/// `shooting` flag, which holds the owner in place until the recovery window
/// passes.  Projectiles belong to the weapon: each one hits at most one enemy
/// and is dropped on impact or once it has left the screen.
#[derive(Debug)]
pub struct RangedWeapon {
    kind: WeaponKind,
    reload: FrameTimer,
    recovery: FrameTimer,
    projectiles: Vec<Entity>,
    bullet: Texture,
    shot: SoundHandle,
}

impl RangedWeapon {
    pub fn new(kind: WeaponKind, bullet: Texture, shot: SoundHandle) -> Self {
        Self {
            kind,
            reload: FrameTimer::ready(RELOAD_FRAMES),
            recovery: FrameTimer::new(RECOVERY_FRAMES),
            projectiles: Vec::new(),
            bullet,
            shot,
        }
    }

    pub fn projectiles(&self) -> &[Entity] {
        &self.projectiles
    }

    pub fn is_loaded(&self) -> bool {
        self.reload.is_ready()
    }

    fn fire(&mut self, owner: &mut Entity, registry: &mut EntityRegistry, target: Point) {
        let at = owner.rect();
        let origin = Point::new(at.x + owner.frame_width(), at.y + owner.frame_height());
        owner.set_direction(Direction::facing(target.x - origin.x, target.y - origin.y));

        let size = self.kind.projectile_size();
        let projectile = Entity::new(
            registry.allocate_id(),
            EntityKind::Projectile(Ballistics::aimed(origin, target, self.kind.projectile_speed())),
            Rect::new(origin.x, origin.y, size, size),
            self.bullet,
            1,
            owner.screen(),
        );
        debug!(owner = %owner.id(), projectile = %projectile.id(), ?origin, ?target, "fired");
        self.projectiles.push(projectile);
    }

    fn advance_projectiles(&mut self, owner: &Entity, registry: &mut EntityRegistry, frame: &mut Frame<'_>) {
        let damage = owner.stat(BoostKind::Damage);
        let screen = owner.screen();

        self.projectiles.retain_mut(|projectile| {
            projectile.update(registry, frame);

            if let Some(enemy) = registry
                .enemies_mut()
                .iter_mut()
                .find(|enemy| enemy.collides_with(projectile))
            {
                enemy.take_damage(damage);
                debug!(enemy = %enemy.id(), damage, health = enemy.health, "enemy hit");
                return false;
            }
            projectile.rect().intersects(&screen)
        });
    }
}

impl Behavior for RangedWeapon {
    fn update(&mut self, owner: &mut Entity, registry: &mut EntityRegistry, frame: &mut Frame<'_>) {
        self.reload.tick();
        self.advance_projectiles(owner, registry, frame);

        if owner.is_shooting() {
            self.recovery.tick();
            if self.recovery.is_ready() {
                owner.set_shooting(false);
            }
        }

        if owner.input().trigger_pulled() && self.reload.is_ready() {
            owner.set_shooting(true);
            owner.reset_source();
            self.reload.reset();
            self.recovery.reset();
            self.fire(owner, registry, frame.pointer);
            frame.play(self.shot);
        }
    }
}
