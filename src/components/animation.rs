use super::Behavior;
use crate::assets::Texture;
use crate::entities::{Direction, Entity};
use crate::frame::Frame;
use crate::input::MOVEMENT_KEYS;
use crate::registry::EntityRegistry;
use crate::timer::FrameTimer;

/// One sprite sheet per facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectionalTextures {
    pub up: Texture,
    pub down: Texture,
    pub left: Texture,
    pub right: Texture,
}

impl DirectionalTextures {
    /// Built from `[up, down, right, left]`, the order sheets are listed on disk.
    pub fn from_sheets(sheets: [Texture; 4]) -> Self {
        let [up, down, right, left] = sheets;
        Self { up, down, left, right }
    }

    pub fn get(&self, direction: Direction) -> Texture {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AnimationStyle {
    /// A single sheet cycling in place (coins, power-ups).
    Looping,
    /// Player-controlled: shooting overrides moving, moving overrides standing.
    Player {
        standing: DirectionalTextures,
        moving: DirectionalTextures,
        shooting: DirectionalTextures,
    },
    /// Always drawn in motion, facing its current direction.
    Enemy { moving: DirectionalTextures },
}

/// Steps the owner's sprite sheet at a fixed rate and picks the sheet that
/// matches what the owner is doing.
#[derive(Debug)]
pub struct Animation {
    style: AnimationStyle,
    cadence: FrameTimer,
}

impl Animation {
    /// Advances `animations_per_second` frames per second of game time.
    pub fn new(style: AnimationStyle, fps: u32, animations_per_second: u32) -> Self {
        let interval = (fps / animations_per_second.max(1)).max(1);
        Self { style, cadence: FrameTimer::new(interval) }
    }

    pub fn style(&self) -> &AnimationStyle {
        &self.style
    }
}

impl Behavior for Animation {
    fn update(&mut self, owner: &mut Entity, _registry: &mut EntityRegistry, _frame: &mut Frame<'_>) {
        if self.cadence.cycle() {
            owner.advance_frame();
        }

        match &self.style {
            AnimationStyle::Looping => {}
            AnimationStyle::Player { standing, moving, shooting } => {
                player_sheet(owner, standing, moving, shooting);
            }
            AnimationStyle::Enemy { moving } => {
                owner.set_texture(moving.get(owner.direction()));
            }
        }
    }
}

fn player_sheet(
    owner: &mut Entity,
    standing: &DirectionalTextures,
    moving: &DirectionalTextures,
    shooting: &DirectionalTextures,
) {
    if owner.is_shooting() {
        owner.set_texture(shooting.get(owner.direction()));
        return;
    }

    let input = owner.input();
    if input.movement_keys_held() > 0 {
        // Last pressed key decides, unless exactly one key is still down.
        let sole = MOVEMENT_KEYS.iter().copied().find(|key| input.only_movement_key(*key));
        let direction = sole
            .or(input.last_pressed())
            .and_then(Direction::from_movement_key)
            .unwrap_or(owner.direction());
        owner.set_direction(direction);
        owner.set_texture(moving.get(direction));
    } else {
        let direction = input
            .last_released()
            .and_then(Direction::from_movement_key)
            .unwrap_or(owner.direction());
        owner.set_direction(direction);
        owner.set_texture(standing.get(direction));
    }
}
