use rand::Rng;

use super::Behavior;
use crate::entities::{Direction, Entity};
use crate::frame::Frame;
use crate::input::MOVEMENT_KEYS;
use crate::registry::EntityRegistry;
use crate::timer::FrameTimer;

/// Frames a random walker keeps its heading.
const WANDER_FRAMES: u32 = 60;

/// Moves the owner for every held movement key (up, down, left, right order).
/// Holding two axes moves diagonally.
#[derive(Debug, Default)]
pub struct PlayerControlledMovement;

impl Behavior for PlayerControlledMovement {
    fn update(&mut self, owner: &mut Entity, _registry: &mut EntityRegistry, _frame: &mut Frame<'_>) {
        let commands: Vec<Direction> = MOVEMENT_KEYS
            .iter()
            .filter(|key| owner.input().is_held(**key))
            .filter_map(|key| Direction::from_movement_key(*key))
            .collect();
        for direction in commands {
            owner.step(direction);
        }
    }
}

/// Walks in the current direction every frame and picks a new random one
/// every [`WANDER_FRAMES`] frames.
#[derive(Debug)]
pub struct RandomMovement {
    timer: FrameTimer,
}

impl Default for RandomMovement {
    fn default() -> Self {
        Self { timer: FrameTimer::new(WANDER_FRAMES) }
    }
}

impl Behavior for RandomMovement {
    fn update(&mut self, owner: &mut Entity, _registry: &mut EntityRegistry, frame: &mut Frame<'_>) {
        if self.timer.cycle() {
            let direction = Direction::ALL[frame.rng.gen_range(0..Direction::ALL.len())];
            owner.set_direction(direction);
        }
        owner.step(owner.direction());
    }
}
