//! Owner of every live entity population.
//!
//! One player plus insertion-ordered enemies, power-ups and coins.  The
//! registry is built once per game and handed to whoever needs it; there is no
//! global instance.
//!
//! During [`EntityRegistry::update_entities`] the population being updated is
//! moved out of the registry, so its members' components can add to and remove
//! from the *other* populations while the pass is running.

use tracing::{debug, info, warn};

use crate::entities::{Entity, EntityId};
use crate::error::{GameError, GameResult};
use crate::frame::Frame;
use crate::input::InputEvent;

#[derive(Debug, Default)]
pub struct EntityRegistry {
    player: Option<Entity>,
    enemies: Vec<Entity>,
    power_ups: Vec<Entity>,
    coins: Vec<Entity>,
    coins_collected: u32,
    next_id: u64,
}

type Population = fn(&mut EntityRegistry) -> &mut Vec<Entity>;

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate_id(&mut self) -> EntityId {
        self.next_id += 1;
        EntityId(self.next_id)
    }

    // ── Player ────────────────────────────────────────────────────────────────

    /// Register the player.  Allowed exactly once.
    pub fn init_player(&mut self, player: Entity) -> GameResult<()> {
        if self.player.is_some() {
            return Err(GameError::PlayerAlreadyRegistered);
        }
        info!(player = %player.id(), "player registered");
        self.player = Some(player);
        Ok(())
    }

    pub fn player(&self) -> Option<&Entity> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.player.as_mut()
    }

    // ── Populations ───────────────────────────────────────────────────────────

    pub fn enemies(&self) -> &[Entity] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut [Entity] {
        &mut self.enemies
    }

    pub fn add_enemy(&mut self, enemy: Entity) {
        insert_unique(&mut self.enemies, enemy, "enemy");
    }

    pub fn remove_enemy(&mut self, id: EntityId) {
        self.enemies.retain(|e| e.id() != id);
    }

    pub fn power_ups(&self) -> &[Entity] {
        &self.power_ups
    }

    pub fn add_power_up(&mut self, power_up: Entity) {
        insert_unique(&mut self.power_ups, power_up, "power-up");
    }

    pub fn remove_power_up(&mut self, id: EntityId) {
        self.power_ups.retain(|p| p.id() != id);
    }

    pub fn coins(&self) -> &[Entity] {
        &self.coins
    }

    pub fn add_coin(&mut self, coin: Entity) {
        insert_unique(&mut self.coins, coin, "coin");
    }

    pub fn remove_coin(&mut self, id: EntityId) {
        self.coins.retain(|c| c.id() != id);
    }

    pub fn coins_collected(&self) -> u32 {
        self.coins_collected
    }

    pub fn record_coin(&mut self) {
        self.coins_collected += 1;
    }

    // ── Per-frame fan-out ─────────────────────────────────────────────────────

    /// Hand this frame's event to every tracked entity.  Must run before
    /// [`EntityRegistry::update_entities`], which is where it gets read.
    pub fn dispatch_event(&mut self, event: Option<InputEvent>) {
        let everyone = self
            .player
            .iter_mut()
            .chain(self.enemies.iter_mut())
            .chain(self.power_ups.iter_mut())
            .chain(self.coins.iter_mut());
        for entity in everyone {
            entity.set_event(event);
        }
    }

    /// Update the player, then enemies, power-ups and coins, in that order.
    pub fn update_entities(&mut self, frame: &mut Frame<'_>) -> GameResult<()> {
        let mut player = self.player.take().ok_or(GameError::MissingPlayer)?;
        player.update(self, frame);
        self.player = Some(player);

        self.update_enemies(frame);
        self.update_population(|r| &mut r.power_ups, frame);
        self.update_population(|r| &mut r.coins, frame);
        Ok(())
    }

    /// Defeated enemies turn into a coin instead of taking their turn.
    fn update_enemies(&mut self, frame: &mut Frame<'_>) {
        let enemies = std::mem::take(&mut self.enemies);
        let mut survivors = Vec::with_capacity(enemies.len());

        for mut enemy in enemies {
            if enemy.is_dead() {
                let coin = frame.prefabs.coin_drop(self.allocate_id(), &enemy);
                debug!(enemy = %enemy.id(), coin = %coin.id(), "enemy defeated");
                self.add_coin(coin);
                continue;
            }
            enemy.update(self, frame);
            survivors.push(enemy);
        }

        survivors.append(&mut self.enemies);
        self.enemies = survivors;
    }

    fn update_population(&mut self, select: Population, frame: &mut Frame<'_>) {
        let mut population = std::mem::take(select(self));
        for entity in &mut population {
            entity.update(self, frame);
        }
        population.append(select(self));
        *select(self) = population;
    }
}

fn insert_unique(population: &mut Vec<Entity>, entity: Entity, what: &str) {
    if population.iter().any(|e| e.id() == entity.id()) {
        warn!(id = %entity.id(), "{what} already registered, ignoring");
        return;
    }
    population.push(entity);
}
