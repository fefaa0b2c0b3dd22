//! Entity model: base state shared by every kind, the narrow mutation API the
//! components use, and the per-frame update contract.

use std::fmt;
use std::str::FromStr;

use rand::{Rng, RngCore};

use crate::assets::Texture;
use crate::components::Component;
use crate::error::GameError;
use crate::frame::Frame;
use crate::geometry::{Point, Rect};
use crate::input::{InputEvent, InputState, Key};
use crate::registry::EntityRegistry;
use crate::render::{Flip, Sprite};

// ── Small value types ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// w/s/a/d map to a direction; any other key does not.
    pub fn from_movement_key(key: Key) -> Option<Direction> {
        match key {
            Key::Char('w') => Some(Direction::Up),
            Key::Char('s') => Some(Direction::Down),
            Key::Char('a') => Some(Direction::Left),
            Key::Char('d') => Some(Direction::Right),
            _ => None,
        }
    }

    /// Facing toward an offset.  Horizontal wins only when strictly larger;
    /// ties go vertical, and a zero vertical offset counts as down.
    pub fn facing(dx: i32, dy: i32) -> Direction {
        if dx.abs() > dy.abs() {
            if dx >= 0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if dy >= 0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoostKind {
    Damage,
    Armor,
    Speed,
}

impl BoostKind {
    pub const ALL: [BoostKind; 3] = [BoostKind::Damage, BoostKind::Armor, BoostKind::Speed];
}

impl FromStr for BoostKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "damage" => Ok(BoostKind::Damage),
            "armor" => Ok(BoostKind::Armor),
            "speed" => Ok(BoostKind::Speed),
            other => Err(GameError::UnknownBoost(other.to_string())),
        }
    }
}

impl TryFrom<u8> for BoostKind {
    type Error = GameError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        BoostKind::ALL
            .get(index as usize)
            .copied()
            .ok_or(GameError::UnknownSpawnIndex(index))
    }
}

/// Base and boosted value of one stat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoostPair {
    pub base: i32,
    pub boosted: i32,
}

impl BoostPair {
    pub const fn new(base: i32, boosted: i32) -> Self {
        Self { base, boosted }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub damage: i32,
    pub armor: i32,
    pub speed: i32,
}

/// The two-level stat table of a buffable entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatProfile {
    pub damage: BoostPair,
    pub armor: BoostPair,
    pub speed: BoostPair,
}

impl StatProfile {
    pub fn pair(&self, kind: BoostKind) -> BoostPair {
        match kind {
            BoostKind::Damage => self.damage,
            BoostKind::Armor => self.armor,
            BoostKind::Speed => self.speed,
        }
    }

    pub fn base_stats(&self) -> Stats {
        Stats {
            damage: self.damage.base,
            armor: self.armor.base,
            speed: self.speed.base,
        }
    }
}

/// Sub-pixel flight state of a projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ballistics {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
}

impl Ballistics {
    pub fn aimed(origin: Point, target: Point, speed: f32) -> Self {
        let angle = ((origin.y - target.y) as f32).atan2((origin.x - target.x) as f32);
        Self {
            x: origin.x as f32,
            y: origin.y as f32,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
        }
    }

    fn step(&mut self) -> Point {
        self.x -= self.vx;
        self.y -= self.vy;
        Point::new(self.x.round() as i32, self.y.round() as i32)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum EntityKind {
    Player,
    Enemy,
    PowerUp(BoostKind),
    Coin,
    Projectile(Ballistics),
}

// ── Entity ────────────────────────────────────────────────────────────────────

pub struct Entity {
    id: EntityId,
    kind: EntityKind,
    position: Rect,
    source: Rect,
    texture: Texture,
    sheet_width: i32,
    screen: Rect,
    direction: Direction,
    stats: Stats,
    shooting: bool,
    input: InputState,
    components: Vec<Component>,
    pub health: i32,
    pub starting_health: i32,
}

impl Entity {
    /// `sheet` is split into `frames` equally wide frames; the first one is shown.
    pub fn new(
        id: EntityId,
        kind: EntityKind,
        position: Rect,
        sheet: Texture,
        frames: i32,
        screen: Rect,
    ) -> Self {
        let frame_width = sheet.width / frames.max(1);
        Entity {
            id,
            kind,
            position,
            source: Rect::new(0, 0, frame_width, sheet.height),
            texture: sheet,
            sheet_width: sheet.width,
            screen,
            direction: Direction::default(),
            stats: Stats::default(),
            shooting: false,
            input: InputState::default(),
            components: Vec::new(),
            health: 100,
            starting_health: 100,
        }
    }

    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.stats = stats;
        self
    }

    /// Attach a component.  Only available while the entity is being built.
    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    // ── Per-frame contract ────────────────────────────────────────────────────

    /// Apply the frame's input, run every component in attachment order, draw.
    pub fn update(&mut self, registry: &mut EntityRegistry, frame: &mut Frame<'_>) {
        self.handle_events();
        if let EntityKind::Projectile(ballistics) = &mut self.kind {
            let at = ballistics.step();
            self.position.x = at.x;
            self.position.y = at.y;
        }

        let mut components = std::mem::take(&mut self.components);
        for component in &mut components {
            component.update(self, registry, frame);
        }
        self.components = components;

        self.draw(frame);
    }

    pub fn set_event(&mut self, event: Option<InputEvent>) {
        self.input.set_current(event);
    }

    pub fn handle_events(&mut self) {
        self.input.apply_current();
    }

    pub fn draw(&self, frame: &mut Frame<'_>) {
        let flip = if self.direction == Direction::Left {
            Flip::Horizontal
        } else {
            Flip::None
        };
        frame.draw(&Sprite {
            texture: self.texture,
            source: Some(self.source),
            dest: self.position,
            flip,
        });
    }

    // ── Movement ──────────────────────────────────────────────────────────────
    //
    // Bounds are soft: an entity may poke a quarter (an eighth at the bottom)
    // of itself past the screen edge before the guard stops it.

    pub fn move_up(&mut self) {
        if !self.shooting && self.position.y > -self.position.h / 4 {
            self.position.y -= self.stats.speed;
        }
    }

    pub fn move_down(&mut self) {
        let h = self.position.h;
        if !self.shooting && self.position.y < self.screen.h - (h - h / 8) {
            self.position.y += self.stats.speed;
        }
    }

    pub fn move_left(&mut self) {
        if !self.shooting && self.position.x > -self.position.w / 4 {
            self.position.x -= self.stats.speed;
        }
    }

    pub fn move_right(&mut self) {
        let w = self.position.w;
        if !self.shooting && self.position.x < self.screen.w - (w - w / 4) {
            self.position.x += self.stats.speed;
        }
    }

    pub fn step(&mut self, direction: Direction) {
        match direction {
            Direction::Up => self.move_up(),
            Direction::Down => self.move_down(),
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
        }
    }

    /// Place the entity so its whole sprite frame is on screen.
    pub fn randomize_position(&mut self, rng: &mut dyn RngCore) {
        let max_x = (self.screen.w - self.source.w).max(0);
        let max_y = (self.screen.h - self.source.h).max(0);
        self.position.x = rng.gen_range(0..=max_x);
        self.position.y = rng.gen_range(0..=max_y);
    }

    pub fn center_on_screen(&mut self) {
        self.position.x = self.screen.w / 2 - self.position.w / 2;
        self.position.y = self.screen.h / 2 - self.position.h / 2;
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.position.x = x;
        self.position.y = y;
    }

    // ── Stats & health ────────────────────────────────────────────────────────

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn stat(&self, kind: BoostKind) -> i32 {
        match kind {
            BoostKind::Damage => self.stats.damage,
            BoostKind::Armor => self.stats.armor,
            BoostKind::Speed => self.stats.speed,
        }
    }

    pub fn set_stat(&mut self, kind: BoostKind, value: i32) {
        match kind {
            BoostKind::Damage => self.stats.damage = value,
            BoostKind::Armor => self.stats.armor = value,
            BoostKind::Speed => self.stats.speed = value,
        }
    }

    /// Raise a stat to its boosted value.  Reverting is up to whoever applied it.
    pub fn apply_boost(&mut self, kind: BoostKind, pair: BoostPair) {
        self.set_stat(kind, pair.boosted);
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.health -= amount;
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    // ── Sprite state ──────────────────────────────────────────────────────────

    pub fn set_texture(&mut self, texture: Texture) {
        self.texture = texture;
    }

    pub fn texture(&self) -> Texture {
        self.texture
    }

    /// Step the source rect one frame along the sheet, wrapping at its end.
    pub fn advance_frame(&mut self) {
        self.source.x += self.source.w;
        if self.source.x >= self.sheet_width {
            self.source.x = 0;
        }
    }

    pub fn reset_source(&mut self) {
        self.source.x = 0;
        self.source.y = 0;
    }

    pub fn source(&self) -> Rect {
        self.source
    }

    pub fn frame_width(&self) -> i32 {
        self.source.w
    }

    pub fn frame_height(&self) -> i32 {
        self.source.h
    }

    // ── Plain accessors ───────────────────────────────────────────────────────

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    pub fn boost_kind(&self) -> Option<BoostKind> {
        match self.kind {
            EntityKind::PowerUp(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn rect(&self) -> Rect {
        self.position
    }

    pub fn screen(&self) -> Rect {
        self.screen
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn is_shooting(&self) -> bool {
        self.shooting
    }

    pub fn set_shooting(&mut self, shooting: bool) {
        self.shooting = shooting;
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn collides_with(&self, other: &Entity) -> bool {
        self.position.intersects(&other.position)
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("position", &self.position)
            .field("health", &self.health)
            .field("stats", &self.stats)
            .field("direction", &self.direction)
            .field("components", &self.components.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::TextureId;

    fn sheet(frames: i32) -> Texture {
        Texture { id: Some(TextureId(1)), width: 32 * frames, height: 32 }
    }

    fn walker() -> Entity {
        Entity::new(
            EntityId(1),
            EntityKind::Enemy,
            Rect::new(100, 100, 80, 80),
            sheet(4),
            4,
            Rect::new(0, 0, 800, 600),
        )
        .with_stats(Stats { damage: 5, armor: 5, speed: 3 })
    }

    #[test]
    fn moves_by_speed_along_one_axis() {
        let mut e = walker();
        e.move_right();
        e.move_down();
        assert_eq!((e.rect().x, e.rect().y), (103, 103));
        e.move_left();
        e.move_up();
        assert_eq!((e.rect().x, e.rect().y), (100, 100));
    }

    #[test]
    fn shooting_freezes_movement() {
        let mut e = walker();
        e.set_shooting(true);
        for d in Direction::ALL {
            e.step(d);
        }
        assert_eq!(e.rect(), Rect::new(100, 100, 80, 80));
    }

    #[test]
    fn soft_bounds_allow_a_quarter_off_screen() {
        let mut e = walker();
        e.set_position(-19, 0);
        e.move_left(); // -19 > -20, allowed once more
        assert_eq!(e.rect().x, -22);
        e.move_left();
        assert_eq!(e.rect().x, -22);

        e.set_position(800 - 61, 0);
        e.move_right(); // 739 < 740
        assert_eq!(e.rect().x, 742);
        e.move_right();
        assert_eq!(e.rect().x, 742);

        e.set_position(0, 600 - 71);
        e.move_down(); // 529 < 530
        assert_eq!(e.rect().y, 532);
        e.move_down();
        assert_eq!(e.rect().y, 532);
    }

    #[test]
    fn frame_advance_wraps_at_sheet_width() {
        let mut e = walker();
        for expected in [32, 64, 96, 0, 32] {
            e.advance_frame();
            assert_eq!(e.source().x, expected);
        }
    }

    #[test]
    fn facing_prefers_vertical_on_ties() {
        assert_eq!(Direction::facing(10, 3), Direction::Right);
        assert_eq!(Direction::facing(-10, 3), Direction::Left);
        assert_eq!(Direction::facing(5, 5), Direction::Down);
        assert_eq!(Direction::facing(-5, -5), Direction::Up);
        assert_eq!(Direction::facing(0, 0), Direction::Down);
    }

    #[test]
    fn boost_kind_parsing_rejects_unknown_tags() {
        assert_eq!("armor".parse::<BoostKind>().unwrap(), BoostKind::Armor);
        assert!(matches!("shield".parse::<BoostKind>(), Err(GameError::UnknownBoost(t)) if t == "shield"));
        assert_eq!(BoostKind::try_from(2).unwrap(), BoostKind::Speed);
        assert!(matches!(BoostKind::try_from(3), Err(GameError::UnknownSpawnIndex(3))));
    }

    #[test]
    fn ballistics_head_toward_target() {
        let mut b = Ballistics::aimed(Point::new(0, 0), Point::new(100, 0), 4.0);
        assert_eq!(b.step(), Point::new(4, 0));
        assert_eq!(b.step(), Point::new(8, 0));

        let mut b = Ballistics::aimed(Point::new(0, 0), Point::new(0, -50), 4.0);
        assert_eq!(b.step(), Point::new(0, -4));
    }
}
