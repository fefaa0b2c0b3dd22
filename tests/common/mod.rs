#![allow(dead_code)]

use catcus_arena::assets::MemoryLoader;
use catcus_arena::audio::SilentAudio;
use catcus_arena::config::GameConfig;
use catcus_arena::entities::Entity;
use catcus_arena::frame::Frame;
use catcus_arena::geometry::Point;
use catcus_arena::input::InputEvent;
use catcus_arena::prefabs::Prefabs;
use catcus_arena::registry::EntityRegistry;
use catcus_arena::render::RecordingSurface;

use rand::rngs::StdRng;
use rand::SeedableRng;

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// A registry with a player, driven frame by frame without the game loop
/// (so no power-ups spawn on their own).
pub struct Harness {
    pub prefabs: Prefabs,
    pub registry: EntityRegistry,
    pub surface: RecordingSurface,
    pub audio: SilentAudio,
    pub rng: StdRng,
    pub pointer: Point,
}

impl Harness {
    pub fn new() -> Self {
        let mut loader = MemoryLoader::with_builtin_assets();
        let prefabs = Prefabs::load(&mut loader, &GameConfig::default());
        let mut registry = EntityRegistry::new();
        let player = prefabs.player(registry.allocate_id());
        registry.init_player(player).unwrap();
        Harness {
            prefabs,
            registry,
            surface: RecordingSurface::default(),
            audio: SilentAudio::default(),
            rng: seeded_rng(),
            pointer: Point::default(),
        }
    }

    pub fn player(&self) -> &Entity {
        self.registry.player().unwrap()
    }

    pub fn player_mut(&mut self) -> &mut Entity {
        self.registry.player_mut().unwrap()
    }

    /// Dispatch `event` and run one update pass.  Draw requests of the pass
    /// stay in `surface` until the next call.
    pub fn frame(&mut self, event: Option<InputEvent>) {
        self.surface.sprites.clear();
        self.surface.texts.clear();
        self.registry.dispatch_event(event);
        let mut frame = Frame {
            surface: &mut self.surface,
            audio: &mut self.audio,
            rng: &mut self.rng,
            prefabs: &self.prefabs,
            pointer: self.pointer,
        };
        self.registry.update_entities(&mut frame).unwrap();
    }

    pub fn frames(&mut self, count: usize) {
        for _ in 0..count {
            self.frame(None);
        }
    }
}
