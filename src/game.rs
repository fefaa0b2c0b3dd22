//! The fixed-timestep driver.
//!
//! Each iteration: poll at most one input event and hand it to the registry
//! (quit and spawn/mute shortcuts are handled here, not by entities), tick the
//! power-up spawner, run the registry's update pass, draw the HUD, present,
//! clear, and sleep out whatever is left of the frame budget.

use std::thread;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::assets::AssetLoader;
use crate::audio::Audio;
use crate::config::GameConfig;
use crate::entities::BoostKind;
use crate::error::GameResult;
use crate::frame::Frame;
use crate::geometry::Rect;
use crate::input::{InputEvent, InputSource, Key};
use crate::prefabs::Prefabs;
use crate::registry::EntityRegistry;
use crate::render::{Sprite, Surface};
use crate::timer::FrameTimer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Sleeps out the unused part of each frame.
#[derive(Clone, Copy, Debug)]
pub struct FramePacer {
    budget: Duration,
}

impl FramePacer {
    pub fn new(budget: Duration) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Time still owed for a frame that took `elapsed`; `None` once overrun.
    pub fn remaining(&self, elapsed: Duration) -> Option<Duration> {
        self.budget.checked_sub(elapsed).filter(|rest| !rest.is_zero())
    }

    pub fn wait(&self, frame_start: Instant) {
        if let Some(rest) = self.remaining(frame_start.elapsed()) {
            thread::sleep(rest);
        }
    }
}

/// The collaborators a frame talks to.
pub struct Io<'a> {
    pub input: &'a mut dyn InputSource,
    pub surface: &'a mut dyn Surface,
    pub audio: &'a mut dyn Audio,
}

pub struct Game {
    config: GameConfig,
    registry: EntityRegistry,
    prefabs: Prefabs,
    rng: StdRng,
    power_up_timer: FrameTimer,
    pacer: FramePacer,
    music_playing: bool,
    state: LoopState,
    frames: u64,
}

impl Game {
    /// Load assets, register the player, spawn the first enemy and start the
    /// background music.
    pub fn new(
        config: GameConfig,
        loader: &mut dyn AssetLoader,
        rng: StdRng,
        audio: &mut dyn Audio,
    ) -> GameResult<Self> {
        let prefabs = Prefabs::load(loader, &config);
        let mut registry = EntityRegistry::new();
        let player = prefabs.player(registry.allocate_id());
        registry.init_player(player)?;

        let mut game = Game {
            power_up_timer: FrameTimer::new(config.power_up_interval_frames()),
            pacer: FramePacer::new(config.frame_budget()),
            config,
            registry,
            prefabs,
            rng,
            music_playing: false,
            state: LoopState::Running,
            frames: 0,
        };
        game.spawn_enemy();

        game.prefabs.set_volumes(audio);
        if game.prefabs.music.0.is_some() {
            audio.play_music(game.prefabs.music);
            game.music_playing = true;
        }
        info!(width = game.config.width, height = game.config.height, fps = game.config.fps, "game ready");
        Ok(game)
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    pub fn prefabs(&self) -> &Prefabs {
        &self.prefabs
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn music_playing(&self) -> bool {
        self.music_playing
    }

    // ── Spawning ──────────────────────────────────────────────────────────────

    pub fn spawn_enemy(&mut self) {
        let enemy = self.prefabs.enemy(self.registry.allocate_id(), &mut self.rng);
        debug!(enemy = %enemy.id(), at = ?enemy.rect(), "enemy spawned");
        self.registry.add_enemy(enemy);
    }

    pub fn spawn_power_up(&mut self, kind: BoostKind) {
        let power_up = self.prefabs.power_up(self.registry.allocate_id(), kind, &mut self.rng);
        debug!(power_up = %power_up.id(), ?kind, at = ?power_up.rect(), "power-up spawned");
        self.registry.add_power_up(power_up);
    }

    /// Spawn by index: 0 damage, 1 armor, 2 speed.  Anything else is refused.
    pub fn spawn_power_up_index(&mut self, index: u8) -> GameResult<()> {
        let kind = BoostKind::try_from(index)?;
        self.spawn_power_up(kind);
        Ok(())
    }

    fn tick_spawner(&mut self) {
        if self.power_up_timer.cycle() {
            let index = self.rng.gen_range(0..BoostKind::ALL.len() as u8);
            if let Err(err) = self.spawn_power_up_index(index) {
                warn!(%err, "power-up spawn refused");
            }
        }
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Give the event to every entity, then act on the loop-level keys.
    pub fn handle_event(&mut self, event: Option<InputEvent>, audio: &mut dyn Audio) {
        self.registry.dispatch_event(event);

        match event {
            Some(InputEvent::Quit) => {
                info!(frames = self.frames, "quit requested");
                self.state = LoopState::Stopped;
            }
            Some(InputEvent::KeyDown(Key::Char(c @ '1'..='3'))) => {
                let index = c as u8 - b'1';
                if let Err(err) = self.spawn_power_up_index(index) {
                    warn!(%err, "power-up spawn refused");
                }
            }
            Some(InputEvent::KeyDown(Key::Char('0'))) => self.spawn_enemy(),
            Some(InputEvent::KeyDown(Key::Char('m'))) => self.toggle_music(audio),
            _ => {}
        }
    }

    fn toggle_music(&mut self, audio: &mut dyn Audio) {
        if self.music_playing {
            audio.pause_music();
        } else {
            audio.resume_music();
        }
        self.music_playing = !self.music_playing;
        debug!(playing = self.music_playing, "music toggled");
    }

    // ── Frame ─────────────────────────────────────────────────────────────────

    /// One full iteration without the pacing sleep.
    pub fn step(&mut self, io: &mut Io<'_>) -> GameResult<LoopState> {
        let event = io.input.poll_event();
        self.handle_event(event, io.audio);
        if self.state == LoopState::Stopped {
            return Ok(self.state);
        }

        self.tick_spawner();

        let mut frame = Frame {
            surface: &mut *io.surface,
            audio: &mut *io.audio,
            rng: &mut self.rng,
            prefabs: &self.prefabs,
            pointer: io.input.pointer(),
        };
        self.registry.update_entities(&mut frame)?;

        self.draw_hud(io.surface);
        io.surface.present()?;
        io.surface.clear();

        self.frames += 1;
        Ok(self.state)
    }

    fn draw_hud(&self, surface: &mut dyn Surface) {
        let row = self.config.height - 60;
        let icon = self.prefabs.coin_icon;
        if !icon.is_missing() {
            surface.draw(&Sprite::whole(icon, Rect::new(10, row, 30, 50)));
        }
        let count = self.registry.coins_collected().to_string();
        surface.draw_text(&count, Rect::new(50, row, 30, 50));
    }

    /// Run until a quit event arrives.
    pub fn run(&mut self, io: &mut Io<'_>) -> GameResult<()> {
        info!(budget = ?self.pacer.budget(), "entering game loop");
        while self.state == LoopState::Running {
            let frame_start = Instant::now();
            if self.step(io)? == LoopState::Stopped {
                break;
            }
            self.pacer.wait(frame_start);
        }
        info!(frames = self.frames, coins = self.registry.coins_collected(), "game loop stopped");
        Ok(())
    }
}
