use std::collections::VecDeque;
use std::io;

use catcus_arena::assets::MemoryLoader;
use catcus_arena::audio::SilentAudio;
use catcus_arena::config::GameConfig;
use catcus_arena::entities::{BoostKind, Entity};
use catcus_arena::error::GameError;
use catcus_arena::game::{Game, Io, LoopState};
use catcus_arena::geometry::{Point, Rect};
use catcus_arena::input::{InputEvent, InputSource, Key};
use catcus_arena::prefabs::{GUNSHOT_VOLUME, MUSIC_VOLUME, PICKUP_VOLUME};
use catcus_arena::render::{RecordingSurface, Sprite, Surface};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Replays a fixed list of events, then reports nothing.
#[derive(Default)]
struct ScriptedInput {
    events: VecDeque<InputEvent>,
    pointer: Point,
}

impl ScriptedInput {
    fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self { events: events.into_iter().collect(), pointer: Point::default() }
    }
}

impl InputSource for ScriptedInput {
    fn poll_event(&mut self) -> Option<InputEvent> {
        self.events.pop_front()
    }

    fn pointer(&self) -> Point {
        self.pointer
    }
}

/// Keeps what was on screen at the last `present`.
#[derive(Default)]
struct Screen {
    current: RecordingSurface,
    shown_sprites: Vec<Sprite>,
    shown_texts: Vec<(String, Rect)>,
}

impl Surface for Screen {
    fn draw(&mut self, sprite: &Sprite) {
        self.current.draw(sprite);
    }

    fn draw_text(&mut self, text: &str, dest: Rect) {
        self.current.draw_text(text, dest);
    }

    fn clear(&mut self) {
        self.current.clear();
    }

    fn present(&mut self) -> io::Result<()> {
        self.shown_sprites = self.current.sprites.clone();
        self.shown_texts = self.current.texts.clone();
        self.current.present()
    }
}

fn new_game(audio: &mut SilentAudio) -> Game {
    let mut loader = MemoryLoader::with_builtin_assets();
    Game::new(GameConfig::default(), &mut loader, seeded_rng(), audio).unwrap()
}

fn key(c: char) -> InputEvent {
    InputEvent::KeyDown(Key::Char(c))
}

fn step_n(game: &mut Game, input: &mut ScriptedInput, screen: &mut Screen, audio: &mut SilentAudio, n: usize) {
    let mut io = Io { input, surface: screen, audio };
    for _ in 0..n {
        game.step(&mut io).unwrap();
    }
}

/// Power-ups still lying around plus boosts already picked up by someone.
fn boosts_seen(game: &Game) -> usize {
    let registry = game.registry();
    let boosted = |e: &Entity| {
        e.buffable()
            .map(|b| BoostKind::ALL.iter().filter(|k| b.is_boosted(**k)).count())
            .unwrap_or(0)
    };
    registry.power_ups().len()
        + registry.player().map(boosted).unwrap_or(0)
        + registry.enemies().iter().map(boosted).sum::<usize>()
}

// ── Start-up ──────────────────────────────────────────────────────────────────

#[test]
fn initial_scene() {
    let mut audio = SilentAudio::default();
    let game = new_game(&mut audio);

    assert!(game.registry().player().is_some());
    assert_eq!(game.registry().enemies().len(), 1);
    assert!(game.registry().power_ups().is_empty());
    assert!(game.registry().coins().is_empty());
    assert_eq!(game.state(), LoopState::Running);
    assert!(game.music_playing());
    assert!(audio.music.is_some());
}

#[test]
fn volumes_are_set_at_start() {
    let mut audio = SilentAudio::default();
    let mut game = new_game(&mut audio);
    assert_eq!(audio.music_volume, Some(MUSIC_VOLUME));
    assert_eq!(audio.sound_volumes.len(), 5);
    let at = |volume| audio.sound_volumes.values().filter(|v| **v == volume).count();
    assert_eq!(at(GUNSHOT_VOLUME), 1);
    assert_eq!(at(PICKUP_VOLUME), 4);

    // The gunshot is the effect set to the quieter volume.
    let mut input = ScriptedInput::new([InputEvent::MouseDown]);
    input.pointer = Point::new(600, 300);
    let mut screen = Screen::default();
    step_n(&mut game, &mut input, &mut screen, &mut audio, 1);
    let shot = audio.last_sound.unwrap();
    assert_eq!(audio.sound_volumes[&shot], GUNSHOT_VOLUME);
}

#[test]
fn missing_assets_do_not_stop_the_game() {
    let mut audio = SilentAudio::default();
    let mut loader = MemoryLoader::new();
    let mut game = Game::new(GameConfig::default(), &mut loader, seeded_rng(), &mut audio).unwrap();
    assert!(!game.music_playing());
    assert_eq!(audio.music_volume, None);
    assert!(audio.sound_volumes.is_empty());

    let mut input = ScriptedInput::default();
    let mut screen = Screen::default();
    step_n(&mut game, &mut input, &mut screen, &mut audio, 5);

    assert!(screen.shown_sprites.is_empty());
    assert_eq!(screen.shown_texts.len(), 1);
    assert_eq!(audio.sounds_played, 0);
}

// ── Loop ──────────────────────────────────────────────────────────────────────

#[test]
fn frame_draws_hud_and_clears_after_present() {
    let mut audio = SilentAudio::default();
    let mut game = new_game(&mut audio);
    let mut input = ScriptedInput::default();
    let mut screen = Screen::default();

    step_n(&mut game, &mut input, &mut screen, &mut audio, 1);

    assert_eq!(screen.shown_texts, vec![("0".to_string(), Rect::new(50, 540, 30, 50))]);
    assert!(screen.shown_sprites.iter().any(|s| s.dest == Rect::new(10, 540, 30, 50)));
    assert!(screen.current.sprites.is_empty());
    assert_eq!(screen.current.presented, 1);
    assert_eq!(game.frames(), 1);
}

#[test]
fn quit_stops_the_loop() {
    let mut audio = SilentAudio::default();
    let mut game = new_game(&mut audio);
    let mut input = ScriptedInput::new([key('w'), key('d'), InputEvent::Quit, key('0')]);
    let mut screen = Screen::default();

    let mut io = Io { input: &mut input, surface: &mut screen, audio: &mut audio };
    game.run(&mut io).unwrap();

    assert_eq!(game.state(), LoopState::Stopped);
    assert_eq!(game.frames(), 2);
    // The event after Quit is never read.
    assert_eq!(game.registry().enemies().len(), 1);
}

// ── Shortcuts ─────────────────────────────────────────────────────────────────

#[test]
fn number_keys_spawn() {
    let mut audio = SilentAudio::default();
    let mut game = new_game(&mut audio);

    game.handle_event(Some(key('1')), &mut audio);
    game.handle_event(Some(key('3')), &mut audio);
    game.handle_event(Some(key('0')), &mut audio);

    let kinds: Vec<_> = game.registry().power_ups().iter().filter_map(Entity::boost_kind).collect();
    assert_eq!(kinds, vec![BoostKind::Damage, BoostKind::Speed]);
    assert_eq!(game.registry().enemies().len(), 2);
}

#[test]
fn m_toggles_music() {
    let mut audio = SilentAudio::default();
    let mut game = new_game(&mut audio);

    game.handle_event(Some(key('m')), &mut audio);
    assert!(!game.music_playing());
    assert!(audio.music_paused);

    game.handle_event(Some(key('m')), &mut audio);
    assert!(game.music_playing());
    assert!(!audio.music_paused);
}

#[test]
fn unknown_spawn_index_is_refused() {
    let mut audio = SilentAudio::default();
    let mut game = new_game(&mut audio);

    let result = game.spawn_power_up_index(7);
    assert!(matches!(result, Err(GameError::UnknownSpawnIndex(7))));
    assert!(game.registry().power_ups().is_empty());
}

#[test]
fn spawned_power_ups_start_on_screen() {
    let mut audio = SilentAudio::default();
    let mut game = new_game(&mut audio);
    for _ in 0..20 {
        game.spawn_power_up(BoostKind::Armor);
    }
    let screen = game.prefabs().screen();
    for p in game.registry().power_ups() {
        let at = p.rect();
        assert!(at.x >= 0 && at.y >= 0);
        assert!(at.x <= screen.w && at.y <= screen.h);
    }
}

// ── Automatic spawning ────────────────────────────────────────────────────────

#[test]
fn power_up_spawns_every_three_seconds() {
    let mut audio = SilentAudio::default();
    let mut game = new_game(&mut audio);
    let mut input = ScriptedInput::default();
    let mut screen = Screen::default();

    step_n(&mut game, &mut input, &mut screen, &mut audio, 179);
    assert_eq!(boosts_seen(&game), 0);

    step_n(&mut game, &mut input, &mut screen, &mut audio, 1);
    assert_eq!(boosts_seen(&game), 1);
}
