mod display;

use std::collections::{HashMap, VecDeque};
use std::fs::File;
use std::io::{stdout, BufWriter};
use std::sync::{mpsc, Mutex};
use std::thread;

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use catcus_arena::assets::MemoryLoader;
use catcus_arena::audio::SilentAudio;
use catcus_arena::config::GameConfig;
use catcus_arena::error::GameError;
use catcus_arena::game::{Game, Io};
use catcus_arena::geometry::Point;
use catcus_arena::input::{InputEvent, InputSource, Key};

use display::{Palette, TerminalSurface, Viewport};

/// A key counts as held while its last press/repeat event arrived within this
/// many frames.  Only used on terminals that never report key releases; the
/// OS key-repeat rate is well above 60 / HOLD_WINDOW Hz, so a key that is
/// actively repeating never expires.
const HOLD_WINDOW: u64 = 8;

// ── Terminal input ────────────────────────────────────────────────────────────

/// Turns raw terminal events into game input.
///
/// Events are drained from the reader thread's channel every frame and queued;
/// the game takes at most one per frame.  Classic terminals only send key
/// presses (OS key-repeat shows up as repeated presses), so a release is
/// synthesised once a key has been silent for `HOLD_WINDOW` frames.  As soon
/// as the terminal reports a real release the synthesis is switched off.
struct TerminalInput {
    rx: mpsc::Receiver<Event>,
    viewport: Viewport,
    pointer: Point,
    pending: VecDeque<InputEvent>,
    key_frame: HashMap<Key, u64>,
    frame: u64,
    reports_releases: bool,
}

impl TerminalInput {
    fn new(rx: mpsc::Receiver<Event>, viewport: Viewport) -> Self {
        Self {
            rx,
            viewport,
            pointer: Point::default(),
            pending: VecDeque::new(),
            key_frame: HashMap::new(),
            frame: 0,
            reports_releases: false,
        }
    }

    fn on_key(&mut self, KeyEvent { code, kind, modifiers, .. }: KeyEvent) {
        let quit = matches!(code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
            || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL));
        if quit && kind == KeyEventKind::Press {
            self.pending.push_back(InputEvent::Quit);
            return;
        }

        let key = map_key(code);
        match kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                // Repeats only refresh the hold timestamp.
                if self.key_frame.insert(key, self.frame).is_none() {
                    self.pending.push_back(InputEvent::KeyDown(key));
                }
            }
            KeyEventKind::Release => {
                self.reports_releases = true;
                if self.key_frame.remove(&key).is_some() {
                    self.pending.push_back(InputEvent::KeyUp(key));
                }
            }
        }
    }

    fn on_mouse(&mut self, MouseEvent { kind, column, row, .. }: MouseEvent) {
        self.pointer = self.viewport.to_world(column, row);
        if let MouseEventKind::Down(_) = kind {
            self.pending.push_back(InputEvent::MouseDown);
        }
    }

    fn expire_silent_keys(&mut self) {
        if self.reports_releases {
            return;
        }
        let frame = self.frame;
        let mut expired: Vec<Key> = self
            .key_frame
            .iter()
            .filter(|&(_, &last)| frame.saturating_sub(last) > HOLD_WINDOW)
            .map(|(key, _)| *key)
            .collect();
        expired.sort_by_key(|key| format!("{key:?}"));
        for key in expired {
            self.key_frame.remove(&key);
            self.pending.push_back(InputEvent::KeyUp(key));
        }
    }
}

fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::Char(c) => Key::Char(c.to_ascii_lowercase()),
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Esc => Key::Escape,
        _ => Key::Other,
    }
}

impl InputSource for TerminalInput {
    fn poll_event(&mut self) -> Option<InputEvent> {
        self.frame += 1;
        while let Ok(ev) = self.rx.try_recv() {
            match ev {
                Event::Key(key) => self.on_key(key),
                Event::Mouse(mouse) => self.on_mouse(mouse),
                Event::Resize(cols, rows) => debug!(cols, rows, "terminal resized"),
                _ => {}
            }
        }
        self.expire_silent_keys();
        self.pending.pop_front()
    }

    fn pointer(&self) -> Point {
        self.pointer
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// Log to a file; stdout is the game screen.
fn init_logging(config: &GameConfig) -> Result<(), GameError> {
    let file = File::create(&config.log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), GameError> {
    let config = GameConfig::from_env();
    init_logging(&config)?;

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to HOLD_WINDOW.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, rx, config);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(err) = &result {
        error!(%err, "game aborted");
    }
    result
}

fn run(
    out: &mut BufWriter<std::io::Stdout>,
    rx: mpsc::Receiver<Event>,
    config: GameConfig,
) -> Result<(), GameError> {
    let (cols, rows) = terminal::size()?;
    let viewport = Viewport::new(config.width, config.height, cols, rows);
    info!(cols, rows, "terminal ready");

    let mut loader = MemoryLoader::with_builtin_assets();
    let mut audio = SilentAudio::default();
    let mut game = Game::new(config, &mut loader, StdRng::from_entropy(), &mut audio)?;

    let mut surface = TerminalSurface::new(out, viewport, Palette::from_catalogue(&loader));
    let mut input = TerminalInput::new(rx, viewport);
    let mut io = Io {
        input: &mut input,
        surface: &mut surface,
        audio: &mut audio,
    };
    game.run(&mut io)
}
