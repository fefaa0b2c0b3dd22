//! Terminal rendering: the world is drawn into a grid of coloured glyphs.
//!
//! World rects (pixels) are scaled onto terminal cells by [`Viewport`]; each
//! texture is shown as one glyph picked from its asset path by [`Palette`].
//! No game logic lives here.

use std::collections::HashMap;
use std::io::Write;
use std::ops::Range;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use catcus_arena::assets::{paths, MemoryLoader, TextureId};
use catcus_arena::geometry::{Point, Rect};
use catcus_arena::render::{Flip, Sprite, Surface};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_DAMAGE: Color = Color::Red;
const C_ARMOR: Color = Color::Blue;
const C_SPEED: Color = Color::Cyan;
const C_COIN: Color = Color::Yellow;
const C_BULLET: Color = Color::Magenta;
const C_TEXT: Color = Color::Yellow;
const C_UNKNOWN: Color = Color::DarkGrey;

/// Health bar colours from empty to full.
const C_HEALTH: [Color; 6] = [
    Color::DarkRed,
    Color::Red,
    Color::DarkYellow,
    Color::Yellow,
    Color::DarkGreen,
    Color::Green,
];

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Maps between world pixels and terminal cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    world_w: i32,
    world_h: i32,
    cols: u16,
    rows: u16,
}

impl Viewport {
    pub fn new(world_w: i32, world_h: i32, cols: u16, rows: u16) -> Self {
        Self {
            world_w: world_w.max(1),
            world_h: world_h.max(1),
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    fn scale(value: i32, from: i32, to: u16) -> i64 {
        i64::from(value) * i64::from(to) / i64::from(from)
    }

    /// Cells covered by `rect`, clipped to the terminal.  Anything visible
    /// covers at least one cell.  `None` when fully off screen.
    pub fn cells(&self, rect: Rect) -> Option<(Range<u16>, Range<u16>)> {
        let span = |start: i32, end: i32, from: i32, to: u16| -> Option<Range<u16>> {
            let first = Self::scale(start, from, to);
            let last = Self::scale(end, from, to).max(first + 1);
            let first = first.clamp(0, i64::from(to));
            let last = last.clamp(0, i64::from(to));
            (first < last).then(|| first as u16..last as u16)
        };
        let cols = span(rect.x, rect.right(), self.world_w, self.cols)?;
        let rows = span(rect.y, rect.bottom(), self.world_h, self.rows)?;
        Some((cols, rows))
    }

    /// World position at the centre of a cell.
    pub fn to_world(&self, col: u16, row: u16) -> Point {
        let x = (2 * i64::from(col) + 1) * i64::from(self.world_w) / (2 * i64::from(self.cols));
        let y = (2 * i64::from(row) + 1) * i64::from(self.world_h) / (2 * i64::from(self.rows));
        Point::new(x as i32, y as i32)
    }
}

// ── Glyphs ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub color: Color,
}

impl Glyph {
    const fn new(ch: char, color: Color) -> Self {
        Self { ch, color }
    }

    fn flipped(self, flip: Flip) -> Self {
        match (flip, self.ch) {
            (Flip::Horizontal, '>') => Glyph::new('<', self.color),
            (Flip::Horizontal, '<') => Glyph::new('>', self.color),
            _ => self,
        }
    }
}

/// Glyph for each texture id the loader has issued.
#[derive(Debug, Default)]
pub struct Palette {
    glyphs: HashMap<TextureId, Glyph>,
}

impl Palette {
    pub fn from_catalogue(loader: &MemoryLoader) -> Self {
        let glyphs = loader
            .issued_textures()
            .map(|(id, path)| (id, glyph_for(path)))
            .collect();
        Self { glyphs }
    }

    pub fn get(&self, id: TextureId) -> Glyph {
        self.glyphs
            .get(&id)
            .copied()
            .unwrap_or(Glyph::new('?', C_UNKNOWN))
    }
}

fn glyph_for(path: &str) -> Glyph {
    if let Some(tier) = paths::HEALTH_BARS.iter().position(|p| *p == path) {
        return Glyph::new('=', C_HEALTH[tier]);
    }
    let facing = if path.contains("/side/") { '>' } else { '^' };
    match path {
        p if p.starts_with("res/sprites/player/") => Glyph::new(facing, C_PLAYER),
        p if p.starts_with("res/sprites/catcus/") => Glyph::new('C', C_ENEMY),
        p if p.contains("/damage/") => Glyph::new('!', C_DAMAGE),
        p if p.contains("/armor/") => Glyph::new('#', C_ARMOR),
        p if p.contains("/speed/") => Glyph::new('*', C_SPEED),
        p if p.starts_with("res/sprites/coin/") => Glyph::new('$', C_COIN),
        p if p.starts_with("res/sprites/bullet/") => Glyph::new('o', C_BULLET),
        _ => Glyph::new('?', C_UNKNOWN),
    }
}

// ── Surface ───────────────────────────────────────────────────────────────────

/// A [`Surface`] that buffers one frame of glyphs and writes it on `present`.
pub struct TerminalSurface<W: Write> {
    out: W,
    viewport: Viewport,
    palette: Palette,
    cells: Vec<Option<Glyph>>,
    texts: Vec<(u16, u16, String)>,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, viewport: Viewport, palette: Palette) -> Self {
        let size = usize::from(viewport.cols()) * usize::from(viewport.rows());
        Self {
            out,
            viewport,
            palette,
            cells: vec![None; size],
            texts: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn glyph_at(&self, col: u16, row: u16) -> Option<Glyph> {
        self.cells
            .get(usize::from(row) * usize::from(self.viewport.cols()) + usize::from(col))
            .copied()
            .flatten()
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn draw(&mut self, sprite: &Sprite) {
        let Some(id) = sprite.texture.id else { return };
        let Some((cols, rows)) = self.viewport.cells(sprite.dest) else { return };
        let glyph = self.palette.get(id).flipped(sprite.flip);
        let stride = usize::from(self.viewport.cols());
        for row in rows {
            for col in cols.clone() {
                self.cells[usize::from(row) * stride + usize::from(col)] = Some(glyph);
            }
        }
    }

    fn draw_text(&mut self, text: &str, dest: Rect) {
        if let Some((cols, rows)) = self.viewport.cells(dest) {
            self.texts.push((cols.start, rows.start, text.to_string()));
        }
    }

    fn clear(&mut self) {
        self.cells.fill(None);
        self.texts.clear();
    }

    fn present(&mut self) -> std::io::Result<()> {
        let out = &mut self.out;
        out.queue(terminal::Clear(terminal::ClearType::All))?;

        let cols = self.viewport.cols();
        for (index, cell) in self.cells.iter().enumerate() {
            let Some(glyph) = cell else { continue };
            let col = (index % usize::from(cols)) as u16;
            let row = (index / usize::from(cols)) as u16;
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(style::SetForegroundColor(glyph.color))?;
            out.queue(Print(glyph.ch))?;
        }

        out.queue(style::SetForegroundColor(C_TEXT))?;
        for (col, row, text) in &self.texts {
            out.queue(cursor::MoveTo(*col, *row))?;
            out.queue(Print(text))?;
        }

        out.queue(style::ResetColor)?;
        out.queue(cursor::MoveTo(0, self.viewport.rows().saturating_sub(1)))?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catcus_arena::assets::{AssetLoader, Texture};

    fn viewport() -> Viewport {
        // 10 px per column, 20 px per row.
        Viewport::new(800, 600, 80, 30)
    }

    #[test]
    fn rects_scale_to_cells() {
        let (cols, rows) = viewport().cells(Rect::new(360, 260, 80, 80)).unwrap();
        assert_eq!(cols, 36..44);
        assert_eq!(rows, 13..17);
    }

    #[test]
    fn tiny_rects_still_cover_a_cell() {
        let (cols, rows) = viewport().cells(Rect::new(395, 295, 7, 7)).unwrap();
        assert_eq!(cols.len(), 1);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn off_screen_rects_are_skipped() {
        assert!(viewport().cells(Rect::new(900, 10, 10, 10)).is_none());
        assert!(viewport().cells(Rect::new(-50, 10, 20, 10)).is_none());
    }

    #[test]
    fn cell_centres_map_back_into_the_world() {
        assert_eq!(viewport().to_world(0, 0), Point::new(5, 10));
        assert_eq!(viewport().to_world(60, 15), Point::new(605, 310));
    }

    #[test]
    fn palette_follows_asset_paths() {
        let mut loader = MemoryLoader::with_builtin_assets();
        let coin = loader.load_texture(paths::COIN_SHEET).unwrap();
        let bar = loader.load_texture(paths::HEALTH_BARS[5]).unwrap();
        let palette = Palette::from_catalogue(&loader);
        assert_eq!(palette.get(coin.id.unwrap()).ch, '$');
        assert_eq!(palette.get(bar.id.unwrap()), Glyph::new('=', Color::Green));
    }

    #[test]
    fn present_writes_and_clear_resets() {
        let mut loader = MemoryLoader::with_builtin_assets();
        let coin: Texture = loader.load_texture(paths::COIN_SHEET).unwrap();
        let palette = Palette::from_catalogue(&loader);
        let mut surface = TerminalSurface::new(Vec::new(), viewport(), palette);

        surface.draw(&Sprite::whole(coin, Rect::new(100, 100, 40, 40)));
        surface.draw_text("3", Rect::new(50, 540, 30, 50));
        assert_eq!(surface.glyph_at(10, 5).map(|g| g.ch), Some('$'));

        surface.present().unwrap();
        assert!(!surface.out.is_empty());
        assert!(String::from_utf8_lossy(&surface.out).contains('3'));

        surface.clear();
        assert_eq!(surface.glyph_at(10, 5), None);
    }
}
