//! Opaque asset handles and the loader collaborator.
//!
//! A failed load is logged and becomes a *missing* handle; drawing or playing
//! a missing handle does nothing, so a lost sprite never stops the game.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::error::AssetError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// A loaded texture and its pixel size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Texture {
    pub id: Option<TextureId>,
    pub width: i32,
    pub height: i32,
}

impl Texture {
    pub const MISSING: Texture = Texture { id: None, width: 0, height: 0 };

    pub fn is_missing(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub Option<u32>);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MusicHandle(pub Option<u32>);

pub trait AssetLoader {
    fn load_texture(&mut self, path: &str) -> Result<Texture, AssetError>;
    fn load_sound(&mut self, path: &str) -> Result<SoundHandle, AssetError>;
    fn load_music(&mut self, path: &str) -> Result<MusicHandle, AssetError>;
}

pub fn texture_or_missing(loader: &mut dyn AssetLoader, path: &str) -> Texture {
    loader.load_texture(path).unwrap_or_else(|err| {
        warn!(%err, "texture unavailable, drawing will be skipped");
        Texture::MISSING
    })
}

pub fn sound_or_missing(loader: &mut dyn AssetLoader, path: &str) -> SoundHandle {
    loader.load_sound(path).unwrap_or_else(|err| {
        warn!(%err, "sound unavailable, playback will be skipped");
        SoundHandle(None)
    })
}

pub fn music_or_missing(loader: &mut dyn AssetLoader, path: &str) -> MusicHandle {
    loader.load_music(path).unwrap_or_else(|err| {
        warn!(%err, "music unavailable, playback will be skipped");
        MusicHandle(None)
    })
}

/// Asset paths used by the game.
pub mod paths {
    pub const PLAYER_STANDING: [&str; 4] = [
        "res/sprites/player/up/standing/standing.png",
        "res/sprites/player/down/standing/standing.png",
        "res/sprites/player/side/standing/standing.png",
        "res/sprites/player/side/standing/standing.png",
    ];
    pub const PLAYER_RUNNING: [&str; 4] = [
        "res/sprites/player/up/running/running.png",
        "res/sprites/player/down/running/running.png",
        "res/sprites/player/side/running/running.png",
        "res/sprites/player/side/running/running.png",
    ];
    pub const PLAYER_SHOOTING: [&str; 4] = [
        "res/sprites/player/up/shooting/shooting.png",
        "res/sprites/player/down/shooting/shooting.png",
        "res/sprites/player/side/shooting/shooting.png",
        "res/sprites/player/side/shooting/shooting.png",
    ];
    /// Enemies start on this sheet and switch to their running sheets on the
    /// first update.
    pub const ENEMY_STANDING: &str = "res/sprites/catcus/up/standing/standing.png";
    pub const ENEMY_RUNNING: [&str; 4] = [
        "res/sprites/catcus/up/running/running.png",
        "res/sprites/catcus/down/running/running.png",
        "res/sprites/catcus/side/running/running.png",
        "res/sprites/catcus/side/running/running.png",
    ];
    pub const POWER_UP_DAMAGE: &str = "res/sprites/power-up/damage/base/base.png";
    pub const POWER_UP_ARMOR: &str = "res/sprites/power-up/armor/base/base.png";
    pub const POWER_UP_SPEED: &str = "res/sprites/power-up/speed/base/base.png";
    pub const INDICATOR_DAMAGE: &str = "res/sprites/power-up/damage/base/static.png";
    pub const INDICATOR_ARMOR: &str = "res/sprites/power-up/armor/base/static.png";
    pub const INDICATOR_SPEED: &str = "res/sprites/power-up/speed/base/static.png";
    pub const COIN_SHEET: &str = "res/sprites/coin/coinAnimation.png";
    pub const COIN_ICON: &str = "res/sprites/coin/coin.png";
    pub const BULLET: &str = "res/sprites/bullet/normal_bullet.png";
    pub const HEALTH_BARS: [&str; 6] = [
        "res/sprites/healthbar/healthbar1.png",
        "res/sprites/healthbar/healthbar2.png",
        "res/sprites/healthbar/healthbar3.png",
        "res/sprites/healthbar/healthbar4.png",
        "res/sprites/healthbar/healthbar5.png",
        "res/sprites/healthbar/healthbar6.png",
    ];

    pub const SOUND_GUNSHOT: &str = "audio/gunshot.wav";
    pub const SOUND_DAMAGE: &str = "audio/damage.wav";
    pub const SOUND_ARMOR: &str = "audio/armor.wav";
    pub const SOUND_SPEED: &str = "audio/speed.wav";
    pub const SOUND_COIN: &str = "audio/coin.wav";
    pub const MUSIC_BACKGROUND: &str = "audio/background.wav";
}

/// In-memory asset catalogue: knows the size of every texture it can serve
/// and hands out sequential ids.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    textures: HashMap<String, (i32, i32)>,
    sounds: HashSet<String>,
    issued: HashMap<TextureId, String>,
    next_id: u32,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_texture(mut self, path: &str, width: i32, height: i32) -> Self {
        self.textures.insert(path.to_string(), (width, height));
        self
    }

    pub fn with_sound(mut self, path: &str) -> Self {
        self.sounds.insert(path.to_string());
        self
    }

    /// The catalogue of every sprite sheet and sound the game ships with.
    /// Frames are 32 px square; sheet width is frames × 32.
    pub fn with_builtin_assets() -> Self {
        const FRAME: i32 = 32;
        let mut loader = Self::new();
        let sheets: [(&[&str], i32); 10] = [
            (&paths::PLAYER_STANDING, 8),
            (&paths::PLAYER_RUNNING, 8),
            (&paths::PLAYER_SHOOTING, 8),
            (&[paths::ENEMY_STANDING], 11),
            (&paths::ENEMY_RUNNING, 11),
            (&[paths::POWER_UP_DAMAGE], 6),
            (&[paths::POWER_UP_ARMOR], 6),
            (&[paths::POWER_UP_SPEED], 12),
            (&[paths::COIN_SHEET], 7),
            (
                &[
                    paths::INDICATOR_DAMAGE,
                    paths::INDICATOR_ARMOR,
                    paths::INDICATOR_SPEED,
                    paths::COIN_ICON,
                ],
                1,
            ),
        ];
        for (group, frames) in sheets {
            for path in group {
                loader = loader.with_texture(path, FRAME * frames, FRAME);
            }
        }
        for path in paths::HEALTH_BARS {
            loader = loader.with_texture(path, 30, 10);
        }
        loader = loader.with_texture(paths::BULLET, 7, 7);
        for path in [
            paths::SOUND_GUNSHOT,
            paths::SOUND_DAMAGE,
            paths::SOUND_ARMOR,
            paths::SOUND_SPEED,
            paths::SOUND_COIN,
            paths::MUSIC_BACKGROUND,
        ] {
            loader = loader.with_sound(path);
        }
        loader
    }

    /// Path a texture id was issued for.
    pub fn texture_path(&self, id: TextureId) -> Option<&str> {
        self.issued.get(&id).map(String::as_str)
    }

    pub fn issued_textures(&self) -> impl Iterator<Item = (TextureId, &str)> {
        self.issued.iter().map(|(id, path)| (*id, path.as_str()))
    }

    fn issue(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

impl AssetLoader for MemoryLoader {
    fn load_texture(&mut self, path: &str) -> Result<Texture, AssetError> {
        let (width, height) = *self.textures.get(path).ok_or_else(|| AssetError::NotFound {
            path: path.to_string(),
        })?;
        let id = TextureId(self.issue());
        self.issued.insert(id, path.to_string());
        Ok(Texture { id: Some(id), width, height })
    }

    fn load_sound(&mut self, path: &str) -> Result<SoundHandle, AssetError> {
        if !self.sounds.contains(path) {
            return Err(AssetError::NotFound { path: path.to_string() });
        }
        Ok(SoundHandle(Some(self.issue())))
    }

    fn load_music(&mut self, path: &str) -> Result<MusicHandle, AssetError> {
        if !self.sounds.contains(path) {
            return Err(AssetError::NotFound { path: path.to_string() });
        }
        Ok(MusicHandle(Some(self.issue())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_texture_falls_back_to_null_handle() {
        let mut loader = MemoryLoader::new();
        let tex = texture_or_missing(&mut loader, "nope.png");
        assert!(tex.is_missing());
        assert_eq!(tex.width, 0);
    }

    #[test]
    fn builtin_catalogue_sizes_sheets_by_frame_count() {
        let mut loader = MemoryLoader::with_builtin_assets();
        let player = loader.load_texture(paths::PLAYER_STANDING[0]).unwrap();
        assert_eq!((player.width, player.height), (256, 32));
        let coin = loader.load_texture(paths::COIN_SHEET).unwrap();
        assert_eq!(coin.width, 7 * 32);
        assert_eq!(loader.texture_path(coin.id.unwrap()), Some(paths::COIN_SHEET));
    }

    #[test]
    fn unknown_sound_is_an_error() {
        let mut loader = MemoryLoader::new();
        assert_eq!(
            loader.load_sound("audio/missing.wav"),
            Err(AssetError::NotFound { path: "audio/missing.wav".into() })
        );
        assert_eq!(sound_or_missing(&mut loader, "audio/missing.wav"), SoundHandle(None));
    }
}
