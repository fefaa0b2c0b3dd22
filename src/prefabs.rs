//! Construction of every entity kind.  Assets are loaded once here and shared
//! by handle; a missing asset leaves a null handle behind and the entity is
//! still built.

use rand::RngCore;
use tracing::info;

use crate::assets::{
    music_or_missing, paths, sound_or_missing, texture_or_missing, AssetLoader, MusicHandle,
    SoundHandle, Texture,
};
use crate::audio::Audio;
use crate::components::{
    Animation, AnimationStyle, BoostIndicators, BoostSounds, Buffable, CoinCollector,
    DirectionalTextures, HealthBar, PlayerControlledMovement, RandomMovement, RangedWeapon,
    WeaponKind,
};
use crate::config::GameConfig;
use crate::entities::{BoostKind, BoostPair, Entity, EntityId, EntityKind, StatProfile};
use crate::geometry::{Point, Rect};

/// Mixer volumes the shipped game plays at.
pub const MUSIC_VOLUME: u8 = 10;
pub const GUNSHOT_VOLUME: u8 = 70;
pub const PICKUP_VOLUME: u8 = 80;

/// Sprite-sheet frames advanced per second, for every animated kind.
pub const ANIMATIONS_PER_SECOND: u32 = 5;

const PLAYER_SIZE: i32 = 80;
const ENEMY_SIZE: i32 = 80;
const PICKUP_SIZE: i32 = 40;

const PLAYER_FRAMES: i32 = 8;
const ENEMY_FRAMES: i32 = 11;
const COIN_FRAMES: i32 = 7;

pub const PLAYER_PROFILE: StatProfile = StatProfile {
    damage: BoostPair::new(5, 15),
    armor: BoostPair::new(5, 15),
    speed: BoostPair::new(2, 4),
};

pub const ENEMY_PROFILE: StatProfile = StatProfile {
    damage: BoostPair::new(5, 15),
    armor: BoostPair::new(5, 15),
    speed: BoostPair::new(1, 2),
};

#[derive(Debug)]
struct PowerUpSheet {
    texture: Texture,
    frames: i32,
}

/// Loaded assets plus the screen geometry every entity is built against.
#[derive(Debug)]
pub struct Prefabs {
    screen: Rect,
    fps: u32,
    weapon: WeaponKind,
    player_standing: DirectionalTextures,
    player_moving: DirectionalTextures,
    player_shooting: DirectionalTextures,
    enemy_standing: Texture,
    enemy_moving: DirectionalTextures,
    power_ups: [PowerUpSheet; 3],
    coin: Texture,
    bullet: Texture,
    health_bars: [Texture; 6],
    indicators: BoostIndicators,
    boost_sounds: BoostSounds,
    gunshot: SoundHandle,
    coin_sound: SoundHandle,
    pub coin_icon: Texture,
    pub music: MusicHandle,
}

fn directional(loader: &mut dyn AssetLoader, sheets: [&str; 4]) -> DirectionalTextures {
    DirectionalTextures::from_sheets(sheets.map(|path| texture_or_missing(loader, path)))
}

fn power_up_sheet(loader: &mut dyn AssetLoader, path: &str, frames: i32) -> PowerUpSheet {
    PowerUpSheet { texture: texture_or_missing(loader, path), frames }
}

impl Prefabs {
    pub fn load(loader: &mut dyn AssetLoader, config: &GameConfig) -> Self {
        let prefabs = Prefabs {
            screen: Rect::new(0, 0, config.width, config.height),
            fps: config.fps,
            weapon: config.weapon,
            player_standing: directional(loader, paths::PLAYER_STANDING),
            player_moving: directional(loader, paths::PLAYER_RUNNING),
            player_shooting: directional(loader, paths::PLAYER_SHOOTING),
            enemy_standing: texture_or_missing(loader, paths::ENEMY_STANDING),
            enemy_moving: directional(loader, paths::ENEMY_RUNNING),
            power_ups: [
                power_up_sheet(loader, paths::POWER_UP_DAMAGE, 6),
                power_up_sheet(loader, paths::POWER_UP_ARMOR, 6),
                power_up_sheet(loader, paths::POWER_UP_SPEED, 12),
            ],
            coin: texture_or_missing(loader, paths::COIN_SHEET),
            bullet: texture_or_missing(loader, paths::BULLET),
            health_bars: paths::HEALTH_BARS.map(|path| texture_or_missing(loader, path)),
            indicators: BoostIndicators {
                damage: texture_or_missing(loader, paths::INDICATOR_DAMAGE),
                armor: texture_or_missing(loader, paths::INDICATOR_ARMOR),
                speed: texture_or_missing(loader, paths::INDICATOR_SPEED),
            },
            boost_sounds: BoostSounds {
                damage: sound_or_missing(loader, paths::SOUND_DAMAGE),
                armor: sound_or_missing(loader, paths::SOUND_ARMOR),
                speed: sound_or_missing(loader, paths::SOUND_SPEED),
            },
            gunshot: sound_or_missing(loader, paths::SOUND_GUNSHOT),
            coin_sound: sound_or_missing(loader, paths::SOUND_COIN),
            coin_icon: texture_or_missing(loader, paths::COIN_ICON),
            music: music_or_missing(loader, paths::MUSIC_BACKGROUND),
        };
        info!(screen = ?prefabs.screen, fps = prefabs.fps, "assets loaded");
        prefabs
    }

    pub fn screen(&self) -> Rect {
        self.screen
    }

    /// Set the playback volume of every loaded track and effect.  Missing
    /// sounds are skipped.
    pub fn set_volumes(&self, audio: &mut dyn Audio) {
        if self.music.0.is_some() {
            audio.set_music_volume(MUSIC_VOLUME);
        }
        let effects = [
            (self.gunshot, GUNSHOT_VOLUME),
            (self.boost_sounds.damage, PICKUP_VOLUME),
            (self.boost_sounds.armor, PICKUP_VOLUME),
            (self.boost_sounds.speed, PICKUP_VOLUME),
            (self.coin_sound, PICKUP_VOLUME),
        ];
        for (sound, volume) in effects.into_iter().filter(|(s, _)| s.0.is_some()) {
            audio.set_sound_volume(sound, volume);
        }
    }

    fn animation(&self, style: AnimationStyle) -> Animation {
        Animation::new(style, self.fps, ANIMATIONS_PER_SECOND)
    }

    /// The player, centred on screen.
    pub fn player(&self, id: EntityId) -> Entity {
        let mut player = Entity::new(
            id,
            EntityKind::Player,
            Rect::new(0, 0, PLAYER_SIZE, PLAYER_SIZE),
            self.player_standing.up,
            PLAYER_FRAMES,
            self.screen,
        )
        .with_stats(PLAYER_PROFILE.base_stats())
        .with_component(PlayerControlledMovement.into())
        .with_component(
            self.animation(AnimationStyle::Player {
                standing: self.player_standing,
                moving: self.player_moving,
                shooting: self.player_shooting,
            })
            .into(),
        )
        .with_component(Buffable::new(PLAYER_PROFILE, self.indicators, self.boost_sounds).into())
        .with_component(RangedWeapon::new(self.weapon, self.bullet, self.gunshot).into())
        .with_component(HealthBar::new(self.health_bars).into())
        .with_component(CoinCollector::new(self.coin_sound).into());
        player.center_on_screen();
        player
    }

    /// An enemy at `(x, y)`.
    pub fn enemy_at(&self, id: EntityId, x: i32, y: i32) -> Entity {
        Entity::new(
            id,
            EntityKind::Enemy,
            Rect::new(x, y, ENEMY_SIZE, ENEMY_SIZE),
            self.enemy_standing,
            ENEMY_FRAMES,
            self.screen,
        )
        .with_stats(ENEMY_PROFILE.base_stats())
        .with_component(RandomMovement::default().into())
        .with_component(self.animation(AnimationStyle::Enemy { moving: self.enemy_moving }).into())
        .with_component(Buffable::new(ENEMY_PROFILE, self.indicators, self.boost_sounds).into())
        .with_component(HealthBar::new(self.health_bars).into())
    }

    /// An enemy somewhere on screen.
    pub fn enemy(&self, id: EntityId, rng: &mut dyn RngCore) -> Entity {
        let mut enemy = self.enemy_at(id, 50, 50);
        enemy.randomize_position(rng);
        enemy
    }

    pub fn power_up_at(&self, id: EntityId, kind: BoostKind, x: i32, y: i32) -> Entity {
        let sheet = &self.power_ups[kind as usize];
        Entity::new(
            id,
            EntityKind::PowerUp(kind),
            Rect::new(x, y, PICKUP_SIZE, PICKUP_SIZE),
            sheet.texture,
            sheet.frames,
            self.screen,
        )
        .with_component(self.animation(AnimationStyle::Looping).into())
    }

    /// A power-up somewhere on screen.
    pub fn power_up(&self, id: EntityId, kind: BoostKind, rng: &mut dyn RngCore) -> Entity {
        let mut power_up = self.power_up_at(id, kind, 0, 0);
        power_up.randomize_position(rng);
        power_up
    }

    pub fn coin(&self, id: EntityId, at: Point) -> Entity {
        Entity::new(
            id,
            EntityKind::Coin,
            Rect::new(at.x, at.y, PICKUP_SIZE, PICKUP_SIZE),
            self.coin,
            COIN_FRAMES,
            self.screen,
        )
        .with_component(self.animation(AnimationStyle::Looping).into())
    }

    /// The coin a defeated enemy leaves behind.
    pub fn coin_drop(&self, id: EntityId, enemy: &Entity) -> Entity {
        let at = enemy.rect();
        self.coin(id, Point::new(at.x + 20, at.y + at.h / 2))
    }
}
