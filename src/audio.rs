//! Audio collaborator.  Volumes use the 0..=128 mixer scale.

use std::collections::HashMap;

use tracing::debug;

use crate::assets::{MusicHandle, SoundHandle};

pub trait Audio {
    fn play_sound(&mut self, sound: SoundHandle);
    /// Start a looping music track.
    fn play_music(&mut self, music: MusicHandle);
    fn pause_music(&mut self);
    fn resume_music(&mut self);
    fn set_music_volume(&mut self, volume: u8);
    /// Volume for every later playback of `sound`.
    fn set_sound_volume(&mut self, sound: SoundHandle, volume: u8);
}

pub const MAX_VOLUME: u8 = 128;

/// Audio sink with no device behind it.  Tracks what would have been heard.
#[derive(Debug, Default)]
pub struct SilentAudio {
    pub sounds_played: u64,
    pub last_sound: Option<SoundHandle>,
    pub music: Option<MusicHandle>,
    pub music_paused: bool,
    pub music_volume: Option<u8>,
    pub sound_volumes: HashMap<SoundHandle, u8>,
}

impl Audio for SilentAudio {
    fn play_sound(&mut self, sound: SoundHandle) {
        debug!(?sound, "play sound");
        self.sounds_played += 1;
        self.last_sound = Some(sound);
    }

    fn play_music(&mut self, music: MusicHandle) {
        debug!(?music, "play music");
        self.music = Some(music);
        self.music_paused = false;
    }

    fn pause_music(&mut self) {
        self.music_paused = true;
    }

    fn resume_music(&mut self) {
        self.music_paused = false;
    }

    fn set_music_volume(&mut self, volume: u8) {
        self.music_volume = Some(volume.min(MAX_VOLUME));
    }

    fn set_sound_volume(&mut self, sound: SoundHandle, volume: u8) {
        debug!(?sound, volume, "sound volume");
        self.sound_volumes.insert(sound, volume.min(MAX_VOLUME));
    }
}
