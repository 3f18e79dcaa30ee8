use std::time::Duration;

use sift_common::{Settings, SettingsStore};

use crate::{Command, MusicFade};

pub const TYPEWRITER_INTERVAL: Duration = Duration::from_millis(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    ButtonClick,
    DragDrop,
    Glitch,
    Typewriter,
    Success,
    Fail,
}

impl AudioCue {
    /// Per-cue scale applied on top of the sfx and master volumes.
    pub fn volume_scale(&self) -> f32 {
        match self {
            AudioCue::ButtonClick => 0.7,
            AudioCue::DragDrop => 0.8,
            AudioCue::Typewriter => 0.3,
            AudioCue::Glitch | AudioCue::Success | AudioCue::Fail => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTrack {
    Menu,
    Gameplay,
}

/// Turns game events into playback commands according to the player's
/// settings. Setting changes are written back through the store.
pub struct AudioCueManager {
    settings: Settings,
    store: Box<dyn SettingsStore>,
    current_track: Option<MusicTrack>,
    /// Fade multiplier applied on top of the music volume.
    fade: f32,
    typewriter_playing: bool,
}

impl AudioCueManager {
    pub fn new(store: Box<dyn SettingsStore>) -> Self {
        let settings = match store.load() {
            Ok(settings) => settings.clamped(),
            Err(err) => {
                log::warn!("could not load audio settings, using defaults: {}", err);
                Settings::default()
            }
        };

        Self {
            settings,
            store,
            current_track: None,
            fade: 1.0,
            typewriter_playing: false,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn current_track(&self) -> Option<MusicTrack> {
        self.current_track
    }

    pub fn music_fade(&self) -> f32 {
        self.fade
    }

    /// Music volume as currently heard, fade included.
    pub fn music_volume(&self) -> f32 {
        self.settings.effective_music_volume() * self.fade
    }

    pub fn is_typewriter_playing(&self) -> bool {
        self.typewriter_playing
    }

    pub fn play(&self, cue: AudioCue) -> Option<Command> {
        if !self.settings.sfx_enabled {
            return None;
        }
        Some(Command::PlayCue {
            cue,
            volume: cue.volume_scale() * self.settings.effective_sfx_volume(),
        })
    }

    pub fn play_music(&mut self, track: MusicTrack) -> Option<Command> {
        if !self.settings.music_enabled || self.current_track == Some(track) {
            return None;
        }
        self.current_track = Some(track);
        Some(Command::PlayMusic {
            track,
            volume: self.music_volume(),
        })
    }

    pub fn stop_music(&mut self) -> Command {
        self.current_track = None;
        self.fade = 1.0;
        Command::StopMusic
    }

    pub fn set_music_fade(&mut self, fade: f32) -> Option<Command> {
        self.fade = fade.clamp(0.0, 1.0);
        self.live_music_volume()
    }

    pub fn start_typewriter(&mut self) -> Vec<Command> {
        let mut commands = self.stop_typewriter();
        if self.settings.sfx_enabled {
            self.typewriter_playing = true;
            commands.push(Command::StartLoop {
                cue: AudioCue::Typewriter,
                volume: AudioCue::Typewriter.volume_scale() * self.settings.effective_sfx_volume(),
                interval: TYPEWRITER_INTERVAL,
            });
        }
        commands
    }

    pub fn stop_typewriter(&mut self) -> Vec<Command> {
        if std::mem::take(&mut self.typewriter_playing) {
            vec![Command::StopLoop(AudioCue::Typewriter)]
        } else {
            Vec::new()
        }
    }

    /// Cross-fade to the gameplay track. The returned effect has to be
    /// scheduled to be heard.
    pub fn on_game_start(&self) -> MusicFade {
        MusicFade::new(MusicTrack::Gameplay)
    }

    pub fn on_menu_return(&self) -> MusicFade {
        MusicFade::new(MusicTrack::Menu)
    }

    pub fn on_question_result(&self, correct: bool) -> Option<Command> {
        self.play(if correct { AudioCue::Success } else { AudioCue::Fail })
    }

    pub fn on_game_end(&mut self, success: bool) -> Vec<Command> {
        let mut commands = self.stop_typewriter();
        commands.extend(self.on_question_result(success));
        commands
    }

    /// Returns the commands that bring playing audio to the new level.
    pub fn set_master_volume(&mut self, volume: f32) -> Vec<Command> {
        self.settings.master_volume = volume.clamp(0.0, 1.0);
        self.save();
        let mut commands: Vec<Command> = self.live_music_volume().into_iter().collect();
        commands.extend(self.live_loop_volume());
        commands
    }

    pub fn set_music_volume(&mut self, volume: f32) -> Option<Command> {
        self.settings.music_volume = volume.clamp(0.0, 1.0);
        self.save();
        self.live_music_volume()
    }

    pub fn set_sfx_volume(&mut self, volume: f32) -> Vec<Command> {
        self.settings.sfx_volume = volume.clamp(0.0, 1.0);
        self.save();
        self.live_loop_volume()
    }

    pub fn set_music_enabled(&mut self, enabled: bool) -> Option<Command> {
        self.settings.music_enabled = enabled;
        self.save();
        match (enabled, self.current_track) {
            (false, Some(_)) => Some(Command::PauseMusic),
            (true, Some(_)) => Some(Command::ResumeMusic),
            _ => None,
        }
    }

    pub fn set_sfx_enabled(&mut self, enabled: bool) -> Vec<Command> {
        self.settings.sfx_enabled = enabled;
        self.save();
        if enabled {
            Vec::new()
        } else {
            self.stop_typewriter()
        }
    }

    fn live_music_volume(&self) -> Option<Command> {
        match self.current_track {
            Some(_) if self.settings.music_enabled => {
                Some(Command::SetMusicVolume(self.music_volume()))
            }
            _ => None,
        }
    }

    /// One-shots pick up the new volume on their next play, the typewriter
    /// loop has to be restarted.
    fn live_loop_volume(&mut self) -> Vec<Command> {
        if self.typewriter_playing {
            self.start_typewriter()
        } else {
            Vec::new()
        }
    }

    fn save(&mut self) {
        if let Err(err) = self.store.save(&self.settings) {
            log::warn!("could not save audio settings: {}", err);
        }
    }
}
