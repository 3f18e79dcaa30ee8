use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::{AudioCue, AudioCueManager, Command, Element, MusicTrack, Position, TextField};

pub const TYPEWRITER_CHAR_DELAY: Duration = Duration::from_millis(30);
pub const GLITCH_DURATION: Duration = Duration::from_secs(2);
pub const GLITCH_FRAME: Duration = Duration::from_millis(50);
const GLITCH_OFFSET: f32 = 10.0;
const GLITCH_MIN_SCALE: f32 = 0.95;
const GLITCH_MAX_SCALE: f32 = 1.05;
pub const MUSIC_FADE_OUT: Duration = Duration::from_millis(500);
pub const MUSIC_SWITCH_DELAY: Duration = Duration::from_millis(700);
pub const MUSIC_FADE_IN: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Typewriter,
    Glitch,
    MusicFade,
}

impl EffectKind {
    /// Panel effects end when their panel is left, music keeps going.
    pub fn is_panel_bound(&self) -> bool {
        !matches!(self, EffectKind::MusicFade)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectStatus {
    Running,
    Finished,
}

/// Where effects write their output.
pub struct EffectContext<'a> {
    pub commands: &'a mut Vec<Command>,
    pub audio: &'a mut AudioCueManager,
}

impl EffectContext<'_> {
    pub fn emit(&mut self, command: Command) {
        self.commands.push(command);
    }
}

/// A timed effect advanced once per tick.
pub trait Effect {
    fn kind(&self) -> EffectKind;

    /// Called once when the scheduler takes the effect.
    fn begin(&mut self, _ctx: &mut EffectContext) {}

    fn step(&mut self, elapsed: Duration, ctx: &mut EffectContext) -> EffectStatus;

    /// Stops early, leaving whatever was already shown.
    fn cancel(&mut self, ctx: &mut EffectContext);

    /// Jumps to the final frame.
    fn finish(&mut self, ctx: &mut EffectContext);
}

/// Runs at most one effect of each kind.
#[derive(Default)]
pub struct EffectScheduler {
    effects: Vec<Box<dyn Effect>>,
}

impl EffectScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, mut effect: Box<dyn Effect>, ctx: &mut EffectContext) {
        let kind = effect.kind();
        if let Some(index) = self.effects.iter().position(|e| e.kind() == kind) {
            log::debug!("replacing running {:?} effect", kind);
            let mut previous = self.effects.remove(index);
            previous.cancel(ctx);
        }

        effect.begin(ctx);
        if effect.step(Duration::ZERO, ctx) == EffectStatus::Running {
            self.effects.push(effect);
        }
    }

    pub fn tick(&mut self, elapsed: Duration, ctx: &mut EffectContext) {
        self.effects
            .retain_mut(|effect| effect.step(elapsed, ctx) == EffectStatus::Running);
    }

    pub fn finish_all(&mut self, ctx: &mut EffectContext) {
        for mut effect in self.effects.drain(..) {
            effect.finish(ctx);
        }
    }

    pub fn cancel_all(&mut self, ctx: &mut EffectContext) {
        for mut effect in self.effects.drain(..) {
            effect.cancel(ctx);
        }
    }

    pub fn cancel_panel_effects(&mut self, ctx: &mut EffectContext) {
        let (panel, other): (Vec<_>, Vec<_>) = std::mem::take(&mut self.effects)
            .into_iter()
            .partition(|effect| effect.kind().is_panel_bound());
        self.effects = other;
        for mut effect in panel {
            effect.cancel(ctx);
        }
    }

    #[cfg(test)]
    pub fn is_running(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|effect| effect.kind() == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

/// Every growing prefix of `message`, one character at a time.
pub fn typewriter_frames(message: &str) -> impl Iterator<Item = &str> + '_ {
    message
        .char_indices()
        .map(move |(index, c)| &message[..index + c.len_utf8()])
}

fn char_prefix(message: &str, count: usize) -> &str {
    match message.char_indices().nth(count) {
        Some((index, _)) => &message[..index],
        None => message,
    }
}

/// Reveals a text field character by character.
#[derive(Debug, Clone)]
pub struct Typewriter {
    field: TextField,
    message: String,
    total: usize,
    shown: usize,
    elapsed: Duration,
}

impl Typewriter {
    pub fn new<A: Into<String>>(field: TextField, message: A) -> Self {
        let message = message.into();
        Self {
            field,
            total: message.chars().count(),
            message,
            shown: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn field(&self) -> TextField {
        self.field
    }

    fn show(&mut self, count: usize, ctx: &mut EffectContext) {
        self.shown = count;
        ctx.emit(Command::SetText {
            field: self.field,
            text: char_prefix(&self.message, count).to_string(),
        });
    }

    fn stop_sound(&self, ctx: &mut EffectContext) {
        let commands = ctx.audio.stop_typewriter();
        ctx.commands.extend(commands);
    }
}

impl Effect for Typewriter {
    fn kind(&self) -> EffectKind {
        EffectKind::Typewriter
    }

    fn begin(&mut self, ctx: &mut EffectContext) {
        self.show(0, ctx);
        if self.total > 0 {
            let commands = ctx.audio.start_typewriter();
            ctx.commands.extend(commands);
        }
    }

    fn step(&mut self, elapsed: Duration, ctx: &mut EffectContext) -> EffectStatus {
        if self.total == 0 {
            return EffectStatus::Finished;
        }

        self.elapsed += elapsed;
        let due = (self.elapsed.as_millis() / TYPEWRITER_CHAR_DELAY.as_millis()) as usize + 1;
        let target = due.min(self.total);
        if target > self.shown {
            self.show(target, ctx);
        }

        if self.shown == self.total {
            self.stop_sound(ctx);
            EffectStatus::Finished
        } else {
            EffectStatus::Running
        }
    }

    fn cancel(&mut self, ctx: &mut EffectContext) {
        self.stop_sound(ctx);
    }

    fn finish(&mut self, ctx: &mut EffectContext) {
        if self.shown < self.total {
            self.show(self.total, ctx);
        }
        self.stop_sound(ctx);
    }
}

/// Shakes the instruction panel behind a glitch overlay for a couple of
/// seconds.
#[derive(Debug, Clone)]
pub struct Glitch {
    rng: Pcg32,
    elapsed: Duration,
    next_frame: Duration,
}

impl Glitch {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            elapsed: Duration::ZERO,
            next_frame: Duration::ZERO,
        }
    }

    fn restore(&self, ctx: &mut EffectContext) {
        ctx.emit(Command::GlitchFrame {
            offset: Position::default(),
            scale: 1.0,
        });
        ctx.emit(Command::SetElementVisible {
            element: Element::GlitchScreen,
            visible: false,
        });
    }
}

impl Effect for Glitch {
    fn kind(&self) -> EffectKind {
        EffectKind::Glitch
    }

    fn begin(&mut self, ctx: &mut EffectContext) {
        ctx.emit(Command::SetElementVisible {
            element: Element::GlitchScreen,
            visible: true,
        });
        if let Some(cue) = ctx.audio.play(AudioCue::Glitch) {
            ctx.emit(cue);
        }
    }

    fn step(&mut self, elapsed: Duration, ctx: &mut EffectContext) -> EffectStatus {
        self.elapsed += elapsed;
        if self.elapsed >= GLITCH_DURATION {
            self.restore(ctx);
            return EffectStatus::Finished;
        }

        if self.elapsed >= self.next_frame {
            while self.next_frame <= self.elapsed {
                self.next_frame += GLITCH_FRAME;
            }
            let offset = Position::new(
                self.rng.gen_range(-GLITCH_OFFSET..=GLITCH_OFFSET),
                self.rng.gen_range(-GLITCH_OFFSET..=GLITCH_OFFSET),
            );
            let scale = self.rng.gen_range(GLITCH_MIN_SCALE..=GLITCH_MAX_SCALE);
            ctx.emit(Command::GlitchFrame { offset, scale });
        }

        EffectStatus::Running
    }

    fn cancel(&mut self, ctx: &mut EffectContext) {
        self.restore(ctx);
    }

    fn finish(&mut self, ctx: &mut EffectContext) {
        self.restore(ctx);
    }
}

/// Fades the playing track out, stops it, and after a short pause fades
/// the next track in.
#[derive(Debug, Clone)]
pub struct MusicFade {
    track: MusicTrack,
    start_fade: f32,
    elapsed: Duration,
    stopped: bool,
    started: bool,
}

impl MusicFade {
    pub fn new(track: MusicTrack) -> Self {
        Self {
            track,
            start_fade: 1.0,
            elapsed: Duration::ZERO,
            stopped: false,
            started: false,
        }
    }

    fn fade(&self, fade: f32, ctx: &mut EffectContext) {
        if let Some(command) = ctx.audio.set_music_fade(fade) {
            ctx.emit(command);
        }
    }

    fn stop_previous(&mut self, ctx: &mut EffectContext) {
        self.stopped = true;
        if ctx.audio.current_track().is_some() {
            let command = ctx.audio.stop_music();
            ctx.emit(command);
        }
    }

    fn start_track(&mut self, fade: f32, ctx: &mut EffectContext) {
        self.started = true;
        self.fade(fade, ctx);
        if let Some(command) = ctx.audio.play_music(self.track) {
            ctx.emit(command);
        }
    }
}

impl Effect for MusicFade {
    fn kind(&self) -> EffectKind {
        EffectKind::MusicFade
    }

    fn begin(&mut self, ctx: &mut EffectContext) {
        self.start_fade = ctx.audio.music_fade();
        // Nothing to fade out, only the pause before the new track remains.
        self.stopped = ctx.audio.current_track().is_none();
    }

    fn step(&mut self, elapsed: Duration, ctx: &mut EffectContext) -> EffectStatus {
        self.elapsed += elapsed;

        if !self.stopped {
            if self.elapsed < MUSIC_FADE_OUT {
                let progress = self.elapsed.as_secs_f32() / MUSIC_FADE_OUT.as_secs_f32();
                self.fade(self.start_fade * (1.0 - progress), ctx);
                return EffectStatus::Running;
            }
            self.stop_previous(ctx);
        }

        if !self.started {
            if self.elapsed < MUSIC_SWITCH_DELAY {
                return EffectStatus::Running;
            }
            self.start_track(0.0, ctx);
        }

        let fading_in = self.elapsed.saturating_sub(MUSIC_SWITCH_DELAY);
        if fading_in >= MUSIC_FADE_IN {
            self.fade(1.0, ctx);
            EffectStatus::Finished
        } else {
            self.fade(fading_in.as_secs_f32() / MUSIC_FADE_IN.as_secs_f32(), ctx);
            EffectStatus::Running
        }
    }

    fn cancel(&mut self, _ctx: &mut EffectContext) {
        log::debug!("music fade to {:?} cancelled", self.track);
    }

    fn finish(&mut self, ctx: &mut EffectContext) {
        if !self.stopped {
            self.stop_previous(ctx);
        }
        if self.started {
            self.fade(1.0, ctx);
        } else {
            self.start_track(1.0, ctx);
        }
    }
}
