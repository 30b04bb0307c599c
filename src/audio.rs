//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects and background tune - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits paddle
    PaddleHit,
    /// Ball leaves the field
    BallLost,
    /// Plain block breaks
    BlockBreak,
    /// Yellow block breaks and splits the ball
    YellowBlockBreak,
    /// Every block of the stage is gone
    StageClear,
    /// Game over
    GameOver,
    /// New best score on the leaderboard
    HighScore,
}

impl SoundEffect {
    /// Effect for a simulation event, if it makes a sound
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::PaddleHit => Some(Self::PaddleHit),
            GameEvent::BallLost => Some(Self::BallLost),
            GameEvent::BlockDestroyed { yellow: false } => Some(Self::BlockBreak),
            GameEvent::BlockDestroyed { yellow: true } => Some(Self::YellowBlockBreak),
            GameEvent::StageClear { .. } => Some(Self::StageClear),
            GameEvent::GameOver { .. } => Some(Self::GameOver),
            GameEvent::BallSplit | GameEvent::ScreenChanged(_) => None,
        }
    }
}

/// Background tune: (frequency Hz, length in beats); 0 Hz is a rest
const TUNE: [(f32, f32); 16] = [
    (262.0, 1.0),
    (330.0, 1.0),
    (392.0, 1.0),
    (330.0, 1.0),
    (349.0, 1.0),
    (440.0, 1.0),
    (392.0, 2.0),
    (294.0, 1.0),
    (349.0, 1.0),
    (440.0, 1.0),
    (349.0, 1.0),
    (330.0, 1.0),
    (392.0, 1.0),
    (262.0, 1.0),
    (0.0, 1.0),
    (196.0, 1.0),
];
const BEAT_SECONDS: f64 = 0.25;
/// How far ahead of the audio clock notes are scheduled
const MUSIC_LOOKAHEAD: f64 = 0.5;

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    music_gain: Option<GainNode>,
    sfx_volume: f32,
    music_volume: f32,
    music_playing: bool,
    /// Index of the next tune note to schedule
    music_note: usize,
    /// Audio clock time of the next tune note
    music_next_time: f64,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        let music_gain = ctx.as_ref().and_then(|ctx| {
            let gain = ctx.create_gain().ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;
            Some(gain)
        });

        let mut manager = Self {
            ctx,
            music_gain,
            sfx_volume: 0.0,
            music_volume: 0.0,
            music_playing: false,
            music_note: 0,
            music_next_time: 0.0,
        };
        manager.apply_settings(settings);
        manager
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Pick up volume and mute changes
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.sfx_volume = settings.effective_sfx_volume();
        self.music_volume = settings.effective_music_volume();
        if let Some(gain) = &self.music_gain {
            gain.gain().set_value(self.music_volume * 0.15);
        }
    }

    /// Play the sound for a simulation event, if any
    pub fn play_event(&self, event: &GameEvent) {
        if let Some(effect) = SoundEffect::for_event(event) {
            self.play(effect);
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.sfx_volume;
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::PaddleHit => self.play_paddle_hit(ctx, vol),
            SoundEffect::BallLost => self.play_ball_lost(ctx, vol),
            SoundEffect::BlockBreak => self.play_block_break(ctx, vol),
            SoundEffect::YellowBlockBreak => self.play_yellow_break(ctx, vol),
            SoundEffect::StageClear => self.play_stage_clear(ctx, vol),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
            SoundEffect::HighScore => self.play_high_score(ctx, vol),
        }
    }

    // === Background tune ===

    /// Start looping the background tune from the top
    pub fn start_music(&mut self) {
        if self.music_playing {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        self.music_playing = true;
        self.music_note = 0;
        self.music_next_time = ctx.current_time() + 0.05;
        log::info!("Music started");
    }

    /// Stop scheduling tune notes; already scheduled ones ring out
    pub fn stop_music(&mut self) {
        if self.music_playing {
            self.music_playing = false;
            log::info!("Music stopped");
        }
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    /// Schedule tune notes that fall inside the lookahead window (call every frame)
    pub fn update_music(&mut self) {
        if !self.music_playing {
            return;
        }
        let (Some(ctx), Some(out)) = (&self.ctx, &self.music_gain) else {
            return;
        };
        let now = ctx.current_time();
        // Skip ahead after the tab was throttled rather than bursting notes
        if self.music_next_time < now {
            self.music_next_time = now + 0.05;
        }

        while self.music_next_time < now + MUSIC_LOOKAHEAD {
            let (freq, beats) = TUNE[self.music_note];
            let len = beats as f64 * BEAT_SECONDS;
            if freq > 0.0 {
                schedule_note(ctx, out, freq, self.music_next_time, len * 0.9);
            }
            self.music_next_time += len;
            self.music_note = (self.music_note + 1) % TUNE.len();
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Paddle hit - short rising blip
    fn play_paddle_hit(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.25, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.06)
            .ok();
        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .linear_ramp_to_value_at_time(330.0, t + 0.05)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.07).ok();
    }

    /// Ball lost - falling slide
    fn play_ball_lost(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 500.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.35, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.4)
            .ok();
        osc.frequency().set_value_at_time(500.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(80.0, t + 0.4)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.45).ok();
    }

    /// Plain block - short crack with a bass thump
    fn play_block_break(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 900.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.06)
                .ok();
            osc.frequency().set_value_at_time(900.0, t).ok();
            osc.frequency().set_value_at_time(600.0, t + 0.02).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.08).ok();
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 90.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.12).ok();
        }
    }

    /// Yellow block - two-note ping, fifth apart
    fn play_yellow_break(&self, ctx: &AudioContext, vol: f32) {
        let start = ctx.current_time();
        for (t, freq) in [(start, 880.0), (start + 0.05, 1320.0)] {
            let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Triangle) else {
                continue;
            };
            gain.gain().set_value_at_time(vol * 0.22, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.14).ok();
        }
    }

    /// Stage clear - quick major arpeggio, top note held
    fn play_stage_clear(&self, ctx: &AudioContext, vol: f32) {
        let notes = [523.0, 659.0, 784.0, 1047.0];
        let start = ctx.current_time();
        for (i, freq) in notes.into_iter().enumerate() {
            let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Square) else {
                continue;
            };
            let t = start + i as f64 * 0.07;
            let len = if i + 1 == notes.len() { 0.35 } else { 0.08 };
            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + len)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + len + 0.02).ok();
        }
    }

    /// Game over - long sliding drone over a sub tone
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 330.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.7).ok();
            osc.frequency().set_value_at_time(330.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(110.0, t + 0.7)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.72).ok();
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 55.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.8).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.82).ok();
        }
    }

    /// High score - bright trill once the game-over slide has faded
    fn play_high_score(&self, ctx: &AudioContext, vol: f32) {
        let start = ctx.current_time() + 0.8;
        for i in 0..6 {
            let freq = if i % 2 == 0 { 784.0 } else { 988.0 };
            let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sine) else {
                continue;
            };
            let t = start + i as f64 * 0.06;
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.09)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.1).ok();
        }
    }
}

/// One tune note routed through the music bus
fn schedule_note(ctx: &AudioContext, out: &GainNode, freq: f32, t: f64, len: f64) {
    let Ok(osc) = ctx.create_oscillator() else { return };
    let Ok(env) = ctx.create_gain() else { return };

    osc.set_type(OscillatorType::Square);
    osc.frequency().set_value(freq);
    if osc.connect_with_audio_node(&env).is_err() || env.connect_with_audio_node(out).is_err() {
        return;
    }

    env.gain().set_value_at_time(0.8, t).ok();
    env.gain()
        .exponential_ramp_to_value_at_time(0.01, t + len)
        .ok();
    osc.start_with_when(t).ok();
    osc.stop_with_when(t + len).ok();
}
