//! Monophonic tone channel sequencer
//!
//! One square-wave output shared by short cues and the engine drone. A cue
//! preempts whatever is playing; the drone resumes once the cue expires if
//! thrust is still held.

/// One-shot sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Bullet fired
    Shoot,
    /// Asteroid or ship destroyed
    Explosion,
    /// Hyperspace jump
    Hyperspace,
}

impl Cue {
    pub const fn frequency(self) -> u16 {
        match self {
            Cue::Shoot => 2500,
            Cue::Explosion => 300,
            Cue::Hyperspace => 4000,
        }
    }

    pub const fn duration_ms(self) -> u64 {
        match self {
            Cue::Shoot => 50,
            Cue::Explosion => 100,
            Cue::Hyperspace => 300,
        }
    }
}

/// Engine drone range (Hz), low at idle thrust, high at full
pub const THRUST_FREQ_MIN: u16 = 100;
pub const THRUST_FREQ_MAX: u16 = 250;

/// Extra time a cue holds the channel past its nominal duration
pub const CUE_RELEASE_MS: u64 = 5;

/// Drone pitch for a thrust intensity in [0, 1]
pub fn thrust_frequency(intensity: f32) -> u16 {
    let span = (THRUST_FREQ_MAX - THRUST_FREQ_MIN) as f32;
    THRUST_FREQ_MIN + (span * intensity.clamp(0.0, 1.0)) as u16
}

/// What the channel is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Channel {
    #[default]
    Idle,
    /// A cue, owning the channel until `until_ms`
    Timed { frequency: u16, until_ms: u64 },
    /// The engine drone
    Continuous { frequency: u16 },
}

/// Desired hardware output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToneOutput {
    #[default]
    Silent,
    Tone(u16),
}

#[derive(Debug, Clone, Default)]
pub struct AudioSequencer {
    channel: Channel,
    thrust_held: bool,
    thrust_intensity: f32,
}

impl AudioSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Thrust intent, independent of whether the drone is audible
    pub fn thrust_held(&self) -> bool {
        self.thrust_held
    }

    pub fn output(&self) -> ToneOutput {
        match self.channel {
            Channel::Idle => ToneOutput::Silent,
            Channel::Timed { frequency, .. } | Channel::Continuous { frequency } => {
                ToneOutput::Tone(frequency)
            }
        }
    }

    fn cue_in_flight(&self, now_ms: u64) -> bool {
        matches!(self.channel, Channel::Timed { until_ms, .. } if now_ms < until_ms)
    }

    fn resume_drone(&mut self) {
        self.channel = Channel::Continuous {
            frequency: thrust_frequency(self.thrust_intensity),
        };
    }

    /// Start a cue, cutting off anything already playing
    pub fn play(&mut self, cue: Cue, now_ms: u64) {
        self.channel = Channel::Timed {
            frequency: cue.frequency(),
            until_ms: now_ms + cue.duration_ms() + CUE_RELEASE_MS,
        };
    }

    /// Raise the thrust intent. The drone starts now unless a cue holds the
    /// channel, in which case `update` starts it later.
    pub fn start_thrust(&mut self, intensity: f32, now_ms: u64) {
        if self.thrust_held {
            return;
        }
        self.thrust_held = true;
        self.thrust_intensity = intensity.clamp(0.0, 1.0);
        if !self.cue_in_flight(now_ms) {
            self.resume_drone();
        }
    }

    /// Drop the thrust intent. A playing cue is left alone.
    pub fn stop_thrust(&mut self) {
        if !self.thrust_held {
            return;
        }
        self.thrust_held = false;
        if matches!(self.channel, Channel::Continuous { .. }) {
            self.channel = Channel::Idle;
        }
    }

    pub fn stop_all(&mut self) {
        self.thrust_held = false;
        self.channel = Channel::Idle;
    }

    /// Expire finished cues and bring the drone back. Call once per tick.
    pub fn update(&mut self, now_ms: u64) {
        match self.channel {
            Channel::Timed { until_ms, .. } if now_ms >= until_ms => {
                self.channel = Channel::Idle;
                if self.thrust_held {
                    self.resume_drone();
                }
            }
            Channel::Idle if self.thrust_held => self.resume_drone(),
            _ => {}
        }
    }
}

/// A piezo / speaker pin capable of one square wave at a time
pub trait ToneDevice {
    fn tone(&mut self, frequency: u16);
    fn no_tone(&mut self);
}

/// Pushes sequencer output to a device, only on change
#[derive(Debug)]
pub struct ToneDriver<D: ToneDevice> {
    device: D,
    applied: ToneOutput,
}

impl<D: ToneDevice> ToneDriver<D> {
    pub fn new(mut device: D) -> Self {
        device.no_tone();
        Self {
            device,
            applied: ToneOutput::Silent,
        }
    }

    pub fn apply(&mut self, output: ToneOutput) {
        if output == self.applied {
            return;
        }
        match output {
            ToneOutput::Silent => self.device.no_tone(),
            ToneOutput::Tone(frequency) => self.device.tone(frequency),
        }
        self.applied = output;
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn into_inner(self) -> D {
        self.device
    }
}

/// Headless device that keeps every command it receives
#[derive(Debug, Clone, Default)]
pub struct RecordingTone {
    pub log: Vec<ToneOutput>,
}

impl ToneDevice for RecordingTone {
    fn tone(&mut self, frequency: u16) {
        self.log.push(ToneOutput::Tone(frequency));
    }

    fn no_tone(&mut self) {
        self.log.push(ToneOutput::Silent);
    }
}
