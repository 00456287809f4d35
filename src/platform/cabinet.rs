//! Host loop for one frame: tick, sound, draw
//!
//! Mirrors the firmware main loop. The simulation never blocks; when it
//! reports a cleared wave the cabinet shows the interstitial and stalls the
//! clock before drawing the fresh wave.

use super::time::Clock;
use crate::audio::{ToneDevice, ToneDriver};
use crate::consts::WAVE_CLEARED_PAUSE_MS;
use crate::persistence::ScoreStore;
use crate::renderer::{DrawSurface, Presenter};
use crate::sim::{GameEvent, GameSession, TickInput};

#[derive(Debug)]
pub struct Cabinet<S: ScoreStore, D: DrawSurface, T: ToneDevice> {
    pub session: GameSession<S>,
    presenter: Presenter,
    surface: D,
    tone: ToneDriver<T>,
}

impl<S: ScoreStore, D: DrawSurface, T: ToneDevice> Cabinet<S, D, T> {
    pub fn new(session: GameSession<S>, presenter: Presenter, surface: D, tone: T) -> Self {
        Self {
            session,
            presenter,
            surface,
            tone: ToneDriver::new(tone),
        }
    }

    /// Run one frame with the controls sampled by the caller
    pub fn frame(&mut self, input: &TickInput, clock: &mut impl Clock) {
        self.session.update(input, clock.now_ms());

        let wave_cleared = self
            .session
            .events()
            .iter()
            .any(|e| matches!(e, GameEvent::WaveCleared { .. }));
        if wave_cleared {
            self.tone.apply(self.session.audio().output());
            self.presenter.draw_wave_cleared(&mut self.surface);
            clock.stall(WAVE_CLEARED_PAUSE_MS);
        }

        self.tone.apply(self.session.audio().output());
        self.presenter
            .draw(&mut self.surface, &self.session.snapshot());
    }

    pub fn surface(&self) -> &D {
        &self.surface
    }

    pub fn tone_device(&self) -> &T {
        self.tone.device()
    }
}
