//! Host-side stand-ins for the hardware seams, used by the unit tests.

use core::convert::Infallible;

use embedded_hal::{
    digital::{self, InputPin, OutputPin},
    pwm::{self, SetDutyCycle},
};

use crate::counter::PulseCounter;

/// Replays a scripted sequence of counter samples, holding the last one.
pub struct ScriptedCounter<'a> {
    samples: &'a [i16],
    idx: usize,
}

impl<'a> ScriptedCounter<'a> {
    pub fn new(samples: &'a [i16]) -> Self {
        Self { samples, idx: 0 }
    }
}

impl PulseCounter for ScriptedCounter<'_> {
    fn count(&mut self) -> i16 {
        let sample = self.samples[self.idx.min(self.samples.len() - 1)];
        self.idx += 1;
        sample
    }
}

/// Output pin recording the last level written.
pub struct MockPin {
    pub high: bool,
}

impl MockPin {
    pub fn new() -> Self {
        Self { high: false }
    }
}

impl digital::ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        Ok(())
    }
}

/// Input pin at a fixed level.
pub struct MockInput {
    high: bool,
}

impl MockInput {
    pub fn new(high: bool) -> Self {
        Self { high }
    }
}

impl digital::ErrorType for MockInput {
    type Error = Infallible;
}

impl InputPin for MockInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.high)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.high)
    }
}

/// PWM channel recording the last duty written.
pub struct MockPwm {
    pub duty: u16,
    max_duty: u16,
}

impl MockPwm {
    pub fn new(max_duty: u16) -> Self {
        Self { duty: 0, max_duty }
    }
}

impl pwm::ErrorType for MockPwm {
    type Error = Infallible;
}

impl SetDutyCycle for MockPwm {
    fn max_duty_cycle(&self) -> u16 {
        self.max_duty
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty = duty;
        Ok(())
    }
}
