use core::convert::Infallible;

use embassy_sync::{
    blocking_mutex::raw::RawMutex,
    mutex::{Mutex, TryLockError},
};
use embedded_hal::digital::InputPin;

/// Jog multiplier tier selected by three switch lines.
///
/// The factor converts an encoder count delta into a step-rate duty
/// magnitude, so one detent of the wheel moves ten, a hundred or a thousand
/// duty counts worth of step rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JogScale {
    #[default]
    X10,
    X100,
    X1000,
}

impl JogScale {
    pub const fn factor(self) -> u32 {
        match self {
            JogScale::X10 => 10,
            JogScale::X100 => 100,
            JogScale::X1000 => 1000,
        }
    }
}

/// Three mutually-exclusive select lines resolving to a [`JogScale`].
///
/// The lines are mutex-guarded so the selector can be shared between the
/// control loop and any other task that wants to inspect the switch.
pub struct ScaleSelector<M: RawMutex, I> {
    x10: Mutex<M, I>,
    x100: Mutex<M, I>,
    x1000: Mutex<M, I>,
}

impl<M: RawMutex, I: InputPin<Error = Infallible>> ScaleSelector<M, I> {
    pub fn new(x10: I, x100: I, x1000: I) -> Self {
        Self {
            x10: Mutex::new(x10),
            x100: Mutex::new(x100),
            x1000: Mutex::new(x1000),
        }
    }

    /// Resolve the scale from the current line levels.
    ///
    /// First asserted line wins: x10, then x100, then x1000. With no line
    /// asserted the selector falls back to [`JogScale::X10`].
    pub async fn read(&self) -> JogScale {
        let mut x10 = self.x10.lock().await;
        let mut x100 = self.x100.lock().await;
        let mut x1000 = self.x1000.lock().await;
        resolve(
            x10.is_high().unwrap(),
            x100.is_high().unwrap(),
            x1000.is_high().unwrap(),
        )
    }

    /// Non-blocking [`Self::read`].
    pub fn try_read(&self) -> Result<JogScale, TryLockError> {
        let mut x10 = self.x10.try_lock()?;
        let mut x100 = self.x100.try_lock()?;
        let mut x1000 = self.x1000.try_lock()?;
        Ok(resolve(
            x10.is_high().unwrap(),
            x100.is_high().unwrap(),
            x1000.is_high().unwrap(),
        ))
    }
}

fn resolve(x10: bool, x100: bool, x1000: bool) -> JogScale {
    if x10 {
        JogScale::X10
    } else if x100 {
        JogScale::X100
    } else if x1000 {
        JogScale::X1000
    } else {
        JogScale::default()
    }
}
