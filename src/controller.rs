use core::convert::Infallible;

use embassy_sync::{blocking_mutex::raw::RawMutex, mutex::TryLockError};
use embassy_time::{Duration, Timer};
use embedded_hal::{
    digital::{InputPin, OutputPin},
    pwm::SetDutyCycle,
};

use crate::{
    axis::JogAxis,
    counter::PulseCounter,
    errors::JogError,
    fmt::{info, trace},
    scale::ScaleSelector,
};

/// Default sampling period between control cycles.
pub const DEFAULT_SAMPLE_PERIOD_MS: u64 = 100;

/// Fixed-period control loop over `N` jog axes sharing one scale selector.
///
/// Each cycle resolves the selector once, then updates every axis in array
/// order, so all axes see the same multiplier within a cycle and the update
/// order never varies between cycles.
pub struct JogController<M: RawMutex, I, C, O, P, const N: usize> {
    axes: [JogAxis<C, O, P>; N],
    scale: ScaleSelector<M, I>,
    period: Duration,
}

impl<M, I, C, O, P, const N: usize> JogController<M, I, C, O, P, N>
where
    M: RawMutex,
    I: InputPin<Error = Infallible>,
    C: PulseCounter,
    O: OutputPin<Error = Infallible>,
    P: SetDutyCycle,
{
    pub fn new(
        axes: [JogAxis<C, O, P>; N],
        scale: ScaleSelector<M, I>,
        period_ms: u64,
    ) -> Result<Self, JogError> {
        if period_ms == 0 {
            return Err(JogError::InvalidSamplePeriod(period_ms));
        }
        Ok(Self {
            axes,
            scale,
            period: Duration::from_millis(period_ms),
        })
    }

    /// One control cycle: resolve the scale once, then update every axis.
    pub async fn tick(&mut self) {
        let scale = self.scale.read().await;
        for (id, axis) in self.axes.iter_mut().enumerate() {
            let update = axis.update(scale);
            trace!(
                "[JOG] axis {}: velocity {} duty {}",
                id,
                update.velocity,
                update.duty
            );
        }
    }

    /// Non-blocking [`Self::tick`].
    ///
    /// Fails without touching any axis when the selector lines are locked
    /// elsewhere.
    pub fn try_tick(&mut self) -> Result<(), TryLockError> {
        let scale = self.scale.try_read()?;
        for (id, axis) in self.axes.iter_mut().enumerate() {
            let update = axis.update(scale);
            trace!(
                "[JOG] axis {}: velocity {} duty {}",
                id,
                update.velocity,
                update.duty
            );
        }
        Ok(())
    }

    /// Run the sampling loop forever.
    ///
    /// The sleep between cycles is the only suspension point; there is no
    /// terminal state short of external reset or power-cycle.
    pub async fn run(&mut self) -> ! {
        info!("[JOG] Controller running: {} axes", N);
        loop {
            self.tick().await;
            Timer::after(self.period).await;
        }
    }
}
