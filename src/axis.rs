use core::convert::Infallible;

use embedded_hal::{digital::OutputPin, pwm::SetDutyCycle};

use crate::{counter::PulseCounter, direction::Direction, errors::JogError, scale::JogScale};

/// One stepper axis following its encoder counter.
///
/// Owns the counter, the direction line and the step-rate PWM channel, plus
/// the count sampled on the previous cycle. Velocity is the count delta over
/// one sampling period; its sign picks the direction level and its magnitude,
/// scaled by the jog multiplier, becomes the committed duty.
pub struct JogAxis<C, O, P> {
    counter: C,
    dir: O,
    pwm: P,
    last_count: i16,
    max_duty: u16,
    last: Option<AxisUpdate>,
}

/// Outcome of one sampling cycle on an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisUpdate {
    /// Counts accumulated since the previous cycle. Sign encodes direction.
    pub velocity: i32,
    pub direction: Direction,
    /// Duty committed to the step output, after scaling and saturation.
    pub duty: u16,
}

impl<C, O, P> JogAxis<C, O, P>
where
    C: PulseCounter,
    O: OutputPin<Error = Infallible>,
    P: SetDutyCycle,
{
    /// The duty range is latched here, once, and the first cycle measures
    /// against the count read at construction time.
    pub fn new(mut counter: C, dir: O, pwm: P) -> Result<Self, JogError> {
        let max_duty = pwm.max_duty_cycle();
        if max_duty == 0 {
            return Err(JogError::ZeroDutyRange);
        }
        let last_count = counter.count();
        Ok(Self {
            counter,
            dir,
            pwm,
            last_count,
            max_duty,
            last: None,
        })
    }

    /// Sample the counter and commit direction and duty for this cycle.
    ///
    /// Velocity above zero drives the direction line high; zero or below
    /// drives it low with the magnitude negated, so a stationary encoder
    /// commits Reverse at zero duty.
    pub fn update(&mut self, scale: JogScale) -> AxisUpdate {
        let count = self.counter.count();
        let velocity = count as i32 - self.last_count as i32;
        self.last_count = count;

        let (direction, magnitude) = if velocity > 0 {
            (Direction::Forward, velocity as u32)
        } else {
            (Direction::Reverse, velocity.unsigned_abs())
        };
        // The scaled product can exceed the duty width long before the clamp,
        // so it is carried in u32 until saturation.
        let duty = (magnitude * scale.factor()).min(self.max_duty as u32) as u16;

        match direction {
            Direction::Forward => self.dir.set_high().unwrap(),
            Direction::Reverse => self.dir.set_low().unwrap(),
        }
        self.pwm.set_duty_cycle(duty).unwrap();

        let update = AxisUpdate {
            velocity,
            direction,
            duty,
        };
        self.last = Some(update);
        update
    }

    /// Outcome of the most recent cycle, if one has run.
    pub fn last_update(&self) -> Option<AxisUpdate> {
        self.last
    }

    /// Saturation ceiling of the step output, fixed at construction.
    pub fn max_duty(&self) -> u16 {
        self.max_duty
    }
}

#[cfg(test)]
mod tests {
    use super::JogAxis;
    use crate::{
        direction::Direction,
        errors::JogError,
        mocks::{MockPin, MockPwm, ScriptedCounter},
        scale::JogScale,
    };

    #[test]
    fn forward_velocity_scales_into_duty() {
        let mut dir = MockPin::new();
        let mut pwm = MockPwm::new(1023);
        let mut counter = ScriptedCounter::new(&[0, 5]);
        let mut axis = JogAxis::new(&mut counter, &mut dir, &mut pwm).unwrap();
        assert_eq!(axis.max_duty(), 1023);
        assert_eq!(axis.last_update(), None);

        let update = axis.update(JogScale::X10);
        assert_eq!(update.velocity, 5);
        assert_eq!(update.direction, Direction::Forward);
        assert_eq!(update.duty, 50);
        assert_eq!(axis.last_update(), Some(update));

        assert!(dir.high);
        assert_eq!(pwm.duty, 50);
    }

    #[test]
    fn reverse_velocity_saturates_at_max_duty() {
        let mut dir = MockPin::new();
        let mut pwm = MockPwm::new(1023);
        let mut counter = ScriptedCounter::new(&[100, 80]);
        let mut axis = JogAxis::new(&mut counter, &mut dir, &mut pwm).unwrap();

        let update = axis.update(JogScale::X100);
        assert_eq!(update.velocity, -20);
        assert_eq!(update.direction, Direction::Reverse);
        assert_eq!(update.duty, 1023);

        assert!(!dir.high);
        assert_eq!(pwm.duty, 1023);
    }

    #[test]
    fn zero_velocity_commits_reverse_at_zero_duty() {
        let mut dir = MockPin::new();
        let mut pwm = MockPwm::new(1023);
        let mut counter = ScriptedCounter::new(&[50, 50]);
        let mut axis = JogAxis::new(&mut counter, &mut dir, &mut pwm).unwrap();

        let update = axis.update(JogScale::X1000);
        assert_eq!(update.velocity, 0);
        assert_eq!(update.direction, Direction::Reverse);
        assert_eq!(update.duty, 0);
        assert!(!dir.high);
    }

    #[test]
    fn repeated_count_is_idempotent() {
        let mut dir = MockPin::new();
        let mut pwm = MockPwm::new(1023);
        let mut counter = ScriptedCounter::new(&[3, 10, 10]);
        let mut axis = JogAxis::new(&mut counter, &mut dir, &mut pwm).unwrap();

        let first = axis.update(JogScale::X10);
        assert_eq!(first.velocity, 7);
        assert_eq!(first.direction, Direction::Forward);

        let second = axis.update(JogScale::X10);
        assert_eq!(second.velocity, 0);
        assert_eq!(second.direction, Direction::Reverse);
        assert_eq!(second.duty, 0);
    }

    #[test]
    fn widened_arithmetic_survives_full_counter_swing() {
        let mut dir = MockPin::new();
        let mut pwm = MockPwm::new(1023);
        // A full swing across the counter window would wrap any 16-bit
        // product; the duty must still land on the ceiling, not a wrapped
        // remainder.
        let mut counter = ScriptedCounter::new(&[-10_000, 10_000]);
        let mut axis = JogAxis::new(&mut counter, &mut dir, &mut pwm).unwrap();

        let update = axis.update(JogScale::X1000);
        assert_eq!(update.velocity, 20_000);
        assert_eq!(update.direction, Direction::Forward);
        assert_eq!(update.duty, 1023);
    }

    #[test]
    fn duty_stays_in_range_across_tiers() {
        for scale in [JogScale::X10, JogScale::X100, JogScale::X1000] {
            for &cur in &[-300i16, -40, -1, 0, 1, 7, 102, 5_000] {
                let mut dir = MockPin::new();
                let mut pwm = MockPwm::new(1023);
                let samples = [0, cur];
                let mut counter = ScriptedCounter::new(&samples);
                let mut axis = JogAxis::new(&mut counter, &mut dir, &mut pwm).unwrap();

                let update = axis.update(scale);
                let expected = (cur.unsigned_abs() as u32 * scale.factor()).min(1023) as u16;
                assert_eq!(update.duty, expected);
                assert!(update.duty <= 1023);
                assert_eq!(update.direction == Direction::Forward, cur > 0);
            }
        }
    }

    #[test]
    fn zero_duty_range_is_rejected() {
        let mut dir = MockPin::new();
        let mut pwm = MockPwm::new(0);
        let mut counter = ScriptedCounter::new(&[0]);
        assert!(matches!(
            JogAxis::new(&mut counter, &mut dir, &mut pwm),
            Err(JogError::ZeroDutyRange)
        ));
    }
}
