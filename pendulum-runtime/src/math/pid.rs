use serde::Deserialize;

/// PID gains.
///
/// The gains are fixed for the lifetime of the controller.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Gains {
    /// Proportional gain
    pub kp: f64,
    /// Integral gain
    pub ki: f64,
    /// Derivative gain
    pub kd: f64,
}

impl Gains {
    pub const fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }
}

impl Default for Gains {
    fn default() -> Self {
        Self::new(
            crate::consts::DEFAULT_KP,
            crate::consts::DEFAULT_KI,
            crate::consts::DEFAULT_KD,
        )
    }
}

impl std::fmt::Display for Gains {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Kp={} Ki={} Kd={}", self.kp, self.ki, self.kd)
    }
}

/// Accumulated controller state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PidState {
    /// Integral of error
    pub integral_sum: f64,
    /// Last error value
    pub last_error: f64,
}

pub struct Pid {
    gains: Gains,
    state: PidState,
}

impl Pid {
    /// Construct a new PID controller with zeroed state.
    pub fn new(gains: Gains) -> Pid {
        Pid {
            gains,
            state: PidState::default(),
        }
    }

    /// Update the PID controller with the current error.
    ///
    /// The integral is not clamped and the output is not saturated. The
    /// time step `dt` must be non-zero.
    pub fn update(&mut self, error: f64, dt: f64) -> f64 {
        let proportional = self.gains.kp * error;

        self.state.integral_sum += error * dt;

        let derivative = (error - self.state.last_error) / dt;

        // Remember this error for next time
        self.state.last_error = error;

        proportional + self.gains.ki * self.state.integral_sum + self.gains.kd * derivative
    }

    #[inline]
    pub fn gains(&self) -> &Gains {
        &self.gains
    }

    #[inline]
    pub fn state(&self) -> PidState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn test_pid_first_step() {
        let mut pid = Pid::new(Gains::default());

        // e_0 = 0, so the derivative term sees the full first error.
        let output = pid.update(0.1, 0.016);
        let expected = 35.0 * 0.1 + 0.5 * (0.1 * 0.016) + 8.0 * (0.1 / 0.016);

        assert!((output - expected).abs() < TOLERANCE);
        assert_eq!(pid.state().last_error, 0.1);
    }

    #[test]
    fn test_pid_closed_form() {
        let gains = Gains::new(35.0, 0.5, 8.0);
        let dt = 0.032;
        let errors = [0.05, -0.02, 0.13, 0.0, -0.4, 0.27];

        let mut pid = Pid::new(gains);
        let mut sum = 0.0;
        let mut previous = 0.0;

        for e in errors {
            sum += e * dt;
            let expected = gains.kp * e + gains.ki * sum + gains.kd * ((e - previous) / dt);
            previous = e;

            let output = pid.update(e, dt);
            assert!((output - expected).abs() < TOLERANCE, "{} != {}", output, expected);
        }

        assert!((pid.state().integral_sum - sum).abs() < TOLERANCE);
    }

    #[test]
    fn test_pid_integral_unbounded() {
        let mut pid = Pid::new(Gains::new(0.0, 1.0, 0.0));

        let mut output = 0.0;
        for _ in 0..100_000 {
            output = pid.update(1.0, 0.01);
        }

        assert!((output - 1_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_pid_zero_error() {
        let mut pid = Pid::new(Gains::default());

        assert_eq!(pid.update(0.0, 0.016), 0.0);
        assert_eq!(pid.state(), PidState::default());
    }
}
