use crate::SimulationConfig;

/// Cart-pole state.
///
/// The pole angle is zero upright and positive when leaning towards the
/// positive cart direction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CartPoleState {
    /// Cart position in meters.
    pub x: f64,
    /// Cart velocity in m/s.
    pub x_dot: f64,
    /// Pole angle in radians.
    pub theta: f64,
    /// Pole angular velocity in rad/s.
    pub theta_dot: f64,
}

impl CartPoleState {
    /// Upright state with the pole tilted by `theta`.
    pub fn tilted(theta: f64) -> Self {
        Self {
            theta,
            ..Default::default()
        }
    }
}

#[derive(Clone, Copy)]
struct Derivative {
    x_dot: f64,
    x_ddot: f64,
    theta_dot: f64,
    theta_ddot: f64,
}

/// Cart-pole plant with a uniform rod.
#[derive(Clone, Debug)]
pub struct CartPole {
    cart_mass: f64,
    pole_mass: f64,
    pole_length: f64,
    gravity: f64,
    state: CartPoleState,
}

impl CartPole {
    pub fn new(config: &SimulationConfig, state: CartPoleState) -> Self {
        Self {
            cart_mass: config.cart_mass,
            pole_mass: config.pole_mass,
            pole_length: config.pole_length,
            gravity: config.gravity,
            state,
        }
    }

    #[inline]
    pub fn state(&self) -> &CartPoleState {
        &self.state
    }

    fn derivative(&self, s: &CartPoleState, force: f64) -> Derivative {
        let total_mass = self.cart_mass + self.pole_mass;
        let polemass_length = self.pole_mass * self.pole_length;

        let (sin_t, cos_t) = s.theta.sin_cos();

        let temp = (force + polemass_length * s.theta_dot * s.theta_dot * sin_t) / total_mass;
        let theta_ddot = (self.gravity * sin_t - cos_t * temp)
            / (self.pole_length * (4.0 / 3.0 - self.pole_mass * cos_t * cos_t / total_mass));
        let x_ddot = temp - polemass_length * theta_ddot * cos_t / total_mass;

        Derivative {
            x_dot: s.x_dot,
            x_ddot,
            theta_dot: s.theta_dot,
            theta_ddot,
        }
    }

    /// Integrate the plant over `dt` seconds with a constant cart force.
    pub fn advance(&mut self, force: f64, dt: f64) {
        let add_scaled = |a: CartPoleState, k: Derivative, h: f64| CartPoleState {
            x: a.x + h * k.x_dot,
            x_dot: a.x_dot + h * k.x_ddot,
            theta: a.theta + h * k.theta_dot,
            theta_dot: a.theta_dot + h * k.theta_ddot,
        };

        let s = self.state;

        let k1 = self.derivative(&s, force);
        let k2 = self.derivative(&add_scaled(s, k1, 0.5 * dt), force);
        let k3 = self.derivative(&add_scaled(s, k2, 0.5 * dt), force);
        let k4 = self.derivative(&add_scaled(s, k3, dt), force);

        let h = dt / 6.0;

        self.state = CartPoleState {
            x: s.x + h * (k1.x_dot + 2.0 * k2.x_dot + 2.0 * k3.x_dot + k4.x_dot),
            x_dot: s.x_dot + h * (k1.x_ddot + 2.0 * k2.x_ddot + 2.0 * k3.x_ddot + k4.x_ddot),
            theta: s.theta
                + h * (k1.theta_dot + 2.0 * k2.theta_dot + 2.0 * k3.theta_dot + k4.theta_dot),
            theta_dot: s.theta_dot
                + h * (k1.theta_ddot + 2.0 * k2.theta_ddot + 2.0 * k3.theta_ddot + k4.theta_ddot),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upright_equilibrium() {
        let mut plant = CartPole::new(&SimulationConfig::default(), CartPoleState::default());

        for _ in 0..1_000 {
            plant.advance(0.0, 0.016);
        }

        assert_eq!(*plant.state(), CartPoleState::default());
    }

    #[test]
    fn test_pole_falls_towards_tilt() {
        let mut plant = CartPole::new(&SimulationConfig::default(), CartPoleState::tilted(0.05));

        for _ in 0..50 {
            plant.advance(0.0, 0.016);
        }

        assert!(plant.state().theta > 0.05);
        // Reaction pushes the cart away from the lean.
        assert!(plant.state().x < 0.0);
    }

    #[test]
    fn test_force_moves_cart() {
        let mut plant = CartPole::new(&SimulationConfig::default(), CartPoleState::default());

        plant.advance(10.0, 0.016);

        assert!(plant.state().x_dot > 0.0);
        // Pushing the cart tips the pole backwards.
        assert!(plant.state().theta_dot < 0.0);
    }
}
