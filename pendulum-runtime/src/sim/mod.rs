use std::{cell::RefCell, rc::Rc, time::Duration};

use rand::Rng;

use crate::{
    device::{ForceActuator, Host, PositionSensor, Step},
    SimulationConfig,
};

pub use cartpole::{CartPole, CartPoleState};

mod cartpole;

/// Peak disturbance force in newtons when jitter is enabled.
const JITTER_FORCE: f64 = 2.0;

struct World {
    plant: CartPole,
    /// Force commanded by the actuator.
    force: f64,
}

/// Pole angle sensor.
///
/// Reads `NaN` until enabled.
pub struct PoleSensor {
    world: Rc<RefCell<World>>,
    sampling_period: Option<Duration>,
}

impl PositionSensor for PoleSensor {
    fn enable(&mut self, sampling_period: Duration) {
        self.sampling_period = Some(sampling_period);
    }

    fn value(&self) -> f64 {
        match self.sampling_period {
            Some(_) => self.world.borrow().plant.state().theta,
            None => f64::NAN,
        }
    }
}

/// Cart force motor.
pub struct CartMotor {
    world: Rc<RefCell<World>>,
}

impl ForceActuator for CartMotor {
    fn set_force(&mut self, force: f64) {
        self.world.borrow_mut().force = force;
    }
}

/// Cart-pole simulation host.
///
/// The host integrates the plant once per basic time step and ends the
/// simulation when the pole falls, the cart leaves the track or the
/// configured duration is reached.
pub struct CartPoleHost {
    config: SimulationConfig,
    world: Rc<RefCell<World>>,
    /// Pacing timer, started on the first step.
    interval: Option<tokio::time::Interval>,
    rng: rand::rngs::OsRng,
    sim_time: f64,
    terminated: bool,
}

impl CartPoleHost {
    /// Construct the host with a randomized start angle.
    pub fn new(config: SimulationConfig) -> Self {
        let mut rng = rand::rngs::OsRng;

        let limit = config.initial_angle.abs();
        let theta = rng.gen_range(-limit..=limit);

        Self::with_state(config, CartPoleState::tilted(theta))
    }

    /// Construct the host from a known start state.
    pub fn with_state(config: SimulationConfig, state: CartPoleState) -> Self {
        let world = World {
            plant: CartPole::new(&config, state),
            force: 0.0,
        };

        Self {
            config,
            world: Rc::new(RefCell::new(world)),
            interval: None,
            rng: rand::rngs::OsRng,
            sim_time: 0.0,
            terminated: false,
        }
    }

    /// Retrieve the plant state.
    pub fn state(&self) -> CartPoleState {
        *self.world.borrow().plant.state()
    }

    /// Retrieve the simulated time in seconds.
    #[inline]
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    fn has_failed(&self, state: &CartPoleState) -> bool {
        if state.theta.abs() > self.config.failure_angle {
            log::debug!("Pole fell at {:.3} rad", state.theta);
            true
        } else if state.x.abs() > self.config.track_limit {
            log::debug!("Cart left the track at {:.3} m", state.x);
            true
        } else if !state.theta.is_finite() || !state.x.is_finite() {
            log::warn!("Simulation diverged");
            true
        } else {
            false
        }
    }
}

#[async_trait::async_trait(?Send)]
impl Host for CartPoleHost {
    type Sensor = PoleSensor;
    type Actuator = CartMotor;

    fn time_step(&self) -> Duration {
        self.config.time_step()
    }

    fn position_sensor(&mut self, name: &str) -> crate::runtime::Result<PoleSensor> {
        if name != crate::consts::DEVICE_POLE_SENSOR {
            return Err(crate::Error::DeviceNotFound(name.to_string()));
        }

        Ok(PoleSensor {
            world: self.world.clone(),
            sampling_period: None,
        })
    }

    fn force_actuator(&mut self, name: &str) -> crate::runtime::Result<CartMotor> {
        if name != crate::consts::DEVICE_CART_MOTOR {
            return Err(crate::Error::DeviceNotFound(name.to_string()));
        }

        Ok(CartMotor {
            world: self.world.clone(),
        })
    }

    async fn step(&mut self) -> Step {
        if self.terminated {
            return Step::Terminate;
        }

        if self.config.realtime {
            let time_step = self.config.time_step();
            let interval = self.interval.get_or_insert_with(|| {
                let mut interval = tokio::time::interval(time_step);
                interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
                interval
            });

            interval.tick().await;
        } else {
            tokio::task::yield_now().await;
        }

        let dt = self.config.time_step().as_secs_f64();

        let disturbance = if self.config.jitter {
            self.rng.gen_range(-JITTER_FORCE..=JITTER_FORCE)
        } else {
            0.0
        };

        let state = {
            let mut world = self.world.borrow_mut();
            let force = world.force + disturbance;
            world.plant.advance(force, dt);
            *world.plant.state()
        };

        self.sim_time += dt;

        if self.has_failed(&state) {
            self.terminated = true;
        } else if let Some(max_duration) = self.config.max_duration {
            if self.sim_time >= max_duration {
                log::debug!("Simulation reached {:.2} s", max_duration);
                self.terminated = true;
            }
        }

        if self.terminated {
            Step::Terminate
        } else {
            Step::Continue
        }
    }
}
