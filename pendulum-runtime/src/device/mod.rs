use std::time::Duration;

/// Outcome of a host step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Simulated time advanced by one time step.
    Continue,
    /// The host ended the simulation.
    Terminate,
}

/// Rotational position sensor.
pub trait PositionSensor {
    /// Enable the sensor with the given sampling period.
    fn enable(&mut self, sampling_period: Duration);

    /// Last sampled position in radians.
    fn value(&self) -> f64;
}

/// Linear force actuator.
pub trait ForceActuator {
    /// Command the actuator force in newtons.
    fn set_force(&mut self, force: f64);
}

/// Simulation host.
///
/// The host owns simulated time. It resolves devices by name and advances
/// the simulation one basic time step at a time. The host is driven from a
/// single thread.
#[async_trait::async_trait(?Send)]
pub trait Host {
    type Sensor: PositionSensor;
    type Actuator: ForceActuator;

    /// Basic time step of the simulation.
    fn time_step(&self) -> Duration;

    /// Resolve a position sensor by name.
    fn position_sensor(&mut self, name: &str) -> crate::runtime::Result<Self::Sensor>;

    /// Resolve a force actuator by name.
    fn force_actuator(&mut self, name: &str) -> crate::runtime::Result<Self::Actuator>;

    /// Advance the simulation by one time step.
    ///
    /// This is the only point where the control loop yields.
    async fn step(&mut self) -> Step;
}
