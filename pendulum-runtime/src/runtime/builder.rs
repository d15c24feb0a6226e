use crate::{
    device::{Host, PositionSensor},
    math::Pid,
    record::RecordStore,
    Config, Configurable,
};

use super::Runtime;

/// Runtime builder.
///
/// The runtime builder resolves the devices from the host, enables the
/// sensor and loads the record. Any error at this point is fatal.
///
/// The runtime builder *must* be used to construct a runtime.
pub struct Builder<H: Host> {
    runtime: Runtime<H>,
}

impl<H: Host> Builder<H> {
    /// Construct runtime from configuration.
    pub fn from_config(config: &Config, mut host: H) -> super::Result<Self> {
        let controller = &config.controller;

        let mut sensor = host.position_sensor(&controller.sensor_device)?;
        let actuator = host.force_actuator(&controller.actuator_device)?;

        sensor.enable(host.time_step());

        debug!(
            "Bound sensor '{}' and actuator '{}'",
            controller.sensor_device, controller.actuator_device
        );

        let record = RecordStore::open(&controller.record_path);
        let pid = Pid::new(controller.gains);

        info!("Best recorded time: {:.2} s", record.best());
        debug!("Record file: {}", record.path().display());
        debug!("Controller gains: {}", pid.gains());

        Ok(Self {
            runtime: Runtime {
                host,
                sensor,
                actuator,
                pid,
                record,
                progress: controller.progress && !config.global().daemon,
                shutdown: tokio::sync::broadcast::channel(1),
            },
        })
    }

    /// Listen for termination signals.
    ///
    /// On Ctrl-C the control loop is stopped as if the host ended the
    /// simulation. Must be called from within a tokio runtime.
    pub fn with_shutdown(self) -> Self {
        info!("Enable signals shutdown");

        let sender = self.runtime.shutdown_sender();

        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for termination signal: {}", e);
                return;
            }

            info!("Termination requested");

            sender.send(()).ok();
        });

        self
    }

    pub fn build(self) -> Runtime<H> {
        self.runtime
    }
}
