use std::io::Write;

use crate::{
    device::{ForceActuator, Host, PositionSensor, Step},
    math::Pid,
    record::RecordStore,
};

mod builder;
mod error;

pub use self::builder::Builder;
pub use self::error::Error;

pub type Result<T = ()> = std::result::Result<T, error::Error>;

/// Outcome of a control run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Summary {
    /// Number of control iterations.
    pub steps: u64,
    /// Wall clock seconds since the loop started.
    pub elapsed: f64,
    /// Best time after the run.
    pub best: f64,
    /// Number of times the record was improved.
    pub new_records: u64,
}

/// Control loop runtime.
///
/// The runtime owns the host, the bound devices, the controller state and
/// the record store. It runs on a single thread and only yields on the host
/// step.
pub struct Runtime<H: Host> {
    host: H,
    sensor: H::Sensor,
    actuator: H::Actuator,
    pid: Pid,
    record: RecordStore,
    progress: bool,
    /// Runtime shutdown bus.
    shutdown: (
        tokio::sync::broadcast::Sender<()>,
        tokio::sync::broadcast::Receiver<()>,
    ),
}

impl<H: Host> Runtime<H> {
    /// Create a runtime builder.
    pub fn builder(config: &crate::Config, host: H) -> Result<Builder<H>> {
        Builder::from_config(config, host)
    }

    /// Sender to stop the control loop.
    pub fn shutdown_sender(&self) -> tokio::sync::broadcast::Sender<()> {
        self.shutdown.0.clone()
    }

    #[inline]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[inline]
    pub fn pid(&self) -> &Pid {
        &self.pid
    }

    #[inline]
    pub fn record(&self) -> &RecordStore {
        &self.record
    }

    /// Run the control loop.
    ///
    /// The loop runs until the host ends the simulation or a shutdown is
    /// requested. A failure to persist a new record ends the loop with an
    /// error.
    pub async fn run(&mut self) -> Result<Summary> {
        let dt = self.host.time_step().as_secs_f64();
        let start = tokio::time::Instant::now();

        let mut summary = Summary {
            best: self.record.best(),
            ..Default::default()
        };

        loop {
            let step = tokio::select! {
                biased;
                _ = self.shutdown.1.recv() => {
                    log::debug!("Control loop shutdown requested");
                    break;
                }
                step = self.host.step() => step,
            };

            if step == Step::Terminate {
                log::debug!("Host ended the simulation");
                break;
            }

            let elapsed = start.elapsed().as_secs_f64();
            summary.steps += 1;
            summary.elapsed = elapsed;

            if self.progress {
                write_progress(&mut std::io::stdout(), elapsed).ok();
            }

            let angle = self.sensor.value();
            let force = self.pid.update(angle, dt);
            self.actuator.set_force(force);

            log::trace!("Angle {:.4} rad, force {:.3} N", angle, force);

            let previous = self.record.best();
            if self.record.observe(elapsed).map_err(Error::Record)? {
                if self.progress {
                    writeln!(std::io::stdout()).ok();
                }

                log::info!("{}", record_message(elapsed, previous));

                summary.new_records += 1;
            }
        }

        if self.progress {
            writeln!(std::io::stdout()).ok();
        }

        summary.best = self.record.best();

        log::info!(
            "Balanced for {:.2} s, best time {:.2} s",
            summary.elapsed,
            summary.best
        );

        Ok(summary)
    }
}

/// Overwrite the progress line in place.
fn write_progress(out: &mut impl Write, elapsed: f64) -> std::io::Result<()> {
    write!(out, "\rElapsed time: {:.2} s", elapsed)?;
    out.flush()
}

fn record_message(elapsed: f64, previous: f64) -> String {
    format!("New record! {:.2} s (previous was {:.2} s)", elapsed, previous)
}
