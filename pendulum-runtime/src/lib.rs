// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

/// The `pendulum` library provides the runtime for balancing an inverted
/// pendulum on a motorized cart.
///
/// The `math` module holds the PID controller. The `record` module persists
/// the longest balancing duration across runs. The `device` module describes
/// the simulation host and its named devices, and the `sim` module provides
/// a cart-pole host for running without an external simulator.
///
/// The `runtime` module provides the `Runtime` control loop and the `Error`
/// enum. The `consts` module defines the defaults shared by the runtime and
/// the binaries.
pub mod device;
pub mod math;
pub mod record;
pub mod sim;

#[macro_use]
extern crate log;

mod config;

pub use self::config::*;

pub mod runtime;
pub use self::runtime::Error;
pub use self::runtime::Runtime;

/// Pendulum runtime module containing various constants.
pub mod consts {
    /// Pendulum runtime version.
    ///
    /// # Example
    ///
    /// ```
    /// use pendulum::consts::VERSION;
    ///
    /// println!("Pendulum runtime version: {}", VERSION);
    /// ```
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// Default record file, relative to the working directory.
    ///
    /// # Example
    ///
    /// ```
    /// use pendulum::consts::DEFAULT_RECORD_PATH;
    ///
    /// assert_eq!(DEFAULT_RECORD_PATH, "best_time.txt");
    /// ```
    pub const DEFAULT_RECORD_PATH: &str = "best_time.txt";

    /// Default proportional gain.
    pub const DEFAULT_KP: f64 = 35.0;
    /// Default integral gain.
    pub const DEFAULT_KI: f64 = 0.5;
    /// Default derivative gain.
    pub const DEFAULT_KD: f64 = 8.0;

    /// Name of the pole angle sensor.
    pub const DEVICE_POLE_SENSOR: &str = "pole position sensor";
    /// Name of the cart force actuator.
    pub const DEVICE_CART_MOTOR: &str = "cart motor";

    /// Default basic time step of the simulation host in milliseconds.
    pub const DEFAULT_TIME_STEP_MS: u64 = 16;
}
