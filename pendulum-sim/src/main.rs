// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use clap::Parser;

#[derive(Parser)]
#[command(author = "Copyright (C) 2024 Laixer Equipment B.V.")]
#[command(version, propagate_version = true)]
#[command(about = "Inverted pendulum balancing simulator", long_about = None)]
struct Args {
    /// Configuration file.
    #[arg(short = 'c', long = "config", alias = "conf", value_name = "FILE")]
    config: Option<std::path::PathBuf>,
    /// Record file.
    #[arg(long, value_name = "FILE")]
    record: Option<std::path::PathBuf>,
    /// Simulation time step in milliseconds.
    #[arg(long, value_name = "MS")]
    time_step: Option<u64>,
    /// End the simulation after this many simulated seconds.
    #[arg(long, value_name = "SECONDS")]
    max_duration: Option<f64>,
    /// Step as fast as possible instead of in real time.
    #[arg(long)]
    no_realtime: bool,
    /// Introduce random disturbances.
    #[arg(long)]
    jitter: bool,
    /// Quiet output (no logging).
    #[arg(long)]
    quiet: bool,
    /// Daemonize the service.
    #[arg(long)]
    daemon: bool,
    /// Level of verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let bin_name = env!("CARGO_BIN_NAME");

    let mut config: pendulum::Config = match &args.config {
        Some(path) => pendulum::from_file(path)?,
        None => pendulum::Config::default(),
    };

    config.global.bin_name = bin_name.to_string();
    config.global.daemon = args.daemon;

    if let Some(record) = args.record {
        config.controller.record_path = record;
    }
    if let Some(time_step) = args.time_step {
        config.simulation.time_step_ms = time_step;
    }
    if args.max_duration.is_some() {
        config.simulation.max_duration = args.max_duration;
    }
    if args.no_realtime {
        config.simulation.realtime = false;
    }
    if args.jitter {
        config.simulation.jitter = true;
    }
    if args.quiet {
        config.controller.progress = false;
    }

    let mut log_config = simplelog::ConfigBuilder::new();
    if args.daemon {
        log_config.set_time_level(log::LevelFilter::Off);
        log_config.set_thread_level(log::LevelFilter::Off);
    } else {
        log_config.set_time_offset_to_local().ok();
        log_config.set_time_format_rfc2822();
    }

    log_config.set_target_level(log::LevelFilter::Off);
    log_config.set_location_level(log::LevelFilter::Off);
    log_config.add_filter_ignore_str("mio");

    let log_level = if args.daemon {
        log::LevelFilter::Info
    } else if args.quiet {
        log::LevelFilter::Off
    } else {
        match args.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };

    let color_choice = if args.daemon {
        simplelog::ColorChoice::Never
    } else {
        simplelog::ColorChoice::Auto
    };

    simplelog::TermLogger::init(
        log_level,
        log_config.build(),
        simplelog::TerminalMode::Mixed,
        color_choice,
    )?;

    if args.daemon {
        log::debug!("Running service as daemon");
    }

    log::trace!("{:#?}", config);

    daemonize(&config).await
}

async fn daemonize(config: &pendulum::Config) -> anyhow::Result<()> {
    use pendulum::sim::CartPoleHost;

    log::info!("Pendulum runtime version: {}", pendulum::consts::VERSION);

    let host = CartPoleHost::new(config.simulation.clone());

    log::debug!("Initial pole angle: {:.4} rad", host.state().theta);

    let mut runtime = pendulum::Runtime::builder(config, host)?
        .with_shutdown()
        .build();

    let summary = runtime.run().await?;

    log::debug!(
        "{} steps, {} record updates",
        summary.steps,
        summary.new_records
    );

    log::debug!("{} was shutdown gracefully", config.global.bin_name);

    Ok(())
}
