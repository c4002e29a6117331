//! End-to-end run against simulated vendor drivers.

use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use fingerbridge_core::SensorConfig;
use fingerbridge_hal::mock::{MockDriver, MockRegistry};
use fingerbridge_hal::{AcquiredInfo, DeviceHandle, DriverErrorCode, Finger, FingerprintMsg};
use fingerbridge_service::{
    DeathRecipient, Fingerprint, FingerprintHal, SessionCallback, SessionEvent, UdfpsHandler,
    UdfpsHandlerFactory,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Status a failing simulated driver returns from open (`-ENODEV`).
const SIMULATED_OPEN_FAILURE: i32 = -19;

/// Touch ellipse axes of the simulated finger, in pixels.
const TOUCH_MINOR: f32 = 6.0;
const TOUCH_MAJOR: f32 = 8.0;

#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Candidate classes whose open entry point fails.
    #[arg(long, value_name = "CLASS")]
    pub fail: Vec<String>,

    /// Candidate classes that are not installed.
    #[arg(long, value_name = "CLASS")]
    pub missing: Vec<String>,

    /// User the session is opened for.
    #[arg(long, default_value_t = 0)]
    pub user_id: i32,

    /// Rejected touches to simulate before the matching one.
    #[arg(long, default_value_t = 2)]
    pub rejections: u32,
}

/// Client callback forwarding events into a tokio channel.
///
/// Sending on an unbounded channel never blocks the driver thread.
struct ChannelCallback {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionCallback for ChannelCallback {
    fn on_event(&self, event: SessionEvent) {
        if self.tx.send(event).is_err() {
            warn!("Client event receiver is gone");
        }
    }

    fn link_to_death(&self, _recipient: DeathRecipient) -> fingerbridge_service::Result<()> {
        // The simulated client lives as long as the process
        Ok(())
    }
}

/// Under-display glue that only logs.
struct LoggingUdfps;

impl UdfpsHandler for LoggingUdfps {
    fn init(&self, device: &DeviceHandle) {
        info!("UDFPS handler bound to {}", device.class_name());
    }

    fn on_acquired(&self, info: AcquiredInfo) {
        debug!("UDFPS acquired {:?}", info);
    }

    fn on_finger_down(&self, x: u32, y: u32, minor: f32, major: f32) {
        debug!("UDFPS finger down at ({}, {}), {}x{}", x, y, minor, major);
    }

    fn on_finger_up(&self) {
        debug!("UDFPS finger up");
    }

    fn cancel(&self) {
        debug!("UDFPS cancel");
    }
}

struct LoggingUdfpsFactory;

impl UdfpsHandlerFactory for LoggingUdfpsFactory {
    fn create(&self) -> Option<Arc<dyn UdfpsHandler>> {
        Some(Arc::new(LoggingUdfps))
    }

    fn destroy(&self, _handler: Arc<dyn UdfpsHandler>) {
        info!("UDFPS handler destroyed");
    }
}

pub async fn run(config: SensorConfig, args: SimulateArgs) -> anyhow::Result<()> {
    let registry = Arc::new(build_registry(&config, &args));

    let hal = Fingerprint::builder(config, registry.clone())
        .udfps_factory(Arc::new(LoggingUdfpsFactory))
        .build()
        .context("adapter construction failed")?;
    let class_name = hal
        .device_class()
        .context("adapter has no bound device")?
        .to_string();
    let driver = registry
        .driver(&class_name)
        .context("bound driver missing from registry")?;

    // Nobody is listening yet; these are dropped by the router
    driver.emit(&FingerprintMsg::Acquired(AcquiredInfo::Good));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(async move {
        let mut received = 0usize;
        while let Some(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(err) => warn!("Can't encode event: {}", err),
            }
            received += 1;
        }
        received
    });

    let session = hal.create_session(
        hal.config().sensor_id,
        args.user_id,
        Arc::new(ChannelCallback { tx }),
    )?;
    info!("Session {} opened on {}", session.id(), class_name);

    let (x, y) = touch_point(hal.config());
    session.on_pointer_down(x, y, TOUCH_MINOR, TOUCH_MAJOR);

    let script = script(args.user_id, args.rejections);
    let emitter = driver.emit_from_thread(script);
    let delivered = tokio::task::spawn_blocking(move || emitter.join())
        .await?
        .map_err(|_| anyhow::anyhow!("simulated driver thread panicked"))?;

    session.on_pointer_up();
    session.close();
    let router = hal.router();
    info!(
        "Driver delivered {} message(s): {} routed, {} dropped",
        delivered,
        router.routed(),
        router.dropped()
    );

    drop(session);
    drop(hal);

    let received = printer.await?;
    info!("Client received {} event(s)", received);
    Ok(())
}

/// One simulated driver per configured candidate.
fn build_registry(config: &SensorConfig, args: &SimulateArgs) -> MockRegistry {
    config
        .candidate_modules
        .iter()
        .filter(|name| !args.missing.contains(name))
        .fold(MockRegistry::new(), |registry, name| {
            let driver = MockDriver::new(name.as_str());
            if args.fail.contains(name) {
                registry.with_driver(driver.fail_open(SIMULATED_OPEN_FAILURE))
            } else {
                registry.with_driver(driver)
            }
        })
}

/// Where the simulated finger lands: the sensor center, or the origin if
/// no location is configured.
fn touch_point(config: &SensorConfig) -> (u32, u32) {
    let location = &config.location;
    (
        u32::try_from(location.x).unwrap_or_default(),
        u32::try_from(location.y).unwrap_or_default(),
    )
}

/// Messages the simulated driver reports for one authentication attempt.
fn script(user_id: i32, rejections: u32) -> Vec<FingerprintMsg> {
    let gid = u32::try_from(user_id).unwrap_or_default();
    let mut messages = vec![
        FingerprintMsg::Acquired(AcquiredInfo::Partial),
        FingerprintMsg::Acquired(AcquiredInfo::Good),
    ];

    messages.extend((0..rejections).map(|_| FingerprintMsg::Authenticated {
        finger: Finger::new(gid, 0),
        hat: Vec::new(),
    }));

    messages.extend([
        FingerprintMsg::Authenticated {
            finger: Finger::new(gid, 1),
            hat: vec![0x01, 0x02, 0x03, 0x04],
        },
        FingerprintMsg::TemplateEnumerating {
            finger: Finger::new(gid, 1),
            remaining_templates: 1,
        },
        FingerprintMsg::TemplateEnumerating {
            finger: Finger::new(gid, 2),
            remaining_templates: 0,
        },
        FingerprintMsg::Error(DriverErrorCode::Canceled),
    ]);
    messages
}
