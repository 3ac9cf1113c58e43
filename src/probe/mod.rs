//! Device capability probes
//!
//! Each check that needs hardware talks to a probe: something that can be
//! started, streams readings to a callback, and is stopped by cancelling the
//! returned [`Subscription`]. Probes report their own failures to the
//! caller. Nothing here ever writes to the session ledger; the caller
//! records the tester's final verdict.

mod registry;
mod scripted;
mod smoothing;
mod subscription;

pub use registry::ProbeRegistry;
pub use scripted::{ScriptedProbe, UnavailableProbe};
pub use smoothing::{MotionSmoother, DEFAULT_MOTION_ALPHA};
pub use subscription::{CancelHandle, Subscription};

use serde::Serialize;

/// Three-axis motion sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MotionVector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// One sample produced by a probe
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reading {
    /// Normalised input level in `[0, 1]`
    Level(f32),
    /// Gyroscope rotation rate or accelerometer g-force
    Motion(MotionVector),
    /// Proximity sensor state
    Proximity { near: bool },
    /// Battery charge in `[0, 1]` and whether external power is connected
    Battery { level: f32, charging: bool },
    /// Camera preview frame dimensions
    Frame { width: u32, height: u32 },
    /// Simultaneous touch points
    Touch { points: u32 },
    /// Tone currently playing
    Tone { frequency_hz: u32 },
}

impl std::fmt::Display for Reading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reading::Level(level) => {
                let bars = (level.clamp(0.0, 1.0) * 20.0).round() as usize;
                write!(f, "level {:>3.0}% {}", level * 100.0, "#".repeat(bars))
            }
            Reading::Motion(v) => write!(f, "x {:+.2}  y {:+.2}  z {:+.2}", v.x, v.y, v.z),
            Reading::Proximity { near } => {
                write!(f, "proximity {}", if *near { "near" } else { "far" })
            }
            Reading::Battery { level, charging } => write!(
                f,
                "battery {:.0}%{}",
                level * 100.0,
                if *charging { " (charging)" } else { "" }
            ),
            Reading::Frame { width, height } => write!(f, "frame {}x{}", width, height),
            Reading::Touch { points } => write!(f, "{} touch point(s)", points),
            Reading::Tone { frequency_hz } => write!(f, "playing {} Hz", frequency_hz),
        }
    }
}

/// Callback receiving readings on the probe's thread
pub type ReadingSink = Box<dyn FnMut(Reading) + Send + 'static>;

/// A device capability that can stream readings
pub trait Probe: Send {
    /// Short name used in logs and errors
    fn name(&self) -> &str;

    /// Begin producing readings into `on_reading`.
    ///
    /// The stream ends when the returned subscription is cancelled or
    /// dropped, or when the probe runs out of readings.
    fn start(&mut self, on_reading: ReadingSink) -> Result<Subscription, ProbeError>;
}

/// Probe start-up failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    #[error("Probe unavailable: {0}")]
    Unavailable(String),

    #[error("Permission denied for probe: {0}")]
    PermissionDenied(String),

    #[error("Probe already running: {0}")]
    AlreadyRunning(String),
}

impl ProbeError {
    /// Whether the caller should fall back to asking the tester directly
    pub fn allows_manual_fallback(&self) -> bool {
        matches!(
            self,
            ProbeError::Unavailable(_) | ProbeError::PermissionDenied(_)
        )
    }
}
