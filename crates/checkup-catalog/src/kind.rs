//! Tagged description of what each check needs from the device.
//!
//! The checklist resolves a test id to a [`TestKind`] through a lookup table
//! instead of comparing strings at every call site. Ids without a dedicated
//! screen resolve to [`TestKind::Manual`].

use serde::{Deserialize, Serialize};

/// Speaker position under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeakerPosition {
    /// Earpiece
    Top,
    /// Loudspeaker
    Bottom,
}

/// Camera facing under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraFacing {
    Front,
    Rear,
}

/// Motion sensor under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionSensor {
    Gyroscope,
    Accelerometer,
}

/// Panel colours cycled through by the dead-pixel check.
pub const LCD_COLORS: &[&str] = &[
    "#FFFFFF", "#000000", "#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF", "#00FFFF",
];

/// Earpiece test tone.
pub const TOP_SPEAKER_FREQUENCY_HZ: u32 = 440;

/// Loudspeaker test tone.
pub const BOTTOM_SPEAKER_FREQUENCY_HZ: u32 = 1000;

/// What a check needs in order to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TestKind {
    /// Full-screen colour cycle for dead pixels and spots
    ColorCycle { colors: &'static [&'static str] },
    /// Multi-touch point drawing
    MultiTouch,
    /// Tone played through one speaker
    Speaker {
        position: SpeakerPosition,
        frequency_hz: u32,
    },
    /// Record, meter and play back
    Microphone,
    /// Live preview from one camera
    Camera { facing: CameraFacing },
    /// Near/far proximity events
    Proximity,
    /// Continuous motion readings
    Motion { sensor: MotionSensor },
    /// Battery level and charging state
    Battery,
    /// No device access; the tester inspects and confirms
    Manual,
}

impl TestKind {
    /// Stable discriminant name, used as a registry key.
    pub fn name(&self) -> &'static str {
        match self {
            TestKind::ColorCycle { .. } => "color_cycle",
            TestKind::MultiTouch => "multi_touch",
            TestKind::Speaker { .. } => "speaker",
            TestKind::Microphone => "microphone",
            TestKind::Camera { .. } => "camera",
            TestKind::Proximity => "proximity",
            TestKind::Motion { .. } => "motion",
            TestKind::Battery => "battery",
            TestKind::Manual => "manual",
        }
    }

    /// Whether the check needs a live device collaborator.
    pub fn needs_probe(&self) -> bool {
        !matches!(self, TestKind::Manual | TestKind::ColorCycle { .. })
    }
}

/// Lookup table from test id to the kind of check it is.
pub(crate) const KIND_TABLE: &[(&str, TestKind)] = &[
    ("lcd", TestKind::ColorCycle { colors: LCD_COLORS }),
    ("touch", TestKind::MultiTouch),
    (
        "speaker-top",
        TestKind::Speaker {
            position: SpeakerPosition::Top,
            frequency_hz: TOP_SPEAKER_FREQUENCY_HZ,
        },
    ),
    (
        "speaker-bottom",
        TestKind::Speaker {
            position: SpeakerPosition::Bottom,
            frequency_hz: BOTTOM_SPEAKER_FREQUENCY_HZ,
        },
    ),
    ("microphone", TestKind::Microphone),
    (
        "camera-rear",
        TestKind::Camera {
            facing: CameraFacing::Rear,
        },
    ),
    (
        "camera-front",
        TestKind::Camera {
            facing: CameraFacing::Front,
        },
    ),
    ("proximity", TestKind::Proximity),
    (
        "gyroscope",
        TestKind::Motion {
            sensor: MotionSensor::Gyroscope,
        },
    ),
    (
        "accelerometer",
        TestKind::Motion {
            sensor: MotionSensor::Accelerometer,
        },
    ),
    ("battery", TestKind::Battery),
];

/// Resolve a test id to its kind, falling back to [`TestKind::Manual`].
pub fn kind_of(id: &str) -> TestKind {
    KIND_TABLE
        .iter()
        .find(|(key, _)| *key == id)
        .map(|(_, kind)| *kind)
        .unwrap_or(TestKind::Manual)
}
