//! Static catalog of device checks.
//!
//! The catalog lists every check the checklist offers, grouped by category,
//! and maps each test id to the kind of device access it needs. It is built
//! once and never mutated.

mod definition;
mod kind;

pub use definition::{CatalogSection, TestCategory, TestDefinition};
pub use kind::{
    kind_of, CameraFacing, MotionSensor, SpeakerPosition, TestKind, BOTTOM_SPEAKER_FREQUENCY_HZ,
    LCD_COLORS, TOP_SPEAKER_FREQUENCY_HZ,
};

const VISUAL_INSPECTION: &[TestDefinition] = &[
    TestDefinition::new("lcd", "LCD test - spots/pixels", "display"),
    TestDefinition::new("corners", "Display corners", "square.dashed"),
    TestDefinition::new("spots", "Scratches", "eye"),
];

const DISPLAY_TOUCH: &[TestDefinition] = &[
    TestDefinition::new("touch", "Multi-touch", "hand.tap"),
    TestDefinition::new("haptic", "Haptic touch", "waveform.path.ecg"),
    TestDefinition::new("truetone", "TrueTone & Night Shift", "sun.max"),
];

const AUDIO: &[TestDefinition] = &[
    TestDefinition::new("speaker-top", "Top speaker", "speaker.wave.1"),
    TestDefinition::new("speaker-bottom", "Bottom speaker", "speaker.wave.3"),
    TestDefinition::new("microphone", "Microphone", "mic"),
];

const CAMERA: &[TestDefinition] = &[
    TestDefinition::new("camera-rear", "Rear camera", "camera"),
    TestDefinition::new("camera-front", "Front camera", "camera.fill"),
];

const SENSORS: &[TestDefinition] = &[
    TestDefinition::new("proximity", "Proximity sensor", "sensor"),
    TestDefinition::new("faceid", "Face ID / Touch ID", "faceid"),
    TestDefinition::new("gyroscope", "Gyroscope", "gyroscope"),
    TestDefinition::new("accelerometer", "Accelerometer", "move.3d"),
];

const CONNECTIVITY: &[TestDefinition] = &[
    TestDefinition::new("wifi", "WiFi", "wifi"),
    TestDefinition::new("bluetooth", "Bluetooth", "bluetooth"),
    TestDefinition::new("gps", "GPS", "location"),
    TestDefinition::new("nfc", "NFC / Apple Pay", "wave.3.right"),
    TestDefinition::new("cellular", "SIM card", "antenna.radiowaves.left.and.right"),
];

const BATTERY: &[TestDefinition] = &[
    TestDefinition::new("battery", "Battery health", "battery.100"),
    TestDefinition::new("charging-cable", "Cable charging", "cable.connector"),
    TestDefinition::new("charging-wireless", "Wireless charging", "magsafe.batterypack"),
];

const BUILTIN_SECTIONS: &[CatalogSection] = &[
    CatalogSection {
        category: TestCategory::VisualInspection,
        tests: VISUAL_INSPECTION,
    },
    CatalogSection {
        category: TestCategory::DisplayTouch,
        tests: DISPLAY_TOUCH,
    },
    CatalogSection {
        category: TestCategory::Audio,
        tests: AUDIO,
    },
    CatalogSection {
        category: TestCategory::Camera,
        tests: CAMERA,
    },
    CatalogSection {
        category: TestCategory::Sensors,
        tests: SENSORS,
    },
    CatalogSection {
        category: TestCategory::Connectivity,
        tests: CONNECTIVITY,
    },
    CatalogSection {
        category: TestCategory::Battery,
        tests: BATTERY,
    },
];

/// Catalog lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Unknown test id: {0}")]
    UnknownTest(String),
}

/// Read-only view over the catalog sections.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    sections: &'static [CatalogSection],
}

impl Catalog {
    /// The built-in device checklist.
    pub fn builtin() -> Self {
        Self {
            sections: BUILTIN_SECTIONS,
        }
    }

    /// Sections in display order.
    pub fn sections(&self) -> &'static [CatalogSection] {
        self.sections
    }

    /// Iterate over every check in display order.
    pub fn iter(&self) -> impl Iterator<Item = &'static TestDefinition> {
        self.sections.iter().flat_map(|s| s.tests.iter())
    }

    /// Number of checks in the catalog.
    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.tests.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a check by id.
    pub fn get(&self, id: &str) -> Option<&'static TestDefinition> {
        self.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Look up a check by id, failing for ids outside the catalog.
    pub fn require(&self, id: &str) -> Result<&'static TestDefinition, CatalogError> {
        self.get(id)
            .ok_or_else(|| CatalogError::UnknownTest(id.to_string()))
    }

    /// Category the check belongs to.
    pub fn category_of(&self, id: &str) -> Option<TestCategory> {
        self.sections
            .iter()
            .find(|s| s.tests.iter().any(|t| t.id == id))
            .map(|s| s.category)
    }

    /// Kind of device access the check needs.
    pub fn kind_of(&self, id: &str) -> TestKind {
        kind_of(id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
