//! Check descriptors and the categories they are grouped under.

use serde::{Deserialize, Serialize};

/// Grouping used by the checklist view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestCategory {
    /// Visual inspection of the panel
    VisualInspection,
    /// Display and touch input
    DisplayTouch,
    /// Speakers and microphone
    Audio,
    /// Front and rear cameras
    Camera,
    /// Motion, proximity and biometric sensors
    Sensors,
    /// Radios and SIM
    Connectivity,
    /// Battery and charging
    Battery,
}

impl TestCategory {
    /// All categories in display order.
    pub const ALL: [TestCategory; 7] = [
        TestCategory::VisualInspection,
        TestCategory::DisplayTouch,
        TestCategory::Audio,
        TestCategory::Camera,
        TestCategory::Sensors,
        TestCategory::Connectivity,
        TestCategory::Battery,
    ];

    /// Section heading shown above the checks of this category.
    pub fn title(&self) -> &'static str {
        match self {
            TestCategory::VisualInspection => "Visual inspection",
            TestCategory::DisplayTouch => "Display & touch",
            TestCategory::Audio => "Audio",
            TestCategory::Camera => "Cameras",
            TestCategory::Sensors => "Sensors",
            TestCategory::Connectivity => "Connectivity",
            TestCategory::Battery => "Battery",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TestCategory::VisualInspection => "visual_inspection",
            TestCategory::DisplayTouch => "display_touch",
            TestCategory::Audio => "audio",
            TestCategory::Camera => "camera",
            TestCategory::Sensors => "sensors",
            TestCategory::Connectivity => "connectivity",
            TestCategory::Battery => "battery",
        }
    }
}

impl std::fmt::Display for TestCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Immutable descriptor for a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TestDefinition {
    /// Stable key, e.g. `camera-rear`
    pub id: &'static str,
    /// Human-readable name
    pub display_name: &'static str,
    /// Icon reference (SF Symbol style name)
    pub icon: &'static str,
}

impl TestDefinition {
    pub const fn new(id: &'static str, display_name: &'static str, icon: &'static str) -> Self {
        Self {
            id,
            display_name,
            icon,
        }
    }
}

/// A category heading together with its checks, in display order.
#[derive(Debug, Clone, Copy)]
pub struct CatalogSection {
    pub category: TestCategory,
    pub tests: &'static [TestDefinition],
}
