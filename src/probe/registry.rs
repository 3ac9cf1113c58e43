//! Maps check kinds to the probe that serves them

use std::collections::HashMap;
use std::time::Duration;

use checkup_catalog::{CameraFacing, MotionSensor, TestKind};

use super::scripted::{ScriptedProbe, UnavailableProbe};
use super::{MotionVector, Probe, Reading};

type ProbeFactory = Box<dyn Fn(&TestKind) -> Box<dyn Probe> + Send + Sync>;

/// Probe factories keyed by [`TestKind::name`]
#[derive(Default)]
pub struct ProbeRegistry {
    factories: HashMap<&'static str, ProbeFactory>,
}

impl std::fmt::Debug for ProbeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.factories.keys().collect();
        kinds.sort();
        f.debug_struct("ProbeRegistry").field("kinds", &kinds).finish()
    }
}

impl ProbeRegistry {
    /// Registry with no probes; every check falls back to manual confirmation
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for one kind of check, replacing any earlier one
    pub fn register<F>(&mut self, kind: &'static str, factory: F)
    where
        F: Fn(&TestKind) -> Box<dyn Probe> + Send + Sync + 'static,
    {
        self.factories.insert(kind, Box::new(factory));
    }

    pub fn is_registered(&self, kind: &TestKind) -> bool {
        self.factories.contains_key(kind.name())
    }

    /// Build the probe for a check kind.
    ///
    /// Unregistered kinds get an [`UnavailableProbe`].
    pub fn probe_for(&self, kind: &TestKind) -> Box<dyn Probe> {
        match self.factories.get(kind.name()) {
            Some(factory) => factory(kind),
            None => Box::new(UnavailableProbe::new(kind.name())),
        }
    }

    /// Registry of scripted probes producing plausible readings for every
    /// kind that needs a device collaborator.
    pub fn simulated(interval: Duration) -> Self {
        let mut registry = Self::new();

        registry.register("multi_touch", move |kind| {
            let readings = (1..=5).map(|points| Reading::Touch { points }).collect();
            Box::new(ScriptedProbe::new(kind.name(), readings, interval))
        });

        registry.register("speaker", move |kind| {
            let frequency_hz = match kind {
                TestKind::Speaker { frequency_hz, .. } => *frequency_hz,
                _ => 0,
            };
            let readings = vec![Reading::Tone { frequency_hz }; 3];
            Box::new(ScriptedProbe::new(kind.name(), readings, interval))
        });

        registry.register("microphone", move |kind| {
            let readings = [0.05, 0.2, 0.65, 0.9, 0.4, 0.1]
                .into_iter()
                .map(Reading::Level)
                .collect();
            Box::new(ScriptedProbe::new(kind.name(), readings, interval))
        });

        registry.register("camera", move |kind| {
            let (width, height) = match kind {
                TestKind::Camera {
                    facing: CameraFacing::Front,
                } => (1280, 720),
                _ => (1920, 1080),
            };
            let readings = vec![Reading::Frame { width, height }; 3];
            Box::new(ScriptedProbe::new(kind.name(), readings, interval))
        });

        registry.register("proximity", move |kind| {
            let readings = vec![
                Reading::Proximity { near: false },
                Reading::Proximity { near: true },
                Reading::Proximity { near: false },
            ];
            Box::new(ScriptedProbe::new(kind.name(), readings, interval))
        });

        registry.register("motion", move |kind| {
            let gravity = matches!(
                kind,
                TestKind::Motion {
                    sensor: MotionSensor::Accelerometer
                }
            );
            let base_z = if gravity { -1.0 } else { 0.0 };
            let readings = [0.0_f32, 0.3, 0.6, 0.2, -0.4]
                .into_iter()
                .map(|t| {
                    Reading::Motion(MotionVector {
                        x: t,
                        y: -t / 2.0,
                        z: base_z + t / 4.0,
                    })
                })
                .collect();
            Box::new(ScriptedProbe::new(kind.name(), readings, interval))
        });

        registry.register("battery", move |kind| {
            let readings = vec![
                Reading::Battery {
                    level: 0.82,
                    charging: false,
                },
                Reading::Battery {
                    level: 0.82,
                    charging: true,
                },
            ];
            Box::new(ScriptedProbe::new(kind.name(), readings, interval))
        });

        registry
    }
}
