//! The asteroid belt animation driver.
//!
//! Setup binds each belt entry to a fresh stage node. Every frame,
//! [`AsteroidBelt::step`] recomputes all twelve poses from the wall clock
//! and commits them to their nodes.

use log::{debug, info};
use orrery_core::{BELT, Field, Pose, Preset, TimingProfile, Viewport};

use crate::capability::TransformSupport;
use crate::stage::{NodeId, Stage};

/// One asteroid: its node on the stage and its timing.
#[derive(Debug, Clone, Copy)]
pub struct AnimatedElement {
    index: usize,
    node: NodeId,
    profile: TimingProfile,
}

impl AnimatedElement {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn profile(&self) -> &TimingProfile {
        &self.profile
    }
}

/// The belt of asteroids and the stage they are drawn on.
#[derive(Debug)]
pub struct AsteroidBelt {
    elements: Vec<AnimatedElement>,
    field: Field,
    viewport: Viewport,
    preset: Preset,
    stage: Stage,
}

impl AsteroidBelt {
    /// Build the belt. Returns `None`, doing nothing, when transforms are
    /// unsupported or there is no stage to draw on.
    pub fn setup(
        support: TransformSupport,
        anchor: Option<Stage>,
        viewport: Viewport,
        preset: Preset,
    ) -> Option<Self> {
        let Some(property) = support.property() else {
            debug!("transforms unsupported, asteroid belt disabled");
            return None;
        };
        let Some(mut stage) = anchor else {
            debug!("no stage to anchor on, asteroid belt disabled");
            return None;
        };

        let field = Field::derive(&viewport, preset);
        stage.set_property(property);
        stage.project(&field);

        let elements: Vec<AnimatedElement> = BELT
            .iter()
            .enumerate()
            .map(|(index, entry)| AnimatedElement {
                index,
                node: stage.create_node(format!("asteroid{}", index + 1)),
                profile: entry.profile(field.layout),
            })
            .collect();

        info!(
            "asteroid belt ready: {} elements, {:?} layout, rendering as {}",
            BELT.len(),
            field.layout,
            property.name()
        );

        Some(Self {
            elements,
            field,
            viewport,
            preset,
            stage,
        })
    }

    /// Advance every asteroid to `now_ms` and commit the poses.
    pub fn step(&mut self, now_ms: f64) {
        for element in &self.elements {
            let pose = Pose::at(now_ms, &element.profile, &self.field);
            self.stage.commit(element.node, pose);
        }
    }

    /// Re-derive the field for a new viewport. Only the translation
    /// duration and vertical offsets can change; rotation is untouched.
    pub fn relayout(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let field = Field::derive(&viewport, self.preset);
        if field.layout != self.field.layout {
            debug!("belt layout {:?} -> {:?}", self.field.layout, field.layout);
            for element in &mut self.elements {
                element.profile = BELT[element.index].profile(field.layout);
            }
        }
        self.field = field;
        self.stage.project(&field);
    }

    /// Switch preset and re-derive the layout for the current viewport.
    pub fn set_preset(&mut self, preset: Preset) {
        self.preset = preset;
        self.relayout(self.viewport);
    }

    pub fn preset(&self) -> Preset {
        self.preset
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn elements(&self) -> &[AnimatedElement] {
        &self.elements
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }
}
