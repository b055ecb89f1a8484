//! The stage: display nodes the belt draws into, rendered as a widget.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect, Size},
    widgets::Widget,
};

use orrery_core::{Field, Pose};

use crate::capability::TransformProperty;
use crate::chars::{PEBBLE_FRAMES, ROCK_FRAMES, SPECK};
use crate::color::rock_color;

/// Scale below which a node is not drawn at all.
const HIDDEN_BELOW: f64 = 0.05;

/// Index of a node owned by a [`Stage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Node {
    class: String,
    /// Last committed transform. `None` until the first frame.
    pose: Option<Pose>,
}

/// Display surface owning one node per animated element.
#[derive(Debug, Clone)]
pub struct Stage {
    nodes: Vec<Node>,
    property: TransformProperty,
    /// Pixel width mapped onto the drawing area's columns.
    viewport_width: f64,
    /// Pixel height mapped onto the drawing area's rows.
    scene_height: f64,
}

impl Stage {
    /// Anchor a stage on a drawing surface of `size`. Returns `None` when
    /// there is nothing to draw on.
    pub fn anchor(size: Size) -> Option<Self> {
        if size.width == 0 || size.height == 0 {
            return None;
        }
        Some(Self {
            nodes: Vec::new(),
            property: TransformProperty::Ansi16,
            viewport_width: 1.0,
            scene_height: 1.0,
        })
    }

    /// Create a node and hand back its id.
    pub fn create_node(&mut self, class: impl Into<String>) -> NodeId {
        self.nodes.push(Node {
            class: class.into(),
            pose: None,
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Replace a node's transform.
    pub fn commit(&mut self, id: NodeId, pose: Pose) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.pose = Some(pose);
        }
    }

    /// Set how pixel-space poses map onto the drawing area.
    pub fn project(&mut self, field: &Field) {
        self.viewport_width = field.width.max(1.0);
        self.scene_height = field.scene_height().max(1.0);
    }

    pub fn set_property(&mut self, property: TransformProperty) {
        self.property = property;
    }

    pub fn property(&self) -> TransformProperty {
        self.property
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn class(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id.0).map(|node| node.class.as_str())
    }

    pub fn pose(&self, id: NodeId) -> Option<Pose> {
        self.nodes.get(id.0).and_then(|node| node.pose)
    }

    /// Cell a pose lands on within `area`, if it lands inside it.
    pub fn cell_for(&self, pose: &Pose, area: Rect) -> Option<Position> {
        let col = (pose.x / self.viewport_width * area.width as f64).floor();
        let row = (pose.y / self.scene_height * area.height as f64).floor();
        if !(0.0..area.width as f64).contains(&col) || !(0.0..area.height as f64).contains(&row) {
            return None;
        }
        Some(Position::new(area.x + col as u16, area.y + row as u16))
    }
}

/// Glyph for a pose: size class from scale, frame from rotation.
fn glyph(pose: &Pose) -> char {
    let quarter = ((pose.rotation_deg / 90.0) as usize).min(3);
    if pose.scale < 0.35 {
        SPECK
    } else if pose.scale < 0.7 {
        PEBBLE_FRAMES[quarter]
    } else {
        ROCK_FRAMES[quarter]
    }
}

impl Widget for &Stage {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (index, node) in self.nodes.iter().enumerate() {
            let Some(pose) = node.pose else { continue };
            if pose.scale < HIDDEN_BELOW {
                continue;
            }
            let Some(position) = self.cell_for(&pose, area) else {
                continue;
            };
            // Slight hue shift per node so neighbours read as separate rocks.
            let hue = 20.0 + (index * 7 % 30) as f32;
            let color = rock_color(self.property, hue, pose.scale as f32);
            if let Some(cell) = buf.cell_mut(position) {
                cell.set_char(glyph(&pose)).set_fg(color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_core::{Preset, Viewport};

    fn stage() -> Stage {
        let mut stage = Stage::anchor(Size::new(40, 10)).unwrap();
        stage.project(&Field::derive(
            &Viewport::new(2000.0, 1000.0),
            Preset::Adaptive,
        ));
        stage
    }

    fn pose(x: f64, y: f64, rotation_deg: f64, scale: f64) -> Pose {
        Pose {
            x,
            y,
            rotation_deg,
            scale,
        }
    }

    #[test]
    fn test_anchor_needs_area() {
        assert!(Stage::anchor(Size::new(0, 10)).is_none());
        assert!(Stage::anchor(Size::new(10, 0)).is_none());
        assert!(Stage::anchor(Size::new(1, 1)).is_some());
    }

    #[test]
    fn test_nodes_keep_creation_order() {
        let mut stage = stage();
        let a = stage.create_node("asteroid1");
        let b = stage.create_node("asteroid2");
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(stage.class(b), Some("asteroid2"));
        assert_eq!(stage.pose(a), None);
        stage.commit(a, pose(1.0, 2.0, 3.0, 0.5));
        assert_eq!(stage.pose(a), Some(pose(1.0, 2.0, 3.0, 0.5)));
    }

    #[test]
    fn test_projection() {
        let stage = stage();
        let area = Rect::new(0, 0, 40, 10);
        // Scene is 450 px tall on a wide viewport.
        assert_eq!(
            stage.cell_for(&pose(1000.0, 225.0, 0.0, 1.0), area),
            Some(Position::new(20, 5))
        );
        assert_eq!(
            stage.cell_for(&pose(0.0, 0.0, 0.0, 1.0), Rect::new(3, 4, 40, 10)),
            Some(Position::new(3, 4))
        );
        assert_eq!(stage.cell_for(&pose(0.0, 450.0, 0.0, 1.0), area), None);
        assert_eq!(stage.cell_for(&pose(-1.0, 10.0, 0.0, 1.0), area), None);
    }

    #[test]
    fn test_glyph_selection() {
        assert_eq!(glyph(&pose(0.0, 0.0, 0.0, 0.1)), SPECK);
        assert_eq!(glyph(&pose(0.0, 0.0, 100.0, 0.5)), PEBBLE_FRAMES[1]);
        assert_eq!(glyph(&pose(0.0, 0.0, 359.9, 1.0)), ROCK_FRAMES[3]);
    }

    #[test]
    fn test_render_draws_visible_nodes_only() {
        let mut stage = stage();
        let shown = stage.create_node("asteroid1");
        let hidden = stage.create_node("asteroid2");
        stage.create_node("asteroid3");
        stage.commit(shown, pose(1000.0, 225.0, 0.0, 1.0));
        stage.commit(hidden, pose(500.0, 225.0, 0.0, 0.0));

        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        (&stage).render(area, &mut buf);

        let symbol = |x, y| buf.cell(Position::new(x, y)).map(|c| c.symbol().to_string());
        assert_eq!(symbol(20, 5), Some(ROCK_FRAMES[0].to_string()));
        assert_eq!(symbol(10, 5), Some(" ".to_string()));
    }

    #[test]
    fn test_render_hides_nearly_vanished_nodes() {
        let mut stage = stage();
        let faint = stage.create_node("asteroid1");
        let speck = stage.create_node("asteroid2");
        stage.commit(faint, pose(500.0, 225.0, 0.0, HIDDEN_BELOW / 2.0));
        stage.commit(speck, pose(1500.0, 225.0, 0.0, HIDDEN_BELOW));

        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        (&stage).render(area, &mut buf);

        let symbol = |x, y| buf.cell(Position::new(x, y)).map(|c| c.symbol().to_string());
        assert_eq!(symbol(10, 5), Some(" ".to_string()));
        assert_eq!(symbol(30, 5), Some(SPECK.to_string()));
    }
}
