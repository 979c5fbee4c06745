//! Drag geometry: which drop targets are under the pointer and which edge of
//! a card target the pointer is closest to.
//!
//! Nothing here touches the board or the store. A [`DragSession`] follows the
//! pointer over a [`DropTargetRegistry`] and, once released, yields a
//! [`DropEvent`] for [`Board::resolve_drop`](crate::board::Board::resolve_drop).

use serde::{Deserialize, Serialize};

use crate::models::SemesterId;

/// Type tag carried by every draggable course card.
pub const COURSE_CARD: &str = "coursecard";

/// Fraction of a card's height around its midpoint inside which the previous
/// edge is kept.
const EDGE_HYSTERESIS: f64 = 0.1;

/// Top or bottom boundary of a drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Bounding box of a drop target, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// What a dragged card carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    pub kind: &'static str,
    pub display_id: String,
}

impl DragPayload {
    pub fn course_card(display_id: impl Into<String>) -> Self {
        Self {
            kind: COURSE_CARD,
            display_id: display_id.into(),
        }
    }
}

/// The kinds of element a card can be dropped on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DropTargetKind {
    /// A sibling card: insert before or after it
    Card { display_id: String },
    /// A semester container: append at the end
    Container { semester: SemesterId },
    /// Removes the card from whichever semester holds it
    Trash,
}

impl DropTargetKind {
    /// Edges this target reports. Only cards are edge-sensitive, and only
    /// vertically.
    pub fn allowed_edges(&self) -> &'static [Edge] {
        match self {
            DropTargetKind::Card { .. } => &[Edge::Top, Edge::Bottom],
            DropTargetKind::Container { .. } | DropTargetKind::Trash => &[],
        }
    }

    /// Sticky targets stay active after the pointer leaves them, until it
    /// enters another target.
    pub fn is_sticky(&self) -> bool {
        !matches!(self, DropTargetKind::Trash)
    }

    /// Whether this target accepts the given payload.
    pub fn accepts(&self, payload: &DragPayload) -> bool {
        payload.kind == COURSE_CARD
    }
}

/// A target active under the pointer, with its resolved edge.
#[derive(Debug, Clone, PartialEq)]
pub struct DropTarget {
    pub kind: DropTargetKind,
    pub edge: Option<Edge>,
}

impl DropTarget {
    pub fn card(display_id: impl Into<String>, edge: Option<Edge>) -> Self {
        Self {
            kind: DropTargetKind::Card {
                display_id: display_id.into(),
            },
            edge,
        }
    }

    pub fn container(semester: SemesterId) -> Self {
        Self {
            kind: DropTargetKind::Container { semester },
            edge: None,
        }
    }

    pub fn trash() -> Self {
        Self {
            kind: DropTargetKind::Trash,
            edge: None,
        }
    }
}

/// A finished drop: the dragged card and the target chain at release,
/// innermost first.
#[derive(Debug, Clone, PartialEq)]
pub struct DropEvent {
    pub display_id: String,
    pub targets: Vec<DropTarget>,
}

/// Nearest allowed edge to the pointer; ties go to the edge listed first.
pub fn closest_edge(rect: &Rect, pointer: Point, allowed: &[Edge]) -> Option<Edge> {
    allowed
        .iter()
        .map(|&edge| {
            let distance = match edge {
                Edge::Top => (pointer.y - rect.y).abs(),
                Edge::Bottom => (rect.y + rect.height - pointer.y).abs(),
            };
            (edge, distance)
        })
        .fold(None, |best: Option<(Edge, f64)>, (edge, distance)| match best {
            Some((_, best_distance)) if best_distance <= distance => best,
            _ => Some((edge, distance)),
        })
        .map(|(edge, _)| edge)
}

/// The drop targets currently laid out on screen.
#[derive(Debug, Clone, Default)]
pub struct DropTargetRegistry {
    targets: Vec<(DropTargetKind, Rect)>,
}

impl DropTargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a target, replacing the bounds of an existing registration.
    pub fn register(&mut self, kind: DropTargetKind, rect: Rect) {
        match self.targets.iter_mut().find(|(k, _)| *k == kind) {
            Some(entry) => entry.1 = rect,
            None => self.targets.push((kind, rect)),
        }
    }

    pub fn unregister(&mut self, kind: &DropTargetKind) {
        self.targets.retain(|(k, _)| k != kind);
    }

    pub fn bounds(&self, kind: &DropTargetKind) -> Option<Rect> {
        self.targets.iter().find(|(k, _)| k == kind).map(|(_, r)| *r)
    }

    /// Targets under the pointer that accept the payload, innermost (smallest)
    /// first.
    fn hits(&self, pointer: Point, payload: &DragPayload) -> Vec<(&DropTargetKind, &Rect)> {
        let mut hits: Vec<_> = self
            .targets
            .iter()
            .filter(|(kind, rect)| rect.contains(pointer) && kind.accepts(payload))
            .map(|(kind, rect)| (kind, rect))
            .collect();
        hits.sort_by(|a, b| a.1.area().total_cmp(&b.1.area()));
        hits
    }
}

/// State of one drag gesture, from pickup to drop or cancel.
///
/// Consuming [`finish`](Self::finish) or [`cancel`](Self::cancel) ends the
/// gesture, so no indicator can outlive it.
#[derive(Debug)]
pub struct DragSession {
    payload: DragPayload,
    current: Vec<DropTarget>,
}

impl DragSession {
    pub fn start(payload: DragPayload) -> Self {
        log::debug!("Drag started for {}", payload.display_id);
        Self {
            payload,
            current: Vec::new(),
        }
    }

    pub fn payload(&self) -> &DragPayload {
        &self.payload
    }

    /// Recomputes the active targets for a pointer position.
    ///
    /// With nothing under the pointer, sticky targets from the previous frame
    /// stay active. Near a card's midpoint the previous edge is kept so the
    /// insertion line does not flicker.
    pub fn update(&mut self, registry: &DropTargetRegistry, pointer: Point) -> &[DropTarget] {
        let hits = registry.hits(pointer, &self.payload);
        if hits.is_empty() {
            self.current.retain(|target| target.kind.is_sticky());
            return &self.current;
        }

        let next = hits
            .into_iter()
            .map(|(kind, rect)| {
                let mut edge = closest_edge(rect, pointer, kind.allowed_edges());
                let previous = self
                    .current
                    .iter()
                    .find(|t| t.kind == *kind)
                    .and_then(|t| t.edge);
                if let Some(previous) = previous {
                    if (pointer.y - rect.mid_y()).abs() < rect.height * EDGE_HYSTERESIS {
                        edge = Some(previous);
                    }
                }
                DropTarget {
                    kind: kind.clone(),
                    edge,
                }
            })
            .collect();
        self.current = next;
        &self.current
    }

    pub fn targets(&self) -> &[DropTarget] {
        &self.current
    }

    /// Insertion-line edge to draw on the given card, if any. The dragged
    /// card never shows one.
    pub fn indicator(&self, display_id: &str) -> Option<Edge> {
        if display_id == self.payload.display_id {
            return None;
        }
        match self.current.first() {
            Some(DropTarget {
                kind: DropTargetKind::Card { display_id: id },
                edge,
            }) if id == display_id => *edge,
            _ => None,
        }
    }

    /// Ends the gesture with a drop on the current targets.
    pub fn finish(self) -> DropEvent {
        log::debug!(
            "Drag of {} dropped on {} target(s)",
            self.payload.display_id,
            self.current.len()
        );
        DropEvent {
            display_id: self.payload.display_id,
            targets: self.current,
        }
    }

    /// Ends the gesture without a drop.
    pub fn cancel(self) {
        log::debug!("Drag of {} cancelled", self.payload.display_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Season;

    fn fall() -> SemesterId {
        SemesterId::new(Season::Fall, 2024)
    }

    /// A 200x300 container holding two 200x50 cards stacked from y = 0.
    fn layout() -> DropTargetRegistry {
        let mut registry = DropTargetRegistry::new();
        registry.register(
            DropTargetKind::Container { semester: fall() },
            Rect::new(0.0, 0.0, 200.0, 300.0),
        );
        registry.register(
            DropTargetKind::Card {
                display_id: "CS225_1".into(),
            },
            Rect::new(0.0, 0.0, 200.0, 50.0),
        );
        registry.register(
            DropTargetKind::Card {
                display_id: "CS233_2".into(),
            },
            Rect::new(0.0, 50.0, 200.0, 50.0),
        );
        registry.register(DropTargetKind::Trash, Rect::new(300.0, 0.0, 50.0, 50.0));
        registry
    }

    #[test]
    fn test_closest_edge_uses_midpoint() {
        let rect = Rect::new(0.0, 100.0, 10.0, 40.0);
        let allowed = [Edge::Top, Edge::Bottom];
        assert_eq!(closest_edge(&rect, Point::new(5.0, 105.0), &allowed), Some(Edge::Top));
        assert_eq!(closest_edge(&rect, Point::new(5.0, 120.0), &allowed), Some(Edge::Top));
        assert_eq!(closest_edge(&rect, Point::new(5.0, 121.0), &allowed), Some(Edge::Bottom));
        assert_eq!(closest_edge(&rect, Point::new(5.0, 120.0), &[]), None);
    }

    #[test]
    fn test_card_targets_are_innermost_first() {
        let registry = layout();
        let mut drag = DragSession::start(DragPayload::course_card("CS233_2"));
        let targets = drag.update(&registry, Point::new(10.0, 10.0));
        assert_eq!(
            targets,
            [DropTarget::card("CS225_1", Some(Edge::Top)), DropTarget::container(fall())]
        );
    }

    #[test]
    fn test_container_only_below_cards() {
        let registry = layout();
        let mut drag = DragSession::start(DragPayload::course_card("CS225_1"));
        let targets = drag.update(&registry, Point::new(10.0, 250.0));
        assert_eq!(targets, [DropTarget::container(fall())]);
    }

    #[test]
    fn test_sticky_targets_survive_leaving() {
        let registry = layout();
        let mut drag = DragSession::start(DragPayload::course_card("CS233_2"));
        drag.update(&registry, Point::new(10.0, 40.0));
        let targets = drag.update(&registry, Point::new(250.0, 500.0)).to_vec();
        assert_eq!(
            targets,
            [DropTarget::card("CS225_1", Some(Edge::Bottom)), DropTarget::container(fall())]
        );
    }

    #[test]
    fn test_trash_is_not_sticky() {
        let registry = layout();
        let mut drag = DragSession::start(DragPayload::course_card("CS233_2"));
        drag.update(&registry, Point::new(310.0, 10.0));
        assert_eq!(drag.targets(), [DropTarget::trash()]);
        drag.update(&registry, Point::new(500.0, 500.0));
        assert!(drag.targets().is_empty());
        assert!(drag.finish().targets.is_empty());
    }

    #[test]
    fn test_edge_hysteresis_near_midpoint() {
        let registry = layout();
        let mut drag = DragSession::start(DragPayload::course_card("CS233_2"));
        drag.update(&registry, Point::new(10.0, 30.0));
        assert_eq!(drag.indicator("CS225_1"), Some(Edge::Bottom));

        // Just above the midpoint of a 50px card: within the band, keep bottom
        drag.update(&registry, Point::new(10.0, 23.0));
        assert_eq!(drag.indicator("CS225_1"), Some(Edge::Bottom));

        // Decisively in the top half
        drag.update(&registry, Point::new(10.0, 10.0));
        assert_eq!(drag.indicator("CS225_1"), Some(Edge::Top));
    }

    #[test]
    fn test_no_indicator_on_dragged_card() {
        let registry = layout();
        let mut drag = DragSession::start(DragPayload::course_card("CS233_2"));
        drag.update(&registry, Point::new(10.0, 60.0));
        assert_eq!(drag.indicator("CS233_2"), None);
        assert_eq!(drag.indicator("CS225_1"), None);
        drag.cancel();
    }

    #[test]
    fn test_finish_reports_chain() {
        let registry = layout();
        let mut drag = DragSession::start(DragPayload::course_card("CS233_2"));
        drag.update(&registry, Point::new(10.0, 5.0));
        let event = drag.finish();
        assert_eq!(event.display_id, "CS233_2");
        assert_eq!(event.targets.len(), 2);
        assert_eq!(event.targets[0].edge, Some(Edge::Top));
    }

    #[test]
    fn test_register_replaces_bounds() {
        let mut registry = layout();
        let trash = DropTargetKind::Trash;
        registry.register(trash.clone(), Rect::new(0.0, 400.0, 10.0, 10.0));
        assert_eq!(registry.bounds(&trash), Some(Rect::new(0.0, 400.0, 10.0, 10.0)));
        registry.unregister(&trash);
        assert_eq!(registry.bounds(&trash), None);
    }
}
