//! Search areas drawn by the operator.
//!
//! [`SearchAreaBuilder`] holds the vertices clicked so far and emits
//! immutable [`SearchArea`] snapshots once the shape is complete.

use crate::error::{PlannerError, Result};
use crate::geo::{haversine_distance, GeoPoint};
use crate::listeners::{ListenerId, Listeners};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Two vertices closer than this on both axes are the same vertex.
pub const VERTEX_MATCH_TOLERANCE_DEG: f64 = 1e-9;

/// Shape the operator is drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaShape {
    Quadrilateral,
    /// Center, then a point on the perimeter
    Circle,
    Polygon,
}

impl AreaShape {
    /// Minimum number of vertices for the shape to be complete.
    pub fn min_vertices(self) -> usize {
        match self {
            AreaShape::Quadrilateral => 4,
            AreaShape::Circle => 2,
            AreaShape::Polygon => 3,
        }
    }

    /// Maximum number of vertices, `None` when unbounded.
    pub fn max_vertices(self) -> Option<usize> {
        match self {
            AreaShape::Quadrilateral => Some(4),
            AreaShape::Circle => Some(2),
            AreaShape::Polygon => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AreaShape::Quadrilateral => "Quadrilateral",
            AreaShape::Circle => "Circle",
            AreaShape::Polygon => "Polygon",
        }
    }

    fn accepts_count(self, count: usize) -> bool {
        count >= self.min_vertices() && self.max_vertices().map_or(true, |max| count <= max)
    }
}

impl fmt::Display for AreaShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Four-sided area, vertices in click order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadrilateralArea {
    vertices: Vec<GeoPoint>,
}

impl QuadrilateralArea {
    /// Wrap the given vertices. Completeness is checked by the consumer.
    pub fn new(vertices: Vec<GeoPoint>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    pub fn is_complete(&self) -> bool {
        AreaShape::Quadrilateral.accepts_count(self.vertices.len())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleArea {
    pub center: GeoPoint,
    pub radius_m: f64,
}

impl CircleArea {
    pub fn new(center: GeoPoint, radius_m: f64) -> Self {
        Self { center, radius_m }
    }

    /// Circle centered on `center` passing through `perimeter`.
    pub fn from_vertices(center: GeoPoint, perimeter: GeoPoint) -> Self {
        Self {
            center,
            radius_m: haversine_distance(&center, &perimeter),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.radius_m.is_finite() && self.radius_m > 0.0
    }
}

/// Free polygon with at least three vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonArea {
    vertices: Vec<GeoPoint>,
}

impl PolygonArea {
    pub fn new(vertices: Vec<GeoPoint>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    pub fn is_complete(&self) -> bool {
        AreaShape::Polygon.accepts_count(self.vertices.len())
    }
}

/// Immutable snapshot of an operator-defined area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum SearchArea {
    Quadrilateral(QuadrilateralArea),
    Circle(CircleArea),
    Polygon(PolygonArea),
}

impl SearchArea {
    pub fn shape(&self) -> AreaShape {
        match self {
            SearchArea::Quadrilateral(_) => AreaShape::Quadrilateral,
            SearchArea::Circle(_) => AreaShape::Circle,
            SearchArea::Polygon(_) => AreaShape::Polygon,
        }
    }

    pub fn is_complete(&self) -> bool {
        match self {
            SearchArea::Quadrilateral(area) => area.is_complete(),
            SearchArea::Circle(area) => area.is_complete(),
            SearchArea::Polygon(area) => area.is_complete(),
        }
    }

    /// Defining vertices; a circle reports only its center.
    pub fn vertices(&self) -> Vec<GeoPoint> {
        match self {
            SearchArea::Quadrilateral(area) => area.vertices().to_vec(),
            SearchArea::Circle(area) => vec![area.center],
            SearchArea::Polygon(area) => area.vertices().to_vec(),
        }
    }

    fn incomplete_error(&self) -> PlannerError {
        PlannerError::IncompleteArea {
            shape: self.shape().name(),
            vertices: self.vertices().len(),
        }
    }

    /// Fail with [`PlannerError::IncompleteArea`] unless complete.
    pub fn ensure_complete(&self) -> Result<()> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(self.incomplete_error())
        }
    }
}

/// Operator-edited vertices of one search area.
#[derive(Debug)]
pub struct SearchAreaBuilder {
    shape: AreaShape,
    vertices: Vec<GeoPoint>,
    vertices_changed: Listeners<[GeoPoint]>,
    search_area_changed: Listeners<Option<SearchArea>>,
}

impl SearchAreaBuilder {
    pub fn new(shape: AreaShape) -> Self {
        Self {
            shape,
            vertices: Vec::new(),
            vertices_changed: Listeners::new(),
            search_area_changed: Listeners::new(),
        }
    }

    pub fn quadrilateral() -> Self {
        Self::new(AreaShape::Quadrilateral)
    }

    pub fn circle() -> Self {
        Self::new(AreaShape::Circle)
    }

    pub fn polygon() -> Self {
        Self::new(AreaShape::Polygon)
    }

    pub fn shape(&self) -> AreaShape {
        self.shape
    }

    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// True when the vertices describe a usable area. A circle whose two
    /// clicks coincide has no radius and stays incomplete.
    pub fn is_complete(&self) -> bool {
        self.current_area().is_some()
    }

    /// Append a vertex in click order.
    pub fn add_vertex(&mut self, vertex: GeoPoint) -> Result<()> {
        if let Some(max) = self.shape.max_vertices() {
            if self.vertices.len() >= max {
                tracing::warn!("Rejected vertex: {} already has {} vertices", self.shape, max);
                return Err(PlannerError::AreaAlreadyComplete {
                    shape: self.shape.name(),
                    max,
                });
            }
        }
        self.vertices.push(vertex);
        self.notify();
        Ok(())
    }

    /// Replace the first vertex matching `old` with `new`, keeping its position.
    pub fn move_vertex(&mut self, old: GeoPoint, new: GeoPoint) -> Result<()> {
        let slot = self
            .vertices
            .iter_mut()
            .find(|v| v.approx_eq(&old, VERTEX_MATCH_TOLERANCE_DEG))
            .ok_or(PlannerError::VertexNotFound {
                lat: old.lat,
                lon: old.lon,
            })?;
        *slot = new;
        self.notify();
        Ok(())
    }

    /// Remove every vertex.
    pub fn reset(&mut self) {
        self.vertices.clear();
        self.notify();
    }

    /// Snapshot of the area, `None` while incomplete.
    pub fn current_area(&self) -> Option<SearchArea> {
        if !self.shape.accepts_count(self.vertices.len()) {
            return None;
        }
        let area = match self.shape {
            AreaShape::Quadrilateral => {
                SearchArea::Quadrilateral(QuadrilateralArea::new(self.vertices.clone()))
            }
            AreaShape::Circle => {
                SearchArea::Circle(CircleArea::from_vertices(self.vertices[0], self.vertices[1]))
            }
            AreaShape::Polygon => SearchArea::Polygon(PolygonArea::new(self.vertices.clone())),
        };
        area.is_complete().then_some(area)
    }

    /// Snapshot of the area, failing while incomplete.
    pub fn build(&self) -> Result<SearchArea> {
        self.current_area().ok_or(PlannerError::IncompleteArea {
            shape: self.shape.name(),
            vertices: self.vertices.len(),
        })
    }

    /// Called with the vertex list after every change.
    pub fn on_vertices_changed(&mut self, callback: impl FnMut(&[GeoPoint]) + 'static) -> ListenerId {
        self.vertices_changed.add(callback)
    }

    /// Called with the current area (or `None`) after every change.
    pub fn on_search_area_changed(
        &mut self,
        callback: impl FnMut(&Option<SearchArea>) + 'static,
    ) -> ListenerId {
        self.search_area_changed.add(callback)
    }

    /// Remove a listener registered through either hook.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.vertices_changed.remove(id) || self.search_area_changed.remove(id)
    }

    pub fn listener_count(&self) -> usize {
        self.vertices_changed.len() + self.search_area_changed.len()
    }

    pub fn clear_listeners(&mut self) {
        self.vertices_changed.clear();
        self.search_area_changed.clear();
    }

    fn notify(&mut self) {
        tracing::debug!("{} now has {} vertices", self.shape, self.vertices.len());
        self.vertices_changed.notify(&self.vertices);
        let area = self.current_area();
        self.search_area_changed.notify(&area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn p(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new_unchecked(lat, lon)
    }

    #[test]
    fn quadrilateral_completes_at_four() {
        let mut builder = SearchAreaBuilder::quadrilateral();
        assert!(!builder.is_complete());
        builder.add_vertex(p(0.0, 0.0)).unwrap();
        assert!(!builder.is_complete());
        builder.add_vertex(p(1.0, 0.0)).unwrap();
        assert!(!builder.is_complete());
        builder.add_vertex(p(1.0, 1.0)).unwrap();
        assert!(!builder.is_complete());
        builder.add_vertex(p(0.0, 1.0)).unwrap();
        assert!(builder.is_complete());

        let err = builder.add_vertex(p(0.5, 0.5)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert_eq!(builder.vertex_count(), 4);
    }

    #[test]
    fn reset_empties_any_state() {
        let mut builder = SearchAreaBuilder::quadrilateral();
        builder.reset();
        assert_eq!(builder.vertex_count(), 0);

        for i in 0..4 {
            builder.add_vertex(p(i as f64, 0.0)).unwrap();
        }
        builder.reset();
        assert!(!builder.is_complete());
        assert_eq!(builder.vertex_count(), 0);
    }

    #[test]
    fn move_vertex_keeps_order() {
        let mut builder = SearchAreaBuilder::quadrilateral();
        builder.add_vertex(p(0.0, 0.0)).unwrap();
        builder.add_vertex(p(1.0, 0.0)).unwrap();
        builder.add_vertex(p(1.0, 1.0)).unwrap();

        builder.move_vertex(p(1.0, 0.0), p(2.0, 0.0)).unwrap();
        assert_eq!(builder.vertices(), &[p(0.0, 0.0), p(2.0, 0.0), p(1.0, 1.0)]);
    }

    #[test]
    fn move_unknown_vertex_fails_without_notifying() {
        let calls = Rc::new(RefCell::new(0));
        let mut builder = SearchAreaBuilder::polygon();
        builder.add_vertex(p(0.0, 0.0)).unwrap();

        let counter = calls.clone();
        builder.on_vertices_changed(move |_| *counter.borrow_mut() += 1);
        let err = builder.move_vertex(p(5.0, 5.0), p(6.0, 6.0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn circle_radius_comes_from_second_vertex() {
        let mut builder = SearchAreaBuilder::circle();
        let center = p(46.5, 6.6);
        let edge = crate::geo::offset(&center, 120.0, 45.0);
        builder.add_vertex(center).unwrap();
        assert!(builder.current_area().is_none());
        builder.add_vertex(edge).unwrap();

        match builder.build().unwrap() {
            SearchArea::Circle(circle) => {
                assert_eq!(circle.center, center);
                assert!((circle.radius_m - 120.0).abs() < 0.01);
            }
            other => panic!("expected circle, got {other:?}"),
        }
        assert!(builder.add_vertex(p(0.0, 0.0)).is_err());
    }

    #[test]
    fn listeners_receive_snapshots() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let areas = Rc::new(RefCell::new(Vec::new()));
        let mut builder = SearchAreaBuilder::quadrilateral();

        let seen_sink = seen.clone();
        builder.on_vertices_changed(move |v| seen_sink.borrow_mut().push(v.len()));
        let area_sink = areas.clone();
        builder.on_search_area_changed(move |a| area_sink.borrow_mut().push(a.is_some()));

        for i in 0..4 {
            builder.add_vertex(p(0.0, i as f64)).unwrap();
        }
        builder.reset();

        assert_eq!(*seen.borrow(), vec![1, 2, 3, 4, 0]);
        assert_eq!(*areas.borrow(), vec![false, false, false, true, false]);
    }

    #[test]
    fn removing_area_listener_keeps_vertex_listener() {
        let vertex_calls = Rc::new(RefCell::new(0));
        let area_calls = Rc::new(RefCell::new(0));
        let mut builder = SearchAreaBuilder::quadrilateral();

        let counter = vertex_calls.clone();
        let vertex_id = builder.on_vertices_changed(move |_| *counter.borrow_mut() += 1);
        let counter = area_calls.clone();
        let area_id = builder.on_search_area_changed(move |_| *counter.borrow_mut() += 1);
        assert_ne!(vertex_id, area_id);

        assert!(builder.remove_listener(area_id));
        builder.add_vertex(p(0.0, 0.0)).unwrap();
        assert_eq!(*vertex_calls.borrow(), 1);
        assert_eq!(*area_calls.borrow(), 0);

        assert!(builder.remove_listener(vertex_id));
        assert!(!builder.remove_listener(vertex_id));
        builder.add_vertex(p(0.0, 1.0)).unwrap();
        assert_eq!(*vertex_calls.borrow(), 1);
        assert_eq!(builder.listener_count(), 0);
    }

    #[test]
    fn circle_with_coincident_clicks_is_incomplete() {
        let mut builder = SearchAreaBuilder::circle();
        builder.add_vertex(p(46.5, 6.6)).unwrap();
        builder.add_vertex(p(46.5, 6.6)).unwrap();

        assert!(!builder.is_complete());
        assert!(builder.current_area().is_none());
        assert!(matches!(
            builder.build().unwrap_err(),
            PlannerError::IncompleteArea { shape: "Circle", vertices: 2 }
        ));

        builder.move_vertex(p(46.5, 6.6), p(46.501, 6.6)).unwrap();
        assert!(builder.is_complete());
    }

    #[test]
    fn incomplete_build_names_the_shape() {
        let builder = SearchAreaBuilder::polygon();
        let err = builder.build().unwrap_err();
        assert_eq!(
            err,
            PlannerError::IncompleteArea {
                shape: "Polygon",
                vertices: 0
            }
        );
    }
}
