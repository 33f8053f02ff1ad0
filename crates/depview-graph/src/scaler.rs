use crate::geometry::{Point, Rect};
use depview_core::NodeId;
use std::collections::HashMap;

/// Bounding box of a set of positioned nodes, and the zoom that fits it to a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutScaler {
    node_count: usize,
    empty_count: usize,
    bounds: Option<Rect>,
}

impl LayoutScaler {
    /// Measure the nodes of `nodes` that have a position; the rest are only counted.
    pub fn new(nodes: &[NodeId], positions: &HashMap<NodeId, Point>) -> Self {
        let mut node_count = 0;
        let mut empty_count = 0;
        let mut bounds: Option<Rect> = None;

        for node in nodes {
            match positions.get(node) {
                Some(&point) => {
                    node_count += 1;
                    bounds = Some(match bounds {
                        Some(rect) => rect.including(point),
                        None => Rect::from_point(point),
                    });
                }
                None => empty_count += 1,
            }
        }

        Self {
            node_count,
            empty_count,
            bounds,
        }
    }

    /// Nodes that had a position.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Nodes that had no position.
    pub fn empty_count(&self) -> usize {
        self.empty_count
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    pub fn center_x(&self) -> f32 {
        self.bounds.map(|rect| rect.center().x).unwrap_or(0.0)
    }

    pub fn center_y(&self) -> f32 {
        self.bounds.map(|rect| rect.center().y).unwrap_or(0.0)
    }

    /// Scale at which the bounding box fits inside `viewport` without distortion.
    ///
    /// Dimensions below `zero_threshold` are ignored; if both are, or there is nothing
    /// to measure, the scale is 1.0. A zero-size viewport also yields 1.0.
    pub fn full_view_scale(&self, viewport: &Rect, zero_threshold: f32) -> f32 {
        let Some(bounds) = self.bounds else {
            return 1.0;
        };

        let axes = [
            (bounds.width(), viewport.width()),
            (bounds.height(), viewport.height()),
        ];

        let mut scale: Option<f32> = None;
        for (extent, view) in axes {
            if extent < zero_threshold {
                continue;
            }
            if view <= 0.0 {
                return 1.0;
            }
            if extent <= 0.0 {
                continue;
            }
            let ratio = view / extent;
            scale = Some(scale.map_or(ratio, |current| current.min(ratio)));
        }
        scale.unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn n(id: i64) -> NodeId {
        NodeId(id)
    }

    fn viewport(width: f32, height: f32) -> Rect {
        Rect::from_pos_size(Point::ORIGIN, width, height)
    }

    #[test]
    fn diagonal_pair_scales_to_viewport() {
        let positions = HashMap::from([(n(1), Point::new(0.0, 0.0)), (n(2), Point::new(10.0, 10.0))]);
        let scaler = LayoutScaler::new(&[n(1), n(2)], &positions);

        assert_eq!(scaler.full_view_scale(&viewport(100.0, 100.0), 0.0), 10.0);
        assert_eq!(scaler.center_x(), 5.0);
        assert_eq!(scaler.center_y(), 5.0);
    }

    #[test]
    fn counts_split_positioned_and_empty_nodes() {
        let positions = HashMap::from([(n(1), Point::new(-2.0, 4.0)), (n(9), Point::new(50.0, 50.0))]);
        let scaler = LayoutScaler::new(&[n(1), n(2), n(3)], &positions);

        assert_eq!(scaler.node_count(), 1);
        assert_eq!(scaler.empty_count(), 2);
        assert_eq!(scaler.bounds(), Some(Rect::from_point(Point::new(-2.0, 4.0))));
    }

    #[test]
    fn tighter_axis_wins() {
        let positions = HashMap::from([(n(1), Point::new(0.0, 0.0)), (n(2), Point::new(20.0, 50.0))]);
        let scaler = LayoutScaler::new(&[n(1), n(2)], &positions);

        assert_eq!(scaler.full_view_scale(&viewport(100.0, 100.0), 0.0), 2.0);
    }

    #[test]
    fn thin_dimension_defers_to_the_other() {
        let positions = HashMap::from([(n(1), Point::new(0.0, 0.0)), (n(2), Point::new(0.5, 40.0))]);
        let scaler = LayoutScaler::new(&[n(1), n(2)], &positions);

        assert_eq!(scaler.full_view_scale(&viewport(100.0, 200.0), 1.0), 5.0);
    }

    #[test]
    fn degenerate_inputs_scale_to_one() {
        let single = HashMap::from([(n(1), Point::new(3.0, 3.0))]);
        let scaler = LayoutScaler::new(&[n(1)], &single);
        assert_eq!(scaler.full_view_scale(&viewport(100.0, 100.0), 0.0), 1.0);
        assert_eq!(scaler.full_view_scale(&viewport(100.0, 100.0), 1.0), 1.0);

        let empty = LayoutScaler::new(&[n(1)], &HashMap::new());
        assert_eq!(empty.bounds(), None);
        assert_eq!(empty.center_x(), 0.0);
        assert_eq!(empty.full_view_scale(&viewport(100.0, 100.0), 0.0), 1.0);

        let pair = HashMap::from([(n(1), Point::new(0.0, 0.0)), (n(2), Point::new(10.0, 10.0))]);
        let scaler = LayoutScaler::new(&[n(1), n(2)], &pair);
        assert_eq!(scaler.full_view_scale(&viewport(0.0, 0.0), 0.0), 1.0);
    }

    #[test]
    fn vertical_line_scales_by_height_with_zero_threshold() {
        let positions = HashMap::from([(n(1), Point::new(0.0, 0.0)), (n(2), Point::new(0.0, 25.0))]);
        let scaler = LayoutScaler::new(&[n(1), n(2)], &positions);

        assert_eq!(scaler.full_view_scale(&viewport(100.0, 100.0), 0.0), 4.0);
    }

    proptest! {
        #[test]
        fn prop_scaled_bounds_fit_viewport(
            points in proptest::collection::vec((-500.0f32..500.0, -500.0f32..500.0), 2..20),
            width in 10.0f32..2000.0,
            height in 10.0f32..2000.0,
        ) {
            let positions: HashMap<NodeId, Point> = points
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| (NodeId(i as i64), Point::new(x, y)))
                .collect();
            let nodes: Vec<NodeId> = positions.keys().copied().collect();
            let scaler = LayoutScaler::new(&nodes, &positions);
            let bounds = scaler.bounds().unwrap();
            prop_assume!(bounds.width() > 1.0 && bounds.height() > 1.0);

            let scale = scaler.full_view_scale(&viewport(width, height), 1.0);
            prop_assert!(bounds.width() * scale <= width * 1.001);
            prop_assert!(bounds.height() * scale <= height * 1.001);
            for point in positions.values() {
                prop_assert!(bounds.contains(*point));
            }
        }
    }
}
