//! Rendering: draws country polygons and content primitives to a [`Surface`].
//!
//! This module never mutates layer state. Layers hand it read-only views of
//! their content and a surface whose transform they have already set up;
//! every position here is in unprojected screen space.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::camera::Point;
use crate::consts::{ARROW_ANGLE, ARROWHEAD_RATIO, CIRCLE_STROKE};
use crate::projection::GeoProjection;
use crate::surface::Surface;

/// Geometry of one content primitive, in unprojected screen space.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Filled disc.
    Dot { center: Point, radius: f64 },
    /// Stroked ring.
    Circle { center: Point, radius: f64 },
    /// Stroked polyline with an arrowhead at the last point.
    Arrow { path: Vec<Point>, width: f64 },
}

impl Shape {
    /// Move the shape from `old` projection space into `new`, scaling sizes by
    /// the same linear coefficient as positions.
    pub fn rescale(&mut self, old: &GeoProjection, new: &GeoProjection) {
        let ratio = new.rescale_ratio(old);
        match self {
            Self::Dot { center, radius } | Self::Circle { center, radius } => {
                *center = new.rescale_from(old, *center);
                *radius *= ratio;
            }
            Self::Arrow { path, width } => {
                for p in path.iter_mut() {
                    *p = new.rescale_from(old, *p);
                }
                *width *= ratio;
            }
        }
    }
}

/// A primitive plus its paint.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub shape: Shape,
    pub color: String,
}

impl Item {
    #[must_use]
    pub fn new(shape: Shape, color: &str) -> Self {
        Self { shape, color: color.to_owned() }
    }
}

/// Draw one item. The caller owns save/restore and alpha.
pub fn draw_item(surface: &mut dyn Surface, item: &Item) {
    draw_shape(surface, &item.shape, &item.color);
}

pub fn draw_shape(surface: &mut dyn Surface, shape: &Shape, color: &str) {
    match shape {
        Shape::Dot { center, radius } => {
            surface.begin_path();
            surface.arc(*center, *radius);
            surface.fill(color);
        }
        Shape::Circle { center, radius } => {
            surface.begin_path();
            surface.arc(*center, *radius);
            surface.stroke(color, CIRCLE_STROKE);
        }
        Shape::Arrow { path, width } => draw_arrow(surface, path, *width, color),
    }
}

fn draw_arrow(surface: &mut dyn Surface, path: &[Point], width: f64, color: &str) {
    let Some((first, rest)) = path.split_first() else {
        return;
    };
    surface.begin_path();
    surface.move_to(*first);
    for p in rest {
        surface.line_to(*p);
    }
    surface.stroke(color, width);

    if let Some([tip, left, right]) = arrowhead(path, width) {
        surface.begin_path();
        surface.move_to(tip);
        surface.line_to(left);
        surface.line_to(right);
        surface.close_path();
        surface.fill(color);
    }
}

/// Triangle `[tip, left, right]` oriented along the final segment.
///
/// `None` when the path has no segment with a direction.
#[must_use]
pub fn arrowhead(path: &[Point], width: f64) -> Option<[Point; 3]> {
    let tip = *path.last()?;
    let from = path.iter().rev().skip(1).find(|p| p.distance(tip) > 0.0)?;
    let angle = (tip.y - from.y).atan2(tip.x - from.x);
    let len = arrowhead_length(width);
    let wing = |a: f64| Point::new(tip.x - len * a.cos(), tip.y - len * a.sin());
    Some([tip, wing(angle - ARROW_ANGLE), wing(angle + ARROW_ANGLE)])
}

/// Arrowhead length for a stroke width.
#[must_use]
pub fn arrowhead_length(width: f64) -> f64 {
    width * ARROWHEAD_RATIO
}

/// Total length of a polyline.
#[must_use]
pub fn path_length(path: &[Point]) -> f64 {
    path.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Fill and outline a country's polygons as one even-odd path per polygon.
pub fn draw_polygons(surface: &mut dyn Surface, polygons: &[Vec<Vec<Point>>], fill: &str, border: &str, border_width: f64) {
    for rings in polygons {
        surface.begin_path();
        for ring in rings {
            let Some((first, rest)) = ring.split_first() else {
                continue;
            };
            surface.move_to(*first);
            for p in rest {
                surface.line_to(*p);
            }
            surface.close_path();
        }
        surface.fill(fill);
        surface.stroke(border, border_width);
    }
}
