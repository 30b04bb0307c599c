//! Shape generation for 2D primitives
//!
//! All shapes are emitted in field coordinates as triangle lists.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI};

use super::vertex::Vertex;
use crate::consts::FIELD_HEIGHT;
use crate::sim::Rect;

/// Linear blend between two colors
fn lerp_color(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    let t = t.clamp(0.0, 1.0);
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

/// Color of a field-tall vertical gradient at height `y`
pub fn field_gradient(top: [f32; 4], bottom: [f32; 4], y: f32) -> [f32; 4] {
    lerp_color(top, bottom, y / FIELD_HEIGHT)
}

fn quad(vertices: &mut Vec<Vertex>, r: &Rect, top: [f32; 4], bottom: [f32; 4]) {
    let (x0, y0, x1, y1) = (r.x, r.y, r.right(), r.bottom());

    vertices.push(Vertex::new(x0, y0, top));
    vertices.push(Vertex::new(x1, y0, top));
    vertices.push(Vertex::new(x0, y1, bottom));

    vertices.push(Vertex::new(x0, y1, bottom));
    vertices.push(Vertex::new(x1, y0, top));
    vertices.push(Vertex::new(x1, y1, bottom));
}

/// Generate vertices for a filled rectangle
pub fn rect(r: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    quad(&mut vertices, r, color, color);
    vertices
}

/// Generate vertices for a rectangle shaded by the field-tall gradient
pub fn gradient_rect(r: &Rect, top: [f32; 4], bottom: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    quad(
        &mut vertices,
        r,
        field_gradient(top, bottom, r.y),
        field_gradient(top, bottom, r.bottom()),
    );
    vertices
}

/// Generate vertices for a rectangle border, shaded by the field-tall gradient
pub fn outline(r: &Rect, thickness: f32, top: [f32; 4], bottom: [f32; 4]) -> Vec<Vertex> {
    let t = thickness.min(r.w / 2.0).min(r.h / 2.0);
    let edges = [
        Rect::new(r.x, r.y, r.w, t),
        Rect::new(r.x, r.bottom() - t, r.w, t),
        Rect::new(r.x, r.y + t, t, r.h - 2.0 * t),
        Rect::new(r.right() - t, r.y + t, t, r.h - 2.0 * t),
    ];

    let mut vertices = Vec::with_capacity(24);
    for edge in &edges {
        quad(
            &mut vertices,
            edge,
            field_gradient(top, bottom, edge.y),
            field_gradient(top, bottom, edge.bottom()),
        );
    }
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Quarter-circle fan for a rounded corner
fn corner(
    vertices: &mut Vec<Vertex>,
    center: Vec2,
    radius: f32,
    start: f32,
    color: [f32; 4],
    segments: u32,
) {
    for i in 0..segments {
        let theta1 = start + (i as f32 / segments as f32) * FRAC_PI_2;
        let theta2 = start + ((i + 1) as f32 / segments as f32) * FRAC_PI_2;

        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }
}

/// Generate vertices for a rectangle with rounded corners
pub fn rounded_rect(r: &Rect, radius: f32, color: [f32; 4], corner_segments: u32) -> Vec<Vertex> {
    let rad = radius.min(r.w / 2.0).min(r.h / 2.0).max(0.0);
    let mut vertices = Vec::with_capacity(18 + (corner_segments * 12) as usize);

    // Center column spans full height, side strips fill between the corners
    let strips = [
        Rect::new(r.x + rad, r.y, r.w - 2.0 * rad, r.h),
        Rect::new(r.x, r.y + rad, rad, r.h - 2.0 * rad),
        Rect::new(r.right() - rad, r.y + rad, rad, r.h - 2.0 * rad),
    ];
    for strip in &strips {
        quad(&mut vertices, strip, color, color);
    }

    // Screen space has y down, so angle 0 points right and π/2 points down
    let corners = [
        (Vec2::new(r.right() - rad, r.bottom() - rad), 0.0),
        (Vec2::new(r.x + rad, r.bottom() - rad), FRAC_PI_2),
        (Vec2::new(r.x + rad, r.y + rad), PI),
        (Vec2::new(r.right() - rad, r.y + rad), 3.0 * FRAC_PI_2),
    ];
    for (center, start) in corners {
        corner(&mut vertices, center, rad, start, color, corner_segments);
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(vertices: &[Vertex]) -> (f32, f32, f32, f32) {
        vertices.iter().fold(
            (f32::MAX, f32::MAX, f32::MIN, f32::MIN),
            |(x0, y0, x1, y1), v| {
                (
                    x0.min(v.position[0]),
                    y0.min(v.position[1]),
                    x1.max(v.position[0]),
                    y1.max(v.position[1]),
                )
            },
        )
    }

    #[test]
    fn test_field_gradient_endpoints() {
        let top = [0.0, 0.0, 0.0, 1.0];
        let bottom = [1.0, 0.5, 0.0, 1.0];
        assert_eq!(field_gradient(top, bottom, 0.0), top);
        assert_eq!(field_gradient(top, bottom, FIELD_HEIGHT), bottom);
        assert_eq!(field_gradient(top, bottom, FIELD_HEIGHT * 2.0), bottom);
    }

    #[test]
    fn test_rect_covers_bounds() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        let v = rect(&r, [1.0; 4]);
        assert_eq!(v.len(), 6);
        assert_eq!(bounds(&v), (10.0, 20.0, 40.0, 60.0));
    }

    #[test]
    fn test_outline_stays_inside_rect() {
        let r = Rect::new(0.0, 0.0, 50.0, 10.0);
        let v = outline(&r, 1.0, [1.0; 4], [0.0; 4]);
        assert_eq!(v.len(), 24);
        assert_eq!(bounds(&v), (0.0, 0.0, 50.0, 10.0));
    }

    #[test]
    fn test_rounded_rect_stays_inside_rect() {
        let r = Rect::new(335.0, 700.0, 130.0, 25.0);
        let v = rounded_rect(&r, 5.0, [1.0; 4], 4);
        assert_eq!(v.len(), 18 + 4 * 4 * 3);
        let (x0, y0, x1, y1) = bounds(&v);
        assert!(x0 >= 335.0 - 1e-3 && y0 >= 700.0 - 1e-3);
        assert!(x1 <= 465.0 + 1e-3 && y1 <= 725.0 + 1e-3);
    }
}
