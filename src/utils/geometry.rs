//! Geometry utilities for projecting and stippling region outlines.

use bevy::prelude::*;

/// Projects a `(longitude, latitude)` pair in degrees onto a surface of the
/// given pixel size using a plain equirectangular mapping.
///
/// Longitude -180 maps to x = 0, latitude 90 maps to y = 0 (top edge).
pub fn project(lon: f32, lat: f32, surface: Vec2) -> Vec2 {
    Vec2::new(
        (lon + 180.0) / 360.0 * surface.x,
        (90.0 - lat) / 180.0 * surface.y,
    )
}

/// Projects every coordinate of a ring.
pub fn project_ring(ring: &[[f32; 2]], surface: Vec2) -> Vec<Vec2> {
    ring.iter()
        .map(|&[lon, lat]| project(lon, lat, surface))
        .collect()
}

/// Tests if a point is inside a polygon using ray casting.
///
/// The ring is closed implicitly. Parity does not depend on winding order.
pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let n = polygon.len();
    let mut j = n - 1;

    for i in 0..n {
        let pi = polygon[i];
        let pj = polygon[j];

        if ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Axis-aligned bounds of a ring, or `None` when it has no points.
pub fn projected_bounds(ring: &[Vec2]) -> Option<Rect> {
    let first = *ring.first()?;
    let (min, max) = ring
        .iter()
        .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p)));
    Some(Rect::from_corners(min, max))
}

/// Upper bound on lattice points tested for a single ring.
pub const MAX_LATTICE_POINTS: f64 = 16_777_216.0;

/// Rasterizes a ring into lattice samples.
///
/// The lattice is anchored at the surface origin, so two rings sampled at the
/// same spacing share grid positions. Only lattice points that pass
/// [`point_in_polygon`] are returned, in row-major order.
///
/// Rings with non-finite bounds, or whose bounding lattice exceeds
/// [`MAX_LATTICE_POINTS`], yield nothing.
pub fn sample_ring(ring: &[Vec2], spacing: f32) -> Vec<Vec2> {
    if ring.len() < 3 || !(spacing > 0.0) {
        return Vec::new();
    }
    let Some(bounds) = projected_bounds(ring) else {
        return Vec::new();
    };
    if !bounds.min.is_finite() || !bounds.max.is_finite() {
        warn!("Skipping ring with non-finite bounds {:?}", bounds);
        return Vec::new();
    }

    let (x_first, x_last) = ((bounds.min.x / spacing).ceil(), (bounds.max.x / spacing).floor());
    let (y_first, y_last) = ((bounds.min.y / spacing).ceil(), (bounds.max.y / spacing).floor());
    let columns = (x_last as f64 - x_first as f64 + 1.0).max(0.0);
    let rows = (y_last as f64 - y_first as f64 + 1.0).max(0.0);
    if columns * rows > MAX_LATTICE_POINTS {
        warn!(
            "Skipping ring: {}x{} lattice at spacing {} is too large",
            columns, rows, spacing
        );
        return Vec::new();
    }

    let (x_start, x_end) = (x_first as i64, x_last as i64);
    let (y_start, y_end) = (y_first as i64, y_last as i64);

    let mut samples = Vec::new();
    for gy in y_start..=y_end {
        let y = gy as f32 * spacing;
        for gx in x_start..=x_end {
            let candidate = Vec2::new(gx as f32 * spacing, y);
            if point_in_polygon(candidate, ring) {
                samples.push(candidate);
            }
        }
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.5, 0.5),
            Vec2::new(8.5, 0.5),
            Vec2::new(8.5, 8.5),
            Vec2::new(0.5, 8.5),
        ]
    }

    fn triangle() -> Vec<Vec2> {
        vec![
            Vec2::new(0.5, 0.5),
            Vec2::new(11.0, 0.5),
            Vec2::new(0.5, 11.0),
        ]
    }

    /// A "U" shape: 9x9 block with a notch cut out of the top middle.
    fn notched() -> Vec<Vec2> {
        vec![
            Vec2::new(0.5, 0.5),
            Vec2::new(9.5, 0.5),
            Vec2::new(9.5, 9.5),
            Vec2::new(6.5, 9.5),
            Vec2::new(6.5, 3.5),
            Vec2::new(3.5, 3.5),
            Vec2::new(3.5, 9.5),
            Vec2::new(0.5, 9.5),
        ]
    }

    #[test]
    fn test_projection_corners() {
        let surface = Vec2::new(360.0, 180.0);
        assert_eq!(project(-180.0, 90.0, surface), Vec2::new(0.0, 0.0));
        assert_eq!(project(180.0, -90.0, surface), Vec2::new(360.0, 180.0));
        assert_eq!(project(0.0, 0.0, surface), Vec2::new(180.0, 90.0));

        let wide = Vec2::new(720.0, 360.0);
        assert_eq!(project(90.0, 45.0, wide), Vec2::new(540.0, 90.0));
    }

    #[test]
    fn test_point_in_polygon_degenerate() {
        let line = vec![Vec2::ZERO, Vec2::new(5.0, 5.0)];
        assert!(!point_in_polygon(Vec2::new(2.0, 2.0), &line));
        assert!(!point_in_polygon(Vec2::ZERO, &[]));
    }

    #[test]
    fn test_square_samples() {
        let samples = sample_ring(&square(), 1.0);
        // Lattice points 1..=8 on both axes.
        assert_eq!(samples.len(), 8 * 8);
        for p in &samples {
            assert!(p.x >= 1.0 && p.x <= 8.0 && p.y >= 1.0 && p.y <= 8.0);
        }
    }

    #[test]
    fn test_triangle_samples() {
        let tri = triangle();
        let samples = sample_ring(&tri, 1.0);
        // Hypotenuse is x + y = 11.5, so lattice points with x + y <= 11.
        let expected = (1..=11)
            .flat_map(|x| (1..=11).map(move |y| (x, y)))
            .filter(|(x, y)| x + y <= 11)
            .count();
        assert_eq!(expected, 55);
        assert_eq!(samples.len(), expected);
        for p in &samples {
            assert!(p.x + p.y < 11.5);
        }
    }

    #[test]
    fn test_concave_notch_excluded() {
        let shape = notched();
        let samples = sample_ring(&shape, 1.0);

        // Points in the notch are outside.
        for x in 4..=6 {
            for y in 4..=9 {
                let p = Vec2::new(x as f32, y as f32);
                assert!(!samples.contains(&p), "notch point {:?} sampled", p);
            }
        }
        // Arms and base are inside.
        assert!(samples.contains(&Vec2::new(2.0, 8.0)));
        assert!(samples.contains(&Vec2::new(8.0, 8.0)));
        assert!(samples.contains(&Vec2::new(5.0, 2.0)));

        // 9x9 block minus the 3x6 notch.
        assert_eq!(samples.len(), 81 - 18);
    }

    #[test]
    fn test_every_sample_passes_parity() {
        for shape in [square(), triangle(), notched()] {
            for p in sample_ring(&shape, 0.7) {
                assert!(point_in_polygon(p, &shape));
            }
        }
    }

    #[test]
    fn test_winding_independent() {
        for shape in [square(), triangle(), notched()] {
            let mut reversed = shape.clone();
            reversed.reverse();
            assert_eq!(sample_ring(&shape, 0.7), sample_ring(&reversed, 0.7));
        }
    }

    #[test]
    fn test_degenerate_ring_and_bad_spacing() {
        assert!(sample_ring(&[Vec2::ZERO, Vec2::ONE], 1.0).is_empty());
        assert!(sample_ring(&square(), 0.0).is_empty());
        assert!(sample_ring(&square(), f32::NAN).is_empty());
    }

    #[test]
    fn test_oversized_lattice_is_skipped() {
        // 2e-7 px spacing over a 320x160 box would mean ~1e18 parity tests.
        let surface_box = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(320.0, 0.0),
            Vec2::new(320.0, 160.0),
            Vec2::new(0.0, 160.0),
        ];
        assert!(sample_ring(&surface_box, 2e-7).is_empty());

        let far = project_ring(
            &[[-10.0, 0.0], [1e30, 0.0], [0.0, 10.0]],
            Vec2::new(320.0, 160.0),
        );
        assert!(sample_ring(&far, 4.4).is_empty());

        let infinite = vec![Vec2::ZERO, Vec2::new(f32::INFINITY, 0.0), Vec2::new(0.0, 5.0)];
        assert!(sample_ring(&infinite, 1.0).is_empty());
    }

    #[test]
    fn test_projected_bounds() {
        let bounds = projected_bounds(&notched()).unwrap();
        assert_eq!(bounds.min, Vec2::new(0.5, 0.5));
        assert_eq!(bounds.max, Vec2::new(9.5, 9.5));
        assert!(projected_bounds(&[]).is_none());
    }
}
