// src/scaler.rs
use crate::map_data::{Area, Point, Scale};

/// Coords string for `area` at `scale`. The identity scale hands back the
/// original attribute untouched so nothing drifts through rounding.
pub fn scaled_coords(area: &Area, scale: Scale) -> String {
    if scale.is_identity() {
        return area.coords.clone();
    }
    scale_points(&area.points, scale)
}

/// Multiply every coordinate by the scale factor, round, and join in order
/// (`x,y,x,y,...`, or `x,y,r` for a circle).
pub fn scale_points(points: &[Point], scale: Scale) -> String {
    let factor = scale.factor();
    let mut out = Vec::with_capacity(points.len() * 2);

    for p in points {
        out.push(round_coord(p.x * factor));
        out.push(round_coord(p.y * factor));
        if let Some(r) = p.r {
            out.push(round_coord(r * factor));
        }
    }

    out.iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

// Halves round toward +inf, like the browser's Math.round.
fn round_coord(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(shape: &str, coords: &str) -> Area {
        Area::parse(Some(shape), coords, Vec::new()).unwrap()
    }

    #[test]
    fn test_identity_reuses_original_string() {
        let a = area("rect", " 10.4, 20 ,30,40");
        assert_eq!(scaled_coords(&a, Scale::IDENTITY), " 10.4, 20 ,30,40");
    }

    #[test]
    fn test_rect() {
        let a = area("rect", "10,15,33,47");
        let s = Scale::new(1.5).unwrap();
        assert_eq!(scaled_coords(&a, s), "15,23,50,71");
    }

    #[test]
    fn test_poly_doubles() {
        let a = area("poly", "0,0,10,0,10,10");
        assert_eq!(scaled_coords(&a, Scale::new(2.0).unwrap()), "0,0,20,0,20,20");
    }

    #[test]
    fn test_circle_halves() {
        let a = area("circle", "50,50,20");
        assert_eq!(scaled_coords(&a, Scale::new(0.5).unwrap()), "25,25,10");
    }

    #[test]
    fn test_rounding_matches_math_round() {
        assert_eq!(round_coord(2.5), 3);
        assert_eq!(round_coord(2.49), 2);
        assert_eq!(round_coord(-2.5), -2);
        assert_eq!(round_coord(-2.51), -3);
    }

    #[test]
    fn test_rescale_back_and_forth() {
        let a = area("rect", "100,200,300,400");
        let half = scaled_coords(&a, Scale::new(0.5).unwrap());
        assert_eq!(half, "50,100,150,200");
        // Always computed from the parsed originals, never from a previous render.
        let full = scaled_coords(&a, Scale::new(1.0).unwrap());
        assert_eq!(full, "100,200,300,400");
    }
}
