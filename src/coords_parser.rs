// src/coords_parser.rs
use crate::error::ImageMapError;
use crate::map_data::{Point, Shape};

/// Parse an `<area>` `coords` attribute into points for the given shape.
///
/// - circle: `x,y,r` gives one point carrying the radius
/// - rect: `x1,y1,x2,y2` gives the top-left and bottom-right corners
/// - poly: `x1,y1,...,xn,yn` gives one point per pair
///
/// Whitespace around each number is ignored. Anything else is rejected
/// instead of producing a partial point list.
pub fn parse_coords(shape: Shape, raw: &str) -> Result<Vec<Point>, ImageMapError> {
    let values = parse_numbers(raw)?;

    match shape {
        Shape::Circle => match values.as_slice() {
            [x, y, r] => {
                if *r < 0.0 {
                    return Err(ImageMapError::invalid_coords(raw, "negative circle radius"));
                }
                Ok(vec![Point::with_radius(*x, *y, *r)])
            }
            _ => Err(arity_error(raw, shape, "3", values.len())),
        },
        Shape::Rect => match values.as_slice() {
            [x1, y1, x2, y2] => Ok(vec![Point::new(*x1, *y1), Point::new(*x2, *y2)]),
            _ => Err(arity_error(raw, shape, "4", values.len())),
        },
        Shape::Poly => {
            if values.is_empty() || values.len() % 2 != 0 {
                return Err(arity_error(
                    raw,
                    shape,
                    "an even, non-zero count of",
                    values.len(),
                ));
            }
            Ok(values
                .chunks_exact(2)
                .map(|pair| Point::new(pair[0], pair[1]))
                .collect())
        }
    }
}

fn parse_numbers(raw: &str) -> Result<Vec<f64>, ImageMapError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    raw.split(',')
        .map(|part| {
            let part = part.trim();
            match part.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                _ => Err(ImageMapError::invalid_coords(
                    raw,
                    format!("'{}' is not a number", part),
                )),
            }
        })
        .collect()
}

fn arity_error(raw: &str, shape: Shape, expected: &str, got: usize) -> ImageMapError {
    ImageMapError::invalid_coords(
        raw,
        format!("{} needs {} numbers, got {}", shape, expected, got),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_circle() {
        let points = parse_coords(Shape::Circle, "50,50,20").unwrap();
        assert_eq!(points, vec![Point::with_radius(50.0, 50.0, 20.0)]);
    }

    #[test]
    fn test_parse_rect() {
        let points = parse_coords(Shape::Rect, " 10, 20 ,30,40 ").unwrap();
        assert_eq!(points, vec![Point::new(10.0, 20.0), Point::new(30.0, 40.0)]);
    }

    #[test]
    fn test_parse_poly() {
        let points = parse_coords(Shape::Poly, "0,0,10,0,10,10").unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[2], Point::new(10.0, 10.0));
        assert!(points.iter().all(|p| p.r.is_none()));
    }

    #[test]
    fn test_parse_fractional() {
        let points = parse_coords(Shape::Rect, "1.5,2.25,3,4").unwrap();
        assert_eq!(points[0], Point::new(1.5, 2.25));
    }

    #[test]
    fn test_wrong_arity() {
        assert!(matches!(
            parse_coords(Shape::Rect, "1,2,3"),
            Err(ImageMapError::InvalidCoordinateFormat { .. })
        ));
        assert!(parse_coords(Shape::Circle, "1,2").is_err());
        assert!(parse_coords(Shape::Poly, "1,2,3").is_err());
        assert!(parse_coords(Shape::Poly, "").is_err());
    }

    #[test]
    fn test_non_numeric() {
        let err = parse_coords(Shape::Rect, "1,two,3,4").unwrap_err();
        assert_eq!(
            err,
            ImageMapError::InvalidCoordinateFormat {
                coords: "1,two,3,4".to_string(),
                reason: "'two' is not a number".to_string(),
            }
        );
        assert!(parse_coords(Shape::Rect, "1,,3,4").is_err());
        assert!(parse_coords(Shape::Circle, "1,2,inf").is_err());
    }

    #[test]
    fn test_negative_radius() {
        assert!(parse_coords(Shape::Circle, "10,10,-5").is_err());
    }
}
