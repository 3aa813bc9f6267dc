// src/map_data.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ImageMapError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Circle,
    Rect,
    Poly,
}

/// One vertex of an area. Only circles carry a radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub r: Option<f64>,
}

/// A clickable region as read from an `<area>` element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub shape: Shape,
    pub coords: String,
    pub points: Vec<Point>,
    /// Every attribute except `coords`, in source order.
    pub attributes: Vec<(String, String)>,
}

/// Ratio of displayed to intrinsic image width. Always finite and > 0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Scale(f64);

impl Shape {
    /// Resolve the `shape` attribute. A missing attribute means `rect`.
    pub fn from_attribute(value: Option<&str>) -> Result<Self, ImageMapError> {
        match value {
            None => Ok(Shape::Rect),
            Some(v) => v.parse(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Circle => "circle",
            Shape::Rect => "rect",
            Shape::Poly => "poly",
        }
    }
}

impl FromStr for Shape {
    type Err = ImageMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "circle" | "circ" => Ok(Shape::Circle),
            "rect" | "rectangle" => Ok(Shape::Rect),
            "poly" | "polygon" => Ok(Shape::Poly),
            _ => Err(ImageMapError::UnsupportedShape {
                shape: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, r: None }
    }

    pub fn with_radius(x: f64, y: f64, r: f64) -> Self {
        Self { x, y, r: Some(r) }
    }
}

impl Area {
    /// Build an area from its shape keyword, raw coords and remaining attributes.
    pub fn parse(
        shape: Option<&str>,
        coords: &str,
        attributes: Vec<(String, String)>,
    ) -> Result<Self, ImageMapError> {
        let shape = Shape::from_attribute(shape)?;
        let points = crate::coords_parser::parse_coords(shape, coords)?;
        Ok(Self {
            shape,
            coords: coords.to_string(),
            points,
            attributes,
        })
    }

    /// Build an area from the full attribute list of an `<area>` element.
    /// `coords` is pulled out; everything else, `shape` included, passes through.
    pub fn from_attributes(mut attributes: Vec<(String, String)>) -> Result<Self, ImageMapError> {
        let coords = match attributes
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case("coords"))
        {
            Some(idx) => attributes.remove(idx).1,
            None => return Err(ImageMapError::invalid_coords("", "missing coords attribute")),
        };
        let shape = attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("shape"))
            .map(|(_, v)| v.clone());

        Self::parse(shape.as_deref(), &coords, attributes)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl Scale {
    pub const IDENTITY: Scale = Scale(1.0);

    pub fn new(factor: f64) -> Option<Self> {
        if factor.is_finite() && factor > 0.0 {
            Some(Scale(factor))
        } else {
            None
        }
    }

    /// Scale for an image shown `displayed` pixels wide whose bitmap is `natural` wide.
    pub fn from_widths(displayed: f64, natural: f64) -> Result<Self, ImageMapError> {
        Self::new(displayed / natural).ok_or(ImageMapError::InvalidScale { displayed, natural })
    }

    pub fn factor(&self) -> f64 {
        self.0
    }

    pub fn is_identity(&self) -> bool {
        self.0 == 1.0
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_keywords() {
        assert_eq!("circle".parse::<Shape>().unwrap(), Shape::Circle);
        assert_eq!("RECT".parse::<Shape>().unwrap(), Shape::Rect);
        assert_eq!("polygon".parse::<Shape>().unwrap(), Shape::Poly);
        assert_eq!(Shape::from_attribute(None).unwrap(), Shape::Rect);
        assert_eq!(
            "default".parse::<Shape>(),
            Err(ImageMapError::UnsupportedShape {
                shape: "default".to_string()
            })
        );
    }

    #[test]
    fn test_scale_invariant() {
        assert!(Scale::new(0.0).is_none());
        assert!(Scale::new(-1.0).is_none());
        assert!(Scale::new(f64::NAN).is_none());
        assert!(Scale::from_widths(400.0, 0.0).is_err());
        assert_eq!(Scale::from_widths(400.0, 800.0).unwrap().factor(), 0.5);
        assert!(Scale::default().is_identity());
    }

    #[test]
    fn test_area_parse_keeps_attributes() {
        let attrs = vec![
            ("href".to_string(), "/kitchen".to_string()),
            ("alt".to_string(), "Kitchen".to_string()),
        ];
        let area = Area::parse(Some("rect"), "10,20,30,40", attrs.clone()).unwrap();
        assert_eq!(area.points.len(), 2);
        assert_eq!(area.attributes, attrs);
        assert_eq!(area.attribute("HREF"), Some("/kitchen"));
    }

    #[test]
    fn test_from_attributes() {
        let attrs = vec![
            ("shape".to_string(), "poly".to_string()),
            ("coords".to_string(), "0,0,10,0,10,10".to_string()),
            ("href".to_string(), "#a".to_string()),
        ];
        let area = Area::from_attributes(attrs).unwrap();
        assert_eq!(area.shape, Shape::Poly);
        assert_eq!(area.coords, "0,0,10,0,10,10");
        assert_eq!(area.attribute("coords"), None);
        assert_eq!(area.attribute("shape"), Some("poly"));

        let missing = vec![("href".to_string(), "#a".to_string())];
        assert!(matches!(
            Area::from_attributes(missing),
            Err(ImageMapError::InvalidCoordinateFormat { .. })
        ));
    }
}
