// src/markup.rs
//
// quick-xml based reader/writer for image map fragments, so markup can be
// rescaled without a live DOM (pre-rendering, fixtures).

use crate::error::ImageMapError;
use crate::map_data::{Area, Scale};
use crate::scaler::scaled_coords;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

/// A `<map>` element and the areas it contains.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarkup {
    pub name: String,
    /// Attributes of the `<map>` element itself, in source order.
    pub attributes: Vec<(String, String)>,
    pub areas: Vec<Area>,
}

/// Parse the first `<map>` in `markup`.
///
/// `<area>` may be written self-closing or as an HTML void element. Anything
/// inside the map that is not an area is ignored.
pub fn parse_map_markup(markup: &str) -> Result<MapMarkup, ImageMapError> {
    let mut reader = Reader::from_str(markup);
    reader.trim_text(true);
    reader.check_end_names(false);

    let mut map: Option<MapMarkup> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            ImageMapError::Markup(format!(
                "error at position {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let name = element_name(e);
                match name.as_str() {
                    "map" if map.is_none() => {
                        let attributes = read_attributes(e)?;
                        let map_name = attributes
                            .iter()
                            .find(|(k, _)| k.eq_ignore_ascii_case("name"))
                            .or_else(|| {
                                attributes.iter().find(|(k, _)| k.eq_ignore_ascii_case("id"))
                            })
                            .map(|(_, v)| v.clone())
                            .unwrap_or_default();
                        map = Some(MapMarkup {
                            name: map_name,
                            attributes,
                            areas: Vec::new(),
                        });
                        if matches!(event, Event::Empty(_)) {
                            break;
                        }
                    }
                    "area" => {
                        if let Some(map) = map.as_mut() {
                            map.areas.push(Area::from_attributes(read_attributes(e)?)?);
                        }
                    }
                    _ => {}
                }
            }
            Event::End(ref e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_ascii_lowercase();
                if name == "map" && map.is_some() {
                    break;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    map.ok_or_else(|| ImageMapError::MapNotFound {
        name: String::new(),
    })
}

/// Serialise `map` with every area's coords rescaled.
pub fn render_map_markup(map: &MapMarkup, scale: Scale) -> Result<String, ImageMapError> {
    let mut writer = Writer::new(Vec::new());

    let mut map_start = BytesStart::new("map");
    for (k, v) in &map.attributes {
        map_start.push_attribute((k.as_str(), v.as_str()));
    }
    writer.write_event(Event::Start(map_start))?;

    for area in &map.areas {
        let coords = scaled_coords(area, scale);
        let mut el = BytesStart::new("area");
        for (k, v) in &area.attributes {
            el.push_attribute((k.as_str(), v.as_str()));
        }
        el.push_attribute(("coords", coords.as_str()));
        writer.write_event(Event::Empty(el))?;
    }

    writer.write_event(Event::End(BytesEnd::new("map")))?;

    String::from_utf8(writer.into_inner()).map_err(|e| ImageMapError::Markup(e.to_string()))
}

/// Parse, rescale and re-emit a map fragment in one go.
pub fn rescale_map_markup(markup: &str, scale: Scale) -> Result<String, ImageMapError> {
    let map = parse_map_markup(markup)?;
    render_map_markup(&map, scale)
}

fn element_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).to_ascii_lowercase()
}

fn read_attributes(e: &BytesStart) -> Result<Vec<(String, String)>, ImageMapError> {
    let mut attributes = Vec::new();
    for attr in e.html_attributes() {
        let attr = attr.map_err(|err| ImageMapError::Markup(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr.unescape_value()?.to_string();
        attributes.push((key, value));
    }
    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map_data::Shape;

    const FLOOR_PLAN: &str = r##"
        <map name="floor">
            <area shape="rect" coords="0,0,100,50" href="/hall" alt="Hall" target="_blank">
            <area shape="circle" coords="50,50,20" href="/lamp" alt="Lamp" />
            <area shape="poly" coords="0,0,10,0,10,10" href="/corner" title="A &amp; B" />
        </map>
    "##;

    #[test]
    fn test_parse_map() {
        let map = parse_map_markup(FLOOR_PLAN).unwrap();
        assert_eq!(map.name, "floor");
        assert_eq!(map.areas.len(), 3);
        assert_eq!(map.areas[0].shape, Shape::Rect);
        assert_eq!(map.areas[0].attribute("target"), Some("_blank"));
        assert_eq!(map.areas[1].points.len(), 1);
        assert_eq!(map.areas[2].attribute("title"), Some("A & B"));
    }

    #[test]
    fn test_rescale_preserves_attributes() {
        let out = rescale_map_markup(FLOOR_PLAN, Scale::new(2.0).unwrap()).unwrap();
        let reparsed = parse_map_markup(&out).unwrap();
        let original = parse_map_markup(FLOOR_PLAN).unwrap();

        assert_eq!(reparsed.name, "floor");
        for (before, after) in original.areas.iter().zip(&reparsed.areas) {
            assert_eq!(before.attributes, after.attributes);
        }
        assert_eq!(reparsed.areas[0].coords, "0,0,200,100");
        assert_eq!(reparsed.areas[1].coords, "100,100,40");
        assert_eq!(reparsed.areas[2].coords, "0,0,20,0,20,20");
    }

    #[test]
    fn test_render_identity_keeps_coords_text() {
        let map = parse_map_markup(
            r#"<map name="m"><area shape="rect" coords="1, 2, 3, 4"/></map>"#,
        )
        .unwrap();
        let out = render_map_markup(&map, Scale::IDENTITY).unwrap();
        assert_eq!(
            out,
            r#"<map name="m"><area shape="rect" coords="1, 2, 3, 4"/></map>"#
        );
    }

    #[test]
    fn test_uppercase_markup() {
        let map =
            parse_map_markup(r#"<MAP NAME="m"><AREA SHAPE="rect" COORDS="1,2,3,4"/></MAP>"#)
                .unwrap();
        assert_eq!(map.name, "m");
        assert_eq!(map.areas.len(), 1);
        assert_eq!(map.areas[0].shape, Shape::Rect);
        assert_eq!(map.areas[0].coords, "1,2,3,4");

        let by_id = parse_map_markup(r#"<map ID="plan"><area coords="0,0,1,1"/></map>"#).unwrap();
        assert_eq!(by_id.name, "plan");
    }

    #[test]
    fn test_missing_map() {
        assert!(matches!(
            parse_map_markup("<div></div>"),
            Err(ImageMapError::MapNotFound { .. })
        ));
    }

    #[test]
    fn test_bad_area_is_reported() {
        let err = parse_map_markup(r#"<map name="m"><area shape="star" coords="1,2"/></map>"#)
            .unwrap_err();
        assert_eq!(
            err,
            ImageMapError::UnsupportedShape {
                shape: "star".to_string()
            }
        );

        let err = parse_map_markup(r#"<map name="m"><area shape="rect" coords="1,x,3,4"/></map>"#)
            .unwrap_err();
        assert!(matches!(err, ImageMapError::InvalidCoordinateFormat { .. }));
    }
}
