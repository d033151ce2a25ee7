use serde_json::Value;

use super::media::MediaResolver;
use super::reference::{as_number, RawDocument};
use super::rich_text::plain_text;
use crate::domain::{AdaptedAddress, AdaptedLocation, Coordinates, MapPosition};

/// Adapt an embedded venue document
pub fn adapt_location_document(doc: RawDocument<'_>, media: &MediaResolver) -> AdaptedLocation {
    let coordinates_field = doc.get("coordinates");
    AdaptedLocation {
        id: doc.id().unwrap_or_default(),
        name: doc.string("name"),
        short_name: doc.string("shortName"),
        description: plain_text(doc.get("description")),
        image: media.adapt_image(doc.reference("image")),
        address: doc.nested("address").map(adapt_address).unwrap_or_default(),
        coordinates: coordinates_field.and_then(normalize_coordinates),
        map_position: doc
            .get("mapPosition")
            .or(coordinates_field)
            .and_then(normalize_map_position),
        opening_hours: opening_hours(doc.get("openingHours")),
    }
}

fn adapt_address(doc: RawDocument<'_>) -> AdaptedAddress {
    let number = doc.str("number").map(str::to_string).or_else(|| doc.number("number").map(|n| n.to_string()));
    AdaptedAddress {
        street: doc.string("street"),
        number: number.unwrap_or_default(),
        postal_code: doc.string("postalCode"),
        city: doc.string("city"),
    }
}

/// Normalize `[lng, lat]` pairs and `{lat, lng}` / `{latitude, longitude}` objects
pub fn normalize_coordinates(value: &Value) -> Option<Coordinates> {
    let (lat, lng) = match value {
        Value::Array(pair) if pair.len() == 2 => (as_number(&pair[1])?, as_number(&pair[0])?),
        Value::Object(_) => {
            let doc = RawDocument::from_value(value)?;
            (
                doc.number("lat").or_else(|| doc.number("latitude"))?,
                doc.number("lng").or_else(|| doc.number("lon")).or_else(|| doc.number("longitude"))?,
            )
        }
        _ => return None,
    };
    ((-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)).then_some(Coordinates { lat, lng })
}

/// Percent position on the site map
fn normalize_map_position(value: &Value) -> Option<MapPosition> {
    let doc = RawDocument::from_value(value)?;
    let (x, y) = (doc.number("x")?, doc.number("y")?);
    ((0.0..=100.0).contains(&x) && (0.0..=100.0).contains(&y)).then_some(MapPosition { x, y })
}

fn opening_hours(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Array(lines) => lines
            .iter()
            .filter_map(|line| match line {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Object(_) => {
                    let doc = RawDocument::from_value(line)?;
                    let day = doc.str("day").or_else(|| doc.str("days"))?;
                    let hours = doc.str("hours").or_else(|| doc.str("time")).unwrap_or_default();
                    Some(format!("{day}: {hours}").trim_end_matches([':', ' ']).to_string())
                }
                _ => None,
            })
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        other => plain_text(Some(other)),
    };
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coordinates_from_pair() {
        let c = normalize_coordinates(&json!([13.405, 52.52])).unwrap();
        assert_eq!(c, Coordinates { lat: 52.52, lng: 13.405 });
    }

    #[test]
    fn test_coordinates_from_objects() {
        assert_eq!(
            normalize_coordinates(&json!({"lat": 52.52, "lng": 13.405})),
            Some(Coordinates { lat: 52.52, lng: 13.405 })
        );
        assert_eq!(
            normalize_coordinates(&json!({"latitude": "52.52", "longitude": "13.405"})),
            Some(Coordinates { lat: 52.52, lng: 13.405 })
        );
    }

    #[test]
    fn test_coordinates_rejects_bad_shapes() {
        assert!(normalize_coordinates(&json!([13.405])).is_none());
        assert!(normalize_coordinates(&json!(["a", "b"])).is_none());
        assert!(normalize_coordinates(&json!({"x": 10, "y": 20})).is_none());
        assert!(normalize_coordinates(&json!([13.4, 152.0])).is_none());
        assert!(normalize_coordinates(&json!("52.52,13.405")).is_none());
    }

    #[test]
    fn test_adapt_full_venue() {
        let media = MediaResolver::from_api_base("https://cms.example.org/api");
        let value = json!({
            "id": "v1",
            "name": "Kulturzentrum am Markt",
            "shortName": "KuZ",
            "address": {"street": "Marktplatz", "number": 3, "postalCode": "12345", "city": "Musterstadt"},
            "coordinates": [8.68, 50.11],
            "mapPosition": {"x": 42.5, "y": "18"},
            "image": {"id": "m9", "url": "/media/kuz.jpg", "alt": "KuZ"},
            "openingHours": [{"day": "Mo-Fr", "hours": "9-18 Uhr"}, "Sa nach Vereinbarung"]
        });
        let location = adapt_location_document(RawDocument::from_value(&value).unwrap(), &media);
        assert_eq!(location.display_name(), "KuZ");
        assert_eq!(location.address.line(), "Marktplatz 3, 12345 Musterstadt");
        assert_eq!(location.coordinates, Some(Coordinates { lat: 50.11, lng: 8.68 }));
        assert_eq!(location.map_position, Some(MapPosition { x: 42.5, y: 18.0 }));
        assert_eq!(location.image.unwrap().url.as_deref(), Some("https://cms.example.org/media/kuz.jpg"));
        assert_eq!(location.opening_hours.as_deref(), Some("Mo-Fr: 9-18 Uhr\nSa nach Vereinbarung"));
    }

    #[test]
    fn test_map_position_from_coordinates_field() {
        let value = json!({"id": "v2", "name": "Bühne", "coordinates": {"x": 10, "y": 90}});
        let location = adapt_location_document(RawDocument::from_value(&value).unwrap(), &MediaResolver::default());
        assert!(location.coordinates.is_none());
        assert_eq!(location.map_position, Some(MapPosition { x: 10.0, y: 90.0 }));
        assert!(location.address.is_empty());
    }
}
