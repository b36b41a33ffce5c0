//! Encoded polyline format (precision 5), as consumed by web map clients.

use geotrack_core::error::{GeotrackError, Result};
use geotrack_core::models::Coordinate;

const FACTOR: f64 = 1e5;

/// Encode a coordinate sequence as a polyline string
pub fn encode_polyline(coords: &[Coordinate]) -> String {
    let mut output = String::with_capacity(coords.len() * 8);
    let mut prev_lat = 0i64;
    let mut prev_lon = 0i64;

    for coord in coords {
        let lat = (coord.lat * FACTOR).round() as i64;
        let lon = (coord.lon * FACTOR).round() as i64;
        encode_value(lat - prev_lat, &mut output);
        encode_value(lon - prev_lon, &mut output);
        prev_lat = lat;
        prev_lon = lon;
    }

    output
}

fn encode_value(delta: i64, output: &mut String) {
    let mut value = if delta < 0 { !(delta << 1) } else { delta << 1 };
    while value >= 0x20 {
        output.push(char::from((((value & 0x1f) | 0x20) + 63) as u8));
        value >>= 5;
    }
    output.push(char::from((value + 63) as u8));
}

/// Decode a polyline string back into coordinates
pub fn decode_polyline(encoded: &str) -> Result<Vec<Coordinate>> {
    let bytes = encoded.as_bytes();
    let mut coords = Vec::new();
    let mut index = 0;
    let mut lat = 0i64;
    let mut lon = 0i64;

    while index < bytes.len() {
        lat += decode_value(bytes, &mut index)?;
        lon += decode_value(bytes, &mut index)?;
        coords.push(Coordinate::new(lat as f64 / FACTOR, lon as f64 / FACTOR));
    }

    Ok(coords)
}

fn decode_value(bytes: &[u8], index: &mut usize) -> Result<i64> {
    let mut result = 0i64;
    let mut shift = 0;

    loop {
        let byte = *bytes
            .get(*index)
            .ok_or_else(|| GeotrackError::validation("polyline", "unexpected end of input"))?;
        if !(63..127).contains(&byte) {
            return Err(GeotrackError::validation(
                "polyline",
                format!("invalid character at offset {}", index),
            ));
        }
        if shift > 60 {
            return Err(GeotrackError::validation("polyline", "value too long"));
        }

        *index += 1;
        let chunk = (byte - 63) as i64;
        result |= (chunk & 0x1f) << shift;
        shift += 5;

        if chunk < 0x20 {
            break;
        }
    }

    Ok(if result & 1 == 1 { !(result >> 1) } else { result >> 1 })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Coordinate> {
        vec![
            Coordinate::new(38.5, -120.2),
            Coordinate::new(40.7, -120.95),
            Coordinate::new(43.252, -126.453),
        ]
    }

    #[test]
    fn test_encode_known_vector() {
        assert_eq!(encode_polyline(&sample()), "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
    }

    #[test]
    fn test_decode_known_vector() {
        let decoded = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
        assert_eq!(decoded.len(), 3);
        for (got, want) in decoded.iter().zip(sample()) {
            assert!((got.lat - want.lat).abs() < 1e-9);
            assert!((got.lon - want.lon).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty() {
        assert_eq!(encode_polyline(&[]), "");
        assert!(decode_polyline("").unwrap().is_empty());
    }

    #[test]
    fn test_truncated_input_rejected() {
        // Drop the final character so the last longitude never terminates
        let err = decode_polyline("_p~iF~ps|").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_invalid_character_rejected() {
        assert!(decode_polyline("_p~iF ps|U").is_err());
    }
}
