use regex::Regex;
use std::sync::LazyLock;

use crate::media::LatLng;

static DEG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)deg").unwrap());

/// A signed number followed by a unit mark, or a bare hemisphere letter.
static PART_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?P<value>[+-]?\d+(?:\.\d+)?)\s*(?P<unit>[°'"′″])|(?P<hemisphere>[nesw])"#)
        .unwrap()
});

/// WGS84 position; `None` on an axis means that half of the input did not parse.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl Coordinate {
    pub fn as_pair(&self) -> LatLng {
        [self.lat, self.lng]
    }
}

/// Parse a human-readable WGS84 coordinate string.
///
/// Accepted notations include:
/// - `60 deg 08.2151' N, 24 deg 25.6136' E`
/// - `43°38'19.39"N,116°14'28.86"W`
/// - `+43.6387194°, -116.2413500°`
///
/// The first comma separates latitude from longitude; anything after a second
/// comma is ignored. Never fails: garbage input yields `None` on the affected axis.
pub fn parse_wgs84(input: &str) -> Coordinate {
    let normalized = DEG_RE.replace_all(input, "°");
    let mut axes = normalized.split(',');
    Coordinate {
        lat: axes.next().and_then(parse_axis),
        lng: axes.next().and_then(parse_axis),
    }
}

fn parse_axis(part: &str) -> Option<f64> {
    let mut value: Option<f64> = None;

    for caps in PART_RE.captures_iter(part) {
        if let (Some(number), Some(unit)) = (caps.name("value"), caps.name("unit")) {
            let Ok(number) = number.as_str().parse::<f64>() else {
                continue;
            };
            let rank = match unit.as_str() {
                "°" => 0,
                "'" | "′" => 1,
                _ => 2,
            };
            value = Some(value.unwrap_or(0.0) + number / 60f64.powi(rank));
        } else if let Some(hemisphere) = caps.name("hemisphere") {
            // Southern and western hemispheres flip whatever has been accumulated so far
            if matches!(hemisphere.as_str(), "S" | "s" | "W" | "w") {
                value = value.map(|v| -v);
            }
        }
    }

    value.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("axis should parse");
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_signed_decimal_degrees() {
        let c = parse_wgs84("+43.6387194°, -116.2413500°");
        approx(c.lat, 43.6387194);
        approx(c.lng, -116.24135);
    }

    #[test]
    fn test_degrees_and_decimal_minutes() {
        let c = parse_wgs84("60 deg 08.2151' N, 24 deg 25.6136' E");
        approx(c.lat, 60.0 + 8.2151 / 60.0);
        approx(c.lng, 24.0 + 25.6136 / 60.0);

        let c = parse_wgs84("37 DEG 33.06' S, 126 Deg 59.28' W");
        approx(c.lat, -(37.0 + 33.06 / 60.0));
        approx(c.lng, -(126.0 + 59.28 / 60.0));
    }

    #[test]
    fn test_symbol_glyphs() {
        let c = parse_wgs84(r#"43°38'19.39"N,116°14'28.86"W"#);
        approx(c.lat, 43.0 + 38.0 / 60.0 + 19.39 / 3600.0);
        approx(c.lng, -(116.0 + 14.0 / 60.0 + 28.86 / 3600.0));

        let c = parse_wgs84("35°41′22.2″n, 139°41′30.1″e");
        approx(c.lat, 35.0 + 41.0 / 60.0 + 22.2 / 3600.0);
        approx(c.lng, 139.0 + 41.0 / 60.0 + 30.1 / 3600.0);
    }

    #[test]
    fn test_garbage_never_fails() {
        assert_eq!(parse_wgs84(""), Coordinate::default());
        assert_eq!(parse_wgs84("not a coordinate"), Coordinate::default());
        assert_eq!(parse_wgs84("12, 34"), Coordinate::default());

        let c = parse_wgs84("10° N, nowhere");
        approx(c.lat, 10.0);
        assert_eq!(c.lng, None);
    }

    #[test]
    fn test_missing_comma_only_sets_latitude() {
        let c = parse_wgs84("51°30'N");
        approx(c.lat, 51.5);
        assert_eq!(c.lng, None);
    }

    #[test]
    fn test_extra_components_are_ignored() {
        let c = parse_wgs84("1°, 2°, 3°");
        approx(c.lat, 1.0);
        approx(c.lng, 2.0);
    }

    #[test]
    fn test_overflowing_number_is_unparsable() {
        let huge = format!("{}°, 1°", "9".repeat(400));
        let c = parse_wgs84(&huge);
        assert_eq!(c.lat, None);
        approx(c.lng, 1.0);
    }

    #[test]
    fn test_as_pair() {
        let c = parse_wgs84("1°, x");
        assert_eq!(c.as_pair(), [Some(1.0), None]);
    }
}
