use once_cell::sync::Lazy;
use regex::Regex;

// Anchored at the start only; trailing text after the closing paren is ignored.
static POINT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^POINT \(([+-]?[0-9]+\.?[0-9]*) ([+-]?[0-9]+\.?[0-9]*)\)")
        .expect("static POINT regex")
});

/// Extract `(longitude, latitude)` from a WKT `POINT (lon lat)` string.
///
/// Anything that does not match yields `None`; callers render that as two
/// `NULL` coordinates.
pub fn parse_point(wkt: &str) -> Option<(f64, f64)> {
    let caps = POINT_RE.captures(wkt)?;
    let lon = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let lat = caps.get(2)?.as_str().parse::<f64>().ok()?;
    Some((lon, lat))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_points() {
        assert_eq!(parse_point("POINT (-99.1 19.4)"), Some((-99.1, 19.4)));
        assert_eq!(parse_point("POINT (+3 -4.)"), Some((3.0, -4.0)));
        assert_eq!(parse_point("POINT (10 20) trailing"), Some((10.0, 20.0)));
    }

    #[test]
    fn malformed_points_are_none() {
        assert_eq!(parse_point(""), None);
        assert_eq!(parse_point("POINT(-99.1 19.4)"), None);
        assert_eq!(parse_point("POINT (-99.1, 19.4)"), None);
        assert_eq!(parse_point("POINT (.5 1)"), None);
        assert_eq!(parse_point(" POINT (1 2)"), None);
        assert_eq!(parse_point("LINESTRING (1 2, 3 4)"), None);
        assert_eq!(parse_point("POINT (1e5 2)"), None);
    }
}
