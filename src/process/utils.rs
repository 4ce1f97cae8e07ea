/// Double every single quote so `raw` can sit inside a SQL string literal.
pub fn escape_sql_string(raw: &str) -> String {
    raw.replace('\'', "''")
}

/// `'raw'` with quotes escaped.
pub fn quote_sql_string(raw: &str) -> String {
    format!("'{}'", escape_sql_string(raw))
}

/// Parse a numeric cell. Surrounding whitespace is ignored; NaN and
/// infinities are rejected, and so are digit separators (`1_000`).
pub fn parse_decimal(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Format a float the way the dumps have always printed them: shortest
/// round-trip digits, at least one fractional digit (`8.0`), and exponent
/// form outside `1e-4 <= |v| < 1e16` (`1e+16`, `1.5e-05`).
pub fn format_decimal(v: f64) -> String {
    if v == 0.0 || !v.is_finite() {
        return with_point_zero(v.to_string());
    }

    let sci = format!("{:e}", v);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => return with_point_zero(v.to_string()),
    };

    if (-4..16).contains(&exp) {
        with_point_zero(v.to_string())
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exp.abs())
    }
}

fn with_point_zero(s: String) -> String {
    if s.contains('.') || s.contains("inf") || s.contains("NaN") {
        s
    } else {
        s + ".0"
    }
}

/// Integer rendering of a key cell: parsed as a float, then truncated
/// toward zero (`"42.9"` -> `42`). `None` when the cell is not a finite number.
pub fn format_integer_key(raw: &str) -> Option<String> {
    let v = parse_decimal(raw)?;
    // adding 0.0 folds -0.0 into 0.0
    Some(format!("{:.0}", v.trunc() + 0.0))
}
