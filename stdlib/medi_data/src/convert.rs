/// mg/dL of cholesterol per mmol/L.
pub const CHOLESTEROL_MG_DL_PER_MMOL_L: f64 = 38.665;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConvertError {
    #[error("not a number: {0:?}")]
    NotNumeric(String),
}

/// Round half away from zero to one decimal place.
pub fn round_one_decimal(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Parse a finite decimal, ignoring surrounding whitespace.
pub fn parse_decimal(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Total or HDL cholesterol, mg/dL -> mmol/L, rounded to one decimal.
pub fn convert_cholesterol(mg_dl: f64) -> f64 {
    round_one_decimal(mg_dl * 10.0 / 386.65)
}

pub fn convert_cholesterol_text(mg_dl: &str) -> Result<f64, ConvertError> {
    parse_decimal(mg_dl)
        .map(convert_cholesterol)
        .ok_or_else(|| ConvertError::NotNumeric(mg_dl.to_string()))
}
