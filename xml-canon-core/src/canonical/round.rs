/// Finite `f64` values never need more fractional digits than this.
const MAX_DECIMALS: usize = 1100;

/// Normalize a text or attribute value.
///
/// The trimmed value is parsed as an `f64`. Finite numbers are printed with
/// `decimals` fractional digits (ties go to even on the exact binary value),
/// then trailing zeros and a dangling point are dropped and `-0` becomes `0`.
/// Anything else, `nan` and `inf` included, comes back as the trimmed input.
pub fn round_value(raw: &str, decimals: usize) -> String {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => format_rounded(value, decimals),
        _ => trimmed.to_string(),
    }
}

fn format_rounded(value: f64, decimals: usize) -> String {
    // Runtime format precision is capped at u16::MAX.
    let decimals = decimals.min(MAX_DECIMALS);
    let mut out = format!("{value:.decimals$}");

    if out.contains('.') {
        let kept = out.trim_end_matches('0').trim_end_matches('.').len();
        out.truncate(kept);
    }

    if out == "-0" {
        out.remove(0);
    }
    out
}
