/// Parse a human-written run time such as `300s`, `20m` or `3h` into seconds.
///
/// A missing or empty value means no run time was configured and parses to 0. A value without a
/// unit suffix is taken as seconds. Anything unparseable logs a warning and parses to 0 rather
/// than failing the run.
///
/// Compound specs such as `1h30m` are not supported; they fail the integer parse and fall back
/// to 0 like any other unrecognised input.
pub fn parse_run_time(run_time: Option<&str>) -> u64 {
    let Some(run_time) = run_time.map(str::trim) else {
        return 0;
    };
    if run_time.is_empty() {
        return 0;
    }

    let (number, multiplier) = match run_time.as_bytes().last() {
        Some(b's') => (&run_time[..run_time.len() - 1], 1),
        Some(b'm') => (&run_time[..run_time.len() - 1], 60),
        Some(b'h') => (&run_time[..run_time.len() - 1], 3600),
        _ => (run_time, 1),
    };

    match number.parse::<u64>() {
        Ok(seconds) => seconds * multiplier,
        Err(_) => {
            log::warn!("Could not parse run time `{run_time}`, treating it as 0s");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_suffix() {
        assert_eq!(parse_run_time(Some("300s")), 300);
    }

    #[test]
    fn minutes_suffix() {
        assert_eq!(parse_run_time(Some("20m")), 1200);
    }

    #[test]
    fn hours_suffix() {
        assert_eq!(parse_run_time(Some("3h")), 10800);
    }

    #[test]
    fn bare_number_is_seconds() {
        assert_eq!(parse_run_time(Some("45")), 45);
    }

    #[test]
    fn absent_and_empty_are_zero() {
        assert_eq!(parse_run_time(None), 0);
        assert_eq!(parse_run_time(Some("")), 0);
        assert_eq!(parse_run_time(Some("   ")), 0);
    }

    #[test]
    fn garbage_is_zero_not_an_error() {
        assert_eq!(parse_run_time(Some("banana")), 0);
    }

    #[test]
    fn compound_specs_are_not_supported() {
        assert_eq!(parse_run_time(Some("1h30m")), 0);
    }
}
