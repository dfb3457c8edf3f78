//! Metric extraction: turn free-form model text into a numeric score.
//!
//! The percentage-match instruction asks the model to lead with a
//! percentage, but the reply is still prose. The score is the first
//! `<digits>%` in the text, read as a base-10 integer; no match means 0.
//!
//! Values are **not** clamped: "150% match" yields 150. Presentation layers
//! that need `[0, 100]` call [`clamp_percentage`] explicitly.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// ASCII digits immediately followed by `%`. `\d` would also accept
/// non-ASCII digits, which `u32::from_str` rejects.
static RE_PERCENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9]+)%").unwrap());

/// First `<digits>%` in `text` as an integer, or 0 when there is none.
///
/// A digit run too long for `u32` saturates at `u32::MAX`.
///
/// ```rust
/// use resume_lens::extract_percentage;
///
/// assert_eq!(extract_percentage("MATCH SCORE: 82%"), 82);
/// assert_eq!(extract_percentage("90% then later 40%"), 90);
/// assert_eq!(extract_percentage("no numbers here"), 0);
/// ```
pub fn extract_percentage(text: &str) -> u32 {
    let Some(caps) = RE_PERCENT.captures(text) else {
        return 0;
    };
    match caps[1].parse::<u32>() {
        Ok(v) => v,
        // the capture is all ASCII digits, so the only failure is overflow
        Err(e) => {
            debug!("Percentage {:?} saturated: {}", &caps[1], e);
            u32::MAX
        }
    }
}

/// Clamp an extracted percentage into `[0, 100]`.
pub fn clamp_percentage(value: u32) -> u8 {
    value.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_score_line() {
        assert_eq!(extract_percentage("MATCH SCORE: 82%"), 82);
    }

    #[test]
    fn no_match_is_zero() {
        assert_eq!(extract_percentage("no numbers here"), 0);
        assert_eq!(extract_percentage(""), 0);
        assert_eq!(extract_percentage("42 percent"), 0);
        assert_eq!(extract_percentage("% alone"), 0);
    }

    #[test]
    fn first_match_wins() {
        assert_eq!(extract_percentage("90% then later 40%"), 90);
    }

    #[test]
    fn space_before_percent_does_not_match() {
        assert_eq!(extract_percentage("about 75 % overall, 60% skills"), 60);
    }

    #[test]
    fn out_of_range_is_not_clamped() {
        assert_eq!(extract_percentage("150% match"), 150);
        assert_eq!(clamp_percentage(150), 100);
        assert_eq!(clamp_percentage(82), 82);
    }

    #[test]
    fn decimal_takes_fraction_digits() {
        // "82.5%": the digit run touching '%' is "5"
        assert_eq!(extract_percentage("82.5%"), 5);
    }

    #[test]
    fn leading_zeros_parse() {
        assert_eq!(extract_percentage("007%"), 7);
    }

    #[test]
    fn overflowing_digits_saturate() {
        assert_eq!(extract_percentage("4294967296% match"), u32::MAX);
        assert_eq!(extract_percentage("99999999999999999999%"), u32::MAX);
        assert_eq!(extract_percentage("4294967295%"), u32::MAX);
        assert_eq!(clamp_percentage(extract_percentage("4294967296%")), 100);
    }

    #[test]
    fn markdown_wrapped_percentage() {
        let reply = "## Percentage Match\n\n**Match: 68%**\n\n### Missing Keywords\n- Kubernetes";
        assert_eq!(extract_percentage(reply), 68);
    }

    #[test]
    fn non_ascii_digits_ignored() {
        assert_eq!(extract_percentage("٨٢% then 12%"), 12);
    }
}
