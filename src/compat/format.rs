//! Human-readable rendering of version codes

/// Render a game version code as `major.minor.patch`
///
/// Codes are expected as four digits (`1234` -> `1.23.4`). Anything else is
/// returned as-is, and a missing code renders as `Unknown`.
pub fn format_version(code: Option<&str>) -> String {
    let Some(code) = code else {
        return "Unknown".to_string();
    };

    let chars: Vec<char> = code.chars().collect();
    match chars.as_slice() {
        [major, minor_hi, minor_lo, patch] => {
            format!("{major}.{minor_hi}{minor_lo}.{patch}")
        }
        _ => code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("1234"), "1.23.4")]
    #[case(Some("2051"), "2.05.1")]
    #[case(Some("99"), "99")]
    #[case(Some("12345"), "12345")]
    #[case(Some(""), "")]
    #[case(None, "Unknown")]
    fn format_version_renders_expected_text(#[case] code: Option<&str>, #[case] expected: &str) {
        assert_eq!(format_version(code), expected);
    }
}
