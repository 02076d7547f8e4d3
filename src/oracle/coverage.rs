use regex::Regex;
use std::sync::OnceLock;

/// Regex for the summary line printed by the coverage tool, e.g. `Coverage: 87.50%`
fn coverage_regex() -> &'static Regex {
    static COVERAGE_REGEX: OnceLock<Regex> = OnceLock::new();
    COVERAGE_REGEX.get_or_init(|| Regex::new(r"Coverage:\s+(\d+\.?\d*)%").expect("Invalid regex"))
}

/// Extracts the first coverage percentage reported in `output`.
pub fn parse_coverage(output: &str) -> Option<f64> {
    coverage_regex()
        .captures(output)
        .and_then(|captures| captures.get(1))
        .and_then(|value| value.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_parses_a_decimal_percentage() {
        assert_eq!(parse_coverage("Coverage: 87.50%"), Some(87.5));
    }

    #[test]
    fn it_parses_an_integer_percentage() {
        assert_eq!(parse_coverage("Coverage:   100%"), Some(100.0));
    }

    #[test]
    fn it_finds_the_line_among_other_output() {
        let output = "\
Running testcov on Problem03_label00.c
Tests: 42
Coverage: 61.3%
done
";
        assert_eq!(parse_coverage(output), Some(61.3));
    }

    #[test]
    fn it_uses_the_first_match() {
        assert_eq!(
            parse_coverage("Coverage: 10.0%\nCoverage: 20.0%"),
            Some(10.0)
        );
    }

    #[test]
    fn it_returns_none_without_a_match() {
        assert_eq!(parse_coverage(""), None);
        assert_eq!(parse_coverage("Coverage: n/a"), None);
        assert_eq!(parse_coverage("coverage: 50%"), None);
        assert_eq!(parse_coverage("Coverage:50%"), None);
    }
}
