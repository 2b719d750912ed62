//! Input checks applied to both company names before any upstream call.

const MIN_LEN: usize = 2;
const MAX_LEN: usize = 100;

const PLACEHOLDERS: &[&str] = &["company", "example", "test", "placeholder", "enter company"];

const INJECTION_PATTERNS: &[&str] = &["<script", "javascript:", "onerror=", "onclick="];

/// Returns the message of the first rule the pair violates, or `None` when
/// both names are acceptable.
pub fn validate(company_a: &str, company_b: &str) -> Option<String> {
    let a = company_a.trim();
    let b = company_b.trim();

    if a.is_empty() || b.is_empty() {
        return Some("Please enter both company names to compare".into());
    }

    let names = [("A", a), ("B", b)];

    for (label, name) in names {
        if name.chars().count() < MIN_LEN {
            return Some(format!(
                "Company {label} name must be at least {MIN_LEN} characters long"
            ));
        }
    }

    for (label, name) in names {
        if name.chars().count() > MAX_LEN {
            return Some(format!(
                "Company {label} name is too long (maximum {MAX_LEN} characters)"
            ));
        }
    }

    for (label, name) in names {
        if !name.chars().any(char::is_alphabetic) {
            return Some(format!(
                "Company {label} name must contain at least some letters"
            ));
        }
    }

    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();

    if a_lower == b_lower {
        return Some("Please enter two different companies to compare".into());
    }

    if PLACEHOLDERS.contains(&a_lower.as_str()) || PLACEHOLDERS.contains(&b_lower.as_str()) {
        return Some("Please enter real company names instead of placeholder text".into());
    }

    let injected = |lower: &str| INJECTION_PATTERNS.iter().any(|p| lower.contains(p));
    if injected(&a_lower) || injected(&b_lower) {
        return Some("Invalid characters detected in company names".into());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn accepts_two_real_names() {
        assert_eq!(validate("Microsoft", "Google"), None);
        assert_eq!(validate("  AT&T ", "3M Company"), None);
    }

    #[test]
    fn rejects_blank_fields() {
        assert_eq!(
            validate("   ", "Google").as_deref(),
            Some("Please enter both company names to compare")
        );
        assert!(validate("Google", "").is_some());
    }

    #[test]
    fn enforces_length_bounds() {
        assert_eq!(
            validate("X", "Google").as_deref(),
            Some("Company A name must be at least 2 characters long")
        );
        let long = "a".repeat(101);
        assert_eq!(
            validate("Google", &long).as_deref(),
            Some("Company B name is too long (maximum 100 characters)")
        );
        assert_eq!(validate(&"a".repeat(100), "Google"), None);
    }

    #[test]
    fn requires_a_letter() {
        assert_eq!(
            validate("1234", "Google").as_deref(),
            Some("Company A name must contain at least some letters")
        );
        assert_eq!(
            validate("Google", "!!!").as_deref(),
            Some("Company B name must contain at least some letters")
        );
    }

    #[test]
    fn rejects_same_company_ignoring_case() {
        assert_eq!(
            validate("Apple", "apple").as_deref(),
            Some("Please enter two different companies to compare")
        );
    }

    #[test]
    fn rejects_placeholders_exactly() {
        assert_eq!(
            validate("Example", "Google").as_deref(),
            Some("Please enter real company names instead of placeholder text")
        );
        assert!(validate("Enter Company", "Google").is_some());
        // only exact matches count
        assert_eq!(validate("Test Automation Inc", "Google"), None);
    }

    #[test]
    fn rejects_injection_substrings() {
        for bad in [
            "<SCRIPT>alert(1)",
            "JavaScript:void(0)",
            "img onerror=x",
            "a onClick=go",
        ] {
            assert_eq!(
                validate("Google", bad).as_deref(),
                Some("Invalid characters detected in company names"),
                "{bad}"
            );
        }
    }

    #[test]
    fn first_failing_rule_wins() {
        // too short beats identical
        assert_eq!(
            validate("A", "A").as_deref(),
            Some("Company A name must be at least 2 characters long")
        );
        // both minimums are checked before either maximum
        assert_eq!(
            validate(&"a".repeat(101), "X").as_deref(),
            Some("Company B name must be at least 2 characters long")
        );
        // identical beats placeholder
        assert_eq!(
            validate("test", "TEST").as_deref(),
            Some("Please enter two different companies to compare")
        );
    }
}
