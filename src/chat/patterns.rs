use once_cell::sync::Lazy;
use regex::Regex;

/// Change-identifier-shaped token: two or more letters followed by three
/// or more digits, or a known ticket prefix (CHG/UN/UB) plus digits.
static CHANGE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:[A-Za-z]{2,}[0-9]{3,}|(?:CHG|UN|UB)[0-9]+)\b").unwrap());

/// Explicit policy id in a push command ("push 101").
static PUSH_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"push\s+(\d+)").unwrap());

pub fn change_id_token(input: &str) -> Option<String> {
    CHANGE_ID.find(input).map(|m| m.as_str().to_string())
}

pub fn explicit_push_id(input: &str) -> Option<u32> {
    PUSH_ID
        .captures(input)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_id_shapes() {
        assert_eq!(change_id_token("model change CHG0040012").as_deref(), Some("CHG0040012"));
        assert_eq!(change_id_token("validate UB77 please").as_deref(), Some("UB77"));
        assert_eq!(change_id_token("check fw123 now").as_deref(), Some("fw123"));
        assert_eq!(change_id_token("no id here"), None);
        // one letter or too few digits is not an id
        assert_eq!(change_id_token("a123 xy12"), None);
    }

    #[test]
    fn push_id_extraction() {
        assert_eq!(explicit_push_id("push 101"), Some(101));
        assert_eq!(explicit_push_id("push   7"), Some(7));
        assert_eq!(explicit_push_id("push it"), None);
    }
}
