//! Small helpers shared by the login and signup handlers.

use regex::Regex;

/// Fallback target when the submitted redirect is missing or unsafe.
pub(super) const DEFAULT_REDIRECT: &str = "/";

/// Accept a caller-supplied redirect target only when it is a same-origin
/// relative path. Absolute URLs, protocol-relative `//host` values, and
/// backslash tricks all fall back to `/` to prevent open redirects.
pub(super) fn safe_redirect(target: Option<&str>, fallback: &'static str) -> String {
    match target {
        Some(path)
            if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') =>
        {
            path.to_string()
        }
        _ => fallback.to_string(),
    }
}

/// Username sanity check applied at signup: printable, no whitespace,
/// bounded length. Lookups stay case-sensitive as stored.
pub(super) fn valid_username(username: &str) -> bool {
    Regex::new(r"^\S{1,64}$").is_ok_and(|re| re.is_match(username))
}

pub(super) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::TestDbError;
    use super::*;

    #[test]
    fn safe_redirect_accepts_relative_paths() {
        assert_eq!(safe_redirect(Some("/"), "/"), "/");
        assert_eq!(safe_redirect(Some("/notes/42"), "/"), "/notes/42");
        assert_eq!(safe_redirect(Some("/login?retry=1"), "/"), "/login?retry=1");
    }

    #[test]
    fn safe_redirect_rejects_absolute_urls() {
        assert_eq!(safe_redirect(Some("https://evil.example"), "/"), "/");
        assert_eq!(safe_redirect(Some("http://evil.example/x"), "/"), "/");
    }

    #[test]
    fn safe_redirect_rejects_protocol_relative_and_backslash() {
        assert_eq!(safe_redirect(Some("//evil.example"), "/"), "/");
        assert_eq!(safe_redirect(Some("/\\evil.example"), "/"), "/");
    }

    #[test]
    fn safe_redirect_falls_back_when_missing_or_empty() {
        assert_eq!(safe_redirect(None, "/"), "/");
        assert_eq!(safe_redirect(Some(""), "/"), "/");
        assert_eq!(safe_redirect(Some("relative/path"), "/"), "/");
    }

    #[test]
    fn valid_username_accepts_basic_names() {
        assert!(valid_username("alice"));
        assert!(valid_username("Alice.B-42"));
    }

    #[test]
    fn valid_username_rejects_empty_whitespace_and_oversized() {
        assert!(!valid_username(""));
        assert!(!valid_username("has space"));
        assert!(!valid_username(&"a".repeat(65)));
    }

    #[test]
    fn is_unique_violation_matches_sqlstate() {
        let err = sqlx::Error::Database(Box::new(TestDbError::with_code("23505")));
        assert!(is_unique_violation(&err));

        let err = sqlx::Error::Database(Box::new(TestDbError::with_code("99999")));
        assert!(!is_unique_violation(&err));

        let err = sqlx::Error::RowNotFound;
        assert!(!is_unique_violation(&err));
    }
}
