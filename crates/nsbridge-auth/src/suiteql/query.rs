//! SuiteQL statement construction.
//!
//! The SuiteQL REST endpoint has no bound parameters, so user input is
//! embedded in a single-quoted string literal. [`escape_literal`] is the only
//! place that input crosses into query text.

use serde::Serialize;

/// Escapes `value` for embedding inside a single-quoted SuiteQL literal.
///
/// Every `'` is doubled, so the literal cannot be terminated early.
#[must_use]
pub fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Builds the query selecting active contacts whose email matches `email`,
/// case-insensitively.
#[must_use]
pub fn contact_by_email_query(email: &str) -> String {
    format!(
        "SELECT id, email FROM contact WHERE UPPER(email) = UPPER('{}') AND isinactive = 'F'",
        escape_literal(email)
    )
}

/// JSON body of a SuiteQL request.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteQlRequest {
    /// The SuiteQL statement.
    pub q: String,
}

impl SuiteQlRequest {
    /// Creates the contact-by-email request.
    #[must_use]
    pub fn contact_by_email(email: &str) -> Self {
        Self {
            q: contact_by_email_query(email),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const PREFIX: &str = "SELECT id, email FROM contact WHERE UPPER(email) = UPPER('";
    const SUFFIX: &str = "') AND isinactive = 'F'";

    fn embedded_literal(query: &str) -> &str {
        &query[PREFIX.len()..query.len() - SUFFIX.len()]
    }

    #[test]
    fn test_plain_email_unchanged() {
        assert_eq!(escape_literal("jane.doe@example.com"), "jane.doe@example.com");
        assert_eq!(
            contact_by_email_query("jane.doe@example.com"),
            "SELECT id, email FROM contact WHERE UPPER(email) = UPPER('jane.doe@example.com') AND isinactive = 'F'"
        );
    }

    #[test]
    fn test_quotes_are_doubled() {
        assert_eq!(escape_literal("o'brien@example.com"), "o''brien@example.com");
        assert_eq!(escape_literal("''"), "''''");
        assert_eq!(escape_literal(""), "");
    }

    #[test]
    fn test_injection_attempt_stays_inside_literal() {
        let hostile = "x') OR 1=1 --";
        let query = contact_by_email_query(hostile);
        assert_eq!(
            query,
            "SELECT id, email FROM contact WHERE UPPER(email) = UPPER('x'') OR 1=1 --') AND isinactive = 'F'"
        );
        assert_eq!(embedded_literal(&query).replace("''", "'"), hostile);
    }

    #[test]
    fn test_request_serialization() {
        let body = serde_json::to_value(SuiteQlRequest::contact_by_email("a@b.com")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"q": contact_by_email_query("a@b.com")})
        );
    }

    proptest! {
        #[test]
        fn prop_literal_never_closes_early(input in ".*") {
            let query = contact_by_email_query(&input);
            prop_assert!(query.starts_with(PREFIX));
            prop_assert!(query.ends_with(SUFFIX));

            let literal = embedded_literal(&query);
            // After removing escaped pairs no lone quote may remain.
            prop_assert!(!literal.replace("''", "").contains('\''));
            prop_assert_eq!(literal.replace("''", "'"), input.clone());
            prop_assert_eq!(
                literal.matches('\'').count(),
                2 * input.matches('\'').count()
            );
        }

        #[test]
        fn prop_quote_heavy_inputs(input in "[a-z@.' ]{0,40}") {
            let escaped = escape_literal(&input);
            prop_assert_eq!(escaped.len(), input.len() + input.matches('\'').count());
            prop_assert!(!escaped.replace("''", "").contains('\''));
        }
    }
}
