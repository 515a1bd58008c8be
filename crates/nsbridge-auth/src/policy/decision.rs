//! Mapping SuiteQL results to lookup and login decisions.

use super::outcome::IdentityProfile;
use crate::suiteql::SuiteQlResponse;

/// What a login attempt should do after the contact query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginDecision {
    /// No contact matched. Reject without any side effect.
    Reject,
    /// A contact matched. Send a reset email, then reject.
    ResetRequired,
}

/// Builds the lookup profile from the first row.
///
/// Returns `None` when there are no rows, or when the first row lacks an id or
/// an email even after falling back to `email`.
#[must_use]
pub fn lookup_profile(response: &SuiteQlResponse, email: &str) -> Option<IdentityProfile> {
    let row = response.first_row()?;
    let user_id = row.id()?;
    let email = row.email().or_else(|| Some(email).filter(|e| !e.is_empty()))?;

    Some(IdentityProfile {
        user_id: user_id.to_string(),
        email: email.to_string(),
    })
}

/// Decides the login path from the match count.
#[must_use]
pub fn login_decision(response: &SuiteQlResponse) -> LoginDecision {
    if response.match_count() == 0 {
        LoginDecision::Reject
    } else {
        LoginDecision::ResetRequired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> SuiteQlResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_no_rows_is_no_profile() {
        assert_eq!(lookup_profile(&response(json!({"items": []})), "a@b.com"), None);
    }

    #[test]
    fn test_row_becomes_profile() {
        let profile =
            lookup_profile(&response(json!({"items": [{"id": "123", "email": "a@b.com"}]})), "A@B.COM")
                .unwrap();
        assert_eq!(profile.user_id, "123");
        assert_eq!(profile.email, "a@b.com");
    }

    #[test]
    fn test_missing_email_falls_back_to_input() {
        let profile =
            lookup_profile(&response(json!({"items": [{"id": "9"}]})), "input@x.io").unwrap();
        assert_eq!(profile.email, "input@x.io");
    }

    #[test]
    fn test_missing_id_fails_closed() {
        assert_eq!(
            lookup_profile(&response(json!({"items": [{"email": "a@b.com"}]})), "a@b.com"),
            None
        );
    }

    #[test]
    fn test_missing_email_and_empty_input_fails_closed() {
        assert_eq!(lookup_profile(&response(json!({"items": [{"id": "9"}]})), ""), None);
    }

    #[test]
    fn test_first_row_wins() {
        let profile = lookup_profile(
            &response(json!({"items": [
                {"id": "1", "email": "first@x.io"},
                {"id": "2", "email": "second@x.io"}
            ]})),
            "x",
        )
        .unwrap();
        assert_eq!(profile.user_id, "1");
    }

    #[test]
    fn test_login_decision() {
        assert_eq!(login_decision(&response(json!({"items": []}))), LoginDecision::Reject);
        assert_eq!(login_decision(&response(json!({"count": 0, "items": []}))), LoginDecision::Reject);
        assert_eq!(
            login_decision(&response(json!({"count": 2, "items": [{"id": "1"}, {"id": "2"}]}))),
            LoginDecision::ResetRequired
        );
        assert_eq!(
            login_decision(&response(json!({"items": [{"id": "1"}]}))),
            LoginDecision::ResetRequired
        );
    }
}
