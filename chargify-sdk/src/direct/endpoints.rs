//! Form actions for Chargify Direct.
//!
//! Both actions are derived from the configured v2 base URL with
//! surrounding slashes trimmed.

use std::fmt::Display;

/// Signup form action: `{base_url}/signups`.
pub fn signup_action(base_url: &str) -> String {
    format!("{}/signups", base_url.trim_matches('/'))
}

/// Card update form action: `{base_url}/subscriptions/{id}/card_update`.
pub fn card_update_action(base_url: &str, subscription_id: impl Display) -> String {
    format!(
        "{}/subscriptions/{}/card_update",
        base_url.trim_matches('/'),
        subscription_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_action() {
        assert_eq!(
            signup_action("https://api.chargify.com/api/v2/"),
            "https://api.chargify.com/api/v2/signups"
        );
        assert_eq!(
            signup_action("https://api.chargify.com/api/v2"),
            "https://api.chargify.com/api/v2/signups"
        );
    }

    #[test]
    fn test_card_update_action() {
        assert_eq!(
            card_update_action("https://api.chargify.com/api/v2//", 1234),
            "https://api.chargify.com/api/v2/subscriptions/1234/card_update"
        );
        assert_eq!(
            card_update_action("https://api.chargify.com/api/v2/", "1234"),
            "https://api.chargify.com/api/v2/subscriptions/1234/card_update"
        );
    }
}
