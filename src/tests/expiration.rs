#[cfg(test)]
mod test {

    use crate::cache::token_state::TokenState;
    use crate::utils::constants::REFRESH_TOKEN_GRACE_SECS;

    fn state(
        expiration: Option<u64>,
        expires_in: Option<u64>,
        refresh_token: Option<&str>,
    ) -> TokenState {
        TokenState {
            access_token: "secret-access".to_string(),
            refresh_token: refresh_token.map(str::to_owned),
            expiration,
            expires_in,
        }
    }

    #[test]
    fn access_token_is_trusted_until_80_percent_of_its_lifetime() {
        let state = state(Some(100_000), Some(3_600), Some("r"));

        // the refresh threshold sits 20% of the ttl before expiration
        let threshold = 100_000 - 720;
        assert!(!state.is_access_token_expired(threshold - 1));
        assert!(!state.is_access_token_expired(threshold));
        assert!(state.is_access_token_expired(threshold + 1));
    }

    #[test]
    fn access_token_missing_lifetime_fields_is_never_trusted() {
        assert!(state(None, Some(3_600), Some("r")).is_access_token_expired(0));
        assert!(state(Some(100_000), None, Some("r")).is_access_token_expired(0));
        assert!(state(None, None, Some("r")).is_access_token_expired(0));
    }

    #[test]
    fn refresh_token_survives_expiry_up_to_the_grace_window() {
        let state = state(Some(100_000), Some(3_600), Some("r"));

        let cutoff = 100_000 + REFRESH_TOKEN_GRACE_SECS;
        assert!(!state.is_refresh_token_expired(cutoff - 1));
        assert!(!state.is_refresh_token_expired(cutoff));
        assert!(state.is_refresh_token_expired(cutoff + 1));
    }

    #[test]
    fn refresh_token_missing_or_without_recorded_expiry_is_expired() {
        assert!(state(Some(100_000), Some(3_600), None).is_refresh_token_expired(0));
        assert!(state(None, Some(3_600), Some("r")).is_refresh_token_expired(0));
    }

    #[test]
    fn debug_output_redacts_token_material() {
        let dump = format!("{:?}", state(Some(1), Some(1), Some("secret-refresh")));
        assert!(!dump.contains("secret-access"));
        assert!(!dump.contains("secret-refresh"));
        assert!(dump.contains("[redacted]"));
    }
}
