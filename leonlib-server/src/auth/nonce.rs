use base64::{Engine, engine::general_purpose::URL_SAFE};
use rand::RngCore;

/// Generates the 32-byte anti-forgery `state` sent with a login redirect,
/// encoded as padded URL-safe base64.
pub fn generate_state_token() -> String {
    let mut token_bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut token_bytes);
    URL_SAFE.encode(token_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_padded_url_safe_and_distinct() {
        let first = generate_state_token();
        let second = generate_state_token();

        assert_ne!(first, second);
        assert_eq!(first.len(), 44);
        assert!(first.ends_with('='));
        assert_eq!(URL_SAFE.decode(&first).unwrap().len(), 32);
        assert!(
            first
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '=')
        );
    }
}
