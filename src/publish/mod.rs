mod html;

pub use html::render_document;

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use uuid::Uuid;

/// Mint a short public token for a freshly published form.
pub fn mint_publish_id() -> String {
    let raw = Uuid::new_v4().simple().to_string();
    raw[..10].to_string()
}

/// Shareable URL for a published form: base, token, then a slug of the name.
pub fn share_url(base_url: &str, publish_id: &str, form_name: &str) -> String {
    let slug = utf8_percent_encode(form_name, NON_ALPHANUMERIC).to_string();
    format!("{}/f/{publish_id}/{slug}", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_urls_encode_the_name_slug() {
        let url = share_url("https://forms.local/", "abc123", "Café order #2");
        assert_eq!(
            url,
            "https://forms.local/f/abc123/Caf%C3%A9%20order%20%232"
        );
    }

    #[test]
    fn publish_ids_are_short_and_unique_enough() {
        let a = mint_publish_id();
        let b = mint_publish_id();
        assert_eq!(a.len(), 10);
        assert_ne!(a, b);
    }
}
