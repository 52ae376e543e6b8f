use axum::http::HeaderMap;

/// Checks that a webhook delivery really comes from Meta.
///
/// Called with the raw request body before it is parsed.
pub trait SignatureVerifier: Send + Sync {
    fn verify(&self, headers: &HeaderMap, body: &[u8]) -> bool;
}

/// Accepts every delivery. Used until an app-secret verifier is installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAll;

impl SignatureVerifier for AcceptAll {
    fn verify(&self, _headers: &HeaderMap, _body: &[u8]) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_all_accepts_unsigned() {
        assert!(AcceptAll.verify(&HeaderMap::new(), b"{}"));
    }
}
