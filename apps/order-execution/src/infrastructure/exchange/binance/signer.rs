//! HMAC-SHA256 request signing.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::error::BinanceError;

type HmacSha256 = Hmac<Sha256>;

/// Signs encoded parameter strings with the API secret.
#[derive(Clone)]
pub struct HmacSigner {
    api_secret: String,
}

impl HmacSigner {
    /// Create a signer for the given secret.
    #[must_use]
    pub fn new(api_secret: impl Into<String>) -> Self {
        Self {
            api_secret: api_secret.into(),
        }
    }

    /// Hex-encoded HMAC-SHA256 of `payload`.
    ///
    /// # Errors
    ///
    /// Returns `Signing` if the key is rejected by the MAC.
    pub fn sign(&self, payload: &str) -> Result<String, BinanceError> {
        let mut mac = HmacSha256::new_from_slice(self.api_secret.as_bytes())
            .map_err(|e| BinanceError::Signing(e.to_string()))?;
        mac.update(payload.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

impl std::fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacSigner").finish_non_exhaustive()
    }
}
