use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;

/// Entropy carried by a refresh token, in bytes.
const TOKEN_BYTES: usize = 32;

/// Generate an opaque refresh token.
///
/// 256 bits from the operating system RNG, URL-safe base64 without padding.
/// The result has no internal structure: external layers must treat it as
/// an uninterpreted credential, and its validity is decided entirely by the
/// server-side record it is stored with.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
