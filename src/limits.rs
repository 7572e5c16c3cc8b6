//! Size limit constants for input validation

/// Maximum length for a compact token string (64KB)
pub(crate) const MAX_TOKEN_LENGTH: usize = 64 * 1024;

/// Maximum size for decoded header JSON (8KB)
pub(crate) const MAX_DECODED_HEADER_SIZE: usize = 8 * 1024;

/// Maximum size for decoded payload JSON (64KB)
pub(crate) const MAX_DECODED_PAYLOAD_SIZE: usize = 64 * 1024;

/// Maximum size for decoded signature bytes (1KB)
/// RSA-8192 signatures are 1024 bytes
pub(crate) const MAX_DECODED_SIGNATURE_SIZE: usize = 1024;

/// Maximum size for a fetched key set document (512KB)
pub(crate) const MAX_JWKS_RESPONSE_SIZE: usize = 512 * 1024;

/// Maximum decoded size of a JWK `n` member (8192 bytes)
pub(crate) const MAX_JWK_N_SIZE: usize = 8 * 1024;

/// Maximum decoded size of a JWK `e` member
pub(crate) const MAX_JWK_E_SIZE: usize = 48;

/// Maximum decoded size of a JWK `x` or `y` coordinate (P-521 is 66 bytes)
pub(crate) const MAX_JWK_COORDINATE_SIZE: usize = 66;

/// Maximum size of PEM text accepted as key material (64KB)
pub(crate) const MAX_PEM_SIZE: usize = 64 * 1024;
