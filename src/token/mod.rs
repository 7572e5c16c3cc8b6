mod builder;
mod codec;

pub use builder::{
    DEFAULT_EXPIRES_IN, TokenOptions, create_token, create_token_at, sample_payload, sign,
    sign_at,
};
pub use codec::{Token, encode, get_algorithm, is_valid_format};
