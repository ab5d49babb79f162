//! Request signatures for API key authentication.

use base64::engine::general_purpose::STANDARD as BASE64_ENGINE;
use base64::engine::Engine as _;
use openssl::hash::MessageDigest;
use openssl::pkey::PKey;
use openssl::sign::Signer;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::api::ParameterMap;
use crate::constants::PARAM_API_KEY;
use crate::error::Error;


//------------ Constants -----------------------------------------------------

/// Everything but the RFC 3986 unreserved characters gets escaped.
///
/// Note that this includes `/`, which many URL encoders leave alone.
const SIGNATURE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');


//------------ SignatureBuilder ----------------------------------------------

/// Computes the HMAC-SHA1 signature CloudStack expects with every request
/// made on behalf of an API key.
#[derive(Clone, Debug)]
pub struct SignatureBuilder {
    api_key: String,
    secret_key: String,
}

impl SignatureBuilder {
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        SignatureBuilder {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Returns the base64 encoded signature over `params`.
    ///
    /// If `params` has no `apikey` entry, in any capitalisation, the API
    /// key is added to it first. The map is not changed otherwise.
    ///
    /// The signature is not URL encoded.
    pub fn build(&self, params: &mut ParameterMap) -> Result<String, Error> {
        if !params.keys().any(|k| k.eq_ignore_ascii_case(PARAM_API_KEY)) {
            params.insert(PARAM_API_KEY.to_string(), self.api_key.clone());
        }

        let query = canonical_query(params);

        let key = PKey::hmac(self.secret_key.as_bytes())?;
        let mut signer = Signer::new(MessageDigest::sha1(), &key)?;
        signer.update(query.as_bytes())?;
        let digest = signer.sign_to_vec()?;

        Ok(BASE64_ENGINE.encode(digest))
    }
}

/// Returns the string that gets signed: the percent-encoded pairs, lower
/// cased as a whole, sorted and joined by `&`.
fn canonical_query(params: &ParameterMap) -> String {
    let mut pairs: Vec<String> = params
        .iter()
        .map(|(key, value)| {
            format!("{}={}", key, utf8_percent_encode(value, SIGNATURE_ENCODE_SET))
                .to_lowercase()
        })
        .collect();
    pairs.sort();
    pairs.join("&")
}


//------------ Tests ---------------------------------------------------------
