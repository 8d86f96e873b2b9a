//! Embed token codec.
//!
//! A token is the configuration's JSON text, percent-encoded, then base64
//! encoded with the URL-safe alphabet and no padding. Decoding also accepts
//! the standard padded alphabet produced by browser `btoa`, including tokens
//! whose `+` was turned into a space by query-string parsing.

use base64::{
    Engine as _,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig, general_purpose},
};

use crate::{data::config::Config, error::DecodeError};

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// Encode a configuration as a URL-safe token.
pub fn encode(config: &Config) -> String {
    let json = serde_json::Value::Object(config.as_map().clone()).to_string();
    let escaped = urlencoding::encode(&json);
    general_purpose::URL_SAFE_NO_PAD.encode(escaped.as_bytes())
}

/// Decode a token produced by [`encode`] or by the legacy `btoa` encoder.
pub fn decode(token: &str) -> Result<Config, DecodeError> {
    let token = token.trim().replace(' ', "+");
    let engine = if token.contains(['+', '/']) {
        &STANDARD_LENIENT
    } else {
        &URL_SAFE_LENIENT
    };
    let bytes = engine.decode(token.as_bytes())?;
    let escaped = String::from_utf8(bytes)?;
    let json = urlencoding::decode(&escaped).map_err(|_| DecodeError::Percent)?;
    let value: serde_json::Value = serde_json::from_str(&json)?;
    Config::try_from(value)
}

/// Decode `token`, falling back to `default` on any failure.
pub fn decode_or_default(token: Option<&str>, default: &Config) -> Config {
    match token {
        None => default.clone(),
        Some(token) => decode(token).unwrap_or_else(|e| {
            warn!("invalid embed token, using defaults: {e}");
            default.clone()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::{Map, Number, Value, json};

    fn object(entries: std::collections::BTreeMap<String, Value>) -> Value {
        Value::Object(entries.into_iter().collect::<Map<_, _>>())
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            any::<u64>().prop_map(Value::from),
            any::<f64>().prop_filter_map("not representable", |f| Number::from_f64(f).map(Value::Number)),
            any::<String>().prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 64, 8, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
                prop::collection::btree_map(any::<String>(), inner, 0..8).prop_map(object),
            ]
        })
    }

    fn arb_config() -> impl Strategy<Value = Config> {
        prop::collection::btree_map(any::<String>(), arb_json(), 0..8)
            .prop_map(|entries| Config::from_object(object(entries)))
    }

    proptest! {
        #[test]
        fn prop_token_round_trip(config in arb_config()) {
            prop_assert_eq!(decode(&encode(&config)).unwrap(), config);
        }
    }

    fn sample() -> Config {
        Config::from_object(json!({
            "title": "Hï & <b>\"quotes\"</b> ✨",
            "count": 3,
            "ratio": 0.5,
            "tags": ["a", "b"],
            "lightMode": { "textColor": "#111111" },
            "empty": null
        }))
    }

    #[test]
    fn test_round_trip() {
        let config = sample();
        assert_eq!(decode(&encode(&config)).unwrap(), config);
    }

    #[test]
    fn test_float_round_trip_is_exact() {
        let config = Config::from_object(json!({ "v": 1.0715660391465826e-75, "w": 0.1 + 0.2 }));
        assert_eq!(decode(&encode(&config)).unwrap(), config);
    }

    #[test]
    fn test_token_is_url_safe() {
        let token = encode(&sample());
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_invalid_token() {
        assert!(decode("not-a-valid-token").is_err());
        assert!(matches!(decode("%%%"), Err(DecodeError::Base64(_))));
    }

    #[test]
    fn test_non_object_payload() {
        let token = general_purpose::URL_SAFE_NO_PAD.encode(urlencoding::encode("[1,2]").as_bytes());
        assert!(matches!(decode(&token), Err(DecodeError::NotAnObject)));
    }

    #[test]
    fn test_bad_json_payload() {
        let token = general_purpose::URL_SAFE_NO_PAD.encode(b"%7Bnope");
        assert!(matches!(decode(&token), Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_legacy_btoa_token() {
        // `{"a":"~~~?"}` percent-encoded, standard alphabet with padding.
        let escaped = urlencoding::encode(r#"{"a":"~~~?"}"#).into_owned();
        let legacy = general_purpose::STANDARD.encode(escaped.as_bytes());
        assert!(legacy.contains('+') && legacy.ends_with("=="));
        assert_eq!(
            decode(&legacy).unwrap(),
            Config::from_object(json!({ "a": "~~~?" }))
        );
        let spaced = legacy.replace('+', " ");
        assert_eq!(decode(&spaced).unwrap(), decode(&legacy).unwrap());
    }

    #[test]
    fn test_decode_or_default() {
        let default = Config::from_object(json!({ "x": 1 }));
        assert_eq!(decode_or_default(Some("###"), &default), default);
        assert_eq!(decode_or_default(None, &default), default);
    }
}
