use crate::domain::{DeviceIdentity, MalformedHash, MalformedIdentity, SketchHash, UpdateRequest};
use axum::http::header::HeaderName;
use axum::http::{header, HeaderMap};
use thiserror::Error;

pub const ESP_STATION_MAC: HeaderName = HeaderName::from_static("x-esp8266-sta-mac");
pub const ESP_CHIP_SIZE: HeaderName = HeaderName::from_static("x-esp8266-chip-size");
pub const ESP_FREE_SPACE: HeaderName = HeaderName::from_static("x-esp8266-free-space");
pub const ESP_SKETCH_SIZE: HeaderName = HeaderName::from_static("x-esp8266-sketch-size");
pub const ESP_SKETCH_MD5: HeaderName = HeaderName::from_static("x-esp8266-sketch-md5");
pub const ESP_SDK_VERSION: HeaderName = HeaderName::from_static("x-esp8266-sdk-version");
pub const ESP_UPDATE_MODE: HeaderName = HeaderName::from_static("x-esp8266-mode");
pub const ESP_UPDATE_VERSION: HeaderName = HeaderName::from_static("x-esp8266-version");

const REQUIRED_HEADERS: [HeaderName; 8] = [
    ESP_STATION_MAC,
    ESP_CHIP_SIZE,
    ESP_FREE_SPACE,
    ESP_SKETCH_SIZE,
    ESP_SKETCH_MD5,
    ESP_SDK_VERSION,
    ESP_UPDATE_MODE,
    ESP_UPDATE_VERSION,
];

/// Validates the headers of an update negotiation request in a fixed order: user agent
/// first, then presence of every required header, then field content. A header that is
/// missing is therefore always reported as an access problem, never as a malformed value.
pub fn validate(headers: &HeaderMap, expected_user_agent: &str) -> Result<UpdateRequest, ValidationError> {
    check_user_agent(headers, expected_user_agent)?;
    for name in REQUIRED_HEADERS {
        if !headers.contains_key(&name) {
            return Err(ValidationError::MissingHeader(name));
        }
    }

    let identity = DeviceIdentity::parse(header_str(headers, &ESP_STATION_MAC))?;
    let sketch_version = parse_sketch_version(headers)?;
    let sketch_hash = SketchHash::parse(header_str(headers, &ESP_SKETCH_MD5))?;

    Ok(UpdateRequest {
        identity,
        sketch_version,
        sketch_hash,
        chip_size: header_str(headers, &ESP_CHIP_SIZE).to_string(),
        free_space: header_str(headers, &ESP_FREE_SPACE).to_string(),
        sketch_size: header_str(headers, &ESP_SKETCH_SIZE).to_string(),
        sdk_version: header_str(headers, &ESP_SDK_VERSION).to_string(),
    })
}

fn check_user_agent(headers: &HeaderMap, expected_user_agent: &str) -> Result<(), ValidationError> {
    let token = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .split_whitespace()
        .next()
        .unwrap_or("");

    if token.eq_ignore_ascii_case(expected_user_agent) {
        Ok(())
    } else {
        Err(ValidationError::WrongUserAgent)
    }
}

fn parse_sketch_version(headers: &HeaderMap) -> Result<u32, ValidationError> {
    if !header_str(headers, &ESP_UPDATE_MODE).eq_ignore_ascii_case("sketch") {
        return Err(ValidationError::MalformedVersion);
    }

    let version = header_str(headers, &ESP_UPDATE_VERSION);
    if version.is_empty() || !version.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::MalformedVersion);
    }

    version.parse().map_err(|_| ValidationError::MalformedVersion)
}

// Presence has been checked beforehand; a value with non-ASCII bytes ends up as an empty
// string and fails the content check of its field.
fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> &'a str {
    headers.get(name).and_then(|value| value.to_str().ok()).unwrap_or("")
}

#[derive(Error, Clone, PartialEq, Eq, Debug)]
pub enum ValidationError {
    #[error("Access denied (User-Agent)")]
    WrongUserAgent,
    #[error("Access denied (Header)")]
    MissingHeader(HeaderName),
    #[error(transparent)]
    MalformedIdentity(#[from] MalformedIdentity),
    #[error("Header: sketch version")]
    MalformedVersion,
    #[error(transparent)]
    MalformedHash(#[from] MalformedHash),
}

impl ValidationError {
    pub fn is_access_denied(&self) -> bool {
        matches!(self, ValidationError::WrongUserAgent | ValidationError::MissingHeader(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const USER_AGENT: &str = "ESP8266-HTTP-UPDATE";

    fn test_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, USER_AGENT.parse().unwrap());
        headers.insert(ESP_STATION_MAC, "12:34:56:78:AB:CD".parse().unwrap());
        headers.insert(ESP_CHIP_SIZE, "4194304".parse().unwrap());
        headers.insert(ESP_FREE_SPACE, "2818048".parse().unwrap());
        headers.insert(ESP_SKETCH_SIZE, "301408".parse().unwrap());
        headers.insert(ESP_SKETCH_MD5, "11111111111111111111111111111111".parse().unwrap());
        headers.insert(ESP_SDK_VERSION, "2.2.1".parse().unwrap());
        headers.insert(ESP_UPDATE_MODE, "sketch".parse().unwrap());
        headers.insert(ESP_UPDATE_VERSION, "1".parse().unwrap());
        headers
    }

    #[test]
    fn validate_builds_a_typed_request_from_the_headers() -> Result<(), ValidationError> {
        let request = validate(&test_headers(), USER_AGENT)?;

        assert_eq!(
            request,
            UpdateRequest {
                identity: DeviceIdentity::parse("12345678ABCD").unwrap(),
                sketch_version: 1,
                sketch_hash: SketchHash::parse("11111111111111111111111111111111").unwrap(),
                chip_size: "4194304".to_string(),
                free_space: "2818048".to_string(),
                sketch_size: "301408".to_string(),
                sdk_version: "2.2.1".to_string(),
            }
        );
        Ok(())
    }

    #[rstest]
    #[case::first_token_only("ESP8266-HTTP-UPDATE (ESP8266HTTPUpdate)")]
    #[case::case_insensitive("esp8266-http-update")]
    fn check_user_agent_matches_the_first_token_case_insensitively(#[case] user_agent: &str) {
        let mut headers = test_headers();
        headers.insert(header::USER_AGENT, user_agent.parse().unwrap());

        assert!(validate(&headers, USER_AGENT).is_ok());
    }

    #[test]
    fn validate_rejects_a_missing_user_agent() {
        let mut headers = test_headers();
        headers.remove(header::USER_AGENT);

        assert_eq!(validate(&headers, USER_AGENT), Err(ValidationError::WrongUserAgent));
    }

    #[test]
    fn validate_rejects_a_wrong_user_agent() {
        let mut headers = test_headers();
        headers.insert(header::USER_AGENT, "UA".parse().unwrap());

        assert_eq!(validate(&headers, USER_AGENT), Err(ValidationError::WrongUserAgent));
    }

    #[rstest]
    #[case(ESP_STATION_MAC)]
    #[case(ESP_CHIP_SIZE)]
    #[case(ESP_FREE_SPACE)]
    #[case(ESP_SKETCH_SIZE)]
    #[case(ESP_SKETCH_MD5)]
    #[case(ESP_SDK_VERSION)]
    #[case(ESP_UPDATE_MODE)]
    #[case(ESP_UPDATE_VERSION)]
    fn validate_rejects_any_missing_required_header(#[case] name: HeaderName) {
        let mut headers = test_headers();
        headers.remove(&name);

        assert_eq!(validate(&headers, USER_AGENT), Err(ValidationError::MissingHeader(name)));
    }

    #[test]
    fn the_user_agent_check_precedes_the_presence_checks() {
        let mut headers = test_headers();
        headers.insert(header::USER_AGENT, "UA".parse().unwrap());
        headers.remove(ESP_STATION_MAC);

        assert_eq!(validate(&headers, USER_AGENT), Err(ValidationError::WrongUserAgent));
    }

    #[test]
    fn the_presence_checks_precede_the_content_checks() {
        let mut headers = test_headers();
        headers.insert(ESP_STATION_MAC, "not a mac".parse().unwrap());
        headers.remove(ESP_UPDATE_VERSION);

        assert_eq!(validate(&headers, USER_AGENT), Err(ValidationError::MissingHeader(ESP_UPDATE_VERSION)));
    }

    #[test]
    fn validate_rejects_a_malformed_station_mac() {
        let mut headers = test_headers();
        headers.insert(ESP_STATION_MAC, "12:34:56:78:AB".parse().unwrap());

        assert_eq!(validate(&headers, USER_AGENT), Err(ValidationError::MalformedIdentity(MalformedIdentity)));
    }

    #[rstest]
    #[case::wrong_mode(ESP_UPDATE_MODE, "spiffs")]
    #[case::empty_version(ESP_UPDATE_VERSION, "")]
    #[case::non_digit_version(ESP_UPDATE_VERSION, "1a")]
    #[case::negative_version(ESP_UPDATE_VERSION, "-1")]
    fn validate_rejects_a_malformed_mode_or_version(#[case] name: HeaderName, #[case] value: &str) {
        let mut headers = test_headers();
        headers.insert(name, value.parse().unwrap());

        assert_eq!(validate(&headers, USER_AGENT), Err(ValidationError::MalformedVersion));
    }

    #[test]
    fn validate_rejects_a_malformed_sketch_md5() {
        let mut headers = test_headers();
        headers.insert(ESP_SKETCH_MD5, "123abc".parse().unwrap());

        assert_eq!(validate(&headers, USER_AGENT), Err(ValidationError::MalformedHash(MalformedHash)));
    }

    #[rstest]
    #[case::wrong_user_agent(ValidationError::WrongUserAgent, true)]
    #[case::missing_header(ValidationError::MissingHeader(ESP_STATION_MAC), true)]
    #[case::malformed_identity(ValidationError::MalformedIdentity(MalformedIdentity), false)]
    #[case::malformed_version(ValidationError::MalformedVersion, false)]
    #[case::malformed_hash(ValidationError::MalformedHash(MalformedHash), false)]
    fn only_user_agent_and_presence_failures_deny_access(#[case] error: ValidationError, #[case] expected: bool) {
        assert_eq!(error.is_access_denied(), expected);
    }
}
