use super::*;

fn test_client(base_url: &str) -> ClicSanteClient {
    let config = AppConfig {
        api_base_url: base_url.to_owned(),
        ..AppConfig::default()
    };
    ClicSanteClient::from_config(&config).expect("client construction should not fail")
}

#[test]
fn build_url_appends_path_to_versioned_base() {
    let client = test_client("https://api3.clicsante.ca/v3/");
    let url = client.build_url("geocode", &[("address", "H2X 1Y6".to_owned())]).unwrap();
    assert_eq!(
        url.as_str(),
        "https://api3.clicsante.ca/v3/geocode?address=H2X+1Y6"
    );
}

#[test]
fn build_url_tolerates_missing_trailing_slash() {
    let client = test_client("https://api3.clicsante.ca/v3");
    let url = client.build_url("establishments/42/services", &[]).unwrap();
    assert_eq!(
        url.as_str(),
        "https://api3.clicsante.ca/v3/establishments/42/services"
    );
}

#[test]
fn build_url_keeps_parameter_order() {
    let client = test_client("http://localhost:8080");
    let url = client
        .build_url(
            "availabilities",
            &[("dateStart", "2024-01-01".to_owned()), ("page", "0".to_owned())],
        )
        .unwrap();
    assert_eq!(
        url.as_str(),
        "http://localhost:8080/availabilities?dateStart=2024-01-01&page=0"
    );
}

#[test]
fn from_config_rejects_invalid_base_url() {
    let config = AppConfig {
        api_base_url: "not a url".to_owned(),
        ..AppConfig::default()
    };
    let err = ClicSanteClient::from_config(&config).unwrap_err();
    assert!(
        matches!(err, ClientError::InvalidBaseUrl { .. }),
        "expected InvalidBaseUrl, got: {err:?}"
    );
}

#[test]
fn from_config_rejects_invalid_header_value() {
    let config = AppConfig {
        api_authorization: "Basic \nabc".to_owned(),
        ..AppConfig::default()
    };
    let err = ClicSanteClient::from_config(&config).unwrap_err();
    assert!(matches!(
        err,
        ClientError::InvalidHeader {
            name: "authorization",
            ..
        }
    ));
}

#[test]
fn booking_base_url_is_trimmed() {
    let config = AppConfig {
        booking_base_url: "https://clients3.clicsante.ca/".to_owned(),
        ..AppConfig::default()
    };
    let client = ClicSanteClient::from_config(&config).unwrap();
    assert_eq!(client.booking_base_url, "https://clients3.clicsante.ca");
}
