/// Integration tests for HTTP attachment pricing against a mock price API
use gun_iq::auth::UnconfiguredIdentityProvider;
use gun_iq::catalog::Catalog;
use gun_iq::config::PricingConfig;
use gun_iq::error::PriceFetchError;
use gun_iq::feedback::SilentFeedback;
use gun_iq::models::{Attachment, Firearm, Price};
use gun_iq::pricing::{HttpPriceSource, PriceAggregator, PriceEntry, PriceSource, PriceStatus};
use gun_iq::session::Session;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn attachment(name: &str, category: &str, url: String) -> Attachment {
    Attachment {
        name: name.to_string(),
        category: category.to_string(),
        price_url: url,
        image: String::new(),
    }
}

/// Glock 19 Gen5 with its two attachments priced by `server`
fn glock_on(server: &MockServer) -> Firearm {
    Firearm {
        name: "Glock 19 Gen5".to_string(),
        image: "/guns/glock19.jpg".to_string(),
        caliber: "9mm".to_string(),
        base_price: Price::from_dollars(539.99).unwrap(),
        attachments: vec![
            attachment("Trijicon RMR", "Optic", format!("{}/rmr", server.uri())),
            attachment("Streamlight TLR-1", "Light", format!("{}/tlr1", server.uri())),
        ],
    }
}

async fn mount_price(server: &MockServer, route: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(template)
        .mount(server)
        .await;
}

fn source() -> HttpPriceSource {
    HttpPriceSource::new(&PricingConfig::default()).unwrap()
}

#[tokio::test]
async fn test_fetch_price_success() {
    let server = MockServer::start().await;
    mount_price(
        &server,
        "/rmr",
        ResponseTemplate::new(200).set_body_json(json!({ "price": 150.00, "vendor": "mockmods" })),
    )
    .await;

    let rmr = attachment("Trijicon RMR", "Optic", format!("{}/rmr", server.uri()));
    let price = source().fetch_price(&rmr).await.unwrap();
    assert_eq!(price, Price::from_cents(15000));
}

#[tokio::test]
async fn test_fetch_price_non_success_status() {
    let server = MockServer::start().await;
    mount_price(&server, "/tlr1", ResponseTemplate::new(503)).await;

    let tlr = attachment("Streamlight TLR-1", "Light", format!("{}/tlr1", server.uri()));
    let result = source().fetch_price(&tlr).await;
    assert!(matches!(result, Err(PriceFetchError::Status(status)) if status.as_u16() == 503));
}

#[tokio::test]
async fn test_fetch_price_malformed_body() {
    let server = MockServer::start().await;
    mount_price(
        &server,
        "/laser",
        ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"),
    )
    .await;
    mount_price(
        &server,
        "/507k",
        ResponseTemplate::new(200).set_body_json(json!({ "price": "three hundred" })),
    )
    .await;

    let laser = attachment("Crimson Trace Laser", "Laser", format!("{}/laser", server.uri()));
    assert!(matches!(
        source().fetch_price(&laser).await,
        Err(PriceFetchError::Malformed(_))
    ));

    let holosun = attachment("Holosun 507K", "Optic", format!("{}/507k", server.uri()));
    assert!(matches!(
        source().fetch_price(&holosun).await,
        Err(PriceFetchError::Malformed(_))
    ));
}

#[tokio::test]
async fn test_fetch_price_rejects_negative() {
    let server = MockServer::start().await;
    mount_price(
        &server,
        "/rmr",
        ResponseTemplate::new(200).set_body_json(json!({ "price": -5 })),
    )
    .await;

    let rmr = attachment("Trijicon RMR", "Optic", format!("{}/rmr", server.uri()));
    assert!(matches!(
        source().fetch_price(&rmr).await,
        Err(PriceFetchError::InvalidPrice(_))
    ));
}

#[tokio::test]
async fn test_fetch_price_timeout() {
    let server = MockServer::start().await;
    mount_price(
        &server,
        "/rmr",
        ResponseTemplate::new(200)
            .set_delay(Duration::from_secs(3))
            .set_body_json(json!({ "price": 150 })),
    )
    .await;

    let config = PricingConfig {
        timeout_seconds: 1,
        ..PricingConfig::default()
    };
    let source = HttpPriceSource::new(&config).unwrap();
    let rmr = attachment("Trijicon RMR", "Optic", format!("{}/rmr", server.uri()));

    assert!(matches!(
        source.fetch_price(&rmr).await,
        Err(PriceFetchError::Transport(e)) if e.is_timeout()
    ));
}

#[tokio::test]
async fn test_one_failure_does_not_affect_other_attachment() {
    let server = MockServer::start().await;
    mount_price(&server, "/tlr1", ResponseTemplate::new(500)).await;
    mount_price(
        &server,
        "/rmr",
        ResponseTemplate::new(200).set_body_json(json!({ "price": 150.00 })),
    )
    .await;

    let glock = glock_on(&server);
    for aggregator in [
        PriceAggregator::sequential(Arc::new(source())),
        PriceAggregator::concurrent(Arc::new(source()), 4),
    ] {
        let cache = aggregator.fetch_all(&glock.attachments).await;
        assert_eq!(
            cache.get("Trijicon RMR"),
            Some(PriceEntry::Available(Price::from_cents(15000)))
        );
        assert_eq!(cache.get("Streamlight TLR-1"), Some(PriceEntry::Unavailable));
    }
}

#[tokio::test]
async fn test_glock_loadout_total_end_to_end() {
    let server = MockServer::start().await;
    mount_price(
        &server,
        "/rmr",
        ResponseTemplate::new(200).set_body_json(json!({ "price": 150.00 })),
    )
    .await;
    mount_price(&server, "/tlr1", ResponseTemplate::new(404)).await;

    let catalog = Catalog::new(vec![glock_on(&server)]).unwrap();
    let session = Session::new(
        Arc::new(catalog),
        PriceAggregator::sequential(Arc::new(source())),
        Arc::new(UnconfiguredIdentityProvider),
        Arc::new(SilentFeedback),
    );

    let snapshot = session.select_firearm("Glock 19 Gen5").await.unwrap();
    assert_eq!(snapshot.total, Price::from_cents(53999));
    assert_eq!(
        snapshot.attachments[0].status,
        PriceStatus::Available(Price::from_cents(15000))
    );
    assert_eq!(snapshot.attachments[1].status, PriceStatus::Unavailable);

    // Only the RMR selected
    session.toggle_attachment("Trijicon RMR").await.unwrap();
    assert_eq!(session.total_price().await, Price::from_cents(68999));

    // Both selected: the unavailable light adds nothing
    session.toggle_attachment("Streamlight TLR-1").await.unwrap();
    let total = session.total_price().await;
    assert_eq!(total, Price::from_cents(68999));
    assert_eq!(total.to_string(), "$689.99");
}
