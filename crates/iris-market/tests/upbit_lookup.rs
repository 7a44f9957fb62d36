//! 업비트 두 단계 시세 조회의 HTTP 호출 횟수 검증.

use iris_market::{MarketError, QuoteSource, UpbitClient};
use mockito::{Matcher, Server};
use reqwest::Client;
use rust_decimal_macros::dec;

const DIRECTORY: &str = r#"[
    {"market":"KRW-BTC","korean_name":"비트코인","english_name":"Bitcoin"},
    {"market":"KRW-ETH","korean_name":"이더리움","english_name":"Ethereum"}
]"#;

const NOT_FOUND: &str = r#"{"error":{"name":404,"message":"Code not found"}}"#;

fn markets(value: &str) -> Matcher {
    Matcher::UrlEncoded("markets".into(), value.into())
}

#[tokio::test]
async fn direct_code_uses_exactly_one_request() {
    let mut server = Server::new_async().await;
    let ticker = server
        .mock("GET", "/v1/ticker")
        .match_query(markets("KRW-BTC"))
        .with_status(200)
        .with_body(r#"[{"market":"KRW-BTC","trade_price":95000000.0,"signed_change_rate":0.0123}]"#)
        .expect(1)
        .create_async()
        .await;
    let directory = server
        .mock("GET", "/v1/market/all")
        .expect(0)
        .create_async()
        .await;

    let client = UpbitClient::with_client(Client::new(), &server.url());
    let quote = client.quote("btc").await.unwrap();

    assert_eq!(quote.symbol, "BTC");
    assert_eq!(quote.price, dec!(95000000));
    assert_eq!(quote.change_rate_percent, dec!(1.23));
    ticker.assert_async().await;
    directory.assert_async().await;
}

#[tokio::test]
async fn korean_name_falls_back_to_directory() {
    let mut server = Server::new_async().await;
    let direct = server
        .mock("GET", "/v1/ticker")
        .match_query(markets("KRW-이더리움"))
        .with_status(404)
        .with_body(NOT_FOUND)
        .expect(1)
        .create_async()
        .await;
    let directory = server
        .mock("GET", "/v1/market/all")
        .with_status(200)
        .with_body(DIRECTORY)
        .expect(1)
        .create_async()
        .await;
    let resolved = server
        .mock("GET", "/v1/ticker")
        .match_query(markets("KRW-ETH"))
        .with_status(200)
        .with_body(r#"[{"market":"KRW-ETH","trade_price":4500000.0,"signed_change_rate":-0.02}]"#)
        .expect(1)
        .create_async()
        .await;

    let client = UpbitClient::with_client(Client::new(), &server.url());
    let quote = client.quote("이더리움").await.unwrap();

    assert_eq!(quote.symbol, "ETH");
    assert_eq!(quote.price, dec!(4500000));
    assert_eq!(quote.change_rate_percent, dec!(-2));
    direct.assert_async().await;
    directory.assert_async().await;
    resolved.assert_async().await;
}

#[tokio::test]
async fn unmatched_query_is_symbol_not_found() {
    let mut server = Server::new_async().await;
    let _direct = server
        .mock("GET", "/v1/ticker")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(NOT_FOUND)
        .create_async()
        .await;
    let _directory = server
        .mock("GET", "/v1/market/all")
        .with_status(200)
        .with_body(DIRECTORY)
        .create_async()
        .await;

    let client = UpbitClient::with_client(Client::new(), &server.url());
    let err = client.quote("없는코인").await.unwrap_err();

    assert!(matches!(err, MarketError::SymbolNotFound(q) if q == "없는코인"));
}

#[tokio::test]
async fn error_body_with_success_status_is_failure() {
    let mut server = Server::new_async().await;
    let _direct = server
        .mock("GET", "/v1/ticker")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(NOT_FOUND)
        .create_async()
        .await;

    let client = UpbitClient::with_client(Client::new(), &server.url());
    assert!(client.quote_direct("NOPE").await.is_err());
}

#[tokio::test]
async fn batched_quotes_use_one_request() {
    let mut server = Server::new_async().await;
    let batch = server
        .mock("GET", "/v1/ticker")
        .match_query(markets("KRW-BTC,KRW-ETH"))
        .with_status(200)
        .with_body(
            r#"[
            {"market":"KRW-BTC","trade_price":95000000.0,"signed_change_rate":0.01},
            {"market":"KRW-ETH","trade_price":4500000.0,"signed_change_rate":0.02}
        ]"#,
        )
        .expect(1)
        .create_async()
        .await;

    let client = UpbitClient::with_client(Client::new(), &server.url());
    let quotes = client
        .quotes(&["BTC".to_string(), "ETH".to_string()])
        .await
        .unwrap();

    assert_eq!(quotes.len(), 2);
    assert_eq!(quotes[1].symbol, "ETH");
    batch.assert_async().await;
}
