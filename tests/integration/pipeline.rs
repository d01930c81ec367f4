//! End-to-end pipeline tests: a local ed25519 signer plus a wiremock
//! Horizon, driven through the real `HorizonClient`.
//!
//! These cover the wire-level behavior the in-crate unit tests mock away:
//! the form-encoded submission body, result-code interpretation from real
//! HTTP responses, and the snapshot-reload-before-build contract.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use horizon_wallet::config::WalletConfig;
use horizon_wallet::domain::WalletPipeline;
use horizon_wallet::models::{
    Amount, AssetSpec, MemoSpec, Network, RejectionKind, SubmissionOutcome, WalletError,
};
use horizon_wallet::services::{HorizonClient, HorizonClientTrait, LocalSigner};

const USDC_ISSUER: &str = "GBBD47IF6LWK7P7MDEVSCWR7DPUWV3NY3DTQEVFL4NAT4AQH3ZLLFLA5";

fn wallet_config(server: &MockServer) -> WalletConfig {
    WalletConfig {
        horizon_url: Some(server.uri()),
        friendbot_url: Some(server.uri()),
        ..WalletConfig::new(Network::Testnet)
    }
}

fn account_json(account_id: &str, sequence: i64) -> serde_json::Value {
    json!({
        "account_id": account_id,
        "sequence": sequence.to_string(),
        "balances": [
            { "balance": "50.0000000", "asset_type": "native" },
            {
                "balance": "12.0000000",
                "asset_type": "credit_alphanum4",
                "asset_code": "USDC",
                "asset_issuer": USDC_ISSUER
            }
        ]
    })
}

async fn mount_account(server: &MockServer, account_id: &str, sequence: i64) {
    Mock::given(method("GET"))
        .and(path(format!("/accounts/{}", account_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(account_json(account_id, sequence)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn payment_flows_end_to_end() {
    let server = MockServer::start().await;
    let signer = LocalSigner::from_seed([11u8; 32]);
    let source = signer.account_id();

    mount_account(&server, &source, 100).await;
    Mock::given(method("POST"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hash": "9a8b7c",
            "ledger": 123456
        })))
        .mount(&server)
        .await;

    let pipeline = WalletPipeline::new(
        HorizonClient::new(&wallet_config(&server)),
        signer,
        Network::Testnet,
    );

    let outcome = pipeline
        .send_payment(
            &source,
            USDC_ISSUER,
            AssetSpec::native(),
            Amount::parse("10.0000000").unwrap(),
            MemoSpec::text("rent").unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(outcome, SubmissionOutcome::Accepted { hash: "9a8b7c".into() });

    // The submission body must be exactly one form field carrying the
    // signed envelope, and decoding it must recover the base64 untouched.
    let requests = server.received_requests().await.unwrap();
    let submit = requests
        .iter()
        .find(|r| r.url.path() == "/transactions")
        .unwrap();
    let body = String::from_utf8(submit.body.clone()).unwrap();
    let fields: Vec<(String, String)> = serde_urlencoded::from_str(&body).unwrap();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].0, "tx");
    assert!(!fields[0].1.contains(char::is_whitespace));
}

#[tokio::test]
async fn trustline_rejection_maps_to_no_trustline() {
    let server = MockServer::start().await;
    let signer = LocalSigner::from_seed([12u8; 32]);
    let source = signer.account_id();

    mount_account(&server, &source, 7).await;
    Mock::given(method("POST"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "type": "https://stellar.org/horizon-errors/transaction_failed",
            "title": "Transaction Failed",
            "status": 400,
            "extras": {
                "result_codes": {
                    "transaction": "tx_failed",
                    "operations": ["op_no_trust"]
                }
            }
        })))
        .mount(&server)
        .await;

    let pipeline = WalletPipeline::new(
        HorizonClient::new(&wallet_config(&server)),
        signer,
        Network::Testnet,
    );

    let outcome = pipeline
        .send_payment(
            &source,
            USDC_ISSUER,
            AssetSpec::issued("USDC", USDC_ISSUER).unwrap(),
            Amount::parse("1").unwrap(),
            MemoSpec::None,
        )
        .await
        .unwrap();

    match outcome {
        SubmissionOutcome::Rejected { kind, detail } => {
            assert_eq!(kind, RejectionKind::NoTrustline);
            assert!(detail.contains("op_no_trust"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn snapshot_is_reloaded_for_every_run() {
    let server = MockServer::start().await;
    let signer = LocalSigner::from_seed([13u8; 32]);
    let source = signer.account_id();

    mount_account(&server, &source, 100).await;
    Mock::given(method("POST"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "hash": "h" })))
        .mount(&server)
        .await;

    let pipeline = WalletPipeline::new(
        HorizonClient::new(&wallet_config(&server)),
        signer,
        Network::Testnet,
    );

    for _ in 0..2 {
        pipeline
            .send_payment(
                &source,
                USDC_ISSUER,
                AssetSpec::native(),
                Amount::parse("1").unwrap(),
                MemoSpec::None,
            )
            .await
            .unwrap();
    }

    let requests = server.received_requests().await.unwrap();
    let account_reads = requests
        .iter()
        .filter(|r| r.url.path().starts_with("/accounts/"))
        .count();
    assert_eq!(account_reads, 2);
}

#[tokio::test]
async fn concurrent_run_is_rejected_as_busy() {
    let server = MockServer::start().await;
    let signer = LocalSigner::from_seed([14u8; 32]);
    let source = signer.account_id();

    // The slow snapshot read keeps the first run in flight long enough for
    // the second to overlap it.
    Mock::given(method("GET"))
        .and(path(format!("/accounts/{}", source)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(account_json(&source, 100))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "hash": "h" })))
        .mount(&server)
        .await;

    let pipeline = WalletPipeline::new(
        HorizonClient::new(&wallet_config(&server)),
        signer,
        Network::Testnet,
    );

    let first = pipeline.send_payment(
        &source,
        USDC_ISSUER,
        AssetSpec::native(),
        Amount::parse("1").unwrap(),
        MemoSpec::None,
    );
    let second = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        pipeline
            .send_payment(
                &source,
                USDC_ISSUER,
                AssetSpec::native(),
                Amount::parse("1").unwrap(),
                MemoSpec::None,
            )
            .await
    };
    let (first, second) = tokio::join!(first, second);

    assert!(matches!(first.unwrap(), SubmissionOutcome::Accepted { .. }));
    assert!(matches!(second.unwrap_err(), WalletError::Busy));

    // The guard is released once the first run finishes.
    pipeline
        .send_payment(
            &source,
            USDC_ISSUER,
            AssetSpec::native(),
            Amount::parse("1").unwrap(),
            MemoSpec::None,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn generated_account_can_be_funded() {
    let server = MockServer::start().await;
    let signer = LocalSigner::generate();
    let account_id = signer.account_id();

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("addr", account_id.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "hash": "funded" })))
        .mount(&server)
        .await;

    let client = HorizonClient::new(&wallet_config(&server));
    client.fund_with_friendbot(&account_id).await.unwrap();
}
