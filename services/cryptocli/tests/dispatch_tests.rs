//! Vault commands run against a mock vault.

use clap::Parser;
use cryptocli::{
    cli::Commands,
    commands::{auth, execute, Invocation},
    Cli, CliError,
};
use serde_json::json;
use url::Url;
use vault_client::{Endpoints, VaultClient};
use test_utils::{
    fixtures::{batch_reply, error_reply, tokenize_reply, TokenFileFixture},
    MockVault,
};
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, ResponseTemplate,
};

fn invocation(args: &[&str]) -> Invocation {
    let cli = Cli::try_parse_from(std::iter::once("cryptocli").chain(args.iter().copied()))
        .expect("valid command line");
    match cli.command {
        Commands::Vault(command) => command.invocation().expect("valid flags"),
        other => panic!("not a vault command: {other:?}"),
    }
}

#[tokio::test]
async fn test_tokenize_reply_is_printed() {
    let vault = MockVault::start().await;
    vault.mount_post("token/", &tokenize_reply("tok-1")).await;
    let dir = tempfile::tempdir().unwrap();

    let report = execute(
        invocation(&["tokenize", "-n", "ssn", "-d", "123-45-6789"]),
        &vault.client(),
        dir.path(),
    )
    .await
    .unwrap();

    assert_eq!(report.body(), tokenize_reply("tok-1"));
    assert_eq!(
        vault.single_json_body().await,
        json!({"tokenData": "123-45-6789", "policyName": "ssn"})
    );
}

#[tokio::test]
async fn test_requests_carry_token_header() {
    let vault = MockVault::start().await;
    Mock::given(method("POST"))
        .and(path(MockVault::api_path("mask/")))
        .and(header("X-TOKEN-AUTH", test_utils::mocks::MOCK_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(vault.server())
        .await;
    let dir = tempfile::tempdir().unwrap();

    execute(
        invocation(&["mask", "-n", "ssn", "-d", "abc"]),
        &vault.client(),
        dir.path(),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_batch_tokenize_omits_latest_key() {
    let vault = MockVault::start().await;
    vault
        .mount_post("batch/token/", &batch_reply(&["t1", "t2"]))
        .await;
    let dir = tempfile::tempdir().unwrap();

    execute(
        invocation(&[
            "batch-tokenize",
            "-n",
            "p1",
            "-d",
            "v1",
            "-k",
            "0",
            "-n",
            "p2",
            "-d",
            "v2",
            "-k",
            "g2",
        ]),
        &vault.client(),
        dir.path(),
    )
    .await
    .unwrap();

    assert_eq!(
        vault.single_json_body().await,
        json!([
            {"tokenData": "v1", "policyName": "p1"},
            {"tokenData": "v2", "policyName": "p2", "keyGuid": "g2"},
        ])
    );
}

#[tokio::test]
async fn test_success_note_follows_reply() {
    let vault = MockVault::start().await;
    vault.mount_post("key/", r#"{"guid":"k1"}"#).await;
    let dir = tempfile::tempdir().unwrap();

    let report = execute(
        invocation(&[
            "create-key",
            "-k",
            "ks1",
            "-n",
            "payments",
            "-c",
            "aes-256-gcm",
        ]),
        &vault.client(),
        dir.path(),
    )
    .await
    .unwrap();

    assert_eq!(report.note(), Some("Key successfully created: payments"));
}

#[tokio::test]
async fn test_server_error_exits_3() {
    let vault = MockVault::start().await;
    vault
        .mount("POST", "encrypt/", 400, &error_reply("bad mode"))
        .await;
    let dir = tempfile::tempdir().unwrap();

    let err = execute(
        invocation(&["encrypt", "-k", "g", "-d", "plain", "-m", "xts"]),
        &vault.client(),
        dir.path(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.code(), 3);
    assert_eq!(err.to_string(), error_reply("bad mode"));
}

#[tokio::test]
async fn test_non_success_without_error_member_is_printed() {
    let vault = MockVault::start().await;
    vault
        .mount("POST", "token/", 400, r#"{"detail":"Invalid policy name"}"#)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let report = execute(
        invocation(&["tokenize", "-n", "nope", "-d", "1"]),
        &vault.client(),
        dir.path(),
    )
    .await
    .unwrap();

    assert_eq!(report.body(), r#"{"detail":"Invalid policy name"}"#);
}

#[tokio::test]
async fn test_batch_reply_with_error_member_is_printed() {
    let vault = MockVault::start().await;
    vault
        .mount("POST", "batch/mask/", 400, &error_reply("unknown policy"))
        .await;
    let dir = tempfile::tempdir().unwrap();

    let report = execute(
        invocation(&["batch-mask", "-n", "p1", "-d", "v1"]),
        &vault.client(),
        dir.path(),
    )
    .await
    .unwrap();

    assert_eq!(report.body(), error_reply("unknown policy"));
}

#[tokio::test]
async fn test_batch_empty_404_exits_5() {
    let vault = MockVault::start().await;
    vault.mount_denied("POST", "batch/detoken/").await;
    let dir = tempfile::tempdir().unwrap();

    let err = execute(
        invocation(&["batch-detokenize", "-n", "p1", "-d", "t1", "-k", "0"]),
        &vault.client(),
        dir.path(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.code(), 5);
}

#[tokio::test]
async fn test_error_member_on_2xx_exits_3() {
    let vault = MockVault::start().await;
    vault
        .mount_post("sign/", &error_reply("key disabled"))
        .await;
    let dir = tempfile::tempdir().unwrap();

    let err = execute(
        invocation(&["sign", "-k", "g", "-d", "payload"]),
        &vault.client(),
        dir.path(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CliError::Server(_)));
}

#[tokio::test]
async fn test_empty_404_exits_5() {
    let vault = MockVault::start().await;
    vault.mount_denied("DELETE", "key/g1/purge/").await;
    let dir = tempfile::tempdir().unwrap();

    let err = execute(
        invocation(&["purge-key", "-k", "g1"]),
        &vault.client(),
        dir.path(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.code(), 5);
    assert_eq!(err.to_string(), "Action denied");
}

#[tokio::test]
async fn test_settings_denied_message() {
    let vault = MockVault::start().await;
    vault
        .mount_denied("POST", "UpdateTokenizationSettings/")
        .await;
    let dir = tempfile::tempdir().unwrap();

    let err = execute(
        invocation(&["update-tokenization-settings", "-o", "enable", "-R", "2"]),
        &vault.client(),
        dir.path(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.code(), 5);
    assert_eq!(err.to_string(), "Tokenization Settings not found");
}

#[tokio::test]
async fn test_export_public_key_download() {
    let vault = MockVault::start().await;
    Mock::given(method("GET"))
        .and(path(MockVault::api_path("key/g7/export/public")))
        .and(query_param("download", "yes"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-disposition", "attachment; filename=\"g7.pem\"")
                .set_body_string("-----BEGIN PUBLIC KEY-----\n"),
        )
        .mount(vault.server())
        .await;
    let dir = tempfile::tempdir().unwrap();

    let report = execute(
        invocation(&["export-public-key", "-k", "g7", "--download"]),
        &vault.client(),
        dir.path(),
    )
    .await
    .unwrap();

    assert_eq!(report.body(), "Successfully downloaded public key as - g7.pem");
    let saved = std::fs::read_to_string(dir.path().join("g7.pem")).unwrap();
    assert!(saved.starts_with("-----BEGIN PUBLIC KEY-----"));
}

#[tokio::test]
async fn test_unreachable_vault_exits_4() {
    let client = VaultClient::new(
        reqwest::Client::new(),
        Endpoints::from_base_url(Url::parse("http://127.0.0.1:1/").unwrap()),
        None,
    );
    let dir = tempfile::tempdir().unwrap();

    let err = execute(
        invocation(&["detokenize", "-n", "ssn", "-d", "tok"]),
        &client,
        dir.path(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.code(), 4);
}

#[tokio::test]
async fn test_dot_segment_is_rejected_before_sending() {
    let vault = MockVault::start().await;
    let dir = tempfile::tempdir().unwrap();

    for args in [
        &["purge-key", "-k", ".."][..],
        &["set-key-property", "-k", ".", "-d", "x"][..],
        &["get-tokenization-policy", "-n", ".."][..],
    ] {
        let err = execute(invocation(args), &vault.client(), dir.path())
            .await
            .unwrap_err();
        assert_eq!(err.code(), 1, "{args:?}");
    }
    assert!(vault.requests().await.is_empty());
}

#[tokio::test]
async fn test_logout_removes_token_file() {
    let vault = MockVault::start().await;
    vault.mount_post("logout/", "{}").await;
    let fixture = TokenFileFixture::with_session(&vault.address(), "t");

    let report = auth::logout(&vault.client(), fixture.path()).await.unwrap();

    assert_eq!(report.body(), "Logged out");
    assert!(!fixture.path().exists());
}

#[tokio::test]
async fn test_failed_logout_keeps_token_file() {
    let vault = MockVault::start().await;
    vault
        .mount("POST", "logout/", 401, &error_reply("expired"))
        .await;
    let fixture = TokenFileFixture::with_session(&vault.address(), "t");

    let err = auth::logout(&vault.client(), fixture.path())
        .await
        .unwrap_err();

    assert_eq!(err.code(), 3);
    assert!(fixture.path().exists());
}
