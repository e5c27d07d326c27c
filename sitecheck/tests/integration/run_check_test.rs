//! Integration Test: 単一チェックの実行
//!
//! コンテンツチェック・ステータスのみのチェック・通信失敗の扱いを検証する。

use sitecheck::common::{
    CheckDetail, CheckOutcome, EndpointCheck, KeywordMatch, StatusClass, TransportErrorKind,
};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::{fast_runner, refused_url, runner_with};

const HOME_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta name="viewport" content="width=device-width, initial-scale=1">
<link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.0.0/css/all.min.css">
<style>body { margin: 0; }</style>
</head>
<body>
<h1>Welcome to DOXA Investments</h1>
<section>Services</section>
<script>console.log("ready")</script>
</body>
</html>"#;

/// キーワードごとに大文字小文字を区別して判定される
#[tokio::test]
async fn test_content_check_reports_each_keyword() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(HOME_PAGE))
        .expect(1)
        .mount(&mock)
        .await;

    let check = EndpointCheck::content(
        "Home",
        format!("{}/", mock.uri()),
        ["DOXA Investments", "doxa investments", "Services", "Contact"],
    );

    let result = fast_runner().run_check(&check).await;
    assert_eq!(result.name, "Home");

    match result.outcome {
        CheckOutcome::Success {
            status,
            status_text,
            size_bytes,
            detail: CheckDetail::Content { keywords, signals },
            ..
        } => {
            assert_eq!(status, 200);
            assert_eq!(status_text.as_deref(), Some("OK"));
            assert_eq!(size_bytes, Some(HOME_PAGE.len() as u64));
            assert_eq!(
                keywords,
                vec![
                    KeywordMatch {
                        keyword: "DOXA Investments".to_string(),
                        found: true
                    },
                    KeywordMatch {
                        keyword: "doxa investments".to_string(),
                        found: false
                    },
                    KeywordMatch {
                        keyword: "Services".to_string(),
                        found: true
                    },
                    KeywordMatch {
                        keyword: "Contact".to_string(),
                        found: false
                    },
                ]
            );
            assert!(signals.css);
            assert!(signals.javascript);
            assert!(signals.responsive);
            assert!(signals.icons);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

/// コンテンツチェックは404でも成功（通信完了）として記録される
#[tokio::test]
async fn test_content_check_on_not_found_page() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page-inexistante"))
        .respond_with(ResponseTemplate::new(404).set_body_string("404 - Page non trouvée"))
        .mount(&mock)
        .await;

    let check = EndpointCheck::content(
        "Not found",
        format!("{}/page-inexistante", mock.uri()),
        ["404", "Page non trouvée"],
    );

    let result = fast_runner().run_check(&check).await;
    assert_eq!(result.status(), Some(404));
    match result.outcome {
        CheckOutcome::Success {
            detail: CheckDetail::Content { keywords, .. },
            ..
        } => assert!(keywords.iter().all(|k| k.found)),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

/// ステータスのみのチェックはステータスコードに関わらず成功として返る
#[tokio::test]
async fn test_status_only_check_classifies_without_failing() {
    let mock = MockServer::start().await;
    for (route, status) in [("/ok", 200u16), ("/pending", 500), ("/teapot", 418)] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status))
            .mount(&mock)
            .await;
    }

    let runner = fast_runner();
    let expected = [
        ("/ok", 200u16, StatusClass::Operational),
        ("/pending", 500, StatusClass::AwaitingActivation),
        ("/teapot", 418, StatusClass::Error(418)),
    ];

    for (route, status, class) in expected {
        let check = EndpointCheck::status_only("API", format!("{}{}", mock.uri(), route));
        let result = runner.run_check(&check).await;

        match result.outcome {
            CheckOutcome::Success {
                status: actual,
                detail,
                ..
            } => {
                assert_eq!(actual, status);
                assert_eq!(detail, CheckDetail::StatusOnly(class));
            }
            other => panic!("unexpected outcome for {}: {:?}", route, other),
        }
    }
}

/// User-Agentヘッダが送信される
#[tokio::test]
async fn test_user_agent_header_is_sent() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/backend/api.php"))
        .and(header("user-agent", "DOXA-Test-Agent/1.0"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock)
        .await;

    let check = EndpointCheck::status_only("API", format!("{}/backend/api.php", mock.uri()));
    let result = fast_runner().run_check(&check).await;

    // ヘッダが一致しなければwiremockは404を返す
    assert_eq!(result.status(), Some(200));
}

/// 接続拒否はFailureとして返り、panicしない
#[tokio::test]
async fn test_connection_refused_becomes_failure() {
    let check = EndpointCheck::status_only("Down", refused_url().await);
    let result = fast_runner().run_check(&check).await;

    match result.outcome {
        CheckOutcome::Failure { error, kind } => {
            assert!(!error.is_empty());
            assert_eq!(kind, TransportErrorKind::Connect);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

/// タイムアウトはFailure(Timeout)として返る
#[tokio::test]
async fn test_timeout_becomes_failure() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&mock)
        .await;

    let runner = runner_with(Duration::ZERO, Duration::from_millis(200));
    let check = EndpointCheck::content("Slow", format!("{}/slow", mock.uri()), ["x"]);
    let result = runner.run_check(&check).await;

    match result.outcome {
        CheckOutcome::Failure { kind, .. } => assert_eq!(kind, TransportErrorKind::Timeout),
        other => panic!("unexpected outcome: {:?}", other),
    }
}
