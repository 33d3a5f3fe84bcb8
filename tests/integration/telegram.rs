//! Telegram notifier against a mocked Bot API

use confluex::config::TelegramConfig;
use confluex::services::notifier::{Notifier, TelegramNotifier};
use confluex::AlertError;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn notifier(server: &MockServer) -> TelegramNotifier {
    TelegramNotifier::new(&TelegramConfig {
        bot_token: "123:secret".to_string(),
        chat_id: "42".to_string(),
        base_url: server.uri(),
    })
    .expect("client builds")
}

#[tokio::test]
async fn posts_html_message_to_chat() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123:secret/sendMessage"))
        .and(body_json(json!({
            "chat_id": "42",
            "text": "🟢 <b>BUY</b>",
            "parse_mode": "HTML"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    notifier(&server)
        .send("🟢 <b>BUY</b>")
        .await
        .expect("delivered");
}

#[tokio::test]
async fn rejected_message_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"ok": false, "description": "Bad Request: chat not found"})),
        )
        .mount(&server)
        .await;

    let err = notifier(&server).send("hello").await.unwrap_err();
    assert!(matches!(err, AlertError::Notification(_)));
    assert!(err.to_string().contains("chat not found"));
    assert!(!err.to_string().contains("secret"));
}
