//! HTTPS push providers

use super::error::{NotifyError, NotifyResult};
use super::types::{ChannelKind, PushoverCredentials, TelegramCredentials};

const PUSHOVER_URL: &str = "https://api.pushover.net/1/messages.json";
const TELEGRAM_API: &str = "https://api.telegram.org";

/// Where the push providers are reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Full message URL of the Pushover API
    pub pushover_url: String,
    /// Bot API base; `/bot<token>/sendMessage` is appended
    pub telegram_api: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            pushover_url: PUSHOVER_URL.to_string(),
            telegram_api: TELEGRAM_API.to_string(),
        }
    }
}

pub(crate) async fn send_pushover(
    http: &reqwest::Client,
    url: &str,
    creds: &PushoverCredentials,
    title: &str,
    message: &str,
) -> NotifyResult<()> {
    let channel = ChannelKind::Pushover;
    let form = [
        ("token", creds.app_token.as_str()),
        ("user", creds.user_key.as_str()),
        ("title", title),
        ("message", message),
    ];
    http.post(url)
        .form(&form)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|e| http_error(channel, e))?;
    log::debug!("📨 Pushover accepted the message");
    Ok(())
}

pub(crate) async fn send_telegram(
    http: &reqwest::Client,
    api: &str,
    creds: &TelegramCredentials,
    title: &str,
    message: &str,
) -> NotifyResult<()> {
    let channel = ChannelKind::Telegram;
    let url = format!("{}/bot{}/sendMessage", api.trim_end_matches('/'), creds.bot_token);
    let text = format!("{title}\n{message}");
    let form = [("chat_id", creds.chat_id.as_str()), ("text", text.as_str())];
    http.post(url)
        .form(&form)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|e| http_error(channel, e))?;
    log::debug!("📨 Telegram accepted the message");
    Ok(())
}

// The Telegram URL embeds the bot token
fn http_error(channel: ChannelKind, e: reqwest::Error) -> NotifyError {
    NotifyError::Http {
        channel,
        source: e.without_url(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// What the local server saw of one request
    #[derive(Debug)]
    struct Received {
        request_line: String,
        body: String,
    }

    /// Accept a single HTTP request and answer it with `status`.
    async fn serve_once(status: &'static str) -> (String, JoinHandle<Received>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 1024];
            let (head_end, body_len) = loop {
                let n = stream.read(&mut buf).await.unwrap();
                assert!(n > 0, "connection closed before the headers ended");
                raw.extend_from_slice(&buf[..n]);
                if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&raw[..pos]).to_ascii_lowercase();
                    let body_len = head
                        .lines()
                        .find_map(|line| line.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    break (pos + 4, body_len);
                }
            };
            while raw.len() < head_end + body_len {
                let n = stream.read(&mut buf).await.unwrap();
                assert!(n > 0, "connection closed before the body ended");
                raw.extend_from_slice(&buf[..n]);
            }

            let response = format!("HTTP/1.1 {status}\r\ncontent-length: 2\r\nconnection: close\r\n\r\n{{}}");
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();

            let head = String::from_utf8_lossy(&raw[..head_end]).to_string();
            Received {
                request_line: head.lines().next().unwrap_or_default().to_string(),
                body: String::from_utf8_lossy(&raw[head_end..head_end + body_len]).to_string(),
            }
        });
        (base, server)
    }

    fn form_fields(body: &str) -> Vec<(String, String)> {
        body.split('&')
            .map(|pair| {
                let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                (k.to_string(), v.replace('+', " ").replace("%0A", "\n"))
            })
            .collect()
    }

    fn pushover_creds() -> PushoverCredentials {
        PushoverCredentials {
            app_token: "app123".to_string(),
            user_key: "user456".to_string(),
        }
    }

    fn telegram_creds() -> TelegramCredentials {
        TelegramCredentials {
            bot_token: "42:secret".to_string(),
            chat_id: "-100".to_string(),
        }
    }

    #[tokio::test]
    async fn test_pushover_posts_expected_form() {
        let (base, server) = serve_once("200 OK").await;
        let url = format!("{base}/1/messages.json");

        send_pushover(&reqwest::Client::new(), &url, &pushover_creds(), "Alert", "bell seen")
            .await
            .unwrap();

        let received = server.await.unwrap();
        assert_eq!(received.request_line, "POST /1/messages.json HTTP/1.1");
        assert_eq!(
            form_fields(&received.body),
            vec![
                ("token".to_string(), "app123".to_string()),
                ("user".to_string(), "user456".to_string()),
                ("title".to_string(), "Alert".to_string()),
                ("message".to_string(), "bell seen".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_telegram_puts_token_in_path_and_joins_text() {
        let (base, server) = serve_once("200 OK").await;

        send_telegram(&reqwest::Client::new(), &base, &telegram_creds(), "Alert", "bell seen")
            .await
            .unwrap();

        let received = server.await.unwrap();
        assert_eq!(received.request_line, "POST /bot42:secret/sendMessage HTTP/1.1");
        assert_eq!(
            form_fields(&received.body),
            vec![
                ("chat_id".to_string(), "-100".to_string()),
                ("text".to_string(), "Alert\nbell seen".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_error_status_is_http_failure() {
        let (base, server) = serve_once("401 Unauthorized").await;
        let url = format!("{base}/1/messages.json");

        let result =
            send_pushover(&reqwest::Client::new(), &url, &pushover_creds(), "Alert", "x").await;
        server.await.unwrap();
        match result {
            Err(NotifyError::Http { channel, source }) => {
                assert_eq!(channel, ChannelKind::Pushover);
                assert_eq!(source.status(), Some(reqwest::StatusCode::UNAUTHORIZED));
            }
            other => panic!("expected an HTTP failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_telegram_server_error_hides_token() {
        let (base, server) = serve_once("502 Bad Gateway").await;

        let result =
            send_telegram(&reqwest::Client::new(), &base, &telegram_creds(), "Alert", "x").await;
        server.await.unwrap();
        let err = result.unwrap_err();
        assert!(matches!(err, NotifyError::Http { channel: ChannelKind::Telegram, .. }));
        assert!(!err.to_string().contains("secret"), "{err}");
    }

    #[tokio::test]
    async fn test_system_channels_use_configured_endpoints() {
        use crate::notify::{DeliveryChannels, NotificationPolicy, Provider, SystemChannels};
        use std::time::Duration;

        let (base, server) = serve_once("200 OK").await;
        let endpoints = Endpoints {
            pushover_url: String::new(),
            telegram_api: format!("{base}/"),
        };
        let channels = SystemChannels::with_endpoints(Duration::from_secs(5), endpoints).unwrap();
        let policy = NotificationPolicy {
            provider: Provider::Telegram,
            telegram: Some(telegram_creds()),
            ..NotificationPolicy::default()
        };

        channels
            .deliver(ChannelKind::Telegram, &policy.request("bell seen"))
            .await
            .unwrap();
        let received = server.await.unwrap();
        assert_eq!(received.request_line, "POST /bot42:secret/sendMessage HTTP/1.1");
    }
}
