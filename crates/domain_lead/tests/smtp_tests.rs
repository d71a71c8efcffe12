//! SMTP adapter tests against a scripted in-process relay
//!
//! # Test Organization
//!
//! - `dialogue` - Command sequence of a successful delivery
//! - `tls` - STARTTLS negotiation before credentials are sent
//! - `failures` - Reply codes, refused connections and timeouts
//! - `intake` - The intake service delivering over SMTP

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use core_kernel::{AdapterHealth, HealthCheckable, PortError};
use domain_lead::{
    EmailMessage, LeadError, LeadIntakeService, Mailbox, MailerPort, NotificationSettings,
    PartnerSubmission, RetryPolicy, SmtpConfig, SmtpMailer, SmtpTls,
};

/// How the scripted relay answers
#[derive(Clone, Copy)]
struct Script {
    rcpt_reply: &'static str,
    /// Connections greeted with 421 before the relay starts accepting
    busy_connections: usize,
    /// Connections whose end of DATA is answered with 451
    deferred_connections: usize,
    /// Advertise STARTTLS (and refuse it, the relay has no certificate)
    starttls: bool,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            rcpt_reply: "250 2.1.5 OK",
            busy_connections: 0,
            deferred_connections: 0,
            starttls: false,
        }
    }
}

struct ScriptedRelay {
    addr: SocketAddr,
    transcript: Arc<Mutex<Vec<String>>>,
}

impl ScriptedRelay {
    async fn start(script: Script) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let transcript = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&transcript);
        tokio::spawn(async move {
            let mut connections = 0;
            while let Ok((stream, _)) = listener.accept().await {
                connections += 1;
                let busy = connections <= script.busy_connections;
                let defer = connections <= script.busy_connections + script.deferred_connections;
                tokio::spawn(serve(stream, script, busy, defer, Arc::clone(&log)));
            }
        });

        Self { addr, transcript }
    }

    /// Plain connection, as a local relay without TLS would be used
    fn config(&self) -> SmtpConfig {
        SmtpConfig {
            host: self.addr.ip().to_string(),
            port: self.addr.port(),
            tls: SmtpTls::None,
            timeout: Duration::from_secs(5),
            helo_name: "tests.local".to_string(),
            ..Default::default()
        }
    }

    fn mailer(&self) -> SmtpMailer {
        SmtpMailer::new(self.config()).unwrap()
    }

    fn transcript(&self) -> Vec<String> {
        self.transcript.lock().unwrap().clone()
    }
}

async fn serve(
    stream: TcpStream,
    script: Script,
    busy: bool,
    defer: bool,
    log: Arc<Mutex<Vec<String>>>,
) {
    let (read, mut write) = stream.into_split();
    let mut reader = BufReader::new(read);

    if busy {
        let _ = write.write_all(b"421 4.3.2 Service busy, try later\r\n").await;
        return;
    }
    if write.write_all(b"220 relay.test ESMTP ready\r\n").await.is_err() {
        return;
    }

    let ehlo = if script.starttls {
        "250-relay.test\r\n250-STARTTLS\r\n250-AUTH PLAIN LOGIN\r\n250 8BITMIME"
    } else {
        "250-relay.test\r\n250-AUTH PLAIN LOGIN\r\n250 8BITMIME"
    };

    let mut in_data = false;
    let mut auth_step = 0;
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
        let command = line.trim_end_matches(['\r', '\n']).to_string();
        log.lock().unwrap().push(command.clone());

        if in_data {
            if command == "." {
                in_data = false;
                let reply: &[u8] = if defer {
                    b"451 4.3.0 Try again later\r\n"
                } else {
                    b"250 2.0.0 Queued\r\n"
                };
                let _ = write.write_all(reply).await;
            }
            continue;
        }

        let reply: &str = if auth_step == 1 {
            auth_step = 2;
            "334 UGFzc3dvcmQ6"
        } else if auth_step == 2 {
            auth_step = 0;
            "235 2.7.0 Authentication successful"
        } else if command.starts_with("EHLO") {
            ehlo
        } else if command == "STARTTLS" {
            "454 4.7.0 TLS not available due to temporary reason"
        } else if command.starts_with("AUTH PLAIN ") {
            "235 2.7.0 Authentication successful"
        } else if command == "AUTH LOGIN" {
            auth_step = 1;
            "334 VXNlcm5hbWU6"
        } else if command.starts_with("MAIL FROM:") {
            "250 2.1.0 OK"
        } else if command.starts_with("RCPT TO:") {
            script.rcpt_reply
        } else if command == "DATA" {
            in_data = true;
            "354 End data with <CR><LF>.<CR><LF>"
        } else if command == "NOOP" || command == "RSET" {
            "250 2.0.0 OK"
        } else if command == "QUIT" {
            let _ = write.write_all(b"221 2.0.0 Bye\r\n").await;
            return;
        } else {
            "502 5.5.2 Command not recognized"
        };

        if write.write_all(format!("{reply}\r\n").as_bytes()).await.is_err() {
            return;
        }
    }
}

fn position(transcript: &[String], matches: impl Fn(&str) -> bool, what: &str) -> usize {
    transcript
        .iter()
        .position(|line| matches(line))
        .unwrap_or_else(|| panic!("{what} missing from {transcript:#?}"))
}

fn message() -> EmailMessage {
    EmailMessage {
        from: Mailbox::new("avisos@financiacionhipotecaria.com").with_name("FinanciacionHipotecaria.com"),
        to: vec!["leads@financiacionhipotecaria.com".to_string()],
        reply_to: Some("ana@example.com".to_string()),
        subject: "Nuevo lead de hipoteca".to_string(),
        html_body: "<h2>Nuevo lead de hipoteca</h2>\n.<p>punto inicial</p>\n".to_string(),
        reference: Some("LEAD-test".to_string()),
    }
}

// ============================================================================
// DIALOGUE
// ============================================================================

mod dialogue {
    use super::*;

    #[tokio::test]
    async fn test_delivery_with_credentials() {
        let relay = ScriptedRelay::start(Script::default()).await;
        let mailer = SmtpMailer::new(SmtpConfig {
            username: Some("apikey".to_string()),
            password: Some("s3cret".to_string()),
            ..relay.config()
        })
        .unwrap();

        let receipt = mailer.send(&message(), None).await.unwrap();
        assert_eq!(receipt.message_id, "LEAD-test@financiacionhipotecaria.com");
        assert_eq!(receipt.accepted, ["leads@financiacionhipotecaria.com"]);

        let transcript = relay.transcript();
        let auth_plain = format!("AUTH PLAIN {}", STANDARD.encode("\0apikey\0s3cret"));
        let ehlo = position(&transcript, |l| l == "EHLO tests.local", "EHLO");
        let auth = position(&transcript, |l| l == auth_plain, "AUTH PLAIN");
        let mail = position(
            &transcript,
            |l| l.starts_with("MAIL FROM:<avisos@financiacionhipotecaria.com>"),
            "MAIL FROM",
        );
        let rcpt = position(
            &transcript,
            |l| l.starts_with("RCPT TO:<leads@financiacionhipotecaria.com>"),
            "RCPT TO",
        );
        let data = position(&transcript, |l| l == "DATA", "DATA");
        let end = position(&transcript, |l| l == ".", "end of DATA");
        let quit = position(&transcript, |l| l == "QUIT", "QUIT");
        assert!(ehlo < auth && auth < mail);
        assert!(mail < rcpt && rcpt < data && data < end && end < quit);

        assert!(transcript.contains(&"Subject: Nuevo lead de hipoteca".to_string()));
        assert!(transcript.contains(&"Message-ID: <LEAD-test@financiacionhipotecaria.com>".to_string()));
        assert!(transcript.iter().any(|l| l.starts_with("Reply-To:") && l.contains("ana@example.com")));
        assert!(transcript
            .iter()
            .any(|l| l.eq_ignore_ascii_case("Content-Type: text/html; charset=utf-8")));
        // A body line starting with a dot is stuffed
        assert!(transcript.contains(&"..<p>punto inicial</p>".to_string()));
    }

    #[tokio::test]
    async fn test_no_auth_without_credentials() {
        let relay = ScriptedRelay::start(Script::default()).await;
        relay.mailer().send(&message(), None).await.unwrap();
        assert!(!relay.transcript().iter().any(|line| line.starts_with("AUTH")));
    }

    #[tokio::test]
    async fn test_every_recipient_is_announced() {
        let relay = ScriptedRelay::start(Script::default()).await;
        let mut message = message();
        message.to.push("direccion@financiacionhipotecaria.com".to_string());

        let receipt = relay.mailer().send(&message, None).await.unwrap();
        assert_eq!(receipt.accepted.len(), 2);
        let rcpts = relay
            .transcript()
            .into_iter()
            .filter(|line| line.starts_with("RCPT TO:"))
            .count();
        assert_eq!(rcpts, 2);
    }

    #[tokio::test]
    async fn test_health_check_against_live_relay() {
        let relay = ScriptedRelay::start(Script::default()).await;
        let result = relay.mailer().health_check().await;
        assert_eq!(result.status, AdapterHealth::Healthy);
    }
}

// ============================================================================
// TLS
// ============================================================================

mod tls {
    use super::*;

    fn opportunistic(relay: &ScriptedRelay) -> SmtpMailer {
        SmtpMailer::new(SmtpConfig {
            username: Some("apikey".to_string()),
            password: Some("s3cret".to_string()),
            tls: SmtpTls::Opportunistic,
            ..relay.config()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_starttls_is_attempted_before_credentials() {
        let relay = ScriptedRelay::start(Script {
            starttls: true,
            ..Default::default()
        })
        .await;

        let err = opportunistic(&relay).send(&message(), None).await.unwrap_err();
        assert!(err.is_transient(), "unexpected error: {err:?}");

        let transcript = relay.transcript();
        let ehlo = position(&transcript, |l| l.starts_with("EHLO"), "EHLO");
        let starttls = position(&transcript, |l| l == "STARTTLS", "STARTTLS");
        assert!(ehlo < starttls);
        // The upgrade failed, so nothing secret may follow
        assert!(!transcript.iter().any(|l| l.starts_with("AUTH")), "{transcript:#?}");
        assert!(!transcript.iter().any(|l| l.starts_with("MAIL FROM")));
    }

    #[tokio::test]
    async fn test_relay_without_starttls_is_used_as_is() {
        let relay = ScriptedRelay::start(Script::default()).await;

        opportunistic(&relay).send(&message(), None).await.unwrap();

        let transcript = relay.transcript();
        assert!(!transcript.iter().any(|l| l == "STARTTLS"));
        assert!(transcript.iter().any(|l| l.starts_with("AUTH PLAIN ")));
    }

    #[tokio::test]
    async fn test_plain_mode_never_upgrades() {
        let relay = ScriptedRelay::start(Script {
            starttls: true,
            ..Default::default()
        })
        .await;

        relay.mailer().send(&message(), None).await.unwrap();
        assert!(!relay.transcript().iter().any(|l| l == "STARTTLS"));
    }
}

// ============================================================================
// FAILURES
// ============================================================================

mod failures {
    use super::*;

    #[tokio::test]
    async fn test_rejected_recipient_is_permanent() {
        let relay = ScriptedRelay::start(Script {
            rcpt_reply: "550 5.1.1 Mailbox unavailable",
            ..Default::default()
        })
        .await;

        let err = relay.mailer().send(&message(), None).await.unwrap_err();
        assert!(matches!(err, PortError::Rejected { code: 550, .. }));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_temporary_refusal_is_transient() {
        let relay = ScriptedRelay::start(Script {
            rcpt_reply: "451 4.3.0 Try again later",
            ..Default::default()
        })
        .await;

        let err = relay.mailer().send(&message(), None).await.unwrap_err();
        assert!(matches!(err, PortError::ServiceUnavailable { .. }));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_refused_connection_is_transient() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mailer = SmtpMailer::new(SmtpConfig {
            host: "127.0.0.1".to_string(),
            port,
            timeout: Duration::from_secs(2),
            ..Default::default()
        })
        .unwrap();
        let err = mailer.send(&message(), None).await.unwrap_err();
        assert!(err.is_transient(), "unexpected error: {err:?}");

        let health = mailer.health_check().await;
        assert_eq!(health.status, AdapterHealth::Unhealthy);
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((stream, _)) = listener.accept().await {
                tokio::time::sleep(Duration::from_secs(10)).await;
                drop(stream);
            }
        });

        let mailer = SmtpMailer::new(SmtpConfig {
            host: addr.ip().to_string(),
            port: addr.port(),
            tls: SmtpTls::None,
            timeout: Duration::from_millis(200),
            ..Default::default()
        })
        .unwrap();
        let err = mailer.send(&message(), None).await.unwrap_err();
        assert!(matches!(err, PortError::Timeout { .. }), "unexpected error: {err:?}");
    }

    #[tokio::test]
    async fn test_no_recipients_is_rejected_before_connecting() {
        let mut message = message();
        message.to.clear();
        let mailer = SmtpMailer::new(SmtpConfig {
            host: "127.0.0.1".to_string(),
            port: 9,
            ..Default::default()
        })
        .unwrap();
        let err = mailer.send(&message, None).await.unwrap_err();
        assert!(matches!(err, PortError::Validation { .. }));
    }
}

// ============================================================================
// INTAKE OVER SMTP
// ============================================================================

mod intake {
    use super::*;

    fn partner() -> PartnerSubmission {
        PartnerSubmission {
            name: Some("Inmobiliaria Sol".to_string()),
            business_type: Some("Inmobiliaria".to_string()),
            email: Some("info@sol.es".to_string()),
            phone: None,
        }
    }

    fn settings() -> NotificationSettings {
        NotificationSettings::new("avisos@financiacionhipotecaria.com", "leads@financiacionhipotecaria.com")
    }

    #[tokio::test]
    async fn test_partner_request_is_relayed() {
        let relay = ScriptedRelay::start(Script::default()).await;
        let service = LeadIntakeService::new(Arc::new(relay.mailer()), settings());

        let receipt = service.submit_partner(partner(), None).await.unwrap();
        assert!(receipt.reference.starts_with("PTNR-"));

        let transcript = relay.transcript();
        assert!(transcript.contains(&"Subject: Nueva solicitud de partner".to_string()));
        assert!(transcript.iter().any(|l| l.starts_with("Reply-To:") && l.contains("info@sol.es")));
    }

    #[tokio::test]
    async fn test_busy_relay_is_retried() {
        let relay = ScriptedRelay::start(Script {
            busy_connections: 1,
            ..Default::default()
        })
        .await;
        let service = LeadIntakeService::new(Arc::new(relay.mailer()), settings())
            .with_retry(RetryPolicy::new(2, Duration::from_millis(10)));

        let receipt = service.submit_partner(partner(), None).await.unwrap();
        assert_eq!(receipt.attempts, 2);
    }

    #[tokio::test]
    async fn test_busy_relay_without_retry_fails() {
        let relay = ScriptedRelay::start(Script {
            busy_connections: 1,
            ..Default::default()
        })
        .await;
        let service = LeadIntakeService::new(Arc::new(relay.mailer()), settings());

        let err = service.submit_partner(partner(), None).await.unwrap_err();
        assert!(matches!(err, LeadError::Delivery { attempts: 1, .. }));
        assert_eq!(err.public_message(), "Error enviando email.");
    }

    #[tokio::test]
    async fn test_deferred_message_is_resent_with_same_message_id() {
        let relay = ScriptedRelay::start(Script {
            deferred_connections: 1,
            ..Default::default()
        })
        .await;
        let service = LeadIntakeService::new(Arc::new(relay.mailer()), settings())
            .with_retry(RetryPolicy::new(2, Duration::from_millis(10)));

        let receipt = service.submit_partner(partner(), None).await.unwrap();
        assert_eq!(receipt.attempts, 2);

        let ids: Vec<String> = relay
            .transcript()
            .into_iter()
            .filter(|l| l.starts_with("Message-ID:"))
            .collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0], ids[1]);
        assert!(ids[0].contains(&receipt.reference));
    }
}
