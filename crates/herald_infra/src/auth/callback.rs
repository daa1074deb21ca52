use std::collections::HashMap;
use std::net::SocketAddr;

use herald_domain::{AuthorizationCode, Error, State};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Loopback listener receiving the OAuth redirect.
///
/// Binds `127.0.0.1` on an OS-assigned port and serves requests until one
/// carries either an authorization code or an error. Anything else (the
/// browser asking for a favicon, say) gets a 404 and is ignored.
pub struct CallbackListener {
    listener: TcpListener,
    addr: SocketAddr,
}

/// What the provider sent back to the redirect URI.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Callback {
    Code { code: String, state: Option<String> },
    Denied(String),
    Unrelated,
}

impl CallbackListener {
    pub async fn bind() -> anyhow::Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let addr = listener.local_addr()?;
        tracing::debug!(%addr, "OAuth callback listener bound");
        Ok(Self { listener, addr })
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}/", self.port())
    }

    /// Waits for the redirect and checks its `state` against `expected`.
    pub async fn wait(self, expected: &State) -> anyhow::Result<AuthorizationCode> {
        loop {
            let (mut socket, peer) = self.listener.accept().await?;
            tracing::debug!(%peer, "Accepted OAuth callback connection");

            let request = read_request(&mut socket).await?;
            match parse_callback(&request) {
                Callback::Unrelated => {
                    respond(&mut socket, "404 Not Found", "Not found").await;
                }
                Callback::Denied(reason) => {
                    respond(&mut socket, "400 Bad Request", "Authorization was denied.").await;
                    return Err(Error::AuthorizationDenied(reason).into());
                }
                Callback::Code { state, .. } if state.as_deref() != Some(expected.as_str()) => {
                    respond(&mut socket, "400 Bad Request", "Invalid state parameter.").await;
                    let error = Error::Authorization("state mismatch in callback".to_string());
                    return Err(error.into());
                }
                Callback::Code { code, .. } => {
                    respond(
                        &mut socket,
                        "200 OK",
                        "Authorization complete. You can close this tab and return to the terminal.",
                    )
                    .await;
                    return Ok(AuthorizationCode::from(code));
                }
            }
        }
    }
}

async fn read_request(socket: &mut TcpStream) -> anyhow::Result<String> {
    let mut buffer = vec![0u8; 8192];
    let n = socket.read(&mut buffer).await?;
    Ok(String::from_utf8_lossy(&buffer[..n]).into_owned())
}

async fn respond(socket: &mut TcpStream, status: &str, message: &str) {
    let body = format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>herald</title></head>\
         <body><p>{message}</p></body></html>"
    );
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/html; charset=utf-8\r\n\
         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    if let Err(error) = socket.write_all(response.as_bytes()).await {
        tracing::debug!(error = %error, "Failed to answer OAuth callback");
    }
    let _ = socket.flush().await;
}

/// Parses the request line, e.g. `GET /?state=xyz&code=abc HTTP/1.1`.
fn parse_callback(request: &str) -> Callback {
    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or_default();
    let query = target.split_once('?').map(|(_, query)| query).unwrap_or_default();
    let mut params: HashMap<String, String> = url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();

    if let Some(error) = params.remove("error") {
        return Callback::Denied(error);
    }
    match params.remove("code") {
        Some(code) => Callback::Code { code, state: params.remove("state") },
        None => Callback::Unrelated,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_code_and_state() {
        let fixture = "GET /?state=xyz%2B789&code=4%2F0Abc&scope=gmail HTTP/1.1\r\n\r\n";

        let actual = parse_callback(fixture);

        let expected = Callback::Code {
            code: "4/0Abc".to_string(),
            state: Some("xyz+789".to_string()),
        };
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_parse_error_parameter() {
        let fixture = "GET /?error=access_denied&state=xyz HTTP/1.1\r\n\r\n";

        let actual = parse_callback(fixture);

        assert_eq!(actual, Callback::Denied("access_denied".to_string()));
    }

    #[test]
    fn test_parse_unrelated_request() {
        let fixture = "GET /favicon.ico HTTP/1.1\r\n\r\n";

        let actual = parse_callback(fixture);

        assert_eq!(actual, Callback::Unrelated);
    }

    async fn send(port: u16, target: &str) -> String {
        let mut stream = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
        stream
            .write_all(format!("GET {target} HTTP/1.1\r\nHost: localhost\r\n\r\n").as_bytes())
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_wait_returns_code_after_ignoring_unrelated_requests() {
        let fixture = CallbackListener::bind().await.unwrap();
        let port = fixture.port();
        let state = State::from("expected".to_string());

        let waiter = tokio::spawn(async move { fixture.wait(&state).await });
        let favicon = send(port, "/favicon.ico").await;
        let callback = send(port, "/?state=expected&code=the-code").await;

        let actual = waiter.await.unwrap().unwrap();

        assert_eq!(actual, AuthorizationCode::from("the-code".to_string()));
        assert!(favicon.starts_with("HTTP/1.1 404"));
        assert!(callback.starts_with("HTTP/1.1 200 OK"));
    }

    #[tokio::test]
    async fn test_wait_rejects_state_mismatch() {
        let fixture = CallbackListener::bind().await.unwrap();
        let port = fixture.port();
        let state = State::from("expected".to_string());

        let waiter = tokio::spawn(async move { fixture.wait(&state).await });
        send(port, "/?state=forged&code=the-code").await;

        let actual = waiter.await.unwrap().unwrap_err();

        assert!(matches!(actual.downcast_ref::<Error>(), Some(Error::Authorization(_))));
    }

    #[tokio::test]
    async fn test_wait_reports_denied_consent() {
        let fixture = CallbackListener::bind().await.unwrap();
        let port = fixture.port();
        let state = State::from("expected".to_string());

        let waiter = tokio::spawn(async move { fixture.wait(&state).await });
        send(port, "/?error=access_denied").await;

        let actual = waiter.await.unwrap().unwrap_err();

        assert!(matches!(
            actual.downcast_ref::<Error>(),
            Some(Error::AuthorizationDenied(reason)) if reason == "access_denied"
        ));
    }

    #[tokio::test]
    async fn test_redirect_uri_uses_localhost_and_bound_port() {
        let fixture = CallbackListener::bind().await.unwrap();

        let actual = fixture.redirect_uri();

        assert_eq!(actual, format!("http://localhost:{}/", fixture.port()));
    }
}
