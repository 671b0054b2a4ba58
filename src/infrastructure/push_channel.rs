use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};
use url::Url;

use crate::domain::errors::{PushError, SyncError};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Push endpoint for a backend: `https` becomes `wss`, `http` becomes `ws`,
/// host and port are kept and the path is `ws` under the backend's mount.
pub fn push_url(backend_url: &Url) -> Result<Url, SyncError> {
    let scheme = match backend_url.scheme() {
        "https" | "wss" => "wss",
        "http" | "ws" => "ws",
        other => {
            return Err(SyncError::InvalidUrl(format!(
                "unsupported backend scheme '{}'",
                other
            )))
        }
    };

    let mut base = backend_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.set_query(None);
    base.set_fragment(None);

    let mut url = base.join("ws")?;
    url.set_scheme(scheme)
        .map_err(|_| SyncError::InvalidUrl(format!("cannot switch {} to {}", url, scheme)))?;
    Ok(url)
}

/// One live push-channel connection.
pub struct PushSession {
    write: SplitSink<WsStream, Message>,
    read: SplitStream<WsStream>,
}

impl PushSession {
    pub async fn connect(url: &Url) -> Result<Self, PushError> {
        let (stream, _) = connect_async(url.as_str())
            .await
            .map_err(|e| PushError::ConnectionFailed(e.to_string()))?;
        info!("Push channel connected to {}", url);

        let (write, read) = stream.split();
        Ok(Self { write, read })
    }

    /// Next text frame, or `None` once the peer closed the connection.
    /// Control frames are handled here and never surface.
    pub async fn next_text(&mut self) -> Result<Option<String>, PushError> {
        loop {
            match self.read.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text)),
                Some(Ok(Message::Ping(payload))) => {
                    debug!("Push channel ping, answering with pong");
                    self.write
                        .send(Message::Pong(payload))
                        .await
                        .map_err(|e| PushError::Transport(e.to_string()))?;
                }
                Some(Ok(Message::Close(frame))) => {
                    info!("Push channel closed by server: {:?}", frame);
                    return Ok(None);
                }
                Some(Ok(other)) => {
                    debug!("Ignoring non-text push frame: {:?}", other);
                }
                Some(Err(e)) => return Err(PushError::Transport(e.to_string())),
                None => return Ok(None),
            }
        }
    }

    pub async fn close(mut self) {
        if let Err(e) = self.write.send(Message::Close(None)).await {
            debug!("Push channel close frame not sent: {}", e);
        }
    }
}
