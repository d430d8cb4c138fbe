use std::{
    future::Future,
    io::{Error, ErrorKind},
    net::SocketAddr,
    time::Duration,
};

use tokio::{
    io::BufReader,
    net::{TcpListener, TcpStream},
    sync::broadcast,
    task::JoinSet,
    time::timeout,
};
use tracing::{debug, info, warn};

use crate::{
    api::{self, responses::Reply},
    proto::{self, CommandMessage, FrameMessage},
    storage::storage::Storage,
};

#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    storage: Storage,
    shutdown_timeout: Duration,
}

impl Server {
    pub async fn bind(addr: &str, storage: Storage) -> Result<Self, Error> {
        let listener = TcpListener::bind(addr).await?;

        Ok(Server {
            listener,
            storage,
            shutdown_timeout: Duration::from_secs(5),
        })
    }

    pub fn with_shutdown_timeout(mut self, shutdown_timeout: Duration) -> Self {
        self.shutdown_timeout = shutdown_timeout;
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        self.listener.local_addr()
    }

    /// Accepts connections until `shutdown` resolves, then gives open
    /// connections up to the shutdown timeout to finish.
    pub async fn serve<F: Future<Output = ()>>(self, shutdown: F) -> Result<(), Error> {
        info!(addr = %self.local_addr()?, "server listening");

        let (stop_tx, _) = broadcast::channel::<()>(1);
        let mut connections = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("shutting down server");
                    break;
                }
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            debug!(%peer, "connection accepted");
                            let storage = self.storage.clone();
                            let stop_rx = stop_tx.subscribe();
                            connections.spawn(async move {
                                if let Err(e) = handle_connection(stream, storage, stop_rx).await {
                                    warn!(%peer, error = %e, "connection closed with error");
                                }
                            });
                        }
                        Err(e) => {
                            warn!(error = %e, "failed to accept connection");
                        }
                    }
                }
                Some(_) = connections.join_next(), if !connections.is_empty() => {}
            }
        }

        let _ = stop_tx.send(());
        let drain = async { while connections.join_next().await.is_some() {} };
        if timeout(self.shutdown_timeout, drain).await.is_err() {
            warn!("server forced to shutdown");
            connections.abort_all();
        }

        info!("server exiting");
        Ok(())
    }
}

async fn handle_connection(
    stream: TcpStream,
    storage: Storage,
    mut stop: broadcast::Receiver<()>,
) -> Result<(), Error> {
    stream.set_nodelay(true)?;
    let (read, mut write) = stream.into_split();
    let mut read = BufReader::new(read);

    loop {
        let frame = tokio::select! {
            _ = stop.recv() => return Ok(()),
            frame = proto::nonblocking::read_frame(&mut read) => frame,
        };

        // Past a framing error the next length prefix cannot be located.
        let frame = match frame {
            Ok(frame) => frame,
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::UnexpectedEof
                        | ErrorKind::ConnectionReset
                        | ErrorKind::ConnectionAborted
                ) =>
            {
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let msg = match FrameMessage::decode(&frame) {
            Ok(msg) => msg,
            Err(e) => {
                warn!(error = %e, "dropping unreadable frame");
                continue;
            }
        };

        let reply = match msg.command {
            CommandMessage::PING => FrameMessage::new(msg.id, CommandMessage::PONG),
            CommandMessage::REQUEST { method, path, body } => {
                let storage = storage.clone();
                let reply = tokio::task::spawn_blocking(move || {
                    api::route(method, &path, body.as_deref(), &storage)
                })
                .await
                .map_err(|e| Error::new(ErrorKind::Other, e))?;
                FrameMessage::response(msg.id, reply)
            }
            CommandMessage::RESPONSE { .. } | CommandMessage::PONG => {
                let reply = Reply {
                    status: 400,
                    body: serde_json::json!({ "error": "Unexpected frame" }).to_string(),
                };
                FrameMessage::response(msg.id, reply)
            }
        };

        proto::nonblocking::marshal(&reply, &mut write).await?;
    }
}
