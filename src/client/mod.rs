use std::io::{Error, ErrorKind};

use rand::prelude::*;
use tokio::{net::TcpStream, sync::Mutex};
use tracing::debug;

use crate::{
    api::responses::Reply,
    proto::{self, CommandMessage, FrameMessage, Method},
};

/// Sends one request at a time over a single connection.
#[derive(Debug)]
pub struct Client {
    sock: Mutex<TcpStream>,
}

impl Client {
    pub async fn connect(addr: &str) -> Result<Self, Error> {
        let sck = TcpStream::connect(addr).await?;
        sck.set_nodelay(true)?;

        Ok(Client {
            sock: Mutex::new(sck),
        })
    }

    async fn rpc(&self, msg: FrameMessage) -> Result<FrameMessage, Error> {
        let mut sock = self.sock.lock().await;

        proto::nonblocking::marshal(&msg, &mut *sock).await?;
        let result = proto::nonblocking::unmarshal(&mut *sock).await?;

        if result.id != msg.id {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("expected reply {} but got {}", msg.id, result.id),
            ));
        }

        Ok(result)
    }

    pub async fn ping(&self) -> Result<(), Error> {
        let msg = FrameMessage::new(rand::thread_rng().gen(), CommandMessage::PING);

        match self.rpc(msg).await?.command {
            CommandMessage::PONG => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<Reply, Error> {
        let id: u64 = rand::thread_rng().gen();
        let msg = FrameMessage::request(id, method, path, body);
        debug!(id, ?method, path, "sending request");

        match self.rpc(msg).await?.command {
            CommandMessage::RESPONSE { status, body } => Ok(Reply { status, body }),
            other => Err(unexpected(other)),
        }
    }

    pub async fn factorial(&self, n: u64) -> Result<Reply, Error> {
        self.request(Method::GET, &format!("/factorial/{}", n), None)
            .await
    }
}

fn unexpected(command: CommandMessage) -> Error {
    Error::new(
        ErrorKind::InvalidData,
        format!("unexpected reply {:?}", command),
    )
}
