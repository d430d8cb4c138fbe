use std::io::{Error, ErrorKind};

use serde::{Deserialize, Serialize};

use crate::api::responses::Reply;

pub mod nonblocking;

pub static VERSION: u8 = 2;

/// Largest frame body accepted from the wire, in bytes.
pub const MAX_FRAME_LEN: usize = 64 * 1024 * 1024;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    GET,
    POST,
    PUT,
    DELETE,
}

impl std::str::FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            other => Err(Error::new(
                ErrorKind::InvalidInput,
                format!("{} is not a supported method", other),
            )),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum CommandMessage {
    REQUEST {
        method: Method,
        path: String,
        body: Option<String>,
    },
    RESPONSE {
        status: u16,
        body: String,
    },
    PING,
    PONG,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FrameMessage {
    pub version: u8,
    pub id: u64,
    pub command: CommandMessage,
}

impl FrameMessage {
    pub fn new(id: u64, command: CommandMessage) -> Self {
        Self {
            version: VERSION,
            id,
            command,
        }
    }

    pub fn request(id: u64, method: Method, path: &str, body: Option<String>) -> Self {
        Self::new(
            id,
            CommandMessage::REQUEST {
                method,
                path: path.to_owned(),
                body,
            },
        )
    }

    pub fn response(id: u64, reply: Reply) -> Self {
        Self::new(
            id,
            CommandMessage::RESPONSE {
                status: reply.status,
                body: reply.body,
            },
        )
    }

    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        rmp_serde::to_vec(self).map_err(|e| Error::new(ErrorKind::InvalidData, e))
    }

    pub fn decode(buf: &[u8]) -> Result<Self, Error> {
        let fm: FrameMessage =
            rmp_serde::from_slice(buf).map_err(|e| Error::new(ErrorKind::InvalidData, e))?;

        if fm.version != VERSION {
            return Err(Error::new(
                ErrorKind::Unsupported,
                "version is not supported",
            ));
        }

        Ok(fm)
    }
}

impl From<CommandMessage> for FrameMessage {
    fn from(command: CommandMessage) -> Self {
        FrameMessage::new(0, command)
    }
}
