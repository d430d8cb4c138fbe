use std::io::{Error, ErrorKind};

use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::{FrameMessage, MAX_FRAME_LEN};

/// Reads one length-prefixed frame body without decoding it.
///
/// An error here means the frame boundary is lost and the stream cannot be
/// read further.
pub async fn read_frame<T: AsyncRead + Unpin>(reader: &mut T) -> Result<BytesMut, Error> {
    let size = reader.read_u32().await? as usize;
    if size > MAX_FRAME_LEN {
        return Err(Error::new(
            ErrorKind::InvalidData,
            format!("frame of {} bytes exceeds limit", size),
        ));
    }

    let mut buf = BytesMut::zeroed(size);
    reader.read_exact(&mut buf).await?;
    Ok(buf)
}

pub async fn unmarshal<T: AsyncRead + Unpin>(reader: &mut T) -> Result<FrameMessage, Error> {
    let buf = read_frame(reader).await?;

    FrameMessage::decode(&buf)
}

pub async fn marshal<T: AsyncWrite + Unpin>(msg: &FrameMessage, w: &mut T) -> Result<(), Error> {
    let body = msg.encode()?;
    let size = u32::try_from(body.len())
        .ok()
        .filter(|&len| len as usize <= MAX_FRAME_LEN)
        .ok_or_else(|| Error::new(ErrorKind::InvalidData, "frame too large"))?;

    let mut buf = BytesMut::with_capacity(body.len() + 4);
    buf.put_u32(size);
    buf.put_slice(&body);

    w.write_all(&buf).await?;
    w.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::{CommandMessage, Method};

    #[tokio::test]
    async fn frames_cross_a_pipe_in_order() {
        let (mut client, mut server) = tokio::io::duplex(1024);

        let first = FrameMessage::request(1, Method::GET, "/factorial/9", None);
        let second = FrameMessage::new(2, CommandMessage::PING);
        marshal(&first, &mut client).await.unwrap();
        marshal(&second, &mut client).await.unwrap();

        assert_eq!(unmarshal(&mut server).await.unwrap(), first);
        assert_eq!(unmarshal(&mut server).await.unwrap(), second);
    }

    #[tokio::test]
    async fn oversized_length_is_rejected() {
        let (mut client, mut server) = tokio::io::duplex(64);
        client
            .write_all(&(MAX_FRAME_LEN as u32 + 1).to_be_bytes())
            .await
            .unwrap();

        let err = unmarshal(&mut server).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn undecodable_body_leaves_next_frame_readable() {
        let (mut client, mut server) = tokio::io::duplex(1024);
        client.write_all(&3u32.to_be_bytes()).await.unwrap();
        client.write_all(&[0xc1, 0x00, 0xff]).await.unwrap();
        let ping = FrameMessage::new(5, CommandMessage::PING);
        marshal(&ping, &mut client).await.unwrap();

        let body = read_frame(&mut server).await.unwrap();
        assert!(FrameMessage::decode(&body).is_err());
        assert_eq!(unmarshal(&mut server).await.unwrap(), ping);
    }

    #[tokio::test]
    async fn closed_stream_reports_eof() {
        let (client, mut server) = tokio::io::duplex(64);
        drop(client);

        let err = unmarshal(&mut server).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }
}
