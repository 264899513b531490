//! One poller connection.

use std::sync::Arc;

use munin_core::error::Result;
use munin_core::protocol::{encode_lines, Command, UNKNOWN_COMMAND};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::watch;

use crate::obs::NodeMetrics;
use crate::processor::CommandProcessor;
use crate::transport::codec::{decode, encode, Outbound};

/// Longest request line accepted, newline included.
pub const MAX_LINE: usize = 4096;

enum Line {
    Text(String),
    TooLong,
    Eof,
}

/// Read one request line. Invalid UTF-8 is replaced rather than rejected,
/// and a line over `MAX_LINE` is drained up to its newline.
async fn read_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Line>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let n = (&mut *reader).take(MAX_LINE as u64).read_until(b'\n', buf).await?;
    if n == 0 {
        return Ok(Line::Eof);
    }
    if n < MAX_LINE || buf.last() == Some(&b'\n') {
        return Ok(Line::Text(String::from_utf8_lossy(buf).into_owned()));
    }

    loop {
        buf.clear();
        let n = (&mut *reader).take(MAX_LINE as u64).read_until(b'\n', buf).await?;
        if n == 0 || buf.last() == Some(&b'\n') {
            return Ok(Line::TooLong);
        }
    }
}

/// Serve one connection until the client quits, disconnects or shutdown is
/// signalled.
///
/// Writes the greeting, then handles requests strictly one at a time. Each
/// response is written with a single buffered write.
pub async fn run_session<S>(
    stream: S,
    processor: Arc<CommandProcessor>,
    obs: Option<Arc<NodeMetrics>>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    writer
        .write_all(&encode_lines(&[processor.greeting()]))
        .await?;

    loop {
        let line = tokio::select! {
            line = read_line(&mut reader, &mut buf) => line?,
            _ = shutdown.changed() => break,
        };
        let line = match line {
            Line::Text(line) => line,
            Line::TooLong => {
                tracing::debug!(max = MAX_LINE, "request line too long");
                writer.write_all(&encode_lines(&[UNKNOWN_COMMAND])).await?;
                continue;
            }
            Line::Eof => break,
        };
        let Some(request) = decode(&line) else { continue };

        if let Some(obs) = &obs {
            obs.command();
        }
        let outcome = match (&obs, request.command.parse::<Command>()) {
            (Some(obs), Ok(Command::Fetch)) => {
                obs.fetch_timer().time(|| processor.process_request(&request))
            }
            _ => processor.process_request(&request),
        };

        match encode(outcome, &request) {
            Outbound::Write(bytes) => writer.write_all(&bytes).await?,
            Outbound::Close => break,
        }
    }

    writer.flush().await?;
    writer.shutdown().await?;
    Ok(())
}
