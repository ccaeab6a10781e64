//! Length-prefixed framing for the output stream.
//!
//! Every frame payload is preceded by a 2-byte length header:
//!
//! ```text
//! ┌──────────────────┬─────────────────────────┐
//! │ Length (2 bytes) │ Payload                 │
//! │ Big-endian u16   │ 768 × 2-byte pixels     │
//! └──────────────────┴─────────────────────────┘
//! ```
//!
//! The header caps a payload at 65535 bytes; this daemon always sends
//! 1536-byte payloads, so the bytes on the wire are `0x06 0x00` followed
//! by the encoded frame.
//!
//! Delivery is all-or-nothing from the reader's point of view: short
//! writes and `EINTR`-style interruptions are resumed until every byte of
//! the header and payload has been accepted, and any other write failure
//! aborts the stream with no way to emit a partial message afterwards.

use std::io::{self, Write};

use crate::error::{Error, Result};

/// Write one length-prefixed message and flush the sink.
pub fn write_frame<W: Write>(sink: &mut W, payload: &[u8]) -> Result<()> {
    let len =
        u16::try_from(payload.len()).map_err(|_| Error::OversizedPayload(payload.len()))?;
    write_fully(sink, &len.to_be_bytes())?;
    write_fully(sink, payload)?;
    sink.flush()?;
    Ok(())
}

/// Push every byte of `data` into the sink, resuming across interrupted
/// and short writes.
fn write_fully<W: Write>(sink: &mut W, data: &[u8]) -> Result<()> {
    let mut written = 0;
    while written < data.len() {
        match sink.write(&data[written..]) {
            Ok(0) => {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "sink accepted no bytes",
                )))
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
