//! Bounded in-place data shifting.

use std::io::{Read, Seek, SeekFrom, Write};

use crate::Result;

/// Moves the bytes in `[start, end)` back by `distance` bytes.
///
/// Copies front to back through a scratch buffer of at most `max_buffer`
/// bytes, so the destination never overtakes unread source bytes. Returns
/// the number of bytes moved.
pub(crate) fn shift_back<S: Read + Write + Seek>(
    stream: &mut S,
    start: u64,
    end: u64,
    distance: u64,
    max_buffer: usize,
) -> Result<u64> {
    debug_assert!(distance <= start, "shift would move bytes before offset 0");
    let total = end.saturating_sub(start);
    if total == 0 || distance == 0 {
        return Ok(0);
    }

    let buf_len = total.min(max_buffer.max(1) as u64) as usize;
    let mut buf = vec![0u8; buf_len];
    let mut moved = 0u64;

    while moved < total {
        let n = (total - moved).min(buf_len as u64) as usize;
        let src = start + moved;
        stream.seek(SeekFrom::Start(src))?;
        stream.read_exact(&mut buf[..n])?;
        stream.seek(SeekFrom::Start(src - distance))?;
        stream.write_all(&buf[..n])?;
        moved += n as u64;
        log::trace!("Shifted {}/{} bytes back by {}", moved, total, distance);
    }

    Ok(moved)
}
