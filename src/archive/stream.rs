//! Stream capabilities required by mutating operations.

use std::fs::File;
use std::io::{self, Cursor};

/// A stream whose length can be set explicitly.
///
/// Every structural change ends by cutting the stream off right after the
/// entry table, so mutating operations need this on top of
/// `Read + Write + Seek`.
pub trait Truncate {
    /// Sets the stream length to `len` bytes, zero-extending if it grows.
    fn truncate(&mut self, len: u64) -> io::Result<()>;
}

impl Truncate for File {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

fn resize_vec(buf: &mut Vec<u8>, len: u64) -> io::Result<()> {
    let len = usize::try_from(len)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "length exceeds usize"))?;
    buf.resize(len, 0);
    Ok(())
}

impl Truncate for Cursor<Vec<u8>> {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        resize_vec(self.get_mut(), len)
    }
}

impl Truncate for Cursor<&mut Vec<u8>> {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        resize_vec(self.get_mut(), len)
    }
}

impl<T: Truncate + ?Sized> Truncate for &mut T {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        (**self).truncate(len)
    }
}

impl<T: Truncate + ?Sized> Truncate for Box<T> {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        (**self).truncate(len)
    }
}
