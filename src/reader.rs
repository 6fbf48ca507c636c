//! Positioned reads against the image file.
//!
//! No caching is performed: every call seeks and reads directly. Callers own the buffers they
//! receive.

use crate::error::Result;
use std::fs::File;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::mem;
use std::mem::size_of;
use std::slice;

/// Reads `len` bytes at absolute offset `off` from `file`.
pub fn read_at(file: &mut File, off: u64, len: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    file.seek(SeekFrom::Start(off))?;
    file.read_exact(&mut buf)?;
    Ok(buf)
}

/// Reads a packed, `Copy`-able record of type `T` at absolute offset `off`.
///
/// `T` is expected to be `#[repr(C, packed)]` with no padding, matching the on-disk layout
/// exactly (the same technique `mkfs`'s `BlockGroupDescriptor::read` uses).
pub fn read_struct<T: Copy>(file: &mut File, off: u64) -> Result<T> {
    let mut record: T = unsafe { mem::zeroed() };
    let slice = unsafe { slice::from_raw_parts_mut(&mut record as *mut T as *mut u8, size_of::<T>()) };
    file.seek(SeekFrom::Start(off))?;
    file.read_exact(slice)?;
    Ok(record)
}

/// Reads a whole block/sector of `size` bytes at absolute offset `off`, returning `None` instead
/// of an error if the read is short (used where the spec treats truncated regions as the end of
/// scanning rather than a hard failure).
pub fn try_read_block(file: &mut File, off: u64, size: usize) -> Option<Vec<u8>> {
    let mut buf = vec![0u8; size];
    file.seek(SeekFrom::Start(off)).ok()?;
    file.read_exact(&mut buf).ok()?;
    Some(buf)
}
