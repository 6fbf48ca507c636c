//! Formats a Unix timestamp the way the original tool's `format_time` helper did.
//!
//! No `chrono`/`time` dependency is pulled in for this: `libc` is already part of the
//! workspace's stack, so the formatting goes through `localtime_r`/`strftime` directly.

use std::ffi::CString;
use std::mem::MaybeUninit;
use std::os::raw::c_char;

/// `strftime` layout used throughout the metadata report: `Wed Jun 30 21:49:08 1993`.
const FORMAT: &str = "%a %b %d %H:%M:%S %Y";

/// Formats `epoch_secs` as a local-time human string.
pub fn format(epoch_secs: u32) -> String {
    let time: libc::time_t = epoch_secs as libc::time_t;

    let tm = unsafe {
        let mut tm = MaybeUninit::<libc::tm>::zeroed();
        libc::localtime_r(&time, tm.as_mut_ptr());
        tm.assume_init()
    };

    let fmt = CString::new(FORMAT).unwrap();
    let mut buf = [0u8; 64];
    let written = unsafe {
        libc::strftime(buf.as_mut_ptr() as *mut c_char, buf.len(), fmt.as_ptr(), &tm)
    };

    String::from_utf8_lossy(&buf[..written]).into_owned()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn formats_epoch_zero() {
        // 1970-01-01T00:00:00Z; the exact rendering depends on the local timezone, but the
        // year component must always be 1969 or 1970.
        let s = format(0);
        assert!(s.ends_with("1970") || s.ends_with("1969"));
    }

    #[test]
    fn non_empty_for_arbitrary_timestamp() {
        let s = format(1_700_000_000);
        assert!(!s.is_empty());
    }
}
