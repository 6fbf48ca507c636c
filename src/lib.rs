//! Read-only inspector for EXT2 and FAT16 filesystem images.
//!
//! [`Image`] probes a file to determine which format it holds, then dispatches `info`/`tree`/
//! `cat` to the matching engine in [`ext2`] or [`fat16`].

pub mod error;
pub mod ext2;
pub mod fat16;
pub mod reader;
pub mod time_fmt;

use error::Error;
use error::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// An opened filesystem image, tagged with the format it was probed as.
pub enum Image {
    Ext2(File, ext2::Superblock),
    Fat16(File, fat16::BootSector),
}

impl Image {
    /// Opens `path` and probes it as EXT2, then FAT16. Neither matching is a
    /// [`Error::Format`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;

        if ext2::superblock::probe(&mut file) {
            let sb = ext2::Superblock::read(&mut file)?;
            return Ok(Self::Ext2(file, sb));
        }

        if fat16::boot_sector::probe(&mut file) {
            let bs = fat16::BootSector::read(&mut file)?;
            return Ok(Self::Fat16(file, bs));
        }

        Err(Error::Format("not a supported filesystem image".to_owned()))
    }

    /// Renders the fixed metadata report for this image.
    pub fn info(&mut self) -> String {
        match self {
            Self::Ext2(_, sb) => ext2::superblock::format_metadata(sb),
            Self::Fat16(_, bs) => fat16::boot_sector::format_metadata(bs),
        }
    }

    /// Renders the full directory tree of this image.
    pub fn tree(&mut self) -> Result<String> {
        match self {
            Self::Ext2(file, sb) => ext2::dir::tree(file, sb),
            Self::Fat16(file, bs) => fat16::dir::tree(file, bs),
        }
    }

    /// Resolves `target` to a regular file and streams its contents to `out`.
    pub fn cat(&mut self, target: &str, out: &mut impl Write) -> Result<()> {
        match self {
            Self::Ext2(file, sb) => ext2::dir::cat(file, sb, target, out),
            Self::Fat16(file, bs) => fat16::dir::cat(file, bs, target, out),
        }
    }

    /// Tells whether this image was probed as EXT2 (as opposed to FAT16).
    pub fn is_ext2(&self) -> bool {
        matches!(self, Self::Ext2(..))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write as _;
    use std::mem::size_of;

    fn ext2_image_bytes(block_size: u32, volume_name: &str) -> Vec<u8> {
        let mut bytes = vec![0u8; 4096];

        let mut sb: ext2::superblock::Superblock = unsafe { std::mem::zeroed() };
        sb.magic = ext2::superblock::EXT2_MAGIC;
        sb.log_block_size = match block_size {
            1024 => 0,
            2048 => 1,
            4096 => 2,
            _ => 0,
        };
        sb.inodes_per_group = 32;
        sb.first_data_block = 1;
        let name_bytes = volume_name.as_bytes();
        sb.volume_name[..name_bytes.len()].copy_from_slice(name_bytes);

        let raw = unsafe {
            std::slice::from_raw_parts(&sb as *const _ as *const u8, size_of::<ext2::superblock::Superblock>())
        };
        bytes[1024..1024 + raw.len()].copy_from_slice(raw);
        bytes
    }

    #[test]
    fn opens_as_ext2_and_reports_block_size_and_label() {
        let dir = std::env::temp_dir();
        let path = dir.join("fsinspect_test_image_ext2.img");
        let bytes = ext2_image_bytes(1024, "TESTVOL");
        std::fs::write(&path, &bytes).unwrap();

        let mut image = Image::open(&path).unwrap();
        assert!(image.is_ext2());
        let report = image.info();
        assert!(report.contains("Block Size.......: 1024"));
        assert!(report.contains("Volume Name......: TESTVOL"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn rejects_unrecognized_image() {
        let dir = std::env::temp_dir();
        let path = dir.join("fsinspect_test_image_garbage.img");
        std::fs::write(&path, vec![0u8; 4096]).unwrap();

        let err = Image::open(&path).unwrap_err();
        assert!(matches!(err, Error::Format(_)));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn cat_on_missing_file_is_not_found() {
        let dir = std::env::temp_dir();
        let path = dir.join("fsinspect_test_image_ext2_cat.img");
        let bytes = ext2_image_bytes(1024, "X");
        std::fs::write(&path, &bytes).unwrap();

        let mut image = Image::open(&path).unwrap();
        let mut out = Vec::new();
        let err = image.cat("missing.txt", &mut out).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let _ = std::fs::remove_file(&path);
    }
}
