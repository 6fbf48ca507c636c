//! EXT2 superblock decoding.

use crate::error::Result;
use crate::reader;
use std::fs::File;

/// Absolute byte offset of the superblock.
pub const SUPERBLOCK_OFFSET: u64 = 1024;
/// Expected value of `magic`.
pub const EXT2_MAGIC: u16 = 0xef53;
/// The filesystem's root directory inode.
pub const ROOT_INODE: u32 = 2;

/// The EXT2 superblock, decoded from the 1024-byte record at [`SUPERBLOCK_OFFSET`].
///
/// Only the fields the core engine consults are named individually; the remainder of the
/// on-disk record is folded into `_reserved` to keep the struct's size exact.
#[derive(Clone, Copy)]
#[repr(C, packed)]
pub struct Superblock {
    pub inodes_count: u32,
    pub blocks_count: u32,
    pub r_blocks_count: u32,
    pub free_blocks_count: u32,
    pub free_inodes_count: u32,
    pub first_data_block: u32,
    pub log_block_size: u32,
    pub log_frag_size: u32,
    pub blocks_per_group: u32,
    pub frags_per_group: u32,
    pub inodes_per_group: u32,
    pub mtime: u32,
    pub wtime: u32,
    pub mnt_count: u16,
    pub max_mnt_count: u16,
    pub magic: u16,
    pub state: u16,
    pub errors: u16,
    pub minor_rev_level: u16,
    pub lastcheck: u32,
    pub checkinterval: u32,
    pub creator_os: u32,
    pub rev_level: u32,
    pub def_resuid: u16,
    pub def_resgid: u16,

    pub first_ino: u32,
    pub inode_size: u16,
    pub block_group_nr: u16,
    pub feature_compat: u32,
    pub feature_incompat: u32,
    pub feature_ro_compat: u32,
    pub uuid: [u8; 16],
    pub volume_name: [u8; 16],
    pub last_mounted: [u8; 64],
    pub algo_bitmap: u32,

    pub prealloc_blocks: u8,
    pub prealloc_dir_blocks: u8,
    pub _padding1: u16,

    pub journal_uuid: [u8; 16],
    pub journal_inum: u32,
    pub journal_dev: u32,
    pub last_orphan: u32,
    pub hash_seed: [u32; 4],
    pub def_hash_version: u8,
    pub reserved_char_pad: u8,
    pub reserved_word_pad: u16,
    pub default_mount_options: u32,
    pub first_meta_bg: u32,

    _reserved: [u32; 190],
}

impl Superblock {
    /// Reads the superblock from `file`.
    pub fn read(file: &mut File) -> Result<Self> {
        reader::read_struct(file, SUPERBLOCK_OFFSET)
    }

    /// Returns the block size in bytes, derived from `log_block_size`.
    pub fn block_size(&self) -> u32 {
        1024 << self.log_block_size
    }

    /// Returns the volume label, trimmed of trailing NUL bytes.
    pub fn volume_name(&self) -> String {
        let end = self.volume_name.iter().position(|&b| b == 0).unwrap_or(self.volume_name.len());
        String::from_utf8_lossy(&self.volume_name[..end]).into_owned()
    }
}

/// Reports whether `path` starts with an EXT2 superblock.
pub fn probe(file: &mut File) -> bool {
    Superblock::read(file).map(|sb| sb.magic == EXT2_MAGIC).unwrap_or(false)
}

/// Renders the fixed metadata report for an EXT2 image.
pub fn format_metadata(sb: &Superblock) -> String {
    let inode_size = sb.inode_size;
    let inodes_count = sb.inodes_count;
    let first_ino = sb.first_ino;
    let inodes_per_group = sb.inodes_per_group;
    let free_inodes_count = sb.free_inodes_count;
    let block_size = sb.block_size();
    let r_blocks_count = sb.r_blocks_count;
    let free_blocks_count = sb.free_blocks_count;
    let blocks_count = sb.blocks_count;
    let first_data_block = sb.first_data_block;
    let blocks_per_group = sb.blocks_per_group;
    let feature_compat = sb.feature_compat;
    let lastcheck = sb.lastcheck;
    let mtime = sb.mtime;
    let wtime = sb.wtime;

    let mut out = String::new();
    out.push_str("\n------ Filesystem Information ------\n");
    out.push_str("\nFilesystem: EXT2\n");

    out.push_str("\nINODE INFO\n");
    out.push_str(&format!("  Size.............: {inode_size}\n"));
    out.push_str(&format!("  Num Inodes.......: {inodes_count}\n"));
    out.push_str(&format!("  First Inode......: {first_ino}\n"));
    out.push_str(&format!("  Inodes per Group.: {inodes_per_group}\n"));
    out.push_str(&format!("  Free Inodes......: {free_inodes_count}\n"));

    out.push_str("\nBLOCK INFO\n");
    out.push_str(&format!("  Block Size.......: {block_size}\n"));
    out.push_str(&format!("  Reserved Blocks..: {r_blocks_count}\n"));
    out.push_str(&format!("  Free Blocks......: {free_blocks_count}\n"));
    out.push_str(&format!("  Total Blocks.....: {blocks_count}\n"));
    out.push_str(&format!("  First Block......: {first_data_block}\n"));
    out.push_str(&format!("  Blocks per Group.: {blocks_per_group}\n"));
    out.push_str(&format!("  Group Flags......: {feature_compat}\n"));

    out.push_str("\nVOLUME INFO\n");
    out.push_str(&format!("  Volume Name......: {}\n", sb.volume_name()));
    out.push_str(&format!("  Last Checked.....: {}\n", crate::time_fmt::format(lastcheck)));
    out.push_str(&format!("  Last Mounted.....: {}\n", crate::time_fmt::format(mtime)));
    out.push_str(&format!("  Last Written.....: {}\n\n", crate::time_fmt::format(wtime)));
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn superblock_size_is_1024_bytes() {
        assert_eq!(size_of::<Superblock>(), 1024);
    }

    #[test]
    fn block_size_derivation() {
        let mut sb: Superblock = unsafe { std::mem::zeroed() };
        sb.log_block_size = 0;
        assert_eq!(sb.block_size(), 1024);
        sb.log_block_size = 2;
        assert_eq!(sb.block_size(), 4096);
    }
}
