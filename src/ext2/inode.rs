//! EXT2 block group descriptors and inodes.

use crate::ext2::superblock::Superblock;
use crate::error::Result;
use crate::reader;
use std::fs::File;

/// Direct block pointer count in [`Inode::block`].
pub const NDIR_BLOCKS: usize = 12;
/// Index of the single-indirect pointer.
pub const IND_BLOCK: usize = 12;
/// Index of the double-indirect pointer.
pub const DIND_BLOCK: usize = 13;
/// Index of the triple-indirect pointer.
pub const TIND_BLOCK: usize = 14;

/// File type mask in `mode`.
const S_IFMT: u16 = 0xf000;
/// Directory type bits.
const S_IFDIR: u16 = 0x4000;
/// Regular file type bits.
const S_IFREG: u16 = 0x8000;

/// Directory-entry `file_type` value meaning "directory".
pub const FT_DIR: u8 = 2;

/// A block group descriptor. Only `inode_table` is consulted; the remaining fields are unused
/// by this read-only inspector.
#[derive(Clone, Copy)]
#[repr(C, packed)]
pub struct GroupDesc {
    _unused: [u32; 2],
    pub inode_table: u32,
    _rest: [u8; 20],
}

impl GroupDesc {
    /// Reads the descriptor for block group `group` of `sb`.
    pub fn read(file: &mut File, sb: &Superblock, group: u32) -> Result<Self> {
        let table_block = sb.first_data_block as u64 + 1;
        let block_size = sb.block_size() as u64;
        let off = table_block * block_size + group as u64 * std::mem::size_of::<Self>() as u64;
        reader::read_struct(file, off)
    }
}

/// An EXT2 inode (the 128-byte classic revision 0 record). Extended fields some filesystems add
/// past byte 128 are not read — the inspector never consults them.
#[derive(Clone, Copy)]
#[repr(C, packed)]
pub struct Inode {
    pub mode: u16,
    pub uid: u16,
    pub size: u32,
    pub atime: u32,
    pub ctime: u32,
    pub mtime: u32,
    pub dtime: u32,
    pub gid: u16,
    pub links_count: u16,
    pub blocks: u32,
    pub flags: u32,
    _osd1: u32,
    pub block: [u32; 15],
    pub generation: u32,
    pub file_acl: u32,
    pub dir_acl: u32,
    pub faddr: u32,
    _osd2: [u8; 12],
}

impl Inode {
    /// Reads inode number `num` (1-based) using `sb`'s geometry.
    pub fn read(file: &mut File, sb: &Superblock, num: u32) -> Result<Self> {
        let index = num - 1;
        let group = index / sb.inodes_per_group;
        let local = index % sb.inodes_per_group;

        let gd = GroupDesc::read(file, sb, group)?;
        let off = gd.inode_table as u64 * sb.block_size() as u64
            + local as u64 * sb.inode_size as u64;
        reader::read_struct(file, off)
    }

    /// Tells whether this inode describes a directory.
    pub fn is_dir(&self) -> bool {
        self.mode & S_IFMT == S_IFDIR
    }

    /// Tells whether this inode describes a regular file.
    pub fn is_reg(&self) -> bool {
        self.mode & S_IFMT == S_IFREG
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn group_desc_is_32_bytes() {
        assert_eq!(size_of::<GroupDesc>(), 32);
    }

    #[test]
    fn inode_is_128_bytes() {
        assert_eq!(size_of::<Inode>(), 128);
    }

    #[test]
    fn mode_classification() {
        let mut inode: Inode = unsafe { std::mem::zeroed() };
        inode.mode = S_IFDIR | 0o755;
        assert!(inode.is_dir());
        assert!(!inode.is_reg());

        inode.mode = S_IFREG | 0o644;
        assert!(inode.is_reg());
        assert!(!inode.is_dir());
    }
}
