//! EXT2 filesystem support: superblock/inode decoding, block enumeration and the directory
//! engine (tree printing, name lookup, `cat`).

pub mod blocks;
pub mod dir;
pub mod inode;
pub mod superblock;

pub use superblock::Superblock;
