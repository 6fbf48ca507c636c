//! FAT16 filesystem support: boot sector decoding, identification and the directory engine.

pub mod boot_sector;
pub mod dir;

pub use boot_sector::BootSector;
