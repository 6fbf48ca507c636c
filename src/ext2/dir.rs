//! EXT2 directory entry parsing, tree printing, name lookup and path resolution.

use crate::error::Error;
use crate::error::Result;
use crate::ext2::blocks;
use crate::ext2::blocks::dir_blocks;
use crate::ext2::inode::FT_DIR;
use crate::ext2::inode::Inode;
use crate::ext2::inode::NDIR_BLOCKS;
use crate::ext2::superblock::ROOT_INODE;
use crate::ext2::superblock::Superblock;
use crate::reader;
use std::fs::File;
use std::io::Write;

/// One parsed directory entry.
struct RawEntry {
    inode: u32,
    file_type: u8,
    name: Vec<u8>,
    /// Whether this entry is the last one in its containing block (used to pick the tree
    /// branch glyph).
    is_last: bool,
}

/// Parses every entry out of one directory block, skipping unused (zero-inode) slots.
///
/// Stops at the first malformed record (`rec_len == 0` or an entry that would run past the end
/// of the block) rather than erroring — a malformed directory block yields a truncated listing.
fn entries_in_block(buf: &[u8]) -> Vec<RawEntry> {
    let block_size = buf.len();
    let mut out = Vec::new();
    let mut off = 0usize;

    while off + 8 <= block_size {
        let inode = u32::from_le_bytes(buf[off..off + 4].try_into().unwrap());
        let rec_len = u16::from_le_bytes(buf[off + 4..off + 6].try_into().unwrap()) as usize;
        let name_len = (buf[off + 6] as usize).min(255);
        let file_type = buf[off + 7];

        if rec_len == 0 || off + rec_len > block_size {
            break;
        }

        let name_start = off + 8;
        let name_end = (name_start + name_len).min(block_size);
        let is_last = off + rec_len >= block_size;

        if inode != 0 {
            out.push(RawEntry {
                inode,
                file_type,
                name: buf[name_start..name_end].to_vec(),
                is_last,
            });
        }

        off += rec_len;
    }

    out
}

fn read_block(file: &mut File, sb: &Superblock, block: u32) -> Option<Vec<u8>> {
    reader::try_read_block(file, block as u64 * sb.block_size() as u64, sb.block_size() as usize)
}

/// Scans every data block of `inode` (direct then indirect) and returns the first entry whose
/// name equals `target`.
fn find_in_dir(file: &mut File, sb: &Superblock, inode: &Inode, target: &[u8]) -> Result<Option<u32>> {
    for block in dir_blocks(file, sb, inode)? {
        let Some(buf) = read_block(file, sb, block) else {
            continue;
        };
        for e in entries_in_block(&buf) {
            if e.name == target {
                return Ok(Some(e.inode));
            }
        }
    }
    Ok(None)
}

/// Resolves a `/`-separated path from the root directory to a regular file's inode number.
pub fn find_by_path(file: &mut File, sb: &Superblock, path: &str) -> Result<u32> {
    let mut inode_num = ROOT_INODE;
    let mut inode = Inode::read(file, sb, inode_num)?;

    for component in path.split('/').filter(|c| !c.is_empty()) {
        match find_in_dir(file, sb, &inode, component.as_bytes())? {
            Some(next) => {
                inode_num = next;
                inode = Inode::read(file, sb, inode_num)?;
            }
            None => return Err(Error::NotFound(path.to_owned())),
        }
    }

    if inode.is_reg() {
        Ok(inode_num)
    } else {
        Err(Error::NotFound(path.to_owned()))
    }
}

/// Depth-first search for `target` among `inode`'s entries and, failing that, its
/// direct-block-referenced subdirectories. Used for bare filenames (no `/`).
fn search_dir(file: &mut File, sb: &Superblock, inode: &Inode, target: &[u8]) -> Result<Option<u32>> {
    if let Some(found) = find_in_dir(file, sb, inode, target)? {
        return Ok(Some(found));
    }

    for i in 0..NDIR_BLOCKS {
        let blk = inode.block[i];
        if blk == 0 {
            break;
        }
        let Some(buf) = read_block(file, sb, blk) else {
            continue;
        };
        for e in entries_in_block(&buf) {
            if e.file_type != FT_DIR || e.name == b"." || e.name == b".." {
                continue;
            }
            let Ok(sub) = Inode::read(file, sb, e.inode) else {
                continue;
            };
            if let Some(found) = search_dir(file, sb, &sub, target)? {
                return Ok(Some(found));
            }
        }
    }

    Ok(None)
}

/// Prints the directory tree rooted at `inode`'s entries, recursing into subdirectories.
fn tree_subdir(file: &mut File, sb: &Superblock, inode: &Inode, prefix: &str, out: &mut String) -> Result<()> {
    for block in dir_blocks(file, sb, inode)? {
        let Some(buf) = read_block(file, sb, block) else {
            continue;
        };

        for e in entries_in_block(&buf) {
            if e.name == b"." || e.name == b".." {
                continue;
            }

            let name = String::from_utf8_lossy(&e.name);
            let glyph = if e.is_last { "└── " } else { "├── " };
            out.push_str(prefix);
            out.push_str(glyph);
            out.push_str(&name);
            out.push('\n');

            let sub = Inode::read(file, sb, e.inode).ok();
            let is_dir = e.file_type == FT_DIR || sub.as_ref().map(Inode::is_dir).unwrap_or(false);
            if is_dir {
                if let Some(sub) = sub {
                    let child_prefix = format!("{prefix}{}", if e.is_last { "    " } else { "│   " });
                    tree_subdir(file, sb, &sub, &child_prefix, out)?;
                }
            }
        }
    }
    Ok(())
}

/// Renders the full directory tree of an EXT2 image as text.
pub fn tree(file: &mut File, sb: &Superblock) -> Result<String> {
    let root = Inode::read(file, sb, ROOT_INODE)?;
    let mut out = String::from(".\n");
    tree_subdir(file, sb, &root, "", &mut out)?;
    Ok(out)
}

/// Resolves `target` (a bare filename or a `/`-separated path) to a regular file and streams its
/// contents to `out`.
pub fn cat(file: &mut File, sb: &Superblock, target: &str, out: &mut impl Write) -> Result<()> {
    let inode_num = if target.contains('/') {
        find_by_path(file, sb, target)?
    } else {
        let root = Inode::read(file, sb, ROOT_INODE)?;
        search_dir(file, sb, &root, target.as_bytes())?.ok_or_else(|| Error::NotFound(target.to_owned()))?
    };

    let inode = Inode::read(file, sb, inode_num)?;
    blocks::stream_file(file, sb, &inode, out)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_well_formed_block() {
        let block_size = 1024usize;
        let mut buf = vec![0u8; block_size];

        // "." entry
        buf[0..4].copy_from_slice(&2u32.to_le_bytes());
        buf[4..6].copy_from_slice(&12u16.to_le_bytes());
        buf[6] = 1;
        buf[7] = FT_DIR;
        buf[8] = b'.';

        // ".." entry takes the rest of the block
        let rec2 = (block_size - 12) as u16;
        buf[12..16].copy_from_slice(&2u32.to_le_bytes());
        buf[16..18].copy_from_slice(&rec2.to_le_bytes());
        buf[18] = 2;
        buf[19] = FT_DIR;
        buf[20] = b'.';
        buf[21] = b'.';

        let entries = entries_in_block(&buf);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, b".");
        assert!(!entries[0].is_last);
        assert_eq!(entries[1].name, b"..");
        assert!(entries[1].is_last);
    }

    #[test]
    fn stops_on_zero_rec_len() {
        let buf = vec![0u8; 64];
        assert!(entries_in_block(&buf).is_empty());
    }
}
