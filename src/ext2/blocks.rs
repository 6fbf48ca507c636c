//! Enumerates the data blocks of an EXT2 inode across direct and indirect pointer trees.

use crate::error::Result;
use crate::ext2::inode::DIND_BLOCK;
use crate::ext2::inode::IND_BLOCK;
use crate::ext2::inode::Inode;
use crate::ext2::inode::NDIR_BLOCKS;
use crate::ext2::inode::TIND_BLOCK;
use crate::ext2::superblock::Superblock;
use crate::reader;
use std::fs::File;
use std::io::Write;

/// Reads one level of indirection as a list of 32-bit pointers. A zero block number (an absent
/// indirect block) reads as all-zero pointers rather than erroring.
fn read_ptrs(file: &mut File, sb: &Superblock, block: u32) -> Result<Vec<u32>> {
    let block_size = sb.block_size() as usize;
    let ptrs = block_size / 4;
    if block == 0 {
        return Ok(vec![0; ptrs]);
    }
    let buf = reader::read_at(file, block as u64 * block_size as u64, block_size)?;
    Ok(buf.chunks_exact(4).map(|c| u32::from_le_bytes(c.try_into().unwrap())).collect())
}

/// Recursively walks an indirect pointer tree, appending every nonzero leaf block to `out`. A
/// zero entry at any level is skipped (not a terminator), and a zero root skips the whole
/// subtree.
fn expand_indirect(file: &mut File, sb: &Superblock, block: u32, level: u32, out: &mut Vec<u32>) -> Result<()> {
    if block == 0 {
        return Ok(());
    }
    let ptrs = read_ptrs(file, sb, block)?;
    for ptr in ptrs {
        if ptr == 0 {
            continue;
        }
        if level == 1 {
            out.push(ptr);
        } else {
            expand_indirect(file, sb, ptr, level - 1, out)?;
        }
    }
    Ok(())
}

/// Returns the data blocks of a directory inode, in the order the directory engine must scan
/// them: direct blocks (stopping at the first zero pointer), then single, double and triple
/// indirect trees.
pub fn dir_blocks(file: &mut File, sb: &Superblock, inode: &Inode) -> Result<Vec<u32>> {
    let mut out = Vec::new();

    for i in 0..NDIR_BLOCKS {
        let blk = inode.block[i];
        if blk == 0 {
            break;
        }
        out.push(blk);
    }

    for (level, idx) in [(1, IND_BLOCK), (2, DIND_BLOCK), (3, TIND_BLOCK)] {
        let iblk = inode.block[idx];
        if iblk == 0 {
            continue;
        }
        expand_indirect(file, sb, iblk, level, &mut out)?;
    }

    Ok(out)
}

/// Resolves the physical block number backing logical block `logical` of a file's data, walking
/// into indirect trees as needed. A zero pointer (a sparse hole) is returned as `0`.
fn file_block(file: &mut File, sb: &Superblock, inode: &Inode, logical: usize) -> Result<u32> {
    if logical < NDIR_BLOCKS {
        return Ok(inode.block[logical]);
    }
    let ptrs = (sb.block_size() / 4) as usize;
    let logical = logical - NDIR_BLOCKS;

    if logical < ptrs {
        let l1 = read_ptrs(file, sb, inode.block[IND_BLOCK])?;
        return Ok(l1[logical]);
    }
    let logical = logical - ptrs;

    if logical < ptrs * ptrs {
        let outer = logical / ptrs;
        let inner = logical % ptrs;
        let l1 = read_ptrs(file, sb, inode.block[DIND_BLOCK])?;
        let l2 = read_ptrs(file, sb, l1[outer])?;
        return Ok(l2[inner]);
    }
    let logical = logical - ptrs * ptrs;
    let outer1 = logical / (ptrs * ptrs);
    let rem = logical % (ptrs * ptrs);
    let outer2 = rem / ptrs;
    let inner = rem % ptrs;
    let l1 = read_ptrs(file, sb, inode.block[TIND_BLOCK])?;
    let l2 = read_ptrs(file, sb, l1[outer1])?;
    let l3 = read_ptrs(file, sb, l2[outer2])?;
    Ok(l3[inner])
}

/// Streams a regular file's contents to `out`, honoring sparse holes (a zero pointer contributes
/// `block_size` zero bytes rather than truncating the stream).
pub fn stream_file<W: Write>(file: &mut File, sb: &Superblock, inode: &Inode, out: &mut W) -> Result<()> {
    let block_size = sb.block_size() as u64;
    let mut remaining = inode.size as u64;
    let mut logical = 0usize;

    while remaining > 0 {
        let phys = file_block(file, sb, inode, logical)?;
        let to_read = remaining.min(block_size) as usize;

        if phys == 0 {
            out.write_all(&vec![0u8; to_read])?;
        } else {
            let buf = reader::read_at(file, phys as u64 * block_size, to_read)?;
            out.write_all(&buf)?;
        }

        remaining -= to_read as u64;
        logical += 1;
    }

    Ok(())
}
