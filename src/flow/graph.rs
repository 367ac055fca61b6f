use super::definition::BlockDefinition;
use ahash::AHashSet;

/// Picks the block traversal starts from.
///
/// That is the first block no other block connects to. A fully cyclic graph
/// falls back to the first block; an empty slice yields `None`.
pub fn find_entry_block(blocks: &[BlockDefinition]) -> Option<&BlockDefinition> {
    let targeted: AHashSet<&str> = blocks
        .iter()
        .flat_map(|block| {
            block
                .connections
                .iter()
                .filter(move |target| **target != block.id)
                .map(String::as_str)
        })
        .collect();

    blocks
        .iter()
        .find(|block| !targeted.contains(block.id.as_str()))
        .or_else(|| blocks.first())
}

pub fn find_block_by_id<'a>(
    blocks: &'a [BlockDefinition],
    id: &str,
) -> Option<&'a BlockDefinition> {
    blocks.iter().find(|block| block.id == id)
}
