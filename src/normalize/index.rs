//! Block arena with id lookup.

use std::collections::HashMap;

use crate::model::{Block, BlockType};

/// Read-only index over one page's blocks.
///
/// Blocks stay in their original slice; the map points into it. Duplicate
/// ids are not expected; the last one wins.
pub struct BlockIndex<'a> {
    blocks: &'a [Block],
    by_id: HashMap<&'a str, usize>,
}

impl<'a> BlockIndex<'a> {
    /// Build the index.
    pub fn new(blocks: &'a [Block]) -> Self {
        let mut by_id = HashMap::with_capacity(blocks.len());
        for (i, block) in blocks.iter().enumerate() {
            if by_id.insert(block.id.as_str(), i).is_some() {
                log::warn!("duplicate block id {}, keeping the last one", block.id);
            }
        }
        Self { blocks, by_id }
    }

    /// Look up a block by id.
    pub fn get(&self, id: &str) -> Option<&'a Block> {
        self.by_id.get(id).map(|&i| &self.blocks[i])
    }

    /// All blocks in response order.
    pub fn blocks(&self) -> &'a [Block] {
        self.blocks
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the index holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks of one type, in response order.
    pub fn of_type(&self, block_type: BlockType) -> impl Iterator<Item = &'a Block> {
        self.blocks
            .iter()
            .filter(move |b| b.block_type == block_type)
    }

    /// Check if any block is a layout-analysis block.
    pub fn has_layout(&self) -> bool {
        self.blocks.iter().any(|b| b.block_type.is_layout())
    }

    /// Resolved CHILD blocks, one group per CHILD relationship.
    ///
    /// Dangling ids are skipped.
    pub fn child_groups(&self, block: &Block) -> Vec<Vec<&'a Block>> {
        block
            .child_id_groups()
            .map(|ids| self.resolve(block, ids))
            .collect()
    }

    /// Resolved CHILD blocks of all CHILD relationships, flattened.
    pub fn children(&self, block: &Block) -> Vec<&'a Block> {
        block
            .child_id_groups()
            .flat_map(|ids| self.resolve(block, ids))
            .collect()
    }

    fn resolve(&self, parent: &Block, ids: &[String]) -> Vec<&'a Block> {
        ids.iter()
            .filter_map(|id| {
                let child = self.get(id);
                if child.is_none() {
                    log::debug!("block {} references missing child {}", parent.id, id);
                }
                child
            })
            .collect()
    }
}
