//! CharacterData operations
//!
//! Offsets and counts are UTF-16 code units, as in the DOM. An offset that
//! lands inside a surrogate pair is rounded down to the start of the pair.

use crate::error::{DomError, DomResult};
use crate::node::NodeData;
use crate::tree::NodeStore;
use crate::NodeId;

/// Byte offset for a UTF-16 offset; `None` past the end
fn byte_offset(data: &str, offset: usize) -> Option<usize> {
    let mut units = 0;
    for (byte, ch) in data.char_indices() {
        let next = units + ch.len_utf16();
        if offset < next {
            return Some(byte);
        }
        units = next;
    }
    (offset == units).then_some(data.len())
}

fn utf16_len(data: &str) -> usize {
    data.chars().map(char::len_utf16).sum()
}

/// Resolve `(offset, count)` to a byte range, clamping the count
fn byte_range(data: &str, offset: usize, count: usize) -> DomResult<(usize, usize)> {
    let length = utf16_len(data);
    if offset > length {
        return Err(DomError::IndexSize { offset, length });
    }
    let end = offset.saturating_add(count).min(length);
    let start_byte = byte_offset(data, offset).unwrap_or(data.len());
    let end_byte = byte_offset(data, end).unwrap_or(data.len());
    Ok((start_byte, end_byte))
}

impl NodeStore {
    fn character_data(&self, id: NodeId) -> DomResult<&str> {
        self.data(id)
            .character_data()
            .ok_or(DomError::InvalidNodeType)
    }

    fn character_data_mut(&mut self, id: NodeId) -> DomResult<&mut String> {
        self.node_mut(id)
            .data
            .character_data_mut()
            .ok_or(DomError::InvalidNodeType)
    }

    /// `data` of a Text, Comment or ProcessingInstruction node
    pub fn character_data_of(&self, id: NodeId) -> Option<&str> {
        self.data(id).character_data()
    }

    /// Overwrite the data of a character data node
    pub fn set_data(&mut self, id: NodeId, data: &str) -> DomResult<()> {
        *self.character_data_mut(id)? = data.to_owned();
        Ok(())
    }

    /// Length in UTF-16 code units
    pub fn length(&self, id: NodeId) -> DomResult<usize> {
        Ok(utf16_len(self.character_data(id)?))
    }

    pub fn substring_data(&self, id: NodeId, offset: usize, count: usize) -> DomResult<String> {
        let data = self.character_data(id)?;
        let (start, end) = byte_range(data, offset, count)?;
        Ok(data[start..end].to_owned())
    }

    pub fn append_data(&mut self, id: NodeId, data: &str) -> DomResult<()> {
        self.character_data_mut(id)?.push_str(data);
        Ok(())
    }

    pub fn insert_data(&mut self, id: NodeId, offset: usize, data: &str) -> DomResult<()> {
        self.replace_data(id, offset, 0, data)
    }

    pub fn delete_data(&mut self, id: NodeId, offset: usize, count: usize) -> DomResult<()> {
        self.replace_data(id, offset, count, "")
    }

    /// Replace `count` units at `offset` with `data`
    pub fn replace_data(
        &mut self,
        id: NodeId,
        offset: usize,
        count: usize,
        data: &str,
    ) -> DomResult<()> {
        let current = self.character_data_mut(id)?;
        let (start, end) = byte_range(current, offset, count)?;
        current.replace_range(start..end, data);
        Ok(())
    }

    /// Split a Text node at `offset`
    ///
    /// The node keeps `[0, offset)`; the returned new Text node holds the
    /// rest and follows it when it has a parent.
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> DomResult<NodeId> {
        let NodeData::Text(data) = self.data(id) else {
            return Err(DomError::InvalidNodeType);
        };
        let length = utf16_len(data);
        if offset > length {
            return Err(DomError::IndexSize { offset, length });
        }
        let split = byte_offset(data, offset).unwrap_or(data.len());
        let tail = data[split..].to_owned();

        self.character_data_mut(id)?.truncate(split);
        let new = self.create_text_node(id, &tail);
        if let Some(parent) = self.parent(id) {
            let next = self.next_sibling(id);
            self.attach(parent, new, next);
        }
        Ok(new)
    }

    /// `textContent` getter
    ///
    /// Concatenated descendant text for elements and fragments, the data for
    /// character data nodes, `None` for documents and doctypes.
    pub fn text_content(&self, id: NodeId) -> Option<String> {
        match self.data(id) {
            NodeData::Element(_) | NodeData::DocumentFragment => Some(
                self.descendants(id)
                    .filter_map(|n| self.node(n).as_text())
                    .collect(),
            ),
            NodeData::Text(data) | NodeData::Comment(data) => Some(data.clone()),
            NodeData::ProcessingInstruction { data, .. } => Some(data.clone()),
            NodeData::Document | NodeData::Doctype { .. } => None,
        }
    }
}
