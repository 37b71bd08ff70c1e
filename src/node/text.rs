//! Editing the text payload of literals, variables and function names.

use tracing::{debug, instrument};

use crate::error::NodeError;
use super::{Formula, NodeId, NodeKind, NodeType, Variable};

/// Number text may be incomplete while the user is typing it, so only the character set is
/// checked here. Whether it is a well-formed number is part of [Formula::is_valid].
fn is_number_text(text: &str) -> bool {
    text.chars().all(|c| c.is_ascii_digit() || c == '.') && text.matches('.').count() <= 1
}

/// The byte offset of character `position`, allowing the position just past the end.
fn byte_offset(text: &str, position: usize) -> Option<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(core::iter::once(text.len()))
        .nth(position)
}

fn insert_at(text: &mut String, position: usize, c: char) -> Result<(), NodeError> {
    let offset = byte_offset(text, position).ok_or(NodeError::InvalidPosition(position))?;
    text.insert(offset, c);
    Ok(())
}

fn remove_at(text: &mut String, position: usize) -> Result<char, NodeError> {
    if position >= text.chars().count() {
        return Err(NodeError::InvalidPosition(position));
    }
    let offset = byte_offset(text, position).ok_or(NodeError::InvalidPosition(position))?;
    Ok(text.remove(offset))
}

impl Formula {
    #[instrument(level = "trace", skip(self))]
    pub fn set_number(&mut self, id: NodeId, text: &str) -> Result<(), NodeError> {
        self.expect_type(id, NodeType::Number)?;
        if !is_number_text(text) {
            debug!("rejected number text");
            return Err(NodeError::InvalidNumber(text.into()));
        }

        if let Some(NodeKind::Number(current)) = self.kind_mut(id) {
            *current = text.into();
        }
        Ok(())
    }

    #[instrument(level = "trace", skip(self))]
    pub fn set_variable(&mut self, id: NodeId, variable: Variable) -> Result<(), NodeError> {
        self.expect_type(id, NodeType::Variable)?;
        if let Some(NodeKind::Variable(current)) = self.kind_mut(id) {
            *current = variable;
        }
        Ok(())
    }

    #[instrument(level = "trace", skip(self))]
    pub fn set_function_name(&mut self, id: NodeId, name: &str) -> Result<(), NodeError> {
        self.expect_type(id, NodeType::Function)?;
        if let Some(NodeKind::Function(current)) = self.kind_mut(id) {
            *current = name.into();
        }
        Ok(())
    }

    /// The editable text of a node: number text, variable name followed by its subscript, or
    /// function name. `None` for every other kind of node.
    pub fn text(&self, id: NodeId) -> Option<String> {
        match self.kind(id)? {
            NodeKind::Number(text) | NodeKind::Function(text) => Some(text.clone()),
            NodeKind::Variable(v) => Some(format!("{}{}", v.name, v.subscript.as_deref().unwrap_or(""))),
            _ => None,
        }
    }

    /// Number of characters of [text](Formula::text).
    pub fn char_count(&self, id: NodeId) -> usize {
        match self.kind(id) {
            Some(NodeKind::Number(text) | NodeKind::Function(text)) => text.chars().count(),
            Some(NodeKind::Variable(v)) => v.char_count(),
            _ => 0,
        }
    }

    /// Inserts a character before character `position` of the node's text. For a variable with a
    /// subscript, positions past the end of the name address the subscript. Position `name_len`
    /// lies on the boundary and appends to the name; use
    /// [insert_subscript_char](Formula::insert_subscript_char) to type at the start of the
    /// subscript instead.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_char(&mut self, id: NodeId, position: usize, c: char) -> Result<(), NodeError> {
        let found = self.node_type(id).ok_or(NodeError::NotInTree)?;
        match self.kind_mut(id) {
            Some(NodeKind::Number(text)) => {
                let mut candidate = text.clone();
                insert_at(&mut candidate, position, c)?;
                if !is_number_text(&candidate) {
                    return Err(NodeError::InvalidNumber(candidate));
                }
                *text = candidate;
                Ok(())
            }
            Some(NodeKind::Function(name)) => insert_at(name, position, c),
            Some(NodeKind::Variable(v)) => {
                let name_len = v.name.chars().count();
                match &mut v.subscript {
                    Some(sub) if position > name_len => insert_at(sub, position - name_len, c),
                    _ => insert_at(&mut v.name, position, c),
                }
            }
            _ => Err(NodeError::WrongType { expected: NodeType::Number, found }),
        }
    }

    /// Inserts a character before character `position` of a variable's subscript, creating the
    /// subscript if the variable has none.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_subscript_char(&mut self, id: NodeId, position: usize, c: char) -> Result<(), NodeError> {
        self.expect_type(id, NodeType::Variable)?;
        let Some(NodeKind::Variable(v)) = self.kind_mut(id) else {
            return Err(NodeError::NotInTree);
        };

        let mut sub = v.subscript.clone().unwrap_or_default();
        insert_at(&mut sub, position, c)?;
        v.subscript = Some(sub);
        Ok(())
    }

    /// Removes character `position` of the node's text and returns it. A variable subscript which
    /// becomes empty is dropped.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_char(&mut self, id: NodeId, position: usize) -> Result<char, NodeError> {
        let found = self.node_type(id).ok_or(NodeError::NotInTree)?;
        match self.kind_mut(id) {
            Some(NodeKind::Number(text) | NodeKind::Function(text)) => remove_at(text, position),
            Some(NodeKind::Variable(v)) => {
                let name_len = v.name.chars().count();
                if position < name_len {
                    return remove_at(&mut v.name, position);
                }

                let sub = v.subscript.as_mut().ok_or(NodeError::InvalidPosition(position))?;
                let removed = remove_at(sub, position - name_len)?;
                if sub.is_empty() {
                    v.subscript = None;
                }
                Ok(removed)
            }
            _ => Err(NodeError::WrongType { expected: NodeType::Number, found }),
        }
    }
}
