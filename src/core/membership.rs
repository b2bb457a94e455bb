//! Member roll
//!
//! Holds every registered member by id and answers the fine report.

use crate::types::{LibraryError, Member, MemberId};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Registered members by id
#[derive(Debug, Default)]
pub struct MemberRoll {
    members: HashMap<MemberId, Member>,
}

impl MemberRoll {
    pub fn new() -> Self {
        MemberRoll {
            members: HashMap::new(),
        }
    }

    /// Register a member under its own id
    ///
    /// # Errors
    ///
    /// Returns `DuplicateMember` if the id is taken; the existing member
    /// (and any loans it holds) is left alone.
    pub fn insert(&mut self, member: Member) -> Result<MemberId, LibraryError> {
        let id = member.id();
        if self.members.contains_key(&id) {
            return Err(LibraryError::DuplicateMember { member: id });
        }
        self.members.insert(id, member);
        Ok(id)
    }

    pub fn get(&self, id: MemberId) -> Option<&Member> {
        self.members.get(&id)
    }

    pub fn get_mut(&mut self, id: MemberId) -> Option<&mut Member> {
        self.members.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Every member, sorted by id
    pub fn all(&self) -> Vec<&Member> {
        let mut members: Vec<&Member> = self.members.values().collect();
        members.sort_by_key(|member| member.id());
        members
    }

    /// Members owing a fine, largest balance first (ties by id)
    pub fn with_fines(&self) -> Vec<&Member> {
        let mut owing: Vec<&Member> = self
            .members
            .values()
            .filter(|member| member.fines() > Decimal::ZERO)
            .collect();
        owing.sort_by(|a, b| b.fines().cmp(&a.fines()).then(a.id().cmp(&b.id())));
        owing
    }
}
