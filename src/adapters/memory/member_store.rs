use crate::domain::member::Member;
use crate::domain::value_objects::{EmailAddress, MemberId};
use crate::ports::member_store::{MemberStore, Result};
use async_trait::async_trait;

use super::{paginate, MemoryLibrary};

#[async_trait]
impl MemberStore for MemoryLibrary {
    async fn insert(&self, member: Member) -> Result<()> {
        self.state().members.insert(member.member_id, member);
        Ok(())
    }

    async fn get(&self, member_id: MemberId) -> Result<Option<Member>> {
        Ok(self.state().members.get(&member_id).cloned())
    }

    async fn get_by_email(&self, email: &EmailAddress) -> Result<Option<Member>> {
        Ok(self
            .state()
            .members
            .values()
            .find(|m| &m.email == email)
            .cloned())
    }

    async fn update(&self, member: Member) -> Result<Option<Member>> {
        let mut state = self.state();
        if !state.members.contains_key(&member.member_id) {
            return Ok(None);
        }
        state.members.insert(member.member_id, member.clone());
        Ok(Some(member))
    }

    async fn delete(&self, member_id: MemberId) -> Result<bool> {
        Ok(self.state().members.remove(&member_id).is_some())
    }

    async fn list(&self, skip: u64, limit: u64) -> Result<(Vec<Member>, u64)> {
        let state = self.state();
        let mut members: Vec<Member> = state.members.values().cloned().collect();
        // ページングの安定性のために氏名（同名はメール）で整列する
        members.sort_by(|a, b| {
            (a.name.to_lowercase(), a.email.as_str()).cmp(&(b.name.to_lowercase(), b.email.as_str()))
        });

        let total = members.len() as u64;
        Ok((paginate(members, skip, limit), total))
    }
}
