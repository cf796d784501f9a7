use crate::domain::commands::{RegisterMember, UpdateMember};
use crate::domain::value_objects::{EmailAddress, MemberId};
use crate::domain::{self, Member};

use super::errors::{Result, ServiceError};
use super::paging::{Page, PageRequest};
use super::ServiceDependencies;

/// 会員を登録する
///
/// ビジネスルール：
/// - 氏名が空でなく、メールアドレスの形式が妥当であること
/// - メールアドレスが既存の会員と重複しないこと
pub async fn create_member(deps: &ServiceDependencies, cmd: RegisterMember) -> Result<Member> {
    tracing::debug!(name = %cmd.name, "Registering member");

    let member = domain::register_member(&cmd.name, &cmd.email)?;

    let existing = deps
        .member_store
        .get_by_email(&member.email)
        .await
        .map_err(ServiceError::store)?;
    if existing.is_some() {
        return Err(ServiceError::DuplicateEmail(member.email.to_string()));
    }

    deps.member_store
        .insert(member.clone())
        .await
        .map_err(ServiceError::store)?;

    Ok(member)
}

/// 会員を更新する（部分更新）
pub async fn update_member(
    deps: &ServiceDependencies,
    member_id: MemberId,
    cmd: UpdateMember,
) -> Result<Member> {
    let mut member = deps
        .member_store
        .get(member_id)
        .await
        .map_err(ServiceError::store)?
        .ok_or(ServiceError::MemberNotFound)?;

    if let Some(name) = cmd.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ServiceError::Validation("name must not be empty".to_string()));
        }
        member.name = name;
    }

    if let Some(raw_email) = cmd.email {
        let email = EmailAddress::parse(&raw_email)?;
        if email != member.email {
            let other = deps
                .member_store
                .get_by_email(&email)
                .await
                .map_err(ServiceError::store)?;
            if other.is_some() {
                return Err(ServiceError::DuplicateEmail(email.to_string()));
            }
            member.email = email;
        }
    }

    deps.member_store
        .update(member)
        .await
        .map_err(ServiceError::store)?
        .ok_or(ServiceError::MemberNotFound)
}

/// 会員を削除する
///
/// 貸出履歴は削除されない。以後の一覧では会員スナップショットが
/// 欠落したビューになる。
pub async fn delete_member(deps: &ServiceDependencies, member_id: MemberId) -> Result<()> {
    tracing::debug!(member_id = %member_id.value(), "Deleting member");

    let deleted = deps
        .member_store
        .delete(member_id)
        .await
        .map_err(ServiceError::store)?;
    if !deleted {
        return Err(ServiceError::MemberNotFound);
    }

    Ok(())
}

/// 会員一覧を取得する（フィルタなし）
pub async fn list_members(
    deps: &ServiceDependencies,
    request: PageRequest,
) -> Result<Page<Member>> {
    let (items, total) = deps
        .member_store
        .list(request.skip(), u64::from(request.size()))
        .await
        .map_err(ServiceError::store)?;

    Ok(Page::assemble(items, total, &request))
}
