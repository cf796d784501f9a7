use serde::Serialize;

use super::errors::RegisterMemberError;
use super::value_objects::{EmailAddress, MemberId};

/// Member集約 - 図書館の会員
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub member_id: MemberId,
    pub name: String,
    pub email: EmailAddress,
}

/// 純粋関数：会員を登録する
///
/// ビジネスルール：
/// - 氏名は空でない
/// - メールアドレスは形式が妥当であること
///
/// 副作用なし。新しいMemberを返す。
pub fn register_member(name: &str, email: &str) -> Result<Member, RegisterMemberError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RegisterMemberError::EmptyName);
    }

    Ok(Member {
        member_id: MemberId::new(),
        name: name.to_string(),
        email: EmailAddress::parse(email)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::EmailError;

    #[test]
    fn test_register_member_success() {
        let member = register_member("John Doe", "john.doe@example.com").unwrap();
        assert_eq!(member.name, "John Doe");
        assert_eq!(member.email.as_str(), "john.doe@example.com");
    }

    #[test]
    fn test_register_member_validation() {
        assert_eq!(
            register_member("  ", "a@b.com").unwrap_err(),
            RegisterMemberError::EmptyName
        );
        assert_eq!(
            register_member("John", "not-an-email").unwrap_err(),
            RegisterMemberError::InvalidEmail(EmailError::InvalidFormat)
        );
    }
}
