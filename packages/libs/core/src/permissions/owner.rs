//! 리소스 소유자
//!
//! 객체 단위 검사(`owner`, `owner_or_public`)가 리소스에서 읽는 유일한 정보입니다.

use crate::auth::User;

/// 소유자를 노출하는 리소스
pub trait HasOwner {
    /// 소유자 ID. 소유자가 없는(공개) 리소스는 `None`
    fn owner_id(&self) -> Option<&str>;
}

/// 사용자 리소스는 자기 자신이 소유자
impl HasOwner for User {
    fn owner_id(&self) -> Option<&str> {
        Some(&self.id)
    }
}

impl<T: HasOwner + ?Sized> HasOwner for &T {
    fn owner_id(&self) -> Option<&str> {
        (**self).owner_id()
    }
}
