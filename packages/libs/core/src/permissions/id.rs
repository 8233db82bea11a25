//! 권한 ID
//!
//! 보호되는 작업마다 하나씩 존재하는 닫힌 태그 집합입니다.
//! 새 작업은 런타임 등록이 아니라 variant 추가로 표현합니다.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 보호되는 작업
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionId {
    UserCreate,
    UserList,
    UserDetail,
    UserUpdate,
    UserDelete,
    CommentCreate,
    CommentList,
    CommentDetail,
    CommentUpdate,
    CommentDelete,
}

impl PermissionId {
    pub const ALL: [PermissionId; 10] = [
        PermissionId::UserCreate,
        PermissionId::UserList,
        PermissionId::UserDetail,
        PermissionId::UserUpdate,
        PermissionId::UserDelete,
        PermissionId::CommentCreate,
        PermissionId::CommentList,
        PermissionId::CommentDetail,
        PermissionId::CommentUpdate,
        PermissionId::CommentDelete,
    ];

    /// 문자열로 변환
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionId::UserCreate => "user_create",
            PermissionId::UserList => "user_list",
            PermissionId::UserDetail => "user_detail",
            PermissionId::UserUpdate => "user_update",
            PermissionId::UserDelete => "user_delete",
            PermissionId::CommentCreate => "comment_create",
            PermissionId::CommentList => "comment_list",
            PermissionId::CommentDetail => "comment_detail",
            PermissionId::CommentUpdate => "comment_update",
            PermissionId::CommentDelete => "comment_delete",
        }
    }
}

impl fmt::Display for PermissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PermissionId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| Error::InvalidConfig {
                message: format!("unknown permission id: {}", s),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip_through_from_str() {
        for id in PermissionId::ALL {
            assert_eq!(id.as_str().parse::<PermissionId>().unwrap(), id);
        }
    }

    #[test]
    fn test_serde_tag_matches_as_str() {
        let json = serde_json::to_string(&PermissionId::CommentUpdate).unwrap();
        assert_eq!(json, "\"comment_update\"");
    }

    #[test]
    fn test_unknown_tag() {
        assert!("user_explode".parse::<PermissionId>().is_err());
    }
}
