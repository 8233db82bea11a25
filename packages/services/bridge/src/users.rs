//! 사용자 디렉터리
//!
//! YAML 파일로 시드되는 메모리 사용자 저장소입니다. 토큰 subject 조회(`IdentityLookup`)와
//! 로그인 비밀번호 확인(`PasswordCheck`)을 담당합니다. 비밀번호는 Argon2 PHC 해시로만 저장합니다.
//!
//! ```yaml
//! users:
//!   - id: u1
//!     username: alice
//!     password_hash: "$argon2id$v=19$..."
//!     roles: [admin]
//! ```

use std::collections::HashMap;
use std::path::Path;

use argon2::password_hash::{PasswordHash, PasswordVerifier};
use argon2::Argon2;
use gk_core::auth::{Credentials, IdentityLookup, PasswordCheck, User};
use serde::Deserialize;

/// 사용자 레코드
#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl UserRecord {
    pub fn to_user(&self) -> User {
        User::new(&self.id)
            .with_username(&self.username)
            .with_roles(self.roles.iter().cloned())
    }
}

#[derive(Debug, Default, Deserialize)]
struct UsersFile {
    #[serde(default)]
    users: Vec<UserRecord>,
}

/// 메모리 사용자 저장소
#[derive(Debug, Default)]
pub struct UserDirectory {
    by_id: HashMap<String, UserRecord>,
    /// username → id
    by_username: HashMap<String, String>,
    /// 없는 username에도 같은 비용의 검증을 수행하기 위한 해시
    decoy_hash: Option<String>,
}

impl UserDirectory {
    pub fn new(records: Vec<UserRecord>) -> anyhow::Result<Self> {
        let mut directory = Self::default();
        for record in records {
            if directory.by_id.contains_key(&record.id) {
                anyhow::bail!("duplicate user id: {}", record.id);
            }
            if directory.by_username.contains_key(&record.username) {
                anyhow::bail!("duplicate username: {}", record.username);
            }
            PasswordHash::new(&record.password_hash).map_err(|e| {
                anyhow::anyhow!("invalid password hash for {}: {}", record.username, e)
            })?;
            if directory.decoy_hash.is_none() {
                directory.decoy_hash = Some(record.password_hash.clone());
            }

            directory
                .by_username
                .insert(record.username.clone(), record.id.clone());
            directory.by_id.insert(record.id.clone(), record);
        }
        Ok(directory)
    }

    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        let file: UsersFile = serde_yaml::from_str(yaml)?;
        Self::new(file.users)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
        Self::from_yaml(&content)
    }

    pub fn get(&self, id: &str) -> Option<User> {
        self.by_id.get(id).map(UserRecord::to_user)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl IdentityLookup for UserDirectory {
    fn by_id(&self, subject: &str) -> gk_core::Result<Option<User>> {
        Ok(self.get(subject))
    }
}

impl PasswordCheck for UserDirectory {
    fn check(&self, credentials: &Credentials) -> gk_core::Result<Option<String>> {
        let record = self
            .by_username
            .get(&credentials.username)
            .and_then(|id| self.by_id.get(id));

        let Some(record) = record else {
            // 없는 username도 같은 비용으로 검증 (결과는 버림)
            if let Some(decoy) = &self.decoy_hash {
                let _ = verify_password(decoy, &credentials.password);
            }
            return Ok(None);
        };

        Ok(verify_password(&record.password_hash, &credentials.password).then(|| record.id.clone()))
    }
}

fn verify_password(hash: &str, password: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
