use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Employee,
    Manager,
    Admin,
    Legal,
    Director,
    Finance,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Manager => "manager",
            Self::Admin => "admin",
            Self::Legal => "legal",
            Self::Director => "director",
            Self::Finance => "finance",
        }
    }

    /// Vietnamese label shown in account review panels.
    pub fn label_vi(&self) -> &'static str {
        match self {
            Self::Employee => "Nhân viên",
            Self::Manager => "Quản lý",
            Self::Admin => "Quản trị viên",
            Self::Legal => "Pháp chế",
            Self::Director => "Giám đốc",
            Self::Finance => "Tài chính",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Permissions {
    pub can_upload: bool,
    pub can_approve: bool,
    pub can_manage_users: bool,
    pub can_view_analytics: bool,
    pub can_sign: bool,
    pub can_approve_users: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    pub role: UserRole,
    #[serde(default)]
    pub permissions: Permissions,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Returns the first roster member holding `role`, in roster order.
pub fn first_with_role(roster: &[User], role: UserRole) -> Option<&User> {
    roster.iter().find(|user| user.role == role)
}

/// Looks a user up by id; identity is only used for lookup.
pub fn find_user<'a>(roster: &'a [User], id: &UserId) -> Option<&'a User> {
    roster.iter().find(|user| &user.id == id)
}

#[cfg(test)]
mod tests {
    use super::{first_with_role, Permissions, User, UserId, UserRole};

    fn user(id: &str, role: UserRole) -> User {
        User {
            id: UserId::from(id),
            name: id.to_owned(),
            role,
            permissions: Permissions::default(),
        }
    }

    #[test]
    fn first_with_role_follows_roster_order() {
        let roster = vec![
            user("u-legal", UserRole::Legal),
            user("u-mgr-2", UserRole::Manager),
            user("u-mgr-1", UserRole::Manager),
        ];

        let manager = first_with_role(&roster, UserRole::Manager).expect("manager present");
        assert_eq!(manager.id, UserId::from("u-mgr-2"));
        assert!(first_with_role(&roster, UserRole::Director).is_none());
    }

    #[test]
    fn missing_permissions_default_to_false() {
        let user: User = serde_json::from_str(r#"{"id":"u-1","role":"employee"}"#)
            .expect("user without permissions should parse");

        assert_eq!(user.permissions, Permissions::default());
        assert!(!user.permissions.can_upload);
        assert_eq!(user.role.label_vi(), "Nhân viên");
    }
}
