use crate::types::db::{group_extension, user};

/// The three elevated-access flags a group extension grants and a user carries
///
/// On a user these are a cached projection of the user's groups: the logical OR
/// of every extension the user is covered by. There is no priority between groups,
/// a single grant from any group is sufficient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessFlags {
    pub is_superuser: bool,
    pub is_staff: bool,
    pub is_active: bool,
}

impl AccessFlags {
    pub const NONE: AccessFlags = AccessFlags {
        is_superuser: false,
        is_staff: false,
        is_active: false,
    };

    pub fn new(is_superuser: bool, is_staff: bool, is_active: bool) -> Self {
        Self {
            is_superuser,
            is_staff,
            is_active,
        }
    }

    /// Union of two grants
    pub fn grant(self, other: AccessFlags) -> Self {
        Self {
            is_superuser: self.is_superuser || other.is_superuser,
            is_staff: self.is_staff || other.is_staff,
            is_active: self.is_active || other.is_active,
        }
    }

    /// Contribution of a group given its (possibly absent) extension
    pub fn from_extension(extension: Option<&group_extension::Model>) -> Self {
        extension.map(AccessFlags::from).unwrap_or(Self::NONE)
    }
}

impl From<&group_extension::Model> for AccessFlags {
    fn from(extension: &group_extension::Model) -> Self {
        Self::new(extension.is_superuser, extension.is_staff, extension.is_active)
    }
}

impl From<&user::Model> for AccessFlags {
    fn from(user: &user::Model) -> Self {
        Self::new(user.is_superuser, user.is_staff, user.is_active)
    }
}

impl FromIterator<AccessFlags> for AccessFlags {
    fn from_iter<I: IntoIterator<Item = AccessFlags>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, AccessFlags::grant)
    }
}

impl std::fmt::Display for AccessFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut flags = Vec::new();
        if self.is_superuser {
            flags.push("superuser");
        }
        if self.is_staff {
            flags.push("staff");
        }
        if self.is_active {
            flags.push("active");
        }
        write!(f, "[{}]", flags.join(", "))
    }
}
