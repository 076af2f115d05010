//! Read-only records for platform entities and the trait used to look them up.

use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq)]
pub struct AvatarDecoration {
    pub asset: String,
    pub sku_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Nameplate {
    pub asset: String,
    pub label: Option<String>,
    pub palette: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryGuild {
    pub identity_guild_id: Option<u64>,
    pub identity_enabled: bool,
    pub tag: Option<String>,
    pub badge: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserRecord {
    pub id: u64,
    pub username: String,
    pub discriminator: Option<String>,
    pub global_name: Option<String>,
    pub avatar: Option<String>,
    pub banner: Option<String>,
    pub accent_color: Option<u32>,
    pub bot: bool,
    pub system: bool,
    pub public_flags: u64,
    pub avatar_decoration: Option<AvatarDecoration>,
    pub nameplate: Option<Nameplate>,
    pub primary_guild: Option<PrimaryGuild>,
}

impl UserRecord {
    /// `name#1234` for legacy accounts, plain username otherwise.
    pub fn tag(&self) -> String {
        match self.discriminator.as_deref() {
            Some(d) if d != "0" && !d.is_empty() => format!("{}#{}", self.username, d),
            _ => self.username.clone(),
        }
    }
}

/// Gradient colors of a role. `primary` mirrors the role's solid color.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleColors {
    pub primary: u32,
    pub secondary: Option<u32>,
    pub tertiary: Option<u32>,
}

impl RoleColors {
    pub fn stops(&self) -> Vec<(&'static str, u32)> {
        let mut stops = vec![("Primary", self.primary)];
        if let Some(c) = self.secondary {
            stops.push(("Secondary", c));
        }
        if let Some(c) = self.tertiary {
            stops.push(("Tertiary", c));
        }
        stops
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoleRecord {
    pub id: u64,
    pub name: String,
    pub color: u32,
    pub colors: Option<RoleColors>,
    pub hoist: bool,
    pub icon: Option<String>,
    pub unicode_emoji: Option<String>,
    pub position: i64,
    pub permissions: u64,
    pub managed: bool,
    pub mentionable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberRecord {
    pub user_id: u64,
    pub tag: String,
}

/// Remote lookups for users, roles and members.
///
/// `Ok(None)` means the entity does not exist; `Err` is a transport or
/// decoding failure.
#[async_trait]
pub trait EntityFetcher: Send + Sync {
    async fn user(
        &self,
        user_id: u64,
    ) -> Result<Option<UserRecord>, Box<dyn std::error::Error + Send + Sync>>;

    async fn role(
        &self,
        guild_id: u64,
        role_id: u64,
    ) -> Result<Option<RoleRecord>, Box<dyn std::error::Error + Send + Sync>>;

    async fn role_members(
        &self,
        guild_id: u64,
        role_id: u64,
    ) -> Result<Vec<MemberRecord>, Box<dyn std::error::Error + Send + Sync>>;
}
