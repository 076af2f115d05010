//! Asset URLs on the Discord CDN.

use crate::fetch::{RoleRecord, UserRecord};

#[derive(Debug, Clone)]
pub struct Cdn {
    base: String,
}

impl Cdn {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    fn image(&self, path: &str, hash: &str, size: u32) -> String {
        let ext = if hash.starts_with("a_") { "gif" } else { "png" };
        format!("{}/{}/{}.{}?size={}", self.base, path, hash, ext, size)
    }

    /// Custom avatar if set, otherwise the default avatar for the account.
    pub fn avatar(&self, user: &UserRecord, size: u32) -> String {
        match &user.avatar {
            Some(hash) => self.image(&format!("avatars/{}", user.id), hash, size),
            None => self.default_avatar(user),
        }
    }

    pub fn default_avatar(&self, user: &UserRecord) -> String {
        let legacy = user
            .discriminator
            .as_deref()
            .and_then(|d| d.parse::<u64>().ok())
            .filter(|d| *d != 0);
        let index = match legacy {
            Some(d) => d % 5,
            None => (user.id >> 22) % 6,
        };
        format!("{}/embed/avatars/{}.png", self.base, index)
    }

    pub fn banner(&self, user: &UserRecord, size: u32) -> Option<String> {
        user.banner
            .as_ref()
            .map(|hash| self.image(&format!("banners/{}", user.id), hash, size))
    }

    pub fn avatar_decoration(&self, user: &UserRecord, size: u32) -> Option<String> {
        user.avatar_decoration.as_ref().map(|d| {
            format!(
                "{}/avatar-decoration-presets/{}.png?size={}",
                self.base, d.asset, size
            )
        })
    }

    pub fn guild_tag_badge(&self, user: &UserRecord, size: u32) -> Option<String> {
        let guild = user.primary_guild.as_ref()?;
        let guild_id = guild.identity_guild_id?;
        let badge = guild.badge.as_ref()?;
        Some(format!(
            "{}/guild-tag-badges/{}/{}.png?size={}",
            self.base, guild_id, badge, size
        ))
    }

    pub fn role_icon(&self, role: &RoleRecord, size: u32) -> Option<String> {
        role.icon
            .as_ref()
            .map(|hash| self.image(&format!("role-icons/{}", role.id), hash, size))
    }
}

impl Default for Cdn {
    fn default() -> Self {
        Self::new("https://cdn.discordapp.com")
    }
}
