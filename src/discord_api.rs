//! Discord REST lookups backing `EntityFetcher`.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::fetch::{
    AvatarDecoration, EntityFetcher, MemberRecord, Nameplate, PrimaryGuild, RoleColors,
    RoleRecord, UserRecord,
};

const MEMBER_PAGE_LIMIT: u32 = 1000;

#[derive(Debug)]
pub struct ApiError(pub String);

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Deserialize)]
struct ApiUser {
    id: String,
    username: String,
    #[serde(default)]
    discriminator: Option<String>,
    #[serde(default)]
    global_name: Option<String>,
    #[serde(default)]
    avatar: Option<String>,
    #[serde(default)]
    banner: Option<String>,
    #[serde(default)]
    accent_color: Option<u32>,
    #[serde(default)]
    bot: bool,
    #[serde(default)]
    system: bool,
    #[serde(default)]
    public_flags: Option<u64>,
    #[serde(default)]
    avatar_decoration_data: Option<ApiAvatarDecoration>,
    #[serde(default)]
    collectibles: Option<ApiCollectibles>,
    #[serde(default)]
    primary_guild: Option<ApiPrimaryGuild>,
}

#[derive(Debug, Deserialize)]
struct ApiAvatarDecoration {
    asset: String,
    sku_id: String,
}

#[derive(Debug, Deserialize)]
struct ApiCollectibles {
    #[serde(default)]
    nameplate: Option<ApiNameplate>,
}

#[derive(Debug, Deserialize)]
struct ApiNameplate {
    asset: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    palette: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiPrimaryGuild {
    #[serde(default)]
    identity_guild_id: Option<String>,
    #[serde(default)]
    identity_enabled: Option<bool>,
    #[serde(default)]
    tag: Option<String>,
    #[serde(default)]
    badge: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiRole {
    id: String,
    name: String,
    #[serde(default)]
    color: u32,
    #[serde(default)]
    colors: Option<ApiRoleColors>,
    #[serde(default)]
    hoist: bool,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    unicode_emoji: Option<String>,
    #[serde(default)]
    position: i64,
    permissions: String,
    #[serde(default)]
    managed: bool,
    #[serde(default)]
    mentionable: bool,
}

#[derive(Debug, Deserialize)]
struct ApiRoleColors {
    primary_color: u32,
    #[serde(default)]
    secondary_color: Option<u32>,
    #[serde(default)]
    tertiary_color: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ApiMember {
    user: ApiUser,
    #[serde(default)]
    roles: Vec<String>,
}

fn parse_id(raw: &str, what: &str) -> Result<u64, ApiError> {
    raw.parse::<u64>()
        .map_err(|_| ApiError(format!("invalid {} id: {}", what, raw)))
}

impl TryFrom<ApiUser> for UserRecord {
    type Error = ApiError;

    fn try_from(api: ApiUser) -> Result<Self, Self::Error> {
        let primary_guild = match api.primary_guild {
            Some(g) => Some(PrimaryGuild {
                identity_guild_id: g
                    .identity_guild_id
                    .as_deref()
                    .map(|id| parse_id(id, "guild"))
                    .transpose()?,
                identity_enabled: g.identity_enabled.unwrap_or(false),
                tag: g.tag,
                badge: g.badge,
            }),
            None => None,
        };

        Ok(UserRecord {
            id: parse_id(&api.id, "user")?,
            username: api.username,
            discriminator: api.discriminator,
            global_name: api.global_name,
            avatar: api.avatar,
            banner: api.banner,
            accent_color: api.accent_color,
            bot: api.bot,
            system: api.system,
            public_flags: api.public_flags.unwrap_or(0),
            avatar_decoration: api.avatar_decoration_data.map(|d| AvatarDecoration {
                asset: d.asset,
                sku_id: d.sku_id,
            }),
            nameplate: api
                .collectibles
                .and_then(|c| c.nameplate)
                .map(|n| Nameplate {
                    asset: n.asset,
                    label: n.label,
                    palette: n.palette,
                }),
            primary_guild,
        })
    }
}

impl TryFrom<ApiRole> for RoleRecord {
    type Error = ApiError;

    fn try_from(api: ApiRole) -> Result<Self, Self::Error> {
        let permissions = api
            .permissions
            .parse::<u64>()
            .map_err(|_| ApiError(format!("invalid permissions: {}", api.permissions)))?;

        Ok(RoleRecord {
            id: parse_id(&api.id, "role")?,
            name: api.name,
            color: api.color,
            colors: api.colors.map(|c| RoleColors {
                primary: c.primary_color,
                secondary: c.secondary_color,
                tertiary: c.tertiary_color,
            }),
            hoist: api.hoist,
            icon: api.icon,
            unicode_emoji: api.unicode_emoji,
            position: api.position,
            permissions,
            managed: api.managed,
            mentionable: api.mentionable,
        })
    }
}

/// Bot-authenticated client for the Discord REST API.
pub struct DiscordApi {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl DiscordApi {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    /// GET `path`, mapping 404 to `None`.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, Box<dyn std::error::Error + Send + Sync>> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("GET {}", url);

        let resp = self
            .client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, format!("Bot {}", self.token))
            .send()
            .await
            .map_err(|e| {
                log::error!("Discord API request failed: {}", e);
                e
            })?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            let status = resp.status();
            log::error!("Discord API returned HTTP {} for {}", status, path);
            return Err(Box::new(ApiError(format!(
                "Discord API returned HTTP {}",
                status.as_u16()
            ))));
        }

        Ok(Some(resp.json::<T>().await?))
    }
}

#[async_trait]
impl EntityFetcher for DiscordApi {
    async fn user(
        &self,
        user_id: u64,
    ) -> Result<Option<UserRecord>, Box<dyn std::error::Error + Send + Sync>> {
        match self.get_json::<ApiUser>(&format!("/users/{}", user_id)).await? {
            Some(api) => Ok(Some(UserRecord::try_from(api)?)),
            None => Ok(None),
        }
    }

    async fn role(
        &self,
        guild_id: u64,
        role_id: u64,
    ) -> Result<Option<RoleRecord>, Box<dyn std::error::Error + Send + Sync>> {
        let roles = match self
            .get_json::<Vec<ApiRole>>(&format!("/guilds/{}/roles", guild_id))
            .await?
        {
            Some(roles) => roles,
            None => return Ok(None),
        };
        find_role(roles, role_id).map_err(Into::into)
    }

    async fn role_members(
        &self,
        guild_id: u64,
        role_id: u64,
    ) -> Result<Vec<MemberRecord>, Box<dyn std::error::Error + Send + Sync>> {
        let mut members = Vec::new();
        let mut after = String::from("0");
        loop {
            let page = self
                .get_json::<Vec<ApiMember>>(&format!(
                    "/guilds/{}/members?limit={}&after={}",
                    guild_id, MEMBER_PAGE_LIMIT, after
                ))
                .await?
                .unwrap_or_default();
            let cursor = next_page_cursor(&page, MEMBER_PAGE_LIMIT);
            members.extend(members_with_role(page, guild_id, role_id)?);
            match cursor {
                Some(next) => after = next,
                None => break,
            }
        }
        Ok(members)
    }
}

/// A full page means there may be more; Discord pages members by ascending user id.
fn next_page_cursor(page: &[ApiMember], limit: u32) -> Option<String> {
    if page.len() < limit as usize {
        return None;
    }
    page.last().map(|member| member.user.id.clone())
}

fn find_role(roles: Vec<ApiRole>, role_id: u64) -> Result<Option<RoleRecord>, ApiError> {
    let wanted = role_id.to_string();
    match roles.into_iter().find(|r| r.id == wanted) {
        Some(api) => Ok(Some(RoleRecord::try_from(api)?)),
        None => Ok(None),
    }
}

/// Every member carries the @everyone role implicitly; its id equals the guild id.
fn members_with_role(
    members: Vec<ApiMember>,
    guild_id: u64,
    role_id: u64,
) -> Result<Vec<MemberRecord>, ApiError> {
    let wanted = role_id.to_string();
    let mut out = Vec::new();
    for member in members {
        if role_id != guild_id && !member.roles.contains(&wanted) {
            continue;
        }
        let user = UserRecord::try_from(member.user)?;
        out.push(MemberRecord {
            user_id: user.id,
            tag: user.tag(),
        });
    }
    Ok(out)
}
