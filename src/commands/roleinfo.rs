use async_trait::async_trait;

use crate::cdn::Cdn;
use crate::command::{Command, CommandContext, Responder};
use crate::fetch::{MemberRecord, RoleRecord};
use crate::format::{discord_timestamp, int_to_hex, snowflake_created_at, title_case_flag, yes_no};
use crate::gradient;
use crate::message::{
    CommandOption, CommandScope, ComponentAction, Invocation, OptionKind, Reply,
};
use crate::permissions::{key_permissions, permission_names};
use crate::surface::{Button, ButtonStyle, Surface};

use super::{error_surface, DEFAULT_ACCENT};

const MEMBERS_PREFIX: &str = "role_members_";
const PERMISSIONS_PREFIX: &str = "role_permissions_";

/// Roles with more members than this get no "View Members" button.
const MEMBER_BUTTON_MAX: usize = 50;
const MEMBER_LIST_MAX: usize = 20;
const KEY_PERMISSION_LIMIT: usize = 10;

const NOT_FOUND: &str = "❌ Role not found.";
const GUILD_ONLY: &str = "❌ This command only works in guilds.";
const MISSING_ROLE: &str = "❌ Please specify a role ID or mention a role.";

pub struct RoleInfoCommand;

fn accent(role: &RoleRecord) -> u32 {
    if role.color == 0 {
        DEFAULT_ACCENT
    } else {
        role.color
    }
}

fn bullet_permissions(names: &[&str]) -> String {
    names
        .iter()
        .map(|p| format!("• {}", title_case_flag(p)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn gradient_lines(role: &RoleRecord) -> Vec<String> {
    role.colors
        .as_ref()
        .map(|colors| {
            colors
                .stops()
                .into_iter()
                .map(|(label, color)| format!("**{}:** {} ({})", label, int_to_hex(color), color))
                .collect()
        })
        .unwrap_or_default()
}

/// Member count, `None` when the member list could not be fetched.
fn member_count(members: Option<usize>) -> String {
    match members {
        Some(n) => n.to_string(),
        None => "Unknown".to_string(),
    }
}

/// Gradient preview as `(filename, png)` for roles with gradient colors.
fn gradient_attachment(role: &RoleRecord) -> Option<(String, Vec<u8>)> {
    let colors = role.colors.as_ref()?;
    match gradient::render(colors) {
        Ok(png) => Some((gradient::filename(role.id), png)),
        Err(e) => {
            log::warn!("Failed to render gradient for role {}: {}", role.id, e);
            None
        }
    }
}

fn role_surface(
    role: &RoleRecord,
    members: Option<usize>,
    requested_by: &str,
    cdn: &Cdn,
) -> Surface {
    let basic = [
        format!("**ID:** {}", role.id),
        format!("**Name:** {}", role.name),
        format!("**Color:** {}", int_to_hex(role.color)),
        format!("**Position:** {}", role.position),
        format!("**Hoisted:** {}", yes_no(role.hoist)),
        format!("**Mentionable:** {}", yes_no(role.mentionable)),
        format!("**Managed:** {}", yes_no(role.managed)),
        format!(
            "**Created:** {}",
            discord_timestamp(snowflake_created_at(role.id), 'F')
        ),
    ]
    .join("\n");

    let mut surface = Surface::new(accent(role))
        .titled(format!("Role Information: {}", role.name))
        .with_footer(format!("Requested by {}", requested_by))
        .timestamped()
        .field("Basic Information", basic, true)
        .field("Members", format!("**Count:** {}", member_count(members)), true);

    if let Some(icon) = cdn.role_icon(role, 256) {
        surface = surface.with_thumbnail(icon);
    }

    let gradient = gradient_lines(role);
    if !gradient.is_empty() {
        surface = surface.field("Gradient Colors", gradient.join("\n"), false);
    }

    let all = permission_names(role.permissions);
    let key = key_permissions(role.permissions, KEY_PERMISSION_LIMIT);
    if !key.is_empty() {
        surface = surface.field(
            format!("Key Permissions ({} total)", all.len()),
            bullet_permissions(&key),
            false,
        );
    }

    let mut buttons = Vec::new();
    if let Some(icon) = cdn.role_icon(role, 1024) {
        buttons.push(Button::link("Role Icon", icon));
    }
    if let Some(n) = members.filter(|n| (1..=MEMBER_BUTTON_MAX).contains(n)) {
        buttons.push(Button::new(
            format!("{}{}", MEMBERS_PREFIX, role.id),
            format!("View Members ({})", n),
            ButtonStyle::Secondary,
        ));
    }
    if !all.is_empty() {
        buttons.push(Button::new(
            format!("{}{}", PERMISSIONS_PREFIX, role.id),
            "All Permissions",
            ButtonStyle::Secondary,
        ));
    }
    buttons.truncate(5);

    surface.buttons(buttons)
}

fn role_reply(role: &RoleRecord, members: Option<usize>, requested_by: &str, cdn: &Cdn) -> Reply {
    let surface = role_surface(role, members, requested_by, cdn);
    match gradient_attachment(role) {
        Some((filename, png)) => {
            Reply::surface(surface.with_image(format!("attachment://{}", filename)))
                .with_attachment(filename, png)
        }
        None => Reply::surface(surface),
    }
}

fn role_text(role: &RoleRecord, members: Option<usize>, cdn: &Cdn) -> String {
    let mut content = format!("**Role Information: {}**\n", role.name);

    content.push_str("\n**Basic Details:**\n");
    content.push_str(&format!("• **ID:** {}\n", role.id));
    content.push_str(&format!("• **Name:** {}\n", role.name));
    content.push_str(&format!("• **Color:** {}\n", int_to_hex(role.color)));
    content.push_str(&format!("• **Position:** {}\n", role.position));
    content.push_str(&format!("• **Hoisted:** {}\n", yes_no(role.hoist)));
    content.push_str(&format!("• **Mentionable:** {}\n", yes_no(role.mentionable)));
    content.push_str(&format!("• **Managed:** {}\n", yes_no(role.managed)));
    content.push_str(&format!("• **Members:** {}\n", member_count(members)));
    content.push_str(&format!(
        "• **Created:** {}\n",
        discord_timestamp(snowflake_created_at(role.id), 'F')
    ));

    if let Some(icon) = cdn.role_icon(role, 1024) {
        content.push_str(&format!("\n**Role Icon:** {}\n", icon));
    }

    let gradient = gradient_lines(role);
    if !gradient.is_empty() {
        content.push_str("\n**Gradient Colors:**\n");
        for line in gradient {
            content.push_str(&format!("• {}\n", line));
        }
    }

    let all = permission_names(role.permissions);
    if !all.is_empty() {
        content.push_str(&format!("\n**Key Permissions ({} total):**\n", all.len()));
        content.push_str(&bullet_permissions(&key_permissions(
            role.permissions,
            KEY_PERMISSION_LIMIT,
        )));
    }

    content
}

fn members_surface(role: &RoleRecord, members: &[MemberRecord]) -> Surface {
    let list = members
        .iter()
        .take(MEMBER_LIST_MAX)
        .map(|m| format!("• {} ({})", m.tag, m.user_id))
        .collect::<Vec<_>>()
        .join("\n");

    let mut footer = format!("{} total members", members.len());
    if members.len() > MEMBER_LIST_MAX {
        footer.push_str(&format!(" • Showing first {}", MEMBER_LIST_MAX));
    }

    Surface::new(accent(role))
        .titled(format!("Members with role: {}", role.name))
        .text(list)
        .with_footer(footer)
}

fn permissions_surface(role: &RoleRecord, names: &[&str]) -> Surface {
    Surface::new(accent(role))
        .titled(format!("Permissions for role: {}", role.name))
        .text(bullet_permissions(names))
        .with_footer(format!("{} total permissions", names.len()))
}

impl RoleInfoCommand {
    async fn lookup(
        &self,
        ctx: &CommandContext,
        guild_id: u64,
        role_id: u64,
    ) -> Result<Option<(RoleRecord, Option<usize>)>, Box<dyn std::error::Error + Send + Sync>>
    {
        let role = match ctx.fetcher.role(guild_id, role_id).await? {
            Some(role) => role,
            None => return Ok(None),
        };
        let members = match ctx.fetcher.role_members(guild_id, role_id).await {
            Ok(members) => Some(members.len()),
            Err(e) => {
                log::warn!("Member count for role {} unavailable: {}", role_id, e);
                None
            }
        };
        Ok(Some((role, members)))
    }

    async fn show_members(
        &self,
        ctx: &CommandContext,
        guild_id: u64,
        role_id: u64,
    ) -> Result<Reply, Box<dyn std::error::Error + Send + Sync>> {
        let role = match ctx.fetcher.role(guild_id, role_id).await? {
            Some(role) => role,
            None => return Ok(Reply::notice(NOT_FOUND)),
        };
        let members = ctx.fetcher.role_members(guild_id, role_id).await?;
        if members.is_empty() {
            return Ok(Reply::notice("📭 This role has no members."));
        }
        Ok(Reply::surface(members_surface(&role, &members)).ephemeral())
    }

    async fn show_permissions(
        &self,
        ctx: &CommandContext,
        guild_id: u64,
        role_id: u64,
    ) -> Result<Reply, Box<dyn std::error::Error + Send + Sync>> {
        let role = match ctx.fetcher.role(guild_id, role_id).await? {
            Some(role) => role,
            None => return Ok(Reply::notice(NOT_FOUND)),
        };
        let names = permission_names(role.permissions);
        if names.is_empty() {
            return Ok(Reply::notice("📭 This role has no special permissions."));
        }
        Ok(Reply::surface(permissions_surface(&role, &names)).ephemeral())
    }
}

#[async_trait]
impl Command for RoleInfoCommand {
    fn name(&self) -> &str {
        "roleinfo"
    }

    fn description(&self) -> &str {
        "Display comprehensive role information"
    }

    fn scope(&self) -> CommandScope {
        CommandScope::Guild
    }

    fn options(&self) -> Vec<CommandOption> {
        vec![CommandOption {
            name: "role",
            description: "The role to get information about",
            kind: OptionKind::Role,
            required: true,
        }]
    }

    async fn execute(
        &self,
        inv: &Invocation,
        ctx: &CommandContext,
        responder: &dyn Responder,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let guild_id = match inv.guild_id {
            Some(id) => id,
            None => return responder.reply(Reply::notice(GUILD_ONLY)).await,
        };
        let role_id = match inv.role_option("role") {
            Some(id) => id,
            None => return responder.reply(Reply::notice(MISSING_ROLE)).await,
        };

        let reply = match self.lookup(ctx, guild_id, role_id).await {
            Ok(Some((role, members))) => role_reply(&role, members, &inv.user_tag, &ctx.cdn),
            Ok(None) => Reply::notice(NOT_FOUND),
            Err(e) => {
                log::error!("roleinfo lookup for {} failed: {}", role_id, e);
                Reply::surface(error_surface(
                    "An error occurred while fetching role information.",
                    &e,
                ))
                .ephemeral()
            }
        };
        responder.reply(reply).await
    }

    async fn execute_text(
        &self,
        inv: &Invocation,
        ctx: &CommandContext,
    ) -> Result<Option<Vec<Reply>>, Box<dyn std::error::Error + Send + Sync>> {
        let guild_id = match inv.guild_id {
            Some(id) => id,
            None => return Ok(Some(vec![Reply::text(GUILD_ONLY)])),
        };
        let role_id = match inv.role_option("role") {
            Some(id) => id,
            None => return Ok(Some(vec![Reply::text(MISSING_ROLE)])),
        };

        let (role, members) = match self.lookup(ctx, guild_id, role_id).await {
            Ok(Some(found)) => found,
            Ok(None) => return Ok(Some(vec![Reply::text(NOT_FOUND)])),
            Err(e) => {
                log::error!("roleinfo lookup for {} failed: {}", role_id, e);
                return Ok(Some(vec![Reply::text(format!(
                    "❌ Error fetching role information: {}",
                    e
                ))]));
            }
        };

        let mut replies = Reply::chunked(&role_text(&role, members, &ctx.cdn));
        if let (Some(first), Some((filename, png))) =
            (replies.first_mut(), gradient_attachment(&role))
        {
            *first = std::mem::take(first).with_attachment(filename, png);
        }
        Ok(Some(replies))
    }

    fn handles_component(&self, custom_id: &str) -> bool {
        custom_id.starts_with(MEMBERS_PREFIX) || custom_id.starts_with(PERMISSIONS_PREFIX)
    }

    async fn handle_component(
        &self,
        action: &ComponentAction,
        ctx: &CommandContext,
        responder: &dyn Responder,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let guild_id = match action.guild_id {
            Some(id) => id,
            None => return responder.reply(Reply::notice(GUILD_ONLY)).await,
        };

        let (members, id) = match action.custom_id.strip_prefix(MEMBERS_PREFIX) {
            Some(id) => (true, id),
            None => (
                false,
                action
                    .custom_id
                    .strip_prefix(PERMISSIONS_PREFIX)
                    .unwrap_or_default(),
            ),
        };
        let role_id = match id.parse::<u64>() {
            Ok(id) => id,
            Err(_) => return responder.reply(Reply::notice(NOT_FOUND)).await,
        };

        let result = if members {
            self.show_members(ctx, guild_id, role_id).await
        } else {
            self.show_permissions(ctx, guild_id, role_id).await
        };

        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                log::error!("Role button {} failed: {}", action.custom_id, e);
                Reply::surface(error_surface(
                    "An error occurred while fetching role information.",
                    &e,
                ))
                .ephemeral()
            }
        };
        responder.reply(reply).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::RoleColors;
    use crate::message::OptionValue;
    use crate::surface::Block;
    use crate::testing::{button, context, invocation, FakeFetcher, RecordingResponder, Sent};

    const GUILD: u64 = 500;
    const ROLE: u64 = 1_100_000_000_000_000_000;

    fn moderator() -> RoleRecord {
        RoleRecord {
            id: ROLE,
            name: "Moderator".to_string(),
            color: 0x3498DB,
            colors: Some(RoleColors {
                primary: 0x3498DB,
                secondary: Some(0x9B59B6),
                tertiary: None,
            }),
            hoist: true,
            icon: Some("abc".to_string()),
            position: 4,
            // KICK_MEMBERS | BAN_MEMBERS | CONNECT
            permissions: (1 << 1) | (1 << 2) | (1 << 20),
            mentionable: true,
            ..Default::default()
        }
    }

    fn members(n: u64) -> Vec<MemberRecord> {
        (1..=n)
            .map(|i| MemberRecord {
                user_id: i,
                tag: format!("member{}", i),
            })
            .collect()
    }

    fn fetcher(role: RoleRecord, count: u64) -> FakeFetcher {
        let mut fetcher = FakeFetcher::default();
        fetcher.members.insert(role.id, members(count));
        fetcher.roles.insert((GUILD, role.id), role);
        fetcher
    }

    fn role_invocation() -> Invocation {
        let mut inv = invocation(1, "alice");
        inv.options
            .insert("role".to_string(), OptionValue::Role(ROLE));
        inv
    }

    fn only_reply(responder: &RecordingResponder) -> Reply {
        let mut sent = responder.take();
        assert_eq!(sent.len(), 1);
        match sent.remove(0) {
            Sent::Reply(reply) => reply,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_role_surface_fields_and_buttons() {
        let surface = role_surface(&moderator(), Some(3), "alice", &Cdn::default());

        assert_eq!(surface.title.as_deref(), Some("Role Information: Moderator"));
        assert_eq!(surface.accent_color, Some(0x3498DB));
        assert_eq!(surface.footer.as_deref(), Some("Requested by alice"));
        assert!(surface.timestamp);
        assert!(surface
            .thumbnail
            .as_deref()
            .unwrap()
            .ends_with("role-icons/1100000000000000000/abc.png?size=256"));

        let fields = surface.fields();
        assert_eq!(fields[0].0, "Basic Information");
        assert!(fields[0].1.contains("**Color:** #3498DB"));
        assert!(fields[0].1.contains("**Hoisted:** Yes"));
        assert!(fields[0].1.contains("**Managed:** No"));
        assert_eq!(fields[1], ("Members", "**Count:** 3"));
        assert_eq!(fields[2].0, "Gradient Colors");
        assert_eq!(
            fields[2].1,
            "**Primary:** #3498DB (3447003)\n**Secondary:** #9B59B6 (10181046)"
        );
        assert_eq!(fields[3].0, "Key Permissions (3 total)");
        assert_eq!(fields[3].1, "• Kick Members\n• Ban Members");

        assert_eq!(
            surface.custom_ids(),
            vec![
                "role_members_1100000000000000000",
                "role_permissions_1100000000000000000"
            ]
        );
        assert!(surface.blocks.iter().any(|b| matches!(
            b,
            Block::ButtonRow(row) if row[0].label == "Role Icon"
        )));
    }

    #[test]
    fn test_large_or_empty_roles_hide_member_button() {
        let mut role = moderator();
        role.permissions = 0;
        role.icon = None;
        role.color = 0;

        let big = role_surface(&role, Some(51), "alice", &Cdn::default());
        assert!(big.custom_ids().is_empty());
        assert_eq!(big.accent_color, Some(DEFAULT_ACCENT));
        assert!(!big.fields().iter().any(|(n, _)| n.starts_with("Key Permissions")));

        let empty = role_surface(&role, Some(0), "alice", &Cdn::default());
        assert!(empty.custom_ids().is_empty());

        let edge = role_surface(&role, Some(50), "alice", &Cdn::default());
        assert_eq!(edge.custom_ids(), vec!["role_members_1100000000000000000"]);
    }

    #[test]
    fn test_permission_button_follows_named_permissions() {
        let mut role = moderator();
        role.permissions = 1 << 48;
        let surface = role_surface(&role, Some(0), "alice", &Cdn::default());
        assert!(surface
            .fields()
            .contains(&("Key Permissions (1 total)", "• Set Voice Channel Status")));
        assert_eq!(
            surface.custom_ids(),
            vec!["role_permissions_1100000000000000000"]
        );

        role.permissions = 1 << 63;
        let surface = role_surface(&role, Some(0), "alice", &Cdn::default());
        assert!(surface.custom_ids().is_empty());
        assert!(!surface
            .fields()
            .iter()
            .any(|(n, _)| n.starts_with("Key Permissions")));
    }

    #[test]
    fn test_unknown_member_count() {
        let surface = role_surface(&moderator(), None, "alice", &Cdn::default());
        assert_eq!(surface.fields()[1], ("Members", "**Count:** Unknown"));
        assert_eq!(
            surface.custom_ids(),
            vec!["role_permissions_1100000000000000000"]
        );

        let text = role_text(&moderator(), None, &Cdn::default());
        assert!(text.contains("• **Members:** Unknown\n"));
    }

    #[test]
    fn test_role_text_lists_details() {
        let text = role_text(&moderator(), Some(3), &Cdn::default());
        assert!(text.starts_with("**Role Information: Moderator**\n"));
        assert!(text.contains("• **Members:** 3\n"));
        assert!(text.contains("**Role Icon:** https://cdn.discordapp.com/role-icons/"));
        assert!(text.contains("• **Secondary:** #9B59B6 (10181046)\n"));
        assert!(text.ends_with("• Kick Members\n• Ban Members"));
    }

    #[test]
    fn test_members_surface_caps_list() {
        let surface = members_surface(&moderator(), &members(25));
        assert_eq!(
            surface.footer.as_deref(),
            Some("25 total members • Showing first 20")
        );
        match &surface.blocks[0] {
            Block::Text(list) => {
                assert_eq!(list.lines().count(), 20);
                assert!(list.starts_with("• member1 (1)"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_execute_renders_role() {
        let ctx = context(fetcher(moderator(), 3));
        let responder = RecordingResponder::new(1);
        RoleInfoCommand
            .execute(&role_invocation(), &ctx, &responder)
            .await
            .unwrap();

        let reply = only_reply(&responder);
        assert!(!reply.ephemeral);
        assert_eq!(reply.attachments.len(), 1);
        assert_eq!(
            reply.attachments[0].filename,
            "role-gradient-1100000000000000000.png"
        );
        assert!(reply.attachments[0].data.starts_with(b"\x89PNG"));
        let surface = reply.surface.unwrap();
        assert_eq!(surface.title.as_deref(), Some("Role Information: Moderator"));
        assert_eq!(
            surface.image.as_deref(),
            Some("attachment://role-gradient-1100000000000000000.png")
        );
    }

    #[tokio::test]
    async fn test_execute_without_gradient_has_no_image() {
        let mut role = moderator();
        role.colors = None;
        let ctx = context(fetcher(role, 3));
        let responder = RecordingResponder::new(1);
        RoleInfoCommand
            .execute(&role_invocation(), &ctx, &responder)
            .await
            .unwrap();

        let reply = only_reply(&responder);
        assert!(reply.attachments.is_empty());
        assert_eq!(reply.surface.unwrap().image, None);
    }

    #[tokio::test]
    async fn test_member_fetch_failure_still_renders_role() {
        let mut fetcher = fetcher(moderator(), 3);
        fetcher.fail_members = true;
        let ctx = context(fetcher);
        let responder = RecordingResponder::new(1);
        RoleInfoCommand
            .execute(&role_invocation(), &ctx, &responder)
            .await
            .unwrap();

        let reply = only_reply(&responder);
        assert!(!reply.ephemeral);
        let surface = reply.surface.unwrap();
        assert_eq!(surface.title.as_deref(), Some("Role Information: Moderator"));
        assert_eq!(surface.fields()[1], ("Members", "**Count:** Unknown"));

        let replies = RoleInfoCommand
            .execute_text(&role_invocation(), &ctx)
            .await
            .unwrap()
            .unwrap();
        assert!(replies[0]
            .content
            .as_deref()
            .unwrap()
            .contains("• **Members:** Unknown\n"));
    }

    #[tokio::test]
    async fn test_execute_not_found() {
        let ctx = context(FakeFetcher::default());
        let responder = RecordingResponder::new(1);
        RoleInfoCommand
            .execute(&role_invocation(), &ctx, &responder)
            .await
            .unwrap();

        assert_eq!(only_reply(&responder), Reply::notice("❌ Role not found."));
    }

    #[tokio::test]
    async fn test_execute_failure_renders_error_surface() {
        let ctx = context(FakeFetcher {
            fail: true,
            ..Default::default()
        });
        let responder = RecordingResponder::new(1);
        RoleInfoCommand
            .execute(&role_invocation(), &ctx, &responder)
            .await
            .unwrap();

        let reply = only_reply(&responder);
        assert!(reply.ephemeral);
        let surface = reply.surface.unwrap();
        assert_eq!(surface.title.as_deref(), Some("Error"));
        assert_eq!(surface.accent_color, Some(0xFF0000));
        assert_eq!(
            surface.fields(),
            vec![("Error Details", "`Discord API returned HTTP 500`")]
        );
    }

    #[tokio::test]
    async fn test_execute_text_chunks() {
        let ctx = context(fetcher(moderator(), 3));
        let replies = RoleInfoCommand
            .execute_text(&role_invocation(), &ctx)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(replies.len(), 1);
        let text = replies[0].content.as_deref().unwrap();
        assert!(text.starts_with("**Role Information: Moderator**"));
        assert!(text.chars().count() <= crate::format::MESSAGE_LIMIT);
        assert_eq!(replies[0].surface, None);
        assert_eq!(
            replies[0].attachments[0].filename,
            "role-gradient-1100000000000000000.png"
        );

        let missing = RoleInfoCommand
            .execute_text(&invocation(1, "alice"), &ctx)
            .await
            .unwrap();
        assert_eq!(missing, Some(vec![Reply::text(MISSING_ROLE)]));
    }

    #[tokio::test]
    async fn test_member_and_permission_buttons() {
        let ctx = context(fetcher(moderator(), 2));
        let responder = RecordingResponder::new(1);

        let id = format!("role_members_{}", ROLE);
        assert!(RoleInfoCommand.handles_component(&id));
        RoleInfoCommand
            .handle_component(&button(1, 77, &id), &ctx, &responder)
            .await
            .unwrap();
        let reply = only_reply(&responder);
        assert!(reply.ephemeral);
        assert_eq!(
            reply.surface.unwrap().footer.as_deref(),
            Some("2 total members")
        );

        let id = format!("role_permissions_{}", ROLE);
        RoleInfoCommand
            .handle_component(&button(1, 77, &id), &ctx, &responder)
            .await
            .unwrap();
        let surface = only_reply(&responder).surface.unwrap();
        assert_eq!(surface.footer.as_deref(), Some("3 total permissions"));
        assert_eq!(
            surface.blocks[0],
            Block::Text("• Kick Members\n• Ban Members\n• Connect".to_string())
        );
    }

    #[tokio::test]
    async fn test_buttons_report_empty_roles() {
        let mut role = moderator();
        role.permissions = 0;
        let ctx = context(fetcher(role, 0));
        let responder = RecordingResponder::new(1);

        RoleInfoCommand
            .handle_component(&button(1, 77, &format!("role_members_{}", ROLE)), &ctx, &responder)
            .await
            .unwrap();
        assert_eq!(
            only_reply(&responder),
            Reply::notice("📭 This role has no members.")
        );

        RoleInfoCommand
            .handle_component(
                &button(1, 77, &format!("role_permissions_{}", ROLE)),
                &ctx,
                &responder,
            )
            .await
            .unwrap();
        assert_eq!(
            only_reply(&responder),
            Reply::notice("📭 This role has no special permissions.")
        );

        RoleInfoCommand
            .handle_component(&button(1, 77, "role_members_99"), &ctx, &responder)
            .await
            .unwrap();
        assert_eq!(only_reply(&responder), Reply::notice(NOT_FOUND));
    }
}
