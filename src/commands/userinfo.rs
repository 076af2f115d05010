use async_trait::async_trait;

use crate::cdn::Cdn;
use crate::command::{Command, CommandContext, Responder};
use crate::fetch::UserRecord;
use crate::format::{discord_timestamp, snowflake_created_at, yes_no};
use crate::message::{CommandOption, CommandScope, Invocation, OptionKind, Reply};
use crate::permissions::user_flag_names;
use crate::surface::{Button, Surface};

use super::{error_surface, DEFAULT_ACCENT};

const NOT_FOUND: &str = "❌ User not found or invalid user ID.";
const BUTTONS_PER_ROW: usize = 5;

pub struct UserInfoCommand;

fn or_none(value: Option<&str>) -> &str {
    value.unwrap_or("None")
}

fn flags_line(user: &UserRecord) -> Option<String> {
    if user.public_flags == 0 {
        return None;
    }
    let names = user_flag_names(user.public_flags);
    if names.is_empty() {
        Some("None".to_string())
    } else {
        Some(names.join(", "))
    }
}

fn user_surface(user: &UserRecord, requested_by: &str, cdn: &Cdn) -> Surface {
    let basic = [
        format!("**ID:** {}", user.id),
        format!("**Username:** {}", user.username),
        format!("**Global Name:** {}", or_none(user.global_name.as_deref())),
        format!("**Bot:** {}", yes_no(user.bot)),
        format!("**System:** {}", yes_no(user.system)),
        format!(
            "**Created:** {}",
            discord_timestamp(snowflake_created_at(user.id), 'F')
        ),
    ]
    .join("\n");

    let mut surface = Surface::new(user.accent_color.unwrap_or(DEFAULT_ACCENT))
        .titled(format!("User Information: {}", user.tag()))
        .with_thumbnail(cdn.avatar(user, 256))
        .with_footer(format!("Requested by {}", requested_by))
        .timestamped()
        .field("Basic Information", basic, true);

    if let Some(guild) = &user.primary_guild {
        let guild_id = guild
            .identity_guild_id
            .map_or_else(|| "None".to_string(), |id| id.to_string());
        surface = surface.field(
            "Guild Tag Information",
            [
                format!("**Tag:** {}", or_none(guild.tag.as_deref())),
                format!("**Guild ID:** {}", guild_id),
                format!("**Identity Enabled:** {}", yes_no(guild.identity_enabled)),
            ]
            .join("\n"),
            true,
        );
    }

    if let Some(nameplate) = &user.nameplate {
        surface = surface.field(
            "Collectibles",
            [
                format!(
                    "**Nameplate:** {}",
                    nameplate.label.as_deref().unwrap_or("Custom Nameplate")
                ),
                format!(
                    "**Palette:** {}",
                    nameplate.palette.as_deref().unwrap_or("Default")
                ),
                format!("**Asset:** {}", nameplate.asset),
            ]
            .join("\n"),
            true,
        );
    }

    if let Some(decoration) = &user.avatar_decoration {
        surface = surface.field(
            "Avatar Decoration",
            format!(
                "**SKU ID:** {}\n**Asset:** {}",
                decoration.sku_id, decoration.asset
            ),
            true,
        );
    }

    if let Some(flags) = flags_line(user) {
        surface = surface.field("User Flags", flags, false);
    }

    let mut buttons = vec![Button::link("Avatar", cdn.avatar(user, 4096))];
    if let Some(url) = cdn.banner(user, 4096) {
        buttons.push(Button::link("Banner", url));
    }
    if let Some(url) = cdn.avatar_decoration(user, 1024) {
        buttons.push(Button::link("Avatar Decoration", url));
    }
    if let Some(url) = cdn.guild_tag_badge(user, 1024) {
        buttons.push(Button::link("Guild Badge", url));
    }

    for row in buttons.chunks(BUTTONS_PER_ROW) {
        surface = surface.buttons(row.to_vec());
    }
    surface
}

fn user_text(user: &UserRecord, cdn: &Cdn) -> String {
    let mut content = format!("**User Information: {}**\n", user.tag());

    content.push_str("\n**Basic Details:**\n");
    content.push_str(&format!("• **ID:** {}\n", user.id));
    content.push_str(&format!("• **Username:** {}\n", user.username));
    content.push_str(&format!(
        "• **Global Name:** {}\n",
        or_none(user.global_name.as_deref())
    ));
    content.push_str(&format!("• **Bot:** {}\n", yes_no(user.bot)));
    content.push_str(&format!(
        "• **Created:** {}\n",
        discord_timestamp(snowflake_created_at(user.id), 'F')
    ));

    content.push_str("\n**Assets:**\n");
    content.push_str(&format!("• **Avatar:** {}\n", cdn.avatar(user, 1024)));
    if let Some(url) = cdn.banner(user, 1024) {
        content.push_str(&format!("• **Banner:** {}\n", url));
    }
    if let Some(url) = cdn.avatar_decoration(user, 1024) {
        content.push_str(&format!("• **Avatar Decoration:** {}\n", url));
    }
    if let Some(url) = cdn.guild_tag_badge(user, 1024) {
        content.push_str(&format!("• **Guild Tag Badge:** {}\n", url));
    }

    if let Some(guild) = &user.primary_guild {
        content.push_str("\n**Guild Tag:**\n");
        content.push_str(&format!("• **Tag:** {}\n", or_none(guild.tag.as_deref())));
        if let Some(id) = guild.identity_guild_id {
            content.push_str(&format!("• **Guild ID:** {}\n", id));
        }
        content.push_str(&format!(
            "• **Identity Enabled:** {}\n",
            yes_no(guild.identity_enabled)
        ));
    }

    if let Some(nameplate) = &user.nameplate {
        content.push_str("\n**Collectibles:**\n");
        content.push_str(&format!("• **Nameplate Asset:** {}\n", nameplate.asset));
        content.push_str(&format!(
            "• **Nameplate Palette:** {}\n",
            nameplate.palette.as_deref().unwrap_or("Default")
        ));
    }

    if let Some(decoration) = &user.avatar_decoration {
        content.push_str("\n**Avatar Decoration Details:**\n");
        content.push_str(&format!("• **Asset:** {}\n", decoration.asset));
        content.push_str(&format!("• **SKU ID:** {}\n", decoration.sku_id));
    }

    if let Some(flags) = flags_line(user) {
        content.push_str(&format!("\n**User Flags:** {}\n", flags));
    }

    content
}

#[async_trait]
impl Command for UserInfoCommand {
    fn name(&self) -> &str {
        "userinfo"
    }

    fn description(&self) -> &str {
        "Display comprehensive user information"
    }

    fn scope(&self) -> CommandScope {
        CommandScope::Both
    }

    fn options(&self) -> Vec<CommandOption> {
        vec![CommandOption {
            name: "user",
            description: "The user to get information about",
            kind: OptionKind::User,
            required: false,
        }]
    }

    async fn execute(
        &self,
        inv: &Invocation,
        ctx: &CommandContext,
        responder: &dyn Responder,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let target = inv.user_option("user").unwrap_or(inv.user_id);

        let reply = match ctx.fetcher.user(target).await {
            Ok(Some(user)) => Reply::surface(user_surface(&user, &inv.user_tag, &ctx.cdn)),
            Ok(None) => Reply::notice(NOT_FOUND),
            Err(e) => {
                log::error!("userinfo lookup for {} failed: {}", target, e);
                Reply::surface(error_surface(
                    "An error occurred while fetching user information.",
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
        let target = inv.user_option("user").unwrap_or(inv.user_id);

        let text = match ctx.fetcher.user(target).await {
            Ok(Some(user)) => user_text(&user, &ctx.cdn),
            Ok(None) => NOT_FOUND.to_string(),
            Err(e) => {
                log::error!("userinfo lookup for {} failed: {}", target, e);
                format!("❌ Error fetching user information: {}", e)
            }
        };
        Ok(Some(Reply::chunked(&text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{AvatarDecoration, Nameplate, PrimaryGuild};
    use crate::message::OptionValue;
    use crate::surface::{Block, ButtonAction};
    use crate::testing::{context, invocation, FakeFetcher, RecordingResponder, Sent};

    const ALICE: u64 = 175928847299117063;

    fn plain_user() -> UserRecord {
        UserRecord {
            id: ALICE,
            username: "alice".to_string(),
            discriminator: Some("0".to_string()),
            ..Default::default()
        }
    }

    fn decorated_user() -> UserRecord {
        UserRecord {
            global_name: Some("Alice".to_string()),
            avatar: Some("a_anim".to_string()),
            banner: Some("bnr".to_string()),
            accent_color: Some(0x123456),
            // DISCORD_EMPLOYEE | HOUSE_BRAVERY
            public_flags: (1 << 0) | (1 << 6),
            avatar_decoration: Some(AvatarDecoration {
                asset: "deco".to_string(),
                sku_id: "111".to_string(),
            }),
            nameplate: Some(Nameplate {
                asset: "nameplates/x/".to_string(),
                label: None,
                palette: Some("crimson".to_string()),
            }),
            primary_guild: Some(PrimaryGuild {
                identity_guild_id: Some(42),
                identity_enabled: true,
                tag: Some("RUST".to_string()),
                badge: Some("badge".to_string()),
            }),
            ..plain_user()
        }
    }

    fn link_labels(surface: &Surface) -> Vec<Vec<String>> {
        surface
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::ButtonRow(row) => Some(
                    row.iter()
                        .map(|button| {
                            assert!(matches!(button.action, ButtonAction::Link(_)));
                            button.label.clone()
                        })
                        .collect(),
                ),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_plain_user_surface() {
        let surface = user_surface(&plain_user(), "bob", &Cdn::default());

        assert_eq!(surface.title.as_deref(), Some("User Information: alice"));
        assert_eq!(surface.accent_color, Some(DEFAULT_ACCENT));
        assert!(surface
            .thumbnail
            .as_deref()
            .unwrap()
            .contains("/embed/avatars/"));

        let fields = surface.fields();
        assert_eq!(fields.len(), 1);
        assert!(fields[0].1.contains("**Global Name:** None"));
        assert!(fields[0].1.contains("**System:** No"));
        assert_eq!(link_labels(&surface), vec![vec!["Avatar".to_string()]]);
    }

    #[test]
    fn test_decorated_user_surface() {
        let surface = user_surface(&decorated_user(), "bob", &Cdn::default());

        assert_eq!(surface.accent_color, Some(0x123456));
        let names: Vec<&str> = surface.fields().iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                "Basic Information",
                "Guild Tag Information",
                "Collectibles",
                "Avatar Decoration",
                "User Flags"
            ]
        );

        let fields = surface.fields();
        assert_eq!(
            fields[1].1,
            "**Tag:** RUST\n**Guild ID:** 42\n**Identity Enabled:** Yes"
        );
        assert!(fields[2].1.starts_with("**Nameplate:** Custom Nameplate\n**Palette:** crimson"));
        assert_eq!(fields[3].1, "**SKU ID:** 111\n**Asset:** deco");
        assert_eq!(fields[4].1, "DISCORD_EMPLOYEE, HOUSE_BRAVERY");

        assert_eq!(
            link_labels(&surface),
            vec![vec![
                "Avatar".to_string(),
                "Banner".to_string(),
                "Avatar Decoration".to_string(),
                "Guild Badge".to_string()
            ]]
        );
    }

    #[test]
    fn test_user_text_sections() {
        let text = user_text(&decorated_user(), &Cdn::default());
        assert!(text.starts_with("**User Information: alice**\n"));
        assert!(text.contains("• **Avatar:** https://cdn.discordapp.com/avatars/175928847299117063/a_anim.gif?size=1024\n"));
        assert!(text.contains("• **Banner:** "));
        assert!(text.contains("\n**Guild Tag:**\n• **Tag:** RUST\n"));
        assert!(text.contains("• **Nameplate Palette:** crimson\n"));
        assert!(text.contains("\n**User Flags:** DISCORD_EMPLOYEE, HOUSE_BRAVERY\n"));
    }

    #[tokio::test]
    async fn test_execute_defaults_to_invoker() {
        let mut fetcher = FakeFetcher::default();
        fetcher.users.insert(ALICE, plain_user());
        let ctx = context(fetcher);
        let responder = RecordingResponder::new(1);

        UserInfoCommand
            .execute(&invocation(ALICE, "alice"), &ctx, &responder)
            .await
            .unwrap();

        match responder.take().remove(0) {
            Sent::Reply(reply) => {
                assert!(!reply.ephemeral);
                assert_eq!(
                    reply.surface.unwrap().footer.as_deref(),
                    Some("Requested by alice")
                );
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_execute_unknown_user() {
        let ctx = context(FakeFetcher::default());
        let responder = RecordingResponder::new(1);
        let mut inv = invocation(1, "bob");
        inv.options
            .insert("user".to_string(), OptionValue::User(999));

        UserInfoCommand.execute(&inv, &ctx, &responder).await.unwrap();

        assert_eq!(
            responder.take(),
            vec![Sent::Reply(Reply::notice(NOT_FOUND))]
        );
    }

    #[tokio::test]
    async fn test_execute_failure_is_contained() {
        let ctx = context(FakeFetcher {
            fail: true,
            ..Default::default()
        });
        let responder = RecordingResponder::new(1);

        UserInfoCommand
            .execute(&invocation(1, "bob"), &ctx, &responder)
            .await
            .unwrap();

        match responder.take().remove(0) {
            Sent::Reply(reply) => {
                assert!(reply.ephemeral);
                assert_eq!(reply.surface.unwrap().title.as_deref(), Some("Error"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_execute_text() {
        let mut fetcher = FakeFetcher::default();
        fetcher.users.insert(ALICE, decorated_user());
        let ctx = context(fetcher);

        let chunks = UserInfoCommand
            .execute_text(&invocation(ALICE, "alice"), &ctx)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0]
            .content
            .as_deref()
            .unwrap()
            .ends_with("**User Flags:** DISCORD_EMPLOYEE, HOUSE_BRAVERY"));

        let missing = UserInfoCommand
            .execute_text(&invocation(5, "ghost"), &ctx)
            .await
            .unwrap();
        assert_eq!(missing, Some(vec![Reply::text(NOT_FOUND)]));
    }
}
