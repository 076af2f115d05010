use chrono::{DateTime, Utc};

use crate::format::{discord_timestamp, int_to_hex, thousands};
use crate::session::SessionState;
use crate::surface::{
    Accessory, Button, ButtonStyle, MediaItem, SelectMenu, SelectOption, Spacing, Surface,
};

use super::demo::{DemoStats, Product, DEMO_FILE_NAME, FEATURES, NAMED_COLORS, PRODUCTS};

pub const MUTED: u32 = 0x747F8D;
const PRODUCT_ACCENT: u32 = 0x57F287;
const LOG_ACCENT: u32 = 0x9B59B6;
const FEATURES_THUMBNAIL: &str = "https://cdn.discordapp.com/attachments/123/456/example.png";

pub const PRIVATE_NOTICE: &str = "This demo is private to the user who started it!";
pub const EXPIRED_NOTICE: &str = "This demo has expired. Run the command again to start a new one.";
pub const EXPORT_NOTICE: &str = "📁 **Data Export Complete**\nYour session data has been exported!";

fn back_button() -> Button {
    Button::new("back_to_main", "← Back to Main", ButtonStyle::Secondary)
}

fn demo_select() -> SelectMenu {
    let option = |label: &str, value: &str, description: &str| SelectOption {
        label: label.to_string(),
        value: value.to_string(),
        description: description.to_string(),
    };
    SelectMenu {
        custom_id: "demo_select".to_string(),
        placeholder: "Choose a demo option...".to_string(),
        options: vec![
            option("Show Color Variants", "colors", "Display different accent colors"),
            option("Toggle Spoiler Mode", "spoiler", "Hide/show content with spoilers"),
            option("Regenerate Content", "regenerate", "Create new random content"),
            option("Show Interaction Log", "log", "View your interaction history"),
        ],
    }
}

pub fn main_view(username: &str, stats: &DemoStats, accent: u32) -> Surface {
    let mut surface = Surface::new(accent)
        .text(format!(
            "# 🚀 Components Showcase\n*Demonstrating every feature available*\n\nWelcome **{}**! This message uses every layout feature.",
            username
        ))
        .separator(Spacing::Large, true)
        .section(
            vec![
                "## 📊 Live Statistics".to_string(),
                format!(
                    "**Active Users**: {}\n**Servers**: {}",
                    thousands(stats.users),
                    stats.servers
                ),
                format!(
                    "**Commands**: {}\n**Uptime**: {}",
                    stats.commands, stats.uptime
                ),
            ],
            Some(Accessory::Button(Button::new(
                "refresh_stats",
                "Refresh Stats",
                ButtonStyle::Primary,
            ))),
        )
        .separator(Spacing::Small, false)
        .section(
            vec![
                "## 🎯 Key Features".to_string(),
                FEATURES
                    .iter()
                    .map(|f| format!("✅ {}", f))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ],
            Some(Accessory::Thumbnail(FEATURES_THUMBNAIL.to_string())),
        )
        .gallery(
            ["Dashboard Preview", "Mobile Interface", "Analytics Panel"]
                .iter()
                .enumerate()
                .map(|(i, description)| MediaItem {
                    url: format!("https://picsum.photos/400/300?random={}", i + 1),
                    description: description.to_string(),
                })
                .collect(),
        )
        .separator(Spacing::Large, true)
        .text("## 🛍️ Featured Products");

    for (index, product) in PRODUCTS.iter().enumerate() {
        surface = surface.section(
            vec![
                format!("**{}**", product.name),
                format!(
                    "Price: **{}**\nRating: ⭐ {}/5.0",
                    product.price, product.rating
                ),
            ],
            Some(Accessory::Button(Button::new(
                format!("product_{}", product.id),
                "View Details",
                ButtonStyle::Secondary,
            ))),
        );
        if index + 1 < PRODUCTS.len() {
            surface = surface.separator(Spacing::Small, false);
        }
    }

    surface
        .separator(Spacing::Large, true)
        .file(format!("attachment://{}", DEMO_FILE_NAME))
        .buttons(vec![
            Button::new("demo_primary", "Primary Action", ButtonStyle::Primary),
            Button::new("demo_success", "Success", ButtonStyle::Success),
            Button::new("demo_danger", "Danger", ButtonStyle::Danger),
        ])
        .select(demo_select())
        .buttons(vec![
            Button::new("reset_demo", "Reset Demo", ButtonStyle::Secondary),
            Button::new("export_data", "Export Data", ButtonStyle::Secondary),
            Button::new("close_demo", "Close", ButtonStyle::Danger),
        ])
}

pub fn product_view(product: &Product, downloads: u64) -> Surface {
    Surface::new(PRODUCT_ACCENT)
        .text(format!(
            "# {}\n*Detailed product information*",
            product.name
        ))
        .separator(Spacing::Small, true)
        .section(
            vec![
                "## Product Details".to_string(),
                format!(
                    "**Price**: {}\n**Rating**: ⭐ {}/5.0\n**Category**: Premium Tools",
                    product.price, product.rating
                ),
                format!(
                    "**Status**: Available\n**Last Updated**: Today\n**Downloads**: {}",
                    thousands(downloads)
                ),
            ],
            Some(Accessory::Button(Button::new(
                format!("purchase_{}", product.id),
                "Purchase Now",
                ButtonStyle::Success,
            ))),
        )
        .gallery(
            [
                format!("{} - Main View", product.name),
                "Configuration Panel".to_string(),
                "Feature Overview".to_string(),
            ]
            .into_iter()
            .enumerate()
            .map(|(i, description)| MediaItem {
                url: format!("https://picsum.photos/500/400?random={}{}", product.id, i),
                description,
            })
            .collect(),
        )
        .separator(Spacing::Large, true)
        .text(
            "## 📋 Features Included\n✅ Full access to all commands\n✅ Priority customer support\n✅ Regular updates and patches\n✅ Community access\n✅ Custom configuration options",
        )
        .buttons(vec![
            back_button(),
            Button::new(
                format!("purchase_{}", product.id),
                "Buy Now",
                ButtonStyle::Success,
            ),
            Button::new(
                format!("favorite_{}", product.id),
                "Add to Favorites",
                ButtonStyle::Primary,
            ),
        ])
}

pub fn log_view(state: &SessionState, recent: usize, now: DateTime<Utc>) -> Surface {
    let most_used = state.most_frequent_action().unwrap_or("None");

    let mut surface = Surface::new(LOG_ACCENT)
        .text("# 📊 Interaction Log\n*Your activity during this demo session*")
        .separator(Spacing::Small, true)
        .section(
            vec![
                "## Session Statistics".to_string(),
                format!(
                    "**Session Started**: {}\n**Total Interactions**: {}",
                    discord_timestamp(state.started_at(), 'R'),
                    state.len()
                ),
                format!(
                    "**Most Used**: {}\n**Session Duration**: {}",
                    most_used,
                    state.duration_at(now)
                ),
            ],
            None,
        )
        .separator(Spacing::Small, true);

    let records = state.recent(recent);
    if records.is_empty() {
        surface = surface
            .text("*No interactions recorded yet. Start clicking buttons to see your activity!*");
    } else {
        surface = surface.text("## Recent Interactions");
        for record in &records {
            surface = surface.section(
                vec![
                    format!("**{}**", record.action),
                    format!(
                        "{} - {}",
                        discord_timestamp(record.timestamp, 't'),
                        record.details
                    ),
                ],
                None,
            );
        }
    }

    surface.buttons(vec![
        Button::new("clear_log", "Clear Log", ButtonStyle::Danger),
        back_button(),
    ])
}

pub fn colors_view(accent: u32) -> Surface {
    let mut surface = Surface::new(accent)
        .text("# 🎨 Color Variants Demo\n*Different accent colors for containers*")
        .separator(Spacing::Small, true);
    for (name, value) in NAMED_COLORS {
        surface = surface.section(
            vec![
                format!("**{}**", name),
                format!("Hex: {}", int_to_hex(*value)),
            ],
            None,
        );
    }
    surface.buttons(vec![back_button()])
}

pub fn spoiler_view() -> Surface {
    let mut surface = Surface::new(MUTED)
        .text("# 🙈 Spoiler Mode Demo\n*This entire container is now hidden behind a spoiler*\n\nClick to reveal the content!")
        .separator(Spacing::Small, true)
        .text("This is hidden content that users need to click to see.\n\nSpoiler containers are perfect for:\n• Sensitive information\n• Plot spoilers\n• Hidden rewards\n• Content warnings")
        .buttons(vec![back_button()]);
    surface.spoiler = true;
    surface
}

fn terminal_view(status_line: &str) -> Surface {
    Surface::new(MUTED).text(format!(
        "# 🚀 Components Showcase\n*{}*\n\nRun the command again to start a new demonstration.",
        status_line
    ))
}

pub fn expired_view() -> Surface {
    terminal_view("This demo has expired")
}

pub fn closed_view() -> Surface {
    terminal_view("Demo closed by user")
}

pub fn purchase_notice(product: Option<&Product>) -> String {
    let (name, price) = product.map_or(("Unknown", "?"), |p| (p.name, p.price));
    format!(
        "🛒 **Purchase Simulation**\n\nYou would be purchasing: **{}** for **{}**\n\n*This is just a demo - no actual purchase occurred!*",
        name, price
    )
}

pub fn favorite_notice(product: Option<&Product>) -> String {
    format!(
        "⭐ Added **{}** to your favorites!",
        product.map_or("Unknown", |p| p.name)
    )
}

pub fn style_notice(style: ButtonStyle) -> &'static str {
    match style {
        ButtonStyle::Primary => {
            "🔵 **Primary Button Clicked!**\nThis demonstrates the Primary button style."
        }
        ButtonStyle::Success => {
            "🟢 **Success Button Clicked!**\nThis demonstrates the Success button style."
        }
        ButtonStyle::Danger => {
            "🔴 **Danger Button Clicked!**\nThis demonstrates the Danger button style."
        }
        ButtonStyle::Secondary => "⚪ **Secondary Button Clicked!**",
    }
}

pub fn select_notice(value: &str) -> String {
    format!(
        "📝 **Select Menu Action**: {}\nYou selected: **{}**",
        value, value
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionTracker;
    use crate::surface::Block;

    #[test]
    fn test_main_view_exposes_every_action() {
        let surface = main_view("alice", &DemoStats::default(), 0x5865F2);
        let ids = surface.custom_ids();
        for id in [
            "refresh_stats",
            "product_1",
            "product_2",
            "product_3",
            "demo_primary",
            "demo_success",
            "demo_danger",
            "demo_select",
            "reset_demo",
            "export_data",
            "close_demo",
        ] {
            assert!(ids.contains(&id), "missing {}", id);
        }
        assert_eq!(surface.accent_color, Some(0x5865F2));
    }

    #[test]
    fn test_main_view_formats_stats() {
        let surface = main_view("alice", &DemoStats::default(), 0);
        let stats = surface.blocks.iter().find_map(|b| match b {
            Block::Section { texts, .. } if texts[0].contains("Live Statistics") => {
                Some(texts.join("\n"))
            }
            _ => None,
        });
        let stats = stats.unwrap();
        assert!(stats.contains("**Active Users**: 15,420"));
        assert!(stats.contains("**Uptime**: 99.8%"));
    }

    #[test]
    fn test_product_view_buttons() {
        let surface = product_view(&PRODUCTS[1], 4321);
        assert_eq!(
            surface.custom_ids(),
            vec!["purchase_2", "back_to_main", "purchase_2", "favorite_2"]
        );
        assert_eq!(surface.accent_color, Some(PRODUCT_ACCENT));
    }

    #[test]
    fn test_log_view_empty_state() {
        let state = SessionState::new();
        let surface = log_view(&state, 5, Utc::now());
        assert!(surface.blocks.iter().any(|b| matches!(
            b,
            Block::Text(t) if t.contains("No interactions recorded yet")
        )));
        assert!(surface.blocks.iter().any(|b| matches!(
            b,
            Block::Section { texts, .. } if texts[2].contains("**Most Used**: None")
        )));
    }

    #[test]
    fn test_log_view_lists_recent_first() {
        let tracker = SessionTracker::default();
        for action in ["A", "B", "C", "D", "E", "F"] {
            tracker.record(1, action, "x");
        }
        let surface = log_view(&tracker.get(1), 5, Utc::now());
        let actions: Vec<&str> = surface
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Section { texts, .. } if texts[0].starts_with("**") => {
                    Some(texts[0].as_str())
                }
                _ => None,
            })
            .collect();
        assert_eq!(actions, vec!["**F**", "**E**", "**D**", "**C**", "**B**"]);
        assert_eq!(surface.custom_ids(), vec!["clear_log", "back_to_main"]);
    }

    #[test]
    fn test_terminal_views_have_no_components() {
        assert!(expired_view().custom_ids().is_empty());
        assert!(closed_view().custom_ids().is_empty());
        assert_ne!(expired_view(), closed_view());
    }

    #[test]
    fn test_spoiler_and_colors() {
        assert!(spoiler_view().spoiler);
        let colors = colors_view(0xED4245);
        assert!(colors.blocks.iter().any(|b| matches!(
            b,
            Block::Section { texts, .. } if texts[1] == "Hex: #5865F2"
        )));
    }

    #[test]
    fn test_notices() {
        assert!(purchase_notice(PRODUCTS.first()).contains("**Premium Bot** for **$19.99**"));
        assert_eq!(
            favorite_notice(PRODUCTS.get(2)),
            "⭐ Added **Music Player** to your favorites!"
        );
        assert_eq!(
            select_notice("colors"),
            "📝 **Select Menu Action**: colors\nYou selected: **colors**"
        );
    }
}
