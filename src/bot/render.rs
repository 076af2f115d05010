//! Turns a `Surface` into an embed plus component rows.

use serenity::all::{
    ButtonStyle as DiscordButtonStyle, CreateActionRow, CreateButton, CreateEmbed,
    CreateEmbedFooter, CreateSelectMenu, CreateSelectMenuKind, CreateSelectMenuOption, Timestamp,
};

use crate::surface::{
    Accessory, Block, Button, ButtonAction, ButtonStyle, SelectMenu, Surface,
};

const MAX_ROWS: usize = 5;
const MAX_ROW_BUTTONS: usize = 5;
const MAX_DESCRIPTION: usize = 4096;
const DIVIDER: &str = "──────────────────────────";

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Row {
    Buttons(Vec<Button>),
    Select(SelectMenu),
}

/// Platform-neutral arrangement of a surface within embed limits.
#[derive(Debug, Clone, PartialEq, Default)]
pub(super) struct Layout {
    pub description: String,
    pub thumbnail: Option<String>,
    pub image: Option<String>,
    pub fields: Vec<(String, String, bool)>,
    pub rows: Vec<Row>,
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max - 1).collect();
    out.push('…');
    out
}

pub(super) fn layout(surface: &Surface) -> Layout {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut thumbnail = surface.thumbnail.clone();
    let mut image = surface.image.clone();
    let mut fields = Vec::new();
    let mut accessory_buttons: Vec<Button> = Vec::new();
    let mut rows = Vec::new();

    for block in &surface.blocks {
        match block {
            Block::Text(text) => paragraphs.push(text.clone()),
            Block::Section { texts, accessory } => {
                paragraphs.push(texts.join("\n"));
                match accessory {
                    Some(Accessory::Button(button)) => accessory_buttons.push(button.clone()),
                    Some(Accessory::Thumbnail(url)) => {
                        if thumbnail.is_none() {
                            thumbnail = Some(url.clone());
                        }
                    }
                    None => {}
                }
            }
            Block::Separator { divider, .. } => {
                if *divider {
                    paragraphs.push(DIVIDER.to_string());
                }
            }
            Block::MediaGallery(items) => {
                if image.is_none() {
                    image = items.first().map(|item| item.url.clone());
                }
                let captions: Vec<String> = items
                    .iter()
                    .map(|item| format!("🖼️ {}", item.description))
                    .collect();
                paragraphs.push(captions.join("\n"));
            }
            Block::File(url) => {
                let name = url.strip_prefix("attachment://").unwrap_or(url);
                paragraphs.push(format!("📎 `{}`", name));
            }
            Block::Field {
                name,
                value,
                inline,
            } => fields.push((name.clone(), value.clone(), *inline)),
            Block::ButtonRow(buttons) => rows.push(Row::Buttons(buttons.clone())),
            Block::SelectRow(menu) => rows.push(Row::Select(menu.clone())),
        }
    }

    // Section buttons that an explicit row already carries would collide.
    let explicit: Vec<String> = rows
        .iter()
        .flat_map(|row| match row {
            Row::Buttons(buttons) => buttons
                .iter()
                .filter_map(|b| b.custom_id().map(str::to_string))
                .collect(),
            Row::Select(menu) => vec![menu.custom_id.clone()],
        })
        .collect();
    accessory_buttons.retain(|b| match b.custom_id() {
        Some(id) => !explicit.iter().any(|e| e == id),
        None => true,
    });

    let mut all_rows: Vec<Row> = accessory_buttons
        .chunks(MAX_ROW_BUTTONS)
        .map(|chunk| Row::Buttons(chunk.to_vec()))
        .collect();
    all_rows.extend(rows);
    if all_rows.len() > MAX_ROWS {
        log::warn!(
            "Surface has {} component rows, dropping {}",
            all_rows.len(),
            all_rows.len() - MAX_ROWS
        );
        all_rows.truncate(MAX_ROWS);
    }

    let mut description = paragraphs
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    if surface.spoiler && !description.is_empty() {
        description = format!("||{}||", description);
    }

    Layout {
        description: truncate(&description, MAX_DESCRIPTION),
        thumbnail,
        image,
        fields,
        rows: all_rows,
    }
}

fn button_style(style: ButtonStyle) -> DiscordButtonStyle {
    match style {
        ButtonStyle::Primary => DiscordButtonStyle::Primary,
        ButtonStyle::Secondary => DiscordButtonStyle::Secondary,
        ButtonStyle::Success => DiscordButtonStyle::Success,
        ButtonStyle::Danger => DiscordButtonStyle::Danger,
    }
}

fn create_button(button: &Button) -> CreateButton {
    match &button.action {
        ButtonAction::Custom(id) => CreateButton::new(id.clone())
            .label(button.label.clone())
            .style(button_style(button.style)),
        ButtonAction::Link(url) => CreateButton::new_link(url.clone()).label(button.label.clone()),
    }
}

fn create_select(menu: &SelectMenu) -> CreateSelectMenu {
    let options = menu
        .options
        .iter()
        .map(|o| {
            CreateSelectMenuOption::new(o.label.clone(), o.value.clone())
                .description(o.description.clone())
        })
        .collect();
    CreateSelectMenu::new(menu.custom_id.clone(), CreateSelectMenuKind::String { options })
        .placeholder(menu.placeholder.clone())
}

/// Serenity builders for one surface.
pub(super) struct Rendered {
    pub embeds: Vec<CreateEmbed>,
    pub components: Vec<CreateActionRow>,
}

impl Rendered {
    pub(super) fn new(surface: Option<&Surface>) -> Self {
        let surface = match surface {
            Some(s) => s,
            None => {
                return Self {
                    embeds: Vec::new(),
                    components: Vec::new(),
                }
            }
        };
        let layout = layout(surface);

        let mut embed = CreateEmbed::new();
        if let Some(title) = &surface.title {
            embed = embed.title(title.clone());
        }
        if let Some(color) = surface.accent_color {
            embed = embed.color(color);
        }
        if !layout.description.is_empty() {
            embed = embed.description(layout.description.clone());
        }
        if let Some(url) = &layout.thumbnail {
            embed = embed.thumbnail(url.clone());
        }
        if let Some(url) = &layout.image {
            embed = embed.image(url.clone());
        }
        for (name, value, inline) in &layout.fields {
            embed = embed.field(name.clone(), value.clone(), *inline);
        }
        if let Some(footer) = &surface.footer {
            embed = embed.footer(CreateEmbedFooter::new(footer.clone()));
        }
        if surface.timestamp {
            embed = embed.timestamp(Timestamp::now());
        }

        let components = layout
            .rows
            .iter()
            .map(|row| match row {
                Row::Buttons(buttons) => {
                    CreateActionRow::Buttons(buttons.iter().map(create_button).collect())
                }
                Row::Select(menu) => CreateActionRow::SelectMenu(create_select(menu)),
            })
            .collect();

        Self {
            embeds: vec![embed],
            components,
        }
    }
}
