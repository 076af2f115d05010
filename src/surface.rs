//! Declarative description of a rendered message.
//!
//! Commands build a `Surface` with plain functions; the Discord adapter in
//! `bot::render` turns it into an embed plus component rows.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spacing {
    Small,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Success,
    Danger,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ButtonAction {
    /// Sent back to the bot as a component interaction.
    Custom(String),
    /// Opens a URL client-side.
    Link(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub label: String,
    pub style: ButtonStyle,
    pub action: ButtonAction,
}

impl Button {
    pub fn new(custom_id: impl Into<String>, label: impl Into<String>, style: ButtonStyle) -> Self {
        Self {
            label: label.into(),
            style,
            action: ButtonAction::Custom(custom_id.into()),
        }
    }

    pub fn link(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            style: ButtonStyle::Secondary,
            action: ButtonAction::Link(url.into()),
        }
    }

    pub fn custom_id(&self) -> Option<&str> {
        match &self.action {
            ButtonAction::Custom(id) => Some(id),
            ButtonAction::Link(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectMenu {
    pub custom_id: String,
    pub placeholder: String,
    pub options: Vec<SelectOption>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaItem {
    pub url: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Accessory {
    Button(Button),
    Thumbnail(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text(String),
    Section {
        texts: Vec<String>,
        accessory: Option<Accessory>,
    },
    Separator {
        spacing: Spacing,
        divider: bool,
    },
    MediaGallery(Vec<MediaItem>),
    /// Reference to an uploaded attachment, e.g. `attachment://demo-file.txt`.
    File(String),
    Field {
        name: String,
        value: String,
        inline: bool,
    },
    ButtonRow(Vec<Button>),
    SelectRow(SelectMenu),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Surface {
    pub title: Option<String>,
    pub accent_color: Option<u32>,
    pub spoiler: bool,
    pub thumbnail: Option<String>,
    /// Large image; a gallery block fills it when unset.
    pub image: Option<String>,
    pub footer: Option<String>,
    pub timestamp: bool,
    pub blocks: Vec<Block>,
}

impl Surface {
    pub fn new(accent_color: u32) -> Self {
        Self {
            accent_color: Some(accent_color),
            ..Default::default()
        }
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(url.into());
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }

    pub fn timestamped(mut self) -> Self {
        self.timestamp = true;
        self
    }

    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.blocks.push(Block::Text(content.into()));
        self
    }

    pub fn section(mut self, texts: Vec<String>, accessory: Option<Accessory>) -> Self {
        self.blocks.push(Block::Section { texts, accessory });
        self
    }

    pub fn separator(mut self, spacing: Spacing, divider: bool) -> Self {
        self.blocks.push(Block::Separator { spacing, divider });
        self
    }

    pub fn gallery(mut self, items: Vec<MediaItem>) -> Self {
        self.blocks.push(Block::MediaGallery(items));
        self
    }

    pub fn file(mut self, url: impl Into<String>) -> Self {
        self.blocks.push(Block::File(url.into()));
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.blocks.push(Block::Field {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn buttons(mut self, buttons: Vec<Button>) -> Self {
        if !buttons.is_empty() {
            self.blocks.push(Block::ButtonRow(buttons));
        }
        self
    }

    pub fn select(mut self, menu: SelectMenu) -> Self {
        self.blocks.push(Block::SelectRow(menu));
        self
    }

    /// Every interactive custom id reachable from this surface.
    pub fn custom_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        for block in &self.blocks {
            match block {
                Block::Section {
                    accessory: Some(Accessory::Button(button)),
                    ..
                } => ids.extend(button.custom_id()),
                Block::ButtonRow(buttons) => {
                    ids.extend(buttons.iter().filter_map(Button::custom_id));
                }
                Block::SelectRow(menu) => ids.push(menu.custom_id.as_str()),
                _ => {}
            }
        }
        ids
    }

    /// All field blocks as (name, value) pairs, in order.
    pub fn fields(&self) -> Vec<(&str, &str)> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Field { name, value, .. } => Some((name.as_str(), value.as_str())),
                _ => None,
            })
            .collect()
    }
}
