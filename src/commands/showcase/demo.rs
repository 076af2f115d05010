use chrono::{DateTime, SecondsFormat, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::session::{InteractionRecord, SessionState};

pub const DEMO_FILE_NAME: &str = "demo-file.txt";

pub struct Product {
    pub id: u32,
    pub name: &'static str,
    pub price: &'static str,
    pub rating: f32,
}

pub const PRODUCTS: &[Product] = &[
    Product {
        id: 1,
        name: "Premium Bot",
        price: "$19.99",
        rating: 4.8,
    },
    Product {
        id: 2,
        name: "Moderation Tools",
        price: "$12.99",
        rating: 4.6,
    },
    Product {
        id: 3,
        name: "Music Player",
        price: "$15.99",
        rating: 4.9,
    },
];

pub const FEATURES: &[&str] = &[
    "Advanced moderation system",
    "Custom command builder",
    "Multi-language support",
    "Real-time analytics",
    "Premium support",
];

pub const NAMED_COLORS: &[(&str, u32)] = &[
    ("Blurple", 0x5865F2),
    ("Green", 0x57F287),
    ("Yellow", 0xFEE75C),
    ("Red", 0xED4245),
    ("Pink", 0xEB459E),
    ("Purple", 0x9B59B6),
];

pub fn product(id: u32) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.id == id)
}

pub fn random_accent<R: Rng>(rng: &mut R) -> u32 {
    NAMED_COLORS
        .choose(rng)
        .map(|(_, color)| *color)
        .unwrap_or(0x5865F2)
}

/// Figures shown in the "Live Statistics" section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoStats {
    pub users: u64,
    pub servers: u64,
    pub commands: u64,
    pub uptime: String,
}

impl DemoStats {
    pub fn refresh<R: Rng>(&mut self, rng: &mut R) {
        self.users += rng.gen_range(0..100);
        self.servers += rng.gen_range(0..10);
    }

    pub fn regenerate<R: Rng>(&mut self, rng: &mut R) {
        self.users = rng.gen_range(10_000..60_000);
        self.servers = rng.gen_range(500..2_500);
        self.commands = rng.gen_range(20..120);
        self.uptime = format!("{:.1}%", rng.gen_range(95.0_f64..100.0));
    }
}

impl Default for DemoStats {
    fn default() -> Self {
        Self {
            users: 15420,
            servers: 892,
            commands: 47,
            uptime: "99.8%".to_string(),
        }
    }
}

pub fn demo_file(generated: DateTime<Utc>) -> Vec<u8> {
    format!(
        "Components Showcase Demo File
Generated: {}

This is a sample file attached to the showcase message.
It shows how files travel alongside interactive layouts.

Features demonstrated in this showcase:
- Containers with accent colors
- Text blocks with rich markdown
- Sections with button and thumbnail accessories
- Media galleries with multiple items
- File attachments (this file!)
- Button rows and select menus
- Separators with spacing and dividers

Thank you for exploring the showcase!
",
        generated.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
    .into_bytes()
}

/// Session history document handed to the user on export.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionExport {
    pub user: String,
    pub session_start: String,
    pub total_interactions: usize,
    pub interactions: Vec<InteractionRecord>,
    pub stats: DemoStats,
}

impl SessionExport {
    pub fn new(user: &str, state: &SessionState, stats: &DemoStats) -> Self {
        Self {
            user: user.to_string(),
            session_start: state
                .started_at()
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            total_interactions: state.len(),
            interactions: state.interactions().cloned().collect(),
            stats: stats.clone(),
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }
}
