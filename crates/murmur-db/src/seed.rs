//! Demo dataset loaded by `murmur seed` and by `MemoryStore::seeded`.

use chrono::{DateTime, Duration, Utc};

pub struct SeedUser {
    pub id: i64,
    pub name: &'static str,
    pub image: &'static str,
}

pub struct SeedComment {
    pub content: &'static str,
    pub user_id: i64,
    pub age_days: i64,
}

impl SeedComment {
    pub fn created_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.age_days)
    }
}

pub const USERS: &[SeedUser] = &[
    SeedUser {
        id: 1,
        name: "juliusomo",
        image: "https://play.rosebud.ai/assets/image-juliusomo.webp?SuPD",
    },
    SeedUser {
        id: 2,
        name: "Kimberly Smith",
        image: "https://play.rosebud.ai/assets/avatar-kimberly-smith.webp?AZSq",
    },
    SeedUser {
        id: 3,
        name: "Max Blagun",
        image: "https://play.rosebud.ai/assets/image-maxblagun.webp?HLis",
    },
];

pub const COMMENTS: &[SeedComment] = &[
    SeedComment {
        content: "How does my new comments section look?",
        user_id: 1,
        age_days: 30,
    },
    SeedComment {
        content: "Woah, your project looks awesome! How long have you been coding for?",
        user_id: 3,
        age_days: 14,
    },
];
