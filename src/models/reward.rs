//! Reward model for the unlockables catalog.

use serde::{Deserialize, Serialize};

/// An unlockable reward.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub unlocked: bool,
}

/// Catalog the server seeds at startup when the active backend holds no rewards.
pub fn default_rewards() -> Vec<Reward> {
    let seed = [
        (1, "Early Access to New Features", "Get exclusive access to beta features before anyone else", "🚀", true),
        (2, "Premium Learning Resources", "Access to premium courses and tutorials", "📚", true),
        (3, "Mentorship Session", "One-on-one session with senior developers", "👨‍🏫", false),
        (4, "Conference Pass", "Free pass to tech conferences", "🎫", false),
        (5, "Swag Kit", "Exclusive company merchandise", "🎁", false),
    ];

    seed.into_iter()
        .map(|(id, name, description, icon, unlocked)| Reward {
            id,
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            unlocked,
        })
        .collect()
}
