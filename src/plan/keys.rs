//! Key normalization: mapping raw dataset keys onto canonical category names.

use log::warn;

use super::{Category, Plan, RESERVED_KEYS};

/// Rewrites a plan's keys in place so category names are canonical.
///
/// Implementations must be idempotent.
pub trait KeyNormalizer {
    fn normalize(&self, plan: &mut Plan);
}

/// Leaves every key untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopKeys;

impl KeyNormalizer for NoopKeys {
    fn normalize(&self, _plan: &mut Plan) {}
}

/// Case- and separator-insensitive normalization with a fixed alias table.
///
/// `"Front Door"`, `"front-door"` and `"FRONTDOOR"` all become `front_door`.
/// Reserved metadata keys are never renamed. When a renamed key collides
/// with a key that is already canonical, the canonical entry wins and the
/// other value is dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct CanonicalKeys;

const ALIASES: [(&str, Category); 12] = [
    ("frontdoor", Category::FrontDoor),
    ("entrance", Category::FrontDoor),
    ("main_door", Category::FrontDoor),
    ("living_room", Category::Living),
    ("livingroom", Category::Living),
    ("bath", Category::Bathroom),
    ("bathrooms", Category::Bathroom),
    ("bedrooms", Category::Bedroom),
    ("walls", Category::Wall),
    ("doors", Category::Door),
    ("windows", Category::Window),
    ("balconies", Category::Balcony),
];

impl CanonicalKeys {
    /// The canonical category for a raw key, if it names one.
    pub fn resolve(key: &str) -> Option<Category> {
        let folded: String = key
            .trim()
            .chars()
            .map(|c| match c {
                '-' => '_',
                c if c.is_whitespace() => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        folded.parse::<Category>().ok().or_else(|| {
            ALIASES
                .iter()
                .find(|(alias, _)| *alias == folded)
                .map(|(_, category)| *category)
        })
    }
}

impl KeyNormalizer for CanonicalKeys {
    fn normalize(&self, plan: &mut Plan) {
        let renames: Vec<(String, Category)> = plan
            .keys()
            .filter(|key| !RESERVED_KEYS.contains(key))
            .filter_map(|key| {
                let category = Self::resolve(key)?;
                (key != category.as_str()).then(|| (key.to_string(), category))
            })
            .collect();

        for (key, category) in renames {
            let Some(value) = plan.remove(&key) else {
                continue;
            };
            if plan.contains_key(category.as_str()) {
                warn!(
                    alias = key.as_str(),
                    canonical = category.as_str();
                    "Dropping aliased key that collides with an existing category"
                );
                continue;
            }
            plan.insert(category.as_str(), value);
        }
    }
}
