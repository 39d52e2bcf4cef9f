//! Deterministic style rules: icon and color tags derived from names.
//!
//! Habit names and task categories are matched against ordered rule tables.
//! The first matching rule wins; a documented default covers everything else.
//! No state, no randomness: the same name always yields the same style.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconTag {
    Droplet,
    Dumbbell,
    Footprints,
    Book,
    Brain,
    Moon,
    Pen,
    Apple,
    Code,
    Laptop,
    Users,
    Inbox,
    Target,
    Circle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorTag {
    Blue,
    Red,
    Green,
    Amber,
    Purple,
    Indigo,
    Teal,
    Orange,
    Pink,
    Gray,
    Slate,
}

/// Style for a habit, a pure function of its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitStyle {
    pub icon: IconTag,
    pub color: ColorTag,
}

pub const DEFAULT_HABIT_STYLE: HabitStyle = HabitStyle {
    icon: IconTag::Target,
    color: ColorTag::Slate,
};

pub const DEFAULT_CATEGORY_ICON: IconTag = IconTag::Circle;
pub const DEFAULT_CATEGORY_COLOR: ColorTag = ColorTag::Slate;

struct StyleRule<T> {
    pattern: Regex,
    result: T,
}

fn rule<T>(pattern: &str, result: T) -> StyleRule<T> {
    StyleRule {
        // Patterns are compile-time literals covered by tests.
        pattern: Regex::new(pattern).expect("style rule pattern must compile"),
        result,
    }
}

// Priority order matters: "water walk" is a hydration habit, "read code" is reading.
static HABIT_RULES: LazyLock<Vec<StyleRule<HabitStyle>>> = LazyLock::new(|| {
    let s = |icon, color| HabitStyle { icon, color };
    vec![
        rule(r"(?i)\b(water|drink|hydrat\w*)\b", s(IconTag::Droplet, ColorTag::Blue)),
        rule(
            r"(?i)\b(exercise|workout|gym|run|running|lift\w*|train\w*|push-?ups?)\b",
            s(IconTag::Dumbbell, ColorTag::Red),
        ),
        rule(r"(?i)\b(walk\w*|steps?|hike|hiking)\b", s(IconTag::Footprints, ColorTag::Green)),
        rule(r"(?i)\b(read\w*|book\w*)\b", s(IconTag::Book, ColorTag::Amber)),
        rule(
            r"(?i)\b(meditat\w*|mindful\w*|breath\w*|yoga)\b",
            s(IconTag::Brain, ColorTag::Purple),
        ),
        rule(r"(?i)\b(sleep\w*|bed\w*|nap)\b", s(IconTag::Moon, ColorTag::Indigo)),
        rule(r"(?i)\b(journal\w*|writ\w*|gratitude)\b", s(IconTag::Pen, ColorTag::Teal)),
        rule(
            r"(?i)\b(eat\w*|fruit|veg\w*|meal\w*|diet|cook\w*)\b",
            s(IconTag::Apple, ColorTag::Green),
        ),
        rule(
            r"(?i)\b(code|coding|program\w*|study\w*|learn\w*|practice)\b",
            s(IconTag::Code, ColorTag::Orange),
        ),
    ]
});

static CATEGORY_ICON_RULES: LazyLock<Vec<StyleRule<IconTag>>> = LazyLock::new(|| {
    vec![
        rule(r"(?i)\b(meet\w*|call\w*|sync|1:1|standup)\b", IconTag::Users),
        rule(r"(?i)\b(admin\w*|email\w*|inbox|paperwork)\b", IconTag::Inbox),
        rule(r"(?i)\b(learn\w*|study\w*|read\w*|course)\b", IconTag::Book),
        rule(r"(?i)\b(deep|focus\w*|cod\w*|build\w*|work)\b", IconTag::Laptop),
        rule(r"(?i)\b(health\w*|exercise|gym|fitness)\b", IconTag::Dumbbell),
    ]
});

/// Derive a habit's icon and color from its name.
pub fn habit_style(name: &str) -> HabitStyle {
    HABIT_RULES
        .iter()
        .find(|r| r.pattern.is_match(name))
        .map(|r| r.result)
        .unwrap_or(DEFAULT_HABIT_STYLE)
}

/// Icon heuristic for a free-form task category.
pub fn category_icon(category: &str) -> IconTag {
    CATEGORY_ICON_RULES
        .iter()
        .find(|r| r.pattern.is_match(category))
        .map(|r| r.result)
        .unwrap_or(DEFAULT_CATEGORY_ICON)
}

/// Externally supplied category -> color table (exact, case-sensitive match).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryColors(pub BTreeMap<String, ColorTag>);

impl CategoryColors {
    pub fn color(&self, category: &str) -> ColorTag {
        self.0
            .get(category)
            .copied()
            .unwrap_or(DEFAULT_CATEGORY_COLOR)
    }
}

impl Default for CategoryColors {
    fn default() -> Self {
        let table = [
            ("Deep Work", ColorTag::Purple),
            ("Learning", ColorTag::Blue),
            ("Meeting", ColorTag::Orange),
            ("Admin", ColorTag::Gray),
            ("Health", ColorTag::Green),
            ("Personal", ColorTag::Pink),
        ];
        Self(
            table
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }
}
