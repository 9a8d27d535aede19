//! Reference task catalog and the penalty title enhancements.

use super::task::Task;

/// Number of tasks assigned per calendar day.
pub const DAILY_TASK_COUNT: usize = 3;

const CATALOG_ENTRIES: &[(&str, &str, u32)] = &[
    ("water", "💧 Drink 8 glasses of water", 20),
    ("exercise", "🏃‍♂️ Exercise for 30 minutes", 30),
    ("meditation", "🧘‍♂️ Meditate for 10 minutes", 20),
    ("reading", "📚 Read for 30 minutes", 25),
    ("sleep", "😴 Get 8 hours of sleep", 25),
    ("healthy_meal", "🥗 Eat a healthy meal", 20),
    ("gratitude", "🙏 Write 3 things you're grateful for", 15),
    ("walk", "🚶‍♂️ Take a 15-minute walk", 20),
    ("stretch", "🤸‍♂️ Do stretching exercises", 15),
    ("journal", "📝 Write in your journal", 20),
    ("vitamins", "💊 Take your vitamins", 10),
    ("clean", "🧹 Clean your space", 20),
];

const TITLE_ENHANCEMENTS: &[(&str, &str)] = &[
    ("💧 Drink 8 glasses of water", "💧 Drink 12 glasses of water"),
    ("🏃‍♂️ Exercise for 30 minutes", "🏃‍♂️ Exercise for 60 minutes"),
    ("🧘‍♂️ Meditate for 10 minutes", "🧘‍♂️ Meditate for 30 minutes"),
    ("📚 Read for 30 minutes", "📚 Read for 60 minutes"),
    ("😴 Get 8 hours of sleep", "😴 Get 9 hours of sleep"),
    ("🥗 Eat a healthy meal", "🥗 Eat 2 healthy meals"),
    (
        "🙏 Write 3 things you're grateful for",
        "🙏 Write 5 things you're grateful for",
    ),
    ("🚶‍♂️ Take a 15-minute walk", "🚶‍♂️ Take a 30-minute walk"),
    (
        "🤸‍♂️ Do stretching exercises",
        "🤸‍♂️ Do 30 minutes of stretching exercises",
    ),
    ("📝 Write in your journal", "📝 Write 2 pages in your journal"),
    (
        "💊 Take your vitamins",
        "💊 Take your vitamins and drink extra water",
    ),
    ("🧹 Clean your space", "🧹 Deep clean your entire space"),
];

/// The full catalog daily tasks are drawn from.
pub fn default_catalog() -> Vec<Task> {
    CATALOG_ENTRIES
        .iter()
        .map(|(id, title, xp)| Task::new(*id, *title, *xp))
        .collect()
}

/// Harder title for a penalty task; unknown titles are returned unchanged.
pub fn enhance_title(title: &str) -> String {
    TITLE_ENHANCEMENTS
        .iter()
        .find(|(original, _)| *original == title)
        .map_or_else(|| title.to_string(), |(_, enhanced)| (*enhanced).to_string())
}
