/// Glyphs prefixed to human output lines
pub struct Icons;

impl Icons {
    pub const ROCKET: &str = "🚀";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const INFO: &str = "ℹ️";
    pub const STATS: &str = "📊";
    pub const LINK: &str = "🔗";
    pub const DEL: &str = "🗑️";
    pub const HOURGLASS: &str = "⏳";
    pub const EMPTY: &str = "∅";
}
