pub struct Icons;

impl Icons {
    pub const ROCKET: &str = "🚀";
    pub const SEARCH: &str = "🔍";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const STATS: &str = "📊";
    pub const LINK: &str = "🔗";
    pub const BRAIN: &str = "🧠";
    pub const DATABASE: &str = "🗄️";
    pub const DEL: &str = "🗑️";
    pub const GEAR: &str = "⚙️";
    pub const SPARKLE: &str = "✨";
}
