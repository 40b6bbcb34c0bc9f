pub struct Icons;

impl Icons {
    pub const CHECK: &'static str = "✅";
    pub const CROSS: &'static str = "❌";
    pub const WARN: &'static str = "⚠️";
    pub const INFO: &'static str = "ℹ️";
    pub const NOTE: &'static str = "📝";
    pub const DATABASE: &'static str = "🗄️";
    pub const BELL: &'static str = "🔔";
    pub const TRASH: &'static str = "🗑️";
}
