pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{error, header, info, muted, notified, status, success, summary_row, warn};
pub use table::notes_table;
pub use theme::{theme, Theme};
