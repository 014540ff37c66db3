pub mod icons;
pub mod output;
pub mod progress;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{error, info, section, status, success, warn};
pub use progress::Spinner;
pub use table::{TableBuilder, results_table};
pub use theme::{Theme, theme};
