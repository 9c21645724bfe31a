pub mod colors;
pub mod date;
pub mod money;
pub mod path;
pub mod table;
pub mod time;

pub use money::format_cents;
pub use time::mins2readable;
