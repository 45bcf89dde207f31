pub mod clock;
pub mod config;
pub mod filter;
pub mod load;
pub mod summary;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{LoadConfig, MarketConfig, ZoneSet};
pub use filter::{filter_improved, filter_land, ImprovedCriteria, LandCriteria};
pub use load::{load_sales, SalesTable};
pub use summary::{summarize, Summary};
