pub mod analysis;
pub mod period;
pub mod series;

pub use analysis::*;
pub use period::*;
pub use series::*;
