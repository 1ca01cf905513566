mod common;
pub use self::common::{ParseQueryError, Query};

mod chart;
pub use self::chart::{ChartInterval, ChartQuery, ChartRange};
