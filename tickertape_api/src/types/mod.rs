mod chart;
pub use self::chart::{
    Chart, ChartError, ChartMeta, ChartResponse, ChartResult, Indicators, QuoteIndicator,
};
