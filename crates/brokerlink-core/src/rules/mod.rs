pub mod columns;
pub mod pipeline;

pub use columns::{
    DisplayColumnPolicy, NameLikeColumn, DATE_COLUMN, DEFAULT_DISPLAY_KEYWORDS, LINK_COLUMN,
    PHONE_COLUMN, PRUNED_COLUMNS,
};
pub use pipeline::{process, process_with_policy, PipelineOptions, ProcessReport, Processed};
