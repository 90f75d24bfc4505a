pub mod app;
pub mod cli;
pub mod config;
pub mod output;
pub mod query;
pub mod record;
pub mod source;
pub mod view;

pub use query::{QueryError, QuerySpec, SortOrder};
pub use record::{CaseRecord, GazetteRecord, Record, RecordKind};
pub use view::{compute_view, filter, paginate, sort, ResultView};

#[cfg(test)]
mod tests;
