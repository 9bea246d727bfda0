mod query_builder;
mod result_extractor;

pub use query_builder::{build_host_list, QueryBuilder};
pub use result_extractor::{extract_value, VALUE_COLUMN};
