//! Dataset loading: CSV bytes in, normalized observation series out.

pub mod consumption;

pub use consumption::{load_consumption_csv, DATE_COLUMN, VALUE_COLUMN};
