// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// CSV ingestion into tabular rows, with delimiter and encoding detection

mod row_reader;

pub use row_reader::TabularRowReader;
