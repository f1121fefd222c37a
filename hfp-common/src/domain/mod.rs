//! Domain layer: feature schema, category encoding, validation, projection
//!
//! The feature-consistency contract lives here: the same encoding tables and
//! the same column checks apply at training time (ETL preprocess) and at
//! serving time (POST /predict input normalization).

pub mod encode;
pub mod project;
pub mod schema;
pub mod validate;

pub use encode::{decode, encode, encode_record, EncodedRecord};
pub use project::project;
pub use schema::{FieldKind, FEATURE_FIELDS, TARGET_FIELD};
pub use validate::{validate, ValidatedRecord, ValidationError};
