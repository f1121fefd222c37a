//! Feature schema for the heart failure dataset
//!
//! One patient observation carries eleven feature fields plus an optional
//! `HeartDisease` ground-truth label (training and evaluation only).

/// Value kind a field accepts on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Whole number (Age, RestingBP, Cholesterol, MaxHR)
    Integer,
    /// Signed float (Oldpeak may legitimately be negative)
    Float,
    /// 0 or 1 (FastingBS, HeartDisease)
    Binary,
    /// String drawn from a fixed vocabulary (see `encode::table`)
    Categorical,
}

/// Feature fields the classifier consumes, in canonical column order.
///
/// This order is the order the model is fit on; the projector reorders
/// serving-time input to match whatever order the artifact declares.
pub const FEATURE_FIELDS: [&str; 11] = [
    "Age",
    "Sex",
    "ChestPainType",
    "RestingBP",
    "Cholesterol",
    "FastingBS",
    "RestingECG",
    "MaxHR",
    "ExerciseAngina",
    "Oldpeak",
    "ST_Slope",
];

/// Ground-truth label column, present only in training/evaluation data
pub const TARGET_FIELD: &str = "HeartDisease";

/// Look up the kind of a feature field (or the target field)
pub fn field_kind(field: &str) -> Option<FieldKind> {
    match field {
        "Age" | "RestingBP" | "Cholesterol" | "MaxHR" => Some(FieldKind::Integer),
        "Oldpeak" => Some(FieldKind::Float),
        "FastingBS" | "HeartDisease" => Some(FieldKind::Binary),
        "Sex" | "ChestPainType" | "RestingECG" | "ExerciseAngina" | "ST_Slope" => {
            Some(FieldKind::Categorical)
        }
        _ => None,
    }
}

/// True for fields whose values are encoded through the category tables
pub fn is_categorical(field: &str) -> bool {
    matches!(field_kind(field), Some(FieldKind::Categorical))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_feature_field_has_a_kind() {
        for field in FEATURE_FIELDS {
            assert!(field_kind(field).is_some(), "no kind for {}", field);
        }
    }

    #[test]
    fn target_is_binary() {
        assert_eq!(field_kind(TARGET_FIELD), Some(FieldKind::Binary));
    }

    #[test]
    fn unknown_field_has_no_kind() {
        assert!(field_kind("BloodType").is_none());
    }
}
