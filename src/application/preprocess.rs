// Roster preprocessing: validates raw records and derives student attributes

use std::collections::BTreeSet;

use crate::domain::{AssignmentPolicy, Cohort, RawStudentRecord, Student};

/// Errors raised while turning raw records into a cohort.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PreprocessError {
    #[error("no student records supplied")]
    EmptyCohort,

    #[error("group capacity must be at least 1")]
    ZeroCapacity,

    #[error("{students} students cannot fill groups of {capacity} exactly")]
    IndivisibleCohort { students: usize, capacity: usize },

    #[error("duplicate student id '{id}'")]
    DuplicateId { id: String },

    #[error("student '{id}' has unrecognized gender marker '{value}', expected M or F")]
    UnrecognizedGender { id: String, value: String },

    #[error("student '{id}' has quantitative flag {value}, expected 0 or 1")]
    InvalidQuantFlag { id: String, value: i64 },
}

/// Validates the roster and resolves each student's derived attributes.
///
/// Gender markers are matched case-insensitively after trimming whitespace.
/// A student counts as international when their nationality differs from the
/// policy's home nationality, compared case-insensitively; the labels
/// themselves are carried through verbatim.
pub fn preprocess(
    records: &[RawStudentRecord],
    policy: &AssignmentPolicy,
) -> Result<Cohort, PreprocessError> {
    if records.is_empty() {
        return Err(PreprocessError::EmptyCohort);
    }
    if policy.group_capacity == 0 {
        return Err(PreprocessError::ZeroCapacity);
    }
    if records.len() % policy.group_capacity != 0 {
        return Err(PreprocessError::IndivisibleCohort {
            students: records.len(),
            capacity: policy.group_capacity,
        });
    }

    let home = policy.home_nationality.to_lowercase();
    let mut seen_ids = BTreeSet::new();
    let mut students = Vec::with_capacity(records.len());
    for record in records {
        if !seen_ids.insert(record.id.clone()) {
            return Err(PreprocessError::DuplicateId {
                id: record.id.clone(),
            });
        }

        let female = match record.gender.trim().to_uppercase().as_str() {
            "F" => true,
            "M" => false,
            _ => {
                return Err(PreprocessError::UnrecognizedGender {
                    id: record.id.clone(),
                    value: record.gender.clone(),
                })
            }
        };

        let quant = match record.quant_background {
            0 => false,
            1 => true,
            other => {
                return Err(PreprocessError::InvalidQuantFlag {
                    id: record.id.clone(),
                    value: other,
                })
            }
        };

        students.push(Student {
            id: record.id.clone(),
            female,
            quant,
            international: record.nationality.to_lowercase() != home,
            nationality: record.nationality.clone(),
            culture: record.culture.clone(),
        });
    }

    Ok(Cohort::new(students))
}
