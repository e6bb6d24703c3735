// Cohort: the cleaned student population a grouping run operates on

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One row of the input roster, as supplied by the caller.
///
/// Field values are raw: gender markers and flags are validated and
/// normalized during preprocessing, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStudentRecord {
    pub id: String,
    pub nationality: String,
    pub culture: String,
    pub gender: String,
    pub quant_background: i64,
}

/// A validated student with derived attributes resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: String,
    pub female: bool,
    pub quant: bool,
    /// True when the nationality differs from the policy's home nationality.
    pub international: bool,
    pub nationality: String,
    pub culture: String,
}

/// The full validated student population, in input order.
#[derive(Debug, Clone)]
pub struct Cohort {
    students: Vec<Student>,
    by_id: BTreeMap<String, usize>,
}

impl Cohort {
    pub(crate) fn new(students: Vec<Student>) -> Self {
        let by_id = students
            .iter()
            .enumerate()
            .map(|(index, student)| (student.id.clone(), index))
            .collect();
        Self { students, by_id }
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Student> {
        self.by_id.get(id).map(|&index| &self.students[index])
    }

    pub fn female_total(&self) -> u32 {
        self.students.iter().filter(|s| s.female).count() as u32
    }

    pub fn quant_total(&self) -> u32 {
        self.students.iter().filter(|s| s.quant).count() as u32
    }

    /// International students keyed by nationality label, in label order.
    pub fn nationality_groups(&self) -> BTreeMap<&str, Vec<usize>> {
        self.category_groups(|student| &student.nationality)
    }

    /// International students keyed by culture label, in label order.
    pub fn culture_groups(&self) -> BTreeMap<&str, Vec<usize>> {
        self.category_groups(|student| &student.culture)
    }

    fn category_groups(&self, label: fn(&Student) -> &str) -> BTreeMap<&str, Vec<usize>> {
        let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (index, student) in self.students.iter().enumerate() {
            if student.international {
                groups.entry(label(student)).or_default().push(index);
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: &str, female: bool, quant: bool, international: bool, nat: &str, cul: &str) -> Student {
        Student {
            id: id.to_string(),
            female,
            quant,
            international,
            nationality: nat.to_string(),
            culture: cul.to_string(),
        }
    }

    fn sample() -> Cohort {
        Cohort::new(vec![
            student("S1", true, true, true, "Spanish", "Hispanic"),
            student("S2", false, true, true, "Japanese", "East Asian"),
            student("S3", true, false, false, "British", "Western"),
            student("S4", false, false, true, "Spanish", "Hispanic"),
        ])
    }

    #[test]
    fn lookup_by_id_returns_the_matching_student() {
        let cohort = sample();
        assert_eq!(cohort.len(), 4);
        assert_eq!(cohort.get("S2").map(|s| s.nationality.as_str()), Some("Japanese"));
        assert!(cohort.get("S9").is_none());
    }

    #[test]
    fn aggregate_totals_count_flagged_students() {
        let cohort = sample();
        assert_eq!(cohort.female_total(), 2);
        assert_eq!(cohort.quant_total(), 2);
    }

    #[test]
    fn category_groups_cover_international_students_only() {
        let cohort = sample();
        let nationalities = cohort.nationality_groups();
        assert_eq!(
            nationalities.keys().copied().collect::<Vec<_>>(),
            vec!["Japanese", "Spanish"]
        );
        assert_eq!(nationalities["Spanish"], vec![0, 3]);
        assert_eq!(nationalities["Japanese"], vec![1]);
        // The home student never appears, under either keying.
        assert!(!nationalities.contains_key("British"));
        assert!(!cohort.culture_groups().contains_key("Western"));
    }

    #[test]
    fn category_group_keys_are_label_sorted() {
        let cohort = Cohort::new(vec![
            student("S1", false, false, true, "Zimbabwean", "African"),
            student("S2", false, false, true, "Argentine", "Hispanic"),
            student("S3", false, false, true, "Malaysian", "South East Asian"),
        ]);
        let keys: Vec<_> = cohort.nationality_groups().keys().copied().collect();
        assert_eq!(keys, vec!["Argentine", "Malaysian", "Zimbabwean"]);
    }
}
