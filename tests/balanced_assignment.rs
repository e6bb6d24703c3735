// End-to-end checks of the assignment pipeline on small cohorts

#![cfg(feature = "solver")]

use std::collections::BTreeSet;

use syndopt::{
    assign_groups, formulate, preprocess, AssignmentPolicy, MicrolpSolver, PipelineError,
    PreconditionError, PreprocessError, RawStudentRecord, SolutionStatus, SolverService,
    VALUE_EPSILON,
};

fn record(id: &str, nationality: &str, culture: &str, gender: &str, quant: i64) -> RawStudentRecord {
    RawStudentRecord {
        id: id.to_string(),
        nationality: nationality.to_string(),
        culture: culture.to_string(),
        gender: gender.to_string(),
        quant_background: quant,
    }
}

/// Ten international students in two five-student nationality blocks, each
/// block with two females and two quantitative members.
fn two_nation_roster() -> Vec<RawStudentRecord> {
    let mut records = Vec::new();
    for (block, (nationality, culture)) in
        [("Spanish", "Hispanic"), ("Japanese", "East Asian")].iter().enumerate()
    {
        for i in 0..5 {
            records.push(record(
                &format!("S{}", block * 5 + i + 1),
                nationality,
                culture,
                if i < 2 { "F" } else { "M" },
                if i < 2 { 1 } else { 0 },
            ));
        }
    }
    records
}

/// Same roster with every female but S1 flipped to male.
fn one_female_roster() -> Vec<RawStudentRecord> {
    let mut records = two_nation_roster();
    for index in [1, 5, 6] {
        records[index].gender = "M".to_string();
    }
    records
}

#[test]
fn ten_students_split_into_two_balanced_groups() {
    let policy = AssignmentPolicy::default();
    let assignment = assign_groups(&two_nation_roster(), &policy, &MicrolpSolver::new()).unwrap();

    assert_eq!(assignment.rosters.len(), 2);
    let mut seen = BTreeSet::new();
    for roster in &assignment.rosters {
        assert_eq!(roster.members.len(), 5);
        assert_eq!(roster.female_count, 2);
        assert_eq!(roster.quant_count, 2);
        seen.extend(roster.members.iter().cloned());
    }
    let expected: BTreeSet<String> = (1..=10).map(|i| format!("S{i}")).collect();
    assert_eq!(seen, expected);
}

#[test]
fn objective_equals_the_cohorts_pairing_ceiling() {
    // Every pairing proxy tops out at half its group total, and each label's
    // totals sum to its cohort-wide headcount, so ten international students
    // are worth 100 * 5 + 10 * 5 regardless of the arrangement.
    let policy = AssignmentPolicy::default();
    let roster = two_nation_roster();
    let assignment = assign_groups(&roster, &policy, &MicrolpSolver::new()).unwrap();

    assert!((assignment.objective_value - 550.0).abs() < VALUE_EPSILON);

    let cohort = preprocess(&roster, &policy).unwrap();
    let recomputed = assignment.affinity_score(&cohort, &policy);
    assert!((recomputed - assignment.objective_value).abs() < VALUE_EPSILON);
}

#[test]
fn pairing_proxies_are_pinned_to_half_their_group_totals() {
    let policy = AssignmentPolicy::default();
    let cohort = preprocess(&two_nation_roster(), &policy).unwrap();
    let formulation = formulate(&cohort, &policy);
    let solution = MicrolpSolver::new().solve(&formulation.problem).unwrap();
    assert_eq!(solution.status, SolutionStatus::Optimal);

    let families = [
        (
            &formulation.catalog.nationality_totals,
            &formulation.catalog.nationality_pairings,
        ),
        (
            &formulation.catalog.culture_totals,
            &formulation.catalog.culture_pairings,
        ),
    ];
    for (totals, pairings) in families {
        for (label, total_vars) in totals {
            let mut label_headcount = 0.0;
            for (&t_var, &p_var) in total_vars.iter().zip(&pairings[label]) {
                let total = solution.value(t_var).unwrap();
                let pairing = solution.value(p_var).unwrap();
                assert!(
                    (pairing - 0.5 * total).abs() < VALUE_EPSILON,
                    "{label}: pairing {pairing} vs total {total}"
                );
                label_headcount += total;
            }
            // Each five-student block's totals add up across the groups.
            assert!((label_headcount - 5.0).abs() < VALUE_EPSILON);
        }
    }
}

#[test]
fn repeated_runs_produce_identical_assignments() {
    let policy = AssignmentPolicy::default();
    let roster = two_nation_roster();
    let first = assign_groups(&roster, &policy, &MicrolpSolver::new()).unwrap();
    let second = assign_groups(&roster, &policy, &MicrolpSolver::new()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn a_cohort_that_cannot_fill_groups_evenly_is_rejected() {
    let roster: Vec<RawStudentRecord> = two_nation_roster().into_iter().take(6).collect();
    let err = assign_groups(&roster, &AssignmentPolicy::default(), &MicrolpSolver::new())
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Preprocess(PreprocessError::IndivisibleCohort {
            students: 6,
            capacity: 5,
        })
    ));
}

#[test]
fn a_cohort_without_enough_females_fails_the_screen() {
    let err = assign_groups(
        &one_female_roster(),
        &AssignmentPolicy::default(),
        &MicrolpSolver::new(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Precondition(PreconditionError::FemaleCountInfeasible {
            total: 1,
            groups: 2,
            min: 4,
            max: 6,
        })
    ));
}

#[test]
fn the_model_itself_goes_infeasible_when_bands_cannot_be_met() {
    // Bypassing the screen and solving anyway must reach the same verdict.
    let policy = AssignmentPolicy::default();
    let cohort = preprocess(&one_female_roster(), &policy).unwrap();
    let formulation = formulate(&cohort, &policy);
    let solution = MicrolpSolver::new().solve(&formulation.problem).unwrap();
    assert_eq!(solution.status, SolutionStatus::Infeasible);
    assert!(solution.objective_value.is_none());
}

#[test]
fn malformed_gender_markers_fail_preprocessing_with_context() {
    let mut roster = two_nation_roster();
    roster[4].gender = "X".to_string();
    let err = assign_groups(&roster, &AssignmentPolicy::default(), &MicrolpSolver::new())
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("S5"));
    assert!(message.contains("gender marker"));
}

#[test]
fn a_home_only_cohort_solves_with_zero_affinity() {
    let records: Vec<RawStudentRecord> = (1..=5)
        .map(|i| {
            record(
                &format!("S{i}"),
                "British",
                "Western",
                if i <= 2 { "F" } else { "M" },
                if i <= 2 { 1 } else { 0 },
            )
        })
        .collect();
    let assignment =
        assign_groups(&records, &AssignmentPolicy::default(), &MicrolpSolver::new()).unwrap();

    assert_eq!(assignment.rosters.len(), 1);
    assert!(assignment.objective_value.abs() < VALUE_EPSILON);
    assert_eq!(assignment.rosters[0].nationality_histogram["British"], 5);
}
