// Model building: translates a cohort and policy into a mixed-integer program

use std::collections::BTreeMap;

use crate::domain::{
    AssignmentPolicy, Band, Cohort, Constraint, ConstraintType, OptimizationProblem,
    OptimizationType, VarId, Variable,
};

/// Where each family of decision variables landed in the problem's registry.
///
/// Indices mirror the cohort: `assignment[s][g]` is the placement variable of
/// student `s` in group `g`. Category maps are keyed by the same labels as
/// the cohort's category groupings.
#[derive(Debug, Clone)]
pub struct VariableCatalog {
    pub assignment: Vec<Vec<VarId>>,
    pub female_totals: Vec<VarId>,
    pub quant_totals: Vec<VarId>,
    pub nationality_totals: BTreeMap<String, Vec<VarId>>,
    pub nationality_pairings: BTreeMap<String, Vec<VarId>>,
    pub culture_totals: BTreeMap<String, Vec<VarId>>,
    pub culture_pairings: BTreeMap<String, Vec<VarId>>,
}

/// A built optimization model together with its variable catalog.
#[derive(Debug, Clone)]
pub struct Formulation {
    pub problem: OptimizationProblem,
    pub catalog: VariableCatalog,
    /// Group labels, in group-index order.
    pub groups: Vec<String>,
}

/// Builds the grouping model for a cohort under a policy.
///
/// Placement variables are binary; every aggregate (female count, quant
/// count, per-label totals and pairing proxies) is a continuous variable tied
/// to the placements by an equality row, so the solution carries every
/// aggregate explicitly. Pairing proxies are rewarded in the objective and
/// capped at half their label's group total.
///
/// The cohort must divide evenly into groups of `policy.group_capacity`;
/// preprocessing guarantees this.
pub fn formulate(cohort: &Cohort, policy: &AssignmentPolicy) -> Formulation {
    let num_groups = cohort.len() / policy.group_capacity;
    let groups: Vec<String> = (1..=num_groups).map(|g| format!("G{g}")).collect();

    let mut problem =
        OptimizationProblem::new("balanced_grouping", OptimizationType::Maximize)
            .with_description(format!(
                "{} students into {} groups of {}",
                cohort.len(),
                num_groups,
                policy.group_capacity
            ));

    // One binary placement variable per student and group.
    let mut assignment = Vec::with_capacity(cohort.len());
    for student in cohort.students() {
        let mut row = Vec::with_capacity(num_groups);
        for group in &groups {
            row.push(problem.add_variable(Variable::binary(format!(
                "x[{},{}]",
                student.id, group
            ))));
        }
        assignment.push(row);
    }

    // Each student joins exactly one group.
    for (s, student) in cohort.students().iter().enumerate() {
        let terms = assignment[s].iter().map(|&var| (var, 1.0)).collect();
        problem.add_constraint(
            Constraint::new(ConstraintType::Equal, terms, 1.0)
                .with_name(format!("assign[{}]", student.id)),
        );
    }

    // Each group is filled to capacity exactly.
    for (g, group) in groups.iter().enumerate() {
        let terms = assignment.iter().map(|row| (row[g], 1.0)).collect();
        problem.add_constraint(
            Constraint::new(ConstraintType::Equal, terms, policy.group_capacity as f64)
                .with_name(format!("capacity[{group}]")),
        );
    }

    let females: Vec<usize> = flagged(cohort, |s| s.female);
    let quants: Vec<usize> = flagged(cohort, |s| s.quant);
    let female_totals = add_balance_band(
        &mut problem,
        &assignment,
        &females,
        &groups,
        policy.female_band,
        "F",
        "female",
    );
    let quant_totals = add_balance_band(
        &mut problem,
        &assignment,
        &quants,
        &groups,
        policy.quant_band,
        "Q",
        "quant",
    );

    let (nationality_totals, nationality_pairings) = link_category_family(
        &mut problem,
        &assignment,
        &cohort.nationality_groups(),
        &groups,
        policy.nationality_weight,
        "nat",
    );
    let (culture_totals, culture_pairings) = link_category_family(
        &mut problem,
        &assignment,
        &cohort.culture_groups(),
        &groups,
        policy.culture_weight,
        "cul",
    );

    log::debug!(
        "formulated '{}': {} variables ({} binary), {} constraints",
        problem.name,
        problem.num_variables(),
        problem.num_binary_variables(),
        problem.num_constraints()
    );

    Formulation {
        problem,
        catalog: VariableCatalog {
            assignment,
            female_totals,
            quant_totals,
            nationality_totals,
            nationality_pairings,
            culture_totals,
            culture_pairings,
        },
        groups,
    }
}

fn flagged(cohort: &Cohort, predicate: fn(&crate::domain::Student) -> bool) -> Vec<usize> {
    cohort
        .students()
        .iter()
        .enumerate()
        .filter(|(_, student)| predicate(student))
        .map(|(index, _)| index)
        .collect()
}

/// Declares one banded aggregate per group: a continuous total variable, an
/// equality row tying it to the flagged placements, and the band's lower and
/// upper bound rows.
fn add_balance_band(
    problem: &mut OptimizationProblem,
    assignment: &[Vec<VarId>],
    flagged: &[usize],
    groups: &[String],
    band: Band,
    var_prefix: &str,
    family: &str,
) -> Vec<VarId> {
    let mut totals = Vec::with_capacity(groups.len());
    for (g, group) in groups.iter().enumerate() {
        let total = problem.add_variable(Variable::continuous(format!("{var_prefix}[{group}]")));

        let mut link_terms = vec![(total, 1.0)];
        for &s in flagged {
            link_terms.push((assignment[s][g], -1.0));
        }
        problem.add_constraint(
            Constraint::new(ConstraintType::Equal, link_terms, 0.0)
                .with_name(format!("{family}_link[{group}]")),
        );
        problem.add_constraint(
            Constraint::new(
                ConstraintType::GreaterThanOrEqual,
                vec![(total, 1.0)],
                f64::from(band.min),
            )
            .with_name(format!("{family}_min[{group}]")),
        );
        problem.add_constraint(
            Constraint::new(
                ConstraintType::LessThanOrEqual,
                vec![(total, 1.0)],
                f64::from(band.max),
            )
            .with_name(format!("{family}_max[{group}]")),
        );

        totals.push(total);
    }
    totals
}

/// Declares the per-label, per-group total and pairing-proxy variables for
/// one category family, links the totals to the placements, caps each proxy
/// at half its total, and rewards the proxies in the objective.
fn link_category_family(
    problem: &mut OptimizationProblem,
    assignment: &[Vec<VarId>],
    members_by_label: &BTreeMap<&str, Vec<usize>>,
    groups: &[String],
    weight: f64,
    prefix: &str,
) -> (BTreeMap<String, Vec<VarId>>, BTreeMap<String, Vec<VarId>>) {
    let mut totals = BTreeMap::new();
    let mut pairings = BTreeMap::new();
    for (&label, members) in members_by_label {
        let mut label_totals = Vec::with_capacity(groups.len());
        let mut label_pairings = Vec::with_capacity(groups.len());
        for (g, group) in groups.iter().enumerate() {
            let total = problem.add_variable(Variable::continuous(format!(
                "T_{prefix}[{label},{group}]"
            )));
            let pairing = problem.add_variable(Variable::continuous(format!(
                "P_{prefix}[{label},{group}]"
            )));

            let mut link_terms = vec![(total, 1.0)];
            for &s in members {
                link_terms.push((assignment[s][g], -1.0));
            }
            problem.add_constraint(
                Constraint::new(ConstraintType::Equal, link_terms, 0.0)
                    .with_name(format!("{prefix}_link[{label},{group}]")),
            );
            problem.add_constraint(
                Constraint::new(
                    ConstraintType::LessThanOrEqual,
                    vec![(pairing, 1.0), (total, -0.5)],
                    0.0,
                )
                .with_name(format!("{prefix}_pair[{label},{group}]")),
            );
            problem.add_objective_term(pairing, weight);

            label_totals.push(total);
            label_pairings.push(pairing);
        }
        totals.insert(label.to_string(), label_totals);
        pairings.insert(label.to_string(), label_pairings);
    }
    (totals, pairings)
}
