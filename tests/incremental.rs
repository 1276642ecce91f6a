mod common;

use cdcl_engine::sat::clause_management::ClauseManagementType;
use cdcl_engine::sat::restarter::RestartPolicy;
use cdcl_engine::{ClauseMinimisation, LBool, Literal, PhaseSaving, SolveResult, SolverOptions};
use clap::ValueEnum;
use common::{assert_model, brute_force, expected, lits, load, pigeonhole, random_3sat, solver_for};

#[test]
fn test_clauses_added_between_calls() {
    let mut cnf = vec![vec![1, 2, 3]];
    let mut solver = solver_for(3, &cnf);
    assert_eq!(solver.solve(&[]), Ok(SolveResult::Sat));
    assert_model(&solver, &cnf, &[]);

    for clause in [vec![-1], vec![-3, 2]] {
        assert_eq!(solver.add_clause(&lits(&clause)), Ok(true));
        cnf.push(clause);
    }
    assert_eq!(solver.solve(&[]), Ok(SolveResult::Sat));
    assert_model(&solver, &cnf, &[]);
    assert_eq!(solver.model_value(1), Ok(LBool::True));

    // -2 forces -3 at the root, which falsifies the first clause.
    assert_eq!(solver.add_clause(&lits(&[-2])), Ok(false));
    assert_eq!(solver.solve(&[]), Ok(SolveResult::Unsat));
}

#[test]
fn test_failed_assumptions_exclude_unrelated_literals() {
    let mut solver = solver_for(4, &[vec![-1, 2], vec![-2, 3]]);
    let assumptions = lits(&[1, 4, -3]);

    assert_eq!(solver.solve(&assumptions), Ok(SolveResult::Unsat));
    assert!(solver.okay());

    let mut failed = solver.failed_assumptions().to_vec();
    failed.sort_unstable();
    assert_eq!(failed, lits(&[1, -3]));
    assert!(failed.iter().all(|l| assumptions.contains(l)));

    // The same formula with only the failed subset is still unsatisfiable.
    assert_eq!(solver.solve(&failed), Ok(SolveResult::Unsat));
    assert_eq!(solver.solve(&lits(&[1, 4])), Ok(SolveResult::Sat));
    assert_model(&solver, &[vec![-1, 2], vec![-2, 3]], &[1, 4]);
}

#[test]
fn test_assumption_contradicting_root_fact() {
    let mut solver = solver_for(2, &[vec![1]]);
    assert_eq!(solver.solve(&lits(&[2, -1])), Ok(SolveResult::Unsat));
    assert_eq!(solver.failed_assumptions(), lits(&[-1]).as_slice());
    assert_eq!(solver.conflict_literal(0), Ok(Literal::from_i32(-1)));
}

#[test]
fn test_repeated_assumption_calls_leave_solver_reusable() {
    let cnf = random_3sat(30, 110, 7);
    let mut solver = solver_for(30, &cnf);

    for round in 0..10 {
        let a = (round % 30) + 1;
        let assumptions = [a, -(((round + 7) % 30) + 1)];
        let result = solver.solve(&lits(&assumptions)).unwrap();
        assert_ne!(result, SolveResult::Unknown);
        if result.is_sat() {
            assert_model(&solver, &cnf, &assumptions);
        } else if solver.okay() {
            let failed = solver.failed_assumptions();
            assert!(!failed.is_empty());
            assert!(failed.iter().all(|l| lits(&assumptions).contains(l)));
        }
        assert_eq!(solver.num_assigns(), root_facts(&solver));
    }
    assert_eq!(solver.stats().solves, 10);
}

fn root_facts(solver: &cdcl_engine::Cdcl) -> usize {
    (0..u32::try_from(solver.num_vars()).unwrap())
        .filter(|&v| !solver.value(v).unwrap().is_undef())
        .count()
}

#[test]
fn test_budget_resumes_to_same_answer() {
    let (vars, cnf) = pigeonhole(6);
    let mut solver = solver_for(vars, &cnf);

    let mut last = 0;
    let mut rounds = 0;
    let result = loop {
        solver.set_conflict_budget(50);
        match solver.solve_limited(&[]).unwrap() {
            SolveResult::Unknown => {
                assert!(solver.conflicts() >= last);
                assert!(solver.okay());
                last = solver.conflicts();
                rounds += 1;
                assert!(rounds < 100_000, "bounded solving made no progress");
            }
            other => break other,
        }
    };
    assert_eq!(result, SolveResult::Unsat);
    assert!(!solver.okay());
}

#[test]
fn test_budget_is_relative_to_current_counters() {
    let (vars, cnf) = pigeonhole(6);
    let mut solver = solver_for(vars, &cnf);

    solver.set_conflict_budget(20);
    assert_eq!(solver.solve_limited(&[]), Ok(SolveResult::Unknown));
    let spent = solver.conflicts();
    assert!(spent >= 20);

    solver.set_conflict_budget(0);
    assert_eq!(solver.solve_limited(&[]), Ok(SolveResult::Unknown));
    assert_eq!(solver.conflicts(), spent);
}

#[test]
fn test_simplify_is_idempotent() {
    let mut cnf = random_3sat(20, 60, 3);
    let mut solver = solver_for(20, &cnf);
    for unit in [vec![1], vec![-2], vec![5]] {
        if solver.add_clause(&lits(&unit)) == Ok(true) {
            cnf.push(unit);
        }
    }

    let first = solver.simplify();
    let clauses = solver.num_clauses();
    let assigns = solver.num_assigns();
    assert_eq!(solver.simplify(), first);
    assert_eq!(solver.num_clauses(), clauses);
    assert_eq!(solver.num_assigns(), assigns);

    let result = solver.solve(&[]).unwrap();
    assert_eq!(result, expected(brute_force(20, &cnf, &[])));
    if result.is_sat() {
        assert_model(&solver, &cnf, &[]);
    }
}

#[test]
fn test_every_configuration_agrees() {
    let instances: Vec<_> = (0..6).map(|seed| random_3sat(12, 52, seed)).collect();
    let answers: Vec<_> = instances
        .iter()
        .map(|cnf| expected(brute_force(12, cnf, &[])))
        .collect();

    let mut configs = Vec::new();
    for &policy in RestartPolicy::value_variants() {
        configs.push(SolverOptions {
            restart_policy: policy,
            restart_first: 2,
            ..SolverOptions::default()
        });
    }
    for &mode in ClauseMinimisation::value_variants() {
        configs.push(SolverOptions {
            ccmin_mode: mode,
            ..SolverOptions::default()
        });
    }
    for &phase in PhaseSaving::value_variants() {
        configs.push(SolverOptions {
            phase_saving: phase,
            ..SolverOptions::default()
        });
    }
    for &management in ClauseManagementType::value_variants() {
        configs.push(SolverOptions {
            clause_management: management,
            learntsize_factor: 0.01,
            learntsize_adjust_start_confl: 1,
            ..SolverOptions::default()
        });
    }
    configs.push(SolverOptions {
        random_var_freq: 0.5,
        random_polarity: true,
        random_seed: 42,
        garbage_frac: 0.01,
        remove_satisfied: false,
        ..SolverOptions::default()
    });

    for options in configs {
        for (cnf, &answer) in instances.iter().zip(&answers) {
            let (mut solver, _) = load(options.clone(), 12, cnf);
            assert_eq!(solver.solve(&[]), Ok(answer), "{options:?}");
            if answer.is_sat() {
                assert_model(&solver, cnf, &[]);
            }
        }
    }
}

#[test]
fn test_same_seed_same_search() {
    let cnf = random_3sat(40, 170, 11);
    let options = SolverOptions {
        random_var_freq: 0.2,
        random_polarity: true,
        ..SolverOptions::default()
    };
    let (mut a, _) = load(options.clone(), 40, &cnf);
    let (mut b, _) = load(options, 40, &cnf);

    assert_eq!(a.solve(&[]), b.solve(&[]));
    assert_eq!(a.stats(), b.stats());
    assert_eq!(a.model().ok(), b.model().ok());
}

#[test]
fn test_decision_exclusion_and_polarity() {
    let mut solver = solver_for(3, &[vec![1, 2, 3]]);
    solver.set_decision_var(0, false).unwrap();
    solver.set_decision_var(1, false).unwrap();
    solver.set_polarity(2, Some(true)).unwrap();
    assert_eq!(solver.num_free_vars(), 1);

    assert_eq!(solver.solve(&[]), Ok(SolveResult::Sat));
    assert_eq!(solver.model_value(2), Ok(LBool::True));
    assert_eq!(solver.model_value(0), Ok(LBool::Undef));

    solver.set_decision_var(0, true).unwrap();
    assert_eq!(solver.is_decision_var(0), Ok(true));
    assert_eq!(solver.num_free_vars(), 2);
}

#[test]
fn test_larger_conflict_budget_never_loses_an_answer() {
    let mut instances: Vec<(usize, Vec<Vec<i32>>)> =
        (0..20).map(|seed| (30, random_3sat(30, 128, seed))).collect();
    instances.push(pigeonhole(5));

    for (vars, cnf) in &instances {
        let mut settled: Option<SolveResult> = None;
        for budget in 0..200 {
            let mut solver = solver_for(*vars, cnf);
            solver.set_conflict_budget(budget);
            let result = solver.solve_limited(&[]).unwrap();
            match settled {
                Some(answer) => assert_eq!(result, answer, "budget {budget} lost the answer"),
                None if !result.is_unknown() => settled = Some(result),
                None => {}
            }
        }
        let truth = solver_for(*vars, cnf).solve(&[]).unwrap();
        if let Some(answer) = settled {
            assert_eq!(answer, truth);
        }
    }
}

#[test]
fn test_unchanged_instance_solves_the_same_twice() {
    let mut instances: Vec<(usize, Vec<Vec<i32>>)> =
        (20..40).map(|seed| (30, random_3sat(30, 128, seed))).collect();
    instances.push(pigeonhole(5));

    for (vars, cnf) in &instances {
        let mut solver = solver_for(*vars, cnf);
        let first = solver.solve(&[]).unwrap();
        if first.is_sat() {
            assert_model(&solver, cnf, &[]);
        }
        let second = solver.solve(&[]).unwrap();
        assert_eq!(first, second);
        if second.is_sat() {
            assert_model(&solver, cnf, &[]);
        }
        assert_eq!(solver.stats().solves, 2);
    }
}
