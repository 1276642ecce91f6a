mod common;

use cdcl_engine::{Cdcl, LBool, Literal, SolveResult, SolverError};
use common::{lits, pigeonhole, solver_for};

#[test]
fn test_single_free_variable_is_sat() {
    let mut solver = Cdcl::new();
    let x = solver.new_var();

    assert_eq!(solver.solve(&[]), Ok(SolveResult::Sat));
    assert!(!solver.model_value(x).unwrap().is_undef());
    assert_eq!(solver.model().unwrap().len(), 1);
}

#[test]
fn test_contradictory_units() {
    let mut solver = Cdcl::new();
    let x = solver.new_var();

    assert_eq!(solver.add_clause(&[Literal::positive(x)]), Ok(true));
    assert_eq!(solver.add_clause(&[Literal::negative(x)]), Ok(false));
    assert!(!solver.okay());

    assert_eq!(solver.solve(&[]), Ok(SolveResult::Unsat));
    assert!(solver.failed_assumptions().is_empty());
    assert_eq!(solver.model(), Err(SolverError::NoModel));

    let y = solver.new_var();
    assert_eq!(solver.add_clause(&[Literal::positive(y)]), Ok(false));
    assert_eq!(solver.solve(&[Literal::positive(y)]), Ok(SolveResult::Unsat));
}

#[test]
fn test_all_four_binary_clauses_are_unsat() {
    let mut solver = solver_for(2, &[vec![1, 2], vec![-1, 2], vec![1, -2], vec![-1, -2]]);

    assert_eq!(solver.solve(&[]), Ok(SolveResult::Unsat));
    assert!(!solver.okay());
    assert!(solver.failed_assumptions().is_empty());
}

#[test]
fn test_assumptions_falsify_the_only_clause() {
    let mut solver = solver_for(2, &[vec![1, 2]]);
    let assumptions = lits(&[-1, -2]);

    assert_eq!(solver.solve(&assumptions), Ok(SolveResult::Unsat));
    assert!(solver.okay());

    let mut failed = solver.failed_assumptions().to_vec();
    failed.sort_unstable();
    assert_eq!(failed, assumptions);
    assert_eq!(solver.conflict_len(), 2);

    assert_eq!(solver.solve(&[]), Ok(SolveResult::Sat));
    assert!(solver.failed_assumptions().is_empty());
}

#[test]
fn test_zero_conflict_budget_gives_unknown() {
    let (vars, cnf) = pigeonhole(4);
    let mut solver = solver_for(vars, &cnf);

    solver.set_conflict_budget(0);
    assert_eq!(solver.solve_limited(&[]), Ok(SolveResult::Unknown));
    assert_eq!(solver.conflicts(), 0);
    assert!(solver.okay());
    assert_eq!(solver.model(), Err(SolverError::NoModel));
    assert_eq!(solver.conflict_literal(0), Err(SolverError::NoConflict));

    assert_eq!(solver.solve(&[]), Ok(SolveResult::Unsat));
    assert!(!solver.okay());
}

#[test]
fn test_zero_propagation_budget_gives_unknown() {
    let mut solver = solver_for(3, &[vec![1, 2, 3], vec![-1, -2]]);

    solver.set_propagation_budget(0);
    assert_eq!(solver.solve_limited(&[]), Ok(SolveResult::Unknown));
    solver.budget_off();
    assert_eq!(solver.solve_limited(&[]), Ok(SolveResult::Sat));
}

#[test]
fn test_unit_chain_at_root() {
    let mut solver = solver_for(4, &[vec![-1, 2], vec![-2, 3], vec![-3, 4]]);
    assert_eq!(solver.add_clause(&lits(&[1])), Ok(true));

    for var in 0..4 {
        assert_eq!(solver.value(var), Ok(LBool::True));
    }
    assert_eq!(solver.num_assigns(), 4);
    assert_eq!(solver.num_free_vars(), 0);
    assert_eq!(solver.add_clause(&lits(&[-4])), Ok(false));
}

#[test]
fn test_pigeonhole_is_unsat() {
    let (vars, cnf) = pigeonhole(5);
    let mut solver = solver_for(vars, &cnf);

    assert_eq!(solver.solve(&[]), Ok(SolveResult::Unsat));
    assert!(solver.conflicts() > 0);
    let stats = solver.stats();
    assert_eq!(stats.solves, 1);
    assert_eq!(stats.conflicts, solver.conflicts());
    assert!(stats.tot_literals <= stats.max_literals);
}
