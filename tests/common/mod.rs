#![allow(dead_code)]

use cdcl_engine::{Cdcl, Literal, SolveResult, SolverOptions};

pub fn lits(values: &[i32]) -> Vec<Literal> {
    values.iter().copied().map(Literal::from_i32).collect()
}

/// A solver over `vars` variables holding `cnf`. Returns the solver and
/// whether every clause was accepted without a root contradiction.
pub fn load(options: SolverOptions, vars: usize, cnf: &[Vec<i32>]) -> (Cdcl, bool) {
    let mut solver = Cdcl::with_options(options).expect("valid options");
    for _ in 0..vars {
        solver.new_var();
    }
    let mut ok = true;
    for clause in cnf {
        ok &= solver.add_clause(&lits(clause)).expect("known variables");
    }
    (solver, ok)
}

pub fn solver_for(vars: usize, cnf: &[Vec<i32>]) -> Cdcl {
    load(SolverOptions::default(), vars, cnf).0
}

/// `true` if some assignment of `vars` variables satisfies `cnf` and every
/// literal in `assumptions`.
pub fn brute_force(vars: usize, cnf: &[Vec<i32>], assumptions: &[i32]) -> bool {
    let holds = |bits: u32, lit: i32| {
        let var = lit.unsigned_abs() - 1;
        ((bits >> var) & 1 == 1) == (lit > 0)
    };
    (0u32..1 << vars).any(|bits| {
        assumptions.iter().all(|&a| holds(bits, a))
            && cnf.iter().all(|clause| clause.iter().any(|&l| holds(bits, l)))
    })
}

/// Asserts that the last model satisfies `cnf` and `assumptions`.
pub fn assert_model(solver: &Cdcl, cnf: &[Vec<i32>], assumptions: &[i32]) {
    let model = solver.model().expect("model after SAT");
    for clause in cnf {
        assert!(model.satisfies(&lits(clause)), "clause {clause:?} falsified");
    }
    for &a in assumptions {
        assert!(
            model.lit_value(Literal::from_i32(a)).is_true(),
            "assumption {a} not honoured"
        );
    }
}

/// `holes + 1` pigeons into `holes` holes.
pub fn pigeonhole(holes: i32) -> (usize, Vec<Vec<i32>>) {
    let pigeons = holes + 1;
    let var = |p: i32, h: i32| p * holes + h + 1;
    let mut cnf: Vec<Vec<i32>> = (0..pigeons)
        .map(|p| (0..holes).map(|h| var(p, h)).collect())
        .collect();
    for h in 0..holes {
        for p in 0..pigeons {
            for q in p + 1..pigeons {
                cnf.push(vec![-var(p, h), -var(q, h)]);
            }
        }
    }
    (usize::try_from(pigeons * holes).unwrap(), cnf)
}

/// Seeded uniform random 3-SAT.
pub fn random_3sat(vars: i32, clauses: usize, seed: u64) -> Vec<Vec<i32>> {
    let mut rng = fastrand::Rng::with_seed(seed);
    (0..clauses)
        .map(|_| {
            (0..3)
                .map(|_| {
                    let v = rng.i32(1..=vars);
                    if rng.bool() { v } else { -v }
                })
                .collect()
        })
        .collect()
}

pub fn expected(sat: bool) -> SolveResult {
    if sat { SolveResult::Sat } else { SolveResult::Unsat }
}
