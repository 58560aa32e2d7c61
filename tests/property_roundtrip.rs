//! Property-based compile/decompile tests (proptest).

use proptest::prelude::*;

use clausedb::ast::builders::AtomBuilder;
use clausedb::{Atom, ClauseDb, Formula, Node, Signature, Term};

/// Database with every body predicate defined, so calls always resolve
fn seeded_db() -> ClauseDb {
    let mut db = ClauseDb::new();
    db.add_fact(&AtomBuilder::new("p").constant("a").constant("b").build())
        .unwrap();
    db.add_fact(&AtomBuilder::new("q").constant("a").build()).unwrap();
    db.add_fact(&AtomBuilder::new("r").build()).unwrap();
    db
}

fn variable() -> impl Strategy<Value = Term> {
    prop::sample::select(vec!["A", "B", "C", "D"]).prop_map(Term::var)
}

fn argument() -> impl Strategy<Value = Term> {
    prop_oneof![
        3 => variable(),
        1 => prop::sample::select(vec!["a", "b"]).prop_map(Term::constant),
        1 => (-5i64..5).prop_map(Term::Integer),
        1 => variable().prop_map(|v| Term::Compound(Atom::new("f", vec![v]))),
    ]
}

fn body_atom() -> impl Strategy<Value = Formula> {
    prop_oneof![
        (argument(), argument()).prop_map(|(x, y)| Formula::Atom(Atom::new("p", vec![x, y]))),
        argument().prop_map(|x| Formula::Atom(Atom::new("q", vec![x]))),
        Just(Formula::Atom(Atom::new("r", Vec::new()))),
    ]
}

fn body() -> impl Strategy<Value = Formula> {
    body_atom().prop_recursive(3, 16, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Formula::and(l, r)),
            (inner.clone(), inner).prop_map(|(l, r)| Formula::or(l, r)),
        ]
    })
}

fn head() -> impl Strategy<Value = Atom> {
    prop::collection::vec(argument(), 0..4).prop_map(|args| Atom::new("h", args))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_clause_round_trips_up_to_renaming(head in head(), body in body()) {
        let mut db = seeded_db();
        db.add_clause(&head, &body).unwrap();

        let defs = db.definitions(&head.signature()).unwrap();
        prop_assert_eq!(defs.len(), 1);
        let original = Formula::from(clausedb::Clause::new(head, body));
        prop_assert!(
            defs[0].is_variant_of(&original),
            "{} is not a variant of {}", defs[0], original
        );
    }

    #[test]
    fn prop_fact_round_trips_exactly(args in prop::collection::vec(
        prop_oneof![
            prop::sample::select(vec!["a", "b", "c"]).prop_map(Term::constant),
            any::<i64>().prop_map(Term::Integer),
        ],
        0..5,
    )) {
        let fact = Atom::new("g", args);
        let mut db = ClauseDb::new();
        let address = db.add_fact(&fact).unwrap();
        prop_assert_eq!(db.find(&fact.signature()), Some(address));
        prop_assert_eq!(
            db.definitions(&fact.signature()).unwrap(),
            vec![Formula::Atom(fact)]
        );
    }

    #[test]
    fn prop_compilation_is_deterministic(head in head(), body in body()) {
        let mut first = seeded_db();
        let mut second = seeded_db();
        let a = first.add_clause(&head, &body).unwrap();
        let b = second.add_clause(&head, &body).unwrap();
        prop_assert_eq!(a, b);

        let left: Vec<Node> = first.nodes().map(|(_, n)| n.clone()).collect();
        let right: Vec<Node> = second.nodes().map(|(_, n)| n.clone()).collect();
        prop_assert_eq!(left, right);
    }

    #[test]
    fn prop_variable_count_matches_distinct_variables(head in head(), body in body()) {
        let mut db = seeded_db();
        db.add_clause(&head, &body).unwrap();

        let clause = Formula::from(clausedb::Clause::new(head, body));
        let mut distinct: Vec<String> = Vec::new();
        collect_variables(&clause, &mut distinct);

        let count = db.nodes().find_map(|(_, n)| match n {
            Node::Def { variable_count, .. } => Some(*variable_count),
            _ => None,
        });
        prop_assert_eq!(count, Some(distinct.len()));
    }

    #[test]
    fn prop_reserved_address_survives_definition(name in "[s-z][a-z]{0,4}", arity in 0usize..3) {
        let signature = Signature::new(name.clone(), arity);
        let mut db = seeded_db();
        let call = Atom::new(name.clone(), (0..arity).map(|_| Term::var("A")).collect());
        db.add_clause(&Atom::new("caller", vec![Term::var("A")]), &call.into()).unwrap();

        let reserved = db.find(&signature).unwrap();
        prop_assert!(db.get_node(reserved).unwrap().is_placeholder());

        let fact = Atom::new(name, (0..arity).map(|_| Term::constant("a")).collect());
        let defined = db.add_fact(&fact).unwrap();
        prop_assert_eq!(reserved, defined);
        prop_assert_eq!(db.definitions(&signature).unwrap().len(), 1);
    }
}

fn collect_variables(formula: &Formula, out: &mut Vec<String>) {
    fn term(t: &Term, out: &mut Vec<String>) {
        match t {
            Term::Variable(v) if !out.contains(v) => out.push(v.clone()),
            Term::Compound(atom) => atom.args.iter().for_each(|a| term(a, out)),
            _ => {}
        }
    }
    match formula {
        Formula::Atom(atom) => atom.args.iter().for_each(|a| term(a, out)),
        Formula::And(l, r) | Formula::Or(l, r) => {
            collect_variables(l, out);
            collect_variables(r, out);
        }
        Formula::Not(child) => collect_variables(child, out),
        Formula::Clause(clause) => {
            clause.head.args.iter().for_each(|a| term(a, out));
            collect_variables(&clause.body, out);
        }
    }
}
