//! End-to-end construction scenarios for the canonical factories.

use std::cmp::Ordering;

use crate::{
    Add, Expr, ExprKind, Mul, Number, SubsMap, SymError, TypeId, constants, div, expr_cmp,
    integer, mul, pow, rational, root, subs, symbol,
};

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use super::*;

    #[test]
    fn integer_sum_folds() {
        let five = integer(2) + integer(3);
        assert_eq!(five, integer(5));
        assert_eq!(five.kind_tag(), TypeId::Integer);
    }

    #[test]
    fn repeated_term_becomes_product() {
        let x = symbol("x");
        let two_x = &x + &x;
        assert_eq!(two_x, mul(&integer(2), &x));
        let m = two_x.as_mul().unwrap();
        assert_eq!(*m.coef(), Number::integer(2));
        assert_eq!(m.dict().len(), 1);
    }

    #[test]
    fn powers_of_one_base_merge() {
        let x = symbol("x");
        let p = mul(
            &pow(&x, &integer(2)).unwrap(),
            &pow(&x, &integer(3)).unwrap(),
        );
        assert_eq!(p, pow(&x, &integer(5)).unwrap());
        assert_eq!(p.kind_tag(), TypeId::Pow);
    }

    #[test]
    fn substitution_merges_terms() {
        let (x, y) = (symbol("x"), symbol("y"));
        let map = SubsMap::from_iter([(x.clone(), y.clone())]);
        let out = subs(&(&x + &y), &map).unwrap();
        assert_eq!(out, mul(&integer(2), &y));
        assert_ne!(out.kind_tag(), TypeId::Add);
    }

    #[test]
    fn symbol_order_is_antisymmetric() {
        let (x, y) = (symbol("x"), symbol("y"));
        assert_eq!(expr_cmp(&x, &y), Ordering::Less);
        assert_eq!(expr_cmp(&y, &x), Ordering::Greater);
        assert_eq!(expr_cmp(&x, &x), Ordering::Equal);
    }

    #[test]
    fn negative_integer_power_is_exact() {
        let half = pow(&integer(2), &integer(-1)).unwrap();
        assert_eq!(half, rational(1, 2).unwrap());
        assert_eq!(half.kind_tag(), TypeId::Rational);
    }

    #[test]
    fn kind_tags_order_kinds() {
        let x = symbol("x");
        let ladder = [
            integer(1),
            rational(1, 3).unwrap(),
            x.clone(),
            constants::pi(),
            &x * symbol("y"),
            &x + symbol("y"),
            pow(&x, &integer(2)).unwrap(),
        ];
        for pair in ladder.windows(2) {
            assert_eq!(expr_cmp(&pair[0], &pair[1]), Ordering::Less, "{pair:?}");
        }
    }

    #[test]
    fn construction_order_does_not_matter() {
        let (x, y, z) = (symbol("x"), symbol("y"), symbol("z"));
        let a = Expr::sum(vec![x.clone(), integer(2) * &y, z.clone()]);
        let b = Expr::sum(vec![z.clone(), x.clone(), integer(2) * &y]);
        assert_eq!(a, b);
        assert_eq!(a.structural_hash(), b.structural_hash());

        let p = Expr::product(vec![x.clone(), pow(&y, &integer(2)).unwrap(), z.clone()]);
        let q = Expr::product(vec![z, pow(&y, &integer(2)).unwrap(), x]);
        assert_eq!(p, q);
        assert_eq!(p.structural_hash(), q.structural_hash());
    }

    #[test]
    fn nested_sums_and_products_flatten() {
        let (x, y, z) = (symbol("x"), symbol("y"), symbol("z"));
        let s = (&x + &y) + (&z + integer(1));
        let add = s.as_add().unwrap();
        assert_eq!(add.dict().len(), 3);
        assert_eq!(*add.coef(), Number::one());
        assert!(add.dict().keys().all(|k| k.as_add().is_none()));

        let p = (&x * &y) * (&z * integer(2));
        let m = p.as_mul().unwrap();
        assert_eq!(m.dict().len(), 3);
        assert!(m.dict().keys().all(|k| k.as_mul().is_none()));
    }

    #[test]
    fn degenerate_dictionaries_collapse() {
        let x = symbol("x");
        assert_eq!(Add::from_dict(Number::zero(), [(x.clone(), Number::one())]), x);
        assert_eq!(
            Add::from_dict(Number::integer(4), [(x.clone(), Number::zero())]),
            integer(4)
        );
        assert_eq!(
            Mul::from_dict(Number::one(), [(x.clone(), integer(1))]).unwrap(),
            x
        );
        assert_eq!(
            Mul::from_dict(Number::integer(3), [(x.clone(), integer(0))]).unwrap(),
            integer(3)
        );
    }

    #[test]
    fn coefficient_distributes_over_a_lone_sum() {
        let (x, y) = (symbol("x"), symbol("y"));
        let e = integer(2) * (&x + &y);
        assert_eq!(e, integer(2) * &x + integer(2) * &y);
        assert_eq!(e.kind_tag(), TypeId::Add);
    }

    #[test]
    fn exact_powers_evaluate() {
        assert_eq!(pow(&integer(0), &integer(0)).unwrap(), integer(1));
        assert_eq!(
            pow(&integer(-1), &rational(1, 2).unwrap()).unwrap(),
            constants::i()
        );
        assert_eq!(pow(&integer(8), &rational(2, 3).unwrap()).unwrap(), integer(4));
        // 2^(3/2) = 2*2^(1/2)
        let surd = pow(&integer(2), &rational(3, 2).unwrap()).unwrap();
        let expected = integer(2) * pow(&integer(2), &rational(1, 2).unwrap()).unwrap();
        assert_eq!(surd, expected);
        // Perfect square factors leave the radical
        let half = rational(1, 2).unwrap();
        let root3 = pow(&integer(3), &half).unwrap();
        assert_eq!(pow(&integer(12), &half).unwrap(), integer(2) * &root3);
    }

    #[test]
    fn products_of_surds_match_direct_powers() {
        let quarter_root = pow(&integer(4), &rational(1, 4).unwrap()).unwrap();
        let product = &quarter_root * &quarter_root;
        let direct = pow(&integer(4), &rational(1, 2).unwrap()).unwrap();
        assert_eq!(product, direct);
        assert_eq!(product, integer(2));
        assert_eq!(product.structural_hash(), direct.structural_hash());

        let half = rational(1, 2).unwrap();
        let root2 = pow(&integer(2), &half).unwrap();
        let root8 = pow(&integer(8), &half).unwrap();
        assert_eq!(&root2 * &root8, integer(4));
        assert_eq!(root8, integer(2) * &root2);
    }

    #[test]
    fn domain_errors() {
        let x = symbol("x");
        assert!(matches!(div(&x, &integer(0)), Err(SymError::Domain(_))));
        assert!(matches!(div(&integer(1), &integer(0)), Err(SymError::Domain(_))));
        assert!(matches!(root(&x, 0), Err(SymError::Domain(_))));
        assert!(matches!(
            pow(&integer(0), &integer(-2)),
            Err(SymError::Domain(_))
        ));
    }

    #[test]
    fn identities_are_singletons() {
        let zero = integer(2) - integer(2);
        assert!(Expr::ptr_eq(&zero, &constants::zero()));
        let one = integer(3) * rational(1, 3).unwrap();
        assert!(Expr::ptr_eq(&one, &constants::one()));
    }

    #[test]
    fn children_rebuild_the_same_node() {
        let (x, y) = (symbol("x"), symbol("y"));
        let samples = [
            integer(3) + integer(2) * &x - &y,
            integer(5) * &x * pow(&y, &integer(-2)).unwrap(),
            pow(&(&x + &y), &x).unwrap(),
            crate::sin(&(&x * &y)),
        ];
        for e in samples {
            let rebuilt = e.with_children(e.children()).unwrap();
            assert_eq!(rebuilt, e);
            assert_eq!(rebuilt.structural_hash(), e.structural_hash());
        }
    }

    #[test]
    fn shared_children_are_not_copied() {
        let x = symbol("x");
        let s = crate::sin(&x);
        let e = &s + pow(&s, &integer(2)).unwrap();
        let ExprKind::Add(add) = e.kind() else {
            panic!("expected a sum, got {e}");
        };
        assert!(add.dict().keys().any(|k| Expr::ptr_eq(k, &s)));
    }

    #[cfg(feature = "thread-safe")]
    #[test]
    fn expressions_cross_threads() {
        let x = symbol("x");
        let e = pow(&(&x + integer(1)), &integer(2)).unwrap();
        let handle = {
            let e = e.clone();
            std::thread::spawn(move || &e * integer(2))
        };
        let doubled = handle.join().unwrap();
        assert_eq!(doubled, integer(2) * &e);
    }
}
