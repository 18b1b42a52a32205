use lcalc::{Context, Error, parse_def};
use proptest::prelude::*;

fn var() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("x"), Just("y"), Just("z")]
}

// bodies over x, y and z; closing them under λx.λy.λz gives a closed term
fn body() -> impl Strategy<Value = String> {
    var()
        .prop_map(String::from)
        .prop_recursive(4, 32, 2, |inner| {
            prop_oneof![
                (inner.clone(), inner.clone()).prop_map(|(f, a)| format!("({}) ({})", f, a)),
                (var(), inner).prop_map(|(v, b)| format!("λ{}.{}", v, b)),
            ]
        })
}

prop_compose! {
    fn closed_term()(body in body()) -> String {
        format!("λx.λy.λz.{}", body)
    }
}

prop_compose! {
    fn name()(name in "[a-eg-z][a-z0-9_]{0,5}") -> String {
        name
    }
}

proptest! {
    #[test]
    fn prop_alpha_renaming_preserves_equality(a in name(), b in name()) {
        prop_assume!(a != "import" && b != "import");
        let left = parse_def(&format!("λ{a}.λf.f {a} (λ{a}.{a})")).unwrap();
        let right = parse_def(&format!("λ{b}.λf.f {b} (λ{b}.{b})")).unwrap();
        prop_assert_eq!(left, right);
    }

    #[test]
    fn prop_shift_leaves_closed_terms_alone(term in closed_term(), d in -8isize..8) {
        let e = parse_def(&term).unwrap();
        prop_assert!(e.is_closed());
        prop_assert_eq!(e.shift(d, 0), e.clone());
    }

    #[test]
    fn prop_beta_is_deterministic(term in closed_term()) {
        let context = Context::empty();
        let e = parse_def(&term).unwrap();
        let once = e.beta(&context).unwrap();
        prop_assert_eq!(once.clone(), e.beta(&context).unwrap());
        prop_assert!(once.is_closed());
    }

    #[test]
    fn prop_normal_forms_are_stable(term in closed_term()) {
        let context = Context::empty();
        let e = parse_def(&term).unwrap();
        match context.normalize(e, Some(10)) {
            Ok(evaluation) => {
                prop_assert!(evaluation.normal_form.is_normal());
                prop_assert_eq!(
                    evaluation.normal_form.beta(&context).unwrap(),
                    evaluation.normal_form.clone()
                );
            }
            Err(err) => {
                let did_not_converge = matches!(err, Error::DidNotConverge { .. });
                prop_assert!(did_not_converge);
            }
        }
    }

    #[test]
    fn prop_comments_do_not_change_terms(noise in "[a-z ;.=]{0,20}") {
        let noisy = parse_def(&format!("{{{noise}}} λx.{{{noise}}}x")).unwrap();
        prop_assert_eq!(noisy, parse_def("λx.x").unwrap());
    }
}
