use crate::symbolic::symbolic_engine::Expr;
//___________________________________TESTS____________________________________

mod tests {
    use super::*;
    use std::collections::HashMap;

    fn x() -> Expr {
        Expr::Var("x".to_string())
    }

    #[test]
    fn test_operator_overloading() {
        let expr = x() + Expr::Const(2.0);
        let expected = Expr::Add(Box::new(x()), Box::new(Expr::Const(2.0)));
        assert_eq!(expr, expected);
        let expr = x() * x() - Expr::Const(1.0) / x();
        let expected = Expr::Sub(
            Box::new(Expr::Mul(Box::new(x()), Box::new(x()))),
            Box::new(Expr::Div(Box::new(Expr::Const(1.0)), Box::new(x()))),
        );
        assert_eq!(expr, expected);
    }

    #[test]
    fn test_neg() {
        assert_eq!(-Expr::Const(2.0), Expr::Const(-2.0));
        assert_eq!(
            -x(),
            Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(x()))
        );
    }

    #[test]
    fn test_display_minimal_parentheses() {
        let e = (x() + Expr::Const(1.0)) * (x() - Expr::Const(1.0));
        assert_eq!(e.to_string(), "(x + 1)*(x - 1)");
        let e = x() - (x() - Expr::Const(1.0));
        assert_eq!(e.to_string(), "x - (x - 1)");
        let e = x() / (Expr::Const(2.0) * x());
        assert_eq!(e.to_string(), "x/(2*x)");
        let e = x().pow(Expr::Const(2.0)).pow(Expr::Const(3.0));
        assert_eq!(e.to_string(), "(x**2)**3");
        let e = Expr::Const(-2.0).pow(Expr::Const(2.0));
        assert_eq!(e.to_string(), "(-2)**2");
        let e = Expr::sin(Box::new(x() * Expr::Const(2.0)));
        assert_eq!(e.to_string(), "sin(x*2)");
    }

    #[test]
    fn test_display_function_names() {
        let e = Expr::tg(Box::new(x())) + Expr::arctg(Box::new(x())) + Expr::Ln(Box::new(x()));
        assert_eq!(e.to_string(), "tan(x) + atan(x) + log(x)");
    }

    #[test]
    fn test_display_round_trip() {
        for input in [
            "2*x**2 + 3*x - 5",
            "-x**2 + x",
            "x - (y - z)",
            "x/(y*z)",
            "x**(-1)",
            "(x + 1)**2/(x - 1)",
            "sqrt(abs(x)) - exp(-x)",
            "2**3**2",
            "-(x + 1)*(x - 1)",
        ] {
            let e = Expr::parse_expression(input).unwrap();
            let again = Expr::parse_expression(&e.to_string()).unwrap();
            assert_eq!(e, again, "round trip failed for {}", input);
        }
    }

    #[test]
    fn test_variables_sorted_and_unique() {
        let e = Expr::parse_expression("z*x + y - x**2 + sin(y)").unwrap();
        assert_eq!(e.variables(), vec!["x", "y", "z"]);
        assert!(Expr::parse_expression("2 + pi").unwrap().variables().is_empty());
    }

    #[test]
    fn test_set_variable() {
        let e = Expr::parse_expression("x**2 + y").unwrap();
        let e = e.set_variable("x", 3.0);
        assert!(!e.contains_variable("x"));
        assert_eq!(e.eval("y", 1.0), 10.0);
    }

    #[test]
    fn test_set_variable_from_map() {
        let e = Expr::parse_expression("x*y + z").unwrap();
        let mut values = HashMap::new();
        values.insert("x".to_string(), 2.0);
        values.insert("y".to_string(), 5.0);
        let e = e.set_variable_from_map(&values);
        assert_eq!(e.variables(), vec!["z"]);
        assert_eq!(e.eval("z", 1.0), 11.0);
    }

    #[test]
    fn test_substitute_variable() {
        let e = Expr::parse_expression("x**2").unwrap();
        let e = e.substitute_variable("x", &Expr::parse_expression("y + 1").unwrap());
        assert_eq!(e.to_string(), "(y + 1)**2");
    }

    #[test]
    fn test_size() {
        assert_eq!(x().size(), 1);
        assert_eq!(Expr::parse_expression("sin(x) + 1").unwrap().size(), 4);
    }
}
