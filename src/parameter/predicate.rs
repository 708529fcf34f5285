//! Predicate combinators over name, variable and type.
//!
//! Lookups scan front to back and stop at the first match, so the more
//! specific combinators are how same-named parameters from different sources
//! are told apart.
use super::parameter::Parameter;
use super::value::ParameterType;

pub fn parameter_name(name: &str) -> impl Fn(&Parameter) -> bool + '_ {
    move |p| p.name() == name
}

pub fn parameter_variable(variable: &str) -> impl Fn(&Parameter) -> bool + '_ {
    move |p| p.variable() == Some(variable)
}

pub fn parameter_type(parameter_type: ParameterType) -> impl Fn(&Parameter) -> bool {
    move |p| p.parameter_type() == parameter_type
}

pub fn and<A, B>(first: A, second: B) -> impl Fn(&Parameter) -> bool
where
    A: Fn(&Parameter) -> bool,
    B: Fn(&Parameter) -> bool,
{
    move |p| first(p) && second(p)
}

pub fn parameter_name_variable<'a>(name: &'a str, variable: &'a str) -> impl Fn(&Parameter) -> bool + 'a {
    and(parameter_name(name), parameter_variable(variable))
}

pub fn parameter_name_and_type(name: &str, kind: ParameterType) -> impl Fn(&Parameter) -> bool + '_ {
    and(parameter_name(name), parameter_type(kind))
}

pub fn parameter_variable_and_type(variable: &str, kind: ParameterType) -> impl Fn(&Parameter) -> bool + '_ {
    and(parameter_variable(variable), parameter_type(kind))
}

pub fn parameter_name_variable_type<'a>(
    name: &'a str,
    variable: &'a str,
    kind: ParameterType,
) -> impl Fn(&Parameter) -> bool + 'a {
    and(parameter_name_variable(name, variable), parameter_type(kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Scalar, ScalarVector};

    #[test]
    fn test_combinators_narrow_matches() {
        let scalar = Parameter::new("mean", Some("x"), Scalar::from(1.0));
        let vector = Parameter::new("mean", Some("x"), ScalarVector::from_numbers("m", None, [1]));

        let by_name = parameter_name("mean");
        assert!(by_name(&scalar) && by_name(&vector));

        let scalar_only = parameter_name_variable_type("mean", "x", ParameterType::Scalar);
        assert!(scalar_only(&scalar));
        assert!(!scalar_only(&vector));

        let wrong_variable = parameter_variable_and_type("y", ParameterType::Scalar);
        assert!(!wrong_variable(&scalar));
    }
}
