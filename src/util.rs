use hashbrown::HashMap;

lazy_static! {
    /// Built-in functions of one argument, by name. `log` is the natural
    /// logarithm.
    pub static ref FUNCTIONS: HashMap<&'static str, fn(f64) -> f64> = {
        let mut map = HashMap::<&'static str, fn(f64) -> f64>::new();
        map.insert("sin", libm::sin);
        map.insert("cos", libm::cos);
        map.insert("tan", libm::tan);
        map.insert("sqrt", libm::sqrt);
        map.insert("log", libm::log);
        map.insert("abs", libm::fabs);
        map.insert("exp", libm::exp);
        map.shrink_to_fit();
        map
    };

    /// Built-in named constants
    pub static ref CONSTANTS: HashMap<&'static str, f64> = {
        let mut map = HashMap::new();
        map.insert("e", std::f64::consts::E);
        map.insert("pi", std::f64::consts::PI);
        map.shrink_to_fit();
        map
    };
}

/// Name of the free variable
pub const VARIABLE: &str = "x";

#[must_use]
/// Check if `name` is one of the names the parser accepts: a built-in
/// function, a constant or the variable.
///
/// # Examples
///
/// ```
/// # use plotexpr::is_builtin;
/// assert!(is_builtin("sqrt"));
/// assert!(is_builtin("pi"));
/// assert!(is_builtin("x"));
/// assert!(!is_builtin("Sin"));
/// ```
pub fn is_builtin(name: &str) -> bool {
    name == VARIABLE || FUNCTIONS.contains_key(name) || CONSTANTS.contains_key(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry() {
        let mut names: Vec<&str> = FUNCTIONS.keys().copied().collect();
        names.sort_unstable();
        assert_eq!(names, ["abs", "cos", "exp", "log", "sin", "sqrt", "tan"]);

        let mut names: Vec<&str> = CONSTANTS.keys().copied().collect();
        names.sort_unstable();
        assert_eq!(names, ["e", "pi"]);
    }

    #[test]
    fn ieee_semantics() {
        assert!(FUNCTIONS["sqrt"](-1.0).is_nan());
        assert_eq!(FUNCTIONS["log"](0.0), f64::NEG_INFINITY);
        assert_eq!(FUNCTIONS["abs"](-2.5), 2.5);
        assert_eq!(FUNCTIONS["exp"](0.0), 1.0);
    }
}
