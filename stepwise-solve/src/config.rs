/// Limits and names used while solving and extracting calls.
///
/// [`solve`](crate::solve) and [`extract`](crate::extract) use [`Config::default`]. Use
/// [`solve_with`](crate::solve_with) and [`extract_with`](crate::extract_with) to pass a custom
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The maximum number of rewrites, such as applications of L'Hôpital's rule, used to compute
    /// one limit.
    pub max_lhopital: usize,

    /// The maximum order of a pole that a Laurent series may have.
    pub max_pole_order: u32,

    /// The maximum number of terms of a series.
    pub max_series_terms: u32,

    /// The names of the functions recognized by the call extractor.
    pub call_names: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_lhopital: 8,
            max_pole_order: 6,
            max_series_terms: 20,
            call_names: vec!["solve".to_string(), "calc_solve".to_string()],
        }
    }
}

impl Config {
    /// Returns true if the given name is a recognized call name.
    pub fn is_call_name(&self, name: &str) -> bool {
        self.call_names.iter().any(|call_name| call_name == name)
    }
}
