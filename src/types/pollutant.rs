//! Pollutant selection for an import request.

/// Which pollutant columns to keep in the returned data.
///
/// Codes are the lower-case column names the publisher uses, e.g. `"no2"`,
/// `"so2"`, `"pm10"`, `"pm2.5"`. A requested code that a fragment does not
/// carry is simply absent from the result rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PollutantFilter {
    /// Keep every pollutant column the publisher provides.
    #[default]
    All,
    /// Restrict to the named pollutant codes.
    Codes(Vec<String>),
}

impl PollutantFilter {
    /// Builds a filter from pollutant codes, normalising them to lower case.
    ///
    /// ```
    /// use localair::PollutantFilter;
    ///
    /// let filter = PollutantFilter::codes(["NO2", "so2"]);
    /// assert_eq!(filter, PollutantFilter::Codes(vec!["no2".into(), "so2".into()]));
    /// ```
    pub fn codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        PollutantFilter::Codes(
            codes
                .into_iter()
                .map(|code| code.as_ref().to_lowercase())
                .collect(),
        )
    }

    /// Whether a pollutant column passes this filter.
    pub(crate) fn selects(&self, column: &str) -> bool {
        match self {
            PollutantFilter::All => true,
            PollutantFilter::Codes(codes) => {
                codes.iter().any(|code| code.eq_ignore_ascii_case(column))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_selects_everything() {
        assert!(PollutantFilter::All.selects("no2"));
        assert!(PollutantFilter::All.selects("anything"));
    }

    #[test]
    fn codes_select_case_insensitively() {
        let filter = PollutantFilter::codes(["SO2"]);
        assert!(filter.selects("so2"));
        assert!(!filter.selects("no2"));
    }
}
