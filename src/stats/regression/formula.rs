use std::fmt;

/// Name given to the implicit constant term.
pub const INTERCEPT: &str = "Intercept";

/// `response ~ term_1 + ... + term_k + 1`.
///
/// The intercept is always included and never listed in `terms`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
  response: String,
  terms: Vec<String>,
}

impl Formula {
  /// Intercept-only formula.
  pub fn new(response: impl Into<String>) -> Self {
    Self {
      response: response.into(),
      terms: Vec::new(),
    }
  }

  pub fn with_terms<I, S>(response: impl Into<String>, terms: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      response: response.into(),
      terms: terms.into_iter().map(Into::into).collect(),
    }
  }

  /// A copy of `self` with `term` appended.
  pub fn with_term(&self, term: impl Into<String>) -> Self {
    let mut terms = self.terms.clone();
    terms.push(term.into());
    Self {
      response: self.response.clone(),
      terms,
    }
  }

  pub fn response(&self) -> &str {
    &self.response
  }

  pub fn terms(&self) -> &[String] {
    &self.terms
  }
}

impl fmt::Display for Formula {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.terms.is_empty() {
      write!(f, "{} ~ 1", self.response)
    } else {
      write!(f, "{} ~ {} + 1", self.response, self.terms.join(" + "))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::Formula;

  #[test]
  fn renders_like_a_patsy_formula() {
    let f = Formula::new("y");
    assert_eq!(f.to_string(), "y ~ 1");

    let f = f.with_term("x1").with_term("x3");
    assert_eq!(f.to_string(), "y ~ x1 + x3 + 1");
    assert_eq!(f.terms(), &["x1".to_string(), "x3".to_string()]);
  }

  #[test]
  fn with_term_leaves_original_untouched() {
    let base = Formula::with_terms("y", ["a"]);
    let extended = base.with_term("b");
    assert_eq!(base.terms().len(), 1);
    assert_eq!(extended.terms().len(), 2);
  }
}
