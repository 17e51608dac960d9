//! Environment variable validation
//!
//! An invalid `LEDGERPACK_*` value never aborts a run: it is reported as a
//! warning (with a typo suggestion when one is close) and the setting keeps
//! its previous value.

/// Validator for one environment variable with a closed set of values.
pub struct EnvVarValidator<'a> {
    var_name: &'a str,
    valid_values: &'a [&'a str],
}

impl<'a> EnvVarValidator<'a> {
    pub fn new(var_name: &'a str, valid_values: &'a [&'a str]) -> Self {
        Self {
            var_name,
            valid_values,
        }
    }

    /// Parse `value`, falling back to `default` with a logged warning.
    pub fn parse<T, F>(&self, value: &str, parser: F, default: T) -> T
    where
        F: Fn(&str) -> Option<T>,
    {
        match self.check(value, parser) {
            Ok(parsed) => parsed,
            Err(warning) => {
                tracing::warn!(variable = self.var_name, "{}", warning);
                default
            }
        }
    }

    /// Parse `value` or describe why it was rejected.
    pub fn check<T, F>(&self, value: &str, parser: F) -> Result<T, String>
    where
        F: Fn(&str) -> Option<T>,
    {
        parser(value.trim()).ok_or_else(|| {
            format!(
                "invalid {} value '{}'{} (valid values: {})",
                self.var_name,
                value,
                self.suggest(value),
                self.valid_values.join(", ")
            )
        })
    }

    fn suggest(&self, value: &str) -> String {
        let input = value.trim().to_lowercase();
        let mut best: Option<(&str, usize)> = None;

        for &valid in self.valid_values {
            let dist = levenshtein(&input, valid);
            match best {
                None => best = Some((valid, dist)),
                Some((_, best_dist)) if dist < best_dist => best = Some((valid, dist)),
                _ => {}
            }
        }

        match best {
            Some((suggested, dist)) if dist <= 2 && dist > 0 => {
                format!(", did you mean '{}'?", suggested)
            }
            _ => String::new(),
        }
    }
}

/// Levenshtein distance, used for "did you mean" hints on keys and values.
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let a_len = a_bytes.len();
    let b_len = b_bytes.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row: Vec<usize> = vec![0; b_len + 1];

    for (i, a_char) in a_bytes.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, b_char) in b_bytes.iter().enumerate() {
            let cost = if a_char == b_char { 0 } else { 1 };
            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_len]
}
