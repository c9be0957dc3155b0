use thiserror::Error;

use crate::model::Nargs;

pub(crate) type OffsetValue = (usize, String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Bound {
    Range(u8, u8),
    Lower(u8),
}

impl From<Nargs> for Bound {
    fn from(value: Nargs) -> Self {
        match value {
            Nargs::Precisely(n) => Bound::Range(n, n),
            Nargs::ZeroOrOne => Bound::Range(0, 1),
            Nargs::Any => Bound::Lower(0),
            Nargs::AtLeastOne => Bound::Lower(1),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ArgumentConfig {
    name: String,
    bound: Bound,
}

impl ArgumentConfig {
    pub(crate) fn new(name: impl Into<String>, bound: Bound) -> Self {
        Self {
            name: name.into(),
            bound,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn bound(&self) -> Bound {
        self.bound
    }
}

/// An option, identified by `name`, which may be spelled by any of its long or short flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OptionConfig {
    name: String,
    longs: Vec<String>,
    shorts: Vec<char>,
    bound: Bound,
}

impl OptionConfig {
    pub(crate) fn new(
        name: impl Into<String>,
        longs: Vec<String>,
        shorts: Vec<char>,
        bound: Bound,
    ) -> Self {
        Self {
            name: name.into(),
            longs,
            shorts,
            bound,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn longs(&self) -> &[String] {
        &self.longs
    }

    pub(crate) fn shorts(&self) -> &[char] {
        &self.shorts
    }

    pub(crate) fn bound(&self) -> Bound {
        self.bound
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
pub(crate) struct MatchTokens {
    pub name: String,
    pub values: Vec<OffsetValue>,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Matches {
    pub values: Vec<MatchTokens>,
}

impl Matches {
    pub(crate) fn contains(&self, name: &str) -> bool {
        self.values.iter().any(|mt| mt.name == name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(super) enum CloseError {
    #[error("too few values provided for '{name}' (provided={provided}, expected={expected}).")]
    TooFewValues {
        name: String,
        provided: usize,
        expected: u8,
    },

    #[error("too many values provided for '{name}' (provided={provided}, expected={expected}).")]
    TooManyValues {
        name: String,
        provided: usize,
        expected: u8,
    },
}

#[derive(Debug)]
pub(super) struct MatchBuffer {
    name: String,
    bound: Bound,
    values: Vec<OffsetValue>,
}

impl MatchBuffer {
    pub(super) fn new(name: impl Into<String>, bound: Bound) -> Self {
        Self {
            name: name.into(),
            bound,
            values: Vec::default(),
        }
    }

    pub(super) fn name(&self) -> &str {
        &self.name
    }

    pub(super) fn push(&mut self, offset: usize, value: String) {
        self.values.push((offset, value));
    }

    pub(super) fn is_open(&self) -> bool {
        match self.bound {
            Bound::Range(_, n) => self.values.len() < n as usize,
            Bound::Lower(_) => true,
        }
    }

    pub(super) fn close(self) -> Result<MatchTokens, CloseError> {
        let (lower, upper) = match self.bound {
            Bound::Range(i, j) => (i, Some(j)),
            Bound::Lower(i) => (i, None),
        };

        if self.values.len() < lower as usize {
            return Err(CloseError::TooFewValues {
                name: self.name,
                provided: self.values.len(),
                expected: lower,
            });
        }

        if let Some(upper) = upper {
            if self.values.len() > upper as usize {
                return Err(CloseError::TooManyValues {
                    name: self.name,
                    provided: self.values.len(),
                    expected: upper,
                });
            }
        }

        Ok(MatchTokens {
            name: self.name,
            values: self.values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{thread_rng, Rng};
    use rstest::rstest;

    #[test]
    fn from_nargs() {
        assert_eq!(Bound::from(Nargs::Precisely(0)), Bound::Range(0, 0));
        assert_eq!(Bound::from(Nargs::Precisely(1)), Bound::Range(1, 1));
        assert_eq!(Bound::from(Nargs::ZeroOrOne), Bound::Range(0, 1));
        assert_eq!(Bound::from(Nargs::Any), Bound::Lower(0));
        assert_eq!(Bound::from(Nargs::AtLeastOne), Bound::Lower(1));
    }

    #[test]
    fn option_config() {
        let config = OptionConfig::new(
            "name",
            vec!["name".to_string(), "alias".to_string()],
            vec!['n'],
            Bound::Range(1, 1),
        );
        assert_eq!(config.name(), "name");
        assert_eq!(config.longs(), &["name".to_string(), "alias".to_string()]);
        assert_eq!(config.shorts(), &['n']);
        assert_eq!(config.bound(), Bound::Range(1, 1));
    }

    #[rstest]
    #[case(Bound::Lower(0), 0, true)]
    #[case(Bound::Lower(0), 1, true)]
    #[case(Bound::Lower(1), 0, false)]
    #[case(Bound::Lower(1), 2, true)]
    #[case(Bound::Lower(10), 2, false)]
    #[case(Bound::Range(0, 2), 0, true)]
    #[case(Bound::Range(1, 2), 0, false)]
    #[case(Bound::Range(1, 2), 2, true)]
    #[case(Bound::Range(10, 20), 2, false)]
    fn match_buffer_lower(#[case] bound: Bound, #[case] feed: u8, #[case] expected_ok: bool) {
        // Setup
        let lower = match bound {
            Bound::Range(lower, _) => lower,
            Bound::Lower(lower) => lower,
        };
        let mut buffer = MatchBuffer::new("name", bound);
        let tokens: Vec<(usize, String)> = (0..feed)
            .map(|i| (thread_rng().gen_range(0..1000), i.to_string()))
            .collect();

        // Execute
        for (offset, token) in &tokens {
            buffer.push(*offset, token.clone());
        }

        // Verify
        if expected_ok {
            assert_eq!(
                buffer.close().unwrap(),
                MatchTokens {
                    name: "name".to_string(),
                    values: tokens,
                }
            );
        } else {
            assert_eq!(
                buffer.close().unwrap_err(),
                CloseError::TooFewValues {
                    name: "name".to_string(),
                    provided: feed as usize,
                    expected: lower,
                }
            );
        }
    }

    #[rstest]
    #[case(Bound::Range(0, 0), 0, true)]
    #[case(Bound::Range(0, 0), 1, false)]
    #[case(Bound::Range(0, 1), 1, true)]
    #[case(Bound::Range(0, 1), 2, false)]
    #[case(Bound::Range(0, 10), 20, false)]
    fn match_buffer_upper(#[case] bound: Bound, #[case] feed: u8, #[case] expected_ok: bool) {
        // Setup
        let upper = match bound {
            Bound::Range(_, upper) => upper,
            _ => unreachable!("un-planned test case"),
        };
        let mut buffer = MatchBuffer::new("name", bound);
        assert_eq!(buffer.is_open(), upper > 0);

        // Execute
        for i in 0..feed {
            buffer.push(i as usize, i.to_string());
        }

        // Verify
        assert_eq!(buffer.is_open(), upper > feed);

        if expected_ok {
            assert_eq!(buffer.close().unwrap().values.len(), feed as usize);
        } else {
            assert_eq!(
                buffer.close().unwrap_err(),
                CloseError::TooManyValues {
                    name: "name".to_string(),
                    provided: feed as usize,
                    expected: upper,
                }
            );
        }
    }
}
