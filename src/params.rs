use crate::Value;

/// SQL parameter container.
///
/// Exactly one binding mode is active per statement; the three variants make
/// unsupported argument shapes unrepresentable, so no runtime shape check is
/// needed before a request goes out.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Params {
    /// No parameters; the request omits the argument key entirely.
    #[default]
    None,
    /// Positional values mapped to `?` placeholders, bound by index.
    Positional(Vec<Value>),
    /// Named values mapped to `:name` style placeholders, bound by name.
    Named(Vec<(String, Value)>),
}

impl Params {
    /// Builds positional parameters.
    pub fn positional(values: impl Into<Vec<Value>>) -> Self {
        Self::Positional(values.into())
    }

    /// Builds named parameters. Names are looked up by the server, so pair
    /// order does not matter.
    pub fn named<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self::Named(
            pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }

    /// True when encoding this shape produces no argument entries.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::Positional(values) => values.is_empty(),
            Self::Named(pairs) => pairs.is_empty(),
        }
    }
}

impl From<()> for Params {
    fn from(_: ()) -> Self {
        Self::None
    }
}

impl From<Vec<Value>> for Params {
    fn from(values: Vec<Value>) -> Self {
        Self::Positional(values)
    }
}

impl<const N: usize> From<[Value; N]> for Params {
    fn from(values: [Value; N]) -> Self {
        Self::Positional(values.into())
    }
}

impl From<Vec<(String, Value)>> for Params {
    fn from(pairs: Vec<(String, Value)>) -> Self {
        Self::Named(pairs)
    }
}

impl<const N: usize> From<[(&str, Value); N]> for Params {
    fn from(pairs: [(&str, Value); N]) -> Self {
        Self::named(pairs)
    }
}
