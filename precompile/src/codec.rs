use harness_types::{Address, Bytes};

use crate::{Error, Selector, SelectorTable, Word};

/// A call into a precompile: `selector || word_0 || word_1 || ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecompileCall {
    pub target: Address,
    pub selector: Selector,
    pub params: Vec<Word>,
}

impl PrecompileCall {
    #[must_use]
    pub const fn new(target: Address, selector: Selector) -> Self {
        Self { target, selector, params: Vec::new() }
    }

    #[must_use]
    pub fn with_param<W: Into<Word>>(mut self, param: W) -> Self {
        self.params.push(param.into());
        self
    }

    #[must_use]
    pub fn with_params<I: IntoIterator<Item = Word>>(mut self, params: I) -> Self {
        self.params.extend(params);
        self
    }

    #[must_use]
    pub fn calldata(&self) -> Bytes {
        calldata(self.selector, &self.params)
    }
}

fn calldata(selector: Selector, params: &[Word]) -> Bytes {
    let mut data = Vec::with_capacity(4 + 32 * params.len());
    data.extend_from_slice(selector.as_bytes());
    for param in params {
        data.extend_from_slice(param.as_bytes());
    }
    Bytes::from(data)
}

/// Encodes a call of `name` with hex encoded scalar params, each left padded to 32 bytes.
///
/// Dynamic types (arrays, strings, tuples) are not encoded, the arity of `name` isn't checked.
///
/// # Errors
/// [`Error::UnknownSelector`] if `name` isn't in `table`, [`Error::InvalidParameter`] if a param
/// isn't hex or doesn't fit in a word.
pub fn encode_call<P: AsRef<str>>(
    table: &SelectorTable,
    name: &str,
    params: &[P],
) -> Result<Bytes, Error> {
    let selector = table.selector(name)?;
    let words = params
        .iter()
        .enumerate()
        .map(|(index, param)| {
            Word::from_hex(param).map_err(|source| Error::InvalidParameter { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let data = calldata(selector, &words);
    log::debug!("{name} calldata: {data}");
    Ok(data)
}
