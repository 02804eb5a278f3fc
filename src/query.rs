//! The two-phase "probe then fetch" calling convention
//!
//! Many Windows APIs take a caller-provided buffer and, when it is too small,
//! fail with `ERROR_INSUFFICIENT_BUFFER` (or a sibling status) while reporting
//! the size they need. [`sized_query`] drives such an API exactly twice at most:
//! once with the initial buffer, and once more with a buffer of the reported
//! size.

use {
    log::trace,
    std::fmt::{self, Debug, Display, Formatter},
};

/// The outcome of a single failed call to a sized operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe<E> {
    /// The buffer was too small; `required` elements are needed
    #[doc(alias = "ERROR_INSUFFICIENT_BUFFER")]
    #[doc(alias = "ERROR_MORE_DATA")]
    InsufficientBuffer {
        #[allow(missing_docs)]
        required: usize,
    },
    /// Any other failure
    Failed(E),
}

/// A [`sized_query`] failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError<E> {
    /// The first call failed for a reason other than buffer size
    Probe(E),
    /// The second call, made with the size reported by the first, failed
    Fetch(E),
    /// The second call still reported an insufficient buffer
    SizeMismatch {
        /// Elements allocated from the first call's report
        allocated: usize,
        /// Elements demanded by the second call
        required: usize,
    },
}

impl<E> QueryError<E> {
    /// The underlying operation error, if there is one
    pub fn into_source(self) -> Option<E> {
        match self {
            QueryError::Probe(e) | QueryError::Fetch(e) => Some(e),
            QueryError::SizeMismatch { .. } => None,
        }
    }
}

impl<E: Display> Display for QueryError<E> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            QueryError::Probe(e) => write!(f, "size probe failed: {e}"),
            QueryError::Fetch(e) => write!(f, "sized fetch failed: {e}"),
            QueryError::SizeMismatch { allocated, required } => write!(
                f,
                "source demanded {required} elements after sizing the buffer to {allocated}"
            ),
        }
    }
}

impl<E: Debug + Display> std::error::Error for QueryError<E> {}

/// Run a sized operation using the two-phase protocol
///
/// `op` is handed a buffer and returns the number of elements it wrote, or a
/// [`Probe`] failure. The first call receives a buffer of `initial` elements
/// (zero is a valid, pure probe). Only [`Probe::InsufficientBuffer`] on that
/// first call triggers a second call, with a buffer of exactly the reported
/// size; no third call is ever made.
///
/// The returned buffer is truncated to the length `op` reported as written.
pub fn sized_query<T, E, F>(initial: usize, mut op: F) -> Result<Vec<T>, QueryError<E>>
where
    T: Clone + Default,
    F: FnMut(&mut [T]) -> Result<usize, Probe<E>>,
{
    let mut buffer = vec![T::default(); initial];
    let required = match op(&mut buffer[..]) {
        Ok(written) => return Ok(truncated(buffer, written)),
        Err(Probe::InsufficientBuffer { required }) => required,
        Err(Probe::Failed(e)) => return Err(QueryError::Probe(e)),
    };
    trace!("sized query: {initial} elements insufficient, retrying with {required}");

    buffer.clear();
    buffer.resize(required, T::default());
    match op(&mut buffer[..]) {
        Ok(written) => Ok(truncated(buffer, written)),
        Err(Probe::InsufficientBuffer { required: again }) => Err(QueryError::SizeMismatch {
            allocated: required,
            required: again,
        }),
        Err(Probe::Failed(e)) => Err(QueryError::Fetch(e)),
    }
}

fn truncated<T>(mut buffer: Vec<T>, written: usize) -> Vec<T> {
    debug_assert!(written <= buffer.len(), "sized operation claims {written} of {} elements", buffer.len());
    buffer.truncate(written);
    buffer
}

#[cfg(test)]
mod tests {
    use {super::*, std::cell::Cell};

    /// A source holding `value`, following the convention of `RegQueryValueExW`
    fn source<'a>(value: &'a [u8], calls: &'a Cell<usize>) -> impl FnMut(&mut [u8]) -> Result<usize, Probe<&'static str>> + 'a {
        move |buf| {
            calls.set(calls.get() + 1);
            match buf.len() < value.len() {
                true => Err(Probe::InsufficientBuffer { required: value.len() }),
                false => {
                    buf[..value.len()].copy_from_slice(value);
                    Ok(value.len())
                },
            }
        }
    }

    #[test]
    fn exact_length_regardless_of_guess() {
        let value: Vec<u8> = (0..=255).collect();
        for guess in [0, 1, 128, 255, 256, 257, 4096] {
            let calls = Cell::new(0);
            let data = sized_query(guess, source(&value, &calls)).unwrap();
            assert_eq!(data, value, "guess {guess}");
            let expected_calls = if guess >= value.len() { 1 } else { 2 };
            assert_eq!(calls.get(), expected_calls, "guess {guess}");
        }
    }

    #[test]
    fn empty_value_is_empty_buffer() {
        let calls = Cell::new(0);
        let data = sized_query(0, source(&[], &calls)).unwrap();
        assert!(data.is_empty());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn first_call_failure_is_not_retried() {
        let mut calls = 0;
        let res = sized_query::<u8, _, _>(0, |_| {
            calls += 1;
            Err(Probe::Failed("access denied"))
        });
        assert_eq!(res, Err(QueryError::Probe("access denied")));
        assert_eq!(calls, 1);
    }

    #[test]
    fn second_call_failure_is_surfaced() {
        let mut calls = 0;
        let res = sized_query::<u8, _, _>(0, |buf| {
            calls += 1;
            match buf.len() {
                0 => Err(Probe::InsufficientBuffer { required: 16 }),
                _ => Err(Probe::Failed("device removed")),
            }
        });
        assert_eq!(res, Err(QueryError::Fetch("device removed")));
        assert_eq!(calls, 2);
    }

    #[test]
    fn growing_source_is_a_mismatch() {
        let mut size = 8;
        let mut calls = 0;
        let res = sized_query::<u16, &str, _>(0, |buf| {
            calls += 1;
            match buf.len() < size {
                true => {
                    let required = size;
                    size *= 2;
                    Err(Probe::InsufficientBuffer { required })
                },
                false => Ok(size),
            }
        });
        assert_eq!(res, Err(QueryError::SizeMismatch { allocated: 8, required: 16 }));
        assert_eq!(calls, 2);
    }

    #[test]
    fn declared_length_truncates_capacity() {
        let data = sized_query::<u8, (), _>(128, |buf| {
            buf[..3].copy_from_slice(&[1, 2, 3]);
            Ok(3)
        })
        .unwrap();
        assert_eq!(data, [1, 2, 3]);
    }
}
