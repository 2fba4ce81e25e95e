//! Conversion between the positional `params` sequence of a request
//! envelope and the fixed-arity argument types of handlers and proxies.
//!
//! Handlers take their arguments as a tuple, one element per positional
//! parameter. Arity is checked explicitly: a request with the wrong number
//! of parameters fails with a distinct message instead of being silently
//! truncated or padded.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Builds a handler's arguments from the decoded `params` sequence.
pub trait FromParams: Sized {
    fn from_params(params: Vec<Value>) -> Result<Self, ParamsError>;
}

/// Turns caller arguments into the `params` sequence of a request.
pub trait IntoParams {
    fn into_params(self) -> Result<Vec<Value>, ParamsError>;
}

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("expected {expected} parameters, got {actual}")]
    Arity { expected: usize, actual: usize },

    #[error("parameter {index}: {source}")]
    Invalid {
        index: usize,
        source: serde_json::Error,
    },
}

/// Raw access: the params sequence as-is, no arity check.
impl FromParams for Vec<Value> {
    fn from_params(params: Vec<Value>) -> Result<Self, ParamsError> {
        Ok(params)
    }
}

impl IntoParams for Vec<Value> {
    fn into_params(self) -> Result<Vec<Value>, ParamsError> {
        Ok(self)
    }
}

impl FromParams for () {
    fn from_params(params: Vec<Value>) -> Result<Self, ParamsError> {
        if params.is_empty() {
            Ok(())
        } else {
            Err(ParamsError::Arity {
                expected: 0,
                actual: params.len(),
            })
        }
    }
}

impl IntoParams for () {
    fn into_params(self) -> Result<Vec<Value>, ParamsError> {
        Ok(Vec::new())
    }
}

macro_rules! impl_params_tuple {
    ($len:expr $(, ($idx:tt, $ty:ident, $arg:ident))+) => {
        impl<$($ty),+> FromParams for ($($ty,)+)
        where
            $($ty: DeserializeOwned,)+
        {
            fn from_params(params: Vec<Value>) -> Result<Self, ParamsError> {
                if params.len() != $len {
                    return Err(ParamsError::Arity {
                        expected: $len,
                        actual: params.len(),
                    });
                }
                let mut params = params.into_iter();
                Ok(($(
                    serde_json::from_value::<$ty>(params.next().unwrap_or(Value::Null))
                        .map_err(|source| ParamsError::Invalid { index: $idx, source })?,
                )+))
            }
        }

        impl<$($ty),+> IntoParams for ($($ty,)+)
        where
            $($ty: Serialize,)+
        {
            fn into_params(self) -> Result<Vec<Value>, ParamsError> {
                let ($($arg,)+) = self;
                Ok(vec![$(
                    serde_json::to_value($arg)
                        .map_err(|source| ParamsError::Invalid { index: $idx, source })?,
                )+])
            }
        }
    };
}

impl_params_tuple!(1, (0, T0, p0));
impl_params_tuple!(2, (0, T0, p0), (1, T1, p1));
impl_params_tuple!(3, (0, T0, p0), (1, T1, p1), (2, T2, p2));
impl_params_tuple!(4, (0, T0, p0), (1, T1, p1), (2, T2, p2), (3, T3, p3));
impl_params_tuple!(5, (0, T0, p0), (1, T1, p1), (2, T2, p2), (3, T3, p3), (4, T4, p4));
impl_params_tuple!(6, (0, T0, p0), (1, T1, p1), (2, T2, p2), (3, T3, p3), (4, T4, p4), (5, T5, p5));
impl_params_tuple!(7, (0, T0, p0), (1, T1, p1), (2, T2, p2), (3, T3, p3), (4, T4, p4), (5, T5, p5), (6, T6, p6));
impl_params_tuple!(8, (0, T0, p0), (1, T1, p1), (2, T2, p2), (3, T3, p3), (4, T4, p4), (5, T5, p5), (6, T6, p6), (7, T7, p7));

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tuple_from_params() {
        let (a, b) = <(i64, String)>::from_params(vec![json!(7), json!("x")]).unwrap();
        assert_eq!(a, 7);
        assert_eq!(b, "x");
    }

    #[test]
    fn arity_mismatch_is_reported() {
        let err = <(i64, i64)>::from_params(vec![json!(1)]).unwrap_err();
        assert_eq!(err.to_string(), "expected 2 parameters, got 1");
    }

    #[test]
    fn bad_parameter_reports_its_index() {
        let err = <(i64, i64)>::from_params(vec![json!(1), json!("two")]).unwrap_err();
        assert!(matches!(err, ParamsError::Invalid { index: 1, .. }));
    }

    #[test]
    fn tuple_into_params() {
        let params = (1, "two", true).into_params().unwrap();
        assert_eq!(params, vec![json!(1), json!("two"), json!(true)]);
    }

    #[test]
    fn unit_round_trip() {
        assert!(().into_params().unwrap().is_empty());
        <()>::from_params(Vec::new()).unwrap();
        assert!(<()>::from_params(vec![json!(1)]).is_err());
    }

    #[test]
    fn raw_params_pass_through() {
        let raw = vec![json!({"k": 1}), json!(null)];
        let round = Vec::<Value>::from_params(raw.clone()).unwrap();
        assert_eq!(round, raw);
    }
}
