use crate::error::{DispatchError, DispatchResult};

/// 一次分发的终态结果
///
/// 每次分发恰好产生一个 `Outcome`，产生后不可变，并且只交付给回调一次。
#[derive(Debug)]
pub enum Outcome<R> {
    Success(R),
    Failure(DispatchError),
}

impl<R> Outcome<R> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    pub fn into_result(self) -> DispatchResult<R> {
        match self {
            Self::Success(result) => Ok(result),
            Self::Failure(cause) => Err(cause),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(R) -> U) -> Outcome<U> {
        match self {
            Self::Success(result) => Outcome::Success(f(result)),
            Self::Failure(cause) => Outcome::Failure(cause),
        }
    }
}

impl<R> From<DispatchResult<R>> for Outcome<R> {
    fn from(result: DispatchResult<R>) -> Self {
        match result {
            Ok(v) => Self::Success(v),
            Err(e) => Self::Failure(e),
        }
    }
}
